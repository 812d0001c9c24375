// tests/postgres_store_tests.rs
//
// These run against the Postgres from DATABASE_URL and are skipped when it is
// not set. Every test creates its own users, quizzes and class ids, so they
// can share a database with other runs.

use memora_backend::{
    models::{
        quiz::{NewQuestion, NewQuiz},
        submission::NewSubmission,
        summary::{NewSummary, SummaryFilter},
        user::{NewUser, Role},
    },
    store::{PgStore, Store},
};
use sqlx::postgres::PgPoolOptions;

async fn connect() -> Option<PgStore> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    Some(PgStore::new(pool))
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

/// A class id no other run is likely to use.
fn unique_class_id() -> i64 {
    i64::from(uuid::Uuid::new_v4().as_fields().0)
}

async fn create_student(store: &PgStore) -> i64 {
    store
        .create_user(NewUser {
            name: "Aluno".to_string(),
            email: format!("{}@memora.test", unique("pg")),
            password_hash: "not-a-real-hash".to_string(),
            role: Role::Student,
            cpf: None,
            birthday: None,
            class_id: None,
        })
        .await
        .expect("Failed to create user")
        .id
}

fn question(key: &str) -> NewQuestion {
    NewQuestion {
        prompt: "?".to_string(),
        alternatives: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        answer_key: key.to_string(),
    }
}

async fn create_quiz(store: &PgStore, subject: &str, keys: &[&str]) -> i64 {
    store
        .create_quiz(NewQuiz {
            title: unique("quiz"),
            subject: subject.to_string(),
            teacher_id: None,
            class_id: None,
            questions: keys.iter().map(|key| question(key)).collect(),
        })
        .await
        .expect("Failed to create quiz")
        .id
}

fn submission(user_id: i64, quiz_id: i64, grade: f64) -> NewSubmission {
    NewSubmission {
        user_id,
        quiz_id,
        answers: vec![Some("A".to_string()), None],
        correct_count: 1,
        grade,
    }
}

#[tokio::test]
async fn duplicate_submission_is_dropped_and_first_kept() {
    let Some(store) = connect().await else { return };
    let user_id = create_student(&store).await;
    let quiz_id = create_quiz(&store, "Math", &["A", "B"]).await;

    let first = store
        .insert_submission(submission(user_id, quiz_id, 5.0))
        .await
        .unwrap();
    assert!(first.is_some());

    let second = store
        .insert_submission(submission(user_id, quiz_id, 10.0))
        .await
        .unwrap();
    assert!(second.is_none());

    let records = store.list_submissions(user_id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].grade, 5.0);
    assert_eq!(records[0].answers.0, vec![Some("A".to_string()), None]);
    assert!(store.has_submission(user_id, quiz_id).await.unwrap());
}

#[tokio::test]
async fn concurrent_submissions_land_once() {
    let Some(store) = connect().await else { return };
    let user_id = create_student(&store).await;
    let quiz_id = create_quiz(&store, "Math", &["A", "B"]).await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .insert_submission(submission(user_id, quiz_id, f64::from(i)))
                    .await
            })
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(store.list_submissions(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn submissions_list_newest_first_with_question_counts() {
    let Some(store) = connect().await else { return };
    let user_id = create_student(&store).await;
    let older = create_quiz(&store, "History", &["A", "B", "C"]).await;
    let newer = create_quiz(&store, "Math", &["A", "B"]).await;

    store
        .insert_submission(submission(user_id, older, 3.33))
        .await
        .unwrap();
    store
        .insert_submission(submission(user_id, newer, 5.0))
        .await
        .unwrap();

    let records = store.list_submissions(user_id).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].quiz_id, newer);
    assert_eq!(records[0].subject, "Math");
    assert_eq!(records[0].question_count, 2);
    assert_eq!(records[1].quiz_id, older);
    assert_eq!(records[1].question_count, 3);
}

#[tokio::test]
async fn summary_filters_match_subject_and_literal_keyword() {
    let Some(store) = connect().await else { return };
    let class_id = unique_class_id();

    for (subject, content) in [
        ("Biologia", "Clorofila absorve 100% da luz"),
        ("Biologia", "Mitose e meiose"),
        ("História", "Cem anos: 1000 eventos"),
    ] {
        store
            .create_summary(NewSummary {
                title: None,
                content: content.to_string(),
                subject: subject.to_string(),
                teacher_id: create_student(&store).await,
                class_id: Some(class_id),
            })
            .await
            .unwrap();
    }

    let filter = |subject: Option<&str>, search: Option<&str>| SummaryFilter {
        class_id,
        subject: subject.map(str::to_string),
        search: search.map(str::to_string),
    };

    let all = store.list_summaries(&filter(None, None)).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].subject, "História");

    let biology = store
        .list_summaries(&filter(Some("Biologia"), None))
        .await
        .unwrap();
    assert_eq!(biology.len(), 2);

    let keyword = store
        .list_summaries(&filter(None, Some("CLOROFILA")))
        .await
        .unwrap();
    assert_eq!(keyword.len(), 1);

    // "%" and "_" are plain characters in a search
    let percent = store
        .list_summaries(&filter(None, Some("100%")))
        .await
        .unwrap();
    assert_eq!(percent.len(), 1);
    assert!(percent[0].content.starts_with("Clorofila"));

    let underscore = store
        .list_summaries(&filter(None, Some("_")))
        .await
        .unwrap();
    assert!(underscore.is_empty());
}

#[tokio::test]
async fn quiz_is_written_with_all_questions_or_not_at_all() {
    let Some(store) = connect().await else { return };

    let subject = unique("Química");
    let quiz_id = create_quiz(&store, &subject, &["A", "B", "C"]).await;
    let questions = store.quiz_questions(quiz_id).await.unwrap();
    let keys: Vec<&str> = questions.iter().map(|q| q.answer_key.as_str()).collect();
    assert_eq!(keys, vec!["A", "B", "C"]);

    // answer_key is VARCHAR(10); the second question fails mid-transaction
    let broken_subject = unique("Física");
    let result = store
        .create_quiz(NewQuiz {
            title: unique("quiz"),
            subject: broken_subject.clone(),
            teacher_id: None,
            class_id: None,
            questions: vec![question("A"), question("KEY-TOO-LONG-FOR-COLUMN")],
        })
        .await;

    assert!(result.is_err());
    assert!(
        store
            .list_quizzes(Some(&broken_subject))
            .await
            .unwrap()
            .is_empty()
    );
}
