// src/store/memory.rs

use async_trait::async_trait;
use sqlx::types::Json;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{
    quiz::{NewQuiz, Question, Quiz, QuizOverview},
    submission::{NewSubmission, Submission, SubmissionRecord},
    summary::{NewSummary, Summary, SummaryFilter},
    user::{NewUser, User},
};

/// Process-local store used when no database is configured, and by the tests.
///
/// All tables sit behind one lock, so every write is atomic with respect to
/// every read.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    summaries: Vec<Summary>,
    quizzes: Vec<Quiz>,
    questions: Vec<Question>,
    submissions: Vec<Submission>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn question_count(&self, quiz_id: i64) -> i64 {
        self.questions.iter().filter(|q| q.quiz_id == quiz_id).count() as i64
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email '{}'", user.email)));
        }

        let created = User {
            id: tables.next_id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            cpf: user.cpf,
            birthday: user.birthday,
            class_id: user.class_id,
            created_at: chrono::Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn create_summary(&self, summary: NewSummary) -> Result<Summary, StoreError> {
        let mut tables = self.tables.write().await;
        let created = Summary {
            id: tables.next_id(),
            title: summary.title,
            content: summary.content,
            subject: summary.subject,
            teacher_id: Some(summary.teacher_id),
            class_id: summary.class_id,
            created_at: chrono::Utc::now(),
        };
        tables.summaries.push(created.clone());
        Ok(created)
    }

    async fn find_summary(&self, id: i64) -> Result<Option<Summary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.summaries.iter().find(|s| s.id == id).cloned())
    }

    async fn list_summaries(&self, filter: &SummaryFilter) -> Result<Vec<Summary>, StoreError> {
        let tables = self.tables.read().await;
        let mut summaries: Vec<Summary> = tables
            .summaries
            .iter()
            .filter(|s| s.class_id == Some(filter.class_id))
            .filter(|s| filter.subject.as_ref().is_none_or(|subject| &s.subject == subject))
            .filter(|s| {
                filter.search.as_ref().is_none_or(|keyword| {
                    s.title
                        .as_deref()
                        .is_some_and(|title| contains_ignore_case(title, keyword))
                        || contains_ignore_case(&s.content, keyword)
                })
            })
            .cloned()
            .collect();

        // Ids grow with insertion order, so they break created_at ties.
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }

    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, StoreError> {
        let mut tables = self.tables.write().await;
        let now = chrono::Utc::now();
        let created = Quiz {
            id: tables.next_id(),
            title: quiz.title,
            subject: quiz.subject,
            teacher_id: quiz.teacher_id,
            class_id: quiz.class_id,
            created_at: now,
        };

        for question in quiz.questions {
            let id = tables.next_id();
            tables.questions.push(Question {
                id,
                quiz_id: created.id,
                prompt: question.prompt,
                alternatives: Json(question.alternatives),
                answer_key: question.answer_key,
                created_at: now,
            });
        }

        tables.quizzes.push(created.clone());
        Ok(created)
    }

    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn list_quizzes(&self, subject: Option<&str>) -> Result<Vec<QuizOverview>, StoreError> {
        let tables = self.tables.read().await;
        let mut quizzes: Vec<QuizOverview> = tables
            .quizzes
            .iter()
            .filter(|q| subject.is_none_or(|subject| q.subject == subject))
            .map(|q| QuizOverview {
                id: q.id,
                title: q.title.clone(),
                subject: q.subject.clone(),
                class_id: q.class_id,
                question_count: tables.question_count(q.id),
                created_at: q.created_at,
            })
            .collect();

        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(quizzes)
    }

    async fn quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>, StoreError> {
        let tables = self.tables.read().await;
        let mut questions: Vec<Question> = tables
            .questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.id);
        Ok(questions)
    }

    async fn has_submission(&self, user_id: i64, quiz_id: i64) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .iter()
            .any(|s| s.user_id == user_id && s.quiz_id == quiz_id))
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Option<Submission>, StoreError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .submissions
            .iter()
            .any(|s| s.user_id == submission.user_id && s.quiz_id == submission.quiz_id);
        if taken {
            return Ok(None);
        }

        let created = Submission {
            id: tables.next_id(),
            user_id: submission.user_id,
            quiz_id: submission.quiz_id,
            answers: Json(submission.answers),
            correct_count: submission.correct_count,
            grade: submission.grade,
            created_at: chrono::Utc::now(),
        };
        tables.submissions.push(created.clone());
        Ok(Some(created))
    }

    async fn list_submissions(&self, user_id: i64) -> Result<Vec<SubmissionRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut records = Vec::new();

        for submission in tables.submissions.iter().filter(|s| s.user_id == user_id) {
            let Some(quiz) = tables.quizzes.iter().find(|q| q.id == submission.quiz_id) else {
                continue;
            };
            records.push(SubmissionRecord {
                id: submission.id,
                quiz_id: quiz.id,
                quiz_title: quiz.title.clone(),
                subject: quiz.subject.clone(),
                answers: submission.answers.clone(),
                correct_count: submission.correct_count,
                grade: submission.grade,
                question_count: tables.question_count(quiz.id),
                created_at: submission.created_at,
            });
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::NewQuestion;

    fn new_quiz(subject: &str) -> NewQuiz {
        NewQuiz {
            title: "Frações".to_string(),
            subject: subject.to_string(),
            teacher_id: None,
            class_id: Some(1),
            questions: (0..3)
                .map(|i| NewQuestion {
                    prompt: format!("Q{}", i),
                    alternatives: vec!["x".to_string(), "y".to_string()],
                    answer_key: "A".to_string(),
                })
                .collect(),
        }
    }

    fn submission(user_id: i64, quiz_id: i64, grade: f64) -> NewSubmission {
        NewSubmission {
            user_id,
            quiz_id,
            answers: vec![Some("A".to_string())],
            correct_count: 1,
            grade,
        }
    }

    #[tokio::test]
    async fn second_submission_for_same_pair_is_refused() {
        let store = MemoryStore::new();
        let quiz = store.create_quiz(new_quiz("Math")).await.unwrap();

        let first = store.insert_submission(submission(1, quiz.id, 3.33)).await.unwrap();
        assert!(first.is_some());

        let second = store.insert_submission(submission(1, quiz.id, 10.0)).await.unwrap();
        assert!(second.is_none());

        let records = store.list_submissions(1).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].grade, 3.33);
        assert_eq!(records[0].question_count, 3);
    }

    #[tokio::test]
    async fn questions_keep_insertion_order() {
        let store = MemoryStore::new();
        let quiz = store.create_quiz(new_quiz("Math")).await.unwrap();
        let prompts: Vec<String> = store
            .quiz_questions(quiz.id)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.prompt)
            .collect();
        assert_eq!(prompts, vec!["Q0", "Q1", "Q2"]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let user = NewUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: crate::models::user::Role::Student,
            cpf: None,
            birthday: None,
            class_id: None,
        };
        store.create_user(user.clone()).await.unwrap();
        let err = store.create_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }
}
