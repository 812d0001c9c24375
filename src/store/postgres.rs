// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};

use super::{Store, StoreError};
use crate::models::{
    quiz::{NewQuiz, Question, Quiz, QuizOverview},
    submission::{NewSubmission, Submission, SubmissionRecord},
    summary::{NewSummary, Summary, SummaryFilter},
    user::{NewUser, Role, User},
};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, cpf, birthday, class_id, created_at";

const SUMMARY_COLUMNS: &str = "id, title, content, subject, teacher_id, class_id, created_at";

const QUIZ_COLUMNS: &str = "id, title, subject, teacher_id, class_id, created_at";

const QUESTION_COLUMNS: &str = "id, quiz_id, prompt, alternatives, answer_key, created_at";

const SUBMISSION_COLUMNS: &str =
    "id, user_id, quiz_id, answers, correct_count, grade, created_at";

/// Postgres-backed store. Owns a clone of the connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Substring pattern for `ILIKE` that matches `keyword` literally.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Raw 'users' row; `role` is stored as text.
#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    cpf: Option<String>,
    birthday: Option<chrono::NaiveDate>,
    class_id: Option<i64>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| {
            StoreError::Corrupt(format!("user {} has unknown role '{}'", row.id, row.role))
        })?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            cpf: row.cpf,
            birthday: row.birthday,
            class_id: row.class_id,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password_hash, role, cpf, birthday, class_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.cpf)
        .bind(user.birthday)
        .bind(user.class_id)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn create_summary(&self, summary: NewSummary) -> Result<Summary, StoreError> {
        let created = sqlx::query_as::<_, Summary>(&format!(
            "INSERT INTO summaries (title, content, subject, teacher_id, class_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SUMMARY_COLUMNS}"
        ))
        .bind(&summary.title)
        .bind(&summary.content)
        .bind(&summary.subject)
        .bind(summary.teacher_id)
        .bind(summary.class_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_summary(&self, id: i64) -> Result<Option<Summary>, StoreError> {
        let summary = sqlx::query_as::<_, Summary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM summaries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn list_summaries(&self, filter: &SummaryFilter) -> Result<Vec<Summary>, StoreError> {
        let search_pattern = filter.search.as_deref().map(like_pattern);

        let summaries = sqlx::query_as::<_, Summary>(&format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM summaries
             WHERE class_id = $1
               AND ($2::TEXT IS NULL OR subject = $2)
               AND ($3::TEXT IS NULL OR title ILIKE $3 ESCAPE '\\' OR content ILIKE $3 ESCAPE '\\')
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(filter.class_id)
        .bind(&filter.subject)
        .bind(search_pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, StoreError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Quiz>(&format!(
            "INSERT INTO quizzes (title, subject, teacher_id, class_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {QUIZ_COLUMNS}"
        ))
        .bind(&quiz.title)
        .bind(&quiz.subject)
        .bind(quiz.teacher_id)
        .bind(quiz.class_id)
        .fetch_one(&mut *tx)
        .await?;

        for question in &quiz.questions {
            sqlx::query(
                "INSERT INTO questions (quiz_id, prompt, alternatives, answer_key)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(created.id)
            .bind(&question.prompt)
            .bind(Json(&question.alternatives))
            .bind(&question.answer_key)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, StoreError> {
        let quiz =
            sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(quiz)
    }

    async fn list_quizzes(&self, subject: Option<&str>) -> Result<Vec<QuizOverview>, StoreError> {
        let quizzes = sqlx::query_as::<_, QuizOverview>(
            "SELECT q.id, q.title, q.subject, q.class_id,
                    COUNT(qs.id) AS question_count,
                    q.created_at
             FROM quizzes q
             LEFT JOIN questions qs ON qs.quiz_id = q.id
             WHERE ($1::TEXT IS NULL OR q.subject = $1)
             GROUP BY q.id
             ORDER BY q.created_at DESC, q.id DESC",
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    async fn quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>, StoreError> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY id ASC"
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn has_submission(&self, user_id: i64, quiz_id: i64) -> Result<bool, StoreError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM submissions WHERE user_id = $1 AND quiz_id = $2)",
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Option<Submission>, StoreError> {
        // The (user_id, quiz_id) unique constraint turns a concurrent duplicate into no row.
        let inserted = sqlx::query_as::<_, Submission>(&format!(
            "INSERT INTO submissions (user_id, quiz_id, answers, correct_count, grade)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, quiz_id) DO NOTHING
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(submission.user_id)
        .bind(submission.quiz_id)
        .bind(Json(&submission.answers))
        .bind(submission.correct_count)
        .bind(submission.grade)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn list_submissions(&self, user_id: i64) -> Result<Vec<SubmissionRecord>, StoreError> {
        let records = sqlx::query_as::<_, SubmissionRecord>(
            "SELECT s.id, s.quiz_id,
                    q.title AS quiz_title,
                    q.subject,
                    s.answers, s.correct_count, s.grade,
                    (SELECT COUNT(*) FROM questions qs WHERE qs.quiz_id = s.quiz_id) AS question_count,
                    s.created_at
             FROM submissions s
             JOIN quizzes q ON q.id = s.quiz_id
             WHERE s.user_id = $1
             ORDER BY s.created_at DESC, s.id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("clorofila"), "%clorofila%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\dir"), "%c:\\\\dir%");
    }
}
