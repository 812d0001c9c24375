// tests/summary_tests.rs

mod common;

use common::spawn_app;
use serde_json::{Value, json};

#[tokio::test]
async fn test_summary_class_flow() {
    // Arrange
    let app = spawn_app().await;
    let teacher = app.token_for("professor", None).await;
    let student_a = app.token_for("aluno", Some(1)).await;
    let student_b = app.token_for("aluno", Some(2)).await;

    // 1. Teacher publishes two summaries for class 1
    let response = app
        .post(
            "/summaries",
            &teacher,
            &json!({
                "titulo": "Fotossíntese",
                "conteudo": "<p>Clorofila absorve luz</p><script>alert(1)</script>",
                "materia": "Biologia",
                "turma_id": 1
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    let summary_id = created["id"].as_i64().unwrap();
    assert_eq!(created["conteudo"], "<p>Clorofila absorve luz</p>");

    let response = app
        .post(
            "/summaries",
            &teacher,
            &json!({
                "titulo": "Revolução Francesa",
                "conteudo": "1789",
                "materia": "História",
                "turma_id": 1
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);

    // 2. Student of class 1 sees both, newest first
    let all: Vec<Value> = app.get("/summaries", &student_a).await.json().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["titulo"], "Revolução Francesa");

    // 3. Filters
    let biology: Vec<Value> = app
        .get("/summaries?materia=Biologia", &student_a)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(biology.len(), 1);

    let everything: Vec<Value> = app
        .get("/summaries?materia=Todas", &student_a)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(everything.len(), 2);

    let searched: Vec<Value> = app
        .get("/summaries?busca=clorofila", &student_a)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0]["id"], summary_id);

    // 4. Student of class 2 sees nothing and cannot open class 1 material
    let other: Vec<Value> = app.get("/summaries", &student_b).await.json().await.unwrap();
    assert!(other.is_empty());

    let forbidden = app
        .get(&format!("/summaries/{}", summary_id), &student_b)
        .await;
    assert_eq!(forbidden.status().as_u16(), 403);

    let allowed = app
        .get(&format!("/summaries/{}", summary_id), &student_a)
        .await;
    assert_eq!(allowed.status().as_u16(), 200);
}

#[tokio::test]
async fn students_cannot_publish() {
    let app = spawn_app().await;
    let student = app.token_for("aluno", Some(1)).await;

    let response = app
        .post(
            "/summaries",
            &student,
            &json!({ "conteudo": "cola", "materia": "Matemática", "turma_id": 1 }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn listing_requires_a_class() {
    let app = spawn_app().await;
    let student = app.token_for("aluno", None).await;

    let response = app.get("/summaries", &student).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn missing_summary_is_404() {
    let app = spawn_app().await;
    let student = app.token_for("aluno", Some(1)).await;

    let response = app.get("/summaries/987654", &student).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn classless_summary_is_readable_by_classless_students_only() {
    let app = spawn_app().await;
    let teacher = app.token_for("professor", None).await;
    let without_class = app.token_for("aluno", None).await;
    let with_class = app.token_for("aluno", Some(1)).await;

    let created: Value = app
        .post(
            "/summaries",
            &teacher,
            &json!({ "conteudo": "Tabela periódica", "materia": "Química" }),
        )
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/summaries/{}", created["id"]);

    let response = app.get(&path, &without_class).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get(&path, &with_class).await;
    assert_eq!(response.status().as_u16(), 403);
}
