mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;

use campus_services::database::Database;
use campus_services::models::Question;
use common::*;

// 16 questions over 6 categories
const SEEDED_QUESTIONS: i64 = 16;

fn trivia(pool: PgPool) -> axum::Router {
    router_on(pool, &[("SERVICE", "trivia")])
}

fn search(term: &str) -> axum::http::Request<axum::body::Body> {
    json_request("POST", "/api/questions/search", &json!({ "searchTerm": term }).to_string())
}

async fn all_ids(pool: &PgPool) -> Vec<i64> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM questions ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}

async fn quiz(pool: &PgPool, previous: &[i64], category: i64) -> (StatusCode, Value) {
    let body = json!({
        "previous_questions": previous,
        "quiz_category": {"type": "click", "id": category},
    });
    let request = json_request("POST", "/api/quizzes", &body.to_string());
    let response = send(trivia(pool.clone()), request).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn pages_hold_ten_questions_until_the_end(pool: PgPool) {
    let response = send(trivia(pool.clone()), get("/api/questions")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_questions"], SEEDED_QUESTIONS);
    assert_eq!(body["questions"].as_array().unwrap().len(), 10);
    assert_eq!(body["categories"].as_array().unwrap().len(), 6);
    assert_eq!(body["page"], 1);

    let response = send(trivia(pool.clone()), get("/api/questions?page=2")).await;
    let body = body_json(response).await;
    assert_eq!(body["questions"].as_array().unwrap().len(), 6);

    let response = send(trivia(pool), get("/api/questions?page=3")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({"success": false, "error": 404, "message": "Not Found"})
    );
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn created_question_is_echoed_back(pool: PgPool) {
    let body = r#"{"question":"Boiling point of water in Celsius?","answer":"100","difficulty":"1","category":1}"#;
    let response = send(trivia(pool.clone()), json_request("POST", "/api/questions", body)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["question"]["answer"], "100");
    assert_eq!(created["question"]["difficulty"], 1);
    assert_eq!(created["question"]["category"], 1);

    let id = created["question"]["id"].as_i64().unwrap();
    assert!(all_ids(&pool).await.contains(&id));
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn question_in_unknown_category_is_unprocessable(pool: PgPool) {
    let body = r#"{"question":"Orphan?","answer":"Yes","difficulty":1,"category":999}"#;
    let response = send(trivia(pool.clone()), json_request("POST", "/api/questions", body)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(all_ids(&pool).await.len() as i64, SEEDED_QUESTIONS);
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn deleted_question_is_gone(pool: PgPool) {
    let id = all_ids(&pool).await[0];
    let uri = format!("/api/questions/{}", id);

    let response = send(trivia(pool.clone()), json_request("DELETE", &uri, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "action": "delete", "id": id})
    );
    assert!(!all_ids(&pool).await.contains(&id));

    let response = send(trivia(pool), json_request("DELETE", &uri, "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn search_is_case_insensitive(pool: PgPool) {
    let response = send(trivia(pool), search("TITLE")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_questions"], 1);
    assert_eq!(body["questions"][0]["answer"], "Maya Angelou");
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn search_without_matches_is_not_found(pool: PgPool) {
    let response = send(trivia(pool), search("xylophone")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], 404);
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn search_wildcards_match_literally(pool: PgPool) {
    let db = Database { pool: pool.clone() };
    Question::insert(&db, "What is 100% of 7?", "7", 1, 1).await.unwrap();

    // Unescaped, "%" would match every question
    let response = send(trivia(pool.clone()), search("%")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_questions"], 1);
    assert_eq!(body["questions"][0]["question"], "What is 100% of 7?");

    let response = send(trivia(pool), search("_")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn category_listing_reports_the_category_id(pool: PgPool) {
    let response = send(trivia(pool.clone()), get("/api/categories")).await;
    let body = body_json(response).await;
    assert_eq!(body["total_categories"], 6);
    assert_eq!(body["categories"][0], json!({"id": 1, "type": "Science"}));

    let response = send(trivia(pool.clone()), get("/api/categories/3/questions")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["current_category"], 3);
    assert_eq!(body["total_questions"], 3);
    assert!(body["questions"].as_array().unwrap().iter().all(|q| q["category"] == 3));

    let response = send(trivia(pool), get("/api/categories/42/questions")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn quiz_only_offers_the_question_left(pool: PgPool) {
    let ids = all_ids(&pool).await;
    let (last, previous) = ids.split_last().unwrap();

    for _ in 0..5 {
        let (status, body) = quiz(&pool, previous, 0).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"]["id"], *last);
    }
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn quiz_never_repeats_within_a_category(pool: PgPool) {
    let db = Database { pool: pool.clone() };
    let science: Vec<i64> =
        Question::by_category(&db, 1).await.unwrap().iter().map(|q| q.id).collect();

    let mut asked = Vec::new();
    for _ in 0..science.len() {
        let (status, body) = quiz(&pool, &asked, 1).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["question"]["id"].as_i64().unwrap();
        assert!(science.contains(&id));
        assert!(!asked.contains(&id));
        asked.push(id);
    }

    let (status, _) = quiz(&pool, &asked, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn exhausted_quiz_is_not_found(pool: PgPool) {
    let ids = all_ids(&pool).await;
    let (status, body) = quiz(&pool, &ids, 0).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[sqlx::test(migrations = "src/migrations/trivia")]
async fn random_pick_skips_excluded_ids(pool: PgPool) {
    let db = Database { pool: pool.clone() };
    let ids = all_ids(&pool).await;
    let excluded = &ids[..ids.len() / 2];

    for _ in 0..20 {
        let question = Question::random_excluding(&db, 0, excluded).await.unwrap().unwrap();
        assert!(!excluded.contains(&question.id));
    }

    assert!(Question::random_excluding(&db, 0, &ids).await.unwrap().is_none());
    assert!(Question::random_excluding(&db, 42, &[]).await.unwrap().is_none());
}
