use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::error::{ApiError, ApiPath, ApiResult, JsonBody};
use crate::models::question::lenient_int;
use crate::models::{Category, NewQuestion, Question};
use crate::AppState;

pub const QUESTIONS_PER_PAGE: i64 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/questions", get(list_questions).post(create_question))
        .route("/api/questions/search", post(search_questions))
        .route("/api/questions/{id}", delete(delete_question))
        .route("/api/categories", get(list_categories))
        .route("/api/categories/{id}/questions", get(questions_by_category))
        .route("/api/quizzes", post(next_quiz_question))
}

/// Row offset of a 1-based `page`, or `None` when the page holds nothing.
pub fn page_offset(page: i64, total: i64) -> Option<i64> {
    if page < 1 {
        return None;
    }
    let offset = (page - 1).checked_mul(QUESTIONS_PER_PAGE)?;
    (offset < total).then_some(offset)
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = match params.page.as_deref().map(str::trim) {
        None | Some("") => 1,
        Some(raw) => raw.parse::<i64>().map_err(|_| ApiError::BadRequest)?,
    };

    let total = Question::count(&state.db).await?;
    let offset = page_offset(page, total).ok_or_else(|| {
        debug!("page {} out of range for {} questions", page, total);
        ApiError::NotFound
    })?;

    let questions = Question::page(&state.db, QUESTIONS_PER_PAGE, offset).await?;
    let categories = Category::all(&state.db).await?;

    Ok(Json(json!({
        "success": true,
        "questions": questions,
        "total_questions": total,
        "current_category": "",
        "categories": categories,
        "page": page,
    })))
}

async fn create_question(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<NewQuestion>,
) -> ApiResult<impl IntoResponse> {
    body.validate().map_err(|e| {
        debug!("question rejected: {}", e);
        ApiError::BadRequest
    })?;

    let (Some(question), Some(answer), Some(difficulty), Some(category)) =
        (body.question, body.answer, body.difficulty, body.category)
    else {
        return Err(ApiError::BadRequest);
    };
    let difficulty = i32::try_from(difficulty).map_err(|_| ApiError::BadRequest)?;

    let question = Question::insert(&state.db, &question, &answer, category, difficulty).await?;
    info!("Question {} created in category {}", question.id, question.category);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "question": question,
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(alias = "searchTerm")]
    search: Option<String>,
}

async fn search_questions(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<SearchRequest>,
) -> ApiResult<impl IntoResponse> {
    let term = body.search.ok_or(ApiError::BadRequest)?;

    let questions = Question::search(&state.db, &term).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({
        "success": true,
        "total_questions": questions.len(),
        "questions": questions,
        "current_category": "",
    })))
}

async fn delete_question(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    if !Question::delete(&state.db, id).await? {
        return Err(ApiError::NotFound);
    }
    info!("Question {} deleted", id);

    Ok(Json(json!({
        "success": true,
        "action": "delete",
        "id": id,
    })))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let categories = Category::all(&state.db).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({
        "success": true,
        "total_categories": categories.len(),
        "categories": categories,
    })))
}

async fn questions_by_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let category = Category::find(&state.db, id).await?.ok_or(ApiError::NotFound)?;
    let questions = Question::by_category(&state.db, id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({
        "success": true,
        "total_questions": questions.len(),
        "questions": questions,
        "current_category": category.id,
    })))
}

#[derive(Debug, Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "lenient_int")]
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct QuizRequest {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

async fn next_quiz_question(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<QuizRequest>,
) -> ApiResult<impl IntoResponse> {
    // 0 stands for "all categories"
    let category = body.quiz_category.id.ok_or(ApiError::BadRequest)?;

    let question = Question::random_excluding(&state.db, category, &body.previous_questions)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({
        "success": true,
        "question": question,
    })))
}
