use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::{ApiError, ApiPath, ApiResult, JsonBody};
use crate::middleware::{Authorized, DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks};
use crate::models::drink::{checked_recipe, DrinkPatch, NewDrink};
use crate::models::Drink;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(greeting))
        .route("/drinks", get(list_drinks).post(create_drink))
        .route("/drinks-detail", get(list_drinks_detail))
        .route("/drinks/{id}", patch(update_drink).delete(delete_drink))
        .route("/reset-db", get(reset_drinks))
}

async fn greeting() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Welcome to the coffee shop",
    }))
}

// Public menu: colours and proportions only
async fn list_drinks(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let drinks = Drink::all(&state.db).await?;
    if drinks.is_empty() {
        return Err(ApiError::NotFound);
    }

    let drinks: Vec<_> = drinks.iter().map(Drink::short).collect();
    Ok(Json(json!({
        "success": true,
        "drinks": drinks,
    })))
}

async fn list_drinks_detail(
    State(state): State<Arc<AppState>>,
    _caller: Authorized<GetDrinksDetail>,
) -> ApiResult<impl IntoResponse> {
    let drinks = Drink::all(&state.db).await?;
    if drinks.is_empty() {
        return Err(ApiError::NotFound);
    }

    let drinks: Vec<_> = drinks.iter().map(Drink::long).collect();
    Ok(Json(json!({
        "success": true,
        "drinks": drinks,
    })))
}

async fn create_drink(
    State(state): State<Arc<AppState>>,
    _caller: Authorized<PostDrinks>,
    JsonBody(body): JsonBody<NewDrink>,
) -> ApiResult<impl IntoResponse> {
    body.validate().map_err(|e| {
        debug!("drink rejected: {}", e);
        ApiError::BadRequest
    })?;

    let (Some(title), Some(recipe)) = (body.title, body.recipe) else {
        return Err(ApiError::BadRequest);
    };
    let recipe = checked_recipe(recipe).map_err(|e| {
        debug!("recipe rejected: {}", e);
        ApiError::BadRequest
    })?;

    let drink = Drink::insert(&state.db, &title, &recipe).await?;
    info!("Drink {} created as {}", drink.title, drink.id);

    Ok(Json(json!({
        "success": true,
        "drinks": [drink.long()],
    })))
}

async fn update_drink(
    State(state): State<Arc<AppState>>,
    _caller: Authorized<PatchDrinks>,
    ApiPath(id): ApiPath<i64>,
    JsonBody(body): JsonBody<DrinkPatch>,
) -> ApiResult<impl IntoResponse> {
    body.validate().map_err(|e| {
        debug!("drink patch rejected: {}", e);
        ApiError::BadRequest
    })?;

    let recipe = body
        .recipe
        .map(checked_recipe)
        .transpose()
        .map_err(|e| {
            debug!("recipe rejected: {}", e);
            ApiError::BadRequest
        })?;

    let drink = Drink::update(&state.db, id, body.title.as_deref(), recipe.as_deref())
        .await?
        .ok_or(ApiError::NotFound)?;
    info!("Drink {} updated", drink.id);

    Ok(Json(json!({
        "success": true,
        "drinks": [drink.long()],
    })))
}

async fn delete_drink(
    State(state): State<Arc<AppState>>,
    _caller: Authorized<DeleteDrinks>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    if !Drink::delete(&state.db, id).await? {
        return Err(ApiError::NotFound);
    }
    info!("Drink {} deleted", id);

    Ok(Json(json!({
        "success": true,
        "delete": id,
    })))
}

async fn reset_drinks(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    if !state.config.features.enable_db_reset {
        return Err(ApiError::NotFound);
    }

    let water = Drink::reset(&state.db).await?;
    warn!("Drinks table reset");

    Ok(Json(json!({
        "success": true,
        "drinks": [water.long()],
    })))
}
