use axum::{
    body::Bytes,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{render, WriteError};
use crate::database::Database;
use crate::error::{PageError, PagePath};
use crate::forms::{FormFields, VenueForm};
use crate::models::show::{ShowFilter, ShowTimeline};
use crate::models::{ShowListing, Venue};
use crate::views::{HomePage, ProfileFormPage, SearchPage, VenueDetailPage, VenuesPage};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", post(search_venues))
        .route("/venues/create", get(create_venue_form).post(create_venue_submission))
        .route("/venues/{id}", get(show_venue).delete(delete_venue))
        .route("/venues/{id}/edit", get(edit_venue_form).post(edit_venue_submission))
}

async fn list_venues(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let areas = Venue::areas(&state.db, Utc::now().naive_utc()).await?;
    render(VenuesPage { areas })
}

async fn search_venues(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, PageError> {
    let search_term = FormFields::parse(&body)
        .ok()
        .and_then(|f| f.get("search_term"))
        .unwrap_or_default();
    let venues = Venue::search(&state.db, &search_term).await?;
    render(SearchPage::venues(search_term, venues))
}

async fn show_venue(
    State(state): State<Arc<AppState>>,
    PagePath(id): PagePath<i64>,
) -> Result<Html<String>, PageError> {
    let venue = Venue::find(&state.db, id).await?.ok_or(PageError::NotFound)?;
    let shows = ShowListing::all(&state.db, ShowFilter::Venue(id)).await?;
    let timeline = ShowTimeline::split(shows, Utc::now().naive_utc());
    render(VenueDetailPage::new(venue, timeline))
}

async fn create_venue_form() -> Result<Html<String>, PageError> {
    render(ProfileFormPage::venue("List a new venue", "/venues/create", &VenueForm::default()))
}

async fn create_venue_submission(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, PageError> {
    let fields = FormFields::parse(&body).unwrap_or_default();
    let name = fields.get("name").unwrap_or_default();

    let flash = match insert_venue(&state.db, &fields).await {
        Ok(id) => {
            info!("Venue {} listed as {}", name, id);
            format!("Venue {} was successfully listed!", name)
        }
        Err(e) => {
            warn!("Venue {} could not be listed: {}", name, e);
            format!("An error occurred. Venue {} could not be listed.", name)
        }
    };

    render(HomePage::with_flash(flash))
}

async fn insert_venue(db: &Database, fields: &FormFields) -> Result<i64, WriteError> {
    let form = VenueForm::from_fields(fields)?;

    let mut tx = db.pool.begin().await?;
    match Venue::insert(&mut *tx, &form).await {
        Ok(id) => {
            tx.commit().await?;
            Ok(id)
        }
        Err(e) => {
            tx.rollback().await?;
            Err(e.into())
        }
    }
}

async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    PagePath(id): PagePath<i64>,
) -> Result<Html<String>, PageError> {
    let venue = Venue::find(&state.db, id).await?.ok_or(PageError::NotFound)?;
    let title = format!("Edit venue {}", venue.name);
    render(ProfileFormPage::venue(title, format!("/venues/{}/edit", id), &venue.to_form()))
}

async fn edit_venue_submission(
    State(state): State<Arc<AppState>>,
    PagePath(id): PagePath<i64>,
    body: Bytes,
) -> Result<Redirect, PageError> {
    let fields = FormFields::parse(&body).unwrap_or_default();

    match update_venue(&state.db, id, &fields).await {
        Ok(true) => info!("Venue {} updated", id),
        Ok(false) => return Err(PageError::NotFound),
        Err(e) => warn!("Venue {} could not be updated: {}", id, e),
    }

    Ok(Redirect::to(&format!("/venues/{}", id)))
}

async fn update_venue(db: &Database, id: i64, fields: &FormFields) -> Result<bool, WriteError> {
    let form = VenueForm::from_fields(fields)?;

    let mut tx = db.pool.begin().await?;
    match Venue::update(&mut *tx, id, &form).await {
        Ok(updated) => {
            tx.commit().await?;
            Ok(updated)
        }
        Err(e) => {
            tx.rollback().await?;
            Err(e.into())
        }
    }
}

async fn delete_venue(
    State(state): State<Arc<AppState>>,
    PagePath(id): PagePath<i64>,
) -> Result<Response, PageError> {
    let mut tx = state.db.pool.begin().await?;
    let deleted = match Venue::delete(&mut *tx, id).await {
        Ok(deleted) => deleted,
        Err(e) => {
            error!("Venue {} could not be deleted: {:?}", id, e);
            tx.rollback().await?;
            return Err(e.into());
        }
    };
    tx.commit().await?;

    if !deleted {
        return Err(PageError::NotFound);
    }
    info!("Venue {} deleted", id);
    Ok(Redirect::to("/").into_response())
}

