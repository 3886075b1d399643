use axum::{
    body::Bytes,
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::{render, WriteError};
use crate::database::Database;
use crate::error::{PageError, PagePath};
use crate::forms::{ArtistForm, FormFields};
use crate::models::show::{ShowFilter, ShowTimeline};
use crate::models::{Artist, ShowListing};
use crate::views::{ArtistDetailPage, ArtistsPage, HomePage, ProfileFormPage, SearchPage};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/artists", get(list_artists))
        .route("/artists/search", post(search_artists))
        .route("/artists/create", get(create_artist_form).post(create_artist_submission))
        .route("/artists/{id}", get(show_artist))
        .route("/artists/{id}/edit", get(edit_artist_form).post(edit_artist_submission))
}

async fn list_artists(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let artists = Artist::all(&state.db).await?;
    render(ArtistsPage::new(artists))
}

async fn search_artists(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, PageError> {
    let search_term = FormFields::parse(&body)
        .ok()
        .and_then(|f| f.get("search_term"))
        .unwrap_or_default();
    let artists = Artist::search(&state.db, &search_term).await?;
    render(SearchPage::artists(search_term, artists))
}

async fn show_artist(
    State(state): State<Arc<AppState>>,
    PagePath(id): PagePath<i64>,
) -> Result<Html<String>, PageError> {
    let artist = Artist::find(&state.db, id).await?.ok_or(PageError::NotFound)?;
    let shows = ShowListing::all(&state.db, ShowFilter::Artist(id)).await?;
    let timeline = ShowTimeline::split(shows, Utc::now().naive_utc());
    render(ArtistDetailPage::new(artist, timeline))
}

async fn create_artist_form() -> Result<Html<String>, PageError> {
    render(ProfileFormPage::artist("List a new artist", "/artists/create", &ArtistForm::default()))
}

async fn create_artist_submission(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, PageError> {
    let fields = FormFields::parse(&body).unwrap_or_default();
    let name = fields.get("name").unwrap_or_default();

    let flash = match insert_artist(&state.db, &fields).await {
        Ok(id) => {
            info!("Artist {} listed as {}", name, id);
            format!("Artist {} was successfully listed!", name)
        }
        Err(e) => {
            warn!("Artist {} could not be listed: {}", name, e);
            format!("An error occurred. Artist {} could not be listed.", name)
        }
    };

    render(HomePage::with_flash(flash))
}

async fn insert_artist(db: &Database, fields: &FormFields) -> Result<i64, WriteError> {
    let form = ArtistForm::from_fields(fields)?;

    let mut tx = db.pool.begin().await?;
    match Artist::insert(&mut *tx, &form).await {
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

async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    PagePath(id): PagePath<i64>,
) -> Result<Html<String>, PageError> {
    let artist = Artist::find(&state.db, id).await?.ok_or(PageError::NotFound)?;
    let title = format!("Edit artist {}", artist.name);
    render(ProfileFormPage::artist(title, format!("/artists/{}/edit", id), &artist.to_form()))
}

async fn edit_artist_submission(
    State(state): State<Arc<AppState>>,
    PagePath(id): PagePath<i64>,
    body: Bytes,
) -> Result<Redirect, PageError> {
    let fields = FormFields::parse(&body).unwrap_or_default();

    match update_artist(&state.db, id, &fields).await {
        Ok(true) => info!("Artist {} updated", id),
        Ok(false) => return Err(PageError::NotFound),
        Err(e) => warn!("Artist {} could not be updated: {}", id, e),
    }

    Ok(Redirect::to(&format!("/artists/{}", id)))
}

async fn update_artist(db: &Database, id: i64, fields: &FormFields) -> Result<bool, WriteError> {
    let form = ArtistForm::from_fields(fields)?;

    let mut tx = db.pool.begin().await?;
    match Artist::update(&mut *tx, id, &form).await {
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
