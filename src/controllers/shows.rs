use axum::{body::Bytes, extract::State, response::Html, routing::get, Router};
use std::sync::Arc;
use tracing::{info, warn};

use super::{render, WriteError};
use crate::database::Database;
use crate::error::PageError;
use crate::forms::{FormFields, ShowForm};
use crate::models::show::ShowFilter;
use crate::models::{Show, ShowListing};
use crate::views::{HomePage, ShowFormPage, ShowsPage};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", get(list_shows))
        .route("/shows/create", get(create_show_form).post(create_show_submission))
}

async fn list_shows(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let shows = ShowListing::all(&state.db, ShowFilter::All).await?;
    render(ShowsPage::new(shows))
}

async fn create_show_form() -> Result<Html<String>, PageError> {
    render(ShowFormPage::default())
}

async fn create_show_submission(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, PageError> {
    let fields = FormFields::parse(&body).unwrap_or_default();

    let flash = match insert_show(&state.db, &fields).await {
        Ok(show) => {
            info!(
                "Show {} listed: artist {} at venue {} on {}",
                show.id, show.artist_id, show.venue_id, show.start_time
            );
            "Show was successfully listed!"
        }
        Err(e) => {
            warn!("Show could not be listed: {}", e);
            "An error occurred. Show could not be listed."
        }
    };

    render(HomePage::with_flash(flash))
}

async fn insert_show(db: &Database, fields: &FormFields) -> Result<Show, WriteError> {
    let form = ShowForm::from_fields(fields)?;

    let mut tx = db.pool.begin().await?;
    match Show::insert(&mut *tx, &form).await {
        Ok(show) => {
            tx.commit().await?;
            Ok(show)
        }
        Err(e) => {
            tx.rollback().await?;
            Err(e.into())
        }
    }
}
