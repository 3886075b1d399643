pub mod artists;
pub mod drinks;
pub mod shows;
pub mod trivia;
pub mod venues;

use askama::Template;
use axum::{response::Html, routing::get, Router};
use std::sync::Arc;

use crate::error::PageError;
use crate::forms::FormError;
use crate::views::HomePage;

// Booking site
pub fn booking_routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .route("/", get(home))
        .merge(venues::routes())
        .merge(artists::routes())
        .merge(shows::routes())
}

pub fn trivia_routes() -> Router<Arc<crate::AppState>> {
    trivia::routes()
}

pub fn coffee_routes() -> Router<Arc<crate::AppState>> {
    drinks::routes()
}

async fn home() -> Result<Html<String>, PageError> {
    render(HomePage::with_flash(""))
}

fn render<T: Template>(page: T) -> Result<Html<String>, PageError> {
    Ok(Html(page.render()?))
}

/// Why a booking-site write did not go through.
#[derive(Debug, thiserror::Error)]
enum WriteError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
