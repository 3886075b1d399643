use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, PgConnection};

use crate::database::Database;
use crate::forms::ShowForm;

pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Show {
    pub id: i64,
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

/// A show joined with the names and images of both sides.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl ShowListing {
    pub fn formatted_start_time(&self) -> String {
        self.start_time.format(START_TIME_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ShowFilter {
    All,
    Venue(i64),
    Artist(i64),
}

/// Shows split around a point in time.
#[derive(Debug, Default)]
pub struct ShowTimeline {
    pub past: Vec<ShowListing>,
    pub upcoming: Vec<ShowListing>,
}

impl ShowTimeline {
    /// A show strictly after `now` is upcoming; everything else is past.
    pub fn split(shows: Vec<ShowListing>, now: NaiveDateTime) -> Self {
        let (upcoming, past) = shows.into_iter().partition(|s| s.start_time > now);
        ShowTimeline { past, upcoming }
    }
}

impl Show {
    pub async fn insert(conn: &mut PgConnection, form: &ShowForm) -> Result<Show, sqlx::Error> {
        sqlx::query_as::<_, Show>(
            r#"
            INSERT INTO shows (artist_id, venue_id, start_time)
            VALUES ($1, $2, $3)
            RETURNING id, artist_id, venue_id, start_time
            "#,
        )
        .bind(form.artist_id)
        .bind(form.venue_id)
        .bind(form.start_time)
        .fetch_one(conn)
        .await
    }
}

impl ShowListing {
    pub async fn all(db: &Database, filter: ShowFilter) -> Result<Vec<ShowListing>, sqlx::Error> {
        let base = r#"
            SELECT s.id, v.id AS venue_id, v.name AS venue_name, v.image_link AS venue_image_link,
                   a.id AS artist_id, a.name AS artist_name, a.image_link AS artist_image_link,
                   s.start_time
            FROM shows s
            JOIN venues v ON v.id = s.venue_id
            JOIN artists a ON a.id = s.artist_id
        "#;

        let (clause, id) = match filter {
            ShowFilter::All => ("", None),
            ShowFilter::Venue(id) => ("WHERE s.venue_id = $1", Some(id)),
            ShowFilter::Artist(id) => ("WHERE s.artist_id = $1", Some(id)),
        };
        let sql = format!("{} {} ORDER BY s.start_time, s.id", base, clause);

        let mut query = sqlx::query_as::<_, ShowListing>(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }

        query.fetch_all(&db.pool).await
    }
}
