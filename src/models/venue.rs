use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, PgConnection};
use std::collections::BTreeMap;

use crate::database::Database;
use crate::forms::VenueForm;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct VenueAreaRow {
    id: i64,
    name: String,
    city: Option<String>,
    state: Option<String>,
    num_upcoming_shows: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Venues sharing one city/state pair.
#[derive(Debug, Clone, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, facebook_link, \
                             website, genres, seeking_talent, seeking_description";

impl Venue {
    pub async fn find(db: &Database, id: i64) -> Result<Option<Venue>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(&format!("SELECT {} FROM venues WHERE id = $1", VENUE_COLUMNS))
            .bind(id)
            .fetch_optional(&db.pool)
            .await
    }

    /// Case-insensitive substring search on the name.
    pub async fn search(db: &Database, term: &str) -> Result<Vec<Venue>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(&format!(
            r"SELECT {} FROM venues WHERE name ILIKE $1 ESCAPE '\' ORDER BY name, id",
            VENUE_COLUMNS
        ))
        .bind(super::like_pattern(term))
        .fetch_all(&db.pool)
        .await
    }

    pub async fn areas(db: &Database, now: NaiveDateTime) -> Result<Vec<VenueArea>, sqlx::Error> {
        let rows = sqlx::query_as::<_, VenueAreaRow>(
            r#"
            SELECT v.id, v.name, v.city, v.state,
                   COUNT(s.id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM venues v
            LEFT JOIN shows s ON s.venue_id = v.id
            GROUP BY v.id
            ORDER BY v.state, v.city, v.name, v.id
            "#,
        )
        .bind(now)
        .fetch_all(&db.pool)
        .await?;

        Ok(group_by_area(rows))
    }

    pub async fn insert(conn: &mut PgConnection, form: &VenueForm) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO venues (name, city, state, address, phone, image_link, facebook_link,
                                website, genres, seeking_talent, seeking_description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&form.name)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.address)
        .bind(&form.phone)
        .bind(&form.image_link)
        .bind(&form.facebook_link)
        .bind(&form.website)
        .bind(&form.genres)
        .bind(form.seeking_talent)
        .bind(&form.seeking_description)
        .fetch_one(conn)
        .await
    }

    /// Returns false when no venue has this id.
    pub async fn update(conn: &mut PgConnection, id: i64, form: &VenueForm) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE venues
            SET name = $2, city = $3, state = $4, address = $5, phone = $6, image_link = $7,
                facebook_link = $8, website = $9, genres = $10, seeking_talent = $11,
                seeking_description = $12
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&form.name)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.address)
        .bind(&form.phone)
        .bind(&form.image_link)
        .bind(&form.facebook_link)
        .bind(&form.website)
        .bind(&form.genres)
        .bind(form.seeking_talent)
        .bind(&form.seeking_description)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // Shows go with it (ON DELETE CASCADE)
    pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub fn to_form(&self) -> VenueForm {
        VenueForm {
            name: self.name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            image_link: self.image_link.clone(),
            facebook_link: self.facebook_link.clone(),
            website: self.website.clone(),
            genres: self.genres.clone(),
            seeking_talent: self.seeking_talent,
            seeking_description: self.seeking_description.clone(),
        }
    }
}

// Areas come out ordered by state, then city
fn group_by_area(rows: Vec<VenueAreaRow>) -> Vec<VenueArea> {
    let mut areas: BTreeMap<(String, String), Vec<VenueSummary>> = BTreeMap::new();
    for row in rows {
        let key = (row.state.unwrap_or_default(), row.city.unwrap_or_default());
        areas.entry(key).or_default().push(VenueSummary {
            id: row.id,
            name: row.name,
            num_upcoming_shows: row.num_upcoming_shows,
        });
    }

    areas
        .into_iter()
        .map(|((state, city), venues)| VenueArea { city, state, venues })
        .collect()
}
