use serde::Serialize;
use sqlx::{FromRow, PgConnection};

use crate::database::Database;
use crate::forms::ArtistForm;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, image_link, facebook_link, \
                              website, seeking_venue, seeking_description";

impl Artist {
    pub async fn all(db: &Database) -> Result<Vec<Artist>, sqlx::Error> {
        sqlx::query_as::<_, Artist>(&format!("SELECT {} FROM artists ORDER BY name, id", ARTIST_COLUMNS))
            .fetch_all(&db.pool)
            .await
    }

    pub async fn find(db: &Database, id: i64) -> Result<Option<Artist>, sqlx::Error> {
        sqlx::query_as::<_, Artist>(&format!("SELECT {} FROM artists WHERE id = $1", ARTIST_COLUMNS))
            .bind(id)
            .fetch_optional(&db.pool)
            .await
    }

    pub async fn search(db: &Database, term: &str) -> Result<Vec<Artist>, sqlx::Error> {
        sqlx::query_as::<_, Artist>(&format!(
            r"SELECT {} FROM artists WHERE name ILIKE $1 ESCAPE '\' ORDER BY name, id",
            ARTIST_COLUMNS
        ))
        .bind(super::like_pattern(term))
        .fetch_all(&db.pool)
        .await
    }

    pub async fn insert(conn: &mut PgConnection, form: &ArtistForm) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO artists (name, city, state, phone, genres, image_link, facebook_link,
                                 website, seeking_venue, seeking_description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&form.name)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.phone)
        .bind(&form.genres)
        .bind(&form.image_link)
        .bind(&form.facebook_link)
        .bind(&form.website)
        .bind(form.seeking_venue)
        .bind(&form.seeking_description)
        .fetch_one(conn)
        .await
    }

    pub async fn update(conn: &mut PgConnection, id: i64, form: &ArtistForm) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE artists
            SET name = $2, city = $3, state = $4, phone = $5, genres = $6, image_link = $7,
                facebook_link = $8, website = $9, seeking_venue = $10, seeking_description = $11
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&form.name)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.phone)
        .bind(&form.genres)
        .bind(&form.image_link)
        .bind(&form.facebook_link)
        .bind(&form.website)
        .bind(form.seeking_venue)
        .bind(&form.seeking_description)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub fn to_form(&self) -> ArtistForm {
        ArtistForm {
            name: self.name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            phone: self.phone.clone(),
            genres: self.genres.clone(),
            image_link: self.image_link.clone(),
            facebook_link: self.facebook_link.clone(),
            website: self.website.clone(),
            seeking_venue: self.seeking_venue,
            seeking_description: self.seeking_description.clone(),
        }
    }
}
