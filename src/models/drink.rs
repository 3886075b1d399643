use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use validator::Validate;

use crate::database::Database;

/// One coloured layer of a drink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct Ingredient {
    #[validate(length(min = 1))]
    pub color: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub parts: serde_json::Number,
}

#[derive(Debug, Clone, FromRow)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Json<Vec<Ingredient>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: serde_json::Number,
}

/// Public view: colours and proportions only.
#[derive(Debug, Clone, Serialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// A recipe is posted either as one ingredient or as a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(list) => list,
            RecipeInput::One(single) => vec![single],
        }
    }
}

/// Body of `POST /drinks`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewDrink {
    #[validate(required, length(min = 1, max = 80))]
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

/// Body of `PATCH /drinks/{id}`; absent fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DrinkPatch {
    #[validate(length(min = 1, max = 80))]
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

/// Checks a posted recipe: at least one layer, each with a colour and a name.
pub fn checked_recipe(recipe: RecipeInput) -> Result<Vec<Ingredient>, validator::ValidationErrors> {
    let ingredients = recipe.into_vec();
    if ingredients.is_empty() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("recipe", validator::ValidationError::new("empty"));
        return Err(errors);
    }
    for ingredient in &ingredients {
        ingredient.validate()?;
    }
    Ok(ingredients)
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| ShortIngredient {
                    color: i.color.clone(),
                    parts: i.parts.clone(),
                })
                .collect(),
        }
    }

    pub fn long(&self) -> LongDrink {
        LongDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.0.clone(),
        }
    }

    pub async fn all(db: &Database) -> Result<Vec<Drink>, sqlx::Error> {
        sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks ORDER BY title")
            .fetch_all(&db.pool)
            .await
    }

    pub async fn insert(db: &Database, title: &str, recipe: &[Ingredient]) -> Result<Drink, sqlx::Error> {
        sqlx::query_as::<_, Drink>(
            "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(Json(recipe))
        .fetch_one(&db.pool)
        .await
    }

    /// Applies whichever fields are given; `None` when the drink does not exist.
    pub async fn update(
        db: &Database,
        id: i64,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<Drink>, sqlx::Error> {
        sqlx::query_as::<_, Drink>(
            r#"
            UPDATE drinks
            SET title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(recipe.map(Json))
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn delete(db: &Database, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Wipes the table and seeds the sample drink.
    pub async fn reset(db: &Database) -> Result<Drink, sqlx::Error> {
        let mut tx = db.pool.begin().await?;
        sqlx::query("TRUNCATE drinks RESTART IDENTITY")
            .execute(&mut *tx)
            .await?;
        let water = sqlx::query_as::<_, Drink>(
            "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind("water")
        .bind(Json(vec![Ingredient {
            color: "blue".into(),
            name: "water".into(),
            parts: serde_json::Number::from(1u32),
        }]))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(water)
    }
}
