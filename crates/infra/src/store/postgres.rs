//! Postgres-backed drink store.
//!
//! ## Schema
//!
//! ```sql
//! CREATE TABLE drinks (
//!     id     BIGSERIAL PRIMARY KEY,
//!     title  TEXT UNIQUE NOT NULL,
//!     recipe TEXT NOT NULL      -- JSON-encoded recipe
//! );
//! ```
//!
//! ## Error Mapping
//!
//! | Operation | SQLx Error | StoreError |
//! |-----------|------------|------------|
//! | create/update/delete | Database (`23505` unique violation) | `Persistence` ("title already exists") |
//! | create/update/delete | any other | `Persistence` |
//! | list/find | any | `Query` |
//! | list/find | undecodable `recipe` column | `Query` |
//!
//! ## Thread Safety
//!
//! `PostgresDrinkStore` is `Send + Sync`; the SQLx pool manages connections.
//! Concurrent updates of the same row are last-writer-wins.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use coffeeshop_core::{Drink, DrinkDraft, DrinkId, DrinkPatch, Ingredient, Recipe};

use super::{DrinkStore, StoreError};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id     BIGSERIAL PRIMARY KEY,
        title  TEXT UNIQUE NOT NULL,
        recipe TEXT NOT NULL
    )
"#;

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS drinks";

#[derive(Debug, Clone)]
pub struct PostgresDrinkStore {
    pool: Arc<PgPool>,
}

impl PostgresDrinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Query(format!("failed to connect: {e}")))?;
        Ok(Self::new(pool))
    }

    /// Create the `drinks` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn setup(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_write_error("setup", e))?;
        Ok(())
    }

    /// Drop and recreate the `drinks` table, then seed it with a single drink.
    ///
    /// Destroys all existing rows.
    #[instrument(skip(self), err)]
    pub async fn reset(&self) -> Result<Drink, StoreError> {
        tracing::warn!("dropping and recreating the drinks table");
        sqlx::query(DROP_TABLE_SQL)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_write_error("reset", e))?;
        self.setup().await?;

        let seed = DrinkDraft::new(
            "water",
            Recipe::new(vec![Ingredient::new("water", "blue", 1)]),
        );
        self.create(seed).await
    }
}

#[async_trait]
impl DrinkStore for PostgresDrinkStore {
    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<Drink>, StoreError> {
        let rows = sqlx::query("SELECT id, title, recipe FROM drinks ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_read_error("list_all", e))?;

        let drinks = rows.iter().map(drink_from_row).collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = drinks.len(), "listed drinks");
        Ok(drinks)
    }

    #[instrument(skip(self), fields(drink_id = %id), err)]
    async fn find_by_id(&self, id: DrinkId) -> Result<Option<Drink>, StoreError> {
        let row = sqlx::query("SELECT id, title, recipe FROM drinks WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_read_error("find_by_id", e))?;

        row.as_ref().map(drink_from_row).transpose()
    }

    #[instrument(skip(self, draft), err)]
    async fn create(&self, draft: DrinkDraft) -> Result<Drink, StoreError> {
        let new = draft.validate()?;
        let recipe = encode_recipe(&new.recipe)?;

        let row = sqlx::query(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(&new.title)
        .bind(&recipe)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_write_error("create", e))?;

        drink_from_row(&row).map_err(into_persistence)
    }

    #[instrument(skip(self, patch), fields(drink_id = %id), err)]
    async fn update(&self, id: DrinkId, patch: DrinkPatch) -> Result<Option<Drink>, StoreError> {
        let patch = patch.validate()?;
        let recipe = patch.recipe.as_ref().map(encode_recipe).transpose()?;

        let row = sqlx::query(
            r#"
            UPDATE drinks
            SET title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id.get())
        .bind(patch.title.as_deref())
        .bind(recipe.as_deref())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_write_error("update", e))?;

        row.as_ref()
            .map(drink_from_row)
            .transpose()
            .map_err(into_persistence)
    }

    #[instrument(skip(self), fields(drink_id = %id), err)]
    async fn delete(&self, id: DrinkId) -> Result<Option<DrinkId>, StoreError> {
        let row = sqlx::query("DELETE FROM drinks WHERE id = $1 RETURNING id")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_write_error("delete", e))?;

        row.map(|r| r.try_get::<i64, _>("id").map(DrinkId::new))
            .transpose()
            .map_err(|e| map_write_error("delete", e))
    }
}

fn drink_from_row(row: &PgRow) -> Result<Drink, StoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| map_read_error("decode id", e))?;
    let title: String = row
        .try_get("title")
        .map_err(|e| map_read_error("decode title", e))?;
    let recipe: String = row
        .try_get("recipe")
        .map_err(|e| map_read_error("decode recipe", e))?;

    let recipe = Recipe::from_text(&recipe)
        .map_err(|e| StoreError::Query(format!("corrupt recipe for drink {id}: {e}")))?;

    Ok(Drink::new(DrinkId::new(id), title, recipe))
}

fn encode_recipe(recipe: &Recipe) -> Result<String, StoreError> {
    recipe
        .to_text()
        .map_err(|e| StoreError::Persistence(format!("failed to encode recipe: {e}")))
}

fn into_persistence(err: StoreError) -> StoreError {
    match err {
        StoreError::Query(msg) => StoreError::Persistence(msg),
        other => other,
    }
}

fn map_write_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Persistence(format!("title already exists ({operation})"))
            } else {
                StoreError::Persistence(format!(
                    "database error in {operation}: {}",
                    db_err.message()
                ))
            }
        }
        other => StoreError::Persistence(format!("sqlx error in {operation}: {other}")),
    }
}

fn map_read_error(operation: &str, err: sqlx::Error) -> StoreError {
    StoreError::Query(format!("sqlx error in {operation}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Runs against a real database: `DATABASE_URL=postgres://... cargo test -- --ignored`.
    // Drops and recreates the `drinks` table.
    async fn store() -> PostgresDrinkStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PostgresDrinkStore::connect(&url, 2).await.expect("connect");
        store.reset().await.expect("reset");
        store
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn drink_lifecycle_round_trips_through_postgres() {
        let store = store().await;

        let seeded = store.list_all().await.unwrap();
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].title(), "water");

        let recipe = Recipe::new(vec![
            Ingredient::new("espresso", "#3b2f2f", 1),
            Ingredient::new("milk", "white", 3),
        ]);
        let latte = store
            .create(DrinkDraft::new("latte", recipe.clone()))
            .await
            .unwrap();
        assert_eq!(latte.recipe(), &recipe);

        let dup = store.create(DrinkDraft::new("latte", recipe.clone())).await;
        assert!(matches!(dup, Err(StoreError::Persistence(_))));

        let renamed = store
            .update(
                latte.id(),
                DrinkPatch {
                    title: Some("caffe latte".to_string()),
                    recipe: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title(), "caffe latte");
        assert_eq!(renamed.recipe(), &recipe);

        assert_eq!(store.delete(latte.id()).await.unwrap(), Some(latte.id()));
        assert_eq!(store.delete(latte.id()).await.unwrap(), None);
        assert!(store.update(latte.id(), DrinkPatch::default()).await.unwrap().is_none());
    }
}
