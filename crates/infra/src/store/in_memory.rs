use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use coffeeshop_core::{Drink, DrinkDraft, DrinkId, DrinkPatch};

use super::{DrinkStore, StoreError};

#[derive(Debug, Default)]
struct Table {
    drinks: Vec<Drink>,
    last_id: i64,
}

impl Table {
    fn position(&self, id: DrinkId) -> Option<usize> {
        self.drinks.iter().position(|d| d.id() == id)
    }

    fn title_taken(&self, title: &str, except: Option<DrinkId>) -> bool {
        self.drinks
            .iter()
            .any(|d| d.title() == title && Some(d.id()) != except)
    }
}

/// In-memory drink store for tests/dev.
///
/// Rows are kept in insertion order; ids come from a counter that only grows,
/// so deleted ids are never handed out again.
#[derive(Debug, Default)]
pub struct InMemoryDrinkStore {
    table: RwLock<Table>,
}

impl InMemoryDrinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Table>, StoreError> {
        self.table
            .read()
            .map_err(|_| StoreError::Query("drink table lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table>, StoreError> {
        self.table
            .write()
            .map_err(|_| StoreError::Persistence("drink table lock poisoned".to_string()))
    }
}

#[async_trait]
impl DrinkStore for InMemoryDrinkStore {
    async fn list_all(&self) -> Result<Vec<Drink>, StoreError> {
        Ok(self.read()?.drinks.clone())
    }

    async fn find_by_id(&self, id: DrinkId) -> Result<Option<Drink>, StoreError> {
        let table = self.read()?;
        Ok(table.position(id).map(|idx| table.drinks[idx].clone()))
    }

    async fn create(&self, draft: DrinkDraft) -> Result<Drink, StoreError> {
        let new = draft.validate()?;
        let mut table = self.write()?;

        if table.title_taken(&new.title, None) {
            return Err(StoreError::Persistence(format!(
                "title already exists: {}",
                new.title
            )));
        }

        table.last_id += 1;
        let drink = Drink::new(DrinkId::new(table.last_id), new.title, new.recipe);
        table.drinks.push(drink.clone());
        Ok(drink)
    }

    async fn update(&self, id: DrinkId, patch: DrinkPatch) -> Result<Option<Drink>, StoreError> {
        let mut table = self.write()?;
        let Some(idx) = table.position(id) else {
            return Ok(None);
        };

        let patch = patch.validate()?;
        if let Some(title) = &patch.title {
            if table.title_taken(title, Some(id)) {
                return Err(StoreError::Persistence(format!(
                    "title already exists: {title}"
                )));
            }
        }

        let drink = &mut table.drinks[idx];
        drink.apply(patch);
        Ok(Some(drink.clone()))
    }

    async fn delete(&self, id: DrinkId) -> Result<Option<DrinkId>, StoreError> {
        let mut table = self.write()?;
        Ok(table.position(id).map(|idx| table.drinks.remove(idx).id()))
    }
}
