//! The drink entity, its public/detailed views, and create/update inputs.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::DrinkId;
use crate::recipe::{Recipe, ShortIngredient};

/// A drink on the menu.
///
/// # Invariants
/// - `id` is assigned by the store and never changes.
/// - `title` is non-empty and unique across drinks (uniqueness is enforced by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    id: DrinkId,
    title: String,
    recipe: Recipe,
}

impl Drink {
    /// Rehydrate a persisted drink.
    pub fn new(id: DrinkId, title: impl Into<String>, recipe: Recipe) -> Self {
        Self {
            id,
            title: title.into(),
            recipe,
        }
    }

    pub fn id(&self) -> DrinkId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Apply a validated patch in place. Absent fields keep their current value.
    pub fn apply(&mut self, patch: DrinkPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(recipe) = patch.recipe {
            self.recipe = recipe;
        }
    }

    /// Public projection (ingredient names withheld).
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.short(),
        }
    }

    /// Full projection.
    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkShort {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkLong {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Recipe,
}

/// Unvalidated input for creating a drink. Both fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkDraft {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

/// Validated input for creating a drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

impl DrinkDraft {
    pub fn new(title: impl Into<String>, recipe: Recipe) -> Self {
        Self {
            title: Some(title.into()),
            recipe: Some(recipe),
        }
    }

    pub fn validate(self) -> DomainResult<NewDrink> {
        let title = self
            .title
            .ok_or_else(|| DomainError::validation("title is required"))?;
        let recipe = self
            .recipe
            .ok_or_else(|| DomainError::validation("recipe is required"))?;

        let title = normalize_title(title)?;
        recipe.validate()?;

        Ok(NewDrink { title, recipe })
    }
}

/// Partial update. Only the fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

impl DrinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }

    pub fn validate(self) -> DomainResult<Self> {
        let title = self.title.map(normalize_title).transpose()?;
        if let Some(recipe) = &self.recipe {
            recipe.validate()?;
        }
        Ok(Self {
            title,
            recipe: self.recipe,
        })
    }
}

fn normalize_title(title: String) -> DomainResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Ingredient;
    use serde_json::json;

    fn water() -> Drink {
        Drink::new(
            DrinkId::new(1),
            "water",
            Recipe::new(vec![Ingredient::new("water", "blue", 1)]),
        )
    }

    #[test]
    fn short_view_omits_ingredient_names() {
        let value = serde_json::to_value(water().short()).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "title": "water", "recipe": [{"color": "blue", "parts": 1}]})
        );
    }

    #[test]
    fn long_view_includes_ingredient_names() {
        let value = serde_json::to_value(water().long()).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "title": "water", "recipe": [{"name": "water", "color": "blue", "parts": 1}]})
        );
    }

    #[test]
    fn draft_requires_title_and_recipe() {
        let missing_title = DrinkDraft {
            title: None,
            recipe: Some(Recipe::default()),
        };
        assert!(matches!(missing_title.validate(), Err(DomainError::Validation(_))));

        let missing_recipe = DrinkDraft {
            title: Some("latte".to_string()),
            recipe: None,
        };
        assert!(matches!(missing_recipe.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn draft_rejects_blank_title() {
        let draft = DrinkDraft::new("   ", Recipe::default());
        assert!(draft.validate().is_err());
    }

    #[test]
    fn draft_trims_title() {
        let new = DrinkDraft::new("  flat white ", Recipe::default()).validate().unwrap();
        assert_eq!(new.title, "flat white");
    }

    #[test]
    fn title_only_patch_keeps_recipe() {
        let mut drink = water();
        let before = drink.recipe().clone();

        let patch = DrinkPatch {
            title: Some("sparkling water".to_string()),
            recipe: None,
        }
        .validate()
        .unwrap();
        drink.apply(patch);

        assert_eq!(drink.id(), DrinkId::new(1));
        assert_eq!(drink.title(), "sparkling water");
        assert_eq!(drink.recipe(), &before);
    }

    #[test]
    fn recipe_only_patch_keeps_title() {
        let mut drink = water();
        let recipe = Recipe::new(vec![
            Ingredient::new("espresso", "brown", 1),
            Ingredient::new("milk", "white", 2),
        ]);

        drink.apply(DrinkPatch {
            title: None,
            recipe: Some(recipe.clone()),
        });

        assert_eq!(drink.title(), "water");
        assert_eq!(drink.recipe(), &recipe);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut drink = water();
        let patch = DrinkPatch::default();
        assert!(patch.is_empty());
        drink.apply(patch);
        assert_eq!(drink, water());
    }
}
