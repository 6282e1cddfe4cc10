use serde::{Deserialize, Serialize};

use coffeeshop_core::{DrinkDraft, DrinkId, DrinkPatch, Recipe};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /drinks`. Both fields are required; presence is checked by
/// the store so a missing field is reported as unprocessable.
#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Recipe>,
}

impl From<CreateDrinkRequest> for DrinkDraft {
    fn from(req: CreateDrinkRequest) -> Self {
        DrinkDraft {
            title: req.title,
            recipe: req.recipe,
        }
    }
}

/// Body of `PATCH /drinks/:id`.
#[derive(Debug, Deserialize)]
pub struct PatchDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    // Older clients send the key misspelled.
    #[serde(default, alias = "receipe")]
    pub recipe: Option<Recipe>,
}

impl From<PatchDrinkRequest> for DrinkPatch {
    fn from(req: PatchDrinkRequest) -> Self {
        DrinkPatch {
            title: req.title,
            recipe: req.recipe,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: T,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: T) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: DrinkId,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
}
