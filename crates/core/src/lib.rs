//! `coffeeshop-core`: the drink menu domain model.
//!
//! This crate contains **pure domain** types (no infrastructure concerns):
//! the `Drink` entity, its recipe, the public/detailed views, and the
//! create/update inputs the store accepts.

pub mod drink;
pub mod error;
pub mod id;
pub mod recipe;

pub use drink::{Drink, DrinkDraft, DrinkLong, DrinkPatch, DrinkShort, NewDrink};
pub use error::{DomainError, DomainResult};
pub use id::DrinkId;
pub use recipe::{Ingredient, Recipe, ShortIngredient};
