//! Infrastructure layer: drink persistence.

pub mod store;

pub use store::{DrinkStore, InMemoryDrinkStore, PostgresDrinkStore, StoreError};
