//! Drink storage: the store contract plus in-memory and Postgres adapters.

pub mod drink_store;
pub mod in_memory;
pub mod postgres;

pub use drink_store::{DrinkStore, StoreError};
pub use in_memory::InMemoryDrinkStore;
pub use postgres::PostgresDrinkStore;
