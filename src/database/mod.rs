pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemStore;
pub use postgres::PgStore;
pub use store::{BudgetPatch, ExpenseChanges, Store, StoreError};
