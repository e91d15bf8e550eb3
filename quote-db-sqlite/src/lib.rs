//! SQLite storage backend for saved quotes.

mod factory;
mod numeric;
mod repository;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteRepository;
