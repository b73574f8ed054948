// Service exports
pub mod cache;
pub mod cart_store;
pub mod catalog;
pub mod postgres;

pub use cache::{CacheManager, CacheKey, CacheError};
pub use cart_store::{CartChange, CartStore, CartStoreError, MemoryCartStore, FileCartStore};
pub use catalog::{CandidateCatalog, CatalogError};
pub use postgres::{PostgresClient, PostgresError, CandidateLeadCount};
