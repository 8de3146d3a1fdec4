/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
/// Match, prediction and reference data storage backends.
pub mod tipping_store;
