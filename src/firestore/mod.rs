//! Firestore storage client: the one service the bootstrap brings up.

mod api;
mod constants;
mod database_id;
pub mod error;

pub use api::{get_firestore, register_firestore_component, Firestore};
pub use constants::DEFAULT_DATABASE_ID;
pub use database_id::DatabaseId;
pub use error::{FirestoreError, FirestoreErrorCode, FirestoreResult};
