//! One-shot startup of the storage client.
//!
//! [`ConfigBootstrap`] takes a [`ConnectionConfig`](crate::app::ConnectionConfig),
//! registers the app, resolves its Firestore service and returns a
//! [`ClientHandle`] for the caller to pass to whatever needs storage. The
//! Auth component is never registered: identity is owned by an external
//! backend.
//!
//! ```no_run
//! use firestore_bootstrap::bootstrap::ConfigBootstrap;
//!
//! # fn main() -> Result<(), firestore_bootstrap::bootstrap::InitializationError> {
//! let client = ConfigBootstrap::from_env()?.initialize()?;
//! assert!(!client.auth_started());
//! println!("documents live at {}", client.firestore().documents_url());
//! # Ok(())
//! # }
//! ```

mod api;
mod constants;
mod error;

pub use api::{initialize, ClientHandle, ConfigBootstrap, LOGGER};
pub use constants::{AUTH_COMPONENT_NAME, BOOTSTRAP_LOG_MESSAGE};
pub use error::{BootstrapResult, InitializationError, InitializationErrorCode};
