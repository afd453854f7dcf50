//! App registry: named apps, their credentials and their service containers.

mod api;
mod constants;
mod errors;
mod logger;
mod options;
mod registry;
mod types;

#[doc(inline)]
pub use api::{delete_app, get_app, get_apps, initialize_app};

#[doc(inline)]
pub use constants::DEFAULT_ENTRY_NAME;

#[doc(inline)]
pub use errors::{AppError, AppResult};

#[doc(inline)]
pub use logger::LOGGER;

#[doc(inline)]
pub use options::ConnectionConfig;

#[doc(inline)]
pub use registry::{add_component, get_provider, register_component};

#[doc(inline)]
pub use types::{FirebaseApp, FirebaseAppConfig, FirebaseAppSettings};
