pub(crate) const FIRESTORE_COMPONENT_NAME: &str = "firestore";
pub const DEFAULT_DATABASE_ID: &str = "(default)";

pub(crate) const FIRESTORE_API_HOST: &str = "https://firestore.googleapis.com";
pub(crate) const FIRESTORE_API_VERSION: &str = "v1";
pub(crate) const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";
