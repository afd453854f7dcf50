/// The single line logged once the storage client is up.
pub const BOOTSTRAP_LOG_MESSAGE: &str = "Firebase initialized for Firestore only (Auth disabled)";

/// Component name the Auth service would be registered under. The bootstrap
/// never registers it.
pub const AUTH_COMPONENT_NAME: &str = "auth";
