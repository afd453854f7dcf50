/// Name given to an app when the settings do not name one.
pub const DEFAULT_ENTRY_NAME: &str = "[DEFAULT]";
