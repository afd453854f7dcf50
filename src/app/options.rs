use std::fmt;

use serde::Deserialize;

/// Project credentials of a Firebase web app.
///
/// The record is immutable: fields are only readable through accessors and
/// a new value has to be built to change anything. It deserializes from the
/// camelCase JSON shape the Firebase console hands out; absent keys become
/// empty strings and are reported by [`ConnectionConfig::missing_fields`].
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionConfig {
    api_key: String,
    auth_domain: String,
    project_id: String,
    storage_bucket: String,
    messaging_sender_id: String,
    app_id: String,
    measurement_id: String,
}

impl ConnectionConfig {
    pub fn new(
        api_key: impl Into<String>,
        auth_domain: impl Into<String>,
        project_id: impl Into<String>,
        storage_bucket: impl Into<String>,
        messaging_sender_id: impl Into<String>,
        app_id: impl Into<String>,
        measurement_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            auth_domain: auth_domain.into(),
            project_id: project_id.into(),
            storage_bucket: storage_bucket.into(),
            messaging_sender_id: messaging_sender_id.into(),
            app_id: app_id.into(),
            measurement_id: measurement_id.into(),
        }
    }

    /// Parses the JSON object form, e.g. the `config` entry of `__FIREBASE_DEFAULTS__`.
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn auth_domain(&self) -> &str {
        &self.auth_domain
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn storage_bucket(&self) -> &str {
        &self.storage_bucket
    }

    pub fn messaging_sender_id(&self) -> &str {
        &self.messaging_sender_id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn measurement_id(&self) -> &str {
        &self.measurement_id
    }

    /// Names (in their JSON spelling) of the fields that are empty or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("apiKey", self.api_key.as_str()),
            ("authDomain", self.auth_domain.as_str()),
            ("projectId", self.project_id.as_str()),
            ("storageBucket", self.storage_bucket.as_str()),
            ("messagingSenderId", self.messaging_sender_id.as_str()),
            ("appId", self.app_id.as_str()),
            ("measurementId", self.measurement_id.as_str()),
        ]
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ConnectionConfig")
            .field("api_key", &api_key)
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("app_id", &self.app_id)
            .field("measurement_id", &self.measurement_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ConnectionConfig {
        ConnectionConfig::new(
            "demo-api-key",
            "demo-project.firebaseapp.com",
            "demo-project",
            "demo-project.firebasestorage.app",
            "1234567890",
            "1:1234567890:web:abcdef",
            "G-DEMO1234",
        )
    }

    #[test]
    fn complete_config_has_no_missing_fields() {
        assert!(sample().is_complete());
    }

    #[test]
    fn blank_fields_are_reported_in_json_spelling() {
        let config = ConnectionConfig::new("key", " ", "", "bucket", "1", "app", "");
        assert_eq!(
            config.missing_fields(),
            vec!["authDomain", "projectId", "measurementId"]
        );
    }

    #[test]
    fn deserializes_web_config_shape() {
        let config = ConnectionConfig::from_json(json!({
            "apiKey": "demo-api-key",
            "authDomain": "demo-project.firebaseapp.com",
            "projectId": "demo-project",
            "storageBucket": "demo-project.firebasestorage.app",
            "messagingSenderId": "1234567890",
            "appId": "1:1234567890:web:abcdef",
            "measurementId": "G-DEMO1234"
        }))
        .unwrap();
        assert_eq!(config, sample());
    }

    #[test]
    fn absent_keys_deserialize_as_missing() {
        let config = ConnectionConfig::from_json(json!({ "apiKey": "k" })).unwrap();
        assert_eq!(config.api_key(), "k");
        assert!(config.missing_fields().contains(&"projectId"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("demo-api-key"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("demo-project"));
    }
}
