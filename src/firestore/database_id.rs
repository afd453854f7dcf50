use crate::app::FirebaseApp;
use crate::firestore::constants::DEFAULT_DATABASE_ID;
use crate::firestore::error::{invalid_argument, missing_project_id, FirestoreResult};

/// Project plus database name, the root of every Firestore resource path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatabaseId {
    project_id: String,
    database: String,
}

impl DatabaseId {
    /// Validates both segments; they end up verbatim in resource paths.
    pub fn new(project_id: impl Into<String>, database: impl Into<String>) -> FirestoreResult<Self> {
        let project_id = project_id.into();
        let database = database.into();
        if project_id.is_empty() {
            return Err(missing_project_id());
        }
        validate_project_id(&project_id)?;
        validate_segment("database", &database)?;
        Ok(Self {
            project_id,
            database,
        })
    }

    pub fn default_for(project_id: impl Into<String>) -> FirestoreResult<Self> {
        Self::new(project_id, DEFAULT_DATABASE_ID)
    }

    pub fn from_app(app: &FirebaseApp) -> FirestoreResult<Self> {
        Self::default_for(app.options().project_id())
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn is_default_database(&self) -> bool {
        self.database == DEFAULT_DATABASE_ID
    }
}

/// Cloud project ids: lowercase ASCII letters, digits and hyphens, starting
/// with a letter and not ending with a hyphen.
fn validate_project_id(value: &str) -> FirestoreResult<()> {
    let starts_with_letter = value.starts_with(|c: char| c.is_ascii_lowercase());
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !starts_with_letter || !allowed || value.ends_with('-') {
        return Err(invalid_argument(format!(
            "project_id '{}' must start with a lowercase letter and contain only \
             lowercase letters, digits and hyphens",
            value.escape_default()
        )));
    }
    Ok(())
}

fn validate_segment(field: &str, value: &str) -> FirestoreResult<()> {
    if value.is_empty() {
        return Err(invalid_argument(format!("{field} must not be empty")));
    }
    let reserved = |c: char| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '/' | '?' | '#' | '%' | ':' | '@' | '[' | ']')
    };
    if value.contains(reserved) {
        return Err(invalid_argument(format!(
            "{field} '{}' must not contain whitespace or URL-reserved characters",
            value.escape_default()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::error::FirestoreErrorCode;

    #[test]
    fn default_database_for_project() {
        let db = DatabaseId::default_for("project").unwrap();
        assert_eq!(db.project_id(), "project");
        assert_eq!(db.database(), DEFAULT_DATABASE_ID);
        assert!(db.is_default_database());
    }

    #[test]
    fn empty_project_is_missing() {
        let err = DatabaseId::default_for("").unwrap_err();
        assert_eq!(err.code, FirestoreErrorCode::MissingProjectId);
        assert_eq!(err.code_str(), "firestore/missing-project-id");
    }

    #[test]
    fn malformed_project_is_rejected() {
        for bad in [
            "proj/ect",
            "my project",
            "tab\tbed",
            "eco?bazaar",
            "eco#bazaar",
            "eco%2Fbazaar",
            "Ecobazaar",
            "9lives",
            "trailing-",
        ] {
            let err = DatabaseId::default_for(bad).unwrap_err();
            assert_eq!(err.code, FirestoreErrorCode::InvalidArgument, "{bad}");
        }
    }

    #[test]
    fn hyphenated_project_is_accepted() {
        let db = DatabaseId::default_for("ecobazaar-demo-2").unwrap();
        assert_eq!(db.project_id(), "ecobazaar-demo-2");
    }

    #[test]
    fn named_database_is_kept() {
        let db = DatabaseId::new("project", "reports").unwrap();
        assert_eq!(db.database(), "reports");
        assert!(!db.is_default_database());
    }

    #[test]
    fn reserved_characters_in_database_are_rejected() {
        for bad in ["rep?orts", "rep#orts", "a/b", ""] {
            let err = DatabaseId::new("project", bad).unwrap_err();
            assert_eq!(err.code, FirestoreErrorCode::InvalidArgument, "{bad}");
        }
    }
}
