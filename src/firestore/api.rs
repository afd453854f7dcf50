use std::env;
use std::sync::{Arc, LazyLock};

use serde_json::Value;
use url::Url;

use crate::app::{self, get_app, FirebaseApp};
use crate::component::{
    Component, ComponentContainer, ComponentError, ComponentType, DynService, InstantiationMode,
};
use crate::firestore::constants::{
    EMULATOR_HOST_ENV, FIRESTORE_API_HOST, FIRESTORE_API_VERSION, FIRESTORE_COMPONENT_NAME,
};
use crate::firestore::database_id::DatabaseId;
use crate::firestore::error::{internal_error, invalid_argument, FirestoreResult};

/// Firestore service bound to one app.
///
/// The handle carries the database identifier and the REST root every
/// request is issued against. Clones share the same state.
#[derive(Clone, Debug)]
pub struct Firestore {
    inner: Arc<FirestoreInner>,
}

#[derive(Debug)]
struct FirestoreInner {
    app: FirebaseApp,
    database_id: DatabaseId,
    base_url: Url,
}

impl Firestore {
    pub(crate) fn new(
        app: FirebaseApp,
        database_id: DatabaseId,
        emulator_host: Option<&str>,
    ) -> FirestoreResult<Self> {
        let base_url = build_base_url(&database_id, emulator_host)?;
        Ok(Self {
            inner: Arc::new(FirestoreInner {
                app,
                database_id,
                base_url,
            }),
        })
    }

    /// Returns the `FirebaseApp` this Firestore instance is scoped to.
    pub fn app(&self) -> &FirebaseApp {
        &self.inner.app
    }

    /// The fully qualified database identifier (project + database name).
    pub fn database_id(&self) -> &DatabaseId {
        &self.inner.database_id
    }

    pub fn project_id(&self) -> &str {
        self.inner.database_id.project_id()
    }

    /// Returns the logical database name (usually `"(default)"`).
    pub fn database(&self) -> &str {
        self.inner.database_id.database()
    }

    /// REST root of the database, e.g.
    /// `https://firestore.googleapis.com/v1/projects/{project}/databases/(default)`.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    pub fn documents_url(&self) -> String {
        format!("{}/documents", self.base_url())
    }

    pub fn uses_emulator(&self) -> bool {
        self.inner.base_url.scheme() == "http"
    }
}

pub(crate) fn build_base_url(
    database_id: &DatabaseId,
    emulator_host: Option<&str>,
) -> FirestoreResult<Url> {
    let raw = match emulator_host {
        Some(host) => format!(
            "http://{host}/{FIRESTORE_API_VERSION}/projects/{}/databases/{}",
            database_id.project_id(),
            database_id.database(),
        ),
        None => format!(
            "{FIRESTORE_API_HOST}/{FIRESTORE_API_VERSION}/projects/{}/databases/{}",
            database_id.project_id(),
            database_id.database(),
        ),
    };
    Url::parse(&raw).map_err(|err| invalid_argument(format!("Invalid Firestore endpoint {raw}: {err}")))
}

static FIRESTORE_COMPONENT: LazyLock<()> = LazyLock::new(|| {
    let component = Component::new(
        FIRESTORE_COMPONENT_NAME,
        Arc::new(firestore_factory),
        ComponentType::Public,
    )
    .with_instantiation_mode(InstantiationMode::Lazy);

    let _ = app::register_component(component);
});

fn firestore_factory(
    container: &ComponentContainer,
    _options: &Value,
) -> Result<DynService, ComponentError> {
    let failed = |reason: String| ComponentError::InitializationFailed {
        name: FIRESTORE_COMPONENT_NAME.to_string(),
        reason,
    };

    let app = container
        .root_service::<FirebaseApp>()
        .ok_or_else(|| failed("Firebase app not attached to component container".to_string()))?;
    let database_id = DatabaseId::from_app(&app).map_err(|err| failed(err.to_string()))?;
    let emulator_host = env::var(EMULATOR_HOST_ENV)
        .ok()
        .filter(|host| !host.trim().is_empty());

    let firestore = Firestore::new((*app).clone(), database_id, emulator_host.as_deref())
        .map_err(|err| failed(err.to_string()))?;
    log::debug!(
        "firestore service for app {} bound to {}",
        app.name(),
        firestore.base_url()
    );
    Ok(Arc::new(firestore) as DynService)
}

pub fn register_firestore_component() {
    LazyLock::force(&FIRESTORE_COMPONENT);
}

/// Resolves (or lazily instantiates) the Firestore service for the provided app.
///
/// When `app` is `None` the default Firebase app is used. Multiple calls with
/// the same app yield the same shared `Arc<Firestore>` handle. A project id
/// that cannot form a resource path is rejected before anything is created.
pub fn get_firestore(app: Option<FirebaseApp>) -> FirestoreResult<Arc<Firestore>> {
    register_firestore_component();
    let app = match app {
        Some(app) => app,
        None => get_app(None).map_err(|err| internal_error(err.to_string()))?,
    };
    app.check_destroyed()
        .map_err(|err| internal_error(err.to_string()))?;
    DatabaseId::from_app(&app)?;

    app::get_provider(&app, FIRESTORE_COMPONENT_NAME)
        .get_checked::<Firestore>()
        .map_err(|err| internal_error(err.to_string()))
}
