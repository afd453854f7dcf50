use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app::errors::{AppError, AppResult};
use crate::app::options::ConnectionConfig;
use crate::component::{Component, ComponentContainer, DynService};

/// Caller-supplied settings for [`initialize_app`](crate::app::initialize_app).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirebaseAppSettings {
    pub name: Option<String>,
    pub automatic_data_collection_enabled: Option<bool>,
}

/// Settings after defaults have been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirebaseAppConfig {
    pub name: Arc<str>,
    pub automatic_data_collection_enabled: bool,
}

impl FirebaseAppConfig {
    pub fn new(name: impl Into<String>, automatic: bool) -> Self {
        Self {
            name: Arc::from(name.into()),
            automatic_data_collection_enabled: automatic,
        }
    }
}

/// A registered app: its credentials, settings and service container.
///
/// Cloning is cheap and every clone refers to the same app.
#[derive(Clone)]
pub struct FirebaseApp {
    inner: Arc<FirebaseAppInner>,
}

struct FirebaseAppInner {
    options: ConnectionConfig,
    config: FirebaseAppConfig,
    is_deleted: AtomicBool,
    container: ComponentContainer,
}

impl FirebaseApp {
    pub(crate) fn new(
        options: ConnectionConfig,
        config: FirebaseAppConfig,
        container: ComponentContainer,
    ) -> Self {
        let app = Self {
            inner: Arc::new(FirebaseAppInner {
                options,
                config,
                is_deleted: AtomicBool::new(false),
                container,
            }),
        };
        let root: DynService = Arc::new(app.clone());
        app.inner.container.attach_root_service(root);
        app
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn options(&self) -> &ConnectionConfig {
        &self.inner.options
    }

    pub fn config(&self) -> &FirebaseAppConfig {
        &self.inner.config
    }

    pub fn automatic_data_collection_enabled(&self) -> bool {
        self.inner.config.automatic_data_collection_enabled
    }

    pub fn container(&self) -> ComponentContainer {
        self.inner.container.clone()
    }

    pub fn add_component(&self, component: Component) -> AppResult<()> {
        self.check_destroyed()?;
        self.inner
            .container
            .add_component(component)
            .map_err(AppError::from)
    }

    pub fn is_deleted(&self) -> bool {
        self.inner.is_deleted.load(Ordering::SeqCst)
    }

    pub(crate) fn set_is_deleted(&self, value: bool) {
        self.inner.is_deleted.store(value, Ordering::SeqCst);
    }

    pub fn check_destroyed(&self) -> AppResult<()> {
        if self.is_deleted() {
            return Err(AppError::AppDeleted {
                app_name: self.name().to_owned(),
            });
        }
        Ok(())
    }

    /// Whether two handles refer to the same registered app.
    pub fn ptr_eq(&self, other: &FirebaseApp) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for FirebaseApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseApp")
            .field("name", &self.name())
            .field("project_id", &self.options().project_id())
            .field(
                "automatic_data_collection_enabled",
                &self.automatic_data_collection_enabled(),
            )
            .field("is_deleted", &self.is_deleted())
            .finish()
    }
}
