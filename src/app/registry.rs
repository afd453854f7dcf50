use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::app::logger::LOGGER;
use crate::app::types::FirebaseApp;
use crate::component::{self, Component, Provider};

static APPS: LazyLock<Mutex<HashMap<String, FirebaseApp>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub(crate) fn apps_guard() -> MutexGuard<'static, HashMap<String, FirebaseApp>> {
    APPS.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Attaches a component to the given app, logging failures for debugging.
pub fn add_component(app: &FirebaseApp, component: &Component) {
    if let Err(err) = app.container().add_component(component.clone()) {
        LOGGER.debug(format!(
            "Component {} failed to register with FirebaseApp {}: {err}",
            component.name(),
            app.name()
        ));
    }
}

/// Registers a global component and propagates it to already-initialized apps.
pub fn register_component(component: Component) -> bool {
    if !component::register_component(component.clone()) {
        return false;
    }

    for app in apps_guard().values() {
        add_component(app, &component);
    }
    true
}

/// Fetches the provider for the named component on the given app.
pub fn get_provider(app: &FirebaseApp, name: &str) -> Provider {
    app.container().get_provider(name)
}

/// Snapshot of the globally registered components, attached to new apps.
pub(crate) fn registered_components() -> Vec<Component> {
    component::global_components().values().cloned().collect()
}
