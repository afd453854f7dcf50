//! Service container hosting the lazily-built services of an app.

mod component;
pub mod container;
pub mod provider;
pub mod types;

pub use component::Component;
pub use container::ComponentContainer;
pub use provider::Provider;
pub use types::{ComponentError, ComponentType, DynService, InstanceFactory, InstantiationMode};

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};


static GLOBAL_COMPONENTS: LazyLock<Mutex<HashMap<Arc<str>, Component>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub(crate) fn global_components() -> MutexGuard<'static, HashMap<Arc<str>, Component>> {
    GLOBAL_COMPONENTS
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

/// Records a component for every app created from now on. Returns `false`
/// when a component with the same name is already registered.
pub fn register_component(component: Component) -> bool {
    let mut guard = global_components();
    if guard.contains_key(component.name()) {
        return false;
    }
    guard.insert(Arc::from(component.name()), component);
    true
}
