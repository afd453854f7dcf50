use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::component::provider::Provider;
use crate::component::types::{ComponentError, DynService};
use crate::component::Component;

/// Per-app registry of providers, keyed by component name.
#[derive(Clone)]
pub struct ComponentContainer {
    pub(crate) inner: Arc<ComponentContainerInner>,
}

pub(crate) struct ComponentContainerInner {
    name: Arc<str>,
    providers: Mutex<HashMap<Arc<str>, Provider>>,
    root_service: Mutex<Option<DynService>>,
}

impl ComponentContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ComponentContainerInner {
                name: Arc::from(name.into()),
                providers: Mutex::new(HashMap::new()),
                root_service: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn add_component(&self, component: Component) -> Result<(), ComponentError> {
        self.get_provider(component.name()).set_component(component)
    }

    /// Returns the provider for `name`, creating an empty one on first use.
    pub fn get_provider(&self, name: &str) -> Provider {
        let mut providers = self.providers();
        if let Some(provider) = providers.get(name) {
            return provider.clone();
        }
        let provider = Provider::new(name, self);
        providers.insert(Arc::from(name), provider.clone());
        provider
    }

    /// Looks up an existing provider without creating one.
    pub fn find_provider(&self, name: &str) -> Option<Provider> {
        self.providers().get(name).cloned()
    }

    pub fn get_providers(&self) -> Vec<Provider> {
        self.providers().values().cloned().collect()
    }

    pub fn attach_root_service(&self, service: DynService) {
        *self.root_slot() = Some(service);
    }

    /// Drops the root service so the owning app and its container can be freed.
    pub fn detach_root_service(&self) {
        self.root_slot().take();
    }

    pub fn root_service<T: 'static + Send + Sync>(&self) -> Option<Arc<T>> {
        self.root_slot()
            .as_ref()
            .and_then(|service| service.clone().downcast::<T>().ok())
    }

    fn providers(&self) -> MutexGuard<'_, HashMap<Arc<str>, Provider>> {
        self.inner
            .providers
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn root_slot(&self) -> MutexGuard<'_, Option<DynService>> {
        self.inner
            .root_service
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl std::fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("name", &self.name())
            .finish()
    }
}
