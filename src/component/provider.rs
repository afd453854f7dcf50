use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde_json::Value;

use crate::component::component::Component;
use crate::component::container::{ComponentContainer, ComponentContainerInner};
use crate::component::types::{ComponentError, ComponentType, DynService, InstantiationMode};

/// Owns at most one service instance built from the component registered
/// under its name. A provider with no component never yields an instance.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    name: Arc<str>,
    container: Weak<ComponentContainerInner>,
    component: Mutex<Option<Component>>,
    instance: Mutex<Option<DynService>>,
    options: Mutex<Value>,
}

impl Provider {
    pub(crate) fn new(name: &str, container: &ComponentContainer) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                name: Arc::from(name),
                container: Arc::downgrade(&container.inner),
                component: Mutex::new(None),
                instance: Mutex::new(None),
                options: Mutex::new(Value::Null),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn component_type(&self) -> Option<ComponentType> {
        lock(&self.inner.component)
            .as_ref()
            .map(Component::component_type)
    }

    pub fn is_component_set(&self) -> bool {
        lock(&self.inner.component).is_some()
    }

    pub fn is_initialized(&self) -> bool {
        lock(&self.inner.instance).is_some()
    }

    pub fn options(&self) -> Value {
        lock(&self.inner.options).clone()
    }

    pub fn clear_instance(&self) {
        lock(&self.inner.instance).take();
        *lock(&self.inner.options) = Value::Null;
    }

    pub fn delete(&self) {
        self.clear_instance();
    }

    /// Returns the instance, building it unless the component is explicit-only.
    /// Missing components and factory failures both yield `None`.
    pub fn get_immediate<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync + 'static,
    {
        self.get_checked::<T>().ok()
    }

    pub fn get_checked<T>(&self) -> Result<Arc<T>, ComponentError>
    where
        T: Any + Send + Sync + 'static,
    {
        match self.get_or_initialize(Value::Null, false)? {
            Some(service) => self.downcast(service),
            None => Err(self.unavailable()),
        }
    }

    pub fn initialize<T>(&self, options: Value) -> Result<Arc<T>, ComponentError>
    where
        T: Any + Send + Sync + 'static,
    {
        if self.is_initialized() {
            return Err(ComponentError::InstanceAlreadyInitialized {
                name: self.name().to_string(),
            });
        }
        match self.get_or_initialize(options, true)? {
            Some(service) => self.downcast(service),
            None => Err(self.unavailable()),
        }
    }

    pub fn set_component(&self, component: Component) -> Result<(), ComponentError> {
        if component.name() != self.name() {
            return Err(ComponentError::MismatchingComponent {
                expected: self.name().to_string(),
                found: component.name().to_string(),
            });
        }

        let eager = component.instantiation_mode() == InstantiationMode::Eager;
        {
            let mut slot = lock(&self.inner.component);
            if slot.is_some() {
                return Err(ComponentError::ComponentAlreadyProvided {
                    name: self.name().to_string(),
                });
            }
            *slot = Some(component);
        }

        if eager {
            // Eager failures resurface on the first lookup.
            let _ = self.get_or_initialize(Value::Null, true);
        }
        Ok(())
    }

    fn get_or_initialize(
        &self,
        options: Value,
        force: bool,
    ) -> Result<Option<DynService>, ComponentError> {
        let mut instance = lock(&self.inner.instance);
        if let Some(existing) = instance.as_ref() {
            return Ok(Some(existing.clone()));
        }

        let component = match lock(&self.inner.component).clone() {
            Some(component) => component,
            None => return Ok(None),
        };

        if !force && component.instantiation_mode() == InstantiationMode::Explicit {
            return Ok(None);
        }

        let container = match self.inner.container.upgrade() {
            Some(inner) => ComponentContainer { inner },
            None => {
                return Err(ComponentError::InitializationFailed {
                    name: self.name().to_string(),
                    reason: "container dropped".into(),
                });
            }
        };

        let service = (component.instance_factory)(&container, &options).map_err(|err| {
            ComponentError::InitializationFailed {
                name: self.name().to_string(),
                reason: err.to_string(),
            }
        })?;

        *instance = Some(service.clone());
        *lock(&self.inner.options) = options;
        Ok(Some(service))
    }

    fn downcast<T>(&self, service: DynService) -> Result<Arc<T>, ComponentError>
    where
        T: Any + Send + Sync + 'static,
    {
        service.downcast::<T>().map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> ComponentError {
        ComponentError::InstanceUnavailable {
            name: self.name().to_string(),
        }
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name())
            .field("component_set", &self.is_component_set())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}
