use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::component::container::ComponentContainer;

pub type DynService = Arc<dyn Any + Send + Sync>;

/// When a provider builds its instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstantiationMode {
    /// On first lookup.
    Lazy,
    /// As soon as the component is attached to a container.
    Eager,
    /// Only through [`Provider::initialize`](crate::component::Provider::initialize).
    Explicit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    Public,
    Private,
}

pub type InstanceFactory =
    Arc<dyn Fn(&ComponentContainer, &Value) -> Result<DynService, ComponentError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    MismatchingComponent { expected: String, found: String },
    ComponentAlreadyProvided { name: String },
    InstanceAlreadyInitialized { name: String },
    InitializationFailed { name: String, reason: String },
    InstanceUnavailable { name: String },
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentError::MismatchingComponent { expected, found } => {
                write!(f, "Component {found} cannot satisfy provider for {expected}")
            }
            ComponentError::ComponentAlreadyProvided { name } => {
                write!(f, "Component {name} has already been registered")
            }
            ComponentError::InstanceAlreadyInitialized { name } => {
                write!(f, "{name} has already been initialized")
            }
            ComponentError::InitializationFailed { name, reason } => {
                write!(f, "Component {name} failed to initialize: {reason}")
            }
            ComponentError::InstanceUnavailable { name } => {
                write!(f, "Service {name} is not available")
            }
        }
    }
}

impl std::error::Error for ComponentError {}
