use std::sync::Arc;

use crate::component::types::{ComponentType, InstanceFactory, InstantiationMode};

/// A named service recipe that can be attached to an app's container.
#[derive(Clone)]
pub struct Component {
    name: Arc<str>,
    pub(crate) instance_factory: InstanceFactory,
    ty: ComponentType,
    instantiation_mode: InstantiationMode,
}

impl Component {
    pub fn new(name: impl Into<String>, instance_factory: InstanceFactory, ty: ComponentType) -> Self {
        Self {
            name: Arc::from(name.into()),
            instance_factory,
            ty,
            instantiation_mode: InstantiationMode::Lazy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component_type(&self) -> ComponentType {
        self.ty
    }

    pub fn instantiation_mode(&self) -> InstantiationMode {
        self.instantiation_mode
    }

    pub fn with_instantiation_mode(mut self, mode: InstantiationMode) -> Self {
        self.instantiation_mode = mode;
        self
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name())
            .field("type", &self.ty)
            .field("instantiation_mode", &self.instantiation_mode)
            .finish()
    }
}
