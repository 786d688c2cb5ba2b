#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use commitgate_contracts::{Controller, ControllerId};

use crate::error::RegistryError;

/// Identity -> live controller instance. Resolution happens per update.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: BTreeMap<ControllerId, Arc<dyn Controller>>,
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.controllers.keys()).finish()
    }
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: ControllerId,
        controller: Arc<dyn Controller>,
    ) -> Result<(), RegistryError> {
        if self.controllers.contains_key(&id) {
            return Err(RegistryError::DuplicateController { controller: id });
        }
        self.controllers.insert(id, controller);
        Ok(())
    }

    pub fn resolve(&self, id: &ControllerId) -> Option<Arc<dyn Controller>> {
        self.controllers.get(id).cloned()
    }

    pub fn contains(&self, id: &ControllerId) -> bool {
        self.controllers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
