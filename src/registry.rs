//! Generated shell functions, keyed by name.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, ScriptError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First definition under this name.
    Defined,
    /// Same definition was already registered; nothing changed.
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    definitions: HashMap<String, String>,
    // Definition order, for deterministic listing
    order: Vec<String>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `definition` under `name`.
    ///
    /// Registering the identical definition again is a no-op; a different
    /// definition for a known name is an error and leaves the registry as is.
    pub fn define(&mut self, name: &str, definition: &str) -> Result<Registration> {
        if let Some(existing) = self.definitions.get(name) {
            if existing == definition {
                return Ok(Registration::Unchanged);
            }
            return Err(ScriptError::DuplicateFunction(name.to_string()));
        }
        debug!(name, "registered function");
        self.definitions.insert(name.to_string(), definition.to_string());
        self.order.push(name.to_string());
        Ok(Registration::Defined)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Names in the order they were first defined.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
