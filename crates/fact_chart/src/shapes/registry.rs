//! Shape factory trait and the name-keyed registry used by scene assembly.
//!
//! - Implement [`ShapeFactory`] (or wrap a closure in [`FnFactory`]) for custom shapes.
//! - [`ShapeRegistry::with_builtins`] registers every [`ShapeKind`] under its canonical name
//!   and its legacy `create*` alias.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::shapes::node::ShapeNode;
use crate::shapes::options::{OptionsSchema, ShapeOptions};
use crate::shapes::ShapeKind;

/// Turns converted options into a node tree.
///
/// Factories must not fail: malformed options fall back to documented defaults.
pub trait ShapeFactory: Send + Sync {
    /// Declared option fields, used to convert raw options before [`create`](Self::create).
    fn schema(&self) -> OptionsSchema {
        OptionsSchema::EMPTY
    }

    fn create(&self, options: &ShapeOptions) -> ShapeNode;
}

/// A [`ShapeFactory`] backed by a closure.
pub struct FnFactory<F> {
    schema: OptionsSchema,
    f: F,
}

impl<F> FnFactory<F>
where
    F: Fn(&ShapeOptions) -> ShapeNode + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            schema: OptionsSchema::EMPTY,
            f,
        }
    }

    pub fn with_schema(mut self, schema: OptionsSchema) -> Self {
        self.schema = schema;
        self
    }
}

impl<F> ShapeFactory for FnFactory<F>
where
    F: Fn(&ShapeOptions) -> ShapeNode + Send + Sync,
{
    fn schema(&self) -> OptionsSchema {
        self.schema
    }

    fn create(&self, options: &ShapeOptions) -> ShapeNode {
        (self.f)(options)
    }
}

/// Shape factories keyed by type name.
#[derive(Clone)]
pub struct ShapeRegistry {
    factories: HashMap<String, Arc<dyn ShapeFactory>>,
}

impl ShapeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with all built-in shapes under canonical and legacy names.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in ShapeKind::ALL {
            let factory: Arc<dyn ShapeFactory> = Arc::new(kind);
            registry.register_arc(kind.name(), Arc::clone(&factory));
            registry.register_arc(kind.legacy_name(), factory);
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registers `factory` under `name`, replacing any previous registration.
    pub fn register<T>(&mut self, name: impl Into<String>, factory: T)
    where
        T: ShapeFactory + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn register_arc(&mut self, name: impl Into<String>, factory: Arc<dyn ShapeFactory>) {
        self.factories.insert(name.into(), factory);
    }

    /// Returns `true` if a factory was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ShapeFactory>> {
        self.factories.get(name).cloned()
    }

    /// Converts `raw` through the factory's schema and builds the node.
    pub fn create(&self, name: &str, raw: &Map<String, Value>) -> Result<ShapeNode> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::UnknownShapeType {
                name: name.to_string(),
            })?;
        let options = ShapeOptions::convert(&factory.schema(), raw);
        Ok(factory.create(&options))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("names", &self.names())
            .finish()
    }
}
