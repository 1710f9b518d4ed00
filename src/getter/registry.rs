use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ClashGetter, CustomGetter, Getter, GetterError, Options, SubscribeGetter, WebFuzzGetter,
};

/// Builds a getter from its options, failing on misconfiguration
pub type GetterFactory = fn(&Options) -> Result<Box<dyn Getter>, GetterError>;

/// Name to factory table
///
/// Filled before the collection starts and only read afterwards, so it can
/// be shared by reference.
#[derive(Default)]
pub struct GetterRegistry {
    factories: HashMap<String, GetterFactory>,
}

impl GetterRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in getters
    pub fn with_builtins() -> Self {
        let builtins: [(&str, GetterFactory); 4] = [
            ("subscribe", |o| Ok(Box::new(SubscribeGetter::new(o)?))),
            ("clash", |o| Ok(Box::new(ClashGetter::new(o)?))),
            ("custom", |o| Ok(Box::new(CustomGetter::new(o)?))),
            ("webfuzz", |o| Ok(Box::new(WebFuzzGetter::new(o)?))),
        ];

        let mut registry = Self::new();
        for (name, factory) in builtins {
            registry.register(name, factory);
        }
        registry
    }

    /// Add or replace the factory for `name`
    pub fn register(&mut self, name: &str, factory: GetterFactory) -> &mut Self {
        self.factories.insert(name.to_string(), factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn build(&self, kind: &str, options: &Options) -> Result<Arc<dyn Getter>, GetterError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| GetterError::UnknownGetter(kind.to_string()))?;
        factory(options).map(Arc::from)
    }
}
