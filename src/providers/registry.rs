//! Registry for managing catalog provider plugins.

use std::collections::HashMap;
use std::sync::Arc;

use super::{DoubanProvider, GoogleBooksProvider, LanguageFamily, OpenLibraryProvider, Provider};

/// Registry for all available catalog providers.
///
/// Providers are kept in registration order so the merged candidate stream
/// (and therefore tie-breaking in the ranker) is deterministic.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    order: Vec<String>,
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create a registry with the standard providers
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(GoogleBooksProvider::new()));
        registry.register(Arc::new(OpenLibraryProvider::new()));
        registry.register(Arc::new(DoubanProvider::new()));
        registry
    }

    /// Create an empty registry (tests inject mocks)
    pub fn empty() -> Self {
        Self {
            order: Vec::new(),
            providers: HashMap::new(),
        }
    }

    /// Register a provider
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        let id = provider.id().to_string();
        if !self.providers.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.providers.insert(id, provider);
    }

    /// Get a provider by id
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(id)
    }

    /// All providers, in registration order
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Provider>> {
        self.order.iter().filter_map(|id| self.providers.get(id))
    }

    /// Providers serving the given script family, in registration order
    pub fn with_family(&self, family: LanguageFamily) -> Vec<&Arc<dyn Provider>> {
        self.all().filter(|p| p.language_family() == family).collect()
    }

    /// Whether a provider is registered
    pub fn has(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
