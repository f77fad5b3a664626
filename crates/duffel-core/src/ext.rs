//! Extension registration and lookup
//!
//! A minimal registry for named extensions: register exported beings
//! under a namespace-local name, then look them up, iterate them, or
//! test for their presence. Several extensions may share a name; `get`
//! returns the first registered, `get_all` returns every one.
//!
//! Extensions are stored as `Arc<T>`, so `T` may be a trait object:
//!
//! ```rust
//! use std::sync::Arc;
//! use duffel_core::ExtensionRegistry;
//!
//! trait Renderer: Send + Sync {
//!     fn render(&self, input: &str) -> String;
//! }
//!
//! struct Plain;
//! impl Renderer for Plain {
//!     fn render(&self, input: &str) -> String {
//!         input.to_string()
//!     }
//! }
//!
//! let mut registry: ExtensionRegistry<dyn Renderer> = ExtensionRegistry::new();
//! registry.register("plain", Arc::new(Plain));
//!
//! let plain = registry.get("plain").unwrap();
//! assert_eq!(plain.render("hi"), "hi");
//! ```

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// A registry of named extensions
pub struct ExtensionRegistry<T: ?Sized> {
    /// `name` <-> `extensions list` map, in registration order
    extensions: IndexMap<String, Vec<Arc<T>>>,
}

impl<T: ?Sized> ExtensionRegistry<T> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            extensions: IndexMap::new(),
        }
    }

    /// Register an extension under a name
    ///
    /// Duplicate names are allowed; later registrations are appended and
    /// reachable through [`ExtensionRegistry::get_all`].
    pub fn register(&mut self, name: impl Into<String>, extension: Arc<T>) {
        let name = name.into();
        log::debug!("registering extension '{}'", name);
        self.extensions.entry(name).or_default().push(extension);
    }

    /// Register an extension, refusing duplicate names
    ///
    /// With `force` set, an existing registration list is replaced
    /// instead.
    pub fn register_unique(
        &mut self,
        name: impl Into<String>,
        extension: Arc<T>,
        force: bool,
    ) -> Result<()> {
        let name = name.into();
        if !force && self.extensions.contains_key(&name) {
            return Err(Error::already_registered(&name));
        }
        log::debug!("registering extension '{}' (unique)", name);
        self.extensions.insert(name, vec![extension]);
        Ok(())
    }

    /// Get the first extension registered under a name
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.extensions
            .get(name)
            .and_then(|list| list.first())
            .map(Arc::clone)
    }

    /// Get every extension registered under a name
    ///
    /// Returns a copied list so callers cannot disturb the registry.
    pub fn get_all(&self, name: &str) -> Vec<Arc<T>> {
        self.extensions.get(name).cloned().unwrap_or_default()
    }

    /// Names that have at least one registered extension
    pub fn names(&self) -> Vec<&str> {
        self.extensions.keys().map(String::as_str).collect()
    }

    /// Check whether an extension with a given name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    /// Iterate `(name, extension)` pairs, flattening duplicate names
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
        self.extensions
            .iter()
            .flat_map(|(name, list)| list.iter().map(move |ext| (name.as_str(), ext)))
    }

    /// Number of distinct registered names
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether the registry has no registrations
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl<T: ?Sized> Default for ExtensionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    trait Markup: Send + Sync {
        fn render(&self, input: &str) -> String;
    }

    struct Plain;
    impl Markup for Plain {
        fn render(&self, input: &str) -> String {
            input.to_string()
        }
    }

    struct Loud;
    impl Markup for Loud {
        fn render(&self, input: &str) -> String {
            input.to_uppercase()
        }
    }

    fn markup_registry() -> ExtensionRegistry<dyn Markup> {
        let mut registry: ExtensionRegistry<dyn Markup> = ExtensionRegistry::new();
        registry.register("plain", Arc::new(Plain));
        registry.register("loud", Arc::new(Loud));
        registry
    }

    #[test]
    fn test_get_by_name() {
        let registry = markup_registry();

        assert_eq!(registry.get("loud").unwrap().render("hi"), "HI");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let mut registry = markup_registry();
        registry.register("plain", Arc::new(Loud));

        // get returns the first registration
        assert_eq!(registry.get("plain").unwrap().render("hi"), "hi");
        // get_all returns both, in registration order
        let all = registry.get_all("plain");
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].render("hi"), "HI");
    }

    #[test]
    fn test_get_all_missing_is_empty() {
        let registry = markup_registry();
        assert!(registry.get_all("missing").is_empty());
    }

    #[test]
    fn test_register_unique() {
        let mut registry = markup_registry();

        let err = registry
            .register_unique("plain", Arc::new(Loud), false)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyRegistered);

        registry
            .register_unique("plain", Arc::new(Loud), true)
            .unwrap();
        assert_eq!(registry.get_all("plain").len(), 1);
        assert_eq!(registry.get("plain").unwrap().render("hi"), "HI");
    }

    #[test]
    fn test_names_and_contains() {
        let registry = markup_registry();

        assert_eq!(registry.names(), vec!["plain", "loud"]);
        assert!(registry.contains("plain"));
        assert!(!registry.contains("missing"));
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_iter_flattens_duplicates() {
        let mut registry = markup_registry();
        registry.register("plain", Arc::new(Loud));

        let pairs: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(pairs, vec!["plain", "plain", "loud"]);
    }

    #[test]
    fn test_non_trait_object_payload() {
        let mut registry: ExtensionRegistry<String> = ExtensionRegistry::new();
        registry.register("greeting", Arc::new("hello".to_string()));

        assert_eq!(registry.get("greeting").unwrap().as_str(), "hello");
    }
}
