//! Filter registry: unique names mapped to filter factories.
//!
//! Registration is explicit. [`register_builtin_filters`] registers every
//! unit shipped with the crate, and [`global`] lazily builds a process-wide
//! registry that way. Custom pipelines can build their own
//! [`FilterRegistry`] and add factories for additional units or alternate
//! capture backends.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::config::{Descriptor, Params};
use crate::error::{FilterError, Result};
use crate::filters::{Affine, Filter, Flip, Move, Noise, Webcam, Zoom};

/// Builds a boxed filter from caller parameters.
pub type FilterFactory = Arc<dyn Fn(&Params) -> Result<Box<dyn Filter>> + Send + Sync>;

/// One registered filter type.
#[derive(Clone)]
pub struct FilterEntry {
    name: String,
    config: fn() -> Descriptor,
    factory: FilterFactory,
}

impl FilterEntry {
    pub fn new<N: Into<String>>(name: N, config: fn() -> Descriptor, factory: FilterFactory) -> Self {
        FilterEntry {
            name: name.into(),
            config,
            factory,
        }
    }

    /// Entry for a filter type built through [`Filter::from_params`].
    pub fn of<F: Filter + 'static>(name: &str) -> Self {
        Self::new(
            name,
            F::config,
            Arc::new(|params: &Params| -> Result<Box<dyn Filter>> {
                Ok(Box::new(F::from_params(params)?))
            }),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> Descriptor {
        (self.config)()
    }

    pub fn build(&self, params: &Params) -> Result<Box<dyn Filter>> {
        (self.factory)(params)
    }
}

impl fmt::Debug for FilterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEntry").field("name", &self.name).finish()
    }
}

/// Name to filter-type mapping.
#[derive(Debug, Default, Clone)]
pub struct FilterRegistry {
    entries: HashMap<String, FilterEntry>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        FilterRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registry holding every built-in filter.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for entry in builtin_entries() {
            registry.entries.insert(entry.name().to_string(), entry);
        }
        registry
    }

    /// Add an entry; fails if the name is taken.
    pub fn register(&mut self, entry: FilterEntry) -> Result<()> {
        if self.entries.contains_key(entry.name()) {
            return Err(FilterError::AlreadyRegistered(entry.name().to_string()));
        }
        debug!(filter = entry.name(), "registered filter");
        self.entries.insert(entry.name().to_string(), entry);
        Ok(())
    }

    /// Register a filter type under `name`.
    pub fn register_filter<F: Filter + 'static>(&mut self, name: &str) -> Result<()> {
        self.register(FilterEntry::of::<F>(name))
    }

    pub fn resolve(&self, name: &str) -> Result<&FilterEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| FilterError::NotFound(name.to_string()))
    }

    /// Resolve `name` and build it from `params`.
    pub fn build(&self, name: &str, params: &Params) -> Result<Box<dyn Filter>> {
        let filter = self.resolve(name)?.build(params)?;
        debug!(filter = name, "built filter");
        Ok(filter)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Names of the built-in filters.
pub const BUILTIN_FILTERS: [&str; 6] = ["affine", "flip", "move", "noise", "webcam", "zoom"];

fn builtin_entries() -> [FilterEntry; 6] {
    [
        FilterEntry::of::<Affine>("affine"),
        FilterEntry::of::<Flip>("flip"),
        FilterEntry::of::<Move>("move"),
        FilterEntry::of::<Noise>("noise"),
        FilterEntry::of::<Webcam>("webcam"),
        FilterEntry::of::<Zoom>("zoom"),
    ]
}

/// Register every built-in filter.
///
/// Stops at the first name that is already taken and returns
/// [`FilterError::AlreadyRegistered`]; entries before it stay registered.
pub fn register_builtin_filters(registry: &mut FilterRegistry) -> Result<()> {
    for entry in builtin_entries() {
        registry.register(entry)?;
    }
    Ok(())
}

static GLOBAL: OnceLock<FilterRegistry> = OnceLock::new();

/// Process-wide registry with the built-in filters.
pub fn global() -> &'static FilterRegistry {
    GLOBAL.get_or_init(FilterRegistry::with_builtin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameContext;
    use ndarray::Array3;

    #[test]
    fn test_builtin_names() {
        let registry = FilterRegistry::with_builtin();
        assert_eq!(registry.names(), BUILTIN_FILTERS.to_vec());
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = FilterRegistry::with_builtin();
        let err = registry.register_filter::<Flip>("flip").unwrap_err();
        assert!(matches!(err, FilterError::AlreadyRegistered(ref name) if name == "flip"));
        assert_eq!(registry.len(), BUILTIN_FILTERS.len());
    }

    #[test]
    fn test_register_builtin_into_empty_registry() {
        let mut registry = FilterRegistry::new();
        register_builtin_filters(&mut registry).unwrap();
        assert_eq!(registry.names(), BUILTIN_FILTERS.to_vec());
    }

    #[test]
    fn test_register_builtin_reports_taken_name() {
        let mut registry = FilterRegistry::new();
        registry.register_filter::<Zoom>("flip").unwrap();

        let err = register_builtin_filters(&mut registry).unwrap_err();

        assert!(matches!(err, FilterError::AlreadyRegistered(ref name) if name == "flip"));
        // The pre-registered entry is not replaced
        assert_eq!(registry.resolve("flip").unwrap().config(), Zoom::config());
    }

    #[test]
    fn test_resolve_unknown_fails() {
        let registry = FilterRegistry::with_builtin();
        assert!(matches!(
            registry.resolve("blur"),
            Err(FilterError::NotFound(_))
        ));
    }

    #[test]
    fn test_build_and_apply() {
        let registry = FilterRegistry::with_builtin();
        let mut flip = registry
            .build("flip", &Params::new().with("horizontal", false).with("vertical", true))
            .unwrap();
        assert_eq!(flip.name(), "flip");

        let mut img = Array3::<u8>::zeros((2, 1, 3));
        img[[0, 0, 0]] = 9;
        let result = flip.apply(img, &FrameContext::default()).unwrap();
        assert_eq!(result[[1, 0, 0]], 9);
    }

    #[test]
    fn test_build_propagates_invalid_parameter() {
        let registry = FilterRegistry::with_builtin();
        let err = registry
            .build("zoom", &Params::new().with("horizontal", 0.05))
            .err()
            .unwrap();
        assert!(matches!(err, FilterError::InvalidParameter { .. }));
    }

    #[test]
    fn test_entry_config() {
        let registry = FilterRegistry::with_builtin();
        for name in registry.names() {
            let config = registry.resolve(name).unwrap().config();
            assert!(config.validate_schema().is_ok(), "{name}");
        }
        assert!(registry.resolve("noise").unwrap().config().is_empty());
    }

    #[test]
    fn test_custom_factory() {
        let mut registry = FilterRegistry::new();
        registry
            .register(FilterEntry::new(
                "mirror",
                Flip::config,
                Arc::new(|_params: &Params| -> Result<Box<dyn Filter>> {
                    Ok(Box::new(Flip::new(Default::default())))
                }),
            ))
            .unwrap();
        assert!(registry.contains("mirror"));
        assert!(registry.build("mirror", &Params::new()).is_ok());
    }

    #[test]
    fn test_global_registry() {
        assert!(global().contains("zoom"));
        assert!(std::ptr::eq(global(), global()));
    }
}
