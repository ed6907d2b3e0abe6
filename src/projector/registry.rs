use std::collections::HashMap;

use crate::{
    config::Config,
    error::{ConfigError, Result},
    projector::{AppendProjector, BundleProjector, Projector},
};

type ProjectorFactory = Box<dyn Fn(&Config) -> Result<Box<dyn Projector>> + Send + Sync>;

/// Registry for managing available projector variants
///
/// Variants are registered by name and built from a [`Config`] on demand.
pub struct ProjectorRegistry {
    variants: HashMap<String, ProjectorFactory>,
}

impl ProjectorRegistry {
    /// Create a new registry with all built-in variants
    pub fn new() -> Self {
        let mut registry = Self {
            variants: HashMap::new(),
        };

        registry.register_builtin_variants();
        registry
    }

    fn register_builtin_variants(&mut self) {
        self.register("append", |config: &Config| {
            let variant = &config.variant;
            let mut projector = AppendProjector::new(config.projector.clone(), variant.layout.clone())
                .with_extension(variant.extension.clone());
            if let Some(entry) = &variant.player_entry {
                projector = projector.with_player_entry(entry.clone());
            }
            Ok(Box::new(projector) as Box<dyn Projector>)
        });

        self.register("bundle", |config: &Config| {
            let projector = BundleProjector::new(config.projector.clone())
                .with_movie_name(config.variant.movie_name.clone());
            Ok(Box::new(projector) as Box<dyn Projector>)
        });
    }

    /// Register a custom variant
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name for the variant
    /// * `factory` - Function that builds the variant from a configuration
    pub fn register<S, F>(&mut self, name: S, factory: F)
    where
        S: Into<String>,
        F: Fn(&Config) -> Result<Box<dyn Projector>> + Send + Sync + 'static,
    {
        self.variants.insert(name.into(), Box::new(factory));
    }

    /// Build the variant named by `config.variant.kind`
    pub fn create(&self, config: &Config) -> Result<Box<dyn Projector>> {
        self.create_named(&config.variant.kind, config)
    }

    /// Build a variant by name
    pub fn create_named(&self, name: &str, config: &Config) -> Result<Box<dyn Projector>> {
        let factory = self.variants.get(name).ok_or_else(|| ConfigError::InvalidValue {
            key: "variant.kind".to_string(),
            value: name.to_string(),
        })?;
        factory(config)
    }

    /// Get all available variant names, sorted
    pub fn available_variants(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variants.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name and description of every variant, sorted by name
    pub fn describe_variants(&self, config: &Config) -> Result<Vec<(String, String)>> {
        self.available_variants()
            .into_iter()
            .map(|name| {
                let projector = self.create_named(&name, config)?;
                let description = projector.description().to_string();
                Ok((name, description))
            })
            .collect()
    }

    /// Check if a variant is available
    pub fn has_variant(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    /// Get the number of registered variants
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Default for ProjectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectorError;

    #[test]
    fn test_builtin_variants_available() {
        let registry = ProjectorRegistry::new();

        assert!(registry.has_variant("append"));
        assert!(registry.has_variant("bundle"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.available_variants(), vec!["append", "bundle"]);
    }

    #[test]
    fn test_create_from_config() {
        let registry = ProjectorRegistry::new();
        let mut config = Config::default();

        let projector = registry.create(&config).unwrap();
        assert_eq!(projector.name(), "append");

        config.variant.kind = "bundle".to_string();
        let projector = registry.create(&config).unwrap();
        assert_eq!(projector.name(), "bundle");
        assert_eq!(projector.projector_file_name("Game"), "Game.app");
    }

    #[test]
    fn test_unknown_variant() {
        let registry = ProjectorRegistry::new();
        let mut config = Config::default();
        config.variant.kind = "flash-lite".to_string();

        let err = registry.create(&config).err().unwrap();
        assert!(matches!(err, ProjectorError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_describe_variants() {
        let registry = ProjectorRegistry::new();
        let described = registry.describe_variants(&Config::default()).unwrap();

        let names: Vec<&str> = described.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["append", "bundle"]);
        assert!(described.iter().all(|(_, description)| !description.is_empty()));
    }

    #[test]
    fn test_custom_variant_registration() {
        let mut registry = ProjectorRegistry::new();

        registry.register("custom", |config: &Config| {
            Ok(Box::new(BundleProjector::new(config.projector.clone())) as Box<dyn Projector>)
        });

        assert!(registry.has_variant("custom"));
        assert_eq!(registry.len(), 3);
    }
}
