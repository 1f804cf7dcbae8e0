//! The schema registry.
//!
//! Holds every content type and display template the application declared.
//! Registration replaces the previous set wholesale; nothing is merged.

use crate::display::{DisplayTemplateDefinition, DisplayTemplateTarget};
use crate::error::{SchemaError, SchemaResult};
use crate::model::{BaseType, ContentTypeDefinition};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// In-memory catalog of content types and display templates.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    content_types: IndexMap<String, ContentTypeDefinition>,
    display_templates: IndexMap<String, DisplayTemplateDefinition>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `definitions`.
    pub fn with_content_types(
        definitions: impl IntoIterator<Item = ContentTypeDefinition>,
    ) -> SchemaResult<Self> {
        let mut registry = Self::new();
        registry.register(definitions)?;
        Ok(registry)
    }

    /// Replaces every registered content type with `definitions`.
    ///
    /// On error the registry is left untouched.
    pub fn register(
        &mut self,
        definitions: impl IntoIterator<Item = ContentTypeDefinition>,
    ) -> SchemaResult<()> {
        let mut content_types = IndexMap::new();
        for definition in definitions {
            definition.validate()?;
            if content_types.contains_key(&definition.key) {
                return Err(SchemaError::DuplicateKey(definition.key));
            }
            content_types.insert(definition.key.clone(), definition);
        }
        self.content_types = content_types;
        Ok(())
    }

    /// Replaces every registered display template with `templates`.
    pub fn register_display_templates(
        &mut self,
        templates: impl IntoIterator<Item = DisplayTemplateDefinition>,
    ) -> SchemaResult<()> {
        let mut display_templates = IndexMap::new();
        for template in templates {
            if display_templates.contains_key(&template.key) {
                return Err(SchemaError::DuplicateKey(template.key));
            }
            display_templates.insert(template.key.clone(), template);
        }
        self.display_templates = display_templates;
        Ok(())
    }

    /// Looks up a content type by key.
    pub fn lookup(&self, key: &str) -> Option<&ContentTypeDefinition> {
        self.content_types.get(key)
    }

    /// Looks up a content type, failing with `MissingContentType`.
    pub fn get(&self, key: &str) -> SchemaResult<&ContentTypeDefinition> {
        self.lookup(key)
            .ok_or_else(|| SchemaError::MissingContentType(key.to_string()))
    }

    /// Returns every content type extending `base_type`, in registration order.
    pub fn lookup_by_base_type(&self, base_type: BaseType) -> Vec<&ContentTypeDefinition> {
        self.content_types
            .values()
            .filter(|ct| ct.base_type == base_type)
            .collect()
    }

    /// Returns all content types in registration order.
    pub fn content_types(&self) -> impl Iterator<Item = &ContentTypeDefinition> {
        self.content_types.values()
    }

    /// Returns true if a content type or built-in base type exists with this key.
    pub fn has_type(&self, key: &str) -> bool {
        self.content_types.contains_key(key) || BaseType::parse(key).is_some()
    }

    /// Returns the number of registered content types.
    pub fn len(&self) -> usize {
        self.content_types.len()
    }

    /// Returns true if no content types are registered.
    pub fn is_empty(&self) -> bool {
        self.content_types.is_empty()
    }

    /// Looks up a display template by key.
    pub fn display_template(&self, key: &str) -> Option<&DisplayTemplateDefinition> {
        self.display_templates.get(key)
    }

    /// Returns the templates for a target, default templates first.
    pub fn display_templates_for(
        &self,
        target: &DisplayTemplateTarget,
    ) -> Vec<&DisplayTemplateDefinition> {
        let mut templates: Vec<_> = self
            .display_templates
            .values()
            .filter(|t| &t.target == target)
            .collect();
        templates.sort_by_key(|t| !t.is_default);
        templates
    }

    /// Returns the rendering tag of a display template, if it has one.
    pub fn display_template_tag(&self, key: &str) -> Option<&str> {
        self.display_template(key).and_then(|t| t.tag.as_deref())
    }

    /// Returns the keys of types referenced by properties but never registered.
    pub fn unresolved_references(&self) -> Vec<String> {
        use crate::model::{PropertyKind, SELF_REFERENCE};

        let mut missing = FxHashSet::default();
        let mut ordered = Vec::new();
        let mut check = |key: &str| {
            if key != SELF_REFERENCE && !self.has_type(key) && missing.insert(key.to_string()) {
                ordered.push(key.to_string());
            }
        };
        for ct in self.content_types.values() {
            for property in ct.properties.values() {
                match property.item_kind() {
                    PropertyKind::Component { content_type } => check(content_type.as_str()),
                    PropertyKind::Content {
                        allowed_types,
                        restricted_types,
                    } => {
                        for key in allowed_types.iter().chain(restricted_types).flatten() {
                            check(key.as_str());
                        }
                    }
                    _ => {}
                }
            }
        }
        ordered
    }
}
