//! Response shape inference.
//!
//! Describes the JSON a generated query returns for a content type once
//! alias prefixes have been stripped, so callers can check or generate typed
//! models without running a query.

use crate::allowed::AllowListResolver;
use crate::fragments::{fragment_name, PROPERTY_SUFFIX, TYPENAME};
use cmsgraph_schema::{
    BaseType, ContentTypeDefinition, PropertyDefinition, PropertyKind, SchemaRegistry,
    SchemaResult,
};
use indexmap::IndexMap;
use serde::Serialize;

/// The type of one field in a normalized response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ShapeNode {
    TypeName,
    Id,
    Metadata,
    Composition,
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    Binary,
    Json,
    RichText,
    Url,
    Link,
    ContentReference,
    Component { content_type: String },
    Content { allowed_types: Vec<String> },
    List { items: Box<ShapeNode> },
}

/// The normalized response shape of one content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentShape {
    pub key: String,
    pub type_name: String,
    pub fields: IndexMap<String, ShapeNode>,
}

impl ContentShape {
    pub fn field(&self, name: &str) -> Option<&ShapeNode> {
        self.fields.get(name)
    }
}

/// Infers the shape of a top-level item of type `key`.
pub fn infer_shape(registry: &SchemaRegistry, key: &str) -> SchemaResult<ContentShape> {
    let resolver = AllowListResolver::new(registry);
    let mut shape = ContentShape {
        key: key.to_string(),
        type_name: fragment_name(key).to_string(),
        fields: IndexMap::new(),
    };
    shape.fields.insert(TYPENAME.to_string(), ShapeNode::TypeName);
    shape.fields.insert("_id".to_string(), ShapeNode::Id);
    shape.fields.insert("_metadata".to_string(), ShapeNode::Metadata);

    if BaseType::parse(key).is_some() {
        return Ok(shape);
    }

    let content_type = registry.get(key)?;
    insert_properties(&mut shape.fields, content_type, &resolver);
    if content_type.base_type == BaseType::Experience {
        shape
            .fields
            .insert("composition".to_string(), ShapeNode::Composition);
    }
    Ok(shape)
}

/// Infers the shape of `key` embedded as a component property.
pub fn infer_component_shape(registry: &SchemaRegistry, key: &str) -> SchemaResult<ContentShape> {
    let resolver = AllowListResolver::new(registry);
    let content_type = registry.get(key)?;
    let mut fields = IndexMap::new();
    fields.insert(TYPENAME.to_string(), ShapeNode::TypeName);
    insert_properties(&mut fields, content_type, &resolver);
    Ok(ContentShape {
        key: key.to_string(),
        type_name: format!("{key}{PROPERTY_SUFFIX}"),
        fields,
    })
}

fn insert_properties(
    fields: &mut IndexMap<String, ShapeNode>,
    content_type: &ContentTypeDefinition,
    resolver: &AllowListResolver<'_>,
) {
    for (name, property) in content_type.indexed_properties() {
        fields.insert(name.clone(), node(property, &content_type.key, resolver));
    }
}

fn node(
    property: &PropertyDefinition,
    root_key: &str,
    resolver: &AllowListResolver<'_>,
) -> ShapeNode {
    match &property.kind {
        PropertyKind::String => ShapeNode::String,
        PropertyKind::Integer => ShapeNode::Integer,
        PropertyKind::Float => ShapeNode::Float,
        PropertyKind::Boolean => ShapeNode::Boolean,
        PropertyKind::DateTime => ShapeNode::DateTime,
        PropertyKind::Binary => ShapeNode::Binary,
        PropertyKind::Json => ShapeNode::Json,
        PropertyKind::RichText => ShapeNode::RichText,
        PropertyKind::Url => ShapeNode::Url,
        PropertyKind::Link => ShapeNode::Link,
        PropertyKind::ContentReference { .. } => ShapeNode::ContentReference,
        PropertyKind::Component { content_type } => ShapeNode::Component {
            content_type: content_type.clone(),
        },
        PropertyKind::Content {
            allowed_types,
            restricted_types,
        } => ShapeNode::Content {
            allowed_types: resolver
                .resolve(allowed_types.as_deref(), restricted_types.as_deref(), root_key)
                .iter()
                .map(|key| fragment_name(key).to_string())
                .collect(),
        },
        PropertyKind::Array { items } => ShapeNode::List {
            items: Box::new(node(items, root_key, resolver)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::with_content_types([
            ContentTypeDefinition::new("Landing", BaseType::Experience)
                .property("title", PropertyDefinition::string())
                .property("hidden", PropertyDefinition::integer().disabled())
                .property("hero", PropertyDefinition::component("Hero"))
                .property(
                    "tiles",
                    PropertyDefinition::array(
                        PropertyDefinition::content().allowed(["Hero", "_image"]),
                    ),
                ),
            ContentTypeDefinition::new("Hero", BaseType::Component)
                .property("heading", PropertyDefinition::string())
                .property("cta", PropertyDefinition::link()),
        ])
        .unwrap()
    }

    #[test]
    fn test_infer_shape() {
        let registry = registry();
        let shape = infer_shape(&registry, "Landing").unwrap();

        let names: Vec<&str> = shape.fields.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            ["__typename", "_id", "_metadata", "title", "hero", "tiles", "composition"]
        );
        assert_eq!(
            shape.field("tiles"),
            Some(&ShapeNode::List {
                items: Box::new(ShapeNode::Content {
                    allowed_types: vec!["Hero".into(), "_Image".into()],
                }),
            })
        );
        assert!(shape.field("hidden").is_none());
    }

    #[test]
    fn test_component_shape() {
        let registry = registry();
        let shape = infer_component_shape(&registry, "Hero").unwrap();

        assert_eq!(shape.type_name, "HeroProperty");
        assert!(shape.field("_id").is_none());
        assert_eq!(shape.field("cta"), Some(&ShapeNode::Link));
    }

    #[test]
    fn test_shape_serializes() {
        let registry = registry();
        let shape = infer_shape(&registry, "Landing").unwrap();
        let value = serde_json::to_value(&shape).unwrap();

        assert_eq!(value["typeName"], "Landing");
        assert_eq!(
            value["fields"]["hero"],
            json!({ "kind": "component", "contentType": "Hero" })
        );
    }

    #[test]
    fn test_base_type_shape() {
        let shape = infer_shape(&SchemaRegistry::new(), "_video").unwrap();
        assert_eq!(shape.type_name, "_Video");
        assert_eq!(shape.fields.len(), 3);
    }
}
