//! Content-type model.
//!
//! Definitions deserialize from the camelCase JSON shape used by content-type
//! manifests, e.g.
//!
//! ```json
//! {
//!   "key": "Article",
//!   "baseType": "_page",
//!   "properties": {
//!     "title": { "type": "string" },
//!     "body": { "type": "richText" },
//!     "related": { "type": "array", "items": { "type": "content", "allowedTypes": ["_self"] } }
//!   }
//! }
//! ```

use crate::error::{SchemaError, SchemaResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Allow-list entry that resolves to the content type declaring the property.
pub const SELF_REFERENCE: &str = "_self";

/// Built-in CMS base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    #[serde(rename = "_page")]
    Page,
    #[serde(rename = "_experience")]
    Experience,
    #[serde(rename = "_section")]
    Section,
    #[serde(rename = "_component")]
    Component,
    #[serde(rename = "_element")]
    Element,
    #[serde(rename = "_image")]
    Image,
    #[serde(rename = "_video")]
    Video,
    #[serde(rename = "_media")]
    Media,
    #[serde(rename = "_folder")]
    Folder,
}

impl BaseType {
    pub const ALL: [BaseType; 9] = [
        Self::Page,
        Self::Experience,
        Self::Section,
        Self::Component,
        Self::Element,
        Self::Image,
        Self::Video,
        Self::Media,
        Self::Folder,
    ];

    /// Base types that user-defined media types can extend.
    pub const MEDIA: [BaseType; 3] = [Self::Image, Self::Video, Self::Media];

    /// Returns the key used in definitions (`_image`).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Page => "_page",
            Self::Experience => "_experience",
            Self::Section => "_section",
            Self::Component => "_component",
            Self::Element => "_element",
            Self::Image => "_image",
            Self::Video => "_video",
            Self::Media => "_media",
            Self::Folder => "_folder",
        }
    }

    /// Returns the GraphQL type name exposed by Graph (`_Image`).
    pub const fn graph_name(self) -> &'static str {
        match self {
            Self::Page => "_Page",
            Self::Experience => "_Experience",
            Self::Section => "_Section",
            Self::Component => "_Component",
            Self::Element => "_Element",
            Self::Image => "_Image",
            Self::Video => "_Video",
            Self::Media => "_Media",
            Self::Folder => "_Folder",
        }
    }

    /// Parses either the definition key or the GraphQL type name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|base| base.key() == name || base.graph_name() == name)
    }

    /// Returns true for the media bases (image, video, generic media).
    pub const fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Media)
    }

    /// Returns true for bases that are never a concrete member of a content union.
    pub const fn is_structural(self) -> bool {
        !self.is_media()
    }
}

impl std::fmt::Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Capabilities a content type has inside a visual composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositionBehavior {
    SectionEnabled,
    ElementEnabled,
}

/// Search indexing mode for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexingType {
    Searchable,
    Queryable,
    Disabled,
}

/// The kind of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PropertyKind {
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
    ContentReference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allowed_types: Option<Vec<String>>,
    },
    /// Embeds another content type's properties inline.
    Component { content_type: String },
    /// Polymorphic reference to any allowed content type.
    Content {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allowed_types: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        restricted_types: Option<Vec<String>>,
    },
    Array { items: Box<PropertyDefinition> },
}

/// A property attached to a content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    #[serde(flatten)]
    pub kind: PropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexing_type: Option<IndexingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl PropertyDefinition {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            indexing_type: None,
            display_name: None,
            required: false,
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyKind::String)
    }

    pub fn integer() -> Self {
        Self::new(PropertyKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(PropertyKind::Float)
    }

    pub fn boolean() -> Self {
        Self::new(PropertyKind::Boolean)
    }

    pub fn date_time() -> Self {
        Self::new(PropertyKind::DateTime)
    }

    pub fn json() -> Self {
        Self::new(PropertyKind::Json)
    }

    pub fn rich_text() -> Self {
        Self::new(PropertyKind::RichText)
    }

    pub fn url() -> Self {
        Self::new(PropertyKind::Url)
    }

    pub fn link() -> Self {
        Self::new(PropertyKind::Link)
    }

    pub fn content_reference() -> Self {
        Self::new(PropertyKind::ContentReference {
            allowed_types: None,
        })
    }

    /// A property embedding the content type `key` inline.
    pub fn component(key: impl Into<String>) -> Self {
        Self::new(PropertyKind::Component {
            content_type: key.into(),
        })
    }

    /// A polymorphic content property accepting every registered type.
    pub fn content() -> Self {
        Self::new(PropertyKind::Content {
            allowed_types: None,
            restricted_types: None,
        })
    }

    pub fn array(items: PropertyDefinition) -> Self {
        Self::new(PropertyKind::Array {
            items: Box::new(items),
        })
    }

    /// Sets the allow-list of a `content` or `contentReference` property.
    #[must_use]
    pub fn allowed<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = types.into_iter().map(Into::into).collect();
        match &mut self.kind {
            PropertyKind::Content { allowed_types, .. }
            | PropertyKind::ContentReference { allowed_types } => *allowed_types = Some(list),
            PropertyKind::Array { items } => **items = (**items).clone().allowed(list),
            _ => {}
        }
        self
    }

    /// Sets the restrict-list of a `content` property.
    #[must_use]
    pub fn restricted<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = types.into_iter().map(Into::into).collect();
        match &mut self.kind {
            PropertyKind::Content {
                restricted_types, ..
            } => *restricted_types = Some(list),
            PropertyKind::Array { items } => **items = (**items).clone().restricted(list),
            _ => {}
        }
        self
    }

    #[must_use]
    pub fn indexing(mut self, indexing_type: IndexingType) -> Self {
        self.indexing_type = Some(indexing_type);
        self
    }

    /// Shorthand for `indexing(IndexingType::Disabled)`.
    #[must_use]
    pub fn disabled(self) -> Self {
        self.indexing(IndexingType::Disabled)
    }

    /// Returns true unless indexing has been disabled for this property.
    pub fn is_indexed(&self) -> bool {
        self.indexing_type != Some(IndexingType::Disabled)
    }

    /// Returns the innermost kind, looking through arrays.
    pub fn item_kind(&self) -> &PropertyKind {
        match &self.kind {
            PropertyKind::Array { items } => items.item_kind(),
            kind => kind,
        }
    }

    pub(crate) fn validate(&self, owner: &str, name: &str) -> SchemaResult<()> {
        match &self.kind {
            PropertyKind::Array { items } => {
                if matches!(items.kind, PropertyKind::Array { .. }) {
                    return Err(SchemaError::invalid(
                        owner,
                        format!("property \"{name}\" is an array of arrays"),
                    ));
                }
                items.validate(owner, name)
            }
            PropertyKind::Component { content_type } if content_type.is_empty() => Err(
                SchemaError::invalid(owner, format!("component property \"{name}\" has no type")),
            ),
            _ => Ok(()),
        }
    }
}

/// A content type declared by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeDefinition {
    pub key: String,
    pub base_type: BaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub may_contain_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub composition_behaviors: Vec<CompositionBehavior>,
}

impl ContentTypeDefinition {
    pub fn new(key: impl Into<String>, base_type: BaseType) -> Self {
        Self {
            key: key.into(),
            base_type,
            display_name: None,
            properties: IndexMap::new(),
            may_contain_types: None,
            composition_behaviors: Vec::new(),
        }
    }

    /// Adds a property, keeping declaration order.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, property: PropertyDefinition) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    #[must_use]
    pub fn behavior(mut self, behavior: CompositionBehavior) -> Self {
        if !self.composition_behaviors.contains(&behavior) {
            self.composition_behaviors.push(behavior);
        }
        self
    }

    #[must_use]
    pub fn may_contain<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.may_contain_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Properties that take part in queries, in declaration order.
    pub fn indexed_properties(&self) -> impl Iterator<Item = (&String, &PropertyDefinition)> {
        self.properties.iter().filter(|(_, p)| p.is_indexed())
    }

    /// Returns true if the type declares properties and every one of them is disabled.
    pub fn is_fully_disabled(&self) -> bool {
        !self.properties.is_empty() && self.properties.values().all(|p| !p.is_indexed())
    }

    /// Returns true if the type can appear inside a visual composition.
    pub fn is_composable(&self) -> bool {
        self.base_type == BaseType::Section || !self.composition_behaviors.is_empty()
    }

    pub(crate) fn validate(&self) -> SchemaResult<()> {
        if self.key.is_empty() {
            return Err(SchemaError::invalid("", "content type key is empty"));
        }
        if BaseType::parse(&self.key).is_some() || self.key == SELF_REFERENCE {
            return Err(SchemaError::invalid(
                &self.key,
                "key is reserved for a built-in type",
            ));
        }
        for (name, property) in &self.properties {
            property.validate(&self.key, name)?;
        }
        Ok(())
    }
}
