//! Schema definitions for cmsgraph.
//!
//! This crate provides the types an application uses to declare its content model:
//! - `model`: Content types, properties and base types
//! - `display`: Display templates and composition display settings
//! - `registry`: The replaceable in-memory catalog of definitions
//! - `error`: Schema errors

pub mod display;
pub mod error;
pub mod model;
pub mod registry;

pub use display::{
    parse_display_settings, DisplaySetting, DisplaySettingChoice, DisplaySettingEditor,
    DisplaySettingEntry, DisplayTemplateDefinition, DisplayTemplateTarget, NodeType,
};
pub use error::{SchemaError, SchemaResult};
pub use model::{
    BaseType, CompositionBehavior, ContentTypeDefinition, IndexingType, PropertyDefinition,
    PropertyKind, SELF_REFERENCE,
};
pub use registry::SchemaRegistry;
