//! Property compilation.
//!
//! Turns one property definition into the field selections it contributes to
//! its owner's fragment, plus any fragments those selections depend on.

use crate::composer::FragmentComposer;
use crate::fragments::{
    fragment_name, CONTENT_REFERENCE_ITEM_SPREAD, CONTENT_URL, PROPERTY_SUFFIX, TYPENAME,
};
use crate::graph::FragmentGraph;
use cmsgraph_schema::{BaseType, PropertyDefinition, PropertyKind, SchemaResult};
use indexmap::IndexSet;

/// The output of compiling a single property.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompiledProperty {
    /// Selections added to the owning fragment.
    pub fields: Vec<String>,
    /// Fragment definitions the selections depend on.
    pub fragments: Vec<String>,
    /// Whether the selections spread DAM asset fragments.
    pub uses_dam_assets: bool,
}

impl FragmentComposer<'_> {
    /// Compiles property `name` of the type `root_key`.
    ///
    /// Scalar fields are aliased `<root_key><suffix>__<name>` because Graph
    /// rejects fragments selecting one field name with conflicting types.
    pub fn compile_property(
        &self,
        name: &str,
        property: &PropertyDefinition,
        root_key: &str,
        suffix: &str,
        graph: &mut FragmentGraph,
        dam_enabled: bool,
    ) -> SchemaResult<CompiledProperty> {
        let owner = format!("{}{suffix}", fragment_name(root_key));
        let mut compiled = CompiledProperty::default();

        match &property.kind {
            PropertyKind::String
            | PropertyKind::Integer
            | PropertyKind::Float
            | PropertyKind::Boolean
            | PropertyKind::DateTime
            | PropertyKind::Binary
            | PropertyKind::Json => {
                compiled
                    .fields
                    .push(format!("{root_key}{suffix}__{name}:{name}"));
            }
            PropertyKind::RichText => {
                compiled.fields.push(format!("{name} {{ html, json }}"));
            }
            PropertyKind::Url => {
                compiled.fields.push(format!("{name} {{ ...ContentUrl }}"));
                compiled.fragments.push(CONTENT_URL.to_string());
            }
            PropertyKind::Link => {
                compiled.fields.push(format!(
                    "{name} {{ text title target url {{ ...ContentUrl }} }}"
                ));
                compiled.fragments.push(CONTENT_URL.to_string());
            }
            PropertyKind::ContentReference { .. } => {
                let field = if dam_enabled {
                    format!(
                        "{name} {{ key url {{ ...ContentUrl }} {CONTENT_REFERENCE_ITEM_SPREAD} }}"
                    )
                } else {
                    format!("{name} {{ key url {{ ...ContentUrl }} }}")
                };
                compiled.fields.push(field);
                compiled.fragments.push(CONTENT_URL.to_string());
                compiled.uses_dam_assets = dam_enabled;
            }
            PropertyKind::Component { content_type } => {
                let target = match BaseType::parse(content_type) {
                    Some(base) => base.graph_name().to_string(),
                    None => format!("{content_type}{PROPERTY_SUFFIX}"),
                };
                graph.add_edge(&owner, &target);
                compiled.fragments = self.compose_fragment(
                    content_type,
                    graph,
                    PROPERTY_SUFFIX,
                    false,
                    dam_enabled,
                )?;
                compiled.fields.push(format!("{name} {{ ...{target} }}"));
            }
            PropertyKind::Content {
                allowed_types,
                restricted_types,
            } => {
                let types = self.resolver.resolve(
                    allowed_types.as_deref(),
                    restricted_types.as_deref(),
                    root_key,
                );

                let mut selections = IndexSet::new();
                selections.insert(TYPENAME.to_string());
                for key in &types {
                    let target = fragment_name(key);
                    graph.add_edge(&owner, target);
                    compiled
                        .fragments
                        .extend(self.compose_fragment(key, graph, "", true, dam_enabled)?);
                    selections.insert(format!("...{target}"));
                }

                let selections: Vec<String> = selections.into_iter().collect();
                compiled
                    .fields
                    .push(format!("{name} {{ {} }}", selections.join(" ")));
            }
            PropertyKind::Array { items } => {
                return self.compile_property(name, items, root_key, suffix, graph, dam_enabled);
            }
        }

        Ok(compiled)
    }
}
