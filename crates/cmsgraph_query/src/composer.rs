//! Fragment composition.
//!
//! [`FragmentComposer`] walks a content type's properties and produces the
//! named fragment for it together with every fragment it depends on. The
//! caller threads one [`FragmentGraph`] through a whole query so each
//! fragment name is emitted once, whatever the shape of the reference graph.

use crate::allowed::AllowListResolver;
use crate::fragments::{
    base_type_fragment, component_union, fragment, fragment_name, BASE_FRAGMENTS,
    COMPONENT_UNION, COMPOSITION_NODE, DAM_FRAGMENTS, EXPERIENCE, EXPERIENCE_SPREAD,
    ICONTENT_SPREAD, TYPENAME,
};
use crate::graph::FragmentGraph;
use cmsgraph_schema::{BaseType, ContentTypeDefinition, SchemaRegistry, SchemaResult};
use indexmap::IndexSet;
use tracing::{debug, trace};

/// Composes GraphQL fragments for registered content types.
#[derive(Debug, Clone)]
pub struct FragmentComposer<'r> {
    registry: &'r SchemaRegistry,
    pub(crate) resolver: AllowListResolver<'r>,
}

impl<'r> FragmentComposer<'r> {
    /// Creates a composer with a fresh snapshot of the registry's type list.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            resolver: AllowListResolver::new(registry),
        }
    }

    /// Rebuilds the cached type list from the registry.
    pub fn refresh(&mut self) {
        self.resolver = AllowListResolver::new(self.registry);
        debug!(
            types = self.resolver.all_types().len(),
            "refreshed content type cache"
        );
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn resolver(&self) -> &AllowListResolver<'r> {
        &self.resolver
    }

    /// Composes the fragment named `<key><suffix>` and its dependencies.
    ///
    /// Returns an empty list when the fragment was already started in
    /// `graph`; the caller that started it emits it. The composed fragment is
    /// always the last element of a non-empty result.
    pub fn compose_fragment(
        &self,
        key: &str,
        graph: &mut FragmentGraph,
        suffix: &str,
        include_base_fragments: bool,
        dam_enabled: bool,
    ) -> SchemaResult<Vec<String>> {
        if let Some(base) = BaseType::parse(key) {
            return Ok(compose_base_type(base, graph));
        }

        let name = format!("{key}{suffix}");
        if !graph.visit(&name) {
            trace!(fragment = %name, "fragment already visited");
            return Ok(Vec::new());
        }

        let registry = self.registry;
        let content_type = registry.get(key)?;

        let mut fields = IndexSet::new();
        fields.insert(TYPENAME.to_string());
        let mut extra = IndexSet::new();
        let mut uses_dam_assets = false;

        for (property_name, property) in content_type.indexed_properties() {
            let compiled =
                self.compile_property(property_name, property, key, suffix, graph, dam_enabled)?;
            fields.extend(compiled.fields);
            extra.extend(compiled.fragments);
            uses_dam_assets |= compiled.uses_dam_assets;
        }

        if include_base_fragments {
            extra = prepend(BASE_FRAGMENTS, extra);
            fields.insert(ICONTENT_SPREAD.to_string());
        }

        if content_type.base_type == BaseType::Experience {
            fields.insert(EXPERIENCE_SPREAD.to_string());
            extra.extend(self.experience_fragments(graph, dam_enabled)?);
        }

        if uses_dam_assets {
            extra = prepend(DAM_FRAGMENTS, extra);
        }

        debug!(
            fragment = %name,
            fields = fields.len(),
            dependencies = extra.len(),
            "composed fragment"
        );
        extra.insert(fragment(&name, &name, fields.iter().map(String::as_str)));
        Ok(extra.into_iter().collect())
    }

    /// Fragments describing a visual composition, emitted once per query.
    fn experience_fragments(
        &self,
        graph: &mut FragmentGraph,
        dam_enabled: bool,
    ) -> SchemaResult<Vec<String>> {
        if !graph.visit(COMPONENT_UNION) {
            return Ok(Vec::new());
        }

        let mut extra = IndexSet::new();
        extra.insert(COMPOSITION_NODE.to_string());
        extra.insert(EXPERIENCE.to_string());

        let composable: Vec<&ContentTypeDefinition> = self
            .registry
            .content_types()
            .filter(|ct| ct.is_composable())
            .collect();

        for content_type in &composable {
            graph.add_edge(COMPONENT_UNION, &content_type.key);
            extra.extend(self.compose_fragment(
                &content_type.key,
                graph,
                "",
                true,
                dam_enabled,
            )?);
        }

        extra.insert(component_union(
            composable.iter().map(|ct| fragment_name(&ct.key)),
        ));
        Ok(extra.into_iter().collect())
    }
}

/// Built-in base types have one fixed shape whatever the suffix.
fn compose_base_type(base: BaseType, graph: &mut FragmentGraph) -> Vec<String> {
    if !graph.visit(base.graph_name()) {
        return Vec::new();
    }
    BASE_FRAGMENTS
        .iter()
        .map(|f| (*f).to_string())
        .chain(std::iter::once(base_type_fragment(base)))
        .collect()
}

/// Returns `items` followed by `rest`, keeping first occurrences.
fn prepend<const N: usize>(items: [&str; N], rest: IndexSet<String>) -> IndexSet<String> {
    items
        .into_iter()
        .map(str::to_string)
        .chain(rest)
        .collect()
}
