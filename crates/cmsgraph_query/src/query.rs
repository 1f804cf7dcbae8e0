//! Full query documents.

use crate::composer::FragmentComposer;
use crate::fragments::fragment_name;
use crate::graph::FragmentGraph;
use cmsgraph_schema::{SchemaRegistry, SchemaResult};
use tracing::debug;

/// Which query shell wraps the root fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Selects `_Content.item`.
    SingleItem,
    /// Selects `_Content.items`.
    MultiItem,
}

impl QueryKind {
    pub fn operation_name(self) -> &'static str {
        match self {
            QueryKind::SingleItem => "GetContent",
            QueryKind::MultiItem => "ListContent",
        }
    }

    fn selection(self) -> &'static str {
        match self {
            QueryKind::SingleItem => "item",
            QueryKind::MultiItem => "items",
        }
    }
}

/// Builds query documents from a registry.
///
/// Each build starts from a fresh [`FragmentGraph`] and a refreshed type
/// cache, so documents are independent of one another.
#[derive(Debug, Clone)]
pub struct QueryBuilder<'r> {
    composer: FragmentComposer<'r>,
    graph: FragmentGraph,
}

impl<'r> QueryBuilder<'r> {
    /// Creates a new query builder.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            composer: FragmentComposer::new(registry),
            graph: FragmentGraph::new(),
        }
    }

    /// The fragment graph of the last document built.
    pub fn graph(&self) -> &FragmentGraph {
        &self.graph
    }

    /// Fragments of the last document that reference themselves, directly or
    /// through other fragments.
    pub fn recursive_fragments(&self) -> Vec<&str> {
        self.graph
            .nodes()
            .filter(|name| self.graph.is_cyclic(name))
            .collect()
    }

    /// Builds the document for `key`.
    ///
    /// The document takes the variables `$where: _ContentWhereInput` and
    /// `$locale: [Locales]`.
    pub fn build(&mut self, kind: QueryKind, key: &str, dam_enabled: bool) -> SchemaResult<String> {
        self.composer.refresh();
        let mut graph = FragmentGraph::new();
        let fragments = self
            .composer
            .compose_fragment(key, &mut graph, "", true, dam_enabled)?;

        let root = fragment_name(key);
        let mut document = String::new();
        for fragment in &fragments {
            document.push_str(fragment);
            document.push('\n');
        }
        document.push_str(&format!(
            "query {}($where: _ContentWhereInput, $locale: [Locales]) {{\n  \
             _Content(where: $where, locale: $locale) {{\n    \
             {} {{ ...{root} }}\n  }}\n}}\n",
            kind.operation_name(),
            kind.selection(),
        ));

        self.graph = graph;
        debug!(
            content_type = key,
            operation = kind.operation_name(),
            fragments = fragments.len(),
            recursive = self.recursive_fragments().len(),
            dam_enabled,
            "built query document"
        );
        Ok(document)
    }
}

/// Builds a document selecting a single item of type `key`.
pub fn build_single_item_query(
    registry: &SchemaRegistry,
    key: &str,
    dam_enabled: bool,
) -> SchemaResult<String> {
    QueryBuilder::new(registry).build(QueryKind::SingleItem, key, dam_enabled)
}

/// Builds a document selecting every item of type `key` matching the filter.
pub fn build_multi_item_query(
    registry: &SchemaRegistry,
    key: &str,
    dam_enabled: bool,
) -> SchemaResult<String> {
    QueryBuilder::new(registry).build(QueryKind::MultiItem, key, dam_enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmsgraph_schema::{BaseType, ContentTypeDefinition, PropertyDefinition, SchemaError};

    fn registry() -> SchemaRegistry {
        SchemaRegistry::with_content_types([
            ContentTypeDefinition::new("Article", BaseType::Page)
                .property("title", PropertyDefinition::string())
                .property("image", PropertyDefinition::content_reference())
                .property(
                    "related",
                    PropertyDefinition::array(PropertyDefinition::content().allowed(["_self"])),
                ),
            ContentTypeDefinition::new("Photo", BaseType::Image),
        ])
        .unwrap()
    }

    fn assert_balanced(document: &str) {
        let mut depth = 0i32;
        for c in document.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0, "unbalanced braces in\n{document}");
        }
        assert_eq!(depth, 0, "unbalanced braces in\n{document}");
    }

    #[test]
    fn test_single_item_query() {
        let registry = registry();
        let document = build_single_item_query(&registry, "Article", false).unwrap();

        assert!(document.contains(
            "query GetContent($where: _ContentWhereInput, $locale: [Locales]) {"
        ));
        assert!(document.contains("_Content(where: $where, locale: $locale) {"));
        assert!(document.contains("item { ...Article }"));
        assert!(document.contains("fragment Article on Article {"));
        assert!(!document.contains("PublicImageAsset"));
        assert_balanced(&document);
    }

    #[test]
    fn test_multi_item_query() {
        let registry = registry();
        let document = build_multi_item_query(&registry, "Article", true).unwrap();

        assert!(document.contains("query ListContent("));
        assert!(document.contains("items { ...Article }"));
        assert_eq!(document.matches("fragment PublicImageAsset ").count(), 1);
        assert_balanced(&document);
    }

    #[test]
    fn test_every_fragment_defined_once() {
        let registry = registry();
        let document = build_multi_item_query(&registry, "Article", true).unwrap();

        let mut names: Vec<&str> = document
            .lines()
            .filter(|line| line.starts_with("fragment "))
            .filter_map(|line| line.split_whitespace().nth(1))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_builds_are_independent() {
        let registry = registry();
        let mut builder = QueryBuilder::new(&registry);
        let first = builder.build(QueryKind::SingleItem, "Article", false).unwrap();
        let second = builder.build(QueryKind::SingleItem, "Article", false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_recursive_fragments() {
        let registry = registry();
        let mut builder = QueryBuilder::new(&registry);
        builder.build(QueryKind::SingleItem, "Article", false).unwrap();

        assert_eq!(builder.recursive_fragments(), ["Article"]);
        assert!(builder
            .graph()
            .edges()
            .any(|edge| edge == ("Article", "Article")));

        builder.build(QueryKind::SingleItem, "_image", false).unwrap();
        assert!(builder.recursive_fragments().is_empty());
        assert_eq!(builder.graph().edges().count(), 0);
    }

    #[test]
    fn test_base_type_root() {
        let registry = registry();
        for key in ["_image", "_Image"] {
            let document = build_single_item_query(&registry, key, false).unwrap();
            assert!(document.contains("item { ..._Image }"));
            assert!(document.contains("fragment _Image on _Image { __typename ..._IContent }"));
        }
    }

    fn fragment_names(document: &str) -> (Vec<&str>, Vec<&str>) {
        let is_name = |c: char| c.is_alphanumeric() || c == '_';
        let spreads = document
            .split_whitespace()
            .filter_map(|token| token.strip_prefix("..."))
            .map(|name| name.trim_end_matches(|c: char| !is_name(c)))
            .filter(|name| !name.is_empty() && *name != "on")
            .collect();
        let definitions = document
            .lines()
            .filter(|line| line.starts_with("fragment "))
            .filter_map(|line| line.split_whitespace().nth(1))
            .collect();
        (spreads, definitions)
    }

    #[test]
    fn test_component_of_base_type() {
        let registry = SchemaRegistry::with_content_types([ContentTypeDefinition::new(
            "Article",
            BaseType::Page,
        )
        .property("pic", PropertyDefinition::component("_image"))])
        .unwrap();
        let document = build_single_item_query(&registry, "Article", false).unwrap();

        assert!(document.contains("pic { ..._Image }"));
        assert!(!document.contains("_imageProperty"));

        let (spreads, definitions) = fragment_names(&document);
        for spread in &spreads {
            assert!(definitions.contains(spread), "`{spread}` is not defined");
        }
        for definition in &definitions {
            assert!(spreads.contains(definition), "`{definition}` is never spread");
        }
        assert_balanced(&document);
    }

    #[test]
    fn test_unknown_root_type() {
        let registry = registry();
        assert_eq!(
            build_single_item_query(&registry, "Nope", false).unwrap_err(),
            SchemaError::MissingContentType("Nope".into())
        );
    }
}
