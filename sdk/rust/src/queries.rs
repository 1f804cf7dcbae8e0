//! Fixed query documents sent by the client.

/// Probes the concrete type of an item and whether DAM assets are available.
///
/// `damAssetType` is null unless the Graph instance exposes DAM asset types.
pub const CONTENT_METADATA_QUERY: &str = r#"query GetContentMetadata($where: _ContentWhereInput, $locale: [Locales]) {
  _Content(where: $where, locale: $locale) {
    item {
      _metadata {
        types
      }
    }
  }
  damAssetType: __type(name: "cmp_PublicImageAsset") {
    __typename
  }
}"#;

/// Lists the pages on the path from the site root to an item.
pub const ANCESTOR_PATH_QUERY: &str = r#"query GetAncestorPath($where: _ContentWhereInput, $locale: [Locales]) {
  _Content(where: $where, locale: $locale) {
    item {
      _id
      _link(type: PATH) {
        _Page {
          items {
            _metadata {
              key
              displayName
              locale
              types
              sortOrder
              url { base hierarchical default }
            }
          }
        }
      }
    }
  }
}"#;

/// Lists the pages directly below an item.
pub const CHILD_ITEMS_QUERY: &str = r#"query GetChildItems($where: _ContentWhereInput, $locale: [Locales]) {
  _Content(where: $where, locale: $locale) {
    item {
      _id
      _link(type: ITEMS) {
        _Page {
          items {
            _metadata {
              key
              displayName
              locale
              types
              sortOrder
              url { base hierarchical default }
            }
          }
        }
      }
    }
  }
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use cmsgraph_query::DAM_PROBE_TYPE;

    #[test]
    fn test_probe_targets_dam_type() {
        assert!(CONTENT_METADATA_QUERY.contains(&format!("__type(name: \"{DAM_PROBE_TYPE}\")")));
    }

    #[test]
    fn test_link_types() {
        assert!(ANCESTOR_PATH_QUERY.contains("_link(type: PATH)"));
        assert!(CHILD_ITEMS_QUERY.contains("_link(type: ITEMS)"));
    }
}
