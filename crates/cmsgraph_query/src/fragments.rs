//! Fixed GraphQL fragments shared by every generated document.
//!
//! Every literal fragment lives here so that the composer never spells one
//! out twice.

use cmsgraph_schema::BaseType;

pub const TYPENAME: &str = "__typename";

pub const CONTENT_URL: &str =
    "fragment ContentUrl on ContentUrl { type default hierarchical internal graph base }";

pub const MEDIA_METADATA: &str =
    "fragment MediaMetadata on MediaMetadata { mimeType thumbnail content }";

pub const ITEM_METADATA: &str =
    "fragment ItemMetadata on ItemMetadata { changeset displayOption }";

pub const INSTANCE_METADATA: &str = "fragment InstanceMetadata on InstanceMetadata { changeset locales expired container owner routeSegment lastModifiedBy path createdBy }";

pub const CONTENT_METADATA: &str = "fragment IContentMetadata on IContentMetadata { key locale fallbackForLocale version displayName url { ...ContentUrl } types published status created lastModified sortOrder variation ...MediaMetadata ...ItemMetadata ...InstanceMetadata }";

pub const ICONTENT: &str = "fragment _IContent on _IContent { _id _metadata { ...IContentMetadata } }";

/// Spread selecting `_id` and `_metadata`.
pub const ICONTENT_SPREAD: &str = "..._IContent";

/// Fragments required by [`ICONTENT_SPREAD`], dependencies first.
pub const BASE_FRAGMENTS: [&str; 6] = [
    MEDIA_METADATA,
    ITEM_METADATA,
    INSTANCE_METADATA,
    CONTENT_URL,
    CONTENT_METADATA,
    ICONTENT,
];

// DAM assets

pub const PUBLIC_IMAGE_ASSET: &str = "fragment PublicImageAsset on cmp_PublicImageAsset { Url Title AltText Description MimeType Height Width Renditions { Id Name Url Width Height } FocalPoint { X Y } Tags { Guid Name } }";

pub const PUBLIC_VIDEO_ASSET: &str = "fragment PublicVideoAsset on cmp_PublicVideoAsset { Url Title AltText Description MimeType Renditions { Id Name Url Width Height } Tags { Guid Name } }";

pub const PUBLIC_RAW_FILE_ASSET: &str = "fragment PublicRawFileAsset on cmp_PublicRawFileAsset { Url Title Description MimeType Tags { Guid Name } }";

pub const CONTENT_REFERENCE_ITEM: &str = "fragment ContentReferenceItem on ContentReference { item { __typename ...PublicImageAsset ...PublicVideoAsset ...PublicRawFileAsset } }";

pub const CONTENT_REFERENCE_ITEM_SPREAD: &str = "...ContentReferenceItem";

/// GraphQL type probed to detect whether DAM is enabled on the instance.
pub const DAM_PROBE_TYPE: &str = "cmp_PublicImageAsset";

pub const DAM_FRAGMENTS: [&str; 4] = [
    PUBLIC_IMAGE_ASSET,
    PUBLIC_VIDEO_ASSET,
    PUBLIC_RAW_FILE_ASSET,
    CONTENT_REFERENCE_ITEM,
];

pub const DAM_FRAGMENT_NAMES: [&str; 4] = [
    "PublicImageAsset",
    "PublicVideoAsset",
    "PublicRawFileAsset",
    "ContentReferenceItem",
];

// Visual composition

/// Composition node shape. `nodes @recursive` lets Graph resolve any depth of rows and columns.
pub const COMPOSITION_NODE: &str = "fragment ICompositionNode on ICompositionNode { __typename key type nodeType layoutType displayName displayTemplateKey displaySettings { key value } ...on CompositionStructureNode { nodes @recursive } ...on CompositionComponentNode { nodeType component { ..._IComponent } } }";

pub const EXPERIENCE: &str =
    "fragment _IExperience on _IExperience { composition { ...ICompositionNode } }";

pub const EXPERIENCE_SPREAD: &str = "..._IExperience";

/// Name of the union fragment spreading every composable content type.
pub const COMPONENT_UNION: &str = "_IComponent";

/// Suffix of fragments describing a content type embedded as a component property.
pub const PROPERTY_SUFFIX: &str = "Property";

/// Builds `fragment <name> on <type_condition> { <fields> }`.
pub fn fragment<'a>(
    name: &str,
    type_condition: &str,
    fields: impl IntoIterator<Item = &'a str>,
) -> String {
    let fields: Vec<&str> = fields.into_iter().collect();
    format!(
        "fragment {name} on {type_condition} {{ {} }}",
        fields.join(" ")
    )
}

/// Builds the `_IComponent` fragment spreading each composable type.
pub fn component_union<'a>(spreads: impl IntoIterator<Item = &'a str>) -> String {
    let fields = std::iter::once(TYPENAME.to_string())
        .chain(spreads.into_iter().map(|name| format!("...{name}")))
        .collect::<Vec<_>>();
    fragment(
        COMPONENT_UNION,
        COMPONENT_UNION,
        fields.iter().map(String::as_str),
    )
}

/// Fragment selected when a built-in base type is a union member.
pub fn base_type_fragment(base: BaseType) -> String {
    fragment(
        base.graph_name(),
        base.graph_name(),
        [TYPENAME, ICONTENT_SPREAD],
    )
}

/// Returns the fragment name used for a content-type key.
///
/// Built-in base types use their GraphQL type name; user types use their key.
pub fn fragment_name(key: &str) -> &str {
    BaseType::parse(key).map_or(key, |base| base.graph_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_builder() {
        assert_eq!(
            fragment("Hero", "Hero", ["__typename", "title"]),
            "fragment Hero on Hero { __typename title }"
        );
    }

    #[test]
    fn test_component_union() {
        assert_eq!(
            component_union(["Hero", "Card"]),
            "fragment _IComponent on _IComponent { __typename ...Hero ...Card }"
        );
        assert_eq!(
            component_union([]),
            "fragment _IComponent on _IComponent { __typename }"
        );
    }

    #[test]
    fn test_base_type_fragment() {
        assert_eq!(
            base_type_fragment(BaseType::Image),
            "fragment _Image on _Image { __typename ..._IContent }"
        );
    }

    #[test]
    fn test_fragment_name() {
        assert_eq!(fragment_name("_image"), "_Image");
        assert_eq!(fragment_name("_Video"), "_Video");
        assert_eq!(fragment_name("Article"), "Article");
    }

    #[test]
    fn test_dam_fragment_names_match_definitions() {
        for (name, definition) in DAM_FRAGMENT_NAMES.iter().zip(DAM_FRAGMENTS) {
            assert!(definition.starts_with(&format!("fragment {name} on ")));
        }
    }
}
