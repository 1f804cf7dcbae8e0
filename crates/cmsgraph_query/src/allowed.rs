//! Allow-list resolution for polymorphic `content` properties.
//!
//! Produces the ordered list of concrete types a `content` property may hold:
//!
//! 1. Start from the explicit allow-list, or from every registered type
//!    followed by the media base types.
//! 2. A media base entry (`_image`, `_video`, `_media`) is preceded by every
//!    user type extending it, so specific types are matched first.
//! 3. Skip restricted entries (a restricted media base also removes its
//!    extending types), types whose properties are all disabled, duplicates,
//!    and structural base types.

use cmsgraph_schema::{BaseType, SchemaRegistry, SELF_REFERENCE};
use rustc_hash::FxHashSet;

/// Resolves allow/restrict lists against a snapshot of the registry.
#[derive(Debug, Clone)]
pub struct AllowListResolver<'r> {
    registry: &'r SchemaRegistry,
    /// The default allow-list: every registered type, then the media bases.
    all_types: Vec<String>,
}

impl<'r> AllowListResolver<'r> {
    /// Snapshots the registry's type list.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        let all_types = registry
            .content_types()
            .map(|ct| ct.key.clone())
            .chain(BaseType::MEDIA.iter().map(|base| base.key().to_string()))
            .collect();
        Self {
            registry,
            all_types,
        }
    }

    /// The cached default allow-list.
    pub fn all_types(&self) -> &[String] {
        &self.all_types
    }

    /// Resolves the concrete union members for a property declared on `root_key`.
    pub fn resolve(
        &self,
        allowed: Option<&[String]>,
        restricted: Option<&[String]>,
        root_key: &str,
    ) -> Vec<String> {
        let skip = self.restricted_set(restricted.unwrap_or_default(), root_key);
        let candidates = allowed.unwrap_or(self.all_types.as_slice());

        let mut resolution = Resolution {
            registry: self.registry,
            skip: &skip,
            seen: FxHashSet::default(),
            types: Vec::new(),
        };

        for entry in candidates {
            let entry = canonical(entry, root_key);
            if let Some(base) = BaseType::parse(&entry).filter(|b| b.is_media()) {
                for ct in self.registry.lookup_by_base_type(base) {
                    resolution.push(&ct.key);
                }
            }
            resolution.push(&entry);
        }

        resolution.types
    }

    fn restricted_set(&self, restricted: &[String], root_key: &str) -> FxHashSet<String> {
        let mut skip = FxHashSet::default();
        for entry in restricted {
            let entry = canonical(entry, root_key);
            if let Some(base) = BaseType::parse(&entry).filter(|b| b.is_media()) {
                skip.extend(
                    self.registry
                        .lookup_by_base_type(base)
                        .into_iter()
                        .map(|ct| ct.key.clone()),
                );
            }
            skip.insert(entry);
        }
        skip
    }
}

struct Resolution<'a> {
    registry: &'a SchemaRegistry,
    skip: &'a FxHashSet<String>,
    seen: FxHashSet<String>,
    types: Vec<String>,
}

impl Resolution<'_> {
    fn push(&mut self, key: &str) {
        if self.skip.contains(key) || self.seen.contains(key) {
            return;
        }
        if BaseType::parse(key).is_some_and(BaseType::is_structural) {
            return;
        }
        if self
            .registry
            .lookup(key)
            .is_some_and(|ct| ct.is_fully_disabled())
        {
            return;
        }
        self.seen.insert(key.to_string());
        self.types.push(key.to_string());
    }
}

/// Resolves `_self` and normalizes base type names to their definition key.
fn canonical(entry: &str, root_key: &str) -> String {
    if entry == SELF_REFERENCE {
        return root_key.to_string();
    }
    BaseType::parse(entry).map_or_else(|| entry.to_string(), |base| base.key().to_string())
}
