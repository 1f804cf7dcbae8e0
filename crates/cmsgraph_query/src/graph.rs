//! Per-query fragment graph.
//!
//! Tracks which fragment names have been started in the current composition
//! pass and which fragments reference which. A name is visited at most once,
//! so recursive content models always produce a finite fragment set.

use indexmap::IndexSet;

#[derive(Debug, Default, Clone)]
pub struct FragmentGraph {
    visited: IndexSet<String>,
    edges: IndexSet<(String, String)>,
}

impl FragmentGraph {
    /// Creates an empty graph for a new top-level composition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as visited. Returns false if it was already visited.
    pub fn visit(&mut self, name: &str) -> bool {
        self.visited.insert(name.to_string())
    }

    pub fn is_visited(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Records that fragment `from` spreads fragment `to`.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges.insert((from.to_string(), to.to_string()));
    }

    /// Fragment names in the order they were first visited.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Returns true if `name` references itself directly or through a chain.
    pub fn is_cyclic(&self, name: &str) -> bool {
        let mut stack = vec![name];
        let mut seen = IndexSet::new();
        while let Some(current) = stack.pop() {
            for (from, to) in self.edges() {
                if from != current {
                    continue;
                }
                if to == name {
                    return true;
                }
                if seen.insert(to) {
                    stack.push(to);
                }
            }
        }
        false
    }
}
