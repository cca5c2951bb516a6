//! Ancestor chains and lowest-common-ancestor resolution.

use crate::core::state::{StateGraph, StateId};

/// Iterator over a state's ancestor chain: the state itself first, then each
/// superstate outward, ending at the root.
pub struct Ancestors<'a> {
    graph: &'a StateGraph,
    cursor: Option<StateId>,
}

impl Iterator for Ancestors<'_> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let id = self.cursor?;
        self.cursor = self.graph.parent(id);
        Some(id)
    }
}

impl StateGraph {
    /// Walk from `start` outward through its superstates, `start` included.
    pub fn ancestors(&self, start: StateId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            cursor: Some(start),
        }
    }

    /// Ancestor-chain length of `id`, inclusive. A root has depth 1.
    pub fn depth(&self, id: StateId) -> usize {
        self.ancestors(id).count()
    }

    /// Lowest common ancestor of `a` and `b`, or `None` when the two states
    /// live in disjoint trees. `lowest_common_ancestor(x, x)` is `Some(x)`.
    ///
    /// Scans each ancestor of `a` (inclusive, outward) against each ancestor
    /// of `b`; the first match is the ancestor of `a` closest to `a` that the
    /// two chains share. O(depth²), but depth is bounded and small, so no
    /// caching is warranted.
    pub fn lowest_common_ancestor(&self, a: StateId, b: StateId) -> Option<StateId> {
        for outer in self.ancestors(a) {
            for inner in self.ancestors(b) {
                if outer == inner {
                    return Some(outer);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;

    // Fixture hierarchy used throughout the engine tests:
    //   a (root) -> b, c;  c -> d;  e is an unrelated root.
    fn fixture() -> (StateGraph, [StateId; 5]) {
        let mut builder = GraphBuilder::new();
        let a = builder.state(0);
        let b = builder.substate(1, a).unwrap();
        let c = builder.substate(2, a).unwrap();
        let d = builder.substate(3, c).unwrap();
        let e = builder.state(4);
        (builder.build(), [a, b, c, d, e])
    }

    #[test]
    fn ancestors_run_inclusive_and_outward() {
        let (graph, [a, _, c, d, _]) = fixture();
        let chain: Vec<StateId> = graph.ancestors(d).collect();
        assert_eq!(chain, vec![d, c, a]);
    }

    #[test]
    fn depth_counts_the_inclusive_chain() {
        let (graph, [a, b, c, d, e]) = fixture();
        assert_eq!(graph.depth(a), 1);
        assert_eq!(graph.depth(b), 2);
        assert_eq!(graph.depth(c), 2);
        assert_eq!(graph.depth(d), 3);
        assert_eq!(graph.depth(e), 1);
    }

    #[test]
    fn lca_is_reflexive() {
        let (graph, states) = fixture();
        for s in states {
            assert_eq!(graph.lowest_common_ancestor(s, s), Some(s));
        }
    }

    #[test]
    fn lca_of_siblings_is_their_parent() {
        let (graph, [a, b, c, d, _]) = fixture();
        assert_eq!(graph.lowest_common_ancestor(b, c), Some(a));
        assert_eq!(graph.lowest_common_ancestor(c, b), Some(a));
        assert_eq!(graph.lowest_common_ancestor(b, d), Some(a));
        assert_eq!(graph.lowest_common_ancestor(d, b), Some(a));
    }

    #[test]
    fn lca_of_ancestor_and_descendant_is_the_ancestor() {
        let (graph, [a, _, c, d, _]) = fixture();
        assert_eq!(graph.lowest_common_ancestor(a, c), Some(a));
        assert_eq!(graph.lowest_common_ancestor(a, d), Some(a));
        assert_eq!(graph.lowest_common_ancestor(c, a), Some(a));
        assert_eq!(graph.lowest_common_ancestor(d, a), Some(a));
        assert_eq!(graph.lowest_common_ancestor(c, d), Some(c));
    }

    #[test]
    fn lca_of_disjoint_trees_is_none() {
        let (graph, [a, b, c, d, e]) = fixture();
        for s in [a, b, c, d] {
            assert_eq!(graph.lowest_common_ancestor(s, e), None);
            assert_eq!(graph.lowest_common_ancestor(e, s), None);
        }
    }
}
