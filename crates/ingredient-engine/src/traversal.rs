//! Bounded and restricted neighborhood queries.
//!
//! A bounded neighborhood is every vertex reachable from the source by a
//! directed path of 1..=k hops, the source itself excluded. Two walks compute
//! it: a recursive depth-first expansion and a breadth-first work list. They
//! return the same set; only the iteration order of the result may differ.

use crate::config::{TraversalStrategy, DEFAULT_RECURSION_LIMIT};
use crate::error::{GraphError, GraphResult};
use crate::result_set::ResultSet;
use crate::store::IngredientGraph;
use std::collections::VecDeque;
use tracing::debug;

const UNREACHED: usize = usize::MAX;

impl IngredientGraph {
    /// Ingredients related to `source` by at most `k` hops.
    pub fn bounded_neighbors(&self, source: &str, k: usize) -> GraphResult<ResultSet> {
        self.bounded_neighbors_with(source, k, 0, TraversalStrategy::Auto)
    }

    /// Like [`bounded_neighbors`](Self::bounded_neighbors), with the walk
    /// starting as if `start_depth` hops had already been spent.
    pub fn bounded_neighbors_from(
        &self,
        source: &str,
        k: usize,
        start_depth: usize,
    ) -> GraphResult<ResultSet> {
        self.bounded_neighbors_with(source, k, start_depth, TraversalStrategy::Auto)
    }

    /// Run with an explicit walk. `Auto` resolves against
    /// [`DEFAULT_RECURSION_LIMIT`]; callers with their own limit resolve first
    /// with [`TraversalStrategy::resolve`] or
    /// [`EngineConfig::strategy_for`](crate::config::EngineConfig::strategy_for).
    pub fn bounded_neighbors_with(
        &self,
        source: &str,
        k: usize,
        start_depth: usize,
        strategy: TraversalStrategy,
    ) -> GraphResult<ResultSet> {
        if k < 1 {
            return Err(GraphError::InvalidDistance { k });
        }
        let origin = self.index_of(source)?;

        let mut found = ResultSet::new();
        if start_depth >= k {
            return Ok(found);
        }

        // Paths longer than N - 1 hops never reach anything new.
        let effective = (k - start_depth).min(self.len());
        let strategy = strategy.resolve(effective, DEFAULT_RECURSION_LIMIT);

        // Shallowest depth at which each vertex has been reached so far.
        let mut reached = vec![UNREACHED; self.len()];
        reached[origin] = start_depth;

        match strategy {
            TraversalStrategy::WorkList => {
                self.expand_breadth_first(origin, start_depth, k, &mut reached, &mut found)
            }
            _ => self.expand_recursive(origin, start_depth, k, &mut reached, &mut found),
        }

        debug!(
            source,
            k,
            start_depth,
            ?strategy,
            found = found.len(),
            "bounded neighborhood"
        );
        Ok(found)
    }

    /// Depth-first expansion threading one accumulator through every call.
    ///
    /// A vertex is expanded when first inserted, and again only if a later
    /// path reaches it with fewer hops spent. Recursion depth is at most
    /// `min(k, N)`.
    fn expand_recursive(
        &self,
        from: usize,
        depth: usize,
        k: usize,
        reached: &mut [usize],
        found: &mut ResultSet,
    ) {
        if depth >= k {
            return;
        }
        let next = depth + 1;
        for to in self.successors(from) {
            if next < reached[to] {
                reached[to] = next;
                found.insert_if_absent(to);
                self.expand_recursive(to, next, k, reached, found);
            }
        }
    }

    fn expand_breadth_first(
        &self,
        origin: usize,
        start_depth: usize,
        k: usize,
        reached: &mut [usize],
        found: &mut ResultSet,
    ) {
        let mut queue = VecDeque::from([(origin, start_depth)]);
        while let Some((from, depth)) = queue.pop_front() {
            if depth >= k {
                continue;
            }
            for to in self.successors(from) {
                if reached[to] == UNREACHED {
                    reached[to] = depth + 1;
                    found.insert_if_absent(to);
                    queue.push_back((to, depth + 1));
                }
            }
        }
    }

    /// Ingredients within `k_source` hops of `source`, minus `avoid` and
    /// everything within `k_avoid` hops of it.
    pub fn restricted_neighbors(
        &self,
        source: &str,
        avoid: &str,
        k_source: usize,
        k_avoid: usize,
    ) -> GraphResult<ResultSet> {
        self.restricted_neighbors_with(source, avoid, k_source, k_avoid, TraversalStrategy::Auto)
    }

    pub fn restricted_neighbors_with(
        &self,
        source: &str,
        avoid: &str,
        k_source: usize,
        k_avoid: usize,
        strategy: TraversalStrategy,
    ) -> GraphResult<ResultSet> {
        self.index_of(source)?;
        let avoid_index = self.index_of(avoid)?;

        let mut avoided = self.bounded_neighbors_with(avoid, k_avoid, 0, strategy)?;
        avoided.insert_if_absent(avoid_index);

        let mut related = self.bounded_neighbors_with(source, k_source, 0, strategy)?;
        related.subtract(&avoided);

        debug!(
            source,
            avoid,
            k_source,
            k_avoid,
            avoided = avoided.len(),
            kept = related.len(),
            "restricted neighborhood"
        );
        Ok(related)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::kitchen;

    fn names(graph: &IngredientGraph, set: &ResultSet) -> Vec<String> {
        let mut labels: Vec<String> = set.labels(graph).into_iter().map(String::from).collect();
        labels.sort();
        labels
    }

    fn chain(n: usize) -> IngredientGraph {
        let labels = (0..n).map(|i| format!("v{}", i)).collect();
        let rows = (0..n)
            .map(|i| (0..n).map(|j| if j == i + 1 { 1.0 } else { 0.0 }).collect())
            .collect();
        IngredientGraph::from_rows(labels, rows).expect("valid chain")
    }

    #[test]
    fn one_hop_matches_direct_neighbors() -> GraphResult<()> {
        let graph = kitchen();
        let bounded = graph.bounded_neighbors("rice", 1)?;
        assert_eq!(names(&graph, &bounded), vec!["chicken", "salt"]);
        assert_eq!(bounded, graph.direct_neighbors("rice")?);
        Ok(())
    }

    #[test]
    fn two_hops_reach_through_chicken() -> GraphResult<()> {
        let graph = kitchen();
        let bounded = graph.bounded_neighbors("rice", 2)?;
        assert_eq!(names(&graph, &bounded), vec!["chicken", "nuts", "salt"]);
        assert!(!bounded.contains(graph.index_of("rice")?));
        Ok(())
    }

    #[test]
    fn restricted_scenario_removes_everything() -> GraphResult<()> {
        let graph = kitchen();
        let restricted = graph.restricted_neighbors("rice", "chicken", 2, 1)?;
        assert!(restricted.is_empty());
        Ok(())
    }

    #[test]
    fn restricted_always_drops_avoid_vertex() -> GraphResult<()> {
        // nuts only links to chicken, so chicken->nuts survives unless nuts is avoided
        let graph = kitchen();
        let restricted = graph.restricted_neighbors("chicken", "nuts", 1, 1)?;
        assert_eq!(names(&graph, &restricted), vec!["rice", "salt"]);

        let isolated = IngredientGraph::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![0.0, 1.0, 1.0],
                vec![0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0],
            ],
        )?;
        // b has no out-edges, yet it is still excluded
        assert!(isolated.bounded_neighbors("b", 3)?.is_empty());
        let restricted = isolated.restricted_neighbors("a", "b", 1, 1)?;
        assert_eq!(names(&isolated, &restricted), vec!["c"]);
        Ok(())
    }

    #[test]
    fn rejects_zero_distance_and_unknown_labels() {
        let graph = kitchen();
        assert!(matches!(
            graph.bounded_neighbors("rice", 0),
            Err(GraphError::InvalidDistance { k: 0 })
        ));
        assert!(matches!(
            graph.bounded_neighbors("tofu", 2),
            Err(GraphError::LabelNotFound { .. })
        ));
        assert!(matches!(
            graph.restricted_neighbors("rice", "tofu", 1, 1),
            Err(GraphError::LabelNotFound { label }) if label == "tofu"
        ));
        assert!(matches!(
            graph.restricted_neighbors("tofu", "rice", 1, 0),
            Err(GraphError::LabelNotFound { label }) if label == "tofu"
        ));
    }

    #[test]
    fn start_depth_at_or_past_k_yields_nothing() -> GraphResult<()> {
        let graph = kitchen();
        assert!(graph.bounded_neighbors_from("rice", 2, 2)?.is_empty());
        assert!(graph.bounded_neighbors_from("rice", 2, 5)?.is_empty());
        assert_eq!(
            graph.bounded_neighbors_from("rice", 2, 1)?,
            graph.bounded_neighbors("rice", 1)?
        );
        Ok(())
    }

    #[test]
    fn directed_chain_respects_hop_budget() -> GraphResult<()> {
        let graph = chain(6);
        let within_three = graph.bounded_neighbors("v0", 3)?;
        assert_eq!(within_three.to_vec(), vec![1, 2, 3]);
        assert!(graph.bounded_neighbors("v5", 4)?.is_empty());
        Ok(())
    }

    #[test]
    fn shorter_path_found_later_still_expands() -> GraphResult<()> {
        // a -> b -> c -> d and a -> c. Depth-first reaches c at depth 2 via b
        // first; the direct edge must still let d in at k = 2.
        let graph = IngredientGraph::from_rows(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![
                vec![0.0, 1.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0, 0.0],
                vec![0.0, 0.0, 0.0, 1.0],
                vec![0.0, 0.0, 0.0, 0.0],
            ],
        )?;
        for strategy in [TraversalStrategy::Recursive, TraversalStrategy::WorkList] {
            let found = graph.bounded_neighbors_with("a", 2, 0, strategy)?;
            assert_eq!(found, [1, 2, 3].into_iter().collect::<ResultSet>());
        }
        Ok(())
    }

    #[test]
    fn huge_k_on_long_chain_uses_work_list() -> GraphResult<()> {
        let graph = chain(1_000);
        let found = graph.bounded_neighbors("v0", usize::MAX)?;
        assert_eq!(found.len(), 999);
        Ok(())
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn graph_strategy() -> impl Strategy<Value = IngredientGraph> {
            (1usize..9).prop_flat_map(|n| {
                proptest::collection::vec(
                    prop_oneof![3 => Just(0.0f64), 1 => 1.0f64..5.0],
                    n * n,
                )
                .prop_map(move |flat| {
                    let labels = (0..n).map(|i| format!("ing{}", i)).collect();
                    let rows = flat.chunks(n).map(|r| r.to_vec()).collect();
                    IngredientGraph::from_rows(labels, rows).expect("generated graph is valid")
                })
            })
        }

        /// Level-by-level frontier expansion used as the reference answer.
        fn within(graph: &IngredientGraph, source: usize, k: usize) -> Vec<usize> {
            let mut seen = vec![false; graph.len()];
            let mut frontier = vec![source];
            for _ in 0..k {
                let mut next = Vec::new();
                for &v in &frontier {
                    for to in graph.successors(v) {
                        if !seen[to] {
                            seen[to] = true;
                            next.push(to);
                        }
                    }
                }
                frontier = next;
            }
            (0..graph.len()).filter(|&i| seen[i] && i != source).collect()
        }

        fn sorted(set: &ResultSet) -> Vec<usize> {
            let mut v = set.to_vec();
            v.sort_unstable();
            v
        }

        proptest! {
            #[test]
            fn bounded_matches_reference(graph in graph_strategy(), src in 0usize..8, k in 1usize..6) {
                let src = src % graph.len();
                let label = graph.label_of(src).to_string();
                for strategy in [TraversalStrategy::Recursive, TraversalStrategy::WorkList] {
                    let found = graph.bounded_neighbors_with(&label, k, 0, strategy).unwrap();
                    prop_assert!(!found.contains(src));
                    prop_assert_eq!(sorted(&found), within(&graph, src, k));
                }
            }

            #[test]
            fn grows_with_distance(graph in graph_strategy(), src in 0usize..8, k in 1usize..6) {
                let label = graph.label_of(src % graph.len()).to_string();
                let smaller = graph.bounded_neighbors(&label, k).unwrap();
                let larger = graph.bounded_neighbors(&label, k + 1).unwrap();
                prop_assert!(smaller.iter().all(|v| larger.contains(v)));
            }

            #[test]
            fn one_hop_is_direct(graph in graph_strategy(), src in 0usize..8) {
                let label = graph.label_of(src % graph.len()).to_string();
                prop_assert_eq!(
                    graph.bounded_neighbors(&label, 1).unwrap(),
                    graph.direct_neighbors(&label).unwrap()
                );
            }

            #[test]
            fn restricted_is_filtered_subset(
                graph in graph_strategy(),
                src in 0usize..8,
                avoid in 0usize..8,
                ks in 1usize..5,
                ka in 1usize..5,
            ) {
                let source = graph.label_of(src % graph.len()).to_string();
                let avoid_index = avoid % graph.len();
                let avoid = graph.label_of(avoid_index).to_string();

                let restricted = graph.restricted_neighbors(&source, &avoid, ks, ka).unwrap();
                let unrestricted = graph.bounded_neighbors(&source, ks).unwrap();
                let avoided = graph.bounded_neighbors(&avoid, ka).unwrap();

                prop_assert!(!restricted.contains(avoid_index));
                for v in restricted.iter() {
                    prop_assert!(unrestricted.contains(v));
                    prop_assert!(!avoided.contains(v));
                }
            }
        }
    }
}
