//! Traversal queries over a lineage graph.

use std::collections::{HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::Direction;

use super::LineageGraph;

impl LineageGraph {
    /// Tables with no incoming edges, in graph order.
    ///
    /// Edges are read directly, so bypass edges of a rewritten graph count.
    pub fn roots(&self) -> Vec<&str> {
        self.without_neighbors(Direction::Incoming)
    }

    /// Tables with no outgoing edges, in graph order.
    pub fn leaves(&self) -> Vec<&str> {
        self.without_neighbors(Direction::Outgoing)
    }

    fn without_neighbors(&self, direction: Direction) -> Vec<&str> {
        let graph = self.inner();
        graph
            .node_indices()
            .filter(move |&idx| graph.neighbors_directed(idx, direction).next().is_none())
            .map(move |idx| graph[idx].name.as_str())
            .collect()
    }

    /// Every table `name` transitively derives from (excluding itself
    /// unless it sits on a cycle).
    pub fn upstream(&self, name: &str) -> HashSet<String> {
        self.reachable(name, Direction::Incoming)
    }

    /// Every table transitively derived from `name`.
    pub fn downstream(&self, name: &str) -> HashSet<String> {
        self.reachable(name, Direction::Outgoing)
    }

    fn reachable(&self, name: &str, direction: Direction) -> HashSet<String> {
        let mut result = HashSet::new();
        let Some(start) = self.index_of(name) else {
            return result;
        };
        let graph = self.inner();

        let mut queue = VecDeque::from([start]);
        let mut seen = HashSet::from([start]);
        while let Some(idx) = queue.pop_front() {
            for next in graph.neighbors_directed(idx, direction) {
                if next == start {
                    result.insert(graph[next].name.clone());
                }
                if seen.insert(next) {
                    result.insert(graph[next].name.clone());
                    queue.push_back(next);
                }
            }
        }
        result
    }

    /// Groups of tables that form lineage cycles, including self-references.
    ///
    /// Levels for these tables are best-effort only.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let graph = self.inner();
        tarjan_scc(graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => graph.edges_connecting(*single, *single).next().is_some(),
                _ => true,
            })
            .map(|scc| scc.into_iter().map(|idx| graph[idx].name.clone()).collect())
            .collect()
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles().is_empty()
    }
}
