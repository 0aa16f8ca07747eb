//! Layer assignment.
//!
//! A table's level is its longest distance from a root:
//!
//! ```text
//! level(t) = 0                               if t has no parents
//!          = 1 + max(level(p) for p in parents(t))   otherwise
//! ```
//!
//! Levels are computed by a memoized depth-first walk up the parent links.
//! A parent that is still *in progress* when it is reached again closes a
//! cycle; that link is not followed and contributes nothing, so a cycle
//! member's level freezes at the depth reached through its other parents.
//! The walk always terminates. Levels only satisfy the longest-path
//! invariant when the graph is acyclic.

use std::collections::HashMap;

use super::LineageGraph;

/// Level per table name.
pub type LevelMap = HashMap<String, usize>;

#[derive(Clone, Copy)]
enum Visit {
    Unvisited,
    InProgress,
    Done(usize),
}

struct Frame {
    node: usize,
    next_parent: usize,
    /// Largest `level(parent) + 1` seen so far
    best: Option<usize>,
}

/// Parent lists by dense node position, read from the graph's edges.
fn parent_lists(graph: &LineageGraph) -> (Vec<&str>, Vec<Vec<usize>>) {
    let names = graph.node_ids();
    let position: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); names.len()];

    for edge in graph.edges() {
        let (Some(&source), Some(&target)) = (
            position.get(edge.source.as_str()),
            position.get(edge.target.as_str()),
        ) else {
            continue;
        };
        if !parents[target].contains(&source) {
            parents[target].push(source);
        }
    }

    (names, parents)
}

/// Assign a level to every table in the graph.
///
/// The adjacency is taken from the graph's edges, so bypass edges in a
/// rewritten graph count as parent links. Each call returns a fresh map.
pub fn assign_levels(graph: &LineageGraph) -> LevelMap {
    let (names, parents) = parent_lists(graph);
    let mut visits = vec![Visit::Unvisited; names.len()];

    for start in 0..names.len() {
        if !matches!(visits[start], Visit::Unvisited) {
            continue;
        }

        visits[start] = Visit::InProgress;
        let mut stack = vec![Frame {
            node: start,
            next_parent: 0,
            best: None,
        }];

        while let Some(top) = stack.len().checked_sub(1) {
            let node = stack[top].node;
            let cursor = stack[top].next_parent;

            if let Some(&parent) = parents[node].get(cursor) {
                stack[top].next_parent += 1;
                match visits[parent] {
                    Visit::Done(level) => {
                        stack[top].best = stack[top].best.max(Some(level + 1));
                    }
                    Visit::InProgress => {}
                    Visit::Unvisited => {
                        visits[parent] = Visit::InProgress;
                        stack.push(Frame {
                            node: parent,
                            next_parent: 0,
                            best: None,
                        });
                    }
                }
                continue;
            }

            let level = stack[top].best.unwrap_or(0);
            visits[node] = Visit::Done(level);
            stack.pop();
            if let Some(caller) = stack.last_mut() {
                caller.best = caller.best.max(Some(level + 1));
            }
        }
    }

    names
        .into_iter()
        .zip(visits)
        .map(|(name, visit)| {
            let level = match visit {
                Visit::Done(level) => level,
                Visit::Unvisited | Visit::InProgress => 0,
            };
            (name.to_string(), level)
        })
        .collect()
}
