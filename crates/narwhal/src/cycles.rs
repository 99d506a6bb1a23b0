//! Removes cycles from the ranking graph by splitting message nodes.
//!
//! A cycle appears when the temporal order on one lifeline contradicts the order implied by
//! messages across other lifelines. The uppermost message on the cycle is split in two: the
//! split node keeps the edges of the source lifeline and a new node takes over the edges
//! of the target lifeline. Edges are never reversed.

use crate::model::{Graph, MessageId};
use crate::ranking::{RankNode, RankingGraph};
use indexmap::IndexSet;
use narwhal_graphlib::{EdgeId, NodeId, alg};
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleBreaking {
    pub split_nodes: usize,
    pub dropped_edges: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Done,
}

#[derive(Debug, Default)]
struct Search {
    splits: IndexSet<NodeId, FxBuildHasher>,
    /// Closing edges of cycles without a splittable node.
    stuck: Vec<EdgeId>,
}

pub fn run(graph: &mut Graph, rg: &mut RankingGraph) -> CycleBreaking {
    let mut outcome = CycleBreaking::default();

    if alg::is_acyclic(&*rg) {
        return outcome;
    }
    debug!(nodes = rg.node_count(), "ranking graph has cycles");

    loop {
        let found = search(graph, rg);
        if !found.splits.is_empty() {
            for &node in &found.splits {
                if split_node(graph, rg, node).is_some() {
                    outcome.split_nodes += 1;
                }
            }
            continue;
        }
        if found.stuck.is_empty() {
            break;
        }
        for e in found.stuck {
            if rg.remove_edge(e).is_some() {
                warn!(edge = e.index(), "dropped an unresolvable ordering constraint");
                outcome.dropped_edges += 1;
            }
        }
    }

    debug!(
        split_nodes = outcome.split_nodes,
        dropped_edges = outcome.dropped_edges,
        "cycles broken"
    );
    outcome
}

/// Depth-first search with an explicit `(node, next out-edge)` stack. The stack doubles as
/// the current path, so the cycle closed by a back edge is the stack suffix starting at the
/// edge's target.
fn search(graph: &Graph, rg: &RankingGraph) -> Search {
    let n = rg.node_count();
    let mut state = vec![Visit::Unvisited; n];
    let mut depth = vec![0usize; n];
    let mut out = Search::default();

    for root in rg.node_ids() {
        if state[root.index()] != Visit::Unvisited {
            continue;
        }
        state[root.index()] = Visit::OnPath;
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

        while let Some(&(v, cursor)) = stack.last() {
            let Some(&e) = rg.out_edges(v).get(cursor) else {
                state[v.index()] = Visit::Done;
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            let Some((_, w)) = rg.endpoints(e) else {
                continue;
            };

            match state[w.index()] {
                Visit::Unvisited => {
                    state[w.index()] = Visit::OnPath;
                    depth[w.index()] = stack.len();
                    stack.push((w, 0));
                }
                Visit::OnPath => {
                    let cycle = stack[depth[w.index()]..].iter().map(|&(node, _)| node);
                    match uppermost_splittable(graph, rg, cycle) {
                        Some(node) => {
                            out.splits.insert(node);
                        }
                        None => out.stuck.push(e),
                    }
                }
                Visit::Done => {}
            }
        }
    }

    out
}

fn uppermost_splittable(
    graph: &Graph,
    rg: &RankingGraph,
    cycle: impl Iterator<Item = NodeId>,
) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for node in cycle {
        let Some(message) = splittable_message(graph, rg, node) else {
            continue;
        };
        let y = graph[message].source_y;
        if best.is_none_or(|(_, best_y)| y < best_y) {
            best = Some((node, y));
        }
    }
    best.map(|(node, _)| node)
}

/// Only unsplit nodes of messages between two distinct real lifelines can be split.
fn splittable_message(graph: &Graph, rg: &RankingGraph, node: NodeId) -> Option<MessageId> {
    let label = rg.node(node)?;
    if label.lifeline.is_some() {
        return None;
    }
    let message = label.message?;
    let msg = &graph[message];
    if msg.is_self_loop() || graph[msg.source].dummy || graph[msg.target].dummy {
        return None;
    }
    Some(message)
}

/// Splits `node` and returns the new target-side node.
pub fn split_node(graph: &mut Graph, rg: &mut RankingGraph, node: NodeId) -> Option<NodeId> {
    let message = splittable_message(graph, rg, node)?;
    let (source, target) = (graph[message].source, graph[message].target);

    let split = rg.add_node(RankNode {
        message: Some(message),
        lifeline: Some(target),
        layer: 0,
    });
    if let Some(label) = rg.node_mut(node) {
        label.lifeline = Some(source);
    }

    let on_target =
        |rg: &RankingGraph, e: EdgeId| rg.edge(e).and_then(|l| l.lifeline) == Some(target);
    for e in rg.in_edges(node).to_vec() {
        if on_target(&*rg, e) {
            rg.set_target(e, split);
        }
    }
    for e in rg.out_edges(node).to_vec() {
        if on_target(&*rg, e) {
            rg.set_source(e, split);
        }
    }

    graph[message].target_node = Some(split);
    trace!(%message, %node, %split, "split message node");
    Some(split)
}
