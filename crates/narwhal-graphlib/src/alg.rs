//! Helper algorithms over [`Graph`].

use crate::{CycleError, Graph, NodeId};
use std::collections::VecDeque;

/// Kahn topological order. Ties are broken by node id so the result is stable.
pub fn topsort<N, E>(g: &Graph<N, E>) -> Result<Vec<NodeId>, CycleError> {
    let mut indegree: Vec<usize> = g.node_ids().map(|v| g.in_edges(v).len()).collect();
    let mut queue: VecDeque<NodeId> = g.node_ids().filter(|v| indegree[v.index()] == 0).collect();
    let mut order: Vec<NodeId> = Vec::with_capacity(g.node_count());

    while let Some(v) = queue.pop_front() {
        order.push(v);
        for w in g.successors(v) {
            let d = &mut indegree[w.index()];
            *d -= 1;
            if *d == 0 {
                queue.push_back(w);
            }
        }
    }

    if order.len() == g.node_count() {
        Ok(order)
    } else {
        Err(CycleError {
            unresolved: g.node_count() - order.len(),
        })
    }
}

pub fn is_acyclic<N, E>(g: &Graph<N, E>) -> bool {
    topsort(g).is_ok()
}

/// Longest-path layering: sources sit on layer 0 and every edge `v -> w` ends on a layer
/// strictly below `v`'s. The returned vector is indexed by [`NodeId::index`].
pub fn longest_path<N, E>(g: &Graph<N, E>) -> Result<Vec<usize>, CycleError> {
    let order = topsort(g)?;
    let mut layer: Vec<usize> = vec![0; g.node_count()];
    for v in order {
        let next = layer[v.index()] + 1;
        for w in g.successors(v) {
            if layer[w.index()] < next {
                layer[w.index()] = next;
            }
        }
    }
    Ok(layer)
}

/// Strongly connected components (Tarjan) that contain a cycle: components with more than
/// one node, or a single node with a self-loop.
///
/// Runs without recursion so long message chains cannot overflow the stack.
pub fn find_cycles<N, E>(g: &Graph<N, E>) -> Vec<Vec<NodeId>> {
    const UNSEEN: usize = usize::MAX;

    let n = g.node_count();
    let mut index: Vec<usize> = vec![UNSEEN; n];
    let mut lowlink: Vec<usize> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut stack: Vec<NodeId> = Vec::new();
    let mut next_index = 0usize;
    let mut out: Vec<Vec<NodeId>> = Vec::new();

    for root in g.node_ids() {
        if index[root.index()] != UNSEEN {
            continue;
        }

        // (node, position in its out-edge list)
        let mut call: Vec<(NodeId, usize)> = vec![(root, 0)];
        index[root.index()] = next_index;
        lowlink[root.index()] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root.index()] = true;

        while let Some(&(v, cursor)) = call.last() {
            if let Some(&e) = g.out_edges(v).get(cursor) {
                if let Some(top) = call.last_mut() {
                    top.1 += 1;
                }
                let Some((_, w)) = g.endpoints(e) else {
                    continue;
                };
                if index[w.index()] == UNSEEN {
                    index[w.index()] = next_index;
                    lowlink[w.index()] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w.index()] = true;
                    call.push((w, 0));
                } else if on_stack[w.index()] {
                    lowlink[v.index()] = lowlink[v.index()].min(index[w.index()]);
                }
                continue;
            }

            call.pop();
            if let Some(&(parent, _)) = call.last() {
                lowlink[parent.index()] = lowlink[parent.index()].min(lowlink[v.index()]);
            }

            if lowlink[v.index()] == index[v.index()] {
                let mut scc: Vec<NodeId> = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w.index()] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                let self_loop = scc.len() == 1 && g.successors(v).any(|w| w == v);
                if scc.len() > 1 || self_loop {
                    out.push(scc);
                }
            }
        }
    }

    out
}
