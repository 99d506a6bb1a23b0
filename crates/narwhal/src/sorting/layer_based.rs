//! Orders lifelines by following message chains from the top of the diagram.
//!
//! The unplaced lifeline sending the uppermost message goes next; from there the chain of
//! earliest outgoing messages is followed for as long as it reaches unplaced lifelines.
//! Lifelines that never send anything fill the remaining slots in input order.

use super::message_balance;
use crate::model::{Graph, LifelineId, MessageId};

pub fn sort(graph: &Graph) -> Vec<LifelineId> {
    let real = graph.real_lifelines();
    if !graph.messages.iter().any(|m| m.layer.is_some()) {
        return real;
    }

    let mut placed = vec![false; graph.lifelines.len()];
    let mut order: Vec<LifelineId> = Vec::with_capacity(real.len());

    while order.len() < real.len() {
        let Some(first) = uppermost_candidate(graph, &placed) else {
            break;
        };

        let mut current = graph[first].source;
        placed[current.0] = true;
        order.push(current);

        while let Some(next) = earliest_outgoing(graph, current, &placed) {
            current = graph[next].target;
            placed[current.0] = true;
            order.push(current);
        }
    }

    for id in real {
        if !placed[id.0] {
            order.push(id);
        }
    }
    order
}

/// Lowest-layer message sent by an unplaced real lifeline. On equal layers the sender with
/// the larger outgoing-minus-incoming surplus wins.
fn uppermost_candidate(graph: &Graph, placed: &[bool]) -> Option<MessageId> {
    let mut best: Option<(MessageId, usize, isize)> = None;
    for m in graph.message_ids() {
        let msg = &graph[m];
        let Some(layer) = msg.layer else {
            continue;
        };
        if placed[msg.source.0] || graph[msg.source].dummy {
            continue;
        }
        let (out, inc) = message_balance(graph, msg.source);
        let surplus = out as isize - inc as isize;
        let better = match best {
            None => true,
            Some((_, best_layer, best_surplus)) => {
                layer < best_layer || (layer == best_layer && surplus > best_surplus)
            }
        };
        if better {
            best = Some((m, layer, surplus));
        }
    }
    best.map(|(m, _, _)| m)
}

fn earliest_outgoing(graph: &Graph, from: LifelineId, placed: &[bool]) -> Option<MessageId> {
    let mut best: Option<(MessageId, usize)> = None;
    for &m in &graph[from].messages {
        let msg = &graph[m];
        if msg.source != from || msg.is_self_loop() {
            continue;
        }
        if placed[msg.target.0] || graph[msg.target].dummy {
            continue;
        }
        let layer = msg.layer.unwrap_or(usize::MAX);
        if best.is_none_or(|(_, best_layer)| layer < best_layer) {
            best = Some((m, layer));
        }
    }
    best.map(|(m, _)| m)
}
