//! Lifeline ordering.
//!
//! Each strategy returns the real lifelines left to right; slot assignment is shared.

pub mod equal_distribution;
pub mod interactive;
pub mod layer_based;

use crate::config::{LayoutOptions, SortingStrategy};
use crate::model::{Graph, LifelineId};
use tracing::debug;

/// Slot of dummies standing left of the diagram (found messages, gates on the left border).
pub const LEFT_DUMMY_SLOT: i32 = -1;

pub fn run(graph: &mut Graph, options: &LayoutOptions) {
    let order = sort(options.sorting_strategy, graph, options.group_areas_when_sorting);
    assign_slots(graph, &order);
    debug!(strategy = ?options.sorting_strategy, lifelines = order.len(), "lifelines sorted");
    graph.lifeline_order = order;
}

pub fn sort(strategy: SortingStrategy, graph: &Graph, group_areas: bool) -> Vec<LifelineId> {
    match strategy {
        SortingStrategy::Interactive => interactive::sort(graph),
        SortingStrategy::LayerBased => layer_based::sort(graph),
        SortingStrategy::EqualDistribution => equal_distribution::sort(graph, group_areas),
    }
}

/// Real lifelines get `0..N` in `order`. Dummies that send a message sit left of the
/// diagram; every other dummy gets `N + 1`.
pub fn assign_slots(graph: &mut Graph, order: &[LifelineId]) {
    for (slot, &id) in order.iter().enumerate() {
        graph[id].horizontal_slot = slot as i32;
    }

    let right_slot = order.len() as i32 + 1;
    for id in graph.lifeline_ids() {
        if !graph[id].dummy {
            continue;
        }
        let sends = graph[id].messages.iter().any(|&m| graph[m].source == id);
        graph[id].horizontal_slot = if sends { LEFT_DUMMY_SLOT } else { right_slot };
    }
}

/// `(outgoing, incoming)` message counts of a lifeline. Self-loops count as both.
pub(crate) fn message_balance(graph: &Graph, id: LifelineId) -> (usize, usize) {
    let mut outgoing = 0;
    let mut incoming = 0;
    for &m in &graph[id].messages {
        let msg = &graph[m];
        if msg.source == id {
            outgoing += 1;
        }
        if msg.target == id {
            incoming += 1;
        }
    }
    (outgoing, incoming)
}
