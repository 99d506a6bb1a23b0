//! Assigns every ranking node a discrete layer and copies the result onto the messages.

use crate::model::Graph;
use crate::ranking::RankingGraph;
use narwhal_graphlib::alg;
use tracing::{debug, warn};

/// Returns the number of layers in use.
pub fn run(graph: &mut Graph, rg: &mut RankingGraph) -> usize {
    let layers = alg::longest_path(rg).unwrap_or_else(|err| {
        // Cycle breaking leaves the graph acyclic; keep going with a flat layering if a
        // caller skipped it.
        warn!(%err, "ranking graph is not acyclic");
        vec![0; rg.node_count()]
    });

    for (id, &layer) in rg.node_ids().zip(&layers) {
        if let Some(node) = rg.node_mut(id) {
            node.layer = layer;
        }
    }

    for msg in &mut graph.messages {
        let layer = msg.node.and_then(|n| rg.node(n)).map(|n| n.layer);
        let target_layer = msg
            .target_node
            .and_then(|n| rg.node(n))
            .map(|n| n.layer)
            .or(layer);
        msg.layer = layer;
        msg.target_layer = target_layer;
    }

    let count = layers.iter().max().map_or(0, |&max| max + 1);
    debug!(layers = count, nodes = rg.node_count(), "messages layered");
    count
}
