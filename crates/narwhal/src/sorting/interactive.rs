//! Keeps the order the user drew: lifelines sorted by their given x position.

use crate::model::{Graph, LifelineId};

pub fn sort(graph: &Graph) -> Vec<LifelineId> {
    let mut order = graph.real_lifelines();
    // Stable, so equal positions keep input order.
    order.sort_by(|&a, &b| graph[a].position.x.total_cmp(&graph[b].position.x));
    order
}
