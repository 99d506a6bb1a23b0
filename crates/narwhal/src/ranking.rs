//! Ranking graph: one node per message, one edge per "directly precedes on a lifeline".

use crate::model::{Graph, LifelineId, MessageId};
use narwhal_graphlib::NodeId;
use tracing::trace;

pub type RankingGraph = narwhal_graphlib::Graph<RankNode, RankEdge>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankNode {
    /// `None` for spacers.
    pub message: Option<MessageId>,
    /// Set on both halves of a split message: the lifeline whose edges the half carries.
    pub lifeline: Option<LifelineId>,
    pub layer: usize,
}

impl RankNode {
    pub fn spacer() -> Self {
        Self::default()
    }

    pub fn is_spacer(&self) -> bool {
        self.message.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankEdge {
    /// The lifeline on which the two messages follow each other. `None` for spacer links.
    pub lifeline: Option<LifelineId>,
}

/// Builds the ranking graph and stores each message's node on the message.
pub fn build(graph: &mut Graph) -> RankingGraph {
    let mut rg = RankingGraph::with_capacity(graph.messages.len(), graph.messages.len() * 2);

    for (ix, msg) in graph.messages.iter_mut().enumerate() {
        let node = rg.add_node(RankNode {
            message: Some(MessageId(ix)),
            ..Default::default()
        });
        msg.node = Some(node);
        msg.target_node = None;
    }

    for (ix, ll) in graph.lifelines.iter().enumerate() {
        if ll.dummy {
            continue;
        }
        let lifeline = LifelineId(ix);
        for pair in ll.messages.windows(2) {
            let v = graph.messages[pair[0].0].node;
            let w = graph.messages[pair[1].0].node;
            let (Some(v), Some(w)) = (v, w) else {
                continue;
            };
            if v == w {
                continue;
            }
            rg.add_edge(v, w, RankEdge {
                lifeline: Some(lifeline),
            });
        }
    }

    rg
}

/// Inserts a spacer directly above `node`: every incoming edge of `node` is redirected to
/// the spacer and the spacer is linked to `node`.
pub fn insert_spacer_before(rg: &mut RankingGraph, node: NodeId) -> NodeId {
    let spacer = rg.add_node(RankNode::spacer());
    for e in rg.in_edges(node).to_vec() {
        rg.set_target(e, spacer);
    }
    rg.add_edge(spacer, node, RankEdge::default());
    trace!(%spacer, above = %node, "inserted spacer");
    spacer
}
