//! Resolves which lifeline and message a time observation annotates.
//!
//! Hosts place time observations freely; the nearest lifeline (by center x) and the nearest
//! message on it (by time) become the observation's anchor.

use crate::model::{AnchorKind, CommentKind, Graph, LifelineId, MessageId};

pub fn resolve_time_observations(graph: &mut Graph, width: f64) -> usize {
    let mut resolved = 0usize;

    for ix in 0..graph.comments.len() {
        let comment = &graph.comments[ix];
        if comment.kind != CommentKind::TimeObservation {
            continue;
        }
        let center_x = comment.position.x + comment.size.width / 2.0;
        let center_y = comment.position.y + comment.size.height / 2.0;
        let lifeline = comment.lifeline.or_else(|| nearest_lifeline(graph, center_x));
        let message = match (comment.message, lifeline) {
            (Some(m), _) => Some(m),
            (None, Some(l)) => nearest_message(graph, l, center_y),
            (None, None) => None,
        };

        let comment = &mut graph.comments[ix];
        comment.size.width = width;
        comment.lifeline = lifeline;
        comment.message = message;
        if comment.anchor.is_none() && lifeline.is_some() {
            comment.anchor = Some(AnchorKind::Lifeline);
        }
        if message.is_some() {
            resolved += 1;
        }
    }

    resolved
}

fn nearest_lifeline(graph: &Graph, x: f64) -> Option<LifelineId> {
    let mut best: Option<(LifelineId, f64)> = None;
    for id in graph.real_lifelines() {
        let distance = (graph[id].center_x() - x).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((id, distance));
        }
    }
    best.map(|(id, _)| id)
}

fn nearest_message(graph: &Graph, lifeline: LifelineId, y: f64) -> Option<MessageId> {
    let mut best: Option<(MessageId, f64)> = None;
    for &m in &graph[lifeline].messages {
        let distance = (graph[m].time_at(lifeline) - y).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((m, distance));
        }
    }
    best.map(|(id, _)| id)
}
