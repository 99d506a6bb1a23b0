//! Comment placement and connector endpoints.

use super::LABEL_SPACING;
use crate::config::LayoutOptions;
use crate::model::{AnchorKind, Attachment, CommentId, Connection, Graph, LifelineId, Point};

pub(super) fn place(graph: &mut Graph, options: &LayoutOptions) {
    for ix in 0..graph.comments.len() {
        let id = CommentId(ix);
        match graph[id].anchor_kind() {
            Some(AnchorKind::Message) => beside_message(graph, id, options),
            Some(AnchorKind::Lifeline | AnchorKind::Execution) => {
                beside_lifeline(graph, id, options)
            }
            None => {}
        }
    }
}

/// Centered above the message (and its labels), with a vertical connector down to the
/// message's midpoint.
fn beside_message(graph: &mut Graph, id: CommentId, options: &LayoutOptions) {
    let Some(m) = graph[id].message else {
        return;
    };
    let msg = &graph[m];
    let mid = Point::new(
        (msg.source_point.x + msg.target_point.x) / 2.0,
        (msg.source_point.y + msg.target_point.y) / 2.0,
    );
    let obstacle_top = msg
        .labels
        .iter()
        .map(|l| l.position.y)
        .fold(msg.source_point.y.min(msg.target_point.y), f64::min);

    let comment = &mut graph[id];
    let size = comment.size;
    comment.position.x = (mid.x - size.width / 2.0).max(options.border_spacing);
    comment.position.y = obstacle_top - LABEL_SPACING - size.height;
    let x = comment.position.x + size.width / 2.0;
    comment.connection = Some(Connection {
        source: Point::new(x, comment.position.y + size.height),
        target: Point::new(x, mid.y),
    });
}

/// Time observations and other lifeline-anchored comments. With a known message they sit
/// right of the lifeline at the message's time; otherwise they keep their position. The
/// connector runs horizontally to the lifeline center.
fn beside_lifeline(graph: &mut Graph, id: CommentId, options: &LayoutOptions) {
    let Some(lifeline) = anchor_lifeline(graph, id) else {
        return;
    };
    let center = graph[lifeline].center_x();
    let time = graph[id].message.map(|m| {
        let msg = &graph[m];
        if msg.source == lifeline {
            msg.source_point.y
        } else {
            msg.target_point.y
        }
    });

    let comment = &mut graph[id];
    let size = comment.size;
    if let Some(y) = time {
        comment.position.x = center + options.execution_width;
        comment.position.y = y - size.height / 2.0;
    }
    let y = comment.position.y + size.height / 2.0;
    let x = if comment.position.x + size.width / 2.0 < center {
        comment.position.x + size.width
    } else {
        comment.position.x
    };
    comment.connection = Some(Connection {
        source: Point::new(x, y),
        target: Point::new(center, y),
    });
}

fn anchor_lifeline(graph: &Graph, id: CommentId) -> Option<LifelineId> {
    let comment = &graph[id];
    comment.lifeline.or_else(|| {
        comment.attached_to.iter().find_map(|a| match *a {
            Attachment::Lifeline(l) => Some(l),
            Attachment::Execution(e) => Some(graph[e].lifeline),
            Attachment::Message(_) => None,
        })
    })
}
