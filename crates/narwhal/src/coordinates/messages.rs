//! Message endpoints, self-loop bends and label placement.

use super::{LABEL_LINE_GAP, LABEL_MARGIN, LABEL_SPACING, ensure_wide_enough};
use crate::config::{LabelAlignment, LayoutOptions};
use crate::model::{Graph, LifelineId, MessageId, MessageKind, Point};

pub(super) fn place_endpoints(graph: &mut Graph, options: &LayoutOptions) {
    let half_spacing = options.lifeline_spacing / 2.0;

    for m in graph.message_ids() {
        let msg = &graph[m];
        let src = &graph[msg.source];
        let tgt = &graph[msg.target];
        let (sy, ty) = (msg.source_y, msg.target_y);

        let mut bend_points = Vec::new();
        let (sx, tx) = if msg.is_self_loop() {
            let center = src.center_x();
            let bend_x = center + options.message_spacing / 2.0;
            bend_points.push(Point::new(bend_x, sy));
            bend_points.push(Point::new(bend_x, ty));
            (center, center)
        } else {
            let sx = match (src.dummy, msg.kind) {
                (false, _) => src.center_x(),
                (true, MessageKind::Found) if !tgt.dummy => tgt.position.x - half_spacing,
                // Comes in from the interaction's left border.
                (true, _) => 0.0,
            };
            let tx = match (tgt.dummy, msg.kind) {
                (false, MessageKind::Create) => {
                    if sx > tgt.center_x() {
                        tgt.right()
                    } else {
                        tgt.position.x
                    }
                }
                (false, _) => tgt.center_x(),
                (true, MessageKind::Lost) if !src.dummy => src.right() + half_spacing,
                // Pinned to the right border once the width is final.
                (true, _) => sx,
            };
            (sx, tx)
        };

        let msg = &mut graph[m];
        msg.source_point = Point::new(sx, sy);
        msg.target_point = Point::new(tx, ty);
        msg.bend_points = bend_points;

        let right = sx.max(tx).max(msg.bend_points.iter().map(|p| p.x).fold(sx, f64::max));
        ensure_wide_enough(&mut graph.size, right, options.border_spacing);
    }
}

/// Messages into a right-hand dummy (other than lost messages) end at the diagram border.
pub(super) fn extend_to_right_border(graph: &mut Graph) {
    let width = graph.size.width;
    for m in graph.message_ids() {
        let msg = &graph[m];
        let into_border =
            graph[msg.target].dummy && !graph[msg.source].dummy && msg.kind != MessageKind::Lost;
        if into_border {
            graph[m].target_point.x = width;
        }
    }
}

pub(super) fn place_labels(graph: &mut Graph, options: &LayoutOptions) {
    for m in graph.message_ids() {
        if graph[m].labels.is_empty() {
            continue;
        }
        let positions = label_positions(graph, m, options);
        let msg = &mut graph[m];
        let mut right = 0.0f64;
        for (label, position) in msg.labels.iter_mut().zip(positions) {
            label.position = position;
            right = right.max(position.x + label.size.width);
        }
        ensure_wide_enough(&mut graph.size, right, options.border_spacing);
    }
}

/// Labels above a rightward line stack upwards; below a leftward line they stack down.
fn label_positions(graph: &Graph, m: MessageId, options: &LayoutOptions) -> Vec<Point> {
    let msg = &graph[m];
    let source = msg.source_point;

    if msg.is_self_loop() {
        let bend = msg.bend_points.first().copied().unwrap_or(source);
        let mut y = source.y + LABEL_SPACING;
        return msg
            .labels
            .iter()
            .map(|label| {
                let p = Point::new(bend.x + LABEL_MARGIN / 2.0, y);
                y += label.size.height;
                p
            })
            .collect();
    }

    let rightwards = msg.kind == MessageKind::Lost || msg.target_point.x >= source.x;
    let alignment = if msg.kind == MessageKind::Create {
        LabelAlignment::Source
    } else {
        options.label_alignment
    };
    let neighbor_center = neighbor(graph, m, rightwards).map(|id| graph[id].center_x());

    let mut above = source.y;
    let mut below = source.y + LABEL_LINE_GAP;
    msg.labels
        .iter()
        .map(|label| {
            let w = label.size.width;
            let from_source = if rightwards {
                source.x + LABEL_SPACING
            } else {
                source.x - w - LABEL_SPACING
            };
            let x = match alignment {
                LabelAlignment::Source => from_source,
                LabelAlignment::Center => (source.x + msg.target_point.x) / 2.0 - w / 2.0,
                LabelAlignment::SourceCenter => match neighbor_center {
                    Some(center) => (source.x + center) / 2.0 - w / 2.0,
                    None => from_source,
                },
            };
            let y = if rightwards {
                above -= label.size.height + LABEL_LINE_GAP;
                above
            } else {
                let y = below;
                below += label.size.height;
                y
            };
            Point::new(x, y)
        })
        .collect()
}

/// The lifeline next to the source in message direction, if there is one.
fn neighbor(graph: &Graph, m: MessageId, rightwards: bool) -> Option<LifelineId> {
    let slot = graph[graph[m].source].horizontal_slot;
    let next = if rightwards { slot + 1 } else { slot - 1 };
    usize::try_from(next)
        .ok()
        .and_then(|ix| graph.lifeline_order.get(ix).copied())
}
