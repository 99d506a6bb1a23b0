//! Coordinate synthesis.
//!
//! Layers become y coordinates, slots become x coordinates, and every remaining element
//! (message endpoints, labels, executions, areas, comments) is placed relative to those.
//! All coordinates are in the interaction's frame; `Execution::position.x` alone is relative
//! to its lifeline. The diagram size only ever grows while elements are placed.

mod areas;
mod comments;
mod executions;
mod messages;
pub mod papyrus;

use crate::config::{CoordinateSystem, LayoutOptions};
use crate::model::{Graph, LifelineId, MessageKind, Size};
use tracing::debug;

/// Gap between a label and its lifeline or bend point.
pub const LABEL_SPACING: f64 = 5.0;
/// Horizontal room kept around self-loop labels.
pub const LABEL_MARGIN: f64 = 10.0;
/// Gap between a label and its message line.
pub const LABEL_LINE_GAP: f64 = 2.0;

pub fn run(graph: &mut Graph, options: &LayoutOptions) {
    graph.size = Size::default();

    apply_layers(graph, options);
    place_lifelines(graph, options);
    messages::place_endpoints(graph, options);
    messages::place_labels(graph, options);
    executions::place(graph, options);
    areas::place(graph, options);
    comments::place(graph, options);
    fit_width(graph, options);
    messages::extend_to_right_border(graph);
    finish_height(graph, options);

    if options.coordinate_system == CoordinateSystem::Papyrus {
        papyrus::apply(graph, options);
    }

    debug!(
        width = graph.size.width,
        height = graph.size.height,
        "coordinates calculated"
    );
}

/// y coordinate of a layer.
pub fn layer_y(options: &LayoutOptions, layer: usize) -> f64 {
    options.lifeline_y_pos
        + options.lifeline_header_height
        + options.message_spacing * (layer as f64 + 1.0)
}

/// Grows the diagram so that `right` keeps the border spacing to the right edge.
pub(crate) fn ensure_wide_enough(size: &mut Size, right: f64, border: f64) {
    if right + border > size.width {
        size.width = right + border;
    }
}

pub(crate) fn ensure_tall_enough(size: &mut Size, bottom: f64, border: f64) {
    if bottom + border > size.height {
        size.height = bottom + border;
    }
}

fn apply_layers(graph: &mut Graph, options: &LayoutOptions) {
    for msg in &mut graph.messages {
        let Some(layer) = msg.layer else {
            continue;
        };
        msg.source_y = layer_y(options, layer);
        msg.target_y = layer_y(options, msg.target_layer.unwrap_or(layer));
        if msg.is_self_loop() {
            msg.target_y = msg.source_y + options.message_spacing / 2.0;
        }
    }
}

fn place_lifelines(graph: &mut Graph, options: &LayoutOptions) {
    let order = graph.lifeline_order.clone();
    let lowest = graph
        .messages
        .iter()
        .map(|m| m.source_y.max(m.target_y))
        .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.max(y))));
    let bottom = match lowest {
        Some(y) => y + options.message_spacing,
        None => options.lifeline_y_pos + options.lifeline_header_height + options.message_spacing,
    };

    let sends_from_left = graph
        .messages
        .iter()
        .any(|m| graph[m.source].dummy && !graph[m.target].dummy);
    let mut x = options.border_spacing;
    if sends_from_left {
        x += options.lifeline_spacing / 2.0;
    }

    for (slot, &id) in order.iter().enumerate() {
        let gap = gap_after(graph, &order, slot, options);
        let ll = &mut graph[id];
        ll.position.x = x;
        ll.position.y = options.lifeline_y_pos;
        ll.size.height = bottom - options.lifeline_y_pos;
        x += ll.size.width + gap;
    }

    for &id in &order {
        shape_lifeline(graph, id, options);
        let right = graph[id].right();
        ensure_wide_enough(&mut graph.size, right, options.border_spacing);
    }
}

/// Horizontal gap after the lifeline in `slot`: the lifeline spacing, widened so labels of
/// messages to the next lifeline and of self-loops fit.
fn gap_after(graph: &Graph, order: &[LifelineId], slot: usize, options: &LayoutOptions) -> f64 {
    let a = order[slot];
    let next = order.get(slot + 1).copied();
    let half_a = graph[a].size.width / 2.0;
    let mut gap = options.lifeline_spacing;

    for &m in &graph[a].messages {
        let msg = &graph[m];
        let label = msg.label_width();
        if label <= 0.0 {
            continue;
        }
        let needed = if msg.is_self_loop() {
            options.message_spacing / 2.0 + LABEL_MARGIN / 2.0 + label + LABEL_SPACING - half_a
        } else {
            let other = if msg.source == a { msg.target } else { msg.source };
            match next {
                Some(b) if b == other => {
                    label + 2.0 * LABEL_SPACING - half_a - graph[b].size.width / 2.0
                }
                _ => continue,
            }
        };
        gap = gap.max(needed);
    }
    gap
}

/// Applies create, destruction and delete rules to a placed lifeline.
fn shape_lifeline(graph: &mut Graph, id: LifelineId, options: &LayoutOptions) {
    let messages = graph[id].messages.clone();

    let created_at = messages
        .iter()
        .map(|&m| &graph[m])
        .filter(|m| m.kind == MessageKind::Create && m.target == id && m.source != id)
        .map(|m| m.target_y)
        .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.min(y))));
    if let Some(y) = created_at {
        let ll = &mut graph[id];
        let delta = y - options.lifeline_header_height / 2.0 - ll.position.y;
        ll.position.y += delta;
        ll.size.height -= delta;
    }

    if graph[id].destruction.is_some() {
        let lowest = messages
            .iter()
            .map(|&m| graph[m].time_at(id))
            .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.max(y))));
        if let Some(y) = lowest {
            let ll = &mut graph[id];
            ll.size.height = y + options.message_spacing - ll.position.y;
        }
    }

    let deleted_at = messages
        .iter()
        .map(|&m| &graph[m])
        .filter(|m| m.kind == MessageKind::Delete && m.target == id)
        .map(|m| m.target_y)
        .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.min(y))));
    if let Some(y) = deleted_at {
        let ll = &mut graph[id];
        if ll.bottom() > y {
            ll.size.height = y - ll.position.y;
        }
    }

    let ll = &mut graph[id];
    let (center, bottom) = (ll.center_x(), ll.bottom());
    if let Some(destruction) = ll.destruction.as_mut() {
        destruction.position.x = center - destruction.size.width / 2.0;
        destruction.position.y = bottom - destruction.size.height;
    }
}

/// Re-checks the right edge of everything placed so far; later passes may have moved labels
/// and bends after their first check.
fn fit_width(graph: &mut Graph, options: &LayoutOptions) {
    let mut right = 0.0f64;
    for ll in graph.lifelines.iter().filter(|l| !l.dummy) {
        right = right.max(ll.right());
    }
    for exec in &graph.executions {
        let ll = &graph[exec.lifeline];
        if !ll.dummy {
            right = right.max(ll.position.x + exec.position.x + exec.size.width);
        }
    }
    for msg in &graph.messages {
        right = right.max(msg.source_point.x);
        if !graph[msg.target].dummy || msg.kind == MessageKind::Lost {
            right = right.max(msg.target_point.x);
        }
        for bend in &msg.bend_points {
            right = right.max(bend.x);
        }
        for label in &msg.labels {
            right = right.max(label.position.x + label.size.width);
        }
    }
    for area in &graph.areas {
        right = right.max(area.position.x + area.size.width);
    }
    for comment in &graph.comments {
        right = right.max(comment.position.x + comment.size.width);
    }
    ensure_wide_enough(&mut graph.size, right, options.border_spacing);
}

fn finish_height(graph: &mut Graph, options: &LayoutOptions) {
    let border = options.border_spacing;
    let mut bottom = options.lifeline_y_pos + options.lifeline_header_height;
    for ll in graph.lifelines.iter().filter(|l| !l.dummy) {
        bottom = bottom.max(ll.bottom());
    }
    for exec in &graph.executions {
        bottom = bottom.max(exec.bottom());
    }
    for msg in &graph.messages {
        for label in &msg.labels {
            bottom = bottom.max(label.position.y + label.size.height);
        }
    }
    for area in &graph.areas {
        bottom = bottom.max(area.position.y + area.size.height);
    }
    for comment in &graph.comments {
        bottom = bottom.max(comment.position.y + comment.size.height);
    }
    ensure_tall_enough(&mut graph.size, bottom, border);
}
