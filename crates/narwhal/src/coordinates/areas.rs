//! Fragment boxes.
//!
//! An area covers its messages (with labels) and the lifelines it spans, plus a header
//! band above the first message. Nested areas grow by the containment offset around each
//! contained area, operands split their parent's box vertically, and message-less areas
//! are pinned just above their next message.

use crate::config::LayoutOptions;
use crate::model::{AreaId, Graph, MessageId};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Rect {
    fn point(x: f64, y: f64) -> Self {
        Self {
            left: x,
            top: y,
            right: x,
            bottom: y,
        }
    }

    fn include(&mut self, other: Rect) {
        self.left = self.left.min(other.left);
        self.top = self.top.min(other.top);
        self.right = self.right.max(other.right);
        self.bottom = self.bottom.max(other.bottom);
    }

    fn include_point(&mut self, x: f64, y: f64) {
        self.include(Rect::point(x, y));
    }

    fn grown(self, by: f64) -> Self {
        Self {
            left: self.left - by,
            top: self.top - by,
            right: self.right + by,
            bottom: self.bottom + by,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    Active,
    Finished,
}

pub(super) fn place(graph: &mut Graph, options: &LayoutOptions) {
    let n = graph.areas.len();
    if n == 0 {
        return;
    }

    let content: Vec<Option<Rect>> = (0..n)
        .map(|ix| message_bounds(graph, &graph.areas[ix].messages))
        .collect();
    let mut boxes: Vec<Option<Rect>> = (0..n)
        .map(|ix| base_box(graph, AreaId(ix), content[ix], options))
        .collect();

    let mut state = vec![Visit::Pending; n];
    for ix in 0..n {
        nest(graph, ix, &mut boxes, &mut state, options.containment_offset);
    }

    for (ix, rect) in boxes.iter().enumerate() {
        if let Some(rect) = rect {
            let area = &mut graph.areas[ix];
            area.position.x = rect.left;
            area.position.y = rect.top;
            area.size.width = rect.right - rect.left;
            area.size.height = rect.bottom - rect.top;
        }
    }

    for ix in 0..n {
        if let Some(parent) = boxes[ix] {
            split_operands(graph, AreaId(ix), parent, &content, options);
        }
    }
}

/// Extent of the messages and their labels.
fn message_bounds(graph: &Graph, messages: &[MessageId]) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    for &m in messages {
        let msg = &graph[m];
        let mut r = Rect::point(msg.source_point.x, msg.source_point.y);
        r.include_point(msg.target_point.x, msg.target_point.y);
        for bend in &msg.bend_points {
            r.include_point(bend.x, bend.y);
        }
        for label in &msg.labels {
            r.include_point(label.position.x, label.position.y);
            r.include_point(
                label.position.x + label.size.width,
                label.position.y + label.size.height,
            );
        }
        match bounds.as_mut() {
            Some(b) => b.include(r),
            None => bounds = Some(r),
        }
    }
    bounds
}

/// Left and right edges of the real lifelines an area spans.
fn lifeline_span(graph: &Graph, area: AreaId) -> Option<(f64, f64)> {
    let mut span: Option<(f64, f64)> = None;
    for &l in &graph[area].lifelines {
        let ll = &graph[l];
        if ll.dummy {
            continue;
        }
        span = Some(match span {
            None => (ll.position.x, ll.right()),
            Some((left, right)) => (left.min(ll.position.x), right.max(ll.right())),
        });
    }
    span
}

fn base_box(
    graph: &Graph,
    area: AreaId,
    content: Option<Rect>,
    options: &LayoutOptions,
) -> Option<Rect> {
    let span = lifeline_span(graph, area);

    if let Some(content) = content {
        let mut rect = content;
        if let Some((left, right)) = span {
            rect.left = rect.left.min(left);
            rect.right = rect.right.max(right);
        }
        rect.left -= options.containment_offset;
        rect.right += options.containment_offset;
        rect.top -= options.area_header_height;
        rect.bottom += options.message_spacing / 2.0;
        return Some(rect);
    }

    // Without messages the area needs a next message to hang from; otherwise the caller's
    // extent stays.
    let next = graph[area].next_message?;
    let msg = &graph[next];
    let next_y = msg.source_point.y.min(msg.target_point.y);
    let (left, right) = span.unwrap_or((
        options.border_spacing,
        (graph.size.width - options.border_spacing).max(options.border_spacing),
    ));
    Some(Rect {
        left: left - options.containment_offset,
        top: next_y - 2.0 * options.message_spacing,
        right: right + options.containment_offset,
        bottom: next_y - options.message_spacing / 2.0,
    })
}

/// Post-order walk over `contained_areas`; a parent's box grows around each child's final
/// box by `offset`. Reference cycles in the input are ignored.
fn nest(graph: &Graph, root: usize, boxes: &mut [Option<Rect>], state: &mut [Visit], offset: f64) {
    if state[root] != Visit::Pending {
        return;
    }
    state[root] = Visit::Active;
    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

    while let Some(&(ix, cursor)) = stack.last() {
        if let Some(&child) = graph.areas[ix].contained_areas.get(cursor) {
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            if state[child.0] == Visit::Pending {
                state[child.0] = Visit::Active;
                stack.push((child.0, 0));
            }
            continue;
        }

        for &child in &graph.areas[ix].contained_areas {
            if state[child.0] != Visit::Finished || child.0 == ix {
                continue;
            }
            let Some(child_box) = boxes[child.0] else {
                continue;
            };
            let grown = child_box.grown(offset);
            match boxes[ix].as_mut() {
                Some(b) => b.include(grown),
                None => boxes[ix] = Some(grown),
            }
        }
        state[ix] = Visit::Finished;
        stack.pop();
    }
}

/// Stacks operands inside their parent: each gets the parent's width, the first starts
/// below the header, and boundaries fall midway between neighboring operands' messages.
fn split_operands(
    graph: &mut Graph,
    parent: AreaId,
    rect: Rect,
    content: &[Option<Rect>],
    options: &LayoutOptions,
) {
    let operands = graph[parent].sub_areas.clone();
    if operands.is_empty() {
        return;
    }

    let mut with_messages: Vec<(AreaId, Rect)> = operands
        .iter()
        .filter_map(|&op| content.get(op.0).copied().flatten().map(|r| (op, r)))
        .collect();
    with_messages.sort_by(|a, b| a.1.top.total_cmp(&b.1.top));
    let empty: Vec<AreaId> = operands
        .iter()
        .copied()
        .filter(|op| !with_messages.iter().any(|(o, _)| o == op))
        .collect();

    let first_top = (rect.top + options.area_header_height).min(rect.bottom);
    let mut tops: Vec<f64> = Vec::with_capacity(with_messages.len());
    for (i, (_, r)) in with_messages.iter().enumerate() {
        let top = match i {
            0 => first_top,
            _ => {
                let prev_bottom = with_messages[i - 1].1.bottom;
                ((prev_bottom + r.top) / 2.0).max(tops[i - 1])
            }
        };
        tops.push(top);
    }

    for (i, (op, _)) in with_messages.iter().enumerate() {
        let top = tops[i];
        let bottom = tops.get(i + 1).copied().unwrap_or(rect.bottom);
        set_box(graph, *op, rect.left, top, rect.right, bottom);
    }

    // Operands without messages collapse onto the parent's bottom edge.
    for op in empty {
        let top = if with_messages.is_empty() {
            first_top
        } else {
            rect.bottom
        };
        set_box(graph, op, rect.left, top, rect.right, rect.bottom);
    }
}

fn set_box(graph: &mut Graph, area: AreaId, left: f64, top: f64, right: f64, bottom: f64) {
    let a = &mut graph[area];
    a.position.x = left;
    a.position.y = top;
    a.size.width = right - left;
    a.size.height = (bottom - top).max(0.0);
}
