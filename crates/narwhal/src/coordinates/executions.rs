//! Execution extents, side-by-side arrangement of nested executions, and message endpoints
//! snapped to execution edges.

use super::ensure_wide_enough;
use crate::config::LayoutOptions;
use crate::model::{ExecutionId, ExecutionKind, Graph, LifelineId, MessageKind};

pub(super) fn place(graph: &mut Graph, options: &LayoutOptions) {
    for id in graph.lifeline_ids() {
        if graph[id].dummy || graph[id].executions.is_empty() {
            continue;
        }
        let executions = graph[id].executions.clone();
        for &e in &executions {
            fit_to_messages(graph, id, e);
        }
        arrange(graph, id, &executions, options);
        for &e in &executions {
            snap_messages(graph, id, e, options);
            let ll = &graph[id];
            let right = ll.position.x + graph[e].position.x + graph[e].size.width;
            ensure_wide_enough(&mut graph.size, right, options.border_spacing);
        }
    }
}

/// The first attached message initializes the extent, every further one extends it.
/// Executions without messages keep the extent they were given.
fn fit_to_messages(graph: &mut Graph, lifeline: LifelineId, e: ExecutionId) {
    let mut extent: Option<(f64, f64)> = None;
    for &m in &graph[e].messages {
        let msg = &graph[m];
        let mut ys = Vec::with_capacity(2);
        if msg.source == lifeline {
            ys.push(msg.source_y);
        }
        if msg.target == lifeline {
            ys.push(msg.target_y);
        }
        for y in ys {
            extent = Some(match extent {
                None => (y, y),
                Some((top, bottom)) => (top.min(y), bottom.max(y)),
            });
        }
    }

    if let Some((top, bottom)) = extent {
        let exec = &mut graph[e];
        exec.position.y = top;
        exec.size.height = bottom - top;
    }
}

/// Centers executions on the lifeline and staggers overlapping plain executions. Taken by
/// top (taller first on ties), each one gets the lowest level no earlier overlapping execution
/// holds and moves right by `executionWidth / 2` per level.
fn arrange(
    graph: &mut Graph,
    lifeline: LifelineId,
    executions: &[ExecutionId],
    options: &LayoutOptions,
) {
    let lifeline_width = graph[lifeline].size.width;

    for &e in executions {
        let exec = &mut graph[e];
        exec.position.x = (lifeline_width - options.execution_width) / 2.0;
        exec.size.height = exec.size.height.max(options.min_execution_height);
        if exec.kind == ExecutionKind::Execution {
            exec.size.width = options.execution_width;
        }
    }

    let mut plain: Vec<ExecutionId> = executions
        .iter()
        .copied()
        .filter(|&e| graph[e].kind == ExecutionKind::Execution)
        .collect();
    if plain.len() < 2 {
        return;
    }
    plain.sort_by(|&a, &b| {
        graph[a]
            .top()
            .total_cmp(&graph[b].top())
            .then(graph[b].size.height.total_cmp(&graph[a].size.height))
    });

    let mut placed: Vec<(f64, f64, usize)> = Vec::with_capacity(plain.len());
    for e in plain {
        let (top, bottom) = (graph[e].top(), graph[e].bottom());
        let taken: Vec<usize> = placed
            .iter()
            .filter(|&&(t, b, _)| top < b && t < bottom)
            .map(|&(_, _, level)| level)
            .collect();
        let level = (0..).find(|l| !taken.contains(l)).unwrap_or_default();
        placed.push((top, bottom, level));
        graph[e].position.x += level as f64 * options.execution_width / 2.0;
    }
}

/// Moves the endpoints of attached messages onto the execution's edge that faces the other
/// end. Labels follow a moved source end; self-loops leave and re-enter on the right edge and
/// drag their bends along too.
fn snap_messages(
    graph: &mut Graph,
    lifeline: LifelineId,
    e: ExecutionId,
    options: &LayoutOptions,
) {
    let left = graph[lifeline].position.x + graph[e].position.x;
    let right = left + graph[e].size.width;

    for m in graph[e].messages.clone() {
        let msg = &mut graph[m];
        let mut label_delta = 0.0;
        if msg.is_self_loop() {
            if msg.source != lifeline {
                continue;
            }
            label_delta = right - msg.source_point.x;
            msg.source_point.x = right;
            msg.target_point.x = right;
            for bend in &mut msg.bend_points {
                bend.x += label_delta;
            }
        } else {
            if msg.source == lifeline {
                let x = if msg.target_point.x < msg.source_point.x {
                    left
                } else {
                    right
                };
                label_delta = x - msg.source_point.x;
                msg.source_point.x = x;
            }
            if msg.target == lifeline && msg.kind != MessageKind::Create {
                msg.target_point.x = if msg.source_point.x > msg.target_point.x {
                    right
                } else {
                    left
                };
            }
        }

        if label_delta == 0.0 {
            continue;
        }
        let mut label_right = 0.0f64;
        for label in &mut msg.labels {
            label.position.x += label_delta;
            label_right = label_right.max(label.position.x + label.size.width);
        }
        ensure_wide_enough(&mut graph.size, label_right, options.border_spacing);
    }
}
