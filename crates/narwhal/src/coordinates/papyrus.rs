//! Execution-relative message coordinates.
//!
//! Editors that store message ends relative to the execution they attach to need the
//! execution's message span stretched over the lifeline body. The span maps onto the
//! lifeline height minus [`LIFELINE_INSET`], starting right below the header.

use crate::config::LayoutOptions;
use crate::model::Graph;
use tracing::debug;

pub const LIFELINE_INSET: f64 = 20.0;

pub fn apply(graph: &mut Graph, options: &LayoutOptions) {
    for e in 0..graph.executions.len() {
        let exec = &graph.executions[e];
        let lifeline = exec.lifeline;
        let ends: Vec<(usize, bool, f64)> = exec
            .messages
            .iter()
            .flat_map(|&m| {
                let msg = &graph[m];
                let source = (msg.source == lifeline).then_some((m.0, true, msg.source_point.y));
                let target = (msg.target == lifeline && !msg.is_self_loop())
                    .then_some((m.0, false, msg.target_point.y));
                source.into_iter().chain(target)
            })
            .collect();
        let Some(min) = ends.iter().map(|&(_, _, y)| y).reduce(f64::min) else {
            continue;
        };
        let max = ends.iter().map(|&(_, _, y)| y).fold(min, f64::max);

        let effective_height = graph[lifeline].size.height - LIFELINE_INSET;
        let factor = scale_factor(effective_height, max - min);

        for (m, at_source, y) in ends {
            let relative = y - min;
            let scaled = if relative == 0.0 {
                0.0
            } else {
                options.lifeline_header_height + relative * factor
            };
            let msg = &mut graph.messages[m];
            if at_source {
                msg.source_point.y = scaled;
            } else {
                msg.target_point.y = scaled;
            }
        }
    }
}

/// Ratio between the lifeline body and an execution's message span. A zero-length span
/// (a single message, or messages on one layer) maps with factor 1.
pub fn scale_factor(effective_height: f64, span: f64) -> f64 {
    if span.abs() <= f64::EPSILON || !span.is_finite() || !effective_height.is_finite() {
        debug!(span, effective_height, "degenerate execution span, using factor 1");
        return 1.0;
    }
    effective_height / span
}
