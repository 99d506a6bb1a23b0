//! The layout pipeline.
//!
//! Passes run strictly in order and share one [`LayoutContext`]. The monitor is consulted
//! between passes only; a pass always runs to completion.

use crate::config::LayoutOptions;
use crate::error::{Error, Result};
use crate::model::Graph;
use crate::ranking::{self, RankingGraph};
use crate::{anchors, coordinates, cycles, layering, sorting, space_allocation};
use serde::Serialize;
use tracing::debug;

/// Receives pass boundaries and may cancel the layout between passes.
pub trait ProgressMonitor {
    fn begin(&mut self, _pass: &'static str) {}

    fn done(&mut self, _pass: &'static str) {}

    fn is_canceled(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullMonitor;

impl ProgressMonitor for NullMonitor {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    pub resolved_anchors: usize,
    pub spacers: usize,
    pub split_nodes: usize,
    /// Cycle-closing edges that could not be resolved by splitting.
    pub dropped_edges: usize,
    pub layers: usize,
}

pub struct LayoutContext<'a> {
    pub graph: &'a mut Graph,
    pub options: &'a LayoutOptions,
    pub ranking: RankingGraph,
    pub stats: LayoutStats,
}

impl<'a> LayoutContext<'a> {
    pub fn new(graph: &'a mut Graph, options: &'a LayoutOptions) -> Self {
        Self {
            graph,
            options,
            ranking: RankingGraph::new(),
            stats: LayoutStats::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    ResolveAnchors,
    BuildRanking,
    AllocateSpace,
    BreakCycles,
    AssignLayers,
    SortLifelines,
    CalculateCoordinates,
}

impl Pass {
    pub const ALL: [Pass; 7] = [
        Pass::ResolveAnchors,
        Pass::BuildRanking,
        Pass::AllocateSpace,
        Pass::BreakCycles,
        Pass::AssignLayers,
        Pass::SortLifelines,
        Pass::CalculateCoordinates,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pass::ResolveAnchors => "anchor resolution",
            Pass::BuildRanking => "ranking graph construction",
            Pass::AllocateSpace => "space allocation",
            Pass::BreakCycles => "cycle breaking",
            Pass::AssignLayers => "message layering",
            Pass::SortLifelines => "lifeline sorting",
            Pass::CalculateCoordinates => "coordinate calculation",
        }
    }

    pub fn run(self, ctx: &mut LayoutContext<'_>) {
        match self {
            Pass::ResolveAnchors => {
                ctx.stats.resolved_anchors = anchors::resolve_time_observations(
                    ctx.graph,
                    ctx.options.time_observation_width,
                );
            }
            Pass::BuildRanking => ctx.ranking = ranking::build(ctx.graph),
            Pass::AllocateSpace => ctx.stats.spacers = space_allocation::run(ctx),
            Pass::BreakCycles => {
                let outcome = cycles::run(ctx.graph, &mut ctx.ranking);
                ctx.stats.split_nodes = outcome.split_nodes;
                ctx.stats.dropped_edges = outcome.dropped_edges;
            }
            Pass::AssignLayers => ctx.stats.layers = layering::run(ctx.graph, &mut ctx.ranking),
            Pass::SortLifelines => sorting::run(ctx.graph, ctx.options),
            Pass::CalculateCoordinates => coordinates::run(ctx.graph, ctx.options),
        }
    }
}

pub fn run(
    graph: &mut Graph,
    options: &LayoutOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<LayoutStats> {
    if graph.enclosing_diagram.is_none() {
        return Err(Error::NotAnInteraction);
    }
    options.validate()?;
    graph.validate()?;

    let mut ctx = LayoutContext::new(graph, options);
    for pass in Pass::ALL {
        if monitor.is_canceled() {
            return Err(Error::Canceled { pass: pass.name() });
        }
        monitor.begin(pass.name());
        debug!(pass = pass.name(), "begin");
        pass.run(&mut ctx);
        debug!(pass = pass.name(), nodes = ctx.ranking.node_count(), "done");
        monitor.done(pass.name());
    }

    debug!(
        lifelines = ctx.graph.lifelines.len(),
        messages = ctx.graph.messages.len(),
        spacers = ctx.stats.spacers,
        split_nodes = ctx.stats.split_nodes,
        layers = ctx.stats.layers,
        "sequence layout finished"
    );
    Ok(ctx.stats)
}
