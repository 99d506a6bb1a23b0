#![forbid(unsafe_code)]

//! Headless sequence diagram layout.
//!
//! The caller describes an interaction (lifelines, messages, executions, fragments and
//! comments) as a [`Graph`]; [`layout`] orders the lifelines, assigns every message a
//! vertical layer and writes positions and sizes back into the same graph.
//!
//! Messages are ranked on an auxiliary graph with one node per message and one edge per
//! "directly precedes on a lifeline" relation. Spacer nodes reserve room for fragment
//! headers and comments, and contradictory orderings are resolved by splitting a message
//! into a source and a target half instead of reversing edges.

pub mod anchors;
pub mod config;
pub mod coordinates;
pub mod cycles;
pub mod error;
pub mod layering;
pub mod model;
pub mod pipeline;
pub mod ranking;
pub mod sorting;
pub mod space_allocation;

pub use config::{CoordinateSystem, LabelAlignment, LayoutOptions, SortingStrategy};
pub use error::{Error, Result};
pub use model::{
    AnchorKind, Area, AreaId, Attachment, Comment, CommentId, CommentKind, Connection,
    Destruction, Execution, ExecutionId, ExecutionKind, Graph, Label, Lifeline, LifelineId,
    Message, MessageId, MessageKind, Origin, Point, Size,
};
pub use pipeline::{LayoutStats, NullMonitor, ProgressMonitor};

/// Lays out `graph` in place.
///
/// Fails before touching the graph when it is not a top-level interaction, when it refers to
/// elements that do not exist, or when `options` are out of range.
pub fn layout(graph: &mut Graph, options: &LayoutOptions) -> Result<LayoutStats> {
    pipeline::run(graph, options, &mut NullMonitor)
}

/// Like [`layout`], reporting pass boundaries to `monitor` and stopping with
/// [`Error::Canceled`] when it asks to.
pub fn layout_with_monitor(
    graph: &mut Graph,
    options: &LayoutOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<LayoutStats> {
    pipeline::run(graph, options, monitor)
}
