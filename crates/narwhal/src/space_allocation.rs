//! Reserves vertical room for area headers, comments and empty areas by inserting spacer
//! nodes into the ranking graph.

use crate::model::{Attachment, CommentId, Graph, MessageId};
use crate::pipeline::LayoutContext;
use crate::ranking::{RankingGraph, insert_spacer_before};
use tracing::{debug, warn};

/// Spacers reserved above the next message of an area without messages.
const EMPTY_AREA_SPACERS: usize = 2;
/// Upper bound of spacers reserved for a single comment.
pub const MAX_COMMENT_SPACERS: usize = 64;

/// Returns the number of spacers inserted.
pub fn run(ctx: &mut LayoutContext<'_>) -> usize {
    let graph = &mut *ctx.graph;
    let rg = &mut ctx.ranking;

    let headers = allocate_area_headers(graph, rg);
    let comments = allocate_comments(graph, rg, ctx.options.message_spacing);
    let empty = allocate_empty_areas(graph, rg);

    debug!(headers, comments, empty, "space allocated");
    headers + comments + empty
}

fn allocate_area_headers(graph: &Graph, rg: &mut RankingGraph) -> usize {
    let mut inserted = 0;
    for area in &graph.areas {
        if area.sub_areas.is_empty() {
            continue;
        }
        let Some(uppermost) = uppermost_message(graph, &area.messages) else {
            continue;
        };
        if let Some(node) = graph[uppermost].node {
            insert_spacer_before(rg, node);
            inserted += 1;
        }
    }
    inserted
}

/// Records every message a comment is attached to and reserves enough layers above that
/// message for the comment's height.
fn allocate_comments(graph: &mut Graph, rg: &mut RankingGraph, message_spacing: f64) -> usize {
    let mut inserted = 0;
    for ix in 0..graph.comments.len() {
        let comment = CommentId(ix);
        let attached: Vec<MessageId> = graph[comment]
            .attached_to
            .iter()
            .filter_map(|a| match *a {
                Attachment::Message(m) => Some(m),
                _ => None,
            })
            .collect();
        let height = graph[comment].size.height;

        for m in attached {
            graph[comment].message = Some(m);
            if !graph[m].comments.contains(&comment) {
                graph[m].comments.push(comment);
            }
            let Some(node) = graph[m].node else {
                continue;
            };
            for _ in 0..spacers_for(height, message_spacing) {
                insert_spacer_before(rg, node);
                inserted += 1;
            }
        }
    }
    inserted
}

fn allocate_empty_areas(graph: &Graph, rg: &mut RankingGraph) -> usize {
    let mut inserted = 0;
    for area in &graph.areas {
        if !area.messages.is_empty() {
            continue;
        }
        let Some(next) = area.next_message else {
            continue;
        };
        if let Some(node) = graph[next].node {
            for _ in 0..EMPTY_AREA_SPACERS {
                insert_spacer_before(rg, node);
            }
            inserted += EMPTY_AREA_SPACERS;
        }
    }
    inserted
}

/// `ceil(height / message_spacing)`, zero for empty comments, at most
/// [`MAX_COMMENT_SPACERS`].
pub fn spacers_for(height: f64, message_spacing: f64) -> usize {
    if height.is_nan() || height <= 0.0 || message_spacing <= 0.0 {
        return 0;
    }
    let layers = (height / message_spacing).ceil();
    if !layers.is_finite() || layers > MAX_COMMENT_SPACERS as f64 {
        warn!(height, message_spacing, "comment too tall, capping reserved layers");
        return MAX_COMMENT_SPACERS;
    }
    layers as usize
}

/// The message with the smallest source time; the first one wins ties.
fn uppermost_message(graph: &Graph, messages: &[MessageId]) -> Option<MessageId> {
    let mut best: Option<MessageId> = None;
    for &m in messages {
        if best.is_none_or(|b| graph[m].source_y < graph[b].source_y) {
            best = Some(m);
        }
    }
    best
}
