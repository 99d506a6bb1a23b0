//! Keeps messages short by placing strongly connected lifelines next to each other.
//!
//! Lifelines are weighted by the messages they exchange. Starting from the busiest lifeline,
//! the unplaced lifeline with the strongest ties to the placed ones is appended to whichever
//! end of the row keeps the weighted message length smaller, so traffic spreads evenly to
//! both sides. With area grouping, lifelines that share a fragment attract each other too.

use crate::model::{Graph, LifelineId};
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

/// Extra weight of a message that lies inside a fragment when grouping is enabled.
const AREA_MESSAGE_WEIGHT: f64 = 1.0;
/// Attraction between two lifelines covered by the same fragment.
const AREA_MEMBER_WEIGHT: f64 = 0.5;

pub fn sort(graph: &Graph, group_areas: bool) -> Vec<LifelineId> {
    let real = graph.real_lifelines();
    let weights = connection_weights(graph, &real, group_areas);
    if weights.is_empty() {
        return real;
    }
    let weight = |a: LifelineId, b: LifelineId| weights.get(&key(a, b)).copied().unwrap_or(0.0);

    let mut placed = vec![false; graph.lifelines.len()];
    let mut row: VecDeque<LifelineId> = VecDeque::with_capacity(real.len());

    while row.len() < real.len() {
        let next = strongest_unplaced(&real, &placed, &row, &weight);
        let Some((candidate, pull)) = next else {
            break;
        };
        placed[candidate.0] = true;

        if pull <= 0.0 {
            // Seeds a new group: the busiest remaining lifeline, or the next in input order.
            row.push_back(candidate);
            continue;
        }

        let len = row.len() as f64;
        let mut cost_left = 0.0;
        let mut cost_right = 0.0;
        for (ix, &other) in row.iter().enumerate() {
            let w = weight(candidate, other);
            cost_left += w * (ix as f64 + 1.0);
            cost_right += w * (len - ix as f64);
        }
        if cost_left < cost_right {
            row.push_front(candidate);
        } else {
            row.push_back(candidate);
        }
    }

    row.into()
}

/// The unplaced lifeline most strongly tied to `row`, with its total tie weight. When nothing
/// is tied to the row, the busiest unplaced lifeline is returned with a pull of zero.
fn strongest_unplaced(
    real: &[LifelineId],
    placed: &[bool],
    row: &VecDeque<LifelineId>,
    weight: &impl Fn(LifelineId, LifelineId) -> f64,
) -> Option<(LifelineId, f64)> {
    let mut best: Option<(LifelineId, f64)> = None;
    for &id in real {
        if placed[id.0] {
            continue;
        }
        let pull: f64 = row.iter().map(|&other| weight(id, other)).sum();
        if best.is_none_or(|(_, p)| pull > p) {
            best = Some((id, pull));
        }
    }

    match best {
        Some((_, pull)) if pull > 0.0 => best,
        _ => {
            let mut busiest: Option<(LifelineId, f64)> = None;
            for &id in real {
                if placed[id.0] {
                    continue;
                }
                let total: f64 = real.iter().map(|&other| weight(id, other)).sum();
                if busiest.is_none_or(|(_, t)| total > t) {
                    busiest = Some((id, total));
                }
            }
            busiest.map(|(id, _)| (id, 0.0))
        }
    }
}

fn connection_weights(
    graph: &Graph,
    real: &[LifelineId],
    group_areas: bool,
) -> HashMap<(LifelineId, LifelineId), f64> {
    let mut weights: HashMap<(LifelineId, LifelineId), f64> = HashMap::default();
    let in_area: Vec<bool> = if group_areas {
        let mut flags = vec![false; graph.messages.len()];
        for area in &graph.areas {
            for &m in &area.messages {
                flags[m.0] = true;
            }
        }
        flags
    } else {
        Vec::new()
    };

    for (ix, msg) in graph.messages.iter().enumerate() {
        if msg.is_self_loop() || graph[msg.source].dummy || graph[msg.target].dummy {
            continue;
        }
        let bonus = if in_area.get(ix).copied().unwrap_or(false) {
            AREA_MESSAGE_WEIGHT
        } else {
            0.0
        };
        *weights.entry(key(msg.source, msg.target)).or_insert(0.0) += 1.0 + bonus;
    }

    if group_areas {
        for area in &graph.areas {
            let members: Vec<LifelineId> = area
                .lifelines
                .iter()
                .copied()
                .filter(|id| real.contains(id))
                .collect();
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    if a != b {
                        *weights.entry(key(a, b)).or_insert(0.0) += AREA_MEMBER_WEIGHT;
                    }
                }
            }
        }
    }

    weights
}

fn key(a: LifelineId, b: LifelineId) -> (LifelineId, LifelineId) {
    if a <= b { (a, b) } else { (b, a) }
}
