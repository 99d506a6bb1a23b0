//! Layout options.
//!
//! Field names serialize in camelCase so a host can pass its option bag straight through
//! `LayoutOptions::from_json`. Missing keys take the defaults below.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelAlignment {
    /// Next to the source lifeline.
    Source,
    /// Centered between source and target.
    Center,
    /// Centered between the source and its neighbor in message direction.
    #[default]
    SourceCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortingStrategy {
    /// Keep the order the lifelines were given in (by x position).
    #[default]
    Interactive,
    /// Follow message chains from the top of the diagram.
    LayerBased,
    /// Keep strongly connected lifelines next to each other.
    #[serde(alias = "SHORT_MESSAGES")]
    EqualDistribution,
}

/// Frame the coordinates are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinateSystem {
    /// Absolute diagram coordinates for every element.
    #[default]
    Kgraph,
    /// Message endpoints attached to executions are made execution-relative and scaled.
    Papyrus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub border_spacing: f64,
    /// Vertical distance between two layers.
    pub message_spacing: f64,
    pub lifeline_spacing: f64,
    pub lifeline_y_pos: f64,
    pub lifeline_header_height: f64,
    pub area_header_height: f64,
    pub time_observation_width: f64,
    pub containment_offset: f64,
    pub execution_width: f64,
    pub min_execution_height: f64,
    pub label_alignment: LabelAlignment,
    pub sorting_strategy: SortingStrategy,
    pub group_areas_when_sorting: bool,
    pub coordinate_system: CoordinateSystem,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            border_spacing: 12.0,
            message_spacing: 50.0,
            lifeline_spacing: 50.0,
            lifeline_y_pos: 10.0,
            lifeline_header_height: 30.0,
            area_header_height: 25.0,
            time_observation_width: 20.0,
            containment_offset: 5.0,
            execution_width: 16.0,
            min_execution_height: 20.0,
            label_alignment: LabelAlignment::SourceCenter,
            sorting_strategy: SortingStrategy::Interactive,
            group_areas_when_sorting: false,
            coordinate_system: CoordinateSystem::Kgraph,
        }
    }
}

impl LayoutOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Rejects spacings that would make the vertical grid degenerate.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("messageSpacing", self.message_spacing),
            ("executionWidth", self.execution_width),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidOption { name, value });
            }
        }

        let non_negative = [
            ("borderSpacing", self.border_spacing),
            ("lifelineSpacing", self.lifeline_spacing),
            ("lifelineYPos", self.lifeline_y_pos),
            ("lifelineHeaderHeight", self.lifeline_header_height),
            ("areaHeaderHeight", self.area_header_height),
            ("timeObservationWidth", self.time_observation_width),
            ("containmentOffset", self.containment_offset),
            ("minExecutionHeight", self.min_execution_height),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidOption { name, value });
            }
        }
        Ok(())
    }
}
