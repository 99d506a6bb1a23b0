use crate::model::{LifelineId, MessageId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sequence layout needs a top-level interaction; the graph has no enclosing diagram")]
    NotAnInteraction,
    #[error("{owner} refers to missing {target}")]
    DanglingReference { owner: String, target: String },
    #[error("{message} is not listed on its endpoint {lifeline}")]
    UnlistedMessage {
        message: MessageId,
        lifeline: LifelineId,
    },
    #[error("layout option `{name}` is out of range: {value}")]
    InvalidOption { name: &'static str, value: f64 },
    #[error("failed to parse layout input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layout canceled before {pass}")]
    Canceled { pass: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
