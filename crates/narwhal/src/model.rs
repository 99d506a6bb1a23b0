//! Sequence diagram model.
//!
//! Every entity lives in an arena on [`Graph`] and is addressed by a typed index. Relations
//! (message endpoints, execution owners, area contents, comment attachments) are stored as
//! indices, so the model is free of reference cycles and serializes as plain JSON.

use crate::error::{Error, Result};
use narwhal_graphlib::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

macro_rules! arena_id {
    ($name:ident, $label:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{}"), self.0)
            }
        }
    };
}

arena_id!(LifelineId, "lifeline");
arena_id!(MessageId, "message");
arena_id!(ExecutionId, "execution");
arena_id!(AreaId, "area");
arena_id!(CommentId, "comment");

/// Opaque handle back to the host element an entity was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Origin(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lifeline {
    pub origin: Option<Origin>,
    pub name: String,
    pub position: Point,
    pub size: Size,
    /// Stands in for the diagram border or the surrounding interaction.
    pub dummy: bool,
    pub horizontal_slot: i32,
    /// Incident messages in temporal order at this lifeline. Self-loops appear once.
    pub messages: Vec<MessageId>,
    pub executions: Vec<ExecutionId>,
    pub destruction: Option<Destruction>,
}

impl Lifeline {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            size: Size::new(width, height),
            ..Default::default()
        }
    }

    /// Placeholder for the diagram border (found / lost messages, gates).
    pub fn dummy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dummy: true,
            ..Default::default()
        }
    }

    pub fn center_x(&self) -> f64 {
        self.position.x + self.size.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }
}

/// Destruction marker drawn at the bottom of a lifeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Destruction {
    pub origin: Option<Origin>,
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Synchronous,
    #[default]
    Asynchronous,
    Create,
    Delete,
    Lost,
    Found,
    Reply,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Label {
    pub size: Size,
    pub position: Point,
}

impl Label {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            position: Point::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub origin: Option<Origin>,
    pub source: LifelineId,
    pub target: LifelineId,
    pub kind: MessageKind,
    /// Time position at the source lifeline.
    pub source_y: f64,
    /// Time position at the target lifeline.
    pub target_y: f64,
    /// Layer of the source-side ranking node.
    pub layer: Option<usize>,
    /// Layer of the target-side ranking node; differs from `layer` only for split messages.
    pub target_layer: Option<usize>,
    #[serde(skip)]
    pub node: Option<NodeId>,
    #[serde(skip)]
    pub target_node: Option<NodeId>,
    pub labels: Vec<Label>,
    pub comments: Vec<CommentId>,
    pub source_point: Point,
    pub target_point: Point,
    pub bend_points: Vec<Point>,
}

impl Message {
    pub fn new(source: LifelineId, target: LifelineId, kind: MessageKind, y: f64) -> Self {
        Self {
            source,
            target,
            kind,
            source_y: y,
            target_y: y,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, width: f64, height: f64) -> Self {
        self.labels.push(Label::new(width, height));
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Time position of this message at `lifeline`.
    pub fn time_at(&self, lifeline: LifelineId) -> f64 {
        if self.source == lifeline {
            self.source_y
        } else {
            self.target_y
        }
    }

    pub fn label_width(&self) -> f64 {
        self.labels.iter().map(|l| l.size.width).fold(0.0, f64::max)
    }

    pub fn label_height(&self) -> f64 {
        self.labels.iter().map(|l| l.size.height).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionKind {
    #[default]
    Execution,
    Duration,
    TimeConstraint,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Execution {
    pub origin: Option<Origin>,
    pub kind: ExecutionKind,
    pub lifeline: LifelineId,
    /// `x` is relative to the owning lifeline's left edge; `y` is absolute.
    pub position: Point,
    pub size: Size,
    pub messages: Vec<MessageId>,
}

impl Execution {
    pub fn new(lifeline: LifelineId, kind: ExecutionKind) -> Self {
        Self {
            lifeline,
            kind,
            ..Default::default()
        }
    }

    pub fn top(&self) -> f64 {
        self.position.y
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }
}

/// A combined fragment, an interaction use, or one operand of a fragment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Area {
    pub origin: Option<Origin>,
    pub position: Point,
    pub size: Size,
    pub lifelines: Vec<LifelineId>,
    pub messages: Vec<MessageId>,
    /// Operands, top to bottom.
    pub sub_areas: Vec<AreaId>,
    /// Areas nested inside this one.
    pub contained_areas: Vec<AreaId>,
    /// First message below a message-less area.
    pub next_message: Option<MessageId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommentKind {
    #[default]
    Comment,
    Constraint,
    DurationObservation,
    TimeObservation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum Attachment {
    Lifeline(LifelineId),
    Execution(ExecutionId),
    Message(MessageId),
}

/// Which element a comment's connector points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnchorKind {
    Lifeline,
    Execution,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Connection {
    pub source: Point,
    pub target: Point,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub origin: Option<Origin>,
    pub kind: CommentKind,
    pub position: Point,
    pub size: Size,
    pub attached_to: Vec<Attachment>,
    pub anchor: Option<AnchorKind>,
    pub lifeline: Option<LifelineId>,
    pub message: Option<MessageId>,
    pub connection: Option<Connection>,
}

impl Comment {
    pub fn new(kind: CommentKind, position: Point, size: Size) -> Self {
        Self {
            kind,
            position,
            size,
            ..Default::default()
        }
    }

    /// The explicit anchor, else the kind of the first attached element.
    pub fn anchor_kind(&self) -> Option<AnchorKind> {
        self.anchor.or_else(|| {
            self.attached_to.first().map(|a| match a {
                Attachment::Lifeline(_) => AnchorKind::Lifeline,
                Attachment::Execution(_) => AnchorKind::Execution,
                Attachment::Message(_) => AnchorKind::Message,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Graph {
    /// The diagram that encloses this interaction. Layout refuses graphs without one.
    pub enclosing_diagram: Option<Origin>,
    pub lifelines: Vec<Lifeline>,
    pub messages: Vec<Message>,
    pub executions: Vec<Execution>,
    pub areas: Vec<Area>,
    pub comments: Vec<Comment>,
    /// Lifelines left to right; filled by lifeline sorting.
    pub lifeline_order: Vec<LifelineId>,
    pub size: Size,
}

impl Graph {
    pub fn interaction(diagram: Origin) -> Self {
        Self {
            enclosing_diagram: Some(diagram),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add_lifeline(&mut self, lifeline: Lifeline) -> LifelineId {
        let id = LifelineId(self.lifelines.len());
        self.lifelines.push(lifeline);
        id
    }

    /// Adds a message and records it on both endpoints, ordered by the time at each
    /// endpoint. Messages with equal times keep insertion order.
    pub fn add_message(&mut self, message: Message) -> MessageId {
        let id = MessageId(self.messages.len());
        let (source, target) = (message.source, message.target);
        self.messages.push(message);

        for lifeline in [source, target] {
            let Some(ll) = self.lifelines.get_mut(lifeline.0) else {
                continue;
            };
            if ll.messages.contains(&id) {
                continue;
            }
            let messages = &self.messages;
            let t = messages[id.0].time_at(lifeline);
            let pos = ll
                .messages
                .partition_point(|m| messages.get(m.0).is_some_and(|m| m.time_at(lifeline) <= t));
            ll.messages.insert(pos, id);
        }
        id
    }

    pub fn add_execution(&mut self, execution: Execution) -> ExecutionId {
        let id = ExecutionId(self.executions.len());
        if let Some(ll) = self.lifelines.get_mut(execution.lifeline.0) {
            ll.executions.push(id);
        }
        self.executions.push(execution);
        id
    }

    pub fn attach(&mut self, execution: ExecutionId, message: MessageId) {
        if let Some(exec) = self.executions.get_mut(execution.0) {
            if !exec.messages.contains(&message) {
                exec.messages.push(message);
            }
        }
    }

    pub fn add_area(&mut self, area: Area) -> AreaId {
        let id = AreaId(self.areas.len());
        self.areas.push(area);
        id
    }

    pub fn add_comment(&mut self, comment: Comment) -> CommentId {
        let id = CommentId(self.comments.len());
        self.comments.push(comment);
        id
    }

    pub fn lifeline_ids(&self) -> impl Iterator<Item = LifelineId> + use<> {
        (0..self.lifelines.len()).map(LifelineId)
    }

    pub fn message_ids(&self) -> impl Iterator<Item = MessageId> + use<> {
        (0..self.messages.len()).map(MessageId)
    }

    /// Non-dummy lifelines in arena order.
    pub fn real_lifelines(&self) -> Vec<LifelineId> {
        self.lifeline_ids()
            .filter(|&id| !self.lifelines[id.0].dummy)
            .collect()
    }

    /// Checks that every index points into its arena and that each message is listed on
    /// its endpoints. Layout assumes a graph that passed this check.
    pub fn validate(&self) -> Result<()> {
        let lifeline = |owner: &dyn fmt::Display, id: LifelineId| -> Result<()> {
            check(id.0 < self.lifelines.len(), owner, id)
        };
        let message = |owner: &dyn fmt::Display, id: MessageId| -> Result<()> {
            check(id.0 < self.messages.len(), owner, id)
        };
        let area = |owner: &dyn fmt::Display, id: AreaId| -> Result<()> {
            check(id.0 < self.areas.len(), owner, id)
        };

        for (ix, ll) in self.lifelines.iter().enumerate() {
            let owner = LifelineId(ix);
            for &m in &ll.messages {
                message(&owner, m)?;
            }
            for &e in &ll.executions {
                check(e.0 < self.executions.len(), &owner, e)?;
            }
        }

        for (ix, msg) in self.messages.iter().enumerate() {
            let id = MessageId(ix);
            lifeline(&id, msg.source)?;
            lifeline(&id, msg.target)?;
            for &c in &msg.comments {
                check(c.0 < self.comments.len(), &id, c)?;
            }
            for endpoint in [msg.source, msg.target] {
                if !self.lifelines[endpoint.0].messages.contains(&id) {
                    return Err(Error::UnlistedMessage {
                        message: id,
                        lifeline: endpoint,
                    });
                }
            }
        }

        for (ix, exec) in self.executions.iter().enumerate() {
            let id = ExecutionId(ix);
            lifeline(&id, exec.lifeline)?;
            for &m in &exec.messages {
                message(&id, m)?;
            }
        }

        for (ix, a) in self.areas.iter().enumerate() {
            let id = AreaId(ix);
            for &l in &a.lifelines {
                lifeline(&id, l)?;
            }
            for &m in a.messages.iter().chain(a.next_message.iter()) {
                message(&id, m)?;
            }
            for &sub in a.sub_areas.iter().chain(&a.contained_areas) {
                area(&id, sub)?;
            }
        }

        for (ix, c) in self.comments.iter().enumerate() {
            let id = CommentId(ix);
            for attachment in &c.attached_to {
                match *attachment {
                    Attachment::Lifeline(l) => lifeline(&id, l)?,
                    Attachment::Execution(e) => check(e.0 < self.executions.len(), &id, e)?,
                    Attachment::Message(m) => message(&id, m)?,
                }
            }
            if let Some(l) = c.lifeline {
                lifeline(&id, l)?;
            }
            if let Some(m) = c.message {
                message(&id, m)?;
            }
        }

        Ok(())
    }
}

fn check(ok: bool, owner: &dyn fmt::Display, target: impl fmt::Display) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::DanglingReference {
            owner: owner.to_string(),
            target: target.to_string(),
        })
    }
}

macro_rules! arena_index {
    ($id:ty, $field:ident, $item:ty) => {
        impl Index<$id> for Graph {
            type Output = $item;

            fn index(&self, id: $id) -> &$item {
                &self.$field[id.0]
            }
        }

        impl IndexMut<$id> for Graph {
            fn index_mut(&mut self, id: $id) -> &mut $item {
                &mut self.$field[id.0]
            }
        }
    };
}

arena_index!(LifelineId, lifelines, Lifeline);
arena_index!(MessageId, messages, Message);
arena_index!(ExecutionId, executions, Execution);
arena_index!(AreaId, areas, Area);
arena_index!(CommentId, comments, Comment);
