//! Drag Session State
//!
//! Tracks an in-flight drag from sensor events and emits one drag-end
//! descriptor per completed drag.
//! Uses movement threshold to distinguish click from drag.

use serde::{Deserialize, Serialize};

/// Suffix of the wire id that stands for "drop into this empty category list"
pub const EMPTY_LIST_SUFFIX: &str = "-empty";

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Drop target types
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DropTarget {
    /// Drop on a node (item, group header or category)
    Node(String),
    /// Drop into the empty direct item list of a category
    EmptyList(String),
}

impl DropTarget {
    /// Decode a wire id, recognizing the `<category-id>-empty` zone form
    pub fn from_wire(raw: &str) -> Self {
        match raw.strip_suffix(EMPTY_LIST_SUFFIX) {
            Some(category_id) if !category_id.is_empty() => {
                DropTarget::EmptyList(category_id.to_string())
            }
            _ => DropTarget::Node(raw.to_string()),
        }
    }

    /// Encode back to the wire id
    pub fn to_wire(&self) -> String {
        match self {
            DropTarget::Node(id) => id.clone(),
            DropTarget::EmptyList(category_id) => format!("{}{}", category_id, EMPTY_LIST_SUFFIX),
        }
    }

    /// Zone for the empty direct list of `category_id`
    pub fn empty_list(category_id: impl Into<String>) -> Self {
        DropTarget::EmptyList(category_id.into())
    }

    pub fn node(id: impl Into<String>) -> Self {
        DropTarget::Node(id.into())
    }
}

impl From<String> for DropTarget {
    fn from(raw: String) -> Self {
        DropTarget::from_wire(&raw)
    }
}

impl From<DropTarget> for String {
    fn from(target: DropTarget) -> Self {
        target.to_wire()
    }
}

/// What is being dragged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    Group,
    #[default]
    Item,
}

impl DragKind {
    /// Classify from the payload type attached to the dragged element.
    /// Only an explicit `"group"` payload is a group drag.
    pub fn from_payload(payload_type: Option<&str>) -> Self {
        match payload_type {
            Some("group") => DragKind::Group,
            _ => DragKind::Item,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DragKind::Group => "group",
            DragKind::Item => "item",
        }
    }
}

/// Which half of the hovered target the dragged element is over
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertionSide {
    Above,
    Below,
}

impl InsertionSide {
    /// `Above` when the active center is strictly above the target center
    pub fn from_centers(active_center_y: f64, over_center_y: f64) -> Self {
        if active_center_y < over_center_y {
            InsertionSide::Above
        } else {
            InsertionSide::Below
        }
    }
}

/// Vertical extent of an element, in the host's coordinate space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Immutable descriptor handed to the move classifier when a drag completes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEnd {
    pub active_id: String,
    #[serde(rename = "overId")]
    pub over: Option<DropTarget>,
    #[serde(rename = "dragKind")]
    pub kind: DragKind,
    #[serde(default)]
    pub insertion_side: Option<InsertionSide>,
}

impl DragEnd {
    /// Item drag ending over `over`
    pub fn item(active_id: impl Into<String>, over: Option<DropTarget>) -> Self {
        Self {
            active_id: active_id.into(),
            over,
            kind: DragKind::Item,
            insertion_side: None,
        }
    }

    /// Group drag ending over `over`
    pub fn group(active_id: impl Into<String>, over: Option<DropTarget>) -> Self {
        Self {
            active_id: active_id.into(),
            over,
            kind: DragKind::Group,
            insertion_side: None,
        }
    }

    pub fn with_side(mut self, side: InsertionSide) -> Self {
        self.insertion_side = Some(side);
        self
    }

    /// True when the drag was released over the dragged node itself.
    /// Compared on the wire id, so a node named `<x>-empty` still matches.
    pub fn is_self_drop(&self) -> bool {
        self.over
            .as_ref()
            .is_some_and(|over| over.to_wire() == self.active_id)
    }
}

/// Events delivered by the host's pointer/keyboard sensors, in order
#[derive(Clone, Debug, PartialEq)]
pub enum SensorEvent {
    Start {
        active_id: String,
        /// Payload type attached to the dragged element
        payload_type: Option<String>,
    },
    Over {
        over: Option<DropTarget>,
        active_rect: Rect,
        over_rect: Option<Rect>,
    },
    End,
    Cancel,
}

/// The drag currently in flight
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveDrag {
    pub active_id: String,
    pub kind: DragKind,
    pub over: Option<DropTarget>,
    pub insertion_side: Option<InsertionSide>,
}

/// Session state
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Drag session state machine: `Idle -> Dragging -> Idle`
#[derive(Clone, Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag),
            DragState::Idle => None,
        }
    }

    /// Feed one sensor event; returns the descriptor when a drag completes
    pub fn handle(&mut self, event: SensorEvent) -> Option<DragEnd> {
        match event {
            SensorEvent::Start { active_id, payload_type } => {
                self.start(active_id, DragKind::from_payload(payload_type.as_deref()));
                None
            }
            SensorEvent::Over { over, active_rect, over_rect } => {
                self.over(over, active_rect, over_rect);
                None
            }
            SensorEvent::End => self.end(),
            SensorEvent::Cancel => {
                self.cancel();
                None
            }
        }
    }

    /// Begin a drag. A start while already dragging discards the old drag.
    pub fn start(&mut self, active_id: impl Into<String>, kind: DragKind) {
        let active_id = active_id.into();
        if let DragState::Dragging(previous) = &self.state {
            tracing::warn!(
                previous = %previous.active_id,
                next = %active_id,
                "drag started while another drag was in flight; discarding the old one"
            );
        }
        tracing::trace!(active = %active_id, kind = kind.as_str(), "drag start");
        self.state = DragState::Dragging(ActiveDrag {
            active_id,
            kind,
            over: None,
            insertion_side: None,
        });
    }

    /// Hover update. Recomputes the insertion side from vertical centers.
    pub fn over(&mut self, over: Option<DropTarget>, active_rect: Rect, over_rect: Option<Rect>) {
        let DragState::Dragging(drag) = &mut self.state else {
            return;
        };
        drag.insertion_side = match (&over, over_rect) {
            (Some(_), Some(rect)) => Some(InsertionSide::from_centers(
                active_rect.center_y(),
                rect.center_y(),
            )),
            _ => None,
        };
        drag.over = over;
    }

    /// End drag operation, emitting exactly one descriptor
    pub fn end(&mut self) -> Option<DragEnd> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(drag) => {
                tracing::trace!(
                    active = %drag.active_id,
                    over = ?drag.over,
                    "drag end"
                );
                Some(DragEnd {
                    active_id: drag.active_id,
                    over: drag.over,
                    kind: drag.kind,
                    insertion_side: drag.insertion_side,
                })
            }
            DragState::Idle => None,
        }
    }

    /// Abort the drag, discarding all in-flight data
    pub fn cancel(&mut self) {
        if let DragState::Dragging(drag) = std::mem::take(&mut self.state) {
            tracing::trace!(active = %drag.active_id, "drag cancelled");
        }
    }
}

/// Pending pointer press that only becomes a drag after moving past the threshold
#[derive(Clone, Debug)]
pub struct ActivationGuard {
    pending: Option<(String, f64, f64)>,
    threshold: f64,
}

impl Default for ActivationGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivationGuard {
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD_PX)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { pending: None, threshold }
    }

    /// Record pending drag with start position
    pub fn pointer_down(&mut self, id: impl Into<String>, x: f64, y: f64) {
        self.pending = Some((id.into(), x, y));
    }

    /// Returns the id to start dragging once moved enough on either axis
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<String> {
        let (_, start_x, start_y) = self.pending.as_ref()?;
        let dx = (x - start_x).abs();
        let dy = (y - start_y).abs();
        if dx > self.threshold || dy > self.threshold {
            self.pending.take().map(|(id, _, _)| id)
        } else {
            None
        }
    }

    /// Clear pending state (click, not a drag)
    pub fn pointer_up(&mut self) {
        self.pending = None;
    }

    pub fn pending_id(&self) -> Option<&str> {
        self.pending.as_ref().map(|(id, _, _)| id.as_str())
    }
}
