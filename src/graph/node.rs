use eframe::egui::{Color32, Vec2, vec2};

/// Handle to a node slot inside the [`Diagram`](super::Diagram) that issued
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

impl NodeId {
    pub(super) fn index(self) -> usize {
        self.0
    }
}

/// Closed set of visual node kinds, dispatched by tag at draw time.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Plain filled and stroked circle marker.
    Spot { fill: Color32 },
    /// Marker plus a text label sized by the keyword's relevance at draw
    /// time.
    Label { text: String, fill: Color32 },
}

pub const DEFAULT_SPOT_FILL: Color32 = Color32::from_rgb(92, 156, 228);

#[derive(Clone, Debug)]
pub struct Node {
    pub(super) kind: NodeKind,
    pub(super) position: Vec2,
    pub(super) placed: bool,
    pub(super) children: Vec<NodeId>,
}

impl Node {
    pub fn spot() -> Self {
        Self::spot_filled(DEFAULT_SPOT_FILL)
    }

    pub fn spot_filled(fill: Color32) -> Self {
        Self::with_kind(NodeKind::Spot { fill })
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Label {
            text: text.into(),
            fill: DEFAULT_SPOT_FILL,
        })
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            position: Vec2::ZERO,
            placed: false,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Position relative to the diagram origin.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.placed = true;
    }

    /// Visual bounding box used for drawing and for force calculations;
    /// every marker is the same fixed 8x8 spot.
    pub fn size(&self) -> Vec2 {
        vec2(8.0, 8.0)
    }

    pub fn label_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Label { text, .. } => Some(text),
            NodeKind::Spot { .. } => None,
        }
    }

    pub(super) fn fill(&self) -> Color32 {
        match self.kind {
            NodeKind::Spot { fill } | NodeKind::Label { fill, .. } => fill,
        }
    }
}
