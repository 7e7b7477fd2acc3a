use std::collections::{HashMap, HashSet};

use eframe::egui::{Color32, Pos2, Rect, Stroke, Vec2, vec2};

use super::layout;
use super::node::{Node, NodeId};
use super::surface::{DrawingSurface, DrawnLabel, LabelScale};

const EDGE_STROKE: Stroke = Stroke {
    width: 1.0,
    color: Color32::from_gray(128),
};
const SPOT_STROKE: Stroke = Stroke {
    width: 1.0,
    color: Color32::BLACK,
};
const LABEL_COLOR: Color32 = Color32::WHITE;
const LABEL_GAP: f32 = 5.0;

/// Owning container for a set of nodes and their connections. Nodes live in
/// a slot arena; insertion order is retained so layout seeding stays
/// deterministic. Edges never reference another diagram's slots.
#[derive(Default)]
pub struct Diagram {
    pub(super) slots: Vec<Option<Node>>,
    pub(super) order: Vec<NodeId>,
    free: Vec<usize>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.is_some())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub(super) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .and_then(|slot| slot.as_mut())
    }

    /// Attaches a standalone node and returns its handle.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };
        self.order.push(id);
        id
    }

    /// Detaches a node, stripping every edge that referenced it.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.slots.get_mut(id.index()).and_then(Option::take)?;
        self.free.push(id.index());
        self.order.retain(|&other| other != id);
        for slot in self.slots.iter_mut().flatten() {
            slot.children.retain(|&child| child != id);
        }
        Some(node)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
        self.free.clear();
    }

    /// Live nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.order
            .iter()
            .map(|&id| (id, self.node(id).expect("live slot")))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Stored edges as ordered (parent, child) pairs, parents in insertion
    /// order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> {
        self.nodes()
            .flat_map(|(id, node)| node.children.iter().map(move |&child| (id, child)))
    }

    /// Connects `child` under `parent`. Refused without mutation for a
    /// self-connection, an existing edge, or a dead handle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(child) {
            return false;
        }

        let Some(parent_node) = self.node_mut(parent) else {
            return false;
        };
        if parent_node.children.contains(&child) {
            return false;
        }

        parent_node.children.push(child);
        true
    }

    pub fn add_parent(&mut self, child: NodeId, parent: NodeId) -> bool {
        self.add_child(parent, child)
    }

    /// Removes the edge between `a` and `b`, whichever side stored it;
    /// returns whether one existed.
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> bool {
        let mut removed = false;
        if let Some(node) = self.node_mut(a) {
            let before = node.children.len();
            node.children.retain(|&child| child != b);
            removed |= node.children.len() != before;
        }
        if let Some(node) = self.node_mut(b) {
            let before = node.children.len();
            node.children.retain(|&child| child != a);
            removed |= node.children.len() != before;
        }
        removed
    }

    /// Moves a node and every node reachable through its children out of
    /// `source` into this diagram, returning the remapped handle. Edges from
    /// unmoved `source` nodes into the moved set are dropped.
    pub fn adopt(&mut self, source: &mut Diagram, id: NodeId) -> Option<NodeId> {
        if !source.contains(id) {
            return None;
        }

        let mut moved = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            moved.push(current);
            for &child in source.children(current).iter().rev() {
                stack.push(child);
            }
        }

        let moved_set: HashSet<NodeId> = moved.iter().copied().collect();
        let mut remapped = HashMap::with_capacity(moved.len());
        for &old_id in &moved {
            let node = source
                .slots
                .get_mut(old_id.index())
                .and_then(Option::take)
                .expect("moved slot is live");
            source.free.push(old_id.index());
            remapped.insert(old_id, self.insert(node));
        }
        source.order.retain(|old_id| !moved_set.contains(old_id));
        for slot in source.slots.iter_mut().flatten() {
            slot.children.retain(|child| !moved_set.contains(child));
        }

        for &new_id in remapped.values() {
            let node = self.node_mut(new_id).expect("live slot");
            for child in &mut node.children {
                *child = remapped[child];
            }
        }

        remapped.get(&id).copied()
    }

    /// Cross-diagram `add_child`: adopts `child` with its subtree, then
    /// connects it under `parent`.
    pub fn add_child_from(
        &mut self,
        parent: NodeId,
        source: &mut Diagram,
        child: NodeId,
    ) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let adopted = self.adopt(source, child)?;
        self.add_child(parent, adopted);
        Some(adopted)
    }

    /// Runs the force-directed relaxation pass. Idempotent on an unchanged
    /// graph.
    pub fn arrange(&mut self) {
        layout::run(self);
    }

    /// Pure read of current positions: every connector line first, node
    /// glyphs on top. Returns the drawn label bounds for hit-testing.
    pub fn draw(
        &self,
        surface: &mut dyn DrawingSurface,
        bounds: Rect,
        scale: f32,
        labels: &LabelScale<'_>,
    ) -> Vec<DrawnLabel> {
        let origin = bounds.center() + surface.pan();
        let to_screen = |position: Vec2| -> Pos2 { origin + (position * scale) };

        for (parent, child) in self.edges() {
            let from = self.node(parent).expect("live slot").position();
            let to = self.node(child).expect("live slot").position();
            surface.line(to_screen(from), to_screen(to), EDGE_STROKE);
        }

        let mut drawn = Vec::new();
        for (id, node) in self.nodes() {
            let center = to_screen(node.position());
            surface.fill_ellipse(center, node.size(), node.fill(), SPOT_STROKE);

            if let Some(text) = node.label_text() {
                let font_size = labels.font_size(text);
                let text_size = surface.measure_text(text, font_size);
                let text_center = center
                    + vec2(
                        (node.size().x / 2.0) + LABEL_GAP + (text_size.x / 2.0),
                        0.0,
                    );
                surface.text(text_center, text, font_size, LABEL_COLOR);
                drawn.push(DrawnLabel {
                    id,
                    bounds: Rect::from_center_size(text_center, text_size),
                });
            }
        }
        drawn
    }
}
