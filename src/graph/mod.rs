mod builder;
mod diagram;
mod layout;
mod node;
mod surface;

pub use builder::{DEPTH_LIMIT, FAN_OUT_LIMIT, RelationshipGraphBuilder};
pub use diagram::Diagram;
pub use node::{Node, NodeId, NodeKind};
pub use surface::{
    BASE_FONT_SIZE, DrawingSurface, DrawnLabel, FONT_WEIGHT_MULTIPLIER, LabelScale,
};
