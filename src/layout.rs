use crate::geometry::PixelRect;
use crate::model::WorkflowNode;

pub const GRID_COLUMNS: usize = 5;
pub const NODE_WIDTH: f64 = 180.0;
pub const NODE_HEIGHT: f64 = 80.0;
pub const START_X: f64 = 50.0;
pub const START_Y: f64 = 150.0;
pub const HORIZONTAL_GAP: f64 = 250.0;
pub const VERTICAL_GAP: f64 = 200.0;

/// A workflow node pinned to its grid cell for one render.
#[derive(Clone, Copy, Debug)]
pub struct PositionedNode<'a> {
    pub node: &'a WorkflowNode,
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub rect: PixelRect,
}

impl PositionedNode<'_> {
    /// 1-based number painted in the node's corner.
    pub fn step_number(&self) -> usize {
        self.index + 1
    }
}

/// Place nodes on a fixed five-column grid, wrapping to new rows in order.
pub fn assign(nodes: &[WorkflowNode]) -> Vec<PositionedNode<'_>> {
    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let column = index % GRID_COLUMNS;
            let row = index / GRID_COLUMNS;
            let x = START_X + column as f64 * HORIZONTAL_GAP;
            let y = START_Y + row as f64 * VERTICAL_GAP;
            PositionedNode {
                node,
                index,
                row,
                column,
                rect: PixelRect::new(x, y, NODE_WIDTH, NODE_HEIGHT),
            }
        })
        .collect()
}
