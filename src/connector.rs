use std::collections::HashMap;
use std::f64::consts::PI;

use crate::geometry::Point;
use crate::layout::PositionedNode;

/// Vertical anchor offset beyond which a connector bends into an S-curve.
pub const CURVE_THRESHOLD: f64 = 50.0;
pub const ARROW_LENGTH: f64 = 15.0;
/// Wing spread on either side of the approach direction.
pub const ARROW_WING_ANGLE: f64 = PI / 6.0;
pub const CONNECTOR_LINE_WIDTH: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConnectorPath {
    Straight,
    Curve { control1: Point, control2: Point },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrowhead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
    /// Approach direction in radians.
    pub angle: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connector {
    pub source: usize,
    pub target: usize,
    pub start: Point,
    pub end: Point,
    pub path: ConnectorPath,
    pub arrowhead: Arrowhead,
}

impl Connector {
    pub fn is_curved(&self) -> bool {
        matches!(self.path, ConnectorPath::Curve { .. })
    }
}

/// Route from the right edge of `from` to the left edge of `to`.
pub fn route(from: &PositionedNode<'_>, to: &PositionedNode<'_>) -> Connector {
    let start = from.rect.right_mid();
    let end = to.rect.left_mid();

    let path = if (start.y - end.y).abs() > CURVE_THRESHOLD {
        let mid_x = start.x + (end.x - start.x) / 2.0;
        ConnectorPath::Curve {
            control1: Point::new(mid_x, start.y),
            control2: Point::new(mid_x, end.y),
        }
    } else {
        ConnectorPath::Straight
    };

    Connector {
        source: from.index,
        target: to.index,
        start,
        end,
        path,
        arrowhead: arrowhead(start, end),
    }
}

fn arrowhead(start: Point, end: Point) -> Arrowhead {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let wing = |offset: f64| Point {
        x: end.x - ARROW_LENGTH * (angle + offset).cos(),
        y: end.y - ARROW_LENGTH * (angle + offset).sin(),
    };
    Arrowhead {
        tip: end,
        left: wing(-ARROW_WING_ANGLE),
        right: wing(ARROW_WING_ANGLE),
        angle,
    }
}

/// Connectors for every resolvable connection, in node then connection order.
/// Returns the connectors and the number of dangling connection ids skipped.
pub fn route_all(nodes: &[PositionedNode<'_>]) -> (Vec<Connector>, usize) {
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        by_id.entry(node.node.id.as_str()).or_insert(position);
    }

    let mut connectors = Vec::new();
    let mut skipped = 0;
    for from in nodes {
        for target_id in &from.node.connections {
            match by_id.get(target_id.as_str()) {
                Some(&position) => connectors.push(route(from, &nodes[position])),
                None => {
                    skipped += 1;
                    tracing::trace!(
                        source = %from.node.id,
                        target = %target_id,
                        "skipping connection to unknown node"
                    );
                }
            }
        }
    }
    (connectors, skipped)
}
