use crate::model::NodeKind;

/// Opaque 8-bit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Channels scaled to cairo's 0..1 range.
    pub fn components(self) -> (f64, f64, f64) {
        (
            self.0 as f64 / 255.0,
            self.1 as f64 / 255.0,
            self.2 as f64 / 255.0,
        )
    }
}

pub const BACKGROUND_COLOR: Rgb = Rgb(0x0a, 0x0a, 0x0f);
pub const CONNECTOR_COLOR: Rgb = Rgb(0x8b, 0x5c, 0xf6);
pub const TITLE_COLOR: Rgb = Rgb(0xff, 0xff, 0xff);
pub const STEP_NUMBER_COLOR: Rgb = Rgb(0xff, 0xff, 0xff);
pub const SUMMARY_TEXT_COLOR: Rgb = Rgb(0x9c, 0xa3, 0xaf);
/// Translucent black under every node.
pub const SHADOW_RGBA: (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 0.3);
/// Translucent white behind the kind badge.
pub const BADGE_RGBA: (f64, f64, f64, f64) = (1.0, 1.0, 1.0, 0.2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Oval,
    Diamond,
    Rectangle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeStyle {
    pub shape: Shape,
    pub fill: Rgb,
    pub stroke: Rgb,
    pub text: Rgb,
}

const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

pub fn resolve(kind: NodeKind) -> NodeStyle {
    match kind {
        NodeKind::Start => NodeStyle {
            shape: Shape::Oval,
            fill: Rgb(0x22, 0xc5, 0x5e),
            stroke: Rgb(0x16, 0xa3, 0x4a),
            text: WHITE,
        },
        NodeKind::End => NodeStyle {
            shape: Shape::Oval,
            fill: Rgb(0xef, 0x44, 0x44),
            stroke: Rgb(0xdc, 0x26, 0x26),
            text: WHITE,
        },
        NodeKind::Decision => NodeStyle {
            shape: Shape::Diamond,
            fill: Rgb(0xf5, 0x9e, 0x0b),
            stroke: Rgb(0xd9, 0x77, 0x06),
            text: WHITE,
        },
        NodeKind::Process => NodeStyle {
            shape: Shape::Rectangle,
            fill: Rgb(0x3b, 0x82, 0xf6),
            stroke: Rgb(0x25, 0x63, 0xeb),
            text: WHITE,
        },
    }
}

/// Style for a raw type string as it arrives on the wire.
pub fn resolve_str(kind: &str) -> NodeStyle {
    resolve(NodeKind::parse(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_has_its_shape() {
        assert_eq!(resolve(NodeKind::Start).shape, Shape::Oval);
        assert_eq!(resolve(NodeKind::End).shape, Shape::Oval);
        assert_eq!(resolve(NodeKind::Decision).shape, Shape::Diamond);
        assert_eq!(resolve(NodeKind::Process).shape, Shape::Rectangle);
    }

    #[test]
    fn palette_matches_kind() {
        let start = resolve(NodeKind::Start);
        assert_eq!((start.fill, start.stroke), (Rgb(0x22, 0xc5, 0x5e), Rgb(0x16, 0xa3, 0x4a)));
        let end = resolve(NodeKind::End);
        assert_eq!((end.fill, end.stroke), (Rgb(0xef, 0x44, 0x44), Rgb(0xdc, 0x26, 0x26)));
        for kind in NodeKind::ALL {
            assert_eq!(resolve(kind).text, WHITE);
        }
    }

    #[test]
    fn unrecognized_strings_fall_back_to_process() {
        let process = resolve(NodeKind::Process);
        for raw in ["", "loop", "subprocess", "startt", "🚀"] {
            assert_eq!(resolve_str(raw), process, "{raw:?}");
        }
        assert_eq!(resolve_str("decision"), resolve(NodeKind::Decision));
    }

    #[test]
    fn components_scale_to_unit_range() {
        assert_eq!(Rgb(0xff, 0x00, 0x33).components(), (1.0, 0.0, 0.2));
    }
}
