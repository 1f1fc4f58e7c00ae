//! Tooltip sizing: six fixed width tiers keyed by label length.

use crate::model::{LocalRect, Primitive, Role, Shape, TooltipShape};

pub const TOOLTIP_HEIGHT: f64 = 46.0;
pub const BACKGROUND_Y: f64 = 8.0;
pub const BACKGROUND_HEIGHT: f64 = 30.0;
pub const BACKGROUND_RX: f64 = 4.0;
pub const TEXT_X: f64 = 10.0;
pub const TEXT_Y: f64 = 25.0;
/// Labels shorter than this are centered by shifting the text and background right.
pub const SHORT_LABEL_CHARS: usize = 5;
pub const SHORT_LABEL_TEXT_SHIFT: f64 = 10.0;
pub const SHORT_LABEL_BACKGROUND_X: f64 = 8.0;
pub const BACKGROUND_X: f64 = 0.5;
/// Tier widths below this get a wider invisible box.
pub const NARROW_TIER: f64 = 75.0;
pub const MIN_BOX_WIDTH: f64 = 100.0;
/// Pointer shift for the details/lock affordance, which sits at the card's right edge.
pub const AFFORDANCE_POINTER_DX: f64 = -24.0;
/// Pointer triangle outline in tooltip-local coordinates (tip up, base on the pill's top edge).
pub const POINTER_PATH: &str = "M31.32 8.02L39.32 0.02L47.32 8.02Z";

/// Where the tooltip's pointer sits relative to the element it describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TooltipAnchor {
    #[default]
    Standard,
    /// Corner affordances: the pointer shifts left to line up with the icon.
    Affordance,
}

impl TooltipAnchor {
    pub fn pointer_dx(self) -> f64 {
        match self {
            Self::Standard => 0.0,
            Self::Affordance => AFFORDANCE_POINTER_DX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipSize {
    /// Tier width, used for the background pill.
    pub width: f64,
    /// Extra horizontal text shift for very short labels.
    pub anchor_offset: f64,
}

impl TooltipSize {
    /// Width of the tooltip's bounding box (the paint/hit area).
    pub fn box_width(&self) -> f64 {
        if self.width < NARROW_TIER {
            MIN_BOX_WIDTH
        } else {
            self.width
        }
    }
}

fn tier_width(chars: usize) -> f64 {
    match chars {
        0..=4 => 40.0,
        5..=15 => 75.0,
        16..=25 => 120.0,
        26..=50 => 175.0,
        51..=99 => 200.0,
        _ => 250.0,
    }
}

pub fn tooltip_size(label: &str) -> TooltipSize {
    let chars = label.chars().count();
    TooltipSize {
        width: tier_width(chars),
        anchor_offset: if chars < SHORT_LABEL_CHARS {
            SHORT_LABEL_TEXT_SHIFT
        } else {
            0.0
        },
    }
}

pub fn tooltip_shape(label: &str, anchor: TooltipAnchor) -> TooltipShape {
    let size = tooltip_size(label);
    let short = label.chars().count() < SHORT_LABEL_CHARS;
    TooltipShape {
        label: label.to_string(),
        tier_width: size.width,
        background: LocalRect {
            x: if short {
                SHORT_LABEL_BACKGROUND_X
            } else {
                BACKGROUND_X
            },
            y: BACKGROUND_Y,
            width: size.width,
            height: BACKGROUND_HEIGHT,
        },
        background_rx: BACKGROUND_RX,
        pointer_dx: anchor.pointer_dx(),
        text_x: TEXT_X + size.anchor_offset,
        text_y: TEXT_Y,
    }
}

/// A tooltip primitive anchored at `(x, y)` for the element playing `role`.
pub fn tooltip_primitive(role: Role, label: &str, x: f64, y: f64, anchor: TooltipAnchor) -> Primitive {
    let box_width = tooltip_size(label).box_width();
    Primitive::new(
        role,
        x,
        y,
        box_width,
        TOOLTIP_HEIGHT,
        Shape::Tooltip(tooltip_shape(label, anchor)),
    )
    .with_class("tooltip")
}
