//! Wind barb glyphs.
//!
//! A barb is a shaft pointing into the wind with pennants (50 kt), full feathers (10 kt) and half
//! feathers (5 kt) at the far end. Speeds are rounded to the nearest 5 kt first. A rounded speed
//! of zero is calm and is drawn as an empty circle.
use metfor::{Knots, Quantity, WindUV};

/// Spacing between feathers as a fraction of the shaft length.
const SPACING: f64 = 0.125;
/// Feather length as a fraction of the shaft length.
const FEATHER: f64 = 0.4;
/// Width of a pennant along the shaft as a fraction of the shaft length.
const PENNANT_WIDTH: f64 = 0.25;
/// Radius of the calm circle as a fraction of the shaft length.
const CALM_RADIUS: f64 = 0.15;

/// The number of each element needed to draw a speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BarbElements {
    /// Pennants, 50 kt each.
    pub pennants: u32,
    /// Full feathers, 10 kt each.
    pub full: u32,
    /// Half feather, 5 kt.
    pub half: bool,
}

impl BarbElements {
    /// Break a speed into barb elements after rounding it to the nearest 5 kt.
    pub fn from_speed(speed: Knots) -> Self {
        let speed = speed.unpack();
        if !speed.is_finite() || speed < 0.0 {
            return Self::default();
        }

        let rounded = (speed / 5.0 + 0.5).floor() as u32 * 5;

        BarbElements {
            pennants: rounded / 50,
            full: (rounded % 50) / 10,
            half: rounded % 10 >= 5,
        }
    }

    /// True if there is nothing to draw on the shaft.
    pub fn is_calm(&self) -> bool {
        self.pennants == 0 && self.full == 0 && !self.half
    }
}

/// Barb geometry in page offsets from the anchor point, y increasing downward.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BarbGlyph {
    /// Shaft from the anchor to its far end. `None` when calm.
    pub shaft: Option<[(f64, f64); 2]>,
    /// Filled triangles.
    pub pennants: Vec<[(f64, f64); 3]>,
    /// Feather line segments, full and half.
    pub feathers: Vec<[(f64, f64); 2]>,
    /// Radius of the calm circle, centered on the anchor.
    pub calm: Option<f64>,
}

impl BarbGlyph {
    /// Build the glyph for a wind with a shaft `length` points long.
    ///
    /// Feathers are drawn on the clockwise side of the shaft, the northern hemisphere convention.
    pub fn new(wind: WindUV<Knots>, length: f64) -> Self {
        let (u, v) = (wind.u.unpack(), wind.v.unpack());
        let speed = (u * u + v * v).sqrt();
        let elements = BarbElements::from_speed(Knots(speed));

        if elements.is_calm() {
            return BarbGlyph {
                calm: Some(CALM_RADIUS * length),
                ..BarbGlyph::default()
            };
        }

        // Unit vector along the shaft pointing upwind, and its clockwise perpendicular, in
        // math orientation (y up).
        let (sx, sy) = (-u / speed, -v / speed);
        let (cx, cy) = (sy, -sx);

        // Position `along` the shaft and `out` from it, flipped to page orientation.
        let at = |along: f64, out: f64| (along * sx + out * cx, -(along * sy + out * cy));

        let spacing = SPACING * length;
        let feather = FEATHER * length;
        let width = PENNANT_WIDTH * length;

        let mut glyph = BarbGlyph {
            shaft: Some([(0.0, 0.0), at(length, 0.0)]),
            ..BarbGlyph::default()
        };

        let mut offset = length;
        for _ in 0..elements.pennants {
            if offset != length {
                offset += spacing / 2.0;
            }
            glyph.pennants.push([
                at(offset, 0.0),
                at(offset - width / 2.0, feather),
                at(offset - width, 0.0),
            ]);
            offset -= width + spacing;
        }

        for _ in 0..elements.full {
            glyph
                .feathers
                .push([at(offset, 0.0), at(offset + width / 2.0, feather)]);
            offset -= spacing;
        }

        if elements.half {
            // A lone half feather sits away from the end so it is not mistaken for a full one.
            if offset == length {
                offset -= 1.5 * spacing;
            }
            glyph
                .feathers
                .push([at(offset, 0.0), at(offset + width / 4.0, feather / 2.0)]);
        }

        glyph
    }
}
