//! Mapping between (temperature, pressure) and the page.
use crate::error::{AnalysisError, Result};
use metfor::{Celsius, HectoPascal, Quantity};

/// A rectangle on the page in points, origin at the top left, y increasing downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Frame {
    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The skew-T/log-p coordinate transform.
///
/// The vertical axis is logarithmic in pressure, the isotherms lean to the right by the skew
/// angle. In normalized axes coordinates, (0, 0) is the bottom left of the plot area and (1, 1)
/// the top right:
///
/// ```text
/// y = ln(p_bottom / p) / ln(p_bottom / p_top)
/// x = (t - t_min) / (t_max - t_min) + y * tan(rotation)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkewTransform {
    frame: Frame,
    t_min: f64,
    t_max: f64,
    p_bottom: f64,
    p_top: f64,
    skew: f64,
}

impl SkewTransform {
    /// Create a transform for a plot area, temperature limits, pressure limits (bottom, top) and
    /// rotation of the isotherms in degrees.
    pub fn new(
        frame: Frame,
        (t_min, t_max): (Celsius, Celsius),
        (p_bottom, p_top): (HectoPascal, HectoPascal),
        rotation: f64,
    ) -> Result<Self> {
        let (t_min, t_max) = (t_min.unpack(), t_max.unpack());
        let (p_bottom, p_top) = (p_bottom.unpack(), p_top.unpack());

        if !(t_min < t_max) {
            return Err(AnalysisError::InvalidInput);
        }
        if !(p_top > 0.0 && p_bottom > p_top) {
            return Err(AnalysisError::InvalidInput);
        }
        if !(frame.width > 0.0 && frame.height > 0.0) || !(0.0..90.0).contains(&rotation) {
            return Err(AnalysisError::InvalidInput);
        }

        Ok(SkewTransform {
            frame,
            t_min,
            t_max,
            p_bottom,
            p_top,
            skew: rotation.to_radians().tan(),
        })
    }

    /// The plot area.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Temperature limits.
    pub fn xlim(&self) -> (Celsius, Celsius) {
        (Celsius(self.t_min), Celsius(self.t_max))
    }

    /// Pressure limits, bottom then top.
    pub fn ylim(&self) -> (HectoPascal, HectoPascal) {
        (HectoPascal(self.p_bottom), HectoPascal(self.p_top))
    }

    /// Normalized vertical coordinate of a pressure, 0 at the bottom and 1 at the top.
    #[inline]
    pub fn y_norm(&self, p: HectoPascal) -> f64 {
        (self.p_bottom / p.unpack()).ln() / (self.p_bottom / self.p_top).ln()
    }

    /// Pressure at a normalized vertical coordinate.
    #[inline]
    pub fn pressure_at(&self, y_norm: f64) -> HectoPascal {
        HectoPascal(self.p_bottom * (self.p_top / self.p_bottom).powf(y_norm))
    }

    /// Normalized coordinates of a point.
    #[inline]
    pub fn normalized(&self, t: Celsius, p: HectoPascal) -> (f64, f64) {
        let y = self.y_norm(p);
        let x = (t.unpack() - self.t_min) / (self.t_max - self.t_min) + y * self.skew;
        (x, y)
    }

    /// Page coordinates of a point.
    #[inline]
    pub fn to_page(&self, t: Celsius, p: HectoPascal) -> (f64, f64) {
        let (x, y) = self.normalized(t, p);
        (
            self.frame.left + x * self.frame.width,
            self.frame.top + (1.0 - y) * self.frame.height,
        )
    }

    /// Page y coordinate of a pressure.
    #[inline]
    pub fn page_y(&self, p: HectoPascal) -> f64 {
        self.frame.top + (1.0 - self.y_norm(p)) * self.frame.height
    }

    /// The temperature whose isotherm passes through the page x coordinate at this pressure.
    pub fn temperature_at(&self, page_x: f64, p: HectoPascal) -> Celsius {
        let x = (page_x - self.frame.left) / self.frame.width;
        Celsius(self.t_min + (x - self.y_norm(p) * self.skew) * (self.t_max - self.t_min))
    }
}
