//! Skew-T/log-p chart rendering.
//!
//! A [`SkewT`] collects plot calls and draws them when the chart is turned into an SVG document
//! by [`SkewT::to_svg`]. Because drawing is deferred, axis limits may be set before or after
//! the data is plotted, and reference lines that depend on the limits (the adiabats) use the
//! limits in effect at render time.
use crate::{
    error::{AnalysisError, Result},
    utility::linspace,
};
use itertools::izip;
use metfor::{Celsius, HectoPascal, Kelvin, Knots, Quantity, WindUV};
use optional::Optioned;
use tracing::debug;

use self::adiabats::moist_adiabat;

pub use self::{
    barbs::{BarbElements, BarbGlyph},
    svg::{LineStyle, SvgDocument, TextAnchor},
    transform::{Frame, SkewTransform},
};

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Temperature profile style, solid red.
pub const TEMPERATURE_STYLE: LineStyle = LineStyle {
    color: "#ff0000",
    width: 1.5,
    alpha: 1.0,
    dash: None,
};

/// Dew point profile style, solid green.
pub const DEW_POINT_STYLE: LineStyle = LineStyle {
    color: "#008000",
    width: 1.5,
    alpha: 1.0,
    dash: None,
};

/// Dry adiabat style, faint orangered.
pub const DRY_ADIABAT_STYLE: LineStyle = LineStyle {
    color: "#ff4500",
    width: 1.5,
    alpha: 0.25,
    dash: None,
};

/// Moist adiabat style, faint green.
pub const MOIST_ADIABAT_STYLE: LineStyle = LineStyle {
    color: "#2ca02c",
    width: 1.5,
    alpha: 0.25,
    dash: None,
};

/// Mixing line style, dotted blue.
pub const MIXING_LINE_STYLE: LineStyle = LineStyle {
    color: "#1f77b4",
    width: 1.5,
    alpha: 1.0,
    dash: Some(DOTTED),
};

// Matplotlib's dotted pattern for a 1.5 pt line.
const DOTTED: &[f64] = &[1.5, 2.475];

/// Mixing ratios (kg/kg) of the reference mixing lines.
pub const DEFAULT_MIXING_RATIOS: [f64; 9] =
    [0.0004, 0.001, 0.002, 0.004, 0.007, 0.01, 0.016, 0.024, 0.032];

const GRID_STYLE: LineStyle = LineStyle {
    color: "#b0b0b0",
    width: 0.8,
    alpha: 1.0,
    dash: None,
};

const FRAME_STYLE: LineStyle = LineStyle {
    color: "#000000",
    width: 0.8,
    alpha: 1.0,
    dash: None,
};

const BARB_STYLE: LineStyle = LineStyle {
    color: "#000000",
    width: 1.0,
    alpha: 1.0,
    dash: None,
};

// Space around the plot area for titles, tick labels and barbs, in points.
const MARGIN_LEFT: f64 = 55.0;
const MARGIN_RIGHT: f64 = 45.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

const TITLE_SIZE: f64 = 12.0;
const TICK_LABEL_SIZE: f64 = 10.0;

// Points at which the adiabats are evaluated.
const ADIABAT_POINTS: usize = 50;

/// Something drawn on the chart, kept until render time.
#[derive(Clone, Debug)]
enum Artist {
    Profile {
        pressure: Vec<Optioned<HectoPascal>>,
        temperature: Vec<Optioned<Celsius>>,
        style: LineStyle,
    },
    Barbs {
        pressure: Vec<Optioned<HectoPascal>>,
        wind: Vec<Optioned<WindUV<Knots>>>,
    },
    DryAdiabats {
        t0: Vec<Kelvin>,
        style: LineStyle,
    },
    MoistAdiabats {
        t0: Vec<Kelvin>,
        style: LineStyle,
    },
    MixingLines {
        mixing_ratios: Vec<f64>,
        pressure: Vec<HectoPascal>,
        style: LineStyle,
    },
}

/// A skew-T/log-p chart.
#[derive(Clone, Debug)]
pub struct SkewT {
    width: f64,
    height: f64,
    xlim: (Celsius, Celsius),
    ylim: (HectoPascal, HectoPascal),
    rotation: f64,
    barb_length: f64,
    artists: Vec<Artist>,
    title_left: Option<String>,
    title_right: Option<String>,
}

impl Default for SkewT {
    fn default() -> Self {
        SkewT {
            width: 9.0 * POINTS_PER_INCH,
            height: 9.0 * POINTS_PER_INCH,
            xlim: (Celsius(-50.0), Celsius(50.0)),
            ylim: (HectoPascal(1050.0), HectoPascal(100.0)),
            rotation: 30.0,
            barb_length: 24.0,
            artists: vec![],
            title_left: None,
            title_right: None,
        }
    }
}

impl SkewT {
    /// Create a 9 x 9 inch chart with the isotherms skewed 30 degrees.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the figure size in inches.
    pub fn with_figure_size(mut self, width: f64, height: f64) -> Self {
        self.width = width * POINTS_PER_INCH;
        self.height = height * POINTS_PER_INCH;
        self
    }

    /// Builder method to set the angle of the isotherms in degrees from vertical.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder method to set the length of the wind barb shafts in points.
    pub fn with_barb_length(mut self, length: f64) -> Self {
        self.barb_length = length;
        self
    }

    /// Figure size in points.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// The area inside the axes, in points from the top left of the figure.
    pub fn frame(&self) -> Frame {
        Frame {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: self.width - MARGIN_LEFT - MARGIN_RIGHT,
            height: self.height - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    /// The transform for the current limits.
    pub fn transform(&self) -> Result<SkewTransform> {
        SkewTransform::new(self.frame(), self.xlim, self.ylim, self.rotation)
    }

    /// Plot a temperature (or dew point) profile against pressure.
    ///
    /// Levels missing either value leave a gap in the line.
    pub fn plot(
        &mut self,
        pressure: &[Optioned<HectoPascal>],
        temperature: &[Optioned<Celsius>],
        style: LineStyle,
    ) -> Result<()> {
        if pressure.len() != temperature.len() {
            return Err(AnalysisError::InvalidInput);
        }

        self.artists.push(Artist::Profile {
            pressure: pressure.to_vec(),
            temperature: temperature.to_vec(),
            style,
        });
        Ok(())
    }

    /// Plot wind barbs along the right edge of the plot area.
    pub fn plot_barbs(
        &mut self,
        pressure: &[Optioned<HectoPascal>],
        wind: &[Optioned<WindUV<Knots>>],
    ) -> Result<()> {
        if pressure.len() != wind.len() {
            return Err(AnalysisError::InvalidInput);
        }

        self.artists.push(Artist::Barbs {
            pressure: pressure.to_vec(),
            wind: wind.to_vec(),
        });
        Ok(())
    }

    /// Set the temperature range at the bottom of the chart.
    pub fn set_xlim(&mut self, left: Celsius, right: Celsius) -> Result<()> {
        if !(left < right) {
            return Err(AnalysisError::InvalidInput);
        }
        self.xlim = (left, right);
        Ok(())
    }

    /// Set the pressure range, bottom then top.
    pub fn set_ylim(&mut self, bottom: HectoPascal, top: HectoPascal) -> Result<()> {
        if !(top > HectoPascal(0.0) && bottom > top) {
            return Err(AnalysisError::InvalidInput);
        }
        self.ylim = (bottom, top);
        Ok(())
    }

    /// Current temperature limits.
    pub fn xlim(&self) -> (Celsius, Celsius) {
        self.xlim
    }

    /// Current pressure limits, bottom then top.
    pub fn ylim(&self) -> (HectoPascal, HectoPascal) {
        self.ylim
    }

    /// Dry adiabats through each temperature `t0` at the bottom of the chart.
    pub fn plot_dry_adiabats(&mut self, t0: &[Kelvin], style: LineStyle) {
        self.artists.push(Artist::DryAdiabats {
            t0: t0.to_vec(),
            style,
        });
    }

    /// Saturated (pseudo) adiabats through each temperature `t0` at the bottom of the chart.
    ///
    /// Each curve is integrated from the bottom of the chart to the top.
    pub fn plot_moist_adiabats(&mut self, t0: &[Kelvin], style: LineStyle) {
        self.artists.push(Artist::MoistAdiabats {
            t0: t0.to_vec(),
            style,
        });
    }

    /// Lines of constant mixing ratio (kg/kg) evaluated at the given pressures.
    pub fn plot_mixing_lines(
        &mut self,
        mixing_ratios: &[f64],
        pressure: &[HectoPascal],
        style: LineStyle,
    ) {
        self.artists.push(Artist::MixingLines {
            mixing_ratios: mixing_ratios.to_vec(),
            pressure: pressure.to_vec(),
            style,
        });
    }

    /// Title above the left side of the plot.
    pub fn title_left<S: Into<String>>(&mut self, title: S) {
        self.title_left = Some(title.into());
    }

    /// Title above the right side of the plot.
    pub fn title_right<S: Into<String>>(&mut self, title: S) {
        self.title_right = Some(title.into());
    }

    /// Draw everything into an SVG document measured in points.
    pub fn to_svg(&self) -> Result<String> {
        let tf = self.transform()?;
        let frame = tf.frame();
        let mut doc = SvgDocument::new(self.width, self.height);

        doc.begin_clip("plot-area", frame);
        self.draw_grid(&mut doc, &tf);

        // Reference lines go under the data.
        for artist in self.artists.iter().filter(|a| is_reference(a)) {
            self.draw_artist(&mut doc, &tf, artist);
        }
        for artist in self.artists.iter().filter(|a| is_data(a)) {
            self.draw_artist(&mut doc, &tf, artist);
        }
        doc.end_group();

        doc.rect(frame, &FRAME_STYLE);
        self.draw_tick_labels(&mut doc, &tf);

        // Barbs sit on the right edge and are not clipped.
        for artist in self.artists.iter().filter(|a| is_barbs(a)) {
            self.draw_artist(&mut doc, &tf, artist);
        }

        let title_y = frame.top - 6.0;
        if let Some(ref title) = self.title_left {
            doc.text((frame.left, title_y), title, TITLE_SIZE, TextAnchor::Start);
        }
        if let Some(ref title) = self.title_right {
            doc.text((frame.right(), title_y), title, TITLE_SIZE, TextAnchor::End);
        }

        debug!(artists = self.artists.len(), "rendered skew-t");

        Ok(doc.finish())
    }

    fn draw_grid(&self, doc: &mut SvgDocument, tf: &SkewTransform) {
        let (p_bottom, p_top) = tf.ylim();

        for t in isotherm_values(tf) {
            let start = tf.to_page(Celsius(t), p_bottom);
            let end = tf.to_page(Celsius(t), p_top);
            doc.line(start, end, &GRID_STYLE);
        }

        let frame = tf.frame();
        for p in isobar_values(tf) {
            let y = tf.page_y(HectoPascal(p));
            doc.line((frame.left, y), (frame.right(), y), &GRID_STYLE);
        }
    }

    fn draw_tick_labels(&self, doc: &mut SvgDocument, tf: &SkewTransform) {
        let frame = tf.frame();
        let (t_left, t_right) = tf.xlim();
        let (p_bottom, _) = tf.ylim();

        isotherm_values(tf)
            .into_iter()
            .filter(|&t| t >= t_left.unpack() && t <= t_right.unpack())
            .for_each(|t| {
                let (x, _) = tf.to_page(Celsius(t), p_bottom);
                doc.text(
                    (x, frame.bottom() + TICK_LABEL_SIZE + 4.0),
                    &format!("{:.0}", t),
                    TICK_LABEL_SIZE,
                    TextAnchor::Middle,
                );
            });

        for p in isobar_values(tf) {
            let y = tf.page_y(HectoPascal(p));
            doc.text(
                (frame.left - 4.0, y + TICK_LABEL_SIZE / 3.0),
                &format!("{:.0}", p),
                TICK_LABEL_SIZE,
                TextAnchor::End,
            );
        }
    }

    fn draw_artist(&self, doc: &mut SvgDocument, tf: &SkewTransform, artist: &Artist) {
        match artist {
            Artist::Profile {
                pressure,
                temperature,
                style,
            } => {
                let points = izip!(pressure, temperature).map(|(p, t)| {
                    p.into_option()
                        .filter(|p| p.unpack() > 0.0)
                        .and_then(|p| t.map(|t| tf.to_page(t, p)))
                });
                draw_runs(doc, points, style);
            }
            Artist::Barbs { pressure, wind } => {
                let x = tf.frame().right();
                let (p_bottom, p_top) = tf.ylim();

                izip!(pressure, wind)
                    .filter_map(|(p, w)| p.into_option().and_then(|p| w.map(|w| (p, w))))
                    .filter(|&(p, _)| p <= p_bottom && p >= p_top)
                    .for_each(|(p, w)| {
                        let anchor = (x, tf.page_y(p));
                        draw_barb(doc, anchor, &BarbGlyph::new(w, self.barb_length));
                    });
            }
            Artist::DryAdiabats { t0, style } => {
                let (p_bottom, p_top) = tf.ylim();
                let pressure = linspace(p_bottom.unpack(), p_top.unpack(), ADIABAT_POINTS);

                for &t0 in t0 {
                    let theta = metfor::potential_temperature(p_bottom, t0);
                    let points = pressure.iter().map(|&p| {
                        let p = HectoPascal(p);
                        let t = Celsius::from(metfor::temperature_from_pot_temp(theta, p));
                        Some(tf.to_page(t, p))
                    });
                    draw_runs(doc, points, style);
                }
            }
            Artist::MoistAdiabats { t0, style } => {
                let (p_bottom, p_top) = tf.ylim();
                let pressure: Vec<HectoPascal> =
                    linspace(p_bottom.unpack(), p_top.unpack(), ADIABAT_POINTS)
                        .into_iter()
                        .map(HectoPascal)
                        .collect();

                for &t0 in t0 {
                    let temps = moist_adiabat(t0, &pressure);
                    let points = izip!(&pressure, temps)
                        .map(|(&p, t)| Some(tf.to_page(Celsius::from(t), p)));
                    draw_runs(doc, points, style);
                }
            }
            Artist::MixingLines {
                mixing_ratios,
                pressure,
                style,
            } => {
                for &mw in mixing_ratios {
                    let points = pressure.iter().map(|&p| {
                        metfor::dew_point_from_p_and_mw(p, mw)
                            .map(Celsius::from)
                            .map(|t| tf.to_page(t, p))
                    });
                    draw_runs(doc, points, style);
                }
            }
        }
    }
}

fn is_reference(artist: &Artist) -> bool {
    match artist {
        Artist::DryAdiabats { .. } | Artist::MoistAdiabats { .. } | Artist::MixingLines { .. } => {
            true
        }
        _ => false,
    }
}

fn is_data(artist: &Artist) -> bool {
    match artist {
        Artist::Profile { .. } => true,
        _ => false,
    }
}

fn is_barbs(artist: &Artist) -> bool {
    match artist {
        Artist::Barbs { .. } => true,
        _ => false,
    }
}

/// Draw polylines through consecutive present points, breaking the line at each missing one.
fn draw_runs<I>(doc: &mut SvgDocument, points: I, style: &LineStyle)
where
    I: Iterator<Item = Option<(f64, f64)>>,
{
    let mut run: Vec<(f64, f64)> = Vec::with_capacity(ADIABAT_POINTS);

    for point in points {
        match point {
            Some(pnt) if pnt.0.is_finite() && pnt.1.is_finite() => run.push(pnt),
            _ => {
                doc.polyline(&run, style);
                run.clear();
            }
        }
    }
    doc.polyline(&run, style);
}

fn draw_barb(doc: &mut SvgDocument, (x, y): (f64, f64), glyph: &BarbGlyph) {
    let shift = |(dx, dy): (f64, f64)| (x + dx, y + dy);

    if let Some(radius) = glyph.calm {
        doc.circle((x, y), radius, &BARB_STYLE);
    }

    if let Some([start, end]) = glyph.shaft {
        doc.line(shift(start), shift(end), &BARB_STYLE);
    }

    for pennant in &glyph.pennants {
        let pts: Vec<_> = pennant.iter().cloned().map(shift).collect();
        doc.polygon(&pts, BARB_STYLE.color);
    }

    for &[base, tip] in &glyph.feathers {
        doc.line(shift(base), shift(tip), &BARB_STYLE);
    }
}

/// Isotherms every 10 C that cross the plot area somewhere.
fn isotherm_values(tf: &SkewTransform) -> Vec<f64> {
    let frame = tf.frame();
    let (p_bottom, p_top) = tf.ylim();
    let (_, t_right) = tf.xlim();

    // The coldest visible isotherm enters at the top left corner.
    let coldest = tf.temperature_at(frame.left, p_top).unpack();
    let warmest = tf.temperature_at(frame.right(), p_bottom).unpack().max(t_right.unpack());

    let start = (coldest / 10.0).ceil() as i32;
    let end = (warmest / 10.0).floor() as i32;

    (start..=end).map(|i| f64::from(i) * 10.0).collect()
}

/// Isobars every 100 hPa inside the pressure limits.
fn isobar_values(tf: &SkewTransform) -> Vec<f64> {
    let (p_bottom, p_top) = tf.ylim();

    (1..=10)
        .map(|i| f64::from(i) * 100.0)
        .filter(|&p| p <= p_bottom.unpack() && p >= p_top.unpack())
        .rev()
        .collect()
}

mod adiabats;
mod barbs;
mod svg;
mod transform;
