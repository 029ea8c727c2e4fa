//! A minimal SVG scene writer.
//!
//! Coordinates are in points with the origin at the top left. The document size is given in user
//! units, one per point, so renderers map it to pages at 72 per inch. Only the handful of
//! elements the chart needs are supported.
use super::transform::Frame;

const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";

/// Stroke style for lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    /// Stroke color as a hex string, eg `#ff0000`.
    pub color: &'static str,
    /// Line width in points.
    pub width: f64,
    /// Opacity, 0 is invisible and 1 is opaque.
    pub alpha: f64,
    /// Dash pattern as alternating on/off lengths in points, `None` for a solid line.
    pub dash: Option<&'static [f64]>,
}

impl LineStyle {
    /// A solid, opaque line.
    pub const fn solid(color: &'static str, width: f64) -> Self {
        LineStyle {
            color,
            width,
            alpha: 1.0,
            dash: None,
        }
    }

    /// Builder method to set the opacity.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Builder method to set the dash pattern.
    pub fn with_dash(mut self, dash: &'static [f64]) -> Self {
        self.dash = Some(dash);
        self
    }

    fn attributes(&self) -> String {
        let cap = if self.dash.is_some() { "butt" } else { "round" };
        let mut attrs = format!(
            r#"fill="none" stroke="{}" stroke-width="{:.2}" stroke-linecap="{}" stroke-linejoin="round""#,
            self.color, self.width, cap
        );

        if self.alpha < 1.0 {
            attrs.push_str(&format!(r#" stroke-opacity="{:.3}""#, self.alpha));
        }

        if let Some(dash) = self.dash {
            let pattern: Vec<String> = dash.iter().map(|d| format!("{:.2}", d)).collect();
            attrs.push_str(&format!(r#" stroke-dasharray="{}""#, pattern.join(",")));
        }

        attrs
    }
}

/// Horizontal alignment of text relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// An SVG document under construction.
#[derive(Debug)]
pub struct SvgDocument {
    buf: String,
    open_groups: usize,
}

impl SvgDocument {
    /// Start a document of the given size with a white background.
    pub fn new(width: f64, height: f64) -> Self {
        let mut buf = String::with_capacity(64 * 1024);
        buf.push_str(&format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" "#,
                r#"width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}">"#,
                "\n"
            ),
            w = width,
            h = height
        ));
        buf.push_str(&format!(
            "<rect x=\"0\" y=\"0\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#ffffff\"/>\n",
            width, height
        ));

        SvgDocument {
            buf,
            open_groups: 0,
        }
    }

    /// Open a group clipped to a frame. Close it with `end_group`.
    pub fn begin_clip(&mut self, id: &str, frame: Frame) {
        let id = escape(id);
        self.buf.push_str(&format!(
            "<defs><clipPath id=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath></defs>\n",
            id, frame.left, frame.top, frame.width, frame.height
        ));
        self.buf
            .push_str(&format!("<g clip-path=\"url(#{})\">\n", id));
        self.open_groups += 1;
    }

    /// Close the most recently opened group.
    pub fn end_group(&mut self) {
        if self.open_groups > 0 {
            self.buf.push_str("</g>\n");
            self.open_groups -= 1;
        }
    }

    /// A polyline through the points. Fewer than two points draws nothing.
    pub fn polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }

        let pts: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect();

        self.buf.push_str(&format!(
            "<polyline points=\"{}\" {}/>\n",
            pts.join(" "),
            style.attributes()
        ));
    }

    /// A straight line segment.
    pub fn line(&mut self, start: (f64, f64), end: (f64, f64), style: &LineStyle) {
        self.polyline(&[start, end], style);
    }

    /// A filled polygon with no outline.
    pub fn polygon(&mut self, points: &[(f64, f64)], fill: &str) {
        if points.len() < 3 {
            return;
        }

        let pts: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect();

        self.buf.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\" stroke=\"none\"/>\n",
            pts.join(" "),
            fill
        ));
    }

    /// An unfilled circle.
    pub fn circle(&mut self, center: (f64, f64), radius: f64, style: &LineStyle) {
        self.buf.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" {}/>\n",
            center.0,
            center.1,
            radius,
            style.attributes()
        ));
    }

    /// An unfilled rectangle.
    pub fn rect(&mut self, frame: Frame, style: &LineStyle) {
        self.buf.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" {}/>\n",
            frame.left,
            frame.top,
            frame.width,
            frame.height,
            style.attributes()
        ));
    }

    /// A line of text with its baseline at `y`.
    pub fn text(&mut self, at: (f64, f64), content: &str, size: f64, anchor: TextAnchor) {
        self.buf.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.1}\" text-anchor=\"{}\" fill=\"#000000\">{}</text>\n",
            at.0,
            at.1,
            FONT_FAMILY,
            size,
            anchor.as_str(),
            escape(content)
        ));
    }

    /// Close any open groups and return the document text.
    pub fn finish(mut self) -> String {
        while self.open_groups > 0 {
            self.end_group();
        }
        self.buf.push_str("</svg>\n");
        self.buf
    }
}

/// Escape text for use in XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("MPX Sounding"), "MPX Sounding");
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_document() {
        let mut doc = SvgDocument::new(648.0, 648.0);
        let frame = Frame {
            left: 10.0,
            top: 10.0,
            width: 100.0,
            height: 100.0,
        };

        doc.begin_clip("plot", frame);
        doc.polyline(
            &[(0.0, 0.0), (10.0, 10.0)],
            &LineStyle::solid("#ff0000", 1.5).with_alpha(0.25),
        );
        // Nothing drawn for a single point.
        doc.polyline(&[(0.0, 0.0)], &LineStyle::solid("#00ff00", 1.5));
        doc.text((5.0, 5.0), "T & Td", 12.0, TextAnchor::Start);

        let svg = doc.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="648.00" height="648.00" viewBox="0 0 648.00 648.00""#));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("clip-path=\"url(#plot)\""));
        assert!(svg.contains("stroke-opacity=\"0.250\""));
        assert!(!svg.contains("#00ff00"));
        assert!(svg.contains("T &amp; Td"));
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
    }

    #[test]
    fn test_dashed_style() {
        const DOTTED: &[f64] = &[1.5, 2.5];
        let attrs = LineStyle::solid("#1f77b4", 1.5).with_dash(DOTTED).attributes();
        assert!(attrs.contains("stroke-dasharray=\"1.50,2.50\""));
    }
}
