//! Writing the finished chart to disk.
use crate::{
    error::{AnalysisError, Result},
    skewt::{SkewT, POINTS_PER_INCH},
};
use chrono::NaiveDateTime;
use std::{fs, path::Path};
use strum_macros::{AsRefStr, EnumIter};
use tracing::{debug, info, warn};

/// File formats the chart can be saved as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Vector PDF.
    Pdf,
    /// Raster PNG at the requested resolution.
    Png,
    /// The SVG scene as is.
    Svg,
}

impl OutputFormat {
    /// Pick the format from a file extension, ignoring case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("MPX.pdf").unwrap(), OutputFormat::Pdf);
    /// assert_eq!(OutputFormat::from_path("out/MPX.PNG").unwrap(), OutputFormat::Png);
    /// assert!(OutputFormat::from_path("MPX.jpg").is_err());
    /// assert!(OutputFormat::from_path("MPX").is_err());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => Ok(OutputFormat::Pdf),
            Some("png") => Ok(OutputFormat::Png),
            Some("svg") => Ok(OutputFormat::Svg),
            _ => Err(AnalysisError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// The conventional file name for a chart, `{STATION}_{YYYYMMDDHH}_SkewT_Analysis.pdf`.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use skew_t_analysis::output_file_name;
///
/// let valid_time = NaiveDate::from_ymd_opt(2016, 10, 26)
///     .and_then(|d| d.and_hms_opt(12, 0, 0))
///     .unwrap();
/// assert_eq!(output_file_name("MPX", valid_time), "MPX_2016102612_SkewT_Analysis.pdf");
/// ```
pub fn output_file_name(station: &str, valid_time: NaiveDateTime) -> String {
    format!(
        "{}_{}_SkewT_Analysis.pdf",
        station,
        valid_time.format("%Y%m%d%H")
    )
}

/// Render the chart and write it to `path` in the format implied by the extension.
///
/// `dpi` only matters for raster output.
pub fn save<P: AsRef<Path>>(chart: &SkewT, path: P, dpi: f64) -> Result<()> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;

    let svg = chart.to_svg()?;
    let bytes = match format {
        OutputFormat::Svg => svg.into_bytes(),
        OutputFormat::Png => render_png(&svg, dpi)?,
        OutputFormat::Pdf => render_pdf(&svg)?,
    };

    fs::write(path, &bytes)?;
    info!(path = %path.display(), format = format.as_ref(), bytes = bytes.len(), "saved chart");

    Ok(())
}

fn parse_tree(svg: &str) -> Result<usvg::Tree> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    check_fonts(&opt.fontdb);

    usvg::Tree::from_str(svg, &opt).map_err(|err| AnalysisError::Render(err.to_string()))
}

/// Warn when there are no fonts to draw text with. Returns false in that case.
fn check_fonts(fontdb: &usvg::fontdb::Database) -> bool {
    if fontdb.len() == 0 {
        warn!("no system fonts found, titles and labels will be missing from the chart");
        false
    } else {
        debug!(fonts = fontdb.len(), "loaded system fonts");
        true
    }
}

fn render_png(svg: &str, dpi: f64) -> Result<Vec<u8>> {
    if !(dpi > 0.0) {
        return Err(AnalysisError::Render(format!("invalid dpi {}", dpi)));
    }

    let tree = parse_tree(svg)?;
    let scale = (dpi / POINTS_PER_INCH) as f32;
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    debug!(width, height, dpi, "rasterizing chart");

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| AnalysisError::Render(format!("bad image size {}x{}", width, height)))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|err| AnalysisError::Render(err.to_string()))
}

fn render_pdf(svg: &str) -> Result<Vec<u8>> {
    let tree = parse_tree(svg)?;

    Ok(svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use metfor::{Celsius, HectoPascal};
    use optional::some;
    use strum::IntoEnumIterator;

    fn chart() -> SkewT {
        let p: Vec<_> = vec![1000.0, 850.0, 500.0]
            .into_iter()
            .map(HectoPascal)
            .map(some)
            .collect();
        let t: Vec<_> = vec![15.0, 5.0, -20.0]
            .into_iter()
            .map(Celsius)
            .map(some)
            .collect();

        let mut skew = SkewT::new();
        skew.plot(&p, &t, crate::skewt::TEMPERATURE_STYLE).unwrap();
        skew
    }

    #[test]
    fn test_format_names() {
        let names: Vec<_> = OutputFormat::iter().map(|f| f.as_ref().to_owned()).collect();
        assert_eq!(names, vec!["pdf", "png", "svg"]);

        for fmt in OutputFormat::iter() {
            let file = format!("chart.{}", fmt.as_ref());
            assert_eq!(OutputFormat::from_path(&file).unwrap(), fmt);
        }
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.gif");

        match save(&chart(), &path, 150.0) {
            Err(AnalysisError::UnsupportedFormat(name)) => assert!(name.ends_with("chart.gif")),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_save_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");

        save(&chart(), &path, 150.0).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("<svg"));
    }

    #[test]
    fn test_pdf_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.pdf");

        save(&chart(), &path, 150.0).unwrap();
        let bytes = fs::read(&path).unwrap();

        // 9 x 9 inches.
        let media_box = b"/MediaBox [0 0 648 648]";
        assert!(bytes.windows(media_box.len()).any(|w| w == media_box));
    }

    #[test]
    fn test_png_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        save(&chart(), &path, 150.0).unwrap();
        let bytes = fs::read(&path).unwrap();

        // Width and height from the IHDR chunk, 9 inches at 150 dpi.
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        assert_eq!((width, height), (1350, 1350));
    }

    #[test]
    fn test_check_fonts() {
        assert!(!check_fonts(&usvg::fontdb::Database::new()));
    }

    #[test]
    fn test_bad_dpi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        assert!(save(&chart(), &path, 0.0).is_err());
    }
}
