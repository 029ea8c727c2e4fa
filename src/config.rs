//! Run configuration.
//!
//! Every field has a default, so an empty file (or no file at all) reproduces the classic chart:
//! station MPX at 12 UTC 26 October 2016 saved as a PDF in the working directory.
//!
//! ```toml
//! station = "OAX"
//! valid_time = "2019-03-14 00:00"
//! output_dir = "charts"
//!
//! [chart]
//! dpi = 300
//! temperature_limits = [-30.0, 50.0]
//! ```
use crate::{
    archive::{SoundingRequest, DEFAULT_WYOMING_URL},
    error::{AnalysisError, Result},
    output::output_file_name,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

/// Everything needed to fetch one sounding and draw it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkewTConfig {
    /// Station identifier, eg MPX.
    pub station: String,
    /// Launch time of the sounding, UTC.
    #[serde(deserialize_with = "deserialize_valid_time")]
    pub valid_time: NaiveDateTime,
    /// Base URL of the Wyoming sounding service.
    pub archive_url: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Directory the chart is written to.
    pub output_dir: PathBuf,
    /// File name override, the extension picks the format.
    pub output_file: Option<PathBuf>,
    /// Chart layout.
    pub chart: ChartConfig,
}

/// Layout and styling of the chart.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Figure width and height in inches.
    pub figure_size: (f64, f64),
    /// Resolution of raster output.
    pub dpi: f64,
    /// Temperature range at the bottom of the chart, C.
    pub temperature_limits: (f64, f64),
    /// Pressure range, bottom then top, hPa.
    pub pressure_limits: (f64, f64),
    /// Skew of the isotherms, degrees.
    pub rotation: f64,
    /// Draw a barb at every this many levels.
    pub barb_stride: usize,
    /// Barb shaft length, points.
    pub barb_length: f64,
}

impl Default for SkewTConfig {
    fn default() -> Self {
        SkewTConfig {
            station: "MPX".to_owned(),
            valid_time: NaiveDate::from_ymd_opt(2016, 10, 26)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap_or_default(),
            archive_url: DEFAULT_WYOMING_URL.to_owned(),
            timeout_secs: 60,
            output_dir: PathBuf::from("."),
            output_file: None,
            chart: ChartConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            figure_size: (9.0, 9.0),
            dpi: 150.0,
            temperature_limits: (-40.0, 40.0),
            pressure_limits: (1000.0, 100.0),
            rotation: 30.0,
            barb_stride: 3,
            barb_length: 24.0,
        }
    }
}

impl SkewTConfig {
    /// Load a configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: SkewTConfig =
            toml::from_str(text).map_err(|err| AnalysisError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise fail late, after the download.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| -> Result<()> { Err(AnalysisError::Config(msg.to_owned())) };
        let chart = &self.chart;

        if self.station.trim().is_empty() {
            return fail("station must not be empty");
        }
        if !(chart.dpi > 0.0) {
            return fail("dpi must be positive");
        }
        if !(chart.figure_size.0 > 0.0 && chart.figure_size.1 > 0.0) {
            return fail("figure_size must be positive");
        }
        if !(chart.temperature_limits.0 < chart.temperature_limits.1) {
            return fail("temperature_limits must be increasing");
        }
        let (bottom, top) = chart.pressure_limits;
        if !(top > 0.0 && bottom > top) {
            return fail("pressure_limits must be bottom then top, both positive");
        }
        if !(0.0..90.0).contains(&chart.rotation) {
            return fail("rotation must be between 0 and 90 degrees");
        }
        if chart.barb_stride == 0 {
            return fail("barb_stride must be at least 1");
        }

        Ok(())
    }

    /// The archive request described by this configuration.
    pub fn request(&self) -> SoundingRequest {
        SoundingRequest::new(self.station.trim().to_uppercase(), self.valid_time)
    }

    /// HTTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Where the chart will be written.
    pub fn output_path(&self) -> PathBuf {
        match self.output_file {
            Some(ref file) => self.output_dir.join(file),
            None => self
                .output_dir
                .join(output_file_name(&self.request().station, self.valid_time)),
        }
    }
}

/// Parse a valid time.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS]`, the same with a `T` separator, or the compact `YYYYMMDDHH`.
///
/// # Examples
///
/// ```rust
/// use skew_t_analysis::config::parse_valid_time;
///
/// let a = parse_valid_time("2016-10-26 12:00").unwrap();
/// let b = parse_valid_time("2016-10-26T12:00:00").unwrap();
/// let c = parse_valid_time("2016102612").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b, c);
///
/// assert!(parse_valid_time("yesterday").is_err());
/// ```
pub fn parse_valid_time(text: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    let text = text.trim();

    if text.len() == 10 && text.chars().all(|c| c.is_ascii_digit()) {
        let date = NaiveDate::parse_from_str(&text[..8], "%Y%m%d").ok();
        let hour = text[8..].parse::<u32>().ok();
        if let Some(time) = date.and_then(|d| hour.and_then(|h| d.and_hms_opt(h, 0, 0))) {
            return Ok(time);
        }
    }

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| AnalysisError::Config(format!("unrecognized valid time: {}", text)))
}

fn deserialize_valid_time<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_valid_time(&text).map_err(serde::de::Error::custom)
}
