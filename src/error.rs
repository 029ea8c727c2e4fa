//! Error types for the skew-t-analysis crate.
use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A profile that is required for this analysis is missing.
    #[error("Missing profile required for the analysis.")]
    MissingProfile,
    /// Not enough data available for anlaysis
    #[error("Not enough data available for analysis.")]
    NotEnoughData,
    /// Bad or invalid input.
    #[error("Invalid input.")]
    InvalidInput,
    /// A profile is not parallel to the pressure profile.
    #[error("The {profile} profile has {len} levels, the pressure profile has {expected}.")]
    ProfileLength {
        /// Name of the profile.
        profile: &'static str,
        /// Its length.
        len: usize,
        /// Length of the pressure profile.
        expected: usize,
    },
    /// Pressure increases going up the profile.
    #[error("Pressure increases from {below} hPa to {pressure} hPa at level {level}.")]
    PressureIncrease {
        /// Index of the offending level.
        level: usize,
        /// Its pressure in hPa.
        pressure: f64,
        /// Pressure of the level below it in hPa.
        below: f64,
    },

    /// A column arrived with a unit we do not know how to convert, or with no unit at all.
    #[error("Unit mismatch for column {column}: {unit:?}")]
    UnitMismatch {
        /// The column being converted.
        column: String,
        /// The unit string attached to it by the data source.
        unit: Option<String>,
    },
    /// The archive has no sounding for this station and time.
    #[error("No data available for {time} for station {station}.")]
    NoData {
        /// Station identifier used in the request.
        station: String,
        /// Requested valid time.
        time: String,
    },
    /// The archive response could not be understood.
    #[error("Malformed archive response: {0}")]
    Parse(String),
    /// Transport errors and non-success status codes.
    #[error("Request to the sounding archive failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The chart could not be turned into an image.
    #[error("Unable to render chart: {0}")]
    Render(String),
    /// The output file extension is not one of pdf, png or svg.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    /// Configuration file problems.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// Forward an error from the file system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;
