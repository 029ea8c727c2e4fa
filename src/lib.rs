#![warn(missing_docs)]
//! Fetch an upper air sounding and plot it on a skew-T/log-p chart.
//!
//! The pipeline is linear: a [`SoundingSource`] (normally the University of Wyoming archive,
//! [`WyomingArchive`]) delivers a [`SoundingTable`] of raw numbers with a unit string per column,
//! [`SoundingTable::into_sounding`] attaches the units and builds a typed [`Sounding`],
//! [`barb_cutoff`] decides how far up the wind barbs go, and a [`SkewT`] chart is drawn and saved
//! with [`save`]. [`run`] does all of it from a [`SkewTConfig`].
//!
//! ```rust
//! use skew_t_analysis::{barb_cutoff, doctest, BarbCutoff, SkewT, TEMPERATURE_STYLE};
//!
//! let snd = doctest::make_test_sounding();
//! assert!(snd.validate().is_ok());
//!
//! // No 100 hPa level, so barbs would be drawn for every level.
//! assert_eq!(barb_cutoff(snd.pressure_profile()), BarbCutoff::All);
//!
//! let mut skew = SkewT::new();
//! skew.plot(snd.pressure_profile(), snd.temperature_profile(), TEMPERATURE_STYLE).unwrap();
//! let svg = skew.to_svg().unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

//
// API
//
pub use crate::{
    analysis::{run, Analysis},
    archive::{
        parse_wyoming_page, Column, SoundingRequest, SoundingSource, SoundingTable,
        TableMetadata, WyomingArchive, DEFAULT_WYOMING_URL,
    },
    config::{ChartConfig, SkewTConfig},
    error::{AnalysisError, Result},
    levels::{barb_cutoff, barb_levels, level_index, BarbCutoff, BARB_TOP},
    output::{output_file_name, save, OutputFormat},
    skewt::{
        LineStyle, SkewT, SkewTransform, DEFAULT_MIXING_RATIOS, DEW_POINT_STYLE,
        DRY_ADIABAT_STYLE, MIXING_LINE_STYLE, MOIST_ADIABAT_STYLE, TEMPERATURE_STYLE,
    },
    sounding::{doctest, DataRow, Sounding, StationInfo},
    units::{attach_units, Unit},
};

pub mod config;
pub mod skewt;

//
// Internal use only
//
mod analysis;
mod archive;
mod error;
mod levels;
mod output;
mod sounding;
mod units;
mod utility;
