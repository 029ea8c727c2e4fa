//! Raw sounding tables as delivered by a remote archive, and the trait used to fetch them.
//!
//! A [`SoundingTable`] is what comes off the wire: parallel columns of plain numbers with the
//! unit of each column recorded as text. Turning it into a typed [`Sounding`] is the job of the
//! `units` module, see [`SoundingTable::into_sounding`].
use crate::{
    error::{AnalysisError, Result},
    sounding::Sounding,
};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use strum_macros::AsRefStr;

pub use self::wyoming::{parse_wyoming_page, WyomingArchive, DEFAULT_WYOMING_URL};

/// The columns a sounding table may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Column {
    /// Pressure of the level.
    Pressure,
    /// Geopotential height of the level.
    Height,
    /// Dry bulb temperature.
    Temperature,
    /// Dew point temperature.
    Dewpoint,
    /// Direction the wind is blowing from.
    Direction,
    /// Wind speed.
    Speed,
    /// East-west wind component.
    UWind,
    /// North-south wind component.
    VWind,
}

/// What to ask the archive for.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundingRequest {
    /// Station identifier, eg MPX.
    pub station: String,
    /// Launch time of the sounding, UTC.
    pub valid_time: NaiveDateTime,
}

impl SoundingRequest {
    /// Create a request for a station at a time.
    pub fn new<S: Into<String>>(station: S, valid_time: NaiveDateTime) -> Self {
        SoundingRequest {
            station: station.into(),
            valid_time,
        }
    }
}

/// Station information and indexes reported alongside the table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableMetadata {
    /// Station identifier.
    pub station: Option<String>,
    /// WMO station number.
    pub station_number: Option<i32>,
    /// Observation time.
    pub time: Option<NaiveDateTime>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Station elevation in meters.
    pub elevation: Option<f64>,
    /// Precipitable water for the whole sounding in mm.
    pub precipitable_water: Option<f64>,
}

/// A sounding as a table of numbers with a unit attached to each column.
///
/// All columns are parallel, ordered from the surface up. Missing values are `NaN`.
#[derive(Clone, Debug, Default)]
pub struct SoundingTable {
    columns: HashMap<Column, Vec<f64>>,
    units: HashMap<Column, String>,
    metadata: TableMetadata,
}

impl SoundingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a column and its unit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::{Column, SoundingTable};
    ///
    /// let table = SoundingTable::new()
    ///     .with_column(Column::Pressure, vec![1000.0, 850.0], "hPa")
    ///     .with_column(Column::Temperature, vec![20.0, f64::NAN], "C");
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.unit(Column::Temperature), Some("C"));
    /// assert!(table.column(Column::Height).is_none());
    /// ```
    pub fn with_column<S: Into<String>>(mut self, column: Column, values: Vec<f64>, unit: S) -> Self {
        self.columns.insert(column, values);
        self.units.insert(column, unit.into());
        self
    }

    /// Builder method to add the station metadata.
    pub fn with_metadata(mut self, metadata: TableMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The values of a column, if the table has it.
    pub fn column(&self, column: Column) -> Option<&[f64]> {
        self.columns.get(&column).map(|vals| vals.as_slice())
    }

    /// The unit of a column as reported by the source.
    pub fn unit(&self, column: Column) -> Option<&str> {
        self.units.get(&column).map(|u| u.as_str())
    }

    /// The units mapping keyed by column.
    pub fn units(&self) -> &HashMap<Column, String> {
        &self.units
    }

    /// Station information.
    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    /// Number of rows, taken from the pressure column.
    pub fn len(&self) -> usize {
        self.column(Column::Pressure).map(|p| p.len()).unwrap_or(0)
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the columns are parallel.
    pub fn check_parallel(&self) -> Result<()> {
        let len = self.len();
        match self.columns.iter().find(|(_, vals)| vals.len() != len) {
            Some((col, vals)) => Err(AnalysisError::Parse(format!(
                "column {} has {} rows, expected {}",
                col.as_ref(),
                vals.len(),
                len
            ))),
            None => Ok(()),
        }
    }

    /// Attach units to every column and build a typed sounding.
    pub fn into_sounding(self) -> Result<Sounding> {
        crate::units::attach_units(&self)
    }
}

/// Anything that can produce a sounding table for a station and time.
pub trait SoundingSource {
    /// Retrieve the sounding. Blocks until the data is available or the request fails.
    fn fetch(&self, request: &SoundingRequest) -> Result<SoundingTable>;
}

mod wyoming;
