//! Data type and methods to store an atmospheric sounding.

use crate::error::{AnalysisError, Result};
use chrono::NaiveDateTime;
use itertools::izip;
use metfor::{Celsius, HectoPascal, Knots, Meters, Quantity, WindSpdDir};
use optional::Optioned;

pub use self::{data_row::DataRow, station_info::StationInfo};

/// All the variables stored in the sounding.
///
/// The upper air profile variables are stored in parallel vectors ordered from the surface
/// upward. If a profile lacks a certain variable, e.g. wind, that whole vector has length 0
/// instead of being full of missing values.
///
#[derive(Clone, Debug, Default)]
pub struct Sounding {
    // Description of the source of the sounding.
    source: Option<String>,

    // Station info
    station: StationInfo,

    // Valid time of sounding
    valid_time: Option<NaiveDateTime>,

    // Profiles
    pressure: Vec<Optioned<HectoPascal>>,
    height: Vec<Optioned<Meters>>,
    temperature: Vec<Optioned<Celsius>>,
    dew_point: Vec<Optioned<Celsius>>,
    wind: Vec<Optioned<WindSpdDir<Knots>>>,
}

macro_rules! make_profile_setter {
    ($(#[$attr:meta])* => $name:tt, $inner_type:ty, $p_var:ident) => {
        $(#[$attr])*
        pub fn $name(self, profile: Vec<Optioned<$inner_type>>) -> Self {
            Self {$p_var: profile, ..self}
        }
    };
}

impl Sounding {
    /// Create a new sounding with default values. This is a proxy for default with a clearer name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::Sounding;
    ///
    /// let snd = Sounding::new();
    /// assert!(snd.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Sounding::default()
    }

    /// Add a source description to this sounding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::Sounding;
    ///
    /// let snd = Sounding::new().with_source_description("An empty sounding.".to_owned());
    /// assert_eq!(snd.source_description().unwrap(), "An empty sounding.");
    ///
    /// let snd = snd.with_source_description(None);
    /// assert!(snd.source_description().is_none());
    ///
    /// ```
    #[inline]
    pub fn with_source_description<S>(mut self, desc: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.source = Option::from(desc);
        self
    }

    /// Retrieve a source description for this sounding.
    #[inline]
    pub fn source_description(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Builder function for setting the station info.
    #[inline]
    pub fn with_station_info(mut self, new_value: StationInfo) -> Self {
        self.station = new_value;
        self
    }

    /// Get the station info
    #[inline]
    pub fn station_info(&self) -> &StationInfo {
        &self.station
    }

    /// Valid time of the sounding.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// Builder method to set the valid time of the sounding.
    ///
    /// # Examples
    /// ```rust
    /// use skew_t_analysis::Sounding;
    /// use chrono::NaiveDate;
    ///
    /// let vtime = NaiveDate::from_ymd_opt(2016, 10, 26)
    ///     .and_then(|d| d.and_hms_opt(12, 0, 0))
    ///     .unwrap();
    /// let _snd = Sounding::new().with_valid_time(vtime);
    /// let snd = Sounding::new().with_valid_time(Some(vtime));
    /// assert_eq!(snd.valid_time(), Some(vtime));
    /// ```
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    make_profile_setter!(
        /// Builder method for the pressure profile.
        ///
        /// # Examples
        /// ```rust
        /// use skew_t_analysis::Sounding;
        /// use metfor::HectoPascal;
        /// use optional::{some, Optioned};
        ///
        /// let data = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 300.0, 250.0, 200.0, 150.0, 100.0];
        /// let pressure_data: Vec<Optioned<HectoPascal>> = data.into_iter()
        ///     .map(HectoPascal)
        ///     .map(some)
        ///     .collect();
        ///
        /// let snd = Sounding::new()
        ///     .with_pressure_profile(pressure_data);
        /// assert_eq!(snd.len(), 10);
        /// ```
        #[inline]
        => with_pressure_profile, HectoPascal, pressure
    );

    /// Get the pressure profile
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::Sounding;
    /// # use skew_t_analysis::doctest::make_test_sounding;
    ///
    /// let snd = make_test_sounding();
    /// let data = snd.pressure_profile();
    ///
    /// for p in data {
    ///     if let Some(p) = p.into_option() {
    ///         println!("{:?}", p);
    ///     } else {
    ///         println!("missing value!");
    ///     }
    /// }
    ///
    /// // Uninitialized profiles just return an empty vector.
    /// let snd = Sounding::new();
    /// let data = snd.pressure_profile();
    /// assert!(data.is_empty());
    ///
    /// ```
    #[inline]
    pub fn pressure_profile(&self) -> &[Optioned<HectoPascal>] {
        &self.pressure
    }

    make_profile_setter!(
        /// Builder method for the geopotential height profile.
        ///
        /// See `with_pressure_profile` for an example of usage, keeping in mind the units type may
        /// be different.
        #[inline]
        => with_height_profile, Meters, height
    );

    /// Get the geopotential height profile.
    #[inline]
    pub fn height_profile(&self) -> &[Optioned<Meters>] {
        &self.height
    }

    make_profile_setter!(
        /// Builder method for the temperature profile.
        ///
        /// See `with_pressure_profile` for an example of usage, keeping in mind the units type may
        /// be different.
        #[inline]
        => with_temperature_profile, Celsius, temperature
    );

    /// Get the temperature profile.
    ///
    /// See `pressure_profile` for an example of using getters, keeping in mind the units type may
    /// be different.
    #[inline]
    pub fn temperature_profile(&self) -> &[Optioned<Celsius>] {
        &self.temperature
    }

    make_profile_setter!(
        /// Builder method for the dew point profile.
        ///
        /// See `with_pressure_profile` for an example of usage, keeping in mind the units type may
        /// be different.
        #[inline]
        => with_dew_point_profile, Celsius, dew_point
    );

    /// Get the dew point profile.
    #[inline]
    pub fn dew_point_profile(&self) -> &[Optioned<Celsius>] {
        &self.dew_point
    }

    make_profile_setter!(
        /// Builder method for the wind profile.
        ///
        /// See `with_pressure_profile` for an example of usage, keeping in mind the units type may
        /// be different.
        #[inline]
        => with_wind_profile, WindSpdDir<Knots>, wind
    );

    /// Get the wind profile.
    #[inline]
    pub fn wind_profile(&self) -> &[Optioned<WindSpdDir<Knots>>] {
        &self.wind
    }

    /// The number of levels in the sounding.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// True if there are no levels at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Get a bottom up iterator over the data rows. The first value returned from the iterator is
    /// the lowest level in the profile.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{HectoPascal, Celsius};
    /// use optional::some;
    /// use skew_t_analysis::Sounding;
    ///
    /// let pres: Vec<_> = vec![1000.0, 925.0, 850.0].into_iter()
    ///     .map(HectoPascal).map(some).collect();
    /// let temps: Vec<_> = vec![20.0, 18.0, 17.0].into_iter()
    ///     .map(Celsius).map(some).collect();
    ///
    /// let snd = Sounding::new()
    ///     .with_pressure_profile(pres)
    ///     .with_temperature_profile(temps);
    ///
    /// let mut iter = snd.bottom_up();
    ///
    /// let mut row = iter.next().unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(1000.0));
    /// assert_eq!(row.temperature.unwrap(), Celsius(20.0));
    /// assert!(row.wind.is_none()); // We never set wind profile.
    ///
    /// row = iter.next().unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(925.0));
    ///
    /// row = iter.next().unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(850.0));
    ///
    /// assert!(iter.next().is_none());
    /// ```
    #[inline]
    pub fn bottom_up<'a>(&'a self) -> impl Iterator<Item = DataRow> + 'a {
        (0..self.len()).filter_map(move |idx| self.data_row(idx))
    }

    /// Get a row of data values from this sounding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{HectoPascal, Celsius};
    /// use optional::some;
    /// use skew_t_analysis::Sounding;
    ///
    /// let pres: Vec<_> = vec![1000.0, 925.0, 850.0].into_iter()
    ///     .map(HectoPascal).map(some).collect();
    /// let temps: Vec<_> = vec![20.0, 18.0, 17.0].into_iter()
    ///     .map(Celsius).map(some).collect();
    ///
    /// let snd = Sounding::new()
    ///     .with_pressure_profile(pres)
    ///     .with_temperature_profile(temps);
    ///
    /// let row = snd.data_row(0).unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(1000.0));
    /// assert_eq!(row.temperature.unwrap(), Celsius(20.0));
    /// assert!(row.dew_point.is_none()); // We never set a dew point profile.
    ///
    /// assert!(snd.data_row(3).is_none()); // There weren't that many rows!
    /// ```
    #[inline]
    pub fn data_row(&self, idx: usize) -> Option<DataRow> {
        macro_rules! copy_to_result {
            ($result:ident, $profile:ident, $idx:ident) => {
                match self.$profile.get($idx) {
                    None => {}
                    Some(opt_val) => $result.$profile = *opt_val,
                }
            };
        }

        if idx >= self.pressure.len() {
            return None;
        }

        let mut result = DataRow::default();

        copy_to_result!(result, pressure, idx);
        copy_to_result!(result, height, idx);
        copy_to_result!(result, temperature, idx);
        copy_to_result!(result, dew_point, idx);
        copy_to_result!(result, wind, idx);

        Some(result)
    }

    /// Check that the sounding can be plotted.
    ///
    /// Every profile that is present must be parallel to the pressure profile, pressure must
    /// not increase with height, and there must be at least two levels with both a pressure and a
    /// temperature so there is a line to draw.
    pub fn validate(&self) -> Result<()> {
        if self.pressure.is_empty() || self.temperature.is_empty() {
            return Err(AnalysisError::MissingProfile);
        }

        let expected = self.pressure.len();
        let lengths = [
            ("height", self.height.len()),
            ("temperature", self.temperature.len()),
            ("dew point", self.dew_point.len()),
            ("wind", self.wind.len()),
        ];
        if let Some(&(profile, len)) = lengths
            .iter()
            .find(|&&(_, len)| len != 0 && len != expected)
        {
            return Err(AnalysisError::ProfileLength {
                profile,
                len,
                expected,
            });
        }

        // Repeated levels are allowed, pressure going back up is not.
        let mut last_p: Option<HectoPascal> = None;
        for (level, p) in self
            .pressure
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.into_option().map(|p| (i, p)))
        {
            if let Some(below) = last_p {
                if p > below {
                    return Err(AnalysisError::PressureIncrease {
                        level,
                        pressure: p.unpack(),
                        below: below.unpack(),
                    });
                }
            }
            last_p = Some(p);
        }

        let plottable = izip!(&self.pressure, &self.temperature)
            .filter(|(p, t)| p.is_some() && t.is_some())
            .count();
        if plottable < 2 {
            return Err(AnalysisError::NotEnoughData);
        }

        Ok(())
    }
}

// FIXME: only configure for test and doc tests, not possible as of 1.41
#[doc(hidden)]
pub mod doctest {
    use super::*;

    pub fn make_test_sounding() -> super::Sounding {
        use optional::some;

        let p = vec![
            some(HectoPascal(1000.0)),
            some(HectoPascal(925.0)),
            some(HectoPascal(850.0)),
            some(HectoPascal(700.0)),
        ];
        let t = vec![
            some(Celsius(20.0)),
            some(Celsius(18.0)),
            some(Celsius(10.0)),
            some(Celsius(2.0)),
        ];

        Sounding::new()
            .with_pressure_profile(p)
            .with_temperature_profile(t)
    }
}


mod data_row;
mod station_info;
