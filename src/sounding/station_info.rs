use metfor::Meters;
use optional::Optioned;

/// Station information including location data and identification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationInfo {
    /// station identifier, eg MPX
    id: Option<String>,
    /// WMO station number, eg 72649
    num: Optioned<i32>,
    /// Latitude and longitude.
    location: Option<(f64, f64)>,
    /// Elevation of the launch site.
    elevation: Optioned<Meters>,
}

impl StationInfo {
    /// Create a new object with default values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::StationInfo;
    ///
    /// assert!(StationInfo::new().station_id().is_none());
    /// assert!(StationInfo::new().station_num().is_none());
    /// assert!(StationInfo::new().location().is_none());
    /// assert!(StationInfo::new().elevation().is_none());
    ///
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a station identifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::StationInfo;
    ///
    /// assert_eq!(StationInfo::new().with_station_id("MPX").station_id(), Some("MPX"));
    /// assert_eq!(StationInfo::new().with_station_id(None).station_id(), None);
    ///
    /// ```
    #[inline]
    pub fn with_station_id<'a, T>(mut self, id: T) -> Self
    where
        Option<&'a str>: From<T>,
    {
        self.id = Option::from(id).map(str::to_owned);
        self
    }

    /// Builder method to add a station number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::StationInfo;
    ///
    /// assert_eq!(StationInfo::new().with_station(72649).station_num().unwrap(), 72649);
    /// assert_eq!(StationInfo::new().with_station(Some(72649)).station_num().unwrap(), 72649);
    ///
    /// ```
    #[inline]
    pub fn with_station<T>(mut self, number: T) -> Self
    where
        Optioned<i32>: From<T>,
    {
        self.num = Optioned::from(number);

        self
    }

    /// Builder method to add a location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::StationInfo;
    ///
    /// assert_eq!(
    ///     StationInfo::new().with_lat_lon((44.85, -93.56)).location().unwrap(), (44.85, -93.56));
    /// assert!(StationInfo::new().with_lat_lon(None).location().is_none());
    ///
    /// ```
    #[inline]
    pub fn with_lat_lon<T>(mut self, coords: T) -> Self
    where
        Option<(f64, f64)>: From<T>,
    {
        self.location = Option::from(coords);
        self
    }

    /// Builder method to add elevation.
    ///
    /// # Examples
    ///```rust
    /// use metfor::{Meters, Feet};
    /// use skew_t_analysis::StationInfo;
    /// use optional::{some, none};
    ///
    /// let _info = StationInfo::new().with_elevation(Feet(941.0));
    /// let _info = StationInfo::new().with_elevation(Meters(287.0));
    /// let _info = StationInfo::new().with_elevation(some(Meters(287.0)));
    /// let _info = StationInfo::new().with_elevation(none::<Meters>());
    ///```
    #[inline]
    pub fn with_elevation<T, U>(mut self, elev: T) -> Self
    where
        Optioned<U>: From<T>,
        U: optional::Noned + metfor::Length,
        Meters: From<U>,
    {
        let elevation: Optioned<U> = Optioned::from(elev);
        let elevation: Optioned<Meters> = elevation.map_t(Meters::from);

        self.elevation = elevation;
        self
    }

    /// Station identifier, eg MPX
    #[inline]
    pub fn station_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// WMO station number, eg 72649
    #[inline]
    pub fn station_num(&self) -> Optioned<i32> {
        self.num
    }

    /// Latitude and longitude.
    #[inline]
    pub fn location(&self) -> Option<(f64, f64)> {
        self.location
    }

    /// Elevation in meters.
    #[inline]
    pub fn elevation(&self) -> Optioned<Meters> {
        self.elevation
    }
}
