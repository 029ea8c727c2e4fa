//! Client for the University of Wyoming upper air archive.
//!
//! The archive answers a plain GET with an HTML page. The first `<PRE>` block holds a fixed
//! width table, the second holds station information and some indexes.
use super::{Column, SoundingRequest, SoundingSource, SoundingTable, TableMetadata};
use crate::error::{AnalysisError, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::time::Duration;
use tracing::{debug, info};

/// Where the archive lives.
pub const DEFAULT_WYOMING_URL: &str = "http://weather.uwyo.edu/cgi-bin/sounding";

// Every column of the text listing is this many characters wide.
const COLUMN_WIDTH: usize = 7;

/// Fetches soundings from the Wyoming archive with a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct WyomingArchive {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WyomingArchive {
    /// Create a client for the archive at `base_url`.
    pub fn new<S: Into<String>>(base_url: S, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(WyomingArchive {
            client,
            base_url: base_url.into(),
        })
    }

    /// The archive this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query parameters for a request.
    pub fn query(request: &SoundingRequest) -> Vec<(&'static str, String)> {
        let vt = request.valid_time;
        let day_hour = format!("{:02}{:02}", vt.day(), vt.hour());

        vec![
            ("region", "naconf".to_owned()),
            ("TYPE", "TEXT:LIST".to_owned()),
            ("YEAR", format!("{}", vt.year())),
            ("MONTH", format!("{:02}", vt.month())),
            ("FROM", day_hour.clone()),
            ("TO", day_hour),
            ("STNM", request.station.clone()),
        ]
    }
}

impl SoundingSource for WyomingArchive {
    fn fetch(&self, request: &SoundingRequest) -> Result<SoundingTable> {
        info!(station = %request.station, time = %request.valid_time, "requesting sounding");
        debug!(url = %self.base_url, "archive url");

        let text = self
            .client
            .get(&self.base_url)
            .query(&Self::query(request))
            .send()?
            .error_for_status()?
            .text()?;

        debug!(bytes = text.len(), "archive responded");

        parse_wyoming_page(&text, request)
    }
}

/// Parse a text listing page from the archive.
///
/// Rows where temperature, dew point and wind are all missing are dropped. The u and v wind
/// components are derived from direction and speed and carry the speed's unit.
pub fn parse_wyoming_page(text: &str, request: &SoundingRequest) -> Result<SoundingTable> {
    let blocks = pre_blocks(text);

    let data_block = match blocks.first() {
        Some(block) if !text.contains("Can't get") => *block,
        _ => {
            return Err(AnalysisError::NoData {
                station: request.station.clone(),
                time: request.valid_time.to_string(),
            })
        }
    };

    let mut table = parse_data_block(data_block)?;

    let metadata = blocks
        .get(1)
        .map(|block| parse_metadata_block(block))
        .unwrap_or_default();
    table = table.with_metadata(metadata);

    table.check_parallel()?;
    if table.is_empty() {
        return Err(AnalysisError::NoData {
            station: request.station.clone(),
            time: request.valid_time.to_string(),
        });
    }

    debug!(rows = table.len(), "parsed sounding table");

    Ok(table)
}

/// The contents of every `<PRE>` block, in document order.
fn pre_blocks(text: &str) -> Vec<&str> {
    // ASCII lower casing keeps byte offsets the same as the original text.
    let lower = text.to_ascii_lowercase();

    let mut blocks = vec![];
    let mut start = 0;
    while let Some(open) = lower[start..].find("<pre>") {
        let content_start = start + open + "<pre>".len();
        let content_end = match lower[content_start..].find("</pre>") {
            Some(close) => content_start + close,
            None => lower.len(),
        };
        blocks.push(&text[content_start..content_end]);
        start = content_end;
    }

    blocks
}

fn wyoming_column(name: &str) -> Option<Column> {
    match name {
        "PRES" => Some(Column::Pressure),
        "HGHT" => Some(Column::Height),
        "TEMP" => Some(Column::Temperature),
        "DWPT" => Some(Column::Dewpoint),
        "DRCT" => Some(Column::Direction),
        "SKNT" => Some(Column::Speed),
        _ => None,
    }
}

fn parse_data_block(block: &str) -> Result<SoundingTable> {
    let mut lines = block.lines().filter(|line| !line.trim().is_empty());

    let mut next_line = |what: &str| {
        lines
            .next()
            .ok_or_else(|| AnalysisError::Parse(format!("missing {} in data table", what)))
    };

    let rule = next_line("leading rule")?;
    if !rule.trim_start().starts_with('-') {
        return Err(AnalysisError::Parse("data table has no leading rule".to_owned()));
    }
    let names: Vec<&str> = next_line("column names")?.split_whitespace().collect();
    let units: Vec<&str> = next_line("column units")?.split_whitespace().collect();
    next_line("header rule")?;

    if names.len() != units.len() {
        return Err(AnalysisError::Parse(format!(
            "{} column names but {} units",
            names.len(),
            units.len()
        )));
    }

    // (position in the listing, column, unit)
    let wanted: Vec<(usize, Column, &str)> = names
        .iter()
        .zip(&units)
        .enumerate()
        .filter_map(|(i, (name, unit))| wyoming_column(name).map(|col| (i, col, *unit)))
        .collect();

    let mut values: Vec<Vec<f64>> = vec![vec![]; wanted.len()];
    for line in lines {
        for (vals, &(pos, col, _)) in values.iter_mut().zip(&wanted) {
            vals.push(parse_field(line, pos).map_err(|_| {
                AnalysisError::Parse(format!("bad {} value in row {:?}", col.as_ref(), line))
            })?);
        }
    }

    let mut raw: Vec<(Column, Vec<f64>, String)> = wanted
        .into_iter()
        .zip(values)
        .map(|((_, col, unit), vals)| (col, vals, unit.to_owned()))
        .collect();

    let find = |tgt: Column| raw.iter().find(|(col, _, _)| *col == tgt);
    let uv = match (find(Column::Direction), find(Column::Speed)) {
        (Some((_, dir, _)), Some((_, spd, spd_unit))) => {
            let (u, v): (Vec<f64>, Vec<f64>) = dir
                .iter()
                .zip(spd)
                .map(|(&d, &s)| wind_components(d, s))
                .unzip();
            Some((u, v, spd_unit.clone()))
        }
        _ => None,
    };

    if let Some((u, v, unit)) = uv {
        raw.push((Column::UWind, u, unit.clone()));
        raw.push((Column::VWind, v, unit));
    }

    let keep = keep_rows(&raw);

    let table = raw
        .into_iter()
        .fold(SoundingTable::new(), |table, (col, vals, unit)| {
            let vals = vals
                .into_iter()
                .zip(&keep)
                .filter_map(|(v, &k)| if k { Some(v) } else { None })
                .collect();
            table.with_column(col, vals, unit)
        });

    Ok(table)
}

/// Rows with no temperature, dew point or wind at all carry nothing to plot.
fn keep_rows(raw: &[(Column, Vec<f64>, String)]) -> Vec<bool> {
    let len = raw.first().map(|(_, vals, _)| vals.len()).unwrap_or(0);
    let checked: Vec<&Vec<f64>> = raw
        .iter()
        .filter(|(col, _, _)| {
            matches!(
                col,
                Column::Temperature | Column::Dewpoint | Column::Direction | Column::Speed
            )
        })
        .map(|(_, vals, _)| vals)
        .collect();

    (0..len)
        .map(|i| checked.iter().any(|vals| !vals[i].is_nan()))
        .collect()
}

/// Parse the fixed width field at `pos`. Blank fields are missing values.
fn parse_field(line: &str, pos: usize) -> std::result::Result<f64, std::num::ParseFloatError> {
    let start = pos * COLUMN_WIDTH;
    let end = (start + COLUMN_WIDTH).min(line.len());

    match line.get(start..end).map(str::trim) {
        Some(field) if !field.is_empty() => field.parse(),
        _ => Ok(f64::NAN),
    }
}

/// Direction (degrees the wind blows from) and speed to u and v components.
fn wind_components(direction: f64, speed: f64) -> (f64, f64) {
    if direction.is_nan() || speed.is_nan() {
        return (f64::NAN, f64::NAN);
    }

    let rads = direction.to_radians();
    (-speed * rads.sin(), -speed * rads.cos())
}

fn parse_metadata_block(block: &str) -> TableMetadata {
    let mut meta = TableMetadata::default();

    for (key, value) in block
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim(), v.trim()))
    {
        match key {
            "Station identifier" => meta.station = Some(value.to_owned()),
            "Station number" => meta.station_number = value.parse().ok(),
            "Observation time" => {
                meta.time = NaiveDateTime::parse_from_str(value, "%y%m%d/%H%M").ok()
            }
            "Station latitude" => meta.latitude = value.parse().ok(),
            "Station longitude" => meta.longitude = value.parse().ok(),
            "Station elevation" => meta.elevation = value.parse().ok(),
            "Precipitable water [mm] for entire sounding" => {
                meta.precipitable_water = value.parse().ok()
            }
            _ => {}
        }
    }

    meta
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;
    use chrono::NaiveDate;

    const PAGE: &str = "<HTML><BODY>
<H2>72649 MPX Chanhassen Observations at 12Z 26 Oct 2016</H2>
<PRE>
-----------------------------------------------------------------------------
   PRES   HGHT   TEMP   DWPT   RELH   MIXR   DRCT   SKNT   THTA   THTE   THTV
    hPa     m      C      C      %    g/kg    deg   knot     K      K      K
-----------------------------------------------------------------------------
 1000.0    100
  981.0    287    6.2    1.2     70   4.25    140      8  280.9  291.7  281.6
  850.0   1465    1.6   -6.4     55   2.79    270     31  287.8  295.2  288.3
  100.0  15760  -62.9  -79.9      8   0.01                405.9  405.9  405.9
</PRE><H3>Station information and sounding indices</H3><PRE>
                         Station identifier: MPX
                             Station number: 72649
                           Observation time: 161026/1200
                           Station latitude: 44.85
                          Station longitude: -93.56
                          Station elevation: 287.0
 Precipitable water [mm] for entire sounding: 8.51
</PRE>
</BODY></HTML>";

    fn request() -> SoundingRequest {
        let vt = NaiveDate::from_ymd_opt(2016, 10, 26)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        SoundingRequest::new("MPX", vt)
    }

    #[test]
    fn test_query() {
        let query = WyomingArchive::query(&request());

        assert!(query.contains(&("YEAR", "2016".to_owned())));
        assert!(query.contains(&("MONTH", "10".to_owned())));
        assert!(query.contains(&("FROM", "2612".to_owned())));
        assert!(query.contains(&("TO", "2612".to_owned())));
        assert!(query.contains(&("STNM", "MPX".to_owned())));
    }

    #[test]
    fn test_parse_page() {
        let table = parse_wyoming_page(PAGE, &request()).unwrap();

        // The 1000 hPa level is below ground and has nothing but a height.
        assert_eq!(table.len(), 3);
        assert_eq!(table.column(Column::Pressure).unwrap(), &[981.0, 850.0, 100.0]);
        assert_eq!(table.unit(Column::Pressure), Some("hPa"));
        assert_eq!(table.unit(Column::Temperature), Some("C"));
        assert_eq!(table.unit(Column::UWind), Some("knot"));

        let dir = table.column(Column::Direction).unwrap();
        assert!(dir[2].is_nan());

        let u = table.column(Column::UWind).unwrap();
        let v = table.column(Column::VWind).unwrap();
        assert!(approx_equal(u[1], 31.0, 1.0e-9));
        assert!(approx_equal(v[1], 0.0, 1.0e-9));
        assert!(u[2].is_nan() && v[2].is_nan());

        let meta = table.metadata();
        assert_eq!(meta.station.as_deref(), Some("MPX"));
        assert_eq!(meta.station_number, Some(72649));
        assert_eq!(meta.time, Some(request().valid_time));
        assert_eq!(meta.elevation, Some(287.0));
        assert_eq!(meta.precipitable_water, Some(8.51));
    }

    #[test]
    fn test_no_data_page() {
        let page = "<HTML><H2>Can't get 72649 MPX Chanhassen Observations</H2></HTML>";
        assert!(matches!(
            parse_wyoming_page(page, &request()),
            Err(AnalysisError::NoData { .. })
        ));
    }

    #[test]
    fn test_parse_field() {
        let line = "  981.0    287                                                               ";
        assert_eq!(parse_field(line, 0).unwrap(), 981.0);
        assert_eq!(parse_field(line, 1).unwrap(), 287.0);
        assert!(parse_field(line, 2).unwrap().is_nan());
        // Past the end of a trimmed line.
        assert!(parse_field("  981.0", 5).unwrap().is_nan());
        assert!(parse_field("  x81.0", 0).is_err());
    }

    #[test]
    fn test_wind_components() {
        let (u, v) = wind_components(180.0, 10.0);
        assert!(approx_equal(u, 0.0, 1.0e-9));
        assert!(approx_equal(v, 10.0, 1.0e-9));

        let (u, v) = wind_components(f64::NAN, 10.0);
        assert!(u.is_nan() && v.is_nan());
    }
}
