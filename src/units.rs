//! Attach physical units to the raw columns of a sounding table.
//!
//! Each column is converted once, up front, into the quantity type the rest of the crate works
//! in. Missing values (`NaN`) become `none`.
use crate::{
    archive::{Column, SoundingTable},
    error::{AnalysisError, Result},
    sounding::{Sounding, StationInfo},
};
use itertools::izip;
use metfor::{
    Celsius, Fahrenheit, Feet, HectoPascal, Kelvin, Km, Knots, Meters, MetersPSec, WindSpdDir,
    WindUV,
};
use optional::{none, some, Optioned};
use std::str::FromStr;
use tracing::debug;

/// Units a sounding archive may report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// hPa, equivalent to millibars.
    HectoPascal,
    /// Pa
    Pascal,
    /// m
    Meters,
    /// ft
    Feet,
    /// km
    Kilometers,
    /// degrees Celsius
    Celsius,
    /// K
    Kelvin,
    /// degrees Fahrenheit
    Fahrenheit,
    /// knots
    Knots,
    /// m/s
    MetersPerSecond,
    /// Angular degrees.
    Degrees,
}

impl FromStr for Unit {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let unit = match s.trim() {
            "hPa" | "hpa" | "mb" | "mbar" | "millibar" => Unit::HectoPascal,
            "Pa" => Unit::Pascal,
            "m" | "meter" | "meters" => Unit::Meters,
            "ft" | "feet" => Unit::Feet,
            "km" => Unit::Kilometers,
            "C" | "degC" | "degree_Celsius" | "celsius" => Unit::Celsius,
            "K" | "kelvin" => Unit::Kelvin,
            "F" | "degF" | "degree_Fahrenheit" | "fahrenheit" => Unit::Fahrenheit,
            "knot" | "knots" | "kt" | "kts" => Unit::Knots,
            "m/s" | "m s-1" | "meter / second" => Unit::MetersPerSecond,
            "deg" | "degree" | "degrees" => Unit::Degrees,
            _ => return Err(()),
        };

        Ok(unit)
    }
}

/// Build a typed sounding from a table.
///
/// Columns that are absent from the table produce empty profiles. A column that is present but
/// has no unit, or a unit that does not fit the column, is an error.
pub fn attach_units(table: &SoundingTable) -> Result<Sounding> {
    let pressure = pressure_column(table)?;
    let height = height_column(table)?;
    let temperature = temperature_column(table, Column::Temperature)?;
    let dew_point = temperature_column(table, Column::Dewpoint)?;
    let wind = wind_column(table)?;

    debug!(
        levels = pressure.len(),
        height = !height.is_empty(),
        dew_point = !dew_point.is_empty(),
        wind = !wind.is_empty(),
        "attached units"
    );

    let meta = table.metadata();
    let station = StationInfo::new()
        .with_station_id(meta.station.as_deref())
        .with_station(meta.station_number)
        .with_lat_lon(meta.latitude.and_then(|lat| meta.longitude.map(|lon| (lat, lon))))
        .with_elevation(Optioned::<Meters>::from(meta.elevation.map(Meters)));

    Ok(Sounding::new()
        .with_source_description(
            meta.station
                .as_ref()
                .map(|stn| format!("University of Wyoming upper air archive, {}", stn)),
        )
        .with_station_info(station)
        .with_valid_time(meta.time)
        .with_pressure_profile(pressure)
        .with_height_profile(height)
        .with_temperature_profile(temperature)
        .with_dew_point_profile(dew_point)
        .with_wind_profile(wind))
}

/// The values and unit of a column, `None` if the table does not have it at all.
fn column_with_unit(table: &SoundingTable, column: Column) -> Result<Option<(&[f64], Unit)>> {
    let values = match table.column(column) {
        Some(values) => values,
        None => return Ok(None),
    };

    let unit_str = table.unit(column);
    let unit = unit_str
        .and_then(|u| Unit::from_str(u).ok())
        .ok_or_else(|| mismatch(column, unit_str))?;

    Ok(Some((values, unit)))
}

fn mismatch(column: Column, unit: Option<&str>) -> AnalysisError {
    AnalysisError::UnitMismatch {
        column: column.as_ref().to_owned(),
        unit: unit.map(str::to_owned),
    }
}

fn convert<T, F>(values: &[f64], f: F) -> Vec<Optioned<T>>
where
    T: optional::Noned + Copy,
    F: Fn(f64) -> T,
{
    values
        .iter()
        .map(|&v| if v.is_nan() { none() } else { some(f(v)) })
        .collect()
}

fn pressure_column(table: &SoundingTable) -> Result<Vec<Optioned<HectoPascal>>> {
    let (values, unit) = match column_with_unit(table, Column::Pressure)? {
        Some(pair) => pair,
        None => return Ok(vec![]),
    };

    match unit {
        Unit::HectoPascal => Ok(convert(values, HectoPascal)),
        Unit::Pascal => Ok(convert(values, |v| HectoPascal(v / 100.0))),
        _ => Err(mismatch(Column::Pressure, table.unit(Column::Pressure))),
    }
}

fn height_column(table: &SoundingTable) -> Result<Vec<Optioned<Meters>>> {
    let (values, unit) = match column_with_unit(table, Column::Height)? {
        Some(pair) => pair,
        None => return Ok(vec![]),
    };

    match unit {
        Unit::Meters => Ok(convert(values, Meters)),
        Unit::Feet => Ok(convert(values, |v| Meters::from(Feet(v)))),
        Unit::Kilometers => Ok(convert(values, |v| Meters::from(Km(v)))),
        _ => Err(mismatch(Column::Height, table.unit(Column::Height))),
    }
}

fn temperature_column(table: &SoundingTable, column: Column) -> Result<Vec<Optioned<Celsius>>> {
    let (values, unit) = match column_with_unit(table, column)? {
        Some(pair) => pair,
        None => return Ok(vec![]),
    };

    match unit {
        Unit::Celsius => Ok(convert(values, Celsius)),
        Unit::Kelvin => Ok(convert(values, |v| Celsius::from(Kelvin(v)))),
        Unit::Fahrenheit => Ok(convert(values, |v| Celsius::from(Fahrenheit(v)))),
        _ => Err(mismatch(column, table.unit(column))),
    }
}

/// Multiply a wind speed by this to get knots.
fn knots_per_unit(unit: Unit, column: Column, table: &SoundingTable) -> Result<f64> {
    match unit {
        Unit::Knots => Ok(1.0),
        Unit::MetersPerSecond => Ok(Knots::from(MetersPSec(1.0)).0),
        _ => Err(mismatch(column, table.unit(column))),
    }
}

/// Wind from direction and speed if the table has them, otherwise from the u and v components.
fn wind_column(table: &SoundingTable) -> Result<Vec<Optioned<WindSpdDir<Knots>>>> {
    let dir = column_with_unit(table, Column::Direction)?;
    let spd = column_with_unit(table, Column::Speed)?;

    if let (Some((dir, dir_unit)), Some((spd, spd_unit))) = (dir, spd) {
        if dir_unit != Unit::Degrees {
            return Err(mismatch(Column::Direction, table.unit(Column::Direction)));
        }
        let to_knots = knots_per_unit(spd_unit, Column::Speed, table)?;

        return Ok(izip!(dir, spd)
            .map(|(&d, &s)| {
                if d.is_nan() || s.is_nan() {
                    none()
                } else {
                    some(WindSpdDir {
                        speed: Knots(s * to_knots),
                        direction: d,
                    })
                }
            })
            .collect());
    }

    let u = column_with_unit(table, Column::UWind)?;
    let v = column_with_unit(table, Column::VWind)?;

    match (u, v) {
        (Some((u, u_unit)), Some((v, v_unit))) => {
            let u_to_knots = knots_per_unit(u_unit, Column::UWind, table)?;
            let v_to_knots = knots_per_unit(v_unit, Column::VWind, table)?;

            Ok(izip!(u, v)
                .map(|(&u, &v)| {
                    if u.is_nan() || v.is_nan() {
                        none()
                    } else {
                        let uv = WindUV {
                            u: Knots(u * u_to_knots),
                            v: Knots(v * v_to_knots),
                        };
                        some(WindSpdDir::<Knots>::from(uv))
                    }
                })
                .collect())
        }
        _ => Ok(vec![]),
    }
}
