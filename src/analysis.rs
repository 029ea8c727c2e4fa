//! The fetch, attach units, plot and save pipeline.
use crate::{
    archive::{SoundingRequest, SoundingSource},
    config::{ChartConfig, SkewTConfig},
    error::Result,
    levels::{barb_cutoff, barb_levels, BarbCutoff},
    output,
    skewt::{
        SkewT, DEFAULT_MIXING_RATIOS, DEW_POINT_STYLE, DRY_ADIABAT_STYLE, MIXING_LINE_STYLE,
        MOIST_ADIABAT_STYLE, TEMPERATURE_STYLE,
    },
    sounding::Sounding,
    utility::arange,
};
use metfor::{Celsius, HectoPascal, Kelvin, Knots, WindUV};
use optional::Optioned;
use std::path::PathBuf;
use tracing::info;

/// A validated sounding ready to be charted, with the request it answers.
#[derive(Debug, Clone)]
pub struct Analysis {
    // Sounding used to make the analysis
    sounding: Sounding,

    // What was asked for, used for the titles
    request: SoundingRequest,

    // How far up the wind barbs go
    barb_cutoff: BarbCutoff,
}

impl Analysis {
    /// Create a new `Analysis`.
    ///
    /// Fails if the sounding does not have at least two levels with pressure and temperature.
    pub fn new(snd: Sounding, request: SoundingRequest) -> Result<Self> {
        snd.validate()?;
        let barb_cutoff = barb_cutoff(snd.pressure_profile());

        Ok(Analysis {
            sounding: snd,
            request,
            barb_cutoff,
        })
    }

    /// The sounding.
    pub fn sounding(&self) -> &Sounding {
        &self.sounding
    }

    /// The request this sounding answers.
    pub fn request(&self) -> &SoundingRequest {
        &self.request
    }

    /// How far up the profile wind barbs are drawn.
    pub fn barb_cutoff(&self) -> BarbCutoff {
        self.barb_cutoff
    }

    /// Pressure and wind at the levels that get a barb.
    pub fn barbs(
        &self,
        stride: usize,
    ) -> (Vec<Optioned<HectoPascal>>, Vec<Optioned<WindUV<Knots>>>) {
        barb_levels(&self.sounding, self.barb_cutoff, stride)
            .map(|row| (row.pressure, row.wind.map_t(WindUV::<Knots>::from)))
            .unzip()
    }

    /// Draw the chart.
    pub fn chart(&self, config: &ChartConfig) -> Result<SkewT> {
        let snd = &self.sounding;
        let pres = snd.pressure_profile();

        let (width, height) = config.figure_size;
        let mut skew = SkewT::new()
            .with_figure_size(width, height)
            .with_rotation(config.rotation)
            .with_barb_length(config.barb_length);

        skew.plot(pres, snd.temperature_profile(), TEMPERATURE_STYLE)?;
        if !snd.dew_point_profile().is_empty() {
            skew.plot(pres, snd.dew_point_profile(), DEW_POINT_STYLE)?;
        }

        let (barb_p, barb_w) = self.barbs(config.barb_stride);
        skew.plot_barbs(&barb_p, &barb_w)?;

        let (t_left, t_right) = config.temperature_limits;
        let (p_bottom, p_top) = config.pressure_limits;
        skew.set_xlim(Celsius(t_left), Celsius(t_right))?;
        skew.set_ylim(HectoPascal(p_bottom), HectoPascal(p_top))?;

        let t0: Vec<Kelvin> = arange(233.0, 533.0, 10.0).into_iter().map(Kelvin).collect();
        skew.plot_dry_adiabats(&t0, DRY_ADIABAT_STYLE);

        let t0: Vec<Kelvin> = arange(233.0, 400.0, 5.0).into_iter().map(Kelvin).collect();
        skew.plot_moist_adiabats(&t0, MOIST_ADIABAT_STYLE);

        let mixing_p: Vec<HectoPascal> = arange(1000.0, 99.0, -20.0)
            .into_iter()
            .map(HectoPascal)
            .collect();
        skew.plot_mixing_lines(&DEFAULT_MIXING_RATIOS, &mixing_p, MIXING_LINE_STYLE);

        skew.title_left(format!("{} Sounding", self.request.station));
        skew.title_right(format!(
            "Valid Time: {}",
            self.request.valid_time.format("%Y-%m-%d %H:%M:%S")
        ));

        info!(
            levels = snd.len(),
            barbs = barb_p.len(),
            cutoff = ?self.barb_cutoff,
            "built skew-t"
        );

        Ok(skew)
    }
}

/// Fetch the configured sounding from `source`, chart it and save it. Returns the path written.
pub fn run<S: SoundingSource + ?Sized>(config: &SkewTConfig, source: &S) -> Result<PathBuf> {
    config.validate()?;

    let request = config.request();
    info!(station = %request.station, valid_time = %request.valid_time, "requesting sounding");

    let table = source.fetch(&request)?;
    let snd = table.into_sounding()?;
    let anal = Analysis::new(snd, request)?;

    let chart = anal.chart(&config.chart)?;
    let path = config.output_path();
    output::save(&chart, &path, config.chart.dpi)?;

    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        archive::{Column, SoundingTable},
        error::AnalysisError,
    };
    use chrono::NaiveDate;

    struct CannedSource(SoundingTable);

    impl SoundingSource for CannedSource {
        fn fetch(&self, _request: &SoundingRequest) -> Result<SoundingTable> {
            Ok(self.0.clone())
        }
    }

    fn request() -> SoundingRequest {
        let valid_time = NaiveDate::from_ymd_opt(2016, 10, 26)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        SoundingRequest::new("MPX", valid_time)
    }

    fn table() -> SoundingTable {
        let pres = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 300.0, 200.0, 100.0, 50.0];
        let n = pres.len();
        SoundingTable::new()
            .with_column(Column::Pressure, pres, "hPa")
            .with_column(
                Column::Temperature,
                vec![20.0, 15.0, 10.0, 0.0, -20.0, -45.0, -55.0, -60.0, -58.0],
                "C",
            )
            .with_column(
                Column::Dewpoint,
                vec![10.0, 8.0, 2.0, -10.0, -30.0, -55.0, -70.0, -80.0, -85.0],
                "C",
            )
            .with_column(Column::Direction, vec![270.0; n], "deg")
            .with_column(Column::Speed, vec![25.0; n], "knot")
    }

    #[test]
    fn test_analysis_barbs() {
        let snd = table().into_sounding().unwrap();
        let anal = Analysis::new(snd, request()).unwrap();

        assert_eq!(anal.barb_cutoff(), BarbCutoff::UpTo(8));

        let (p, w) = anal.barbs(3);
        let p: Vec<f64> = p.into_iter().map(|p| p.unwrap().0).collect();
        assert_eq!(p, vec![1000.0, 700.0, 200.0]);
        assert_eq!(w.len(), 3);
        assert!(w.iter().all(|w| w.is_some()));
    }

    #[test]
    fn test_too_short() {
        let snd = SoundingTable::new()
            .with_column(Column::Pressure, vec![1000.0], "hPa")
            .with_column(Column::Temperature, vec![20.0], "C")
            .into_sounding()
            .unwrap();

        match Analysis::new(snd, request()) {
            Err(AnalysisError::NotEnoughData) => {}
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_chart_titles() {
        let snd = table().into_sounding().unwrap();
        let anal = Analysis::new(snd, request()).unwrap();
        let svg = anal.chart(&ChartConfig::default()).unwrap().to_svg().unwrap();

        assert!(svg.contains(">MPX Sounding</text>"));
        assert!(svg.contains(">Valid Time: 2016-10-26 12:00:00</text>"));
    }

    #[test]
    fn test_run_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SkewTConfig {
            output_dir: dir.path().to_path_buf(),
            output_file: Some(PathBuf::from("chart.svg")),
            ..SkewTConfig::default()
        };

        let path = run(&config, &CannedSource(table())).unwrap();
        assert_eq!(path, dir.path().join("chart.svg"));
        assert!(path.exists());
    }
}
