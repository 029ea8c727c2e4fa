//! Fetch a sounding from the University of Wyoming archive and save a skew-T chart of it.
//!
//! With no arguments this draws MPX at 12 UTC 26 October 2016 to
//! `MPX_2016102612_SkewT_Analysis.pdf` in the current directory.
use anyhow::{Context, Result};
use clap::Parser;
use skew_t_analysis::{config::parse_valid_time, run, SkewTConfig, WyomingArchive};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "skewt")]
#[command(about = "Plot an upper air sounding on a skew-T/log-p chart")]
struct Args {
    /// TOML configuration file, command line options override it
    #[arg(short, long, env = "SKEWT_CONFIG")]
    config: Option<PathBuf>,

    /// Station identifier, eg MPX
    #[arg(short, long)]
    station: Option<String>,

    /// Valid time, eg "2016-10-26 12:00" or 2016102612
    #[arg(short, long)]
    time: Option<String>,

    /// Output file, the extension (pdf, png or svg) picks the format
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resolution for raster output
    #[arg(long)]
    dpi: Option<f64>,

    /// Base URL of the sounding archive
    #[arg(long, env = "SKEWT_ARCHIVE_URL")]
    archive_url: Option<String>,

    /// Log level, RUST_LOG takes precedence when set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = build_config(&args)?;
    let source = WyomingArchive::new(config.archive_url.clone(), config.timeout())
        .context("failed to create the archive client")?;

    let path = run(&config, &source).with_context(|| {
        format!(
            "failed to chart {} at {}",
            config.station,
            config.valid_time.format("%Y-%m-%d %HZ")
        )
    })?;

    info!(path = %path.display(), "done");
    Ok(())
}

fn build_config(args: &Args) -> Result<SkewTConfig> {
    let mut config = match args.config {
        Some(ref path) => SkewTConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => SkewTConfig::default(),
    };

    if let Some(ref station) = args.station {
        config.station = station.clone();
    }
    if let Some(ref time) = args.time {
        config.valid_time = parse_valid_time(time)?;
    }
    if let Some(ref output) = args.output {
        config.output_file = Some(output.clone());
    }
    if let Some(dpi) = args.dpi {
        config.chart.dpi = dpi;
    }
    if let Some(ref url) = args.archive_url {
        config.archive_url = url.clone();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["skewt"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_config(&args(&[])).unwrap();
        assert_eq!(config, SkewTConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skewt.toml");
        std::fs::write(
            &path,
            "station = \"OAX\"\nvalid_time = \"2019-03-14 00:00\"\n\n[chart]\ndpi = 300.0\nrotation = 45.0\n",
        )
        .unwrap();
        let path = path.to_str().unwrap();

        // File values are used where no flag is given.
        let config = build_config(&args(&["--config", path])).unwrap();
        assert_eq!(config.station, "OAX");
        assert_eq!(config.chart.dpi, 300.0);

        let config = build_config(&args(&[
            "--config",
            path,
            "--station",
            "BIS",
            "--time",
            "2020010212",
            "--dpi",
            "100",
            "--output",
            "bis.png",
        ]))
        .unwrap();

        assert_eq!(config.station, "BIS");
        assert_eq!(config.valid_time, parse_valid_time("2020-01-02 12:00").unwrap());
        assert_eq!(config.chart.dpi, 100.0);
        assert_eq!(config.output_file, Some(PathBuf::from("bis.png")));
        // Not overridden.
        assert_eq!(config.chart.rotation, 45.0);
    }

    #[test]
    fn test_bad_flags() {
        assert!(build_config(&args(&["--time", "yesterday"])).is_err());
        assert!(build_config(&args(&["--dpi", "0"])).is_err());
    }
}
