#[macro_use]
mod utils;

use metfor::{HectoPascal, Quantity};
use skew_t_analysis::{barb_cutoff, Analysis, AnalysisError, BarbCutoff, OutputFormat};

test_render!(render_pdf, "72649_2016102612.html", "chart.pdf", b"%PDF");
test_render!(render_png, "72649_2016102612.html", "chart.png", b"\x89PNG");
test_render!(render_svg, "72649_2016102612.html", "chart.svg", b"<svg");

#[test]
fn test_default_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = utils::config_for(dir.path(), None);
    let source = utils::FileSource::new("72649_2016102612.html");

    let path = skew_t_analysis::run(&config, &source).unwrap();
    assert_eq!(
        path.file_name().and_then(|f| f.to_str()),
        Some("MPX_2016102612_SkewT_Analysis.pdf")
    );
    assert_eq!(OutputFormat::from_path(&path).unwrap(), OutputFormat::Pdf);
    assert!(path.exists());
}

#[test]
fn test_fixture_barbs() {
    let snd = utils::load_test_table("72649_2016102612.html")
        .into_sounding()
        .unwrap();

    let cutoff = barb_cutoff(snd.pressure_profile());
    assert_eq!(cutoff, BarbCutoff::UpTo(27));
    assert_eq!(
        snd.pressure_profile()[26].map(|p| p.unpack()),
        Some(100.0)
    );

    let anal = Analysis::new(snd, utils::mpx_request()).unwrap();
    let (p, w) = anal.barbs(3);
    assert_eq!(p.len(), 9);
    assert_eq!(w.len(), 9);

    // Every barb is at or below 100 hPa.
    assert!(p.iter().all(|p| p.unwrap() >= HectoPascal(100.0)));
}

#[test]
fn test_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = utils::config_for(dir.path(), None);
    let source = utils::FileSource::new("no_data.html");

    match skew_t_analysis::run(&config, &source) {
        Err(AnalysisError::NoData { station, .. }) => assert_eq!(station, "MPX"),
        other => panic!("unexpected result {:?}", other),
    }

    // Nothing written.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unsupported_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = utils::config_for(dir.path(), Some("chart.jpg"));
    let source = utils::FileSource::new("72649_2016102612.html");

    assert!(matches!(
        skew_t_analysis::run(&config, &source),
        Err(AnalysisError::UnsupportedFormat(_))
    ));
}
