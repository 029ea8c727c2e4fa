#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use skew_t_analysis::{
    parse_wyoming_page, AnalysisError, Result, SkewTConfig, SoundingRequest, SoundingSource,
    SoundingTable,
};
use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

/// Generate a test that charts a fixture end to end and checks the file header.
#[allow(unused_macros)] // False alarm
macro_rules! test_render {
    ($test_name:ident, $fname:expr, $out_name:expr, $magic:expr) => {
        #[test]
        fn $test_name() {
            let dir = tempfile::tempdir().unwrap();
            let config = utils::config_for(dir.path(), Some($out_name));
            let source = utils::FileSource::new($fname);

            let path = skew_t_analysis::run(&config, &source).unwrap();
            assert_eq!(path, dir.path().join($out_name));

            let bytes = std::fs::read(&path).unwrap();
            assert!(
                bytes.starts_with($magic),
                "bad header for {}",
                path.display()
            );
            assert_eq!(source.requests(), vec![utils::mpx_request()]);
        }
    };
}

pub fn valid_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, 10, 26)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

pub fn mpx_request() -> SoundingRequest {
    SoundingRequest::new("MPX", valid_time())
}

pub fn test_data_path(fname: &str) -> PathBuf {
    let mut path = PathBuf::new();
    path.push(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(fname);
    path
}

pub fn load_test_page(fname: &str) -> String {
    let path = test_data_path(fname);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Error reading file: {:#?}", path))
}

pub fn load_test_table(fname: &str) -> SoundingTable {
    parse_wyoming_page(&load_test_page(fname), &mpx_request()).unwrap()
}

/// A configuration writing into `dir`, the default MPX request otherwise.
pub fn config_for(dir: &Path, output_file: Option<&str>) -> SkewTConfig {
    SkewTConfig {
        output_dir: dir.to_path_buf(),
        output_file: output_file.map(PathBuf::from),
        ..SkewTConfig::default()
    }
}

/// Serves a saved archive page instead of going to the network, and remembers what was asked.
pub struct FileSource {
    fname: &'static str,
    requests: RefCell<Vec<SoundingRequest>>,
}

impl FileSource {
    pub fn new(fname: &'static str) -> Self {
        FileSource {
            fname,
            requests: RefCell::new(vec![]),
        }
    }

    pub fn requests(&self) -> Vec<SoundingRequest> {
        self.requests.borrow().clone()
    }
}

impl SoundingSource for FileSource {
    fn fetch(&self, request: &SoundingRequest) -> Result<SoundingTable> {
        self.requests.borrow_mut().push(request.clone());

        let path = test_data_path(self.fname);
        let text = fs::read_to_string(&path).map_err(AnalysisError::from)?;
        parse_wyoming_page(&text, request)
    }
}
