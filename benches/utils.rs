use chrono::NaiveDate;
use skew_t_analysis::{parse_wyoming_page, Analysis, SoundingRequest, SoundingTable};
use std::{fs, path::PathBuf};

pub fn mpx_request() -> SoundingRequest {
    let valid_time = NaiveDate::from_ymd_opt(2016, 10, 26)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("bad date");
    SoundingRequest::new("MPX", valid_time)
}

pub fn load_test_page() -> String {
    let mut path = PathBuf::new();
    path.push(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push("72649_2016102612.html");

    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Error reading file: {:#?}", path))
}

#[allow(dead_code)]
pub fn load_test_table() -> SoundingTable {
    parse_wyoming_page(&load_test_page(), &mpx_request()).expect("bad test page")
}

#[allow(dead_code)]
pub fn load_test_analysis() -> Analysis {
    let snd = load_test_table().into_sounding().expect("bad units");
    Analysis::new(snd, mpx_request()).expect("bad sounding")
}
