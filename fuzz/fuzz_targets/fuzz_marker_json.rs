#![no_main]

use libfuzzer_sys::fuzz_target;
use portable_shelf::marker::MarkerStore;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(marker) = MarkerStore::parse(s)
    {
        // Anything that parses must serialize again
        let json = serde_json::to_string(&marker).unwrap();
        assert!(MarkerStore::parse(&json).is_ok());
        let _ = marker.group_label();
        let _ = marker.start_menu_folder();
    }
});
