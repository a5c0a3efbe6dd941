#![no_main]

use libfuzzer_sys::fuzz_target;
use portable_shelf::registry::{RegistryPath, parse_query_value};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse as reg.exe output, looking up a fixed name and the default value
        let _ = parse_query_value(s, "DisplayVersion");
        let _ = parse_query_value(s, "");

        // And as a registry path
        if let Some(path) = RegistryPath::parse(s) {
            let _ = path.to_string();
            let _ = path.reg_exe_form();
        }
    }
});
