#![no_main]

use libfuzzer_sys::fuzz_target;
use portable_shelf::paths::{
    TokenContext, clean_description, detokenize, normalize_path, split_icon_location, tokenize,
    tokenize_arguments,
};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // First line is the app root, the rest is the path under test
    let (root, path) = s.split_once('\n').unwrap_or(("D:\\Portable\\App", s));
    let ctx = TokenContext {
        system_root: Some("C:\\Windows".to_string()),
        com_spec: Some("C:\\Windows\\system32\\cmd.exe".to_string()),
    };

    let _ = normalize_path(path);
    let token = tokenize(path, root, &ctx);
    let _ = detokenize(&token, root, &ctx);
    let _ = tokenize_arguments(path, root);
    let _ = split_icon_location(path);
    let _ = clean_description(path);
});
