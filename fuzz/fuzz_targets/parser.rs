#![no_main]

use libfuzzer_sys::fuzz_target;
use voltum::{parse_text, CancelToken, EntryPoint, ParseOptions};

fuzz_target!(|data: &[u8]| {
    // Avoid pathological allocations in the harness itself; libFuzzer will still mutate below this.
    if data.len() > 64 * 1024 {
        return;
    }
    let src = String::from_utf8_lossy(data);
    for entry in [
        EntryPoint::Program,
        EntryPoint::Expression,
        EntryPoint::Statement,
        EntryPoint::Block,
    ] {
        let options = ParseOptions {
            max_depth: 128,
            ..ParseOptions::with_entry(entry)
        };
        let Ok(parse) = parse_text(&src, &options, &CancelToken::new()) else {
            return;
        };
        assert_eq!(parse.syntax().text().to_string(), src);
    }
});
