#![no_main]

use libfuzzer_sys::fuzz_target;
use voltum::{lex, parse_tokens, CancelToken, ParseOptions};

// Drops and reorders lexed tokens, so the parser sees streams no lexer
// would produce.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let src = String::from_utf8_lossy(rest);
    let (tokens, _) = lex(&src);
    let mut stream: Vec<_> = tokens
        .iter()
        .enumerate()
        .filter(|(index, _)| (index + usize::from(selector)) % 7 != 0)
        .map(|(_, token)| *token)
        .collect();
    if selector % 2 == 1 {
        stream.reverse();
    }
    let options = ParseOptions {
        max_depth: 128,
        ..ParseOptions::default()
    };
    let Ok(parse) = parse_tokens(&src, &stream, &options, &CancelToken::new()) else {
        return;
    };
    let expected: String = stream.iter().map(|token| token.text(&src)).collect();
    assert_eq!(parse.syntax().text().to_string(), expected);
});
