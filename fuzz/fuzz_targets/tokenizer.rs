#![no_main]

use libfuzzer_sys::fuzz_target;
use tlnml::{ReadSource, Tokenizer, TokenizerConfig};

fuzz_target!(|data: &[u8]| {
    let config = if data.first().is_some_and(|b| b & 1 == 1) {
        TokenizerConfig::hybrid()
    } else {
        TokenizerConfig::default()
    };
    let mut tokenizer = Tokenizer::with_config(ReadSource::new(data), config);
    // Every token consumes at least one code point, except the end-of-input tail.
    let mut budget = data.len() + 1;
    loop {
        let emitted = tokenizer.next_token().expect("slice reader cannot fail");
        if emitted.token.is_end_of_input() {
            break;
        }
        assert!(budget > 0, "tokenizer emitted more tokens than input bytes");
        budget -= 1;
    }
    let tail = tokenizer.next_token().expect("slice reader cannot fail");
    assert!(tail.token.is_end_of_input() && tail.errors.is_empty());
    assert!(tokenizer.stats().code_points <= data.len() as u64);
});
