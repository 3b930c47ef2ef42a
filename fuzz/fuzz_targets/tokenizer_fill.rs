#![no_main]

use libfuzzer_sys::fuzz_target;
use wordtable::ds::MAX_KEY_LEN;
use wordtable::table::WordTable;
use wordtable::tokenize::{FillOptions, Tokenizer, fill_table, is_word_byte};

// Fuzz the tokenizer and table fill with arbitrary bytes
//
// Every token is non-empty and made only of word bytes, and the fill
// accounts for every token exactly once.
fuzz_target!(|data: &[u8]| {
    let tokens: Vec<Vec<u8>> = Tokenizer::with_capacity(7, data)
        .map(|t| t.unwrap())
        .collect();
    for token in &tokens {
        assert!(!token.is_empty());
        assert!(token.iter().all(|&b| is_word_byte(b)));
    }

    let mut table = WordTable::new(7).unwrap();
    let stats = fill_table(&mut table, data, FillOptions::default()).unwrap();
    let long = tokens.iter().filter(|t| t.len() > MAX_KEY_LEN).count() as u64;

    assert_eq!(stats.words + stats.skipped_long, tokens.len() as u64);
    assert_eq!(stats.skipped_long, long);
    assert_eq!(table.total_count(), stats.words);
    table.check_invariants().unwrap();
});
