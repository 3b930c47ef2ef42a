#![no_main]

use libfuzzer_sys::fuzz_target;
use rustc_hash::FxHashMap;
use wordtable::ds::HashStrategy;
use wordtable::error::TableError;
use wordtable::table::WordTable;

const BUCKETS: [usize; 4] = [2, 3, 7, 31];

// Fuzz arbitrary operation sequences on WordTable
//
// Tests random sequences of increment, decrement, get_count, iteration and
// clear against a HashMap model, checking invariants after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let buckets = BUCKETS[(data[0] % 4) as usize];
    let strategy = HashStrategy::ALL[(data[1] as usize) % HashStrategy::ALL.len()];
    let mut table = WordTable::with_hasher(buckets, strategy).unwrap();
    let mut model: FxHashMap<Vec<u8>, u64> = FxHashMap::default();

    let mut idx = 2;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        // small key space so operations collide
        let key = vec![b'a' + data[idx + 1] % 32];

        match op {
            0 | 1 => {
                // increment
                let count = table.increment(&key).unwrap();
                let expected = model.entry(key).or_insert(0);
                *expected += 1;
                assert_eq!(count, *expected);
            },
            2 => {
                // decrement
                let result = table.decrement(&key);
                match model.get_mut(&key) {
                    Some(count) => {
                        *count -= 1;
                        assert_eq!(result, Ok(*count));
                        if *count == 0 {
                            model.remove(&key);
                        }
                    },
                    None => assert_eq!(result, Err(TableError::AbsentKey)),
                }
            },
            3 => {
                // get_count (read-only)
                assert_eq!(table.get_count(&key), model.get(&key).copied().unwrap_or(0));
            },
            4 => {
                // iter (read-only)
                let mut seen = 0;
                for (k, count) in &table {
                    assert_eq!(model.get(k).copied(), Some(count));
                    seen += 1;
                }
                assert_eq!(seen, model.len());
            },
            5 => {
                // clear, rarely
                if data[idx + 1] == 0xFF {
                    let capacity = table.capacity();
                    table.clear();
                    model.clear();
                    assert!(table.is_empty());
                    assert_eq!(table.capacity(), capacity);
                }
            },
            _ => unreachable!(),
        }

        // Basic invariants
        assert_eq!(table.distinct_count(), model.len());
        assert_eq!(table.total_count(), model.values().sum::<u64>());
        table.check_invariants().unwrap();

        idx += 2;
    }
});
