//! DHAT heap profiler for wordtable.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use wordtable::builder::TableBuilder;
use wordtable::compare::{cosine_similarity, difference_count};
use wordtable::ds::HashStrategy;
use wordtable::error::TableError;
use wordtable::table::WordTable;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

/// Skewed vocabulary: 90% of words come from the first 10% of `vocabulary`.
fn word_stream(
    table: &mut WordTable,
    words: usize,
    vocabulary: u64,
    seed: u64,
) -> Result<(), TableError> {
    let mut rng = XorShift64::new(seed);
    let hot_size = (vocabulary / 10).max(1);
    let cold_size = vocabulary.saturating_sub(hot_size).max(1);

    for _ in 0..words {
        let id = if rng.next_f64() < 0.9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + rng.next_u64() % cold_size
        };
        table.increment(format!("w{:x}", id))?;
    }
    Ok(())
}

/// Remove a share of the vocabulary so slots cycle through the free list.
fn churn(table: &mut WordTable, vocabulary: u64) {
    for id in (0..vocabulary).step_by(3) {
        let key = format!("w{:x}", id);
        while table.decrement(&key).is_ok() {}
    }
}

fn profile_growth() {
    println!("=== Profiling growth from minimum capacity ===");
    let mut table = match WordTable::new(211) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("  {}", err);
            return;
        },
    };
    let start = table.capacity();

    if let Err(err) = word_stream(&mut table, 200_000, 50_000, 42) {
        eprintln!("  {}", err);
        return;
    }

    println!(
        "  Capacity: {} -> {}  distinct: {}",
        start,
        table.capacity(),
        table.distinct_count()
    );
}

fn profile_reserved() {
    println!("=== Profiling reserved capacity ===");
    let mut table = match TableBuilder::new(7019).reserve(50_000).build() {
        Ok(table) => table,
        Err(err) => {
            eprintln!("  {}", err);
            return;
        },
    };
    let start = table.capacity();

    let result = word_stream(&mut table, 200_000, 50_000, 42).and_then(|()| {
        churn(&mut table, 50_000);
        word_stream(&mut table, 100_000, 50_000, 7)
    });
    if let Err(err) = result {
        eprintln!("  {}", err);
        return;
    }

    println!(
        "  Capacity: {} -> {}  distinct: {}",
        start,
        table.capacity(),
        table.distinct_count()
    );
}

fn profile_compare() {
    println!("=== Profiling comparison ===");
    let build = |seed| {
        TableBuilder::new(7019)
            .hasher(HashStrategy::Murmur)
            .build()
            .and_then(|mut table| {
                word_stream(&mut table, 100_000, 20_000, seed)?;
                Ok(table)
            })
    };
    let (a, b) = match (build(1), build(2)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("  {}", err);
            return;
        },
    };

    println!(
        "  Cosine: {:.6}  a-b: {}  b-a: {}",
        cosine_similarity(&a, &b),
        difference_count(&a, &b),
        difference_count(&b, &a)
    );
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("wordtable DHAT Heap Profiling");
    println!("=============================\n");

    profile_growth();
    profile_reserved();
    profile_compare();

    println!("\n=============================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
