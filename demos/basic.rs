//! Basic usage examples for lazystream
//!
//! Run with: cargo run --example basic

use lazystream::prelude::*;

/// Custom sink that prints batches
struct DebugPrintSink;

impl Sink for DebugPrintSink {
    type Item = Vec<i64>;

    fn write(&mut self, item: Self::Item) -> Result<()> {
        println!("Batch: {:?}", item);
        Ok(())
    }
}

/// Example 1: Transform and filter
fn transform_filter_example() {
    println!("=== Transform and Filter ===");

    let squares = Stream::range(1..21).filter(|x| x % 3 == 0).map(|x| x * x);
    println!("Squares: {}", squares.join(", "));
    println!("Sum: {}", squares.sum::<i64>());

    println!();
}

/// Example 2: Re-entrant and single-pass streams
fn reentrancy_example() {
    println!("=== Re-entrant vs Single-pass ===");

    let fixed = Stream::of(vec!["a", "b", "c"]);
    println!("First pass:  {:?}", fixed.to::<Vec<_>>());
    println!("Second pass: {:?}", fixed.to::<Vec<_>>());

    let once = fixed.nonreentrant();
    println!("Single-pass first:  {:?}", once.to::<Vec<_>>());
    println!("Single-pass second: {:?}", once.to::<Vec<_>>());

    println!();
}

/// Example 3: Endless producers
fn producer_example() {
    println!("=== Endless Producers ===");

    let fib = Stream::iterate((0u64, 1u64), |(a, b)| (*b, a + b)).map(|(a, _)| a);
    println!("Fibonacci: {:?}", fib.take(12));
    println!("First above 1000: {:?}", fib.filter(|x| *x > 1000).take_one());

    println!();
}

/// Example 4: Whole-sequence stages
fn whole_sequence_example() -> Result<()> {
    println!("=== Sorting, Grouping, Deduplication ===");

    let words = Stream::of(vec!["pear", "fig", "apple", "kiwi", "plum", "fig"]);
    println!("Unique:  {:?}", words.clone().unique().to::<Vec<_>>());
    println!(
        "By size: {:?}",
        words.clone().sort_by_key(|w| w.len(), false).to::<Vec<_>>()
    );

    for (len, group) in words.group_by(|w| w.len()) {
        println!("  {} letters: {}", len, group.join(" "));
    }

    Stream::range(1..11).group(4, Some(0))?.drain_into(&mut DebugPrintSink)?;

    println!();
    Ok(())
}

/// Example 5: Zipping rows into columns
fn zip_example() {
    println!("=== Zip ===");

    let table = Stream::of(vec![vec![1, 2, 3], vec![10, 20], vec![100, 200, 300]]);
    println!("Shortest: {:?}", table.clone().zip(None).to::<Vec<_>>());
    println!("Longest:  {:?}", table.zip(Some(0)).to::<Vec<_>>());

    println!();
}

fn main() -> Result<()> {
    transform_filter_example();
    reentrancy_example();
    producer_example();
    whole_sequence_example()?;
    zip_example();
    Ok(())
}
