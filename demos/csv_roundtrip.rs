//! Writing a stream to delimited text and reading it back
//!
//! Run with: cargo run --example csv_roundtrip

use lazystream::prelude::*;

fn main() -> Result<()> {
    let dir = std::env::temp_dir().join("lazystream-demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("measurements.csv");

    let written = Stream::range(0..10)
        .map(|i| (i, (i as f64).sqrt(), if i % 2 == 0 { "even" } else { "odd" }))
        .to_csv(&path, &[Some("n"), Some("root"), Some("parity")], &Dialect::default())?;
    println!("Wrote {} rows to {}", written, path.display());

    // The header row and the comma dialect are sniffed from the first lines
    let rows = Stream::from_csv(
        &path,
        vec![Column::int(), Column::float(), Column::Text],
        CsvReadOptions::default(),
    )?;

    let odd_roots: f64 = rows
        .to::<Result<Vec<Row>>>()?
        .into_iter()
        .filter(|row| row.get(2).and_then(Field::as_str) == Some("odd"))
        .filter_map(|row| row.get(1).and_then(Field::as_float))
        .sum();
    println!("Sum of odd roots: {:.3}", odd_roots);

    // Semicolons, no header, and a dropped column
    let mut out = Vec::new();
    Stream::of(vec![("x", 1, true), ("y", 2, false)])
        .write_csv(&mut out, &[], &Dialect::new().delimiter(b';'))?;
    let parsed = Stream::read_csv(
        std::io::Cursor::new(out),
        vec![Column::Text, Column::Skip, Column::boolean()],
        CsvReadOptions::default().has_header(false),
    )?;
    for row in &parsed {
        println!("{:?}", row?);
    }

    Ok(())
}
