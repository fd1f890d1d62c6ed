//! Delimited-text source and sink.
//!
//! The read side turns rows of a CSV-like file into a single-pass stream of
//! typed rows, sniffing the dialect and header row when they are not given.
//! The write side drains a stream of records into delimited text.
//!
//! ```rust
//! use lazystream::tabular::{Column, CsvReadOptions, Dialect, Field};
//! use lazystream::Stream;
//!
//! let mut out = Vec::new();
//! Stream::range(0..3)
//!     .map(|x| (x, x as f64 / 2.0))
//!     .write_csv(&mut out, &[Some("x"), Some("half")], &Dialect::default())
//!     .unwrap();
//!
//! let rows = Stream::read_csv(
//!     std::io::Cursor::new(out),
//!     vec![Column::int(), Column::float()],
//!     CsvReadOptions::default(),
//! )
//! .unwrap()
//! .to::<lazystream::Result<Vec<_>>>()
//! .unwrap();
//! assert_eq!(rows[1], vec![Field::Int(1), Field::Float(0.5)]);
//! ```

mod sniff;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::marker::PhantomData;
use std::path::Path;
use std::rc::Rc;

use crate::core::{Error, Result, Sink, Truthy};
use crate::stream::Stream;
use crate::telemetry::{debug, trace};

/// A typed cell value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Field {
    /// The text of a `Text` cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value of an `Int` cell
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Field::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value of a `Float` cell, widening `Int` cells
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Field::Float(f) => Some(*f),
            Field::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text(s) => f.write_str(s),
            Field::Int(i) => write!(f, "{}", i),
            Field::Float(x) => write!(f, "{}", x),
            Field::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Truthy for Field {
    fn is_truthy(&self) -> bool {
        match self {
            Field::Text(s) => s.is_truthy(),
            Field::Int(i) => i.is_truthy(),
            Field::Float(x) => x.is_truthy(),
            Field::Bool(b) => *b,
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

impl From<i64> for Field {
    fn from(i: i64) -> Self {
        Field::Int(i)
    }
}

impl From<f64> for Field {
    fn from(x: f64) -> Self {
        Field::Float(x)
    }
}

impl From<bool> for Field {
    fn from(b: bool) -> Self {
        Field::Bool(b)
    }
}

/// One projected row
pub type Row = Vec<Field>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type Coercer = Rc<dyn Fn(&str) -> std::result::Result<Field, BoxError>>;

/// How one column of a row is read.
///
/// Columns past the end of the column list are kept as text.
#[derive(Clone, Default)]
pub enum Column {
    /// Keep the raw text
    #[default]
    Text,
    /// Drop the column
    Skip,
    /// Convert the text with a function
    Coerce(Coercer),
}

impl Column {
    /// Convert with `f`; its errors surface as [`Error::Coerce`]
    pub fn with<F, E>(f: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Field, E> + 'static,
        E: Into<BoxError>,
    {
        let coercer: Coercer = Rc::new(move |cell: &str| f(cell).map_err(Into::into));
        Column::Coerce(coercer)
    }

    /// Parse a signed integer, ignoring surrounding whitespace
    pub fn int() -> Self {
        Column::with(|cell| cell.trim().parse::<i64>().map(Field::Int))
    }

    /// Parse a float, ignoring surrounding whitespace
    pub fn float() -> Self {
        Column::with(|cell| cell.trim().parse::<f64>().map(Field::Float))
    }

    /// Parse `true`/`false`/`1`/`0`, case-insensitively
    pub fn boolean() -> Self {
        Column::with(|cell| match cell.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Field::Bool(true)),
            "false" | "0" => Ok(Field::Bool(false)),
            _ => Err("expected a boolean"),
        })
    }

    fn apply(&self, row: u64, index: usize, cell: &str) -> Result<Option<Field>> {
        match self {
            Column::Text => Ok(Some(Field::Text(cell.to_string()))),
            Column::Skip => Ok(None),
            Column::Coerce(f) => f(cell)
                .map(Some)
                .map_err(|e| Error::coerce(row, index, cell, e)),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Text => f.write_str("Text"),
            Column::Skip => f.write_str("Skip"),
            Column::Coerce(_) => f.write_str("Coerce(..)"),
        }
    }
}

/// Formatting parameters of delimited text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dialect {
    /// Field separator
    pub delimiter: u8,
    /// Quote character
    pub quote: u8,
    /// Whether a doubled quote inside a quoted field is a literal quote
    pub double_quote: bool,
    /// Escape character used instead of doubling, if any
    pub escape: Option<u8>,
    /// Record terminator; `None` accepts any line ending and writes `\n`
    pub terminator: Option<u8>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            double_quote: true,
            escape: None,
            terminator: None,
        }
    }
}

impl Dialect {
    /// Comma-separated, double-quoted
    pub fn new() -> Self {
        Self::default()
    }

    /// Tab-separated, double-quoted
    pub fn tab() -> Self {
        Self::default().delimiter(b'\t')
    }

    /// Set the field separator
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Set whether quotes are escaped by doubling
    pub fn double_quote(mut self, yes: bool) -> Self {
        self.double_quote = yes;
        self
    }

    /// Set the escape character
    pub fn escape(mut self, escape: Option<u8>) -> Self {
        self.escape = escape;
        self
    }

    /// Set the record terminator
    pub fn terminator(mut self, terminator: Option<u8>) -> Self {
        self.terminator = terminator;
        self
    }

    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .escape(self.escape)
            .flexible(true)
            .has_headers(false);
        if let Some(term) = self.terminator {
            builder.terminator(csv::Terminator::Any(term));
        }
        builder
    }

    fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .flexible(true)
            .has_headers(false);
        if let Some(escape) = self.escape {
            builder.escape(escape);
        }
        if let Some(term) = self.terminator {
            builder.terminator(csv::Terminator::Any(term));
        }
        builder
    }
}

/// Options for reading delimited text
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Whether the first row is a header; sniffed when `None`
    pub has_header: Option<bool>,
    /// The dialect; sniffed when `None`
    pub dialect: Option<Dialect>,
    /// How many leading lines to sample when sniffing
    pub sniff_lines: usize,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            has_header: None,
            dialect: None,
            sniff_lines: 2,
        }
    }
}

impl CsvReadOptions {
    /// Declare whether the first row is a header
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }

    /// Fix the dialect instead of sniffing it
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Set how many lines are sampled when sniffing
    pub fn sniff_lines(mut self, lines: usize) -> Self {
        self.sniff_lines = lines;
        self
    }
}

/// A cursor over the projected rows of a delimited-text input.
///
/// The input is dropped as soon as it is exhausted or fails; after an
/// error has been yielded the cursor is exhausted.
pub struct CsvRows<R> {
    records: Option<csv::StringRecordsIntoIter<R>>,
    columns: Rc<[Column]>,
    row: u64,
}

impl<R: Read> CsvRows<R> {
    fn project(&self, record: &csv::StringRecord) -> Result<Row> {
        let mut out = Vec::with_capacity(record.len());
        for (index, cell) in record.iter().enumerate() {
            let field = match self.columns.get(index) {
                Some(column) => column.apply(self.row, index, cell)?,
                None => Some(Field::Text(cell.to_string())),
            };
            out.extend(field);
        }
        Ok(out)
    }
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let records = self.records.as_mut()?;
        let outcome = match records.next() {
            None => {
                trace!(rows = self.row, "csv input exhausted");
                self.records = None;
                return None;
            }
            Some(Err(e)) => Err(Error::from(e)),
            Some(Ok(record)) => {
                self.row += 1;
                self.project(&record)
            }
        };
        if outcome.is_err() {
            self.records = None;
        }
        Some(outcome)
    }
}

impl Stream<Result<Row>> {
    /// Open a delimited-text file as a single-pass stream of rows.
    ///
    /// Open failures and sniffing I/O failures are returned here; read and
    /// coercion failures are yielded in place of the row they occur on.
    pub fn from_csv<P: AsRef<Path>>(
        path: P,
        columns: Vec<Column>,
        options: CsvReadOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), "opened csv input");
        Self::read_csv(file, columns, options)
    }

    /// Read delimited text from any reader as a single-pass stream of rows
    pub fn read_csv<R: Read + 'static>(
        input: R,
        columns: Vec<Column>,
        options: CsvReadOptions,
    ) -> Result<Self> {
        let mut input = BufReader::new(input);
        let mut sample = Vec::new();
        if options.has_header.is_none() || options.dialect.is_none() {
            for _ in 0..options.sniff_lines {
                if input.read_until(b'\n', &mut sample)? == 0 {
                    break;
                }
            }
        }

        let dialect = options
            .dialect
            .unwrap_or_else(|| sniff::dialect(&sample));
        let has_header = options
            .has_header
            .unwrap_or_else(|| sniff::has_header(&sample, &dialect));
        debug!(
            delimiter = %char::from(dialect.delimiter),
            quote = %char::from(dialect.quote),
            has_header,
            "csv dialect"
        );

        let mut builder = dialect.reader_builder();
        builder.has_headers(has_header);
        let reader = builder.from_reader(std::io::Cursor::new(sample).chain(input));

        Ok(Stream::single_pass(CsvRows {
            records: Some(reader.into_records()),
            columns: columns.into(),
            row: 0,
        }))
    }
}

/// An item that can be written as one delimited-text row
pub trait Record {
    fn fields(&self) -> Vec<String>;
}

impl<T: fmt::Display> Record for Vec<T> {
    fn fields(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl<T: fmt::Display, const N: usize> Record for [T; N] {
    fn fields(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

macro_rules! impl_record_tuple {
    ($($name:ident),+) => {
        impl<$($name: fmt::Display),+> Record for ($($name,)+) {
            #[allow(non_snake_case)]
            fn fields(&self) -> Vec<String> {
                let ($($name,)+) = self;
                vec![$($name.to_string()),+]
            }
        }
    };
}

impl_record_tuple!(A);
impl_record_tuple!(A, B);
impl_record_tuple!(A, B, C);
impl_record_tuple!(A, B, C, D);
impl_record_tuple!(A, B, C, D, E);
impl_record_tuple!(A, B, C, D, E, F);

/// A sink that writes records as delimited text.
///
/// With a header containing at least one name, the header is written first
/// and only the named columns of each record are kept; `None` entries and
/// columns past the end of the header are dropped. Otherwise records are
/// written whole.
pub struct CsvSink<W: Write, R> {
    writer: csv::Writer<W>,
    selector: Option<Vec<bool>>,
    _phantom: PhantomData<fn(R)>,
}

impl<W: Write, R: Record> CsvSink<W, R> {
    /// Create a new sink, writing the header immediately
    pub fn new(inner: W, header: &[Option<&str>], dialect: &Dialect) -> Result<Self> {
        let mut writer = dialect.writer_builder().from_writer(inner);
        let selector = if header.iter().any(Option::is_some) {
            writer.write_record(header.iter().flatten())?;
            Some(header.iter().map(Option::is_some).collect())
        } else {
            None
        };
        Ok(Self {
            writer,
            selector,
            _phantom: PhantomData,
        })
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::from(e.into_error()))
    }
}

impl<R: Record> CsvSink<File, R> {
    /// Create (or truncate) a file and write to it
    pub fn create<P: AsRef<Path>>(
        path: P,
        header: &[Option<&str>],
        dialect: &Dialect,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "created csv output");
        Self::new(file, header, dialect)
    }
}

impl<W: Write, R: Record> Sink for CsvSink<W, R> {
    type Item = R;

    fn write(&mut self, item: R) -> Result<()> {
        let fields = item.fields();
        match &self.selector {
            Some(selector) => self.writer.write_record(
                fields
                    .iter()
                    .zip(selector)
                    .filter_map(|(field, keep)| keep.then_some(field)),
            )?,
            None => self.writer.write_record(&fields)?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl<T: Record + 'static> Stream<T> {
    /// Write every record to a new file at `path`.
    ///
    /// Returns the number of records written, not counting the header.
    pub fn to_csv<P: AsRef<Path>>(
        &self,
        path: P,
        header: &[Option<&str>],
        dialect: &Dialect,
    ) -> Result<usize> {
        let mut sink = CsvSink::create(path, header, dialect)?;
        let rows = self.drain_into(&mut sink)?;
        debug!(rows, "wrote csv rows");
        Ok(rows)
    }

    /// Write every record to `output`
    pub fn write_csv<W: Write>(
        &self,
        output: W,
        header: &[Option<&str>],
        dialect: &Dialect,
    ) -> Result<usize> {
        let mut sink = CsvSink::new(output, header, dialect)?;
        let rows = self.drain_into(&mut sink)?;
        debug!(rows, "wrote csv rows");
        Ok(rows)
    }
}
