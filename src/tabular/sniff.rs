//! Dialect and header guessing from a sample of leading lines.

use super::Dialect;

/// Candidate delimiters, most preferred first
const DELIMITERS: &[u8] = b",\t;|:";

const QUOTES: &[u8] = b"\"'";

/// Guess the dialect of `sample`.
///
/// The delimiter is the first candidate that occurs the same non-zero number
/// of times (outside quotes) on every sampled line; failing that, the one
/// most frequent on the first line; failing that, a comma.
pub(super) fn dialect(sample: &[u8]) -> Dialect {
    let text = String::from_utf8_lossy(sample);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let quote = guess_quote(&lines);
    let delimiter = guess_delimiter(&lines, quote);
    Dialect::default().delimiter(delimiter).quote(quote)
}

fn count_unquoted(line: &str, delimiter: u8, quote: u8) -> usize {
    let mut quoted = false;
    let mut count = 0;
    for &b in line.as_bytes() {
        if b == quote {
            quoted = !quoted;
        } else if b == delimiter && !quoted {
            count += 1;
        }
    }
    count
}

fn guess_delimiter(lines: &[&str], quote: u8) -> u8 {
    let Some(first) = lines.first() else {
        return b',';
    };

    for &delimiter in DELIMITERS {
        let expected = count_unquoted(first, delimiter, quote);
        if expected > 0
            && lines
                .iter()
                .all(|line| count_unquoted(line, delimiter, quote) == expected)
        {
            return delimiter;
        }
    }

    let mut best = (b',', 0);
    for &delimiter in DELIMITERS {
        let count = count_unquoted(first, delimiter, quote);
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

// A quote character counts when it opens a field.
fn guess_quote(lines: &[&str]) -> u8 {
    let mut best = (b'"', 0);
    for &quote in QUOTES {
        let opens: usize = lines
            .iter()
            .map(|line| {
                let bytes = line.as_bytes();
                (0..bytes.len())
                    .filter(|&i| bytes[i] == quote && (i == 0 || DELIMITERS.contains(&bytes[i - 1])))
                    .count()
            })
            .sum();
        if opens > best.1 {
            best = (quote, opens);
        }
    }
    best.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Int,
    Float,
    Text(usize),
}

fn kind(cell: &str) -> Kind {
    let trimmed = cell.trim();
    if trimmed.parse::<i64>().is_ok() {
        Kind::Int
    } else if trimmed.parse::<f64>().is_ok() {
        Kind::Float
    } else {
        Kind::Text(cell.chars().count())
    }
}

#[derive(Clone, Copy)]
enum Vote {
    Unset,
    Consistent(Kind),
    Mixed,
}

/// Guess whether the first sampled row is a header.
///
/// Every column whose data rows agree on a kind votes: a numeric column
/// votes for a header when the first row is not numeric in the same way, a
/// text column when the first row's length differs from the common length.
/// Rows whose width differs from the first row are ignored.
pub(super) fn has_header(sample: &[u8], dialect: &Dialect) -> bool {
    let mut reader = dialect.reader_builder().from_reader(sample);
    let rows: Vec<csv::StringRecord> = reader.records().filter_map(Result::ok).collect();
    let Some((header, data)) = rows.split_first() else {
        return false;
    };
    if data.is_empty() {
        return false;
    }

    let mut votes = vec![Vote::Unset; header.len()];
    for row in data.iter().filter(|row| row.len() == header.len()) {
        for (vote, cell) in votes.iter_mut().zip(row.iter()) {
            let k = kind(cell);
            *vote = match *vote {
                Vote::Unset => Vote::Consistent(k),
                Vote::Consistent(prev) if prev == k => Vote::Consistent(k),
                _ => Vote::Mixed,
            };
        }
    }

    let mut score = 0i32;
    for (vote, cell) in votes.iter().zip(header.iter()) {
        let Vote::Consistent(expected) = *vote else {
            continue;
        };
        let differs = match expected {
            Kind::Text(len) => cell.chars().count() != len,
            numeric => kind(cell) != numeric,
        };
        score += if differs { 1 } else { -1 };
    }
    score > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_consistent_delimiters() {
        assert_eq!(dialect(b"a;b;c\n1;2;3\n").delimiter, b';');
        assert_eq!(dialect(b"a\tb\n1\t2\n").delimiter, b'\t');
        assert_eq!(dialect(b"a,b;c\n1,2;3\n").delimiter, b',');
        assert_eq!(dialect(b"x\n").delimiter, b',');
    }

    #[test]
    fn ignores_delimiters_inside_quotes() {
        let d = dialect(b"\"a;b\",c\n\"d;e\",f\n");
        assert_eq!(d.delimiter, b',');
        assert_eq!(d.quote, b'"');
        assert_eq!(dialect(b"'a,b';c\n'd';e\n").quote, b'\'');
    }

    #[test]
    fn header_detection() {
        let comma = Dialect::default();
        assert!(has_header(b"id,value\n1,2.5\n", &comma));
        assert!(has_header(b"name,age\nbob,41\nann,37\n", &comma));
        assert!(!has_header(b"1,2\n3,4\n", &comma));
        assert!(!has_header(b"a,b\nc,d\n", &comma));
        assert!(!has_header(b"only,one\n", &comma));
    }
}
