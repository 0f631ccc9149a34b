//! Orderings for line labels and stop names.
//!
//! Line labels mix digits and letters ("1", "7A", "10", "N3"), and passengers
//! expect "7A" before "10". [`numeric_aware`] compares embedded digit runs by
//! their numeric value; everything else compares case-insensitively.

use std::cmp::Ordering;

/// Compare two labels, treating runs of ASCII digits as numbers.
///
/// Falls back to plain byte order when the labels only differ in case or
/// leading zeros, so the result is a total order.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use bus_server::domain::collate::numeric_aware;
///
/// assert_eq!(numeric_aware("7A", "10"), Ordering::Less);
/// assert_eq!(numeric_aware("9", "10"), Ordering::Less);
/// assert_eq!(numeric_aware("7", "7A"), Ordering::Less);
/// ```
pub fn numeric_aware(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match compare_chunks(x, y) {
                Ordering::Equal => {}
                other => return other,
            },
        }
    }
}

/// Case-insensitive comparison with no digit handling.
pub fn text(a: &str, b: &str) -> Ordering {
    fold(a).cmp(fold(b)).then_with(|| a.cmp(b))
}

/// Numeric value of the first digit run in `label`, or 0 if there is none.
///
/// ```
/// use bus_server::domain::collate::leading_number;
///
/// assert_eq!(leading_number("7A"), 7);
/// assert_eq!(leading_number("N12"), 12);
/// assert_eq!(leading_number("Navetta"), 0);
/// ```
pub fn leading_number(label: &str) -> u64 {
    let Some(start) = label.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let digits = &label[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().unwrap_or(u64::MAX)
}

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

#[derive(Debug, Clone, Copy)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn compare_chunks(a: Chunk<'_>, b: Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Digits(x), Chunk::Digits(y)) => {
            let x = x.trim_start_matches('0');
            let y = y.trim_start_matches('0');
            x.len().cmp(&y.len()).then_with(|| x.cmp(y))
        }
        (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        (Chunk::Text(x), Chunk::Text(y)) => fold(x).cmp(fold(y)),
    }
}

/// Splits a string into alternating digit and non-digit runs.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}
