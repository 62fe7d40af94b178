//! Plain-text leaf record format.
//!
//! One record per leaf, embedded in a larger model file:
//!
//! ```text
//! <num_samples> <dim> <v_0> <v_1> ... <v_{dim-1}>\n
//! ```
//!
//! Fields are separated by single spaces when written. Floats use Rust's
//! shortest round-trip formatting, so reading a record back reproduces the
//! prediction bit for bit (`NaN` and `inf` included). The reader accepts
//! any whitespace between tokens, so records may span lines.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use ndarray::Array1;
use tracing::warn;

use crate::error::LeafStatsError;
use crate::leaf::LeafStats;

/// Upper bound on the initial prediction allocation while parsing, so a
/// corrupt dimension field cannot request a huge buffer up front.
const MAX_PREALLOC_DIM: usize = 4096;

// =============================================================================
// Tokenizer
// =============================================================================

/// Whitespace-separated token reader over a buffered stream.
///
/// Reads one line at a time and hands out tokens from it.
struct TokenReader<R> {
    reader: R,
    line: String,
    pos: usize,
}

impl<R: BufRead> TokenReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pos: 0,
        }
    }

    fn next_token(&mut self) -> Result<Option<&str>, LeafStatsError> {
        loop {
            let rest = &self.line[self.pos..];
            let trimmed = rest.trim_start();
            if !trimmed.is_empty() {
                let start = self.pos + (rest.len() - trimmed.len());
                let end = trimmed
                    .find(char::is_whitespace)
                    .map_or(self.line.len(), |i| start + i);
                self.pos = end;
                return Ok(Some(&self.line[start..end]));
            }
            self.line.clear();
            self.pos = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
        }
    }

    fn expect_token(&mut self, context: &'static str) -> Result<&str, LeafStatsError> {
        self.next_token()?
            .ok_or(LeafStatsError::UnexpectedEnd { context })
    }

    fn parse<T>(&mut self, context: &'static str) -> Result<T, LeafStatsError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let token = self.expect_token(context)?;
        token.parse().map_err(|e| LeafStatsError::Parse {
            context,
            message: format!("{token:?}: {e}"),
        })
    }

    /// Whether only whitespace remains on the current line.
    fn at_line_end(&self) -> bool {
        self.line[self.pos..].trim().is_empty()
    }

    /// Whether the underlying stream has more tokens.
    fn has_more(&mut self) -> Result<bool, LeafStatsError> {
        loop {
            if !self.at_line_end() {
                return Ok(true);
            }
            self.line.clear();
            self.pos = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(false);
            }
        }
    }

    /// Reject anything left on the current line after the last record.
    fn finish_line(&self) -> Result<(), LeafStatsError> {
        if self.at_line_end() {
            Ok(())
        } else {
            Err(LeafStatsError::Parse {
                context: "leaf record",
                message: "trailing data on record line".to_string(),
            })
        }
    }

    fn read_leaf(&mut self) -> Result<LeafStats, LeafStatsError> {
        let num_samples: u64 = self.parse("num_samples")?;
        let dim: usize = self.parse("dim")?;
        if dim == 0 {
            return Err(LeafStatsError::Parse {
                context: "dim",
                message: "leaf record must have at least one target dimension".to_string(),
            });
        }

        let mut values = Vec::with_capacity(dim.min(MAX_PREALLOC_DIM));
        for _ in 0..dim {
            values.push(self.parse::<f64>("prediction")?);
        }
        if values.iter().any(|v| v.is_nan()) {
            warn!(num_samples, dim, "leaf record contains NaN prediction values");
        }

        LeafStats::from_parts(Array1::from(values), num_samples)
    }
}

// =============================================================================
// LeafStats text I/O
// =============================================================================

/// Formats the record without the trailing line break.
impl fmt::Display for LeafStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.num_samples(), self.dim())?;
        for v in self.prediction().iter() {
            write!(f, " {v}")?;
        }
        Ok(())
    }
}

/// Parses exactly one record; trailing tokens are an error.
impl FromStr for LeafStats {
    type Err = LeafStatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = TokenReader::new(s.as_bytes());
        let leaf = tokens.read_leaf()?;
        if tokens.has_more()? {
            return Err(LeafStatsError::Parse {
                context: "leaf record",
                message: "trailing data after record".to_string(),
            });
        }
        Ok(leaf)
    }
}

impl LeafStats {
    /// Write this leaf as one line-terminated text record.
    pub fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), LeafStatsError> {
        writeln!(writer, "{self}")?;
        Ok(())
    }

    /// Read one text record from `reader`.
    ///
    /// The record must end its line: any further tokens on the record's last
    /// line are rejected, so nothing after the record is consumed.
    ///
    /// # Errors
    ///
    /// - [`LeafStatsError::UnexpectedEnd`] if the stream ends mid-record
    /// - [`LeafStatsError::Parse`] for non-numeric tokens, a negative count,
    ///   a zero dimension or trailing tokens
    /// - [`LeafStatsError::Io`] if reading fails
    pub fn read_text<R: BufRead>(reader: &mut R) -> Result<Self, LeafStatsError> {
        let mut tokens = TokenReader::new(reader);
        let leaf = tokens.read_leaf()?;
        tokens.finish_line()?;
        Ok(leaf)
    }
}

/// Write `leaves` as consecutive text records.
pub fn write_text_records<'a, W, I>(writer: &mut W, leaves: I) -> Result<(), LeafStatsError>
where
    W: Write,
    I: IntoIterator<Item = &'a LeafStats>,
{
    for leaf in leaves {
        leaf.write_text(writer)?;
    }
    Ok(())
}

/// Read `count` consecutive text records.
///
/// Records are whitespace-delimited; line breaks between or within records
/// are not significant. The last record must end its line, as in
/// [`LeafStats::read_text`], so the data following the records is left in
/// `reader`.
///
/// # Errors
///
/// Same as [`LeafStats::read_text`].
pub fn read_text_records<R: BufRead>(
    reader: &mut R,
    count: usize,
) -> Result<Vec<LeafStats>, LeafStatsError> {
    let mut tokens = TokenReader::new(reader);
    let mut leaves = Vec::with_capacity(count.min(MAX_PREALLOC_DIM));
    for _ in 0..count {
        leaves.push(tokens.read_leaf()?);
    }
    tokens.finish_line()?;
    Ok(leaves)
}
