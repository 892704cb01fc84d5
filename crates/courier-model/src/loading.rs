// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Road network loader.
//!
//! Reads a location count, one address label per line, and a lower-triangular
//! distance matrix into a [`LocationGraph`]. Lines may carry comments
//! introduced by `#`. Labels are taken as whole lines (trimmed), so they may
//! contain spaces; matrix entries are whitespace-delimited tokens.

use crate::graph::{GraphError, LocationGraph};
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the network loading process.
#[derive(Debug)]
pub enum LoadError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before the network was complete.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The location count is zero.
    InvalidDimensions,
    /// A diagonal entry is non-zero while the loader requires zeros.
    NonZeroDiagonal { row: usize, value: f64 },
    /// The parsed matrix does not describe a valid network.
    Graph(GraphError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "f64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing network"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => write!(f, "Location count must be a positive integer"),
            Self::NonZeroDiagonal { row, value } => {
                write!(f, "Diagonal entry of row {} is {} but must be 0", row, value)
            }
            Self::Graph(e) => write!(f, "Graph error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for LoadError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<GraphError> for LoadError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

/// A configurable loader for road networks.
///
/// The format this parser expects is as follows:
///
/// ```raw
/// N                      // number of locations
/// label_1                // one label per line, N lines
/// ...
/// label_N
/// d_1_1                  // lower-triangular distances, row i holds i entries
/// d_2_1 d_2_2
/// ...
/// d_N_1 ... d_N_N
/// ```
///
/// The first label is conventionally the hub.
///
/// # Configuration
/// * `strict_diagonal`: If true, every diagonal entry must be `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkLoader {
    strict_diagonal: bool,
}

impl Default for NetworkLoader {
    fn default() -> Self {
        Self {
            strict_diagonal: true,
        }
    }
}

impl NetworkLoader {
    /// Creates a new `NetworkLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether non-zero diagonal entries are rejected.
    #[inline]
    pub fn strict_diagonal(mut self, yes: bool) -> Self {
        self.strict_diagonal = yes;
        self
    }

    /// Loads a network from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<LocationGraph, LoadError> {
        let mut sc = Scanner::new(rdr);

        let n: usize = sc.next()?;
        if n == 0 {
            return Err(LoadError::InvalidDimensions);
        }

        let mut labels = Vec::with_capacity(n);
        for _ in 0..n {
            labels.push(sc.next_line()?);
        }

        let mut matrix = vec![vec![0.0_f64; n]; n];
        for i in 0..n {
            for j in 0..=i {
                let d: f64 = sc.next()?;
                if i == j {
                    if self.strict_diagonal && d != 0.0 {
                        return Err(LoadError::NonZeroDiagonal { row: i, value: d });
                    }
                    continue;
                }
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }

        Ok(LocationGraph::from_matrix(&labels, &matrix)?)
    }

    /// Loads a network from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<LocationGraph, LoadError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a network from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<LocationGraph, LoadError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a network from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<LocationGraph, LoadError> {
        self.from_reader(s.as_bytes())
    }
}

/// Strips a trailing `#` comment.
#[inline]
fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

/// A helper to read tokens and whole lines from a generic reader.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the internal line buffer. Returns `Ok(true)` if data read, `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, LoadError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Returns the rest of the current line, or the next non-blank line,
    /// with comments stripped and surrounding whitespace trimmed.
    fn next_line(&mut self) -> Result<String, LoadError> {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(LoadError::UnexpectedEof);
            }

            let content = strip_comment(&self.buf[self.pos..]).trim();
            let owned = (!content.is_empty()).then(|| content.to_owned());
            self.pos = self.buf.len();
            if let Some(line) = owned {
                return Ok(line);
            }
        }
    }

    /// Reads the next whitespace-delimited token and parses it into `T`.
    fn next<T>(&mut self) -> Result<T, LoadError>
    where
        T: FromStr,
    {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(LoadError::UnexpectedEof);
            }

            let content = strip_comment(&self.buf[self.pos..]);
            let Some(start) = content.find(|c: char| !c.is_whitespace()) else {
                self.pos = self.buf.len();
                continue;
            };
            let rest = &content[start..];
            let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let token = &rest[..len];
            let consumed = start + len;

            let parsed = token.parse::<T>().map_err(|_| ParseTokenError {
                token: token.to_owned(),
                type_name: std::any::type_name::<T>(),
            });
            self.pos += consumed;
            return Ok(parsed?);
        }
    }
}
