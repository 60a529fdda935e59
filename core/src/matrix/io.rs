//! Utilities for reading and writing presence matrices.
//!
//! A presence matrix file starts with a header line giving the number of species and the number
//! of sites as two whitespace-separated positive integers. Each of the following lines holds the
//! row of a single species: one `0` (absent) or `1` (present) token per site. Tokens are either
//! separated by whitespace, or written without separators in compact form:
//!
//! ```text
//! 3 2
//! 1 0
//! 0 1
//! 11
//! ```
//!
//! In the [`Layout::Named`] layout, each row is followed by the name of the species.

use std::fmt;

pub mod read;

pub mod text;
pub use text::Header;

pub mod write;

/// The layout of species rows in a presence matrix file.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Layout {
    /// Rows contain only presence tokens.
    #[default]
    Plain,
    /// Rows contain presence tokens followed by a species name.
    Named,
}

/// An error associated with parsing a presence matrix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseMatrixError {
    line: usize,
    kind: ParseMatrixErrorKind,
}

impl ParseMatrixError {
    /// Returns the kind of error.
    pub fn kind(&self) -> &ParseMatrixErrorKind {
        &self.kind
    }

    /// Returns the 1-based line number at which the error occurred.
    pub fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn new(line: usize, kind: ParseMatrixErrorKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for ParseMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseMatrixError {}

/// The kind of a [`ParseMatrixError`].
///
/// Species and site indices are 1-based.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseMatrixErrorKind {
    /// The header line is not two positive integers.
    MalformedHeader {
        /// The offending header line.
        content: String,
    },
    /// A species row has the wrong number of tokens.
    RowLengthMismatch {
        /// The species index.
        species: usize,
        /// The number of sites declared in the header.
        expected: usize,
        /// The number of tokens found in the row.
        found: usize,
    },
    /// A token is neither `0` nor `1`.
    InvalidToken {
        /// The species index.
        species: usize,
        /// The site index.
        site: usize,
        /// The offending token.
        token: String,
    },
    /// The input ended before the row of a species.
    MissingRow {
        /// The species index.
        species: usize,
    },
    /// A row in the named layout has no species name.
    MissingName {
        /// The species index.
        species: usize,
    },
    /// Non-blank content follows the last species row.
    TrailingData,
    /// The number of provided species names differs from the number of species in the header.
    NameCountMismatch {
        /// The number of species declared in the header.
        expected: usize,
        /// The number of names provided.
        found: usize,
    },
}

impl fmt::Display for ParseMatrixErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMatrixErrorKind::MalformedHeader { content } => write!(
                f,
                "malformed header '{content}', expected species count and site count \
                as two positive integers"
            ),
            ParseMatrixErrorKind::RowLengthMismatch {
                species,
                expected,
                found,
            } => write!(
                f,
                "row length mismatch for species {species}: expected {expected} sites, \
                found {found}"
            ),
            ParseMatrixErrorKind::InvalidToken {
                species,
                site,
                token,
            } => write!(
                f,
                "invalid token '{token}' for species {species} at site {site}, \
                expected '0' or '1'"
            ),
            ParseMatrixErrorKind::MissingRow { species } => {
                write!(f, "missing row for species {species}")
            }
            ParseMatrixErrorKind::MissingName { species } => {
                write!(f, "missing name for species {species}")
            }
            ParseMatrixErrorKind::TrailingData => {
                f.write_str("unexpected data after the last species row")
            }
            ParseMatrixErrorKind::NameCountMismatch { expected, found } => write!(
                f,
                "found {found} species names, but header declares {expected} species"
            ),
        }
    }
}
