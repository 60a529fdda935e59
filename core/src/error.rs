//! Errors.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use crate::{
    dataset::ParseDatasetError, massif::ParseMassifError, matrix::io::ParseMatrixError,
    species::ParseSpeciesError,
};

/// The category of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    /// The input data was malformed.
    Input,
    /// An I/O operation failed.
    Io,
    /// An internal invariant was violated.
    ///
    /// This indicates a bug rather than a problem with the input data.
    Internal,
}

/// An error with the file path it concerns, if any.
#[derive(Debug)]
pub enum Error {
    /// Failed to read or write a file.
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// Failed to parse a presence matrix.
    ParseMatrix {
        /// The path of the matrix file.
        path: PathBuf,
        /// The underlying error.
        source: ParseMatrixError,
    },
    /// Failed to parse a header dataset.
    ParseDataset {
        /// The path of the header file.
        path: PathBuf,
        /// The underlying error.
        source: ParseDatasetError,
    },
    /// Failed to parse a species names file.
    ParseSpecies {
        /// The path of the names file.
        path: PathBuf,
        /// The underlying error.
        source: ParseSpeciesError,
    },
    /// Failed to parse a massif memory profile.
    ParseMassif {
        /// The path of the profile.
        path: PathBuf,
        /// The underlying error.
        source: ParseMassifError,
    },
    /// An internal invariant was violated.
    Invariant(InvariantViolation),
}

impl Error {
    /// Returns the category of the error.
    pub fn category(&self) -> Category {
        match self {
            Error::Io { .. } => Category::Io,
            Error::ParseMatrix { .. }
            | Error::ParseDataset { .. }
            | Error::ParseSpecies { .. }
            | Error::ParseMassif { .. } => Category::Input,
            Error::Invariant(_) => Category::Internal,
        }
    }

    pub(crate) fn io<P>(path: P) -> impl FnOnce(io::Error) -> Self
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();
        move |source| Error::Io { path, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "'{}': {source}", path.display()),
            Error::ParseMatrix { path, source } => {
                write!(f, "invalid presence matrix '{}': {source}", path.display())
            }
            Error::ParseDataset { path, source } => {
                write!(f, "invalid header dataset '{}': {source}", path.display())
            }
            Error::ParseSpecies { path, source } => {
                write!(f, "invalid species names '{}': {source}", path.display())
            }
            Error::ParseMassif { path, source } => {
                write!(f, "invalid massif profile '{}': {source}", path.display())
            }
            Error::Invariant(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::ParseMatrix { source, .. } => Some(source),
            Error::ParseDataset { source, .. } => Some(source),
            Error::ParseSpecies { source, .. } => Some(source),
            Error::ParseMassif { source, .. } => Some(source),
            Error::Invariant(e) => Some(e),
        }
    }
}

impl From<InvariantViolation> for Error {
    fn from(e: InvariantViolation) -> Self {
        Self::Invariant(e)
    }
}

/// An error indicating that a site subset holds more species than exist in the matrix.
///
/// This cannot occur for a well-formed presence matrix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvariantViolation {
    /// The 1-based site index.
    pub site: usize,
    /// The number of species in the subset.
    pub subset_len: usize,
    /// The number of species in the matrix.
    pub species_count: usize,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let InvariantViolation {
            site,
            subset_len,
            species_count,
        } = self;

        write!(
            f,
            "internal error: subset for site {site} holds {subset_len} species, \
            but the matrix only has {species_count} species"
        )
    }
}

impl std::error::Error for InvariantViolation {}
