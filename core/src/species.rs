//! Species names.

use std::{fmt, fs, path::Path, str::FromStr};

use indexmap::IndexSet;

use crate::Error;

/// The prefix used for synthesized species names.
pub const PREFIX: &str = "s";

/// An ordered list of species names.
///
/// The name at index `i` belongs to the species in row `i` of a presence matrix.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Species(Vec<String>);

impl Species {
    /// Returns the name of the species at the provided index if in bounds, otherwise `None`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Returns `true` if there are no species.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the species names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of species.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Creates synthesized names `s1`, `s2`, ..., `sN` for `n` species.
    pub fn numbered(n: usize) -> Self {
        (1..=n).map(|i| format!("{PREFIX}{i}")).collect()
    }

    /// Returns the names which occur more than once, each reported once in order of first
    /// repetition.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = IndexSet::with_capacity(self.len());
        let mut duplicates = IndexSet::new();

        for name in self.iter() {
            if !seen.insert(name) {
                duplicates.insert(name);
            }
        }

        duplicates.into_iter().collect()
    }

    /// Reads species names from a path, one name per line.
    ///
    /// Surrounding whitespace is trimmed from each name, and blank lines are ignored. Names must
    /// not contain inner whitespace.
    pub fn read_from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(Error::io(path))?;

        Self::from_str(&s).map_err(|source| Error::ParseSpecies {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn warn_duplicates(&self) {
        for name in self.duplicates() {
            log::warn!("Species name '{name}' occurs more than once.");
        }
    }
}

impl FromIterator<String> for Species {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self(Vec::from_iter(iter))
    }
}

impl From<Vec<String>> for Species {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Species> for Vec<String> {
    fn from(species: Species) -> Self {
        species.0
    }
}

impl FromStr for Species {
    type Err = ParseSpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, name)| !name.is_empty())
            .map(|(line, name)| {
                if name.contains(char::is_whitespace) {
                    Err(ParseSpeciesError {
                        line,
                        name: name.to_string(),
                    })
                } else {
                    Ok(name.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// An error associated with parsing species names.
///
/// Species names are written space-separated, so a name cannot itself contain whitespace.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseSpeciesError {
    line: usize,
    name: String,
}

impl ParseSpeciesError {
    /// Returns the 1-based line number of the offending name.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the offending name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ParseSpeciesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: species name '{}' contains whitespace",
            self.line, self.name
        )
    }
}

impl std::error::Error for ParseSpeciesError {}
