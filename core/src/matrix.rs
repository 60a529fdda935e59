//! Species-by-site presence matrix.

use std::fmt;

pub mod io;

use crate::Species;

/// A species-by-site presence/absence matrix.
///
/// Presence is stored in row-major order, with one row per species and one column per site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Matrix {
    species: Species,
    site_count: usize,
    data: Vec<bool>,
}

impl Matrix {
    /// Returns the presence of a species at a site if both are in bounds, otherwise `None`.
    pub fn get(&self, species: usize, site: usize) -> Option<bool> {
        if species < self.species_count() && site < self.site_count {
            self.data.get(species * self.site_count + site).copied()
        } else {
            None
        }
    }

    /// Returns the row of presences for a species if in bounds, otherwise `None`.
    pub fn row(&self, species: usize) -> Option<&[bool]> {
        if species < self.species_count() {
            let start = species * self.site_count;
            self.data.get(start..start + self.site_count)
        } else {
            None
        }
    }

    /// Returns an iterator over the rows of the matrix, in species order.
    pub fn iter_rows(&self) -> std::slice::Chunks<'_, bool> {
        // Chunks panics on zero size, and a matrix with no sites has no data in any case
        self.data.chunks(self.site_count.max(1))
    }

    /// Creates a new matrix from species names and row-major presence data.
    ///
    /// Returns an error if the length of the data does not match the number of species times the
    /// number of sites.
    pub fn new<D>(species: Species, site_count: usize, data: D) -> Result<Self, ShapeError>
    where
        Vec<bool>: From<D>,
    {
        let data = Vec::from(data);

        if data.len() == species.len() * site_count {
            Ok(Self::new_unchecked(species, site_count, data))
        } else {
            Err(ShapeError {
                species_count: species.len(),
                site_count,
                n: data.len(),
            })
        }
    }

    pub(crate) fn new_unchecked(species: Species, site_count: usize, data: Vec<bool>) -> Self {
        Self {
            species,
            site_count,
            data,
        }
    }

    /// Returns the total number of presences in the matrix.
    pub fn presences(&self) -> usize {
        self.data.iter().filter(|&&x| x).count()
    }

    /// Returns the number of sites.
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    /// Returns the species names.
    pub fn species(&self) -> &Species {
        &self.species
    }

    /// Returns the number of species.
    pub fn species_count(&self) -> usize {
        self.species.len()
    }
}

/// An error constructing a matrix from data of the wrong length.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShapeError {
    species_count: usize,
    site_count: usize,
    n: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ShapeError {
            species_count,
            site_count,
            n,
        } = self;

        write!(
            f,
            "cannot construct matrix with {species_count} species and {site_count} sites \
            from {n} elements"
        )
    }
}

impl std::error::Error for ShapeError {}
