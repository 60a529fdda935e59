//! Site subsets.
//!
//! The subset of a site is the ordered list of species present at that site. Computing the site
//! subsets of a [`Matrix`] amounts to a transposition of its presence data.

pub mod io;

use crate::{error::InvariantViolation, Matrix, Species};

/// The species subsets of every site in a presence matrix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subsets {
    species: Species,
    subsets: Vec<Vec<usize>>,
}

impl Subsets {
    /// Returns the species indices present at a site if in bounds, otherwise `None`.
    ///
    /// Indices are in ascending order.
    pub fn get(&self, site: usize) -> Option<&[usize]> {
        self.subsets.get(site).map(Vec::as_slice)
    }

    /// Returns an iterator over the species names present at a site if in bounds, otherwise
    /// `None`.
    pub fn get_names(&self, site: usize) -> Option<impl Iterator<Item = &str>> {
        self.get(site).map(|subset| {
            subset
                .iter()
                .map(move |&i| self.species.get(i).unwrap_or_default())
        })
    }

    /// Returns an iterator over the subsets in site order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.subsets.iter().map(Vec::as_slice)
    }

    /// Returns the number of sites.
    pub fn site_count(&self) -> usize {
        self.subsets.len()
    }

    /// Returns the species names.
    pub fn species(&self) -> &Species {
        &self.species
    }

    /// Creates the site subsets of a presence matrix.
    ///
    /// Returns an error if any subset ends up holding more species than the matrix, which does
    /// not happen for any valid matrix.
    pub fn try_from_matrix(matrix: &Matrix) -> Result<Self, InvariantViolation> {
        let mut subsets = vec![Vec::new(); matrix.site_count()];

        for (species, row) in matrix.iter_rows().enumerate() {
            for (subset, _) in subsets.iter_mut().zip(row).filter(|(_, &present)| present) {
                subset.push(species);
            }
        }

        let species_count = matrix.species_count();
        if let Some((site, subset)) = subsets
            .iter()
            .enumerate()
            .find(|(_, subset)| subset.len() > species_count)
        {
            return Err(InvariantViolation {
                site: site + 1,
                subset_len: subset.len(),
                species_count,
            });
        }

        log::info!(
            "Built {} site subsets from {} presences.",
            subsets.len(),
            matrix.presences()
        );

        Ok(Self {
            species: matrix.species().clone(),
            subsets,
        })
    }
}

impl TryFrom<&Matrix> for Subsets {
    type Error = InvariantViolation;

    fn try_from(matrix: &Matrix) -> Result<Self, Self::Error> {
        Self::try_from_matrix(matrix)
    }
}
