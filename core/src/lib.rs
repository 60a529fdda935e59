#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Tools for preparing phylogenetic terrace datasets.
//!
//! This serves as the core library implementation for the `tdata` CLI, but can also be used as a
//! free-standing library for working with species-by-site presence data.
//!
//! # Overview
//!
//! The core struct is a presence [`Matrix`], recording which species are present at which sites,
//! along with the [`Species`] names. From a matrix, the [`Subsets`] of species present at each
//! site can be derived. Matrices are read from and written to text files using the builders in
//! [`matrix::io`]. Datasets embedded in C/C++ headers can be read as a [`Dataset`], and memory
//! profiles of the terrace tools can be summarised using [`massif`].
//!
//! # Example
//!
//! ```
//! use tdata_core::{matrix::io::read::Builder, Subsets};
//!
//! // Parse a matrix of three species and two sites
//! let matrix = Builder::default().parse("3 2\n1 0\n0 1\n1 1\n")?;
//!
//! // Find the species present at each site
//! let subsets = Subsets::try_from_matrix(&matrix)?;
//!
//! let first = subsets.get_names(0).expect("two sites").collect::<Vec<_>>();
//! assert_eq!(first, ["s1", "s3"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dataset;
pub use dataset::Dataset;

pub mod error;
pub use error::Error;

pub mod massif;

pub mod matrix;
pub use matrix::Matrix;

pub mod species;
pub use species::Species;

pub mod subsets;
pub use subsets::Subsets;

pub(crate) mod utils;
