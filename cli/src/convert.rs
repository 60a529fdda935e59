use std::path::PathBuf;

use anyhow::{anyhow, Error};

use clap::Parser;

use tdata_core::Dataset;

/// Convert header dataset to tree and presence matrix files.
#[derive(Debug, Parser)]
pub struct Convert {
    /// Input header.
    ///
    /// The header should declare the Newick tree as 'newickString', the species names as
    /// 'speciesNames', and the presence matrix as 'missingDataMatrix', each on a single line.
    #[arg(value_name = "FILE")]
    header: PathBuf,

    /// Output directory.
    ///
    /// The tree is written to '<STEM>.nwk' and the presence matrix to '<STEM>.data' in this
    /// directory, where '<STEM>' is the file name of the header without its extension. The
    /// directory is created if it does not exist.
    #[arg(value_name = "DIR")]
    output_dir: PathBuf,
}

impl Convert {
    pub fn run(self) -> Result<(), Error> {
        let stem = self
            .header
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| anyhow!("invalid header file name '{}'", self.header.display()))?;

        let dataset = Dataset::read_from_path(&self.header)?;
        log::info!(
            "Read dataset with {} species and {} sites.",
            dataset.matrix().species_count(),
            dataset.matrix().site_count()
        );

        let (newick_path, data_path) = dataset.write_to_dir(&self.output_dir, stem)?;
        log::info!(
            "Wrote '{}' and '{}'.",
            newick_path.display(),
            data_path.display()
        );

        Ok(())
    }
}
