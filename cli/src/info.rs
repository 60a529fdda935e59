use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Error;

use clap::Parser;

use tdata_core::matrix::io::{read::read_header_from_path, Header};

/// Summarise presence matrix files.
///
/// For each file, the dataset name, the number of sites, the number of species, and whether the
/// dataset is subsampled are printed. Datasets are considered subsampled unless their path
/// contains 'original'. Only the header line of each file is read.
#[derive(Debug, Parser)]
pub struct Info {
    /// Input presence matrices.
    #[arg(required = true, value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Delimiter between fields.
    #[arg(short = 'd', long, default_value_t = ',', value_name = "CHAR")]
    delimiter: char,

    /// Include a header with the names of fields.
    #[arg(short = 'H', long)]
    header: bool,
}

const FIELDS: [&str; 4] = ["dataset", "sites", "species", "subsampled"];

/// Returns the dataset name of a presence matrix path.
///
/// This is the file name with any '.data' component removed, so that both 'foo.data' and
/// 'foo.data.1' are named 'foo' and 'foo.1', respectively.
fn dataset_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
        .replace(".data.", ".")
        .replace(".data", "")
}

/// Returns "yes" if the dataset at path is subsampled, and "no" if it is an original dataset.
fn subsampled(path: &Path) -> &'static str {
    if path.to_string_lossy().contains("original") {
        "no"
    } else {
        "yes"
    }
}

impl Info {
    pub fn run(self) -> Result<(), Error> {
        let mut writer = io::stdout().lock();
        let delimiter = self.delimiter.to_string();

        if self.header {
            writeln!(writer, "{}", FIELDS.join(delimiter.as_str()))?;
        }

        for path in self.paths.iter() {
            let Header {
                species_count,
                site_count,
            } = read_header_from_path(path)?;

            let fields = [
                dataset_name(path),
                site_count.to_string(),
                species_count.to_string(),
                subsampled(path).to_string(),
            ];
            writeln!(writer, "{}", fields.join(delimiter.as_str()))?;
        }

        Ok(())
    }
}
