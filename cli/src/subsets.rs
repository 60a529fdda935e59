use std::path::{Path, PathBuf};

use anyhow::Error;

use clap::{CommandFactory, Parser, ValueEnum};

use tdata_core::{matrix::io, subsets, Species};

/// Create site subsets from presence matrix.
#[derive(Debug, Parser)]
pub struct Subsets {
    /// Input presence matrix.
    ///
    /// The first line should contain the number of species and the number of sites. Each of the
    /// following lines should contain the row of a single species, with one 0 (absent) or 1
    /// (present) token per site. Gzip-compressed input is supported.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output site subsets.
    ///
    /// The first line lists all species names, and each following line lists the species present
    /// at a single site. Use '-' to write to stdout. The file is only written if the input is
    /// valid.
    #[arg(value_name = "FILE")]
    output: PathBuf,

    /// Layout of species rows in the input.
    #[arg(short = 'l', long, value_enum, default_value_t = Layout::Plain, value_name = "LAYOUT")]
    layout: Layout,

    /// Species names file.
    ///
    /// By default, species are named s1, s2, ... in the order of their rows, unless names are
    /// given in the rows using the named layout. By providing a names file, other names can be
    /// used. Each line should contain a single name, and the number of names must match the number
    /// of species.
    #[arg(short = 'n', long, value_name = "FILE")]
    names: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layout {
    /// Rows contain only presence tokens.
    Plain,
    /// Rows contain presence tokens followed by a species name.
    Named,
}

impl From<Layout> for io::Layout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Plain => io::Layout::Plain,
            Layout::Named => io::Layout::Named,
        }
    }
}

impl Subsets {
    pub fn run(self) -> Result<(), Error> {
        if self.names.is_some() && self.layout == Layout::Named {
            return Err(Subsets::command()
                .error(
                    clap::error::ErrorKind::ArgumentConflict,
                    "species names cannot be provided both via names file and named layout",
                )
                .into());
        }

        let mut builder = io::read::Builder::default().set_layout(self.layout.into());
        if let Some(path) = self.names.as_ref() {
            builder = builder.set_species(Species::read_from_path(path)?);
        }

        let matrix = builder.read_from_path(&self.input)?;

        let site_subsets =
            subsets::Subsets::try_from_matrix(&matrix).map_err(tdata_core::Error::from)?;

        if self.output == Path::new("-") {
            subsets::io::write_to_stdout(&site_subsets)?;
        } else {
            subsets::io::write_to_path(&self.output, &site_subsets)?;
            log::info!("Wrote site subsets to '{}'.", self.output.display());
        }

        Ok(())
    }
}
