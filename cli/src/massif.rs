use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Error;

use clap::Parser;

use tdata_core::massif::Profile;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Summarise massif memory profiles.
///
/// For each profile, the file name, the index of the peak snapshot, and the peak memory in MiB
/// are printed. The memory at a snapshot is the sum of its heap, extra heap, and stack sizes.
#[derive(Debug, Parser)]
pub struct Massif {
    /// Input massif profiles.
    #[arg(required = true, value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Delimiter between fields.
    #[arg(short = 'd', long, default_value_t = ',', value_name = "CHAR")]
    delimiter: char,

    /// Include a header with the names of fields.
    #[arg(short = 'H', long)]
    header: bool,

    /// Print peak memory in bytes rather than MiB.
    #[arg(short = 'b', long)]
    bytes: bool,
}

impl Massif {
    fn fields(&self) -> [&'static str; 3] {
        let peak = if self.bytes { "peak_bytes" } else { "peak_mib" };
        ["profile", "snapshot", peak]
    }

    pub fn run(self) -> Result<(), Error> {
        let mut writer = io::stdout().lock();
        let delimiter = self.delimiter.to_string();

        if self.header {
            writeln!(writer, "{}", self.fields().join(delimiter.as_str()))?;
        }

        for path in self.paths.iter() {
            let profile = Profile::read_from_path(path)?;
            let Some(peak) = profile.peak() else {
                continue;
            };

            let total = if self.bytes {
                peak.total().to_string()
            } else {
                format!("{:.3}", peak.total() as f64 / BYTES_PER_MIB)
            };

            let name = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();

            let fields = [name.to_string(), peak.index().to_string(), total];
            writeln!(writer, "{}", fields.join(delimiter.as_str()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    use crate::tests::{parse_subcmd, try_parse_subcmd};

    #[test]
    fn test_parse_defaults() {
        let args = parse_subcmd::<Massif>("tdata massif a.massif.out");

        assert_eq!(args.paths, [PathBuf::from("a.massif.out")]);
        assert_eq!(args.delimiter, ',');
        assert!(!args.header);
        assert!(!args.bytes);
        assert_eq!(args.fields(), ["profile", "snapshot", "peak_mib"]);
    }

    #[test]
    fn test_parse_bytes() {
        let args = parse_subcmd::<Massif>("tdata massif -b -H a.massif.out b.massif.out");

        assert!(args.header);
        assert_eq!(args.paths.len(), 2);
        assert_eq!(args.fields()[2], "peak_bytes");
    }

    #[test]
    fn test_no_paths() {
        let result = try_parse_subcmd::<Massif>("tdata massif");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }
}
