//! Writing site subsets.
//!
//! The first line lists all species names. Each following line lists the names of the species
//! present at one site, in site order. Names are separated by a single space, and a site without
//! any species present is written as an empty line:
//!
//! ```text
//! s1 s2 s3
//! s1 s3
//!
//! s2 s3
//! ```

use std::{io, path::Path};

use crate::{utils, Error};

use super::Subsets;

const SEP: &str = " ";

fn write_line<'a, W, I>(writer: &mut W, names: I) -> io::Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = &'a str>,
{
    let mut names = names.into_iter();

    if let Some(first) = names.next() {
        writer.write_all(first.as_bytes())?;

        for name in names {
            writer.write_all(SEP.as_bytes())?;
            writer.write_all(name.as_bytes())?;
        }
    }

    writer.write_all(b"\n")
}

/// Writes site subsets to a writer.
pub fn write_subsets<W>(writer: &mut W, subsets: &Subsets) -> io::Result<()>
where
    W: io::Write,
{
    write_line(writer, subsets.species().iter())?;

    for site in 0..subsets.site_count() {
        if let Some(names) = subsets.get_names(site) {
            write_line(writer, names)?;
        }
    }

    Ok(())
}

/// Writes site subsets to stdout.
pub fn write_to_stdout(subsets: &Subsets) -> io::Result<()> {
    write_subsets(&mut io::stdout().lock(), subsets)
}

/// Writes site subsets to path.
///
/// The path is only created or replaced once all subsets have been written.
pub fn write_to_path<P>(path: P, subsets: &Subsets) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    utils::write_atomically(path, |writer| write_subsets(writer, subsets))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use crate::{matrix::io::read::Builder, Species};

    fn write(s: &str, species: Option<Species>) -> String {
        let builder = match species {
            Some(species) => Builder::default().set_species(species),
            None => Builder::default(),
        };
        let matrix = builder.parse(s).unwrap();
        let subsets = Subsets::try_from_matrix(&matrix).unwrap();

        let mut dest = Vec::new();
        write_subsets(&mut dest, &subsets).unwrap();
        String::from_utf8(dest).unwrap()
    }

    #[test]
    fn test_write() {
        assert_eq!(
            write("3 2\n1 0\n0 1\n1 1\n", None),
            "s1 s2 s3\ns1 s3\ns2 s3\n"
        );
    }

    #[test]
    fn test_write_empty_sites() {
        assert_eq!(write("2 3\n0 1 0\n0 1 0\n", None), "s1 s2\n\ns1 s2\n\n");
    }

    #[test]
    fn test_write_line_count() {
        let output = write("4 6\n101010\n010101\n111000\n000111\n", None);

        assert_eq!(output.lines().count(), 6 + 1);
        assert_eq!(output.lines().next().unwrap().split(' ').count(), 4);
        assert!(output.lines().all(|line| !line.ends_with(' ')));
    }

    #[test]
    fn test_write_explicit_species() {
        let species = Species::from(vec![String::from("Homo"), String::from("Pan")]);

        assert_eq!(
            write("2 2\n1 1\n0 1\n", Some(species)),
            "Homo Pan\nHomo\nHomo Pan\n"
        );
    }

    #[test]
    fn test_write_to_path() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("subsets.txt");

        let matrix = Builder::default().parse("3 2\n1 0\n0 1\n1 1\n")?;
        write_to_path(&path, &Subsets::try_from_matrix(&matrix)?)?;

        assert_eq!(fs::read_to_string(&path)?, "s1 s2 s3\ns1 s3\ns2 s3\n");

        Ok(())
    }
}
