//! Datasets embedded in C/C++ headers.
//!
//! Test datasets for the terrace tools are distributed as headers declaring a Newick tree, the
//! species names, and a missing data matrix, each as a literal on a single line:
//!
//! ```text
//! const char *newickString = "((s1,s2),s3);";
//! const char *speciesNames[] = {"s1", "s2", "s3"};
//! const unsigned char missingDataMatrix[3][2] = {{1,0},{0,1},{1,1}};
//! ```
//!
//! A [`Dataset`] can be read from such a header and written out as a plain `.nwk` tree file and a
//! `.data` presence matrix file in the named layout.

use std::{
    fmt, fs,
    io::Write as _,
    path::{Path, PathBuf},
    str::FromStr,
};

use nom::{
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0},
    multi::separated_list1,
    sequence::{delimited, preceded},
    IResult,
};

use crate::{
    matrix::io::{write, Layout},
    utils, Error, Matrix, Species,
};

/// A tree and presence matrix read from a header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dataset {
    newick: String,
    matrix: Matrix,
}

impl Dataset {
    /// Returns the presence matrix, with species named as in the header.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Returns the Newick tree string.
    pub fn newick(&self) -> &str {
        &self.newick
    }

    /// Reads a dataset from a header at path.
    pub fn read_from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(Error::io(path))?;

        Self::from_str(&s).map_err(|source| Error::ParseDataset {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the dataset to `<dir>/<stem>.nwk` and `<dir>/<stem>.data`, returning both paths.
    ///
    /// The directory is created if it does not exist. Existing files are replaced. Both files are
    /// written in full before either is moved into place, and no tree file is left behind if the
    /// matrix file cannot be created.
    pub fn write_to_dir<P>(&self, dir: P, stem: &str) -> Result<(PathBuf, PathBuf), Error>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(Error::io(dir))?;

        let newick_path = dir.join(format!("{stem}.nwk"));
        let newick = utils::stage(&newick_path, |writer| writeln!(writer, "{}", self.newick))?;

        let data_path = dir.join(format!("{stem}.data"));
        let data = utils::stage(&data_path, |writer| {
            write::Builder::default()
                .set_layout(Layout::Named)
                .write(writer, &self.matrix)
        })?;

        newick.persist()?;
        if let Err(e) = data.persist() {
            if let Err(remove_error) = fs::remove_file(&newick_path) {
                log::warn!(
                    "Failed to remove '{}': {remove_error}.",
                    newick_path.display()
                );
            }
            return Err(e);
        }

        Ok((newick_path, data_path))
    }
}

impl FromStr for Dataset {
    type Err = ParseDatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut newick = None;
        let mut names = None;
        let mut rows = None;

        for (i, line) in s.lines().enumerate() {
            let Some(field) = Field::find(line) else {
                continue;
            };

            let malformed = || ParseDatasetError::MalformedLiteral { field, line: i + 1 };

            match field {
                Field::Newick if newick.is_none() => {
                    newick = Some(parse_newick(line).map_err(|_| malformed())?.1);
                }
                Field::Names if names.is_none() => {
                    names = Some(parse_names(line).map_err(|_| malformed())?.1);
                }
                Field::Matrix if rows.is_none() => {
                    rows = Some(parse_matrix(line).map_err(|_| malformed())?.1);
                }
                _ => log::warn!("Ignoring repeated {field} on line {}.", i + 1),
            }
        }

        let newick = newick.ok_or(ParseDatasetError::Missing(Field::Newick))?;
        let names = names.ok_or(ParseDatasetError::Missing(Field::Names))?;
        let rows = rows.ok_or(ParseDatasetError::Missing(Field::Matrix))?;

        let matrix = build_matrix(names, rows)?;

        Ok(Self {
            newick: newick.to_string(),
            matrix,
        })
    }
}

fn build_matrix(names: Vec<&str>, rows: Vec<Vec<&str>>) -> Result<Matrix, ParseDatasetError> {
    if names.len() != rows.len() {
        return Err(ParseDatasetError::RowCountMismatch {
            names: names.len(),
            rows: rows.len(),
        });
    }

    if let Some((index, name)) = names
        .iter()
        .enumerate()
        .find(|(_, name)| name.is_empty() || name.contains(char::is_whitespace))
    {
        return Err(ParseDatasetError::InvalidName {
            species: index + 1,
            name: name.to_string(),
        });
    }

    let site_count = rows.first().map(Vec::len).unwrap_or_default();
    let mut data = Vec::with_capacity(rows.len() * site_count);

    for (i, row) in rows.iter().enumerate() {
        if row.len() != site_count {
            return Err(ParseDatasetError::RowLengthMismatch {
                species: i + 1,
                expected: site_count,
                found: row.len(),
            });
        }

        for (j, &entry) in row.iter().enumerate() {
            data.push(match entry {
                "1" => true,
                "0" => false,
                _ => {
                    return Err(ParseDatasetError::InvalidEntry {
                        species: i + 1,
                        site: j + 1,
                        entry: entry.to_string(),
                    })
                }
            });
        }
    }

    let species = names.into_iter().map(String::from).collect::<Species>();

    Ok(Matrix::new_unchecked(species, site_count, data))
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn string_literal(s: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_until("\""), char('"'))(s)
}

fn parse_newick(line: &str) -> IResult<&str, &str> {
    preceded(take_until("\""), string_literal)(line)
}

fn parse_names(line: &str) -> IResult<&str, Vec<&str>> {
    preceded(
        take_until("{"),
        delimited(
            char('{'),
            separated_list1(char(','), ws(string_literal)),
            char('}'),
        ),
    )(line)
}

fn parse_entry(s: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(s)
}

fn parse_row(s: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        ws(char('{')),
        separated_list1(char(','), ws(parse_entry)),
        char('}'),
    )(s)
}

fn parse_matrix(line: &str) -> IResult<&str, Vec<Vec<&str>>> {
    preceded(
        take_until("{{"),
        delimited(
            char('{'),
            separated_list1(tag(","), ws(parse_row)),
            char('}'),
        ),
    )(line)
}

/// A dataset field declared in a header.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    /// The Newick tree string.
    Newick,
    /// The species names.
    Names,
    /// The missing data matrix.
    Matrix,
}

impl Field {
    fn find(line: &str) -> Option<Self> {
        [Field::Newick, Field::Names, Field::Matrix]
            .into_iter()
            .find(|field| line.contains(field.identifier()))
    }

    /// Returns the identifier declaring the field in a header.
    pub fn identifier(&self) -> &'static str {
        match self {
            Field::Newick => "newickString",
            Field::Names => "speciesNames",
            Field::Matrix => "missingDataMatrix",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// An error associated with parsing a dataset from a header.
///
/// Species and site indices are 1-based.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseDatasetError {
    /// A field is not declared in the header.
    Missing(Field),
    /// The literal of a field could not be parsed.
    MalformedLiteral {
        /// The field.
        field: Field,
        /// The 1-based line number of the declaration.
        line: usize,
    },
    /// The number of matrix rows differs from the number of species names.
    RowCountMismatch {
        /// The number of species names.
        names: usize,
        /// The number of matrix rows.
        rows: usize,
    },
    /// A matrix row has a different length than the first row.
    RowLengthMismatch {
        /// The species index.
        species: usize,
        /// The length of the first row.
        expected: usize,
        /// The length of the row.
        found: usize,
    },
    /// A matrix entry is neither `0` nor `1`.
    InvalidEntry {
        /// The species index.
        species: usize,
        /// The site index.
        site: usize,
        /// The offending entry.
        entry: String,
    },
    /// A species name is empty or contains whitespace.
    InvalidName {
        /// The species index.
        species: usize,
        /// The offending name.
        name: String,
    },
}

impl fmt::Display for ParseDatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDatasetError::Missing(field) => write!(f, "no {field} declared"),
            ParseDatasetError::MalformedLiteral { field, line } => {
                write!(f, "line {line}: malformed {field} literal")
            }
            ParseDatasetError::RowCountMismatch { names, rows } => write!(
                f,
                "found {rows} matrix rows, but {names} species names"
            ),
            ParseDatasetError::RowLengthMismatch {
                species,
                expected,
                found,
            } => write!(
                f,
                "row length mismatch for species {species}: expected {expected} sites, \
                found {found}"
            ),
            ParseDatasetError::InvalidEntry {
                species,
                site,
                entry,
            } => write!(
                f,
                "invalid entry '{entry}' for species {species} at site {site}, \
                expected '0' or '1'"
            ),
            ParseDatasetError::InvalidName { species, name } => {
                write!(f, "invalid name '{name}' for species {species}")
            }
        }
    }
}

impl std::error::Error for ParseDatasetError {}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"#ifndef EXAMPLE_H
#define EXAMPLE_H

const char *newickString = "((Homo,Pan),Gorilla);";
const char *speciesNames[] = {"Homo", "Pan", "Gorilla"};
const unsigned char missingDataMatrix[3][2] = {{1,0},{0,1},{1,1}};

#endif
"#;

    #[test]
    fn test_parse_newick() {
        assert_eq!(
            parse_newick(r#"const char *newickString = "(a,b);";"#),
            Ok((";", "(a,b);"))
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            parse_names(r#"const char *speciesNames[] = { "a","b" , "c" };"#)
                .unwrap()
                .1,
            ["a", "b", "c"]
        );
    }

    #[test]
    fn test_parse_matrix() {
        assert_eq!(
            parse_matrix("missingDataMatrix[2][3] = {{1, 0, 1}, { 0,0,1 }};")
                .unwrap()
                .1,
            [["1", "0", "1"], ["0", "0", "1"]]
        );
    }

    #[test]
    fn test_dataset_from_str() {
        let dataset = Dataset::from_str(HEADER).unwrap();

        assert_eq!(dataset.newick(), "((Homo,Pan),Gorilla);");
        assert_eq!(
            dataset.matrix().species().iter().collect::<Vec<_>>(),
            ["Homo", "Pan", "Gorilla"]
        );
        assert_eq!(dataset.matrix().site_count(), 2);
        assert_eq!(dataset.matrix().row(2), Some(&[true, true][..]));
    }

    #[test]
    fn test_dataset_missing_field() {
        let header = HEADER.replace("newickString", "tree");

        assert_eq!(
            Dataset::from_str(&header),
            Err(ParseDatasetError::Missing(Field::Newick))
        );
    }

    #[test]
    fn test_dataset_malformed_literal() {
        let header = HEADER.replace("{{1,0},{0,1},{1,1}}", "{{1,0},{0,1}");

        assert_eq!(
            Dataset::from_str(&header),
            Err(ParseDatasetError::MalformedLiteral {
                field: Field::Matrix,
                line: 6
            })
        );
    }

    #[test]
    fn test_dataset_row_count_mismatch() {
        let header = HEADER.replace("{{1,0},{0,1},{1,1}}", "{{1,0},{0,1}}");

        assert_eq!(
            Dataset::from_str(&header),
            Err(ParseDatasetError::RowCountMismatch { names: 3, rows: 2 })
        );
    }

    #[test]
    fn test_dataset_row_length_mismatch() {
        let header = HEADER.replace("{{1,0},{0,1},{1,1}}", "{{1,0},{0,1,1},{1,1}}");

        assert_eq!(
            Dataset::from_str(&header),
            Err(ParseDatasetError::RowLengthMismatch {
                species: 2,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_dataset_invalid_entry() {
        let header = HEADER.replace("{{1,0},{0,1},{1,1}}", "{{1,0},{0,2},{1,1}}");

        assert_eq!(
            Dataset::from_str(&header),
            Err(ParseDatasetError::InvalidEntry {
                species: 2,
                site: 2,
                entry: String::from("2")
            })
        );
    }

    #[test]
    fn test_dataset_invalid_name() {
        let header = HEADER.replace(r#""Pan""#, r#""Pan troglodytes""#);

        assert_eq!(
            Dataset::from_str(&header),
            Err(ParseDatasetError::InvalidName {
                species: 2,
                name: String::from("Pan troglodytes")
            })
        );
    }

    #[test]
    fn test_write_to_dir() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("converted");

        let dataset = Dataset::from_str(HEADER)?;
        let (newick_path, data_path) = dataset.write_to_dir(&out, "example")?;

        assert_eq!(newick_path, out.join("example.nwk"));
        assert_eq!(fs::read_to_string(newick_path)?, "((Homo,Pan),Gorilla);\n");
        assert_eq!(
            fs::read_to_string(data_path)?,
            "3 2\n10 Homo\n01 Pan\n11 Gorilla\n"
        );

        Ok(())
    }

    #[test]
    fn test_write_to_dir_failure_leaves_no_tree() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;

        // A directory in place of the matrix file cannot be replaced
        let blocked = dir.path().join("example.data");
        fs::create_dir(&blocked)?;
        fs::write(blocked.join("keep"), "")?;

        let dataset = Dataset::from_str(HEADER)?;
        let e = dataset.write_to_dir(dir.path(), "example").unwrap_err();

        assert_eq!(e.category(), crate::error::Category::Io);
        assert!(!dir.path().join("example.nwk").exists());
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);

        Ok(())
    }
}
