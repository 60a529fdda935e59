//! Reading and writing for the text format.

use std::{fmt, io, str::FromStr};

use crate::{Matrix, Species};

use super::{Layout, ParseMatrixError, ParseMatrixErrorKind};

const ABSENT: &str = "0";
const PRESENT: &str = "1";

/// The header line of a presence matrix file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Header {
    /// The number of species.
    pub species_count: usize,
    /// The number of sites.
    pub site_count: usize,
}

impl Header {
    /// Creates a new header.
    pub fn new(species_count: usize, site_count: usize) -> Self {
        Self {
            species_count,
            site_count,
        }
    }

    /// Reads a header from the first line of a reader.
    ///
    /// The remainder of the reader is left unread.
    pub fn read<R>(reader: &mut R) -> io::Result<Result<Self, ParseMatrixError>>
    where
        R: io::BufRead,
    {
        let mut buf = String::new();
        reader.read_line(&mut buf)?;

        Ok(Self::from_str(&buf))
    }

    /// Writes the header line to a writer.
    pub fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writeln!(writer, "{self}")
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.species_count, self.site_count)
    }
}

impl FromStr for Header {
    type Err = ParseMatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || {
            ParseMatrixError::new(
                1,
                ParseMatrixErrorKind::MalformedHeader {
                    content: s.trim().to_string(),
                },
            )
        };

        let positive = |field: &str| usize::from_str(field).ok().filter(|&x| x > 0);

        match s.split_ascii_whitespace().collect::<Vec<_>>()[..] {
            [species_count, site_count] => positive(species_count)
                .zip(positive(site_count))
                .map(|(species_count, site_count)| Self::new(species_count, site_count))
                .ok_or_else(error),
            _ => Err(error()),
        }
    }
}

/// Parses a presence matrix from text.
///
/// If `species` is `None`, names are taken from the rows for the named layout, and synthesized
/// otherwise.
pub(crate) fn parse_matrix(
    s: &str,
    layout: Layout,
    species: Option<Species>,
) -> Result<Matrix, ParseMatrixError> {
    let mut lines = s.lines().enumerate().map(|(i, line)| (i + 1, line));

    let header = Header::from_str(lines.next().map(|(_, line)| line).unwrap_or_default())?;
    let Header {
        species_count,
        site_count,
    } = header;
    log::info!("Reading presence matrix with {species_count} species and {site_count} sites.");

    if let Some(species) = species.as_ref() {
        if species.len() != species_count {
            return Err(ParseMatrixError::new(
                1,
                ParseMatrixErrorKind::NameCountMismatch {
                    expected: species_count,
                    found: species.len(),
                },
            ));
        }
    }

    let mut data = Vec::new();
    let mut names = Vec::new();

    for species in 1..=species_count {
        let (line_number, line) = lines.next().ok_or_else(|| {
            ParseMatrixError::new(species + 1, ParseMatrixErrorKind::MissingRow { species })
        })?;

        let row = Row::parse(line, species, header, layout)
            .map_err(|kind| ParseMatrixError::new(line_number, kind))?;

        log::debug!(
            "Species {species} present at {} of {site_count} sites.",
            row.presences.iter().filter(|&&x| x).count()
        );

        data.extend(row.presences);
        names.extend(row.name.map(String::from));
    }

    if let Some((line_number, _)) = lines.find(|(_, line)| !line.trim().is_empty()) {
        return Err(ParseMatrixError::new(
            line_number,
            ParseMatrixErrorKind::TrailingData,
        ));
    }

    let species = match (species, layout) {
        (Some(species), _) => species,
        (None, Layout::Named) => Species::from(names),
        (None, Layout::Plain) => Species::numbered(species_count),
    };
    species.warn_duplicates();

    Ok(Matrix::new_unchecked(species, site_count, data))
}

/// A single parsed species row.
#[derive(Debug, Eq, PartialEq)]
struct Row<'a> {
    presences: Vec<bool>,
    name: Option<&'a str>,
}

impl<'a> Row<'a> {
    fn parse(
        line: &'a str,
        species: usize,
        header: Header,
        layout: Layout,
    ) -> Result<Self, ParseMatrixErrorKind> {
        let mut fields = line.split_ascii_whitespace().collect::<Vec<_>>();

        let name = match layout {
            Layout::Plain => None,
            Layout::Named if fields.len() < 2 => {
                return Err(ParseMatrixErrorKind::MissingName { species })
            }
            Layout::Named => fields.pop(),
        };

        let tokens = if fields.len() == 1 && header.site_count > 1 {
            split_compact(fields[0])
        } else {
            fields
        };

        if tokens.len() != header.site_count {
            return Err(ParseMatrixErrorKind::RowLengthMismatch {
                species,
                expected: header.site_count,
                found: tokens.len(),
            });
        }

        let presences = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| match token {
                PRESENT => Ok(true),
                ABSENT => Ok(false),
                _ => Err(ParseMatrixErrorKind::InvalidToken {
                    species,
                    site: i + 1,
                    token: token.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { presences, name })
    }
}

fn split_compact(s: &str) -> Vec<&str> {
    s.char_indices()
        .map(|(i, c)| &s[i..i + c.len_utf8()])
        .collect()
}

/// Writes a presence matrix in text format to a writer.
///
/// Tokens are space-separated in the plain layout, and written in compact form followed by the
/// species name in the named layout.
pub fn write_matrix<W>(writer: &mut W, matrix: &Matrix, layout: Layout) -> io::Result<()>
where
    W: io::Write,
{
    Header::new(matrix.species_count(), matrix.site_count()).write(writer)?;

    let token = |&present: &bool| if present { PRESENT } else { ABSENT };

    for (row, name) in matrix.iter_rows().zip(matrix.species().iter()) {
        match layout {
            Layout::Plain => {
                let tokens = row.iter().map(token).collect::<Vec<_>>();
                writeln!(writer, "{}", tokens.join(" "))?
            }
            Layout::Named => {
                let tokens = row.iter().map(token).collect::<String>();
                writeln!(writer, "{tokens} {name}")?
            }
        }
    }

    Ok(())
}
