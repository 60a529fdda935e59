//! Utilities for reading presence matrices.

use std::{
    fs,
    io::{self, BufRead as _, Read as _},
    path::Path,
};

use flate2::{bufread, read::MultiGzDecoder};

use crate::{Error, Matrix, Species};

use super::{text, Header, Layout, ParseMatrixError};

const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

/// A builder to read a presence matrix.
#[derive(Debug, Default)]
pub struct Builder {
    layout: Layout,
    species: Option<Species>,
}

impl Builder {
    /// Parse presence matrix from a string.
    pub fn parse(self, s: &str) -> Result<Matrix, ParseMatrixError> {
        text::parse_matrix(s, self.layout, self.species)
    }

    /// Read presence matrix from reader.
    ///
    /// The full input is read before parsing. Gzip-compressed input is detected and decompressed.
    pub fn read<R>(self, reader: &mut R) -> io::Result<Result<Matrix, ParseMatrixError>>
    where
        R: io::Read,
    {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;

        let raw = if raw.starts_with(&GZIP_MAGIC_NUMBER) {
            log::debug!("Detected gzip-compressed input.");

            let mut decompressed = Vec::new();
            MultiGzDecoder::new(&raw[..]).read_to_end(&mut decompressed)?;
            decompressed
        } else {
            raw
        };

        let s = String::from_utf8(raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok(self.parse(&s))
    }

    /// Read presence matrix from path.
    pub fn read_from_path<P>(self, path: P) -> Result<Matrix, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        let mut file = fs::File::open(path).map_err(Error::io(path))?;

        self.read(&mut file)
            .map_err(Error::io(path))?
            .map_err(|source| Error::ParseMatrix {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Set the row layout.
    ///
    /// If unset, the plain layout will be used.
    pub fn set_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set species names.
    ///
    /// The number of names must match the number of species in the matrix. If unset, names are
    /// read from the rows in the named layout, and synthesized as `s1`, `s2`, ... otherwise.
    pub fn set_species(mut self, species: Species) -> Self {
        self.species = Some(species);
        self
    }
}

/// Read only the header line of a presence matrix file at path.
///
/// Gzip-compressed files are detected and decompressed.
pub fn read_header_from_path<P>(path: P) -> Result<Header, Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let mut reader = fs::File::open(path)
        .map(io::BufReader::new)
        .map_err(Error::io(path))?;

    let is_gzip = reader
        .fill_buf()
        .map_err(Error::io(path))?
        .starts_with(&GZIP_MAGIC_NUMBER);

    let result = if is_gzip {
        Header::read(&mut io::BufReader::new(bufread::MultiGzDecoder::new(reader)))
    } else {
        Header::read(&mut reader)
    };

    result
        .map_err(Error::io(path))?
        .map_err(|source| Error::ParseMatrix {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;

    use flate2::{write::GzEncoder, Compression};

    use crate::{error::Category, matrix::io::ParseMatrixErrorKind};

    #[test]
    fn test_read_plain() -> io::Result<()> {
        let matrix = Builder::default().read(&mut &b"2 2\n1 0\n1 1\n"[..])?.unwrap();

        assert_eq!(matrix.presences(), 3);

        Ok(())
    }

    #[test]
    fn test_read_gzip() -> io::Result<()> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"2 2\n10 Homo\n11 Pan\n")?;
        let compressed = encoder.finish()?;

        let matrix = Builder::default()
            .set_layout(Layout::Named)
            .read(&mut &compressed[..])?
            .unwrap();

        assert_eq!(matrix.species().get(1), Some("Pan"));
        assert_eq!(matrix.row(0), Some(&[true, false][..]));

        Ok(())
    }

    #[test]
    fn test_read_invalid_utf8() {
        let result = Builder::default().read(&mut &b"2 2\n\xff\xfe\n"[..]);

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let e = Builder::default()
            .read_from_path(dir.path().join("missing.data"))
            .unwrap_err();

        assert_eq!(e.category(), Category::Io);
    }

    #[test]
    fn test_read_from_path_malformed() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("input.data");
        fs::write(&path, "abc 5\n1 0 1 0 1\n")?;

        match Builder::default().read_from_path(&path) {
            Err(Error::ParseMatrix { path: p, source }) => {
                assert_eq!(p, path);
                assert!(matches!(
                    source.kind(),
                    ParseMatrixErrorKind::MalformedHeader { .. }
                ));
            }
            result => panic!("expected malformed header, found {result:?}"),
        }

        Ok(())
    }

    #[test]
    fn test_read_header_from_path() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;

        let plain = dir.path().join("plain.data");
        fs::write(&plain, "4 7\n1111111 a\n")?;
        assert_eq!(read_header_from_path(&plain)?, Header::new(4, 7));

        let gzip = dir.path().join("gzip.data.gz");
        let mut encoder = GzEncoder::new(fs::File::create(&gzip)?, Compression::default());
        encoder.write_all(b"12 3\n")?;
        encoder.finish()?;
        assert_eq!(read_header_from_path(&gzip)?, Header::new(12, 3));

        Ok(())
    }
}
