//! Utilities for writing presence matrices.

use std::{io, path::Path};

use crate::{utils, Error, Matrix};

use super::{text, Layout};

/// A builder to write a presence matrix.
#[derive(Debug, Default)]
pub struct Builder {
    layout: Layout,
}

impl Builder {
    /// Set the row layout.
    ///
    /// If unset, the plain layout will be used.
    pub fn set_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Write presence matrix to writer.
    pub fn write<W>(self, writer: &mut W, matrix: &Matrix) -> io::Result<()>
    where
        W: io::Write,
    {
        text::write_matrix(writer, matrix, self.layout)
    }

    /// Write presence matrix to path.
    ///
    /// The path is only created or replaced once the full matrix has been written.
    pub fn write_to_path<P>(self, path: P, matrix: &Matrix) -> Result<(), Error>
    where
        P: AsRef<Path>,
    {
        utils::write_atomically(path, |writer| self.write(writer, matrix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use crate::matrix::io::read;

    #[test]
    fn test_write_to_path_named() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.data");

        let matrix = read::Builder::default()
            .set_layout(Layout::Named)
            .parse("2 3\n1 0 1 Homo\n0 1 1 Pan\n")?;

        Builder::default()
            .set_layout(Layout::Named)
            .write_to_path(&path, &matrix)?;

        assert_eq!(fs::read_to_string(&path)?, "2 3\n101 Homo\n011 Pan\n");

        Ok(())
    }
}
