//! Filesystem utilities.

use std::{
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::Error;

/// Writes to a path through a temporary file in the same directory.
///
/// The temporary file is renamed to the path only after `write` succeeds, so the path is never
/// left holding partial output. On failure, the temporary file is removed.
pub(crate) fn write_atomically<P, F>(path: P, write: F) -> Result<(), Error>
where
    P: AsRef<Path>,
    F: FnOnce(&mut io::BufWriter<&mut fs::File>) -> io::Result<()>,
{
    let path = path.as_ref();

    stage(path, write)?.persist()
}

/// Output written to a temporary file, waiting to be moved to its destination.
///
/// The temporary file is removed if dropped before [`Staged::persist`].
#[derive(Debug)]
pub(crate) struct Staged {
    path: PathBuf,
    file: NamedTempFile,
}

impl Staged {
    /// Moves the staged output to its destination, replacing any existing file.
    pub(crate) fn persist(self) -> Result<(), Error> {
        let Staged { path, file } = self;

        file.persist(&path)
            .map_err(|e| Error::io(&path)(e.error))?;

        log::debug!("Wrote '{}'.", path.display());

        Ok(())
    }
}

/// Writes output destined for a path to a temporary file in the same directory.
pub(crate) fn stage<P, F>(path: P, write: F) -> Result<Staged, Error>
where
    P: AsRef<Path>,
    F: FnOnce(&mut io::BufWriter<&mut fs::File>) -> io::Result<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::Builder::new()
        .prefix(".tdata-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(Error::io(path))?;

    {
        let mut writer = io::BufWriter::new(file.as_file_mut());
        write(&mut writer).map_err(Error::io(path))?;
        writer.flush().map_err(Error::io(path))?;
    }

    Ok(Staged {
        path: path.to_path_buf(),
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomically() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        write_atomically(&path, |writer| writer.write_all(b"foo\n"))?;
        assert_eq!(fs::read_to_string(&path)?, "foo\n");

        write_atomically(&path, |writer| writer.write_all(b"bar\n"))?;
        assert_eq!(fs::read_to_string(&path)?, "bar\n");

        Ok(())
    }

    #[test]
    fn test_write_atomically_failure_leaves_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        let result = write_atomically(&path, |writer| {
            writer.write_all(b"partial")?;
            Err(io::Error::new(io::ErrorKind::Other, "failed"))
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);

        Ok(())
    }

    #[test]
    fn test_write_atomically_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let e = write_atomically(&path, |writer| writer.write_all(b"foo")).unwrap_err();

        assert_eq!(e.category(), crate::error::Category::Io);
    }

    #[test]
    fn test_stage_dropped_leaves_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        let staged = stage(&path, |writer| writer.write_all(b"foo\n"))?;
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);

        drop(staged);
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);

        Ok(())
    }
}
