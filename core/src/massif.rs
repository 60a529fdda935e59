//! Memory profiles written by valgrind's massif tool.
//!
//! A massif output file is a sequence of snapshots, each introduced by a `snapshot=<index>` line
//! and followed by `key=value` measurement lines:
//!
//! ```text
//! desc: --pages-as-heap=yes
//! cmd: ./terraces_main example.nwk example.data
//! time_unit: i
//! #-----------
//! snapshot=0
//! #-----------
//! time=0
//! mem_heap_B=4096
//! mem_heap_extra_B=0
//! mem_stacks_B=0
//! heap_tree=empty
//! ```
//!
//! The memory used at a snapshot is the sum of `mem_heap_B`, `mem_heap_extra_B`, and
//! `mem_stacks_B`. Other lines are ignored.

use std::{fmt, fs, path::Path, str::FromStr};

use crate::Error;

const SNAPSHOT: &str = "snapshot";
const HEAP: &str = "mem_heap_B";
const HEAP_EXTRA: &str = "mem_heap_extra_B";
const STACKS: &str = "mem_stacks_B";

/// The memory measurements of a single snapshot, in bytes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Snapshot {
    index: usize,
    heap: u64,
    heap_extra: u64,
    stacks: u64,
}

impl Snapshot {
    /// Returns the useful heap size.
    pub fn heap(&self) -> u64 {
        self.heap
    }

    /// Returns the extra heap size used by the allocator.
    pub fn heap_extra(&self) -> u64 {
        self.heap_extra
    }

    /// Returns the snapshot index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Creates a new snapshot.
    pub fn new(index: usize, heap: u64, heap_extra: u64, stacks: u64) -> Self {
        Self {
            index,
            heap,
            heap_extra,
            stacks,
        }
    }

    /// Returns the stack size.
    pub fn stacks(&self) -> u64 {
        self.stacks
    }

    /// Returns the total memory used at the snapshot.
    pub fn total(&self) -> u64 {
        self.heap
            .saturating_add(self.heap_extra)
            .saturating_add(self.stacks)
    }
}

/// A massif memory profile.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Profile {
    snapshots: Vec<Snapshot>,
}

impl Profile {
    /// Returns the snapshot with the largest total memory.
    ///
    /// If several snapshots share the largest total, the first of them is returned. Parsed
    /// profiles always have a peak.
    pub fn peak(&self) -> Option<&Snapshot> {
        self.snapshots.iter().rev().max_by_key(|snapshot| snapshot.total())
    }

    /// Reads a profile from a path.
    pub fn read_from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(Error::io(path))?;

        Self::from_str(&s).map_err(|source| Error::ParseMassif {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the snapshots in the order they appear.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }
}

impl FromStr for Profile {
    type Err = ParseMassifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut snapshots: Vec<Snapshot> = Vec::new();

        for (i, line) in s.lines().enumerate() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            let invalid = || ParseMassifError::InvalidValue {
                line: i + 1,
                key: key.to_string(),
                value: value.to_string(),
            };

            if key == SNAPSHOT {
                let index = value.parse().map_err(|_| invalid())?;
                snapshots.push(Snapshot::new(index, 0, 0, 0));
                continue;
            }

            let measurement = match key {
                HEAP | HEAP_EXTRA | STACKS => value.parse::<u64>().map_err(|_| invalid())?,
                _ => continue,
            };

            let snapshot =
                snapshots
                    .last_mut()
                    .ok_or_else(|| ParseMassifError::MeasurementBeforeSnapshot {
                        line: i + 1,
                        key: key.to_string(),
                    })?;

            match key {
                HEAP => snapshot.heap = measurement,
                HEAP_EXTRA => snapshot.heap_extra = measurement,
                _ => snapshot.stacks = measurement,
            }
        }

        if snapshots.is_empty() {
            Err(ParseMassifError::NoSnapshots)
        } else {
            log::debug!("Read massif profile with {} snapshots.", snapshots.len());
            Ok(Self { snapshots })
        }
    }
}

/// An error associated with parsing a massif profile.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseMassifError {
    /// A snapshot index or measurement is not a non-negative integer.
    InvalidValue {
        /// The 1-based line number.
        line: usize,
        /// The key of the offending line.
        key: String,
        /// The offending value.
        value: String,
    },
    /// A measurement occurs before the first snapshot.
    MeasurementBeforeSnapshot {
        /// The 1-based line number.
        line: usize,
        /// The key of the measurement.
        key: String,
    },
    /// The profile contains no snapshots.
    NoSnapshots,
}

impl fmt::Display for ParseMassifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMassifError::InvalidValue { line, key, value } => {
                write!(f, "line {line}: invalid value '{value}' for '{key}'")
            }
            ParseMassifError::MeasurementBeforeSnapshot { line, key } => {
                write!(f, "line {line}: '{key}' occurs before the first snapshot")
            }
            ParseMassifError::NoSnapshots => f.write_str("no snapshots found"),
        }
    }
}

impl std::error::Error for ParseMassifError {}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = "\
desc: --pages-as-heap=yes
cmd: ./terraces_main example.nwk example.data
time_unit: i
#-----------
snapshot=0
#-----------
time=0
mem_heap_B=4096
mem_heap_extra_B=0
mem_stacks_B=0
heap_tree=empty
#-----------
snapshot=1
#-----------
time=1200
mem_heap_B=1048576
mem_heap_extra_B=512
mem_stacks_B=1536
heap_tree=peak
n1: 1048576 (page allocation syscalls) mmap/mremap/brk, --alloc-fns, etc.
#-----------
snapshot=2
#-----------
time=2400
mem_heap_B=8192
mem_heap_extra_B=0
mem_stacks_B=0
heap_tree=empty
";

    #[test]
    fn test_parse_snapshots() {
        let profile = Profile::from_str(PROFILE).unwrap();

        assert_eq!(
            profile.snapshots(),
            [
                Snapshot::new(0, 4096, 0, 0),
                Snapshot::new(1, 1048576, 512, 1536),
                Snapshot::new(2, 8192, 0, 0),
            ]
        );
    }

    #[test]
    fn test_peak() {
        let profile = Profile::from_str(PROFILE).unwrap();

        assert_eq!(profile.peak().map(Snapshot::index), Some(1));
        assert_eq!(profile.peak().map(Snapshot::total), Some(1048576 + 512 + 1536));
    }

    #[test]
    fn test_peak_at_last_snapshot() {
        let profile = Profile::from_str("snapshot=0\nmem_heap_B=1\nsnapshot=1\nmem_heap_B=2\n")
            .unwrap();

        assert_eq!(profile.peak().map(Snapshot::index), Some(1));
        assert_eq!(profile.peak().map(Snapshot::total), Some(2));
    }

    #[test]
    fn test_peak_tie_is_first() {
        let profile = Profile::from_str("snapshot=0\nmem_stacks_B=5\nsnapshot=1\nmem_heap_B=5\n")
            .unwrap();

        assert_eq!(profile.peak().map(Snapshot::index), Some(0));
    }

    #[test]
    fn test_spaces_around_equals() {
        let profile = Profile::from_str("snapshot = 3\nmem_heap_B = 10\n").unwrap();

        assert_eq!(profile.snapshots(), [Snapshot::new(3, 10, 0, 0)]);
    }

    #[test]
    fn test_invalid_value() {
        assert_eq!(
            Profile::from_str("snapshot=0\nmem_heap_B=-1\n"),
            Err(ParseMassifError::InvalidValue {
                line: 2,
                key: String::from("mem_heap_B"),
                value: String::from("-1"),
            })
        );
    }

    #[test]
    fn test_measurement_before_snapshot() {
        assert_eq!(
            Profile::from_str("mem_stacks_B=0\nsnapshot=0\n"),
            Err(ParseMassifError::MeasurementBeforeSnapshot {
                line: 1,
                key: String::from("mem_stacks_B"),
            })
        );
    }

    #[test]
    fn test_no_snapshots() {
        assert_eq!(
            Profile::from_str("desc: (none)\n"),
            Err(ParseMassifError::NoSnapshots)
        );
    }
}
