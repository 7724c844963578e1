//! Data preparation for charts.
//!
//! Readers here turn loaded profiles into sorted, keyed data sets. Nothing
//! in this module draws; commands assemble the data into chart figures.

pub mod report;
pub mod sampling;

use crate::utils::error::ProfileError;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Which count a scaling chart puts on its x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingAxis {
    #[default]
    Processes,
    Threads,
}

impl ScalingAxis {
    pub fn from_threads_flag(threads: bool) -> Self {
        if threads {
            Self::Threads
        } else {
            Self::Processes
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Processes => "Number of Processes",
            Self::Threads => "Number of Threads",
        }
    }
}

/// Read a list of profile paths, one per line
///
/// Lines are trimmed and blank lines ignored.
pub fn read_file_list(path: impl AsRef<Path>) -> Result<Vec<PathBuf>, ProfileError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let files: Vec<PathBuf> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect();

    debug!("Read {} file names from {}", files.len(), path.display());
    Ok(files)
}

/// Load every file with `load`
///
/// **Public** - shared batch reader for chart commands
///
/// # Arguments
/// * `files` - Paths to load, in order
/// * `load` - Loader for one file
/// * `skip_unreadable` - Log and skip files that cannot be read instead of failing
///
/// # Errors
/// The first loader error, except read failures when `skip_unreadable` is set.
/// A file that reads but does not parse is always an error.
pub fn load_each<T, F>(
    files: &[PathBuf],
    load: F,
    skip_unreadable: bool,
) -> Result<Vec<(PathBuf, T)>, ProfileError>
where
    F: Fn(&Path) -> Result<T, ProfileError>,
{
    let mut loaded = Vec::with_capacity(files.len());

    for file in files {
        match load(file) {
            Ok(item) => loaded.push((file.clone(), item)),
            Err(ProfileError::ReadFailed(_)) if skip_unreadable => {
                warn!("File {} does not exist. Skipping.", file.display());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(loaded)
}

/// Last path component, used to label data by file
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_read_file_list() {
        let mut list = NamedTempFile::new().unwrap();
        writeln!(list, "  a.json \n\nb.json\n   \n").unwrap();

        let files = read_file_list(list.path()).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    }

    #[test]
    fn test_load_each_skip_unreadable() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("present.json");
        std::fs::write(&present, "{}").unwrap();
        let files = vec![dir.path().join("missing.json"), present.clone()];

        let load = |p: &Path| crate::output::load_document(p);

        let loaded = load_each(&files, load, true).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, present);

        assert!(matches!(
            load_each(&files, load, false),
            Err(ProfileError::ReadFailed(_))
        ));
    }

    #[test]
    fn test_unparseable_file_is_not_skipped() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();

        let result = load_each(&[bad], |p| crate::output::load_document(p), true);
        assert!(matches!(result, Err(ProfileError::JsonError(_))));
    }

    #[test]
    fn test_file_label() {
        assert_eq!(file_label(Path::new("runs/a/p4.json")), "p4.json");
        assert_eq!(ScalingAxis::from_threads_flag(true).label(), "Number of Threads");
    }
}
