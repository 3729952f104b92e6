//! Version-file reader.
//!
//! The client identifier string carries the library version, which is read
//! from a local version file rather than baked into the binary. The file
//! holds a single line with exactly three dot-separated numeric components.

use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;

use crate::{Error, Result};

/// Default version-file location, relative to the working directory.
pub const VERSION_FILE: &str = ".package-version";

static VERSION: OnceCell<String> = OnceCell::new();

/// Current client version from the default version file.
///
/// The file is read once per process; subsequent calls return the cached
/// value. A missing or malformed file is a configuration error, and the read
/// is retried on the next call.
pub fn client_version() -> Result<String> {
    if let Some(version) = VERSION.get() {
        return Ok(version.clone());
    }
    let version = read_version_file(Path::new(VERSION_FILE))?;
    Ok(VERSION.get_or_init(|| version).clone())
}

/// Read and validate a version file at an explicit path.
pub fn read_version_file(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!("cannot read version file {}: {e}", path.display()))
    })?;

    let version = raw.trim();
    let parts: Vec<&str> = version.split('.').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if !well_formed {
        return Err(Error::configuration(format!(
            "version file {} must contain three dot-separated numeric components, got {version:?}",
            path.display()
        )));
    }

    Ok(version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_version_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_well_formed_version() {
        let file = write_version_file("1.2.3\n");
        assert_eq!(read_version_file(file.path()).unwrap(), "1.2.3");
    }

    #[test]
    fn test_rejects_malformed_versions() {
        for contents in ["1.2", "1.2.3.4", "1.2.x", "a.b.c", "", "1..3"] {
            let file = write_version_file(contents);
            let err = read_version_file(file.path()).unwrap_err();
            assert!(
                matches!(err, Error::Configuration { .. }),
                "version {contents:?}"
            );
        }
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = read_version_file(Path::new("does-not-exist.version")).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
