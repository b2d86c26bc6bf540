//! [`FileSource`] implementations for disk and memory.

use std::path::{Path, PathBuf};

use ember_core::alloc::HashMap;

use crate::error::{ResourceError, ResourceResult};
use crate::services::FileSource;

/// Reads resource files from disk relative to a base path.
#[derive(Debug, Clone)]
pub struct FileReader {
    base_path: PathBuf,
}

impl FileReader {
    /// Create a new file reader with a base path.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// The directory relative paths are resolved against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

impl FileSource for FileReader {
    fn read_all(&self, path: &str) -> ResourceResult<Vec<u8>> {
        let full_path = self.resolve_path(Path::new(path));
        std::fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound {
                    path: full_path.display().to_string(),
                }
            } else {
                ResourceError::Io {
                    path: full_path.clone(),
                    source: e,
                }
            }
        })
    }
}

/// In-memory files for embedded resources and tests.
#[derive(Debug, Default)]
pub struct MemoryReader {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryReader {
    /// Create a new empty memory reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add bytes for a path.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Add bytes from static data.
    pub fn insert_static(&mut self, path: impl Into<String>, bytes: &'static [u8]) {
        self.files.insert(path.into(), bytes.to_vec());
    }

    /// Remove bytes for a path.
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

impl FileSource for MemoryReader {
    fn read_all(&self, path: &str) -> ResourceResult<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_reader_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("hero.png")).unwrap();
        file.write_all(b"IMGhero").unwrap();

        let reader = FileReader::new(dir.path());
        assert_eq!(reader.read_all("hero.png").unwrap(), b"IMGhero");
    }

    #[test]
    fn test_file_reader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let reader = FileReader::new(dir.path());

        let err = reader.read_all("nope.png").unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
    }

    #[test]
    fn test_memory_reader() {
        let mut reader = MemoryReader::new();
        reader.insert_static("ui.plist", b"<plist/>");
        reader.insert("bgm.ogg", vec![1, 2, 3]);

        assert!(reader.contains("ui.plist"));
        assert_eq!(reader.read_all("bgm.ogg").unwrap(), vec![1, 2, 3]);

        reader.remove("bgm.ogg");
        assert!(matches!(
            reader.read_all("bgm.ogg"),
            Err(ResourceError::NotFound { .. })
        ));
    }
}
