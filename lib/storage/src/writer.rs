// JSON output sink with atomic replace
use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::Serialize;
use simrec_core::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default artifact name inside the output directory
pub const DEFAULT_FILE_NAME: &str = "recommendations.json";

/// Writes a document as pretty-printed JSON into an output directory.
///
/// The document is fully serialized before the file is touched and then
/// swapped in with a rename, so readers see either the old file or the
/// complete new one.
#[derive(Debug, Clone)]
pub struct JsonWriter {
    out_dir: PathBuf,
    file_name: String,
}

impl JsonWriter {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.out_dir.join(&self.file_name)
    }

    /// Serialize `document` and replace the destination file with it
    pub fn write<T: Serialize>(&self, document: &T) -> Result<PathBuf> {
        // serde_json leaves non-ASCII characters unescaped
        let mut bytes = serde_json::to_vec_pretty(document)?;
        bytes.push(b'\n');

        fs::create_dir_all(&self.out_dir)?;
        let path = self.path();
        info!("Saving recommendations to: {:?}", path);

        AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&bytes))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
            })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("site").join("data");
        let path = JsonWriter::new(&out_dir).write(&json!({"a": ["b"]})).unwrap();
        assert_eq!(path, out_dir.join("recommendations.json"));
        assert!(path.is_file());
    }

    #[test]
    fn test_overwrites_and_preserves_non_ascii() {
        let temp_dir = TempDir::new().unwrap();
        let writer = JsonWriter::new(temp_dir.path()).with_file_name("out.json");
        writer.write(&json!({"old": []})).unwrap();
        let path = writer.write(&json!({"Amélie": ["東京物語"]})).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Amélie"));
        assert!(content.contains("東京物語"));
        assert!(!content.contains("old"));
        assert!(content.contains("\n  \"Amélie\""));
    }
}
