//! Read-only asset bundle access.
//!
//! The pipeline consumes models and the label map purely as "bytes for a
//! name"; everything else about packaging stays behind this boundary.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A directory of read-only model and label assets
#[derive(Debug, Clone)]
pub struct AssetBundle {
    dir: PathBuf,
}

impl AssetBundle {
    /// Open an asset bundle rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(Error::Asset(format!(
                "Asset directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load model bytes by asset name.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset cannot be read.
    pub fn model_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        fs::read(&path)
            .map_err(|e| Error::Asset(format!("Failed to read model {}: {e}", path.display())))
    }

    /// Load label-map JSON by asset name.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset cannot be read.
    pub fn label_map_json(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path)
            .map_err(|e| Error::Asset(format!("Failed to read label map {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("slr-assets-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(AssetBundle::new("/definitely/not/a/real/bundle").is_err());
    }

    #[test]
    fn test_reads_assets_by_name() {
        let dir = scratch_dir("read");
        fs::write(dir.join("model.onnx"), b"model bytes").unwrap();
        fs::write(dir.join("label_map.json"), r#"{"hello": 0}"#).unwrap();

        let bundle = AssetBundle::new(&dir).unwrap();
        assert_eq!(bundle.model_bytes("model.onnx").unwrap(), b"model bytes");
        assert_eq!(bundle.label_map_json("label_map.json").unwrap(), r#"{"hello": 0}"#);
        assert!(bundle.model_bytes("missing.onnx").is_err());

        fs::remove_dir_all(&dir).ok();
    }
}
