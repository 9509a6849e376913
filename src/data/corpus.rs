// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Scans the standard labelled-image-folder convention:
//
//   corpus/
//     cat/   ← every image in here is a "cat"
//       001.jpg
//       002.jpg
//     dog/   ← every image in here is a "dog"
//       001.jpg
//
// The SORTED subdirectory names fix the label ordering, so the
// same corpus always yields the same LabelSet across runs. An
// explicit label list may be passed instead; the scan then
// validates the directory layout against it and keeps the
// caller's ordering.
//
// Nothing is decoded here — the scan only enumerates paths.
// Decode failures surface later, per file, in the preprocessor.

use std::path::{Path, PathBuf};

use crate::domain::error::ClassifierError;
use crate::domain::label::LabelSet;
use crate::domain::sample::{CorpusIndex, LabeledImage};
use crate::domain::traits::CorpusSource;

/// File extensions treated as corpus images. Matches the codecs
/// the preprocessor can decode.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Scans a corpus root directory into a CorpusIndex.
pub struct CorpusLoader {
    dir:    PathBuf,
    /// Explicit ordered label list; None derives it from the
    /// sorted subdirectory names.
    labels: Option<Vec<String>>,
}

impl CorpusLoader {
    pub fn new(dir: impl Into<PathBuf>, labels: Option<Vec<String>>) -> Self {
        Self { dir: dir.into(), labels }
    }

    /// Collect the label subdirectory names, sorted for a stable
    /// name-to-index mapping across runs.
    fn subdirectories(&self) -> Result<Vec<String>, ClassifierError> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| ClassifierError::corpus(&self.dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ClassifierError::corpus(&self.dir, e))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve the label set: derived from the directory layout,
    /// or the configured list validated against it.
    fn resolve_labels(&self, subdirs: &[String]) -> Result<LabelSet, ClassifierError> {
        match &self.labels {
            None => Ok(LabelSet::new(subdirs.iter().cloned())),
            Some(configured) => {
                for name in configured {
                    if !subdirs.iter().any(|s| s == name) {
                        return Err(ClassifierError::corpus(
                            &self.dir,
                            format!("configured label '{name}' has no subdirectory"),
                        ));
                    }
                }
                Ok(LabelSet::new(configured.iter().cloned()))
            }
        }
    }

    /// List the image files directly under one label directory.
    fn image_files(&self, label_dir: &Path) -> Result<Vec<PathBuf>, ClassifierError> {
        let entries = std::fs::read_dir(label_dir)
            .map_err(|e| ClassifierError::corpus(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ClassifierError::corpus(&self.dir, e))?;
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                files.push(path);
            } else if path.is_file() {
                tracing::debug!("Ignoring non-image file '{}'", path.display());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl CorpusSource for CorpusLoader {
    fn scan(&self) -> Result<CorpusIndex, ClassifierError> {
        if !self.dir.is_dir() {
            return Err(ClassifierError::corpus(&self.dir, "directory does not exist"));
        }

        let subdirs = self.subdirectories()?;
        if subdirs.is_empty() {
            return Err(ClassifierError::corpus(&self.dir, "no label subdirectories"));
        }

        let labels = self.resolve_labels(&subdirs)?;

        let mut images = Vec::new();
        for (index, name) in labels.names().iter().enumerate() {
            let files = self.image_files(&self.dir.join(name))?;
            tracing::debug!("Label '{}' ({}): {} images", name, index, files.len());
            for path in files {
                images.push(LabeledImage::new(path, index));
            }
        }

        if images.is_empty() {
            return Err(ClassifierError::corpus(&self.dir, "contains no image files"));
        }

        tracing::info!(
            "Corpus scan: {} images across {} labels ({})",
            images.len(),
            labels.len(),
            labels.names().join(", "),
        );
        Ok(CorpusIndex { labels, images })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("petlens-corpus-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path) {
        fs::write(path, b"not a real image, scan does not decode").unwrap();
    }

    #[test]
    fn test_missing_directory_is_corpus_error() {
        let loader = CorpusLoader::new("/definitely/not/here", None);
        let err = loader.scan().unwrap_err();
        assert!(matches!(err, ClassifierError::Corpus { .. }));
    }

    #[test]
    fn test_empty_directory_is_corpus_error() {
        let dir = scratch_dir("empty");
        let err = CorpusLoader::new(&dir, None).scan().unwrap_err();
        assert!(matches!(err, ClassifierError::Corpus { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_subdirectories_without_images_is_corpus_error() {
        let dir = scratch_dir("noimages");
        fs::create_dir_all(dir.join("cat")).unwrap();
        fs::create_dir_all(dir.join("dog")).unwrap();
        let err = CorpusLoader::new(&dir, None).scan().unwrap_err();
        assert!(matches!(err, ClassifierError::Corpus { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_label_order_is_sorted_directory_names() {
        let dir = scratch_dir("order");
        // Created out of order on purpose; scan must still sort.
        for name in ["dog", "cat"] {
            fs::create_dir_all(dir.join(name)).unwrap();
            touch(&dir.join(name).join("a.png"));
        }
        let index = CorpusLoader::new(&dir, None).scan().unwrap();
        assert_eq!(index.labels.names(), &["cat".to_string(), "dog".to_string()]);
        assert_eq!(index.count_for(0), 1);
        assert_eq!(index.count_for(1), 1);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_configured_labels_keep_their_ordering() {
        let dir = scratch_dir("configured");
        for name in ["cat", "dog"] {
            fs::create_dir_all(dir.join(name)).unwrap();
            touch(&dir.join(name).join("a.jpg"));
        }
        let loader = CorpusLoader::new(&dir, Some(vec!["dog".into(), "cat".into()]));
        let index = loader.scan().unwrap();
        assert_eq!(index.labels.get(0), Some("dog"));
        assert_eq!(index.labels.get(1), Some("cat"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_configured_label_without_directory_fails() {
        let dir = scratch_dir("mismatch");
        fs::create_dir_all(dir.join("cat")).unwrap();
        touch(&dir.join("cat").join("a.jpg"));
        let loader = CorpusLoader::new(&dir, Some(vec!["cat".into(), "dog".into()]));
        assert!(loader.scan().is_err());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_non_image_files_are_ignored() {
        let dir = scratch_dir("mixed");
        fs::create_dir_all(dir.join("cat")).unwrap();
        touch(&dir.join("cat").join("a.png"));
        touch(&dir.join("cat").join("notes.txt"));
        let index = CorpusLoader::new(&dir, None).scan().unwrap();
        assert_eq!(index.images.len(), 1);
        fs::remove_dir_all(&dir).ok();
    }
}
