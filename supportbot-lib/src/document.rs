//! Source document loading
//!
//! The FAQ document is a UTF-8 text file with paragraphs separated by a blank
//! line. It is read once at startup and never changes afterwards; to pick up
//! a new document the service is restarted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::section::{BlankLineSectionizer, Section, SectionMetadata, Sectionizer};
use crate::{Error, Result};

/// Raw document text and where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    /// Read a document fully into memory.
    ///
    /// Fails with [`Error::DocumentNotFound`] when the path does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self {
                path: path.to_path_buf(),
                text,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!("Document not found at path: {}", path.display());
                Err(Error::DocumentNotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Split the document into sections using the given strategy.
    pub fn sectionize(&self, sectionizer: &dyn Sectionizer) -> Vec<Section> {
        let metadata = SectionMetadata {
            source_id: Some(self.path.display().to_string()),
            ..Default::default()
        };
        sectionizer.sectionize(&self.text, metadata)
    }
}

/// A loaded document and its ordered sections.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    document: Document,
    sections: Vec<Section>,
}

impl DocumentStore {
    /// Load and sectionize a document with [`BlankLineSectionizer`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let document = Document::load(path)?;
        Ok(Self::from_document(document, &BlankLineSectionizer))
    }

    /// Sectionize an already loaded document.
    #[must_use]
    pub fn from_document(document: Document, sectionizer: &dyn Sectionizer) -> Self {
        let sections = document.sectionize(sectionizer);
        info!(
            path = %document.path.display(),
            sections = sections.len(),
            strategy = sectionizer.name(),
            "Successfully loaded and processed document"
        );
        Self { document, sections }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Sections in document order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_open_sectionizes_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Reset your password via the settings page.\n\nRefunds are processed within 14 days.\n"
        )
        .unwrap();

        let store = DocumentStore::open(file.path()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.sections()[1].content,
            "Refunds are processed within 14 days."
        );
        assert_eq!(
            store.sections()[0].metadata.source_id.as_deref(),
            Some(file.path().display().to_string().as_str())
        );
    }

    #[test]
    fn test_missing_file_is_document_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        let err = DocumentStore::open(&missing).unwrap_err();

        match err {
            Error::DocumentNotFound(path) => assert_eq!(path, missing),
            other => panic!("expected DocumentNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_has_no_sections() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let store = DocumentStore::open(file.path()).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.document().text, "");
    }
}
