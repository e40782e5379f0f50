use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::document::{parse_document, ContentKind, Document, ParseDocumentError};
use crate::index::ContentQuery;

/// Content rooted at a directory. Every query re-reads the tree.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

#[derive(Debug, Error)]
pub enum LoadDocumentsError {
    #[error("ReadDir: {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ReadFile: {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ParseDocument: {source}")]
    ParseDocument {
        #[from]
        source: ParseDocumentError,
    },
}

struct ContentFile {
    relative: String,
    path: PathBuf,
    kind: ContentKind,
}

impl ContentStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn query(&self) -> ContentQuery<'_> {
        ContentQuery::new(self)
    }

    /// Loads every document below the root, ordered by relative path.
    pub fn load_documents(&self) -> Result<Vec<Document>, LoadDocumentsError> {
        let mut files = Vec::new();
        collect_files(&self.root, &self.root, &mut files)?;
        files.sort_by(|a, b| a.relative.cmp(&b.relative));

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            let raw = fs::read_to_string(&file.path).map_err(|source| {
                LoadDocumentsError::ReadFile {
                    path: file.path.clone(),
                    source,
                }
            })?;
            documents.push(parse_document(&file.relative, file.kind, &raw)?);
        }

        debug!(root = %self.root.display(), count = documents.len(), "Loaded content documents");
        Ok(documents)
    }
}

fn collect_files(
    root: &Path,
    dir: &Path,
    out: &mut Vec<ContentFile>,
) -> Result<(), LoadDocumentsError> {
    let read_dir_error = |source| LoadDocumentsError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        // Hidden files and `_drafts`-style entries are not content.
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }

        let path = entry.path();
        // Not followed through symlinks, so a link cycle cannot recurse.
        let file_type = entry.file_type().map_err(read_dir_error)?;
        if file_type.is_dir() {
            collect_files(root, &path, out)?;
            continue;
        }

        let Some(kind) = ContentKind::from_path(&path) else {
            continue;
        };
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        out.push(ContentFile {
            relative,
            path,
            kind,
        });
    }

    Ok(())
}
