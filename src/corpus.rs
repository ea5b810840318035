//! Document sources for hosts that rank files on disk.
//!
//! The ranker itself only sees already-materialized text; read failures surface here,
//! before any ranking happens.

use crate::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A loaded document with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Origin (file path, or the corpus file for line-based corpora).
    pub path: PathBuf,
    /// Raw UTF-8 text.
    pub text: String,
}

/// Read every `.txt` file directly inside `dir`, sorted by file name.
///
/// Sorting keeps document ids stable across runs. Subdirectories are not visited.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<SourceDocument>, Error> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let path = entry.map_err(io_err(dir))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(Error::EmptyCorpus(dir.to_path_buf()));
    }
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path).map_err(io_err(&path))?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "read document");
        docs.push(SourceDocument { path, text });
    }
    tracing::info!(dir = %dir.display(), docs = docs.len(), "loaded documents");
    Ok(docs)
}

/// Read a corpus file with one document per line.
///
/// Blank lines are kept as (empty) documents so line numbers and document ids agree.
pub fn load_lines(file: impl AsRef<Path>) -> Result<Vec<SourceDocument>, Error> {
    let file = file.as_ref();
    let text = fs::read_to_string(file).map_err(io_err(file))?;
    let docs: Vec<SourceDocument> = text
        .lines()
        .map(|line| SourceDocument {
            path: file.to_path_buf(),
            text: line.to_string(),
        })
        .collect();
    tracing::info!(file = %file.display(), docs = docs.len(), "loaded documents");
    Ok(docs)
}

/// Borrow the texts of loaded documents, in order, for [`crate::rank`].
pub fn texts(docs: &[SourceDocument]) -> Vec<&str> {
    docs.iter().map(|d| d.text.as_str()).collect()
}
