//! Loading documents and stopword lists from disk.

use crate::document::{Document, PlainDocument};
use crate::error::Result;
use crate::stopwords::StopwordSource;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Regular files directly inside `dir`, sorted by path.
fn files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Every file in the directory becomes one plain-text document.
pub fn load_text_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    let mut documents = Vec::new();
    for file in files_in(dir)? {
        let bytes = fs::read(&file)?;
        documents.push(PlainDocument { text: String::from_utf8_lossy(&bytes).into_owned() }.into());
    }
    info!(dir = %dir.display(), num_docs = documents.len(), "loaded text documents");
    Ok(documents)
}

/// Every file holds one JSON object, or an array of objects, of type `T`.
/// Files that fail to parse are skipped.
pub fn load_json_dir<T, P>(dir: P) -> Result<Vec<Document>>
where
    T: DeserializeOwned + Into<Document>,
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    let mut documents = Vec::new();
    for file in files_in(dir)? {
        let text = fs::read_to_string(&file)?;
        match parse_json::<T>(&text) {
            Ok(parsed) => documents.extend(parsed.into_iter().map(Into::into)),
            Err(err) => warn!(file = %file.display(), error = %err, "skipping unparsable document"),
        }
    }
    info!(dir = %dir.display(), num_docs = documents.len(), "loaded json documents");
    Ok(documents)
}

fn parse_json<T: DeserializeOwned>(text: &str) -> serde_json::Result<Vec<T>> {
    match serde_json::from_str::<serde_json::Value>(text)? {
        serde_json::Value::Array(items) => items.into_iter().map(serde_json::from_value).collect(),
        value => Ok(vec![serde_json::from_value(value)?]),
    }
}

/// One stopword per line.
pub fn load_stopwords<P: AsRef<Path>>(path: P) -> Result<StopwordSource> {
    let text = fs::read_to_string(path)?;
    Ok(StopwordSource::from_text(&text))
}
