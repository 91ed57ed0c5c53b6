//! Imports saved analyses and chat exchanges from disk into documents.
//!
//! `*.json` files hold one serialized [`Document`] or an array of them.
//! `*.txt` files become one analysis document each, keyed by file stem and
//! tagged with the directory they were found in.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::Document;

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    One(Document),
    Many(Vec<Document>),
}

#[derive(Default)]
pub struct HistoryLoader;

impl HistoryLoader {
    pub fn new() -> Self { Self }

    pub fn load_directory(&self, dir: &Path) -> Result<Vec<Document>> {
        self.load_files(dir, self.list_history_files(dir))
    }

    pub fn load_directory_limited(&self, dir: &Path, limit: usize) -> Result<Vec<Document>> {
        let mut files = self.list_history_files(dir);
        if files.len() > limit {
            files.truncate(limit);
            info!(limit, "limited history import");
        }
        self.load_files(dir, files)
    }

    fn load_files(&self, dir: &Path, files: Vec<PathBuf>) -> Result<Vec<Document>> {
        if !dir.is_dir() {
            return Err(Error::NotFound(dir.display().to_string()));
        }
        if files.is_empty() {
            warn!(dir = %dir.display(), "no history files found");
            return Ok(vec![]);
        }
        let mut documents = Vec::new();
        for file_path in &files {
            let loaded = match file_path.extension().and_then(|s| s.to_str()) {
                Some("json") => self.read_json(file_path)?,
                _ => vec![self.read_text(file_path, dir)?],
            };
            documents.extend(loaded);
        }
        info!(files = files.len(), documents = documents.len(), dir = %dir.display(), "loaded history");
        Ok(documents)
    }

    fn read_json(&self, file_path: &Path) -> Result<Vec<Document>> {
        let raw = self.read_file_content(file_path)?;
        let parsed: DocumentFile = serde_json::from_str(&raw)
            .map_err(|source| Error::Json { path: file_path.display().to_string(), source })?;
        Ok(match parsed {
            DocumentFile::One(doc) => vec![doc],
            DocumentFile::Many(docs) => docs,
        })
    }

    fn read_text(&self, file_path: &Path, dir: &Path) -> Result<Document> {
        let content = self.read_file_content(file_path)?;
        let id = self.extract_doc_id(file_path);
        let domain = self.domain_from_path(file_path, dir);
        Ok(Document::analysis(id, content.trim()).with_domain(domain))
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn extract_doc_id(&self, file_path: &Path) -> String {
        file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string())
    }

    fn domain_from_path(&self, file_path: &Path, dir: &Path) -> String {
        let relative_path = file_path.strip_prefix(dir).unwrap_or(file_path);
        match relative_path.parent().and_then(|p| p.to_str()) {
            Some(parent) if !parent.is_empty() => parent.replace('\\', "/"),
            _ => "misc".to_string(),
        }
    }

    fn list_history_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            match path.extension().and_then(|s| s.to_str()) {
                Some("txt") | Some("json") => files.push(path.to_path_buf()),
                _ => {}
            }
        }
        files.sort();
        files
    }
}
