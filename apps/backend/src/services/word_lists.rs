//! Bundled word lists read from a directory on disk.
//!
//! `name.md` files use the keyed `W:`/`T:`/`S:` format; `name.txt` files
//! hold one answer per line.

use std::path::{Path, PathBuf};

use drill_core::{parse, parse_plain, QuizItem};

use crate::error::{ApiError, Result};
use crate::models::WordListInfo;

const EXTENSIONS: [&str; 2] = ["md", "txt"];

pub struct WordListLibrary {
    dir: PathBuf,
}

impl WordListLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Every readable list in the directory, sorted by name.
    ///
    /// Lists that fail to parse are logged and left out.
    pub async fn list(&self) -> Result<Vec<WordListInfo>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(dir = %self.dir.display(), "Word list directory does not exist");
                return Ok(vec![]);
            }
            Err(e) => return Err(io_error(&self.dir, e)),
        };

        let mut lists = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            let path = entry.path();
            let Some(name) = list_name(&path) else {
                continue;
            };

            match read_items(&path).await {
                Ok(items) => lists.push(WordListInfo {
                    name,
                    item_count: items.len(),
                }),
                Err(e) => tracing::warn!(path = %path.display(), "Skipping word list: {}", e),
            }
        }

        lists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lists)
    }

    /// Load the items of the list called `name`.
    pub async fn load(&self, name: &str) -> Result<Vec<QuizItem>> {
        if !is_valid_name(name) {
            return Err(ApiError::BadRequest(format!(
                "Invalid word list name: {:?}",
                name
            )));
        }

        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{}.{}", name, ext));
            let exists = tokio::fs::try_exists(&path)
                .await
                .map_err(|e| io_error(&path, e))?;
            if exists {
                let items = read_items(&path).await?;
                tracing::debug!(list = name, count = items.len(), "Loaded word list");
                return Ok(items);
            }
        }

        Err(ApiError::NotFound(format!("Word list {}", name)))
    }
}

async fn read_items(path: &Path) -> Result<Vec<QuizItem>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => Ok(parse_plain(&content)),
        _ => Ok(parse(&content)?),
    }
}

/// File stem for `.md`/`.txt` files with a usable name.
fn list_name(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_valid_name(stem).then(|| stem.to_string())
}

/// Names map straight to file names, so no separators or dots.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
}

fn io_error(path: &Path, e: std::io::Error) -> ApiError {
    ApiError::Internal(format!("Failed to read {}: {}", path.display(), e))
}
