use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::domain::Error;
use crate::parser::{BOM, parse};
use crate::table::Table;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load {0}: Not Found")]
    NotFound(String),
    #[error("Failed to load {0}: Permission Denied")]
    PermissionDenied(String),
    #[error("Failed to load {0}: Not a file")]
    NotAFile(String),
    #[error("Failed to load {0}: File is not valid UTF-8")]
    InvalidEncoding(String),
    #[error("Failed to load {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves a file name to its text content.
pub trait FileAccess {
    fn load_file(&self, name: &str) -> Result<String, LoadError>;

    fn exists(&self, name: &str) -> bool;

    /// Names of all CSV files the source offers, sorted.
    fn list(&self) -> Vec<String>;
}

/// Reads files from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryAccess {
    root: PathBuf,
}

impl DirectoryAccess {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FileAccess for DirectoryAccess {
    fn load_file(&self, name: &str) -> Result<String, LoadError> {
        let path = self.resolve(name);
        let metadata = fs::metadata(&path).map_err(|e| io_error(name, e))?;
        if !metadata.is_file() {
            return Err(LoadError::NotAFile(name.to_string()));
        }
        let bytes = fs::read(&path).map_err(|e| io_error(name, e))?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        let text =
            String::from_utf8(bytes).map_err(|_| LoadError::InvalidEncoding(name.to_string()))?;
        Ok(match text.strip_prefix(BOM) {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }

    fn list(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_csv_extension(path))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

fn io_error(name: &str, err: std::io::Error) -> LoadError {
    match err.kind() {
        ErrorKind::NotFound => LoadError::NotFound(name.to_string()),
        ErrorKind::PermissionDenied => LoadError::PermissionDenied(name.to_string()),
        _ => LoadError::Io {
            name: name.to_string(),
            source: err,
        },
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// In-memory files, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccess {
    files: HashMap<String, String>,
}

impl MemoryAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }
}

impl FileAccess for MemoryAccess {
    fn load_file(&self, name: &str) -> Result<String, LoadError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .keys()
            .filter(|name| has_csv_extension(Path::new(name)))
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// The selectable files: `known` filtered by existence, or every CSV file the
/// source lists when `known` is empty.
pub fn available_files(access: &dyn FileAccess, known: &[String]) -> Vec<String> {
    if known.is_empty() {
        return access.list();
    }
    known
        .iter()
        .filter(|name| {
            let exists = access.exists(name);
            if !exists {
                warn!("File {name} not found");
            }
            exists
        })
        .cloned()
        .collect()
}

/// Loads and parses `name`.
#[instrument(skip(access))]
pub fn load_table(access: &dyn FileAccess, name: &str) -> Result<Table, Error> {
    let text = access.load_file(name)?;
    let table = parse(&text)?;
    info!(
        "Loaded {name}: {} rows, {} columns",
        table.nrows(),
        table.headers().len()
    );
    Ok(table)
}
