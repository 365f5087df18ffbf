use std::path::PathBuf;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

use crate::loader::LoadError;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::parser::EmptyInputError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    EmptyInput(#[from] EmptyInputError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid path {0}")]
    InvalidPath(String),
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct AppConfig {
    /// Directory the CSV files are read from.
    #[setters(into)]
    pub data_dir: PathBuf,
    /// Known file names. Empty means every CSV file in `data_dir`.
    pub files: Vec<String>,
    /// Directory `search-results.csv` is written to.
    #[setters(into)]
    pub export_dir: PathBuf,
    pub page_size: usize,
    pub event_poll_time: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("csv-data"),
            files: Vec::new(),
            export_dir: PathBuf::from("."),
            page_size: DEFAULT_PAGE_SIZE,
            event_poll_time: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Exit,
    Enter,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    CyclePageSize,
    CycleScope,
    Search,
    OpenFiles,
    Export,
    CopyRow,
    Help,
    Reload,
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
/        search (typing filters live, Enter/Esc leaves the input)
Tab      change search column (all, then each column)
Esc      clear the search term
Up/Down  select row
Left/h   previous page
Right/l  next page
+        change page size (5, 10, 25, 50)
o        choose a file
r        reload the current file
e        export shown rows to search-results.csv
y        copy selected row to the clipboard
?        this help
q        quit";
