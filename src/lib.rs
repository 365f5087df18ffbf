//! Load a CSV file, search it case-insensitively across one or all columns
//! and export what is shown.

pub mod controller;
pub mod domain;
pub mod export;
pub mod highlight;
pub mod inputter;
pub mod loader;
pub mod model;
pub mod pagination;
pub mod parser;
pub mod search;
pub mod table;
pub mod ui;

pub use domain::{AppConfig, Error};
pub use export::export;
pub use loader::{DirectoryAccess, FileAccess, LoadError, MemoryAccess};
pub use parser::{EmptyInputError, parse};
pub use search::{MatchResult, SearchScope, search};
pub use table::{Cell, Row, Table};
