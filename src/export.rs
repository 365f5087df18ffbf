use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::parser::DELIMITER;
use crate::table::Row;

pub const EXPORT_FILE_NAME: &str = "search-results.csv";

/// Serializes `headers` and `rows` to comma separated text.
///
/// Values are joined as they render, without quoting. A value that itself
/// contains a comma or a line break therefore does not survive a parse of the
/// output unchanged.
pub fn export<'a>(headers: &[String], rows: impl IntoIterator<Item = &'a Row>) -> String {
    let sep = DELIMITER.to_string();
    let mut lines = vec![headers.join(&sep)];
    lines.extend(
        rows.into_iter()
            .map(|row| row.values(headers).collect::<Vec<_>>().join(&sep)),
    );
    lines.join("\n")
}

/// Writes `content` to [`EXPORT_FILE_NAME`] inside `dir`, replacing an earlier export.
pub fn write_export(dir: &Path, content: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, content)?;
    info!("Exported {} bytes to {}", content.len(), path.display());
    Ok(path)
}
