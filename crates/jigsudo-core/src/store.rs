//! Daily file persistence.

use crate::daily::{DailyBoard, DailyGenerator};
use crate::document::PuzzleDocument;
use crate::error::Result;
use crate::seed::DailySeed;
use crate::sudoku::SudokuSource;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Write `doc` as pretty JSON to `dir/file_name`.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// reader never sees a partial document.
pub fn write_document(dir: &Path, file_name: &str, doc: &PuzzleDocument) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(doc)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;

    let path = dir.join(file_name);
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(path)
}

pub fn read_document(path: &Path) -> Result<PuzzleDocument> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Generate, verify and persist the board for `seed`.
///
/// Nothing is written unless generation succeeds and the document passes
/// [`PuzzleDocument::verify`].
pub fn generate_daily<S: SudokuSource>(
    generator: &mut DailyGenerator<S>,
    seed: &DailySeed,
    out_dir: &Path,
) -> Result<(DailyBoard, PathBuf)> {
    let board = generator.run(seed)?;
    let doc = board.to_document();
    doc.verify()?;
    let path = write_document(out_dir, &seed.file_name(), &doc)?;
    info!(path = %path.display(), "daily file written");
    Ok((board, path))
}
