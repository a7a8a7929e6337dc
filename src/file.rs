// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    time::SystemTime,
};

use crate::csv::{artifact_name, write_doc};
use crate::error::WriteError;
use crate::model::RaceCardDocument;

static TMP_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Encode `doc` into `out_dir/<artifact name>`.
///
/// Written to a hidden sibling first and renamed into place, so readers never
/// see a half-written card. An existing file with the same name is replaced.
pub fn write_artifact(out_dir: &Path, doc: &RaceCardDocument) -> Result<PathBuf, WriteError> {
    ensure_directory(out_dir)?;

    let name = artifact_name(doc);
    let path = out_dir.join(&name);
    // unique per write: two pairs may resolve to the same card name
    let n = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = out_dir.join(format!(".{name}.{}-{n}.part", std::process::id()));

    let part = PartFile::new(tmp);
    let file = File::create(&part.path).map_err(io_err(&part.path))?;
    encode_into(file, doc, &part.path)?;

    fs::rename(&part.path, &path).map_err(io_err(&path))?;
    part.keep();
    Ok(path)
}

/// Encode `doc` through a buffer into `w`; `tmp` names the target in errors.
fn encode_into<W: Write>(w: W, doc: &RaceCardDocument, tmp: &Path) -> Result<(), WriteError> {
    let mut out = BufWriter::new(w);
    write_doc(&mut out, doc)?;
    out.flush().map_err(io_err(tmp))
}

/// Hidden temp file that is removed on drop unless `keep` was called.
struct PartFile {
    path: PathBuf,
    keep: bool,
}

impl PartFile {
    fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.keep {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> WriteError {
    let path = path.to_path_buf();
    move |source| WriteError::Io { path, source }
}

pub fn ensure_directory(dir: &Path) -> Result<(), WriteError> {
    if dir.exists() && !dir.is_dir() {
        return Err(WriteError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
    }
    Ok(())
}

/// Oldest first by modification time; unreadable mtimes sort first, ties keep order.
pub fn sort_by_mtime(paths: &mut [PathBuf]) {
    paths.sort_by_key(|p| {
        fs::metadata(p)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH)
    });
}

/// Final path component as text, for attachment names.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
