//! Whole-file load and save

use std::fs::{self, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::Result;
use crate::store::{CaseMode, Store};
use crate::write::WriteOptions;

/// Read and parse an INI file.
pub fn load_file(path: &Path, case: CaseMode) -> Result<Store> {
    let file = fs::File::open(path)?;
    let mut store = Store::new(case);
    store.read_from(BufReader::new(file))?;
    Ok(store)
}

/// Serialize `store` into `path`, replacing any previous content.
///
/// `mode` sets the Unix permission bits when the file is created; it is
/// ignored elsewhere.
pub fn save_file(
    path: &Path,
    store: &Store,
    header: &str,
    options: &WriteOptions,
    mode: Option<u32>,
) -> Result<()> {
    let mut open = OpenOptions::new();
    open.write(true).create(true).truncate(true);
    apply_mode(&mut open, mode);

    let file = open.open(path)?;
    store.write_to(BufWriter::new(file), header, options)?;
    Ok(())
}

#[cfg(unix)]
fn apply_mode(open: &mut OpenOptions, mode: Option<u32>) {
    use std::os::unix::fs::OpenOptionsExt;

    if let Some(mode) = mode {
        open.mode(mode);
    }
}

#[cfg(not(unix))]
fn apply_mode(_open: &mut OpenOptions, _mode: Option<u32>) {}
