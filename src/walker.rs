use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions picked up when walking directories
pub const INI_EXTENSIONS: &[&str] = &["ini", "cfg", "conf"];

/// Whether `path` has one of the [`INI_EXTENSIONS`] (case-insensitive).
pub fn is_ini_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            INI_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Walk paths and yield INI file paths, respecting gitignore.
///
/// Paths naming a file are always yielded, whatever their extension.
/// Directories contribute only files matching [`is_ini_file`].
pub fn walk_paths(paths: &[String]) -> impl Iterator<Item = io::Result<PathBuf>> {
    let mut all_files = vec![];

    for path in paths {
        if Path::new(path).is_file() {
            all_files.push(Ok(PathBuf::from(path)));
            continue;
        }

        let walker = WalkBuilder::new(path)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                    if is_file && is_ini_file(entry.path()) {
                        all_files.push(Ok(entry.into_path()));
                    }
                }
                Err(e) => {
                    all_files.push(Err(io::Error::other(e.to_string())));
                }
            }
        }
    }

    all_files.into_iter()
}
