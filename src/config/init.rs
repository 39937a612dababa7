//! Template generation for `inifold init`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file::CONFIG_FILE_NAME;

/// Template inifold.toml with documentation
pub const INIFOLD_TOML_TEMPLATE: &str = r##"# inifold.toml - Configuration for the inifold INI tool
#
# inifold reads INI files with [sections], "name = value" / "name: value"
# options, multi-line values and %(name)s references, and rewrites them in
# a canonical layout. The settings below control that layout and how names
# are matched - uncomment and modify as needed.

[format]
# Marker for header comment lines: "#" or ";".
# comment = "#"

# Separator between option names and values: ":" or "=".
# separator = ":"

# Put a space before / after the separator.
# pre_space = false
# post_space = true

# Header comment written at the top of every file inifold writes.
# header = ""

[resolve]
# Treat section and option names case-insensitively (stored lower-cased).
# case_insensitive = false

# Maximum number of %(name)s substitution passes before a value is reported
# as a possible cycle.
# max_depth = 200
"##;

/// Generate inifold.toml in the specified directory (or current directory if None).
///
/// Returns an error if inifold.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(
        || PathBuf::from(CONFIG_FILE_NAME),
        |d| d.join(CONFIG_FILE_NAME),
    );

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{CONFIG_FILE_NAME} already exists"),
        ));
    }

    fs::write(&path, INIFOLD_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate inifold.toml in the current directory.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
