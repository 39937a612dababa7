//! INI configuration documents with `%(name)s` unfolding.
//!
//! A [`Store`] maps sections to options to raw string values and always has
//! a [`DEFAULT_SECTION`] whose options are inherited by every other section.
//! Text is read with [`parse_str`] / [`Store::read_from`], values are queried
//! with [`Store::string`] and friends, and [`serialize`] writes canonical
//! INI back out.
//!
//! ```
//! let store: inifold::Store = "[S]\na=1\nb=%(a)s-2\n".parse().unwrap();
//! assert_eq!(store.string("S", "b").unwrap(), "1-2");
//! ```

pub mod colors;
pub mod config;
mod error;
mod file;
pub mod lint;
mod output;
mod parse;
pub mod progress;
mod resolve;
mod store;
pub mod walker;
mod write;

pub use colors::{should_use_colors, Colors};
pub use config::{
    find_config_file, generate_init_file, load_config, merge_settings, CliSettings, ConfigError,
    InifoldToml, INIFOLD_TOML_TEMPLATE,
};
pub use error::{Error, Malformed, Result, ValueKind};
pub use file::{load_file, save_file};
pub use lint::{lint_content, LintResult, Problem, ProblemKind, Settings};
pub use output::{print_diff, Action, Config, OutputContext, OutputMode, RunResult};
pub use parse::parse_str;
pub use progress::ProgressReporter;
pub use resolve::parse_bool;
pub use store::{CaseMode, Store, DEFAULT_SECTION, MAX_DEPTH};
pub use walker::walk_paths;
pub use write::{serialize, unwritable, CommentMarker, Separator, Unwritable, WriteOptions};

use std::fs;
use std::io;
use std::path::Path;

const BINARY_CHECK_SIZE: usize = 8192;

/// Check if content is binary by looking for null bytes in first 8192 bytes
pub fn is_binary(content: &[u8]) -> bool {
    let check_len = content.len().min(BINARY_CHECK_SIZE);
    content[..check_len].contains(&0)
}

/// Check or format every INI file under `paths`
pub fn run(paths: &[String], config: &Config, ctx: &OutputContext) -> io::Result<RunResult> {
    let mut result = RunResult::default();

    // Count files for progress bar (2-pass approach)
    let file_count: u64 = walk_paths(paths).filter_map(|r| r.ok()).count() as u64;

    let progress = ProgressReporter::new(file_count, ctx.show_progress);

    for path in walk_paths(paths) {
        let path = path?;
        progress.start(&path);

        if let Err(e) = process_file(&path, config, &mut result, ctx) {
            result.files_with_problems += 1;
            if ctx.mode != OutputMode::Quiet {
                progress.suspend(|| eprintln!("Error processing {}: {e}", path.display()));
            }
        }

        progress.done();
    }

    drop(progress);

    output::print_summary(&result, config, ctx);

    Ok(result)
}

fn process_file(
    path: &Path,
    config: &Config,
    result: &mut RunResult,
    ctx: &OutputContext,
) -> io::Result<()> {
    let bytes = fs::read(path)?;

    if is_binary(&bytes) {
        if ctx.verbose {
            output::print_skipped(path, "binary", ctx);
        }
        return Ok(());
    }

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(_) => {
            if ctx.verbose {
                output::print_skipped(path, "non-UTF-8", ctx);
            }
            return Ok(());
        }
    };

    result.files_checked += 1;
    let lint = lint_content(&content, &config.settings);

    match config.action {
        Action::Check => {
            if lint.has_problems() {
                result.files_with_problems += 1;
                result.problems += lint.problems.len();
                output::print_problems(path, &lint, ctx);
            } else if ctx.verbose {
                output::print_checked(path, ctx);
            }
        }
        Action::Format => {
            if lint.blocks_rewrite() {
                // Not parsed, or the canonical form would change values
                result.files_with_problems += 1;
                result.problems += lint.problems.len();
                output::print_problems(path, &lint, ctx);
            } else if !lint.has_changes() {
                if ctx.verbose {
                    output::print_checked(path, ctx);
                }
            } else if config.check_only {
                result.files_with_problems += 1;
                output::print_unformatted(path, &lint, ctx);
            } else {
                fs::write(path, &lint.content)?;
                result.files_fixed += 1;
                output::print_fix_result(path, &lint, ctx);
            }
        }
    }

    Ok(())
}
