use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use inifold::colors::Style;
use inifold::{
    find_config_file, generate_init_file, load_config, load_file, merge_settings, run, save_file,
    serialize, should_use_colors, unwritable, Action, CliSettings, Colors, CommentMarker, Config,
    InifoldToml, OutputContext, OutputMode, Separator, Settings, Store,
};

/// Permission bits for files created by `set`
const NEW_FILE_MODE: u32 = 0o644;

#[derive(Parser)]
#[command(name = "inifold")]
#[command(version, about = "Query, edit and canonicalize INI configuration files")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Specify config file path (overrides auto-discovery of inifold.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output only file names
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Also report files without problems
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Force colored output
    #[arg(long, global = true)]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Match section and option names case-insensitively
    #[arg(long, global = true)]
    case_insensitive: bool,

    /// Maximum %(name)s substitution passes per value
    #[arg(long, global = true, value_name = "N", value_parser = parse_depth)]
    max_depth: Option<usize>,

    /// Separator for written options: ':' or '='
    #[arg(long, global = true, value_parser = parse_separator)]
    separator: Option<Separator>,

    /// Marker for header comments: '#' or ';'
    #[arg(long, global = true, value_parser = parse_comment)]
    comment: Option<CommentMarker>,

    /// Header comment for written files
    #[arg(long, global = true, value_name = "TEXT")]
    header: Option<String>,

    /// Write a space before the separator
    #[arg(long, global = true, value_name = "BOOL")]
    pre_space: Option<bool>,

    /// Write a space after the separator
    #[arg(long, global = true, value_name = "BOOL")]
    post_space: Option<bool>,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite INI files in canonical form (comments are not kept)
    Fmt {
        /// Check only (no modifications), exit 1 if a file would change
        #[arg(short, long)]
        check: bool,

        /// Show changes in diff format
        #[arg(short, long)]
        diff: bool,

        /// Target files or directories
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Parse files and unfold every value, exit 1 if problems are found
    Check {
        /// Target files or directories
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print one value
    Get {
        file: PathBuf,
        section: String,
        option: String,

        /// Print the stored value without unfolding %(name)s references
        #[arg(long, conflicts_with = "value_type")]
        raw: bool,

        /// Interpret the value as this type
        #[arg(long = "type", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,
    },
    /// Set a value, creating the file or section if needed
    Set {
        file: PathBuf,
        section: String,
        option: String,
        value: String,
    },
    /// Remove an option, or a whole section when no option is given
    Unset {
        file: PathBuf,
        section: String,
        option: Option<String>,
    },
    /// List sections, or the options visible from one section
    List {
        file: PathBuf,
        section: Option<String>,
    },
    /// Generate a template inifold.toml configuration file
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueType {
    String,
    Bool,
    Int,
    Float,
}

fn parse_separator(s: &str) -> Result<Separator, String> {
    match s {
        ":" => Ok(Separator::Colon),
        "=" => Ok(Separator::Equals),
        _ => Err(format!("expected ':' or '=', got '{s}'")),
    }
}

fn parse_depth(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".into()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_comment(s: &str) -> Result<CommentMarker, String> {
    match s {
        "#" => Ok(CommentMarker::Hash),
        ";" => Ok(CommentMarker::Semicolon),
        _ => Err(format!("expected '#' or ';', got '{s}'")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Init = cli.command {
        return handle_init();
    }

    // Merge configurations: CLI > TOML > defaults
    let toml_config = load_configuration(&cli.config, cli.quiet);
    let settings = merge_settings(&build_cli_settings(&cli), toml_config.as_ref());
    let use_colors = should_use_colors(cli.color, cli.no_color);

    let outcome = match &cli.command {
        Command::Fmt { check, diff, paths } => {
            let mode = if cli.quiet {
                OutputMode::Quiet
            } else if *diff {
                OutputMode::Diff
            } else {
                OutputMode::Normal
            };
            run_batch(paths, Action::Format, *check, mode, settings, use_colors, &cli)
        }
        Command::Check { paths } => {
            let mode = if cli.quiet {
                OutputMode::Quiet
            } else {
                OutputMode::Normal
            };
            run_batch(paths, Action::Check, false, mode, settings, use_colors, &cli)
        }
        Command::Get {
            file,
            section,
            option,
            raw,
            value_type,
        } => handle_get(file, section, option, *raw, *value_type, &settings),
        Command::Set {
            file,
            section,
            option,
            value,
        } => handle_set(file, section, option, value, &settings),
        Command::Unset {
            file,
            section,
            option,
        } => handle_unset(file, section, option.as_deref(), &settings),
        Command::List { file, section } => handle_list(file, section.as_deref(), &settings),
        Command::Init => return handle_init(),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            let colors = Colors::new(use_colors);
            eprintln!("{} {e}", colors.paint(Style::Error, "Error:"));
            ExitCode::from(1)
        }
    }
}

fn run_batch(
    paths: &[String],
    action: Action,
    check_only: bool,
    mode: OutputMode,
    settings: Settings,
    use_colors: bool,
    cli: &Cli,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let show_progress = !cli.quiet && std::io::IsTerminal::is_terminal(&std::io::stderr());
    let ctx = OutputContext::new(mode, use_colors, cli.verbose, show_progress);

    let config = Config {
        action,
        check_only,
        settings,
    };

    let result = run(paths, &config, &ctx)?;
    if result.has_problems() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn open_store(path: &Path, settings: &Settings) -> inifold::Result<Store> {
    load_file(path, settings.case).map(|store| store.with_max_depth(settings.max_depth))
}

fn handle_get(
    file: &Path,
    section: &str,
    option: &str,
    raw: bool,
    value_type: ValueType,
    settings: &Settings,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = open_store(file, settings)?;

    let value = if raw {
        store.raw_string(section, option)?
    } else {
        match value_type {
            ValueType::String => store.string(section, option)?,
            ValueType::Bool => store.bool(section, option)?.to_string(),
            ValueType::Int => store.int(section, option)?.to_string(),
            ValueType::Float => store.float(section, option)?.to_string(),
        }
    };

    println!("{value}");
    Ok(ExitCode::SUCCESS)
}

fn handle_set(
    file: &Path,
    section: &str,
    option: &str,
    value: &str,
    settings: &Settings,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut store = if file.exists() {
        open_store(file, settings)?
    } else {
        settings.new_store()
    };

    store.add_option(section, option, value);
    ensure_writable(&store, settings)?;
    save_file(
        file,
        &store,
        &settings.header,
        &settings.write,
        Some(NEW_FILE_MODE),
    )?;
    Ok(ExitCode::SUCCESS)
}

fn handle_unset(
    file: &Path,
    section: &str,
    option: Option<&str>,
    settings: &Settings,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut store = open_store(file, settings)?;

    let removed = match option {
        Some(option) => store.remove_option(section, option),
        None => store.remove_section(section),
    };

    if !removed {
        let target = match option {
            Some(option) => format!("option '{option}' in section '{section}'"),
            None => format!("section '{section}'"),
        };
        return Err(format!("nothing to remove: {target}").into());
    }

    ensure_writable(&store, settings)?;
    save_file(file, &store, &settings.header, &settings.write, None)?;
    Ok(ExitCode::SUCCESS)
}

/// Refuse to save a store whose written form would read back differently.
fn ensure_writable(store: &Store, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let text = serialize(store, &settings.header, &settings.write);
    match unwritable(store, &text).into_iter().next() {
        None => Ok(()),
        Some(item) => {
            let target = match item.option {
                Some(option) => format!("option '{option}' in section '{}'", item.section),
                None => format!("section '{}'", item.section),
            };
            Err(format!("cannot be written as INI without changing it: {target}").into())
        }
    }
}

fn handle_list(
    file: &Path,
    section: Option<&str>,
    settings: &Settings,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = open_store(file, settings)?;

    let names = match section {
        Some(section) => store.options(section)?,
        None => store.sections(),
    };
    for name in names {
        println!("{name}");
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_init() -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn load_configuration(explicit_path: &Option<PathBuf>, quiet: bool) -> Option<InifoldToml> {
    let config_path = explicit_path.clone().or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|d| find_config_file(&d))
    });

    config_path.and_then(|p| match load_config(&p) {
        Ok(config) => {
            if !quiet {
                eprintln!("Using config: {}", p.display());
            }
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: Failed to load {}: {}", p.display(), e);
            None
        }
    })
}

fn build_cli_settings(cli: &Cli) -> CliSettings {
    // Boolean flags in clap are always present (default false), so we
    // treat false as "not set" for proper merging with config file.
    CliSettings {
        comment: cli.comment,
        separator: cli.separator,
        pre_space: cli.pre_space,
        post_space: cli.post_space,
        header: cli.header.clone(),
        case_insensitive: cli.case_insensitive.then_some(true),
        max_depth: cli.max_depth,
    }
}
