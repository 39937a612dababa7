use crate::colors::{Colors, Style};
use crate::lint::{LintResult, Problem, ProblemKind, Settings};
use similar::{ChangeTag, TextDiff};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Normal,
    Quiet,
    Diff,
}

/// What `run` does with each file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Parse and unfold every value, report problems
    Check,
    /// Rewrite files in canonical form
    Format,
}

pub struct Config {
    pub action: Action,
    /// With [`Action::Format`]: report files that would change, write nothing
    pub check_only: bool,
    pub settings: Settings,
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub colors: Colors,
    pub verbose: bool,
    pub show_progress: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, use_colors: bool, verbose: bool, show_progress: bool) -> Self {
        Self {
            mode,
            colors: Colors::new(use_colors),
            verbose,
            show_progress,
        }
    }

    fn label(&self, style: Style, text: &str) -> String {
        self.colors.paint(style, text)
    }
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub files_checked: usize,
    pub files_fixed: usize,
    pub files_with_problems: usize,
    pub problems: usize,
}

impl RunResult {
    pub fn has_problems(&self) -> bool {
        self.files_with_problems > 0
    }
}

pub fn describe_problem(problem: &Problem) -> String {
    let text = match &problem.kind {
        // Parser messages already carry their line
        ProblemKind::Malformed { message } => return message.clone(),
        ProblemKind::UnresolvedReference {
            section,
            option,
            name,
        } => format!("[{section}] {option}: unresolved reference %({name})s"),
        ProblemKind::Cycle {
            section,
            option,
            limit,
        } => format!("[{section}] {option}: possible cycle (gave up after {limit} passes)"),
        ProblemKind::NotRepresentable {
            section,
            option: Some(option),
        } => format!("[{section}] {option}: cannot be rewritten without changing its value"),
        ProblemKind::NotRepresentable {
            section,
            option: None,
        } => format!("[{section}]: section name cannot be rewritten unchanged"),
    };

    match problem.line {
        Some(line) => format!("line {line}: {text}"),
        None => text,
    }
}

pub fn print_problems(path: &Path, result: &LintResult, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        println!("{}", path.display());
        return;
    }

    println!("{} {}", ctx.label(Style::Error, "Error:"), path.display());
    for problem in &result.problems {
        println!("  - {}", describe_problem(problem));
    }
}

pub fn print_unformatted(path: &Path, result: &LintResult, ctx: &OutputContext) {
    match ctx.mode {
        OutputMode::Quiet => println!("{}", path.display()),
        OutputMode::Diff => {
            print_diff(&path.display().to_string(), &result.original, &result.content)
        }
        OutputMode::Normal => println!(
            "{} {} is not in canonical form",
            ctx.label(Style::Warning, "Unformatted:"),
            path.display()
        ),
    }
}

pub fn print_fix_result(path: &Path, result: &LintResult, ctx: &OutputContext) {
    match ctx.mode {
        OutputMode::Quiet => println!("{}", path.display()),
        OutputMode::Diff => {
            print_diff(&path.display().to_string(), &result.original, &result.content)
        }
        OutputMode::Normal => {
            // Unresolved values survive formatting; mention them
            for problem in &result.problems {
                println!(
                    "{} {}: {}",
                    ctx.label(Style::Warning, "Warning:"),
                    path.display(),
                    describe_problem(problem)
                );
            }
            println!("{} {}", ctx.label(Style::Success, "Fixed:"), path.display());
        }
    }
}

pub fn print_checked(path: &Path, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    println!("{} {}", ctx.label(Style::Info, "Checked:"), path.display());
}

pub fn print_skipped(path: &Path, reason: &str, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    println!(
        "{} {}",
        ctx.label(Style::Info, &format!("Skipping {reason}:")),
        path.display()
    );
}

pub fn print_diff(label: &str, original: &str, content: &str) {
    let diff = TextDiff::from_lines(original, content);

    println!("--- {label}");
    println!("+++ {label}");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!();
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                print!("{sign}{change}");
                if change.missing_newline() {
                    println!();
                }
            }
        }
    }
}

pub fn print_summary(result: &RunResult, config: &Config, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }

    let mut parts = vec![];
    if result.files_with_problems > 0 {
        let what = match (config.action, config.check_only) {
            (Action::Format, true) => "files need formatting",
            _ => "files with problems",
        };
        parts.push(ctx.label(
            Style::Error,
            &format!("{} {what}", result.files_with_problems),
        ));
    }
    if result.files_fixed > 0 {
        parts.push(ctx.label(
            Style::Success,
            &format!("{} files formatted", result.files_fixed),
        ));
    }

    if !parts.is_empty() {
        println!();
        println!("{}", parts.join(", "));
    }
}
