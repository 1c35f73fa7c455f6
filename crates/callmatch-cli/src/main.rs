use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use callmatch_core::{LineIndex, TextSize};
use callmatch_ide::{
    generate_with, method_at_offset, validate_source_with, ConvertToAnyOf, GeneratedMatcher,
    InstanceChoice, ScopeChoice,
};
use callmatch_symbols::Snapshot;
use callmatch_syntax::parse_java;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

mod workspace;
mod write;

use workspace::{java_files_in, Workspace};
use write::WriteGuard;

#[derive(Parser)]
#[command(
    name = "callmatch",
    version,
    about = "Check, generate and merge CallMatcher declarations in Java sources"
)]
struct Cli {
    /// Config file (defaults to `callmatch.toml` in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report matcher declarations naming methods that do not exist
    Check(CheckArgs),
    /// Print the matcher declaration for the method at an offset
    Generate(GenerateArgs),
    /// Merge an `||` chain of matcher predicate calls into one `anyOf` field
    Merge(MergeArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Files or directories to check; every source found is also indexed
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    file: PathBuf,
    /// Byte offset of the method name
    #[arg(long)]
    offset: u32,
    /// Matcher kind for instance methods; required unless the method is static
    #[arg(long, value_enum)]
    kind: Option<InstanceKind>,
    /// More files or directories to index alongside the file
    #[arg(long = "sources")]
    sources: Vec<PathBuf>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InstanceKind {
    #[value(name = "instance", help = "Match the method and its overrides (`instanceCall`)")]
    Instance,
    #[value(name = "exact", help = "Match the declaring class only (`exactInstanceCall`)")]
    Exact,
}

impl From<InstanceKind> for InstanceChoice {
    fn from(kind: InstanceKind) -> Self {
        match kind {
            InstanceKind::Instance => InstanceChoice::Instance,
            InstanceKind::Exact => InstanceChoice::ExactInstance,
        }
    }
}

#[derive(Args)]
struct MergeArgs {
    file: PathBuf,
    /// Byte offset where the selection starts
    #[arg(long)]
    start: u32,
    /// Byte offset where the selection ends
    #[arg(long)]
    end: u32,
    /// Index of the insertion scope, innermost first, when several are possible
    #[arg(long)]
    scope: Option<usize>,
    /// Rewrite the file instead of printing the result
    #[arg(long)]
    write: bool,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = cli.config.as_deref();
    match cli.command {
        Command::Check(args) => check(config, args),
        Command::Generate(args) => generate(config, args),
        Command::Merge(args) => merge(config, args),
    }
}

#[derive(Debug, Serialize)]
struct CheckReport {
    diagnostics: Vec<ReportedDiagnostic>,
    summary: Summary,
}

#[derive(Debug, Serialize)]
struct ReportedDiagnostic {
    file: PathBuf,
    /// One-based.
    line: u32,
    /// One-based, in bytes.
    column: u32,
    severity: &'static str,
    code: &'static str,
    message: String,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    files: usize,
    errors: usize,
    warnings: usize,
}

fn check(config: Option<&Path>, args: CheckArgs) -> Result<i32> {
    if let Some(missing) = args.paths.iter().find(|path| !path.exists()) {
        anyhow::bail!("{} does not exist", missing.display());
    }
    let ws = Workspace::open(config, Path::new("."), &args.paths)?;
    let snapshot = Snapshot::new(&ws.table);
    let syntax = ws.syntax();

    let mut report = CheckReport {
        diagnostics: Vec::new(),
        summary: Summary::default(),
    };
    for path in args.paths.iter().flat_map(|path| java_files_in(path)) {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let diagnostics = validate_source_with(&snapshot, &syntax, &text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        report.summary.files += 1;

        let index = LineIndex::new(&text);
        for diag in diagnostics {
            match diag.severity {
                callmatch_core::Severity::Error => report.summary.errors += 1,
                _ => report.summary.warnings += 1,
            }
            let pos = index.line_col(diag.range.start());
            report.diagnostics.push(ReportedDiagnostic {
                file: path.clone(),
                line: pos.line + 1,
                column: pos.col + 1,
                severity: diag.severity.as_str(),
                code: diag.code,
                message: diag.message,
            });
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for d in &report.diagnostics {
            println!(
                "{}:{}:{}: {}[{}] {}",
                d.file.display(),
                d.line,
                d.column,
                d.severity,
                d.code,
                d.message
            );
        }
        println!(
            "summary: {} files, {} errors, {} warnings",
            report.summary.files, report.summary.errors, report.summary.warnings
        );
    }
    Ok(if report.summary.errors > 0 { 1 } else { 0 })
}

#[derive(Debug, Serialize)]
struct GenerateReport {
    /// Absent when an instance method was found but no `--kind` was given.
    declaration: Option<String>,
    is_static: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    choices: Option<GenerateChoices>,
}

#[derive(Debug, Serialize)]
struct GenerateChoices {
    instance: String,
    exact: String,
}

fn generate(config: Option<&Path>, args: GenerateArgs) -> Result<i32> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut sources = vec![args.file.clone()];
    sources.extend(args.sources.iter().cloned());

    let ws = Workspace::open(config, Path::new("."), &sources)?;
    let snapshot = Snapshot::new(&ws.table);
    let tree = parse_java(&text)?;

    let Some(method) = method_at_offset(&snapshot, &text, &tree, TextSize::from(args.offset))
    else {
        eprintln!("no method declaration or call at offset {}", args.offset);
        return Ok(1);
    };

    let matcher = generate_with(&snapshot, &ws.syntax(), method);
    let report = match (&matcher, args.kind) {
        (GeneratedMatcher::Instance { instance, exact_instance }, None) => GenerateReport {
            declaration: None,
            is_static: false,
            choices: Some(GenerateChoices {
                instance: instance.clone(),
                exact: exact_instance.clone(),
            }),
        },
        (_, kind) => GenerateReport {
            declaration: Some(
                matcher
                    .choose(kind.map_or(InstanceChoice::Instance, InstanceChoice::from))
                    .to_string(),
            ),
            is_static: matcher.is_static(),
            choices: None,
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(declaration) = &report.declaration {
        println!("{declaration}");
    } else if let Some(choices) = &report.choices {
        eprintln!("instance method: pass --kind instance or --kind exact");
        println!("instance: {}", choices.instance);
        println!("exact: {}", choices.exact);
    }
    Ok(if report.declaration.is_some() { 0 } else { 1 })
}

#[derive(Debug, Serialize)]
struct MergeReport {
    field_name: String,
    scope: String,
    text: String,
}

fn merge(config: Option<&Path>, args: MergeArgs) -> Result<i32> {
    if args.end < args.start {
        anyhow::bail!("--end ({}) is before --start ({})", args.end, args.start);
    }
    // Held until the rewrite lands; dropped on every early return.
    let guard = if args.write {
        Some(WriteGuard::acquire(&args.file)?)
    } else {
        None
    };
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let ws = Workspace::open(config, Path::new("."), &[])?;
    let mut action = ConvertToAnyOf::new(callmatch_core::range(
        args.start as usize,
        args.end as usize,
    ));
    action.field_name = ws.config.merge.field_name.clone();
    action.syntax = ws.syntax();

    let candidate = match action.analyze(&text) {
        Ok(candidate) => candidate,
        Err(reason) => {
            eprintln!("merge unavailable: {reason}");
            return Ok(1);
        }
    };

    let scopes = candidate.scopes();
    let scope = match (args.scope, candidate.scope_choice()) {
        (Some(index), _) => scopes.get(index).with_context(|| {
            format!("--scope {index} is out of range ({} scopes)", scopes.len())
        })?,
        (None, ScopeChoice::Single(scope)) => scope,
        (None, ScopeChoice::Ambiguous(scopes)) => {
            eprintln!("several classes can hold the merged field; pass --scope:");
            for (index, scope) in scopes.iter().enumerate() {
                eprintln!("  {index}: {}", scope.name);
            }
            return Ok(1);
        }
    };

    let edit = action.apply(&text, &candidate, scope)?;
    let report = MergeReport {
        field_name: edit.field_name,
        scope: scope.name.clone(),
        text: edit.text,
    };

    if let Some(guard) = guard {
        guard.write(&args.file, &report.text)?;
        drop(guard);
        if args.json {
            let written = serde_json::json!({
                "field_name": report.field_name,
                "scope": report.scope,
            });
            println!("{written}");
        } else {
            println!("merged into {} in {}", report.field_name, report.scope);
        }
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.text);
    }
    Ok(0)
}
