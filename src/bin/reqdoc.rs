//! Command-line interface for reqdoc
//! This binary parses, formats and checks reqdoc files.
//!
//! Usage:
//!   reqdoc parse `<path>` [--kind `<kind>`] [--format `<format>`]  - Print the parsed document
//!   reqdoc fmt `<path>` [--kind `<kind>`] [--check]              - Print (or verify) canonical text
//!   reqdoc check `<path>`... [--kind `<kind>`]                   - Parse many files on the worker pool
//!   reqdoc formats                                          - List output formats
//!
//! When `--kind` is not given it is inferred from the path: `folder.reqdoc` is a
//! folder, `collection.reqdoc` a collection root, files under an
//! `environments` directory are environments, and everything else is a request.

use clap::{Arg, ArgAction, ArgMatches, Command};
use reqdoc::reqdoc::config::{Loader, ReqdocConfig};
use reqdoc::reqdoc::formats::{serialize_document, FormatRegistry};
use reqdoc::reqdoc::parsing::parse_document;
use reqdoc::reqdoc::pool::WorkerPool;
use reqdoc::{Document, DocumentKind};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn kind_arg() -> Arg {
    Arg::new("kind")
        .long("kind")
        .short('k')
        .help("Document kind: request, folder, collection-root or environment (inferred from the path if omitted)")
        .value_parser(clap::value_parser!(DocumentKind))
}

fn main() {
    let matches = Command::new("reqdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing, formatting and checking reqdoc files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Extra configuration file layered over the defaults"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print the document model")
                .arg(
                    Arg::new("path")
                        .help("Path to the reqdoc file")
                        .required(true)
                        .index(1),
                )
                .arg(kind_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see `reqdoc formats`)")
                        .default_value("json"),
                ),
        )
        .subcommand(
            Command::new("fmt")
                .about("Print a file in canonical form")
                .arg(
                    Arg::new("path")
                        .help("Path to the reqdoc file")
                        .required(true)
                        .index(1),
                )
                .arg(kind_arg())
                .arg(
                    Arg::new("check")
                        .long("check")
                        .help("Exit with status 1 if the file is not already canonical")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse files in the background and report syntax errors")
                .arg(
                    Arg::new("paths")
                        .help("Paths to reqdoc files")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(kind_arg()),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
        .get_matches();

    let config = load_config(matches.get_one::<String>("config"));
    init_tracing(&config);

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            handle_parse_command(path, kind_for(parse_matches, path), format);
        }
        Some(("fmt", fmt_matches)) => {
            let path = fmt_matches.get_one::<String>("path").unwrap();
            handle_fmt_command(path, kind_for(fmt_matches, path), fmt_matches.get_flag("check"));
        }
        Some(("check", check_matches)) => {
            let paths: Vec<&String> = check_matches.get_many::<String>("paths").unwrap().collect();
            let kind = check_matches.get_one::<DocumentKind>("kind").copied();
            handle_check_command(&paths, kind, config);
        }
        Some(("formats", _)) => {
            handle_formats_command();
        }
        _ => unreachable!(),
    }
}

fn load_config(path: Option<&String>) -> ReqdocConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader.build().unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        std::process::exit(1);
    })
}

fn init_tracing(config: &ReqdocConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn kind_for(matches: &ArgMatches, path: &str) -> DocumentKind {
    matches
        .get_one::<DocumentKind>("kind")
        .copied()
        .unwrap_or_else(|| infer_kind(Path::new(path)))
}

/// Guess the document kind from where a file lives
fn infer_kind(path: &Path) -> DocumentKind {
    let file_name = path.file_name().and_then(|name| name.to_str());
    let in_environments = path
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == "environments");

    match file_name {
        Some("folder.reqdoc") => DocumentKind::Folder,
        Some("collection.reqdoc") => DocumentKind::CollectionRoot,
        _ if in_environments => DocumentKind::Environment,
        _ => DocumentKind::Request,
    }
}

fn read_and_parse(path: &str, kind: DocumentKind) -> (String, Document) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });
    let doc = parse_document(&source, kind).unwrap_or_else(|e| {
        eprintln!("{}: {}", path, e);
        std::process::exit(1);
    });
    (source, doc)
}

/// Handle the parse command
fn handle_parse_command(path: &str, kind: DocumentKind, format: &str) {
    let (_, doc) = read_and_parse(path, kind);
    let registry = FormatRegistry::with_defaults();
    let output = registry.serialize(&doc, format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the fmt command
fn handle_fmt_command(path: &str, kind: DocumentKind, check: bool) {
    let (source, doc) = read_and_parse(path, kind);
    let formatted = serialize_document(&doc);

    if check {
        if formatted != source {
            eprintln!("{}: not in canonical form", path);
            std::process::exit(1);
        }
        return;
    }

    print!("{}", formatted);
}

/// Handle the check command
fn handle_check_command(paths: &[&String], kind: Option<DocumentKind>, config: ReqdocConfig) {
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Error starting runtime: {}", e);
        std::process::exit(1);
    });

    let failures = runtime.block_on(async {
        let pool = WorkerPool::with_config(config.pool.into());
        let mut failures = 0;

        let mut pending = Vec::new();
        for path in paths {
            let kind = kind.unwrap_or_else(|| infer_kind(Path::new(path.as_str())));
            match std::fs::read_to_string(path.as_str()) {
                Ok(source) => pending.push((path, kind, pool.parse(kind, source))),
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                    failures += 1;
                }
            }
        }

        for (path, kind, handle) in pending {
            match handle.await {
                Ok(doc) => println!("ok {} ({}, {} blocks)", path, kind, doc.blocks.len()),
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                    failures += 1;
                }
            }
        }

        pool.cleanup().await;
        failures
    });

    if failures > 0 {
        eprintln!("{} of {} files failed", failures, paths.len());
        std::process::exit(1);
    }
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");
    for name in registry.list_formats() {
        let description = registry
            .get(&name)
            .map(|formatter| formatter.description())
            .unwrap_or_default();
        println!("  {}", name);
        println!("    {}", description);
    }
}
