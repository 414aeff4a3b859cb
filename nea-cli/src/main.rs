//! NeaKit CLI - Command line interface
//!
//! Formats and converts value-tree documents, evaluates expressions and runs
//! function blocks with a built-in `print` native.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use nea_core::{
    EngineConfig, Expression, ExpressionHolder, FunctionDef, KeyedList, NativeRegistry, NeaError, ParseMode,
    Primitive, Scopes, ValueDomain, ValueNode,
};
use tracing::{debug, info};

mod config;
mod json;
mod logging;
mod platform;

use crate::config::CliConfig;
use crate::logging::{LogFormat, CLI_TARGET};
use crate::platform::print_error_with_source;

#[derive(Parser)]
#[command(name = "nea", about = "NeaKit data language tools", version)]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: silent, error, warn, info, debug, trace
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a document and print it in canonical form
    Fmt {
        file: PathBuf,
        /// Keep composite bodies as raw text
        #[arg(long)]
        flat: bool,
    },
    /// Print a document as JSON
    Json { file: PathBuf },
    /// Evaluate an expression
    Eval {
        expression: String,
        #[arg(long, value_enum, default_value_t = DomainArg::Decimal)]
        domain: DomainArg,
        /// Variable binding, NAME=VALUE
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
    /// Run a function block from a file
    Run {
        file: PathBuf,
        function: String,
        arguments: Vec<String>,
        /// Caller scope binding, NAME=VALUE
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
        /// Reject calls to unknown natives
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DomainArg {
    Int,
    Decimal,
    Bool,
}

impl From<DomainArg> for ValueDomain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Int => ValueDomain::Integer,
            DomainArg::Decimal => ValueDomain::Decimal,
            DomainArg::Bool => ValueDomain::Boolean,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(read_config).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => fail(&e),
    };
    let log_config = match config.log_config(cli.log_level.as_deref()) {
        Ok(log_config) => log_config,
        Err(e) => fail(&e),
    };
    logging::init(&log_config, cli.log_format);
    debug!(target: CLI_TARGET, ?config, "Loaded configuration");

    match cli.command {
        Command::Fmt { file, flat } => handle_fmt(&file, flat),
        Command::Json { file } => handle_json(&file),
        Command::Eval {
            expression,
            domain,
            vars,
        } => handle_eval(&expression, domain.into(), &vars),
        Command::Run {
            file,
            function,
            arguments,
            vars,
            strict,
        } => {
            let engine = EngineConfig {
                strict_natives: config.engine.strict_natives || strict,
                ..config.engine
            };
            handle_run(&file, &function, &arguments, &vars, engine)
        }
    }
}

/// Read and parse the JSON configuration file
fn read_config(path: &Path) -> Result<CliConfig, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("cannot parse '{}': {}", path.display(), e))
}

fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => fail(&format!("cannot read '{}': {}", path.display(), e)),
    }
}

fn parse_document(path: &Path, mode: ParseMode) -> (String, Vec<ValueNode>) {
    let source = read_source(path);
    match ValueNode::from_reader(source.as_bytes(), mode) {
        Ok(nodes) => {
            info!(target: CLI_TARGET, file = %path.display(), nodes = nodes.len(), "Parsed document");
            (source, nodes)
        }
        Err(e) => fail_with_source(&e, &source),
    }
}

fn handle_fmt(path: &Path, flat: bool) {
    let mode = if flat { ParseMode::Flat } else { ParseMode::Recursive };
    let (_, nodes) = parse_document(path, mode);
    for node in nodes.iter().filter(|node| !node.is_placeholder()) {
        println!("{node}");
    }
}

fn handle_json(path: &Path) {
    let (_, nodes) = parse_document(path, ParseMode::Recursive);
    match serde_json::to_string_pretty(&json::document(&nodes)) {
        Ok(text) => println!("{text}"),
        Err(e) => fail(&format!("cannot serialize JSON: {e}")),
    }
}

fn handle_eval(text: &str, domain: ValueDomain, vars: &[(String, String)]) {
    let scope = scope_from(vars);
    let expression = match Expression::parse(text) {
        Ok(expression) => expression,
        Err(e) => fail_with_source(&e, text),
    };
    let holder = ExpressionHolder::new(expression, domain);
    debug!(target: CLI_TARGET, %holder, "Evaluating");
    match holder.evaluate(&Scopes::new(&scope)) {
        Ok(value) => println!("{value}"),
        Err(e) => fail_with_source(&e, text),
    }
}

fn handle_run(path: &Path, name: &str, arguments: &[String], vars: &[(String, String)], engine: EngineConfig) {
    let source = read_source(path);
    let natives = builtin_natives();
    let mut functions = match FunctionDef::parse_all(&source, &natives, engine) {
        Ok(functions) => functions,
        Err(e) => fail_with_source(&e, &source),
    };
    info!(target: CLI_TARGET, functions = functions.len(), "Parsed function blocks");

    let Some(function) = functions.get_key_mut(name) else {
        fail(&format!("no function named '{name}' in '{}'", path.display()))
    };
    let mut caller = scope_from(vars);
    if let Err(e) = function.run(arguments, &mut caller) {
        fail_with_source(&e, &source);
    }

    for node in &caller {
        println!("{node}");
    }
}

/// Natives available to function blocks run from the command line
fn builtin_natives() -> NativeRegistry {
    let mut natives = NativeRegistry::new();
    natives.register("print", |args: &[Primitive]| {
        let line: Vec<String> = args.iter().map(ToString::to_string).collect();
        println!("{}", line.join(" "));
    });
    natives
}

fn scope_from(vars: &[(String, String)]) -> KeyedList<ValueNode> {
    vars.iter()
        .map(|(name, value)| ValueNode::leaf_from_text(name.as_str(), value))
        .collect()
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn fail_with_source(e: &NeaError, source: &str) -> ! {
    print_error_with_source(e, source);
    process::exit(1);
}
