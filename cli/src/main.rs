mod config;
mod error;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use z3::{Context, ast};

use common::{
    log_debug, log_error, log_info,
    logging::init_logging,
    z3::{AstNode, SolveResult, WrappedSolver, parse_smtlib2, set_global_params},
};
use translator::{GraphStyle, Script, SmtLibSink, Sort, Z3Sink, Z3Source, render_dot, translate};

use crate::{
    config::{CONFIG_ENV_PREFIX, CliConfig, Emit},
    error::CliError,
};

#[derive(Parser, Debug)]
#[command(name = "bvxlate")]
#[command(version)]
#[command(about = "Translates QF_BV formulas between solver representations")]
struct Args {
    /// SMT-LIB v2 file whose assertions form the formula
    input: PathBuf,
    /// What to print; overrides the configuration
    #[arg(long, value_enum)]
    emit: Option<Emit>,
    /// Also write the formula as a Graphviz DOT graph to this file
    #[arg(long)]
    dot: Option<PathBuf>,
    /// Configuration file to use instead of the searched `bvxlate.toml`
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_logging(CONFIG_ENV_PREFIX);
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = config::load(args.config.as_deref())?;
    let emit = args.emit.unwrap_or(config.emit);
    log_info!("Translating {} with output {:?}", args.input.display(), emit);

    let script = fs::read_to_string(&args.input).map_err(CliError::io(&args.input))?;
    let context = Context::new(&z3::Config::new());
    let assertions = parse_smtlib2(&context, &script).map_err(|reason| CliError::Parse {
        path: args.input.clone(),
        reason,
    })?;
    log_debug!("Read {} assertions", assertions.len());
    let root = Z3Source::from(conjunction(&context, assertions));

    if let Some(path) = &args.dot {
        write_dot(&root, &config.graph, path)?;
    }

    match emit {
        Emit::Smtlib => print!("{}", smtlib_script(&root)?),
        Emit::Json => println!("{}", serde_json::to_string_pretty(&smtlib_script(&root)?)?),
        Emit::Check => check(&root, &config)?,
    }
    Ok(())
}

fn conjunction<'ctx>(
    context: &'ctx Context,
    mut assertions: Vec<ast::Bool<'ctx>>,
) -> ast::Bool<'ctx> {
    match assertions.len() {
        0 => ast::Bool::from_bool(context, true),
        1 => assertions.remove(0),
        _ => ast::Bool::and(context, &assertions.iter().collect::<Vec<_>>()),
    }
}

fn smtlib_script(root: &Z3Source<'_>) -> Result<Script, CliError> {
    let translation = translate(root, &mut SmtLibSink)?;
    Ok(Script::new(translation.expr, &translation.symbols))
}

fn write_dot(root: &Z3Source<'_>, style: &GraphStyle, path: &Path) -> Result<(), CliError> {
    let graph = render_dot(root, style)?;
    fs::write(path, graph).map_err(CliError::io(path))?;
    log_info!("Graph written to {}", path.display());
    Ok(())
}

fn formula_of<'a, 'ctx>(expr: &'a AstNode<'ctx>) -> Result<&'a ast::Bool<'ctx>, CliError> {
    expr.as_bool().ok_or_else(|| CliError::NotAFormula {
        sort: expr.size().map_or(Sort::Bool, Sort::BitVec),
    })
}

/// Translates into an independent context and checks the result there.
fn check(root: &Z3Source<'_>, config: &CliConfig) -> Result<(), CliError> {
    set_global_params(config.solver.params.iter());
    let context = Context::new(&z3::Config::new());
    let translation = translate(root, &mut Z3Sink::new(&context))?;

    let solver = WrappedSolver::new(&context);
    let formula = formula_of(&translation.expr)?.clone();
    let vars = translation
        .symbols
        .iter()
        .map(|(name, symbol)| (name, &symbol.expr));
    let result = solver.check(&[formula], vars);

    println!("{}", result.as_str());
    if let SolveResult::Sat(model) = result {
        for (name, value) in model {
            println!("{name} = {value}");
        }
    }
    Ok(())
}
