use clap::{Parser as ClapParser, Subcommand};
use exprcalc::cli::{self, CliError, EvalOptions, TokenStage};
use exprcalc::FunctionCollection;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "exprcalc")]
#[command(about = "exprcalc - tokenize, parse and evaluate formulas over typed variables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print the result as JSON
    Eval {
        /// The expression to evaluate
        expression: String,

        /// Variables as a JSON object (reads from stdin if not provided)
        #[arg(long)]
        vars: Option<String>,

        /// Disable implicit type conversions
        #[arg(long)]
        strict: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the token stream of an expression
    Tokens {
        /// The expression to tokenize
        expression: String,

        /// Stream to print: original, initial or postfix
        #[arg(short, long, default_value = "postfix")]
        stage: TokenStage,
    },

    /// List built-in functions
    Functions,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expression,
            vars,
            strict,
            pretty,
        } => run_eval(expression, vars, strict, pretty),
        Commands::Tokens { expression, stage } => run_tokens(&expression, stage),
        Commands::Functions => {
            for name in FunctionCollection::default_functions().names() {
                println!("{}", name);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    expression: String,
    vars: Option<String>,
    strict: bool,
    pretty: bool,
) -> Result<(), CliError> {
    let variables = match vars {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer).filter(|s| !s.trim().is_empty())
        }
        None => None,
    };

    let options = EvalOptions {
        expression,
        variables,
        strict,
    };

    let result = cli::execute_eval(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&result.output)
    } else {
        serde_json::to_string(&result.output)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_tokens(expression: &str, stage: TokenStage) -> Result<(), CliError> {
    let listing = cli::inspect_tokens(expression, stage)?;
    for token in &listing.tokens {
        println!("{}", token);
    }
    if !listing.variables.is_empty() {
        println!("variables: {}", listing.variables.join(", "));
    }
    Ok(())
}
