use clap::{Parser as ClapParser, Subcommand};
use hydrogen_expr::cli::{self, CheckOptions, CheckResult, CliError, TokensOptions};
use std::{
    io::{self, Read},
    path::PathBuf,
};

#[derive(ClapParser)]
#[command(name = "hyx")]
#[command(about = "hyx - Compile Hydrogen template expressions to PHP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression and print the generated code
    Compile {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,

        /// Template name used in error messages
        #[arg(short, long)]
        origin: Option<String>,

        /// JSON file with compiler options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Don't wrap variables in the escape function
        #[arg(long)]
        no_escape: bool,
    },

    /// Validate an expression without printing the compiled code
    Check {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,
    },

    /// Print the token stream of an expression
    Tokens {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,

        /// Print tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available filters
    Filters,

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'hyx docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            expression,
            origin,
            config,
            no_escape,
        } => read_expression(expression).and_then(|expression| {
            run_check(CheckOptions {
                expression,
                origin,
                config,
                no_escape,
                syntax_only: false,
            })
        }),
        Commands::Check { expression } => read_expression(expression).and_then(|expression| {
            run_check(CheckOptions {
                expression,
                syntax_only: true,
                ..CheckOptions::default()
            })
        }),
        Commands::Tokens { expression, json } => {
            read_expression(expression).and_then(|expression| {
                let listing = cli::list_tokens(&TokensOptions { expression, json })?;
                println!("{}", listing);
                Ok(())
            })
        }
        Commands::Filters => {
            println!("{}", cli::list_filters());
            Ok(())
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_expression(expression: Option<String>) -> Result<String, CliError> {
    match expression {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer.trim().to_string())
        }
        None => Err(CliError::NoInput),
    }
}

fn run_check(options: CheckOptions) -> Result<(), CliError> {
    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Expression is valid"),
        CheckResult::Compiled { helpers, code } => {
            if !helpers.is_empty() {
                println!("{}", helpers);
            }
            println!("{}", code);
        }
    }
    Ok(())
}
