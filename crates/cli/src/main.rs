mod commands;
mod interactive;
mod logging;

use clap::{Parser, Subcommand, ValueEnum};
use commands::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "api-scaffold")]
#[command(version, about = "Scaffold REST API resources for Laravel projects")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Layout configuration file (defaults to <root>/api-scaffold.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a model, migration, API controller, and request validation with predefined rules
    #[command(name = "make:api")]
    MakeApi {
        /// Resource name (e.g., Invoice, invoice_item)
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,

        /// How base files are produced before they are rewritten
        #[arg(long, value_enum, default_value_t = GeneratorChoice::Artisan)]
        generator: GeneratorChoice,

        /// PHP binary used to run artisan
        #[arg(long, default_value = "php")]
        php: String,

        /// Print the report as JSON (requires --yes)
        #[arg(long, requires = "yes")]
        json: bool,
    },

    /// Show the resolved project layout and where each value came from
    Layout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorChoice {
    /// php artisan make:* in the project root
    Artisan,
    /// Built-in default stubs, no PHP required
    Stub,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::MakeApi {
            name,
            yes,
            generator,
            php,
            json,
        } => {
            let args = make::MakeApiArgs {
                name,
                root,
                config: cli.config,
                assume_yes: yes,
                generator,
                php,
                json,
            };
            make::api(args)?;
        }
        Commands::Layout { json } => {
            layout::show(&root, cli.config.as_deref(), json)?;
        }
    }

    Ok(())
}
