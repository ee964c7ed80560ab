//! utikit CLI - resolve, identify and compare file type identifiers.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use utikit::Preference;

mod commands;
mod context;
mod output;

use commands::{conforms, declarations, ext, extension, identify, tag};

#[derive(Parser)]
#[command(name = "utikit")]
#[command(about = "Resolve, identify and compare file type identifiers")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Extra JSON declaration files layered over the built-in table
    #[arg(long = "declarations", global = true, value_name = "FILE")]
    declaration_files: Vec<PathBuf>,
    /// Extension that marks a plain folder when resolving directories
    #[arg(long, global = true, default_value = "")]
    directory_extension: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a filename extension
    Ext {
        /// Extension without the leading dot
        extension: String,
        /// The extension belongs to a directory
        #[arg(long, conflicts_with = "file")]
        dir: bool,
        /// The extension belongs to a regular file
        #[arg(long)]
        file: bool,
        /// Use the registry's generic lookup instead of preferring native types
        #[arg(long)]
        dynamic: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a tag (class may be `extension`, `mime`, or a full class name)
    Tag {
        /// Tag class
        class: String,
        /// Tag value
        value: String,
        /// Only consider types conforming to this identifier
        #[arg(long)]
        conforming_to: Option<String>,
        /// Use the registry's generic lookup instead of preferring native types
        #[arg(long)]
        dynamic: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Identify files or directories on disk
    Identify {
        /// Paths to identify
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Use the registry's generic lookup instead of preferring native types
        #[arg(long)]
        dynamic: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a type conforms to any of the given targets
    Conforms {
        /// Type identifier to check
        file_type: String,
        /// Candidate parent types
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Print the preferred filename extension of a type
    Extension {
        /// Type identifier
        identifier: String,
    },
    /// Dump the effective declaration table as JSON
    Declarations,
}

fn preference(dynamic: bool) -> Preference {
    if dynamic {
        Preference::Dynamic
    } else {
        Preference::Native
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let context = match context::Context::load(&cli.declaration_files, cli.directory_extension) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Ext {
            extension,
            dir,
            file,
            dynamic,
            json,
        } => {
            let is_directory = match (dir, file) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            ext::run(&context, extension, is_directory, preference(dynamic), json)
        }
        Commands::Tag {
            class,
            value,
            conforming_to,
            dynamic,
            json,
        } => tag::run(&context, class, value, conforming_to, preference(dynamic), json),
        Commands::Identify {
            paths,
            dynamic,
            json,
        } => identify::run(&context, paths, preference(dynamic), json),
        Commands::Conforms { file_type, targets } => conforms::run(&context, file_type, targets),
        Commands::Extension { identifier } => extension::run(&context, identifier),
        Commands::Declarations => declarations::run(&context),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
