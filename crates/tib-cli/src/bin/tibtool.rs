use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use tib_cli::commands::convert_ops::Input;
use tib_cli::commands::{build_ops, config_ops, convert_ops, dict_ops};
use tib_cli::trace_init::init_tracing;
use tib_core::translit::Mode;

#[derive(Parser)]
#[command(name = "tibtool", about = "Tibetan dictionary and transliteration tool")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile dictionary sources into a trie file
    Build {
        /// Build config (default: embedded defaults)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip subtree merging
        #[arg(long)]
        no_optimize: bool,
        /// Source files in application order (override the config)
        inputs: Vec<PathBuf>,
    },
    /// Show trie file statistics
    Info {
        /// Trie file
        file: String,
    },
    /// Look up a key (exact match)
    Lookup {
        /// Trie file
        dict_file: String,
        /// Key to look up
        key: String,
    },
    /// Common-prefix search (all keys that are prefixes of the query)
    Prefix {
        /// Trie file
        dict_file: String,
        /// Query string
        query: String,
    },
    /// Predictive search (all keys starting with the prefix)
    Predict {
        /// Trie file
        dict_file: String,
        /// Key prefix
        prefix: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        n: usize,
    },
    /// Transliterate romanized Tibetan to Unicode
    Convert {
        /// Input method: ewts, dts or alalc
        #[arg(long, default_value = "ewts")]
        mode: Mode,
        /// Custom conversion table TOML
        #[arg(long)]
        table: Option<String>,
        /// Read input from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<String>,
        /// Print each output position with its input offset
        #[arg(long)]
        offsets: bool,
        /// Text to convert (default: stdin)
        text: Option<String>,
    },
    /// Export default build config as TOML
    ConfigExport,
    /// Validate a build config TOML file
    ConfigValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Export default conversion table as TOML
    TableExport,
    /// Validate a conversion table TOML file
    TableValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build {
            config,
            output,
            no_optimize,
            inputs,
        } => build_ops::build(&build_ops::BuildOptions {
            config,
            inputs,
            output,
            no_optimize,
        }),
        Command::Info { file } => dict_ops::info(&file),
        Command::Lookup { dict_file, key } => dict_ops::lookup(&dict_file, &key),
        Command::Prefix { dict_file, query } => dict_ops::prefix(&dict_file, &query),
        Command::Predict {
            dict_file,
            prefix,
            n,
        } => dict_ops::predict(&dict_file, &prefix, n),
        Command::Convert {
            mode,
            table,
            file,
            offsets,
            text,
        } => {
            let input = match (&text, &file) {
                (Some(text), _) => Input::Text(text),
                (None, Some(file)) => Input::File(file),
                (None, None) => Input::Stdin,
            };
            convert_ops::convert(input, mode, table.as_deref(), offsets)
        }
        Command::ConfigExport => config_ops::config_export(),
        Command::ConfigValidate { file } => config_ops::config_validate(&file),
        Command::TableExport => config_ops::table_export(),
        Command::TableValidate { file } => config_ops::table_validate(&file),
    }
}
