use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "drill")]
#[command(about = "Extract tables from legacy binary database files")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding the data files (default: the schema's data_path, then ".")
    #[arg(short = 'd', long = "data-dir", env = "DRILLER_DATA_DIR", global = true)]
    pub data_dir: Option<String>,

    /// How data files are loaded
    #[arg(long, default_value = "auto", global = true)]
    pub load: LoadMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoadMode {
    /// Memory-map when possible, otherwise read into memory
    Auto,
    /// Always memory-map
    Mmap,
    /// Always read the whole file into memory
    Buffered,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractFormat {
    Text,
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the tables declared in a schema document
    Tables {
        /// Path to the JSON schema document
        #[arg(short, long)]
        schema: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List the columns of one table
    Columns {
        /// Path to the JSON schema document
        #[arg(short, long)]
        schema: String,

        /// Table name
        #[arg(short, long)]
        table: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Extract table rows
    Extract {
        /// Path to the JSON schema document
        #[arg(short, long)]
        schema: String,

        /// Table name
        #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
        table: Option<String>,

        /// Extract every table in the schema
        #[arg(long)]
        all: bool,

        /// Maximum number of rows per table (0 = no limit)
        #[arg(short = 'n', long, default_value = "0")]
        limit: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: ExtractFormat,
    },

    /// Show where each row of a table starts
    Rows {
        /// Path to the JSON schema document
        #[arg(short, long)]
        schema: String,

        /// Table name
        #[arg(short, long)]
        table: String,

        /// Maximum number of rows (0 = no limit)
        #[arg(short = 'n', long, default_value = "0")]
        limit: usize,

        /// Hex dump the bytes of each row
        #[arg(long)]
        dump: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
