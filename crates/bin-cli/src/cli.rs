use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use bin_core::VERSION;

/// bin - share files as encrypted, base64-encoded wire maps
#[derive(Parser)]
#[command(name = "bin")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a file whose raw bytes are the encryption key
    #[arg(short, long, global = true, env = "BIN_KEY_FILE")]
    pub key_file: Option<String>,

    /// Config path override
    #[arg(long, global = true, env = "BIN_CONFIG")]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for the `encode` command
#[derive(Args)]
pub struct EncodeArgs {
    /// File to encode (omit when using --text)
    #[arg(value_name = "PATH", required_unless_present = "text")]
    pub path: Option<String>,

    /// Literal text content instead of a file
    #[arg(long, conflicts_with = "path", requires = "name")]
    pub text: Option<String>,

    /// Artifact name (required with --text)
    #[arg(long)]
    pub name: Option<String>,

    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Write the wire map here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

/// Arguments for the `decode` command
#[derive(Args)]
pub struct DecodeArgs {
    /// JSON wire map to decode ("-" reads stdin)
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Save the decoded content here instead of writing it to stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

/// Arguments for the `type` command
#[derive(Args)]
pub struct TypeArgs {
    /// File to inspect
    #[arg(value_name = "PATH")]
    pub path: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file or text into a JSON wire map
    Encode(EncodeArgs),

    /// Decrypt a JSON wire map back into its content
    Decode(DecodeArgs),

    /// Print the inferred content type of a file
    Type(TypeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
