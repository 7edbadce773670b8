/*!
 * Configuration handling for ctxcopy
 */

use std::fmt;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::error::Result;
use crate::policy::normalize_patterns;
use crate::tokenizer::Model;
use crate::ensure;

/// Command-line arguments for ctxcopy
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "ctxcopy",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bundle files, directories or a git repository into markdown code blocks for LLM prompts",
    long_about = "Walks the given files and directories (and optionally a shallow clone of a git repository), \
                  renders every text file as a fenced markdown block labelled with its path, appends an \
                  optional prompt and follow-up file, and copies the result to the clipboard."
)]
pub struct Args {
    /// Files or directories to process
    #[clap(value_name = "PATHS")]
    pub paths: Vec<String>,

    /// Shallow-clone a git repository and process it first
    #[clap(short = 'g', long = "git", value_name = "URL")]
    pub git: Option<String>,

    /// Comma-separated list of patterns to exclude
    #[clap(short = 'x', long = "exclude", value_delimiter = ',', value_name = "PATTERNS")]
    pub exclude: Vec<String>,

    /// Prompt appended after the file contents
    #[clap(short = 'p', long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// File appended after the prompt, formatted as a code block
    #[clap(short = 'f', long = "follow-up", value_name = "FILE")]
    pub follow_up: Option<String>,

    /// Write the output to a file instead of the clipboard
    #[clap(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the output to stdout instead of the clipboard
    #[clap(short = 's', long)]
    pub stdout: bool,

    /// Terminal-aware clipboard copy (OSC 52, kitty)
    #[clap(short = 't', long)]
    pub terminal: bool,

    /// OpenAI model used for an exact token count
    #[clap(short = 'm', long, value_enum)]
    pub model: Option<Model>,

    /// Only report warnings and errors
    #[clap(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase diagnostic output (-v debug, -vv trace)
    #[clap(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Where the finished artifact is delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// System clipboard, optionally through the terminal
    Clipboard { terminal: bool },
    /// A file on disk
    File(PathBuf),
    /// Standard output
    Stdout,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Clipboard { terminal: true } => write!(f, "clipboard (terminal)"),
            Destination::Clipboard { terminal: false } => write!(f, "clipboard"),
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Stdout => write!(f, "stdout"),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Paths to process, as typed
    pub paths: Vec<String>,

    /// Repository to clone and process first
    pub repo_url: Option<String>,

    /// Normalized global exclusion patterns
    pub exclude_patterns: Vec<String>,

    /// Prompt appended after the file blocks
    pub prompt: Option<String>,

    /// Follow-up file appended last
    pub follow_up: Option<String>,

    /// Output file path
    pub output_file: Option<PathBuf>,

    /// Write to stdout
    pub stdout: bool,

    /// Terminal-aware clipboard copy
    pub terminal: bool,

    /// LLM model to use for exact token counting
    pub model: Option<Model>,

    /// Only warnings and errors
    pub quiet: bool,

    /// Verbosity level
    pub verbose: u8,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            paths: args.paths,
            repo_url: args.git.filter(|url| !url.is_empty()),
            exclude_patterns: normalize_patterns(args.exclude),
            prompt: args.prompt.filter(|p| !p.is_empty()),
            follow_up: args.follow_up.filter(|f| !f.is_empty()),
            output_file: args.output,
            stdout: args.stdout,
            terminal: args.terminal,
            model: args.model,
            quiet: args.quiet,
            verbose: args.verbose,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !(self.stdout && self.output_file.is_some()),
            Config,
            "Cannot use -s (stdout) and -o (output file) simultaneously"
        );

        ensure!(
            !self.paths.is_empty()
                || self.repo_url.is_some()
                || self.prompt.is_some()
                || self.follow_up.is_some(),
            Config,
            "Nothing to do: give at least one path, -g <url>, -p <prompt> or -f <file>"
        );

        Ok(())
    }

    /// Where the artifact goes
    pub fn destination(&self) -> Destination {
        if self.stdout {
            Destination::Stdout
        } else if let Some(path) = &self.output_file {
            Destination::File(path.clone())
        } else {
            Destination::Clipboard {
                terminal: self.terminal,
            }
        }
    }

    /// Default log filter when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
