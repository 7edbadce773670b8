/*!
 * Command-line interface for ctxcopy
 */

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ctxcopy::clipboard::{copy_to_clipboard, CopyMethod};
use ctxcopy::config::{Args, Config, Destination};
use ctxcopy::error::{CtxError, Result};
use ctxcopy::git::{ClonedRepository, GitProgress};
use ctxcopy::report::{Reporter, RunReport};
use ctxcopy::tokenizer::{create_tokenizer, estimate_tokens, Model, Tokenizer};
use ctxcopy::writer::OutputBuffer;
use ctxcopy::{Bundle, Bundler};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        clap_complete::generate(shell, &mut command, "ctxcopy", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    // Create configuration
    let config = Config::from_args(args);
    setup_logging(config.log_filter());

    // Validate configuration before touching the filesystem
    if let Err(e) = config.validate() {
        error!("{}", e);
        eprintln!("\n{}", Args::command().render_usage());
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

fn run(config: &Config) -> Result<()> {
    let start_time = Instant::now();
    let bundler = Bundler::new(config.exclude_patterns.clone());
    let mut bundle = Bundle::new();

    // The clone lives until delivery is done; dropping it removes the directory
    let clone = match &config.repo_url {
        Some(url) => Some(clone_repository(url, config.quiet)?),
        None => None,
    };

    if let Some(repo) = &clone {
        if let Err(e) = bundler.add_target(&repo.target(), &mut bundle) {
            warn!("Error processing repository {}: {}", repo.url(), e);
        }
    }

    for path in &config.paths {
        if let Err(e) = bundler.add_path(path, &mut bundle) {
            warn!("Error processing path {}: {}", path, e);
        }
    }

    if let Some(prompt) = &config.prompt {
        bundler.add_prompt(prompt, &mut bundle);
    }

    if let Some(follow_up) = &config.follow_up {
        if let Err(e) = bundler.add_follow_up(follow_up, &mut bundle) {
            warn!("Error with follow-up file -f {}: {}", follow_up, e);
        }
    }

    let (buffer, summary, targets) = bundle.into_parts();
    let text = buffer.to_string_lossy();

    let estimate = estimate_tokens(&text);
    if text.trim().is_empty() {
        warn!("Output is empty or contains only whitespace.");
    } else {
        info!("Estimated token count: {}", estimate.details);
    }

    let exact = config.model.and_then(|model| count_exact_tokens(model, &text));

    let destination = config.destination();
    deliver(&destination, &buffer, &text)?;

    if let Some(repo) = clone {
        if let Err(e) = repo.close() {
            warn!("Failed to remove temporary clone: {}", e);
        }
    }

    if !config.quiet {
        let report = RunReport {
            destination: destination.to_string(),
            duration: start_time.elapsed(),
            targets,
            summary,
            artifact_bytes: buffer.len(),
            estimate,
            exact_tokens: exact.map(|(tokens, _)| tokens),
            context_window: exact.and_then(|(_, window)| window),
        };
        Reporter::new().print_report(&report);
    }

    Ok(())
}

/// Shallow-clone `url` with a progress bar on stderr
fn clone_repository(url: &str, quiet: bool) -> Result<ClonedRepository> {
    let progress = ProgressBar::new(100);
    if quiet {
        progress.set_draw_target(ProgressDrawTarget::hidden());
    }
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}% {wide_msg:.dim.white}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    progress.set_prefix("📦 Cloning");
    progress.set_message(url.to_string());

    let reporter = |p: &GitProgress| {
        progress.set_position(p.percentage() as u64);
        progress.set_message(format!(
            "{}/{} objects, {}",
            p.received_objects,
            p.total_objects,
            p.formatted_bytes()
        ));
    };

    let result = ClonedRepository::clone_shallow(url, Some(&reporter));
    progress.finish_and_clear();

    Ok(result?)
}

/// Exact token count and context window, or `None` when the tokenizer fails
fn count_exact_tokens(model: Model, text: &str) -> Option<(usize, Option<usize>)> {
    let counted = create_tokenizer(model)
        .and_then(|tokenizer| Ok((tokenizer.count_tokens(text)?, tokenizer.model_context_window())));

    match counted {
        Ok(counted) => {
            info!("Token count for {}: {}", model, counted.0);
            Some(counted)
        }
        Err(e) => {
            warn!("Failed to count tokens for {}: {}", model, e);
            None
        }
    }
}

fn deliver(destination: &Destination, buffer: &OutputBuffer, text: &str) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(buffer.as_bytes())?;
            stdout.flush()?;
            info!("Content written to stdout.");
        }
        Destination::File(path) => {
            fs::write(path, buffer.as_bytes()).map_err(|e| {
                CtxError::Output(format!(
                    "Failed to write to output file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            info!("Content written to file: {}", path.display());
        }
        Destination::Clipboard { terminal } => {
            if text.trim().is_empty() {
                info!("No content to copy to clipboard.");
                return Ok(());
            }

            match copy_to_clipboard(text, *terminal)? {
                CopyMethod::Osc52 => info!("Content sent to terminal for clipboard (OSC 52)."),
                CopyMethod::Provider(provider) => {
                    info!("Content copied to clipboard via `{}`.", provider)
                }
            }
        }
    }

    Ok(())
}
