/*!
 * Clipboard delivery of the artifact
 *
 * Either an OSC 52 escape sequence for the terminal, or the first installed
 * clipboard program that accepts the text on stdin.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use strum::Display;
use thiserror::Error;
use tracing::{info, warn};

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found; install xclip/xsel or wl-clipboard, or use -t")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ClipboardProvider {
    /// kitty's clipboard kitten
    #[strum(serialize = "kitty +kitten clipboard")]
    Kitty,
    /// tmux clipboard
    #[strum(serialize = "tmux load-buffer")]
    Tmux,
    /// X11 clipboard with xclip
    #[strum(serialize = "xclip")]
    Xclip,
    /// X11 clipboard with xsel
    #[strum(serialize = "xsel")]
    Xsel,
    /// Wayland clipboard
    #[strum(serialize = "wl-copy")]
    Wayland,
    /// macOS clipboard
    #[strum(serialize = "pbcopy")]
    MacOS,
    /// Windows clipboard (via WSL)
    #[strum(serialize = "clip.exe")]
    Wsl,
    /// Termux clipboard
    #[strum(serialize = "termux-clipboard-set")]
    Termux,
}

impl ClipboardProvider {
    /// Program and arguments that read the text on stdin
    fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Kitty => ("kitty", &["+kitten", "clipboard"]),
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", &["--clipboard", "--input"]),
            Self::Wayland => ("wl-copy", &[]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Wsl => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }

    /// Whether the provider's program is installed
    pub fn is_available(&self) -> bool {
        command_exists(self.command().0)
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (program, args) = self.command();
        pipe_to_command(program, args, text)
    }
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// How the text finally reached the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    /// OSC 52 escape sequence written to the terminal
    Osc52,
    /// An external clipboard command
    Provider(ClipboardProvider),
}

/// Copy text to the clipboard
///
/// With `terminal_aware`, a terminal that understands OSC 52 receives the
/// text as an escape sequence on stdout (works over SSH). Otherwise, or when
/// the terminal is not recognized, every available clipboard command is tried
/// in order of preference until one succeeds.
///
/// # Examples
/// ```no_run
/// use ctxcopy::clipboard::copy_to_clipboard;
///
/// if let Err(e) = copy_to_clipboard("Hello, clipboard!", false) {
///     eprintln!("Failed to copy to clipboard: {}", e);
/// }
/// ```
pub fn copy_to_clipboard(text: &str, terminal_aware: bool) -> Result<CopyMethod> {
    if terminal_aware {
        let term = env::var("TERM").unwrap_or_default();
        let in_tmux = env::var("TMUX").is_ok();

        if supports_osc52(&term, in_tmux) {
            info!("Attempting clipboard copy via OSC 52 escape code...");
            let mut stdout = io::stdout().lock();
            stdout.write_all(osc52_sequence(text, in_tmux).as_bytes())?;
            stdout.flush()?;
            return Ok(CopyMethod::Osc52);
        }
    }

    for provider in determine_clipboard_providers() {
        info!("Attempting clipboard copy via `{}`...", provider);
        match provider.copy_to_clipboard(text) {
            Ok(()) => return Ok(CopyMethod::Provider(provider)),
            Err(e) => warn!("Failed to copy with `{}`: {}", provider, e),
        }
    }

    Err(ClipboardError::NoClipboardFound)
}

/// Whether a terminal is expected to honour OSC 52 clipboard writes
pub fn supports_osc52(term: &str, in_tmux: bool) -> bool {
    in_tmux || term.contains("kitty") || term.contains("xterm")
}

/// OSC 52 "set clipboard" sequence, wrapped for tmux passthrough when needed
pub fn osc52_sequence(text: &str, in_tmux: bool) -> String {
    let encoded = BASE64.encode(text.as_bytes());
    if in_tmux {
        format!("\x1bPtmux;\x1b\x1b]52;c;{}\x07\x1b\\", encoded)
    } else {
        format!("\x1b]52;c;{}\x07", encoded)
    }
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    if let Some(paths) = env::var_os("PATH") {
        if env::split_paths(&paths).any(|dir| dir.join(command).is_file()) {
            return true;
        }
    }

    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

/// Spawn `program`, write `text` to its stdin and wait for it to exit
fn pipe_to_command(program: &str, args: &[&str], text: &str) -> Result<()> {
    let failed = |what: &str, e: io::Error| {
        ClipboardError::CommandFailed(format!("{} {}: {}", what, program, e))
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| failed("cannot spawn", e))?;

    match child.stdin.take() {
        Some(mut stdin) => stdin
            .write_all(text.as_bytes())
            .map_err(|e| failed("cannot write to", e))?,
        None => {
            return Err(ClipboardError::CommandFailed(format!(
                "no stdin for {}",
                program
            )))
        }
    }

    let status = child.wait().map_err(|e| failed("cannot wait for", e))?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with {}",
            program, status
        )))
    }
}

/// Operating environment relevant to clipboard tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Platform {
    MacOS,
    Windows,
    Wsl,
    Linux,
    Android,
    Unknown,
}

impl Platform {
    /// Detect the platform once per process
    fn current() -> Self {
        static PLATFORM: OnceLock<Platform> = OnceLock::new();

        *PLATFORM.get_or_init(|| {
            if cfg!(target_os = "macos") {
                Platform::MacOS
            } else if cfg!(target_os = "windows") {
                Platform::Windows
            } else if cfg!(target_os = "android") {
                Platform::Android
            } else if cfg!(target_os = "linux") {
                if env::var_os("WSL_DISTRO_NAME").is_some() {
                    Platform::Wsl
                } else {
                    Platform::Linux
                }
            } else {
                Platform::Unknown
            }
        })
    }

    /// Native clipboard tools, most preferred first
    fn native_providers(self) -> &'static [ClipboardProvider] {
        match self {
            Platform::MacOS => &[ClipboardProvider::MacOS],
            Platform::Windows | Platform::Wsl => &[ClipboardProvider::Wsl],
            Platform::Linux => &[
                ClipboardProvider::Wayland,
                ClipboardProvider::Xclip,
                ClipboardProvider::Xsel,
            ],
            Platform::Android => &[ClipboardProvider::Termux],
            Platform::Unknown => &[],
        }
    }
}

/// Installed providers in the order they should be tried
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut candidates = Vec::new();

    // Inside kitty, its own kitten works even without a display server
    if env::var_os("KITTY_WINDOW_ID").is_some() {
        candidates.push(ClipboardProvider::Kitty);
    }
    if env::var_os("TMUX").is_some() {
        candidates.push(ClipboardProvider::Tmux);
    }
    candidates.extend_from_slice(Platform::current().native_providers());

    candidates
        .into_iter()
        .filter(ClipboardProvider::is_available)
        .collect()
}
