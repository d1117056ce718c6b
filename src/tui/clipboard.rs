//! Clipboard support for copying explorer paths.
//!
//! Backends, in order of preference:
//! - native clipboard via arboard
//! - macOS: `pbcopy`
//! - Linux: `xclip`, then `xsel`
//! - OSC 52 escape sequence written to the terminal

use arboard::Clipboard;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use thiserror::Error;

/// Native clipboard handle, kept alive for the whole session.
static CLIPBOARD: Mutex<Option<Clipboard>> = Mutex::new(None);

/// Backend picked by [`init`].
static BACKEND: Mutex<Option<ClipboardBackend>> = Mutex::new(None);

/// Detected clipboard backend for the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    Arboard,
    Xclip,
    Xsel,
    Pbcopy,
    Osc52,
}

/// Clipboard operation errors.
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    #[error("Failed to initialize clipboard: {0}")]
    Init(String),

    #[error("Failed to acquire clipboard lock")]
    Lock,

    #[error("Clipboard not initialized")]
    NotInitialized,

    #[error("Failed to copy to clipboard: {0}")]
    Copy(String),
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn command_available(program: &str, check_arg: &str) -> bool {
    Command::new(program)
        .arg(check_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Detects the best available clipboard backend for the current platform.
fn detect_backend() -> ClipboardBackend {
    if Clipboard::new().is_ok() {
        return ClipboardBackend::Arboard;
    }

    #[cfg(target_os = "macos")]
    {
        if Command::new("pbcopy")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .is_ok()
        {
            return ClipboardBackend::Pbcopy;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if command_available("xclip", "-version") {
            return ClipboardBackend::Xclip;
        }
        if command_available("xsel", "--version") {
            return ClipboardBackend::Xsel;
        }
    }

    ClipboardBackend::Osc52
}

/// Initializes the clipboard. Should be called once at startup.
pub fn init() -> Result<ClipboardBackend, ClipboardError> {
    let backend = detect_backend();

    if let Ok(mut guard) = BACKEND.lock() {
        *guard = Some(backend);
    }

    if backend == ClipboardBackend::Arboard {
        let clipboard = Clipboard::new().map_err(|e| ClipboardError::Init(e.to_string()))?;
        let mut guard = CLIPBOARD.lock().map_err(|_| ClipboardError::Lock)?;
        *guard = Some(clipboard);
    }

    Ok(backend)
}

/// Returns the backend selected by [`init`], if any.
pub fn backend() -> Option<ClipboardBackend> {
    BACKEND.lock().ok().and_then(|g| *g)
}

/// Copies text to the clipboard using the best available backend.
pub fn copy(text: &str) -> Result<(), ClipboardError> {
    let backend = backend().unwrap_or_else(detect_backend);

    match backend {
        ClipboardBackend::Arboard => copy_arboard(text),
        ClipboardBackend::Xclip => pipe_to("xclip", &["-selection", "clipboard"], text),
        ClipboardBackend::Xsel => pipe_to("xsel", &["--clipboard", "--input"], text),
        ClipboardBackend::Pbcopy => pipe_to("pbcopy", &[], text),
        ClipboardBackend::Osc52 => copy_osc52(text),
    }
}

fn copy_arboard(text: &str) -> Result<(), ClipboardError> {
    let mut guard = CLIPBOARD.lock().map_err(|_| ClipboardError::Lock)?;
    let clipboard = guard.as_mut().ok_or(ClipboardError::NotInitialized)?;
    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::Copy(e.to_string()))
}

/// Writes `text` to the stdin of `program`.
fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::Copy(format!("Failed to spawn {program}: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| ClipboardError::Copy(format!("Failed to write to {program}: {e}")))?;
    }

    let status = child
        .wait()
        .map_err(|e| ClipboardError::Copy(format!("{program} failed: {e}")))?;
    if !status.success() {
        return Err(ClipboardError::Copy(format!("{program} exited with {status}")));
    }

    Ok(())
}

/// OSC 52 sequence asking the terminal to put `text` on the clipboard.
pub fn osc52_sequence(text: &str) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};

    format!("\x1b]52;c;{}\x1b\\", STANDARD.encode(text))
}

fn copy_osc52(text: &str) -> Result<(), ClipboardError> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(osc52_sequence(text).as_bytes())
        .map_err(|e| ClipboardError::Copy(format!("Failed to write OSC 52: {e}")))?;
    stdout
        .flush()
        .map_err(|e| ClipboardError::Copy(format!("Failed to flush OSC 52: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::NotInitialized;
        assert_eq!(err.to_string(), "Clipboard not initialized");

        let err = ClipboardError::Copy("xclip exited with 1".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to copy to clipboard: xclip exited with 1"
        );
    }

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("./data.csv"), "\x1b]52;c;Li9kYXRhLmNzdg==\x1b\\");
    }
}
