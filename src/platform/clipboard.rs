//! Cross-platform clipboard writing.
//!
//! The rest of the program only sees the [`ClipboardWriter`] capability. One
//! backend is picked at startup by [`select_backend`]:
//!
//! ## Windows
//!
//! Text is piped into `clip`, encoded with the configured clipboard encoding
//! (GBK unless overridden), matching what localized consoles expect.
//!
//! ## macOS
//!
//! Text is piped into `pbcopy` as UTF-8.
//!
//! ## Linux
//!
//! The installed tools among the following, tried in order:
//! 1. `wl-copy` (Wayland, only with `WAYLAND_DISPLAY` set)
//! 2. `xclip` (X11, only with `DISPLAY` set)
//! 3. `xsel` (X11 alternative, only with `DISPLAY` set)
//!
//! followed by the `arboard` crate. A backend that fails hands over to the
//! next one, and when all of them fail the write reports
//! [`ClipboardError::Unsupported`] so the caller can print the text instead.
//! External tools come first because they persist clipboard content after
//! the process exits.
//!
//! ## Elsewhere
//!
//! Without a tool, `arboard` is used if a native clipboard can be opened, and
//! otherwise [`ConsoleFallback`] reports [`ClipboardError::Unsupported`].

use std::io::Write;
use std::process::{Command, Stdio};

use encoding_rs::{Encoding, GBK, UTF_8};

use crate::domain::{ClipboardError, PathList};

/// Result type for clipboard operations.
pub type ClipboardResult<T> = Result<T, ClipboardError>;

// ============================================================================
// Configuration
// ============================================================================

/// Resolved clipboard settings handed to the backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardConfig {
    /// Encoding of the bytes piped into external tools.
    pub encoding: &'static Encoding,
    /// Whether external tools are tried before `arboard`.
    pub prefer_external_tools: bool,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            encoding: default_clipboard_encoding(),
            prefer_external_tools: true,
        }
    }
}

/// The text encoding the platform clipboard pipe expects.
#[must_use]
pub fn default_clipboard_encoding() -> &'static Encoding {
    if cfg!(windows) { GBK } else { UTF_8 }
}

/// Encodes `text` for a clipboard pipe.
///
/// # Errors
///
/// Returns [`ClipboardError::Encode`] if any character has no mapping in
/// `encoding`.
pub fn encode_for_clipboard(text: &str, encoding: &'static Encoding) -> ClipboardResult<Vec<u8>> {
    let (bytes, used, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(ClipboardError::Encode {
            encoding: used.name(),
        });
    }
    Ok(bytes.into_owned())
}

// ============================================================================
// ClipboardWriter
// ============================================================================

/// The capability of placing text on the system clipboard.
pub trait ClipboardWriter {
    /// Short backend name for logs and console messages.
    fn name(&self) -> &str;

    /// Places `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError::Unsupported`] when no clipboard exists here,
    /// or another variant when the copy itself fails.
    fn write_text(&self, text: &str) -> ClipboardResult<()>;
}

// ============================================================================
// Command Backend
// ============================================================================

/// Pipes encoded text into an external clipboard tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
    encoding: &'static Encoding,
}

impl CommandClipboard {
    /// Creates a backend for `program` with fixed `args`.
    #[must_use]
    pub fn new<S: Into<String>>(
        program: impl Into<String>,
        args: impl IntoIterator<Item = S>,
        encoding: &'static Encoding,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            encoding,
        }
    }

    /// Lists the clipboard tools usable on the running platform, in the
    /// order they should be tried.
    ///
    /// # Returns
    ///
    /// An empty list when the platform has no known tool or none is usable.
    #[must_use]
    pub fn candidates(encoding: &'static Encoding) -> Vec<Self> {
        #[cfg(windows)]
        {
            vec![Self::new("clip", Vec::<String>::new(), encoding)]
        }

        #[cfg(target_os = "macos")]
        {
            vec![Self::new("pbcopy", Vec::<String>::new(), encoding)]
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            DisplayEnv::from_env()
                .usable_tools()
                .into_iter()
                .filter(|(tool, _)| Self::is_installed(tool))
                .map(|(tool, args)| Self::new(tool, args.iter().copied(), encoding))
                .collect()
        }

        #[cfg(not(any(windows, unix)))]
        {
            let _ = encoding;
            Vec::new()
        }
    }

    /// Checks whether `tool` is on `PATH`.
    #[cfg(all(unix, not(target_os = "macos")))]
    fn is_installed(tool: &str) -> bool {
        Command::new("which")
            .arg(tool)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// Which display servers the Linux clipboard tools can reach.
#[cfg(all(unix, not(target_os = "macos")))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayEnv {
    /// `WAYLAND_DISPLAY` is set.
    pub wayland: bool,
    /// `DISPLAY` is set.
    pub x11: bool,
}

#[cfg(all(unix, not(target_os = "macos")))]
impl DisplayEnv {
    /// Reads the display variables of the current process.
    #[must_use]
    pub fn from_env() -> Self {
        let is_set = |name: &str| std::env::var_os(name).is_some_and(|value| !value.is_empty());
        Self {
            wayland: is_set("WAYLAND_DISPLAY"),
            x11: is_set("DISPLAY"),
        }
    }

    /// Tools that can reach a display server here, with their arguments.
    #[must_use]
    pub fn usable_tools(self) -> Vec<(&'static str, &'static [&'static str])> {
        let mut tools: Vec<(&'static str, &'static [&'static str])> = Vec::new();
        if self.wayland {
            tools.push(("wl-copy", &[]));
        }
        if self.x11 {
            tools.push(("xclip", &["-selection", "clipboard"]));
            tools.push(("xsel", &["--clipboard", "--input"]));
        }
        tools
    }
}

impl ClipboardWriter for CommandClipboard {
    fn name(&self) -> &str {
        &self.program
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        let bytes = encode_for_clipboard(text, self.encoding)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::copy_failed(format!("{}: {e}", self.program)))?;

        let Some(mut stdin) = child.stdin.take() else {
            return Err(ClipboardError::copy_failed(format!(
                "{}: stdin unavailable",
                self.program
            )));
        };

        let written = stdin.write_all(&bytes);
        // Close the pipe so the tool sees EOF before we wait on it.
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| ClipboardError::copy_failed(format!("{}: {e}", self.program)))?;
        written.map_err(|e| ClipboardError::copy_failed(format!("{}: {e}", self.program)))?;

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::copy_failed(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}

// ============================================================================
// Arboard Backend
// ============================================================================

/// Writes through the `arboard` crate's native clipboard handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArboardClipboard;

impl ArboardClipboard {
    /// Whether a native clipboard handle can be opened.
    #[must_use]
    pub fn is_available() -> bool {
        arboard::Clipboard::new().is_ok()
    }
}

impl ClipboardWriter for ArboardClipboard {
    fn name(&self) -> &str {
        "arboard"
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        let mut clipboard = arboard::Clipboard::new().map_err(|_| ClipboardError::Unsupported)?;

        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::copy_failed(e.to_string()))
    }
}

// ============================================================================
// Console Fallback
// ============================================================================

/// Stand-in for environments with no clipboard at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFallback;

impl ClipboardWriter for ConsoleFallback {
    fn name(&self) -> &str {
        std::env::consts::OS
    }

    fn write_text(&self, _text: &str) -> ClipboardResult<()> {
        Err(ClipboardError::Unsupported)
    }
}

// ============================================================================
// Fallback Chain
// ============================================================================

/// Tries several backends in order until one succeeds.
///
/// Encoding failures stop the chain since every backend shares the text.
/// When every backend fails the write reports [`ClipboardError::Unsupported`].
pub struct FallbackClipboard {
    name: String,
    backends: Vec<Box<dyn ClipboardWriter>>,
}

impl FallbackClipboard {
    /// Creates a chain over `backends`, first one tried first.
    #[must_use]
    pub fn new(backends: Vec<Box<dyn ClipboardWriter>>) -> Self {
        let name = backends
            .iter()
            .map(|backend| backend.name())
            .collect::<Vec<_>>()
            .join(", ");
        Self { name, backends }
    }
}

impl ClipboardWriter for FallbackClipboard {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        for backend in &self.backends {
            match backend.write_text(text) {
                Ok(()) => {
                    tracing::debug!("Copied with clipboard backend '{}'", backend.name());
                    return Ok(());
                }
                Err(err @ ClipboardError::Encode { .. }) => return Err(err),
                Err(err) => {
                    tracing::warn!("Clipboard backend '{}' failed: {err}", backend.name());
                }
            }
        }
        Err(ClipboardError::Unsupported)
    }
}

/// Chooses the clipboard backend for this process.
#[must_use]
pub fn select_backend(config: &ClipboardConfig) -> Box<dyn ClipboardWriter> {
    let tools = if config.prefer_external_tools {
        CommandClipboard::candidates(config.encoding)
    } else {
        Vec::new()
    };

    if cfg!(all(unix, not(target_os = "macos"))) {
        // Linux tools depend on a live display session, so any of them may fail.
        let mut chain: Vec<Box<dyn ClipboardWriter>> = tools
            .into_iter()
            .map(|tool| Box::new(tool) as Box<dyn ClipboardWriter>)
            .collect();
        chain.push(Box::new(ArboardClipboard));

        let chain = FallbackClipboard::new(chain);
        tracing::debug!("Using clipboard chain '{}'", chain.name());
        return Box::new(chain);
    }

    if let Some(tool) = tools.into_iter().next() {
        tracing::debug!("Using clipboard tool '{}'", tool.name());
        return Box::new(tool);
    }

    if ArboardClipboard::is_available() {
        tracing::debug!("Using arboard clipboard");
        return Box::new(ArboardClipboard);
    }

    tracing::info!("No clipboard mechanism found, output goes to the console");
    Box::new(ConsoleFallback)
}

// ============================================================================
// Clipboard Manager
// ============================================================================

/// What happened to a path list handed to the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The list was empty; the clipboard was not touched.
    NothingToCopy,
    /// The joined list is on the clipboard.
    Copied {
        /// Number of paths copied.
        count: usize,
    },
    /// No clipboard here; the caller should show `text` for manual copying.
    Unsupported {
        /// The newline-joined paths.
        text: String,
    },
}

/// Owns the selected backend and turns path lists into clipboard writes.
pub struct ClipboardManager {
    writer: Box<dyn ClipboardWriter>,
}

impl ClipboardManager {
    /// Wraps an already chosen backend.
    #[must_use]
    pub fn new(writer: Box<dyn ClipboardWriter>) -> Self {
        Self { writer }
    }

    /// Selects the backend for this platform from `config`.
    #[must_use]
    pub fn from_config(config: &ClipboardConfig) -> Self {
        Self::new(select_backend(config))
    }

    /// Name of the active backend.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.writer.name()
    }

    /// Copies `paths`, newline-joined, to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error for any clipboard failure other than
    /// [`ClipboardError::Unsupported`], which maps to
    /// [`CopyOutcome::Unsupported`].
    pub fn copy_paths(&self, paths: &PathList) -> ClipboardResult<CopyOutcome> {
        if paths.is_empty() {
            return Ok(CopyOutcome::NothingToCopy);
        }

        let text = paths.joined();
        match self.writer.write_text(&text) {
            Ok(()) => Ok(CopyOutcome::Copied { count: paths.len() }),
            Err(ClipboardError::Unsupported) => Ok(CopyOutcome::Unsupported { text }),
            Err(err) => Err(err),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize;
    use crate::test_utils::{FailingClipboard, RecordingClipboard};

    #[test]
    fn test_empty_list_is_nothing_to_copy() {
        let recorder = RecordingClipboard::new();
        let manager = ClipboardManager::new(Box::new(recorder.clone()));

        let outcome = manager.copy_paths(&PathList::default()).unwrap();
        assert_eq!(outcome, CopyOutcome::NothingToCopy);
        assert!(recorder.writes().is_empty(), "clipboard must stay untouched");
    }

    #[test]
    fn test_copies_joined_text() {
        let recorder = RecordingClipboard::new();
        let manager = ClipboardManager::new(Box::new(recorder.clone()));

        let outcome = manager.copy_paths(&normalize(["y.txt", "x.txt"])).unwrap();
        assert_eq!(outcome, CopyOutcome::Copied { count: 2 });
        assert_eq!(recorder.writes(), vec!["x.txt\ny.txt".to_string()]);
    }

    #[test]
    fn test_console_fallback_is_unsupported() {
        let manager = ClipboardManager::new(Box::new(ConsoleFallback));

        let outcome = manager.copy_paths(&normalize(["x.txt", "y.txt"])).unwrap();
        assert_eq!(
            outcome,
            CopyOutcome::Unsupported {
                text: "x.txt\ny.txt".to_string()
            }
        );
        assert_eq!(manager.backend_name(), std::env::consts::OS);
    }

    #[test]
    fn test_copy_failure_propagates() {
        let manager = ClipboardManager::new(Box::new(FailingClipboard::new("pipe closed")));

        match manager.copy_paths(&normalize(["a"])) {
            Err(ClipboardError::CopyFailed(msg)) => assert_eq!(msg, "pipe closed"),
            other => panic!("Expected CopyFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_uses_first_working_backend() {
        let recorder = RecordingClipboard::new();
        let chain = FallbackClipboard::new(vec![
            Box::new(FailingClipboard::new("no display")),
            Box::new(recorder.clone()),
        ]);

        chain.write_text("a.txt").unwrap();
        assert_eq!(recorder.writes(), vec!["a.txt".to_string()]);
        assert_eq!(chain.name(), "failing, recording");
    }

    #[test]
    fn test_chain_of_failures_degrades_to_console() {
        let chain = FallbackClipboard::new(vec![
            Box::new(FailingClipboard::new("Can't open display")),
            Box::new(FailingClipboard::new("no clipboard owner")),
        ]);
        let manager = ClipboardManager::new(Box::new(chain));

        let outcome = manager.copy_paths(&normalize(["y.txt", "x.txt"])).unwrap();
        assert_eq!(
            outcome,
            CopyOutcome::Unsupported {
                text: "x.txt\ny.txt".to_string()
            }
        );
    }

    #[test]
    fn test_empty_chain_is_unsupported() {
        let chain = FallbackClipboard::new(Vec::new());
        assert!(matches!(
            chain.write_text("x"),
            Err(ClipboardError::Unsupported)
        ));
    }

    #[test]
    fn test_chain_stops_on_encode_error() {
        let recorder = RecordingClipboard::new();
        let chain = FallbackClipboard::new(vec![
            Box::new(CommandClipboard::new("clip", Vec::<String>::new(), GBK)),
            Box::new(recorder.clone()),
        ]);

        assert!(matches!(
            chain.write_text("emoji 😀"),
            Err(ClipboardError::Encode { .. })
        ));
        assert!(recorder.writes().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_chain_falls_through_failing_tool() {
        let chain = FallbackClipboard::new(vec![Box::new(CommandClipboard::new(
            "false",
            Vec::<String>::new(),
            UTF_8,
        ))]);
        let manager = ClipboardManager::new(Box::new(chain));

        let outcome = manager.copy_paths(&normalize(["x.txt"])).unwrap();
        assert!(matches!(outcome, CopyOutcome::Unsupported { .. }));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[rstest::rstest]
    #[case::headless(false, false, vec![])]
    #[case::x11(false, true, vec!["xclip", "xsel"])]
    #[case::wayland(true, false, vec!["wl-copy"])]
    #[case::both(true, true, vec!["wl-copy", "xclip", "xsel"])]
    fn test_tools_need_a_display(
        #[case] wayland: bool,
        #[case] x11: bool,
        #[case] expected: Vec<&str>,
    ) {
        let tools = DisplayEnv { wayland, x11 }.usable_tools();
        let names: Vec<&str> = tools.iter().map(|(tool, _)| *tool).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_encode_gbk() {
        let bytes = encode_for_clipboard("中文.txt", GBK).unwrap();
        assert_eq!(bytes, vec![0xD6, 0xD0, 0xCE, 0xC4, b'.', b't', b'x', b't']);
    }

    #[test]
    fn test_encode_rejects_unmappable() {
        match encode_for_clipboard("emoji 😀", GBK) {
            Err(ClipboardError::Encode { encoding }) => assert_eq!(encoding, "GBK"),
            other => panic!("Expected Encode error, got {other:?}"),
        }
        assert!(encode_for_clipboard("emoji 😀", UTF_8).is_ok());
    }

    #[test]
    fn test_default_config_uses_platform_encoding() {
        let config = ClipboardConfig::default();
        assert_eq!(config.encoding, default_clipboard_encoding());
        assert!(config.prefer_external_tools);
    }

    #[test]
    fn test_select_backend_does_not_panic() {
        // Which backend wins depends on the machine running the tests.
        let backend = select_backend(&ClipboardConfig::default());
        assert!(!backend.name().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_backend_pipes_encoded_bytes() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("clipboard.bin");
        let tool = CommandClipboard::new(
            "sh",
            ["-c".to_string(), "cat > \"$0\"".to_string(), target.display().to_string()],
            GBK,
        );

        tool.write_text("中文.txt").unwrap();

        let written = std::fs::read(&target).unwrap();
        assert_eq!(written, vec![0xD6, 0xD0, 0xCE, 0xC4, b'.', b't', b'x', b't']);
        assert_eq!(tool.name(), "sh");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_backend_reports_exit_status() {
        let tool = CommandClipboard::new("false", Vec::<String>::new(), UTF_8);
        assert!(matches!(
            tool.write_text("x"),
            Err(ClipboardError::CopyFailed(_))
        ));
    }

    #[test]
    fn test_command_backend_missing_program() {
        let tool = CommandClipboard::new(
            "pathclip-definitely-not-a-real-tool",
            Vec::<String>::new(),
            UTF_8,
        );
        match tool.write_text("x") {
            Err(ClipboardError::CopyFailed(msg)) => {
                assert!(msg.starts_with("pathclip-definitely-not-a-real-tool: "));
            }
            other => panic!("Expected CopyFailed, got {other:?}"),
        }
    }
}
