//! Logging utilities with colored output and explicit tracers.
//!
//! This module provides:
//! - `log!` / `debug!` macros for formatted terminal output with colored prefixes
//! - [`Tracer`], the leveled and scoped reporting interface the engine receives
//!   explicitly instead of reaching for a global logger
//! - [`ConsoleTracer`] (terminal) and [`MemoryTracer`] (tests) implementations
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "rendering {} documents", count);
//!
//! let tracer = ConsoleTracer::new("build");
//! let tracer: &dyn Tracer = &tracer;
//! let _scope = tracer.open("world CK 1.0");
//! tracer.warn("unknown link type: muffin.docx");
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    fmt,
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "check" => prefix.bright_blue().bold().to_string(),
        "build" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        "warn" => prefix.bright_magenta().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Tracer
// ============================================================================

/// Severity of a traced message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Leveled, scoped reporting.
///
/// Purely observational: nothing a tracer does may affect control flow.
/// Implementations are shared across rayon workers, hence `Send + Sync`.
pub trait Tracer: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    /// Enter a nested scope. Paired with [`Tracer::leave`] by [`Scope`].
    fn enter(&self, message: &str);

    fn leave(&self);
}

impl<'t> dyn Tracer + 't {
    /// Open a scope that is closed when the returned guard drops.
    pub fn open(&self, message: &str) -> Scope<'_, 't> {
        self.enter(message);
        Scope { tracer: self }
    }

    #[inline]
    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Scope guard returned by `open`.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct Scope<'a, 't> {
    tracer: &'a (dyn Tracer + 't),
}

impl Drop for Scope<'_, '_> {
    fn drop(&mut self) {
        self.tracer.leave();
    }
}

/// Tracer writing through [`log`] with scope indentation.
///
/// Debug messages are only shown in verbose mode.
pub struct ConsoleTracer {
    module: &'static str,
    depth: AtomicUsize,
}

impl ConsoleTracer {
    pub const fn new(module: &'static str) -> Self {
        Self {
            module,
            depth: AtomicUsize::new(0),
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth.load(Ordering::Relaxed))
    }
}

impl Tracer for ConsoleTracer {
    fn emit(&self, level: Level, message: &str) {
        let indent = self.indent();
        match level {
            Level::Debug if is_verbose() => {
                log(self.module, &format!("{indent}{}", message.dimmed()));
            }
            Level::Debug => {}
            Level::Info => log(self.module, &format!("{indent}{message}")),
            Level::Warn => log("warn", &format!("{indent}{message}")),
            Level::Error => log("error", &format!("{indent}{message}")),
        }
    }

    fn enter(&self, message: &str) {
        if is_verbose() {
            log(self.module, &format!("{}{}", self.indent(), message.bold()));
        }
        self.depth.fetch_add(1, Ordering::Relaxed);
    }

    fn leave(&self) {
        // saturating: a stray leave never underflows
        let _ = self
            .depth
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| d.checked_sub(1));
    }
}

/// Tracer recording every message in memory.
#[derive(Default)]
pub struct MemoryTracer {
    entries: Mutex<Vec<(Level, String)>>,
    depth: AtomicUsize,
}

impl MemoryTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded messages, scope openings included at [`Level::Debug`].
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().clone()
    }

    /// Messages recorded at `level`, without indentation.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.trim_start().to_string())
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }
}

impl Tracer for MemoryTracer {
    fn emit(&self, level: Level, message: &str) {
        let indent = "  ".repeat(self.depth());
        self.entries.lock().push((level, format!("{indent}{message}")));
    }

    fn enter(&self, message: &str) {
        self.emit(Level::Debug, message);
        self.depth.fetch_add(1, Ordering::Relaxed);
    }

    fn leave(&self) {
        let _ = self
            .depth
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| d.checked_sub(1));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_guard_restores_depth() {
        let memory = MemoryTracer::new();
        let tracer: &dyn Tracer = &memory;
        {
            let _outer = tracer.open("world");
            assert_eq!(memory.depth(), 1);
            {
                let _inner = tracer.open("repository");
                tracer.warn("unknown link type");
                assert_eq!(memory.depth(), 2);
            }
            assert_eq!(memory.depth(), 1);
        }
        assert_eq!(memory.depth(), 0);

        let entries = memory.entries();
        assert_eq!(entries[0], (Level::Debug, "world".to_string()));
        assert_eq!(entries[1], (Level::Debug, "  repository".to_string()));
        assert_eq!(entries[2], (Level::Warn, "    unknown link type".to_string()));
    }

    #[test]
    fn test_messages_filters_by_level() {
        let memory = MemoryTracer::new();
        let tracer: &dyn Tracer = &memory;
        tracer.info("a");
        tracer.error("b");
        tracer.info("c");
        assert_eq!(memory.messages(Level::Info), ["a", "c"]);
        assert_eq!(memory.messages(Level::Error), ["b"]);
    }

    #[test]
    fn test_leave_never_underflows() {
        let memory = MemoryTracer::new();
        memory.leave();
        assert_eq!(memory.depth(), 0);
    }

    #[test]
    fn test_level_order() {
        assert!(Level::Error > Level::Warn);
        assert!(Level::Warn > Level::Info);
        assert_eq!(Level::Warn.to_string(), "warn");
    }
}
