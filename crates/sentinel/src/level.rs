//! Process-wide sentinel settings: debug level and report handler.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

/// How much the sentinel records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugLevel {
    /// Nothing is recorded; decoders skip building log records entirely.
    #[default]
    None,
    /// Every anomaly is recorded.
    Verbose,
    /// Only type mismatches and corrupted data are recorded.
    Alert,
}

impl DebugLevel {
    fn to_u8(self) -> u8 {
        match self {
            DebugLevel::None => 0,
            DebugLevel::Verbose => 1,
            DebugLevel::Alert => 2,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => DebugLevel::Verbose,
            2 => DebugLevel::Alert,
            _ => DebugLevel::None,
        }
    }
}

static DEBUG_LEVEL: AtomicU8 = AtomicU8::new(0);

/// Sets the level new decode sessions pick up. Meant to be called once at
/// start-up, before any decoding begins.
pub fn set_debug_level(level: DebugLevel) {
    DEBUG_LEVEL.store(level.to_u8(), Ordering::Relaxed);
}

pub fn debug_level() -> DebugLevel {
    DebugLevel::from_u8(DEBUG_LEVEL.load(Ordering::Relaxed))
}

/// Receives every fully formatted report.
pub type LogHandler = Arc<dyn Fn(&str) + Send + Sync>;

static LOG_HANDLER: RwLock<Option<LogHandler>> = RwLock::new(None);

/// Routes reports to `handler` instead of `tracing`.
pub fn set_log_handler<F>(handler: F)
where
    F: Fn(&str) + Send + Sync + 'static,
{
    if let Ok(mut slot) = LOG_HANDLER.write() {
        *slot = Some(Arc::new(handler));
    }
}

pub fn clear_log_handler() {
    if let Ok(mut slot) = LOG_HANDLER.write() {
        *slot = None;
    }
}

pub(crate) fn log_handler() -> Option<LogHandler> {
    LOG_HANDLER.read().ok().and_then(|slot| slot.clone())
}
