//! Decoding diagnostics.
//!
//! A [`Sentinel`] lives for exactly one top-level decode call. Decoders
//! record [`LogItem`]s into it as they patch over missing keys, nulls and
//! mismatched types; at the end of the call the items are grouped by
//! coding path and rendered into one indented report:
//!
//! ```text
//! ============ smart-json sentinel · session 5f1c02aa =============
//! Order
//!     id : No value associated with key.
//!     items
//!         [1]: Item
//!             price : Expected to decode 'f64' but found 'String' instead.
//! ================================================================
//! ```
//!
//! Recording is gated by the process-wide [`DebugLevel`]; at
//! [`DebugLevel::None`] nothing is built at all.

mod item;
mod level;
mod sentinel;

pub use item::{LogContainer, LogItem, LogKind};
pub use level::{clear_log_handler, debug_level, set_debug_level, set_log_handler, DebugLevel, LogHandler};
pub use sentinel::Sentinel;
