//! Pending Operation Log and Apply Engine
//!
//! Writes made through the property model are buffered in an
//! [`OperationLog`] as [`PendingOp`]s addressed by logical path. Nothing
//! touches the syntax tree until [`ApplyEngine::run`] replays the log:
//!
//! ```text
//! handle write → PendingOp → OperationLog ──apply──→ structural edits → new root
//!                               ↑                          │
//!                      reads fold the log          blank blocks elided
//! ```

mod apply;
mod log;

pub use apply::{ApplyEngine, ApplyReport, ApplyWarning, WarningKind, is_identifier};
pub use log::{OpTarget, OperationLog, PendingOp};
