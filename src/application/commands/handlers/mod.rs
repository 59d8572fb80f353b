//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod chapter_handlers;
mod reconcile_handlers;

pub use chapter_handlers::*;
pub use reconcile_handlers::*;
