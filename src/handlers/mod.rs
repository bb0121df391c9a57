//! Business logic handlers
//!
//! These handlers contain the bot logic that the HTTP API drives.

pub mod karuta;

// Re-export commonly used types
pub use karuta::*;
