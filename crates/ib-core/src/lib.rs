//! ishi-board/crates/ib-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Ishi-Board.

pub mod models;
pub mod traits;
pub mod error;
pub mod resolver;
pub mod color;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
pub use resolver::*;
pub use color::*;
