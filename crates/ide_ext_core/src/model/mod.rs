//! Domain model for extensions and the documents they edit.
//!
//! # Responsibility
//! - Define the extension declaration and lifecycle contract.
//! - Define sessions and the document resources they own.
//!
//! # Invariants
//! - Every extension is identified by a unique path.
//! - Every session is identified by a stable `SessionId`.

pub mod document;
pub mod extension;
pub mod session;
