//! rm-core: stable foundation for rollmill.
//!
//! Contains:
//! - literal (keystroke-tolerant numeric text parsing)
//! - numeric (Real + float helpers)
//! - ids (caller-assigned pass unit IDs)
//! - units (uom SI types + constructors)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod literal;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use literal::{LiteralState, classify, is_complete_numeric, is_partial_numeric, resolve};
pub use numeric::*;
pub use units::*;
