//! Outrig Sync - keeps a vendored source tree identical to its canonical copy
//!
//! [`TreeVerifier`] walks a canonical tree and either stops at the first
//! file whose mirror differs, or overwrites every divergent mirror file.

pub mod compare;
pub mod verify;

pub use compare::files_equal;
pub use verify::{SyncMode, TreeVerifier, VerifyOptions, VerifyReport};
