//! Suite configuration

pub mod defaults;
mod layout;
mod loader;
mod types;
pub mod validation;

pub use defaults::*;
pub use layout::*;
pub use loader::*;
pub use types::*;
pub use validation::*;
