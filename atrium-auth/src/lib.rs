//! atrium-auth: who is calling, and did the platform runtime invoke us.

pub mod core;
pub mod options;

pub use crate::core::*;
pub use options::*;
