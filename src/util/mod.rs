//! Shared utilities (hex formatting and CSV field escaping).

pub mod csv;
pub mod hex;
