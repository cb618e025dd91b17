// Utility functions

pub mod helpers;
pub mod logger;

pub use helpers::*;
pub use logger::*;
