//! quill application library
//!
//! Author and post records, the field rules that gate their creation and
//! mutation, and the HTTP modules that expose them.

pub mod modules;
pub mod utils;
pub mod validation;

pub use validation::ValidationError;
