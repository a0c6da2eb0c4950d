//! Request extractors that validate before a handler runs.

pub mod validated;

pub use validated::{NewProduct, ReplaceProduct, ValidId};
