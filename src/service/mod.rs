//! Request validation shared by the product routes.

pub mod validation;

pub use validation::{handle_input_errors, ErrorCollector, FieldError, RequestInput, Rule};
