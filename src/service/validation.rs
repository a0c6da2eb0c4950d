//! Request validation: ordered rule tables, a per-request error collector,
//! and the gate that decides whether a handler may run.
//!
//! Every rule is evaluated, even when an earlier rule on the same field has
//! already failed, so a single field can contribute several errors.

use crate::error::AppError;
use crate::model::ProductFields;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::sync::LazyLock;
use utoipa::ToSchema;

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$").expect("numeric pattern compiles")
});
static INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(0|[1-9][0-9]*)$").expect("integer pattern compiles")
});

/// Floats in `[PLAIN_MIN, PLAIN_MAX)` render as plain decimals; the rest use
/// exponent notation and so never read as numeric text.
const PLAIN_MIN: f64 = 1e-6;
const PLAIN_MAX: f64 = 1e21;

pub const MSG_INVALID_ID: &str = "ID no válido";
pub const MSG_NAME_EMPTY: &str = "El nombre del Producto no puede ir vacio";
pub const MSG_PRICE_NOT_NUMERIC: &str = "Valor no valido";
pub const MSG_PRICE_EMPTY: &str = "El precio del Producto no puede ir vacio";
pub const MSG_PRICE_INVALID: &str = "Precio no válido";
pub const MSG_AVAILABILITY_INVALID: &str = "Valor para disponibilidad no válido";

/// Where a validated value was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Field,
}

/// One failed rule, as reported to the client.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: ErrorType,
    /// Omitted when the field was absent from the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub value: Option<Value>,
    pub msg: String,
    pub path: String,
    pub location: Location,
}

impl FieldError {
    pub fn new(value: Option<Value>, msg: &str, path: &str, location: Location) -> Self {
        FieldError {
            kind: ErrorType::Field,
            value,
            msg: msg.to_string(),
            path: path.to_string(),
            location,
        }
    }
}

/// Predicate applied to a single field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Check {
    NotEmpty,
    Numeric,
    Boolean,
    Int,
    /// Loose numeric comparison `value > 0`.
    Positive,
}

impl Check {
    fn passes(self, value: Option<&Value>) -> bool {
        match self {
            Check::NotEmpty => !coerce_text(value).is_empty(),
            Check::Numeric => NUMERIC.is_match(&coerce_text(value)),
            Check::Boolean => coerce_bool(value).is_some(),
            Check::Int => INTEGER.is_match(&coerce_text(value)),
            Check::Positive => loose_number(value).is_some_and(|n| n > 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub location: Location,
    pub field: &'static str,
    pub check: Check,
    pub msg: &'static str,
}

impl Rule {
    pub const fn param(field: &'static str, check: Check, msg: &'static str) -> Self {
        Rule {
            location: Location::Params,
            field,
            check,
            msg,
        }
    }

    pub const fn body(field: &'static str, check: Check, msg: &'static str) -> Self {
        Rule {
            location: Location::Body,
            field,
            check,
            msg,
        }
    }
}

const ID_RULE: Rule = Rule::param("id", Check::Int, MSG_INVALID_ID);
const NAME_RULE: Rule = Rule::body("name", Check::NotEmpty, MSG_NAME_EMPTY);
const PRICE_RULES: [Rule; 3] = [
    Rule::body("price", Check::Numeric, MSG_PRICE_NOT_NUMERIC),
    Rule::body("price", Check::NotEmpty, MSG_PRICE_EMPTY),
    Rule::body("price", Check::Positive, MSG_PRICE_INVALID),
];

/// Rules for routes scoped by id only (get, patch, delete).
pub const ID_RULES: &[Rule] = &[ID_RULE];

pub const CREATE_RULES: &[Rule] = &[
    NAME_RULE,
    PRICE_RULES[0],
    PRICE_RULES[1],
    PRICE_RULES[2],
];

pub const REPLACE_RULES: &[Rule] = &[
    ID_RULE,
    NAME_RULE,
    PRICE_RULES[0],
    PRICE_RULES[1],
    PRICE_RULES[2],
    Rule::body("availability", Check::Boolean, MSG_AVAILABILITY_INVALID),
];

/// Untrusted request values the rules run against.
#[derive(Clone, Debug, Default)]
pub struct RequestInput {
    params: Map<String, Value>,
    body: Map<String, Value>,
}

impl RequestInput {
    pub fn new(params: Map<String, Value>, body: Map<String, Value>) -> Self {
        RequestInput { params, body }
    }

    pub fn get(&self, location: Location, field: &str) -> Option<&Value> {
        match location {
            Location::Params => self.params.get(field),
            Location::Body => self.body.get(field),
        }
    }
}

/// Per-request accumulator of rule failures, in evaluation order.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<FieldError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, rules: &[Rule], input: &RequestInput) {
        for rule in rules {
            let value = input.get(rule.location, rule.field);
            if !rule.check.passes(value) {
                self.errors.push(FieldError::new(
                    value.cloned(),
                    rule.msg,
                    rule.field,
                    rule.location,
                ));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// The single gate between untrusted input and handlers.
pub fn handle_input_errors(collector: ErrorCollector) -> Result<(), AppError> {
    if collector.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(collector.into_errors()))
    }
}

/// Run `rules` and pass them through the gate in one step.
pub fn validate(rules: &[Rule], input: &RequestInput) -> Result<(), AppError> {
    let mut collector = ErrorCollector::new();
    collector.run(rules, input);
    handle_input_errors(collector)
}

/// Build the write payload from a body that already passed the gate.
/// A body `availability` that reads as a boolean wins; otherwise
/// `default_availability` applies, and without one the field is required.
pub fn product_fields(
    input: &RequestInput,
    default_availability: Option<bool>,
) -> Result<ProductFields, AppError> {
    let name = coerce_text(input.get(Location::Body, "name"));
    let price = coerce_text(input.get(Location::Body, "price"))
        .parse::<f64>()
        .map_err(|_| AppError::BadRequest(MSG_PRICE_NOT_NUMERIC.into()))?;
    let availability = coerce_bool(input.get(Location::Body, "availability"))
        .or(default_availability)
        .ok_or_else(|| AppError::BadRequest(MSG_AVAILABILITY_INVALID.into()))?;
    Ok(ProductFields {
        name,
        price,
        availability,
    })
}

/// Text form of a JSON value; absent and `null` are empty.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Integers print as-is. Floats print as plain decimals inside the plain
/// range and in exponent form outside it.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if !(n.is_i64() || n.is_u64()) => {
            let magnitude = f.abs();
            if f == 0.0 || (PLAIN_MIN..PLAIN_MAX).contains(&magnitude) {
                format!("{f}")
            } else {
                format!("{f:e}")
            }
        }
        _ => n.to_string(),
    }
}

fn coerce_bool(value: Option<&Value>) -> Option<bool> {
    match coerce_text(value).as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Numeric reading used by the `> 0` comparison: blank strings count as zero,
/// `true` as one, and anything unparsable has no value.
fn loose_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse().ok().filter(|n: &f64| !n.is_nan())
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
