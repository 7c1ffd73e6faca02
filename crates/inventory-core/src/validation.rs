//! Schema checks for product request bodies.
//!
//! Bodies arrive as untyped JSON so that every offending field can be
//! reported at once, with a machine-readable code and the field path,
//! instead of failing on the first type mismatch.

use crate::error::ValidationError;
use crate::product::{NewProduct, ProductPatch};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::str::FromStr;

pub const NAME_FIELD: &str = "nombre";
pub const DESCRIPTION_FIELD: &str = "descripcion";
pub const PRICE_FIELD: &str = "precio";

/// Width of the `name` column.
pub const MAX_NAME_CHARS: usize = 255;

/// Fractional digits kept for prices.
pub const PRICE_SCALE: u32 = 2;

/// Largest price that fits a `DECIMAL(12,2)` column.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    TooSmall,
    TooBig,
    InvalidJson,
}

/// One problem with one field of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub code: IssueCode,
    pub path: Vec<String>,
    pub message: String,
}

impl FieldIssue {
    pub fn new(code: IssueCode, field: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            path: vec![field.to_owned()],
            message: message.into(),
        }
    }

    /// An issue about the body as a whole rather than one of its fields.
    pub fn body(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            path: Vec::new(),
            message: message.into(),
        }
    }
}

/// Validates a create body: `nombre` and `precio` are required.
pub fn validate_create(body: &Value) -> Result<NewProduct, ValidationError> {
    let fields = as_object(body)?;
    let mut issues = Issues::default();

    let name = issues.check(match fields.get(NAME_FIELD) {
        Some(value) => parse_name(value),
        None => Err(required(NAME_FIELD, "string")),
    });
    let description = issues.check(match fields.get(DESCRIPTION_FIELD) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse_description(value).map(Some),
    });
    let price = issues.check(match fields.get(PRICE_FIELD) {
        Some(value) => parse_price(value),
        None => Err(required(PRICE_FIELD, "number")),
    });

    let (Some(name), Some(description), Some(price)) = (name, description, price) else {
        return Err(ValidationError(issues.0));
    };

    Ok(NewProduct {
        name,
        description,
        price,
    })
}

/// Validates an update body: only the fields present are checked.
///
/// An empty object yields an empty [`ProductPatch`].
pub fn validate_patch(body: &Value) -> Result<ProductPatch, ValidationError> {
    let fields = as_object(body)?;
    let mut issues = Issues::default();

    let name = fields
        .get(NAME_FIELD)
        .and_then(|value| issues.check(parse_name(value)));
    let description = fields.get(DESCRIPTION_FIELD).and_then(|value| match value {
        Value::Null => Some(None),
        value => issues.check(parse_description(value)).map(Some),
    });
    let price = fields
        .get(PRICE_FIELD)
        .and_then(|value| issues.check(parse_price(value)));

    issues.finish()?;

    Ok(ProductPatch {
        name,
        description,
        price,
    })
}

#[derive(Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn check<T>(&mut self, result: Result<T, FieldIssue>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(issue) => {
                self.0.push(issue);
                None
            }
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self.0))
        }
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or_else(|| {
        ValidationError::single(FieldIssue::body(
            IssueCode::InvalidType,
            format!("Expected object, received {}", kind(body)),
        ))
    })
}

fn required(field: &str, expected: &str) -> FieldIssue {
    FieldIssue::new(
        IssueCode::InvalidType,
        field,
        format!("Required: expected {expected}"),
    )
}

fn mismatch(field: &str, expected: &str, value: &Value) -> FieldIssue {
    FieldIssue::new(
        IssueCode::InvalidType,
        field,
        format!("Expected {expected}, received {}", kind(value)),
    )
}

fn parse_name(value: &Value) -> Result<String, FieldIssue> {
    let Value::String(name) = value else {
        return Err(mismatch(NAME_FIELD, "string", value));
    };

    if name.is_empty() {
        return Err(FieldIssue::new(
            IssueCode::TooSmall,
            NAME_FIELD,
            "String must contain at least 1 character(s)",
        ));
    }

    if name.chars().count() > MAX_NAME_CHARS {
        return Err(FieldIssue::new(
            IssueCode::TooBig,
            NAME_FIELD,
            format!("String must contain at most {MAX_NAME_CHARS} character(s)"),
        ));
    }

    Ok(name.clone())
}

fn parse_description(value: &Value) -> Result<String, FieldIssue> {
    match value {
        Value::String(description) => Ok(description.clone()),
        other => Err(mismatch(DESCRIPTION_FIELD, "string", other)),
    }
}

fn parse_price(value: &Value) -> Result<Decimal, FieldIssue> {
    let Value::Number(number) = value else {
        return Err(mismatch(PRICE_FIELD, "number", value));
    };

    // Sign first, so huge negatives are too small rather than out of range.
    // `-0` compares equal to zero and passes.
    if number.as_f64().is_some_and(|value| value < 0.0) {
        return Err(FieldIssue::new(
            IssueCode::TooSmall,
            PRICE_FIELD,
            "Number must be greater than or equal to 0",
        ));
    }

    let out_of_range =
        || FieldIssue::new(IssueCode::TooBig, PRICE_FIELD, "Number is out of range");
    let price = to_decimal(number).ok_or_else(out_of_range)?;

    let price = normalize_price(price);
    if price > MAX_PRICE {
        return Err(FieldIssue::new(
            IssueCode::TooBig,
            PRICE_FIELD,
            format!("Number must be less than or equal to {MAX_PRICE}"),
        ));
    }

    Ok(price)
}

/// Rounds to [`PRICE_SCALE`] digits and fixes the scale so that stored and
/// in-flight prices compare equal.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut price =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if price.is_zero() {
        price = Decimal::ZERO;
    }
    price.rescale(PRICE_SCALE);
    price
}

fn to_decimal(number: &Number) -> Option<Decimal> {
    if let Some(value) = number.as_i64() {
        return Some(Decimal::from(value));
    }
    if let Some(value) = number.as_u64() {
        return Some(Decimal::from(value));
    }

    // floats print in shortest round-trip form, e.g. `25.5` or `1e-7`
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .or_else(|| number.as_f64().and_then(|value| Decimal::try_from(value).ok()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
