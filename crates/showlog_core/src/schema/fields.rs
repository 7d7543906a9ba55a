//! Payload field readers shared by the schemas' `load`.
//!
//! Messages follow one vocabulary across schemas so callers can show them
//! verbatim.

use crate::schema::{FieldErrors, SchemaError, SchemaResult, SCHEMA_ERROR_KEY};
use serde_json::{Map, Value};

pub(crate) const MISSING: &str = "Missing data for required field.";
pub(crate) const NULL: &str = "Field may not be null.";
pub(crate) const NOT_INTEGER: &str = "Not a valid integer.";
pub(crate) const NOT_STRING: &str = "Not a valid string.";
pub(crate) const NOT_POSITIVE_ID: &str = "ID must be a positive integer.";
pub(crate) const UNKNOWN: &str = "Unknown field.";
pub(crate) const INVALID_INPUT: &str = "Invalid input type.";

/// Field reader over one JSON object that accumulates errors.
pub(crate) struct Payload<'a> {
    object: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> Payload<'a> {
    /// Wraps `value`, flagging every key outside `fields` and `dump_only`.
    pub(crate) fn open(
        value: &'a Value,
        fields: &[&str],
        dump_only: &[&str],
    ) -> SchemaResult<Self> {
        let Some(object) = value.as_object() else {
            let mut errors = FieldErrors::new();
            errors.add(SCHEMA_ERROR_KEY, INVALID_INPUT);
            return Err(SchemaError::Invalid(errors));
        };

        let mut errors = FieldErrors::new();
        for key in object.keys() {
            let key = key.as_str();
            if !fields.contains(&key) && !dump_only.contains(&key) {
                errors.add(key, UNKNOWN);
            }
        }

        Ok(Self { object, errors })
    }

    pub(crate) fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }

    /// Reads a required integer field.
    pub(crate) fn required_int(&mut self, field: &str) -> Option<i64> {
        let value = self.required(field)?;
        match as_int(value) {
            Some(parsed) => Some(parsed),
            None => {
                self.errors.add(field, NOT_INTEGER);
                None
            }
        }
    }

    /// Reads a required string field.
    pub(crate) fn required_str(&mut self, field: &str) -> Option<String> {
        let value = self.required(field)?;
        match value {
            Value::String(text) => Some(text.clone()),
            _ => {
                self.errors.add(field, NOT_STRING);
                None
            }
        }
    }

    /// Reads the optional surrogate key.
    pub(crate) fn optional_id(&mut self) -> Option<i64> {
        let object = self.object;
        let value = match object.get("id") {
            None | Some(Value::Null) => return None,
            Some(value) => value,
        };
        match as_int(value) {
            Some(id) if id > 0 => Some(id),
            Some(_) => {
                self.errors.add("id", NOT_POSITIVE_ID);
                None
            }
            None => {
                self.errors.add("id", NOT_INTEGER);
                None
            }
        }
    }

    /// Consumes the reader, handing back `values` when nothing was recorded.
    ///
    /// Every reader that yields `None` records an error first, so `values`
    /// is `None` only alongside a non-empty error map.
    pub(crate) fn finish<T>(self, values: Option<T>) -> SchemaResult<T> {
        match values {
            Some(values) if self.errors.is_empty() => Ok(values),
            _ => Err(SchemaError::Invalid(self.errors)),
        }
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let object = self.object;
        match object.get(field) {
            None => {
                self.errors.add(field, MISSING);
                None
            }
            Some(Value::Null) => {
                self.errors.add(field, NULL);
                None
            }
            Some(value) => Some(value),
        }
    }
}

/// Parses a JSON byte payload into a value.
pub(crate) fn parse_slice(bytes: &[u8]) -> SchemaResult<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{as_int, Payload, MISSING, NOT_INTEGER, NULL, UNKNOWN};
    use serde_json::json;

    #[test]
    fn integers_accept_numeric_strings_and_integral_floats() {
        assert_eq!(as_int(&json!(4)), Some(4));
        assert_eq!(as_int(&json!(4.0)), Some(4));
        assert_eq!(as_int(&json!(" 4 ")), Some(4));
        assert_eq!(as_int(&json!(4.5)), None);
        assert_eq!(as_int(&json!(true)), None);
        assert_eq!(as_int(&json!("four")), None);
    }

    #[test]
    fn reader_collects_every_problem() {
        let value = json!({ "number": "x", "date": null, "extra": 1 });
        let mut payload =
            Payload::open(&value, &["date", "number", "rating"], &["links"]).unwrap();

        let date = payload.required_str("date");
        let number = payload.required_int("number");
        let rating = payload.required_int("rating");
        assert_eq!((&date, number, rating), (&None, None, None));

        let errors = payload.finish(date.zip(number).zip(rating)).unwrap_err();
        let errors = errors.field_errors().unwrap();
        assert_eq!(errors.get("date"), Some(&[NULL.to_string()][..]));
        assert_eq!(errors.get("number"), Some(&[NOT_INTEGER.to_string()][..]));
        assert_eq!(errors.get("rating"), Some(&[MISSING.to_string()][..]));
        assert_eq!(errors.get("extra"), Some(&[UNKNOWN.to_string()][..]));
    }

    #[test]
    fn dump_only_keys_are_ignored() {
        let value = json!({ "links": {}, "appearance_list": [] });
        let payload = Payload::open(&value, &["id"], &["links", "appearance_list"]).unwrap();
        assert!(payload.finish(Some(())).is_ok());
    }

    #[test]
    fn recorded_error_wins_over_read_values() {
        let value = json!({ "number": 3, "colour": "red" });
        let mut payload = Payload::open(&value, &["number"], &[]).unwrap();
        let number = payload.required_int("number");
        assert_eq!(number, Some(3));

        let errors = payload.finish(number).unwrap_err();
        let errors = errors.field_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("colour"), Some(&[UNKNOWN.to_string()][..]));
    }
}
