//! `key=value` field extraction for log lines.

use crate::error::DecodeError;
use regex::Regex;
use std::sync::OnceLock;

fn field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(\w+)=(?:"([^"]*)"|"([^"]*)$|([^\s"]+))"#).expect("field pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Quoting {
    Bare,
    Quoted,
    /// Opening quote with no closing one before the end of the line
    Unterminated,
}

/// One `key=value` pair; quoted values are stored without their quotes
#[derive(Debug, Clone, PartialEq)]
struct Field<'a> {
    key: &'a str,
    value: &'a str,
    quoting: Quoting,
}

/// The `key=value` fields of one log line
#[derive(Debug)]
pub struct Fields<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> Fields<'a> {
    /// Scan a line for `key=value` and `key="value"` pairs
    pub fn parse(line: &'a str) -> Self {
        let fields = field_pattern()
            .captures_iter(line)
            .filter_map(|caps| {
                let key = caps.get(1)?.as_str();
                let (value, quoting) = if let Some(quoted) = caps.get(2) {
                    (quoted, Quoting::Quoted)
                } else if let Some(open) = caps.get(3) {
                    (open, Quoting::Unterminated)
                } else {
                    (caps.get(4)?, Quoting::Bare)
                };
                Some(Field {
                    key,
                    value: value.as_str(),
                    quoting,
                })
            })
            .collect();

        Self { fields }
    }

    fn get(&self, name: &str) -> Result<&Field<'a>, DecodeError> {
        let field = self
            .fields
            .iter()
            .find(|f| f.key == name)
            .ok_or_else(|| DecodeError::missing(name))?;
        if field.quoting == Quoting::Unterminated {
            return Err(DecodeError::invalid(
                name,
                format!("\"{}", field.value),
                "unterminated quote",
            ));
        }
        Ok(field)
    }

    /// A numeric field, e.g. `a=1.5` or `a=-2`
    ///
    /// Only decimal notation is accepted; `NaN` and `inf` are rejected.
    pub fn float(&self, name: &str) -> Result<f64, DecodeError> {
        let field = self.get(name)?;
        if field.quoting == Quoting::Quoted {
            return Err(DecodeError::invalid(name, field.value, "expected an unquoted number"));
        }
        let digits = field.value.strip_prefix('-').unwrap_or(field.value);
        if !digits.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(DecodeError::invalid(name, field.value, "expected a number"));
        }
        let value: f64 = field
            .value
            .parse()
            .map_err(|e| DecodeError::invalid(name, field.value, e))?;
        if !value.is_finite() {
            return Err(DecodeError::invalid(name, field.value, "number out of range"));
        }
        Ok(value)
    }

    /// A quoted word, e.g. `abc="hello"`
    pub fn word(&self, name: &str) -> Result<String, DecodeError> {
        let field = self.get(name)?;
        if field.quoting != Quoting::Quoted {
            return Err(DecodeError::invalid(name, field.value, "expected a quoted string"));
        }
        if field.value.is_empty() || !field.value.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(DecodeError::invalid(name, field.value, "expected a single word"));
        }
        Ok(field.value.to_string())
    }

    /// Any quoted or bare text
    pub fn text(&self, name: &str) -> Result<String, DecodeError> {
        Ok(self.get(name)?.value.to_string())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
