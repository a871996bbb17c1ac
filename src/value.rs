//! Scalar literals carried by [`InputValue`](crate::ast::InputValue)s.

use std::fmt;

use derive_more::with_trait::From;

/// Primitive value of a literal, typed by how it was written rather than by
/// any schema type.
#[derive(Clone, Debug, From, PartialEq)]
pub enum ScalarValue {
    /// Integer literal fitting into 32 bits.
    Int(i32),

    /// Float literal, or an integer literal too big for [`ScalarValue::Int`].
    Float(f64),

    /// String literal with escapes resolved.
    String(String),

    /// `true` or `false`.
    Boolean(bool),
}

impl ScalarValue {
    /// Returns the integer value, if this is an [`ScalarValue::Int`].
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float, converting integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(f64::from(*i)),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string value, if this is a [`ScalarValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a [`ScalarValue::Boolean`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

/// Prints the value as a GraphQL literal, so that it parses back to an equal
/// value.
impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        '\u{8}' => f.write_str("\\b")?,
                        '\u{c}' => f.write_str("\\f")?,
                        c if c < ' ' => write!(f, "\\u{:04X}", u32::from(c))?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarValue;

    #[test]
    fn prints_literals() {
        assert_eq!(ScalarValue::Int(-12).to_string(), "-12");
        assert_eq!(ScalarValue::Float(1.0).to_string(), "1.0");
        assert_eq!(ScalarValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ScalarValue::Boolean(false).to_string(), "false");
        assert_eq!(
            ScalarValue::from("say \"hi\"\n").to_string(),
            r#""say \"hi\"\n""#,
        );
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(ScalarValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ScalarValue::Float(3.0).as_int(), None);
    }
}
