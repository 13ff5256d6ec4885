use std::fmt;

use serde::Serialize;

/// The only kinds of value a key can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    Integer,
    Float,
    String,
}

impl ScalarType {
    /// Whether `value` may be stored under a key declared with this type.
    ///
    /// A boolean is also an integer; no other type converts, so an integer is not a float.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        let found = value.scalar_type();
        found == self || (self == Self::Integer && found == Self::Boolean)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Boolean => "boolean".fmt(f),
            Self::Integer => "integer".fmt(f),
            Self::Float => "float".fmt(f),
            Self::String => "string".fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        match *self {
            Self::Boolean(_) => ScalarType::Boolean,
            Self::Integer(_) => ScalarType::Integer,
            Self::Float(_) => ScalarType::Float,
            Self::String(_) => ScalarType::String,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Boolean(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Integer(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Float(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// The stored type of a key together with its default.
///
/// A `default` of `None` means the type was declared without a default value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSlot {
    ty: ScalarType,
    default: Option<Value>,
}

impl ValueSlot {
    #[must_use]
    pub fn declared(ty: ScalarType) -> Self {
        Self { ty, default: None }
    }

    #[must_use]
    pub fn with_default(value: Value) -> Self {
        Self {
            ty: value.scalar_type(),
            default: Some(value),
        }
    }

    /// A slot of type `ty` whose default may be of any type `ty` accepts.
    pub(crate) fn typed(ty: ScalarType, default: Value) -> Self {
        Self {
            ty,
            default: Some(default),
        }
    }

    #[must_use]
    pub fn ty(&self) -> ScalarType {
        self.ty
    }

    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A schema leaf given when building a section from a plain mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// Expected type only.
    Type(ScalarType),
    /// Expected type inferred from the value, which also becomes the default.
    Value(Value),
}

impl From<Declaration> for ValueSlot {
    fn from(declaration: Declaration) -> Self {
        match declaration {
            Declaration::Type(ty) => ValueSlot::declared(ty),
            Declaration::Value(value) => ValueSlot::with_default(value),
        }
    }
}

impl From<ScalarType> for Declaration {
    fn from(ty: ScalarType) -> Self {
        Declaration::Type(ty)
    }
}

impl From<Value> for Declaration {
    fn from(value: Value) -> Self {
        Declaration::Value(value)
    }
}

macro_rules! declaration_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Declaration {
                fn from(value: $t) -> Self {
                    Declaration::Value(value.into())
                }
            }
        )*
    };
}

declaration_from_scalar!(bool, i32, i64, f64, &str, String);

type Coercion = fn(&str) -> Option<Value>;

/// Tried in order; the first one to accept the text wins.
const COERCIONS: [Coercion; 4] = [coerce_boolean, coerce_integer, coerce_float, coerce_quoted];

/// Infer the typed value of a trimmed value literal.
#[must_use]
pub fn coerce(text: &str) -> Option<Value> {
    COERCIONS.iter().find_map(|coercion| coercion(text))
}

fn coerce_boolean(text: &str) -> Option<Value> {
    if text.eq_ignore_ascii_case("true") {
        Some(Value::Boolean(true))
    } else if text.eq_ignore_ascii_case("false") {
        Some(Value::Boolean(false))
    } else {
        None
    }
}

fn coerce_integer(text: &str) -> Option<Value> {
    text.parse::<i64>().ok().map(Value::Integer)
}

fn coerce_float(text: &str) -> Option<Value> {
    text.parse::<f64>().ok().map(Value::Float)
}

fn coerce_quoted(text: &str) -> Option<Value> {
    let mut chars = text.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;

    // No escapes: the inner text is taken verbatim.
    if first == last && matches!(first, '"' | '\'') {
        Some(Value::String(chars.as_str().to_owned()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("true", Value::Boolean(true))]
    #[case("FALSE", Value::Boolean(false))]
    #[case("tRuE", Value::Boolean(true))]
    #[case("42", Value::Integer(42))]
    #[case("+7", Value::Integer(7))]
    #[case("-13", Value::Integer(-13))]
    #[case("2.5", Value::Float(2.5))]
    #[case("1e3", Value::Float(1000.0))]
    #[case("-.5", Value::Float(-0.5))]
    #[case("\"42\"", Value::String("42".to_owned()))]
    #[case("'true'", Value::String("true".to_owned()))]
    #[case("\"\"", Value::String(String::new()))]
    #[case("\"a \" b\"", Value::String("a \" b".to_owned()))]
    fn coerces_literal(#[case] text: &str, #[case] expected: Value) {
        assert_eq!(coerce(text), Some(expected));
    }

    #[rstest]
    #[case("yes")]
    #[case("1 3")]
    #[case("13;")]
    #[case("1_000")]
    #[case("'13")]
    #[case("'13\"")]
    #[case("'")]
    #[case("\"")]
    #[case("bare")]
    #[case("[13]")]
    fn rejects_literal(#[case] text: &str) {
        assert_eq!(coerce(text), None);
    }

    #[test]
    fn integer_out_of_range_becomes_float() {
        assert_eq!(
            coerce("99999999999999999999"),
            Some(Value::Float(99_999_999_999_999_999_999.0))
        );
    }

    #[test]
    fn boolean_wins_over_everything() {
        assert!(coerce("True").is_some_and(|v| v.scalar_type() == ScalarType::Boolean));
    }

    #[test]
    fn boolean_is_an_integer() {
        assert!(ScalarType::Integer.accepts(&Value::Integer(1)));
        assert!(ScalarType::Integer.accepts(&Value::Boolean(true)));
        assert!(!ScalarType::Boolean.accepts(&Value::Integer(1)));
        assert!(!ScalarType::Float.accepts(&Value::Integer(1)));
        assert!(!ScalarType::Float.accepts(&Value::Boolean(false)));
        assert!(!ScalarType::String.accepts(&Value::Boolean(true)));
    }

    #[test]
    fn declaration_from_scalar_carries_default() {
        let slot = ValueSlot::from(Declaration::from(30));

        assert_eq!(slot.ty(), ScalarType::Integer);
        assert_eq!(slot.default(), Some(&Value::Integer(30)));
    }

    #[test]
    fn declaration_from_type_has_no_default() {
        let slot = ValueSlot::from(Declaration::from(ScalarType::String));

        assert_eq!(slot.ty(), ScalarType::String);
        assert_eq!(slot.default(), None);
    }

    #[test]
    fn serializes_as_plain_scalar() {
        let json = serde_json::to_string(&[
            Value::from(true),
            Value::from(8080),
            Value::from(0.5),
            Value::from("localhost"),
        ])
        .expect("scalars serialize");

        assert_eq!(json, r#"[true,8080,0.5,"localhost"]"#);
    }
}
