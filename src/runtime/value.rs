use crate::language::types::DeclaredType;
use std::cmp::Ordering;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "decimal",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Str(_) => None,
        }
    }

    /// Equality used by the `=` operator. Integers, decimals and booleans
    /// (as 0/1) compare by numeric value; strings only equal strings.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Ordering used by `<` and `>`. Numbers and booleans order numerically;
    /// strings only order against strings.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Converts to the representation a variable of type `ty` stores, or
    /// `None` when the value has no sensible reading as that type.
    pub fn coerce(&self, ty: DeclaredType) -> Option<Value> {
        match (ty, self) {
            (DeclaredType::String, value) => Some(Value::Str(value.to_string())),
            (DeclaredType::Integer, Value::Int(i)) => Some(Value::Int(*i)),
            (DeclaredType::Integer, Value::Bool(b)) => Some(Value::Int(i64::from(*b))),
            (DeclaredType::Integer, Value::Float(f)) if f.is_finite() => {
                Some(Value::Int(f.trunc() as i64))
            }
            (DeclaredType::Integer, Value::Str(s)) => s.trim().parse().ok().map(Value::Int),
            (DeclaredType::Decimal, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (DeclaredType::Decimal, Value::Float(f)) => Some(Value::Float(*f)),
            (DeclaredType::Decimal, Value::Str(s)) => s.trim().parse().ok().map(Value::Float),
            (DeclaredType::Boolean, Value::Bool(b)) => Some(Value::Bool(*b)),
            (DeclaredType::Boolean, Value::Int(_) | Value::Float(_)) => {
                Some(Value::Bool(self.as_bool()))
            }
            (DeclaredType::Boolean, Value::Str(s)) => match s.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}
