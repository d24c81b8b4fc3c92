//! Operands that accept either a bare integer or a value of the same type.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DomainError, Result};

/// Right-hand side of an arithmetic or comparison that takes
/// "an integer or another one of me".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<T> {
    /// A raw integer scalar.
    Int(i64),
    /// A value of the same type as the receiver.
    Same(T),
}

/// Types that can appear as the `Same` side of an [`Operand`].
pub trait OperandKind {
    /// Human-readable type name used in `InvalidOperand` messages.
    const NAME: &'static str;
}

impl<T> Operand<T> {
    /// Borrows the `Same` payload, leaving integers untouched.
    pub fn as_ref(&self) -> Operand<&T> {
        match self {
            Operand::Int(n) => Operand::Int(*n),
            Operand::Same(value) => Operand::Same(value),
        }
    }
}

impl<T> From<i64> for Operand<T> {
    fn from(n: i64) -> Self {
        Operand::Int(n)
    }
}

impl<T: OperandKind + DeserializeOwned> Operand<T> {
    /// Decodes an operand arriving as untyped JSON.
    ///
    /// Integers become `Int`, objects are decoded as `T`. Anything else,
    /// including floats and objects that are not a valid `T`, is rejected
    /// with `InvalidOperand`.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Operand::Int)
                .ok_or_else(|| invalid::<T>(format!("non-integer number {n}"))),
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map(Operand::Same)
                .map_err(|e| invalid::<T>(format!("object ({e})"))),
            Value::Null => Err(invalid::<T>("null".to_string())),
            Value::Bool(b) => Err(invalid::<T>(format!("boolean {b}"))),
            Value::String(s) => Err(invalid::<T>(format!("string {s:?}"))),
            Value::Array(_) => Err(invalid::<T>("array".to_string())),
        }
    }
}

impl<T: OperandKind + DeserializeOwned> TryFrom<Value> for Operand<T> {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(value)
    }
}

fn invalid<T: OperandKind>(found: String) -> DomainError {
    DomainError::InvalidOperand {
        expected: T::NAME,
        found,
    }
}
