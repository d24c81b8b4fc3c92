//! Money value object.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::operand::{Operand, OperandKind};

/// An amount in a single currency.
///
/// Arithmetic is only defined between amounts of the same currency;
/// mixing currencies fails with [`DomainError::CurrencyMismatch`]. A result
/// outside the `i64` range fails with [`DomainError::Overflow`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    currency: String,
    value: i64,
}

impl Money {
    /// Creates a new amount.
    pub fn new(currency: impl Into<String>, value: i64) -> Self {
        Self {
            currency: currency.into(),
            value,
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Adds another amount of the same currency.
    pub fn add(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other, "add")?;
        self.with_value("add", self.value.checked_add(other.value))
    }

    /// Subtracts another amount of the same currency.
    pub fn subtract(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other, "subtract")?;
        self.with_value("subtract", self.value.checked_sub(other.value))
    }

    /// Scales by an integer, or by the value of a same-currency amount.
    pub fn multiply(&self, other: Operand<&Money>) -> Result<Money> {
        let factor = match other {
            Operand::Int(n) => n,
            Operand::Same(money) => {
                self.ensure_same_currency(money, "multiply")?;
                money.value
            }
        };
        self.with_value("multiply", self.value.checked_mul(factor))
    }

    fn with_value(&self, operation: &'static str, value: Option<i64>) -> Result<Money> {
        value
            .map(|value| Money::new(self.currency.clone(), value))
            .ok_or(DomainError::Overflow { operation })
    }

    fn ensure_same_currency(&self, other: &Money, operation: &'static str) -> Result<()> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                operation,
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl OperandKind for Money {
    const NAME: &'static str = "Money";
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.currency.to_uppercase())
    }
}

impl std::ops::Add for Money {
    type Output = Result<Money>;

    fn add(self, rhs: Self) -> Self::Output {
        Money::add(&self, &rhs)
    }
}

impl std::ops::Sub for Money {
    type Output = Result<Money>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(&rhs)
    }
}

impl std::ops::Mul<i64> for Money {
    type Output = Result<Money>;

    fn mul(self, rhs: i64) -> Self::Output {
        self.multiply(Operand::Int(rhs))
    }
}
