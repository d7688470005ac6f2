use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A real-world payment between two members that offsets their balances.
///
/// Settlements are append-only: once recorded they are never updated or
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: i64,
    pub group_id: i64,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input form for recording a settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSettlement {
    pub group_id: i64,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: Decimal,
    pub note: Option<String>,
}

impl NewSettlement {
    pub fn new(
        group_id: i64,
        from_user_id: impl Into<String>,
        to_user_id: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            group_id,
            from_user_id: from_user_id.into(),
            to_user_id: to_user_id.into(),
            amount,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A suggested payment in a group's settle-up plan. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: Decimal,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pays {} {:.2}",
            self.from_user_id, self.to_user_id, self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_settlement_builder() {
        let settlement = NewSettlement::new(1, "u2", "u1", dec!(10.00)).with_note("venmo");
        assert_eq!(settlement.group_id, 1);
        assert_eq!(settlement.from_user_id, "u2");
        assert_eq!(settlement.to_user_id, "u1");
        assert_eq!(settlement.note.as_deref(), Some("venmo"));
    }

    #[test]
    fn test_transfer_display() {
        let transfer = Transfer {
            from_user_id: "u2".to_string(),
            to_user_id: "u1".to_string(),
            amount: dec!(10.00),
        };
        assert_eq!(format!("{}", transfer), "u2 pays u1 10.00");
    }
}
