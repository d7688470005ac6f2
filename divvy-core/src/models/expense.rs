use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::round2;

/// How an expense's amount was divided between members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Custom,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitType::Equal => write!(f, "equal"),
            SplitType::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for SplitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equal" => Ok(SplitType::Equal),
            "custom" => Ok(SplitType::Custom),
            _ => Err(format!(
                "Invalid split type '{}'. Valid options: equal, custom",
                s
            )),
        }
    }
}

/// A recorded expense in a group, paid in full by one member.
///
/// An expense never exists without its shares; the two are written and
/// deleted together as one logical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub group_id: i64,
    pub title: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub split_type: SplitType,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// One member's portion of an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseShare {
    pub id: i64,
    pub expense_id: i64,
    pub user_id: String,
    pub amount: Decimal,
}

/// Input form for recording an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub group_id: i64,
    pub title: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub split_type: SplitType,
    pub created_by: String,
}

impl NewExpense {
    pub fn new(
        group_id: i64,
        title: impl Into<String>,
        amount: Decimal,
        paid_by: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            group_id,
            title: title.into(),
            amount,
            paid_by: paid_by.into(),
            split_type: SplitType::Equal,
            created_by: created_by.into(),
        }
    }

    pub fn with_split_type(mut self, split_type: SplitType) -> Self {
        self.split_type = split_type;
        self
    }
}

/// Input form for one share of an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShare {
    pub user_id: String,
    pub amount: Decimal,
}

impl NewShare {
    pub fn new(user_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
        }
    }
}

/// Split an amount evenly between the given users.
///
/// Each share is the amount divided by the member count, rounded to 2
/// decimal places; the last share absorbs the remainder so the shares
/// always sum exactly to the amount (10.00 / 3 -> 3.33, 3.33, 3.34).
pub fn equal_split(amount: Decimal, user_ids: &[String]) -> Vec<NewShare> {
    let n = user_ids.len();
    if n == 0 {
        return Vec::new();
    }
    let base = round2(amount / Decimal::from(n as u64));
    user_ids
        .iter()
        .enumerate()
        .map(|(i, user_id)| {
            let share = if i == n - 1 {
                amount - base * Decimal::from((n - 1) as u64)
            } else {
                base
            };
            NewShare::new(user_id.clone(), share)
        })
        .collect()
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} - {:.2} paid by {} ({})",
            self.id, self.title, self.amount, self.paid_by, self.split_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_type_from_str() {
        assert_eq!(SplitType::from_str("equal").unwrap(), SplitType::Equal);
        assert_eq!(SplitType::from_str("Custom").unwrap(), SplitType::Custom);
        assert!(SplitType::from_str("ratio").is_err());
    }

    #[test]
    fn test_equal_split_exact() {
        let shares = equal_split(dec!(30.00), &ids(&["u1", "u2", "u3"]));
        assert_eq!(shares.len(), 3);
        assert!(shares.iter().all(|s| s.amount == dec!(10.00)));
    }

    #[test]
    fn test_equal_split_remainder_goes_to_last() {
        let shares = equal_split(dec!(10.00), &ids(&["u1", "u2", "u3"]));
        let amounts: Vec<Decimal> = shares.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![dec!(3.33), dec!(3.33), dec!(3.34)]);
    }

    #[test]
    fn test_equal_split_sums_to_amount() {
        for cents in [1u64, 7, 99, 1000, 12345] {
            let amount = Decimal::new(cents as i64, 2);
            let shares = equal_split(amount, &ids(&["a", "b", "c", "d", "e", "f", "g"]));
            let total: Decimal = shares.iter().map(|s| s.amount).sum();
            assert_eq!(total, amount, "split of {} must sum back", amount);
        }
    }

    #[test]
    fn test_equal_split_single_user() {
        let shares = equal_split(dec!(5.55), &ids(&["u1"]));
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].amount, dec!(5.55));
    }

    #[test]
    fn test_equal_split_no_users() {
        assert!(equal_split(dec!(5.00), &[]).is_empty());
    }
}
