//! Monetary rounding policy.
//!
//! Every amount in the ledger carries exactly two fractional digits. All
//! rounding goes through [`round2`] so the expense recorder and the balance
//! math apply the same policy (half-up, away from zero).

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to 2 decimal places, half-up.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(dec!(3.335)), dec!(3.34));
        assert_eq!(round2(dec!(3.334)), dec!(3.33));
        assert_eq!(round2(dec!(-3.335)), dec!(-3.34));
    }

    #[test]
    fn test_round2_keeps_exact_amounts() {
        assert_eq!(round2(dec!(10.00)), dec!(10.00));
        assert_eq!(round2(dec!(0)), dec!(0));
    }
}
