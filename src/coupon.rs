//! Coupon resolution against the small fixed promotion table. Codes are
//! matched case-insensitively and the canonical uppercase form is what gets
//! stored on the session and echoed back to the client.

use rust_decimal::{Decimal, dec};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;

const COUPON_TABLE: &[(&str, Decimal)] = &[("SAVE10", dec!(0.10)), ("FIRST20", dec!(0.20))];

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    pub discount_rate: Decimal,
}

/// Looks up a submitted code. Unknown codes are a recoverable error and never
/// touch whatever coupon is already applied.
pub fn resolve(code: &str) -> Result<Coupon, AppError> {
    let normalized = code.trim().to_uppercase();
    COUPON_TABLE
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(known, rate)| Coupon {
            code: (*known).to_string(),
            discount_rate: *rate,
        })
        .ok_or_else(|| AppError::InvalidCoupon(code.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive() {
        let lower = resolve("save10").unwrap();
        let upper = resolve("SAVE10").unwrap();
        assert_eq!(lower.code, "SAVE10");
        assert_eq!(upper.code, "SAVE10");
        assert_eq!(lower.discount_rate, dec!(0.10));
        assert_eq!(upper.discount_rate, dec!(0.10));
    }

    #[test]
    fn resolve_trims_surrounding_whitespace() {
        let coupon = resolve("  first20 ").unwrap();
        assert_eq!(coupon.code, "FIRST20");
        assert_eq!(coupon.discount_rate, dec!(0.20));
    }

    #[test]
    fn unknown_code_is_rejected() {
        match resolve("bogus") {
            Err(AppError::InvalidCoupon(code)) => assert_eq!(code, "bogus"),
            other => panic!("expected InvalidCoupon, got {other:?}"),
        }
    }
}
