//! Conversion between human-readable and atomic token amounts
//!
//! Callers are responsible for validating input first: these functions
//! assume a finite, non-negative amount.

/// Convert a human-readable amount to atomic units, truncating toward zero.
pub fn to_atomic(amount_ui: f64, decimals: u8) -> u64 {
    (amount_ui * 10f64.powi(decimals as i32)).floor() as u64
}

/// Convert an atomic amount to human-readable units.
pub fn to_human(amount_atomic: u64, decimals: u8) -> f64 {
    amount_atomic as f64 / 10f64.powi(decimals as i32)
}
