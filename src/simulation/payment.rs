//! Level payment for a fixed-rate, fully amortizing loan

/// Calculate the periodic payment that retires `principal` in `num_payments`
/// periods at the per-period `rate` (standard annuity formula).
///
/// # Arguments
/// * `rate` - Interest rate per period (annual rate / 12 for monthly payments)
/// * `principal` - Balance to amortize
/// * `num_payments` - Number of remaining payments
///
/// A zero rate degenerates to straight-line repayment.
pub fn level_payment(rate: f64, principal: f64, num_payments: u32) -> f64 {
    let n = num_payments as f64;
    if rate == 0.0 {
        return principal / n;
    }
    (rate * principal) / (1.0 - (1.0 + rate).powf(-n))
}
