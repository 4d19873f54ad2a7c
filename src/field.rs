use crate::errors::{Groth16Error, Result, fail};
use ark_ff::{BigInteger, Field, PrimeField};

/// Lift a signed literal into the field. Negative values are taken as `p - |value|`, i.e. `p` is
/// added once, which is enough for any `i64` since `|value| < p`.
pub fn from_signed<F: PrimeField>(value: i64) -> F {
    let magnitude = F::from(value.unsigned_abs());
    if value < 0 { -magnitude } else { magnitude }
}

pub fn checked_inverse<F: Field>(value: F) -> Result<F> {
    value
        .inverse()
        .ok_or_else(|| fail(Groth16Error::DivisionByZero).attach("inverse of zero"))
}

pub fn checked_div<F: Field>(numerator: F, denominator: F) -> Result<F> {
    let inverse = checked_inverse(denominator)
        .map_err(|e| e.attach(format!("numerator: {numerator}")))?;
    Ok(numerator * inverse)
}

/// Canonical representative of `p - value`. Zero maps to zero since `p` itself is not reduced.
pub fn modulus_minus<F: PrimeField>(value: F) -> F {
    let mut modulus = F::MODULUS;
    modulus.sub_with_borrow(&value.into_bigint());
    F::from_bigint(modulus).unwrap_or(F::ZERO)
}
