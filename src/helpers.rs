use ark_ff::Field;
use rand::RngCore;

/// Uniform field element by rejection sampling over random bytes.
pub fn rand_scalar<T, S>(rng: &mut T) -> S
where
    T: RngCore + ?Sized,
    S: Field,
{
    // Large enough for the base field of every curve we support, including MNT6-753.
    let mut bytes = [0; 256];
    loop {
        rng.fill_bytes(&mut bytes);
        if let Some(out) = S::from_random_bytes(&bytes) {
            return out;
        }
    }
}

/// Uniform element of `[1, p)`.
pub fn rand_nonzero_scalar<T, S>(rng: &mut T) -> S
where
    T: RngCore + ?Sized,
    S: Field,
{
    loop {
        let out: S = rand_scalar(rng);
        if !out.is_zero() {
            return out;
        }
    }
}
