use crate::errors::{Groth16Error, Result, fail};
use crate::field::checked_inverse;
use ark_ec::CurveGroup;
use ark_ff::Field;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::iter::{Sum, zip};
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Polynomial<F>
where
    F: Field,
{
    /// x^0, x^1, x^2, ... with no trailing zeroes
    coefficients: Vec<F>,
}

impl<F: Field> Polynomial<F> {
    pub fn new(mut coefficients: Vec<F>) -> Self {
        // Truncate trailing zeroes
        if let Some(pos) = coefficients.iter().rposition(|x| !x.is_zero()) {
            coefficients.truncate(pos + 1)
        } else {
            coefficients.clear()
        }
        Polynomial { coefficients }
    }

    pub fn zero() -> Self {
        Polynomial {
            coefficients: Vec::new(),
        }
    }

    pub fn constant(value: F) -> Self {
        Self::new(vec![value])
    }

    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Degree of the polynomial, with the zero polynomial reported as degree 0.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    fn leading_coefficient(&self) -> Option<F> {
        self.coefficients.last().copied()
    }

    /// Evaluate at a hidden point given its powers `[g, g·tau, g·tau^2, ...]`, so coefficient `i`
    /// is paired with `srs[i]`.
    pub fn evaluate_over_srs<T>(&self, srs: &[T]) -> Result<T>
    where
        T: CurveGroup<ScalarField = F> + Debug,
    {
        if srs.len() < self.coefficients.len() {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("SRS too small for polynomial")
                .attach(format!("SRS length: {}", srs.len()))
                .attach(format!("Polynomial: {:?}", self.coefficients)));
        }

        Ok(zip(&self.coefficients, srs)
            .map(|(coefficient, power)| *power * coefficient)
            .fold(T::zero(), Add::add))
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: &F) -> F {
        self.coefficients
            .iter()
            .rev()
            .fold(F::zero(), |acc, coefficient| acc * x + coefficient)
    }

    /// `Π (x - root)` over the given roots.
    pub fn vanishing(roots: &[F]) -> Self {
        roots
            .iter()
            .map(|root| Polynomial::new(vec![-*root, F::one()]))
            .fold(Polynomial::constant(F::one()), Mul::mul)
    }

    /// Long division returning `(quotient, remainder)`.
    pub fn div_rem(&self, divisor: &Polynomial<F>) -> Result<(Polynomial<F>, Polynomial<F>)> {
        let lead = divisor.leading_coefficient().ok_or_else(|| {
            fail(Groth16Error::DivisionByZero).attach("division by the zero polynomial")
        })?;
        let lead_inverse = checked_inverse(lead)?;

        if self.coefficients.len() < divisor.coefficients.len() {
            return Ok((Polynomial::zero(), self.clone()));
        }

        let mut remainder = self.coefficients.clone();
        let shift_count = self.coefficients.len() - divisor.coefficients.len() + 1;
        let mut quotient = vec![F::zero(); shift_count];

        for shift in (0..shift_count).rev() {
            let top = remainder[shift + divisor.coefficients.len() - 1];
            if top.is_zero() {
                continue;
            }
            let factor = top * lead_inverse;
            quotient[shift] = factor;
            for (i, d) in divisor.coefficients.iter().enumerate() {
                remainder[shift + i] -= factor * d;
            }
        }

        Ok((Polynomial::new(quotient), Polynomial::new(remainder)))
    }

    /// Division that must leave no remainder.
    pub fn exact_divide(&self, divisor: &Polynomial<F>) -> Result<Polynomial<F>> {
        let (quotient, remainder) = self.div_rem(divisor)?;
        if !remainder.is_zero() {
            return Err(fail(Groth16Error::InexactDivision)
                .attach(format!("Dividend: {:?}", self.coefficients))
                .attach(format!("Divisor: {:?}", divisor.coefficients))
                .attach(format!("Remainder: {:?}", remainder.coefficients)));
        }
        Ok(quotient)
    }

    /// Lagrange interpolation: the unique polynomial of degree `< xs.len()` through
    /// `(xs[i], ys[i])`.
    pub fn interpolate(xs: &[F], ys: &[F]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("interpolation needs one y per x")
                .attach(format!("xs: {}, ys: {}", xs.len(), ys.len())));
        }
        for (i, x_i) in xs.iter().enumerate() {
            if xs[..i].contains(x_i) {
                return Err(fail(Groth16Error::InvalidInput)
                    .attach("duplicate interpolation point")
                    .attach(format!("x: {x_i}")));
            }
        }

        xs.iter()
            .enumerate()
            .map(|(j, x_j)| -> Result<Self> {
                let others = xs
                    .iter()
                    .enumerate()
                    .filter(|(m, _)| *m != j)
                    .map(|(_, x_m)| *x_m)
                    .collect::<Vec<_>>();
                let denominator = others
                    .iter()
                    .map(|x_m| *x_j - x_m)
                    .fold(F::one(), Mul::mul);
                let scale = ys[j] * checked_inverse(denominator)?;
                Ok(&Polynomial::vanishing(&others) * scale)
            })
            .sum()
    }
}

impl<F: Field> Add for Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, rhs: Self) -> Self::Output {
        let (mut longer, shorter) = match self.coefficients.len().cmp(&rhs.coefficients.len()) {
            Ordering::Less => (rhs.coefficients, self.coefficients),
            _ => (self.coefficients, rhs.coefficients),
        };
        for (a_i, b_i) in zip(longer.iter_mut(), shorter) {
            *a_i += b_i;
        }
        Polynomial::new(longer)
    }
}

impl<F: Field> Neg for Polynomial<F> {
    type Output = Polynomial<F>;

    fn neg(self) -> Self::Output {
        Polynomial {
            coefficients: self.coefficients.into_iter().map(|x| -x).collect(),
        }
    }
}

impl<F: Field> Sub for Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

impl<F: Field> Mul for Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: Polynomial<F>) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }

        // n^2 convolution, the circuits here are tiny.
        let mut out = vec![F::zero(); self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, a_i) in self.coefficients.iter().enumerate() {
            for (j, b_j) in rhs.coefficients.iter().enumerate() {
                out[i + j] += *a_i * b_j;
            }
        }
        Polynomial::new(out)
    }
}

impl<F: Field> Mul for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: &Polynomial<F>) -> Self::Output {
        self.clone() * rhs.clone()
    }
}

impl<F: Field> Mul<F> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: F) -> Self::Output {
        Polynomial::new(self.coefficients.iter().map(|x| *x * rhs).collect())
    }
}

impl<F: Field> Sum for Polynomial<F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Polynomial::zero(), Add::add)
    }
}

impl<F: Field> From<Vec<u64>> for Polynomial<F> {
    fn from(coefficients: Vec<u64>) -> Self {
        Polynomial::new(coefficients.into_iter().map(F::from).collect())
    }
}
