use crate::errors::{Groth16Error, Result, fail};
use crate::field::from_signed;
use crate::polynomial::Polynomial;
use ark_ff::PrimeField;
use itertools::izip;
use log::debug;
use std::iter::zip;

/// Number of leading witness wires that are public in the reference circuit: the constant `1`
/// and `out`. Wires `x, y, v1, v2` are private.
pub const REFERENCE_PUBLIC_WIRES: usize = 2;

/// Dense rows × columns grid of field elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix<F: PrimeField> {
    rows: Vec<Vec<F>>,
    columns: usize,
}

impl<F: PrimeField> Matrix<F> {
    pub fn new(rows: Vec<Vec<F>>) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || columns == 0 {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("matrix must have at least one row and column"));
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != columns) {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("ragged matrix")
                .attach(format!("row {index} has {} entries, expected {columns}", row.len())));
        }
        Ok(Matrix { rows, columns })
    }

    /// Build from signed integer literals, normalising negatives into `[0, p)`.
    pub fn from_signed<const N: usize>(rows: &[[i64; N]]) -> Result<Self> {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|entry| from_signed(*entry)).collect())
                .collect(),
        )
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<F>] {
        &self.rows
    }

    pub fn column(&self, index: usize) -> Vec<F> {
        self.rows.iter().map(|row| row[index]).collect()
    }

    /// `M·a`, one entry per row.
    pub fn mul_vector(&self, vector: &[F]) -> Result<Vec<F>> {
        if vector.len() != self.columns {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("vector length does not match matrix columns")
                .attach(format!("columns: {}, vector: {}", self.columns, vector.len())));
        }
        Ok(self
            .rows
            .iter()
            .map(|row| zip(row, vector).map(|(m, a)| *m * a).sum::<F>())
            .collect())
    }
}

/// Rank 1 Constraint System `A·a ∘ B·a = C·a`, rows are constraints and columns are wires.
///
/// The first `num_public` wires are public inputs (wire 0 is the constant `1`), the rest are
/// private.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1CS<F: PrimeField> {
    a: Matrix<F>,
    b: Matrix<F>,
    c: Matrix<F>,
    num_public: usize,
}

impl<F: PrimeField> R1CS<F> {
    pub fn new(a: Matrix<F>, b: Matrix<F>, c: Matrix<F>, num_public: usize) -> Result<Self> {
        let shape = |m: &Matrix<F>| (m.num_rows(), m.num_columns());
        if shape(&a) != shape(&b) || shape(&a) != shape(&c) {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("A, B and C must share a shape")
                .attach(format!("A: {:?}, B: {:?}, C: {:?}", shape(&a), shape(&b), shape(&c))));
        }
        if num_public == 0 || num_public > a.num_columns() {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("public wire count must include the constant wire and fit in the witness")
                .attach(format!("num_public: {num_public}, wires: {}", a.num_columns())));
        }
        Ok(R1CS { a, b, c, num_public })
    }

    /// `out = 3x²y + 5xy − x − 2y + 3` over wires `[1, out, x, y, v1, v2]`:
    ///
    /// ```text
    /// v1 = 3x · x
    /// v2 = v1 · y
    /// −v2 + out + x + 2y − 3 = x · 5y
    /// ```
    pub fn reference() -> Result<Self> {
        let a = Matrix::from_signed(&[[0, 0, 3, 0, 0, 0], [0, 0, 0, 0, 1, 0], [0, 0, 1, 0, 0, 0]])?;
        let b = Matrix::from_signed(&[[0, 0, 1, 0, 0, 0], [0, 0, 0, 1, 0, 0], [0, 0, 0, 5, 0, 0]])?;
        let c = Matrix::from_signed(&[
            [0, 0, 0, 0, 1, 0],
            [0, 0, 0, 0, 0, 1],
            [-3, 1, 1, 2, 0, -1],
        ])?;
        debug!("Reference matrices initialised");
        Self::new(a, b, c, REFERENCE_PUBLIC_WIRES)
    }

    pub fn a(&self) -> &Matrix<F> {
        &self.a
    }

    pub fn b(&self) -> &Matrix<F> {
        &self.b
    }

    pub fn c(&self) -> &Matrix<F> {
        &self.c
    }

    pub fn num_constraints(&self) -> usize {
        self.a.num_rows()
    }

    pub fn num_wires(&self) -> usize {
        self.a.num_columns()
    }

    pub fn num_public(&self) -> usize {
        self.num_public
    }

    pub fn is_satisfied(&self, witness: &[F]) -> Result<bool> {
        let a = self.a.mul_vector(witness)?;
        let b = self.b.mul_vector(witness)?;
        let c = self.c.mul_vector(witness)?;
        Ok(izip!(a, b, c).all(|(a_i, b_i, c_i)| a_i * b_i == c_i))
    }

    pub fn check_witness(&self, witness: &[F]) -> Result<()> {
        if !self.is_satisfied(witness)? {
            return Err(
                fail(Groth16Error::WitnessInconsistent).attach(format!("Witness: {witness:?}"))
            );
        }
        Ok(())
    }
}

/// Witness `[1, out, x, y, v1, v2]` of the reference circuit for private inputs `x, y`.
pub fn reference_witness<F: PrimeField>(x: F, y: F) -> Vec<F> {
    let v1 = F::from(3u64) * x * x;
    let v2 = v1 * y;
    let out = v2 + F::from(5u64) * x * y - x - F::from(2u64) * y + F::from(3u64);
    vec![F::one(), out, x, y, v1, v2]
}

/// Polynomial form of an R1CS: column `i` of `A, B, C` interpolated over the evaluation points
/// `1..=n` gives `u[i], v[i], w[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QAP<F: PrimeField> {
    /// LHS of multiplication
    pub u: Vec<Polynomial<F>>,
    /// RHS of multiplication
    pub v: Vec<Polynomial<F>>,
    /// Output
    pub w: Vec<Polynomial<F>>,
    /// `(x - 1)(x - 2)...(x - n)`
    pub t: Polynomial<F>,
    pub num_public: usize,
}

/// A QAP evaluated against one witness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QapAssignment<F: PrimeField> {
    pub witness: Vec<F>,
    pub ua: Polynomial<F>,
    pub va: Polynomial<F>,
    pub wa: Polynomial<F>,
    /// `(ua·va − wa) / t`
    pub h: Polynomial<F>,
}

impl<F: PrimeField> QapAssignment<F> {
    pub fn public_inputs(&self, num_public: usize) -> &[F] {
        &self.witness[..num_public.min(self.witness.len())]
    }
}

impl<F: PrimeField> QAP<F> {
    /// Evaluation points `1, 2, ..., n`, one per constraint.
    pub fn evaluation_points(num_constraints: usize) -> Vec<F> {
        (1..=num_constraints as u64).map(F::from).collect()
    }

    pub fn from_r1cs(r1cs: &R1CS<F>) -> Result<Self> {
        let xs = Self::evaluation_points(r1cs.num_constraints());
        let interpolate_columns = |matrix: &Matrix<F>| -> Result<Vec<Polynomial<F>>> {
            (0..matrix.num_columns())
                .map(|j| Polynomial::interpolate(&xs, &matrix.column(j)))
                .collect()
        };

        Ok(QAP {
            u: interpolate_columns(r1cs.a())?,
            v: interpolate_columns(r1cs.b())?,
            w: interpolate_columns(r1cs.c())?,
            t: Polynomial::vanishing(&xs),
            num_public: r1cs.num_public(),
        })
    }

    /// Number of constraints, i.e. the degree of `t`.
    pub fn degree(&self) -> usize {
        self.t.degree()
    }

    pub fn num_wires(&self) -> usize {
        self.u.len()
    }

    fn combine(polynomials: &[Polynomial<F>], witness: &[F]) -> Polynomial<F> {
        zip(polynomials, witness).map(|(p_i, a_i)| p_i * *a_i).sum()
    }

    /// Compute `ua, va, wa` and the quotient `h`, then re-check `ua·va == wa + h·t`.
    pub fn assign(&self, witness: &[F]) -> Result<QapAssignment<F>> {
        if witness.len() != self.num_wires() {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("Witness wrong size for QAP")
                .attach(format!("wires: {}, witness: {}", self.num_wires(), witness.len())));
        }

        let ua = Self::combine(&self.u, witness);
        let va = Self::combine(&self.v, witness);
        let wa = Self::combine(&self.w, witness);
        let uv = &ua * &va;

        let h = (uv.clone() - wa.clone()).exact_divide(&self.t).map_err(|report| {
            if *report.current_context() == Groth16Error::InexactDivision {
                fail(Groth16Error::QapInconsistent)
                    .attach(format!("Witness: {witness:?}"))
                    .attach(format!("Cause: {report}"))
            } else {
                report
            }
        })?;

        if uv != wa.clone() + &h * &self.t {
            return Err(fail(Groth16Error::QapInconsistent).attach("ua·va != wa + h·t"));
        }

        Ok(QapAssignment {
            witness: witness.to_vec(),
            ua,
            va,
            wa,
            h,
        })
    }
}

/// Check the witness, interpolate `A, B, C` into `U, V, W` and compute the quotient.
pub fn compile<F: PrimeField>(r1cs: &R1CS<F>, witness: &[F]) -> Result<(QAP<F>, QapAssignment<F>)> {
    r1cs.check_witness(witness)?;
    debug!("Witness satisfies R1CS");

    let qap = QAP::from_r1cs(r1cs)?;
    debug!("QAP derived with {} constraints and {} wires", qap.degree(), qap.num_wires());

    let assignment = qap.assign(witness)?;
    debug!("Quotient polynomial h has degree {}", assignment.h.degree());
    Ok((qap, assignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::rand_scalar;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    type Field = ark_bls12_381::Fr;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn f(value: u64) -> Field {
        Field::from(value)
    }

    #[test]
    fn reference_witness_scenario() -> Result<()> {
        init();
        let witness = reference_witness(f(2), f(2));
        assert_eq!(witness, vec![f(1), f(41), f(2), f(2), f(12), f(24)]);
        assert!(R1CS::reference()?.is_satisfied(&witness)?);
        Ok(())
    }

    #[test]
    fn random_witnesses_satisfy_reference() -> Result<()> {
        let r1cs = R1CS::reference()?;
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..8 {
            let witness = reference_witness::<Field>(rand_scalar(&mut rng), rand_scalar(&mut rng));
            r1cs.check_witness(&witness)?;
        }
        Ok(())
    }

    #[test]
    fn bad_witness_rejected() -> Result<()> {
        let r1cs = R1CS::reference()?;
        let mut witness = reference_witness(f(2), f(2));
        witness[1] = f(42);
        let err = r1cs.check_witness(&witness).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::WitnessInconsistent);

        let err = compile(&r1cs, &witness).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::WitnessInconsistent);

        let err = r1cs.check_witness(&witness[..5]).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::InvalidInput);
        Ok(())
    }

    #[test]
    fn negative_entries_normalised() -> Result<()> {
        let r1cs = R1CS::<Field>::reference()?;
        assert_eq!(r1cs.c().rows()[2][0] + f(3), f(0));
        assert_eq!(r1cs.c().rows()[2][5] + f(1), f(0));
        Ok(())
    }

    #[test]
    fn malformed_shapes() {
        let ragged = Matrix::new(vec![vec![f(1), f(2)], vec![f(3)]]).unwrap_err();
        assert_eq!(*ragged.current_context(), Groth16Error::InvalidInput);

        let empty = Matrix::<Field>::new(Vec::new()).unwrap_err();
        assert_eq!(*empty.current_context(), Groth16Error::InvalidInput);

        let two = Matrix::<Field>::from_signed(&[[1, 0], [0, 1]]).unwrap();
        let three = Matrix::<Field>::from_signed(&[[1, 0, 0], [0, 1, 0]]).unwrap();
        let err = R1CS::new(two.clone(), two.clone(), three, 1).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::InvalidInput);

        let err = R1CS::new(two.clone(), two.clone(), two.clone(), 0).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::InvalidInput);
        let err = R1CS::new(two.clone(), two.clone(), two, 3).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::InvalidInput);
    }

    #[test]
    fn qap_columns_interpolate_matrix_columns() -> Result<()> {
        let r1cs = R1CS::<Field>::reference()?;
        let qap = QAP::from_r1cs(&r1cs)?;
        assert_eq!(qap.num_wires(), 6);
        assert_eq!(qap.degree(), 3);

        let xs = QAP::<Field>::evaluation_points(3);
        for (j, (u, v, w)) in izip!(&qap.u, &qap.v, &qap.w).enumerate() {
            for (row, x) in xs.iter().enumerate() {
                assert_eq!(u.evaluate(x), r1cs.a().rows()[row][j]);
                assert_eq!(v.evaluate(x), r1cs.b().rows()[row][j]);
                assert_eq!(w.evaluate(x), r1cs.c().rows()[row][j]);
            }
        }
        for x in &xs {
            assert_eq!(qap.t.evaluate(x), f(0));
        }
        Ok(())
    }

    #[test]
    fn quotient_divides_exactly() -> Result<()> {
        init();
        let r1cs = R1CS::reference()?;
        let mut rng = StdRng::seed_from_u64(6);
        let witness = reference_witness::<Field>(rand_scalar(&mut rng), rand_scalar(&mut rng));
        let (qap, assignment) = compile(&r1cs, &witness)?;

        let numerator = &assignment.ua * &assignment.va - assignment.wa.clone();
        let (_, remainder) = numerator.div_rem(&qap.t)?;
        assert!(remainder.is_zero());
        assert!(assignment.h.coefficients().len() < qap.degree());
        assert!(assignment.ua.coefficients().len() <= qap.degree());
        Ok(())
    }

    #[test]
    fn compilation_is_idempotent() -> Result<()> {
        let r1cs = R1CS::reference()?;
        let witness = reference_witness::<Field>(f(7), f(13));
        let first = compile(&r1cs, &witness)?;
        let second = compile(&r1cs, &witness)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn unsatisfying_witness_breaks_divisibility() -> Result<()> {
        let qap = QAP::from_r1cs(&R1CS::<Field>::reference()?)?;
        let mut witness = reference_witness(f(3), f(4));
        witness[5] += f(1);
        let err = qap.assign(&witness).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::QapInconsistent);
        Ok(())
    }

    #[test]
    fn public_inputs_are_leading_wires() -> Result<()> {
        let (qap, assignment) = compile(&R1CS::reference()?, &reference_witness(f(2), f(2)))?;
        assert_eq!(assignment.public_inputs(qap.num_public), &[f(1), f(41)]);
        Ok(())
    }
}
