use crate::circuits::QAP;
use crate::errors::{self, Groth16Error, fail};
use crate::field::checked_inverse;
use crate::helpers::rand_scalar;
use ark_ec::PrimeGroup;
use ark_ec::pairing::Pairing;
use ark_ff::{Field, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use itertools::izip;
use log::{debug, warn};
use rand::RngCore;
use std::fmt;
use zeroize::Zeroize;

/// The secret scalars of a trusted setup.
///
/// Whoever knows these can forge proofs. Not `Clone`, consumed by [`Srs::new`], and zeroized on
/// drop.
pub struct ToxicWaste<F: PrimeField> {
    tau: F,
    alpha: F,
    beta: F,
    gamma: F,
    delta: F,
}

impl<F: PrimeField> ToxicWaste<F> {
    fn checked(tau: F, alpha: F, beta: F, gamma: F, delta: F) -> errors::Result<Self> {
        if gamma.is_zero() || delta.is_zero() {
            return Err(fail(Groth16Error::InvalidToxicWaste)
                .attach(format!(
                    "gamma is zero: {}, delta is zero: {}",
                    gamma.is_zero(),
                    delta.is_zero()
                )));
        }
        Ok(ToxicWaste {
            tau,
            alpha,
            beta,
            gamma,
            delta,
        })
    }

    /// Draw all five scalars uniformly from `rng`.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> errors::Result<Self> {
        let tau = rand_scalar(rng);
        let alpha = rand_scalar(rng);
        let beta = rand_scalar(rng);
        let gamma = rand_scalar(rng);
        let delta = rand_scalar(rng);
        Self::checked(tau, alpha, beta, gamma, delta)
    }

    /// Fixed, publicly known scalars.
    ///
    /// # WARNING
    /// Anyone who knows these values can forge proofs. Only use this for tests and reproducible
    /// examples.
    pub fn insecure_fixed(tau: F, alpha: F, beta: F, gamma: F, delta: F) -> errors::Result<Self> {
        warn!("Using fixed toxic waste, the resulting SRS is insecure");
        Self::checked(tau, alpha, beta, gamma, delta)
    }
}

impl<F: PrimeField> Zeroize for ToxicWaste<F> {
    fn zeroize(&mut self) {
        self.tau.zeroize();
        self.alpha.zeroize();
        self.beta.zeroize();
        self.gamma.zeroize();
        self.delta.zeroize();
    }
}

impl<F: PrimeField> Drop for ToxicWaste<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<F: PrimeField> fmt::Debug for ToxicWaste<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToxicWaste { .. }")
    }
}

/// Everything the prover needs. Element `i` of each power vector encodes the coefficient of `x^i`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProvingKey<P: Pairing> {
    pub alpha_g1: P::G1,
    pub beta_g1: P::G1,
    pub beta_g2: P::G2,
    pub delta_g1: P::G1,
    pub delta_g2: P::G2,
    /// `[tau^i]_1` for `i` in `0..n`
    pub powers_of_tau_g1: Vec<P::G1>,
    /// `[tau^i]_2` for `i` in `0..n`
    pub powers_of_tau_g2: Vec<P::G2>,
    /// `[tau^i · t(tau) / delta]_1` for `i` in `0..n - 1`
    pub ht_powers: Vec<P::G1>,
    /// `[C_i(tau) / delta]_1` for the private wires
    pub private_terms: Vec<P::G1>,
    pub num_public: usize,
}

/// The public part of the SRS.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifyingKey<P: Pairing> {
    pub alpha_g1: P::G1,
    pub beta_g2: P::G2,
    pub gamma_g2: P::G2,
    pub delta_g2: P::G2,
    /// `[C_i(tau) / gamma]_1` for the public wires
    pub public_terms: Vec<P::G1>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Srs<P: Pairing> {
    pub proving_key: ProvingKey<P>,
    pub verifying_key: VerifyingKey<P>,
}

impl<P: Pairing> Srs<P> {
    fn group_1_srs(length: usize, tau: P::ScalarField) -> Vec<P::G1> {
        (0..length)
            .map(|i| P::G1::generator() * tau.pow([i as u64]))
            .collect()
    }

    fn group_2_srs(length: usize, tau: P::ScalarField) -> Vec<P::G2> {
        (0..length)
            .map(|i| P::G2::generator() * tau.pow([i as u64]))
            .collect()
    }

    /// `[tau^i · t(tau) / delta]_1` for `i` in `0..length`, the basis `h` is evaluated over.
    fn ht_powers(
        length: usize,
        t_tau: P::ScalarField,
        tau: P::ScalarField,
        delta_inverse: P::ScalarField,
    ) -> Vec<P::G1> {
        (0..length)
            .map(|i| P::G1::generator() * (tau.pow([i as u64]) * t_tau * delta_inverse))
            .collect()
    }

    /// `C_i(tau) = W_i(tau) + beta·U_i(tau) + alpha·V_i(tau)` for every wire.
    fn wire_terms(
        qap: &QAP<P::ScalarField>,
        waste: &ToxicWaste<P::ScalarField>,
    ) -> Vec<P::ScalarField> {
        let tau = &waste.tau;
        izip!(&qap.u, &qap.v, &qap.w)
            .map(|(u_i, v_i, w_i)| {
                w_i.evaluate(tau) + waste.beta * u_i.evaluate(tau) + waste.alpha * v_i.evaluate(tau)
            })
            .collect()
    }

    /// Encode the SRS for `qap` from `toxic_waste`, which is dropped on return.
    pub fn new(
        qap: &QAP<P::ScalarField>,
        toxic_waste: ToxicWaste<P::ScalarField>,
    ) -> errors::Result<Self> {
        debug!("Starting trusted setup");
        let n = qap.degree();
        if n == 0 || qap.num_public == 0 || qap.num_public > qap.num_wires() {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("QAP needs at least one constraint and a valid public split")
                .attach(format!(
                    "constraints: {n}, public: {}, wires: {}",
                    qap.num_public,
                    qap.num_wires()
                )));
        }

        let t_tau = qap.t.evaluate(&toxic_waste.tau);
        if t_tau.is_zero() {
            return Err(fail(Groth16Error::InvalidToxicWaste)
                .attach("tau is a root of the vanishing polynomial"));
        }
        let gamma_inverse = checked_inverse(toxic_waste.gamma)?;
        let delta_inverse = checked_inverse(toxic_waste.delta)?;

        let powers_of_tau_g1 = Self::group_1_srs(n, toxic_waste.tau);
        debug!("Generated Group 1 SRS");
        let powers_of_tau_g2 = Self::group_2_srs(n, toxic_waste.tau);
        debug!("Generated Group 2 SRS");
        let ht_powers = Self::ht_powers(n - 1, t_tau, toxic_waste.tau, delta_inverse);
        debug!("Generated h·t SRS");

        let wire_terms = Self::wire_terms(qap, &toxic_waste);
        let (public, private) = wire_terms.split_at(qap.num_public);
        let public_terms = public
            .iter()
            .map(|c_i| P::G1::generator() * (*c_i * gamma_inverse))
            .collect();
        let private_terms = private
            .iter()
            .map(|c_i| P::G1::generator() * (*c_i * delta_inverse))
            .collect();
        debug!("Generated {} public and {} private wire terms", public.len(), private.len());

        let g1 = P::G1::generator();
        let g2 = P::G2::generator();
        let srs = Srs {
            proving_key: ProvingKey {
                alpha_g1: g1 * toxic_waste.alpha,
                beta_g1: g1 * toxic_waste.beta,
                beta_g2: g2 * toxic_waste.beta,
                delta_g1: g1 * toxic_waste.delta,
                delta_g2: g2 * toxic_waste.delta,
                powers_of_tau_g1,
                powers_of_tau_g2,
                ht_powers,
                private_terms,
                num_public: qap.num_public,
            },
            verifying_key: VerifyingKey {
                alpha_g1: g1 * toxic_waste.alpha,
                beta_g2: g2 * toxic_waste.beta,
                gamma_g2: g2 * toxic_waste.gamma,
                delta_g2: g2 * toxic_waste.delta,
                public_terms,
            },
        };
        drop(toxic_waste);
        debug!("Trusted setup complete, toxic waste zeroized");
        Ok(srs)
    }

    /// Run the setup with fresh toxic waste, resampling a degenerate draw at most `max_attempts`
    /// times in total.
    pub fn generate<R: RngCore + ?Sized>(
        qap: &QAP<P::ScalarField>,
        rng: &mut R,
        max_attempts: usize,
    ) -> errors::Result<Self> {
        for attempt in 1..=max_attempts {
            match ToxicWaste::random(rng).and_then(|waste| Self::new(qap, waste)) {
                Err(report) if *report.current_context() == Groth16Error::InvalidToxicWaste => {
                    warn!("Degenerate toxic waste on attempt {attempt}/{max_attempts}, resampling");
                }
                result => return result,
            }
        }
        Err(fail(Groth16Error::InvalidToxicWaste)
            .attach(format!("no usable toxic waste after {max_attempts} attempts")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::{R1CS, compile, reference_witness};
    use crate::errors::Result;
    use ark_bls12_381::Bls12_381;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    type Field = ark_bls12_381::Fr;
    type G1 = ark_bls12_381::G1Projective;
    type G2 = ark_bls12_381::G2Projective;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn f(value: u64) -> Field {
        Field::from(value)
    }

    fn reference_qap() -> Result<QAP<Field>> {
        let (qap, _) = compile(&R1CS::reference()?, &reference_witness(f(2), f(2)))?;
        Ok(qap)
    }

    fn fixed_waste() -> Result<ToxicWaste<Field>> {
        ToxicWaste::insecure_fixed(f(4), f(2), f(3), f(5), f(6))
    }

    /// Yields zero bytes for the first `zeros` fills, then defers to a seeded RNG.
    struct ZeroesFirst {
        zeros: usize,
        inner: StdRng,
    }

    impl RngCore for ZeroesFirst {
        fn next_u32(&mut self) -> u32 {
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            if self.zeros > 0 {
                self.zeros -= 1;
                dst.fill(0);
            } else {
                self.inner.fill_bytes(dst);
            }
        }
    }

    #[test]
    fn zero_gamma_or_delta_rejected() {
        let err = ToxicWaste::insecure_fixed(f(4), f(2), f(3), f(0), f(6)).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::InvalidToxicWaste);
        let err = ToxicWaste::insecure_fixed(f(4), f(2), f(3), f(5), f(0)).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::InvalidToxicWaste);
    }

    #[test]
    fn tau_on_evaluation_point_rejected() -> Result<()> {
        let waste = ToxicWaste::insecure_fixed(f(2), f(2), f(3), f(5), f(6))?;
        let err = Srs::<Bls12_381>::new(&reference_qap()?, waste).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::InvalidToxicWaste);
        Ok(())
    }

    #[test]
    fn toxic_waste_debug_is_redacted() -> Result<()> {
        assert_eq!(format!("{:?}", fixed_waste()?), "ToxicWaste { .. }");
        Ok(())
    }

    #[test]
    fn toxic_waste_is_zeroized() -> Result<()> {
        let mut waste = fixed_waste()?;
        waste.zeroize();
        for scalar in [waste.tau, waste.alpha, waste.beta, waste.gamma, waste.delta] {
            assert!(scalar.is_zero());
        }
        Ok(())
    }

    #[test]
    fn srs_shape() -> Result<()> {
        init();
        let qap = reference_qap()?;
        let srs = Srs::<Bls12_381>::new(&qap, fixed_waste()?)?;
        let pk = &srs.proving_key;
        assert_eq!(pk.powers_of_tau_g1.len(), 3);
        assert_eq!(pk.powers_of_tau_g2.len(), 3);
        assert_eq!(pk.ht_powers.len(), 2);
        assert_eq!(pk.private_terms.len(), 4);
        assert_eq!(pk.num_public, 2);
        assert_eq!(srs.verifying_key.public_terms.len(), 2);
        Ok(())
    }

    #[test]
    fn srs_encodes_fixed_scalars() -> Result<()> {
        let qap = reference_qap()?;
        let srs = Srs::<Bls12_381>::new(&qap, fixed_waste()?)?;
        let (g1, g2) = (G1::generator(), G2::generator());
        let pk = &srs.proving_key;
        let vk = &srs.verifying_key;

        assert_eq!(pk.powers_of_tau_g1, vec![g1, g1 * f(4), g1 * f(16)]);
        assert_eq!(pk.powers_of_tau_g2, vec![g2, g2 * f(4), g2 * f(16)]);
        assert_eq!(pk.alpha_g1, g1 * f(2));
        assert_eq!(vk.alpha_g1, pk.alpha_g1);
        assert_eq!(pk.beta_g1, g1 * f(3));
        assert_eq!(vk.beta_g2, g2 * f(3));
        assert_eq!(vk.gamma_g2, g2 * f(5));
        assert_eq!(pk.delta_g1, g1 * f(6));
        assert_eq!(vk.delta_g2, g2 * f(6));

        // t(4) = 3·2·1 = 6, so tau^i·t(tau)/delta = 4^i
        assert_eq!(pk.ht_powers, vec![g1, g1 * f(4)]);

        let tau = f(4);
        for (i, term) in vk.public_terms.iter().chain(&pk.private_terms).enumerate() {
            let c_i = qap.w[i].evaluate(&tau)
                + f(3) * qap.u[i].evaluate(&tau)
                + f(2) * qap.v[i].evaluate(&tau);
            let divisor = if i < qap.num_public { f(5) } else { f(6) };
            assert_eq!(*term, g1 * (c_i / divisor));
        }
        Ok(())
    }

    #[test]
    fn generate_resamples_degenerate_draws() -> Result<()> {
        init();
        let qap = reference_qap()?;
        // All five scalars of the first draw come out as zero.
        let mut rng = ZeroesFirst {
            zeros: 5,
            inner: StdRng::seed_from_u64(21),
        };
        let srs = Srs::<Bls12_381>::generate(&qap, &mut rng, 2)?;
        assert_eq!(srs.verifying_key.public_terms.len(), 2);
        Ok(())
    }

    #[test]
    fn generate_gives_up_after_bounded_attempts() -> Result<()> {
        let qap = reference_qap()?;
        let mut rng = ZeroesFirst {
            zeros: usize::MAX,
            inner: StdRng::seed_from_u64(22),
        };
        let err = Srs::<Bls12_381>::generate(&qap, &mut rng, 3).unwrap_err();
        assert_eq!(*err.current_context(), Groth16Error::InvalidToxicWaste);
        Ok(())
    }

    #[test]
    fn independent_setups_differ() -> Result<()> {
        let qap = reference_qap()?;
        let mut rng = StdRng::seed_from_u64(23);
        let first = Srs::<Bls12_381>::generate(&qap, &mut rng, 1)?;
        let second = Srs::<Bls12_381>::generate(&qap, &mut rng, 1)?;
        assert_ne!(first.verifying_key, second.verifying_key);
        assert_ne!(first.proving_key.powers_of_tau_g1, second.proving_key.powers_of_tau_g1);
        Ok(())
    }

    #[test]
    fn verifying_key_serialization() -> Result<()> {
        let srs = Srs::<Bls12_381>::new(&reference_qap()?, fixed_waste()?)?;
        let mut bytes = Vec::new();
        srs.verifying_key.serialize_compressed(&mut bytes).unwrap();
        let decoded = VerifyingKey::<Bls12_381>::deserialize_compressed(bytes.as_slice()).unwrap();
        assert_eq!(decoded, srs.verifying_key);
        Ok(())
    }
}
