use crate::circuits::QapAssignment;
use crate::errors::{self, Groth16Error, fail};
use crate::helpers::rand_nonzero_scalar;
use crate::setup::{ProvingKey, VerifyingKey};
use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::Zero;
use log::{debug, warn};
use rand::RngCore;
use std::iter::zip;

/// A Groth16 proof `(A ∈ G1, B ∈ G2, C ∈ G1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<C: Pairing> {
    pub a: C::G1,
    pub b: C::G2,
    pub c: C::G1,
}

impl<C: Pairing> Proof<C> {
    /// Check `e(−A, B) · e(α, β) · e(X, γ) · e(C, δ) = 1` where
    /// `X = Σ public_i · [C_i(τ)/γ]_1`.
    ///
    /// `public_inputs` are the leading witness wires, starting with the constant `1`. A proof that
    /// does not verify, or the wrong number of public inputs, gives `false`.
    pub fn verify(
        &self,
        verifying_key: &VerifyingKey<C>,
        public_inputs: &[C::ScalarField],
    ) -> bool {
        debug!("Verifying with public inputs: {:?}", public_inputs);
        if public_inputs.len() != verifying_key.public_terms.len() {
            warn!(
                "Expected {} public inputs, got {}",
                verifying_key.public_terms.len(),
                public_inputs.len()
            );
            return false;
        }

        let x1 = zip(&verifying_key.public_terms, public_inputs)
            .map(|(term, a_i)| *term * a_i)
            .fold(C::G1::zero(), |acc, term| acc + term);

        let miller_loop = C::multi_miller_loop(
            [-self.a, verifying_key.alpha_g1, x1, self.c],
            [
                self.b,
                verifying_key.beta_g2,
                verifying_key.gamma_g2,
                verifying_key.delta_g2,
            ],
        );
        let accepted = C::final_exponentiation(miller_loop).is_some_and(|output| output.is_zero());
        debug!("Proof accepted: {accepted}");
        accepted
    }
}

impl<C: Pairing> ProvingKey<C> {
    /// Prove with fresh blinding scalars `r, s` drawn from `rng`.
    pub fn prove<R: RngCore + ?Sized>(
        &self,
        assignment: &QapAssignment<C::ScalarField>,
        rng: &mut R,
    ) -> errors::Result<Proof<C>> {
        let r = rand_nonzero_scalar(rng);
        let s = rand_nonzero_scalar(rng);
        self.prove_with_blinding(assignment, r, s)
    }

    /// Prove with caller-chosen blinding. Reusing `r, s` across proofs leaks the witness.
    pub fn prove_with_blinding(
        &self,
        assignment: &QapAssignment<C::ScalarField>,
        r: C::ScalarField,
        s: C::ScalarField,
    ) -> errors::Result<Proof<C>> {
        let witness = &assignment.witness;
        if witness.len() != self.num_public + self.private_terms.len() {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("Witness wrong size for proving key")
                .attach(format!(
                    "public: {}, private: {}, witness: {}",
                    self.num_public,
                    self.private_terms.len(),
                    witness.len()
                )));
        }

        let a = assignment.ua.evaluate_over_srs(&self.powers_of_tau_g1)?
            + self.alpha_g1
            + self.delta_g1 * r;
        let b_2 = assignment.va.evaluate_over_srs(&self.powers_of_tau_g2)?
            + self.beta_g2
            + self.delta_g2 * s;
        let b_1 = assignment.va.evaluate_over_srs(&self.powers_of_tau_g1)?
            + self.beta_g1
            + self.delta_g1 * s;

        let private_sum = zip(&self.private_terms, &witness[self.num_public..])
            .map(|(term, a_i)| *term * a_i)
            .fold(C::G1::zero(), |acc, term| acc + term);
        let ht_tau = assignment.h.evaluate_over_srs(&self.ht_powers)?;

        let c = private_sum + ht_tau + a * s + b_1 * r - self.delta_g1 * (r * s);
        debug!("Proof generated");
        Ok(Proof { a, b: b_2, c })
    }
}
