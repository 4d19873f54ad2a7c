use crate::circuits::{R1CS, compile, reference_witness};
use crate::config::PipelineConfig;
use crate::errors::Result;
use crate::groth16::Proof;
use crate::serialization::{EncodedProof, encode_proof, encode_public_inputs, verify_encoded};
use crate::setup::{Srs, VerifyingKey};
use ark_bls12_381::{Bls12_381, Fr};
use log::{debug, info};
use rand::RngCore;

/// A verifier outside this crate (e.g. a contract call) that consumes the decimal encoding.
pub trait ExternalVerifier {
    fn verify(&self, proof: &EncodedProof, public_inputs: &[String]) -> Result<bool>;
}

/// Verifies the decimal encoding in-process against a known verifying key.
pub struct NativeVerifier {
    pub verifying_key: VerifyingKey<Bls12_381>,
}

impl ExternalVerifier for NativeVerifier {
    fn verify(&self, proof: &EncodedProof, public_inputs: &[String]) -> Result<bool> {
        verify_encoded(&self.verifying_key, proof, public_inputs)
    }
}

#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub public_inputs: Vec<Fr>,
    pub proof: Proof<Bls12_381>,
    pub encoded_proof: EncodedProof,
    pub encoded_public_inputs: Vec<String>,
    pub verifying_key: VerifyingKey<Bls12_381>,
    pub verified: bool,
    /// `None` when no external verifier was supplied.
    pub externally_verified: Option<bool>,
}

/// Prove knowledge of `x, y` for the reference circuit end to end: compile, set up, prove, verify
/// natively and, if given, hand the encoded proof to `external`.
pub fn run<R: RngCore + ?Sized>(
    x: Fr,
    y: Fr,
    config: &PipelineConfig,
    rng: &mut R,
    external: Option<&dyn ExternalVerifier>,
) -> Result<PipelineOutput> {
    config.validate()?;
    let r1cs = R1CS::reference()?;
    let witness = reference_witness(x, y);
    let (qap, assignment) = compile(&r1cs, &witness)?;
    info!("Compiled reference circuit into a QAP of degree {}", qap.degree());

    let srs = match config.toxic_waste.fixed_waste()? {
        Some(waste) => Srs::<Bls12_381>::new(&qap, waste)?,
        None => Srs::<Bls12_381>::generate(&qap, rng, config.max_toxic_waste_attempts)?,
    };
    info!("Trusted setup complete");

    let proof = srs.proving_key.prove(&assignment, rng)?;
    let public_inputs = assignment.public_inputs(qap.num_public).to_vec();
    let verified = proof.verify(&srs.verifying_key, &public_inputs);
    info!("Native verification: {verified}");

    let encoded_proof = encode_proof(&proof);
    let encoded_public_inputs = encode_public_inputs(&public_inputs);
    let externally_verified = match external {
        Some(verifier) => {
            debug!("Handing proof to external verifier");
            let accepted = verifier.verify(&encoded_proof, &encoded_public_inputs)?;
            info!("External verification: {accepted}");
            Some(accepted)
        }
        None => None,
    };

    Ok(PipelineOutput {
        public_inputs,
        proof,
        encoded_proof,
        encoded_public_inputs,
        verifying_key: srs.verifying_key,
        verified,
        externally_verified,
    })
}
