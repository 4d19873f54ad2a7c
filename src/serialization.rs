//! Decimal-string encoding of BLS12-381 proofs and public inputs for an external verifier.
//!
//! Every group element is split into its base field coordinates and each coordinate is written as
//! a canonical decimal string, so no precision is lost on hosts without big integers:
//!
//! - `a`, `c`: `[x, y]`
//! - `b`: `[[x.c0, x.c1], [y.c0, y.c1]]`
//!
//! The point at infinity is written as all zeroes.

use crate::errors::{Groth16Error, Result, fail};
use crate::groth16::Proof;
use crate::setup::VerifyingKey;
use ark_bls12_381::{Bls12_381, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use ark_std::Zero;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedProof {
    pub a: [String; 2],
    pub b: [[String; 2]; 2],
    pub c: [String; 2],
}

fn to_decimal<F: PrimeField>(value: &F) -> String {
    value.into_bigint().to_string()
}

/// Parse a decimal string, rejecting anything that is not the canonical encoding of a field
/// element (signs, leading zeroes, values `>= p`).
pub(crate) fn from_decimal<F: PrimeField>(value: &str) -> Result<F> {
    let invalid = || {
        fail(Groth16Error::InvalidInput)
            .attach(format!("not a canonical field element: {value:?}"))
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let parsed = F::from_str(value).map_err(|_| invalid())?;
    if to_decimal(&parsed) != value {
        return Err(invalid());
    }
    Ok(parsed)
}

fn encode_g1(point: &G1Affine) -> [String; 2] {
    if point.infinity {
        return [to_decimal(&Fq::from(0u64)), to_decimal(&Fq::from(0u64))];
    }
    [to_decimal(&point.x), to_decimal(&point.y)]
}

fn encode_fq2(value: &Fq2) -> [String; 2] {
    [to_decimal(&value.c0), to_decimal(&value.c1)]
}

fn encode_g2(point: &G2Affine) -> [[String; 2]; 2] {
    if point.infinity {
        let zero = Fq2::new(Fq::from(0u64), Fq::from(0u64));
        return [encode_fq2(&zero), encode_fq2(&zero)];
    }
    [encode_fq2(&point.x), encode_fq2(&point.y)]
}

fn decode_g1(coordinates: &[String; 2]) -> Result<G1Affine> {
    let x: Fq = from_decimal(&coordinates[0])?;
    let y: Fq = from_decimal(&coordinates[1])?;
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::identity());
    }
    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(fail(Groth16Error::InvalidInput)
            .attach("G1 point is not on the curve or not in the prime order subgroup")
            .attach(format!("Coordinates: {coordinates:?}")));
    }
    Ok(point)
}

fn decode_fq2(components: &[String; 2]) -> Result<Fq2> {
    Ok(Fq2::new(from_decimal(&components[0])?, from_decimal(&components[1])?))
}

fn decode_g2(coordinates: &[[String; 2]; 2]) -> Result<G2Affine> {
    let x = decode_fq2(&coordinates[0])?;
    let y = decode_fq2(&coordinates[1])?;
    if x.is_zero() && y.is_zero() {
        return Ok(G2Affine::identity());
    }
    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(fail(Groth16Error::InvalidInput)
            .attach("G2 point is not on the curve or not in the prime order subgroup")
            .attach(format!("Coordinates: {coordinates:?}")));
    }
    Ok(point)
}

pub fn encode_proof(proof: &Proof<Bls12_381>) -> EncodedProof {
    EncodedProof {
        a: encode_g1(&proof.a.into_affine()),
        b: encode_g2(&proof.b.into_affine()),
        c: encode_g1(&proof.c.into_affine()),
    }
}

pub fn decode_proof(encoded: &EncodedProof) -> Result<Proof<Bls12_381>> {
    Ok(Proof {
        a: decode_g1(&encoded.a)?.into(),
        b: decode_g2(&encoded.b)?.into(),
        c: decode_g1(&encoded.c)?.into(),
    })
}

pub fn encode_public_inputs(public_inputs: &[Fr]) -> Vec<String> {
    public_inputs.iter().map(to_decimal).collect()
}

pub fn decode_public_inputs(public_inputs: &[String]) -> Result<Vec<Fr>> {
    public_inputs.iter().map(|value| from_decimal(value)).collect()
}

/// Entry point for hosts that hold the proof as decimal strings. Malformed encodings are errors;
/// a well-formed proof that fails the pairing check is `Ok(false)`.
pub fn verify_encoded(
    verifying_key: &VerifyingKey<Bls12_381>,
    proof: &EncodedProof,
    public_inputs: &[String],
) -> Result<bool> {
    let proof = decode_proof(proof)?;
    let public_inputs = decode_public_inputs(public_inputs)?;
    Ok(proof.verify(verifying_key, &public_inputs))
}
