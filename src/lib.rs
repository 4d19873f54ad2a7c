//! # WARNING
//! This library was made for purely academic purposes, and has not been audited for security!
//! Don't use this in production!
//!# QAP Groth16
//!
//!This crate compiles a small arithmetic circuit into a Quadratic Arithmetic Program, runs a
//!Groth16 trusted setup over it, and produces and verifies proofs for a witness.
//!
//!The protocol code is type generic over any curve that implements `ark_ec::pairing::Pairing`,
//!and is tested with BLS12-381 as well as MNT6-753. The decimal-string encoding for external
//!verifiers is specific to BLS12-381.
//!
//!Errors are handled using the `rootcause` crate. Every fallible call returns a
//!`Report<Groth16Error>`, so callers can match on the failure kind with
//!`report.current_context()` while still getting the attached operands (shapes, polynomials,
//!witness values) when printing the report. A proof that fails verification is not an error,
//!just `false`.
//!
//!The core types are `circuits::R1CS`, `circuits::QAP`, `setup::Srs`, `groth16::Proof`.
//!
//!The general flow is:
//!
//!- Define an R1CS, or use `R1CS::reference()` for `out = 3x²y + 5xy − x − 2y + 3`
//!- Use `circuits::compile` to check the witness and derive the QAP and the quotient `h`
//!- Generate a trusted setup using `Srs::generate` (or `Srs::new` with explicit `ToxicWaste`)
//!- Generate a proof using `srs.proving_key.prove(&assignment, &mut rng)`
//!- Verify the proof with `proof.verify(&srs.verifying_key, public_inputs)`
//!
//!`pipeline::run` strings all of these together for the reference circuit and can hand the
//!encoded proof to an external verifier.
//!

/// Contains the types for Rank 1 Constraint Systems and Quadratic Arithmetic Programs.
pub mod circuits;
/// Pipeline configuration.
pub mod config;
pub mod errors;
/// Field helpers on top of `ark_ff`.
pub mod field;
/// Contains types for the actual Groth16 proof algorithm.
pub mod groth16;
mod helpers;
/// End to end proving for the reference circuit.
pub mod pipeline;
/// Contains types for polynomials.
pub mod polynomial;
/// Decimal encoding for external verifiers.
pub mod serialization;
/// Trusted setup and the structured reference string.
pub mod setup;

pub use errors::{Groth16Error, Result};
pub use helpers::{rand_nonzero_scalar, rand_scalar};
