use rootcause::Report;
use std::fmt;

/// Failure modes of the QAP, setup and proving pipeline.
///
/// Verification never produces one of these for a well-formed but false proof; that is a plain
/// `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Groth16Error {
    /// Malformed circuit shape, duplicate interpolation points, bad encodings or wrong lengths.
    InvalidInput,
    /// Inverse of the zero field element was requested.
    DivisionByZero,
    /// Polynomial division left a non-zero remainder.
    InexactDivision,
    /// The witness does not satisfy `A·a ∘ B·a = C·a`.
    WitnessInconsistent,
    /// `Ua·Va − Wa` is not a multiple of the vanishing polynomial.
    QapInconsistent,
    /// `gamma` or `delta` is zero, `tau` is a root of `t(x)`, or no usable draw was found
    /// within the attempt bound.
    InvalidToxicWaste,
}

pub type Result<T> = std::result::Result<T, Report<Groth16Error>>;

impl fmt::Display for Groth16Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Groth16Error::InvalidInput => write!(f, "invalid input"),
            Groth16Error::DivisionByZero => write!(f, "division by zero in the scalar field"),
            Groth16Error::InexactDivision => {
                write!(f, "polynomial division has a non-zero remainder")
            }
            Groth16Error::WitnessInconsistent => {
                write!(f, "witness does not satisfy A·a ∘ B·a = C·a")
            }
            Groth16Error::QapInconsistent => write!(f, "Ua·Va − Wa is not divisible by t(x)"),
            Groth16Error::InvalidToxicWaste => write!(f, "toxic waste scalars are unusable"),
        }
    }
}

impl std::error::Error for Groth16Error {}

/// Starts a report for `error`; callers chain `.attach(..)` with the operands that caused it.
pub(crate) fn fail(error: Groth16Error) -> Report<Groth16Error> {
    Report::new(error)
}
