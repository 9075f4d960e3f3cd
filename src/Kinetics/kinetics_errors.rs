//! Error types of the kinetics core.
//!
//! Two families are kept apart:
//! - [`ConfigurationError`]: a malformed mechanism or a violated caller contract (unknown species,
//!   unsupported stoichiometry in the Jacobian, missing concentrations...). Nothing can be recovered.
//! - [`NumericDegeneracy`]: the inputs are well formed but the numbers degenerate at this state
//!   (zero equilibrium constant, non-finite rate coefficient). The caller may catch it and change
//!   the state (e.g. reduce the integrator step).
use crate::Thermodynamics::thermo_state::ThermoError;
use thiserror::Error;

/// crate-wide result alias
pub type KineticsResult<T> = Result<T, KineticsError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error(
        "reaction {reaction} ({equation}): stoichiometric coefficient {coefficient} of species {species} \
         cannot be differentiated, only 1 and 2 are implemented"
    )]
    UnsupportedStoichiometry {
        reaction: usize,
        equation: String,
        species: String,
        coefficient: f64,
    },
    #[error("no concentration given for species {species}")]
    MissingConcentration { species: String },
    #[error("concentration vector has {found} entries, mechanism has {expected} species")]
    ConcentrationLength { expected: usize, found: usize },
    #[error("species index {index} out of range, mechanism has {n_species} species")]
    SpeciesIndexOutOfRange { index: usize, n_species: usize },
    #[error("reaction index {index} out of range, mechanism has {n_reactions} reactions")]
    ReactionIndexOutOfRange { index: usize, n_reactions: usize },
    #[error("reaction {equation} references species {species} absent from the species list")]
    UnknownSpecies { equation: String, species: String },
    #[error("species {0} is defined twice")]
    DuplicateSpecies(String),
    #[error("species {species} contains unknown element {element}")]
    UnknownElement { species: String, element: String },
    #[error("neither molar mass nor composition given for species {0}")]
    MissingMolarMass(String),
    #[error("reaction {equation}: invalid rate parameters: {what}")]
    InvalidRateParameters { equation: String, what: String },
    #[error("cannot parse reaction equation '{equation}': {reason}")]
    EquationParse { equation: String, reason: String },
    #[error("temperature must be positive and finite, got {0} K")]
    InvalidTemperature(f64),
    #[error("mechanism contains no reactions")]
    EmptyMechanism,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericDegeneracy {
    #[error("reaction {reaction} ({equation}): equilibrium constant is zero at T = {temperature} K")]
    ZeroEquilibriumConstant {
        reaction: usize,
        equation: String,
        temperature: f64,
    },
    #[error("reaction {reaction} ({equation}): {what} is not finite at T = {temperature} K")]
    NonFiniteRate {
        reaction: usize,
        equation: String,
        temperature: f64,
        what: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum KineticsError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("numeric degeneracy: {0}")]
    Numeric(#[from] NumericDegeneracy),
    #[error("thermodynamics: {0}")]
    Thermo(#[from] ThermoError),
    #[error("failed to parse mechanism document: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl KineticsError {
    /// true for the errors that mean "the mechanism or the call is malformed"
    pub fn is_configuration(&self) -> bool {
        match self {
            KineticsError::Configuration(_) => true,
            // out-of-range temperature is a caller contract violation as well
            KineticsError::Thermo(_) => true,
            KineticsError::Serde(_) | KineticsError::Io(_) => true,
            KineticsError::Numeric(_) => false,
        }
    }
    pub fn is_numeric_degeneracy(&self) -> bool {
        matches!(self, KineticsError::Numeric(_))
    }
}
