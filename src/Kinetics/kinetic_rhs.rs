//! Right-hand side of the species equations dc/dt = omega(T, c) and its Jacobian in the form an
//! ODE integrator consumes them.
//!
//! # Examples
//! ```
//! use KiJac::Kinetics::kinetic_rhs::KineticRHS;
//! use KiJac::Kinetics::mechanism_input::MechanismInput;
//! use KiJac::Thermodynamics::thermo_state::{ThermoError, ThermoState};
//! use nalgebra::DVector;
//!
//! struct Flat;
//! impl ThermoState for Flat {
//!     fn H(&self, _s: usize, _T: f64) -> Result<f64, ThermoError> { Ok(0.0) }
//!     fn S(&self, _s: usize, _T: f64) -> Result<f64, ThermoError> { Ok(0.0) }
//!     fn MW(&self, _s: usize) -> Result<f64, ThermoError> { Ok(1.0) }
//!     fn p(&self) -> f64 { 101325.0 }
//! }
//! let mech = MechanismInput::from_json_str(
//!     r#"{"reactions": [{"type": "elem", "eq": "H2 + O2 => HO2 + H", "Arrenius": [1e13, 0.0, 0.0]}]}"#,
//! ).unwrap();
//! let rhs = KineticRHS::new(&mech, &Flat);
//! let c = DVector::from_vec(vec![1e-6, 2e-6, 0.0, 0.0]);
//! let dcdt = rhs.rhs(1000.0, &c).unwrap();
//! assert!(dcdt[0] < 0.0);
//! let J = rhs.jacobian(1000.0, &c).unwrap();
//! assert_eq!(J.nrows(), 4);
//! ```
use crate::Kinetics::diagnostics::KineticsDiagnostics;
use crate::Kinetics::jacobian::JacobianBuilder;
use crate::Kinetics::kinetics_errors::{ConfigurationError, KineticsResult};
use crate::Kinetics::mechanism::Mechanism;
use crate::Kinetics::production_rates::ProductionRateEngine;
use crate::Kinetics::rate_coefficients::RateCoefficientEngine;
use crate::Thermodynamics::thermo_state::ThermoState;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;

pub struct KineticRHS<'a> {
    production: ProductionRateEngine<'a>,
    jacobian: JacobianBuilder<'a>,
}

impl<'a> KineticRHS<'a> {
    pub fn new(mechanism: &'a Mechanism, thermo: &'a dyn ThermoState) -> Self {
        Self {
            production: ProductionRateEngine::new(RateCoefficientEngine::new(mechanism, thermo)),
            jacobian: JacobianBuilder::new(RateCoefficientEngine::new(mechanism, thermo)),
        }
    }
    pub fn with_diagnostics(self, diagnostics: &'a dyn KineticsDiagnostics) -> Self {
        Self {
            production: ProductionRateEngine::new(self.production.rates.with_diagnostics(diagnostics)),
            jacobian: JacobianBuilder::new(self.jacobian.rates.with_diagnostics(diagnostics)),
        }
    }
    pub fn mechanism(&self) -> &'a Mechanism {
        self.production.rates.mechanism
    }

    /// omega of every species
    pub fn rhs(&self, T: f64, C: &DVector<f64>) -> KineticsResult<DVector<f64>> {
        self.production.omega_all(T, C.as_slice())
    }
    /// omega of one species
    pub fn omega(&self, species: usize, T: f64, C: &DVector<f64>) -> KineticsResult<f64> {
        self.production.omega(species, T, C.as_slice())
    }
    pub fn rates_of_progress(&self, T: f64, C: &DVector<f64>) -> KineticsResult<DVector<f64>> {
        self.production.rates_of_progress(T, C.as_slice())
    }
    /// ∂omega/∂c
    pub fn jacobian(&self, T: f64, C: &DVector<f64>) -> KineticsResult<DMatrix<f64>> {
        self.jacobian.jacobian(T, C.as_slice())
    }
    pub fn jacobian_entry(&self, i: usize, j: usize, T: f64, C: &DVector<f64>) -> KineticsResult<f64> {
        self.jacobian.jacobian_entry(i, j, T, C.as_slice())
    }
    pub fn concentrations_from_map(
        &self,
        map: &HashMap<String, f64>,
    ) -> Result<DVector<f64>, ConfigurationError> {
        self.mechanism().concentrations_from_map(map)
    }
}
