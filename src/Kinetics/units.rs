//! Unit basis of a mechanism.
//!
//! CHEMKIN-family mechanisms give concentrations in mol/cm³ and activation energies in cal/mol,
//! while the thermodynamic data (NASA polynomials) produce J/mol and the pressure comes in Pa.
//! All conversion factors between these worlds are collected here and captured once when the
//! mechanism is loaded.
use serde::{Deserialize, Serialize};

/// Universal gas constant in J/(mol·K)
pub const R_J: f64 = 8.314462618;
/// Universal gas constant in cal/(mol·K)
pub const R_CAL: f64 = R_J / 4.184;

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitBasis {
    /// gas constant in the unit of the activation energies (cal/(mol·K) for cal/mol)
    pub R_activation: f64,
    /// gas constant used with the thermodynamic data, J/(mol·K)
    pub R_thermo: f64,
    /// pressure unit of concentrations per Pa (10 for dyn/cm²)
    pub pressure_factor: f64,
    /// energy unit of concentrations per J (1e7 for erg)
    pub energy_factor: f64,
}

impl Default for UnitBasis {
    fn default() -> Self {
        Self::cgs_cal()
    }
}

impl UnitBasis {
    /// mol, cm³, s; activation energies in cal/mol
    pub fn cgs_cal() -> Self {
        Self {
            R_activation: R_CAL,
            R_thermo: R_J,
            pressure_factor: 10.0,
            energy_factor: 1e7,
        }
    }
    /// mol, cm³, s; activation energies in J/mol
    pub fn cgs_joule() -> Self {
        Self {
            R_activation: R_J,
            ..Self::cgs_cal()
        }
    }
    /// mol, m³, s; activation energies in J/mol
    pub fn si() -> Self {
        Self {
            R_activation: R_J,
            R_thermo: R_J,
            pressure_factor: 1.0,
            energy_factor: 1.0,
        }
    }
    /// p/(R·T) expressed in the concentration unit of the mechanism; this is the factor that turns
    /// Kp into Kc: Kc = Kp·(p/RT)^Δn
    pub fn standard_concentration(&self, P: f64, T: f64) -> f64 {
        P * self.pressure_factor / (self.R_thermo * self.energy_factor * T)
    }
}

/// Numerical settings that travel with the mechanism
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticsConfig {
    pub units: UnitBasis,
    /// below this concentration the Jacobian contribution of a species is taken as zero
    pub min_concentration: f64,
    /// lower validity bound of the thermodynamic polynomials, K
    pub min_temperature: f64,
}

impl Default for KineticsConfig {
    fn default() -> Self {
        Self {
            units: UnitBasis::default(),
            min_concentration: 1e-15,
            min_temperature: 273.0,
        }
    }
}
