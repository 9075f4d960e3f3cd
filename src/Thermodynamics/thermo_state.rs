//! Thermodynamic state consumed by the kinetics: enthalpy, entropy and molar mass per species
//! plus the system pressure. Equilibrium constants of reversible reactions are derived from it.
use crate::Kinetics::mechanism::Mechanism;
use crate::Thermodynamics::NASAdata::{NASAdata, NASAinput};
use log::{info, warn};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThermoError {
    #[error("species {species}: no coefficients for temperature {temperature} K, valid range: {range}")]
    TemperatureOutOfRange {
        species: String,
        temperature: f64,
        range: String,
    },
    #[error("species {0}: invalid temperature ranges in coefficient data")]
    InvalidTemperatureRange(String),
    #[error("no thermodynamic data for species {0}")]
    MissingSpecies(String),
    #[error("species index {index} out of range, thermo state holds {n_species} species")]
    SpeciesIndex { index: usize, n_species: usize },
    #[error("species {species}: failed to deserialize NASA data: {message}")]
    Deserialization { species: String, message: String },
}

/// What the kinetics needs from thermodynamics. Species are addressed by their index in the mechanism.
#[allow(non_snake_case)]
pub trait ThermoState {
    /// molar enthalpy, J/mol
    fn H(&self, species: usize, T: f64) -> Result<f64, ThermoError>;
    /// molar entropy, J/(mol·K)
    fn S(&self, species: usize, T: f64) -> Result<f64, ThermoError>;
    /// molar mass, g/mol
    fn MW(&self, species: usize) -> Result<f64, ThermoError>;
    /// system pressure, Pa
    fn p(&self) -> f64;
    /// molar Gibbs energy, J/mol
    fn G(&self, species: usize, T: f64) -> Result<f64, ThermoError> {
        Ok(self.H(species, T)? - T * self.S(species, T)?)
    }
}

/// NASA7 polynomials for every species of a mechanism, in mechanism order
#[derive(Debug, Clone)]
pub struct NasaThermoState {
    pub data: Vec<NASAdata>,
    pub molar_masses: Vec<f64>,
    /// Pa
    pub P: f64,
    /// lower validity bound, K
    pub T_min: f64,
}

impl NasaThermoState {
    /// pick the records of the mechanism species from a thermo library {species: NASA7 record}
    pub fn for_mechanism(
        mechanism: &Mechanism,
        library: &HashMap<String, NASAinput>,
        P: f64,
    ) -> Result<Self, ThermoError> {
        let mut data = Vec::with_capacity(mechanism.species.len());
        for species in mechanism.species.iter() {
            let input = library
                .get(&species.name)
                .ok_or_else(|| ThermoError::MissingSpecies(species.name.clone()))?;
            data.push(NASAdata::from_input(&species.name, input.clone())?);
        }
        let T_min = mechanism.config.min_temperature;
        for d in data.iter() {
            let bounds = d.temperature_bounds()?;
            if bounds[0] > T_min {
                warn!(
                    "{}: polynomials start at {} K, first range is used down to {} K",
                    d.name, bounds[0], T_min
                );
            }
        }
        info!(
            "thermo state for {} species at P = {} Pa",
            data.len(),
            P
        );
        Ok(Self {
            data,
            molar_masses: mechanism.species.iter().map(|s| s.molar_mass).collect(),
            P,
            T_min,
        })
    }
    pub fn set_pressure(&mut self, P: f64) {
        self.P = P;
    }
    fn record(&self, species: usize) -> Result<&NASAdata, ThermoError> {
        self.data.get(species).ok_or(ThermoError::SpeciesIndex {
            index: species,
            n_species: self.data.len(),
        })
    }
}

impl ThermoState for NasaThermoState {
    fn H(&self, species: usize, T: f64) -> Result<f64, ThermoError> {
        let (_, dh, _) = self.record(species)?.Cp_dH_dS_at(T, self.T_min)?;
        Ok(dh)
    }
    fn S(&self, species: usize, T: f64) -> Result<f64, ThermoError> {
        let (_, _, ds) = self.record(species)?.Cp_dH_dS_at(T, self.T_min)?;
        Ok(ds)
    }
    fn MW(&self, species: usize) -> Result<f64, ThermoError> {
        self.molar_masses
            .get(species)
            .copied()
            .ok_or(ThermoError::SpeciesIndex {
                index: species,
                n_species: self.molar_masses.len(),
            })
    }
    fn p(&self) -> f64 {
        self.P
    }
}
