/// NASA7 polynomial records: heat capacity, enthalpy and entropy of a species
pub mod NASAdata;
/// what the kinetics needs from thermodynamics, and its implementation over NASA7 polynomials
pub mod thermo_state;
