//! Net molar production rates omega_s = Σ_r nu_rs·q_r with the rate of progress
//! q_r = factor_r·(kf·Π c_educt^|nu| - kb·Π c_product^|nu|).
//!
//! factor_r is [M] for reactions with a collision partner and plain Arrhenius rate, 1 otherwise;
//! fall-off reactions carry [M] inside the reduced pressure.
use crate::Kinetics::kinetics_errors::KineticsResult;
use crate::Kinetics::mechanism::Reaction;
use crate::Kinetics::rate_coefficients::{RateCoefficientEngine, RateCoefficients};
use nalgebra::DVector;

/// c^nu with exact results for the common coefficients
pub(crate) fn stoich_pow(c: f64, nu: f64) -> f64 {
    if nu == 1.0 {
        c
    } else if nu == 2.0 {
        c * c
    } else {
        c.powf(nu)
    }
}

/// Π c^|nu| over one side of a reaction, optionally leaving out one species
pub(crate) fn concentration_product(side: &[(usize, f64)], C: &[f64], skip: Option<usize>) -> f64 {
    side.iter()
        .filter(|(s, _)| Some(*s) != skip)
        .map(|(s, nu)| stoich_pow(C[*s], *nu))
        .product()
}

/// [M] when it multiplies the rate of progress, 1 otherwise
pub(crate) fn third_body_factor(reaction: &Reaction, rc: &RateCoefficients) -> f64 {
    if reaction.rate_multiplied_by_M() {
        rc.M.unwrap_or(1.0)
    } else {
        1.0
    }
}

pub struct ProductionRateEngine<'a> {
    pub rates: RateCoefficientEngine<'a>,
}

impl<'a> ProductionRateEngine<'a> {
    pub fn new(rates: RateCoefficientEngine<'a>) -> Self {
        Self { rates }
    }

    fn progress(&self, r: usize, rc: &RateCoefficients, C: &[f64]) -> f64 {
        let reaction = &self.rates.mechanism.reactions[r];
        let forward = rc.kf * concentration_product(&reaction.reactants, C, None);
        let backward = match rc.kb {
            Some(kb) => kb * concentration_product(&reaction.products, C, None),
            None => 0.0,
        };
        third_body_factor(reaction, rc) * (forward - backward)
    }

    /// q_r of a single reaction
    pub fn rate_of_progress(&self, r: usize, T: f64, C: &[f64]) -> KineticsResult<f64> {
        let rc = self.rates.calculate_kf_kb(r, T, C)?;
        Ok(self.progress(r, &rc, C))
    }

    /// q_r of every reaction
    pub fn rates_of_progress(&self, T: f64, C: &[f64]) -> KineticsResult<DVector<f64>> {
        let mechanism = self.rates.mechanism;
        mechanism.check_concentrations(C)?;
        let mut q = DVector::zeros(mechanism.n_reactions());
        for r in 0..mechanism.n_reactions() {
            q[r] = self.rate_of_progress(r, T, C)?;
        }
        Ok(q)
    }

    /// omega of one species, visiting only the reactions it takes part in
    pub fn omega(&self, species: usize, T: f64, C: &[f64]) -> KineticsResult<f64> {
        let mechanism = self.rates.mechanism;
        mechanism.check_species(species)?;
        mechanism.check_concentrations(C)?;
        let mut omega = 0.0;
        for &r in mechanism.reactions_of_species(species) {
            let nu = mechanism.reactions[r].nu(species);
            if nu == 0.0 {
                continue;
            }
            omega += nu * self.rate_of_progress(r, T, C)?;
        }
        self.rates.diagnostics.production_rate(species, T, omega);
        Ok(omega)
    }

    /// omega of every species, every reaction evaluated once
    pub fn omega_all(&self, T: f64, C: &[f64]) -> KineticsResult<DVector<f64>> {
        let mechanism = self.rates.mechanism;
        let q = self.rates_of_progress(T, C)?;
        let mut omega = DVector::zeros(mechanism.n_species());
        for (r, reaction) in mechanism.reactions.iter().enumerate() {
            for &s in reaction.species_in_reaction.iter() {
                omega[s] += reaction.nu(s) * q[r];
            }
        }
        for s in 0..mechanism.n_species() {
            self.rates.diagnostics.production_rate(s, T, omega[s]);
        }
        Ok(omega)
    }
}
