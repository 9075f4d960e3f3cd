//! Analytical Jacobian of the production rates, J[i][j] = ∂omega_i/∂c_j.
//!
//! Rate coefficients are taken at the current state and held constant, [M] included. Only
//! stoichiometric magnitudes 1 and 2 of the differentiated species are supported.
use crate::Kinetics::kinetics_errors::{ConfigurationError, KineticsResult};
use crate::Kinetics::mechanism::Reaction;
use crate::Kinetics::production_rates::{concentration_product, third_body_factor};
use crate::Kinetics::rate_coefficients::{RateCoefficientEngine, RateCoefficients};
use nalgebra::DMatrix;

pub struct JacobianBuilder<'a> {
    pub rates: RateCoefficientEngine<'a>,
}

impl<'a> JacobianBuilder<'a> {
    pub fn new(rates: RateCoefficientEngine<'a>) -> Self {
        Self { rates }
    }

    /// d(c^nu)/dc for nu in {1, 2}
    fn power_rule(
        &self,
        r: usize,
        reaction: &Reaction,
        species: usize,
        nu: f64,
        c: f64,
    ) -> Result<f64, ConfigurationError> {
        if nu == 1.0 {
            Ok(1.0)
        } else if nu == 2.0 {
            Ok(2.0 * c)
        } else {
            Err(ConfigurationError::UnsupportedStoichiometry {
                reaction: r,
                equation: reaction.equation.clone(),
                species: self.rates.mechanism.species_name(species).to_string(),
                coefficient: nu,
            })
        }
    }

    /// contribution of reaction r to ∂omega_species1/∂c_species2
    fn derivation_of_reaction(
        &self,
        r: usize,
        species1: usize,
        species2: usize,
        rc: &RateCoefficients,
        C: &[f64],
    ) -> KineticsResult<f64> {
        let reaction = &self.rates.mechanism.reactions[r];
        let c_j = C[species2];
        let con_educt = match reaction.educt_coefficient(species2) {
            Some(nu) => {
                self.power_rule(r, reaction, species2, nu, c_j)?
                    * concentration_product(&reaction.reactants, C, Some(species2))
            }
            None => 0.0,
        };
        // irreversible reactions do not depend on their products
        let con_product = match (rc.kb, reaction.product_coefficient(species2)) {
            (Some(_), Some(nu)) => {
                self.power_rule(r, reaction, species2, nu, c_j)?
                    * concentration_product(&reaction.products, C, Some(species2))
            }
            _ => 0.0,
        };
        if c_j < self.rates.mechanism.config.min_concentration {
            return Ok(0.0);
        }
        let nu_species = reaction.nu(species1);
        Ok(third_body_factor(reaction, rc)
            * nu_species
            * (rc.kf * con_educt - rc.kb_or_zero() * con_product))
    }

    fn clamp(C: &[f64]) -> Vec<f64> {
        C.iter().map(|c| c.max(0.0)).collect()
    }

    fn entry_with(
        &self,
        i: usize,
        j: usize,
        C: &[f64],
        coefficients: &mut dyn FnMut(usize) -> KineticsResult<RateCoefficients>,
    ) -> KineticsResult<f64> {
        let mechanism = self.rates.mechanism;
        let mut value = 0.0;
        for &r in mechanism.reactions_of_species(i) {
            if !mechanism.reactions[r].contains(j) {
                continue;
            }
            let rc = coefficients(r)?;
            value += self.derivation_of_reaction(r, i, j, &rc, C)?;
        }
        self.rates.diagnostics.jacobian_entry(i, j, value);
        Ok(value)
    }

    /// J[i][j] alone
    pub fn jacobian_entry(&self, i: usize, j: usize, T: f64, C: &[f64]) -> KineticsResult<f64> {
        let mechanism = self.rates.mechanism;
        mechanism.check_species(i)?;
        mechanism.check_species(j)?;
        mechanism.check_concentrations(C)?;
        let C = Self::clamp(C);
        self.entry_with(i, j, &C, &mut |r: usize| self.rates.calculate_kf_kb(r, T, &C))
    }

    /// Full n_species × n_species matrix, rate coefficients evaluated once per reaction.
    ///
    /// For third-body reactions [M] is treated as a constant of the current state: the
    /// ∂[M]/∂c_j term is omitted, so for those reactions J is not the exact ∂omega/∂c. A
    /// reaction `2A + M => B + M` gives J[A][B] = 0 although omega_A depends on c_B through [M].
    /// The approximation suits Newton iterations of stiff integrators; use finite differences
    /// where the exact derivative matters.
    pub fn jacobian(&self, T: f64, C: &[f64]) -> KineticsResult<DMatrix<f64>> {
        let mechanism = self.rates.mechanism;
        mechanism.check_concentrations(C)?;
        let C = Self::clamp(C);
        let n = mechanism.n_species();
        let mut cache: Vec<Option<RateCoefficients>> = vec![None; mechanism.n_reactions()];
        let mut coefficients = |r: usize| -> KineticsResult<RateCoefficients> {
            if let Some(rc) = cache[r] {
                return Ok(rc);
            }
            let rc = self.rates.calculate_kf_kb(r, T, &C)?;
            cache[r] = Some(rc);
            Ok(rc)
        };
        let mut J = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                J[(i, j)] = self.entry_with(i, j, &C, &mut coefficients)?;
            }
        }
        Ok(J)
    }
}
