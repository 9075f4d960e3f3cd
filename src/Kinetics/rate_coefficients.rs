//! Rate coefficients of a single reaction at a given temperature: forward rate constant,
//! third-body concentration, equilibrium constant from the thermodynamic state and the backward
//! rate constant kb = kf/Kc.
use crate::Kinetics::arrhenius::FalloffKind;
use crate::Kinetics::diagnostics::{KineticsDiagnostics, NoDiagnostics};
use crate::Kinetics::kinetics_errors::{ConfigurationError, KineticsResult, NumericDegeneracy};
use crate::Kinetics::mechanism::{Mechanism, Reaction, ThirdBody};
use crate::Thermodynamics::thermo_state::ThermoState;

/// reaction enthalpy, entropy and Gibbs energy, J/mol and J/(mol·K)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThermoDeltas {
    pub dH: f64,
    pub dS: f64,
    pub dG: f64,
}

/// transient kinetic state of one reaction, never stored on the mechanism
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCoefficients {
    pub kf: f64,
    /// None for irreversible reactions
    pub kb: Option<f64>,
    pub Kc: Option<f64>,
    /// None if the reaction has no collision partner
    pub M: Option<f64>,
    pub deltas: Option<ThermoDeltas>,
}

impl RateCoefficients {
    pub fn kb_or_zero(&self) -> f64 {
        self.kb.unwrap_or(0.0)
    }
}

pub struct RateCoefficientEngine<'a> {
    pub mechanism: &'a Mechanism,
    pub thermo: &'a dyn ThermoState,
    pub diagnostics: &'a dyn KineticsDiagnostics,
}

impl<'a> RateCoefficientEngine<'a> {
    pub fn new(mechanism: &'a Mechanism, thermo: &'a dyn ThermoState) -> Self {
        Self {
            mechanism,
            thermo,
            diagnostics: &NoDiagnostics,
        }
    }
    pub fn with_diagnostics(mut self, diagnostics: &'a dyn KineticsDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn check_temperature(T: f64) -> Result<(), ConfigurationError> {
        if !(T.is_finite() && T > 0.0) {
            return Err(ConfigurationError::InvalidTemperature(T));
        }
        Ok(())
    }

    fn reaction(&self, r: usize) -> Result<&'a Reaction, ConfigurationError> {
        self.mechanism
            .reactions
            .get(r)
            .ok_or(ConfigurationError::ReactionIndexOutOfRange {
                index: r,
                n_reactions: self.mechanism.n_reactions(),
            })
    }

    /// [M] = Σ eff_s·c_s, None for reactions without a collision partner
    pub fn third_body_concentration(&self, r: usize, C: &[f64]) -> KineticsResult<Option<f64>> {
        let reaction = self.reaction(r)?;
        self.mechanism.check_concentrations(C)?;
        let M = match &reaction.third_body {
            ThirdBody::None => None,
            ThirdBody::Simple => Some(C.iter().sum()),
            ThirdBody::Enhanced(_) => Some(
                C.iter()
                    .enumerate()
                    .map(|(s, c)| reaction.third_body.efficiency(s) * c)
                    .sum(),
            ),
            ThirdBody::Specific(s) => Some(C[*s]),
        };
        Ok(M)
    }

    /// kf of reaction r; fall-off reactions need [M]
    pub fn forward_rate(&self, r: usize, T: f64, M: Option<f64>) -> KineticsResult<f64> {
        Self::check_temperature(T)?;
        let reaction = self.reaction(r)?;
        let R = self.mechanism.config.units.R_activation;
        let kf = match &reaction.falloff {
            FalloffKind::SimpleArrhenius => reaction.arrhenius.K_const(T, R),
            FalloffKind::Falloff(falloff) => {
                falloff.K_const(&reaction.arrhenius, T, M.unwrap_or(0.0), R)
            }
        };
        if !kf.is_finite() {
            return Err(NumericDegeneracy::NonFiniteRate {
                reaction: r,
                equation: reaction.equation.clone(),
                temperature: T,
                what: "kf",
            }
            .into());
        }
        Ok(kf)
    }

    /// ΔH, ΔS, ΔG over the species of the reaction
    pub fn reaction_deltas(&self, r: usize, T: f64) -> KineticsResult<ThermoDeltas> {
        let reaction = self.reaction(r)?;
        let mut deltas = ThermoDeltas::default();
        for s in reaction.species_in_reaction.iter() {
            let nu = reaction.nu(*s);
            if nu == 0.0 {
                continue;
            }
            deltas.dH += nu * self.thermo.H(*s, T)?;
            deltas.dS += nu * self.thermo.S(*s, T)?;
        }
        deltas.dG = deltas.dH - T * deltas.dS;
        Ok(deltas)
    }

    /// Kc = exp(-ΔG/RT)·(p/RT)^Σnu in the concentration unit of the mechanism
    pub fn equilibrium_constant(&self, r: usize, T: f64) -> KineticsResult<(f64, ThermoDeltas)> {
        Self::check_temperature(T)?;
        let reaction = self.reaction(r)?;
        let units = &self.mechanism.config.units;
        let deltas = self.reaction_deltas(r, T)?;
        let Kp = f64::exp(-deltas.dG / (units.R_thermo * T));
        let exponent = reaction.mole_change();
        let Kc = if exponent == 0.0 {
            Kp
        } else {
            Kp * units.standard_concentration(self.thermo.p(), T).powf(exponent)
        };
        if Kc == 0.0 {
            return Err(NumericDegeneracy::ZeroEquilibriumConstant {
                reaction: r,
                equation: reaction.equation.clone(),
                temperature: T,
            }
            .into());
        }
        if Kc.is_nan() {
            return Err(NumericDegeneracy::NonFiniteRate {
                reaction: r,
                equation: reaction.equation.clone(),
                temperature: T,
                what: "Kc",
            }
            .into());
        }
        Ok((Kc, deltas))
    }

    /// [M] (third-body reactions), kf, and Kc with kb for reversible reactions
    pub fn calculate_kf_kb(&self, r: usize, T: f64, C: &[f64]) -> KineticsResult<RateCoefficients> {
        let reaction = self.reaction(r)?;
        let M = self.third_body_concentration(r, C)?;
        let kf = self.forward_rate(r, T, M)?;
        let (kb, Kc, deltas) = if reaction.reversible {
            let (Kc, deltas) = self.equilibrium_constant(r, T)?;
            (Some(kf / Kc), Some(Kc), Some(deltas))
        } else {
            (None, None, None)
        };
        let coefficients = RateCoefficients {
            kf,
            kb,
            Kc,
            M,
            deltas,
        };
        self.diagnostics.rate_coefficients(r, T, &coefficients);
        Ok(coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::arrhenius::{Arrhenius, Falloff, FalloffBlending, Lindemann, Troe};
    use crate::Kinetics::mechanism::Species;
    use crate::Kinetics::units::{KineticsConfig, R_J};
    use crate::Thermodynamics::thermo_state::ThermoError;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    /// H = h_s, S = s_s, independent of T
    struct ConstThermo {
        H: Vec<f64>,
        S: Vec<f64>,
        P: f64,
    }

    impl ThermoState for ConstThermo {
        fn H(&self, species: usize, _T: f64) -> Result<f64, ThermoError> {
            Ok(self.H[species])
        }
        fn S(&self, species: usize, _T: f64) -> Result<f64, ThermoError> {
            Ok(self.S[species])
        }
        fn MW(&self, _species: usize) -> Result<f64, ThermoError> {
            Ok(1.0)
        }
        fn p(&self) -> f64 {
            self.P
        }
    }

    fn mechanism(equations: &[&str], names: &[&str]) -> Mechanism {
        let species: Vec<Species> = names.iter().map(|n| Species::new(n, 1.0)).collect();
        let reactions = equations
            .iter()
            .map(|eq| Reaction::from_equation(eq, &species, Arrhenius::new(1e13, 0.0, 0.0)).unwrap())
            .collect();
        Mechanism::new(vec![], species, reactions, KineticsConfig::default()).unwrap()
    }

    #[test]
    fn test_irreversible_has_no_kb() {
        let mech = mechanism(&["A + B => C"], &["A", "B", "C"]);
        let thermo = ConstThermo {
            H: vec![f64::NAN; 3],
            S: vec![f64::NAN; 3],
            P: 101325.0,
        };
        let engine = RateCoefficientEngine::new(&mech, &thermo);
        let rc = engine.calculate_kf_kb(0, 1000.0, &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(rc.kf, 1e13);
        assert_eq!(rc.kb, None);
        assert_eq!(rc.Kc, None);
        assert_eq!(rc.M, None);
    }

    #[test]
    fn test_kb_is_kf_over_Kc() {
        let mech = mechanism(&["A + B <=> C"], &["A", "B", "C"]);
        let thermo = ConstThermo {
            H: vec![0.0, 0.0, -50000.0],
            S: vec![0.0, 0.0, -20.0],
            P: 101325.0,
        };
        let engine = RateCoefficientEngine::new(&mech, &thermo);
        let T: f64 = 1200.0;
        let rc = engine.calculate_kf_kb(0, T, &[1.0, 1.0, 1.0]).unwrap();
        let dG = -50000.0 - T * (-20.0);
        let Kp = f64::exp(-dG / (R_J * T));
        // Σnu = -1
        let Kc = Kp / (101325.0 * 10.0 / (R_J * 1e7 * T));
        assert_relative_eq!(rc.Kc.unwrap(), Kc, max_relative = 1e-12);
        assert_relative_eq!(rc.kb.unwrap(), rc.kf / rc.Kc.unwrap(), max_relative = 1e-14);
        assert_relative_eq!(rc.deltas.unwrap().dG, dG, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_mole_change_has_no_pressure_factor() {
        let mech = mechanism(&["A + B <=> C + D"], &["A", "B", "C", "D"]);
        let thermo = ConstThermo {
            H: vec![0.0, 0.0, 1000.0, 0.0],
            S: vec![0.0, 0.0, 0.0, 0.0],
            P: 5e5,
        };
        let engine = RateCoefficientEngine::new(&mech, &thermo);
        let (Kc, _) = engine.equilibrium_constant(0, 800.0).unwrap();
        assert_relative_eq!(Kc, f64::exp(-1000.0 / (R_J * 800.0)), max_relative = 1e-14);
    }

    #[test]
    fn test_zero_Kc_is_numeric_degeneracy() {
        let mech = mechanism(&["A <=> B"], &["A", "B"]);
        let thermo = ConstThermo {
            H: vec![0.0, 1e9],
            S: vec![0.0, 0.0],
            P: 101325.0,
        };
        let engine = RateCoefficientEngine::new(&mech, &thermo);
        let err = engine.calculate_kf_kb(0, 300.0, &[1.0, 1.0]).unwrap_err();
        assert!(err.is_numeric_degeneracy());
    }

    #[test]
    fn test_third_body_concentration() {
        let species: Vec<Species> = ["A", "B", "C"].iter().map(|n| Species::new(n, 1.0)).collect();
        let simple =
            Reaction::from_equation("A + M => B + M", &species, Arrhenius::new(1.0, 0.0, 0.0))
                .unwrap();
        let doubled = simple
            .clone()
            .with_third_body(ThirdBody::Enhanced(HashMap::from([(2, 2.0)])));
        let mech = Mechanism::new(
            vec![],
            species,
            vec![simple, doubled],
            KineticsConfig::default(),
        )
        .unwrap();
        let thermo = ConstThermo {
            H: vec![0.0; 3],
            S: vec![0.0; 3],
            P: 1e5,
        };
        let engine = RateCoefficientEngine::new(&mech, &thermo);
        let C = [1.0, 2.0, 3.0];
        let M_simple = engine.third_body_concentration(0, &C).unwrap().unwrap();
        let M_enh = engine.third_body_concentration(1, &C).unwrap().unwrap();
        assert_eq!(M_simple, 6.0);
        assert_eq!(M_enh - M_simple, 3.0);
        assert!(engine.third_body_concentration(0, &[1.0]).is_err());
    }

    #[test]
    fn test_troe_low_pressure_limit() {
        let species: Vec<Species> = ["A", "B"].iter().map(|n| Species::new(n, 1.0)).collect();
        let troe = Troe::from_vec(&[0.5, 100.0, 1000.0, 5000.0], "A (+M) => B (+M)").unwrap();
        let r = Reaction::from_equation("A (+M) => B (+M)", &species, Arrhenius::new(1e13, 0.0, 0.0))
            .unwrap()
            .with_falloff(Falloff {
                low: Arrhenius::new(1e18, 0.0, 0.0),
                blending: FalloffBlending::Troe(troe),
            });
        let lind = r.clone().with_falloff(Falloff {
            low: Arrhenius::new(1e18, 0.0, 0.0),
            blending: FalloffBlending::Lindemann(Lindemann),
        });
        let mech = Mechanism::new(vec![], species, vec![r, lind], KineticsConfig::default()).unwrap();
        let thermo = ConstThermo {
            H: vec![0.0; 2],
            S: vec![0.0; 2],
            P: 1e5,
        };
        let engine = RateCoefficientEngine::new(&mech, &thermo);
        let k_zero = engine.calculate_kf_kb(0, 1000.0, &[0.0, 0.0]).unwrap();
        assert_eq!(k_zero.kf, 0.0);
        let k_small = engine.calculate_kf_kb(0, 1000.0, &[1e-14, 0.0]).unwrap();
        assert!(k_small.kf < 1e5);
        assert!(k_small.kf > 0.0);
        // broadening stays below the Lindemann curve
        let C = [1e-6, 0.0];
        let k_troe = engine.calculate_kf_kb(0, 1000.0, &C).unwrap().kf;
        let k_lind = engine.calculate_kf_kb(1, 1000.0, &C).unwrap().kf;
        assert!(k_troe < k_lind);
    }

    #[test]
    fn test_invalid_temperature() {
        let mech = mechanism(&["A => B"], &["A", "B"]);
        let thermo = ConstThermo {
            H: vec![0.0; 2],
            S: vec![0.0; 2],
            P: 1e5,
        };
        let engine = RateCoefficientEngine::new(&mech, &thermo);
        assert!(engine.forward_rate(0, -5.0, None).unwrap_err().is_configuration());
        assert!(engine.forward_rate(0, f64::NAN, None).is_err());
    }
}
