//! End-to-end checks of the kinetics chain: mechanism document -> rate coefficients ->
//! production rates -> Jacobian.
#[cfg(test)]
mod tests {
    use crate::Kinetics::diagnostics::TableDiagnostics;
    use crate::Kinetics::kinetic_rhs::KineticRHS;
    use crate::Kinetics::mechanism_input::MechanismInput;
    use crate::Kinetics::rate_coefficients::RateCoefficientEngine;
    use crate::Kinetics::units::R_J;
    use crate::Thermodynamics::NASAdata::NASAinput;
    use crate::Thermodynamics::thermo_state::{NasaThermoState, ThermoError, ThermoState};
    use approx::assert_relative_eq;
    use nalgebra::DVector;
    use serde_json::json;
    use std::collections::HashMap;

    struct Flat;

    impl ThermoState for Flat {
        fn H(&self, _species: usize, _T: f64) -> Result<f64, ThermoError> {
            Ok(0.0)
        }
        fn S(&self, _species: usize, _T: f64) -> Result<f64, ThermoError> {
            Ok(0.0)
        }
        fn MW(&self, _species: usize) -> Result<f64, ThermoError> {
            Ok(1.0)
        }
        fn p(&self) -> f64 {
            101325.0
        }
    }

    fn abc() -> crate::Kinetics::mechanism::Mechanism {
        let doc = json!({
            "species": [
                {"name": "A", "molar_mass": 10.0}, {"name": "B", "molar_mass": 20.0},
                {"name": "C", "molar_mass": 30.0}, {"name": "D", "molar_mass": 40.0}
            ],
            "reactions": [{"type": "elem", "eq": "A + B => C", "Arrenius": [1e13, 0.0, 0.0]}]
        });
        serde_json::from_value::<MechanismInput>(doc)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_a_plus_b_to_c() {
        let mech = abc();
        let rhs = KineticRHS::new(&mech, &Flat);
        let T: f64 = 1000.0;
        let C = DVector::from_vec(vec![100.0, 1.0, 3.0, 0.0]);
        let kf: f64 = 1e13;
        let omega = rhs.rhs(T, &C).unwrap();
        assert_relative_eq!(omega[0], -kf * 100.0 * 1.0, max_relative = 1e-14);
        assert_relative_eq!(omega[1], -kf * 100.0 * 1.0, max_relative = 1e-14);
        assert_relative_eq!(omega[2], kf * 100.0 * 1.0, max_relative = 1e-14);
        assert_eq!(omega[3], 0.0);
        assert_relative_eq!(rhs.omega(0, T, &C).unwrap(), omega[0]);

        let J = rhs.jacobian(T, &C).unwrap();
        assert_relative_eq!(J[(0, 1)], -kf * 100.0, max_relative = 1e-14);
        assert_relative_eq!(J[(0, 0)], -kf * 1.0, max_relative = 1e-14);
        assert_relative_eq!(J[(2, 0)], kf * 1.0, max_relative = 1e-14);
        assert_eq!(J[(0, 3)], 0.0);
        assert_eq!(J[(3, 0)], 0.0);
        assert_relative_eq!(rhs.jacobian_entry(2, 1, T, &C).unwrap(), kf * 100.0);
    }

    #[test]
    fn test_concentrations_from_map() {
        let mech = abc();
        let rhs = KineticRHS::new(&mech, &Flat);
        let mut map = HashMap::from([
            ("A".to_string(), 1.0),
            ("B".to_string(), 2.0),
            ("C".to_string(), 3.0),
        ]);
        assert!(rhs.concentrations_from_map(&map).is_err());
        map.insert("D".to_string(), 0.0);
        let C = rhs.concentrations_from_map(&map).unwrap();
        assert_eq!(C.as_slice(), &[1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_third_body_rate_scales_with_efficiency() {
        let doc = |eff: f64| {
            json!({
                "species": [{"name": "H"}, {"name": "H2"}, {"name": "AR", "composition": {"Ar": 1.0}}],
                "reactions": [{"type": "three-body", "eq": "H + H + M => H2 + M",
                               "Arrenius": [1e18, -1.0, 0.0], "eff": {"AR": eff}}]
            })
        };
        let C = DVector::from_vec(vec![1e-7, 1e-6, 1e-5]);
        let q = |eff: f64| {
            let mech = serde_json::from_value::<MechanismInput>(doc(eff))
                .unwrap()
                .build()
                .unwrap();
            KineticRHS::new(&mech, &Flat)
                .rates_of_progress(1500.0, &C)
                .unwrap()[0]
        };
        let k = 1e18 / 1500.0 * 1e-7 * 1e-7;
        assert_relative_eq!(q(1.0), k * (1e-7 + 1e-6 + 1e-5), max_relative = 1e-12);
        assert_relative_eq!(q(2.0) - q(1.0), k * 1e-5, max_relative = 1e-9);
    }

    #[test]
    fn test_troe_falloff_limits() {
        let doc = json!({
            "species": [{"name": "H"}, {"name": "O2"}, {"name": "HO2"}],
            "reactions": [{"type": "falloff", "eq": "H + O2 (+M) => HO2 (+M)",
                "high_rate": [4.65e12, 0.44, 0.0], "low_rate": [1.737e19, -1.23, 0.0],
                "troe": [0.67, 1e-30, 1e30, 1e30]}]
        });
        let mech = serde_json::from_value::<MechanismInput>(doc)
            .unwrap()
            .build()
            .unwrap();
        let engine = RateCoefficientEngine::new(&mech, &Flat);
        let T: f64 = 1000.0;
        let k_inf = 4.65e12 * T.powf(0.44);
        let kf = |M: f64| engine.calculate_kf_kb(0, T, &[M, 0.0, 0.0]).unwrap().kf;
        assert_eq!(kf(0.0), 0.0);
        assert!(kf(1e-20) < 1e-3 * k_inf);
        // high pressure limit
        assert_relative_eq!(kf(1e6), k_inf, max_relative = 1e-3);
    }

    #[test]
    fn test_reversible_with_nasa_thermo() {
        // H2 <=> 2H with GRI-Mech 3.0 polynomials
        let doc = json!({
            "species": [{"name": "H2"}, {"name": "H"}],
            "reactions": [{"type": "elem", "eq": "H2 <=> 2H", "Arrenius": [4.577e19, -1.4, 104380.0]}]
        });
        let mech = serde_json::from_value::<MechanismInput>(doc)
            .unwrap()
            .build()
            .unwrap();
        let library: HashMap<String, NASAinput> = serde_json::from_value(json!({
            "H2": {"Cp": [200.0, 1000.0, 3500.0,
                2.34433112, 7.98052075e-03, -1.9478151e-05, 2.01572094e-08, -7.37611761e-12, -917.935173, 0.683010238,
                3.3372792, -4.94024731e-05, 4.99456778e-07, -1.79566394e-10, 2.00255376e-14, -950.158922, -3.20502331]},
            "H": {"Cp": [200.0, 1000.0, 3500.0,
                2.5, 7.05332819e-13, -1.99591964e-15, 2.30081632e-18, -9.27732332e-22, 25473.6599, -0.446682853,
                2.50000001, -2.30842973e-11, 1.61561948e-14, -4.73515235e-18, 4.98197357e-22, 25473.6599, -0.446682914]}
        }))
        .unwrap();
        let thermo = NasaThermoState::for_mechanism(&mech, &library, 101325.0).unwrap();
        let diagnostics = TableDiagnostics::new();
        let engine = RateCoefficientEngine::new(&mech, &thermo).with_diagnostics(&diagnostics);
        let T: f64 = 2000.0;
        let rc = engine.calculate_kf_kb(0, T, &[1e-6, 1e-8]).unwrap();
        let dG = 2.0 * thermo.G(1, T).unwrap() - thermo.G(0, T).unwrap();
        let Kc = f64::exp(-dG / (R_J * T)) * mech.config.units.standard_concentration(101325.0, T);
        assert_relative_eq!(rc.Kc.unwrap(), Kc, max_relative = 1e-12);
        assert_relative_eq!(rc.kb.unwrap() * rc.Kc.unwrap(), rc.kf, max_relative = 1e-12);
        // dissociation of H2 is strongly endothermic, ~ 436 kJ/mol at 298 K
        assert!(rc.deltas.unwrap().dH > 4.0e5);
        assert_eq!(diagnostics.len(), 1);

        // detailed balance: q = 0 at the equilibrium composition
        let c_H2 = 1e-6;
        let c_H = (Kc * c_H2).sqrt();
        let rhs = KineticRHS::new(&mech, &thermo);
        let q = rhs
            .rates_of_progress(T, &DVector::from_vec(vec![c_H2, c_H]))
            .unwrap()[0];
        assert_relative_eq!(q, 0.0, epsilon = 1e-9 * rc.kf * c_H2);

        // outside the polynomial range
        let err = rhs
            .rhs(4000.0, &DVector::from_vec(vec![c_H2, c_H]))
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
