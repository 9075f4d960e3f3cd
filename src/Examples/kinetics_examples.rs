use crate::Kinetics::diagnostics::TableDiagnostics;
use crate::Kinetics::kinetic_rhs::KineticRHS;
use crate::Kinetics::kinetics_errors::KineticsResult;
use crate::Kinetics::mechanism::Mechanism;
use crate::Kinetics::mechanism_input::MechanismInput;
use crate::Thermodynamics::NASAdata::NASAinput;
use crate::Thermodynamics::thermo_state::NasaThermoState;
use log::error;
use nalgebra::DVector;
use prettytable::{Cell, Row, Table};
use serde_json::json;
use std::collections::HashMap;

/// hydrogen-oxygen subset of GRI-Mech 3.0 / Li et al. (2004), cal/mol
pub fn h2_o2_mechanism() -> KineticsResult<Mechanism> {
    let doc = json!({
        "elements": ["H", "O"],
        "species": [{"name": "H2"}, {"name": "O2"}, {"name": "H"}, {"name": "O"},
                    {"name": "OH"}, {"name": "H2O"}, {"name": "HO2"}],
        "reactions": [
            {"type": "elem", "eq": "O+H2<=>H+OH", "Arrenius": [3.87e4, 2.7, 6260.0]},
            {"type": "elem", "eq": "H+O2<=>O+OH", "Arrenius": [2.65e16, -0.6707, 17041.0]},
            {"type": "elem", "eq": "OH+H2<=>H+H2O", "Arrenius": [2.16e8, 1.51, 3430.0]},
            {"type": "elem", "eq": "2OH<=>O+H2O", "Arrenius": [3.57e4, 2.4, -2110.0]},
            {"type": "three-body", "eq": "2H+M<=>H2+M", "Arrenius": [1.0e18, -1.0, 0.0],
             "eff": {"H2": 0.0, "H2O": 0.0}},
            {"type": "three-body", "eq": "H+OH+M<=>H2O+M", "Arrenius": [2.2e22, -2.0, 0.0],
             "eff": {"H2": 0.73, "H2O": 3.65}},
            {"type": "falloff", "eq": "H+O2(+M)<=>HO2(+M)",
             "high_rate": [1.475e12, 0.6, 0.0], "low_rate": [6.366e20, -1.72, 524.8],
             "troe": [0.8, 1e-30, 1e30], "eff": {"H2": 2.0, "H2O": 11.0, "O2": 0.78}},
            {"type": "elem", "eq": "HO2+H<=>2OH", "Arrenius": [8.4e13, 0.0, 635.0]}
        ]
    });
    let input: MechanismInput = serde_json::from_value(doc)?;
    Ok(input.build()?)
}

/// NASA7 polynomials of GRI-Mech 3.0
pub fn h2_o2_thermo() -> KineticsResult<HashMap<String, NASAinput>> {
    let doc = json!({
        "H2": {"Cp": [200.0, 1000.0, 3500.0,
            2.34433112, 7.98052075e-03, -1.9478151e-05, 2.01572094e-08, -7.37611761e-12, -917.935173, 0.683010238,
            3.3372792, -4.94024731e-05, 4.99456778e-07, -1.79566394e-10, 2.00255376e-14, -950.158922, -3.20502331]},
        "O2": {"Cp": [200.0, 1000.0, 3500.0,
            3.78245636, -2.99673416e-03, 9.84730201e-06, -9.68129509e-09, 3.24372837e-12, -1063.94356, 3.65767573,
            3.28253784, 1.48308754e-03, -7.57966669e-07, 2.09470555e-10, -2.16717794e-14, -1088.45772, 5.45323129]},
        "H": {"Cp": [200.0, 1000.0, 3500.0,
            2.5, 7.05332819e-13, -1.99591964e-15, 2.30081632e-18, -9.27732332e-22, 25473.6599, -0.446682853,
            2.50000001, -2.30842973e-11, 1.61561948e-14, -4.73515235e-18, 4.98197357e-22, 25473.6599, -0.446682914]},
        "O": {"Cp": [200.0, 1000.0, 3500.0,
            3.1682671, -3.27931884e-03, 6.64306396e-06, -6.12806624e-09, 2.11265971e-12, 29122.2592, 2.05193346,
            2.56942078, -8.59741137e-05, 4.19484589e-08, -1.00177799e-11, 1.22833691e-15, 29217.5791, 4.78433864]},
        "OH": {"Cp": [200.0, 1000.0, 3500.0,
            3.99201543, -2.40131752e-03, 4.61793841e-06, -3.88113333e-09, 1.3641147e-12, 3615.08056, -0.103925458,
            3.09288767, 5.48429716e-04, 1.26505228e-07, -8.79461556e-11, 1.17412376e-14, 3858.657, 4.4766961]},
        "H2O": {"Cp": [200.0, 1000.0, 3500.0,
            4.19864056, -2.0364341e-03, 6.52040211e-06, -5.48797062e-09, 1.77197817e-12, -30293.7267, -0.849032208,
            3.03399249, 2.17691804e-03, -1.64072518e-07, -9.7041987e-11, 1.68200992e-14, -30004.2971, 4.9667701]},
        "HO2": {"Cp": [200.0, 1000.0, 3500.0,
            4.30179801, -4.74912051e-03, 2.11582891e-05, -2.42763894e-08, 9.29225124e-12, 294.80804, 3.71666245,
            4.0172109, 2.23982013e-03, -6.3365815e-07, 1.1424637e-10, -1.07908535e-14, 111.856713, 3.78510215]}
    });
    Ok(serde_json::from_value(doc)?)
}

fn production_rates_example() -> KineticsResult<()> {
    let mechanism = h2_o2_mechanism()?;
    mechanism.pretty_print();
    let thermo = NasaThermoState::for_mechanism(&mechanism, &h2_o2_thermo()?, 101325.0)?;
    let diagnostics = TableDiagnostics::new();
    let rhs = KineticRHS::new(&mechanism, &thermo).with_diagnostics(&diagnostics);
    // stoichiometric H2/O2 with a trace of radicals, mol/cm³
    let C = rhs.concentrations_from_map(&HashMap::from([
        ("H2".to_string(), 1.2e-5),
        ("O2".to_string(), 6.0e-6),
        ("H".to_string(), 1e-9),
        ("O".to_string(), 1e-10),
        ("OH".to_string(), 1e-9),
        ("H2O".to_string(), 0.0),
        ("HO2".to_string(), 1e-12),
    ]))?;
    let T: f64 = 1500.0;
    let omega = rhs.rhs(T, &C)?;
    let equations: Vec<String> = mechanism
        .reactions
        .iter()
        .map(|r| r.equation.clone())
        .collect();
    diagnostics.print(&equations);

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("species"),
        Cell::new("c, mol/cm3"),
        Cell::new("omega, mol/(cm3 s)"),
    ]));
    for (s, species) in mechanism.species.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&species.name),
            Cell::new(&format!("{:.3e}", C[s])),
            Cell::new(&format!("{:.3e}", omega[s])),
        ]));
    }
    table.printstd();
    diagnostics.clear();

    let J = rhs.jacobian(T, &C)?;
    println!("Jacobian at T = {} K: {}", T, J);
    Ok(())
}

fn stoichiometry_example() -> KineticsResult<()> {
    use crate::Kinetics::stoichiometry_analyzer::StoichAnalyzer;
    let reactions_: Vec<&str> = vec!["A=>2B", "B<=>A + 3C_DUP", "2B+A=D"];
    let mut StoichAnalyzer_instance =
        StoichAnalyzer::from_reactions(reactions_.iter().map(|s| s.to_string()).collect());
    StoichAnalyzer_instance.search_substances()?;
    StoichAnalyzer_instance.analyse_reactions()?;
    println!("substances: {:?}", StoichAnalyzer_instance.substances);
    println!("stecheo_matrx {:?}", StoichAnalyzer_instance.stecheo_matrx);
    let mechanism = h2_o2_mechanism()?;
    println!("H2/O2 stoichiometric matrix {}", mechanism.stoichiometric_matrix());
    Ok(())
}

fn rate_constant_example() -> KineticsResult<()> {
    use RustedSciThe::symbolic::symbolic_engine::Expr;
    let mechanism = h2_o2_mechanism()?;
    let R = mechanism.config.units.R_activation;
    let reaction = &mechanism.reactions[1];
    let k_sym = reaction.arrhenius.K_expr(Expr::Var("T".to_owned()), R);
    println!("k({}) = {}", reaction.equation, k_sym);
    let k_fun = k_sym.lambdify1D();
    let T = DVector::from_fn(6, |i, _| 800.0 + 300.0 * i as f64);
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("T, K"), Cell::new("k"), Cell::new("k (symbolic)")]));
    for Ti in T.iter() {
        table.add_row(Row::new(vec![
            Cell::new(&format!("{}", Ti)),
            Cell::new(&format!("{:.4e}", reaction.arrhenius.K_const(*Ti, R))),
            Cell::new(&format!("{:.4e}", k_fun(*Ti))),
        ]));
    }
    table.printstd();
    Ok(())
}

pub fn kin_examples(kintask: usize) {
    let result = match kintask {
        // production rates and Jacobian of the H2/O2 system
        0 => production_rates_example(),
        // stoichiometric analysis
        1 => stoichiometry_example(),
        // symbolic rate constant
        2 => rate_constant_example(),
        _ => {
            println!("no example with number {}", kintask);
            Ok(())
        }
    };
    if let Err(e) = result {
        error!("example {} failed: {}", kintask, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::jacobian::JacobianBuilder;
    use crate::Kinetics::rate_coefficients::RateCoefficientEngine;

    #[test]
    fn test_h2_o2_mechanism_builds() {
        let mechanism = h2_o2_mechanism().unwrap();
        assert_eq!(mechanism.n_species(), 7);
        assert_eq!(mechanism.n_reactions(), 8);
        let thermo = NasaThermoState::for_mechanism(&mechanism, &h2_o2_thermo().unwrap(), 101325.0)
            .unwrap();
        let builder = JacobianBuilder::new(RateCoefficientEngine::new(&mechanism, &thermo));
        let C = vec![1.2e-5, 6.0e-6, 1e-9, 1e-10, 1e-9, 1e-9, 1e-12];
        let J = builder.jacobian(1500.0, &C).unwrap();
        assert!(J.iter().all(|x| x.is_finite()));
        // H2 is consumed by O and OH, its diagonal entry is negative
        assert!(J[(0, 0)] < 0.0);
    }

    #[test]
    fn test_examples_run() {
        for task in 0..3 {
            kin_examples(task);
        }
    }
}
