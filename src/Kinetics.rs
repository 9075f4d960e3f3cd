/// error types: configuration errors (fatal) and numeric degeneracies (catchable)
pub mod kinetics_errors;
/// unit basis of a mechanism (cal/mol vs J/mol activation energies, mol/cm³ vs mol/m³) and numerical settings
pub mod units;
/// Module to calculate the atomic composition and molar mass of a chemical formula
///
///  # Examples
/// ```
/// use KiJac::Kinetics::molmass::{parse_formula, molar_mass_of_composition};
/// let composition = parse_formula("C6H8O6").unwrap();
/// let molar_mass = molar_mass_of_composition("C6H8O6", &composition).unwrap();
/// assert!((molar_mass - 176.12).abs() < 1e-2);
/// ```
pub mod molmass;
/// eng
/// The module takes as input a vector of reaction equations specified as a vector of String and produces the following data:
/// 1) a stoichiometric matrix specified as a vector of vectors
/// 2) a vector of substances
/// 3) a vector of vectors of stoichiometric coefficients of reactants in each reaction
/// 4) the same for products
/// Collision partners ("+M", "(+M)", "(+AR)") are recognized and removed from the stoichiometry,
/// the last characters '_dup' or '_DUP' are removed as parsing artifacts
/// ----------------------------------------------------------------
/// # Examples
/// ```
/// use KiJac::Kinetics::stoichiometry_analyzer::StoichAnalyzer;
/// let reactions: Vec<String> = vec!["A=>2B", "B<=>A + 3C_DUP", "2B+A=D"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let mut analyzer = StoichAnalyzer::from_reactions(reactions);
/// analyzer.search_substances().unwrap();
/// analyzer.analyse_reactions().unwrap();
/// assert_eq!(analyzer.substances, vec!["A", "B", "C", "D"]);
/// println!("{:?}", analyzer.stecheo_matrx);
/// ```
pub mod stoichiometry_analyzer;
/// Arrhenius rate constants (numeric and symbolic) and fall-off blending: Lindemann, TROE, SRI
pub mod arrhenius;
/// immutable mechanism: species, reactions, stoichiometry, third-body specifications
pub mod mechanism;
/// serde representation of mechanism documents and their validation
pub mod mechanism_input;
/// observation hooks: no-op, log and table sinks
pub mod diagnostics;
/// kf, kb, Kc and [M] of one reaction at one temperature
pub mod rate_coefficients;
/// net production rates omega of the species
pub mod production_rates;
/// analytic Jacobian ∂omega_i/∂c_j
pub mod jacobian;
pub mod kinetic_rhs;
mod kinetics_tests;
