/// Molar masses of species from their elemental composition.
///
/// Composition is either given explicitly (as in thermo dictionaries: {"C":1, "H":4}) or parsed
/// from a plain formula like "CH2O" or "C2H5OH". Element symbols in compositions are matched
/// case-insensitively because CHEMKIN files write "AR", "HE".
use crate::Kinetics::kinetics_errors::ConfigurationError;
use regex::Regex;
use std::collections::HashMap;

pub struct Element {
    pub name: &'static str,
    pub atomic_mass: f64,
}

const ELEMENTS: &[Element] = &[
    Element { name: "E", atomic_mass: 5.48579909e-4 },
    Element { name: "H", atomic_mass: 1.00794 },
    Element { name: "D", atomic_mass: 2.014102 },
    Element { name: "He", atomic_mass: 4.002602 },
    Element { name: "Li", atomic_mass: 6.941 },
    Element { name: "B", atomic_mass: 10.811 },
    Element { name: "C", atomic_mass: 12.0107 },
    Element { name: "N", atomic_mass: 14.0067 },
    Element { name: "O", atomic_mass: 15.9994 },
    Element { name: "F", atomic_mass: 18.9984032 },
    Element { name: "Ne", atomic_mass: 20.1797 },
    Element { name: "Na", atomic_mass: 22.98977 },
    Element { name: "Mg", atomic_mass: 24.305 },
    Element { name: "Al", atomic_mass: 26.981538 },
    Element { name: "Si", atomic_mass: 28.0855 },
    Element { name: "P", atomic_mass: 30.973761 },
    Element { name: "S", atomic_mass: 32.065 },
    Element { name: "Cl", atomic_mass: 35.453 },
    Element { name: "Ar", atomic_mass: 39.948 },
    Element { name: "K", atomic_mass: 39.0983 },
    Element { name: "Ca", atomic_mass: 40.078 },
    Element { name: "Fe", atomic_mass: 55.845 },
    Element { name: "Br", atomic_mass: 79.904 },
    Element { name: "Kr", atomic_mass: 83.798 },
    Element { name: "I", atomic_mass: 126.90447 },
    Element { name: "Xe", atomic_mass: 131.293 },
];

/// element record by symbol, case-insensitive
pub fn find_element(symbol: &str) -> Option<&'static Element> {
    ELEMENTS
        .iter()
        .find(|el| el.name.eq_ignore_ascii_case(symbol.trim()))
}

/// parse a formula without brackets into element counts, "C2H5OH" -> {C:2, H:6, O:1}
pub fn parse_formula(formula: &str) -> Result<HashMap<String, f64>, ConfigurationError> {
    if !formula.chars().any(|c| c.is_lowercase()) {
        return parse_upper_case_formula(formula);
    }
    let re = Regex::new(r"([A-Z][a-z]?)(\d*\.?\d*)").expect("element regex is valid");
    let mut composition: HashMap<String, f64> = HashMap::new();
    let mut matched_len = 0;
    for cap in re.captures_iter(formula) {
        let symbol = &cap[1];
        matched_len += cap[0].len();
        if ELEMENTS.iter().all(|el| el.name != symbol) {
            return Err(ConfigurationError::UnknownElement {
                species: formula.to_string(),
                element: symbol.to_string(),
            });
        }
        let count = if cap[2].is_empty() {
            1.0
        } else {
            cap[2].parse::<f64>().map_err(|_| ConfigurationError::UnknownElement {
                species: formula.to_string(),
                element: cap[0].to_string(),
            })?
        };
        *composition.entry(symbol.to_string()).or_insert(0.0) += count;
    }
    // anything not covered by the pattern (brackets, charges, lowercase names) is not a formula
    if matched_len != formula.len() || composition.is_empty() {
        return Err(ConfigurationError::MissingMolarMass(formula.to_string()));
    }
    Ok(composition)
}

/// All-caps names of the CHEMKIN files: "HE", "AR", "HO2", "CH2O". A two-letter element symbol
/// wins over two one-letter symbols, so "HE" is helium rather than H plus an electron.
fn parse_upper_case_formula(formula: &str) -> Result<HashMap<String, f64>, ConfigurationError> {
    let not_a_formula = || ConfigurationError::MissingMolarMass(formula.to_string());
    let chars: Vec<char> = formula.chars().collect();
    let mut composition: HashMap<String, f64> = HashMap::new();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_uppercase() {
            return Err(not_a_formula());
        }
        let pair: String = chars[i..(i + 2).min(chars.len())].iter().collect();
        let element = match ELEMENTS
            .iter()
            .find(|el| el.name.len() == 2 && pair.len() == 2 && el.name.eq_ignore_ascii_case(&pair))
        {
            Some(el) => {
                i += 2;
                el
            }
            None => {
                let symbol = chars[i].to_string();
                i += 1;
                ELEMENTS.iter().find(|el| el.name == symbol).ok_or_else(|| {
                    ConfigurationError::UnknownElement {
                        species: formula.to_string(),
                        element: symbol.clone(),
                    }
                })?
            }
        };
        let start = i;
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
            i += 1;
        }
        let count = if start == i {
            1.0
        } else {
            let digits: String = chars[start..i].iter().collect();
            digits.parse::<f64>().map_err(|_| not_a_formula())?
        };
        *composition.entry(element.name.to_string()).or_insert(0.0) += count;
    }
    if composition.is_empty() {
        return Err(not_a_formula());
    }
    Ok(composition)
}

/// molar mass in g/mol from a composition map
pub fn molar_mass_of_composition(
    species: &str,
    composition: &HashMap<String, f64>,
) -> Result<f64, ConfigurationError> {
    let mut M = 0.0;
    for (symbol, count) in composition {
        let element = find_element(symbol).ok_or_else(|| ConfigurationError::UnknownElement {
            species: species.to_string(),
            element: symbol.clone(),
        })?;
        M += element.atomic_mass * count;
    }
    Ok(M)
}
