use crate::Kinetics::kinetics_errors::ConfigurationError;
use regex::Regex;
use std::collections::HashMap;

/// collision partner found in a reaction equation
#[derive(Debug, Clone, PartialEq)]
pub enum ThirdBodyMarker {
    /// no collision partner
    None,
    /// "A + B + M <=> AB + M"
    Collision,
    /// "A + B (+M) <=> AB (+M)", fall-off reaction; Some(name) if a single species plays the role of M
    Pressure(Option<String>),
}

/// stoichiometry of a single equation; coefficients are magnitudes, species keep their order of appearance
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEquation {
    pub equation: String,
    pub reactants: Vec<(String, f64)>,
    pub products: Vec<(String, f64)>,
    pub reversible: bool,
    pub third_body: ThirdBodyMarker,
}

impl ParsedEquation {
    /// all species of the equation in order of appearance, educts first, a named fall-off
    /// collision partner last
    pub fn species(&self) -> Vec<String> {
        let mut species: Vec<String> = Vec::new();
        for (name, _) in self.reactants.iter().chain(self.products.iter()) {
            if !species.contains(name) {
                species.push(name.clone());
            }
        }
        if let ThirdBodyMarker::Pressure(Some(collider)) = &self.third_body {
            if !species.contains(collider) {
                species.push(collider.clone());
            }
        }
        species
    }
}

/// Turns reaction equations into stoichiometric data.
///
/// Accepted arrows: `<=>`, `=` (reversible) and `=>`, `->` (irreversible). Collision partners are
/// written as a `M` term or as `(+M)` / `(+AR)` for fall-off reactions and are removed from the
/// stoichiometry. Suffixes `_dup`, `_DUP` and ` DUP` are parsing artifacts of the libraries and are dropped.
#[derive(Debug, Clone, Default)]
pub struct StoichAnalyzer {
    pub reactions: Vec<String>,
    pub substances: Vec<String>,
    pub parsed: Vec<ParsedEquation>,
    /// reactions × substances, products positive, educts negative
    pub stecheo_matrx: Vec<Vec<f64>>,
    /// reactions × substances, educt coefficient magnitudes
    pub stecheo_reags: Vec<Vec<f64>>,
    /// reactions × substances, product coefficient magnitudes
    pub stecheo_prods: Vec<Vec<f64>>,
}

impl StoichAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reactions(reactions: Vec<String>) -> Self {
        Self {
            reactions,
            ..Self::default()
        }
    }

    /// parse every equation and collect substances in order of first appearance
    pub fn search_substances(&mut self) -> Result<(), ConfigurationError> {
        let mut parsed = Vec::with_capacity(self.reactions.len());
        for eq in self.reactions.iter() {
            parsed.push(parse_equation(eq)?);
        }
        let mut substances: Vec<String> = Vec::new();
        for p in parsed.iter() {
            for s in p.species() {
                if !substances.contains(&s) {
                    substances.push(s);
                }
            }
        }
        self.parsed = parsed;
        self.substances = substances;
        Ok(())
    }

    /// build stoichiometric matrices against `self.substances` (which may be set by hand beforehand)
    pub fn analyse_reactions(&mut self) -> Result<(), ConfigurationError> {
        if self.parsed.len() != self.reactions.len() {
            let mut parsed = Vec::with_capacity(self.reactions.len());
            for eq in self.reactions.iter() {
                parsed.push(parse_equation(eq)?);
            }
            self.parsed = parsed;
        }
        let index: HashMap<&str, usize> = self
            .substances
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();
        let n = self.substances.len();
        let mut reags = vec![vec![0.0; n]; self.parsed.len()];
        let mut prods = vec![vec![0.0; n]; self.parsed.len()];
        for (r, p) in self.parsed.iter().enumerate() {
            for (name, coeff) in p.reactants.iter() {
                let i = *index
                    .get(name.as_str())
                    .ok_or_else(|| ConfigurationError::UnknownSpecies {
                        equation: p.equation.clone(),
                        species: name.clone(),
                    })?;
                reags[r][i] += coeff;
            }
            for (name, coeff) in p.products.iter() {
                let i = *index
                    .get(name.as_str())
                    .ok_or_else(|| ConfigurationError::UnknownSpecies {
                        equation: p.equation.clone(),
                        species: name.clone(),
                    })?;
                prods[r][i] += coeff;
            }
        }
        self.stecheo_matrx = reags
            .iter()
            .zip(prods.iter())
            .map(|(re, pr)| pr.iter().zip(re.iter()).map(|(p, r)| p - r).collect())
            .collect();
        self.stecheo_reags = reags;
        self.stecheo_prods = prods;
        Ok(())
    }
}

fn strip_duplicate_marker(equation: &str) -> &str {
    let eq = equation.trim();
    for suffix in ["_dup", "_DUP", " DUP", " dup"] {
        if let Some(stripped) = eq.strip_suffix(suffix) {
            return stripped.trim_end();
        }
    }
    eq
}

/// parse one side of an equation, "2H2 + O2" -> [(H2, 2), (O2, 1)]
fn parse_side(
    side: &str,
    equation: &str,
) -> Result<(Vec<(String, f64)>, bool), ConfigurationError> {
    let term_re = Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)?\s*([A-Za-z(].*)$").expect("term regex is valid");
    let mut terms: Vec<(String, f64)> = Vec::new();
    let mut has_m = false;
    for raw in side.split('+') {
        let term = raw.trim();
        if term.is_empty() {
            return Err(ConfigurationError::EquationParse {
                equation: equation.to_string(),
                reason: "empty term".to_string(),
            });
        }
        let cap = term_re
            .captures(term)
            .ok_or_else(|| ConfigurationError::EquationParse {
                equation: equation.to_string(),
                reason: format!("cannot read term '{}'", term),
            })?;
        let coeff = match cap.get(1) {
            Some(c) => c
                .as_str()
                .parse::<f64>()
                .map_err(|e| ConfigurationError::EquationParse {
                    equation: equation.to_string(),
                    reason: e.to_string(),
                })?,
            None => 1.0,
        };
        let name = cap[2].trim().to_string();
        if name == "M" {
            has_m = true;
            continue;
        }
        if let Some(entry) = terms.iter_mut().find(|(s, _)| *s == name) {
            entry.1 += coeff;
        } else {
            terms.push((name, coeff));
        }
    }
    Ok((terms, has_m))
}

/// parse a single reaction equation
pub fn parse_equation(equation: &str) -> Result<ParsedEquation, ConfigurationError> {
    let eq = strip_duplicate_marker(equation);
    let (lhs, rhs, reversible) = if let Some((l, r)) = eq.split_once("<=>") {
        (l, r, true)
    } else if let Some((l, r)) = eq.split_once("=>") {
        (l, r, false)
    } else if let Some((l, r)) = eq.split_once("->") {
        (l, r, false)
    } else if let Some((l, r)) = eq.split_once('=') {
        (l, r, true)
    } else {
        return Err(ConfigurationError::EquationParse {
            equation: equation.to_string(),
            reason: "no reaction arrow".to_string(),
        });
    };

    let falloff_re = Regex::new(r"\(\s*\+\s*([A-Za-z0-9_]+)\s*\)").expect("falloff regex is valid");
    let collider = |side: &str| -> Option<String> {
        falloff_re.captures(side).map(|c| c[1].to_string())
    };
    let (left_collider, right_collider) = (collider(lhs), collider(rhs));
    if left_collider != right_collider {
        return Err(ConfigurationError::EquationParse {
            equation: equation.to_string(),
            reason: "fall-off collision partner must appear on both sides".to_string(),
        });
    }
    let lhs = falloff_re.replace_all(lhs, "");
    let rhs = falloff_re.replace_all(rhs, "");

    let (reactants, left_m) = parse_side(&lhs, equation)?;
    let (products, right_m) = parse_side(&rhs, equation)?;
    if left_m != right_m {
        return Err(ConfigurationError::EquationParse {
            equation: equation.to_string(),
            reason: "third body M must appear on both sides".to_string(),
        });
    }
    if reactants.is_empty() || products.is_empty() {
        return Err(ConfigurationError::EquationParse {
            equation: equation.to_string(),
            reason: "reaction needs educts and products".to_string(),
        });
    }
    let third_body = match (left_collider, left_m) {
        (Some(c), _) if c == "M" => ThirdBodyMarker::Pressure(None),
        (Some(c), _) => ThirdBodyMarker::Pressure(Some(c)),
        (None, true) => ThirdBodyMarker::Collision,
        (None, false) => ThirdBodyMarker::None,
    };
    Ok(ParsedEquation {
        equation: eq.to_string(),
        reactants,
        products,
        reversible,
        third_body,
    })
}
