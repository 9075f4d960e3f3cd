//! Library representation of a mechanism and its conversion into [`Mechanism`].
//!
//! Reaction records use the same field names as the kinetic libraries:
//! ```json
//! {"type": "elem", "eq": "H+O2<=>O+OH", "Arrenius": [3.547e15, -0.406, 16599.0]}
//! {"type": "three-body", "eq": "H2+M<=>H+H+M", "Arrenius": [4.577e19, -1.4, 104380.0], "eff": {"H2": 2.5}}
//! {"type": "falloff", "eq": "H+O2(+M)<=>HO2(+M)", "high_rate": [...], "low_rate": [...], "troe": [...], "eff": {...}}
//! ```
//! The species list is optional: without it species are collected from the equations and their
//! molar masses are computed from the names read as formulas.
use crate::Kinetics::arrhenius::{
    Arrhenius, Falloff, FalloffBlending, Lindemann, Sri, Troe,
};
use crate::Kinetics::kinetics_errors::{ConfigurationError, KineticsResult};
use crate::Kinetics::mechanism::{Mechanism, Reaction, Species, ThirdBody};
use crate::Kinetics::stoichiometry_analyzer::{ParsedEquation, StoichAnalyzer, ThirdBodyMarker};
use crate::Kinetics::units::KineticsConfig;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub enum ReactionType {
    #[serde(rename = "elem")]
    Elem,
    #[serde(rename = "falloff")]
    Falloff,
    #[serde(rename = "three-body")]
    ThreeBody,
}

impl<'de> Deserialize<'de> for ReactionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "elem" => Ok(ReactionType::Elem),
            "falloff" => Ok(ReactionType::Falloff),
            "three-body" | "threebody" => Ok(ReactionType::ThreeBody),
            "pressure" | "pres" | "empirical" => Err(serde::de::Error::custom(format!(
                "reaction type {} is not supported",
                s
            ))),
            _ => Err(serde::de::Error::custom(format!(
                "Unknown reaction type: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SpeciesInput {
    pub name: String,
    #[serde(default)]
    pub molar_mass: Option<f64>,
    #[serde(default)]
    pub composition: Option<HashMap<String, f64>>,
}

/// one reaction record of a kinetic library
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReactionInput {
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
    pub eq: String,
    #[serde(default)]
    pub Arrenius: Option<Vec<f64>>,
    #[serde(default)]
    pub high_rate: Option<Vec<f64>>,
    #[serde(default)]
    pub low_rate: Option<Vec<f64>>,
    #[serde(default)]
    pub troe: Option<Vec<f64>>,
    #[serde(default)]
    pub sri: Option<Vec<f64>>,
    #[serde(default)]
    pub eff: Option<HashMap<String, f64>>,
    /// overrides the arrow of the equation
    #[serde(default)]
    pub reversible: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct MechanismInput {
    #[serde(default)]
    pub config: KineticsConfig,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default)]
    pub species: Vec<SpeciesInput>,
    pub reactions: Vec<ReactionInput>,
}

impl MechanismInput {
    pub fn from_json_str(document: &str) -> KineticsResult<Mechanism> {
        let input: MechanismInput = serde_json::from_str(document)?;
        Ok(input.build()?)
    }

    /// validate the records and build the immutable mechanism
    pub fn build(&self) -> Result<Mechanism, ConfigurationError> {
        let equations: Vec<String> = self.reactions.iter().map(|r| r.eq.clone()).collect();
        let mut analyzer = StoichAnalyzer::from_reactions(equations);
        analyzer.search_substances()?;

        let species = if self.species.is_empty() {
            info!(
                "no species list given, {} species taken from the equations",
                analyzer.substances.len()
            );
            analyzer
                .substances
                .iter()
                .map(|name| Species::from_composition(name, None))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.species
                .iter()
                .map(species_from_input)
                .collect::<Result<Vec<_>, _>>()?
        };
        self.check_elements(&species)?;

        let mut reactions = Vec::with_capacity(self.reactions.len());
        for (input, parsed) in self.reactions.iter().zip(analyzer.parsed.iter()) {
            reactions.push(reaction_from_input(input, parsed, &species)?);
        }
        Mechanism::new(self.elements.clone(), species, reactions, self.config)
    }

    fn check_elements(&self, species: &[Species]) -> Result<(), ConfigurationError> {
        if self.elements.is_empty() {
            return Ok(());
        }
        for s in species {
            if let Some(composition) = &s.composition {
                for element in composition.keys() {
                    if !self.elements.iter().any(|e| e.eq_ignore_ascii_case(element)) {
                        return Err(ConfigurationError::UnknownElement {
                            species: s.name.clone(),
                            element: element.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

fn species_from_input(input: &SpeciesInput) -> Result<Species, ConfigurationError> {
    match input.molar_mass {
        Some(molar_mass) => Ok(Species {
            name: input.name.clone(),
            molar_mass,
            composition: input.composition.clone(),
        }),
        None => Species::from_composition(&input.name, input.composition.clone()),
    }
}

fn required_rate(
    rate: Option<&Vec<f64>>,
    field: &str,
    equation: &str,
) -> Result<Arrhenius, ConfigurationError> {
    let rate = rate.ok_or_else(|| ConfigurationError::InvalidRateParameters {
        equation: equation.to_string(),
        what: format!("field {} is missing", field),
    })?;
    Arrhenius::from_vec(rate, equation)
}

/// efficiencies by species index; species outside the mechanism are skipped
fn efficiencies(
    eff: &HashMap<String, f64>,
    species: &[Species],
    equation: &str,
) -> HashMap<usize, f64> {
    let mut map = HashMap::with_capacity(eff.len());
    for (name, value) in eff {
        match species.iter().position(|s| s.name == *name) {
            Some(i) => {
                map.insert(i, *value);
            }
            None => warn!(
                "{}: efficiency of {} ignored, species is not in the mechanism",
                equation, name
            ),
        }
    }
    map
}

fn reaction_from_input(
    input: &ReactionInput,
    parsed: &ParsedEquation,
    species: &[Species],
) -> Result<Reaction, ConfigurationError> {
    let equation = input.eq.as_str();
    let mut reaction = match input.reaction_type {
        ReactionType::Elem => {
            if let ThirdBodyMarker::Pressure(_) = parsed.third_body {
                return Err(ConfigurationError::InvalidRateParameters {
                    equation: equation.to_string(),
                    what: "(+M) marker in a reaction of type elem, use type falloff".to_string(),
                });
            }
            let k = required_rate(input.Arrenius.as_ref(), "Arrenius", equation)?;
            Reaction::from_parsed(parsed, species, k)?
        }
        ReactionType::ThreeBody => {
            let k = required_rate(input.Arrenius.as_ref(), "Arrenius", equation)?;
            let reaction = Reaction::from_parsed(parsed, species, k)?;
            if parsed.third_body != ThirdBodyMarker::Collision {
                warn!("{}: three-body reaction without M in the equation", equation);
            }
            if reaction.is_third_body() {
                reaction
            } else {
                reaction.with_third_body(ThirdBody::Simple)
            }
        }
        ReactionType::Falloff => {
            let high = required_rate(
                input.high_rate.as_ref().or(input.Arrenius.as_ref()),
                "high_rate",
                equation,
            )?;
            let low = required_rate(input.low_rate.as_ref(), "low_rate", equation)?;
            let blending = match (&input.troe, &input.sri) {
                (Some(_), Some(_)) => {
                    return Err(ConfigurationError::InvalidRateParameters {
                        equation: equation.to_string(),
                        what: "both troe and sri given".to_string(),
                    });
                }
                (Some(troe), None) => FalloffBlending::Troe(Troe::from_vec(troe, equation)?),
                (None, Some(sri)) => FalloffBlending::Sri(Sri::from_vec(sri, equation)?),
                (None, None) => FalloffBlending::Lindemann(Lindemann),
            };
            if !matches!(parsed.third_body, ThirdBodyMarker::Pressure(_)) {
                warn!("{}: fall-off reaction without (+M) in the equation", equation);
            }
            Reaction::from_parsed(parsed, species, high)?.with_falloff(Falloff { low, blending })
        }
    };
    if let Some(eff) = &input.eff {
        match reaction.third_body {
            ThirdBody::Simple => {
                reaction.third_body = ThirdBody::Enhanced(efficiencies(eff, species, equation));
            }
            ThirdBody::Specific(_) => {
                warn!("{}: efficiencies ignored for a specific collision partner", equation)
            }
            _ => warn!("{}: efficiencies ignored, no third body", equation),
        }
    }
    if let Some(reversible) = input.reversible {
        reaction.reversible = reversible;
    }
    Ok(reaction)
}
