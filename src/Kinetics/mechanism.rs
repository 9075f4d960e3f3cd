//! # Reaction mechanism
//!
//! Immutable data model shared by the rate coefficient engine, the production rate engine and the
//! Jacobian builder: elements, species, reactions with their stoichiometry and rate parameters.
//!
//! A reaction carries
//! - educt and product coefficient magnitudes (kept apart, so a species present on both sides,
//!   e.g. a catalyst, is represented exactly); the signed coefficient is `nu = product - educt`
//! - the Arrhenius triple (the high pressure limit for fall-off reactions)
//! - a [`FalloffKind`]: plain Arrhenius or fall-off with Lindemann/TROE/SRI blending
//! - a [`ThirdBody`] specification, orthogonal to the fall-off kind
//! - the reversibility flag: backward rates come from the equilibrium constant
use crate::Kinetics::arrhenius::{Arrhenius, Falloff, FalloffKind};
use crate::Kinetics::kinetics_errors::ConfigurationError;
use crate::Kinetics::molmass::{molar_mass_of_composition, parse_formula};
use crate::Kinetics::stoichiometry_analyzer::{ParsedEquation, ThirdBodyMarker, parse_equation};
use crate::Kinetics::units::KineticsConfig;
use log::info;
use nalgebra::{DMatrix, DVector};
use prettytable::{Cell, Row, Table};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub name: String,
    /// g/mol
    pub molar_mass: f64,
    pub composition: Option<HashMap<String, f64>>,
}

impl Species {
    pub fn new(name: &str, molar_mass: f64) -> Self {
        Self {
            name: name.to_string(),
            molar_mass,
            composition: None,
        }
    }
    /// molar mass from the composition, or from the name read as a chemical formula
    pub fn from_composition(
        name: &str,
        composition: Option<HashMap<String, f64>>,
    ) -> Result<Self, ConfigurationError> {
        let composition = match composition {
            Some(c) => c,
            None => parse_formula(name)?,
        };
        let molar_mass = molar_mass_of_composition(name, &composition)?;
        Ok(Self {
            name: name.to_string(),
            molar_mass,
            composition: Some(composition),
        })
    }
}

/// collision partner of a reaction
#[derive(Debug, Clone, PartialEq)]
pub enum ThirdBody {
    None,
    /// every species counts with efficiency 1
    Simple,
    /// efficiencies by species index, absent species count with 1
    Enhanced(HashMap<usize, f64>),
    /// a single species is the collision partner, "(+AR)"
    Specific(usize),
}

impl ThirdBody {
    pub fn is_third_body(&self) -> bool {
        !matches!(self, ThirdBody::None)
    }
    /// collision efficiency of a species
    pub fn efficiency(&self, species: usize) -> f64 {
        match self {
            ThirdBody::None => 0.0,
            ThirdBody::Simple => 1.0,
            ThirdBody::Enhanced(eff) => eff.get(&species).copied().unwrap_or(1.0),
            ThirdBody::Specific(s) => {
                if *s == species {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    /// for display only
    pub equation: String,
    /// (species index, |nu|) of educts
    pub reactants: Vec<(usize, f64)>,
    /// (species index, |nu|) of products
    pub products: Vec<(usize, f64)>,
    /// union of educts and products, educts first
    pub species_in_reaction: Vec<usize>,
    /// rate constant (high pressure limit for fall-off reactions)
    pub arrhenius: Arrhenius,
    pub falloff: FalloffKind,
    pub third_body: ThirdBody,
    /// backward rate from the equilibrium constant
    pub reversible: bool,
}

impl Reaction {
    /// elementary reaction from its equation; reversibility and "+M" collision partners are read
    /// from the equation
    pub fn from_equation(
        equation: &str,
        species: &[Species],
        arrhenius: Arrhenius,
    ) -> Result<Self, ConfigurationError> {
        let parsed = parse_equation(equation)?;
        Self::from_parsed(&parsed, species, arrhenius)
    }

    pub fn from_parsed(
        parsed: &ParsedEquation,
        species: &[Species],
        arrhenius: Arrhenius,
    ) -> Result<Self, ConfigurationError> {
        let lookup = |name: &str| -> Result<usize, ConfigurationError> {
            species
                .iter()
                .position(|s| s.name == name)
                .ok_or_else(|| ConfigurationError::UnknownSpecies {
                    equation: parsed.equation.clone(),
                    species: name.to_string(),
                })
        };
        let mut reactants = Vec::with_capacity(parsed.reactants.len());
        for (name, coeff) in parsed.reactants.iter() {
            reactants.push((lookup(name)?, *coeff));
        }
        let mut products = Vec::with_capacity(parsed.products.len());
        for (name, coeff) in parsed.products.iter() {
            products.push((lookup(name)?, *coeff));
        }
        let third_body = match &parsed.third_body {
            ThirdBodyMarker::None => ThirdBody::None,
            ThirdBodyMarker::Collision | ThirdBodyMarker::Pressure(None) => ThirdBody::Simple,
            ThirdBodyMarker::Pressure(Some(name)) => ThirdBody::Specific(lookup(name)?),
        };
        let mut species_in_reaction: Vec<usize> = Vec::new();
        for (s, _) in reactants.iter().chain(products.iter()) {
            if !species_in_reaction.contains(s) {
                species_in_reaction.push(*s);
            }
        }
        Ok(Self {
            equation: parsed.equation.clone(),
            reactants,
            products,
            species_in_reaction,
            arrhenius,
            falloff: FalloffKind::SimpleArrhenius,
            third_body,
            reversible: parsed.reversible,
        })
    }
    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = FalloffKind::Falloff(falloff);
        if !self.third_body.is_third_body() {
            self.third_body = ThirdBody::Simple;
        }
        self
    }
    pub fn with_third_body(mut self, third_body: ThirdBody) -> Self {
        self.third_body = third_body;
        self
    }
    pub fn irreversible(mut self) -> Self {
        self.reversible = false;
        self
    }

    pub fn is_third_body(&self) -> bool {
        self.third_body.is_third_body()
    }
    pub fn is_falloff(&self) -> bool {
        matches!(self.falloff, FalloffKind::Falloff(_))
    }
    /// [M] multiplies the rate of progress only for pure third-body reactions, fall-off
    /// reactions carry [M] inside the reduced pressure
    pub fn rate_multiplied_by_M(&self) -> bool {
        self.is_third_body() && !self.is_falloff()
    }
    pub fn contains(&self, species: usize) -> bool {
        self.species_in_reaction.contains(&species)
    }
    pub fn educt_coefficient(&self, species: usize) -> Option<f64> {
        self.reactants
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, nu)| *nu)
    }
    pub fn product_coefficient(&self, species: usize) -> Option<f64> {
        self.products
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, nu)| *nu)
    }
    /// signed stoichiometric coefficient, products positive
    pub fn nu(&self, species: usize) -> f64 {
        self.product_coefficient(species).unwrap_or(0.0)
            - self.educt_coefficient(species).unwrap_or(0.0)
    }
    /// Σnu = moles of products - moles of educts
    pub fn mole_change(&self) -> f64 {
        self.products.iter().map(|(_, nu)| nu).sum::<f64>()
            - self.reactants.iter().map(|(_, nu)| nu).sum::<f64>()
    }
    fn kind_name(&self) -> &'static str {
        use crate::Kinetics::arrhenius::FalloffBlending;
        match (&self.falloff, self.is_third_body()) {
            (FalloffKind::SimpleArrhenius, false) => "elementary",
            (FalloffKind::SimpleArrhenius, true) => "three-body",
            (FalloffKind::Falloff(f), _) => match f.blending {
                FalloffBlending::Lindemann(_) => "falloff Lindemann",
                FalloffBlending::Troe(_) => "falloff TROE",
                FalloffBlending::Sri(_) => "falloff SRI",
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mechanism {
    pub elements: Vec<String>,
    pub species: Vec<Species>,
    pub reactions: Vec<Reaction>,
    pub config: KineticsConfig,
    species_index: HashMap<String, usize>,
    /// for every species the indices of the reactions it takes part in
    reactions_of_species: Vec<Vec<usize>>,
}

impl Mechanism {
    /// validates the reactions against the species list and builds the lookup indices
    pub fn new(
        elements: Vec<String>,
        species: Vec<Species>,
        reactions: Vec<Reaction>,
        config: KineticsConfig,
    ) -> Result<Self, ConfigurationError> {
        if reactions.is_empty() {
            return Err(ConfigurationError::EmptyMechanism);
        }
        let mut species_index = HashMap::with_capacity(species.len());
        for (i, s) in species.iter().enumerate() {
            if species_index.insert(s.name.clone(), i).is_some() {
                return Err(ConfigurationError::DuplicateSpecies(s.name.clone()));
            }
        }
        let n = species.len();
        let mut reactions_of_species = vec![Vec::new(); n];
        for (r, reaction) in reactions.iter().enumerate() {
            let referenced = reaction
                .species_in_reaction
                .iter()
                .copied()
                .chain(match &reaction.third_body {
                    ThirdBody::Enhanced(eff) => eff.keys().copied().collect::<Vec<_>>(),
                    ThirdBody::Specific(s) => vec![*s],
                    _ => Vec::new(),
                });
            for s in referenced {
                if s >= n {
                    return Err(ConfigurationError::UnknownSpecies {
                        equation: reaction.equation.clone(),
                        species: format!("#{}", s),
                    });
                }
            }
            for s in reaction.species_in_reaction.iter() {
                reactions_of_species[*s].push(r);
            }
        }
        info!(
            "mechanism with {} species and {} reactions",
            n,
            reactions.len()
        );
        Ok(Self {
            elements,
            species,
            reactions,
            config,
            species_index,
            reactions_of_species,
        })
    }
    pub fn n_species(&self) -> usize {
        self.species.len()
    }
    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }
    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.species_index.get(name).copied()
    }
    pub fn species_name(&self, species: usize) -> &str {
        self.species
            .get(species)
            .map(|s| s.name.as_str())
            .unwrap_or("?")
    }
    /// indices of the reactions a species takes part in
    pub fn reactions_of_species(&self, species: usize) -> &[usize] {
        self.reactions_of_species
            .get(species)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
    pub fn check_species(&self, species: usize) -> Result<(), ConfigurationError> {
        if species >= self.n_species() {
            return Err(ConfigurationError::SpeciesIndexOutOfRange {
                index: species,
                n_species: self.n_species(),
            });
        }
        Ok(())
    }
    /// every species needs an entry, zero included
    pub fn check_concentrations(&self, C: &[f64]) -> Result<(), ConfigurationError> {
        if C.len() != self.n_species() {
            return Err(ConfigurationError::ConcentrationLength {
                expected: self.n_species(),
                found: C.len(),
            });
        }
        Ok(())
    }
    /// concentration vector in mechanism order from a map {species: concentration}
    pub fn concentrations_from_map(
        &self,
        map: &HashMap<String, f64>,
    ) -> Result<DVector<f64>, ConfigurationError> {
        let mut C = DVector::zeros(self.n_species());
        for (i, s) in self.species.iter().enumerate() {
            C[i] = *map
                .get(&s.name)
                .ok_or_else(|| ConfigurationError::MissingConcentration {
                    species: s.name.clone(),
                })?;
        }
        Ok(C)
    }
    /// reactions × species matrix of signed coefficients
    pub fn stoichiometric_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.n_reactions(), self.n_species(), |r, s| {
            self.reactions[r].nu(s)
        })
    }

    pub fn reactions_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("#"),
            Cell::new("equation"),
            Cell::new("kind"),
            Cell::new("A"),
            Cell::new("n"),
            Cell::new("E"),
            Cell::new("reversible"),
        ]));
        for (r, reaction) in self.reactions.iter().enumerate() {
            table.add_row(Row::new(vec![
                Cell::new(&r.to_string()),
                Cell::new(&reaction.equation),
                Cell::new(reaction.kind_name()),
                Cell::new(&format!("{:.4e}", reaction.arrhenius.A)),
                Cell::new(&format!("{}", reaction.arrhenius.n)),
                Cell::new(&format!("{}", reaction.arrhenius.E)),
                Cell::new(&reaction.reversible.to_string()),
            ]));
        }
        table
    }
    pub fn pretty_print(&self) {
        self.reactions_table().printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::arrhenius::{FalloffBlending, Lindemann};

    fn species(names: &[&str]) -> Vec<Species> {
        names.iter().map(|n| Species::new(n, 1.0)).collect()
    }

    #[test]
    fn test_reaction_from_equation() {
        let sp = species(&["H", "O2", "OH", "O"]);
        let r = Reaction::from_equation("H + O2 <=> OH + O", &sp, Arrhenius::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(r.reactants, vec![(0, 1.0), (1, 1.0)]);
        assert_eq!(r.products, vec![(2, 1.0), (3, 1.0)]);
        assert_eq!(r.species_in_reaction, vec![0, 1, 2, 3]);
        assert!(r.reversible);
        assert_eq!(r.nu(0), -1.0);
        assert_eq!(r.nu(2), 1.0);
        assert_eq!(r.mole_change(), 0.0);
        assert!(!r.is_third_body());
    }

    #[test]
    fn test_catalytic_species() {
        let sp = species(&["A", "B", "C"]);
        let r = Reaction::from_equation("A + C => B + 2C", &sp, Arrhenius::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(r.educt_coefficient(2), Some(1.0));
        assert_eq!(r.product_coefficient(2), Some(2.0));
        assert_eq!(r.nu(2), 1.0);
        assert_eq!(r.species_in_reaction, vec![0, 2, 1]);
        assert_eq!(r.mole_change(), 1.0);
    }

    #[test]
    fn test_unknown_species_rejected() {
        let sp = species(&["H", "O2"]);
        let err = Reaction::from_equation("H + O2 <=> HO2", &sp, Arrhenius::new(1.0, 0.0, 0.0))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownSpecies {
                equation: "H + O2 <=> HO2".to_string(),
                species: "HO2".to_string()
            }
        );
    }

    #[test]
    fn test_third_body_kinds() {
        let sp = species(&["H", "O2", "HO2", "AR"]);
        let r = Reaction::from_equation("H + O2 + M => HO2 + M", &sp, Arrhenius::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(r.third_body, ThirdBody::Simple);
        assert!(r.rate_multiplied_by_M());
        let r = Reaction::from_equation("H + O2 (+AR) <=> HO2 (+AR)", &sp, Arrhenius::new(1.0, 0.0, 0.0))
            .unwrap()
            .with_falloff(Falloff {
                low: Arrhenius::new(1.0, 0.0, 0.0),
                blending: FalloffBlending::Lindemann(Lindemann),
            });
        assert_eq!(r.third_body, ThirdBody::Specific(3));
        assert!(r.is_falloff());
        assert!(!r.rate_multiplied_by_M());
        let enhanced = ThirdBody::Enhanced(HashMap::from([(1, 2.5)]));
        assert_eq!(enhanced.efficiency(1), 2.5);
        assert_eq!(enhanced.efficiency(0), 1.0);
        assert_eq!(ThirdBody::Specific(3).efficiency(0), 0.0);
    }

    #[test]
    fn test_mechanism_indices() {
        let sp = species(&["A", "B", "C", "D"]);
        let r0 = Reaction::from_equation("A + B => C", &sp, Arrhenius::new(1.0, 0.0, 0.0)).unwrap();
        let r1 = Reaction::from_equation("C <=> 2A", &sp, Arrhenius::new(1.0, 0.0, 0.0)).unwrap();
        let mech = Mechanism::new(vec![], sp, vec![r0, r1], KineticsConfig::default()).unwrap();
        assert_eq!(mech.reactions_of_species(0), &[0, 1]);
        assert_eq!(mech.reactions_of_species(1), &[0]);
        assert!(mech.reactions_of_species(3).is_empty());
        assert_eq!(mech.species_index("C"), Some(2));
        let S = mech.stoichiometric_matrix();
        assert_eq!(S[(1, 0)], 2.0);
        assert_eq!(S[(0, 2)], 1.0);
        assert!(mech.check_concentrations(&[1.0, 2.0]).is_err());
        let map = HashMap::from([
            ("A".to_string(), 1.0),
            ("B".to_string(), 2.0),
            ("C".to_string(), 3.0),
        ]);
        assert_eq!(
            mech.concentrations_from_map(&map).unwrap_err(),
            ConfigurationError::MissingConcentration {
                species: "D".to_string()
            }
        );
        assert_eq!(mech.reactions_table().len(), 3);
    }

    #[test]
    fn test_mechanism_validation() {
        let sp = species(&["A", "A"]);
        let r = Reaction::from_equation("A => A", &sp, Arrhenius::new(1.0, 0.0, 0.0)).unwrap();
        assert!(matches!(
            Mechanism::new(vec![], sp.clone(), vec![r], KineticsConfig::default()),
            Err(ConfigurationError::DuplicateSpecies(_))
        ));
        assert_eq!(
            Mechanism::new(vec![], sp, vec![], KineticsConfig::default()).unwrap_err(),
            ConfigurationError::EmptyMechanism
        );
    }

    #[test]
    fn test_species_molar_mass() {
        let s = Species::from_composition("CH4", None).unwrap();
        assert!((s.molar_mass - 16.04246).abs() < 1e-3);
        assert!(Species::from_composition("c-C5H8", None).is_err());
    }
}
