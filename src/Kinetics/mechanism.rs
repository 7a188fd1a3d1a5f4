//! # Mechanism Module
//!
//! ## Aim
//! Provides the read-only view of a loaded kinetic mechanism that the reaction extractor and the
//! rate-law report work with. The view is the `KineticsModel` trait: any kinetics solver that can
//! answer its questions (reaction type code, rate triples, efficiencies, fall-off data, species lookup,
//! stoichiometric matrix) can be reported on.
//!
//! ## Main Data Structures
//! - `KineticsModel`: trait with per-reaction accessors, indices are zero-based
//! - `Mechanism`: in-memory implementation loaded from a JSON mechanism file
//! - `ReactionEntry`: one reaction as written in the file
//! - `Arrhenius`: (A, b, Ea) triple, A in kmol-based SI units, Ea in J/kmol
//! - `ReactionType`: reaction kinds known to the file format, each with the solver's numeric code
//!
//! ## File Format
//! ```json
//! {
//!   "species": ["H2", "H", "O", "O2", "OH", "HO2", "AR"],
//!   "reactions": [
//!     {"equation": "H + O2 <=> O + OH", "rate-constant": {"A": 3.547e12, "b": -0.406, "Ea": 6.9956e7}},
//!     {"equation": "2 O + M <=> O2 + M", "type": "three-body",
//!      "rate-constant": {"A": 1.2e11, "b": -1.0, "Ea": 0.0}, "efficiencies": {"AR": 0.83, "H2": 2.4}},
//!     {"equation": "H + O2 (+M) <=> HO2 (+M)", "type": "falloff",
//!      "low-P-rate-constant": {"A": 6.366e14, "b": -1.72, "Ea": 2.2e6},
//!      "high-P-rate-constant": {"A": 4.65e9, "b": 0.44, "Ea": 0.0},
//!      "Troe": {"A": 0.5, "T3": 1.0e-30, "T1": 1.0e30}, "efficiencies": {"AR": 0.67}}
//!   ]
//! }
//! ```
//! `type` defaults to `elementary`. Values are read as they are stored inside the solver, no unit
//! conversion happens at load time.
//!
//! ## Interesting Features
//! - efficiencies keep the order in which they are written in the file, so species indices and
//!   efficiency values are always paired from one traversal
//! - loading validates every equation, every species name and the rate blocks each reaction type needs
use crate::Kinetics::equation_parser::{ParsedEquation, parse_equation};
use crate::Kinetics::kinetics_error::ReactionInfoError;
use log::{info, warn};
use nalgebra::DMatrix;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

// reaction type codes
pub const ELEMENTARY_RXN: u32 = 1;
pub const THREE_BODY_RXN: u32 = 2;
pub const FALLOFF_RXN: u32 = 4;
pub const PLOG_RXN: u32 = 5;
pub const CHEBYSHEV_RXN: u32 = 6;
pub const CHEMACT_RXN: u32 = 8;
// fall-off function codes
pub const SIMPLE_FALLOFF: u32 = 100;
pub const TROE_FALLOFF: u32 = 110;
pub const SRI_FALLOFF: u32 = 112;

/// modified Arrhenius triple k = A*T^b*exp(-Ea/(R*T))
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrhenius {
    #[serde(rename = "A")]
    pub pre_exponential_factor: f64,
    #[serde(rename = "b")]
    pub temperature_exponent: f64,
    #[serde(rename = "Ea")]
    pub activation_energy: f64,
}

impl Arrhenius {
    pub fn new(a: f64, b: f64, ea: f64) -> Self {
        Self {
            pre_exponential_factor: a,
            temperature_exponent: b,
            activation_energy: ea,
        }
    }
}

/// enum for types of reactions in the mechanism file
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum ReactionType {
    #[default]
    Elementary,
    ThreeBody,
    Falloff,
    Plog,
    Chebyshev,
    ChemicallyActivated,
}

impl ReactionType {
    /// numeric code of the reaction type
    pub fn code(&self) -> u32 {
        match self {
            ReactionType::Elementary => ELEMENTARY_RXN,
            ReactionType::ThreeBody => THREE_BODY_RXN,
            ReactionType::Falloff => FALLOFF_RXN,
            ReactionType::Plog => PLOG_RXN,
            ReactionType::Chebyshev => CHEBYSHEV_RXN,
            ReactionType::ChemicallyActivated => CHEMACT_RXN,
        }
    }
}

impl<'de> Deserialize<'de> for ReactionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "elementary" | "elem" => Ok(ReactionType::Elementary),
            "three-body" | "threebody" => Ok(ReactionType::ThreeBody),
            "falloff" => Ok(ReactionType::Falloff),
            "pressure-dependent-Arrhenius" | "plog" | "pres" => Ok(ReactionType::Plog),
            "chebyshev" => Ok(ReactionType::Chebyshev),
            "chemically-activated" => Ok(ReactionType::ChemicallyActivated),
            _ => Err(de::Error::custom(format!("Unknown reaction type: {}", s))),
        }
    }
}

/// Troe blending function parameters, T2 is optional
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TroeParameters {
    #[serde(rename = "A")]
    pub alpha: f64,
    #[serde(rename = "T3")]
    pub t3: f64,
    #[serde(rename = "T1")]
    pub t1: f64,
    #[serde(rename = "T2", default)]
    pub t2: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SriParameters {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D", default = "default_sri_d")]
    pub d: f64,
    #[serde(rename = "E", default)]
    pub e: f64,
}

fn default_sri_d() -> f64 {
    1.0
}

/// one pressure point of a PLOG reaction, pressure in Pa
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlogPoint {
    #[serde(rename = "P")]
    pub pressure: f64,
    #[serde(flatten)]
    pub rate: Arrhenius,
}

/// struct for reaction data as written in the mechanism file
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionEntry {
    pub equation: String,
    #[serde(rename = "type", default)]
    pub reaction_type: ReactionType,
    #[serde(rename = "rate-constant")]
    pub rate_constant: Option<Arrhenius>,
    #[serde(rename = "low-P-rate-constant")]
    pub low_p_rate_constant: Option<Arrhenius>,
    #[serde(rename = "high-P-rate-constant")]
    pub high_p_rate_constant: Option<Arrhenius>,
    #[serde(rename = "Troe")]
    pub troe: Option<TroeParameters>,
    #[serde(rename = "SRI")]
    pub sri: Option<SriParameters>,
    #[serde(default, deserialize_with = "deserialize_ordered_efficiencies")]
    pub efficiencies: Vec<(String, f64)>,
    #[serde(rename = "rate-constants", default)]
    pub rate_constants: Vec<PlogPoint>,
}

/// efficiency maps are read entry by entry so that the file order survives
fn deserialize_ordered_efficiencies<'de, D>(
    deserializer: D,
) -> Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedEfficienciesVisitor;

    impl<'de> Visitor<'de> for OrderedEfficienciesVisitor {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map with species names as keys and f64 efficiencies as values")
        }

        fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((species, efficiency)) = access.next_entry::<String, f64>()? {
                pairs.push((species, efficiency));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(OrderedEfficienciesVisitor)
}

#[derive(Debug, Deserialize)]
struct MechanismFile {
    species: Vec<String>,
    reactions: Vec<ReactionEntry>,
}

/// read-only view of a loaded kinetic mechanism. Reaction indices are zero-based and must be
/// smaller than `n_reactions()`, out-of-range indices are the caller's bug
pub trait KineticsModel {
    fn n_species(&self) -> usize;
    fn n_reactions(&self) -> usize;
    /// numeric reaction type code (see the `*_RXN` constants)
    fn reaction_type(&self, i: usize) -> u32;
    fn is_reversible(&self, i: usize) -> bool;
    fn equation(&self, i: usize) -> &str;
    /// forward rate of elementary and three-body reactions
    fn rate(&self, i: usize) -> Option<Arrhenius>;
    fn high_rate(&self, i: usize) -> Option<Arrhenius>;
    fn low_rate(&self, i: usize) -> Option<Arrhenius>;
    /// (species name, efficiency) pairs in definition order
    fn efficiencies(&self, i: usize) -> &[(String, f64)];
    /// fall-off function code (see the `*_FALLOFF` constants)
    fn falloff_type(&self, i: usize) -> Option<u32>;
    /// shape parameters of the fall-off function; for Troe always [alpha, T3, T1, T2] with T2 = 0 when absent
    fn falloff_parameters(&self, i: usize) -> Vec<f64>;
    /// (pressure in Pa, rate) points of a PLOG reaction in definition order
    fn plog_rates(&self, i: usize) -> Vec<(f64, Arrhenius)>;
    fn species_index(&self, name: &str) -> Option<usize>;
    /// reactant stoichiometric coefficients, species x reactions
    fn reactant_stoich_coeffs(&self) -> DMatrix<f64>;
}

/// in-memory kinetic mechanism
#[derive(Debug, Clone)]
pub struct Mechanism {
    pub species: Vec<String>,
    pub reactions: Vec<ReactionEntry>,
    species_map: HashMap<String, usize>,
    parsed_equations: Vec<ParsedEquation>,
    reactant_stoich: DMatrix<f64>,
    product_stoich: DMatrix<f64>,
}

impl Mechanism {
    /// builds the mechanism and validates equations, species names and rate blocks
    pub fn new(
        species: Vec<String>,
        mut reactions: Vec<ReactionEntry>,
    ) -> Result<Self, ReactionInfoError> {
        let mut species_map: HashMap<String, usize> = HashMap::with_capacity(species.len());
        for (k, name) in species.iter().enumerate() {
            if species_map.contains_key(name) {
                warn!("species {} is declared more than once, first declaration wins", name);
                continue;
            }
            species_map.insert(name.clone(), k);
        }
        let n_species = species.len();
        let n_reactions = reactions.len();
        let mut reactant_stoich = DMatrix::<f64>::zeros(n_species, n_reactions);
        let mut product_stoich = DMatrix::<f64>::zeros(n_species, n_reactions);
        let mut parsed_equations = Vec::with_capacity(n_reactions);

        for (i, reaction) in reactions.iter_mut().enumerate() {
            let mut parsed = parse_equation(&reaction.equation).ok_or_else(|| {
                ReactionInfoError::InvalidEquation {
                    index: i,
                    equation: reaction.equation.clone(),
                }
            })?;
            Self::resolve_collider(i, reaction, &mut parsed)?;
            let lookup = |name: &str| {
                species_map
                    .get(name)
                    .copied()
                    .ok_or_else(|| ReactionInfoError::UnknownSpecies {
                        index: i,
                        species: name.to_string(),
                    })
            };
            for (name, coefficient) in parsed.reactants.iter() {
                reactant_stoich[(lookup(name)?, i)] += coefficient;
            }
            for (name, coefficient) in parsed.products.iter() {
                product_stoich[(lookup(name)?, i)] += coefficient;
            }
            for (name, _) in reaction.efficiencies.iter() {
                lookup(name)?;
            }
            Self::validate_rate_blocks(i, reaction)?;
            parsed_equations.push(parsed);
        }

        Ok(Self {
            species,
            reactions,
            species_map,
            parsed_equations,
            reactant_stoich,
            product_stoich,
        })
    }

    /// a named collider, "(+AR)" or AR on both sides of a three-body reaction, is not a reactant;
    /// without an efficiency map it becomes the only third body with efficiency 1.0
    fn resolve_collider(
        i: usize,
        reaction: &mut ReactionEntry,
        parsed: &mut ParsedEquation,
    ) -> Result<(), ReactionInfoError> {
        let collider = match reaction.reaction_type {
            ReactionType::ThreeBody if parsed.collider.is_none() => {
                let shared = parsed.shared_species();
                if shared.len() != 1 {
                    return Err(ReactionInfoError::InvalidEquation {
                        index: i,
                        equation: reaction.equation.clone(),
                    });
                }
                parsed.remove_collider(&shared[0]);
                shared.into_iter().next()
            }
            ReactionType::ThreeBody | ReactionType::Falloff | ReactionType::ChemicallyActivated => {
                parsed.collider.clone()
            }
            _ => None,
        };
        if let Some(name) = collider {
            if name != "M" && reaction.efficiencies.is_empty() {
                reaction.efficiencies = vec![(name, 1.0)];
            }
        }
        Ok(())
    }

    fn validate_rate_blocks(i: usize, reaction: &ReactionEntry) -> Result<(), ReactionInfoError> {
        let missing = |what: &'static str| ReactionInfoError::MissingRateData { index: i, what };
        match reaction.reaction_type {
            ReactionType::Elementary | ReactionType::ThreeBody => {
                reaction.rate_constant.ok_or(missing("rate-constant"))?;
            }
            ReactionType::Falloff | ReactionType::ChemicallyActivated => {
                reaction
                    .low_p_rate_constant
                    .ok_or(missing("low-P-rate-constant"))?;
                reaction
                    .high_p_rate_constant
                    .ok_or(missing("high-P-rate-constant"))?;
            }
            ReactionType::Plog => {
                if reaction.rate_constants.is_empty() {
                    return Err(missing("rate-constants"));
                }
            }
            ReactionType::Chebyshev => {}
        }
        Ok(())
    }

    pub fn from_json_str(text: &str) -> Result<Self, ReactionInfoError> {
        let file: MechanismFile = serde_json::from_str(text)?;
        Self::new(file.species, file.reactions)
    }

    /// note: a `serde_json::Value` object does not keep key order, efficiencies come out sorted by species name
    pub fn from_value(value: Value) -> Result<Self, ReactionInfoError> {
        let file: MechanismFile = serde_json::from_value(value)?;
        Self::new(file.species, file.reactions)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReactionInfoError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mechanism = Self::from_json_str(&text)?;
        info!(
            "loaded mechanism {}: {} species, {} reactions",
            path.display(),
            mechanism.species.len(),
            mechanism.reactions.len()
        );
        Ok(mechanism)
    }

    /// product stoichiometric coefficients, species x reactions
    pub fn product_stoich_coeffs(&self) -> DMatrix<f64> {
        self.product_stoich.clone()
    }

    pub fn parsed_equation(&self, i: usize) -> &ParsedEquation {
        &self.parsed_equations[i]
    }
}

impl KineticsModel for Mechanism {
    fn n_species(&self) -> usize {
        self.species.len()
    }

    fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    fn reaction_type(&self, i: usize) -> u32 {
        self.reactions[i].reaction_type.code()
    }

    fn is_reversible(&self, i: usize) -> bool {
        self.parsed_equations[i].reversible
    }

    fn equation(&self, i: usize) -> &str {
        &self.reactions[i].equation
    }

    fn rate(&self, i: usize) -> Option<Arrhenius> {
        self.reactions[i].rate_constant
    }

    fn high_rate(&self, i: usize) -> Option<Arrhenius> {
        self.reactions[i].high_p_rate_constant
    }

    fn low_rate(&self, i: usize) -> Option<Arrhenius> {
        self.reactions[i].low_p_rate_constant
    }

    fn efficiencies(&self, i: usize) -> &[(String, f64)] {
        &self.reactions[i].efficiencies
    }

    fn falloff_type(&self, i: usize) -> Option<u32> {
        let reaction = &self.reactions[i];
        match reaction.reaction_type {
            ReactionType::Falloff | ReactionType::ChemicallyActivated => {
                if reaction.troe.is_some() {
                    Some(TROE_FALLOFF)
                } else if reaction.sri.is_some() {
                    Some(SRI_FALLOFF)
                } else {
                    Some(SIMPLE_FALLOFF)
                }
            }
            _ => None,
        }
    }

    fn falloff_parameters(&self, i: usize) -> Vec<f64> {
        let reaction = &self.reactions[i];
        if let Some(troe) = reaction.troe {
            vec![troe.alpha, troe.t3, troe.t1, troe.t2.unwrap_or(0.0)]
        } else if let Some(sri) = reaction.sri {
            vec![sri.a, sri.b, sri.c, sri.d, sri.e]
        } else {
            Vec::new()
        }
    }

    fn plog_rates(&self, i: usize) -> Vec<(f64, Arrhenius)> {
        self.reactions[i]
            .rate_constants
            .iter()
            .map(|point| (point.pressure, point.rate))
            .collect()
    }

    fn species_index(&self, name: &str) -> Option<usize> {
        self.species_map.get(name).copied()
    }

    fn reactant_stoich_coeffs(&self) -> DMatrix<f64> {
        self.reactant_stoich.clone()
    }
}
