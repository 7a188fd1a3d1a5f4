//! # Reaction Info Module
//!
//! ## Aim
//! Extracts the kinetic parameters of one reaction (rate coefficients, third-body efficiencies,
//! fall-off parameters) from a `KineticsModel` and stores them in a normalized `ReactionRecord`.
//!
//! ## Main Data Structures
//! - `ReactionRecord`: parameters of one reaction, the reaction kind is classified once here and
//!   reused by everything downstream
//! - `ReactionKind`: Simple | ThirdBody | Falloff (Lindemann, Troe6, Troe7) | Plog
//! - `RateTriple`: (A, B, E) with E already divided by the gas constant, so k = A*T**B*exp(-E/T)
//! - `Extractor`: carries the gas constant used for the activation energy normalization
//!
//! ## Units
//! A is taken as stored in the model (kmol based!), only E is converted: E[K] = Ea[J/kmol] / 8314.4621.
//!
//! ## Legacy view
//! Reports written in the Fortran rate-law style talk about `RA, RB, RE, ITHB, NKTB, AIK, Fall` and a
//! set of boolean flags. `ReactionRecord` offers these as accessors computed from the enum, so a record
//! can never hold contradicting flags.
use crate::Kinetics::kinetics_error::ReactionInfoError;
use crate::Kinetics::mechanism::{
    Arrhenius, ELEMENTARY_RXN, FALLOFF_RXN, KineticsModel, PLOG_RXN, SIMPLE_FALLOFF,
    THREE_BODY_RXN, TROE_FALLOFF,
};
use log::{debug, warn};

/// universal gas constant, J/(kmol*K)
pub const GAS_CONSTANT: f64 = 8314.4621;

/// Arrhenius triple with E in kelvin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateTriple {
    pub a: f64,
    pub b: f64,
    pub e: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlogRate {
    /// Pa
    pub pressure: f64,
    pub rate: RateTriple,
}

/// blending function of a fall-off reaction
#[derive(Debug, Clone, PartialEq)]
pub enum FalloffForm {
    Lindemann,
    Troe6 { alpha: f64, t3: f64, t1: f64 },
    Troe7 { alpha: f64, t3: f64, t1: f64, t2: f64 },
    /// recognised as fall-off but without a rate-law listing (e.g. SRI)
    Other { code: u32, parameters: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReactionKind {
    Simple,
    ThirdBody {
        efficiencies: Vec<(usize, f64)>,
    },
    Falloff {
        efficiencies: Vec<(usize, f64)>,
        low: RateTriple,
        form: FalloffForm,
    },
    Plog {
        rates: Vec<PlogRate>,
    },
}

impl ReactionKind {
    /// short name used in summaries
    pub fn label(&self) -> String {
        match self {
            ReactionKind::Simple => "simple".to_string(),
            ReactionKind::ThirdBody { .. } => "third-body".to_string(),
            ReactionKind::Falloff { form, .. } => match form {
                FalloffForm::Lindemann => "fall-off Lindemann".to_string(),
                FalloffForm::Troe6 { .. } => "fall-off Troe 6".to_string(),
                FalloffForm::Troe7 { .. } => "fall-off Troe 7".to_string(),
                FalloffForm::Other { code, .. } => format!("fall-off ({})", code),
            },
            ReactionKind::Plog { rates } => format!("PLOG ({} pressures)", rates.len()),
        }
    }
}

/// the boolean flags of the Fortran-style listing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReactionFlags {
    pub is_reversible: bool,
    pub is_thirdbody: bool,
    pub is_falloff: bool,
    pub is_chemical: bool,
    pub is_plog: bool,
    pub is_simple: bool,
    pub is_lindemann: bool,
    pub is_troe: bool,
    pub is_troe6: bool,
    pub is_troe7: bool,
}

/// kinetic parameters of one reaction
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionRecord {
    /// zero-based reaction index in the model
    pub index: usize,
    pub equation: String,
    /// raw type code reported by the model
    pub type_code: u32,
    pub reversible: bool,
    /// forward rate, the high-pressure limit for fall-off reactions, zeros for PLOG
    pub rate: RateTriple,
    pub kind: ReactionKind,
}

impl ReactionRecord {
    /// (species index, efficiency) pairs of enhanced third bodies
    pub fn third_body(&self) -> Option<&[(usize, f64)]> {
        match &self.kind {
            ReactionKind::ThirdBody { efficiencies }
            | ReactionKind::Falloff { efficiencies, .. } => Some(efficiencies.as_slice()),
            _ => None,
        }
    }
    /// number of enhanced third-body species, -1 when the reaction has no third body
    pub fn ithb(&self) -> i64 {
        self.third_body().map_or(-1, |tb| tb.len() as i64)
    }
    /// indices of enhanced third-body species
    pub fn nktb(&self) -> Vec<usize> {
        self.third_body()
            .map(|tb| tb.iter().map(|(k, _)| *k).collect())
            .unwrap_or_default()
    }
    /// efficiencies of enhanced third-body species, same order as `nktb`
    pub fn aik(&self) -> Vec<f64> {
        self.third_body()
            .map(|tb| tb.iter().map(|(_, eff)| *eff).collect())
            .unwrap_or_default()
    }
    /// low-pressure ABE followed by alpha, T3, T1 (and T2 for 7-parameter Troe)
    pub fn fall(&self) -> Vec<f64> {
        match &self.kind {
            ReactionKind::Falloff { low, form, .. } => {
                let mut fall = vec![low.a, low.b, low.e];
                match form {
                    FalloffForm::Troe6 { alpha, t3, t1 } => fall.extend([*alpha, *t3, *t1]),
                    FalloffForm::Troe7 { alpha, t3, t1, t2 } => {
                        fall.extend([*alpha, *t3, *t1, *t2])
                    }
                    FalloffForm::Lindemann | FalloffForm::Other { .. } => {}
                }
                fall
            }
            _ => Vec::new(),
        }
    }

    pub fn flags(&self) -> ReactionFlags {
        let mut flags = ReactionFlags {
            is_reversible: self.reversible,
            ..ReactionFlags::default()
        };
        match &self.kind {
            ReactionKind::Simple => flags.is_simple = true,
            ReactionKind::ThirdBody { .. } => flags.is_thirdbody = true,
            ReactionKind::Plog { .. } => flags.is_plog = true,
            ReactionKind::Falloff { form, .. } => {
                flags.is_falloff = true;
                match form {
                    FalloffForm::Lindemann => flags.is_lindemann = true,
                    FalloffForm::Troe6 { .. } => {
                        flags.is_troe = true;
                        flags.is_troe6 = true;
                    }
                    FalloffForm::Troe7 { .. } => {
                        flags.is_troe = true;
                        flags.is_troe7 = true;
                    }
                    FalloffForm::Other { .. } => {}
                }
            }
        }
        flags
    }
}

/// reads reactions out of a kinetics model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extractor {
    /// divisor for activation energies, J/(kmol*K)
    pub gas_constant: f64,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            gas_constant: GAS_CONSTANT,
        }
    }
}

impl Extractor {
    pub fn new(gas_constant: f64) -> Self {
        Self { gas_constant }
    }

    fn normalize(&self, rate: Arrhenius) -> RateTriple {
        RateTriple {
            a: rate.pre_exponential_factor,
            b: rate.temperature_exponent,
            e: rate.activation_energy / self.gas_constant,
        }
    }

    /// extract reaction `i` of the model. Fails for reaction types other than elementary, three-body,
    /// fall-off and PLOG
    pub fn extract<M: KineticsModel + ?Sized>(
        &self,
        model: &M,
        i: usize,
    ) -> Result<ReactionRecord, ReactionInfoError> {
        let type_code = model.reaction_type(i);
        let missing = |what: &'static str| ReactionInfoError::MissingRateData { index: i, what };
        let (rate, kind) = match type_code {
            ELEMENTARY_RXN => {
                let rate = model.rate(i).ok_or_else(|| missing("rate-constant"))?;
                (self.normalize(rate), ReactionKind::Simple)
            }
            // simple third-body, not fall-off
            THREE_BODY_RXN => {
                let rate = model.rate(i).ok_or_else(|| missing("rate-constant"))?;
                let efficiencies = Self::third_body_data(model, i)?;
                (self.normalize(rate), ReactionKind::ThirdBody { efficiencies })
            }
            FALLOFF_RXN => {
                let high = model
                    .high_rate(i)
                    .ok_or_else(|| missing("high-P-rate-constant"))?;
                let low = model
                    .low_rate(i)
                    .ok_or_else(|| missing("low-P-rate-constant"))?;
                let efficiencies = Self::third_body_data(model, i)?;
                let form = Self::falloff_form(model, i)?;
                (
                    self.normalize(high),
                    ReactionKind::Falloff {
                        efficiencies,
                        low: self.normalize(low),
                        form,
                    },
                )
            }
            PLOG_RXN => {
                let rates: Vec<PlogRate> = model
                    .plog_rates(i)
                    .into_iter()
                    .map(|(pressure, rate)| PlogRate {
                        pressure,
                        rate: self.normalize(rate),
                    })
                    .collect();
                if rates.is_empty() {
                    return Err(missing("rate-constants"));
                }
                (RateTriple::default(), ReactionKind::Plog { rates })
            }
            code => {
                return Err(ReactionInfoError::UnsupportedReactionType { index: i, code });
            }
        };
        let record = ReactionRecord {
            index: i,
            equation: model.equation(i).to_string(),
            type_code,
            reversible: model.is_reversible(i),
            rate,
            kind,
        };
        debug!("extracted reaction {}: {:?}", i, record);
        Ok(record)
    }

    /// extract every reaction of the model in index order, stops at the first failure
    pub fn extract_all<M: KineticsModel + ?Sized>(
        &self,
        model: &M,
    ) -> Result<Vec<ReactionRecord>, ReactionInfoError> {
        (0..model.n_reactions())
            .map(|i| self.extract(model, i))
            .collect()
    }

    /// species names are resolved while walking the efficiency pairs, so index and value stay together
    fn third_body_data<M: KineticsModel + ?Sized>(
        model: &M,
        i: usize,
    ) -> Result<Vec<(usize, f64)>, ReactionInfoError> {
        model
            .efficiencies(i)
            .iter()
            .map(|(species, efficiency)| {
                model
                    .species_index(species)
                    .map(|k| (k, *efficiency))
                    .ok_or_else(|| ReactionInfoError::UnknownSpecies {
                        index: i,
                        species: species.clone(),
                    })
            })
            .collect()
    }

    fn falloff_form<M: KineticsModel + ?Sized>(
        model: &M,
        i: usize,
    ) -> Result<FalloffForm, ReactionInfoError> {
        let code = model
            .falloff_type(i)
            .ok_or(ReactionInfoError::MissingRateData {
                index: i,
                what: "fall-off function",
            })?;
        match code {
            // no further fall-off parameters
            SIMPLE_FALLOFF => Ok(FalloffForm::Lindemann),
            TROE_FALLOFF => {
                let parameters = model.falloff_parameters(i);
                if parameters.len() < 4 {
                    return Err(ReactionInfoError::InvalidFalloffParameters {
                        index: i,
                        expected: 4,
                        found: parameters.len(),
                    });
                }
                let (alpha, t3, t1, t2) =
                    (parameters[0], parameters[1], parameters[2], parameters[3]);
                if t2 == 0.0 {
                    Ok(FalloffForm::Troe6 { alpha, t3, t1 })
                } else {
                    Ok(FalloffForm::Troe7 { alpha, t3, t1, t2 })
                }
            }
            code => {
                warn!(
                    "reaction {}: fall-off function {} has no rate-law listing, only the rate and third-body data are kept",
                    i, code
                );
                Ok(FalloffForm::Other {
                    code,
                    parameters: model.falloff_parameters(i),
                })
            }
        }
    }
}

/// extract reaction `i` with the default gas constant
pub fn get_reaction_info<M: KineticsModel + ?Sized>(
    model: &M,
    i: usize,
) -> Result<ReactionRecord, ReactionInfoError> {
    Extractor::default().extract(model, i)
}
