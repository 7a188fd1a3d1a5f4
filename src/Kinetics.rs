/// read-only view of a loaded kinetic mechanism: the `KineticsModel` trait and the `Mechanism`
/// struct loaded from a JSON mechanism file
///
///  # Examples
/// ```
/// use KiRateReport::Kinetics::mechanism::{KineticsModel, Mechanism};
/// let mech = Mechanism::from_json_str(r#"{
///     "species": ["H", "O2", "O", "OH"],
///     "reactions": [{"equation": "H + O2 <=> O + OH",
///                    "rate-constant": {"A": 3.547e12, "b": -0.406, "Ea": 6.9956e7}}]
/// }"#).unwrap();
/// assert_eq!(mech.n_reactions(), 1);
/// assert_eq!(mech.reaction_type(0), 1);
/// ```
pub mod mechanism;
/// stoichiometry and reversibility from reaction equations like "2 O + M <=> O2 + M"
pub mod equation_parser;
/// Extraction of the kinetic parameters of one reaction: forward (or high-pressure) rate ABE with
/// E divided by the gas constant, third-body species indices and efficiencies, fall-off parameters
/// (low-pressure ABE, Troe alpha, T3, T1, T2) and PLOG pressure points
///
///  # Examples
/// ```
/// use KiRateReport::Kinetics::mechanism::Mechanism;
/// use KiRateReport::Kinetics::reaction_info::get_reaction_info;
/// let mech = Mechanism::from_json_str(r#"{
///     "species": ["O", "O2", "AR", "H2O"],
///     "reactions": [{"equation": "2 O + M <=> O2 + M", "type": "three-body",
///                    "rate-constant": {"A": 1.2e11, "b": -1.0, "Ea": 0.0},
///                    "efficiencies": {"AR": 0.7, "H2O": 12.0}}]
/// }"#).unwrap();
/// let reac = get_reaction_info(&mech, 0).unwrap();
/// assert_eq!(reac.ithb(), 2);
/// assert_eq!(reac.nktb(), vec![2, 3]);
/// assert_eq!(reac.aik(), vec![0.7, 12.0]);
/// ```
pub mod reaction_info;
/// Fortran-style rate-law listing of all reactions of a model
pub mod rate_report;
pub mod kinetics_error;
