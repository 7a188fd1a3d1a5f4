//! # Equation Parser Module
//!
//! ## Aim
//! Reads stoichiometry out of reaction equations written in the mechanism-file style,
//! e.g. `"2 O + M <=> O2 + M"` or `"H + O2 (+M) <=> HO2 (+M)"`.
//!
//! ## Logic
//! - the equation is split at `<=>`, `=>` or `=`; only `=>` means an irreversible reaction
//! - falloff collider groups `(+M)`, `(+AR)` and bare `M` collider terms are not species; they are
//!   dropped from the stoichiometry and the collider name is kept in `ParsedEquation::collider`
//! - each remaining term is `[coefficient] species`, coefficient defaults to 1.0
//! - repeated species are summed up (`H + H + M` gives `H: 2.0`)
//!
//! ## Usage
//! ```rust
//! use KiRateReport::Kinetics::equation_parser::parse_equation;
//! let parsed = parse_equation("2 O + M <=> O2 + M").unwrap();
//! assert_eq!(parsed.reactants, vec![("O".to_string(), 2.0)]);
//! assert!(parsed.reversible);
//! ```
use regex::Regex;
use std::sync::OnceLock;

/// stoichiometry of one equation, species kept in order of first appearance
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEquation {
    pub reactants: Vec<(String, f64)>,
    pub products: Vec<(String, f64)>,
    pub reversible: bool,
    /// `M` for a generic collider, the species name for a `(+AR)` group, None when no collider is written
    pub collider: Option<String>,
}

fn collider_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(\s*\+\s*([^()\s]+)\s*\)").expect("collider regex"))
}

fn term_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+\+\s+").expect("separator regex"))
}

fn coefficient_and_species() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)\s+(\S+)$").expect("coefficient regex")
    })
}

/// splits the equation into (left side, right side, reversible)
fn split_sides(equation: &str) -> Option<(&str, &str, bool)> {
    if let Some((left, right)) = equation.split_once("<=>") {
        return Some((left, right, true));
    }
    if let Some((left, right)) = equation.split_once("=>") {
        return Some((left, right, false));
    }
    equation
        .split_once('=')
        .map(|(left, right)| (left, right, true))
}

/// stoichiometry of one side of the equation
struct Side {
    species: Vec<(String, f64)>,
    collider: Option<String>,
}

/// parses one side of the equation into (species, coefficient) pairs
fn parse_side(side: &str) -> Option<Side> {
    let mut collider = collider_group()
        .captures(side)
        .map(|caps| caps[1].to_string());
    let cleaned = collider_group().replace_all(side, " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    let mut species: Vec<(String, f64)> = Vec::new();
    for term in term_separator().split(cleaned) {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        let (name, coefficient) = if let Some(caps) = coefficient_and_species().captures(term) {
            let coefficient: f64 = caps[1].parse().ok()?;
            (caps[2].to_string(), coefficient)
        } else if term.split_whitespace().count() == 1 {
            (term.to_string(), 1.0)
        } else {
            return None;
        };
        // third body collider
        if name == "M" {
            if collider.is_none() {
                collider = Some(name);
            }
            continue;
        }
        match species.iter_mut().find(|(s, _)| *s == name) {
            Some((_, c)) => *c += coefficient,
            None => species.push((name, coefficient)),
        }
    }
    Some(Side { species, collider })
}

/// parse reaction equation into reactants, products and reversibility. Returns None for
/// equations without a separator or with malformed terms
pub fn parse_equation(equation: &str) -> Option<ParsedEquation> {
    let (left, right, reversible) = split_sides(equation)?;
    let reactants = parse_side(left)?;
    let products = parse_side(right)?;
    Some(ParsedEquation {
        reactants: reactants.species,
        products: products.species,
        reversible,
        collider: reactants.collider.or(products.collider),
    })
}

impl ParsedEquation {
    /// species written as a plain term on both sides, i.e. candidates for an explicit
    /// third-body collider like AR in "H + O2 + AR <=> HO2 + AR"
    pub fn shared_species(&self) -> Vec<String> {
        self.reactants
            .iter()
            .filter(|(name, c)| {
                *c >= 1.0
                    && self
                        .products
                        .iter()
                        .any(|(p, pc)| p == name && *pc >= 1.0)
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// takes one unit of `name` off both sides
    pub fn remove_collider(&mut self, name: &str) {
        for side in [&mut self.reactants, &mut self.products] {
            if let Some(pos) = side.iter().position(|(s, _)| s == name) {
                side[pos].1 -= 1.0;
                if side[pos].1 <= 0.0 {
                    side.remove(pos);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_reversible_equation() {
        let parsed = parse_equation("H + O2 <=> O + OH").unwrap();
        assert_eq!(
            parsed.reactants,
            vec![("H".to_string(), 1.0), ("O2".to_string(), 1.0)]
        );
        assert_eq!(
            parsed.products,
            vec![("O".to_string(), 1.0), ("OH".to_string(), 1.0)]
        );
        assert!(parsed.reversible);
    }

    #[test]
    fn test_irreversible_equation() {
        let parsed = parse_equation("HO2 + H => H2 + O2").unwrap();
        assert!(!parsed.reversible);
        let parsed = parse_equation("H2 + O2 = 2 OH").unwrap();
        assert!(parsed.reversible);
        assert_eq!(parsed.products, vec![("OH".to_string(), 2.0)]);
    }

    #[test]
    fn test_third_body_collider_dropped() {
        let parsed = parse_equation("2 O + M <=> O2 + M").unwrap();
        assert_eq!(parsed.reactants, vec![("O".to_string(), 2.0)]);
        assert_eq!(parsed.products, vec![("O2".to_string(), 1.0)]);
        assert_eq!(parsed.collider.as_deref(), Some("M"));
        assert_eq!(parse_equation("H + O2 <=> O + OH").unwrap().collider, None);
    }

    #[test]
    fn test_explicit_collider_term() {
        let mut parsed = parse_equation("H + O2 + AR <=> HO2 + AR").unwrap();
        assert_eq!(parsed.collider, None);
        assert_eq!(parsed.shared_species(), vec!["AR".to_string()]);
        parsed.remove_collider("AR");
        assert_eq!(
            parsed.reactants,
            vec![("H".to_string(), 1.0), ("O2".to_string(), 1.0)]
        );
        assert_eq!(parsed.products, vec![("HO2".to_string(), 1.0)]);

        let mut parsed = parse_equation("2 H2O <=> H + OH + H2O").unwrap();
        assert_eq!(parsed.shared_species(), vec!["H2O".to_string()]);
        parsed.remove_collider("H2O");
        assert_eq!(parsed.reactants, vec![("H2O".to_string(), 1.0)]);
        assert_eq!(
            parsed.products,
            vec![("H".to_string(), 1.0), ("OH".to_string(), 1.0)]
        );
    }

    #[test]
    fn test_falloff_collider_group_dropped() {
        let parsed = parse_equation("H + O2 (+M) <=> HO2 (+M)").unwrap();
        assert_eq!(
            parsed.reactants,
            vec![("H".to_string(), 1.0), ("O2".to_string(), 1.0)]
        );
        assert_eq!(parsed.collider.as_deref(), Some("M"));
        let parsed = parse_equation("2 OH (+ AR) <=> H2O2 (+ AR)").unwrap();
        assert_eq!(parsed.reactants, vec![("OH".to_string(), 2.0)]);
        assert_eq!(parsed.products, vec![("H2O2".to_string(), 1.0)]);
        assert_eq!(parsed.collider.as_deref(), Some("AR"));
    }

    #[test]
    fn test_repeated_species_are_summed() {
        let parsed = parse_equation("H + H + M <=> H2 + M").unwrap();
        assert_eq!(parsed.reactants, vec![("H".to_string(), 2.0)]);
        let parsed = parse_equation("0.5 O2 + H2 => H2O").unwrap();
        assert_eq!(
            parsed.reactants,
            vec![("O2".to_string(), 0.5), ("H2".to_string(), 1.0)]
        );
    }

    #[test]
    fn test_malformed_equations() {
        assert!(parse_equation("H + O2").is_none());
        assert!(parse_equation(" <=> OH").is_none());
        assert!(parse_equation("H + + O2 <=> HO2").is_none());
        assert!(parse_equation("H O2 <=> HO2").is_none());
    }
}
