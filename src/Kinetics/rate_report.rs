//! # Rate Report Module
//!
//! ## Aim
//! Writes the kinetic parameters of every reaction of a model as a text listing in the style of
//! Fortran rate-law code, so that it can be compared line by line against a reference listing.
//!
//! ## Logic
//! For each reaction (in index order):
//! 1) the reaction is extracted into a `ReactionRecord` (the only place where the type is classified)
//! 2) the reactant order is the sum of the nonzero reactant stoichiometric coefficients of the reaction
//! 3) `ConvertA = 1000**(order - 1)` turns a kmol based pre-exponential factor into a mole based one
//! 4) one block is written, ending with a line `C`
//!
//! Third-body reactions and the low-pressure limit of fall-off reactions get an extra factor of 1000:
//! their rate is multiplied by the third-body concentration, which is converted from kmol too.
//! The high-pressure limit of a fall-off reaction has no third-body concentration in it and
//! gets `ConvertA` only.
//!
//! ## Output example
//! ```text
//! C R1: H + O2 <=> O + OH Reaction type: 1
//! C forward temperature dependent reaction rate
//!       RF = +3.547000000000000E+15*T**-4.060000000000000E-01*EXP(-8.413773393711181E+03/T)
//! C
//! ```
//! A reaction the extractor does not support stops the whole run, blocks written so far stay in the file.
use crate::Kinetics::kinetics_error::ReactionInfoError;
use crate::Kinetics::mechanism::KineticsModel;
use crate::Kinetics::reaction_info::{
    Extractor, FalloffForm, RateTriple, ReactionKind, ReactionRecord,
};
use log::{error, info, warn};
use nalgebra::DMatrix;
use prettytable::{Table, row};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// kmol -> mol
pub const KMOL_TO_MOL: f64 = 1.0e3;

/// formats like C `%+.15E`: explicit sign, 15 fractional digits, signed exponent with at least two digits
pub fn fortran_e(value: f64) -> String {
    let sign = if value.is_sign_negative() { '-' } else { '+' };
    if value.is_nan() {
        return format!("{}NAN", sign);
    }
    if value.is_infinite() {
        return format!("{}INF", sign);
    }
    let text = format!("{:.15E}", value.abs());
    let (mantissa, exponent) = text.split_once('E').unwrap_or((text.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let exponent_sign = if exponent < 0 { '-' } else { '+' };
    format!("{}{}E{}{:02}", sign, mantissa, exponent_sign, exponent.abs())
}

/// formats like C `%g`: 6 significant digits, trailing zeros removed, scientific notation
/// for exponents below -4 or above 5
pub fn format_g(value: f64) -> String {
    const PRECISION: i32 = 6;
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    // exponent after rounding to PRECISION significant digits
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent >= PRECISION {
        let mantissa = strip_trailing_zeros(mantissa);
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, exponent_sign, exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// reactant order of reaction `i`: sum of the nonzero reactant coefficients in column `i`
pub fn reaction_order(reactant_stoich: &DMatrix<f64>, i: usize) -> f64 {
    reactant_stoich
        .column(i)
        .iter()
        .filter(|coefficient| **coefficient != 0.0)
        .sum()
}

/// factor that turns a kmol based pre-exponential factor of the given order into a mole based one
pub fn convert_a(order: f64) -> f64 {
    KMOL_TO_MOL.powf(order - 1.0)
}

/// writes report blocks to any sink
pub struct ReportWriter<W: Write> {
    out: W,
    blocks_written: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            blocks_written: 0,
        }
    }

    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_rate_law(&mut self, a: f64, b: f64, e: f64) -> io::Result<()> {
        // the listing reads exp(+(-E)/T)
        writeln!(
            self.out,
            "      RF = {}*T**{}*EXP({}/T)",
            fortran_e(a),
            fortran_e(b),
            fortran_e(-e)
        )
    }

    fn write_forward_rate(&mut self, a: f64, rate: &RateTriple) -> io::Result<()> {
        writeln!(self.out, "C forward temperature dependent reaction rate")?;
        self.write_rate_law(a, rate.b, rate.e)
    }

    fn write_third_body(&mut self, efficiencies: &[(usize, f64)]) -> io::Result<()> {
        writeln!(self.out, "C Third body information")?;
        writeln!(
            self.out,
            "      Number of third-body enhanced species {}",
            efficiencies.len()
        )?;
        for (species, efficiency) in efficiencies {
            writeln!(
                self.out,
                "      Species index {} efficiency {} ",
                species,
                format_g(*efficiency)
            )?;
        }
        Ok(())
    }

    fn write_low_pressure_limit(
        &mut self,
        title: &str,
        a: f64,
        low: &RateTriple,
    ) -> io::Result<()> {
        writeln!(self.out, "C {}", title)?;
        writeln!(
            self.out,
            "      Low pressure limit ABE: {} {} {}",
            fortran_e(a),
            fortran_e(low.b),
            fortran_e(low.e)
        )
    }

    /// writes the block of one reaction; `convert_a` is the kmol -> mol factor for the reaction order
    pub fn write_block(&mut self, record: &ReactionRecord, convert_a: f64) -> io::Result<()> {
        writeln!(
            self.out,
            "C R{}: {} Reaction type: {}",
            record.index + 1,
            record.equation,
            record.type_code
        )?;
        match &record.kind {
            ReactionKind::Simple => {
                self.write_forward_rate(record.rate.a * convert_a, &record.rate)?;
            }
            ReactionKind::ThirdBody { efficiencies } => {
                writeln!(self.out, "C have third-body")?;
                // third-body concentration is kmol based as well
                self.write_forward_rate(record.rate.a * KMOL_TO_MOL * convert_a, &record.rate)?;
                self.write_third_body(efficiencies)?;
            }
            ReactionKind::Falloff {
                efficiencies,
                low,
                form,
            } => {
                writeln!(self.out, "C fall off")?;
                self.write_forward_rate(record.rate.a * convert_a, &record.rate)?;
                self.write_third_body(efficiencies)?;
                // the low-pressure limit carries the third-body concentration
                let a_low = low.a * KMOL_TO_MOL * convert_a;
                match form {
                    FalloffForm::Lindemann => {
                        self.write_low_pressure_limit("Lindemann 3-parameters", a_low, low)?;
                    }
                    FalloffForm::Troe6 { alpha, t3, t1 } => {
                        self.write_low_pressure_limit("Troe 6-parameters", a_low, low)?;
                        writeln!(
                            self.out,
                            "      alpha: {} T3: {} T1: {}",
                            fortran_e(*alpha),
                            fortran_e(*t3),
                            fortran_e(*t1)
                        )?;
                    }
                    FalloffForm::Troe7 { alpha, t3, t1, t2 } => {
                        self.write_low_pressure_limit("Troe 7-parameters", a_low, low)?;
                        writeln!(
                            self.out,
                            "      alpha: {} T3: {} T1: {} T2: {}",
                            fortran_e(*alpha),
                            fortran_e(*t3),
                            fortran_e(*t1),
                            fortran_e(*t2)
                        )?;
                    }
                    FalloffForm::Other { code, .. } => {
                        warn!(
                            "R{}: no low-pressure listing for fall-off function {}",
                            record.index + 1,
                            code
                        );
                    }
                }
            }
            ReactionKind::Plog { rates } => {
                writeln!(self.out, "C PLOG")?;
                for point in rates {
                    writeln!(self.out, "      P = {} (Pa)", format_g(point.pressure))?;
                    self.write_rate_law(point.rate.a * convert_a, point.rate.b, point.rate.e)?;
                }
            }
        }
        writeln!(self.out, "C")?;
        self.blocks_written += 1;
        Ok(())
    }
}

/// extracts and writes every reaction of the model, stops at the first reaction that cannot be extracted.
/// Returns the extracted records
pub fn write_reactions<M: KineticsModel + ?Sized, W: Write>(
    model: &M,
    extractor: &Extractor,
    writer: &mut ReportWriter<W>,
) -> Result<Vec<ReactionRecord>, ReactionInfoError> {
    let reactant_stoich = model.reactant_stoich_coeffs();
    let mut records = Vec::with_capacity(model.n_reactions());
    for i in 0..model.n_reactions() {
        let record = match extractor.extract(model, i) {
            Ok(record) => record,
            Err(e) => {
                error!("{}, report stopped after {} reactions", e, writer.blocks_written());
                return Err(e);
            }
        };
        let order = reaction_order(&reactant_stoich, i);
        writer.write_block(&record, convert_a(order))?;
        records.push(record);
    }
    Ok(records)
}

/// result of a report run
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub output: PathBuf,
    pub blocks_written: usize,
    pub records: Vec<ReactionRecord>,
}

/// writes the report of the whole model to `path`, the file is truncated first
pub fn write_report<M: KineticsModel + ?Sized, P: AsRef<Path>>(
    model: &M,
    path: P,
    extractor: &Extractor,
) -> Result<ReportSummary, ReactionInfoError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = ReportWriter::new(BufWriter::new(file));
    let result = write_reactions(model, extractor, &mut writer);
    // flush on the failure path too
    let flushed = writer.flush();
    let records = result?;
    flushed?;
    info!(
        "rate report written to {}: {} reactions",
        path.display(),
        writer.blocks_written()
    );
    Ok(ReportSummary {
        output: path.to_path_buf(),
        blocks_written: writer.blocks_written(),
        records,
    })
}

/// summary table of extracted reactions
pub fn records_table(records: &[ReactionRecord]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "R", "equation", "kind", "reversible", "A", "B", "E [K]", "ITHB"
    ]);
    for record in records {
        table.add_row(row![
            record.index + 1,
            record.equation,
            record.kind.label(),
            record.reversible,
            format!("{:.4e}", record.rate.a),
            format!("{:.4}", record.rate.b),
            format!("{:.2}", record.rate.e),
            record.ithb()
        ]);
    }
    table
}

pub fn print_records_table(records: &[ReactionRecord]) {
    records_table(records).printstd();
}
