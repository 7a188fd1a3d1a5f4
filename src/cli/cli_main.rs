use crate::Kinetics::kinetics_error::ReactionInfoError;
use crate::Kinetics::mechanism::Mechanism;
use crate::Kinetics::rate_report::{ReportSummary, print_records_table, write_report};
use crate::settings::ReportSettings;
use log::{LevelFilter, error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "report_settings.json";

/// runs the report for command-line arguments `[program, mechanism, settings?]`, returns the exit code
pub fn run(args: Vec<String>) -> i32 {
    init_logger();
    let Some(mechanism_path) = args.get(1) else {
        show_usage();
        return 2;
    };
    match run_report(mechanism_path, args.get(2).map(String::as_str)) {
        Ok(summary) => {
            info!(
                "done: {} reactions written to {}",
                summary.blocks_written,
                summary.output.display()
            );
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

/// loads mechanism and settings, writes the report and optionally prints the summary table
pub fn run_report(
    mechanism_path: &str,
    settings_path: Option<&str>,
) -> Result<ReportSummary, ReactionInfoError> {
    let settings = match settings_path {
        Some(path) => ReportSettings::load(path)?,
        None => ReportSettings::load_or_default(DEFAULT_SETTINGS_FILE),
    };
    let mechanism = Mechanism::from_file(mechanism_path)?;
    let summary = write_report(&mechanism, &settings.output_file, &settings.extractor())?;
    if settings.print_summary {
        print_records_table(&summary.records);
    }
    Ok(summary)
}

fn init_logger() {
    // a logger may already be installed (tests, embedding applications)
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}
/* colors
Blue (\x1b[34m) - header text
Yellow (\x1b[33m) - arguments
Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_usage() {
    println!("\x1b[34m\n Rate-law report: kinetic parameters of a mechanism as a Fortran-style listing\n\x1b[0m");
    println!("\x1b[33mUsage: KiRateReport <mechanism.json> [settings.json]\x1b[0m");
    println!(
        "\x1b[33m  settings default to {} in the working directory, if present\x1b[0m",
        DEFAULT_SETTINGS_FILE
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ReportSettings;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const MECH: &str = r#"{
        "species": ["H", "O2", "O", "OH", "AR"],
        "reactions": [
            {"equation": "H + O2 <=> O + OH", "rate-constant": {"A": 1.0e13, "b": 0.0, "Ea": 0.0}},
            {"equation": "O + H + M <=> OH + M", "type": "three-body",
             "rate-constant": {"A": 4.71e15, "b": -1.0, "Ea": 0.0}, "efficiencies": {"AR": 0.75}}
        ]
    }"#;

    #[test]
    fn test_run_without_arguments_prints_usage() {
        assert_eq!(run(vec!["KiRateReport".to_string()]), 2);
    }

    #[test]
    fn test_run_report_with_settings_file() {
        let dir = tempdir().unwrap();
        let mech_path = dir.path().join("h2.json");
        fs::write(&mech_path, MECH).unwrap();
        let output: PathBuf = dir.path().join("rates.txt");
        let settings_path = dir.path().join("settings.json");
        ReportSettings {
            output_file: output.clone(),
            print_summary: false,
            ..ReportSettings::default()
        }
        .save(&settings_path)
        .unwrap();

        let summary = run_report(
            mech_path.to_str().unwrap(),
            Some(settings_path.to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(summary.blocks_written, 2);
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("C R2: O + H + M <=> OH + M Reaction type: 2\n"));
        assert!(text.contains("      Species index 4 efficiency 0.75 \n"));
    }

    #[test]
    fn test_bundled_h2_mechanism_report() {
        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let output = dir.path().join("get_reaction_info.txt");
        ReportSettings {
            output_file: output.clone(),
            print_summary: true,
            ..ReportSettings::default()
        }
        .save(&settings_path)
        .unwrap();
        let mech_path = concat!(env!("CARGO_MANIFEST_DIR"), "/mechanisms/h2-plog.json");
        let summary = run_report(mech_path, Some(settings_path.to_str().unwrap())).unwrap();
        assert_eq!(summary.blocks_written, 14);
        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(text.matches("C Troe 7-parameters").count(), 1);
        assert_eq!(text.matches("C Troe 6-parameters").count(), 1);
        assert_eq!(text.matches("C Lindemann 3-parameters").count(), 1);
        assert_eq!(text.matches("      P = ").count(), 3);
        assert!(text.contains("C R14: H + HO2 <=> H2 + O2 Reaction type: 5\n"));
        // R12 names AR as its only collider
        let r12 = &text[text.find("C R12:").unwrap()..text.find("C R13:").unwrap()];
        assert!(r12.contains("      Number of third-body enhanced species 1\n"));
        assert!(r12.contains("      Species index 8 efficiency 1 \n"));
        assert!(r12.contains("T3: +1.000000000000000E-30 T1: +1.000000000000000E+30\n"));
    }

    #[test]
    fn test_run_exit_code_on_missing_mechanism() {
        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        ReportSettings {
            output_file: dir.path().join("rates.txt"),
            print_summary: false,
            ..ReportSettings::default()
        }
        .save(&settings_path)
        .unwrap();
        let code = run(vec![
            "KiRateReport".to_string(),
            dir.path().join("missing.json").to_str().unwrap().to_string(),
            settings_path.to_str().unwrap().to_string(),
        ]);
        assert_eq!(code, 1);
    }
}
