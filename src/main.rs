use KiRateReport::cli::cli_main::run;

pub fn main() {
    let args: Vec<String> = std::env::args().collect();
    std::process::exit(run(args));
}
