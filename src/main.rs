fn main() {
    if let Err(err) = survey_csv::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
