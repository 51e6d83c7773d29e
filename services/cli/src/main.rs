use coach_tracker_cli::run;

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        std::process::exit(err.exit_code());
    }
}
