use std::process::ExitCode;

fn main() -> ExitCode {
    duffel_cli::run()
}
