use std::process::ExitCode;

fn main() -> ExitCode {
    dokan_cli::run()
}
