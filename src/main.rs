use std::process::ExitCode;

fn main() -> ExitCode {
    playground_gen::cli::run()
}
