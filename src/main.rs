use std::process::ExitCode;

fn main() -> ExitCode {
    match turtle_graphics_lang::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
