//! `architecture-lint [BACKEND_DIR]`
//!
//! Lints the backend at `BACKEND_DIR`, defaulting to the `backend/` directory
//! beside this tool in the workspace. Exits non-zero on any violation.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;

fn main() -> ExitCode {
    let backend_dir = env::args()
        .nth(1)
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../backend"));

    let mut stderr = io::stderr().lock();
    match architecture_lint::lint_backend_sources(&backend_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(stderr, "{backend_dir}: {err}");
            ExitCode::FAILURE
        }
    }
}
