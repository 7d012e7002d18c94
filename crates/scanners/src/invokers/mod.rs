//! External scanner subprocess orchestration
//!
//! Each supported scanner is a unit struct implementing `ExternalScanner`
//! with its fixed command line; the provided `invoke` launches the binary,
//! captures stdout, and downgrades launch failures to a `Failed` outcome so
//! one broken tool never aborts the others. The scanners write their JSON
//! reports to fixed file names themselves; this layer only records how the
//! launch went.

pub mod bearer;
pub mod semgrep;
pub mod trivy;

pub use bearer::BearerScanner;
pub use semgrep::SemgrepScanner;
pub use trivy::TrivyScanner;

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// How one scanner launch went. A non-zero exit with captured output still
/// counts as `Completed`: only the launch itself is checked, matching the
/// downstream expectation that the output file decides what was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed { stdout: String },
    Failed { reason: String },
}

impl ScanOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Report-wire entry: `<id>_output` for a capture, `<id>_error` for a
    /// launch failure.
    pub fn report_entry(&self, id: &str) -> (String, Value) {
        match self {
            Self::Completed { stdout } => {
                (format!("{id}_output"), Value::String(stdout.clone()))
            }
            Self::Failed { reason } => (format!("{id}_error"), Value::String(reason.clone())),
        }
    }
}

pub trait ExternalScanner: Send + Sync {
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// File the scanner writes its JSON report to, relative to the working
    /// directory.
    fn output_file(&self) -> &'static str;

    /// Key under which that report holds its finding list.
    fn findings_key(&self) -> &'static str;

    fn command(&self, target: &Path) -> Command;

    /// Launches the scanner and captures its output. Never propagates:
    /// launch errors become `Failed` outcomes.
    fn invoke(&self, target: &Path) -> ScanOutcome {
        debug!(scanner = self.id(), "launching external scanner");

        let mut command = self.command(target);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match command.output() {
            Ok(output) => ScanOutcome::Completed {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            },
            Err(error) => {
                warn!(scanner = self.id(), %error, "scanner launch failed");
                ScanOutcome::Failed {
                    reason: error.to_string(),
                }
            }
        }
    }
}
