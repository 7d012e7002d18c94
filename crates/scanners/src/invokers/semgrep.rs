use super::ExternalScanner;
use std::path::Path;
use std::process::Command;

/// Semgrep static analysis with the hosted `auto` ruleset.
pub struct SemgrepScanner;

impl ExternalScanner for SemgrepScanner {
    fn id(&self) -> &'static str {
        "semgrep"
    }

    fn name(&self) -> &'static str {
        "Semgrep"
    }

    fn output_file(&self) -> &'static str {
        "semgrep_output.json"
    }

    fn findings_key(&self) -> &'static str {
        "results"
    }

    fn command(&self, target: &Path) -> Command {
        let mut command = Command::new("semgrep");
        command
            .args(["--config=auto", "--json", "--output", self.output_file()])
            .arg(target);
        command
    }
}
