use super::ExternalScanner;
use std::path::Path;
use std::process::Command;

/// Trivy filesystem scan for dependency and container vulnerabilities.
pub struct TrivyScanner;

impl ExternalScanner for TrivyScanner {
    fn id(&self) -> &'static str {
        "trivy"
    }

    fn name(&self) -> &'static str {
        "Trivy"
    }

    fn output_file(&self) -> &'static str {
        "trivy_output.json"
    }

    fn findings_key(&self) -> &'static str {
        "vulnerabilities"
    }

    fn command(&self, target: &Path) -> Command {
        let mut command = Command::new("trivy");
        command
            .args(["fs", "--format", "json", "-o", self.output_file()])
            .arg(target);
        command
    }
}
