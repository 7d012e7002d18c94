use super::ExternalScanner;
use std::path::Path;
use std::process::Command;

/// Bearer SAST/secrets scan over the target tree.
pub struct BearerScanner;

impl ExternalScanner for BearerScanner {
    fn id(&self) -> &'static str {
        "bearer"
    }

    fn name(&self) -> &'static str {
        "Bearer"
    }

    fn output_file(&self) -> &'static str {
        "bearer_output.json"
    }

    fn findings_key(&self) -> &'static str {
        "vulnerabilities"
    }

    fn command(&self, target: &Path) -> Command {
        let mut command = Command::new("bearer");
        command
            .args(["scan", "--json", "--output", self.output_file(), "--silent"])
            .arg(target);
        command
    }
}
