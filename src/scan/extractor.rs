//! Document text extraction collaborators.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::config::EXTRACTOR_PATH_PLACEHOLDER;
use crate::error_handling::ScanError;

/// Turns a staged document into plain text.
///
/// Implementations report failures as [`ScanError::Extraction`].
pub trait TextExtractor: Send + Sync {
    /// Extracts the text of the document at `path`.
    fn extract_text(&self, path: &Path) -> Result<String, ScanError>;
}

/// Runs an external program and reads the document text from its stdout.
///
/// The command line is split on whitespace. Every `{path}` in an argument is
/// replaced with the staged file path; without a placeholder the path is
/// appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandTextExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandTextExtractor {
    /// Parses a command line such as `pdftotext -layout {path} -`.
    pub fn new(command: &str) -> Result<Self, ScanError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| ScanError::Extraction("extractor command is empty".to_string()))?;
        Ok(CommandTextExtractor {
            program,
            args: parts.collect(),
        })
    }

    fn args_for(&self, path: &Path) -> Vec<String> {
        let path = path.to_string_lossy();
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(EXTRACTOR_PATH_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(EXTRACTOR_PATH_PLACEHOLDER, &path)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(path.into_owned());
        }
        args
    }
}

impl TextExtractor for CommandTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ScanError> {
        let args = self.args_for(path);
        debug!("Running extractor: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| ScanError::Extraction(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::Extraction(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_substituted() {
        let extractor = CommandTextExtractor::new("pdftotext -layout {path} -").expect("parses");
        assert_eq!(
            extractor.args_for(Path::new("/tmp/a.pdf")),
            vec!["-layout", "/tmp/a.pdf", "-"]
        );
    }

    #[test]
    fn test_path_appended_without_placeholder() {
        let extractor = CommandTextExtractor::new("cat").expect("parses");
        assert_eq!(extractor.args_for(Path::new("/tmp/a.pdf")), vec!["/tmp/a.pdf"]);
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(matches!(
            CommandTextExtractor::new("   "),
            Err(ScanError::Extraction(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_reads_stdout() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let file = dir.path().join("doc.pdf");
        std::fs::write(&file, "Claim your prize now").expect("write");
        let text = CommandTextExtractor::new("cat {path}")
            .expect("parses")
            .extract_text(&file)
            .expect("cat succeeds");
        assert_eq!(text, "Claim your prize now");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_extraction_error() {
        let err = CommandTextExtractor::new("false")
            .expect("parses")
            .extract_text(Path::new("/nonexistent.pdf"))
            .unwrap_err();
        assert!(matches!(err, ScanError::Extraction(_)));
    }

    #[test]
    fn test_missing_program_is_extraction_error() {
        let err = CommandTextExtractor::new("phish-scan-no-such-extractor {path}")
            .expect("parses")
            .extract_text(Path::new("/tmp/x.pdf"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to run"));
    }
}
