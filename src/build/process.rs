//! External command execution.
//!
//! The compiler and upload hooks are configured as a program plus an
//! argument list containing `{placeholder}` tokens. This module expands the
//! tokens and runs the command, capturing its output.

use std::path::Path;
use std::process::{Command, Output};
use thiserror::Error;

/// Error running an external command.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The program exited unsuccessfully
    #[error("'{command}' exited with {status}{}", format_stderr(.stderr))]
    Failed {
        /// Full command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n\t{}", trimmed)
    }
}

/// A program plus an argument template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute
    pub program: String,
    /// Arguments, possibly containing `{name}` placeholders
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command spec.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Replace every `{name}` placeholder in the arguments.
    ///
    /// Unknown placeholders are left untouched.
    pub fn expand(&self, vars: &[(&str, String)]) -> Vec<String> {
        self.args.iter().map(|arg| expand_placeholders(arg, vars)).collect()
    }

    /// Expand placeholders and run the command in `cwd`.
    pub fn run(&self, vars: &[(&str, String)], cwd: &Path) -> Result<Output, ProcessError> {
        run_command(&self.program, &self.expand(vars), cwd)
    }
}

/// Replace `{name}` tokens in a single string.
pub fn expand_placeholders(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}

/// Run a program to completion and fail on a non-zero exit status.
pub fn run_command(program: &str, args: &[String], cwd: &Path) -> Result<Output, ProcessError> {
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|source| ProcessError::Spawn { program: program.to_string(), source })?;

    if !output.status.success() {
        return Err(ProcessError::Failed {
            command: std::iter::once(program)
                .chain(args.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" "),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_placeholders() {
        let vars = [("source", "a/b.vue".to_string()), ("module", "cmpAB".to_string())];
        assert_eq!(expand_placeholders("--input={source}", &vars), "--input=a/b.vue");
        assert_eq!(expand_placeholders("{module}.{module}", &vars), "cmpAB.cmpAB");
        assert_eq!(expand_placeholders("{unknown}", &vars), "{unknown}");
        assert_eq!(expand_placeholders("plain", &vars), "plain");
    }

    #[test]
    fn test_command_spec_expand() {
        let spec = CommandSpec::new(
            "node",
            vec!["build.js".to_string(), "{js}".to_string(), "{css}".to_string()],
        );
        let args = spec.expand(&[("js", "out.js".to_string()), ("css", "out.css".to_string())]);
        assert_eq!(args, vec!["build.js", "out.js", "out.css"]);
    }

    #[test]
    fn test_run_command_spawn_error() {
        let err = run_command("felib-no-such-program", &[], Path::new(".")).unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
        assert!(err.to_string().contains("felib-no-such-program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_success() {
        let args = vec!["-c".to_string(), "echo hello".to_string()];
        let output = run_command("sh", &args, Path::new(".")).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_failure_captures_stderr() {
        let args = vec!["-c".to_string(), "echo broken template >&2; exit 3".to_string()];
        let err = run_command("sh", &args, Path::new(".")).unwrap_err();
        match &err {
            ProcessError::Failed { stderr, .. } => assert!(stderr.contains("broken template")),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(err.to_string().contains("broken template"));
    }
}
