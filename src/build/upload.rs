//! Upload hook.
//!
//! When the build is invoked with an upload argument, the configured
//! `[upload]` command runs once after a successful build.

use crate::build::process::{CommandSpec, ProcessError};
use crate::build::BuildContext;
use thiserror::Error;

/// Error running the upload hook.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No `[upload] program` in the configuration
    #[error("upload requested but no [upload] program is configured")]
    NotConfigured,
    /// The upload command failed
    #[error("upload failed: {0}")]
    Process(#[from] ProcessError),
}

/// The upload command for a context, if one is configured.
pub fn upload_command(ctx: &BuildContext) -> Option<CommandSpec> {
    let upload = &ctx.config().upload;
    upload.program.as_ref().map(|program| CommandSpec::new(program.clone(), upload.args.clone()))
}

/// Run the upload command for the context's target.
///
/// Placeholders: `{target}` and `{target_dir}`.
pub fn run_upload(ctx: &BuildContext) -> Result<(), UploadError> {
    let command = upload_command(ctx).ok_or(UploadError::NotConfigured)?;
    let vars = [
        ("target", ctx.target().to_string()),
        ("target_dir", ctx.target_dir().display().to_string()),
    ];
    command.run(&vars, ctx.project_root())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::default_config;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_upload_not_configured() {
        let ctx = BuildContext::new(default_config(), PathBuf::from("/p"), "admin").unwrap();
        assert!(upload_command(&ctx).is_none());
        assert!(matches!(run_upload(&ctx), Err(UploadError::NotConfigured)));
    }

    #[cfg(unix)]
    #[test]
    fn test_upload_runs_command_with_placeholders() {
        let temp = TempDir::new().unwrap();
        let mut config = default_config();
        config.upload.program = Some("sh".to_string());
        config.upload.args = vec![
            "-c".to_string(),
            r#"printf '%s %s' "$1" "$2" > uploaded.txt"#.to_string(),
            "upload".to_string(),
            "{target}".to_string(),
            "{target_dir}".to_string(),
        ];
        let ctx = BuildContext::new(config, temp.path().to_path_buf(), "admin").unwrap();

        run_upload(&ctx).unwrap();

        let written = std::fs::read_to_string(temp.path().join("uploaded.txt")).unwrap();
        assert_eq!(written, format!("admin {}", ctx.target_dir().display()));
    }

    #[cfg(unix)]
    #[test]
    fn test_upload_failure() {
        let temp = TempDir::new().unwrap();
        let mut config = default_config();
        config.upload.program = Some("sh".to_string());
        config.upload.args = vec!["-c".to_string(), "exit 7".to_string()];
        let ctx = BuildContext::new(config, temp.path().to_path_buf(), "admin").unwrap();

        assert!(matches!(run_upload(&ctx), Err(UploadError::Process(_))));
    }
}
