//! Shared plumbing for backends that shell out to a command-line renderer.

use std::{
    ffi::OsStr,
    io::Write as _,
    path::Path,
    process::{Command, Output, Stdio},
};

use crate::{
    convert::backend::UnavailableReason,
    foundation::error::{SpriteError, SpriteResult},
};

/// Whether `program --version` runs and exits successfully.
pub fn check_tool(program: &str, install_hint: &str) -> Result<(), UnavailableReason> {
    let status = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(s) if s.success() => Ok(()),
        Ok(s) => Err(UnavailableReason::new(format!(
            "'{program} --version' exited with status {s}"
        ))),
        Err(e) => Err(UnavailableReason::new(format!(
            "'{program}' could not be started ({e}); {install_hint}"
        ))),
    }
}

/// Run `program args...` to completion with captured output.
///
/// A spawn failure or a non-zero exit is a `Conversion` error that carries the process output.
pub fn run_tool<I, S>(program: &str, args: I) -> SpriteResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    tracing::debug!(command = ?cmd, "spawning renderer");

    let output = cmd
        .output()
        .map_err(|e| SpriteError::conversion(format!("failed to start '{program}': {e}")))?;
    if !output.status.success() {
        return Err(SpriteError::conversion(format!(
            "{program} exited with status {}: {}",
            output.status,
            describe_output(&output)
        )));
    }
    Ok(output)
}

/// Trimmed stderr, falling back to stdout, for error messages.
pub fn describe_output(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.trim() {
        "" => "<no output>".to_string(),
        s => s.to_string(),
    }
}

/// Write `bytes` to a fresh temporary `.svg` file, removed when the handle drops.
pub fn stage_svg(bytes: &[u8]) -> SpriteResult<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("spritepress_")
        .suffix(".svg")
        .tempfile()
        .map_err(|e| SpriteError::conversion(format!("create temporary svg: {e}")))?;
    let written = file.write_all(bytes).and_then(|()| file.flush());
    if let Err(e) = written {
        return Err(SpriteError::io(file.path(), e));
    }
    Ok(file)
}

/// A temporary directory for renderer output.
pub fn scratch_dir() -> SpriteResult<tempfile::TempDir> {
    tempfile::Builder::new()
        .prefix("spritepress_")
        .tempdir()
        .map_err(|e| SpriteError::conversion(format!("create temporary directory: {e}")))
}

/// Path argument rendered as UTF-8 for `--flag=value` style options.
pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
