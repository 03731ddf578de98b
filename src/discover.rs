//! Input discovery and ordering.

use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::foundation::error::{SpriteError, SpriteResult};

/// Kinds of input the tool accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Svg,
    Png,
}

impl InputKind {
    /// Classify by extension, case-insensitively.
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("svg") {
            Some(Self::Svg)
        } else if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else {
            None
        }
    }
}

/// Order in which sprites are placed on the sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// By file name, then full path.
    #[default]
    Name,
    /// By modification time, oldest first; ties by name.
    Mtime,
    /// As given.
    Manual,
}

/// Collect `.svg`/`.png` inputs from a single file or a directory tree.
pub fn discover_inputs(path: &Path) -> SpriteResult<Vec<PathBuf>> {
    let meta = std::fs::metadata(path).map_err(|e| SpriteError::io(path, e))?;
    if meta.is_file() {
        if InputKind::of(path).is_none() {
            return Err(SpriteError::configuration(format!(
                "'{}' is not an .svg or .png file",
                path.display()
            )));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut out = Vec::new();
    walk(path, &mut out)?;
    if out.is_empty() {
        return Err(SpriteError::empty_input(format!(
            "no .svg or .png files under '{}'",
            path.display()
        )));
    }
    tracing::debug!(dir = %path.display(), found = out.len(), "discovered inputs");
    Ok(out)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> SpriteResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| SpriteError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SpriteError::io(dir, e))?;
        let path = entry.path();
        let ty = entry.file_type().map_err(|e| SpriteError::io(&path, e))?;
        if ty.is_dir() {
            walk(&path, out)?;
        } else if InputKind::of(&path).is_some() {
            out.push(path);
        }
    }
    Ok(())
}

/// Order `files` according to `mode`.
pub fn sort_inputs(mut files: Vec<PathBuf>, mode: SortMode) -> SpriteResult<Vec<PathBuf>> {
    match mode {
        SortMode::Manual => {}
        SortMode::Name => files.sort_by(|a, b| name_key(a).cmp(&name_key(b))),
        SortMode::Mtime => {
            let mut keyed = files
                .into_iter()
                .map(|p| {
                    let mtime = std::fs::metadata(&p)
                        .and_then(|m| m.modified())
                        .map_err(|e| SpriteError::io(&p, e))?;
                    Ok((mtime, p))
                })
                .collect::<SpriteResult<Vec<(SystemTime, PathBuf)>>>()?;
            keyed.sort_by(|(ta, a), (tb, b)| {
                ta.cmp(tb).then_with(|| name_key(a).cmp(&name_key(b)))
            });
            files = keyed.into_iter().map(|(_, p)| p).collect();
        }
    }
    Ok(files)
}

fn name_key(path: &Path) -> (String, &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (name, path)
}

/// Sprite name for an input: its file stem.
pub fn sprite_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
#[path = "../tests/unit/discover.rs"]
mod tests;
