use std::{collections::HashSet, path::Path};

use crate::{
    convert::backend::ensure_parent_dir,
    foundation::error::{SpriteError, SpriteResult},
};

/// Placement record of one tile on the sheet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpriteMetadata {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// 0-based placement ordinal.
    pub index: usize,
}

/// Index of a generated spritesheet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SheetMetadata {
    #[serde(rename = "width")]
    pub canvas_width: u32,
    #[serde(rename = "height")]
    pub canvas_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(rename = "cols")]
    pub columns: u32,
    pub rows: u32,
    pub padding: u32,
    pub sprites: Vec<SpriteMetadata>,
}

/// On-disk metadata format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaFormat {
    #[default]
    Json,
    Csv,
}

impl MetaFormat {
    /// Format implied by a file extension (`.json` / `.csv`, case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl SheetMetadata {
    pub fn to_json_pretty(&self) -> SpriteResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SpriteError::serde(format!("encode metadata: {e}")))
    }

    pub fn from_json(text: &str) -> SpriteResult<Self> {
        serde_json::from_str(text).map_err(|e| SpriteError::serde(format!("decode metadata: {e}")))
    }

    pub fn write_json(&self, path: &Path) -> SpriteResult<()> {
        let mut text = self.to_json_pretty()?;
        text.push('\n');
        write_text(path, &text)
    }

    pub fn read_json(path: &Path) -> SpriteResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SpriteError::io(path, e))?;
        Self::from_json(&text)
    }

    /// One row per sprite under a `name,x,y,width,height,index` header.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("name,x,y,width,height,index\n");
        for s in &self.sprites {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                csv_field(&s.name),
                s.x,
                s.y,
                s.width,
                s.height,
                s.index
            ));
        }
        out
    }

    pub fn write_csv(&self, path: &Path) -> SpriteResult<()> {
        write_text(path, &self.to_csv())
    }

    /// Write in `format`, creating the parent directory.
    pub fn write(&self, path: &Path, format: MetaFormat) -> SpriteResult<()> {
        tracing::debug!(
            path = %path.display(),
            ?format,
            sprites = self.sprites.len(),
            "writing metadata"
        );
        match format {
            MetaFormat::Json => self.write_json(path),
            MetaFormat::Csv => self.write_csv(path),
        }
    }

    /// Structural checks: positive sizes, named in-bounds sprites, unique indices.
    pub fn validate(&self) -> SpriteResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(invalid(format!(
                "invalid spritesheet dimensions: {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(invalid(format!(
                "invalid tile dimensions: {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(invalid(format!(
                "invalid grid dimensions: {}x{}",
                self.columns, self.rows
            )));
        }
        if self.sprites.is_empty() {
            return Err(invalid("no sprites in metadata".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.sprites.len());
        for (i, s) in self.sprites.iter().enumerate() {
            if s.name.is_empty() {
                return Err(invalid(format!("sprite {i} has empty name")));
            }
            if s.width == 0 || s.height == 0 {
                return Err(invalid(format!(
                    "sprite '{}' has invalid dimensions: {}x{}",
                    s.name, s.width, s.height
                )));
            }
            let right = u64::from(s.x) + u64::from(s.width);
            let bottom = u64::from(s.y) + u64::from(s.height);
            if right > u64::from(self.canvas_width) || bottom > u64::from(self.canvas_height) {
                return Err(invalid(format!(
                    "sprite '{}' extends beyond spritesheet bounds",
                    s.name
                )));
            }
            if !seen.insert(s.index) {
                return Err(invalid(format!("duplicate sprite index {}", s.index)));
            }
        }
        Ok(())
    }

    /// First sprite called `name`.
    pub fn sprite_by_name(&self, name: &str) -> Option<&SpriteMetadata> {
        self.sprites.iter().find(|s| s.name == name)
    }

    pub fn sprite_by_index(&self, index: usize) -> Option<&SpriteMetadata> {
        self.sprites.iter().find(|s| s.index == index)
    }
}

fn invalid(msg: String) -> SpriteError {
    SpriteError::serde(format!("invalid metadata: {msg}"))
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn write_text(path: &Path, text: &str) -> SpriteResult<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, text).map_err(|e| SpriteError::io(path, e))
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/metadata.rs"]
mod tests;
