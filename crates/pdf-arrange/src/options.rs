use crate::types::*;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a page's own `/Rotate` combines with the rotation chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationMode {
    /// Add the user rotation to the rotation already stored in the source
    #[default]
    Relative,
    /// Replace the source rotation with the user rotation
    Absolute,
}

impl RotationMode {
    /// Rotation written to the output page for a source page rotated by
    /// `source` and a user rotation of `user`
    pub fn effective(self, source: Rotation, user: Rotation) -> Rotation {
        match self {
            RotationMode::Relative => source.compose(user),
            RotationMode::Absolute => user,
        }
    }

    /// Extra rotation for a renderer that already applies the page's own
    /// `/Rotate`, so the preview shows the `effective` rotation
    pub fn preview(self, source: Rotation, user: Rotation) -> Rotation {
        match self {
            RotationMode::Relative => user,
            RotationMode::Absolute => user.compose(source.inverse()),
        }
    }
}

/// Settings for arranging and exporting documents
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArrangeOptions {
    /// Width in pixels requested from the preview renderer
    pub thumbnail_width: u32,
    /// Upper bound on rendered thumbnails kept in memory
    pub max_cached_thumbnails: usize,
    /// Appended to the input file stem when no output path is given
    pub output_suffix: String,
    pub rotation_mode: RotationMode,
}

impl Default for ArrangeOptions {
    fn default() -> Self {
        Self {
            thumbnail_width: 180,
            max_cached_thumbnails: 200,
            output_suffix: "_arranged".to_string(),
            rotation_mode: RotationMode::Relative,
        }
    }
}

impl ArrangeOptions {
    pub const MIN_THUMBNAIL_WIDTH: u32 = 32;
    pub const MAX_THUMBNAIL_WIDTH: u32 = 2048;

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ArrangeError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ArrangeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_THUMBNAIL_WIDTH..=Self::MAX_THUMBNAIL_WIDTH).contains(&self.thumbnail_width)
        {
            return Err(ArrangeError::Config(format!(
                "Thumbnail width must be between {} and {} pixels",
                Self::MIN_THUMBNAIL_WIDTH,
                Self::MAX_THUMBNAIL_WIDTH
            )));
        }

        if self.max_cached_thumbnails == 0 {
            return Err(ArrangeError::Config(
                "Thumbnail cache must hold at least one page".to_string(),
            ));
        }

        if self.output_suffix.is_empty() {
            return Err(ArrangeError::Config(
                "Output suffix must not be empty (the input would be overwritten)".to_string(),
            ));
        }

        if self.output_suffix.contains(['/', '\\']) {
            return Err(ArrangeError::Config(
                "Output suffix must not contain path separators".to_string(),
            ));
        }

        Ok(())
    }

    /// `<dir>/<stem><suffix>.pdf` for the given input path
    pub fn default_output_path(&self, input: impl AsRef<Path>) -> PathBuf {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        input.with_file_name(format!("{}{}.pdf", stem, self.output_suffix))
    }
}
