use crate::constants::BOOKLET_FILE_SUFFIX;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Booklet job configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookletOptions {
    // Input
    pub input_file: PathBuf,

    // Output (defaults to `<stem>_booklet_landscape.pdf` next to the input)
    pub output_file: Option<PathBuf>,

    // Layout
    pub margins: Margins,
    pub pad_to_multiple_of_4: bool,
}

impl Default for BookletOptions {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            output_file: None,
            margins: Margins::default(),
            pad_to_multiple_of_4: true,
        }
    }
}

impl BookletOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| BookletError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BookletError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Where the booklet will be written
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output_file {
            return path.clone();
        }

        let stem = self
            .input_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "booklet".to_string());
        let extension = self
            .input_file
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pdf".to_string());

        self.input_file
            .with_file_name(format!("{stem}{BOOKLET_FILE_SUFFIX}.{extension}"))
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.input_file.as_os_str().is_empty() {
            return Err(BookletError::Config("No input file specified".to_string()));
        }

        let output = self.output_path();
        if output.file_name().is_none() {
            return Err(BookletError::Config(format!(
                "Output path {} does not name a file",
                output.display()
            )));
        }
        if output == self.input_file {
            return Err(BookletError::Config(
                "Output file must differ from the input file".to_string(),
            ));
        }

        self.margins.validate(SheetSize::A4_LANDSCAPE)
    }
}
