//! Display configuration types and builder

use crate::command::Vcom;
pub use crate::error::{BuilderError, MAX_LINES};

/// Physical panel dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Pixels per line
    pub width: u16,
    /// Number of lines
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width or height is zero
    /// - width % 8 != 0 or height % 8 != 0 (must be byte-aligned for memory)
    /// - height > MAX_LINES (line addresses are a single byte)
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || !width.is_multiple_of(8) {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        if height == 0 || !height.is_multiple_of(8) || height > MAX_LINES {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Re-check dimensions that may have been built field by field
    ///
    /// # Errors
    ///
    /// Same conditions as [`new`](Self::new).
    pub fn validate(self) -> Result<Self, BuilderError> {
        Self::new(self.width, self.height)
    }

    /// Calculate required buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        (self.width as usize * self.height as usize) / 8
    }

    /// Bytes of pixel data per line
    pub fn line_bytes(&self) -> usize {
        self.width as usize / 8
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Physical display dimensions
    pub dimensions: Dimensions,
    /// Rotation applied to pixel writes
    pub rotation: Rotation,
    /// VCOM level used by the first transaction
    pub initial_vcom: Vcom,
}

impl Config {
    /// Get the rotated dimensions based on rotation setting
    pub fn rotated_dimensions(&self) -> Dimensions {
        match self.rotation {
            Rotation::Rotate0 | Rotation::Rotate180 => self.dimensions,
            Rotation::Rotate90 | Rotation::Rotate270 => Dimensions {
                width: self.dimensions.height,
                height: self.dimensions.width,
            },
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use sharpmem::{Builder, Dimensions, Rotation};
///
/// let dims = match Dimensions::new(128, 128) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).rotation(Rotation::Rotate180).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// Display rotation
    rotation: Rotation,
    /// VCOM level of the first transaction
    initial_vcom: Vcom,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the VCOM level of the first transaction
    ///
    /// Defaults to [`Vcom::High`].
    pub fn initial_vcom(mut self, vcom: Vcom) -> Self {
        self.initial_vcom = vcom;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set,
    /// `BuilderError::InvalidDimensions` if they fail validation
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        Ok(Config {
            dimensions: dimensions.validate()?,
            rotation: self.rotation,
            initial_vcom: self.initial_vcom,
        })
    }
}
