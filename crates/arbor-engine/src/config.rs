//! World configuration, validation, and error types.
//!
//! [`WorldConfig`] is the builder-input for [`LockstepWorld`](crate::LockstepWorld).
//! [`validate()`](WorldConfig::validate) checks every structural invariant
//! up front so that stepping never has to.

use std::error::Error;
use std::fmt;

use arbor_core::{quantize_fertility, InputError, Material, TickId};
use arbor_kernel::{Features, KernelParams};
use arbor_space::{Grid2D, SpaceError};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`WorldConfig::validate()`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid dimensions are unusable.
    Space(SpaceError),
    /// A per-cell input buffer is malformed.
    Input(InputError),
    /// A kernel parameter is out of range.
    InvalidParams {
        /// Description of which parameter was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "space: {e}"),
            Self::Input(e) => write!(f, "input: {e}"),
            Self::InvalidParams { reason } => write!(f, "invalid kernel params: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::InvalidParams { .. } => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<InputError> for ConfigError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ── WorldConfig ────────────────────────────────────────────────────

/// Complete configuration for constructing a world.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Columns.
    pub width: u32,
    /// Rows (row 0 is the bottom).
    pub height: u32,
    /// Material per cell, row-major. Must hold `width * height` entries.
    pub materials: Vec<Material>,
    /// Fertility per cell in `[0, 1]`, row-major. Must hold
    /// `width * height` finite entries; values outside the range clamp.
    pub fertility: Vec<f32>,
    /// Kernel constants.
    pub params: KernelParams,
    /// Optional behaviours.
    pub features: Features,
    /// Tick counter at construction. Selects the first phase run.
    pub initial_tick: TickId,
}

impl WorldConfig {
    /// An all-air world with full fertility and default parameters.
    pub fn new(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            materials: vec![Material::Air; n],
            fertility: vec![1.0; n],
            params: KernelParams::default(),
            features: Features::default(),
            initial_tick: TickId(0),
        }
    }

    /// Fill every row at or below `surface` with dirt.
    pub fn with_ground(mut self, surface: u32) -> Self {
        let w = self.width as usize;
        for (i, m) in self.materials.iter_mut().enumerate() {
            if (i / w.max(1)) as u32 <= surface {
                *m = Material::Dirt;
            }
        }
        self
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = Grid2D::new(self.width, self.height)?;
        check_materials(&self.materials, grid.cell_count())?;
        check_fertility(&self.fertility, grid.cell_count())?;
        self.params
            .validate()
            .map_err(|reason| ConfigError::InvalidParams { reason })?;
        Ok(())
    }
}

pub(crate) fn check_materials(materials: &[Material], expected: usize) -> Result<(), InputError> {
    if materials.len() != expected {
        return Err(InputError::LengthMismatch {
            input: "materials",
            expected,
            actual: materials.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_fertility(fertility: &[f32], expected: usize) -> Result<(), InputError> {
    if fertility.len() != expected {
        return Err(InputError::LengthMismatch {
            input: "fertility",
            expected,
            actual: fertility.len(),
        });
    }
    if let Some((index, &value)) = fertility.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(InputError::NonFiniteFertility { index, value });
    }
    Ok(())
}

pub(crate) fn quantize_all(fertility: &[f32]) -> Vec<u8> {
    fertility.iter().map(|&f| quantize_fertility(f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_world_validates() {
        assert_eq!(WorldConfig::new(8, 6).validate(), Ok(()));
    }

    #[test]
    fn empty_grid_rejected() {
        assert_eq!(
            WorldConfig::new(0, 6).validate(),
            Err(ConfigError::Space(SpaceError::EmptyGrid))
        );
    }

    #[test]
    fn wrong_material_count_rejected() {
        let mut cfg = WorldConfig::new(4, 4);
        cfg.materials.pop();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Input(InputError::LengthMismatch {
                input: "materials",
                expected: 16,
                actual: 15
            }))
        ));
    }

    #[test]
    fn nan_fertility_rejected() {
        let mut cfg = WorldConfig::new(4, 4);
        cfg.fertility[5] = f32::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Input(InputError::NonFiniteFertility { index: 5, .. }))
        ));
    }

    #[test]
    fn bad_params_rejected() {
        let mut cfg = WorldConfig::new(4, 4);
        cfg.params.max_turn = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("max_turn"));
        assert!(err.source().is_none());
    }

    #[test]
    fn ground_fills_bottom_rows() {
        let cfg = WorldConfig::new(3, 4).with_ground(1);
        assert_eq!(cfg.materials[..6], [Material::Dirt; 6]);
        assert_eq!(cfg.materials[6..], [Material::Air; 6]);
    }

    #[test]
    fn error_source_chains() {
        let err = ConfigError::from(SpaceError::EmptyGrid);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "space: grid must have at least one cell");
    }
}
