//! External world classification consumed by the kernel.

use std::fmt;

/// The medium a grid position is made of.
///
/// Provided by the host world and never written by the automaton. Branches
/// grow into [`Air`](Material::Air), roots into [`Dirt`](Material::Dirt);
/// [`Water`](Material::Water) blocks growth in its neighbourhood and
/// [`Stone`](Material::Stone) is inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Material {
    /// Open space above ground.
    #[default]
    Air = 0,
    /// Substrate that holds diffusing resource.
    Dirt = 1,
    /// Liquid; growth never happens next to it.
    Water = 2,
    /// Inert solid.
    Stone = 3,
}

impl Material {
    /// Decode a material byte. Unknown codes are treated as inert stone.
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => Self::Air,
            1 => Self::Dirt,
            2 => Self::Water,
            _ => Self::Stone,
        }
    }

    /// Whether this is the diffusing substrate.
    pub fn is_substrate(self) -> bool {
        self == Self::Dirt
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Air => "air",
            Self::Dirt => "dirt",
            Self::Water => "water",
            Self::Stone => "stone",
        };
        f.write_str(name)
    }
}

/// Quantize a fertility sample in `[0, 1]` to a byte.
///
/// Out-of-range samples clamp. Non-finite samples must be rejected before
/// this point; NaN maps to zero.
pub fn quantize_fertility(f: f32) -> u8 {
    if f.is_nan() {
        return 0;
    }
    (f.clamp(0.0, 1.0) * 255.0).round() as u8
}
