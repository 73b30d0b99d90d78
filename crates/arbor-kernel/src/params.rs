//! Tunable kernel constants and feature toggles.

use arbor_core::Role;

/// Fixed-point "certainty": probabilities are expressed per 65536.
pub const CHANCE_ONE: u32 = 1 << 16;

/// Integer parameters shared by every phase kernel.
///
/// Fractions (`*_frac`, `diffusion_rate`) are numerators over 256.
/// Chances are numerators over [`CHANCE_ONE`]. Angles are in heading
/// buckets (32 per turn).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelParams {
    /// Resource charged to the candidate cell when a branch is born.
    pub branch_cost: i16,
    /// Resource charged to the candidate cell when a root is born.
    pub root_cost: i16,
    /// Transport fraction when flow runs toward the canopy.
    pub transport_strong_frac: u8,
    /// Transport fraction when flow runs away from the canopy.
    pub transport_weak_frac: u8,
    /// Exchange fraction between paired substrate cells.
    pub diffusion_rate: u8,
    /// Resource a root draws from each qualifying substrate neighbour.
    pub sap_amount: i16,
    /// How far a substrate neighbour must exceed the root before sap flows.
    pub sap_threshold: i16,
    /// Per-phase inhibition decay for branches.
    pub branch_inhibition_decay: u8,
    /// Per-phase inhibition decay for roots.
    pub root_inhibition_decay: u8,
    /// Base side-branch chance before fertility and inhibition scaling.
    pub branch_chance: u32,
    /// Steering chance for a tip with a clear forward cell.
    pub turn_chance: u32,
    /// Steering chance for a tip whose forward cell is occupied or off-grid.
    pub turn_chance_blocked: u32,
    /// Largest steering rotation.
    pub max_turn: u8,
    /// Smallest side-branch angle.
    pub branch_angle_min: u8,
    /// Largest side-branch angle.
    pub branch_angle_max: u8,
    /// How many cells ahead the occlusion cone reaches.
    pub occlusion_depth: u8,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            branch_cost: 8,
            root_cost: 6,
            transport_strong_frac: 64,
            transport_weak_frac: 16,
            diffusion_rate: 64,
            sap_amount: 2,
            sap_threshold: 16,
            branch_inhibition_decay: 6,
            root_inhibition_decay: 12,
            branch_chance: 6000,
            turn_chance: 2500,
            turn_chance_blocked: 52000,
            max_turn: 2,
            branch_angle_min: 3,
            branch_angle_max: 6,
            occlusion_depth: 3,
        }
    }
}

impl KernelParams {
    /// Creation cost for `role`.
    pub fn cost(&self, role: Role) -> i16 {
        match role {
            Role::Branch => self.branch_cost,
            Role::Root => self.root_cost,
        }
    }

    /// Inhibition decay for `role`.
    pub fn inhibition_decay(&self, role: Role) -> u8 {
        match role {
            Role::Branch => self.branch_inhibition_decay,
            Role::Root => self.root_inhibition_decay,
        }
    }

    /// Check every parameter is in its supported range.
    pub fn validate(&self) -> Result<(), String> {
        for (name, cost) in [("branch_cost", self.branch_cost), ("root_cost", self.root_cost)] {
            if !(1..=127).contains(&cost) {
                return Err(format!("{name} must be in 1..=127, got {cost}"));
            }
        }
        for (name, frac) in [
            ("transport_strong_frac", self.transport_strong_frac),
            ("transport_weak_frac", self.transport_weak_frac),
            ("diffusion_rate", self.diffusion_rate),
        ] {
            if frac == 0 {
                return Err(format!("{name} must be non-zero"));
            }
        }
        if self.sap_amount < 1 {
            return Err(format!("sap_amount must be >= 1, got {}", self.sap_amount));
        }
        if (self.sap_threshold as i32) < 8 * self.sap_amount as i32 {
            return Err(format!(
                "sap_threshold ({}) must be at least 8 * sap_amount ({})",
                self.sap_threshold,
                8 * self.sap_amount as i32
            ));
        }
        for (name, chance) in [
            ("branch_chance", self.branch_chance),
            ("turn_chance", self.turn_chance),
            ("turn_chance_blocked", self.turn_chance_blocked),
        ] {
            if chance > CHANCE_ONE {
                return Err(format!("{name} must be <= {CHANCE_ONE}, got {chance}"));
            }
        }
        if !(1..=8).contains(&self.max_turn) {
            return Err(format!("max_turn must be in 1..=8, got {}", self.max_turn));
        }
        if self.branch_angle_min < 1
            || self.branch_angle_min > self.branch_angle_max
            || self.branch_angle_max > 15
        {
            return Err(format!(
                "branch angle range {}..={} must satisfy 1 <= min <= max <= 15",
                self.branch_angle_min, self.branch_angle_max
            ));
        }
        if self.occlusion_depth > 8 {
            return Err(format!(
                "occlusion_depth must be <= 8, got {}",
                self.occlusion_depth
            ));
        }
        Ok(())
    }
}

/// Host-controlled switches for optional behaviours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Features {
    /// Tips may spawn side branches.
    pub branching: bool,
    /// The inhibition field is maintained and suppresses branching.
    pub inhibition: bool,
    /// Tips may rotate their heading before continuing.
    pub steering: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            branching: true,
            inhibition: true,
            steering: true,
        }
    }
}

impl Features {
    /// Every optional behaviour disabled.
    pub const NONE: Features = Features {
        branching: false,
        inhibition: false,
        steering: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(KernelParams::default().validate(), Ok(()));
    }

    #[test]
    fn per_role_lookups() {
        let p = KernelParams::default();
        assert_eq!(p.cost(Role::Branch), 8);
        assert_eq!(p.cost(Role::Root), 6);
        assert_eq!(p.inhibition_decay(Role::Root), 12);
    }

    #[test]
    fn rejects_zero_cost() {
        let p = KernelParams {
            root_cost: 0,
            ..KernelParams::default()
        };
        assert!(p.validate().unwrap_err().contains("root_cost"));
    }

    #[test]
    fn rejects_low_sap_threshold() {
        let p = KernelParams {
            sap_amount: 3,
            sap_threshold: 20,
            ..KernelParams::default()
        };
        assert!(p.validate().unwrap_err().contains("sap_threshold"));
    }

    #[test]
    fn rejects_inverted_angle_range() {
        let p = KernelParams {
            branch_angle_min: 7,
            branch_angle_max: 4,
            ..KernelParams::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_chance_above_one() {
        let p = KernelParams {
            turn_chance_blocked: CHANCE_ONE + 1,
            ..KernelParams::default()
        };
        assert!(p.validate().unwrap_err().contains("turn_chance_blocked"));
    }

    #[test]
    fn certainty_is_allowed() {
        let p = KernelParams {
            branch_chance: CHANCE_ONE,
            ..KernelParams::default()
        };
        assert!(p.validate().is_ok());
    }
}
