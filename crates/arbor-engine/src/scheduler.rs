//! Maps each phase of the four-tick cycle to its kernel.

use arbor_kernel::{Axis, GrowthResolver, Phase, PhaseKernel, SapExchange, Settle};

/// Owns one instance of every phase kernel.
///
/// | `tick % 4` | Phase | Kernel |
/// |---|---|---|
/// | 0 | [`Phase::SettleX`] | [`Settle`] along x |
/// | 1 | [`Phase::SettleY`] | [`Settle`] along y |
/// | 2 | [`Phase::SapExchange`] | [`SapExchange`] |
/// | 3 | [`Phase::Growth`] | [`GrowthResolver`] |
#[derive(Debug)]
pub struct TickScheduler {
    settle_x: Settle,
    settle_y: Settle,
    sap: SapExchange,
    growth: GrowthResolver,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self {
            settle_x: Settle::new(Axis::X),
            settle_y: Settle::new(Axis::Y),
            sap: SapExchange,
            growth: GrowthResolver,
        }
    }
}

impl TickScheduler {
    /// The kernel that runs `phase`.
    pub fn kernel_for(&self, phase: Phase) -> &dyn PhaseKernel {
        match phase {
            Phase::SettleX => &self.settle_x,
            Phase::SettleY => &self.settle_y,
            Phase::SapExchange => &self.sap,
            Phase::Growth => &self.growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::TickId;

    #[test]
    fn each_phase_gets_its_kernel() {
        let s = TickScheduler::default();
        let names: Vec<&str> = (0..4)
            .map(|t| s.kernel_for(Phase::of(TickId(t))).name())
            .collect();
        assert_eq!(names, ["settle_x", "settle_y", "sap_exchange", "growth"]);
    }
}
