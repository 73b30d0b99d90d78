//! Growth resolution: at most one birth per empty cell.
//!
//! Sources never write. Instead every unoccupied candidate re-derives what
//! each occupied neighbour would propose this epoch and keeps the proposals
//! that land on it. Because every random choice is keyed on the source's
//! position, all candidates around a source agree on its proposals. The
//! candidate is born only if exactly one proposal survives the gates:
//!
//! 1. the proposal's role matches the candidate's medium (air → branch,
//!    dirt → root) and no water touches the candidate;
//! 2. the proposal's step lands on the candidate;
//! 3. the proposed child passes [`is_child_of`] against the source;
//! 4. the occlusion cone ahead of the candidate is clear;
//! 5. source plus candidate resource covers the creation cost.
//!
//! The candidate pays. Since the source holds at most the storable
//! maximum, passing gate 5 keeps the newborn at or above the minimum.

use arbor_core::{Cell, Heading, LineError, Material, Role};
use arbor_space::{Offset, Pos};
use smallvec::SmallVec;

use crate::context::{CellOutcome, PhaseContext, PhaseTally};
use crate::hash::{Draw, Salt};
use crate::kernel::PhaseKernel;
use crate::params::CHANCE_ONE;
use crate::stepper::{advance, compass_unit};
use crate::topology::{children_of, get_parent, is_child_of};

/// Which rule produced a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProposalKind {
    /// Continue along the (possibly steered) heading.
    Main,
    /// Fork off at an angle from a tip.
    Side,
    /// A branch sending a root backward into dirt.
    RootSeed,
}

/// A child some source would create this epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proposal {
    /// Which rule produced it.
    pub kind: ProposalKind,
    /// The child's role.
    pub role: Role,
    /// The child's heading.
    pub heading: Heading,
    /// Offset from the source to the child.
    pub step: Offset,
    /// The child's stored line error.
    pub error: LineError,
    /// The child's starting inhibition.
    pub inhibition: u8,
}

impl Proposal {
    /// The cell this proposal would write, before costs.
    pub fn child(&self, source: &Cell, candidate: &Cell) -> Cell {
        Cell {
            lineage: source.lineage,
            origin: false,
            role: self.role,
            heading: self.heading,
            line_error: self.error,
            inhibition: self.inhibition,
            resource: candidate.resource,
        }
    }
}

/// Where a source sits in its structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SourceShape {
    /// No same-role child yet: the source may still extend.
    growing: bool,
    /// Exactly one same-role neighbour: the end of a chain, free to steer
    /// and fork.
    tip: bool,
}

fn shape(ctx: &PhaseContext<'_>, index: usize, source: &Cell) -> SourceShape {
    let growing = !children_of(ctx, index)
        .iter()
        .any(|child| ctx.cell(child.index).is_role(source.role));
    let same_role = ctx
        .grid
        .neighbours(ctx.pos(index))
        .iter()
        .filter(|nb| ctx.cell(nb.index).is_role(source.role))
        .count();
    SourceShape {
        growing,
        tip: same_role == 1,
    }
}

/// Heading after the steering draw for a tip.
fn steer(ctx: &PhaseContext<'_>, pos: Pos, source: &Cell, draw: &Draw) -> Heading {
    let ahead = pos + advance(source.heading, source.line_error).offset;
    let blocked = !ctx.grid.contains(ahead)
        || ctx.cell(ctx.grid.clamped_index(ahead)).is_occupied();
    let chance = if blocked {
        ctx.params.turn_chance_blocked
    } else {
        ctx.params.turn_chance
    };
    if !draw.chance(Salt::TurnChance, chance) {
        return source.heading;
    }
    let magnitude = draw.range(Salt::TurnMagnitude, 1, ctx.params.max_turn) as i8;
    source
        .heading
        .rotate(draw.sign(Salt::TurnSign) * magnitude)
}

/// Side-branch probability per [`CHANCE_ONE`] for a source.
fn branch_chance(ctx: &PhaseContext<'_>, source_index: usize, source: &Cell) -> u32 {
    let fertility = ctx.fertility(source_index) as u64;
    let mut p = ctx.params.branch_chance as u64 * fertility / 255;
    if ctx.features.inhibition {
        let free = 255 - source.inhibition as u64;
        p = p * free * free / (255 * 255);
    }
    p.min(CHANCE_ONE as u64) as u32
}

/// Every child the source at `index` would propose this epoch.
pub fn proposals_from(ctx: &PhaseContext<'_>, index: usize) -> SmallVec<[Proposal; 3]> {
    let mut out = SmallVec::new();
    let source = ctx.cell(index);
    if !source.is_occupied() {
        return out;
    }
    let pos = ctx.pos(index);
    let draw = Draw {
        pos,
        role: source.role,
        epoch: ctx.tick.epoch(),
    };
    let shape = shape(ctx, index, &source);

    if shape.growing {
        let heading = if shape.tip && ctx.features.steering {
            steer(ctx, pos, &source, &draw)
        } else {
            source.heading
        };
        let main = advance(heading, source.line_error);
        out.push(Proposal {
            kind: ProposalKind::Main,
            role: source.role,
            heading,
            step: main.offset,
            error: main.error,
            inhibition: source.inhibition,
        });

        let main_target_free = ctx
            .grid
            .index(pos + main.offset)
            .is_some_and(|i| !ctx.cell(i).is_occupied());
        if shape.tip
            && ctx.features.branching
            && main_target_free
            && get_parent(ctx, index).parent().is_some()
            && draw.chance(Salt::BranchChance, branch_chance(ctx, index, &source))
        {
            let angle = draw.range(
                Salt::BranchAngle,
                ctx.params.branch_angle_min,
                ctx.params.branch_angle_max,
            ) as i8;
            let side_heading = heading.rotate(draw.sign(Salt::BranchSign) * angle);
            let side = advance(side_heading, source.line_error);
            if side.offset != main.offset {
                out.push(Proposal {
                    kind: ProposalKind::Side,
                    role: source.role,
                    heading: side_heading,
                    step: side.offset,
                    error: side.error,
                    inhibition: if ctx.features.inhibition { u8::MAX } else { 0 },
                });
            }
        }
    }

    if source.role == Role::Branch {
        let parent_is_root = get_parent(ctx, index)
            .parent()
            .is_some_and(|p| ctx.cell(p.index).role == Role::Root);
        if !parent_is_root {
            let heading = source.heading.opposite();
            let seed = advance(heading, source.line_error);
            out.push(Proposal {
                kind: ProposalKind::RootSeed,
                role: Role::Root,
                heading,
                step: seed.offset,
                error: seed.error,
                inhibition: 0,
            });
        }
    }
    out
}

/// Whether anything occupies the cone ahead of `candidate` along `heading`.
///
/// Samples clamp inward; samples landing on the candidate or the source
/// are skipped.
pub fn occluded(
    ctx: &PhaseContext<'_>,
    candidate: Pos,
    source: Pos,
    heading: Heading,
) -> bool {
    let forward = compass_unit(heading);
    let lateral = Offset::new(forward.dy, -forward.dx);
    let candidate_index = ctx.grid.clamped_index(candidate);
    let source_index = ctx.grid.clamped_index(source);
    for d in 1..=ctx.params.occlusion_depth as i32 {
        let half = d / 2;
        for k in -half..=half {
            let sample = ctx.grid.clamped_index(candidate + forward * d + lateral * k);
            if sample == candidate_index || sample == source_index {
                continue;
            }
            if ctx.cell(sample).is_occupied() {
                return true;
            }
        }
    }
    false
}

/// The growth phase kernel.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrowthResolver;

impl GrowthResolver {
    fn target_role(material: Material) -> Option<Role> {
        match material {
            Material::Air => Some(Role::Branch),
            Material::Dirt => Some(Role::Root),
            Material::Water | Material::Stone => None,
        }
    }
}

impl PhaseKernel for GrowthResolver {
    fn name(&self) -> &str {
        "growth"
    }

    fn evaluate(&self, ctx: &PhaseContext<'_>, index: usize) -> CellOutcome {
        let candidate = ctx.cell(index);
        if candidate.is_occupied() {
            return CellOutcome::unchanged(candidate);
        }
        let Some(role) = Self::target_role(ctx.material(index)) else {
            return CellOutcome::unchanged(candidate);
        };
        let pos = ctx.pos(index);
        let neighbours = ctx.grid.neighbours(pos);
        if neighbours
            .iter()
            .any(|nb| ctx.material(nb.index) == Material::Water)
        {
            return CellOutcome::unchanged(candidate);
        }

        let cost = ctx.params.cost(role) as i32;
        let mut tally = PhaseTally::default();
        let mut survivors = 0u32;
        let mut winner: Option<Cell> = None;

        for nb in neighbours.iter().filter(|nb| ctx.cell(nb.index).is_occupied()) {
            let source = ctx.cell(nb.index);
            for proposal in proposals_from(ctx, nb.index) {
                if proposal.role != role || nb.pos + proposal.step != pos {
                    continue;
                }
                let child = proposal.child(&source, &candidate);
                if !is_child_of(&child, pos, &source, nb.pos) {
                    continue;
                }
                if occluded(ctx, pos, nb.pos, proposal.heading) {
                    continue;
                }
                if (source.resource as i32 + candidate.resource as i32) < cost {
                    tally.starved_claims += 1;
                    continue;
                }
                survivors += 1;
                winner = Some(child);
            }
        }

        match (survivors, winner) {
            (1, Some(child)) => {
                let (born, saturated) = child.with_resource(candidate.resource as i32 - cost);
                tally.births = 1;
                tally.cost_charged = candidate.resource as i64 - born.resource as i64;
                tally.saturated_writes += saturated as u32;
                CellOutcome { cell: born, tally }
            }
            (0, _) => CellOutcome {
                cell: candidate,
                tally,
            },
            _ => {
                tally.contested_claims = 1;
                CellOutcome {
                    cell: candidate,
                    tally,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Features;
    use crate::testing::Scene;
    use crate::topology::ParentLookup;

    /// A two-cell vertical stem: origin at (x, y-1), tip at (x, y).
    fn stem(s: &mut Scene, x: i32, y: i32, lineage: u8, res: i16) {
        s.plant(x, y - 1, lineage, Role::Branch, Heading::UP, res);
        s.grow(x, y, lineage, Role::Branch, Heading::UP, LineError::ZERO, res);
    }

    #[test]
    fn tip_extends_straight_up() {
        let mut s = Scene::air(7, 7);
        s.features = Features::NONE;
        stem(&mut s, 3, 2, 1, 40);
        let tally = s.run(&GrowthResolver);
        assert_eq!(tally.births, 1);
        assert_eq!(tally.cost_charged, 8);
        let child = s.cell(3, 3);
        assert!(child.is_occupied());
        assert_eq!(child.heading, Heading::UP);
        assert_eq!(child.resource, -8);
        assert!(!child.origin);
    }

    #[test]
    fn interior_cells_stop_growing() {
        let mut s = Scene::air(7, 7);
        s.features = Features::NONE;
        stem(&mut s, 3, 2, 1, 40);
        s.grow(3, 3, 1, Role::Branch, Heading::UP, LineError::ZERO, 40);
        // (3, 2) already has a branch child and must not propose.
        let ctx = s.ctx();
        let props = proposals_from(&ctx, s.index(3, 2));
        assert!(props.iter().all(|p| p.kind != ProposalKind::Main));
    }

    #[test]
    fn insufficient_resource_creates_nothing() {
        let mut s = Scene::air(7, 7);
        s.features = Features::NONE;
        stem(&mut s, 3, 2, 1, 3);
        let tally = s.run(&GrowthResolver);
        assert_eq!(tally.births, 0);
        assert_eq!(tally.starved_claims, 1);
        assert!(!s.cell(3, 3).is_occupied());
    }

    #[test]
    fn poorest_payable_candidate_lands_on_the_minimum() {
        let mut s = Scene::air(7, 7);
        s.features = Features::NONE;
        stem(&mut s, 3, 2, 1, 127);
        let target = s.index(3, 3);
        s.cells[target] = Cell::vacant(-119);
        let tally = s.run(&GrowthResolver);
        assert_eq!(tally.births, 1);
        assert_eq!(tally.cost_charged, 8);
        assert_eq!(tally.saturated_writes, 0);
        assert_eq!(s.cell(3, 3).resource, -127);

        // One unit poorer and the pair no longer covers the cost.
        let mut s = Scene::air(7, 7);
        s.features = Features::NONE;
        stem(&mut s, 3, 2, 1, 127);
        let target = s.index(3, 3);
        s.cells[target] = Cell::vacant(-120);
        let tally = s.run(&GrowthResolver);
        assert_eq!(tally.births, 0);
        assert_eq!(tally.starved_claims, 1);
    }

    #[test]
    fn water_blocks_growth() {
        let mut s = Scene::air(7, 7);
        s.features = Features::NONE;
        stem(&mut s, 3, 2, 1, 40);
        s.set_material(4, 4, Material::Water);
        s.run(&GrowthResolver);
        assert!(!s.cell(3, 3).is_occupied());
    }

    #[test]
    fn occupied_cone_blocks_growth() {
        let mut s = Scene::air(7, 7);
        s.features = Features::NONE;
        stem(&mut s, 3, 2, 1, 40);
        s.plant(4, 5, 9, Role::Branch, Heading::UP, 0);
        s.run(&GrowthResolver);
        assert!(!s.cell(3, 3).is_occupied());
    }

    #[test]
    fn cone_samples_skip_candidate_and_source() {
        let mut s = Scene::air(3, 3);
        s.plant(1, 2, 1, Role::Branch, Heading::UP, 0);
        // Every sample ahead of (1, 1) clamps onto the top row, which holds
        // only the source.
        assert!(!occluded(&s.ctx(), Pos::new(1, 1), Pos::new(1, 2), Heading::UP));
        s.plant(0, 2, 2, Role::Branch, Heading::UP, 0);
        assert!(occluded(&s.ctx(), Pos::new(1, 1), Pos::new(1, 2), Heading::UP));
    }

    #[test]
    fn stone_is_never_a_candidate() {
        let mut s = Scene::air(7, 7);
        s.features = Features::NONE;
        stem(&mut s, 3, 2, 1, 40);
        s.set_material(3, 3, Material::Stone);
        let tally = s.run(&GrowthResolver);
        assert_eq!(tally.births, 0);
    }

    #[test]
    fn branch_seeds_root_into_dirt() {
        let mut s = Scene::with_ground(7, 7, 2);
        s.features = Features::NONE;
        s.plant(3, 3, 1, Role::Branch, Heading::UP, 40);
        s.run(&GrowthResolver);
        let root = s.cell(3, 2);
        assert!(root.is_role(Role::Root));
        assert_eq!(root.heading, Heading::DOWN);
        assert_eq!(root.resource, -6);
        let ctx = s.ctx();
        assert!(matches!(
            get_parent(&ctx, s.index(3, 2)),
            ParentLookup::Found(n) if n.pos == Pos::new(3, 3)
        ));
        assert_eq!(get_parent(&ctx, s.index(3, 3)), ParentLookup::Origin);
    }

    #[test]
    fn roots_extend_downward() {
        let mut s = Scene::with_ground(7, 7, 4);
        s.features = Features::NONE;
        s.plant(3, 5, 1, Role::Branch, Heading::UP, 40);
        s.grow(3, 4, 1, Role::Root, Heading::DOWN, LineError::ZERO, 40);
        s.run(&GrowthResolver);
        assert!(s.cell(3, 3).is_role(Role::Root));
    }

    #[test]
    fn blocked_tip_steers_away() {
        let mut s = Scene::air(9, 9);
        s.features = Features {
            steering: true,
            ..Features::NONE
        };
        s.params.turn_chance_blocked = CHANCE_ONE;
        stem(&mut s, 4, 3, 1, 40);
        // Obstacle straight ahead of the tip. A root, so the tip still
        // counts only its parent as a same-role neighbour.
        s.plant(4, 4, 7, Role::Root, Heading::UP, 0);
        let ctx = s.ctx();
        let props = proposals_from(&ctx, s.index(4, 3));
        let main = props.iter().find(|p| p.kind == ProposalKind::Main).unwrap();
        assert_ne!(main.heading, Heading::UP);
        let turned = main.heading.bucket();
        assert!(matches!(turned, 1 | 2 | 30 | 31), "heading {turned}");
    }

    #[test]
    fn side_branch_links_back_to_source() {
        let mut s = Scene::air(12, 12);
        s.features = Features {
            branching: true,
            inhibition: true,
            steering: false,
        };
        s.params.branch_chance = CHANCE_ONE;
        s.params.branch_angle_min = 6;
        s.params.branch_angle_max = 8;
        stem(&mut s, 5, 5, 1, 40);
        let tally = s.run(&GrowthResolver);
        assert_eq!(tally.births, 2);

        let side = [Pos::new(4, 5), Pos::new(6, 5)]
            .into_iter()
            .find(|p| s.cell(p.x, p.y).is_occupied())
            .unwrap();
        let child = s.cell(side.x, side.y);
        assert_eq!(child.inhibition, u8::MAX);
        assert!(is_child_of(&child, side, &s.cell(5, 5), Pos::new(5, 5)));
        assert!(s.cell(5, 6).is_occupied());
    }

    #[test]
    fn both_arms_of_a_fork_keep_growing() {
        let mut s = Scene::air(12, 12);
        s.features = Features {
            branching: true,
            inhibition: true,
            steering: false,
        };
        s.params.branch_chance = CHANCE_ONE;
        s.params.branch_angle_min = 6;
        s.params.branch_angle_max = 8;
        stem(&mut s, 5, 5, 1, 40);
        assert_eq!(s.run(&GrowthResolver).births, 2);
        let side = [Pos::new(4, 5), Pos::new(6, 5)]
            .into_iter()
            .find(|p| s.cell(p.x, p.y).is_occupied())
            .unwrap();

        s.features = Features::NONE;
        for c in s.cells.iter_mut().filter(|c| c.is_occupied()) {
            c.resource = 127;
        }
        let tally = s.run(&GrowthResolver);
        assert_eq!(tally.births, 2);

        let ctx = s.ctx();
        let main_children = children_of(&ctx, s.index(5, 6));
        assert_eq!(main_children.len(), 1);
        assert_eq!(main_children[0].pos, Pos::new(5, 7));
        assert_eq!(children_of(&ctx, s.index(side.x, side.y)).len(), 1);
        // The fork source itself does not extend again.
        assert_eq!(children_of(&ctx, s.index(5, 5)).len(), 2);
    }

    #[test]
    fn branch_with_only_a_root_child_still_extends() {
        let mut s = Scene::with_ground(7, 9, 2);
        s.features = Features::NONE;
        s.plant(3, 3, 1, Role::Branch, Heading::UP, 40);
        s.grow(3, 2, 1, Role::Root, Heading::DOWN, LineError::ZERO, 0);
        let ctx = s.ctx();
        let props = proposals_from(&ctx, s.index(3, 3));
        assert!(props.iter().any(|p| p.kind == ProposalKind::Main));
    }

    #[test]
    fn zero_fertility_suppresses_side_branches() {
        let mut s = Scene::air(12, 12);
        s.features = Features {
            branching: true,
            inhibition: true,
            steering: false,
        };
        s.params.branch_chance = CHANCE_ONE;
        s.fertility.iter_mut().for_each(|f| *f = 0);
        stem(&mut s, 5, 5, 1, 40);
        let tally = s.run(&GrowthResolver);
        assert_eq!(tally.births, 1);
    }

    #[test]
    fn full_inhibition_suppresses_side_branches() {
        let mut s = Scene::air(12, 12);
        s.features = Features {
            branching: true,
            inhibition: true,
            steering: false,
        };
        s.params.branch_chance = CHANCE_ONE;
        stem(&mut s, 5, 5, 1, 40);
        let tip = s.index(5, 5);
        s.cells[tip].inhibition = u8::MAX;
        let ctx = s.ctx();
        assert_eq!(branch_chance(&ctx, tip, &s.cells[tip]), 0);
    }
}
