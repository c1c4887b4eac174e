//! Two-phase traversal protocol
//!
//! Root spine down, then each boundary spine down and back up (left, then
//! right), then the root spine back up.
//! Every up segment is its down segment reversed, so a child is always
//! folded before its parent
//! Six phase markers bracket the segments, always in the same order

use super::Key;

/// Which part of a route a step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spine {
    /// Root down to the LCA (shared by both boundaries)
    Root,

    /// Below the LCA's left child, toward the left boundary
    Left,

    /// Below the LCA's right child, toward the right boundary
    Right,
}

impl Spine {
    /// Every spine
    pub const ALL: [Spine; 3] = [Spine::Root, Spine::Left, Spine::Right];

    /// Spines below the LCA, in walk order
    pub const BRANCHES: [Spine; 2] = [Spine::Left, Spine::Right];
}

/// Phase marker passed to [`Walker::phase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Entering the root spine, top-down
    RootDown,
    /// Entering the left spine, top-down
    LeftDown,
    /// Retracing the left spine, bottom-up
    LeftUp,
    /// Entering the right spine, top-down
    RightDown,
    /// Retracing the right spine, bottom-up
    RightUp,
    /// Retracing the root spine, bottom-up
    RootUp,
}

impl Phase {
    /// Every walk emits exactly this sequence of phases.
    pub const ORDER: [Phase; 6] = [
        Phase::RootDown,
        Phase::LeftDown,
        Phase::LeftUp,
        Phase::RightDown,
        Phase::RightUp,
        Phase::RootUp,
    ];

    /// Down-pass phase for a spine
    pub fn down(spine: Spine) -> Self {
        match spine {
            Spine::Root => Phase::RootDown,
            Spine::Left => Phase::LeftDown,
            Spine::Right => Phase::RightDown,
        }
    }

    /// Up-pass phase for a spine
    pub fn up(spine: Spine) -> Self {
        match spine {
            Spine::Root => Phase::RootUp,
            Spine::Left => Phase::LeftUp,
            Spine::Right => Phase::RightUp,
        }
    }

    /// Spine this phase brackets
    pub fn spine(self) -> Spine {
        match self {
            Phase::RootDown | Phase::RootUp => Spine::Root,
            Phase::LeftDown | Phase::LeftUp => Spine::Left,
            Phase::RightDown | Phase::RightUp => Spine::Right,
        }
    }

    /// Whether this phase belongs to the down pass
    pub fn is_down(self) -> bool {
        matches!(self, Phase::RootDown | Phase::LeftDown | Phase::RightDown)
    }
}

/// One node visit of the down pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Node visited
    pub key: Key,

    /// Part of the minimal cover (otherwise pass-through)
    pub canonical: bool,

    /// Segment of the route
    pub spine: Spine,
}

impl Step {
    pub(crate) fn pass(key: Key, spine: Spine) -> Self {
        Self {
            key,
            canonical: false,
            spine,
        }
    }

    pub(crate) fn canonical(key: Key, spine: Spine) -> Self {
        Self {
            key,
            canonical: true,
            spine,
        }
    }
}

/// Callbacks driven by [`Route::walk`](super::Route::walk).
///
/// `down` lets a collaborator push state toward the leaves before `up` pulls
/// aggregated results back toward the root.
pub trait Walker {
    /// Node visited on the way down.
    fn down(&mut self, key: Key, canonical: bool);

    /// Node revisited on the way up.
    fn up(&mut self, key: Key, canonical: bool);

    /// Segment boundary.
    fn phase(&mut self, _phase: Phase) {}
}

impl<W: Walker + ?Sized> Walker for &mut W {
    fn down(&mut self, key: Key, canonical: bool) {
        (**self).down(key, canonical);
    }

    fn up(&mut self, key: Key, canonical: bool) {
        (**self).up(key, canonical);
    }

    fn phase(&mut self, phase: Phase) {
        (**self).phase(phase);
    }
}

/// Drive a walker over a down-pass sequence grouped by spine.
pub(crate) fn drive<W: Walker + ?Sized>(steps: &[Step], walker: &mut W) {
    descend(steps, Spine::Root, walker);
    for spine in Spine::BRANCHES {
        descend(steps, spine, walker);
        ascend(steps, spine, walker);
    }
    ascend(steps, Spine::Root, walker);
}

fn descend<W: Walker + ?Sized>(steps: &[Step], spine: Spine, walker: &mut W) {
    walker.phase(Phase::down(spine));
    for step in steps.iter().filter(|step| step.spine == spine) {
        walker.down(step.key, step.canonical);
    }
}

fn ascend<W: Walker + ?Sized>(steps: &[Step], spine: Spine, walker: &mut W) {
    walker.phase(Phase::up(spine));
    for step in steps.iter().rev().filter(|step| step.spine == spine) {
        walker.up(step.key, step.canonical);
    }
}
