// Build report: what a house build did and what it had to give up on.
//
// Geometry ambiguity and rejected placements never abort a build; the
// feature in question is simply left out. They must not vanish without a
// trace either, so every one of them becomes a `BuildEvent` here (and a
// `tracing` line at the point it happens). Counters summarise the rest.
//
// Events are appended in build order, so two builds from the same seed into
// the same world produce identical reports.

use crate::types::VoxelCoord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The decorative or navigational feature an event concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    Window,
    Door,
    Shutter,
    Stud,
}

/// Something the build skipped, and why.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildEventKind {
    /// The outer-wall search found no exterior side.
    NoOuterWall { feature: Feature },
    /// No height near the wall had exactly two open sides.
    NoAccessHeight,
    /// The inside of a door was walled off, even one block up.
    DoorBlocked,
    /// The world store refused every variant of a block.
    PlacementRejected { block: String, reason: String },
}

/// One entry in the build log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEvent {
    pub floor: usize,
    pub coord: VoxelCoord,
    pub kind: BuildEventKind,
}

impl fmt::Display for BuildEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "floor {} at {}: ", self.floor, self.coord)?;
        match &self.kind {
            BuildEventKind::NoOuterWall { feature } => {
                write!(f, "{feature:?} skipped, no outer wall found")
            }
            BuildEventKind::NoAccessHeight => write!(f, "door skipped, no access height"),
            BuildEventKind::DoorBlocked => write!(f, "door skipped, interior blocked"),
            BuildEventKind::PlacementRejected { block, reason } => {
                write!(f, "{block} rejected: {reason}")
            }
        }
    }
}

/// Summary of a finished (or aborted) build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub floors: usize,
    pub blocks_placed: u64,
    pub blocks_rejected: u64,
    pub windows: usize,
    pub doors: usize,
    pub shutters: usize,
    pub studs: usize,
    pub events: Vec<BuildEvent>,
}

impl BuildReport {
    pub fn record(&mut self, floor: usize, coord: VoxelCoord, kind: BuildEventKind) {
        self.events.push(BuildEvent { floor, coord, kind });
    }

    /// Number of features skipped because the geometry was ambiguous.
    pub fn ambiguities(&self) -> usize {
        self.events
            .iter()
            .filter(|e| !matches!(e.kind, BuildEventKind::PlacementRejected { .. }))
            .count()
    }

    pub fn count(&self, pred: impl Fn(&BuildEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
