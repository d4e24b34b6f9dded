/// Events emitted by actions and ticks.
/// The presentation layer consumes these for messages and sound;
/// the loop uses `changes_points` to decide when to persist.

use crate::domain::ore::OreColor;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    OreMined { color: OreColor, value: u32, x: i64, y: i64 },
    NothingToMine,
    TilePlaced { x: i64, y: i64 },
    NotEnoughPoints { have: u64, need: u64 },
    HomeRequested,
}

impl GameEvent {
    pub fn changes_points(&self) -> bool {
        matches!(self, GameEvent::OreMined { .. } | GameEvent::TilePlaced { .. })
    }
}
