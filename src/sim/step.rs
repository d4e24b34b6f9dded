/// Applying input to the world.
///
/// `apply_action` handles one mine/build/home press, `advance` applies
/// held directions for one movement tick. The loop queues presses and
/// hands both to `step` on each tick.
///
/// `apply_action` returns the events it produced. Nothing here fails.

use crate::domain::input::{Action, DirectionSet, FrameInput};
use super::event::GameEvent;
use super::world::{BuildOutcome, MineOutcome, WorldState};

/// Ticks a feedback message stays on screen (at 20 Hz ≈ 2 s).
const MESSAGE_TICKS: u32 = 40;

pub fn apply_action(world: &mut WorldState, action: Action) -> Vec<GameEvent> {
    match action {
        Action::Mine => {
            let tolerance = world.rules.tile_size;
            match world.mine(tolerance) {
                MineOutcome::Mined(ore) => {
                    log::debug!("mined {} ore at ({}, {}), points={}", ore.color.name(), ore.x, ore.y, world.points);
                    world.set_message(&format!("+{} {} ore", ore.value(), ore.color.name()), MESSAGE_TICKS);
                    vec![GameEvent::OreMined { color: ore.color, value: ore.value(), x: ore.x, y: ore.y }]
                }
                MineOutcome::Nothing => vec![GameEvent::NothingToMine],
            }
        }
        Action::Build => {
            let cost = world.rules.build_cost;
            match world.build(cost) {
                BuildOutcome::Built(tile) => {
                    log::debug!("built at ({}, {}), points={}", tile.x, tile.y, world.points);
                    world.set_message(&format!("Built for {} points", cost), MESSAGE_TICKS);
                    vec![GameEvent::TilePlaced { x: tile.x, y: tile.y }]
                }
                BuildOutcome::InsufficientPoints { have, need } => {
                    world.set_message(&format!("Need {} points to build (have {})", need, have), MESSAGE_TICKS);
                    vec![GameEvent::NotEnoughPoints { have, need }]
                }
            }
        }
        Action::Home => vec![GameEvent::HomeRequested],
    }
}

/// One movement tick: every held direction moves once.
pub fn advance(world: &mut WorldState, held: DirectionSet) {
    world.tick += 1;
    world.tick_message();

    let distance = world.rules.move_distance;
    for dir in held.iter() {
        world.move_by(dir, distance);
    }
}

/// Apply every queued action, then one movement tick.
pub fn step(world: &mut WorldState, input: &FrameInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for &action in &input.actions {
        events.extend(apply_action(world, action));
    }
    advance(world, input.held);
    events
}
