/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

use config::GameConfig;
use domain::input::{Action, DirectionSet, FrameInput};
use sim::event::GameEvent;
use sim::save::{self, PointsStore};
use sim::spawn;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

fn main() {
    let config = GameConfig::load();
    init_logging(&save::resolve(&config.log_file));
    for w in &config.warnings {
        eprintln!("Warning: {w}");
        log::warn!("config: {w}");
    }

    let store = PointsStore::new(save::resolve(&config.points_file));
    let points = store.load();
    log::info!("points file {} → {} points", store.path().display(), points);

    let mut world = spawn::new_session(
        &config.world,
        config.display.cell_units,
        points,
        &mut rand::thread_rng(),
    );

    let mut renderer = Renderer::new();
    let enhanced_keys = match renderer.init() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &store, &config, enhanced_keys);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    store.save_if_changed(points, world.points);

    if let Err(e) = result {
        log::error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Orefield!");
    println!("Points: {}  (builds placed this session: {})", world.points, world.builds.len());
}

/// Log to a file: the terminal belongs to the renderer.
/// Filter defaults to `info`, `RUST_LOG` overrides.
fn init_logging(path: &Path) {
    let file = match File::create(path) {
        Ok(f) => f,
        Err(_) => return,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .init();
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    store: &PointsStore,
    config: &GameConfig,
    enhanced_keys: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced_keys;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad connected");
    }

    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);
    let frame_sleep = Duration::from_millis(config.timing.frame_ms);
    let mut last_tick = Instant::now();
    let mut pending: Vec<Action> = Vec::new();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        // Presses are queued so none is lost between ticks.
        pending.extend(kb.pressed_actions());
        pending.extend(gp.pressed_actions());
        let held: DirectionSet = kb.held_directions().iter().chain(gp.held_directions().iter()).collect();

        if last_tick.elapsed() >= tick_rate {
            let input = FrameInput { held, actions: std::mem::take(&mut pending) };
            let events = step::step(world, &input);
            sound::play_events(sound, &events);

            if events.iter().any(GameEvent::changes_points) {
                store.save(world.points);
            }
            if events.contains(&GameEvent::HomeRequested) {
                log::info!("home requested, leaving with {} points", world.points);
                break;
            }

            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(frame_sleep);
    }

    Ok(())
}
