/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete.
/// Problems found while loading are collected in `warnings` so they can be
/// reported once the logger is up.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::ore::OreColor;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub world: WorldRules,
    pub timing: TimingConfig,
    pub display: DisplayConfig,
    pub gamepad: GamepadConfig,
    pub points_file: PathBuf,
    pub log_file: PathBuf,
    pub warnings: Vec<String>,
}

/// Game rules consumed by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldRules {
    pub ore_count: usize,
    pub spawn_extent: i64,
    pub tile_size: i64,       // sprite edge and mine tolerance
    pub move_distance: i64,
    pub build_cost: u64,
    pub colors: Vec<OreColor>,
}

impl Default for WorldRules {
    fn default() -> Self {
        WorldRules {
            ore_count: default_ore_count(),
            spawn_extent: default_spawn_extent(),
            tile_size: default_tile_size(),
            move_distance: default_move_distance(),
            build_cost: default_build_cost(),
            colors: OreColor::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub frame_ms: u64,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub cell_units: i64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub mine: Vec<String>,
    pub build: Vec<String>,
    pub home: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_ore_count")]
    ore_count: usize,
    #[serde(default = "default_spawn_extent")]
    spawn_extent: i64,
    #[serde(default = "default_tile_size")]
    tile_size: i64,
    #[serde(default = "default_move_distance")]
    move_distance: i64,
    #[serde(default = "default_build_cost")]
    build_cost: u64,
    #[serde(default = "default_colors")]
    colors: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_cell_units")]
    cell_units: i64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_mine")]
    mine: Vec<String>,
    #[serde(default = "default_pad_build")]
    build: Vec<String>,
    #[serde(default = "default_pad_home")]
    home: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_points_file")]
    points_file: String,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_ore_count() -> usize { 50 }
fn default_spawn_extent() -> i64 { 1000 }
fn default_tile_size() -> i64 { 30 }
fn default_move_distance() -> i64 { 10 }
fn default_build_cost() -> u64 { 5 }
fn default_colors() -> Vec<String> {
    OreColor::ALL.iter().map(|c| c.name().to_string()).collect()
}

fn default_tick_rate() -> u64 { 50 }   // 20 Hz movement
fn default_frame_ms() -> u64 { 16 }    // ~60 fps redraw
fn default_cell_units() -> i64 { 10 }  // one move = one cell

fn default_pad_mine() -> Vec<String> { vec!["A".into()] }
fn default_pad_build() -> Vec<String> { vec!["B".into(), "X".into()] }
fn default_pad_home() -> Vec<String> { vec!["Select".into()] }

fn default_points_file() -> String { "points.txt".into() }
fn default_log_file() -> String { "orefield.log".into() }

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld {
            ore_count: default_ore_count(),
            spawn_extent: default_spawn_extent(),
            tile_size: default_tile_size(),
            move_distance: default_move_distance(),
            build_cost: default_build_cost(),
            colors: default_colors(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { cell_units: default_cell_units() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            mine: default_pad_mine(),
            build: default_pad_build(),
            home: default_pad_home(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            points_file: default_points_file(),
            log_file: default_log_file(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, CWD, then data directories.
    /// Missing file or missing keys fall back to defaults.
    pub fn load() -> Self {
        let mut warnings = vec![];
        let toml_cfg = load_toml(&candidate_dirs(), &mut warnings);
        Self::from_toml(toml_cfg, warnings)
    }

    /// Build a config from TOML text. Used by `load` and by tests.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, vec![]))
    }

    fn from_toml(t: TomlConfig, mut warnings: Vec<String>) -> Self {
        let mut colors: Vec<OreColor> = vec![];
        for name in &t.world.colors {
            match OreColor::from_name(name) {
                Some(c) if !colors.contains(&c) => colors.push(c),
                Some(_) => {}
                None => warnings.push(format!("unknown ore colour {name:?} ignored")),
            }
        }
        if colors.is_empty() {
            colors = OreColor::ALL.to_vec();
        }

        GameConfig {
            world: WorldRules {
                ore_count: t.world.ore_count,
                spawn_extent: t.world.spawn_extent.saturating_abs(),
                tile_size: at_least_one(t.world.tile_size, "world.tile_size", &mut warnings),
                move_distance: t.world.move_distance,
                build_cost: t.world.build_cost,
                colors,
            },
            timing: TimingConfig {
                tick_rate_ms: at_least_one_ms(t.timing.tick_rate_ms, "timing.tick_rate_ms", &mut warnings),
                frame_ms: at_least_one_ms(t.timing.frame_ms, "timing.frame_ms", &mut warnings),
            },
            display: DisplayConfig {
                cell_units: at_least_one(t.display.cell_units, "display.cell_units", &mut warnings),
            },
            gamepad: GamepadConfig {
                mine: t.gamepad.mine,
                build: t.gamepad.build,
                home: t.gamepad.home,
            },
            points_file: PathBuf::from(t.general.points_file),
            log_file: PathBuf::from(t.general.log_file),
            warnings,
        }
    }
}

fn at_least_one(v: i64, key: &str, warnings: &mut Vec<String>) -> i64 {
    if v < 1 {
        warnings.push(format!("{key} = {v} is not positive, using 1"));
        1
    } else {
        v
    }
}

fn at_least_one_ms(v: u64, key: &str, warnings: &mut Vec<String>) -> u64 {
    if v == 0 {
        warnings.push(format!("{key} = 0, using 1"));
        1
    } else {
        v
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/orefield");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    let sys = PathBuf::from("/usr/share/orefield");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warnings.push(format!("{} parse error, using defaults: {e}", path.display()));
                    return TomlConfig::default();
                }
            },
            Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.world, WorldRules::default());
        assert_eq!(cfg.world.ore_count, 50);
        assert_eq!(cfg.world.tile_size, 30);
        assert_eq!(cfg.world.move_distance, 10);
        assert_eq!(cfg.world.build_cost, 5);
        assert_eq!(cfg.timing.tick_rate_ms, 50);
        assert_eq!(cfg.display.cell_units, 10);
        assert_eq!(cfg.points_file, PathBuf::from("points.txt"));
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[world]\nbuild_cost = 12\n\n[general]\npoints_file = \"/tmp/p.txt\"\n",
        )
        .unwrap();
        assert_eq!(cfg.world.build_cost, 12);
        assert_eq!(cfg.world.ore_count, 50);
        assert_eq!(cfg.points_file, PathBuf::from("/tmp/p.txt"));
        assert_eq!(cfg.log_file, PathBuf::from("orefield.log"));
    }

    #[test]
    fn unknown_colours_are_dropped_with_warning() {
        let cfg = GameConfig::from_toml_str("[world]\ncolors = [\"green\", \"gold\", \"green\"]\n").unwrap();
        assert_eq!(cfg.world.colors, vec![OreColor::Green]);
        assert_eq!(cfg.warnings.len(), 1);
        assert!(cfg.warnings[0].contains("gold"));
    }

    #[test]
    fn no_valid_colours_falls_back_to_all() {
        let cfg = GameConfig::from_toml_str("[world]\ncolors = []\n").unwrap();
        assert_eq!(cfg.world.colors, OreColor::ALL.to_vec());
    }

    #[test]
    fn non_positive_sizes_are_clamped() {
        let cfg = GameConfig::from_toml_str(
            "[world]\ntile_size = 0\nspawn_extent = -40\n[display]\ncell_units = -3\n[timing]\ntick_rate_ms = 0\n",
        )
        .unwrap();
        assert_eq!(cfg.world.tile_size, 1);
        assert_eq!(cfg.world.spawn_extent, 40);
        assert_eq!(cfg.display.cell_units, 1);
        assert_eq!(cfg.timing.tick_rate_ms, 1);
        assert_eq!(cfg.warnings.len(), 3);
        assert!(cfg.warnings.iter().any(|w| w.contains("timing.tick_rate_ms")));
    }

    #[test]
    fn zero_frame_time_warns() {
        let cfg = GameConfig::from_toml_str("[timing]\nframe_ms = 0\n").unwrap();
        assert_eq!(cfg.timing.frame_ms, 1);
        assert_eq!(cfg.timing.tick_rate_ms, 50);
        assert_eq!(cfg.warnings, vec!["timing.frame_ms = 0, using 1".to_string()]);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GameConfig::from_toml_str("[world\nore_count = ").is_err());
    }
}
