/// WorldState: the complete state of a running session.
///
/// ## Coordinates
///
/// World space is unbounded, integer, with +y pointing up.
/// `offset` is both the player position and the camera centre.
/// Ore and build tiles are squares of `rules.tile_size` whose
/// `(x, y)` is the bottom-left corner.
///
/// ## Camera / Viewport
///
///   - `camera` maps world units to terminal cells (`cell_units` per cell)
///   - The viewport is always centred on `offset`; there is no dead zone
///     and no clamping since the world has no edges
///   - Renderer sets `view_w` / `view_h` from the terminal size

use crate::config::WorldRules;
use crate::domain::input::Direction;
use crate::domain::ore::{BuildTile, Ore};

/// Result of a mine attempt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MineOutcome {
    Mined(Ore),
    Nothing,
}

/// Result of a build attempt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BuildOutcome {
    Built(BuildTile),
    InsufficientPoints { have: u64, need: u64 },
}

/// Inclusive screen-cell rectangle produced by `Camera::project`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CellRect {
    pub col0: usize,
    pub row0: usize,
    pub col1: usize,
    pub row1: usize,
}

/// Camera: a viewport centred on the world offset.
#[derive(Clone, Debug)]
pub struct Camera {
    /// World units covered by one cell, on both axes.
    pub cell_units: i64,
    /// Number of cells visible horizontally
    pub view_w: usize,
    /// Number of cells visible vertically
    pub view_h: usize,
}

impl Camera {
    pub fn new(cell_units: i64) -> Self {
        Camera { cell_units: cell_units.max(1), view_w: 0, view_h: 0 }
    }

    fn centre(&self) -> (usize, usize) {
        (self.view_w / 2, self.view_h / 2)
    }

    /// Project a world square `[x, x+size) × [y, y+size)` onto screen cells,
    /// clipped to the viewport. `None` if entirely off-screen.
    pub fn project(&self, offset: (i64, i64), x: i64, y: i64, size: i64) -> Option<CellRect> {
        if self.view_w == 0 || self.view_h == 0 || size <= 0 {
            return None;
        }
        // i128 so an extreme offset cannot overflow the subtraction.
        let cu = self.cell_units as i128;
        let (cc, rc) = self.centre();
        let (cc, rc) = (cc as i128, rc as i128);
        let (dx, dy) = (x as i128 - offset.0 as i128, y as i128 - offset.1 as i128);
        let size = size as i128;

        let c0 = dx.div_euclid(cu) + cc;
        let c1 = (dx + size - 1).div_euclid(cu) + cc;
        // Screen rows grow downward: the top edge of the square is its highest y.
        let r0 = rc - (dy + size - 1).div_euclid(cu);
        let r1 = rc - dy.div_euclid(cu);

        let max_c = self.view_w as i128 - 1;
        let max_r = self.view_h as i128 - 1;
        if c1 < 0 || r1 < 0 || c0 > max_c || r0 > max_r {
            return None;
        }
        Some(CellRect {
            col0: c0.max(0) as usize,
            row0: r0.max(0) as usize,
            col1: c1.min(max_c) as usize,
            row1: r1.min(max_r) as usize,
        })
    }

    /// Cells of the central mine square: `tile_size` wide, centred on the view.
    pub fn mine_square(&self, tile_size: i64) -> Option<CellRect> {
        if self.view_w == 0 || self.view_h == 0 {
            return None;
        }
        // n cells per side; even widths extend one cell further left/up.
        let n = (tile_size / self.cell_units).max(1) as usize;
        let (cc, rc) = self.centre();
        let col0 = cc.saturating_sub(n / 2);
        let row0 = rc.saturating_sub(n / 2);
        Some(CellRect {
            col0,
            row0,
            col1: col0.saturating_add(n - 1).min(self.view_w - 1),
            row1: row0.saturating_add(n - 1).min(self.view_h - 1),
        })
    }
}

pub struct WorldState {
    // ── Entities ──
    pub ores: Vec<Ore>,
    pub builds: Vec<BuildTile>,

    // ── Player ──
    pub points: u64,
    pub offset: (i64, i64),

    // ── Rules ──
    pub rules: WorldRules,

    // ── Meta ──
    pub tick: u64,
    pub message: String,
    pub message_timer: u32,

    // ── Camera / Viewport ──
    pub camera: Camera,
}

// ── Construction ──

impl WorldState {
    pub fn new(rules: WorldRules, cell_units: i64) -> Self {
        WorldState {
            ores: vec![],
            builds: vec![],
            points: 0,
            offset: (0, 0),
            rules,
            tick: 0,
            message: String::new(),
            message_timer: 0,
            camera: Camera::new(cell_units),
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count down the message timer; clears the message when it expires.
    /// A timer of 0 with a message set means "sticky".
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

// ── Session operations ──

impl WorldState {
    /// Shift the offset by `distance` along `dir`. Unbounded.
    pub fn move_by(&mut self, dir: Direction, distance: i64) {
        let (dx, dy) = dir.delta(distance);
        self.offset.0 = self.offset.0.saturating_add(dx);
        self.offset.1 = self.offset.1.saturating_add(dy);
    }

    /// Mine the first ore (insertion order) within `tolerance` of the offset.
    pub fn mine(&mut self, tolerance: i64) -> MineOutcome {
        let (ox, oy) = self.offset;
        match self.ores.iter().position(|o| o.within(ox, oy, tolerance)) {
            Some(idx) => {
                let ore = self.ores.remove(idx);
                self.points = self.points.saturating_add(u64::from(ore.value()));
                MineOutcome::Mined(ore)
            }
            None => MineOutcome::Nothing,
        }
    }

    /// Spend `cost` points on a build tile at the offset.
    pub fn build(&mut self, cost: u64) -> BuildOutcome {
        if self.points < cost {
            return BuildOutcome::InsufficientPoints { have: self.points, need: cost };
        }
        self.points -= cost;
        let tile = BuildTile { x: self.offset.0, y: self.offset.1 };
        self.builds.push(tile);
        BuildOutcome::Built(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ore::OreColor;

    fn world() -> WorldState {
        WorldState::new(WorldRules::default(), 10)
    }

    // ── move_by ──

    #[test]
    fn moves_sum_as_vectors() {
        let mut w = world();
        w.move_by(Direction::Up, 10);
        w.move_by(Direction::Left, 10);
        assert_eq!(w.offset, (-10, 10));

        w.move_by(Direction::Right, 25);
        w.move_by(Direction::Down, 3);
        w.move_by(Direction::Down, 3);
        assert_eq!(w.offset, (15, 4));
    }

    #[test]
    fn offset_is_unbounded_and_never_panics() {
        let mut w = world();
        w.offset = (i64::MAX - 5, i64::MIN + 5);
        w.move_by(Direction::Right, 10);
        w.move_by(Direction::Down, 10);
        assert_eq!(w.offset, (i64::MAX, i64::MIN));
    }

    // ── mine ──

    #[test]
    fn mine_at_exact_position_takes_one_ore() {
        let mut w = world();
        w.ores.push(Ore::new(0, 0, OreColor::Purple));
        w.ores.push(Ore::new(500, 500, OreColor::Red));

        assert_eq!(w.mine(30), MineOutcome::Mined(Ore::new(0, 0, OreColor::Purple)));
        assert_eq!(w.points, 10);
        assert_eq!(w.ores.len(), 1);

        assert_eq!(w.mine(30), MineOutcome::Nothing);
        assert_eq!(w.points, 10);
        assert_eq!(w.ores, vec![Ore::new(500, 500, OreColor::Red)]);
    }

    #[test]
    fn mine_takes_first_in_insertion_order() {
        let mut w = world();
        w.ores.push(Ore::new(20, 0, OreColor::Red));
        w.ores.push(Ore::new(0, 0, OreColor::Purple));

        assert_eq!(w.mine(30), MineOutcome::Mined(Ore::new(20, 0, OreColor::Red)));
        assert_eq!(w.points, 1);
        assert_eq!(w.mine(30), MineOutcome::Mined(Ore::new(0, 0, OreColor::Purple)));
        assert_eq!(w.points, 11);
    }

    #[test]
    fn mine_respects_strict_tolerance() {
        let mut w = world();
        w.ores.push(Ore::new(30, 0, OreColor::Green));
        assert_eq!(w.mine(30), MineOutcome::Nothing);

        w.move_by(Direction::Right, 1);
        assert!(matches!(w.mine(30), MineOutcome::Mined(_)));
        assert_eq!(w.points, 5);
    }

    // ── build ──

    #[test]
    fn build_with_exact_balance() {
        let mut w = world();
        w.points = 5;
        w.offset = (40, -70);
        assert_eq!(w.build(5), BuildOutcome::Built(BuildTile { x: 40, y: -70 }));
        assert_eq!(w.points, 0);
        assert_eq!(w.builds, vec![BuildTile { x: 40, y: -70 }]);
    }

    #[test]
    fn build_without_funds_is_noop() {
        let mut w = world();
        w.points = 4;
        assert_eq!(w.build(5), BuildOutcome::InsufficientPoints { have: 4, need: 5 });
        assert_eq!(w.points, 4);
        assert!(w.builds.is_empty());
    }

    // ── message ──

    #[test]
    fn message_expires_after_timer() {
        let mut w = world();
        w.set_message("hi", 2);
        w.tick_message();
        assert_eq!(w.message, "hi");
        w.tick_message();
        assert!(w.message.is_empty());
    }

    // ── camera ──

    fn camera(w: usize, h: usize) -> Camera {
        let mut c = Camera::new(10);
        c.view_w = w;
        c.view_h = h;
        c
    }

    #[test]
    fn ore_at_offset_projects_up_right_of_centre() {
        let cam = camera(21, 11);
        let r = cam.project((0, 0), 0, 0, 30).unwrap();
        assert_eq!(r, CellRect { col0: 10, row0: 3, col1: 12, row1: 5 });
    }

    #[test]
    fn projection_follows_offset() {
        let cam = camera(21, 11);
        let at_origin = cam.project((0, 0), 100, 0, 30).unwrap();
        let moved = cam.project((100, 0), 100, 0, 30).unwrap();
        assert_eq!(at_origin.col0, 20);
        assert_eq!(moved.col0, 10);
    }

    #[test]
    fn projection_clips_and_culls() {
        let cam = camera(21, 11);
        let clipped = cam.project((0, 0), 90, 0, 30).unwrap();
        assert_eq!((clipped.col0, clipped.col1), (19, 20));
        assert!(cam.project((0, 0), 5000, 0, 30).is_none());
        assert!(cam.project((0, 0), 0, -5000, 30).is_none());
        assert!(camera(0, 0).project((0, 0), 0, 0, 30).is_none());
    }

    #[test]
    fn extreme_offset_projects_without_overflow() {
        let cam = camera(21, 11);
        assert!(cam.project((i64::MAX, i64::MIN), -1000, 1000, 30).is_none());
        assert!(cam.project((i64::MAX, i64::MAX), i64::MAX, i64::MAX - 29, 30).is_some());
    }

    #[test]
    fn mine_square_is_centred() {
        let cam = camera(21, 11);
        assert_eq!(cam.mine_square(30), Some(CellRect { col0: 9, row0: 4, col1: 11, row1: 6 }));
    }

    #[test]
    fn mine_square_matches_tile_width() {
        let cam = camera(21, 11);
        let even = cam.mine_square(20).unwrap();
        assert_eq!(even, CellRect { col0: 9, row0: 4, col1: 10, row1: 5 });
        assert_eq!(even.col1 - even.col0 + 1, 2);

        let single = cam.mine_square(5).unwrap();
        assert_eq!((single.col0, single.col1), (10, 10));

        let four = cam.mine_square(40).unwrap();
        assert_eq!(four.col1 - four.col0 + 1, 4);
    }
}
