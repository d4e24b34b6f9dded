/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The field is redrawn from scratch into `front` every frame; the diff
/// keeps terminal output proportional to what actually moved.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::ore::OreColor;
use crate::sim::world::{CellRect, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every empty cell, also used for Clear,
    /// so inter-row gaps match the cell colour.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 16, b: 24 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Differs from any real cell: forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }
}

// ── Renderer ──

/// Each field cell is two terminal columns, so cells look roughly square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// HUD + gap above the field, message + help below it.
const RESERVED_ROWS: usize = MAP_ROW + 3;

const HUD_BG: Color = Color::Rgb { r: 30, g: 30, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const MINE_SQUARE: Color = Color::Rgb { r: 235, g: 235, b: 235 };
const BUILD_FG: Color = Color::Rgb { r: 160, g: 160, b: 160 };
const BUILD_BG: Color = Color::Rgb { r: 110, g: 110, b: 110 };

fn ore_colors(c: OreColor) -> (Color, Color) {
    match c {
        OreColor::Red => (Color::Rgb { r: 255, g: 90, b: 90 }, Color::Rgb { r: 200, g: 20, b: 20 }),
        OreColor::Green => (Color::Rgb { r: 120, g: 255, b: 120 }, Color::Rgb { r: 20, g: 170, b: 40 }),
        OreColor::Purple => (Color::Rgb { r: 255, g: 120, b: 255 }, Color::Rgb { r: 170, g: 30, b: 170 }),
    }
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen.
    /// Returns whether the terminal will report key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);

        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, world: &mut WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.compose(world);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, w: &mut WorldState) {
        w.camera.view_w = self.term_w / CELL_W;
        w.camera.view_h = self.term_h.saturating_sub(RESERVED_ROWS).max(1);

        self.front.clear();
        self.compose_hud(w);
        self.compose_field(w);
        self.compose_footer(w);
    }

    fn compose_hud(&mut self, w: &WorldState) {
        let hud = format!(
            " Points: {:<6}  Pos: ({}, {})  Ore left: {}  Builds: {}",
            w.points, w.offset.0, w.offset.1, w.ores.len(), w.builds.len(),
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_field(&mut self, w: &WorldState) {
        let cam = &w.camera;
        let size = w.rules.tile_size;

        // Mine square underneath; sprites drawn over it.
        if let Some(r) = cam.mine_square(size) {
            self.fill_rect(r, ' ', Color::White, MINE_SQUARE);
        }

        for ore in &w.ores {
            if let Some(r) = cam.project(w.offset, ore.x, ore.y, size) {
                let (fg, bg) = ore_colors(ore.color);
                self.fill_rect(r, '▚', fg, bg);
            }
        }

        for b in &w.builds {
            if let Some(r) = cam.project(w.offset, b.x, b.y, size) {
                self.fill_rect(r, '▒', BUILD_FG, BUILD_BG);
            }
        }
    }

    fn compose_footer(&mut self, w: &WorldState) {
        let msg_row = MAP_ROW + w.camera.view_h + 1;
        if msg_row < self.front.height && !w.message.is_empty() {
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(0, msg_row, &format!(" {} ", w.message), Color::Black, MSG_BG);
        }

        let help_row = msg_row + 1;
        if help_row < self.front.height {
            let help = format!(
                " ←→↑↓/WASD Move   M/Space Mine   B Build ({} pts)   H/Esc Home",
                w.rules.build_cost,
            );
            self.front.put_str(0, help_row, &help, Color::DarkGrey, Color::Reset);
        }
    }

    /// Fill field cells `r` (in field coordinates) with a glyph.
    fn fill_rect(&mut self, r: CellRect, ch: char, fg: Color, bg: Color) {
        for row in r.row0..=r.row1 {
            for col in r.col0..=r.col1 {
                let x = col * CELL_W;
                let y = MAP_ROW + row;
                for dx in 0..CELL_W {
                    self.front.set(x + dx, y, Cell::new(ch, fg, bg));
                }
            }
        }
    }
}
