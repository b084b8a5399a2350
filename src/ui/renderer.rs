/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// The 900x500 world is mapped onto terminal cells at a fixed scale
/// (10 px per column, 12 px per row). Each frame is built into a
/// front buffer, diffed against the previous frame, and only changed
/// cells are re-emitted, batched with `queue!` and flushed once.
///
/// All cosmetic state lives here: parallax stars, particle bursts,
/// and screen shake are fed by the simulation's GameEvents and never
/// influence it.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{thread_rng, Rng};

use crate::domain::entity::{CEIL_Y, GROUND_Y, VIEW_H, VIEW_W};
use crate::sim::editor::{EditorDoc, GRID};
use crate::sim::event::GameEvent;
use crate::sim::level::LEVELS;
use crate::sim::world::{Scene, World};

/// World pixels per terminal cell.
pub const SCALE_X: f32 = 10.0;
pub const SCALE_Y: f32 = 12.0;

/// First row of the playfield (row 0 is the HUD).
const MAP_ROW: i32 = 2;

/// Translate a terminal column to a world x under the given camera.
pub fn cell_to_world_x(col: u16, cam_x: f32) -> f32 {
    cam_x + col as f32 * SCALE_X
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BASE_BG: Color = Color::Rgb { r: 8, g: 14, b: 30 };

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };
    /// Never matches a real cell, forcing a full repaint.
    const INVALID: Cell = Cell { ch: '\0', fg: Color::Magenta, bg: Color::Magenta };
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

    fn resize(&mut self, w: usize, h: usize) -> bool {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn fill_invalid(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: i32, y: i32, ch: char, fg: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = Cell { ch, fg, bg: BASE_BG };
        }
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg);
        }
    }
}

// ── Cosmetic state ──

struct Particle {
    /// World x, screen-space y (pixels).
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: i32,
    color: Color,
}

struct StarLayer {
    speed: f32,
    color: Color,
    stars: Vec<(f32, f32)>,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    layers: Vec<StarLayer>,
    particles: Vec<Particle>,
    shake_timer: u32,
    shake_intensity: f32,
    frame: u64,
}

impl Renderer {
    pub fn new() -> Self {
        let mut rng = thread_rng();
        let layers = [
            (0.15, Color::Rgb { r: 40, g: 90, b: 120 }),
            (0.35, Color::Rgb { r: 60, g: 130, b: 170 }),
            (0.6, Color::Rgb { r: 90, g: 200, b: 180 }),
        ]
        .into_iter()
        .map(|(speed, color)| StarLayer {
            speed,
            color,
            stars: (0..30)
                .map(|_| (rng.gen_range(0.0..VIEW_W), rng.gen_range(0.0..VIEW_H)))
                .collect(),
        })
        .collect();

        Renderer {
            writer: BufWriter::new(io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            layers,
            particles: Vec::new(),
            shake_timer: 0,
            shake_intensity: 0.0,
            frame: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            EnterAlternateScreen,
            Hide,
            EnableMouseCapture,
            Clear(ClearType::All),
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, DisableMouseCapture, Show, ResetColor, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    // ── Event-driven cosmetics ──

    /// Turn this tick's effect signals into bursts and shake.
    pub fn absorb_events(&mut self, events: &[GameEvent]) {
        for ev in events {
            match *ev {
                GameEvent::Jumped { x, y } => {
                    self.burst(x, y + 14.0, Color::Cyan, 4);
                }
                GameEvent::Landed { x, y } => {
                    self.burst(x, y, Color::Green, 10);
                    self.shake(0.5, 10);
                }
                GameEvent::PadBounced { x, y } => {
                    self.burst(x, y, Color::Yellow, 8);
                    self.shake(0.4, 12);
                }
                GameEvent::GravityFlipped { x, y, .. } => {
                    self.burst(x, y, Color::Cyan, 14);
                    self.shake(0.8, 14);
                }
                GameEvent::SpeedChanged { x, y, .. } => {
                    self.burst(x, y, Color::Rgb { r: 255, g: 156, b: 47 }, 12);
                    self.shake(0.5, 12);
                }
                GameEvent::PlayerKilled { x, y } => {
                    self.burst(x, y, Color::Red, 22);
                    self.shake(1.2, 16);
                }
                GameEvent::LevelCompleted { x, y } => {
                    self.burst(x, y, Color::Rgb { r: 0, g: 255, b: 153 }, 28);
                    self.shake(1.4, 18);
                }
            }
        }
    }

    fn burst(&mut self, x: f32, y: f32, color: Color, count: usize) {
        let mut rng = thread_rng();
        for _ in 0..count {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(2.0..9.0);
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life: rng.gen_range(12..26),
                color,
            });
        }
    }

    fn shake(&mut self, intensity: f32, duration: u32) {
        self.shake_intensity = self.shake_intensity.max(intensity);
        self.shake_timer = self.shake_timer.max(duration);
    }

    fn shake_offset(&mut self) -> (i32, i32) {
        if self.shake_timer == 0 {
            self.shake_intensity = 0.0;
            return (0, 0);
        }
        self.shake_timer -= 1;
        let mut rng = thread_rng();
        let amp = self.shake_intensity;
        (
            (rng.gen_range(-amp..=amp)).round() as i32,
            (rng.gen_range(-amp..=amp) * 0.5).round() as i32,
        )
    }

    fn update_particles(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.life -= 1;
        }
        self.particles.retain(|p| p.life > 0);
    }

    // ── Frame assembly ──

    pub fn render(&mut self, world: &World) -> io::Result<()> {
        let (tw, th) = terminal::size()?;
        let (tw, th) = (tw as usize, th as usize);
        self.front.resize(tw, th);
        if self.back.resize(tw, th) {
            self.back.fill_invalid();
            execute!(self.writer, Clear(ClearType::All))?;
        }
        self.front.clear();
        self.frame += 1;
        self.update_particles();

        match world.scene {
            Scene::Menu => self.draw_menu(world),
            Scene::Editor => self.draw_editor(&world.editor),
            _ => self.draw_playfield(world),
        }

        if world.complete_panel_visible {
            self.draw_complete_panel(world);
        }

        self.flush_diff()
    }

    fn draw_menu(&mut self, world: &World) {
        self.draw_stars(0.0, (0, 0));

        let cx = self.front.width as i32 / 2;
        self.front.put_str(cx - 6, 3, "N E O N  D A S H", Color::Yellow);
        self.front.put_str(cx - 13, 5, "auto-scroll. one button. go.", Color::DarkCyan);

        for (i, spec) in LEVELS.iter().enumerate() {
            let line = format!("[{}] {:<12} {:>3.0}s", i + 1, spec.name, spec.target_seconds);
            self.front.put_str(cx - 11, 8 + i as i32 * 2, &line, Color::White);
        }
        self.front.put_str(cx - 11, 8 + LEVELS.len() as i32 * 2, "[E] Level Editor", Color::Cyan);
        self.front
            .put_str(cx - 11, 10 + LEVELS.len() as i32 * 2, "[Q] Quit", Color::DarkGrey);

        if world.run.attempts > 0 {
            let line = format!("attempts so far: {}", world.run.attempts);
            self.front.put_str(cx - 11, 13 + LEVELS.len() as i32 * 2, &line, Color::DarkGrey);
        }
    }

    fn draw_playfield(&mut self, world: &World) {
        let off = self.shake_offset();
        let cam = world.run.camera_x;
        let gravity_dir = world.run.gravity_dir;

        self.draw_stars(cam, off);
        self.draw_boundaries(gravity_dir, cam, off);

        for ob in &world.level.objects {
            let sx = ob.x - cam;
            if !(-100.0..VIEW_W + 100.0).contains(&sx) {
                continue;
            }
            use crate::domain::entity::ObjectKind::*;
            match ob.kind {
                Spike => self.draw_spike(sx, gravity_dir, off),
                Pad => self.draw_pad(sx, gravity_dir, off, ob.triggered),
                GravityPortal => self.draw_portal(sx, gravity_dir, off, Color::Cyan, None),
                SpeedPortal => {
                    self.draw_portal(sx, gravity_dir, off, Color::Rgb { r: 255, g: 156, b: 47 }, Some(ob.speed_mult))
                }
            }
        }

        self.draw_finish(world.level.finish_x - cam, gravity_dir, off);
        self.draw_player(world, off);
        self.draw_hud(world);

        // Particles ride the world, not the camera
        let particles: Vec<(i32, i32, Color)> = self
            .particles
            .iter()
            .map(|p| (cell_x(p.x - cam, off), cell_y(p.y, off), p.color))
            .collect();
        for (x, y, color) in particles {
            self.front.set(x, y, '*', color);
        }
    }

    fn draw_stars(&mut self, cam: f32, off: (i32, i32)) {
        let w = self.front.width.max(1) as f32 * SCALE_X;
        for layer in &self.layers {
            let shift = cam * layer.speed;
            for &(sx, sy) in &layer.stars {
                let x = (sx - shift).rem_euclid(w.max(VIEW_W));
                self.front
                    .set(cell_x(x, off), cell_y(sy, off), '.', layer.color);
            }
        }
    }

    fn draw_boundaries(&mut self, gravity_dir: f32, cam: f32, off: (i32, i32)) {
        let w = self.front.width as i32;
        let ground_row = cell_y(GROUND_Y, off);
        let ceil_row = cell_y(CEIL_Y, off);
        let (active, inactive) = if gravity_dir > 0.0 { (ground_row, ceil_row) } else { (ceil_row, ground_row) };

        let phase = (cam / SCALE_X) as i32;
        for x in 0..w {
            let bright = (x + phase).rem_euclid(5) == 0;
            let color = if bright {
                Color::Rgb { r: 0, g: 255, b: 204 }
            } else {
                Color::Rgb { r: 10, g: 74, b: 125 }
            };
            self.front.set(x, active, '█', color);
            self.front.set(x, inactive, '─', Color::Rgb { r: 20, g: 45, b: 70 });
        }
    }

    fn draw_spike(&mut self, sx: f32, gravity_dir: f32, off: (i32, i32)) {
        let base = if gravity_dir > 0.0 { cell_y(GROUND_Y, off) } else { cell_y(CEIL_Y, off) };
        let dir = if gravity_dir > 0.0 { -1 } else { 1 };
        let cx = cell_x(sx + 25.0, off);
        let color = Color::Rgb { r: 255, g: 42, b: 111 };
        // Wide base narrowing to a tip
        for (i, half) in [2, 1, 0, 0].iter().enumerate() {
            let row = base + dir * (i as i32 + 1);
            let ch = if *half == 0 {
                if dir < 0 { '▲' } else { '▼' }
            } else {
                '█'
            };
            for x in (cx - half)..=(cx + half) {
                self.front.set(x, row, ch, color);
            }
        }
    }

    fn draw_pad(&mut self, sx: f32, gravity_dir: f32, off: (i32, i32), triggered: bool) {
        let base = if gravity_dir > 0.0 { cell_y(GROUND_Y, off) } else { cell_y(CEIL_Y, off) };
        let dir = if gravity_dir > 0.0 { -1 } else { 1 };
        let cx = cell_x(sx, off);
        let color = if triggered { Color::DarkYellow } else { Color::Yellow };
        let ch = if dir < 0 { '▄' } else { '▀' };
        for x in (cx - 2)..=(cx + 2) {
            self.front.set(x, base + dir, ch, color);
        }
    }

    fn draw_portal(&mut self, sx: f32, gravity_dir: f32, off: (i32, i32), color: Color, mult: Option<f32>) {
        let base = if gravity_dir > 0.0 { cell_y(GROUND_Y, off) } else { cell_y(CEIL_Y, off) };
        let dir = if gravity_dir > 0.0 { -1 } else { 1 };
        let cx = cell_x(sx, off);
        for i in 1..=7 {
            let row = base + dir * i;
            self.front.set(cx - 2, row, '║', color);
            self.front.set(cx + 2, row, '║', color);
            self.front.set(cx - 1, row, '░', color);
            self.front.set(cx, row, '░', color);
            self.front.set(cx + 1, row, '░', color);
        }
        if let Some(m) = mult {
            let label = format!("{m}x");
            self.front.put_str(cx - 1, base + dir * 4, &label, Color::White);
        }
    }

    fn draw_finish(&mut self, sx: f32, gravity_dir: f32, off: (i32, i32)) {
        if !(-60.0..VIEW_W + 60.0).contains(&sx) {
            return;
        }
        let base = if gravity_dir > 0.0 { cell_y(GROUND_Y, off) } else { cell_y(CEIL_Y, off) };
        let dir = if gravity_dir > 0.0 { -1 } else { 1 };
        let cx = cell_x(sx, off);
        let color = Color::Rgb { r: 77, g: 255, b: 156 };
        let pulse = self.frame % 10 < 5;
        for i in 1..=11 {
            let row = base + dir * i;
            self.front.set(cx - 2, row, '▓', color);
            self.front.set(cx + 2, row, '▓', color);
            let inner = if pulse { '▒' } else { '░' };
            self.front.set(cx - 1, row, inner, color);
            self.front.set(cx, row, inner, color);
            self.front.set(cx + 1, row, inner, color);
        }
    }

    fn draw_player(&mut self, world: &World, off: (i32, i32)) {
        let p = &world.player;
        let color = if p.dead {
            Color::Red
        } else if world.run.speed_mult > 1.0 {
            Color::Rgb { r: 77, g: 210, b: 255 }
        } else {
            Color::Rgb { r: 255, g: 216, b: 0 }
        };
        // Airborne cubes shimmer with their spin
        let quarter = (p.rotation / std::f32::consts::FRAC_PI_2).round() as i64;
        let ch = if p.on_ground || quarter.rem_euclid(2) == 0 { '█' } else { '▓' };

        let left = cell_x(p.x - p.half(), off);
        let right = cell_x(p.x + p.half(), off) - 1;
        let top = cell_y(p.y - p.half(), off);
        let bottom = cell_y(p.y + p.half(), off) - 1;
        for y in top..=bottom {
            for x in left..=right {
                self.front.set(x, y, ch, color);
            }
        }
    }

    fn draw_hud(&mut self, world: &World) {
        let progress = if world.level.finish_x > 0.0 {
            ((world.run.camera_x / world.level.finish_x) * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let hud = format!(
            " {}  ATTEMPT {}  {:>3.0}%",
            world.level_name, world.run.attempts, progress
        );
        self.front.put_str(0, 0, &hud, Color::White);

        let hint = "[Space] jump  [R] restart  [Esc] menu";
        let x = self.front.width as i32 - hint.len() as i32 - 1;
        self.front.put_str(x, 0, hint, Color::DarkGrey);
    }

    fn draw_editor(&mut self, doc: &EditorDoc) {
        let off = (0, 0);
        let w = self.front.width as i32;
        let h = self.front.height as i32;

        // Grid verticals, one per snapped world column
        let grid_cols = (GRID / SCALE_X) as i32;
        let phase = (doc.cam_x / SCALE_X) as i32;
        for x in 0..w {
            if (x + phase).rem_euclid(grid_cols) == 0 {
                for y in MAP_ROW..h - 1 {
                    self.front.set(x, y, '·', Color::Rgb { r: 40, g: 50, b: 70 });
                }
            }
        }

        self.draw_boundaries(1.0, doc.cam_x, off);

        for ob in &doc.objects {
            let sx = ob.x - doc.cam_x;
            if !(-100.0..VIEW_W + 100.0).contains(&sx) {
                continue;
            }
            use crate::domain::entity::ObjectKind::*;
            match ob.kind {
                Spike => self.draw_spike(sx, 1.0, off),
                Pad => self.draw_pad(sx, 1.0, off, false),
                GravityPortal => self.draw_portal(sx, 1.0, off, Color::Cyan, None),
                SpeedPortal => {
                    self.draw_portal(sx, 1.0, off, Color::Rgb { r: 255, g: 136, b: 0 }, Some(ob.speed_mult))
                }
            }
        }

        let hud = format!(
            " EDITOR  objects:{}  selected:{}  cam:{:.0}",
            doc.objects.len(),
            doc.selected.label(),
            doc.cam_x,
        );
        self.front.put_str(0, 0, &hud, Color::White);
        let help = "[click] place  [r-click] delete  [1-4] type  [A/D] pan  [E] play  [Esc] menu";
        self.front.put_str(1, h - 1, help, Color::DarkGrey);
    }

    fn draw_complete_panel(&mut self, world: &World) {
        let cx = self.front.width as i32 / 2;
        let cy = self.front.height as i32 / 2;
        for y in (cy - 3)..=(cy + 3) {
            for x in (cx - 20)..=(cx + 20) {
                self.front.set(x, y, ' ', Color::White);
            }
        }
        self.front.put_str(cx - 8, cy - 2, "LEVEL COMPLETE!", Color::Rgb { r: 0, g: 255, b: 153 });
        let detail = format!("{}  attempt {}", world.level_name, world.run.attempts);
        self.front.put_str(cx - detail.len() as i32 / 2, cy, &detail, Color::White);
        self.front.put_str(cx - 14, cy + 2, "[Enter] next  [R] retry  [Esc] menu", Color::DarkGrey);
    }

    // ── Diff + flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let idx = y * self.front.width + x;
                let cell = self.front.cells[idx];
                if cell == self.back.cells[idx] {
                    continue;
                }
                queue!(self.writer, MoveTo(x as u16, y as u16))?;
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }

        self.writer.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }
}

// ── Coordinate helpers ──

#[inline]
fn cell_x(px: f32, off: (i32, i32)) -> i32 {
    (px / SCALE_X) as i32 + off.0
}

#[inline]
fn cell_y(py: f32, off: (i32, i32)) -> i32 {
    (py / SCALE_Y) as i32 + MAP_ROW + off.1
}
