/// World: the complete state of a running session.
///
/// One aggregate owns everything the simulation mutates: the scene
/// machine, the player, the current level, the run state, and the
/// editor document. Collaborators (renderer, sound, menu surface)
/// borrow it; nothing lives in module-level statics.
///
/// ## Deferred actions
///
/// Death schedules a restart and completion schedules the reveal of
/// the "level complete" panel, both on wall-clock delays rather than
/// simulation ticks. The timers are owned here so that starting a new
/// session (or leaving for the menu) cancels them; a stale timer can
/// never act on a replaced session.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::TuningConfig;
use crate::domain::entity::{Level, Player};

use super::editor::EditorDoc;
use super::level::{self, LEVELS};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scene {
    Menu,
    Playing,
    Dead,
    Complete,
    Editor,
}

/// Per-attempt run state. Everything except `attempts` resets on
/// every level (re)start; the attempt counter survives for the HUD.
#[derive(Clone, Debug)]
pub struct RunState {
    /// +1 = floor is down, -1 = ceiling is down. Nothing in between.
    pub gravity_dir: f32,
    pub base_speed: f32,
    pub speed_mult: f32,
    /// Monotonically non-decreasing while playing.
    pub camera_x: f32,
    pub attempts: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Deferred {
    RestartLevel,
    RevealCompletePanel,
}

struct Timer {
    due: Instant,
    action: Deferred,
}

pub struct World {
    pub scene: Scene,
    pub player: Player,
    pub level: Level,
    pub run: RunState,
    pub editor: EditorDoc,
    pub tuning: TuningConfig,

    pub current_level: usize,
    pub is_custom: bool,
    pub level_name: String,

    /// Completion latch: the finish fires at most once per attempt.
    pub complete_shown: bool,
    /// Set by the deferred reveal; the renderer shows the panel.
    pub complete_panel_visible: bool,

    pub tick: u64,

    timers: Vec<Timer>,
}

impl World {
    pub fn new(tuning: TuningConfig) -> Self {
        World {
            scene: Scene::Menu,
            player: Player::spawn(),
            level: Level::empty(),
            run: RunState {
                gravity_dir: 1.0,
                base_speed: tuning.base_speed,
                speed_mult: 1.0,
                camera_x: 0.0,
                attempts: 0,
            },
            editor: EditorDoc::new(),
            tuning,
            current_level: 0,
            is_custom: false,
            level_name: String::new(),
            complete_shown: false,
            complete_panel_visible: false,
            tick: 0,
            timers: Vec::new(),
        }
    }

    /// Scroll rate in world units per second, derived from the tick
    /// rate. The generator sizes levels with this.
    pub fn px_per_sec(&self) -> f32 {
        self.tuning.base_speed * (1000.0 / self.tuning.tick_rate_ms as f32)
    }

    // ── Session starts (each one cancels pending timers) ──

    /// Start (or restart) a built-in level. Every call regenerates the
    /// layout and counts as a new attempt. Unknown ids are a no-op.
    pub fn start_level(&mut self, id: usize, rng: &mut impl Rng) {
        let Some(spec) = LEVELS.get(id) else { return };
        self.is_custom = false;
        self.current_level = id;
        self.level_name = spec.name.to_string();
        self.level = level::build(rng, self.px_per_sec(), spec);
        self.run.attempts += 1;
        self.reset_attempt();
    }

    /// Start (or restart) the custom level from the editor snapshot.
    /// With no placed objects this is a no-op and the scene stays put.
    pub fn start_custom_level(&mut self) -> bool {
        let Some(lvl) = level::from_editor(&self.editor) else {
            return false;
        };
        self.is_custom = true;
        self.level_name = "Custom Level".to_string();
        self.level = lvl;
        self.reset_attempt();
        true
    }

    /// Restart whatever was last played.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        if self.is_custom {
            self.start_custom_level();
        } else {
            self.start_level(self.current_level, rng);
        }
    }

    pub fn go_menu(&mut self) {
        self.scene = Scene::Menu;
        self.timers.clear();
        self.complete_panel_visible = false;
        // Completion zeroes the scroll; restore it for the backdrop
        self.run.base_speed = self.tuning.base_speed;
    }

    pub fn enter_editor(&mut self) {
        self.scene = Scene::Editor;
        self.timers.clear();
    }

    /// The built-in level after the current one, if any.
    pub fn next_level_id(&self) -> Option<usize> {
        let next = self.current_level + 1;
        (next < LEVELS.len()).then_some(next)
    }

    fn reset_attempt(&mut self) {
        self.player = Player::spawn();
        self.run.gravity_dir = 1.0;
        self.run.base_speed = self.tuning.base_speed;
        self.run.speed_mult = 1.0;
        self.run.camera_x = 0.0;
        self.complete_shown = false;
        self.complete_panel_visible = false;
        self.tick = 0;
        self.timers.clear();
        self.scene = Scene::Playing;
    }

    // ── Deferred actions ──

    pub fn schedule(&mut self, action: Deferred, delay: Duration) {
        self.timers.push(Timer { due: Instant::now() + delay, action });
    }

    /// Pop every timer whose deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Vec<Deferred> {
        let mut due = Vec::new();
        self.timers.retain(|t| {
            if t.due <= now {
                due.push(t.action);
                false
            } else {
                true
            }
        });
        due
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.tuning.restart_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.tuning.reveal_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn world() -> World {
        World::new(TuningConfig::default())
    }

    #[test]
    fn start_level_resets_run_state() {
        let mut w = world();
        let mut rng = SmallRng::seed_from_u64(1);
        w.start_level(0, &mut rng);
        assert_eq!(w.scene, Scene::Playing);
        assert_eq!(w.run.gravity_dir, 1.0);
        assert_eq!(w.run.camera_x, 0.0);
        assert_eq!(w.run.speed_mult, 1.0);
        assert!(!w.player.dead);
        assert!(!w.complete_shown);
        assert_eq!(w.level_name, "Stereo Lite");
    }

    #[test]
    fn attempts_count_built_in_starts_only() {
        let mut w = world();
        let mut rng = SmallRng::seed_from_u64(1);
        w.start_level(0, &mut rng);
        w.start_level(0, &mut rng);
        assert_eq!(w.run.attempts, 2);

        w.editor.place(100.0);
        w.start_custom_level();
        assert_eq!(w.run.attempts, 2);
    }

    #[test]
    fn unknown_level_id_is_a_no_op() {
        let mut w = world();
        let mut rng = SmallRng::seed_from_u64(1);
        w.start_level(99, &mut rng);
        assert_eq!(w.scene, Scene::Menu);
        assert_eq!(w.run.attempts, 0);
    }

    #[test]
    fn empty_custom_level_does_not_leave_editor() {
        let mut w = world();
        w.enter_editor();
        assert!(!w.start_custom_level());
        assert_eq!(w.scene, Scene::Editor);
    }

    #[test]
    fn new_session_cancels_pending_timers() {
        let mut w = world();
        let mut rng = SmallRng::seed_from_u64(1);
        w.start_level(0, &mut rng);
        w.schedule(Deferred::RestartLevel, Duration::from_millis(500));
        assert_eq!(w.pending_timers(), 1);
        w.start_level(1, &mut rng);
        assert_eq!(w.pending_timers(), 0);
    }

    #[test]
    fn take_due_fires_only_expired_timers() {
        let mut w = world();
        w.schedule(Deferred::RestartLevel, Duration::from_millis(0));
        w.schedule(Deferred::RevealCompletePanel, Duration::from_secs(3600));
        let due = w.take_due(Instant::now() + Duration::from_millis(10));
        assert_eq!(due, vec![Deferred::RestartLevel]);
        assert_eq!(w.pending_timers(), 1);
    }

    #[test]
    fn next_level_walks_the_table() {
        let mut w = world();
        let mut rng = SmallRng::seed_from_u64(1);
        w.start_level(0, &mut rng);
        assert_eq!(w.next_level_id(), Some(1));
        w.start_level(2, &mut rng);
        assert_eq!(w.next_level_id(), None);
    }
}
