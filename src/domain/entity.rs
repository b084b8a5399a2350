/// Entities: the player cube, level objects, and the level container.
/// Object kinds form a closed enum so trigger/collision/generation
/// logic can match exhaustively; adding a kind is a compile-time
/// checked extension point.

// ── World geometry (a 900x500 playfield) ──

pub const VIEW_W: f32 = 900.0;
pub const VIEW_H: f32 = 500.0;
pub const GROUND_Y: f32 = 390.0;
pub const CEIL_Y: f32 = 110.0;

pub const PLAYER_SIZE: f32 = 40.0;
/// 20% of the view width. The cube never moves horizontally on
/// screen; the world scrolls under it.
pub const PLAYER_SCREEN_X: f32 = 180.0;

/// What a placed object IS. Spike is a static hazard; the other three
/// are one-shot proximity modifiers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObjectKind {
    Spike,
    Pad,
    GravityPortal,
    SpeedPortal,
}

impl ObjectKind {
    /// Display name for HUD lines.
    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Spike => "spike",
            ObjectKind::Pad => "pad",
            ObjectKind::GravityPortal => "gravity portal",
            ObjectKind::SpeedPortal => "speed portal",
        }
    }

    /// Nominal bounding box (w, h) in world units.
    pub fn nominal_size(self) -> (f32, f32) {
        match self {
            ObjectKind::Spike => (50.0, 60.0),
            ObjectKind::Pad => (60.0, 18.0),
            ObjectKind::GravityPortal => (40.0, 80.0),
            ObjectKind::SpeedPortal => (40.0, 80.0),
        }
    }
}

/// One hazard or modifier placed in a level.
///
/// `triggered` is write-once per attempt for Pad / GravityPortal /
/// SpeedPortal so a modifier cannot re-fire while the player lingers
/// inside its proximity radius. Spikes carry no trigger state; their
/// overlap is re-evaluated every tick.
#[derive(Clone, Debug)]
pub struct LevelObject {
    pub kind: ObjectKind,
    pub x: f32,
    pub w: f32,
    pub h: f32,
    pub speed_mult: f32,
    pub triggered: bool,
}

impl LevelObject {
    fn new(kind: ObjectKind, x: f32, speed_mult: f32) -> Self {
        let (w, h) = kind.nominal_size();
        LevelObject { kind, x, w, h, speed_mult, triggered: false }
    }

    pub fn spike(x: f32) -> Self {
        LevelObject::new(ObjectKind::Spike, x, 1.0)
    }

    pub fn pad(x: f32) -> Self {
        LevelObject::new(ObjectKind::Pad, x, 1.0)
    }

    pub fn gravity_portal(x: f32) -> Self {
        LevelObject::new(ObjectKind::GravityPortal, x, 1.0)
    }

    pub fn speed_portal(x: f32, mult: f32) -> Self {
        LevelObject::new(ObjectKind::SpeedPortal, x, mult)
    }
}

/// A playable level: the ordered object sequence plus the finish
/// marker. Procedural levels put the marker at the target distance;
/// custom levels at the last placed object plus a fixed margin.
/// Invariant: `finish_x` is beyond every object.
#[derive(Clone, Debug)]
pub struct Level {
    pub objects: Vec<LevelObject>,
    pub finish_x: f32,
}

impl Level {
    pub fn empty() -> Self {
        Level { objects: Vec::new(), finish_x: 0.0 }
    }
}

/// The player cube. `x` is a constant screen-space position; only `y`
/// is integrated. `rotation` is cosmetic but tracked in the simulation
/// so the snap-on-landing rule has something to snap.
#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vel_y: f32,
    pub rotation: f32,
    pub on_ground: bool,
    pub dead: bool,
}

impl Player {
    /// A cube at rest on the ground, upright.
    pub fn spawn() -> Self {
        Player {
            x: PLAYER_SCREEN_X,
            y: GROUND_Y - PLAYER_SIZE / 2.0,
            size: PLAYER_SIZE,
            vel_y: 0.0,
            rotation: 0.0,
            on_ground: true,
            dead: false,
        }
    }

    pub fn half(&self) -> f32 {
        self.size / 2.0
    }
}

/// Input consumed by one simulation tick. The single-slot jump queue
/// collapses every request since the last tick into one flag.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub jump: bool,
}
