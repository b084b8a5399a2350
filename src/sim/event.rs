/// Effect signals emitted during a simulation step.
/// The presentation layer consumes these for particle bursts, screen
/// shake, and sound; the simulation never renders anything itself.
/// Positions are world x and screen y.

#[derive(Clone, Copy, Debug)]
pub enum GameEvent {
    Jumped { x: f32, y: f32 },
    Landed { x: f32, y: f32 },
    PadBounced { x: f32, y: f32 },
    GravityFlipped { x: f32, y: f32, dir: f32 },
    SpeedChanged { x: f32, y: f32, mult: f32 },
    PlayerKilled { x: f32, y: f32 },
    LevelCompleted { x: f32, y: f32 },
}
