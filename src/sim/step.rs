/// The step function: advances a playing session by one tick.
///
/// Processing order:
///   1. Camera advance (base speed x active multiplier)
///   2. Jump consumption (one queued request, grounded only)
///   3. Gravity integration
///   4. Boundary resolution (clamp, landing snap)
///   5. Airborne spin
///   6. Triggers, then hazard collision, then finish check
///
/// Trigger effects land before the hazard and finish checks so that a
/// gravity flip or speed change is visible to the same tick's outcome.
///
/// In any scene other than Playing the step is a no-op.

use std::f32::consts::PI;

use crate::domain::entity::{FrameInput, ObjectKind};
use crate::domain::geom;
use crate::domain::physics::{self, Contact};

use super::event::GameEvent;
use super::world::{Deferred, Scene, World};

/// Proximity radius for one-shot modifier activation.
pub const TRIGGER_RADIUS: f32 = 30.0;

pub fn step(world: &mut World, input: FrameInput) -> Vec<GameEvent> {
    if world.scene != Scene::Playing {
        return Vec::new();
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    world.run.camera_x += world.run.base_speed * world.run.speed_mult;

    if input.jump
        && physics::try_jump(&mut world.player, world.run.gravity_dir, world.tuning.jump_impulse)
    {
        events.push(GameEvent::Jumped { x: player_world_x(world), y: world.player.y });
    }

    physics::integrate(&mut world.player, world.tuning.gravity, world.run.gravity_dir);
    if physics::resolve_boundary(&mut world.player, world.run.gravity_dir) == Contact::Landed {
        events.push(GameEvent::Landed {
            x: player_world_x(world),
            y: physics::boundary_y(world.run.gravity_dir),
        });
    }

    physics::spin(&mut world.player, world.tuning.spin_rate, world.run.gravity_dir);

    resolve_triggers(world, &mut events);

    if hit_spike(world) {
        kill_player(world, &mut events);
    } else if reached_finish(world) {
        complete_level(world, &mut events);
    }

    events
}

/// The player's position in world coordinates.
#[inline]
fn player_world_x(world: &World) -> f32 {
    world.run.camera_x + world.player.x
}

// ── Triggers (4.4) ──

fn resolve_triggers(world: &mut World, events: &mut Vec<GameEvent>) {
    let wx = player_world_x(world);
    let World { level, run, player, tuning, .. } = world;

    for ob in &mut level.objects {
        if ob.triggered {
            continue;
        }
        if (wx - ob.x).abs() >= TRIGGER_RADIUS {
            continue;
        }
        let surface = physics::boundary_y(run.gravity_dir);
        match ob.kind {
            // Spikes are static hazards; proximity means nothing
            ObjectKind::Spike => {}
            ObjectKind::Pad => {
                player.vel_y = -run.gravity_dir * tuning.pad_impulse;
                player.on_ground = false;
                ob.triggered = true;
                events.push(GameEvent::PadBounced { x: ob.x, y: surface });
            }
            ObjectKind::GravityPortal => {
                run.gravity_dir *= -1.0;
                player.rotation += PI;
                ob.triggered = true;
                events.push(GameEvent::GravityFlipped {
                    x: ob.x,
                    y: physics::boundary_y(run.gravity_dir),
                    dir: run.gravity_dir,
                });
            }
            ObjectKind::SpeedPortal => {
                run.speed_mult = ob.speed_mult;
                ob.triggered = true;
                events.push(GameEvent::SpeedChanged { x: ob.x, y: surface, mult: ob.speed_mult });
            }
        }
    }
}

// ── Hazard collision (4.5) ──

fn hit_spike(world: &World) -> bool {
    let p = &world.player;
    let px = p.x - p.half();
    let py = p.y - p.half();

    for ob in &world.level.objects {
        if ob.kind != ObjectKind::Spike {
            continue;
        }
        let sx = ob.x - world.run.camera_x;
        let (fx, fy, fw, fh) = geom::spike_footprint(sx, ob.w, ob.h, world.run.gravity_dir);
        if geom::overlaps(px, py, p.size, p.size, fx, fy, fw, fh) {
            return true;
        }
    }
    false
}

// ── Finish detection (4.6) ──

fn reached_finish(world: &World) -> bool {
    let marker_screen_x = world.level.finish_x - world.run.camera_x;
    marker_screen_x <= world.player.x + world.player.half()
}

// ── Terminal transitions ──

fn kill_player(world: &mut World, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::PlayerKilled { x: player_world_x(world), y: world.player.y });
    world.player.dead = true;
    world.scene = Scene::Dead;
    let delay = world.restart_delay();
    world.schedule(Deferred::RestartLevel, delay);
}

fn complete_level(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.complete_shown {
        return;
    }
    events.push(GameEvent::LevelCompleted { x: player_world_x(world), y: world.player.y });
    world.complete_shown = true;
    world.scene = Scene::Complete;
    world.run.base_speed = 0.0;
    world.run.speed_mult = 0.0;
    world.player.vel_y = 0.0;
    let delay = world.reveal_delay();
    world.schedule(Deferred::RevealCompletePanel, delay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuningConfig;
    use crate::domain::entity::{Level, LevelObject, PLAYER_SCREEN_X};

    fn playing(objects: Vec<LevelObject>, finish_x: f32) -> World {
        let mut w = World::new(TuningConfig::default());
        w.level = Level { objects, finish_x };
        w.scene = Scene::Playing;
        w
    }

    /// A world whose camera never moves, so the player hovers at a
    /// fixed world x. Handy for trigger proximity tests.
    fn parked(objects: Vec<LevelObject>, finish_x: f32) -> World {
        let mut w = playing(objects, finish_x);
        w.run.base_speed = 0.0;
        w
    }

    fn count_pad_bounces(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::PadBounced { .. }))
            .count()
    }

    #[test]
    fn step_is_a_no_op_outside_playing() {
        let mut w = playing(vec![], 1000.0);
        w.scene = Scene::Menu;
        let events = step(&mut w, FrameInput { jump: true });
        assert!(events.is_empty());
        assert_eq!(w.tick, 0);
        assert_eq!(w.run.camera_x, 0.0);
    }

    #[test]
    fn pad_triggers_exactly_once_while_lingering() {
        let mut w = parked(vec![LevelObject::pad(PLAYER_SCREEN_X)], 10_000.0);
        let mut bounces = 0;
        for _ in 0..10 {
            bounces += count_pad_bounces(&step(&mut w, FrameInput::default()));
        }
        assert_eq!(bounces, 1);
        assert!(w.level.objects[0].triggered);
    }

    #[test]
    fn airborne_jump_requests_are_dropped() {
        let mut w = parked(vec![], 10_000.0);
        // First jump from the ground
        let events = step(&mut w, FrameInput { jump: true });
        assert!(events.iter().any(|e| matches!(e, GameEvent::Jumped { .. })));
        assert!(!w.player.on_ground);

        // Mid-air request: velocity follows gravity only
        let vel_before = w.player.vel_y;
        let events = step(&mut w, FrameInput { jump: true });
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Jumped { .. })));
        assert_eq!(w.player.vel_y, vel_before + w.tuning.gravity);
    }

    #[test]
    fn gravity_flip_shields_from_same_tick_spike() {
        // A spike and a gravity portal share the player's position.
        // The flip resolves first, moving the lethal footprint to the
        // ceiling, so the grounded player survives the very same tick.
        let wx = PLAYER_SCREEN_X;
        let mut w = parked(
            vec![LevelObject::gravity_portal(wx), LevelObject::spike(wx - 25.0)],
            10_000.0,
        );
        let events = step(&mut w, FrameInput::default());
        assert!(events.iter().any(|e| matches!(e, GameEvent::GravityFlipped { .. })));
        assert_eq!(w.scene, Scene::Playing);

        // Without the portal the same spike is fatal
        let mut w = parked(vec![LevelObject::spike(wx - 25.0)], 10_000.0);
        step(&mut w, FrameInput::default());
        assert_eq!(w.scene, Scene::Dead);
    }

    #[test]
    fn speed_portal_scales_next_camera_advance() {
        let mut w = playing(vec![LevelObject::speed_portal(PLAYER_SCREEN_X + 6.0, 1.4)], 10_000.0);
        step(&mut w, FrameInput::default());
        assert_eq!(w.run.speed_mult, 1.4);
        let cam = w.run.camera_x;
        step(&mut w, FrameInput::default());
        assert!((w.run.camera_x - cam - 6.0 * 1.4).abs() < 1e-4);
    }

    #[test]
    fn running_into_a_spike_is_fatal() {
        let mut w = playing(vec![LevelObject::spike(600.0)], 5_000.0);
        let mut killed = 0;
        for _ in 0..2_000 {
            let events = step(&mut w, FrameInput::default());
            killed += events
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerKilled { .. }))
                .count();
            if w.scene != Scene::Playing {
                break;
            }
        }
        assert_eq!(w.scene, Scene::Dead);
        assert!(w.player.dead);
        assert_eq!(killed, 1);
        assert_eq!(w.pending_timers(), 1);

        // Dead world no longer ticks
        assert!(step(&mut w, FrameInput::default()).is_empty());
    }

    #[test]
    fn timed_jumps_clear_the_level() {
        let spike_x = 900.0;
        let mut w = playing(vec![LevelObject::spike(spike_x)], 1_500.0);
        let mut completions = 0;
        for _ in 0..2_000 {
            if w.scene != Scene::Playing {
                break;
            }
            let wx = w.run.camera_x + w.player.x;
            let jump = w.player.on_ground && (spike_x - wx) > 0.0 && (spike_x - wx) < 60.0;
            let events = step(&mut w, FrameInput { jump });
            completions += events
                .iter()
                .filter(|e| matches!(e, GameEvent::LevelCompleted { .. }))
                .count();
        }
        assert_eq!(w.scene, Scene::Complete);
        assert_eq!(completions, 1);
        assert!(w.complete_shown);
        // Motion frozen
        assert_eq!(w.run.base_speed, 0.0);
        assert_eq!(w.run.speed_mult, 0.0);
        assert_eq!(w.player.vel_y, 0.0);

        // Re-ticking does not re-fire completion
        let cam = w.run.camera_x;
        assert!(step(&mut w, FrameInput::default()).is_empty());
        assert_eq!(w.run.camera_x, cam);
    }

    #[test]
    fn finish_marker_past_leading_edge_completes() {
        let mut w = parked(vec![], 0.0);
        // Marker already behind the player's leading edge
        w.level.finish_x = w.player.x;
        step(&mut w, FrameInput::default());
        assert_eq!(w.scene, Scene::Complete);
    }

    #[test]
    fn ceiling_rest_after_flip_has_zero_velocity() {
        // Portal flips gravity; the cube falls up and settles on the
        // ceiling with its top edge exactly touching it.
        let mut w = parked(vec![LevelObject::gravity_portal(PLAYER_SCREEN_X)], 10_000.0);
        for _ in 0..300 {
            step(&mut w, FrameInput::default());
        }
        assert_eq!(w.scene, Scene::Playing);
        assert!(w.player.on_ground);
        assert_eq!(w.player.vel_y, 0.0);
        let top = w.player.y - w.player.half();
        assert!((top - physics::boundary_y(w.run.gravity_dir)).abs() < 1e-4);
    }
}
