/// Vertical physics for the player cube.
///
/// The cube has no horizontal physics at all: the camera scrolls the
/// world underneath it. Everything here is about the y axis and the
/// cosmetic rotation that rides along with it.
///
/// Boundary resolution works against whichever surface the gravity
/// direction makes "down": the ground for +1, the ceiling for -1.
/// After resolution the resting edge touches the boundary exactly and
/// vertical velocity is zero.

use std::f32::consts::FRAC_PI_2;

use super::entity::{Player, CEIL_Y, GROUND_Y};

/// Outcome of one boundary resolution.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    /// Not touching the boundary.
    Airborne,
    /// Touching, and was already on the ground last tick.
    Resting,
    /// Touching for the first time since going airborne.
    Landed,
}

/// The boundary y for a gravity direction.
#[inline]
pub fn boundary_y(gravity_dir: f32) -> f32 {
    if gravity_dir > 0.0 { GROUND_Y } else { CEIL_Y }
}

/// Launch the cube if it is grounded. Airborne requests are dropped
/// (no buffering, no double jump). Returns whether a jump happened.
pub fn try_jump(p: &mut Player, gravity_dir: f32, impulse: f32) -> bool {
    if !p.on_ground {
        return false;
    }
    p.vel_y = -gravity_dir * impulse;
    p.on_ground = false;
    true
}

/// Gravity integration: velocity then position.
pub fn integrate(p: &mut Player, gravity: f32, gravity_dir: f32) {
    p.vel_y += gravity * gravity_dir;
    p.y += p.vel_y;
}

/// Clamp the cube against the active boundary.
///
/// If the leading edge has crossed it, the cube is snapped to rest
/// exactly on the boundary with zero velocity; a first touch after
/// airtime also snaps the rotation to the nearest quarter turn.
pub fn resolve_boundary(p: &mut Player, gravity_dir: f32) -> Contact {
    let half = p.half();
    let by = boundary_y(gravity_dir);

    let crossed = if gravity_dir > 0.0 {
        p.y + half >= by
    } else {
        p.y - half <= by
    };

    if !crossed {
        p.on_ground = false;
        return Contact::Airborne;
    }

    p.y = by - gravity_dir * half;
    p.vel_y = 0.0;
    let landed = !p.on_ground;
    if landed {
        snap_rotation(p);
    }
    p.on_ground = true;
    if landed { Contact::Landed } else { Contact::Resting }
}

/// Continuous airborne spin. Grounded cubes do not rotate.
pub fn spin(p: &mut Player, spin_rate: f32, gravity_dir: f32) {
    if !p.on_ground {
        p.rotation += spin_rate * gravity_dir;
    }
}

/// Snap rotation to the nearest multiple of 90 degrees.
pub fn snap_rotation(p: &mut Player) {
    p.rotation = (p.rotation / FRAC_PI_2).round() * FRAC_PI_2;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn airborne_player(y: f32, vel_y: f32) -> Player {
        let mut p = Player::spawn();
        p.y = y;
        p.vel_y = vel_y;
        p.on_ground = false;
        p
    }

    #[test]
    fn resting_edge_touches_boundary_both_directions() {
        for dir in [1.0_f32, -1.0] {
            let start = if dir > 0.0 { GROUND_Y - 100.0 } else { CEIL_Y + 100.0 };
            let mut p = airborne_player(start, 0.0);
            // Fall until contact
            for _ in 0..200 {
                integrate(&mut p, 0.7, dir);
                if resolve_boundary(&mut p, dir) != Contact::Airborne {
                    break;
                }
            }
            assert!(p.on_ground);
            assert_eq!(p.vel_y, 0.0);
            let edge = p.y + dir * p.half();
            assert!((edge - boundary_y(dir)).abs() < 1e-4);
        }
    }

    #[test]
    fn jump_denied_while_airborne() {
        let mut p = airborne_player(200.0, -5.0);
        assert!(!try_jump(&mut p, 1.0, 13.0));
        assert_eq!(p.vel_y, -5.0);
    }

    #[test]
    fn jump_launches_against_gravity() {
        let mut p = Player::spawn();
        assert!(try_jump(&mut p, 1.0, 13.0));
        assert_eq!(p.vel_y, -13.0);
        assert!(!p.on_ground);

        let mut q = Player::spawn();
        assert!(try_jump(&mut q, -1.0, 13.0));
        assert_eq!(q.vel_y, 13.0);
    }

    #[test]
    fn landing_snaps_rotation() {
        let mut p = airborne_player(GROUND_Y - 60.0, 0.0);
        p.rotation = 0.8; // between 0 and PI/2, nearer PI/2
        loop {
            integrate(&mut p, 0.7, 1.0);
            if resolve_boundary(&mut p, 1.0) == Contact::Landed {
                break;
            }
        }
        assert!((p.rotation - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn snap_rotation_handles_negatives() {
        let mut p = Player::spawn();
        p.rotation = -PI - 0.3; // nearest multiple is -PI
        snap_rotation(&mut p);
        assert!((p.rotation + PI).abs() < 1e-6);
    }

    #[test]
    fn spin_only_while_airborne() {
        let mut p = Player::spawn();
        spin(&mut p, 0.22, 1.0);
        assert_eq!(p.rotation, 0.0);

        p.on_ground = false;
        spin(&mut p, 0.22, 1.0);
        assert!((p.rotation - 0.22).abs() < 1e-6);
        spin(&mut p, 0.22, -1.0);
        assert!(p.rotation.abs() < 1e-6);
    }

    #[test]
    fn resting_contact_does_not_resnap() {
        let mut p = Player::spawn();
        // Already grounded: contact is Resting and rotation untouched
        // even at an off-grid angle
        p.rotation = 0.3;
        integrate(&mut p, 0.7, 1.0);
        assert_eq!(resolve_boundary(&mut p, 1.0), Contact::Resting);
        assert_eq!(p.rotation, 0.3);
    }
}
