/// The level editor document.
///
/// A flat list of placed objects on a snapped grid, plus the editor's
/// own camera and the currently selected placement type. The document
/// is the SOURCE a custom play session clones from; nothing that
/// happens during play writes back here.

use crate::domain::entity::ObjectKind;

pub const GRID: f32 = 50.0;
/// Two objects closer than this on the snapped grid are duplicates.
pub const DEDUP_RADIUS: f32 = 10.0;
/// Deletion sweeps everything within this radius of the raw position.
pub const DELETE_RADIUS: f32 = 25.0;
pub const PAN_STEP: f32 = 40.0;

/// Speed-portal strength presets, cycled on each placement.
pub const SPEED_MODES: [f32; 4] = [0.8, 1.0, 1.4, 1.8];

/// A placed object. Same shape as a level object minus the trigger
/// state, which only exists per play attempt.
#[derive(Clone, Debug)]
pub struct EditorObject {
    pub kind: ObjectKind,
    pub x: f32,
    pub w: f32,
    pub h: f32,
    pub speed_mult: f32,
}

pub struct EditorDoc {
    pub objects: Vec<EditorObject>,
    pub cam_x: f32,
    pub selected: ObjectKind,
    pub speed_mode_index: usize,
}

impl EditorDoc {
    pub fn new() -> Self {
        EditorDoc {
            objects: Vec::new(),
            cam_x: 0.0,
            selected: ObjectKind::Spike,
            speed_mode_index: 0,
        }
    }

    /// Snap a world x to the nearest grid line. Exposed so pointer
    /// input can be translated before placement.
    pub fn snap(&self, world_x: f32) -> f32 {
        (world_x / GRID).round() * GRID
    }

    /// Place an object of the selected type at the snapped position.
    /// Ignored (returns false) if another object already sits within
    /// the dedup radius. Speed portals cycle through the strength
    /// presets so repeated placements vary.
    pub fn place(&mut self, world_x: f32) -> bool {
        let x = self.snap(world_x);
        if self.objects.iter().any(|o| (o.x - x).abs() < DEDUP_RADIUS) {
            return false;
        }

        let kind = self.selected;
        let (w, h) = kind.nominal_size();
        let speed_mult = match kind {
            ObjectKind::SpeedPortal => {
                self.speed_mode_index = (self.speed_mode_index + 1) % SPEED_MODES.len();
                SPEED_MODES[self.speed_mode_index]
            }
            _ => 1.0,
        };

        self.objects.push(EditorObject { kind, x, w, h, speed_mult });
        true
    }

    /// Remove every object within the deletion radius of the raw
    /// (unsnapped) position. Returns how many were removed.
    pub fn delete(&mut self, world_x: f32) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| (o.x - world_x).abs() >= DELETE_RADIUS);
        before - self.objects.len()
    }

    pub fn pan(&mut self, dx: f32) {
        self.cam_x += dx;
    }

    pub fn select(&mut self, kind: ObjectKind) {
        self.selected = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_to_nearest_grid_line() {
        let doc = EditorDoc::new();
        assert_eq!(doc.snap(0.0), 0.0);
        assert_eq!(doc.snap(24.0), 0.0);
        assert_eq!(doc.snap(26.0), 50.0);
        assert_eq!(doc.snap(-30.0), -50.0);
    }

    #[test]
    fn place_dedups_within_radius() {
        let mut doc = EditorDoc::new();
        assert!(doc.place(100.0));
        // 95 and 104 both snap to 100: duplicates
        assert!(!doc.place(95.0));
        assert!(!doc.place(104.0));
        assert_eq!(doc.objects.len(), 1);
        // Next grid line is fine
        assert!(doc.place(150.0));
        assert_eq!(doc.objects.len(), 2);
    }

    #[test]
    fn delete_sweeps_wider_than_dedup() {
        let mut doc = EditorDoc::new();
        doc.place(100.0);
        doc.place(150.0);
        doc.place(300.0);
        // 130 is within 25 of nothing snapped... 150 - 130 = 20 < 25,
        // and 100 - 130 = 30 >= 25, so exactly one goes
        assert_eq!(doc.delete(130.0), 1);
        assert_eq!(doc.objects.len(), 2);
        assert!(doc.objects.iter().all(|o| o.x != 150.0));
    }

    #[test]
    fn speed_portal_cycles_presets() {
        let mut doc = EditorDoc::new();
        doc.select(ObjectKind::SpeedPortal);
        let mut seen = Vec::new();
        for i in 0..SPEED_MODES.len() + 1 {
            doc.place(i as f32 * 100.0);
            seen.push(doc.objects.last().unwrap().speed_mult);
        }
        assert_eq!(seen[0], SPEED_MODES[1]);
        assert_eq!(seen[1], SPEED_MODES[2]);
        assert_eq!(seen[2], SPEED_MODES[3]);
        // Wrap-around
        assert_eq!(seen[3], SPEED_MODES[0]);
        assert_eq!(seen[4], SPEED_MODES[1]);
    }

    #[test]
    fn non_portal_placements_keep_unit_multiplier() {
        let mut doc = EditorDoc::new();
        doc.select(ObjectKind::Pad);
        doc.place(0.0);
        assert_eq!(doc.objects[0].speed_mult, 1.0);
    }
}
