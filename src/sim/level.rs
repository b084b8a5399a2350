/// Level construction: the built-in level table and the two ways a
/// playable level comes to exist (procedural generation, editor
/// snapshot).
///
/// The finish marker is placed asymmetrically on purpose: procedural
/// levels pin it to the target distance, custom levels derive it from
/// the last placed object plus a margin.

use rand::Rng;

use crate::domain::entity::{Level, LevelObject};
use crate::domain::generate::{self, Difficulty};

use super::editor::EditorDoc;

/// Margin between the last placed object and a custom level's finish.
pub const CUSTOM_FINISH_MARGIN: f32 = 250.0;

pub struct LevelSpec {
    pub name: &'static str,
    pub target_seconds: f32,
    pub difficulty: Difficulty,
}

pub const LEVELS: [LevelSpec; 3] = [
    LevelSpec { name: "Stereo Lite", target_seconds: 25.0, difficulty: Difficulty::Easy },
    LevelSpec { name: "Harder Dash", target_seconds: 35.0, difficulty: Difficulty::Hard },
    LevelSpec { name: "Insane Run", target_seconds: 40.0, difficulty: Difficulty::Insane },
];

/// Build a fresh procedural layout for a built-in level. Called on
/// every attempt, so each retry faces a new arrangement.
pub fn build(rng: &mut impl Rng, px_per_sec: f32, spec: &LevelSpec) -> Level {
    generate::generate(rng, px_per_sec, spec.target_seconds, spec.difficulty)
}

/// Snapshot the editor document into a playable level.
/// An empty document yields None: there is nothing to play.
pub fn from_editor(doc: &EditorDoc) -> Option<Level> {
    if doc.objects.is_empty() {
        return None;
    }

    let objects: Vec<LevelObject> = doc
        .objects
        .iter()
        .map(|o| LevelObject {
            kind: o.kind,
            x: o.x,
            w: o.w,
            h: o.h,
            speed_mult: o.speed_mult,
            triggered: false,
        })
        .collect();

    let max_x = objects.iter().map(|o| o.x).fold(f32::MIN, f32::max);
    Some(Level { objects, finish_x: max_x + CUSTOM_FINISH_MARGIN })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ObjectKind;

    #[test]
    fn empty_editor_doc_yields_no_level() {
        let doc = EditorDoc::new();
        assert!(from_editor(&doc).is_none());
    }

    #[test]
    fn custom_finish_is_last_object_plus_margin() {
        let mut doc = EditorDoc::new();
        doc.place(100.0);
        doc.place(600.0);
        doc.place(350.0);
        let level = from_editor(&doc).unwrap();
        assert_eq!(level.finish_x, 600.0 + CUSTOM_FINISH_MARGIN);
        assert_eq!(level.objects.len(), 3);
    }

    #[test]
    fn snapshot_resets_trigger_state_and_keeps_strength() {
        let mut doc = EditorDoc::new();
        doc.select(ObjectKind::SpeedPortal);
        doc.place(200.0);
        let mult = doc.objects[0].speed_mult;
        let level = from_editor(&doc).unwrap();
        assert!(!level.objects[0].triggered);
        assert_eq!(level.objects[0].speed_mult, mult);
        // The document itself is untouched by conversion
        assert_eq!(doc.objects.len(), 1);
    }
}
