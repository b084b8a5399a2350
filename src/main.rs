/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::ThreadRng;
use rand::thread_rng;

use config::GameConfig;
use domain::entity::{FrameInput, ObjectKind};
use sim::editor::PAN_STEP;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Deferred, Scene, World};
use ui::gamepad::GamepadState;
use ui::input::{InputState, PointerAction};
use ui::renderer::{self, Renderer};
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

fn main() {
    let config = GameConfig::load();

    let mut world = World::new(config.tuning.clone());
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Neon Dash!");
}

fn game_loop(
    world: &mut World,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut rng = thread_rng();

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.tuning.tick_rate_ms);

    // Single-slot jump queue: every request between two ticks
    // collapses into one
    let mut jump_queued = false;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, &kb, &gp, &mut rng) {
            break;
        }

        if world.scene == Scene::Playing {
            let click = kb
                .pointer_actions
                .iter()
                .any(|a| matches!(a, PointerAction::Place { .. }));
            // Held keys keep queueing, so holding jump bunny-hops on
            // each landing
            if kb.any_held(KEYS_JUMP) || gp.jump_pressed() || click {
                jump_queued = true;
            }
        } else {
            jump_queued = false;
        }

        // Deferred actions: death restart, completion panel reveal
        for action in world.take_due(Instant::now()) {
            match action {
                Deferred::RestartLevel => world.restart(&mut rng),
                Deferred::RevealCompletePanel => world.complete_panel_visible = true,
            }
        }

        if last_tick.elapsed() >= tick_rate {
            match world.scene {
                Scene::Playing => {
                    let input = FrameInput { jump: jump_queued };
                    jump_queued = false;
                    let events = step::step(world, input);
                    process_sound_events(sound, &events);
                    renderer.absorb_events(&events);
                }
                // Continuous pan is tick-paced, not frame-paced
                Scene::Editor => {
                    if kb.any_held(&[KeyCode::Char('a'), KeyCode::Char('A')]) {
                        world.editor.pan(-PAN_STEP);
                    }
                    if kb.any_held(&[KeyCode::Char('d'), KeyCode::Char('D')]) {
                        world.editor.pan(PAN_STEP);
                    }
                }
                _ => {}
            }
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Jumped { .. } => sfx.play_jump(),
            GameEvent::Landed { .. } => sfx.play_land(),
            GameEvent::PadBounced { .. } => sfx.play_pad(),
            GameEvent::GravityFlipped { .. } => sfx.play_flip(),
            GameEvent::SpeedChanged { .. } => sfx.play_zoom(),
            GameEvent::PlayerKilled { .. } => sfx.play_die(),
            GameEvent::LevelCompleted { .. } => sfx.play_clear(),
        }
    }
}

// ── Key Constants ──

const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Up];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_EDITOR: &[KeyCode] = &[KeyCode::Char('e'), KeyCode::Char('E')];

/// Scene-transition input: menu choices, editor commands, escape
/// routes. Returns true to quit the program.
fn handle_meta(world: &mut World, kb: &InputState, gp: &GamepadState, rng: &mut ThreadRng) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed();
    let esc = kb.any_pressed(&[KeyCode::Esc]) || gp.cancel_pressed();

    match world.scene {
        // ── Menu ──
        Scene::Menu => {
            if confirm || kb.any_pressed(&[KeyCode::Char('1')]) {
                world.start_level(0, rng);
            } else if kb.any_pressed(&[KeyCode::Char('2')]) {
                world.start_level(1, rng);
            } else if kb.any_pressed(&[KeyCode::Char('3')]) {
                world.start_level(2, rng);
            } else if kb.any_pressed(KEYS_EDITOR) {
                world.enter_editor();
            } else if esc || kb.any_pressed(&[KeyCode::Char('q'), KeyCode::Char('Q')]) {
                return true;
            }
        }

        // ── Playing ──
        Scene::Playing => {
            if esc {
                world.go_menu();
            } else if kb.any_pressed(KEYS_RESTART) {
                world.restart(rng);
            }
        }

        // ── Dead (auto-restart pending) ──
        Scene::Dead => {
            if esc {
                world.go_menu();
            }
        }

        // ── Complete ──
        Scene::Complete => {
            if confirm {
                match world.next_level_id() {
                    Some(next) if !world.is_custom => world.start_level(next, rng),
                    _ => world.go_menu(),
                }
            } else if kb.any_pressed(KEYS_RESTART) {
                world.restart(rng);
            } else if esc {
                world.go_menu();
            }
        }

        // ── Editor ──
        Scene::Editor => {
            if esc {
                world.go_menu();
                return false;
            }
            if kb.any_pressed(KEYS_EDITOR) {
                // No-op while the document is empty
                world.start_custom_level();
                return false;
            }

            if kb.any_pressed(&[KeyCode::Char('1')]) {
                world.editor.select(ObjectKind::Spike);
            } else if kb.any_pressed(&[KeyCode::Char('2')]) {
                world.editor.select(ObjectKind::Pad);
            } else if kb.any_pressed(&[KeyCode::Char('3')]) {
                world.editor.select(ObjectKind::GravityPortal);
            } else if kb.any_pressed(&[KeyCode::Char('4')]) {
                world.editor.select(ObjectKind::SpeedPortal);
            }

            for action in &kb.pointer_actions {
                match *action {
                    PointerAction::Place { col, .. } => {
                        let wx = renderer::cell_to_world_x(col, world.editor.cam_x);
                        world.editor.place(wx);
                    }
                    PointerAction::Delete { col, .. } => {
                        let wx = renderer::cell_to_world_x(col, world.editor.cam_x);
                        world.editor.delete(wx);
                    }
                }
            }
        }
    }

    false
}
