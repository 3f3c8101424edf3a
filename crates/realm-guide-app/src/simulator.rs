//! Keyboard stand-in for hand gestures
//!
//! Maps keys to tutorial entry events so the engine can be driven without AR
//! hardware.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use realm_guide_core::{InputEvent, Vector3D};

use crate::content::{GENRES, STORY_SHAPES};

/// Pointer units per arrow key press
const POINTER_STEP: f32 = 50.0;

/// Outcome of a key press
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Input(Vec<InputEvent>),
    Quit,
    Ignored,
}

/// Turns key presses into tutorial input, tracking the simulated grab
pub struct KeySimulator {
    hero: String,
    microphone: String,
    lightbulb: String,
    grabbing: bool,
    translation: Vector3D,
    genre: usize,
    story_shape: usize,
}

impl KeySimulator {
    pub fn new(hero: impl Into<String>, microphone: impl Into<String>) -> Self {
        Self {
            hero: hero.into(),
            microphone: microphone.into(),
            lightbulb: "LightbulbInteractive".to_string(),
            grabbing: false,
            translation: Vector3D::ZERO,
            genre: 0,
            story_shape: 0,
        }
    }

    /// Forget the grab, e.g. after the session rejected it
    pub fn release(&mut self) {
        self.grabbing = false;
        self.translation = Vector3D::ZERO;
    }

    pub fn process_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::Ignored;
        }
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyAction::Quit;
        }

        let event = match key.code {
            KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char(' ') => self.toggle_grab(),
            KeyCode::Left => return self.nudge(-POINTER_STEP, 0.0, 0.0),
            KeyCode::Right => return self.nudge(POINTER_STEP, 0.0, 0.0),
            // Pointer space grows downward
            KeyCode::Up => return self.nudge(0.0, -POINTER_STEP, 0.0),
            KeyCode::Down => return self.nudge(0.0, POINTER_STEP, 0.0),
            KeyCode::PageUp => return self.nudge(0.0, 0.0, -POINTER_STEP),
            KeyCode::PageDown => return self.nudge(0.0, 0.0, POINTER_STEP),
            KeyCode::Enter | KeyCode::Char('n') => InputEvent::AdvanceStep,
            KeyCode::Backspace | KeyCode::Char('b') => InputEvent::GoBackStep,
            KeyCode::Char('r') => {
                self.release();
                InputEvent::Restart
            }
            KeyCode::Char('m') => InputEvent::tap(self.microphone.clone()),
            KeyCode::Char('l') => InputEvent::tap(self.lightbulb.clone()),
            KeyCode::Char('g') => {
                let genre = GENRES[self.genre % GENRES.len()];
                self.genre += 1;
                InputEvent::select("genre", genre)
            }
            KeyCode::Char('p') => {
                let shape = STORY_SHAPES[self.story_shape % STORY_SHAPES.len()];
                self.story_shape += 1;
                InputEvent::select("story_shape", shape)
            }
            KeyCode::Char('u') => InputEvent::UnlockNext,
            _ => return KeyAction::Ignored,
        };
        KeyAction::Input(vec![event])
    }

    fn toggle_grab(&mut self) -> InputEvent {
        self.grabbing = !self.grabbing;
        self.translation = Vector3D::ZERO;
        if self.grabbing {
            InputEvent::begin_drag(self.hero.clone())
        } else {
            InputEvent::end_drag(self.hero.clone())
        }
    }

    fn nudge(&mut self, dx: f32, dy: f32, dz: f32) -> KeyAction {
        if !self.grabbing {
            return KeyAction::Ignored;
        }
        self.translation = self.translation + Vector3D::new(dx, dy, dz);
        KeyAction::Input(vec![InputEvent::update_drag(
            self.hero.clone(),
            self.translation,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sim() -> KeySimulator {
        KeySimulator::new("TestAnimation", "MicrophoneInteractive")
    }

    #[test]
    fn test_arrows_only_move_while_grabbing() {
        let mut sim = sim();
        assert_eq!(sim.process_key(press(KeyCode::Right)), KeyAction::Ignored);

        assert_eq!(
            sim.process_key(press(KeyCode::Char(' '))),
            KeyAction::Input(vec![InputEvent::begin_drag("TestAnimation")])
        );
        sim.process_key(press(KeyCode::Right));
        let action = sim.process_key(press(KeyCode::Up));
        assert_eq!(
            action,
            KeyAction::Input(vec![InputEvent::update_drag(
                "TestAnimation",
                Vector3D::new(50.0, -50.0, 0.0)
            )])
        );

        assert_eq!(
            sim.process_key(press(KeyCode::Char(' '))),
            KeyAction::Input(vec![InputEvent::end_drag("TestAnimation")])
        );
        assert_eq!(sim.process_key(press(KeyCode::Left)), KeyAction::Ignored);
    }

    #[test]
    fn test_palette_cycles_choices() {
        let mut sim = sim();
        assert_eq!(
            sim.process_key(press(KeyCode::Char('g'))),
            KeyAction::Input(vec![InputEvent::select("genre", "Fantasy")])
        );
        assert_eq!(
            sim.process_key(press(KeyCode::Char('g'))),
            KeyAction::Input(vec![InputEvent::select("genre", "Science Fiction")])
        );
    }

    #[test]
    fn test_quit_keys() {
        let mut sim = sim();
        assert_eq!(
            sim.process_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(sim.process_key(press(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(sim.process_key(press(KeyCode::Char('z'))), KeyAction::Ignored);
    }
}
