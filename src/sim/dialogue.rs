//! Overlays: the scripted greeting, the quiz and modal popups
//!
//! At most one overlay is open at a time. While any overlay is open, the
//! player and hazards are frozen; the countdown keeps running unless a
//! popup was opened with `pause`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::quiz::{self, QuizSession};
use super::state::{Facing, GameEvent, GameState};
use super::tick::Controls;
use crate::content::GreetingScript;

/// Whatever is drawn on top of the world
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Overlay {
    #[default]
    None,
    Greeting(GreetingDialogue),
    Quiz(QuizSession),
    Popup(Popup),
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::None)
    }
}

/// One navigation input per frame, confirm wins over direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueInput {
    Advance,
    Up,
    Down,
}

impl DialogueInput {
    pub fn from_controls(controls: &Controls) -> Option<Self> {
        if controls.confirm_pressed {
            Some(DialogueInput::Advance)
        } else if controls.up_pressed {
            Some(DialogueInput::Up)
        } else if controls.down_pressed {
            Some(DialogueInput::Down)
        } else {
            None
        }
    }
}

/// Position within the greeting script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GreetingPhase {
    Intro { line: usize },
    Options { selected: usize },
    CompanionReply { choice: usize, variant: usize },
    PlayerReply { choice: usize, variant: usize },
    Mainline { line: usize },
    End,
}

impl GreetingPhase {
    /// Phase the script opens on
    pub fn first(script: &GreetingScript) -> Self {
        if !script.intro.is_empty() {
            GreetingPhase::Intro { line: 0 }
        } else {
            Self::after_intro(script)
        }
    }

    fn after_intro(script: &GreetingScript) -> Self {
        if !script.choices.is_empty() {
            GreetingPhase::Options { selected: 0 }
        } else {
            Self::mainline_from(script, 0)
        }
    }

    fn mainline_from(script: &GreetingScript, line: usize) -> Self {
        if line < script.mainline.len() {
            GreetingPhase::Mainline { line }
        } else {
            GreetingPhase::End
        }
    }

    /// Transition table; each reply line is picked from `rng` as its phase opens
    pub fn next<R: Rng>(self, input: DialogueInput, script: &GreetingScript, rng: &mut R) -> Self {
        use DialogueInput::*;
        match (self, input) {
            (GreetingPhase::Intro { line }, Advance) => {
                if line + 1 < script.intro.len() {
                    GreetingPhase::Intro { line: line + 1 }
                } else {
                    Self::after_intro(script)
                }
            }
            (GreetingPhase::Options { selected }, Up) => {
                let n = script.choices.len().max(1);
                GreetingPhase::Options {
                    selected: (selected + n - 1) % n,
                }
            }
            (GreetingPhase::Options { selected }, Down) => {
                let n = script.choices.len().max(1);
                GreetingPhase::Options {
                    selected: (selected + 1) % n,
                }
            }
            (GreetingPhase::Options { selected }, Advance) => {
                let Some(choice) = script.choices.get(selected) else {
                    return Self::mainline_from(script, 0);
                };
                if choice.companion_replies.is_empty() {
                    GreetingPhase::PlayerReply {
                        choice: selected,
                        variant: pick_variant(&choice.player_replies, rng),
                    }
                    .skip_empty(script)
                } else {
                    GreetingPhase::CompanionReply {
                        choice: selected,
                        variant: pick_variant(&choice.companion_replies, rng),
                    }
                }
            }
            (GreetingPhase::CompanionReply { choice, .. }, Advance) => {
                let variant = script
                    .choices
                    .get(choice)
                    .map_or(0, |c| pick_variant(&c.player_replies, rng));
                GreetingPhase::PlayerReply { choice, variant }.skip_empty(script)
            }
            (GreetingPhase::PlayerReply { .. }, Advance) => Self::mainline_from(script, 0),
            (GreetingPhase::Mainline { line }, Advance) => Self::mainline_from(script, line + 1),
            (phase, _) => phase,
        }
    }

    fn skip_empty(self, script: &GreetingScript) -> Self {
        match self {
            GreetingPhase::PlayerReply { choice, .. }
                if script
                    .choices
                    .get(choice)
                    .is_none_or(|c| c.player_replies.is_empty()) =>
            {
                Self::mainline_from(script, 0)
            }
            phase => phase,
        }
    }
}

/// Uniform index into a list of reply variants
fn pick_variant<R: Rng>(lines: &[String], rng: &mut R) -> usize {
    if lines.len() > 1 { rng.random_range(0..lines.len()) } else { 0 }
}

/// Text the renderer should show for the current dialogue step
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueText<'a> {
    Line(&'a str),
    Choices {
        prompt: Option<&'a str>,
        options: Vec<&'a str>,
        selected: usize,
    },
}

/// Greeting overlay state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreetingDialogue {
    pub phase: GreetingPhase,
}

impl GreetingDialogue {
    pub fn new(script: &GreetingScript) -> Self {
        Self {
            phase: GreetingPhase::first(script),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GreetingPhase::End
    }

    pub fn text<'a>(&self, script: &'a GreetingScript) -> Option<DialogueText<'a>> {
        match self.phase {
            GreetingPhase::Intro { line } => script.intro.get(line).map(|s| DialogueText::Line(s)),
            GreetingPhase::Options { selected } => Some(DialogueText::Choices {
                prompt: script.intro.last().map(String::as_str),
                options: script.choices.iter().map(|c| c.label.as_str()).collect(),
                selected,
            }),
            GreetingPhase::CompanionReply { choice, variant } => script
                .choices
                .get(choice)
                .and_then(|c| c.companion_replies.get(variant))
                .map(|s| DialogueText::Line(s)),
            GreetingPhase::PlayerReply { choice, variant } => script
                .choices
                .get(choice)
                .and_then(|c| c.player_replies.get(variant))
                .map(|s| DialogueText::Line(s)),
            GreetingPhase::Mainline { line } => script.mainline.get(line).map(|s| DialogueText::Line(s)),
            GreetingPhase::End => None,
        }
    }
}

/// Modal message closed with confirm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub text: String,
    /// Popup paused the game and clears the pause when dismissed
    pub resume_on_close: bool,
}

/// Show a modal message; `pause` also freezes the countdown until it closes
pub fn open_popup(state: &mut GameState, text: impl Into<String>, pause: bool) {
    if pause {
        state.paused = true;
    }
    state.overlay = Overlay::Popup(Popup {
        text: text.into(),
        resume_on_close: pause,
    });
}

/// Open the greeting and turn both characters toward each other
pub fn open_greeting(state: &mut GameState) {
    state.overlay = Overlay::Greeting(GreetingDialogue::new(&state.content.greeting));
    face_each_other(state);
    state.emit(GameEvent::GreetingStarted);
    log::info!("Greeting started");
    if matches!(&state.overlay, Overlay::Greeting(d) if d.is_finished()) {
        finish_greeting(state);
    }
}

fn face_each_other(state: &mut GameState) {
    let player_x = state.player.center_x();
    let companion_x = state.companion.center_x();
    state.companion.facing = Facing::toward(companion_x, player_x);
    state.player.facing = Facing::toward(player_x, companion_x);
    if player_x == companion_x {
        state.player.facing = Facing::Left;
    }
}

fn finish_greeting(state: &mut GameState) {
    state.overlay = Overlay::None;
    state.greeting_complete = true;
    state.forward_timer.reset();
    state.emit(GameEvent::GreetingFinished);
    log::info!("Greeting finished, runners will start once the player heads out");
}

/// What the overlay wants done once its own borrow has ended
enum Followup {
    Nothing,
    GreetingDone,
    Answer { question: usize, option: usize },
    Close { resume: bool },
}

/// Feed this frame's presses to the open overlay
pub fn update_overlay(state: &mut GameState, controls: &Controls) {
    if matches!(state.overlay, Overlay::Greeting(_)) {
        face_each_other(state);
    }
    let Some(input) = DialogueInput::from_controls(controls) else {
        return;
    };

    let followup = match &mut state.overlay {
        Overlay::None => Followup::Nothing,
        Overlay::Greeting(dialogue) => {
            dialogue.phase = dialogue.phase.next(input, &state.content.greeting, &mut state.rng);
            if dialogue.is_finished() {
                Followup::GreetingDone
            } else {
                Followup::Nothing
            }
        }
        Overlay::Quiz(session) => {
            let option_count = state
                .content
                .question(session.question)
                .map_or(0, |q| q.options.len());
            match input {
                DialogueInput::Up => {
                    session.select_previous(option_count);
                    Followup::Nothing
                }
                DialogueInput::Down => {
                    session.select_next(option_count);
                    Followup::Nothing
                }
                DialogueInput::Advance => Followup::Answer {
                    question: session.question,
                    option: session.selected,
                },
            }
        }
        Overlay::Popup(popup) => match input {
            DialogueInput::Advance => Followup::Close {
                resume: popup.resume_on_close,
            },
            _ => Followup::Nothing,
        },
    };

    match followup {
        Followup::Nothing => {}
        Followup::GreetingDone => finish_greeting(state),
        Followup::Answer { question, option } => quiz::answer(state, question, option),
        Followup::Close { resume } => {
            state.overlay = Overlay::None;
            if resume {
                state.paused = false;
            }
        }
    }
}
