//! Title screen menu

use serde::{Deserialize, Serialize};

use super::dialogue::{open_popup, update_overlay};
use super::state::{GameState, SessionTransition};
use super::tick::Controls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleItem {
    HowToPlay,
    Start,
}

impl TitleItem {
    pub const ALL: [TitleItem; 2] = [TitleItem::HowToPlay, TitleItem::Start];

    pub fn label(self) -> &'static str {
        match self {
            TitleItem::HowToPlay => "How to Play",
            TitleItem::Start => "Start",
        }
    }
}

/// Highlighted title menu entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleMenu {
    pub selected: usize,
}

impl Default for TitleMenu {
    fn default() -> Self {
        Self {
            selected: TitleItem::ALL
                .iter()
                .position(|&item| item == TitleItem::Start)
                .unwrap_or(0),
        }
    }
}

impl TitleMenu {
    pub fn item(&self) -> TitleItem {
        TitleItem::ALL[self.selected % TitleItem::ALL.len()]
    }

    pub fn previous(&mut self) {
        let n = TitleItem::ALL.len();
        self.selected = (self.selected + n - 1) % n;
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % TitleItem::ALL.len();
    }
}

pub fn update_title(state: &mut GameState, controls: &Controls) {
    // The controls popup takes every key until dismissed
    if state.in_dialogue() {
        update_overlay(state, controls);
        return;
    }

    if controls.up_pressed {
        state.title.previous();
    } else if controls.down_pressed {
        state.title.next();
    }

    if !controls.confirm_pressed {
        return;
    }
    match state.title.item() {
        TitleItem::HowToPlay => {
            let text = state.content.how_to_play.clone();
            open_popup(state, text, true);
        }
        TitleItem::Start => state.request(SessionTransition::Restart),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Mode;

    fn confirm() -> Controls {
        Controls {
            confirm_pressed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_is_default() {
        let mut state = GameState::with_seed(8);
        assert_eq!(state.title.item(), TitleItem::Start);
        update_title(&mut state, &confirm());
        assert_eq!(state.pending_transition, Some(SessionTransition::Restart));
        state.apply_pending_transition();
        assert_eq!(state.mode, Mode::Play);
    }

    #[test]
    fn test_how_to_play_popup_pauses() {
        let mut state = GameState::with_seed(8);
        let up = Controls {
            up_pressed: true,
            ..Default::default()
        };
        update_title(&mut state, &up);
        assert_eq!(state.title.item(), TitleItem::HowToPlay);
        update_title(&mut state, &confirm());
        assert!(state.paused);
        assert!(state.in_dialogue());
        // Confirm closes the popup rather than activating the menu
        update_title(&mut state, &confirm());
        assert!(!state.paused);
        assert!(!state.in_dialogue());
        assert_eq!(state.pending_transition, None);
    }
}
