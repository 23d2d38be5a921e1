//! Question deck and the quiz overlay

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::dialogue::{Overlay, open_popup};
use super::state::{GameEvent, GameState};
use crate::audio::SoundCue;

/// Draws question indices without repetition within a session
///
/// A drawn index stays consumed even if its bubble is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDeck {
    used: Vec<bool>,
}

impl QuestionDeck {
    pub fn new(pool_size: usize) -> Self {
        Self {
            used: vec![false; pool_size],
        }
    }

    /// Uniformly pick an unused question; `None` once the pool is exhausted
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        let unused: Vec<usize> = self
            .used
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(i, _)| i)
            .collect();
        if unused.is_empty() {
            return None;
        }
        let index = unused[rng.random_range(0..unused.len())];
        self.used[index] = true;
        Some(index)
    }

    pub fn remaining(&self) -> usize {
        self.used.iter().filter(|used| !**used).count()
    }
}

/// An open question with the highlighted option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub question: usize,
    pub selected: usize,
}

impl QuizSession {
    pub fn new(question: usize) -> Self {
        Self { question, selected: 0 }
    }

    pub fn select_previous(&mut self, option_count: usize) {
        if option_count > 0 {
            self.selected = (self.selected + option_count - 1) % option_count;
        }
    }

    pub fn select_next(&mut self, option_count: usize) {
        if option_count > 0 {
            self.selected = (self.selected + 1) % option_count;
        }
    }
}

/// Open the pending question once the player is standing and nothing else is on screen
pub fn open_pending(state: &mut GameState) {
    let Some(question) = state.pending_question else {
        return;
    };
    if !state.player.on_ground || state.in_dialogue() {
        return;
    }
    state.pending_question = None;
    let Some(q) = state.content.question(question) else {
        log::warn!("Pending question {} no longer exists", question);
        return;
    };
    log::debug!("Quiz opened: #{} {:?}", q.id, q.prompt);
    state.overlay = Overlay::Quiz(QuizSession::new(question));
    state.emit(GameEvent::QuizOpened { question });
}

/// Resolve the chosen option: adjust hearts, fire the cue, show the response
pub fn answer(state: &mut GameState, question: usize, option: usize) {
    let Some(picked) = state
        .content
        .question(question)
        .and_then(|q| q.options.get(option))
    else {
        log::warn!("Answer {} for question {} is out of range", option, question);
        state.overlay = Overlay::None;
        return;
    };
    let correct = picked.correct;
    let response = picked.response.clone();

    if correct {
        state.resources.gain();
        state.play(SoundCue::Correct);
    } else {
        state.resources.lose();
        state.play(SoundCue::Hit);
    }
    log::info!(
        "Answered question {}: {} ({} hearts)",
        question,
        if correct { "correct" } else { "wrong" },
        state.resources.hearts()
    );
    state.emit(GameEvent::QuizAnswered { question, correct });
    open_popup(state, response, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_deck_draws_each_question_once() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut deck = QuestionDeck::new(5);
        let mut seen: Vec<usize> = (0..5).filter_map(|_| deck.draw(&mut rng)).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(deck.draw(&mut rng), None);
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn test_selection_wraps() {
        let mut quiz = QuizSession::new(0);
        quiz.select_previous(3);
        assert_eq!(quiz.selected, 2);
        quiz.select_next(3);
        assert_eq!(quiz.selected, 0);
    }

    #[test]
    fn test_correct_answer_gains_heart() {
        let mut state = GameState::with_seed(1);
        state.start_session();
        let correct = state.content.questions[0].correct_index().unwrap_or(0);
        state.overlay = Overlay::Quiz(QuizSession::new(0));
        answer(&mut state, 0, correct);
        assert_eq!(state.resources.hearts(), 4);
        assert!(matches!(state.overlay, Overlay::Popup(_)));
        assert!(!state.paused);
        assert!(state.events.contains(&GameEvent::Sound(SoundCue::Correct)));
    }

    #[test]
    fn test_wrong_answer_loses_heart() {
        let mut state = GameState::with_seed(1);
        state.start_session();
        let wrong = (state.content.questions[0].correct_index().unwrap_or(0) + 1) % 3;
        answer(&mut state, 0, wrong);
        assert_eq!(state.resources.hearts(), 2);
        assert!(state.events.contains(&GameEvent::QuizAnswered { question: 0, correct: false }));
    }

    #[test]
    fn test_pending_waits_for_ground() {
        let mut state = GameState::with_seed(1);
        state.start_session();
        state.pending_question = Some(4);
        state.player.on_ground = false;
        open_pending(&mut state);
        assert!(!state.in_dialogue());
        state.player.on_ground = true;
        open_pending(&mut state);
        assert_eq!(state.overlay, Overlay::Quiz(QuizSession::new(4)));
        assert_eq!(state.pending_question, None);
    }
}
