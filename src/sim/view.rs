//! Render snapshot
//!
//! `FrameView` is everything a renderer needs for one frame, captured from
//! the state without borrowing it. The simulation never reads it back.

use serde::Serialize;

use super::dialogue::{DialogueText, Overlay};
use super::ending::{EndReason, EndingPhase, EndingState, EndingTier, Headline};
use super::state::{Facing, GameState, Mode};
use super::title::TitleItem;
use crate::assets::AssetId;
use crate::consts::PARALLAX_FACTOR;
use crate::content::{Content, CreditLine};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub facing: Facing,
    pub sprite: AssetId,
    /// Opacity (characters fade out during the narrative ending)
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub fallen: bool,
    pub sprite: AssetId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub has_question: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DogView {
    pub x: f32,
    pub y: f32,
    pub sprite: AssetId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub hearts: u8,
    pub max_hearts: u8,
    pub seconds_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverlayKind {
    Greeting,
    Quiz,
    Popup,
}

/// Dialogue box contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub kind: OverlayKind,
    /// Line or prompt
    pub text: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleView {
    pub items: Vec<&'static str>,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryView {
    /// Option text revealed so far by the typewriter
    pub text: String,
    pub alpha: f32,
    pub blink_alpha: f32,
    pub veil_alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditsView {
    pub scroll_y: f32,
    pub lines: Vec<CreditLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndingView {
    pub reason: EndReason,
    pub tier: EndingTier,
    pub hearts: u8,
    pub phase: EndingPhase,
    pub headline: Option<String>,
    pub headline_alpha: f32,
    pub fade: f32,
    pub flash_alpha: f32,
    pub seq_alpha: f32,
    pub dimmer: f32,
    pub frame: Option<AssetId>,
    pub background: Option<AssetId>,
    pub score_message: Option<String>,
    pub caption: Option<String>,
    pub caption_alpha: f32,
    pub tier_title: String,
    pub tier_body: String,
    pub retry: Option<RetryView>,
    pub credits: Option<CreditsView>,
}

/// Complete snapshot for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub mode: Mode,
    pub time_ms: f64,
    pub camera_x: f32,
    /// Background offset (scrolls slower than the camera)
    pub parallax_x: f32,
    pub background: AssetId,
    pub player: ActorView,
    pub companion: ActorView,
    pub runners: Vec<RunnerView>,
    pub bubbles: Vec<BubbleView>,
    pub dog: DogView,
    pub hud: HudView,
    pub paused: bool,
    pub overlay: Option<OverlayView>,
    pub title: Option<TitleView>,
    pub ending: Option<EndingView>,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let char_alpha = state.ending.as_ref().map_or(1.0, |e| e.char_alpha);
        let ending = state
            .ending
            .as_ref()
            .map(|ending| ending_view(ending, &state.content));
        let background = match state.mode {
            Mode::Title => AssetId::StartBackground,
            Mode::Play => AssetId::RiversideBackground,
            Mode::Ending => ending
                .as_ref()
                .and_then(|e| e.background)
                .unwrap_or(AssetId::RiversideBackground),
        };

        Self {
            mode: state.mode,
            time_ms: state.time_ms,
            camera_x: state.camera_x,
            parallax_x: state.camera_x * PARALLAX_FACTOR,
            background,
            player: player_view(state, char_alpha),
            companion: companion_view(state, char_alpha),
            runners: state
                .runners
                .iter()
                .filter(|_| state.runners_enabled)
                .map(|r| RunnerView {
                    id: r.id,
                    x: r.pos.x,
                    y: r.pos.y,
                    fallen: r.fallen,
                    sprite: if r.fallen {
                        AssetId::RunnerFallen
                    } else {
                        AssetId::RunnerRun(r.walk.frame)
                    },
                })
                .collect(),
            bubbles: state
                .bubbles
                .iter()
                .filter(|b| b.alive)
                .map(|b| BubbleView {
                    id: b.id,
                    x: b.pos.x,
                    y: b.pos.y,
                    size: b.size.x,
                    has_question: b.question.is_some(),
                })
                .collect(),
            dog: DogView {
                x: state.dog.pos.x,
                y: state.dog.pos.y,
                sprite: AssetId::DogFrame(state.dog.frame),
            },
            hud: HudView {
                hearts: state.resources.hearts(),
                max_hearts: state.resources.max_hearts(),
                seconds_left: state.resources.seconds_left(),
            },
            paused: state.paused,
            overlay: overlay_view(state),
            title: (state.mode == Mode::Title).then(|| TitleView {
                items: TitleItem::ALL.iter().map(|item| item.label()).collect(),
                selected: state.title.selected,
            }),
            ending,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn player_view(state: &GameState, alpha: f32) -> ActorView {
    let p = &state.player;
    let sprite = if p.vel.x != 0.0 {
        AssetId::PlayerWalk(p.facing, p.walk.frame)
    } else if !p.on_ground {
        AssetId::PlayerWalk(p.facing, 0)
    } else {
        AssetId::PlayerStand
    };
    ActorView {
        x: p.pos.x,
        y: p.pos.y,
        w: p.size.x,
        h: p.size.y,
        facing: p.facing,
        sprite,
        alpha,
    }
}

fn companion_view(state: &GameState, alpha: f32) -> ActorView {
    let c = &state.companion;
    let sprite = if matches!(state.overlay, Overlay::Greeting(_)) && c.facing == Facing::Left {
        AssetId::CompanionChat
    } else if c.vel.x != 0.0 {
        AssetId::CompanionWalk(c.facing, c.walk.frame)
    } else if c.idle && c.facing == Facing::Right {
        AssetId::CompanionStand
    } else {
        AssetId::CompanionWalk(c.facing, 0)
    };
    ActorView {
        x: c.pos.x,
        y: c.pos.y,
        w: c.size.x,
        h: c.size.y,
        facing: c.facing,
        sprite,
        alpha,
    }
}

fn overlay_view(state: &GameState) -> Option<OverlayView> {
    match &state.overlay {
        Overlay::None => None,
        Overlay::Greeting(dialogue) => {
            let view = match dialogue.text(&state.content.greeting)? {
                DialogueText::Line(line) => OverlayView {
                    kind: OverlayKind::Greeting,
                    text: line.to_string(),
                    options: Vec::new(),
                    selected: None,
                },
                DialogueText::Choices {
                    prompt,
                    options,
                    selected,
                } => OverlayView {
                    kind: OverlayKind::Greeting,
                    text: prompt.unwrap_or_default().to_string(),
                    options: options.into_iter().map(str::to_string).collect(),
                    selected: Some(selected),
                },
            };
            Some(view)
        }
        Overlay::Quiz(session) => {
            let question = state.content.question(session.question)?;
            Some(OverlayView {
                kind: OverlayKind::Quiz,
                text: question.prompt.clone(),
                options: question
                    .options
                    .iter()
                    .map(|o| format!("{}. {}", o.label, o.text))
                    .collect(),
                selected: Some(session.selected),
            })
        }
        Overlay::Popup(popup) => Some(OverlayView {
            kind: OverlayKind::Popup,
            text: popup.text.clone(),
            options: Vec::new(),
            selected: None,
        }),
    }
}

fn ending_view(ending: &EndingState, content: &Content) -> EndingView {
    let text = &content.ending;
    let theme = ending.tier.theme();

    let headline = ending.headline().map(|h| match h {
        Headline::TimeUp => text.time_up_headline.clone(),
        Headline::GameOver => text.game_over_headline.clone(),
        Headline::TryAgain => text.try_again_headline.clone(),
    });

    let cinematic = matches!(
        ending.phase,
        EndingPhase::AngryCinematic | EndingPhase::AngryMenu | EndingPhase::SeqFadeIn
    );
    let frame = theme
        .filter(|_| cinematic)
        .map(|theme| AssetId::CinematicFrame(theme, ending.frame));
    let background = theme
        .filter(|_| ending.phase != EndingPhase::ShowScore && ending.phase != EndingPhase::CharFade)
        .map(AssetId::EndingBackground);

    let caption = match ending.tier {
        EndingTier::GameOver => None,
        EndingTier::Low => Some(text.low_caption.clone()),
        _ => Some(text.caption.clone()),
    };
    let caption_alpha = match ending.phase {
        EndingPhase::AngryCinematic | EndingPhase::AngryMenu => ending.seq_alpha,
        EndingPhase::SeqFadeIn => ending.title_alpha,
        _ => 0.0,
    };

    let tier_text = match ending.tier {
        EndingTier::GameOver => &text.tiers.game_over,
        EndingTier::Low => &text.tiers.low,
        EndingTier::Mid => &text.tiers.mid,
        EndingTier::High => &text.tiers.high,
        EndingTier::Top => &text.tiers.top,
    };

    let retry = ending.retry_menu_visible().then(|| RetryView {
        text: text.retry_option.chars().take(ending.menu.revealed).collect(),
        alpha: ending.menu.alpha,
        blink_alpha: ending.blink_alpha(),
        veil_alpha: ending.veil_alpha(),
    });

    EndingView {
        reason: ending.reason,
        tier: ending.tier,
        hearts: ending.hearts,
        phase: ending.phase,
        headline,
        headline_alpha: if ending.phase == EndingPhase::GameOver {
            ending.headline_alpha()
        } else {
            1.0
        },
        fade: ending.fade,
        flash_alpha: ending.flash_alpha(),
        seq_alpha: ending.seq_alpha,
        dimmer: ending.dimmer,
        frame,
        background,
        score_message: (ending.phase == EndingPhase::ShowScore).then(|| text.score_message(ending.hearts)),
        caption,
        caption_alpha,
        tier_title: tier_text.title.clone(),
        tier_body: tier_text.body.clone(),
        retry,
        credits: ending.credits.as_ref().map(|c| CreditsView {
            scroll_y: c.scroll_y,
            lines: text.credits.clone(),
        }),
    }
}
