//! Narrative content: question pool, greeting script, captions and credits
//!
//! The built-in content is complete; a JSON document may override any
//! top-level section. Malformed questions are dropped at load time so the
//! simulation never sees them.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// One selectable answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Short label ("A", "B", ...)
    pub label: String,
    pub text: String,
    /// Line shown after this option is picked
    pub response: String,
    pub correct: bool,
}

/// A quiz question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Exactly one correct option
    pub fn is_well_formed(&self) -> bool {
        self.options.iter().filter(|o| o.correct).count() == 1
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.correct)
    }
}

/// A player choice in the greeting, with the reply variants it unlocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreetingChoice {
    pub label: String,
    pub companion_replies: Vec<String>,
    pub player_replies: Vec<String>,
}

/// Opening conversation with the companion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreetingScript {
    pub intro: Vec<String>,
    pub choices: Vec<GreetingChoice>,
    pub mainline: Vec<String>,
}

/// Title and body for one ending tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierText {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTexts {
    pub game_over: TierText,
    pub low: TierText,
    pub mid: TierText,
    pub high: TierText,
    pub top: TierText,
}

/// One line of the end credits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLine {
    pub text: String,
    /// Font size hint for the renderer
    pub size: u8,
    /// Drawn in the accent colour
    pub highlight: bool,
}

/// Captions used by the ending sequences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingText {
    pub time_up_headline: String,
    pub game_over_headline: String,
    pub try_again_headline: String,
    /// The single retry menu entry
    pub retry_option: String,
    /// Score popup; `{hearts}` is replaced with the final count
    pub score_template: String,
    /// Caption revealed over the low-tier cinematic
    pub low_caption: String,
    /// Caption revealed over the other narrative cinematics
    pub caption: String,
    pub tiers: TierTexts,
    pub credits: Vec<CreditLine>,
}

impl EndingText {
    pub fn score_message(&self, hearts: u8) -> String {
        self.score_template.replace("{hearts}", &hearts.to_string())
    }
}

/// All narrative content for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub questions: Vec<Question>,
    pub greeting: GreetingScript,
    /// Controls popup on the title screen
    pub how_to_play: String,
    pub ending: EndingText,
}

impl Default for Content {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Content {
    /// Parse an override document; absent sections keep the built-in content
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }

    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Invalid content file {}: {} - using built-in content", path.display(), e);
                Self::builtin()
            }),
            Err(e) => {
                log::warn!("Cannot read content file {}: {} - using built-in content", path.display(), e);
                Self::builtin()
            }
        }
    }

    /// Drop questions that do not have exactly one correct option
    pub fn validated(mut self) -> Self {
        let before = self.questions.len();
        self.questions.retain(|q| {
            let ok = q.is_well_formed() && !q.options.is_empty();
            if !ok {
                log::warn!("Dropping malformed question {} ({:?})", q.id, q.prompt);
            }
            ok
        });
        if self.questions.len() != before {
            log::warn!("{} of {} questions kept", self.questions.len(), before);
        }
        self
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn builtin() -> Self {
        Self {
            questions: builtin_questions(),
            greeting: builtin_greeting(),
            how_to_play: [
                "Controls",
                "",
                "Up: Jump",
                "Left / Right: Move",
                "Jump over the runners on the path",
                "Touch the floating bubbles to open a quiz",
                "Enter: pick an answer or continue",
            ]
            .join("\n"),
            ending: builtin_ending(),
        }
    }
}

fn question(id: u32, prompt: &str, options: [(&str, &str, bool); 3]) -> Question {
    Question {
        id,
        prompt: prompt.to_string(),
        options: options
            .iter()
            .zip(["A", "B", "C"])
            .map(|(&(text, response, correct), label)| AnswerOption {
                label: label.to_string(),
                text: text.to_string(),
                response: response.to_string(),
                correct,
            })
            .collect(),
    }
}

fn builtin_questions() -> Vec<Question> {
    vec![
        question(1, "Which dessert can Mira never say no to?", [
            ("Ice cream", "Right! One scoop is never enough.", true),
            ("Pudding", "Close, but pudding is only second place.", false),
            ("Lemon tart", "Too sour! Try again next time.", false),
        ]),
        question(2, "Where does Mira dream of travelling most?", [
            ("Iceland", "Yes! The northern lights are on the list.", true),
            ("Thailand", "Nice, but there is a bigger dream.", false),
            ("Japan", "Hot springs sound great, but not first.", false),
        ]),
        question(3, "What does Mira do when she wants attention?", [
            ("Asks for a kiss", "Exactly. Every single time.", true),
            ("Asks if you love her", "Words are nice, actions are better!", false),
            ("Sits on your lap", "Nope! Random guess?", false),
        ]),
        question(4, "Your phone and Mira fall in the river. Who do you save?", [
            ("The stranger nearby", "Ha. Ha.", false),
            ("The phone", "Phone over girlfriend? Really?", false),
            ("Mira, always", "A perfect answer!", true),
        ]),
        question(5, "What plan makes Mira happiest?", [
            ("Sleeping in all weekend", "Tempting, but no.", false),
            ("Breakfast in bed", "Still waiting for that one...", false),
            ("Building a home together", "The happiest plan of all!", true),
        ]),
        question(6, "Who is Mira's favourite person?", [
            ("A movie star", "Not even close.", false),
            ("Theo", "Correct! Out of everyone in the world.", true),
            ("A singer", "Wrong!", false),
        ]),
        question(7, "What gadget is Mira hoping for right now?", [
            ("A designer bag", "Nope.", false),
            ("A new phone", "Not this year.", false),
            ("An action camera", "You were paying attention!", true),
        ]),
        question(8, "What would Mira most like to do with you?", [
            ("Travel together", "The world is big, let's see it together!", true),
            ("Play video games", "Fun, but adventure wins.", false),
            ("Binge a series", "Cozy, but travelling is better.", false),
        ]),
        question(9, "What should Theo train to become the ultimate partner?", [
            ("Eat more oysters", "Wrong!", false),
            ("Build stamina", "Yes! Enough energy for a lifetime.", true),
            ("Sleep more", "You already sleep plenty.", false),
        ]),
        question(10, "Which word shows up most in our chats?", [
            ("Sweetie", "Correct! Hundreds of times.", true),
            ("Love you", "Lots of those, but not the most.", false),
            ("Cute", "Plenty, but still not first.", false),
        ]),
        question(11, "What is our biggest shared goal?", [
            ("Run a tiny zoo", "Cute, but not the biggest.", false),
            ("Open a restaurant", "Let's talk about that one later.", false),
            ("Live abroad together", "Yes! Exploring the world as a team.", true),
        ]),
        question(12, "Mira is upset. What do you do?", [
            ("Find out why and fix it", "That's why she trusts you.", true),
            ("Pretend not to notice", "That only makes it worse!", false),
            ("Make a joke", "Risky. Very risky.", false),
        ]),
        question(13, "What was Mira's first impression of you?", [
            ("Calm and steady", "Right, you felt safe from day one.", true),
            ("Adorable", "That came later!", false),
            ("Festival type", "Only for a second.", false),
        ]),
        question(14, "Where was our first date?", [
            ("The cinema", "Right! Remember which film?", true),
            ("A coffee shop", "With whom?!", false),
            ("The park", "We went later, but not first.", false),
        ]),
    ]
}

fn builtin_greeting() -> GreetingScript {
    let lines = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    GreetingScript {
        intro: lines(&[
            "MIRA: Hey, you finally made it! Today is your birthday adventure!",
            "MIRA: I built a little challenge just for you. Ready?",
        ]),
        choices: vec![
            GreetingChoice {
                label: "You made a whole game for me?".to_string(),
                companion_replies: lines(&[
                    "MIRA: What did you think I was doing every night? Feel the effort!",
                    "MIRA: Pretty professional, right?",
                    "MIRA: Worth every late night.",
                ]),
                player_replies: lines(&[
                    "THEO: I'm so lucky to have you!",
                    "THEO: Best partner in the world, confirmed.",
                    "THEO: This is amazing!",
                ]),
            },
            GreetingChoice {
                label: "An adventure? Are there traps?".to_string(),
                companion_replies: lines(&["MIRA: Maybe! But I'll be right here with you."]),
                player_replies: lines(&["THEO: Then I'm not worried."]),
            },
            GreetingChoice {
                label: "Of course! Let's go!".to_string(),
                companion_replies: lines(&["MIRA: I knew you'd say that!"]),
                player_replies: lines(&["THEO: Let's do this!"]),
            },
        ],
        mainline: lines(&[
            "MIRA: Careful, don't let the running kids knock you over!",
            "MIRA: Touch a bubble to answer a question. Right answers earn a heart.",
            "MIRA: Let's see which ending you unlock!",
        ]),
    }
}

fn builtin_ending() -> EndingText {
    let tier = |title: &str, body: &str| TierText {
        title: title.to_string(),
        body: body.to_string(),
    };
    let credit = |text: &str, size: u8, highlight: bool| CreditLine {
        text: text.to_string(),
        size,
        highlight,
    };
    EndingText {
        time_up_headline: "TIME UP".to_string(),
        game_over_headline: "GAME OVER".to_string(),
        try_again_headline: "TRY AGAIN".to_string(),
        retry_option: "Try once more".to_string(),
        score_template: "You scored {hearts} hearts!".to_string(),
        low_caption: "TRY AGAIN".to_string(),
        caption: "LOVE YOU".to_string(),
        tiers: TierTexts {
            game_over: tier("GAME OVER", "You ran out of hearts."),
            low: tier("THE END", "Not bad! Try again for a happier ending."),
            mid: tier("GOOD END", "You did well!"),
            high: tier("GREAT END", "So close to perfect!"),
            top: tier("PERFECT END", "Love conquers all!"),
        },
        credits: vec![
            credit("Happy Birthday Theo", 36, true),
            credit("A game made just for you", 24, false),
            credit("", 16, false),
            credit("Producer: Mira", 20, false),
            credit("Script: Our Story", 20, false),
            credit("Location: The Riverside", 20, false),
            credit("Starring: Theo and Mira", 20, false),
            credit("", 16, false),
            credit("Special Thanks", 24, true),
            credit("- your kindness", 18, false),
            credit("- your patience", 18, false),
            credit("- your hard work", 18, false),
            credit("- your clever ideas", 18, false),
            credit("", 16, false),
            credit("Thank you for every sweet day", 18, false),
            credit("More trips, more sunsets", 18, false),
            credit("Maybe a dog (or three)", 18, false),
            credit("Every dream we wrote down", 18, false),
            credit("", 16, false),
            credit("The End?", 24, true),
            credit("No. Just the beginning", 24, false),
        ],
    }
}
