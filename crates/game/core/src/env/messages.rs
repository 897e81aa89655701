//! Narration sink.
//!
//! The core never formats or stores narration itself; it hands
//! `(text, tag)` pairs to whatever sink the embedding application injects.

/// Semantic colour of a narration line. Presentation maps tags to colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ColorTag {
    Welcome,
    PlayerAttack,
    EnemyAttack,
    PlayerDie,
    EnemyDie,
    StatusApplied,
    StatusExpired,
    HealthRecovered,
    Boost,
    BoostFaded,
    Impossible,
    InvalidInput,
    Descend,
    LevelUp,
    Victory,
    Neutral,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub text: String,
    pub tag: ColorTag,
    /// How many identical lines were folded into this one.
    pub count: u32,
}

impl Message {
    pub fn new(text: impl Into<String>, tag: ColorTag) -> Self {
        Self {
            text: text.into(),
            tag,
            count: 1,
        }
    }

    /// Text with the repeat counter appended, e.g. `"Hit! (x3)"`.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// Receives narration. Purely observational: nothing flows back.
pub trait MessageSink {
    fn add_message(&mut self, text: String, tag: ColorTag);
}

impl MessageSink for Vec<Message> {
    fn add_message(&mut self, text: String, tag: ColorTag) {
        self.push(Message::new(text, tag));
    }
}
