//! Bounded narration history.
use std::collections::VecDeque;

use delve_core::{ColorTag, GameConfig, Message, MessageSink};

/// Keeps the most recent narration lines. A line identical to the previous
/// one (same text and tag) bumps its repeat counter instead of being
/// appended again.
#[derive(Clone, Debug)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    capacity: usize,
    stack: bool,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            stack: true,
        }
    }

    /// Disables folding of repeated lines.
    #[must_use]
    pub fn without_stacking(mut self) -> Self {
        self.stack = false;
        self
    }

    /// Oldest first.
    pub fn messages(&self) -> impl DoubleEndedIterator<Item = &Message> + ExactSizeIterator {
        self.messages.iter()
    }

    /// Up to `count` lines, newest last.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &Message> {
        let skip = self.messages.len().saturating_sub(count);
        self.messages.iter().skip(skip)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_MESSAGE_CAPACITY)
    }
}

impl MessageSink for MessageLog {
    fn add_message(&mut self, text: String, tag: ColorTag) {
        if self.stack {
            if let Some(last) = self.messages.back_mut() {
                if last.text == text && last.tag == tag {
                    last.count += 1;
                    return;
                }
            }
        }
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Message::new(text, tag));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_folded() {
        let mut log = MessageLog::new(8);
        log.add_message("That way is blocked.".into(), ColorTag::Impossible);
        log.add_message("That way is blocked.".into(), ColorTag::Impossible);
        log.add_message("That way is blocked.".into(), ColorTag::Impossible);

        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().full_text(), "That way is blocked. (x3)");
    }

    #[test]
    fn different_tag_is_a_new_line() {
        let mut log = MessageLog::new(8);
        log.add_message("Hit".into(), ColorTag::PlayerAttack);
        log.add_message("Hit".into(), ColorTag::EnemyAttack);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn oldest_lines_fall_off() {
        let mut log = MessageLog::new(2).without_stacking();
        for text in ["one", "two", "two", "three"] {
            log.add_message(text.into(), ColorTag::Neutral);
        }
        let texts: Vec<_> = log.messages().map(|message| message.text.as_str()).collect();
        assert_eq!(texts, ["two", "three"]);
        assert_eq!(log.recent(1).count(), 1);
    }
}
