//! Canned replies.
//!
//! Rules are checked in order against the lower-cased message; the first
//! rule with a matching substring wins.

use rand::seq::SliceRandom;

const RULES: &[(&[&str], &str)] = &[
    (&["hello", "hi"], "Hello! 👋 I'm Zwen AI! How can I help you?"),
    (&["how are you"], "I'm great! Ready to chat or help with file uploads! 😊"),
    (&["upload", "file"], "You can upload files or images using the buttons above! 📁"),
    (&["thank"], "You're welcome! 😊"),
    (
        &["help"],
        "I can:\n• Chat with you\n• Upload files\n• Process images\n• Take photos\nUse the buttons above!",
    ),
];

const FALLBACKS: &[&str] = &[
    "That's interesting! Tell me more! 😊",
    "I understand! How can I help?",
    "Thanks for sharing! 💫",
    "Great point! What else?",
    "I'm here to help! 🚀",
];

/// Produces Zwen AI's reply to a user message.
#[derive(Debug, Clone, Default)]
pub struct Responder;

impl Responder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(&self, message: &str) -> String {
        if let Some(reply) = Self::matching_rule(message) {
            return reply.to_string();
        }

        FALLBACKS
            .choose(&mut rand::thread_rng())
            .unwrap_or(&FALLBACKS[0])
            .to_string()
    }

    /// The rule-based reply for `message`, if any rule matches.
    pub fn matching_rule(message: &str) -> Option<&'static str> {
        let lower = message.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, reply)| *reply)
    }

    pub fn fallbacks() -> &'static [&'static str] {
        FALLBACKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_rules() {
        let responder = Responder::new();
        assert_eq!(
            responder.respond("Hello there"),
            "Hello! 👋 I'm Zwen AI! How can I help you?"
        );
        assert_eq!(
            responder.respond("HOW ARE YOU doing"),
            "I'm great! Ready to chat or help with file uploads! 😊"
        );
        assert_eq!(
            responder.respond("Can I upload a PDF?"),
            "You can upload files or images using the buttons above! 📁"
        );
        assert_eq!(responder.respond("thanks a lot"), "You're welcome! 😊");
        assert!(responder.respond("need help").starts_with("I can:"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // "this" contains "hi", which is checked before "file"
        assert_eq!(
            Responder::matching_rule("is this file ok"),
            Some("Hello! 👋 I'm Zwen AI! How can I help you?")
        );
    }

    #[test]
    fn test_fallback_is_one_of_the_generic_replies() {
        let responder = Responder::new();
        assert_eq!(Responder::matching_rule("quantum mechanics"), None);
        for _ in 0..20 {
            let reply = responder.respond("quantum mechanics");
            assert!(Responder::fallbacks().contains(&reply.as_str()));
        }
    }
}
