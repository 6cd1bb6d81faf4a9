use crate::classify::extract_category;
use crate::matcher::FaqIndex;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

/// Scores must exceed this to be answered.
pub const CONFIDENCE_THRESHOLD: f64 = 0.3;

pub const GREETING_CATEGORY: &str = "greeting";
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Matched as case-insensitive substrings of the message.
pub const GREETING_PHRASES: &[&str] = &["hello", "hi", "hey", "good morning", "good afternoon", "good evening"];

pub const GREETINGS: &[&str] = &[
    "Hello! How can I help you with Federal University Wukari today?",
    "Hi there! What would you like to know about FU Wukari?",
    "Welcome! I'm here to assist with FU Wukari information.",
    "Greetings! How can I assist you with university-related queries?",
];

pub const FALLBACKS: &[&str] = &[
    "I'm not sure I understand. Could you rephrase your question about FU Wukari?",
    "I'm still learning about FU Wukari. Could you try asking differently?",
    "That's an interesting question. Currently, I'm focused on FU Wukari FAQs.",
    "I specialize in FU Wukari information. Could you ask about admissions, courses, or facilities?",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub text: String,
    pub confidence: f64,
    pub category: String,
}

/// Turns a user message into a reply against one index snapshot.
pub struct ResponseGenerator {
    index: Arc<FaqIndex>,
}

impl ResponseGenerator {
    pub fn new(index: Arc<FaqIndex>) -> Self { Self { index } }

    pub fn generate_response(&self, message: &str) -> Response {
        self.generate_response_with(message, &mut rand::thread_rng())
    }

    /// Same as [`generate_response`](Self::generate_response) with the pool choice drawn from `rng`.
    pub fn generate_response_with<R: Rng>(&self, message: &str, rng: &mut R) -> Response {
        let message = message.trim();
        if is_greeting(message) {
            tracing::debug!(message, "greeting");
            return Response { text: pick(GREETINGS, rng).to_string(), confidence: 1.0, category: GREETING_CATEGORY.to_string() };
        }

        let candidate = extract_category(message);
        let best = self.index.find_best_match(message, candidate);
        match (best.entry, best.category) {
            (Some(entry), Some(resolved)) if best.score > CONFIDENCE_THRESHOLD => {
                let text = if Some(resolved) != candidate {
                    format!("Regarding {}:\n{}", category_label(resolved), entry.answer)
                } else {
                    entry.answer.clone()
                };
                tracing::debug!(?candidate, resolved, score = best.score, "answered");
                Response { text, confidence: best.score, category: resolved.to_string() }
            }
            _ => {
                tracing::debug!(?candidate, score = best.score, "fallback");
                Response { text: pick(FALLBACKS, rng).to_string(), confidence: best.score, category: UNKNOWN_CATEGORY.to_string() }
            }
        }
    }
}

pub fn is_greeting(text: &str) -> bool {
    let text = text.to_lowercase();
    GREETING_PHRASES.iter().any(|g| text.contains(g))
}

/// `student_affairs` -> `Student Affairs`, `post-utme` -> `Post-Utme`.
///
/// Underscores become spaces; a letter is uppercased when the character before it is not a
/// letter and lowercased otherwise.
pub fn category_label(category: &str) -> String {
    let mut label = String::with_capacity(category.len());
    let mut after_letter = false;
    for c in category.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if c.is_alphabetic() {
            if after_letter {
                label.extend(c.to_lowercase());
            } else {
                label.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            label.push(c);
            after_letter = false;
        }
    }
    label
}

fn pick<'a, R: Rng>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}
