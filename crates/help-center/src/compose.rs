/// Turns scored matches into the assistant's reply text.
use help_common::api::ChatResponse;

use crate::search::ScoredRecord;

pub const NOT_FOUND_RESPONSE: &str = "I couldn't find a specific answer to your question in our \
help center. Please reach out through the contact form and our support team will get back to you.";

const CLOSING_PROMPT: &str = "Is there anything else I can help you with?";

/// Compose a reply from matches sorted best-first.
pub fn compose_response(matches: &[ScoredRecord<'_>]) -> ChatResponse {
    let Some((best, rest)) = matches.split_first() else {
        return ChatResponse {
            response: NOT_FOUND_RESPONSE.to_string(),
            needs_contact: true,
        };
    };
    let best = &best.record.article;

    let mut sections = vec![format!("Here's what I found about \"{}\":", best.title)];

    if !best.note.is_empty() {
        sections.push(best.note.clone());
    }

    if !best.steps.is_empty() {
        let steps: Vec<String> = best
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect();
        sections.push(steps.join("\n"));
    }

    if !rest.is_empty() {
        let related: Vec<String> = rest
            .iter()
            .map(|m| format!("• {}", m.record.article.title))
            .collect();
        sections.push(format!("Related topics:\n{}", related.join("\n")));
    }

    sections.push(CLOSING_PROMPT.to_string());

    ChatResponse {
        response: sections.join("\n\n"),
        needs_contact: false,
    }
}
