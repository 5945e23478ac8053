/// Hand-written answers for the most common help-center questions.
///
/// Checked before scoring. Patterns are lowercase substrings tested against the
/// normalized query in declaration order; the first hit wins.
use help_common::api::ChatResponse;

#[derive(Debug)]
pub struct CannedAnswer {
    pub patterns: &'static [&'static str],
    pub response: &'static str,
    pub needs_contact: bool,
}

impl CannedAnswer {
    pub fn to_response(&self) -> ChatResponse {
        ChatResponse {
            response: self.response.to_string(),
            needs_contact: self.needs_contact,
        }
    }
}

pub static CANNED_ANSWERS: &[CannedAnswer] = &[
    CannedAnswer {
        patterns: &["what is privee", "what's privee", "about privee"],
        response: "Privee World is a video-sharing app for creating, editing and sharing short videos \
with your friends and the world.\n\n\
With Privee World you can:\n\
• Record clips or upload them from your gallery\n\
• Add effects, text, stickers and music\n\
• Publish to everyone, just your followers, or only yourself\n\
• Share any public video with a link that works even without the app\n\n\
Download it from the App Store or Google Play to get started!",
        needs_contact: false,
    },
    CannedAnswer {
        patterns: &["how to publish", "how do i publish", "how can i publish"],
        response: "Here's how to publish a video on Privee World:\n\n\
1. Tap the plus button at the bottom of the screen.\n\
2. Record a new clip or tap Upload to choose one from your gallery.\n\
3. Trim your clip and add any effects, text or music.\n\
4. Tap Next, then write a caption and add hashtags.\n\
5. Choose who can watch it and tap Post.\n\n\
Your video will appear on your profile as soon as it finishes uploading.",
        needs_contact: false,
    },
    CannedAnswer {
        patterns: &["talk to a human", "speak to someone", "contact support", "customer service"],
        response: "Of course! Our support team is happy to help. Please use the contact form and \
we'll get back to you as soon as possible.",
        needs_contact: true,
    },
];

/// First canned answer whose pattern appears in the normalized query.
pub fn match_canned(query: &str) -> Option<&'static CannedAnswer> {
    CANNED_ANSWERS
        .iter()
        .find(|answer| answer.patterns.iter().any(|p| query.contains(p)))
}
