//! Feedback command handler

use crate::domain::feedback::{help_text, FeedbackKind};

use super::args::FeedbackAction;
use super::presenter::Presenter;

/// Print the contact address and a prefilled `mailto:` link, or help text
pub fn handle_feedback_command(action: Option<FeedbackAction>, presenter: &Presenter) {
    let kind = match action.unwrap_or(FeedbackAction::Send) {
        FeedbackAction::Send => FeedbackKind::Feedback,
        FeedbackAction::Bug => FeedbackKind::Bug,
        FeedbackAction::Feature => FeedbackKind::Feature,
        FeedbackAction::Help => {
            presenter.output(&help_text());
            return;
        }
    };

    presenter.key_value("email", kind.email());
    presenter.key_value("subject", kind.subject());
    presenter.output(&kind.mailto_url(std::env::consts::OS, env!("CARGO_PKG_VERSION")));
    presenter.info("Open the link above in your mail client to send it.");
}
