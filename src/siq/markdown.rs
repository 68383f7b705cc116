//! Markdown report rendering over the parsed model.
//!
//! Pure string formatting: rounds become `##` headings, themes `###`,
//! questions `####` with their content items and right answers. Media
//! filtering is driven by an explicit [`RenderOptions`] value rather than
//! process-wide state.

use std::fmt::Write;

use log::debug;

use super::models::{content_type, placement, Package, Question, Round, Rounds};
use super::normalize;

/// Rendering configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Skip questions whose content includes image, audio, video or voice
    /// items. Themes left empty by the filter are dropped entirely.
    pub skip_media: bool,
}

/// Render the package to markdown with default options.
pub fn render(package: &Package) -> String {
    render_with(package, &RenderOptions::default())
}

/// Render the package to markdown.
///
/// A v4 package is normalized round by round first, so the report shape is
/// identical for both generations.
pub fn render_with(package: &Package, options: &RenderOptions) -> String {
    let rounds: Vec<Round> = match &package.rounds {
        Rounds::V5(rounds) => rounds.clone(),
        Rounds::V4(rounds) => rounds.iter().map(normalize::round).collect(),
    };

    let mut out = String::new();
    for (round_index, round) in rounds.iter().enumerate() {
        let _ = writeln!(out, "## Round {}: {}\n", round_index + 1, round.name);

        for (theme_index, theme) in round.themes.iter().enumerate() {
            let questions: Vec<&Question> = theme
                .questions
                .iter()
                .filter(|q| !options.skip_media || !has_media_content(q))
                .collect();

            // Filtering can empty a theme; drop it rather than emit a bare
            // heading.
            if questions.is_empty() {
                continue;
            }

            let _ = writeln!(out, "### Theme {}: {}\n", theme_index + 1, theme.name);

            for (question_number, question) in questions.iter().enumerate() {
                let _ = writeln!(out, "#### Question {}\n", question_number + 1);
                render_question(&mut out, question);
                let _ = writeln!(out, "---\n");
            }
        }
    }
    out
}

fn render_question(out: &mut String, question: &Question) {
    let content = question.content();
    if !content.is_empty() {
        let _ = writeln!(out, "**Content**:\n");
        for item in content {
            let _ = write!(out, "- {}", item.value);
            if item.duration > 0 {
                let _ = write!(out, " (duration: {})", item.duration);
            }
            let effective_placement = item.placement_or_default();
            if effective_placement != placement::SCREEN {
                let _ = write!(out, " (placement: {effective_placement})");
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out);
    }

    if !question.right.is_empty() {
        let plural = if question.right.len() > 1 { "s" } else { "" };
        let _ = writeln!(out, "**Right Answer{plural}**:\n");
        if question.right.len() == 1 {
            let _ = writeln!(out, "{}\n", question.right[0]);
        } else {
            for (i, answer) in question.right.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, answer);
            }
            let _ = writeln!(out);
        }
    }
}

/// Whether a question's content includes a media item.
fn has_media_content(question: &Question) -> bool {
    for item in question.content() {
        match item.content_type.as_str() {
            content_type::IMAGE | content_type::AUDIO | content_type::VIDEO
            | content_type::VOICE => return true,
            "" | content_type::TEXT | content_type::HTML | content_type::MARKER => {}
            other => debug!("content item with unrecognized type {other:?}: {item:?}"),
        }
    }
    false
}
