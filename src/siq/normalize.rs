//! Structural conversion of v4 shapes into the v5 shape.
//!
//! The mapping is total and order-preserving: every v4 node produces exactly
//! one v5 node, and scenario atom order becomes content item order. v4 has no
//! question type tag, so converted questions are always `simple`.

use super::models::{
    question_type, ContentItem, Param, ParamPayload, Question, QuestionV4, Round, RoundV4, Theme,
    ThemeV4,
};

/// Convert a v4 round into the v5 shape.
pub fn round(v4: &RoundV4) -> Round {
    Round {
        name: v4.name.clone(),
        info: v4.info.clone(),
        themes: v4.themes.iter().map(theme).collect(),
    }
}

/// Convert a v4 theme into the v5 shape.
pub fn theme(v4: &ThemeV4) -> Theme {
    Theme {
        name: v4.name.clone(),
        info: v4.info.clone(),
        questions: v4.questions.iter().map(question).collect(),
    }
}

/// Convert a v4 question into the v5 shape.
///
/// The scenario's atoms (if any) become a single synthetic content param
/// named `question`; right/wrong answers and the info block carry over
/// unchanged.
pub fn question(v4: &QuestionV4) -> Question {
    let mut params = Vec::new();
    if !v4.scenario.is_empty() {
        let items = v4
            .scenario
            .iter()
            .map(|atom| ContentItem {
                content_type: atom.atom_type.clone(),
                value: atom.text.clone(),
                duration: atom.duration,
                ..ContentItem::default()
            })
            .collect();
        params.push(Param {
            name: "question".to_string(),
            payload: ParamPayload::Content(items),
        });
    }

    Question {
        question_type: question_type::SIMPLE.to_string(),
        params,
        right: v4.right.clone(),
        wrong: v4.wrong.clone(),
        script: None,
        info: v4.info.clone(),
    }
}
