//! Data structures representing a parsed SIQ package.
//!
//! Everything here is plain owned data, built once by the decoder and
//! immutable afterwards. The v4 legacy shapes at the bottom of the file are
//! decode targets only; `normalize` converts them to the v5 shapes before any
//! consumer sees them.

use super::normalize;
use super::resolve;
use super::error::Result;

/// Well-known question type tags. Unknown tags are legal and pass through
/// unchanged.
pub mod question_type {
    pub const SIMPLE: &str = "simple";
    pub const CAT: &str = "cat";
    pub const AUCTION: &str = "auction";
    pub const BAG_CAT: &str = "bagCat";
    pub const SPIDER: &str = "spider";
    pub const SECRET: &str = "secret";
    pub const NO_RISK: &str = "noRisk";
    pub const SUPER: &str = "super";
    pub const COMPLEX: &str = "complex";
    pub const MEDIA: &str = "media";
    pub const STAKE: &str = "stake";
    pub const FINAL: &str = "final";
}

/// Content item type tags.
pub mod content_type {
    pub const TEXT: &str = "text";
    pub const IMAGE: &str = "image";
    pub const AUDIO: &str = "audio";
    pub const VIDEO: &str = "video";
    pub const HTML: &str = "html";
    pub const VOICE: &str = "voice";
    pub const MARKER: &str = "marker";
}

/// Content placement tags. An empty placement means [`placement::SCREEN`].
pub mod placement {
    pub const SCREEN: &str = "screen";
    pub const REPLIC: &str = "replic";
    pub const BACKGROUND: &str = "background";
}

/// Param type tags.
pub mod param_type {
    pub const SIMPLE: &str = "simple";
    pub const CONTENT: &str = "content";
    pub const GROUP: &str = "group";
    pub const NUMBER_SET: &str = "numberSet";
}

/// Checks whether a question type tag is one of the well-known values.
pub fn is_well_known_type(question_type: &str) -> bool {
    matches!(
        question_type,
        question_type::SIMPLE
            | question_type::CAT
            | question_type::AUCTION
            | question_type::BAG_CAT
            | question_type::SPIDER
            | question_type::SECRET
            | question_type::NO_RISK
            | question_type::SUPER
            | question_type::COMPLEX
            | question_type::MEDIA
            | question_type::STAKE
            | question_type::FINAL
    )
}

/// The root entity of a parsed package.
#[derive(Debug, Clone)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub version: String,
    pub restriction: String,
    pub date: String,
    pub publisher: String,
    /// Difficulty on a 0-10 scale.
    pub difficulty: u8,
    pub logo: String,
    pub language: String,
    pub info: Option<Info>,
    pub tags: Vec<String>,
    /// Package-scoped author/source lookup table for `@id` references.
    pub global: Option<Global>,
    pub rounds: Rounds,
}

/// The package's round sequence, in the shape the payload declared.
///
/// A payload decodes into exactly one variant, so a package can never hold
/// both shapes at once. Consumers that need the v5 shape of a `V4` round go
/// through [`normalize::round`].
#[derive(Debug, Clone)]
pub enum Rounds {
    V5(Vec<Round>),
    V4(Vec<RoundV4>),
}

/// A round in the v5 shape.
#[derive(Debug, Clone)]
pub struct Round {
    pub name: String,
    pub info: Option<Info>,
    pub themes: Vec<Theme>,
}

/// A theme in the v5 shape.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub info: Option<Info>,
    pub questions: Vec<Question>,
}

/// A question in the v5 shape.
#[derive(Debug, Clone)]
pub struct Question {
    /// Free-form type tag. See [`question_type`] for the well-known values.
    pub question_type: String,
    pub params: Vec<Param>,
    pub right: Vec<String>,
    pub wrong: Vec<String>,
    pub script: Option<String>,
    pub info: Option<Info>,
}

/// A named, typed parameter attached to a question.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub payload: ParamPayload,
}

/// Param payload, keyed by the param's declared type.
///
/// `content`, `group` and `numberSet` params carry structure; every other
/// type tag (including unknown ones) is a scalar and keeps its tag in
/// `Value::ty`.
#[derive(Debug, Clone)]
pub enum ParamPayload {
    Value { ty: String, value: String },
    Content(Vec<ContentItem>),
    Group(Vec<Param>),
    NumberSet(NumberSet),
}

/// Numeric range bounds of a `numberSet` param.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberSet {
    pub minimum: i32,
    pub maximum: i32,
    pub step: i32,
}

/// One presentable unit within a question's content.
#[derive(Debug, Clone, Default)]
pub struct ContentItem {
    /// See [`content_type`] for the well-known tags.
    pub content_type: String,
    /// Literal text, or a reference/URI when `is_ref` is set.
    pub value: String,
    pub duration: u32,
    pub is_ref: bool,
    /// Empty means [`placement::SCREEN`].
    pub placement: String,
    pub wait_for_finish: bool,
}

/// Free-text sidecar attached to packages, rounds, themes and questions.
#[derive(Debug, Clone, Default)]
pub struct Info {
    pub authors: Vec<String>,
    pub sources: Vec<String>,
    pub comments: Vec<String>,
    pub showman_comments: Vec<String>,
}

/// Package-scoped identifier lookup table, in two namespaces. Authors take
/// priority over sources during reference resolution.
#[derive(Debug, Clone, Default)]
pub struct Global {
    pub authors: Vec<GlobalEntry>,
    pub sources: Vec<GlobalEntry>,
}

/// One identifier-to-display-name binding in the global table.
#[derive(Debug, Clone)]
pub struct GlobalEntry {
    pub id: String,
    pub name: String,
}

// v4 legacy shapes. Structurally isomorphic to the v5 types above, but with a
// price instead of a type tag and a flat atom scenario instead of typed
// params.

/// A round in the v4 shape.
#[derive(Debug, Clone)]
pub struct RoundV4 {
    pub name: String,
    pub info: Option<Info>,
    pub themes: Vec<ThemeV4>,
}

/// A theme in the v4 shape.
#[derive(Debug, Clone)]
pub struct ThemeV4 {
    pub name: String,
    pub info: Option<Info>,
    pub questions: Vec<QuestionV4>,
}

/// A question in the v4 shape.
#[derive(Debug, Clone)]
pub struct QuestionV4 {
    pub price: i32,
    pub scenario: Vec<Atom>,
    pub right: Vec<String>,
    pub wrong: Vec<String>,
    pub info: Option<Info>,
}

/// One scenario step of a v4 question.
#[derive(Debug, Clone, Default)]
pub struct Atom {
    pub atom_type: String,
    pub duration: u32,
    pub text: String,
}

impl Package {
    /// Number of rounds in the package.
    pub fn round_count(&self) -> usize {
        match &self.rounds {
            Rounds::V5(rounds) => rounds.len(),
            Rounds::V4(rounds) => rounds.len(),
        }
    }

    /// Total number of themes across all rounds.
    pub fn theme_count(&self) -> usize {
        match &self.rounds {
            Rounds::V5(rounds) => rounds.iter().map(|r| r.themes.len()).sum(),
            Rounds::V4(rounds) => rounds.iter().map(|r| r.themes.len()).sum(),
        }
    }

    /// Total number of questions across all rounds and themes.
    pub fn question_count(&self) -> usize {
        match &self.rounds {
            Rounds::V5(rounds) => rounds
                .iter()
                .flat_map(|r| &r.themes)
                .map(|t| t.questions.len())
                .sum(),
            Rounds::V4(rounds) => rounds
                .iter()
                .flat_map(|r| &r.themes)
                .map(|t| t.questions.len())
                .sum(),
        }
    }

    /// All questions in round/theme/question order, in the v5 shape.
    ///
    /// v4 questions are converted through [`normalize::question`] on every
    /// call; the returned questions are freshly allocated.
    pub fn all_questions(&self) -> Vec<Question> {
        match &self.rounds {
            Rounds::V5(rounds) => rounds
                .iter()
                .flat_map(|r| &r.themes)
                .flat_map(|t| &t.questions)
                .cloned()
                .collect(),
            Rounds::V4(rounds) => rounds
                .iter()
                .flat_map(|r| &r.themes)
                .flat_map(|t| &t.questions)
                .map(normalize::question)
                .collect(),
        }
    }

    /// All questions whose type tag matches `question_type` exactly.
    pub fn questions_by_type(&self, question_type: &str) -> Vec<Question> {
        self.all_questions()
            .into_iter()
            .filter(|q| q.question_type == question_type)
            .collect()
    }

    /// Resolve an `@id[#specification]` reference token against the global
    /// table. Non-reference text is returned unchanged.
    pub fn resolve_reference(&self, token: &str) -> Result<String> {
        resolve::reference(token, self.global.as_ref())
    }
}

impl Question {
    /// Content items of the first param named `question`, or an empty slice
    /// if the question has none.
    pub fn content(&self) -> &[ContentItem] {
        self.param_items("question")
    }

    /// Scalar value of the first param with the given name, if it is a
    /// scalar param.
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|p| p.name == name).and_then(|p| {
            match &p.payload {
                ParamPayload::Value { value, .. } => Some(value.as_str()),
                _ => None,
            }
        })
    }

    /// Content items of the first param with the given name, or an empty
    /// slice if there is no such param or it is not a content param.
    pub fn param_items(&self, name: &str) -> &[ContentItem] {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| match &p.payload {
                ParamPayload::Content(items) => items.as_slice(),
                _ => &[],
            })
            .unwrap_or(&[])
    }
}

impl ContentItem {
    /// Effective placement, defaulting to the screen.
    pub fn placement_or_default(&self) -> &str {
        if self.placement.is_empty() {
            placement::SCREEN
        } else {
            &self.placement
        }
    }
}
