//! Schema generation detection and payload decoding.
//!
//! `content.xml` comes in two generations: v5 nests rounds directly under the
//! root, v4 wraps rounds/themes/questions in plural container elements and
//! describes question content as a flat atom scenario. Each generation gets
//! its own serde decode target here; both converge on the unified model.

use log::debug;
use serde::Deserialize;

use super::error::Result;
use super::models::{
    Atom, ContentItem, Global, GlobalEntry, Info, NumberSet, Package, Param, ParamPayload,
    Question, QuestionV4, Round, RoundV4, Rounds, Theme, ThemeV4,
};

/// The literal namespace declaration that marks a generation-4 payload.
const V4_NAMESPACE_MARKER: &str = r#"xmlns="http://vladimirkhil.com/ygpackage3.0.xsd""#;

/// The two known schema generations of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    V4,
    V5,
}

impl SchemaVersion {
    pub fn number(self) -> u32 {
        match self {
            SchemaVersion::V4 => 4,
            SchemaVersion::V5 => 5,
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Decide which schema generation produced the payload.
///
/// A plain substring scan for the v4 namespace declaration, kept exactly as
/// the format's existing tooling does it rather than inspecting a parsed
/// namespace. Everything else is treated as generation 5.
pub fn detect(payload: &str) -> SchemaVersion {
    if payload.contains(V4_NAMESPACE_MARKER) {
        SchemaVersion::V4
    } else {
        SchemaVersion::V5
    }
}

/// Decode the payload into a [`Package`] according to the detected
/// generation.
///
/// # Errors
/// Returns [`super::error::SiqError::Decode`] if the payload is not
/// well-formed, or does not match the root shape of the generation.
pub fn decode(payload: &str, version: SchemaVersion) -> Result<Package> {
    let payload = payload.strip_prefix('\u{feff}').unwrap_or(payload);
    let package = match version {
        SchemaVersion::V5 => {
            let raw: RawPackageV5 = quick_xml::de::from_str(payload)?;
            raw.into_package()
        }
        SchemaVersion::V4 => {
            let raw: RawPackageV4 = quick_xml::de::from_str(payload)?;
            raw.into_package()
        }
    };
    debug!(
        "Payload decoded: {} rounds, {} themes, {} questions",
        package.round_count(),
        package.theme_count(),
        package.question_count()
    );
    Ok(package)
}

// Decode targets. Unknown attributes and elements are ignored by serde;
// every optional piece defaults rather than erroring.

#[derive(Debug, Deserialize)]
struct RawPackageV5 {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@version", default)]
    version: String,
    #[serde(rename = "@restriction", default)]
    restriction: String,
    #[serde(rename = "@date", default)]
    date: String,
    #[serde(rename = "@publisher", default)]
    publisher: String,
    #[serde(rename = "@difficulty", default)]
    difficulty: u8,
    #[serde(rename = "@logo", default)]
    logo: String,
    #[serde(rename = "@language", default)]
    language: String,
    info: Option<RawInfo>,
    tags: Option<RawTags>,
    global: Option<RawGlobal>,
    #[serde(rename = "round", default)]
    rounds: Vec<RawRound>,
}

#[derive(Debug, Deserialize)]
struct RawPackageV4 {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@version", default)]
    version: String,
    #[serde(rename = "@restriction", default)]
    restriction: String,
    #[serde(rename = "@date", default)]
    date: String,
    #[serde(rename = "@publisher", default)]
    publisher: String,
    #[serde(rename = "@difficulty", default)]
    difficulty: u8,
    #[serde(rename = "@logo", default)]
    logo: String,
    #[serde(rename = "@language", default)]
    language: String,
    info: Option<RawInfo>,
    tags: Option<RawTags>,
    global: Option<RawGlobal>,
    #[serde(default)]
    rounds: RawRoundsV4,
}

#[derive(Debug, Deserialize, Default)]
struct RawRoundsV4 {
    #[serde(rename = "round", default)]
    rounds: Vec<RawRoundV4>,
}

#[derive(Debug, Deserialize)]
struct RawRound {
    #[serde(rename = "@name", default)]
    name: String,
    info: Option<RawInfo>,
    #[serde(rename = "theme", default)]
    themes: Vec<RawTheme>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    #[serde(rename = "@name", default)]
    name: String,
    info: Option<RawInfo>,
    #[serde(rename = "question", default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(rename = "@type", default)]
    question_type: String,
    params: Option<RawParams>,
    right: Option<RawAnswers>,
    wrong: Option<RawAnswers>,
    script: Option<String>,
    info: Option<RawInfo>,
}

#[derive(Debug, Deserialize, Default)]
struct RawParams {
    #[serde(rename = "param", default)]
    params: Vec<RawParam>,
}

#[derive(Debug, Deserialize, Default)]
struct RawAnswers {
    #[serde(rename = "answer", default)]
    answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@type", default)]
    param_type: String,
    #[serde(rename = "$text", default)]
    value: String,
    #[serde(rename = "item", default)]
    items: Vec<RawItem>,
    #[serde(rename = "param", default)]
    params: Vec<RawParam>,
    minimum: Option<i32>,
    maximum: Option<i32>,
    step: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "@type", default)]
    item_type: String,
    #[serde(rename = "@duration", default)]
    duration: u32,
    #[serde(rename = "@isRef", default)]
    is_ref: bool,
    #[serde(rename = "@placement", default)]
    placement: String,
    #[serde(rename = "@waitForFinish", default)]
    wait_for_finish: bool,
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawRoundV4 {
    #[serde(rename = "@name", default)]
    name: String,
    info: Option<RawInfo>,
    #[serde(default)]
    themes: RawThemesV4,
}

#[derive(Debug, Deserialize, Default)]
struct RawThemesV4 {
    #[serde(rename = "theme", default)]
    themes: Vec<RawThemeV4>,
}

#[derive(Debug, Deserialize)]
struct RawThemeV4 {
    #[serde(rename = "@name", default)]
    name: String,
    info: Option<RawInfo>,
    #[serde(default)]
    questions: RawQuestionsV4,
}

#[derive(Debug, Deserialize, Default)]
struct RawQuestionsV4 {
    #[serde(rename = "question", default)]
    questions: Vec<RawQuestionV4>,
}

#[derive(Debug, Deserialize)]
struct RawQuestionV4 {
    #[serde(rename = "@price", default)]
    price: i32,
    scenario: Option<RawScenario>,
    right: Option<RawAnswers>,
    wrong: Option<RawAnswers>,
    info: Option<RawInfo>,
}

#[derive(Debug, Deserialize, Default)]
struct RawScenario {
    #[serde(rename = "atom", default)]
    atoms: Vec<RawAtom>,
}

#[derive(Debug, Deserialize)]
struct RawAtom {
    #[serde(rename = "@type", default)]
    atom_type: String,
    #[serde(rename = "@duration", default)]
    duration: u32,
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Deserialize, Default)]
struct RawInfo {
    authors: Option<RawAuthors>,
    sources: Option<RawSources>,
    comments: Option<RawComments>,
    #[serde(rename = "showmanComments")]
    showman_comments: Option<RawComments>,
}

#[derive(Debug, Deserialize, Default)]
struct RawAuthors {
    #[serde(rename = "author", default)]
    authors: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSources {
    #[serde(rename = "source", default)]
    sources: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawComments {
    #[serde(rename = "comment", default)]
    comments: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawTags {
    #[serde(rename = "tag", default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawGlobal {
    authors: Option<RawGlobalAuthors>,
    sources: Option<RawGlobalSources>,
}

#[derive(Debug, Deserialize, Default)]
struct RawGlobalAuthors {
    #[serde(rename = "author", default)]
    authors: Vec<RawGlobalEntry>,
}

#[derive(Debug, Deserialize, Default)]
struct RawGlobalSources {
    #[serde(rename = "source", default)]
    sources: Vec<RawGlobalEntry>,
}

#[derive(Debug, Deserialize)]
struct RawGlobalEntry {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "$text", default)]
    name: String,
}

impl RawPackageV5 {
    fn into_package(self) -> Package {
        Package {
            id: self.id,
            name: self.name,
            version: self.version,
            restriction: self.restriction,
            date: self.date,
            publisher: self.publisher,
            difficulty: self.difficulty,
            logo: self.logo,
            language: self.language,
            info: self.info.map(RawInfo::into_info),
            tags: self.tags.map(|t| t.tags).unwrap_or_default(),
            global: self.global.map(RawGlobal::into_global),
            rounds: Rounds::V5(self.rounds.into_iter().map(RawRound::into_round).collect()),
        }
    }
}

impl RawPackageV4 {
    fn into_package(self) -> Package {
        Package {
            id: self.id,
            name: self.name,
            version: self.version,
            restriction: self.restriction,
            date: self.date,
            publisher: self.publisher,
            difficulty: self.difficulty,
            logo: self.logo,
            language: self.language,
            info: self.info.map(RawInfo::into_info),
            tags: self.tags.map(|t| t.tags).unwrap_or_default(),
            global: self.global.map(RawGlobal::into_global),
            rounds: Rounds::V4(
                self.rounds
                    .rounds
                    .into_iter()
                    .map(RawRoundV4::into_round)
                    .collect(),
            ),
        }
    }
}

impl RawRound {
    fn into_round(self) -> Round {
        Round {
            name: self.name,
            info: self.info.map(RawInfo::into_info),
            themes: self.themes.into_iter().map(RawTheme::into_theme).collect(),
        }
    }
}

impl RawTheme {
    fn into_theme(self) -> Theme {
        Theme {
            name: self.name,
            info: self.info.map(RawInfo::into_info),
            questions: self
                .questions
                .into_iter()
                .map(RawQuestion::into_question)
                .collect(),
        }
    }
}

impl RawQuestion {
    fn into_question(self) -> Question {
        Question {
            question_type: self.question_type,
            params: self
                .params
                .map(|p| p.params.into_iter().map(RawParam::into_param).collect())
                .unwrap_or_default(),
            right: self.right.map(|a| a.answers).unwrap_or_default(),
            wrong: self.wrong.map(|a| a.answers).unwrap_or_default(),
            script: self.script,
            info: self.info.map(RawInfo::into_info),
        }
    }
}

impl RawParam {
    fn into_param(self) -> Param {
        // The declared type picks the payload shape; any unrecognized tag is
        // a scalar, so unknown types pass through unchanged.
        let payload = match self.param_type.as_str() {
            "content" => ParamPayload::Content(
                self.items.into_iter().map(RawItem::into_item).collect(),
            ),
            "group" => {
                ParamPayload::Group(self.params.into_iter().map(RawParam::into_param).collect())
            }
            "numberSet" => ParamPayload::NumberSet(NumberSet {
                minimum: self.minimum.unwrap_or_default(),
                maximum: self.maximum.unwrap_or_default(),
                step: self.step.unwrap_or_default(),
            }),
            _ => ParamPayload::Value {
                ty: self.param_type,
                value: self.value,
            },
        };
        Param {
            name: self.name,
            payload,
        }
    }
}

impl RawItem {
    fn into_item(self) -> ContentItem {
        ContentItem {
            content_type: self.item_type,
            value: self.value,
            duration: self.duration,
            is_ref: self.is_ref,
            placement: self.placement,
            wait_for_finish: self.wait_for_finish,
        }
    }
}

impl RawRoundV4 {
    fn into_round(self) -> RoundV4 {
        RoundV4 {
            name: self.name,
            info: self.info.map(RawInfo::into_info),
            themes: self
                .themes
                .themes
                .into_iter()
                .map(RawThemeV4::into_theme)
                .collect(),
        }
    }
}

impl RawThemeV4 {
    fn into_theme(self) -> ThemeV4 {
        ThemeV4 {
            name: self.name,
            info: self.info.map(RawInfo::into_info),
            questions: self
                .questions
                .questions
                .into_iter()
                .map(RawQuestionV4::into_question)
                .collect(),
        }
    }
}

impl RawQuestionV4 {
    fn into_question(self) -> QuestionV4 {
        QuestionV4 {
            price: self.price,
            scenario: self
                .scenario
                .map(|s| s.atoms.into_iter().map(RawAtom::into_atom).collect())
                .unwrap_or_default(),
            right: self.right.map(|a| a.answers).unwrap_or_default(),
            wrong: self.wrong.map(|a| a.answers).unwrap_or_default(),
            info: self.info.map(RawInfo::into_info),
        }
    }
}

impl RawAtom {
    fn into_atom(self) -> Atom {
        Atom {
            atom_type: self.atom_type,
            duration: self.duration,
            text: self.text,
        }
    }
}

impl RawInfo {
    fn into_info(self) -> Info {
        Info {
            authors: self.authors.map(|a| a.authors).unwrap_or_default(),
            sources: self.sources.map(|s| s.sources).unwrap_or_default(),
            comments: self.comments.map(|c| c.comments).unwrap_or_default(),
            showman_comments: self.showman_comments.map(|c| c.comments).unwrap_or_default(),
        }
    }
}

impl RawGlobal {
    fn into_global(self) -> Global {
        Global {
            authors: self
                .authors
                .map(|a| a.authors.into_iter().map(RawGlobalEntry::into_entry).collect())
                .unwrap_or_default(),
            sources: self
                .sources
                .map(|s| s.sources.into_iter().map(RawGlobalEntry::into_entry).collect())
                .unwrap_or_default(),
        }
    }
}

impl RawGlobalEntry {
    fn into_entry(self) -> GlobalEntry {
        GlobalEntry {
            id: self.id,
            name: self.name,
        }
    }
}
