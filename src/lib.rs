//! # siq-reader
//!
//! A reader for SIQ trivia package files (zip archives with a `content.xml`
//! payload). Supports both the v4 and v5 schema generations and presents a
//! single unified model regardless of which generation produced the archive.
pub mod siq;

// Re-export the main types for convenience
pub use siq::{
    markdown,
    models::{
        Atom, ContentItem, Global, GlobalEntry, Info, NumberSet, Package, Param, ParamPayload,
        Question, QuestionV4, Round, RoundV4, Rounds, Theme, ThemeV4,
    },
    normalize, Result, SchemaVersion, SiqError, SiqReader,
};
