//! Engine language enumeration
//!
//! Ids follow the engine's `via.Language` enum. MSG files store these ids in
//! their language list, and entry contents are indexed by list position.

use std::fmt;
use std::str::FromStr;

/// A language id known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum LanguageId {
    Japanese = 0,
    English = 1,
    French = 2,
    Italian = 3,
    German = 4,
    Spanish = 5,
    Russian = 6,
    Polish = 7,
    Dutch = 8,
    Portuguese = 9,
    PortugueseBr = 10,
    Korean = 11,
    TraditionalChinese = 12,
    SimplifiedChinese = 13,
    Finnish = 14,
    Swedish = 15,
    Danish = 16,
    Norwegian = 17,
    Czech = 18,
    Hungarian = 19,
    Slovak = 20,
    Arabic = 21,
    Turkish = 22,
    Bulgarian = 23,
    Greek = 24,
    Romanian = 25,
    Thai = 26,
    Ukrainian = 27,
    Vietnamese = 28,
    Indonesian = 29,
    Fiction = 30,
    Hindi = 31,
    LatinAmericanSpanish = 32,
    Max = 33,
}

impl LanguageId {
    /// Every language in id order
    pub const ALL: [LanguageId; 34] = [
        Self::Japanese,
        Self::English,
        Self::French,
        Self::Italian,
        Self::German,
        Self::Spanish,
        Self::Russian,
        Self::Polish,
        Self::Dutch,
        Self::Portuguese,
        Self::PortugueseBr,
        Self::Korean,
        Self::TraditionalChinese,
        Self::SimplifiedChinese,
        Self::Finnish,
        Self::Swedish,
        Self::Danish,
        Self::Norwegian,
        Self::Czech,
        Self::Hungarian,
        Self::Slovak,
        Self::Arabic,
        Self::Turkish,
        Self::Bulgarian,
        Self::Greek,
        Self::Romanian,
        Self::Thai,
        Self::Ukrainian,
        Self::Vietnamese,
        Self::Indonesian,
        Self::Fiction,
        Self::Hindi,
        Self::LatinAmericanSpanish,
        Self::Max,
    ];

    /// Look up a language by its numeric id
    #[must_use]
    pub fn from_id(id: i32) -> Option<Self> {
        usize::try_from(id).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    #[must_use]
    pub const fn id(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Japanese => "Japanese",
            Self::English => "English",
            Self::French => "French",
            Self::Italian => "Italian",
            Self::German => "German",
            Self::Spanish => "Spanish",
            Self::Russian => "Russian",
            Self::Polish => "Polish",
            Self::Dutch => "Dutch",
            Self::Portuguese => "Portuguese",
            Self::PortugueseBr => "PortugueseBr",
            Self::Korean => "Korean",
            Self::TraditionalChinese => "TraditionalChinese",
            Self::SimplifiedChinese => "SimplifiedChinese",
            Self::Finnish => "Finnish",
            Self::Swedish => "Swedish",
            Self::Danish => "Danish",
            Self::Norwegian => "Norwegian",
            Self::Czech => "Czech",
            Self::Hungarian => "Hungarian",
            Self::Slovak => "Slovak",
            Self::Arabic => "Arabic",
            Self::Turkish => "Turkish",
            Self::Bulgarian => "Bulgarian",
            Self::Greek => "Greek",
            Self::Romanian => "Romanian",
            Self::Thai => "Thai",
            Self::Ukrainian => "Ukrainian",
            Self::Vietnamese => "Vietnamese",
            Self::Indonesian => "Indonesian",
            Self::Fiction => "Fiction",
            Self::Hindi => "Hindi",
            Self::LatinAmericanSpanish => "LatinAmericanSpanish",
            Self::Max => "Max",
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LanguageId {
    type Err = String;

    /// Accepts a language name (case-insensitive) or a numeric id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<i32>() {
            return Self::from_id(id).ok_or_else(|| format!("Unknown language id {id}"));
        }
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown language '{s}'"))
    }
}

/// Whether `id` is part of the engine's language enumeration
#[must_use]
pub fn is_known_language(id: i32) -> bool {
    LanguageId::from_id(id).is_some()
}
