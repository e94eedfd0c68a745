//! Catalog word metadata, as returned by the vocabulary catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ValidationError, WordId};

/// CEFR proficiency level of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl VocabLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VocabLevel::A1 => "a1",
            VocabLevel::A2 => "a2",
            VocabLevel::B1 => "b1",
            VocabLevel::B2 => "b2",
            VocabLevel::C1 => "c1",
            VocabLevel::C2 => "c2",
        }
    }
}

impl fmt::Display for VocabLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VocabLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a1" => Ok(VocabLevel::A1),
            "a2" => Ok(VocabLevel::A2),
            "b1" => Ok(VocabLevel::B1),
            "b2" => Ok(VocabLevel::B2),
            "c1" => Ok(VocabLevel::C1),
            "c2" => Ok(VocabLevel::C2),
            other => Err(ValidationError::invalid_format(
                "level",
                format!("unknown level '{}'", other),
            )),
        }
    }
}

/// Grammatical category of a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    #[default]
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noun" => Ok(PartOfSpeech::Noun),
            "verb" => Ok(PartOfSpeech::Verb),
            "adjective" => Ok(PartOfSpeech::Adjective),
            "adverb" => Ok(PartOfSpeech::Adverb),
            "pronoun" => Ok(PartOfSpeech::Pronoun),
            "preposition" => Ok(PartOfSpeech::Preposition),
            "conjunction" => Ok(PartOfSpeech::Conjunction),
            "interjection" => Ok(PartOfSpeech::Interjection),
            other => Err(ValidationError::invalid_format(
                "part_of_speech",
                format!("unknown part of speech '{}'", other),
            )),
        }
    }
}

/// Read-only metadata for one catalog word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMetadata {
    pub word_id: WordId,
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    pub level: VocabLevel,
    pub topic: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub part_of_speech: PartOfSpeech,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_round_trips_through_str() {
        for level in [
            VocabLevel::A1,
            VocabLevel::A2,
            VocabLevel::B1,
            VocabLevel::B2,
            VocabLevel::C1,
            VocabLevel::C2,
        ] {
            assert_eq!(level.as_str().parse::<VocabLevel>().unwrap(), level);
        }
        assert!("d1".parse::<VocabLevel>().is_err());
    }

    #[test]
    fn part_of_speech_defaults_to_noun() {
        let json = r#"{"word_id":1,"word":"apple","definition":"a fruit","level":"a1","topic":"food"}"#;
        let word: WordMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(word.part_of_speech, PartOfSpeech::Noun);
        assert!(word.example.is_none());
    }

    #[test]
    fn level_deserializes_from_lowercase_code() {
        let level: VocabLevel = serde_json::from_str("\"b2\"").unwrap();
        assert_eq!(level, VocabLevel::B2);
    }
}
