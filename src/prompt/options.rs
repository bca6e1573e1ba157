//! Closed option sets used to pick between pre-written instruction variants.
//!
//! Every enum parses with `FromStr` (case-insensitive, surrounding
//! whitespace ignored) and fails with [`InputError::UnknownOption`] for
//! anything outside its set.

use std::fmt;
use std::str::FromStr;

use super::InputError;

fn unknown(field: &'static str, value: &str) -> InputError {
    InputError::UnknownOption {
        field,
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// SummaryLevel
// ---------------------------------------------------------------------------

/// How long a summary should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLevel {
    Short,
    Medium,
    Long,
}

impl SummaryLevel {
    /// The sentence that steers the summary length.
    pub fn instruction(self) -> &'static str {
        match self {
            SummaryLevel::Short => "Provide a very brief, one-paragraph summary.",
            SummaryLevel::Medium => "Provide a detailed, multi-paragraph summary.",
            SummaryLevel::Long => {
                "Provide a comprehensive summary, capturing all key points and nuances."
            }
        }
    }
}

impl FromStr for SummaryLevel {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(SummaryLevel::Short),
            "medium" => Ok(SummaryLevel::Medium),
            "long" => Ok(SummaryLevel::Long),
            _ => Err(unknown("level", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// LetterTone
// ---------------------------------------------------------------------------

/// Register of a drafted letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterTone {
    Official,
    Friendly,
}

impl LetterTone {
    pub fn instruction(self) -> &'static str {
        match self {
            LetterTone::Official => {
                "Draft a formal, official letter. It should include a proper salutation, a clear \
                 body explaining the request, and a formal closing. Ensure the language is \
                 respectful and professional."
            }
            LetterTone::Friendly => {
                "Draft a friendly, informal letter. It should have a warm and friendly tone, with \
                 a suitable greeting and closing."
            }
        }
    }
}

impl FromStr for LetterTone {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "official" => Ok(LetterTone::Official),
            "friendly" => Ok(LetterTone::Friendly),
            _ => Err(unknown("tone", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// ArticleKind
// ---------------------------------------------------------------------------

/// Genre of a drafted article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleKind {
    Essay,
    Literary,
    Research,
}

impl ArticleKind {
    pub fn instruction(self) -> &'static str {
        match self {
            ArticleKind::Essay => {
                "You are an expert columnist. Write a compelling essay (وتار). The topic could be \
                 political, economic, or social. The tone should be formal and analytical."
            }
            ArticleKind::Literary => {
                "You are a master of Kurdish literature. Write a beautiful and eloquent literary \
                 piece (بابەتی ئەدەبی). Use rich vocabulary, metaphors, and a poetic style. You \
                 can draw inspiration from classic and modern Kurdish literature."
            }
            ArticleKind::Research => {
                "You are a meticulous researcher and analyst. Write a well-structured research \
                 and analysis piece (توێژینەوە و لێکۆڵینەوە). It should be objective, data-driven \
                 (if applicable), and present a clear, logical argument. Structure it with an \
                 introduction, body, and conclusion."
            }
        }
    }
}

impl FromStr for ArticleKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "essay" => Ok(ArticleKind::Essay),
            "literary" => Ok(ArticleKind::Literary),
            "research" => Ok(ArticleKind::Research),
            _ => Err(unknown("kind", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Languages offered for translation and transcription hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Let the service detect the language.  Only meaningful as a source.
    AutoDetect,
    /// Central Kurdish, Arabic script.
    Sorani,
    /// Northern Kurdish, Latin (Hawar) script.
    Kurmanji,
    English,
    Arabic,
}

impl Language {
    /// All selectable languages, `AutoDetect` first.
    pub const ALL: [Language; 5] = [
        Language::AutoDetect,
        Language::Sorani,
        Language::Kurmanji,
        Language::English,
        Language::Arabic,
    ];

    /// The name used inside instructions, e.g. `Kurdish (Sorani)`.
    pub fn label(self) -> &'static str {
        match self {
            Language::AutoDetect => "Auto Detect",
            Language::Sorani => "Kurdish (Sorani)",
            Language::Kurmanji => "Kurdish (Kurmanji)",
            Language::English => "English",
            Language::Arabic => "Arabic",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = InputError;

    /// Accepts the display label or a short code (`auto`, `ckb`, `kmr`,
    /// `en`, `ar`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        let by_code = match needle.as_str() {
            "auto" => Some(Language::AutoDetect),
            "ckb" | "sorani" => Some(Language::Sorani),
            "kmr" | "kurmanji" => Some(Language::Kurmanji),
            "en" => Some(Language::English),
            "ar" => Some(Language::Arabic),
            _ => None,
        };

        by_code
            .or_else(|| {
                Language::ALL
                    .into_iter()
                    .find(|l| l.label().to_ascii_lowercase() == needle)
            })
            .ok_or_else(|| unknown("language", s))
    }
}

// ---------------------------------------------------------------------------
// ExpandDirection
// ---------------------------------------------------------------------------

/// Side of an image to outpaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandDirection {
    Top,
    Right,
    Bottom,
    Left,
}

impl ExpandDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpandDirection::Top => "top",
            ExpandDirection::Right => "right",
            ExpandDirection::Bottom => "bottom",
            ExpandDirection::Left => "left",
        }
    }
}

impl FromStr for ExpandDirection {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(ExpandDirection::Top),
            "right" => Ok(ExpandDirection::Right),
            "bottom" => Ok(ExpandDirection::Bottom),
            "left" => Ok(ExpandDirection::Left),
            _ => Err(unknown("direction", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!("SHORT".parse(), Ok(SummaryLevel::Short));
        assert_eq!(" long ".parse(), Ok(SummaryLevel::Long));
        assert!("brief".parse::<SummaryLevel>().is_err());
    }

    #[test]
    fn languages_parse_from_label_or_code() {
        assert_eq!("Kurdish (Kurmanji)".parse(), Ok(Language::Kurmanji));
        assert_eq!("auto detect".parse(), Ok(Language::AutoDetect));
        assert_eq!("ckb".parse(), Ok(Language::Sorani));
        assert_eq!("en".parse(), Ok(Language::English));
        assert_eq!(
            "Klingon".parse::<Language>(),
            Err(InputError::UnknownOption {
                field: "language",
                value: "Klingon".into()
            })
        );
    }

    #[test]
    fn language_label_round_trips() {
        for lang in Language::ALL {
            assert_eq!(lang.label().parse(), Ok(lang));
        }
    }

    #[test]
    fn directions_and_tones() {
        assert_eq!("Left".parse(), Ok(ExpandDirection::Left));
        assert_eq!(ExpandDirection::Bottom.as_str(), "bottom");
        assert!("diagonal".parse::<ExpandDirection>().is_err());
        assert_eq!("friendly".parse(), Ok(LetterTone::Friendly));
        assert_eq!("research".parse(), Ok(ArticleKind::Research));
        assert!("poem".parse::<ArticleKind>().is_err());
    }
}
