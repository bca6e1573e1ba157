//! Transport-ready media payloads and PDF page selection.
//!
//! Encoding audio, rendering PDF pages and reading files happen outside
//! this crate; what crosses the boundary is a [`MediaPart`]: a base64
//! payload plus its MIME type, passed to the service untouched.
//!
//! [`PageRange`] validates the `start-end` page selection a user types for
//! multi-page extraction.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::prompt::InputError;

// ---------------------------------------------------------------------------
// MediaPart
// ---------------------------------------------------------------------------

/// One piece of inline binary content (audio, video, image, page render).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPart {
    /// Standard base64 payload.
    pub data: String,
    /// MIME type, e.g. `audio/mp3`, `image/jpeg`.
    pub mime_type: String,
}

impl MediaPart {
    /// Wrap an already-encoded payload.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encode raw bytes with standard base64.
    ///
    /// ```
    /// use kurdish_ai_tools::media::MediaPart;
    ///
    /// let part = MediaPart::from_bytes(b"hi", "text/plain");
    /// assert_eq!(part.data, "aGk=");
    /// ```
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(STANDARD.encode(bytes), mime_type)
    }

    /// Size of the encoded payload in bytes (for logging).
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }
}

// ---------------------------------------------------------------------------
// PageRange
// ---------------------------------------------------------------------------

/// An inclusive, 1-based page range validated against a document length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: usize,
    end: usize,
}

impl PageRange {
    /// Parse `start-end` (or a single page number) for a document with
    /// `total_pages` pages.
    ///
    /// Requires `1 <= start <= end <= total_pages`.
    ///
    /// ```
    /// use kurdish_ai_tools::media::PageRange;
    ///
    /// let range = PageRange::parse("2-4", 10).unwrap();
    /// assert_eq!(range.pages().collect::<Vec<_>>(), vec![2, 3, 4]);
    /// assert!(PageRange::parse("4-2", 10).is_err());
    /// ```
    pub fn parse(text: &str, total_pages: usize) -> Result<Self, InputError> {
        let invalid = || InputError::InvalidPageRange {
            input: text.to_string(),
            total_pages,
        };

        let trimmed = text.trim();
        let (start, end) = match trimmed.split_once('-') {
            Some((a, b)) => (a.trim(), b.trim()),
            None => (trimmed, trimmed),
        };

        let page = |digits: &str| -> Result<usize, InputError> {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            digits.parse().map_err(|_| invalid())
        };
        let start = page(start)?;
        let end = page(end)?;

        if start < 1 || start > end || end > total_pages {
            return Err(invalid());
        }

        Ok(Self { start, end })
    }

    /// The full range `1-total_pages`.  `None` for an empty document.
    pub fn all(total_pages: usize) -> Option<Self> {
        (total_pages > 0).then_some(Self {
            start: 1,
            end: total_pages,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of pages selected.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always `false`: a parsed range holds at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// 1-based page numbers in order.
    pub fn pages(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }

    /// Pick the selected pages out of a full list of page renders,
    /// preserving order.
    pub fn select<T: Clone>(&self, pages: &[T]) -> Vec<T> {
        pages
            .iter()
            .skip(self.start - 1)
            .take(self.len())
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
