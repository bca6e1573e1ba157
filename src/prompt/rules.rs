//! Fixed rule texts and the fragment builder shared by every task.
//!
//! The orthography rule is embedded verbatim into each instruction that
//! reads or writes Sorani in Arabic script, so a request is fully
//! self-describing.  Caller text never goes through these helpers except
//! via [`fenced`] / [`custom_rules_segment`], which keep it inside a clearly
//! delimited data block.

// ---------------------------------------------------------------------------
// Rule texts
// ---------------------------------------------------------------------------

/// The ە (ae vowel) / ه (h consonant) distinction the service tends to blur.
pub const KURDISH_ORTHOGRAPHY_RULE: &str = "CRITICAL ORTHOGRAPHY RULE: You must strictly \
differentiate between the Kurdish letter 'ە' (ae vowel) and 'ه' (h consonant). The letter 'ە' is \
a standalone vowel and NEVER connects to the letter before or after it. The letter 'ه' is a \
consonant that connects to other letters as expected (e.g., in 'هاوار' or 'هەتاو'). Do not \
confuse them. For example, 'وشە' (word) is correct, not 'وشه'. Enforce this rule in all your \
responses.";

/// Script rule for Kurmanji output.
pub const HAWAR_SCRIPT_RULE: &str =
    "If the target language is Kurdish (Kurmanji), the translation MUST be in the Latin alphabet (Hawar script).";

/// Reminder for OCR-style extraction.
pub const KURDISH_CHARACTERS_RULE: &str = "Ensure all specific Kurdish characters (like ێ, ۆ, ڕ, \
ڵ, ڤ) are correctly identified and preserved.";

/// Plain-output rule for correction tasks.
pub const ONLY_CORRECTED_TEXT: &str =
    "Only return the corrected text. Do not add any explanations, comments, or analysis.";

/// Label that introduces optional caller-supplied correction rules.
pub const CUSTOM_RULES_LABEL: &str = "Custom rules:";

/// Data-block delimiter.
const FENCE: &str = "---";

// ---------------------------------------------------------------------------
// Fragment helpers
// ---------------------------------------------------------------------------

/// Wrap caller data in a labelled `---` block.
///
/// ```
/// use kurdish_ai_tools::prompt::rules::fenced;
///
/// assert_eq!(fenced("Notes:", "a\nb"), "Notes:\n---\na\nb\n---");
/// ```
pub fn fenced(label: &str, body: &str) -> String {
    format!("{label}\n{FENCE}\n{body}\n{FENCE}")
}

/// `Custom rules:` block, or `None` when the rules are absent or blank.
pub fn custom_rules_segment(rules: Option<&str>) -> Option<String> {
    rules
        .filter(|r| !r.trim().is_empty())
        .map(|r| fenced(CUSTOM_RULES_LABEL, r))
}

/// The Sorani rule wrapped as a conditional clause.
pub fn sorani_rule_clause(condition: &str) -> String {
    format!("{condition}, you must follow this rule: {KURDISH_ORTHOGRAPHY_RULE}")
}

// ---------------------------------------------------------------------------
// Instruction
// ---------------------------------------------------------------------------

/// Line-oriented builder for system instructions.
///
/// Optional lines that are `None` are skipped entirely; no blank clause is
/// ever emitted for them.
#[derive(Debug, Default)]
pub struct Instruction {
    lines: Vec<String>,
}

impl Instruction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a policy line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Append a line only when present.
    pub fn maybe(mut self, line: Option<String>) -> Self {
        if let Some(line) = line {
            self.lines.push(line);
        }
        self
    }

    /// Append the Sorani orthography rule.
    pub fn orthography(self) -> Self {
        self.line(KURDISH_ORTHOGRAPHY_RULE)
    }

    /// Append an empty separator line.
    pub fn blank(mut self) -> Self {
        self.lines.push(String::new());
        self
    }

    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_custom_rules_produce_no_segment() {
        assert_eq!(custom_rules_segment(None), None);
        assert_eq!(custom_rules_segment(Some("")), None);
        assert_eq!(custom_rules_segment(Some("  \n ")), None);
    }

    #[test]
    fn custom_rules_are_fenced_verbatim() {
        let seg = custom_rules_segment(Some("بنووسە 'کوردستان'")).unwrap();
        assert_eq!(seg, "Custom rules:\n---\nبنووسە 'کوردستان'\n---");
    }

    #[test]
    fn instruction_skips_missing_lines() {
        let text = Instruction::new()
            .line("first")
            .maybe(None)
            .line("second")
            .build();
        assert_eq!(text, "first\nsecond");
    }

    #[test]
    fn orthography_rule_mentions_both_letters() {
        assert!(KURDISH_ORTHOGRAPHY_RULE.contains("'ە' (ae vowel)"));
        assert!(KURDISH_ORTHOGRAPHY_RULE.contains("'ه' (h consonant)"));
        let text = Instruction::new().orthography().build();
        assert_eq!(text, KURDISH_ORTHOGRAPHY_RULE);
    }
}
