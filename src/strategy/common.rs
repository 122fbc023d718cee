use std::fmt;

/// Verdict phrase signalling that a cough is present
pub const POSITIVE_PHRASE: &str = "有咳嗽";
/// Verdict phrase signalling that no cough is present
pub const NEGATIVE_PHRASE: &str = "无咳嗽";
/// Label written for a response in which no verdict could be found
pub const UNPARSEABLE_LABEL: &str = "无法判断";

/// Three-valued classification outcome for one response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Judgment {
    Positive,
    Negative,
    Unparseable,
}

impl Judgment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => POSITIVE_PHRASE,
            Self::Negative => NEGATIVE_PHRASE,
            Self::Unparseable => UNPARSEABLE_LABEL,
        }
    }

    fn from_phrase(phrase: &str) -> Self {
        match phrase {
            POSITIVE_PHRASE => Self::Positive,
            NEGATIVE_PHRASE => Self::Negative,
            _ => Self::Unparseable,
        }
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a classified response is rendered into the result record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStyle {
    /// The response text alone
    ResponseOnly,
    /// Judgment label on the first line, then `模型回复：<response>`
    JudgmentWithResponse,
}

impl RecordStyle {
    pub fn render(&self, judgment: Judgment, response: &str) -> String {
        match self {
            Self::ResponseOnly => response.to_string(),
            Self::JudgmentWithResponse => format!("{}\n模型回复：{}", judgment.label(), response),
        }
    }
}

/// Substring test, positive phrase checked before the negative one
pub fn contains_verdict(text: &str) -> Judgment {
    if text.contains(POSITIVE_PHRASE) {
        Judgment::Positive
    } else if text.contains(NEGATIVE_PHRASE) {
        Judgment::Negative
    } else {
        Judgment::Unparseable
    }
}

/// Whichever verdict phrase occurs first in `text`
pub fn leftmost_verdict(text: &str) -> Judgment {
    match (text.find(POSITIVE_PHRASE), text.find(NEGATIVE_PHRASE)) {
        (Some(p), Some(n)) => if p < n { Judgment::Positive } else { Judgment::Negative },
        (Some(_), None) => Judgment::Positive,
        (None, Some(_)) => Judgment::Negative,
        (None, None) => Judgment::Unparseable,
    }
}

/// Verdict for a response that should consist of the phrase alone
pub fn exact_verdict(text: &str) -> Judgment {
    Judgment::from_phrase(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_prefers_positive() {
        assert_eq!(contains_verdict("无咳嗽……不对，有咳嗽"), Judgment::Positive);
        assert_eq!(contains_verdict("结论：无咳嗽"), Judgment::Negative);
        assert_eq!(contains_verdict("听不清"), Judgment::Unparseable);
    }

    #[test]
    fn test_leftmost_follows_position() {
        assert_eq!(leftmost_verdict("无咳嗽……不对，有咳嗽"), Judgment::Negative);
        assert_eq!(leftmost_verdict("判断为有咳嗽，而非无咳嗽"), Judgment::Positive);
        assert_eq!(leftmost_verdict(""), Judgment::Unparseable);
    }

    #[test]
    fn test_exact_ignores_surrounding_whitespace() {
        assert_eq!(exact_verdict("  无咳嗽\n"), Judgment::Negative);
        assert_eq!(exact_verdict("有咳嗽。"), Judgment::Unparseable);
    }

    #[test]
    fn test_record_styles() {
        assert_eq!(RecordStyle::ResponseOnly.render(Judgment::Positive, "有咳嗽"), "有咳嗽");
        assert_eq!(
            RecordStyle::JudgmentWithResponse.render(Judgment::Unparseable, "不确定"),
            "无法判断\n模型回复：不确定"
        );
    }
}
