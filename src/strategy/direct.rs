use crate::config::{Environment, StrategyKind};
use super::{Strategy, Judgment, RecordStyle, prompts, common::{exact_verdict, NEGATIVE_PHRASE, POSITIVE_PHRASE}};

/// Direct question: the model is asked for the verdict phrase only
pub struct DirectStrategy {
    environment: Environment,
    instruction: String,
}

impl DirectStrategy {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            instruction: prompts::instruction(StrategyKind::Direct, environment),
        }
    }
}

impl Strategy for DirectStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Direct
    }

    fn environment(&self) -> Environment {
        self.environment
    }

    fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Exact phrase first. A longer answer is accepted only when it
    /// mentions exactly one of the two phrases.
    fn extract_judgment(&self, response: &str) -> Judgment {
        match exact_verdict(response) {
            Judgment::Unparseable => {}
            judgment => return judgment,
        }

        match (response.contains(POSITIVE_PHRASE), response.contains(NEGATIVE_PHRASE)) {
            (true, false) => Judgment::Positive,
            (false, true) => Judgment::Negative,
            _ => Judgment::Unparseable,
        }
    }

    fn record_style(&self) -> RecordStyle {
        RecordStyle::ResponseOnly
    }

    fn report_title(&self) -> &'static str {
        match self.environment {
            Environment::Standard => "咳嗽检测结果",
            _ => "咳嗽检测结果（结构化思维链 - 实时写入）",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_negative_phrase() {
        let strategy = DirectStrategy::new(Environment::Standard);
        assert_eq!(strategy.extract_judgment("无咳嗽"), Judgment::Negative);
    }

    #[test]
    fn test_exact_positive_phrase() {
        let strategy = DirectStrategy::new(Environment::Standard);
        assert_eq!(strategy.extract_judgment("有咳嗽"), Judgment::Positive);
    }

    #[test]
    fn test_single_phrase_in_sentence() {
        let strategy = DirectStrategy::new(Environment::Quiet);
        assert_eq!(strategy.extract_judgment("“有咳嗽”。"), Judgment::Positive);
        assert_eq!(strategy.extract_judgment("我认为无咳嗽"), Judgment::Negative);
    }

    #[test]
    fn test_no_phrase_is_unparseable() {
        let strategy = DirectStrategy::new(Environment::Noisy);
        assert_eq!(strategy.extract_judgment("音频太短，无法确定"), Judgment::Unparseable);
        assert_eq!(strategy.extract_judgment(""), Judgment::Unparseable);
    }

    #[test]
    fn test_stores_response_only() {
        let strategy = DirectStrategy::new(Environment::Standard);
        assert_eq!(strategy.record_style(), RecordStyle::ResponseOnly);
        assert_eq!(strategy.report_title(), "咳嗽检测结果");
    }
}
