use regex::Regex;
use std::sync::LazyLock;

use crate::config::{Environment, StrategyKind};
use super::{Strategy, Judgment, RecordStyle, prompts, common::POSITIVE_PHRASE};

static FINAL_CONCLUSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"最终结论[:：]*(有咳嗽|无咳嗽)").expect("final conclusion pattern is valid")
});

/// Self-ask: the model answers four sub-questions and closes with
/// `最终结论：<verdict>`
pub struct SelfAskStrategy {
    environment: Environment,
    instruction: String,
}

impl SelfAskStrategy {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            instruction: prompts::instruction(StrategyKind::SelfAsk, environment),
        }
    }
}

impl Strategy for SelfAskStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SelfAsk
    }

    fn environment(&self) -> Environment {
        self.environment
    }

    fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Only a verdict directly following `最终结论` counts; a verdict word
    /// elsewhere in the text is ignored.
    fn extract_judgment(&self, response: &str) -> Judgment {
        match FINAL_CONCLUSION.captures(response).and_then(|c| c.get(1)) {
            Some(verdict) if verdict.as_str() == POSITIVE_PHRASE => Judgment::Positive,
            Some(_) => Judgment::Negative,
            None => Judgment::Unparseable,
        }
    }

    fn record_style(&self) -> RecordStyle {
        RecordStyle::JudgmentWithResponse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_phrase_mid_text() {
        let strategy = SelfAskStrategy::new(Environment::Standard);
        let response = "问题1：是，存在突发声音。\n问题2：是。\n最终结论：有咳嗽\n理由：爆破性气流明显。";
        assert_eq!(strategy.extract_judgment(response), Judgment::Positive);
    }

    #[test]
    fn test_ascii_colon_and_no_colon() {
        let strategy = SelfAskStrategy::new(Environment::Quiet);
        assert_eq!(strategy.extract_judgment("最终结论:无咳嗽"), Judgment::Negative);
        assert_eq!(strategy.extract_judgment("最终结论有咳嗽"), Judgment::Positive);
        assert_eq!(strategy.extract_judgment("最终结论：：无咳嗽"), Judgment::Negative);
    }

    #[test]
    fn test_unanchored_verdict_is_unparseable() {
        let strategy = SelfAskStrategy::new(Environment::Noisy);
        assert_eq!(strategy.extract_judgment("综合来看有咳嗽。"), Judgment::Unparseable);
        assert_eq!(strategy.extract_judgment("最终结论： 有咳嗽"), Judgment::Unparseable);
    }

    #[test]
    fn test_first_anchored_conclusion_wins() {
        let strategy = SelfAskStrategy::new(Environment::Standard);
        let response = "最终结论：无咳嗽（初判）……复核后最终结论：有咳嗽";
        assert_eq!(strategy.extract_judgment(response), Judgment::Negative);
    }

    #[test]
    fn test_record_includes_label() {
        let strategy = SelfAskStrategy::new(Environment::Standard);
        assert_eq!(strategy.record_style(), RecordStyle::JudgmentWithResponse);
        assert_eq!(strategy.report_title(), "咳嗽检测结果（实时写入）");
    }
}
