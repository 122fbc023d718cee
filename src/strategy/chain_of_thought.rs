use crate::config::{Environment, StrategyKind};
use super::{Strategy, Judgment, RecordStyle, prompts, common::contains_verdict};

/// Chain of thought: the model checks acoustic criteria (or numbered
/// reasoning steps) before giving the verdict phrase
pub struct ChainOfThoughtStrategy {
    environment: Environment,
    instruction: String,
}

impl ChainOfThoughtStrategy {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            instruction: prompts::instruction(StrategyKind::Cot, environment),
        }
    }
}

impl Strategy for ChainOfThoughtStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Cot
    }

    fn environment(&self) -> Environment {
        self.environment
    }

    fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Substring search anywhere in the response. When both phrases
    /// appear the positive one wins.
    fn extract_judgment(&self, response: &str) -> Judgment {
        contains_verdict(response)
    }

    fn record_style(&self) -> RecordStyle {
        RecordStyle::ResponseOnly
    }

    fn report_title(&self) -> &'static str {
        "咳嗽检测结果（结构化思维链 - 实时写入）"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_after_reasoning() {
        let strategy = ChainOfThoughtStrategy::new(Environment::Standard);
        let response = "声音短促，能量集中在中高频，呼气主导。\n“有咳嗽”";
        assert_eq!(strategy.extract_judgment(response), Judgment::Positive);
    }

    #[test]
    fn test_positive_wins_when_both_present() {
        let strategy = ChainOfThoughtStrategy::new(Environment::Quiet);
        assert_eq!(strategy.extract_judgment("无咳嗽？不，有咳嗽"), Judgment::Positive);
    }

    #[test]
    fn test_negative_only() {
        let strategy = ChainOfThoughtStrategy::new(Environment::Noisy);
        assert_eq!(strategy.extract_judgment("步骤3排除后：无咳嗽"), Judgment::Negative);
        assert_eq!(strategy.extract_judgment("无法判断"), Judgment::Unparseable);
    }
}
