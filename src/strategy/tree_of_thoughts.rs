use crate::config::{Environment, StrategyKind};
use super::{Strategy, Judgment, RecordStyle, prompts, common::leftmost_verdict};

/// Tree of thoughts: the model scores cough / not-cough / ambiguous paths
/// and concludes from the highest-scoring one
pub struct TreeOfThoughtsStrategy {
    environment: Environment,
    instruction: String,
}

impl TreeOfThoughtsStrategy {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            instruction: prompts::instruction(StrategyKind::Tot, environment),
        }
    }
}

impl Strategy for TreeOfThoughtsStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Tot
    }

    fn environment(&self) -> Environment {
        self.environment
    }

    fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Unanchored: the first verdict phrase in the response decides
    fn extract_judgment(&self, response: &str) -> Judgment {
        leftmost_verdict(response)
    }

    fn record_style(&self) -> RecordStyle {
        RecordStyle::JudgmentWithResponse
    }

    fn report_title(&self) -> &'static str {
        match self.environment {
            Environment::Standard => "咳嗽检测结果（树状思维链 ToT - 实时写入）",
            _ => "咳嗽检测结果（结构化思维链 - 实时写入）",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_phrase_decides() {
        let strategy = TreeOfThoughtsStrategy::new(Environment::Standard);
        let response = "路径 A：4分\n路径 B：2分\n路径 C：1分\n无咳嗽的可能性较低，因此判断为有咳嗽";
        assert_eq!(strategy.extract_judgment(response), Judgment::Negative);
    }

    #[test]
    fn test_verdict_without_anchor() {
        let strategy = TreeOfThoughtsStrategy::new(Environment::Quiet);
        assert_eq!(strategy.extract_judgment("综合评分：有咳嗽"), Judgment::Positive);
        assert_eq!(strategy.extract_judgment("评分均为3分"), Judgment::Unparseable);
    }

    #[test]
    fn test_report_title() {
        assert_eq!(
            TreeOfThoughtsStrategy::new(Environment::Standard).report_title(),
            "咳嗽检测结果（树状思维链 ToT - 实时写入）"
        );
    }
}
