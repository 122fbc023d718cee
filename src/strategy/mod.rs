// Prompting strategies
//
// A strategy pairs the instruction sent with each audio file with the rule
// that turns the model's free-form answer into a Judgment:
// - Direct: two-valued answer, exact match
// - ChainOfThought: acoustic criteria, substring match (positive first)
// - SelfAsk: four sub-questions, match anchored on "最终结论"
// - TreeOfThoughts: three scored hypotheses, leftmost verdict phrase
//
// Each kind is available in standard, quiet and noisy wordings.

pub mod common;
pub mod prompts;
pub mod direct;
pub mod chain_of_thought;
pub mod self_ask;
pub mod tree_of_thoughts;

pub use common::*;
use crate::config::{Environment, StrategyKind};

/// Instruction text plus judgment extraction for one prompting style
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn environment(&self) -> Environment;

    /// Text sent to the model together with the audio
    fn instruction(&self) -> &str;

    /// Map a response to a Judgment. Pure: same text, same Judgment.
    fn extract_judgment(&self, response: &str) -> Judgment;

    /// How a classified response is written to the result file
    fn record_style(&self) -> RecordStyle;

    /// Title of the result file header
    fn report_title(&self) -> &'static str {
        match self.environment() {
            Environment::Standard => "咳嗽检测结果（实时写入）",
            Environment::Quiet | Environment::Noisy => "咳嗽检测结果（结构化思维链 - 实时写入）",
        }
    }

    /// Identifier such as `self-ask` or `tot-quiet`
    fn name(&self) -> String {
        match self.environment() {
            Environment::Standard => self.kind().as_str().to_string(),
            env => format!("{}-{}", self.kind().as_str(), env.as_str()),
        }
    }

    /// Result file used when none is configured
    fn default_output_file(&self) -> String {
        format!("cough_{}.txt", self.name().replace('-', "_"))
    }
}

/// Factory for creating strategy instances
pub struct StrategyFactory;

impl StrategyFactory {
    pub fn create_strategy(kind: StrategyKind, environment: Environment) -> Box<dyn Strategy> {
        match kind {
            StrategyKind::Direct => Box::new(direct::DirectStrategy::new(environment)),
            StrategyKind::Cot => Box::new(chain_of_thought::ChainOfThoughtStrategy::new(environment)),
            StrategyKind::SelfAsk => Box::new(self_ask::SelfAskStrategy::new(environment)),
            StrategyKind::Tot => Box::new(tree_of_thoughts::TreeOfThoughtsStrategy::new(environment)),
        }
    }

    /// Every kind in every environment, in a stable order
    pub fn all() -> Vec<Box<dyn Strategy>> {
        StrategyKind::ALL
            .iter()
            .flat_map(|kind| {
                Environment::ALL
                    .iter()
                    .map(move |env| Self::create_strategy(*kind, *env))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_requested_variant() {
        let strategy = StrategyFactory::create_strategy(StrategyKind::Tot, Environment::Quiet);
        assert_eq!(strategy.kind(), StrategyKind::Tot);
        assert_eq!(strategy.environment(), Environment::Quiet);
        assert_eq!(strategy.name(), "tot-quiet");
        assert_eq!(strategy.default_output_file(), "cough_tot_quiet.txt");
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<String> = StrategyFactory::all().iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), 12);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let response = "路径 A 评分 4……综合判断：有咳嗽。最终结论：无咳嗽";
        for strategy in StrategyFactory::all() {
            let first = strategy.extract_judgment(response);
            for _ in 0..3 {
                assert_eq!(strategy.extract_judgment(response), first, "{}", strategy.name());
            }
        }
    }

    #[test]
    fn test_both_phrases_resolve_per_kind() {
        // The model quoted the question back before answering
        let response = "题目要求回答“有咳嗽”或“无咳嗽”。最终结论：无咳嗽";
        let judge = |kind| {
            StrategyFactory::create_strategy(kind, Environment::Standard).extract_judgment(response)
        };

        assert_eq!(judge(StrategyKind::Direct), Judgment::Unparseable);
        assert_eq!(judge(StrategyKind::Cot), Judgment::Positive);
        assert_eq!(judge(StrategyKind::SelfAsk), Judgment::Negative);
        assert_eq!(judge(StrategyKind::Tot), Judgment::Positive);
    }
}
