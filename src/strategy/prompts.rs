// Instruction texts sent alongside the audio.
//
// Every kind has a standard, quiet and noisy wording. The quiet and noisy
// wordings only change the evidentiary threshold; the requested output
// format stays the same so the kind's extraction rule still applies.

use crate::config::{Environment, StrategyKind};

pub const DIRECT_STANDARD: &str = "这个音频中是否有人在咳嗽？只需回答“有咳嗽”或“无咳嗽”。";

pub const DIRECT_QUIET: &str = "这段音频录制于**安静环境**，背景干扰极少。\
即使声音较轻微，只要具备咳嗽的爆破性气流和呼气主导特征，也应视为咳嗽。\n\
这个音频中是否有人在咳嗽？只需回答“有咳嗽”或“无咳嗽”。";

pub const DIRECT_NOISY: &str = "这段音频录制于**嘈杂环境**，背景可能存在持续的人声、风声、机械噪声等干扰。\
请仔细排查是否存在被掩盖的咳嗽信号，但不要把模糊的响动当作咳嗽。\n\
这个音频中是否有人在咳嗽？只需回答“有咳嗽”或“无咳嗽”。";

pub const COT_STANDARD: &str = "你是一个专业的音频分析助手，请直接分析输入的音频内容，并判断是否包含咳嗽声。\n\n\
咳嗽通常具有以下典型特征：\n\
- 突发性强，常表现为突然出现的短促声音，持续时间通常在0.3到1秒之间；\n\
- 音调变化明显，能量集中在中高频段，常伴有‘爆破’或‘摩擦’的音色；\n\
- 由呼气主导，能量迅速上升后快速衰减，有较强的气流感；\n\
- 通常孤立存在，不具有语音节奏和语义内容；\n\
- 请注意排除与咳嗽相似的非咳嗽声，如清嗓、打喷嚏、大笑、语言中的爆破音等。\n\n\
只有当音频中**同时具备多个典型咳嗽特征，并能清晰排除其他声音类型**时，才能判断为“有咳嗽”。\n\
若不确定，请保守判断为“无咳嗽”。\n\n\
最终，请仅输出以下两种之一：\n\
“有咳嗽” 或 “无咳嗽”。";

pub const COT_QUIET: &str = "你是一名音频分析专家，请判断这段在**安静环境**中录制的音频是否包含咳嗽声。请按以下推理步骤进行分析：\n\n\
步骤1：识别音频中是否存在突发的、响亮的声音事件；\n\
步骤2：判断这些事件是否具有咳嗽典型特征，例如爆破性气流（如“kh”、“ugh”声），并且由呼气主导；\n\
步骤3：请重点排除其他可能的非咳嗽声音，例如清嗓子（通常较轻、无爆破感）、打喷嚏（有鼻腔共鸣）、说话声、呼吸音、背景噪声等；\n\
注意：\n\
由于环境安静，背景干扰极少，只要声音具备上述多个典型特征，即使音量较小，也可判断为咳嗽。\n\
但必须确保能清晰排除其他解释。\n\n\
请最终只输出以下两种之一：\n\
“有咳嗽” 或 “无咳嗽”";

pub const COT_NOISY: &str = "你是一名音频分析专家，请判断这段在**嘈杂环境**中录制的音频是否包含咳嗽声。请按以下推理步骤进行分析：\n\n\
步骤1：区分持续的背景声（人声、风声、机械噪声等）与突发的声音事件；\n\
步骤2：判断这些突发事件是否具有咳嗽典型特征，例如爆破性气流（如“kh”、“ugh”声），并且由呼气主导；\n\
步骤3：请重点排除其他可能的非咳嗽声音，例如清嗓子、打喷嚏、说话中的爆破音、物体碰撞声等；\n\
注意：\n\
不要因为环境嘈杂就忽略微弱信号。只要多个特征共现且干扰可排除，即使声音不响亮，也可判断为咳嗽；\n\
若仅有模糊响动但无明确模式，则不能确认。\n\n\
请最终只输出以下两种之一：\n\
“有咳嗽” 或 “无咳嗽”";

const SELF_ASK_QUESTIONS: &str = "请你自己提出判断所需的关键问题，并逐一回答：\n\n\
问题1：音频中是否存在突发的、响亮的声音事件？这些声音应具有突然爆发、短时、明显响亮的特点，区别于连续的说话声、背景噪声或鸟鸣等环境音。\n\
→ 回答：是 / 否 + 简要说明\n\n\
问题2：这些声音是否呈现典型的咳嗽特征？包括：伴随爆破性气流（如“kh”、“ugh”等发声）、由呼气主导、持续时间较短并具有间歇性，区别于如清嗓、打喷嚏、笑声等其他呼吸类或喉部声音。\n\
→ 回答：是 / 否 + 简要说明\n\n\
问题3：该声音是否整体在节奏、音色、结构上与咳嗽一致？即具有周期性、间歇性（可能为1次或连续几次），同时排除掉说话声、呼吸声、机械声等非咳嗽结构的声音。\n\
→ 回答：是 / 否 + 简要说明\n\n\
问题4：该声音是否不属于其他常见声音类别（如清嗓、笑声、打喷嚏、动物叫声、环境声等），这些通常缺乏咳嗽的气流爆破、呼气主导、节奏性特征？\n\
→ 回答：是 / 否 + 简要说明\n\n";

const SELF_ASK_CLOSING: &str = "请最后输出：“最终结论：有咳嗽” 或 “最终结论：无咳嗽”，并说明简要理由。";

const TOT_PATHS: &str = "请从以下三个路径进行分析，并在每个路径中给出可信度评分（1~5分），同时写出评分依据：\n\n\
路径 A（咳嗽角度）：从“这是咳嗽”的角度出发，判断该声音是否具备以下咳嗽典型特征：\n\
- 爆破性气流（如“kh”、“ugh”样）\n\
- 呼气主导\n\
- 间歇性、短促节奏，可能1次或数次连发\n\
→ 咳嗽可信度评分（1~5）：\n\n\
路径 B（非咳嗽角度）：从“这不是咳嗽”的角度分析是否更像以下声音：清嗓（较轻、无爆破感）、说话声（语言结构）、笑声、打喷嚏（鼻腔）、动物声、背景杂音等等。\n\
→ 非咳嗽可信度评分（1~5）：\n\n\
路径 C（模糊角度）：若声音中缺乏明确特征、噪声干扰大、或介于多个类型之间，请说明不确定的原因。\n\
→ 模糊程度评分（1~5）：1表示极清晰，5表示非常模糊。\n\n\
判断标准：\n\
- 只有在咳嗽可信度高于非咳嗽和模糊评分时，才应判断为“有咳嗽”。\n\n\
- 其他情况一律判断为“无咳嗽”。\n\n";

const TOT_CLOSING: &str = "请最终只输出：“有咳嗽” 或 “无咳嗽”。可简要说明判断依据。";

/// Instruction text for `kind` framed for `environment`
pub fn instruction(kind: StrategyKind, environment: Environment) -> String {
    match (kind, environment) {
        (StrategyKind::Direct, Environment::Standard) => DIRECT_STANDARD.to_string(),
        (StrategyKind::Direct, Environment::Quiet) => DIRECT_QUIET.to_string(),
        (StrategyKind::Direct, Environment::Noisy) => DIRECT_NOISY.to_string(),
        (StrategyKind::Cot, Environment::Standard) => COT_STANDARD.to_string(),
        (StrategyKind::Cot, Environment::Quiet) => COT_QUIET.to_string(),
        (StrategyKind::Cot, Environment::Noisy) => COT_NOISY.to_string(),
        (StrategyKind::SelfAsk, env) => self_ask_instruction(env),
        (StrategyKind::Tot, env) => tot_instruction(env),
    }
}

fn self_ask_instruction(environment: Environment) -> String {
    let (opening, criteria) = match environment {
        Environment::Standard => (
            "你是一名音频识别专家，请判断以下音频是否包含咳嗽声。\n\n",
            "判断标准：若所有问题均回答“是”，才判断为“最终结论：有咳嗽”；否则判断为“最终结论：无咳嗽”。\n\n",
        ),
        Environment::Quiet => (
            "你是一名音频识别专家，请判断以下在**安静环境**中录制的音频是否包含咳嗽声。\n\n",
            "判断标准：\n\
由于环境安静，即使声音较轻微，只要多个特征共现且可排除其他解释，即可视为有效咳嗽。\n\
若所有问题均回答“是”，则判断为“最终结论：有咳嗽”；否则为“最终结论：无咳嗽”。\n\n",
        ),
        Environment::Noisy => (
            "你是一名音频识别专家，请判断以下在**嘈杂环境**中录制的音频是否包含咳嗽声。\n\n\
请注意：背景可能存在持续的人声、风声、机械噪声等干扰。请像专业听诊员一样，仔细排查是否存在被掩盖的咳嗽信号。\n\n",
            "判断原则：\n\
不要因为环境嘈杂就忽略微弱信号。只要多个特征共现且干扰可排除，即使声音不响亮，也可判断为咳嗽；\n\
若仅有模糊响动但无明确模式，则不能确认。\n\n",
        ),
    };

    format!("{}{}{}{}", opening, SELF_ASK_QUESTIONS, criteria, SELF_ASK_CLOSING)
}

fn tot_instruction(environment: Environment) -> String {
    let (setting, note) = match environment {
        Environment::Standard => ("", ""),
        Environment::Quiet => (
            "在**安静环境**中录制的",
            "由于环境安静，轻微但特征明确的声音也应视为有效证据。\n\n",
        ),
        Environment::Noisy => (
            "在**嘈杂环境**中录制的",
            "由于环境嘈杂，请先分离持续的背景声，再评估突发声音；被噪声部分掩盖但特征明确的声音也应视为有效证据。\n\n",
        ),
    };

    format!(
        "你是一名经验丰富的音频识别专家，请判断以下{}音频是否包含咳嗽声。\n\n{}{}{}",
        setting, TOT_PATHS, note, TOT_CLOSING
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_instruction_names_both_verdicts() {
        for kind in StrategyKind::ALL {
            for env in Environment::ALL {
                let text = instruction(kind, env);
                assert!(text.contains("有咳嗽"), "{:?}/{:?}", kind, env);
                assert!(text.contains("无咳嗽"), "{:?}/{:?}", kind, env);
            }
        }
    }

    #[test]
    fn test_environment_framing_is_present() {
        for kind in StrategyKind::ALL {
            assert!(instruction(kind, Environment::Quiet).contains("安静环境"));
            assert!(instruction(kind, Environment::Noisy).contains("嘈杂环境"));
            assert!(!instruction(kind, Environment::Standard).contains("环境中录制"));
        }
    }

    #[test]
    fn test_self_ask_requests_anchored_conclusion() {
        for env in Environment::ALL {
            let text = instruction(StrategyKind::SelfAsk, env);
            assert!(text.contains("问题4"));
            assert!(text.ends_with(SELF_ASK_CLOSING));
        }
    }

    #[test]
    fn test_tot_scores_three_paths() {
        let text = instruction(StrategyKind::Tot, Environment::Standard);
        assert!(text.starts_with("你是一名经验丰富的音频识别专家，请判断以下音频是否包含咳嗽声。"));
        for path in ["路径 A", "路径 B", "路径 C"] {
            assert!(text.contains(path));
        }
    }
}
