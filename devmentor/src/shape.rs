//! Response shaping: coerce raw model text into each capability's output
//! structure.
//!
//! Pass-through capabilities (explain, summarize) trim and cap the text,
//! flagging truncation instead of failing. Structured capabilities (quiz,
//! roadmap) split on numbered-item markers; malformed quiz blocks are dropped
//! and counted, and zero usable structure is a visible
//! [`GatewayError::Unparseable`], never a fabricated result.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::capability::Capability;
use crate::error::GatewayError;

/// Limits applied while shaping pass-through text.
#[derive(Debug, Clone, Copy)]
pub struct ShapeLimits {
    /// Maximum characters kept for explanation/diagnosis/summary text.
    pub max_output_chars: usize,
}

impl Default for ShapeLimits {
    fn default() -> Self {
        Self {
            max_output_chars: 8000,
        }
    }
}

/// One multiple-choice question parsed from a quiz block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// One roadmap step; order of appearance is meaningful (earlier steps are
/// prerequisites).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadmapStep {
    pub title: String,
    pub description: String,
}

/// Capability-specific structured output of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapedResult {
    Explanation { text: String, truncated: bool },
    Diagnosis {
        diagnosis: String,
        suggested_fix: Option<String>,
    },
    Summary { text: String, truncated: bool },
    Quiz {
        questions: Vec<QuizQuestion>,
        dropped: usize,
    },
    Roadmap { steps: Vec<RoadmapStep> },
}

/// Matches a numbered-item marker at the start of a line: `1.` or `2)`.
static ITEM_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\d+\s*[.)]\s*").expect("item marker regex"));

/// Matches one option line: `A)` / `b.` letters or `-` / `*` bullets.
static OPTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[A-Da-d][.)]|[-*])\s*(.+)$").expect("option line regex"));

/// Shapes raw model text for `capability`.
pub fn shape(
    capability: Capability,
    raw: &str,
    limits: &ShapeLimits,
) -> Result<ShapedResult, GatewayError> {
    match capability {
        Capability::Explain => {
            let (text, truncated) = cap_text(raw, limits.max_output_chars);
            Ok(ShapedResult::Explanation { text, truncated })
        }
        Capability::Summarize => {
            let (text, truncated) = cap_text(raw, limits.max_output_chars);
            Ok(ShapedResult::Summary { text, truncated })
        }
        Capability::Debug => Ok(shape_debug(raw, limits)),
        Capability::Quiz => shape_quiz(raw),
        Capability::Roadmap => shape_roadmap(raw),
    }
}

/// Trims and caps text at `max` characters (char boundary, not bytes).
fn cap_text(raw: &str, max: usize) -> (String, bool) {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max {
        (trimmed.to_string(), false)
    } else {
        (trimmed.chars().take(max).collect(), true)
    }
}

/// Diagnosis text with an optional fix split on the `Suggested fix:` heading
/// the debug prompt asks for.
fn shape_debug(raw: &str, limits: &ShapeLimits) -> ShapedResult {
    const FIX_HEADING: &str = "Suggested fix:";
    let trimmed = raw.trim();
    let (diagnosis_part, suggested_fix) = match trimmed.find(FIX_HEADING) {
        Some(idx) => {
            let fix = trimmed[idx + FIX_HEADING.len()..].trim();
            let fix = if fix.is_empty() {
                None
            } else {
                Some(fix.to_string())
            };
            (&trimmed[..idx], fix)
        }
        None => (trimmed, None),
    };
    let (diagnosis, _) = cap_text(diagnosis_part, limits.max_output_chars);
    ShapedResult::Diagnosis {
        diagnosis,
        suggested_fix,
    }
}

/// Splits text into numbered items, marker stripped, in order of appearance.
fn numbered_blocks(raw: &str) -> Vec<String> {
    let mut starts: Vec<usize> = ITEM_MARKER.find_iter(raw).map(|m| m.start()).collect();
    if starts.is_empty() {
        return Vec::new();
    }
    starts.push(raw.len());
    starts
        .windows(2)
        .filter_map(|pair| {
            let block = raw[pair[0]..pair[1]].trim();
            if block.is_empty() {
                None
            } else {
                Some(ITEM_MARKER.replace(block, "").into_owned())
            }
        })
        .collect()
}

fn shape_quiz(raw: &str) -> Result<ShapedResult, GatewayError> {
    let blocks = numbered_blocks(raw);
    if blocks.is_empty() {
        return Err(GatewayError::Unparseable(
            "no numbered question blocks found".to_string(),
        ));
    }
    let mut questions = Vec::new();
    let mut dropped = 0usize;
    for block in &blocks {
        match parse_quiz_block(block) {
            Some(question) => questions.push(question),
            None => dropped += 1,
        }
    }
    if questions.is_empty() {
        return Err(GatewayError::Unparseable(format!(
            "none of the {} question blocks had options and an answer",
            blocks.len()
        )));
    }
    Ok(ShapedResult::Quiz { questions, dropped })
}

/// A usable block has a question line, at least one option line, and an
/// `Answer:` line. Anything else is dropped (and counted by the caller).
fn parse_quiz_block(block: &str) -> Option<QuizQuestion> {
    let mut lines = block.lines();
    let question = lines.next()?.trim().to_string();
    if question.is_empty() {
        return None;
    }
    let mut options = Vec::new();
    let mut answer = None;
    for line in lines {
        let line = line.trim();
        if let Some(rest) = answer_text(line) {
            answer = Some(rest.to_string());
        } else if let Some(captures) = OPTION_LINE.captures(line) {
            options.push(captures[1].trim().to_string());
        }
    }
    let answer = answer?;
    if options.is_empty() {
        return None;
    }
    Some(QuizQuestion {
        question,
        options,
        answer,
    })
}

fn answer_text(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("Answer:")
        .or_else(|| line.strip_prefix("answer:"))?;
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn shape_roadmap(raw: &str) -> Result<ShapedResult, GatewayError> {
    let blocks = numbered_blocks(raw);
    if blocks.is_empty() {
        return Err(GatewayError::Unparseable(
            "no numbered steps found".to_string(),
        ));
    }
    let steps = blocks.iter().map(|block| roadmap_step(block)).collect();
    Ok(ShapedResult::Roadmap { steps })
}

/// First line is the title, with an inline description after `:` when the
/// item follows the `N. title: description` convention; remaining lines join
/// the description.
fn roadmap_step(block: &str) -> RoadmapStep {
    let mut parts = block.splitn(2, '\n');
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim();

    let (title, inline) = match first.split_once(':') {
        Some((title, description)) if !title.trim().is_empty() => {
            (title.trim().to_string(), description.trim().to_string())
        }
        _ => (first.to_string(), String::new()),
    };
    let description = match (inline.is_empty(), rest.is_empty()) {
        (true, true) => String::new(),
        (false, true) => inline,
        (true, false) => rest.to_string(),
        (false, false) => format!("{inline}\n{rest}"),
    };
    RoadmapStep { title, description }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: ShapeLimits = ShapeLimits {
        max_output_chars: 50,
    };

    #[test]
    fn explain_passes_through_trimmed_text() {
        let shaped = shape(Capability::Explain, "  short answer \n", &LIMITS).unwrap();
        assert_eq!(
            shaped,
            ShapedResult::Explanation {
                text: "short answer".to_string(),
                truncated: false,
            }
        );
    }

    #[test]
    fn explain_truncates_at_the_cap_instead_of_failing() {
        let long = "x".repeat(80);
        let shaped = shape(Capability::Explain, &long, &LIMITS).unwrap();
        match shaped {
            ShapedResult::Explanation { text, truncated } => {
                assert!(truncated);
                assert_eq!(text.chars().count(), LIMITS.max_output_chars);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(80);
        let shaped = shape(Capability::Summarize, &long, &LIMITS).unwrap();
        match shaped {
            ShapedResult::Summary { text, truncated } => {
                assert!(truncated);
                assert_eq!(text.chars().count(), 50);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn debug_splits_out_the_suggested_fix() {
        let raw = "The index is off by one.\n\nSuggested fix:\nUse `..=` instead of `..`.";
        let shaped = shape(Capability::Debug, raw, &LIMITS).unwrap();
        assert_eq!(
            shaped,
            ShapedResult::Diagnosis {
                diagnosis: "The index is off by one.".to_string(),
                suggested_fix: Some("Use `..=` instead of `..`.".to_string()),
            }
        );
    }

    #[test]
    fn debug_without_fix_heading_has_no_fix() {
        let shaped = shape(Capability::Debug, "Looks fine to me.", &LIMITS).unwrap();
        assert_eq!(
            shaped,
            ShapedResult::Diagnosis {
                diagnosis: "Looks fine to me.".to_string(),
                suggested_fix: None,
            }
        );
    }

    const QUIZ_TEXT: &str = "\
1. What does `let` do?
A) Declares a binding
B) Loops forever
Answer: A) Declares a binding

2. Which keyword makes a binding mutable?
A) const
B) mut
Answer: B) mut

3. What is the unit type?
- ()
- null
Answer: ()

4. This block has no options or answer line, just rambling text.
";

    #[test]
    fn quiz_keeps_wellformed_blocks_and_counts_dropped_ones() {
        let shaped = shape(Capability::Quiz, QUIZ_TEXT, &LIMITS).unwrap();
        match shaped {
            ShapedResult::Quiz { questions, dropped } => {
                assert_eq!(questions.len(), 3);
                assert_eq!(dropped, 1);
                assert_eq!(questions[0].question, "What does `let` do?");
                assert_eq!(questions[0].options.len(), 2);
                assert_eq!(questions[0].answer, "A) Declares a binding");
                // Bullet options are accepted too.
                assert_eq!(questions[2].options, vec!["()", "null"]);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn quiz_with_no_numbered_blocks_is_unparseable() {
        let err = shape(Capability::Quiz, "I cannot write a quiz about that.", &LIMITS)
            .unwrap_err();
        assert_eq!(err.kind(), "UnparseableResponse");
    }

    #[test]
    fn quiz_with_only_malformed_blocks_is_unparseable() {
        let err = shape(Capability::Quiz, "1. A question with nothing else\n", &LIMITS)
            .unwrap_err();
        assert_eq!(err.kind(), "UnparseableResponse");
    }

    #[test]
    fn roadmap_preserves_step_order() {
        let raw = "\
1. Learn the borrow checker: read the ownership chapter.
2. Write a CLI: small scope, real I/O.
3. Add concurrency: channels before locks.
4. Ship something: publish a crate.
";
        let shaped = shape(Capability::Roadmap, raw, &LIMITS).unwrap();
        match shaped {
            ShapedResult::Roadmap { steps } => {
                let titles: Vec<&str> = steps.iter().map(|s| s.title.as_str()).collect();
                assert_eq!(
                    titles,
                    vec![
                        "Learn the borrow checker",
                        "Write a CLI",
                        "Add concurrency",
                        "Ship something"
                    ]
                );
                assert_eq!(steps[0].description, "read the ownership chapter.");
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn roadmap_item_without_colon_uses_whole_line_as_title() {
        let shaped = shape(Capability::Roadmap, "1. Just do it\nmore detail", &LIMITS).unwrap();
        match shaped {
            ShapedResult::Roadmap { steps } => {
                assert_eq!(steps[0].title, "Just do it");
                assert_eq!(steps[0].description, "more detail");
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn roadmap_without_numbers_is_unparseable() {
        let err = shape(Capability::Roadmap, "Just keep practicing.", &LIMITS).unwrap_err();
        assert_eq!(err.kind(), "UnparseableResponse");
    }
}
