//! Model output recovery: turn the text an AI extractor returned into a
//! `MetricsRecord` and score it.
//!
//! Extractors are asked for exactly one JSON object but regularly wrap it in
//! Markdown fences, leave trailing commas, or add a sentence before/after.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decision::ScoreResult;
use crate::engine;
use crate::record::MetricsRecord;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^```(?:json)?\s*|\s*```$").expect("code fence regex"));
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("trailing comma regex"));

/// Extracted record plus the decision made on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub extracted: MetricsRecord,
    pub decision: ScoreResult,
}

/// Parse extractor output into JSON, repairing the usual wrapping on the way.
pub fn parse_model_output(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("model output is empty"));
    }
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        return Ok(v);
    }

    let unfenced = CODE_FENCE.replace_all(trimmed, "");
    let repaired = TRAILING_COMMA.replace_all(&unfenced, "$1");

    let (start, end) = match (repaired.find('{'), repaired.rfind('}')) {
        (Some(s), Some(e)) if s < e => (s, e),
        _ => return Err(anyhow!("no JSON object found in model output")),
    };

    serde_json::from_str(&repaired[start..=end]).context("parsing repaired model output")
}

/// Parse, decode leniently, and score.
pub fn analyze_text(text: &str) -> Result<Analysis> {
    let value = parse_model_output(text)?;
    Ok(analyze_value(value))
}

/// Decode and score an already parsed document. Never fails.
pub fn analyze_value(value: Value) -> Analysis {
    let extracted = MetricsRecord::from_value(value);
    let decision = engine::score(&extracted);
    Analysis {
        extracted,
        decision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Verdict;
    use serde_json::json;

    #[test]
    fn plain_json_passes_straight_through() {
        let v = parse_model_output(r#"{"traction": {"arr_usd": 1200000}}"#).unwrap();
        assert_eq!(v["traction"]["arr_usd"], json!(1200000));
    }

    #[test]
    fn fenced_output_with_trailing_commas() {
        let text = "```json\n{\n  \"team\": {\"founders\": [\"A\", \"B\",], \"team_size\": 9,},\n}\n```";
        let v = parse_model_output(text).unwrap();
        assert_eq!(v["team"]["founders"], json!(["A", "B"]));
        assert_eq!(v["team"]["team_size"], json!(9));
    }

    #[test]
    fn chatter_around_the_object_is_dropped() {
        let text = "Here is the extraction you asked for:\n{\"summary\": \"ok\"}\nLet me know!";
        let v = parse_model_output(text).unwrap();
        assert_eq!(v, json!({"summary": "ok"}));
    }

    #[test]
    fn no_object_is_an_error() {
        assert!(parse_model_output("").is_err());
        assert!(parse_model_output("   ").is_err());
        assert!(parse_model_output("sorry, I cannot read this deck").is_err());
        assert!(parse_model_output("} backwards {").is_err());
        assert!(parse_model_output("{ definitely not json }").is_err());
    }

    #[test]
    fn analyze_scores_the_extracted_record() {
        let a = analyze_text(
            r#"```json
            {"traction": {"mrr_usd": "$90k", "growth_mom_pct": "8"}}
            ```"#,
        )
        .unwrap();
        assert_eq!(a.decision.score, 50 + 12 + 6);
        assert_eq!(a.decision.verdict, Verdict::Invest);
        assert_eq!(
            a.decision.reasons,
            vec!["Solid MRR $90,000/mo.", "Moderate growth."]
        );
    }

    #[test]
    fn top_level_array_still_scores_at_baseline() {
        let a = analyze_text("[1, 2, 3]").unwrap();
        assert_eq!(a.extracted, MetricsRecord::default());
        assert_eq!(a.decision.score, 50);
    }
}
