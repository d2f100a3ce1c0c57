//! # Scoring Engine
//! Pure, testable logic that maps a `MetricsRecord` → `ScoreResult`.
//! No I/O, no shared state; safe to call from any number of tasks at once.
//!
//! Policy: start from a baseline of 50, let each rule in [`RULES`] contribute an
//! optional `(delta, reason)`, then clamp to 0..=100 and classify. Deltas are
//! additive so the final score does not depend on order, but `reasons` follow
//! the rule order exactly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::decision::ScoreResult;
use crate::record::MetricsRecord;

/// Starting score before any rule fires.
pub const BASELINE: i32 = 50;

/// Founder background markers: prior exits, acquisitions, unicorns, big-tech alumni, IPOs.
static FOUNDER_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)acqui|\b(?:exit|unicorn|ex-|faang|ipo)\b").expect("founder signal regex")
});

/// The numeric view of a record the rules operate on. Every field is already
/// normalized; `None` means absent, null or unparseable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signals {
    pub arr: Option<f64>,
    pub mrr: Option<f64>,
    pub growth_mom: Option<f64>,
    pub churn: Option<f64>,
    pub retention: Option<f64>,
    pub cac: Option<f64>,
    pub ltv: Option<f64>,
    pub gross_margin: Option<f64>,
    pub burn: Option<f64>,
    pub runway: Option<f64>,
    pub tam: Option<f64>,
    pub team_size: Option<f64>,
    pub founders: Vec<String>,
}

impl Signals {
    pub fn from_record(record: &MetricsRecord) -> Self {
        let tr = record.traction();
        let ue = record.unit_economics();
        let mkt = record.market();
        let team = record.team();

        Self {
            arr: tr.arr_usd.as_f64(),
            mrr: tr.mrr_usd.as_f64(),
            growth_mom: tr.growth_mom_pct.as_f64(),
            churn: tr.churn_pct.as_f64(),
            retention: tr.retention_pct.as_f64(),
            cac: ue.cac_usd.as_f64(),
            ltv: ue.ltv_usd.as_f64(),
            gross_margin: ue.gross_margin_pct.as_f64(),
            burn: ue.burn_rate_usd_per_month.as_f64(),
            runway: ue.runway_months.as_f64(),
            tam: mkt.tam_usd.as_f64(),
            team_size: team.team_size.as_f64(),
            founders: team.founders.clone(),
        }
    }
}

/// A single rule's contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    pub delta: i32,
    pub reason: String,
}

impl Adjustment {
    fn new(delta: i32, reason: impl Into<String>) -> Option<Self> {
        Some(Self {
            delta,
            reason: reason.into(),
        })
    }
}

/// A named, independent scoring rule.
pub struct Rule {
    pub name: &'static str,
    eval: fn(&Signals) -> Option<Adjustment>,
}

impl Rule {
    pub fn evaluate(&self, signals: &Signals) -> Option<Adjustment> {
        (self.eval)(signals)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Evaluation order. `reasons` in the result follow this sequence.
pub static RULES: [Rule; 10] = [
    Rule {
        name: "revenue_scale",
        eval: revenue_scale,
    },
    Rule {
        name: "growth",
        eval: growth,
    },
    Rule {
        name: "churn",
        eval: churn,
    },
    Rule {
        name: "retention",
        eval: retention,
    },
    Rule {
        name: "unit_economics",
        eval: unit_economics,
    },
    Rule {
        name: "gross_margin",
        eval: gross_margin,
    },
    Rule {
        name: "burn_runway",
        eval: burn_runway,
    },
    Rule {
        name: "market_size",
        eval: market_size,
    },
    Rule {
        name: "team_size",
        eval: team_size,
    },
    Rule {
        name: "founder_signal",
        eval: founder_signal,
    },
];

/// What one rule did during an evaluation (for `/debug/trace` and tests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub fired: bool,
    pub delta: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Score a record.
pub fn score(record: &MetricsRecord) -> ScoreResult {
    score_signals(&Signals::from_record(record))
}

/// Score already-normalized signals.
pub fn score_signals(signals: &Signals) -> ScoreResult {
    let mut total = BASELINE;
    let mut reasons = Vec::new();
    for adj in RULES.iter().filter_map(|r| r.evaluate(signals)) {
        total += adj.delta;
        reasons.push(adj.reason);
    }
    ScoreResult::from_raw(total, reasons)
}

/// Per-rule outcomes in evaluation order, including rules that did not fire.
pub fn trace(record: &MetricsRecord) -> Vec<RuleOutcome> {
    let signals = Signals::from_record(record);
    RULES
        .iter()
        .map(|rule| match rule.evaluate(&signals) {
            Some(adj) => RuleOutcome {
                rule: rule.name,
                fired: true,
                delta: adj.delta,
                reason: Some(adj.reason),
            },
            None => RuleOutcome {
                rule: rule.name,
                fired: false,
                delta: 0,
                reason: None,
            },
        })
        .collect()
}

/// Result together with the per-rule trace that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub result: ScoreResult,
    pub outcomes: Vec<RuleOutcome>,
}

pub fn evaluate(record: &MetricsRecord) -> Evaluation {
    let outcomes = trace(record);
    let total = BASELINE + outcomes.iter().map(|o| o.delta).sum::<i32>();
    let reasons = outcomes.iter().filter_map(|o| o.reason.clone()).collect();
    Evaluation {
        result: ScoreResult::from_raw(total, reasons),
        outcomes,
    }
}

/// Rule names in evaluation order.
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|r| r.name).collect()
}

// ------------------------------------------------------------
// Rules
// ------------------------------------------------------------

fn revenue_scale(s: &Signals) -> Option<Adjustment> {
    // ARR wins outright when present; MRR is only a fallback.
    if let Some(arr) = s.arr {
        return if arr >= 1_000_000.0 {
            Adjustment::new(20, format!("Strong ARR ${}.", usd(arr)))
        } else if arr >= 250_000.0 {
            Adjustment::new(10, format!("Decent ARR ${}.", usd(arr)))
        } else {
            Adjustment::new(-6, "Low ARR.")
        };
    }
    let mrr = s.mrr?;
    if mrr >= 80_000.0 {
        Adjustment::new(12, format!("Solid MRR ${}/mo.", usd(mrr)))
    } else if mrr >= 20_000.0 {
        Adjustment::new(6, "OK MRR.")
    } else {
        Adjustment::new(-5, "Low MRR.")
    }
}

fn growth(s: &Signals) -> Option<Adjustment> {
    let mom = s.growth_mom?;
    if mom >= 15.0 {
        Adjustment::new(12, format!("Healthy growth {mom}% MoM."))
    } else if mom >= 5.0 {
        Adjustment::new(6, "Moderate growth.")
    } else if mom < 0.0 {
        Adjustment::new(-12, "Negative growth.")
    } else {
        Adjustment::new(-3, "Low growth.")
    }
}

fn churn(s: &Signals) -> Option<Adjustment> {
    let churn = s.churn.filter(|c| *c > 6.0)?;
    Adjustment::new(-8, format!("High churn {churn}%."))
}

fn retention(s: &Signals) -> Option<Adjustment> {
    let ret = s.retention?;
    if ret >= 85.0 {
        Adjustment::new(4, format!("Good retention {ret}%."))
    } else if ret < 70.0 {
        Adjustment::new(-6, format!("Weak retention {ret}%."))
    } else {
        None
    }
}

fn unit_economics(s: &Signals) -> Option<Adjustment> {
    let (ltv, cac) = (s.ltv?, s.cac?);
    if cac <= 0.0 {
        return None;
    }
    let ratio = ltv / cac;
    if ratio >= 3.0 {
        Adjustment::new(15, format!("Efficient LTV/CAC {ratio:.1}."))
    } else if ratio >= 2.0 {
        Adjustment::new(7, format!("Acceptable LTV/CAC {ratio:.1}."))
    } else {
        Adjustment::new(-10, format!("Poor LTV/CAC {ratio:.1}."))
    }
}

fn gross_margin(s: &Signals) -> Option<Adjustment> {
    let gm = s.gross_margin?;
    if gm >= 70.0 {
        Adjustment::new(4, "High gross margin.")
    } else if gm < 40.0 {
        Adjustment::new(-5, "Low gross margin.")
    } else {
        None
    }
}

fn burn_runway(s: &Signals) -> Option<Adjustment> {
    let (burn, runway) = (s.burn?, s.runway?);
    if runway < 6.0 && burn > 0.0 {
        Adjustment::new(-8, "Short runway (<6 months).")
    } else if runway >= 12.0 {
        Adjustment::new(4, "Comfortable runway (>=12 months).")
    } else {
        None
    }
}

fn market_size(s: &Signals) -> Option<Adjustment> {
    s.tam.filter(|t| *t >= 1_000_000_000.0)?;
    Adjustment::new(5, "Large TAM (>=$1B).")
}

fn team_size(s: &Signals) -> Option<Adjustment> {
    s.team_size.filter(|n| *n >= 8.0)?;
    Adjustment::new(3, "Adequate team size.")
}

fn founder_signal(s: &Signals) -> Option<Adjustment> {
    if s.founders.iter().any(|f| FOUNDER_SIGNAL.is_match(f)) {
        Adjustment::new(6, "Founder signals (exits/top-tier).")
    } else {
        None
    }
}

/// Whole dollars with thousands separators, e.g. `1500000.9` → `1,500,000`.
fn usd(x: f64) -> String {
    // Formatting the float keeps amounts past i64::MAX exact instead of saturating.
    let whole = format!("{:.0}", x.trunc());
    let (negative, digits) = match whole.strip_prefix('-') {
        Some(rest) => (rest != "0", rest),
        None => (false, whole.as_str()),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
