// tests/score_bounds.rs
//
// Randomized sweep over synthetic extractions: every record, however odd,
// must score inside 0..=100 with a verdict that follows from the score alone.

use pitchdeck_analyzer::{score, MetricsRecord, Verdict};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

const SAMPLES: usize = 2_000;

/// One scalar in any of the shapes extractors produce.
fn random_scalar(rng: &mut StdRng) -> Value {
    let x: f64 = rng.random_range(-2_000_000.0..5_000_000_000.0);
    match rng.random_range(0..8) {
        0 => Value::Null,
        1 => json!(x),
        2 => json!(x.round() as i64),
        3 => json!(format!("${:.1}k", x / 1_000.0)),
        4 => json!(format!("{:.2}M", x / 1_000_000.0)),
        5 => json!(format!("USD {}", x.round() as i64)),
        6 => json!("n/a"),
        _ => json!(rng.random_range(-50.0..150.0)),
    }
}

fn random_group(rng: &mut StdRng, keys: &[&str]) -> Value {
    match rng.random_range(0..6) {
        0 => Value::Null,
        1 => json!("garbled"),
        _ => {
            let mut m = serde_json::Map::new();
            for k in keys {
                if rng.random_bool(0.8) {
                    m.insert((*k).to_string(), random_scalar(rng));
                }
            }
            Value::Object(m)
        }
    }
}

fn random_record(rng: &mut StdRng) -> Value {
    let founders: Vec<Value> = (0..rng.random_range(0..4))
        .map(|_| {
            let pool = ["ex-Stripe", "first-time founder", "IPO", "PhD", "2 exits", ""];
            json!(pool[rng.random_range(0..pool.len())])
        })
        .collect();
    json!({
        "traction": random_group(rng, &["arr_usd", "mrr_usd", "growth_mom_pct", "churn_pct", "retention_pct"]),
        "unit_economics": random_group(rng, &["cac_usd", "ltv_usd", "gross_margin_pct", "burn_rate_usd_per_month", "runway_months"]),
        "market": random_group(rng, &["tam_usd", "sam_usd", "som_usd", "competitors_count"]),
        "team": { "founders": founders, "team_size": random_scalar(rng) }
    })
}

fn expected_verdict(score: u8) -> Verdict {
    match score {
        65..=100 => Verdict::Invest,
        50..=64 => Verdict::Defer,
        _ => Verdict::Pass,
    }
}

#[test]
fn score_is_bounded_and_verdict_follows_score() {
    let mut rng = StdRng::seed_from_u64(0x5eed_dec0);
    for _ in 0..SAMPLES {
        let doc = random_record(&mut rng);
        let record = MetricsRecord::from_value(doc.clone());
        let r = score(&record);

        assert!(r.score <= 100, "score {} out of range for {doc}", r.score);
        assert_eq!(r.verdict, expected_verdict(r.score), "doc: {doc}");
        assert!(r.reasons.len() <= 10, "at most one reason per rule");
        assert_eq!(r, score(&record), "scoring must be deterministic");
    }
}
