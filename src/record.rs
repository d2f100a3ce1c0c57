//! # Metrics Record
//! Structured shape of what the extractor pulls out of a pitch deck.
//!
//! Every group is optional and every field defaults to null. Decoding is lenient:
//! a group of the wrong JSON type is treated as absent, so a garbled extraction
//! still yields a record (and therefore a score) instead of an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::normalize::ScalarValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_group")]
    pub startup: Option<Startup>,
    #[serde(deserialize_with = "lenient_group")]
    pub team: Option<Team>,
    #[serde(deserialize_with = "lenient_group")]
    pub traction: Option<Traction>,
    #[serde(deserialize_with = "lenient_group")]
    pub unit_economics: Option<UnitEconomics>,
    #[serde(deserialize_with = "lenient_group")]
    pub market: Option<Market>,
    #[serde(deserialize_with = "lenient_group")]
    pub round: Option<Round>,
    #[serde(deserialize_with = "lenient_group")]
    pub risks: Option<Risks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Startup {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub website: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sector: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub subsector: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub stage: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub hq_country: Option<String>,
    pub founded_year: ScalarValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    #[serde(deserialize_with = "lenient_list")]
    pub founders: Vec<String>,
    pub team_size: ScalarValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Traction {
    pub mrr_usd: ScalarValue,
    pub arr_usd: ScalarValue,
    pub growth_mom_pct: ScalarValue,
    pub customers: ScalarValue,
    pub churn_pct: ScalarValue,
    pub retention_pct: ScalarValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitEconomics {
    pub cac_usd: ScalarValue,
    pub ltv_usd: ScalarValue,
    pub gross_margin_pct: ScalarValue,
    pub burn_rate_usd_per_month: ScalarValue,
    pub runway_months: ScalarValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Market {
    pub tam_usd: ScalarValue,
    pub sam_usd: ScalarValue,
    pub som_usd: ScalarValue,
    pub competitors_count: ScalarValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Round {
    pub seeking_usd: ScalarValue,
    pub pre_money_valuation_usd: ScalarValue,
    #[serde(deserialize_with = "lenient_list")]
    pub existing_investors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risks {
    #[serde(deserialize_with = "lenient_list")]
    pub top_3_risks: Vec<String>,
}

/// Shared empty groups handed out when a record lacks one.
static EMPTY_TEAM: Team = Team {
    founders: Vec::new(),
    team_size: ScalarValue::Null,
};
static EMPTY_TRACTION: Traction = Traction {
    mrr_usd: ScalarValue::Null,
    arr_usd: ScalarValue::Null,
    growth_mom_pct: ScalarValue::Null,
    customers: ScalarValue::Null,
    churn_pct: ScalarValue::Null,
    retention_pct: ScalarValue::Null,
};
static EMPTY_UNIT_ECONOMICS: UnitEconomics = UnitEconomics {
    cac_usd: ScalarValue::Null,
    ltv_usd: ScalarValue::Null,
    gross_margin_pct: ScalarValue::Null,
    burn_rate_usd_per_month: ScalarValue::Null,
    runway_months: ScalarValue::Null,
};
static EMPTY_MARKET: Market = Market {
    tam_usd: ScalarValue::Null,
    sam_usd: ScalarValue::Null,
    som_usd: ScalarValue::Null,
    competitors_count: ScalarValue::Null,
};

impl MetricsRecord {
    /// Decode from any JSON value. Non-objects decode as an empty record.
    pub fn from_value(v: Value) -> Self {
        match v {
            Value::Object(_) => serde_json::from_value(v).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    // Accessors below never fail: a missing group reads as an empty one.

    pub fn team(&self) -> &Team {
        self.team.as_ref().unwrap_or(&EMPTY_TEAM)
    }

    pub fn traction(&self) -> &Traction {
        self.traction.as_ref().unwrap_or(&EMPTY_TRACTION)
    }

    pub fn unit_economics(&self) -> &UnitEconomics {
        self.unit_economics
            .as_ref()
            .unwrap_or(&EMPTY_UNIT_ECONOMICS)
    }

    pub fn market(&self) -> &Market {
        self.market.as_ref().unwrap_or(&EMPTY_MARKET)
    }
}

// ------------------------------------------------------------
// Lenient field decoders
// ------------------------------------------------------------

fn lenient_group<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Object(_) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Array(items) => items.into_iter().filter_map(list_item_text).collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

fn list_item_text(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Founder entries sometimes come back as {"name": .., "bio": ..}.
        other @ (Value::Array(_) | Value::Object(_)) => Some(other.to_string()),
    }
}
