// src/lead/mod.rs
//! Lead records: the structured lead extracted by the LLM, its validated
//! internal form, and the scored/routed `CompleteLead`.

pub mod extract;
pub mod scoring;
pub mod territory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::article::Article;
use crate::lenient::{number_field, object_list, string_field, string_list, string_or_empty};

pub use crate::lead::scoring::{calculate_lead_score, lead_score_breakdown, LeadScoreBreakdown};
pub use crate::lead::territory::{Territory, TerritoryTable};

/* ----------------------------
Categorical fields
---------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntentLevel {
    Low,
    Medium,
    High,
}

impl IntentLevel {
    /// Case-insensitive; anything else is unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "Long-term")]
    LongTerm,
    #[serde(rename = "Near-term")]
    NearTerm,
    Immediate,
}

impl Urgency {
    /// Case-insensitive; `near term`, `near_term` and `near-term` are the same.
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "immediate" => Some(Self::Immediate),
            "nearterm" => Some(Self::NearTerm),
            "longterm" => Some(Self::LongTerm),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "Immediate",
            Self::NearTerm => "Near-term",
            Self::LongTerm => "Long-term",
        }
    }
}

/* ----------------------------
Structured lead
---------------------------- */

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Location {
    pub fn in_state(state: impl Into<String>) -> Self {
        Self {
            city: None,
            state: Some(state.into()),
        }
    }

    /// "City, State" with missing parts dropped.
    pub fn label(&self) -> String {
        [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    pub product: String,
    /// Clamped to [0, 100]; missing or non-numeric becomes 0.
    pub confidence: f64,
    pub reasoning: String,
}

/// A lead after boundary validation: every field populated or explicitly absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct StructuredLead {
    pub company_name: String,
    pub industry_sector: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_type: Option<String>,
    pub operational_signals: Vec<String>,
    pub product_recommendations: Vec<ProductRecommendation>,
    pub intent_level: Option<IntentLevel>,
    pub urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_details: Option<String>,
}

impl StructuredLead {
    /// Schema-with-defaults validation of raw LLM / client JSON.
    pub fn from_value(v: &Value) -> Self {
        let location = match v.get("location") {
            Some(loc @ Value::Object(_)) => Location {
                city: string_field(loc, &["city"]),
                state: string_field(loc, &["state"]),
            },
            _ => Location::default(),
        };

        let product_recommendations = object_list(v, &["product_recommendations", "recommended_products"])
            .into_iter()
            .map(|p| ProductRecommendation {
                product: string_or_empty(p, &["product"]),
                confidence: number_field(p, &["confidence"])
                    .unwrap_or(0.0)
                    .clamp(0.0, 100.0),
                reasoning: string_or_empty(p, &["reasoning", "reason"]),
            })
            .collect();

        Self {
            company_name: string_or_empty(v, &["company_name"]),
            industry_sector: string_or_empty(v, &["industry_sector", "industry"]),
            location,
            facility_type: string_field(v, &["facility_type"]),
            operational_signals: string_list(v, &["operational_signals", "signals"]),
            product_recommendations,
            intent_level: string_field(v, &["intent_level"]).and_then(|s| IntentLevel::parse(&s)),
            urgency: string_field(v, &["urgency"]).and_then(|s| Urgency::parse(&s)),
            investment_amount: string_field(v, &["investment_amount"]),
            capacity_details: string_field(v, &["capacity_details"]),
        }
    }
}

impl From<Value> for StructuredLead {
    fn from(v: Value) -> Self {
        Self::from_value(&v)
    }
}

/* ----------------------------
Complete lead
---------------------------- */

/// Provenance snapshot of the article a lead came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub title: String,
    pub url: Option<String>,
    pub date: Option<String>,
    pub source: String,
}

impl From<&Article> for SourceSnapshot {
    fn from(a: &Article) -> Self {
        Self {
            title: a.title.clone(),
            url: a.link.clone(),
            date: a.pub_date.clone(),
            source: a.source_name.clone(),
        }
    }
}

/// Dashboard buckets by lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadTier {
    Hot,
    Great,
    Medium,
    Low,
}

impl LeadTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => Self::Hot,
            60..=74 => Self::Great,
            40..=59 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hot" => Some(Self::Hot),
            "great" => Some(Self::Great),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteLead {
    #[serde(flatten)]
    pub lead: StructuredLead,
    pub lead_score: u8,
    pub tier: LeadTier,
    pub assigned_territory: Territory,
    pub source_article: SourceSnapshot,
    pub processed_at: DateTime<Utc>,
}

impl CompleteLead {
    /// Score, route and stamp a validated lead. Pure in all inputs.
    pub fn assemble(
        lead: StructuredLead,
        article: &Article,
        territories: &TerritoryTable,
        now: DateTime<Utc>,
    ) -> Self {
        let lead_score = calculate_lead_score(&lead, article, now);
        let assigned_territory = territories.assign(Some(&lead.location));
        Self {
            lead,
            lead_score,
            tier: LeadTier::from_score(lead_score),
            assigned_territory,
            source_article: SourceSnapshot::from(article),
            processed_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_fills_defaults() {
        let lead = StructuredLead::from_value(&json!({}));
        assert_eq!(lead, StructuredLead::default());

        let lead: StructuredLead = serde_json::from_value(json!(["garbage"])).unwrap();
        assert_eq!(lead.intent_level, None);
        assert!(lead.product_recommendations.is_empty());
    }

    #[test]
    fn from_value_reads_llm_shape() {
        let lead = StructuredLead::from_value(&json!({
            "company_name": "JSW Cement",
            "industry_sector": "Cement",
            "location": { "city": "Salboni", "state": "West Bengal" },
            "operational_signals": ["kiln", "boiler"],
            "product_recommendations": [
                { "product": "Furnace Oil", "confidence": "85%", "reasoning": "boiler" },
                { "product": "LSHS", "confidence": 140 },
                { "product": "HSD", "confidence": -5 }
            ],
            "intent_level": "high",
            "urgency": "Near term",
            "capacity_details": "10 MTPA"
        }));
        assert_eq!(lead.location.label(), "Salboni, West Bengal");
        assert_eq!(lead.intent_level, Some(IntentLevel::High));
        assert_eq!(lead.urgency, Some(Urgency::NearTerm));
        let conf: Vec<f64> = lead
            .product_recommendations
            .iter()
            .map(|p| p.confidence)
            .collect();
        assert_eq!(conf, vec![85.0, 100.0, 0.0]);
        assert_eq!(lead.capacity_details.as_deref(), Some("10 MTPA"));
    }

    #[test]
    fn string_location_is_treated_as_missing() {
        let lead = StructuredLead::from_value(&json!({ "location": "Mumbai" }));
        assert_eq!(lead.location, Location::default());
    }

    #[test]
    fn unknown_categories_stay_unset() {
        let lead = StructuredLead::from_value(&json!({
            "intent_level": "High/Medium/Low",
            "urgency": 3
        }));
        assert_eq!(lead.intent_level, None);
        assert_eq!(lead.urgency, None);
    }

    #[test]
    fn urgency_serializes_with_hyphen() {
        let v = serde_json::to_value(Urgency::NearTerm).unwrap();
        assert_eq!(v, json!("Near-term"));
    }

    #[test]
    fn tiers_follow_dashboard_buckets() {
        assert_eq!(LeadTier::from_score(100), LeadTier::Hot);
        assert_eq!(LeadTier::from_score(75), LeadTier::Hot);
        assert_eq!(LeadTier::from_score(74), LeadTier::Great);
        assert_eq!(LeadTier::from_score(60), LeadTier::Great);
        assert_eq!(LeadTier::from_score(59), LeadTier::Medium);
        assert_eq!(LeadTier::from_score(40), LeadTier::Medium);
        assert_eq!(LeadTier::from_score(39), LeadTier::Low);
        assert_eq!(LeadTier::parse("HOT"), Some(LeadTier::Hot));
        assert_eq!(LeadTier::parse("all"), None);
    }
}
