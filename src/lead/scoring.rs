//! Lead priority score in [0, 100].
//!
//! Four independently capped components:
//! - intent (30):     High 30, Medium 20, Low 10, unset 10
//! - products (30):   mean recommendation confidence * 30 / 100, 0 with no recommendations
//! - urgency (20):    Immediate 20, Near-term 15, Long-term 8, unset 8
//! - freshness (20):  article age <=1 day 20, <=3 15, <=7 10, older or unparseable 5, no date 10
//!
//! The rounded sum is clamped to 100.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{IntentLevel, StructuredLead, Urgency};
use crate::article::Article;
use crate::freshness::{self, Age};

const PRODUCT_CAP: f64 = 30.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LeadScoreBreakdown {
    pub intent: u8,
    pub product_confidence: f64,
    pub urgency: u8,
    pub freshness: u8,
}

impl LeadScoreBreakdown {
    pub fn total(&self) -> u8 {
        let sum = self.intent as f64
            + self.product_confidence
            + self.urgency as f64
            + self.freshness as f64;
        sum.round().clamp(0.0, 100.0) as u8
    }
}

pub fn intent_points(intent: Option<IntentLevel>) -> u8 {
    match intent {
        Some(IntentLevel::High) => 30,
        Some(IntentLevel::Medium) => 20,
        Some(IntentLevel::Low) | None => 10,
    }
}

pub fn urgency_points(urgency: Option<Urgency>) -> u8 {
    match urgency {
        Some(Urgency::Immediate) => 20,
        Some(Urgency::NearTerm) => 15,
        Some(Urgency::LongTerm) | None => 8,
    }
}

fn product_points(lead: &StructuredLead) -> f64 {
    let recs = &lead.product_recommendations;
    if recs.is_empty() {
        return 0.0;
    }
    let mean = recs
        .iter()
        .map(|p| p.confidence.clamp(0.0, 100.0))
        .sum::<f64>()
        / recs.len() as f64;
    mean / 100.0 * PRODUCT_CAP
}

fn freshness_points(age: Age) -> u8 {
    match age {
        Age::Missing => 10,
        Age::Days(d) if d <= 1.0 => 20,
        Age::Days(d) if d <= 3.0 => 15,
        Age::Days(d) if d <= 7.0 => 10,
        Age::Days(_) | Age::Unparseable => 5,
    }
}

pub fn lead_score_breakdown(
    lead: &StructuredLead,
    article: &Article,
    now: DateTime<Utc>,
) -> LeadScoreBreakdown {
    LeadScoreBreakdown {
        intent: intent_points(lead.intent_level),
        product_confidence: product_points(lead),
        urgency: urgency_points(lead.urgency),
        freshness: freshness_points(freshness::age(article.pub_date.as_deref(), now)),
    }
}

pub fn calculate_lead_score(lead: &StructuredLead, article: &Article, now: DateTime<Utc>) -> u8 {
    lead_score_breakdown(lead, article, now).total()
}
