// src/notify/mod.rs
//! Lead alert delivery: message formatting, Telegram client, sector routing,
//! WhatsApp click-to-chat links.

pub mod telegram;
pub mod whatsapp;

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::lead::{CompleteLead, ProductRecommendation, StructuredLead};
use crate::lenient::{number_field, string_field};

pub use telegram::TelegramNotifier;

pub const DEFAULT_ROUTING_PATH: &str = "config/telegram_routing.json";
pub const ENV_ROUTING_PATH: &str = "TELEGRAM_ROUTING_PATH";
const DEFAULT_SECTOR: &str = "default";

/// What an alert shows about a lead. Built from a `CompleteLead` or from
/// whatever lead JSON the dashboard posts back.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadAlert {
    pub company_name: String,
    pub sector: String,
    pub location: String,
    pub signals: Vec<String>,
    pub products: Vec<ProductRecommendation>,
    pub lead_score: u8,
    pub urgency: String,
}

impl LeadAlert {
    pub fn from_value(v: &Value) -> Self {
        let lead = StructuredLead::from_value(v);
        let location = match v.get("location") {
            Some(Value::String(s)) => s.trim().to_string(),
            _ => lead.location.label(),
        };
        Self {
            company_name: lead.company_name,
            sector: lead.industry_sector,
            location,
            signals: lead.operational_signals,
            products: lead.product_recommendations,
            lead_score: number_field(v, &["lead_score"])
                .map(|n| n.round().clamp(0.0, 100.0) as u8)
                .unwrap_or(0),
            urgency: lead
                .urgency
                .map(|u| u.as_str().to_string())
                .or_else(|| string_field(v, &["urgency"]))
                .unwrap_or_default(),
        }
    }

    /// Routing key: lowercased sector, `default` when unknown.
    pub fn sector_key(&self) -> String {
        let s = self.sector.trim().to_lowercase();
        if s.is_empty() {
            DEFAULT_SECTOR.to_string()
        } else {
            s
        }
    }
}

impl From<&CompleteLead> for LeadAlert {
    fn from(l: &CompleteLead) -> Self {
        Self {
            company_name: l.lead.company_name.clone(),
            sector: l.lead.industry_sector.clone(),
            location: l.lead.location.label(),
            signals: l.lead.operational_signals.clone(),
            products: l.lead.product_recommendations.clone(),
            lead_score: l.lead_score,
            urgency: l
                .lead
                .urgency
                .map(|u| u.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

fn esc(s: &str) -> String {
    html_escape::encode_text(s).to_string()
}

fn or_na(s: &str) -> String {
    if s.trim().is_empty() {
        "N/A".to_string()
    } else {
        esc(s)
    }
}

fn fmt_confidence(c: f64) -> String {
    if c.fract() == 0.0 {
        format!("{c:.0}")
    } else {
        format!("{c:.1}")
    }
}

/// Telegram HTML message for one lead. All lead text is escaped.
pub fn format_lead_message(alert: &LeadAlert) -> String {
    let signals = if alert.signals.is_empty() {
        "  • No signals detected".to_string()
    } else {
        alert
            .signals
            .iter()
            .map(|s| format!("  • {}", esc(s)))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let products = if alert.products.is_empty() {
        "  • Analysis pending".to_string()
    } else {
        alert
            .products
            .iter()
            .map(|p| {
                format!(
                    "  • {} ({}%)\n    {}",
                    esc(&p.product),
                    fmt_confidence(p.confidence),
                    esc(&p.reasoning)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "🚨 <b>NEW INDUSTRIAL LEAD</b>\n\n\
         🏭 <b>Company:</b> {company}\n\
         📊 <b>Sector:</b> {sector}\n\
         📍 <b>Location:</b> {location}\n\n\
         📡 <b>Signals:</b>\n{signals}\n\n\
         🛢️ <b>Recommended Products:</b>\n{products}\n\n\
         📈 <b>Lead Score:</b> {score}/100\n\
         ⚡ <b>Urgency:</b> {urgency}\n\n\
         ──────────────────\n\
         🔥 HPCL Lead Intelligence Agent",
        company = or_na(&alert.company_name),
        sector = or_na(&alert.sector),
        location = or_na(&alert.location),
        score = alert.lead_score,
        urgency = or_na(&alert.urgency),
    )
}

/// Sector → Telegram chat ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorRouting {
    routes: HashMap<String, Vec<String>>,
}

impl SectorRouting {
    pub fn new(routes: HashMap<String, Vec<String>>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(k, ids)| {
                let ids = ids
                    .into_iter()
                    .map(|i| i.trim().to_string())
                    .filter(|i| !i.is_empty())
                    .collect();
                (k.trim().to_lowercase(), ids)
            })
            .collect();
        Self { routes }
    }

    /// JSON object of arrays; ids may be strings or numbers.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<Value>> = serde_json::from_str(s)?;
        let routes = raw
            .into_iter()
            .map(|(k, ids)| {
                let ids = ids.iter().filter_map(crate::lenient::scalar_to_string).collect();
                (k, ids)
            })
            .collect();
        Ok(Self::new(routes))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading routing from {}", path.display()))?;
        Self::from_json_str(&data).with_context(|| format!("parsing routing at {}", path.display()))
    }

    /// `$TELEGRAM_ROUTING_PATH` or `config/telegram_routing.json`; a missing file
    /// means no routes.
    pub fn from_env() -> Self {
        let path = std::env::var(ENV_ROUTING_PATH).unwrap_or_else(|_| DEFAULT_ROUTING_PATH.to_string());
        if !Path::new(&path).exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = ?e, "telegram routing not loaded");
                Self::default()
            }
        }
    }

    /// Chat ids for `sector`; unknown or empty sectors use the `default` list.
    pub fn chat_ids_for(&self, sector: &str) -> &[String] {
        let key = sector.trim().to_lowercase();
        match self.routes.get(&key) {
            Some(ids) if !ids.is_empty() => ids,
            _ => self
                .routes
                .get(DEFAULT_SECTOR)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }
}
