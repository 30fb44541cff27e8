// src/llm/prompt.rs
//! Prompt builders for lead extraction and the dashboard assistant.

use serde::Deserialize;

use crate::article::Article;

/// Number of trailing chat turns kept as context.
pub const CHAT_HISTORY_LIMIT: usize = 10;

const EXTRACTION_SCHEMA: &str = r#"{
  "company_name": "Full legal company name (extract from article)",
  "industry_sector": "Primary industry (Steel/Cement/Shipping/Chemical/Power/Manufacturing/Infrastructure/Automotive/etc)",
  "location": {
    "city": "City name if mentioned",
    "state": "State name (Maharashtra/Gujarat/Tamil Nadu/etc)"
  },
  "facility_type": "Type of facility (Manufacturing plant/Power plant/Port/Refinery/etc)",
  "operational_signals": ["List specific equipment/operations detected"],
  "product_recommendations": [
    {
      "product": "HPCL product name",
      "confidence": 85,
      "reasoning": "Specific reason based on signals detected"
    }
  ],
  "intent_level": "High/Medium/Low",
  "urgency": "Immediate/Near-term/Long-term",
  "investment_amount": "If mentioned (e.g., Rs 500 crore)",
  "capacity_details": "Production capacity if mentioned"
}"#;

const PRODUCT_PORTFOLIO: &str = "\
1. Furnace Oil (FO) - Heavy fuel for boilers/furnaces
2. High Speed Diesel (HSD) - For gensets, vehicles
3. Light Diesel Oil (LDO) - For furnace start-up
4. LSHS - Low sulphur alternative to FO
5. Bitumen - Road construction, paving
6. Marine Bunker Fuels - Vessel fuel for shipping
7. Hexane - Solvent extraction
8. MTO - Paint/varnish industry
9. JBO - Jute textile processing";

const SIGNAL_RULES: &str = "\
- \"boiler\" OR \"furnace\" -> Furnace Oil, LSHS
- \"genset\" OR \"captive power\" -> HSD, LDO
- \"shipping\" OR \"port\" -> Marine Bunker Fuels
- \"road\" OR \"highway\" -> Bitumen
- \"automotive plant\" -> HSD, LDO";

const CHAT_SYSTEM: &str = "\
You are an AI assistant for HPCL Lead Intelligence Dashboard.
You help users understand B2B leads, HPCL products, and sales strategies.

HPCL Products: Furnace Oil, HSD, LDO, LSHS, Bitumen, Marine Bunker Fuels, Hexane, MTO, JBO.

Be concise, professional, and helpful. Keep responses short (2-3 sentences max).";

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

/// Prompt asking the model for one JSON object describing the lead in `article`.
pub fn extraction_prompt(article: &Article) -> String {
    format!(
        "You are a B2B lead intelligence analyst for HPCL (Hindustan Petroleum Corporation Limited).\n\n\
         Analyze this industrial news article and extract lead information.\n\n\
         ARTICLE:\n\
         Title: {title}\n\
         Description: {description}\n\
         Date: {date}\n\
         Source: {source}\n\n\
         TASK: Extract structured lead data as JSON with these exact fields:\n\n\
         {EXTRACTION_SCHEMA}\n\n\
         HPCL PRODUCT PORTFOLIO:\n{PRODUCT_PORTFOLIO}\n\n\
         SIGNAL-TO-PRODUCT RULES:\n{SIGNAL_RULES}\n\n\
         Return ONLY valid JSON, no markdown, no explanations.",
        title = or_na(&article.title),
        description = or_na(&article.description),
        date = or_na(article.pub_date.as_deref().unwrap_or_default()),
        source = or_na(&article.source_name),
    )
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatTurn {
    fn speaker(&self) -> &'static str {
        if self.role == "user" {
            "User"
        } else {
            "Assistant"
        }
    }
}

/// Conversation prompt: system text, the last [`CHAT_HISTORY_LIMIT`] turns, then `message`.
pub fn chat_prompt(message: &str, history: &[ChatTurn]) -> String {
    let start = history.len().saturating_sub(CHAT_HISTORY_LIMIT);
    let context = history[start..]
        .iter()
        .map(|t| format!("{}: {}", t.speaker(), t.content))
        .collect::<Vec<_>>()
        .join("\n");

    if context.is_empty() {
        format!("{CHAT_SYSTEM}\n\nUser: {message}\n\nAssistant:")
    } else {
        format!("{CHAT_SYSTEM}\n\nConversation so far:\n{context}\n\nUser: {message}\n\nAssistant:")
    }
}

/// Trim the reply and drop anything from a hallucinated next "User:" turn on.
pub fn clean_chat_response(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.find("\nUser:") {
        Some(idx) if idx > 0 => trimmed[..idx].trim().to_string(),
        _ => trimmed.to_string(),
    }
}
