// src/notify/whatsapp.rs
//! WhatsApp click-to-chat links for contacting a lead.

use reqwest::Url;
use thiserror::Error;

use crate::lead::StructuredLead;

const CLICK_TO_CHAT: &str = "https://api.whatsapp.com/send";
const COUNTRY_PREFIX: &str = "91";
const LOCAL_DIGITS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please enter a phone number")]
    MissingPhone,
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,
}

/// Keep digits only; a bare 10-digit number gets the India country code.
pub fn normalize_phone(raw: &str) -> Result<String, ContactError> {
    if raw.trim().is_empty() {
        return Err(ContactError::MissingPhone);
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < LOCAL_DIGITS {
        return Err(ContactError::InvalidPhone);
    }
    if digits.len() == LOCAL_DIGITS {
        Ok(format!("{COUNTRY_PREFIX}{digits}"))
    } else {
        Ok(digits)
    }
}

pub fn contact_link(phone: &str, message: &str) -> Result<String, ContactError> {
    let phone = normalize_phone(phone)?;
    let url = Url::parse_with_params(CLICK_TO_CHAT, &[("phone", phone.as_str()), ("text", message)])
        .map_err(|_| ContactError::InvalidPhone)?;
    Ok(url.to_string())
}

/// Opening line suggested to the sales officer.
pub fn default_message(lead: &StructuredLead) -> String {
    let company = if lead.company_name.is_empty() {
        "Unknown Company"
    } else {
        lead.company_name.as_str()
    };
    let intent = lead.intent_level.map(|i| i.as_str()).unwrap_or("high");
    let product = lead
        .product_recommendations
        .first()
        .map(|p| p.product.as_str())
        .filter(|p| !p.is_empty())
        .unwrap_or("fuel");
    format!(
        "Hi, I saw that {company} is {}ly looking for {product}. We at HPCL can help.",
        intent.to_lowercase()
    )
}
