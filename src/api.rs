use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::article::Article;
use crate::engine::ScoringHandle;
use crate::history::LeadHistory;
use crate::ingest::providers::NewsDataProvider;
use crate::ingest::types::NewsProvider;
use crate::ingest::fetch_news;
use crate::lead::{lead_score_breakdown, LeadTier, StructuredLead};
use crate::lenient::{object_list, string_field};
use crate::llm::prompt::{chat_prompt, clean_chat_response, ChatTurn};
use crate::llm::{DynLlmClient, LlmError};
use crate::notify::whatsapp::{contact_link, default_message};
use crate::notify::{format_lead_message, LeadAlert, SectorRouting, TelegramNotifier};
use crate::pipeline::{LeadPipeline, PipelineError};

pub const FRONTEND_DIR: &str = "frontend/dist";
const LLM_PROBE_PROMPT: &str = "Reply with exactly: \"Local LLM is working!\" Nothing else.";
const DEFAULT_LEADS_LIMIT: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub scoring: ScoringHandle,
    pub pipeline: LeadPipeline,
    pub news: Arc<dyn NewsProvider>,
    pub telegram: TelegramNotifier,
    pub routing: Arc<SectorRouting>,
    pub history: Arc<LeadHistory>,
}

impl AppState {
    /// Telegram and routing come from the environment; see [`AppState::with_telegram`].
    pub fn new(scoring: ScoringHandle, llm: DynLlmClient, news: Arc<dyn NewsProvider>) -> Self {
        Self {
            pipeline: LeadPipeline::new(llm, scoring.clone()),
            scoring,
            news,
            telegram: TelegramNotifier::from_env(),
            routing: Arc::new(SectorRouting::from_env()),
            history: Arc::new(LeadHistory::default()),
        }
    }

    /// Live collaborators configured from env (`NEWSDATA_API_KEY`, `LOCAL_LLM`, ...).
    pub fn from_env(scoring: ScoringHandle) -> Self {
        let llm = crate::llm::build_client_from_config(&crate::config::LlmConfig::from_env());
        Self::new(scoring, llm, Arc::new(NewsDataProvider::from_env()))
    }

    pub fn with_telegram(mut self, telegram: TelegramNotifier, routing: SectorRouting) -> Self {
        self.telegram = telegram;
        self.routing = Arc::new(routing);
        self
    }
}

/// `/api` routes only; see [`router`] for the full app.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/fetchNews", get(fetch_news_handler))
        .route("/api/filterArticles", post(filter_articles))
        .route("/api/processLead", post(process_lead))
        .route("/api/scoreLead", post(score_lead))
        .route("/api/findLeads", post(find_leads))
        .route("/api/leads", get(recent_leads))
        .route("/api/sendAlert", post(send_alert))
        .route("/api/sendAlertToSector", post(send_alert_to_sector))
        .route("/api/contactLink", post(contact))
        .route("/api/chat", post(chat))
        .route("/api/test-llm", get(test_llm))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// API plus the dashboard build, with `index.html` as the SPA fallback.
pub fn router(state: AppState) -> Router {
    let spa = ServeDir::new(FRONTEND_DIR)
        .not_found_service(ServeFile::new(format!("{FRONTEND_DIR}/index.html")));
    api_router(state).fallback_service(spa)
}

/* ----------------------------
Errors
---------------------------- */

pub struct ApiError {
    status: StatusCode,
    error: String,
    extra: Option<Value>,
}

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: msg.into(),
            extra: None,
        }
    }

    fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: msg.into(),
            extra: None,
        }
    }

    fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "success": false, "error": self.error });
        if let (Some(Value::Object(extra)), Some(obj)) = (self.extra, body.as_object_mut()) {
            obj.extend(extra);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Parse { .. } => Self::internal("Failed to parse AI response"),
            PipelineError::Llm(e) => Self::internal(e.to_string()),
        }
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

/* ----------------------------
Handlers
---------------------------- */

async fn health(State(state): State<AppState>) -> Json<Value> {
    let llm = state.pipeline.llm();
    Json(json!({
        "status": "ok",
        "message": "HPCL Lead Intelligence API is running",
        "llm": format!("{} ({})", llm.provider_name(), llm.model()),
    }))
}

#[derive(Deserialize)]
struct NewsQuery {
    #[serde(default)]
    demo: Option<String>,
}

async fn fetch_news_handler(
    State(state): State<AppState>,
    Query(q): Query<NewsQuery>,
) -> Json<Value> {
    let demo_only = q.demo.as_deref() == Some("true");
    let batch = fetch_news(state.news.as_ref(), demo_only, Utc::now()).await;
    Json(json!({
        "success": true,
        "totalResults": batch.total_results,
        "articles": batch.articles,
        "isDemo": batch.is_demo,
    }))
}

/// Accepts `{ "articles": [...] }` or a bare array.
async fn filter_articles(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let raw = match &body {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        Value::Object(_) if body.get("articles").is_some_and(Value::is_array) => {
            object_list(&body, &["articles"])
        }
        _ => return Err(ApiError::bad_request("Articles array is required")),
    };
    let articles: Vec<Article> = raw.into_iter().map(Article::from_value).collect();
    let total = articles.len();
    let engine = state.scoring.current();
    let kept = engine.filter_articles(articles, Utc::now());
    Ok(Json(json!({
        "success": true,
        "total": total,
        "kept": kept.len(),
        "minScore": engine.relevance.min_score(),
        "articles": kept,
    })))
}

async fn process_lead(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let article = match body.get("article") {
        Some(a @ Value::Object(_)) => Article::from_value(a),
        _ => return Err(ApiError::bad_request("Article is required")),
    };
    let lead = state.pipeline.process_article(&article, Utc::now()).await?;
    state.history.push(lead.clone());
    Ok(Json(json!({ "success": true, "lead": lead })))
}

/// Score a lead the client already has; no LLM involved.
async fn score_lead(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let lead = match body.get("lead") {
        Some(l @ Value::Object(_)) => StructuredLead::from_value(l),
        _ => return Err(ApiError::bad_request("Lead data is required")),
    };
    let article = body.get("article").map(Article::from_value).unwrap_or_default();
    let now = Utc::now();
    let breakdown = lead_score_breakdown(&lead, &article, now);
    let complete = state.scoring.current().complete_lead(lead, &article, now);
    state.history.push(complete.clone());
    Ok(Json(json!({ "success": true, "lead": complete, "breakdown": breakdown })))
}

async fn find_leads(State(state): State<AppState>, body: Option<Json<Value>>) -> Json<Value> {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let demo_only = body.get("demo").and_then(Value::as_bool).unwrap_or(false);
    let limit = body
        .get("limit")
        .and_then(Value::as_u64)
        .map(|n| n as usize);

    let report = state
        .pipeline
        .find_leads(state.news.as_ref(), demo_only, limit, Utc::now())
        .await;
    for lead in report.leads.iter().rev() {
        state.history.push(lead.clone());
    }
    let mut out = json!({ "success": true });
    if let (Some(obj), Ok(Value::Object(r))) = (out.as_object_mut(), serde_json::to_value(&report)) {
        obj.extend(r);
    }
    Json(out)
}

#[derive(Deserialize)]
struct LeadsQuery {
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

async fn recent_leads(State(state): State<AppState>, Query(q): Query<LeadsQuery>) -> ApiResult {
    let tier = match q.tier.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            LeadTier::parse(raw)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown tier: {raw}")))?,
        ),
    };
    let leads = state
        .history
        .recent(tier, q.limit.unwrap_or(DEFAULT_LEADS_LIMIT));
    Ok(Json(json!({ "success": true, "count": leads.len(), "leads": leads })))
}

async fn send_alert(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let lead = match body.get("lead") {
        Some(l @ Value::Object(_)) => l,
        _ => return Err(ApiError::bad_request("Lead data is required")),
    };
    let chat_id = string_field(&body, &["chatId", "chat_id"])
        .ok_or_else(|| ApiError::bad_request("Chat ID is required"))?;

    let message = format_lead_message(&LeadAlert::from_value(lead));
    let message_id = state
        .telegram
        .send_message(&chat_id, &message)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(json!({
        "success": true,
        "message": "Alert sent successfully",
        "message_id": message_id,
    })))
}

async fn send_alert_to_sector(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let lead = match body.get("lead") {
        Some(l @ Value::Object(_)) => l,
        _ => return Err(ApiError::bad_request("Lead data is required")),
    };
    let alert = LeadAlert::from_value(lead);
    let chat_ids = state.routing.chat_ids_for(&alert.sector_key());
    if chat_ids.is_empty() {
        return Err(ApiError::bad_request(format!(
            "No chat IDs configured for this sector. Add your Telegram chat ID to {}.",
            crate::notify::DEFAULT_ROUTING_PATH
        )));
    }

    let results = state
        .telegram
        .broadcast(chat_ids, &format_lead_message(&alert))
        .await;
    let sent = results.iter().filter(|r| r.success).count();
    Ok(Json(json!({
        "success": true,
        "sent": sent,
        "total": chat_ids.len(),
        "results": results,
    })))
}

/// WhatsApp click-to-chat link; message defaults to the pitch built from `lead`.
async fn contact(Json(body): Json<Value>) -> ApiResult {
    let phone = string_field(&body, &["phone", "phoneNumber"]).unwrap_or_default();
    let message = string_field(&body, &["message"]).unwrap_or_else(|| {
        let lead = body
            .get("lead")
            .map(StructuredLead::from_value)
            .unwrap_or_default();
        default_message(&lead)
    });
    let url = contact_link(&phone, &message).map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(json!({ "success": true, "url": url, "message": message })))
}

#[derive(Deserialize)]
struct ChatReq {
    #[serde(default)]
    message: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatReq>) -> ApiResult {
    if req.message.trim().is_empty() {
        return Err(ApiError::bad_request("Message required"));
    }
    let raw = state
        .pipeline
        .llm()
        .generate(&chat_prompt(&req.message, &req.history))
        .await
        .map_err(|e| ApiError::internal(format!("Failed to process chat: {e}")))?;
    Ok(Json(json!({ "success": true, "response": clean_chat_response(&raw) })))
}

async fn test_llm(State(state): State<AppState>) -> ApiResult {
    let llm = state.pipeline.llm();
    let model = llm.model().to_string();
    let status = llm.status().await;

    if !status.available || !status.model_installed {
        let instructions = if status.available {
            vec![
                format!("Run: ollama pull {model}"),
                "Then retry this endpoint".to_string(),
            ]
        } else {
            vec![
                "1. Install Ollama: https://ollama.com/download".to_string(),
                "2. Start Ollama: ollama serve".to_string(),
                format!("3. Pull model: ollama pull {model}"),
                "4. Set LOCAL_LLM=true and retry this endpoint".to_string(),
            ]
        };
        return Err(ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            error: status.error.unwrap_or_else(|| LlmError::Offline.to_string()),
            extra: None,
        }
        .with_extra(json!({
            "status": { "ollamaRunning": status.available, "modelInstalled": false },
            "instructions": instructions,
        })));
    }

    let response = llm.generate(LLM_PROBE_PROMPT).await.map_err(|e| {
        ApiError::internal(e.to_string()).with_extra(json!({
            "instructions": [
                "1. Ensure Ollama is running: ollama serve",
                format!("2. Ensure model is installed: ollama pull {model}"),
                "3. Check LOCAL_LLM=true in .env",
            ]
        }))
    })?;
    Ok(Json(json!({
        "success": true,
        "message": "Local LLM is operational",
        "status": { "ollamaRunning": true, "modelInstalled": true, "model": model },
        "provider": llm.provider_name(),
        "testResponse": response.trim(),
    })))
}
