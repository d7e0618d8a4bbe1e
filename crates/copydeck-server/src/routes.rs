//! HTTP routes
//!
//! - `GET|POST /api/config[?type=comments]`: whole-document blob store
//! - `POST /api/chat`: knowledge-base answer
//! - `POST /api/generate-sample`: sample knowledge-base document
//! - `POST /api/tts`: base64 MP3 for a short text
//! - `GET /blobs/{name}`: public view of stored blobs
//!
//! Handlers accept every method and answer 405 themselves, so a wrong method
//! gets the JSON error body instead of a bare rejection. Request bodies above
//! [`MAX_BODY_BYTES`] are refused with 413.

use crate::error::{ServerError, ServerResult};
use crate::prompts::{self, EMPTY_ANSWER_FALLBACK, EMPTY_SAMPLE_FALLBACK};
use crate::state::AppState;
use crate::tts::truncate_chars;
use base64::Engine as _;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use copydeck_core::DocumentKind;
use futures::{pin_mut, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::convert::Infallible;
use warp::http::{Method, StatusCode};
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

/// Largest accepted request body
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug)]
struct BodyTooLarge;

impl warp::reject::Reject for BodyTooLarge {}

#[derive(Debug)]
struct BodyUnreadable;

impl warp::reject::Reject for BodyUnreadable {}

/// Query of the config endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ConfigQuery {
    /// `comments` selects the comments document
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    query: Option<String>,
    custom_knowledge: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SampleRequest {
    topic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TtsRequest {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct TextReply {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioReply {
    audio_content: String,
}

/// All routes, with JSON 404 for unknown paths
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let config = warp::path!("api" / "config")
        .and(warp::method())
        .and(warp::query::<ConfigQuery>())
        .and(limited_body())
        .and(with_state(state.clone()))
        .then(|method, query, body, state: AppState| async move {
            respond(handle_config(method, query, body, &state).await)
        });

    let chat = warp::path!("api" / "chat")
        .and(warp::method())
        .and(limited_body())
        .and(with_state(state.clone()))
        .then(|method, body, state: AppState| async move {
            respond(handle_chat(method, body, &state).await)
        });

    let sample = warp::path!("api" / "generate-sample")
        .and(warp::method())
        .and(limited_body())
        .and(with_state(state.clone()))
        .then(|method, body, state: AppState| async move {
            respond(handle_generate_sample(method, body, &state).await)
        });

    let tts = warp::path!("api" / "tts")
        .and(warp::method())
        .and(limited_body())
        .and(with_state(state.clone()))
        .then(|method, body, state: AppState| async move {
            respond(handle_tts(method, body, &state).await)
        });

    let blobs = warp::path!("blobs" / String)
        .and(warp::get())
        .and(with_state(state))
        .then(|name: String, state: AppState| async move { serve_blob(&name, &state).await });

    config
        .or(chat)
        .unify()
        .or(sample)
        .unify()
        .or(tts)
        .unify()
        .or(blobs)
        .unify()
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// Request body, capped at [`MAX_BODY_BYTES`] whether or not a length is declared
fn limited_body() -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and(warp::body::stream())
        .and_then(collect_limited)
}

async fn collect_limited<S, B>(declared: Option<u64>, stream: S) -> Result<Bytes, Rejection>
where
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    if declared.is_some_and(|len| len > MAX_BODY_BYTES) {
        return Err(warp::reject::custom(BodyTooLarge));
    }
    pin_mut!(stream);
    let mut body = BytesMut::new();
    loop {
        let chunk = match stream.try_next().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => return Ok(body.freeze()),
            Err(e) => {
                tracing::debug!("failed to read request body: {}", e);
                return Err(warp::reject::custom(BodyUnreadable));
            }
        };
        let len = u64::try_from(body.len() + chunk.remaining()).unwrap_or(u64::MAX);
        if len > MAX_BODY_BYTES {
            return Err(warp::reject::custom(BodyTooLarge));
        }
        body.put(chunk);
    }
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Turn a handler outcome into a JSON response
fn respond<T: Serialize>(result: ServerResult<T>) -> Response {
    match result {
        Ok(body) => warp::reply::json(&body).into_response(),
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!("request failed: {}", e);
            } else {
                tracing::debug!("request rejected: {}", e);
            }
            warp::reply::with_status(warp::reply::json(&e.body()), status).into_response()
        }
    }
}

fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> ServerResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ServerError::InvalidBody(e.to_string()))
}

fn require_post(method: &Method) -> ServerResult<()> {
    if *method == Method::POST {
        Ok(())
    } else {
        Err(ServerError::MethodNotAllowed)
    }
}

async fn handle_config(
    method: Method,
    query: ConfigQuery,
    body: Bytes,
    state: &AppState,
) -> ServerResult<Value> {
    let kind = DocumentKind::from_query(query.kind.as_deref());
    if method == Method::GET {
        let stored = state.blobs().get(kind.blob_name()).await?;
        return Ok(stored.unwrap_or_else(|| kind.empty_payload()));
    }
    if method != Method::POST {
        return Err(ServerError::MethodNotAllowed);
    }

    let document: Value =
        serde_json::from_slice(&body).map_err(|e| ServerError::InvalidBody(e.to_string()))?;
    let url = state.blobs().put(kind.blob_name(), &document).await?;
    tracing::info!("saved {} to {}", kind, url);
    Ok(json!({ "success": true, "url": url }))
}

async fn handle_chat(method: Method, body: Bytes, state: &AppState) -> ServerResult<TextReply> {
    require_post(&method)?;
    let llm = state.llm()?;
    let request: ChatRequest = parse_body(&body)?;
    let query = request
        .query
        .filter(|q| !q.is_empty())
        .ok_or(ServerError::MissingParameter("query"))?;

    let prompt = prompts::chat_prompt(&query, request.custom_knowledge.as_deref());
    let answer = llm
        .complete(&prompt, state.llm_config().chat_temperature)
        .await
        .map_err(ServerError::Llm)?;

    Ok(TextReply {
        text: answer.unwrap_or_else(|| EMPTY_ANSWER_FALLBACK.to_owned()),
    })
}

async fn handle_generate_sample(
    method: Method,
    body: Bytes,
    state: &AppState,
) -> ServerResult<TextReply> {
    require_post(&method)?;
    let llm = state.llm()?;
    let request: SampleRequest = parse_body(&body)?;
    let topic = request
        .topic
        .filter(|t| !t.trim().is_empty())
        .ok_or(ServerError::MissingParameter("topic"))?;

    let prompt = prompts::sample_prompt(&topic);
    let answer = llm
        .complete(&prompt, state.llm_config().sample_temperature)
        .await
        .map_err(ServerError::Llm)?;

    let text = answer.unwrap_or_else(|| EMPTY_SAMPLE_FALLBACK.to_owned());
    Ok(TextReply {
        text: text.trim().to_owned(),
    })
}

async fn handle_tts(method: Method, body: Bytes, state: &AppState) -> ServerResult<AudioReply> {
    require_post(&method)?;
    let request: TtsRequest = parse_body(&body)?;
    let text = request
        .text
        .filter(|t| !t.is_empty())
        .ok_or(ServerError::MissingParameter("text"))?;

    let config = state.tts_config();
    let spoken = truncate_chars(&text, config.max_chars);
    let audio = state
        .tts()
        .synthesize(spoken, &config.lang)
        .await
        .map_err(ServerError::Tts)?;

    Ok(AudioReply {
        audio_content: base64::engine::general_purpose::STANDARD.encode(audio),
    })
}

async fn serve_blob(name: &str, state: &AppState) -> Response {
    match state.blobs().get(name).await {
        Ok(Some(document)) => warp::reply::json(&document).into_response(),
        Ok(None) => not_found(),
        Err(e) => respond::<Value>(Err(e.into())),
    }
}

fn not_found() -> Response {
    warp::reply::with_status(
        warp::reply::json(&json!({"error": "Not found"})),
        StatusCode::NOT_FOUND,
    )
    .into_response()
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    if rejection.is_not_found() {
        return Ok(not_found());
    }
    if rejection.find::<BodyTooLarge>().is_some() {
        return Ok(warp::reply::with_status(
            warp::reply::json(&json!({"error": "Request body too large"})),
            StatusCode::PAYLOAD_TOO_LARGE,
        )
        .into_response());
    }
    tracing::warn!("unhandled rejection: {:?}", rejection);
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({"error": "Bad Request"})),
        StatusCode::BAD_REQUEST,
    )
    .into_response())
}
