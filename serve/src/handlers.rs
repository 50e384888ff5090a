//! Route handlers: deserialize the body, run the pipeline, serialize the
//! capability's response shape or a structured error.
//!
//! Error bodies are always `{ "error": { "kind", "message" } }` with the
//! status mapped from the stable error kind; no failure path falls through
//! to a bare status.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use devmentor::{Capability, GatewayError, QuizQuestion, RoadmapStep, ShapedResult};

use crate::app::AppState;

pub async fn explain(state: State<AppState>, payload: Payload) -> Response {
    dispatch(state, Capability::Explain, payload).await
}

pub async fn debug(state: State<AppState>, payload: Payload) -> Response {
    dispatch(state, Capability::Debug, payload).await
}

pub async fn summarize(state: State<AppState>, payload: Payload) -> Response {
    dispatch(state, Capability::Summarize, payload).await
}

pub async fn quiz(state: State<AppState>, payload: Payload) -> Response {
    dispatch(state, Capability::Quiz, payload).await
}

pub async fn roadmap(state: State<AppState>, payload: Payload) -> Response {
    dispatch(state, Capability::Roadmap, payload).await
}

/// JSON 404 for unmatched routes when no static dir is configured.
pub async fn not_found() -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            kind: "NotFound",
            message: "route not found".to_string(),
        },
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Body extraction result; a rejection (bad JSON, wrong content type) is
/// mapped to our own `InvalidRequest` shape instead of axum's default text.
type Payload = Result<Json<Value>, JsonRejection>;

async fn dispatch(
    State(state): State<AppState>,
    capability: Capability,
    payload: Payload,
) -> Response {
    let body = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            return error_response(&GatewayError::InvalidRequest {
                field: "body",
                reason: rejection.body_text(),
            })
        }
    };
    let Some(fields) = body.as_object() else {
        return error_response(&GatewayError::InvalidRequest {
            field: "body",
            reason: "expected a JSON object".to_string(),
        });
    };

    match state.gateway.handle(capability, fields).await {
        Ok(result) => shaped_response(result),
        Err(err) => error_response(&err),
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    kind: &'static str,
    message: String,
}

impl From<&GatewayError> for ErrorBody {
    fn from(err: &GatewayError) -> Self {
        ErrorBody {
            error: ErrorDetail {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

fn status_for(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::InvalidRequest { .. } | GatewayError::Unparseable(_) => {
            StatusCode::BAD_REQUEST
        }
        GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        GatewayError::Auth => StatusCode::UNAUTHORIZED,
        GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(err: &GatewayError) -> Response {
    (status_for(err), Json(ErrorBody::from(err))).into_response()
}

#[derive(Serialize)]
struct ExplainBody {
    explanation: String,
    #[serde(skip_serializing_if = "is_false")]
    truncated: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugBody {
    diagnosis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_fix: Option<String>,
}

#[derive(Serialize)]
struct SummarizeBody {
    summary: String,
    #[serde(skip_serializing_if = "is_false")]
    truncated: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizBody {
    questions: Vec<QuizQuestion>,
    dropped_count: usize,
}

#[derive(Serialize)]
struct RoadmapBody {
    steps: Vec<RoadmapStep>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn shaped_response(result: ShapedResult) -> Response {
    match result {
        ShapedResult::Explanation { text, truncated } => Json(ExplainBody {
            explanation: text,
            truncated,
        })
        .into_response(),
        ShapedResult::Diagnosis {
            diagnosis,
            suggested_fix,
        } => Json(DebugBody {
            diagnosis,
            suggested_fix,
        })
        .into_response(),
        ShapedResult::Summary { text, truncated } => Json(SummarizeBody {
            summary: text,
            truncated,
        })
        .into_response(),
        ShapedResult::Quiz { questions, dropped } => Json(QuizBody {
            questions,
            dropped_count: dropped,
        })
        .into_response(),
        ShapedResult::Roadmap { steps } => Json(RoadmapBody { steps }).into_response(),
    }
}
