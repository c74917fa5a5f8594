//! Route handlers.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quizdesk_core::error::SessionError;
use quizdesk_core::model::Answers;
use quizdesk_core::session::{SessionService, TimeStatus};

use crate::error::ApiError;
use crate::page;
use crate::SESSION_COOKIE;

/// Body of `POST /api/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub answers: Answers,
}

/// Reply to an accepted submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// `GET /`: start a new session and render the quiz page.
///
/// Every load mints a fresh session, so reloading restarts the timer.
pub async fn index(service: web::Data<SessionService>) -> HttpResponse {
    match service.begin_session() {
        Ok(view) => {
            let cookie = Cookie::build(SESSION_COOKIE, view.session_id.clone())
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish();
            HttpResponse::Ok()
                .cookie(cookie)
                .content_type("text/html; charset=utf-8")
                .body(page::render_quiz(&view))
        }
        Err(SessionError::NoActiveQuiz) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(page::render_error(
                "No quiz is currently active. Please contact your instructor.",
            )),
        Err(e) => {
            tracing::error!("failed to start session: {e}");
            HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body(page::render_error("Something went wrong. Please reload the page."))
        }
    }
}

/// `GET /api/quiz_data`: remaining time for the caller's session.
pub async fn quiz_data(
    req: HttpRequest,
    service: web::Data<SessionService>,
) -> Result<web::Json<TimeStatus>, ApiError> {
    let session_id = session_id(&req);
    let status = service.time_remaining(&session_id)?;
    Ok(web::Json(status))
}

/// `POST /api/submit`: grade and record the caller's answers.
///
/// The body is read raw so that "no quiz" wins over a malformed body.
pub async fn submit(
    req: HttpRequest,
    service: web::Data<SessionService>,
    body: web::Bytes,
) -> Result<web::Json<SubmitResponse>, ApiError> {
    if !service.is_active() {
        return Err(SessionError::NoActiveQuiz.into());
    }

    let session_id = session_id(&req);
    let SubmitRequest {
        student_name,
        answers,
    } = parse_submission(&body)?;

    // Result files are written inside `submit`; keep that off the worker thread.
    let service = service.into_inner();
    let outcome = web::block(move || service.submit(&session_id, &student_name, answers))
        .await
        .map_err(|e| {
            tracing::error!("submission task failed: {e}");
            ApiError::Internal
        })??;

    Ok(web::Json(SubmitResponse {
        success: true,
        message: outcome.end_message,
    }))
}

/// Decode a submission body. An empty body, `null` or `{}` carries no data.
pub fn parse_submission(body: &[u8]) -> Result<SubmitRequest, ApiError> {
    let invalid = |e: serde_json::Error| {
        let message = format!("invalid submission: {e}");
        tracing::warn!("{message}");
        ApiError::BadRequest(message)
    };

    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body).map_err(invalid)?
    };

    let empty = match &value {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if empty {
        return Err(ApiError::BadRequest("no data provided".to_string()));
    }

    serde_json::from_value(value).map_err(invalid)
}

/// The session id from the cookie. A missing cookie yields an id that no
/// session can have.
fn session_id(req: &HttpRequest) -> String {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_default()
}
