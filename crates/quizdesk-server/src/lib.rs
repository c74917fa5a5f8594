//! The HTTP delivery front for quizdesk.
//!
//! Serves the active quiz to students, answers timer polls and accepts
//! submissions. All quiz state lives in the shared
//! [`SessionService`](quizdesk_core::session::SessionService); the handlers
//! only translate between HTTP and that service.

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{middleware, web, App, HttpServer};

use quizdesk_core::session::SessionService;

pub mod error;
pub mod handlers;
pub mod launcher;
pub mod page;

/// Name of the http-only cookie carrying the session id.
pub const SESSION_COOKIE: &str = "quizdesk_session";

/// Build the server on an already-bound listener.
///
/// The returned future must be awaited (or spawned) to serve requests.
pub fn run(listener: TcpListener, service: Arc<SessionService>) -> Result<Server, std::io::Error> {
    let data = web::Data::from(service);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .route("/", web::get().to(handlers::index))
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("/api")
                    .route("/quiz_data", web::get().to(handlers::quiz_data))
                    .route("/submit", web::post().to(handlers::submit)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
