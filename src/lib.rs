use actix_web::middleware::DefaultHeaders;
use actix_web::{dev::Server, http::Method, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::routes::ApiKey;
use crate::waitlist::Waitlist;

pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notification;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod utils;
pub mod waitlist;

/// Headers attached to every response, error responses and preflights included.
fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
}

pub fn run(
    listener: std::net::TcpListener,
    waitlist: Waitlist,
    api_key: ApiKey,
) -> Result<Server, std::io::Error> {
    let waitlist = web::Data::new(waitlist);
    let api_key = web::Data::new(api_key);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(TracingLogger::default())
            .route("/healthz", web::get().to(routes::health_check))
            .service(
                web::resource("/submit-email")
                    .route(web::post().to(routes::submit_email))
                    .route(web::method(Method::OPTIONS).to(routes::preflight)),
            )
            .app_data(waitlist.clone())
            .app_data(api_key.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
