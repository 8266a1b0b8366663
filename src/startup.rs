use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::http::Method;
use actix_web::{web, App, HttpServer};

use crate::captcha::CaptchaVerifier;
use crate::configuration::AllowedOrigins;
use crate::email_client::EmailClient;
use crate::routes;
use actix_web::web::Data;
use tracing_actix_web::TracingLogger;

pub fn run(
    listener: TcpListener,
    captcha_verifier: CaptchaVerifier,
    email_client: EmailClient,
    allowed_origins: AllowedOrigins,
) -> Result<Server, std::io::Error> {
    let captcha_verifier = Data::new(captcha_verifier);
    let email_client = Data::new(email_client);
    let allowed_origins = Data::new(allowed_origins);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            // Buffer a little past the documented cap so the handler renders
            // the 413 itself; anything bigger still gets a framework 413.
            .app_data(web::PayloadConfig::new(
                routes::contact::MAX_CONTENT_LENGTH + 2 * 1024,
            ))
            .route("/health", web::get().to(routes::health_check::health_check))
            .route("/api/contact", web::post().to(routes::contact::contact))
            .route(
                "/api/contact",
                web::method(Method::OPTIONS).to(routes::contact::contact_preflight),
            )
            .app_data(captcha_verifier.clone())
            .app_data(email_client.clone())
            .app_data(allowed_origins.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
