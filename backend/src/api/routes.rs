//! # API Route Configuration

use actix_web::web;

use super::handlers;

/// Configure all API routes.
///
/// ## Route Structure
///
/// ```text
/// /                       GET    - empty 200
/// ├── /health             GET    - health check
/// ├── /campers            GET    - list, POST - create
/// │   └── /{id}           GET    - fetch, PATCH - update
/// ├── /activities         GET    - list
/// │   └── /{id}           DELETE - delete with signups
/// └── /signups            POST   - create
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Malformed JSON bodies get the generic validation response
        .app_data(web::JsonConfig::default().error_handler(handlers::json_error_handler))
        .route("/", web::get().to(handlers::index))
        .route("/health", web::get().to(handlers::health_check))
        .service(
            web::resource("/campers")
                .route(web::get().to(handlers::list_campers))
                .route(web::post().to(handlers::create_camper)),
        )
        .service(
            web::resource("/campers/{id}")
                .route(web::get().to(handlers::get_camper))
                .route(web::patch().to(handlers::update_camper)),
        )
        .service(web::resource("/activities").route(web::get().to(handlers::list_activities)))
        .service(
            web::resource("/activities/{id}").route(web::delete().to(handlers::delete_activity)),
        )
        .service(web::resource("/signups").route(web::post().to(handlers::create_signup)));
}
