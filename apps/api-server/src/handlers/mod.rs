//! HTTP handlers and route configuration.

mod auth;
mod catalog;
mod comments;
mod health;
mod posts;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(web::scope("/auth").route("/login", web::post().to(auth::login)))
            // The user resource is a fixed "self" path; no id parameter.
            .service(
                web::scope("/user")
                    .route("", web::post().to(users::register))
                    .route("", web::get().to(users::me))
                    .route("", web::put().to(users::update))
                    .route("", web::patch().to(users::update))
                    .route("", web::delete().to(users::delete)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{slug}", web::get().to(posts::get))
                    .route("/{slug}", web::put().to(posts::update))
                    .route("/{slug}", web::patch().to(posts::update))
                    .route("/{slug}", web::delete().to(posts::delete)),
            )
            .service(
                web::scope("/comments")
                    .route("", web::get().to(comments::list))
                    .route("", web::post().to(comments::create))
                    .route("/{id}", web::get().to(comments::get))
                    .route("/{id}", web::put().to(comments::update))
                    .route("/{id}", web::patch().to(comments::update))
                    .route("/{id}", web::delete().to(comments::delete)),
            )
            .route("/tags", web::get().to(catalog::tags))
            .route("/categories", web::get().to(catalog::categories)),
    );
}
