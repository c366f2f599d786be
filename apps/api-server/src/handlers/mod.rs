//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::{HttpRequest, http::Method, web};
use uuid::Uuid;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// An id that is not a UUID names no post, so it gets the same 404 as an
/// unknown one.
fn malformed_id(req: &HttpRequest) -> AppError {
    let post_id_ok = req
        .match_info()
        .get("id")
        .is_some_and(|id| id.parse::<Uuid>().is_ok());

    let (code, detail) = if post_id_ok && req.match_info().get("comment_id").is_some() {
        ("commentnotexists", "Comment does not exist")
    } else if req.method() == Method::GET {
        ("nopostfound", "No post found with that ID")
    } else {
        ("postnotfound", "Post not found")
    };

    AppError::NotFound {
        code,
        detail: detail.to_string(),
    }
}

/// Configure all application routes. Everything under `/api` goes through
/// `rate_limit`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, rate_limit: RateLimitMiddleware) {
    cfg.app_data(
        web::PathConfig::default().error_handler(|err, req| {
            tracing::debug!(error = %err, path = %req.path(), "Malformed id in path");
            malformed_id(req).into()
        }),
    )
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request("invalidbody", err.to_string()).into()
    }))
    .service(
        web::scope("/api")
            .wrap(rate_limit)
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    // "/test" must be registered before "/{id}"
                    .route("/test", web::get().to(posts::probe))
                    .service(
                        web::resource("")
                            .route(web::get().to(posts::list))
                            .route(web::post().to(posts::create)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(posts::get))
                            .route(web::delete().to(posts::delete)),
                    )
                    .route("/like/{id}", web::post().to(posts::like))
                    .route("/unlike/{id}", web::post().to(posts::unlike))
                    .route("/comment/{id}", web::post().to(posts::add_comment))
                    .route(
                        "/comment/{id}/{comment_id}",
                        web::delete().to(posts::remove_comment),
                    ),
            ),
    );
}
