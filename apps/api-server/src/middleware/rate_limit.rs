//! Rate limiting middleware.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use postboard_core::ports::RateLimiter;
use postboard_shared::ErrorResponse;

/// Rate limiting middleware factory. Requests are keyed by client IP.
pub struct RateLimitMiddleware {
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter: Some(limiter),
        }
    }

    /// Pass every request through untouched.
    pub fn disabled() -> Self {
        Self { limiter: None }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let Some(limiter) = self.limiter.clone() else {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        };
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(client = %key, "Rate limit exceeded");

                    let retry_after = result.reset_after.as_secs().max(1);
                    let error = ErrorResponse::new(429, "Too Many Requests")
                        .with_detail(format!(
                            "Rate limit exceeded. Try again in {} seconds.",
                            retry_after
                        ))
                        .with_code("ratelimited");

                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .json(error);

                    Ok(req.into_response(response).map_into_right_body())
                }
                Ok(_) => Ok(service.call(req).await?.map_into_left_body()),
                Err(e) => {
                    tracing::error!(error = %e, "Rate limiter error, failing open");
                    Ok(service.call(req).await?.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{App, http::StatusCode, test, web};
    use async_trait::async_trait;
    use postboard_core::ports::{RateLimitError, RateLimitResult};

    use super::*;

    struct Fixed(Result<bool, ()>);

    #[async_trait]
    impl RateLimiter for Fixed {
        async fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
            match self.0 {
                Ok(allowed) => Ok(RateLimitResult {
                    allowed,
                    reset_after: Duration::from_secs(7),
                }),
                Err(()) => Err(RateLimitError::Backend("offline".to_string())),
            }
        }
    }

    async fn status_with(middleware: RateLimitMiddleware) -> (StatusCode, Option<String>) {
        let app = test::init_service(
            App::new()
                .wrap(middleware)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let retry_after = res
            .headers()
            .get("Retry-After")
            .map(|v| v.to_str().unwrap().to_string());
        (res.status(), retry_after)
    }

    #[actix_web::test]
    async fn test_rejects_when_limited() {
        let (status, retry_after) =
            status_with(RateLimitMiddleware::new(Arc::new(Fixed(Ok(false))))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(retry_after.as_deref(), Some("7"));
    }

    #[actix_web::test]
    async fn test_passes_allowed_disabled_and_failing() {
        let (status, _) = status_with(RateLimitMiddleware::new(Arc::new(Fixed(Ok(true))))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = status_with(RateLimitMiddleware::disabled()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = status_with(RateLimitMiddleware::new(Arc::new(Fixed(Err(()))))).await;
        assert_eq!(status, StatusCode::OK);
    }
}
