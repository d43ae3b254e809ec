/// HTTP middleware and request extractors for social-api
///
/// - `CallerId`: the acting user, supplied by the upstream gateway
/// - `RequestTimeout`: bounds the whole handler chain of a request
use crate::error::AppError;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Duration;

/// Header carrying the authenticated caller's id.
pub const CALLER_HEADER: &str = "x-user-id";

// =====================================================================
// Caller identity
// =====================================================================

/// Identity of the user making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub i64);

impl CallerId {
    fn from_header(req: &HttpRequest) -> Result<Self, AppError> {
        let raw = req
            .headers()
            .get(CALLER_HEADER)
            .ok_or_else(|| AppError::BadRequest(format!("missing {} header", CALLER_HEADER)))?
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("invalid {} header", CALLER_HEADER)))?;

        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(CallerId(id)),
            _ => Err(AppError::BadRequest(format!("invalid {} header", CALLER_HEADER))),
        }
    }
}

impl FromRequest for CallerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(CallerId::from_header(req))
    }
}

// =====================================================================
// Request timeout
// =====================================================================

/// Drops the handler future once `limit` elapses, which also cancels any
/// query it is awaiting.
#[derive(Clone, Copy)]
pub struct RequestTimeout {
    limit: Duration,
}

impl RequestTimeout {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutService {
            service: Rc::new(service),
            limit: self.limit,
        }))
    }
}

pub struct RequestTimeoutService<S> {
    service: Rc<S>,
    limit: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimeoutService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limit = self.limit;

        Box::pin(async move {
            match tokio::time::timeout(limit, service.call(req)).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Timeout(limit).into()),
            }
        })
    }
}
