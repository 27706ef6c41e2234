//! Completes login redirects with the path the visitor was trying to reach.

use std::future::{Future, Ready, ready};
use std::pin::Pin;

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderValue, LOCATION},
};

use super::error::{AppError, LOGIN_PATH};

/// Rewrites the `Location` of every [`AppError::LoginRequired`] response to
/// `/auth/login/?next=<path>`.
pub struct LoginRedirect;

impl<S, B> Transform<S, ServiceRequest> for LoginRedirect
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = LoginRedirectService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoginRedirectService { service }))
    }
}

pub struct LoginRedirectService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoginRedirectService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let next = req.path().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            let login_required = res
                .response()
                .error()
                .and_then(|e| e.as_error::<AppError>())
                .is_some_and(|e| matches!(e, AppError::LoginRequired));

            if login_required {
                let location = login_location(&next);
                match HeaderValue::from_str(&location) {
                    Ok(value) => {
                        res.headers_mut().insert(LOCATION, value);
                    }
                    Err(e) => tracing::warn!(path = %next, error = %e, "Cannot build login redirect"),
                }
            }

            Ok(res)
        })
    }
}

/// The login URL carrying `next`, percent-encoded except for `/`.
pub fn login_location(next: &str) -> String {
    let mut encoded = String::with_capacity(next.len());
    for byte in next.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    format!("{LOGIN_PATH}?next={encoded}")
}
