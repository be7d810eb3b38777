use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::Next,
    Error, HttpMessage,
};

pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// Marks a request whose method was replaced by the override header.
#[derive(Debug, Clone)]
pub struct MethodOverridden {
    pub transport: Method,
}

/// Method used for dispatch. Unrecognised override values are ignored.
pub fn effective_method(transport: &Method, override_header: Option<&str>) -> Method {
    let requested = override_header
        .map(|value| value.trim().to_ascii_uppercase())
        .and_then(|value| match value.as_str() {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "PATCH" => Some(Method::PATCH),
            "OPTIONS" => Some(Method::OPTIONS),
            "TRACE" => Some(Method::TRACE),
            _ => None,
        });

    requested.unwrap_or_else(|| transport.clone())
}

pub async fn method_override_middleware(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let header = req
        .headers()
        .get(METHOD_OVERRIDE_HEADER)
        .and_then(|value| value.to_str().ok());
    let effective = effective_method(req.method(), header);

    if effective != *req.method() {
        let transport = req.method().clone();
        log::debug!(
            "Method override {} -> {} for {}",
            transport,
            effective,
            req.path()
        );
        req.head_mut().method = effective;
        req.extensions_mut().insert(MethodOverridden { transport });
    }

    next.call(req).await
}
