use actix_web::{
    http::{header::ALLOW, Method},
    HttpRequest, HttpResponse,
};

pub const HEARTBEAT_ALLOW: &str = "GET, HEAD, OPTIONS";

/// Fixed per-method statuses. The method is the effective one, so an
/// overridden POST lands on the same arm as the native verb.
pub async fn heartbeat(req: HttpRequest) -> HttpResponse {
    match *req.method() {
        Method::GET | Method::HEAD => HttpResponse::NoContent().finish(),
        Method::OPTIONS => HttpResponse::Ok().insert_header((ALLOW, HEARTBEAT_ALLOW)).finish(),
        Method::PATCH => HttpResponse::InternalServerError().finish(),
        Method::TRACE => HttpResponse::NotImplemented().finish(),
        _ => HttpResponse::MethodNotAllowed()
            .insert_header((ALLOW, HEARTBEAT_ALLOW))
            .finish(),
    }
}
