//! Success envelope: every 2xx body with content is `{ "data": ... }`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// Wrapper placing a payload under the `data` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap `data`.
    pub fn new(data: T) -> Self {
        Self { data }
    }

    /// `200 OK` with the envelope as JSON.
    pub fn ok(data: T) -> HttpResponse {
        Self::respond(StatusCode::OK, data)
    }

    /// `201 Created` with the envelope as JSON.
    pub fn created(data: T) -> HttpResponse {
        Self::respond(StatusCode::CREATED, data)
    }

    fn respond(status: StatusCode, data: T) -> HttpResponse {
        HttpResponse::build(status).json(Self::new(data))
    }
}
