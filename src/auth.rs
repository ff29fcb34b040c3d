// src/auth.rs
use crate::errors::AnalyzeError;
use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

/// Header set by the authenticating proxy once the user has signed in.
pub const FORWARDED_EMAIL_HEADER: &str = "x-forwarded-email";

/// Signed-in caller, as vouched for by the authenticating proxy.
///
/// `id_token` is forwarded untouched to the skin analysis service; it is
/// deliberately left out of `Debug` output.
#[derive(Clone)]
pub struct Session {
    pub email: String,
    id_token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(email: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            id_token: id_token.into(),
        }
    }

    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AnalyzeError> {
        let email = headers
            .get(FORWARDED_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AnalyzeError::Unauthorized("Unauthorized".to_string()))?;

        let id_token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AnalyzeError::Unauthorized("Google ID token not found in session".to_string())
            })?;

        Ok(Session::new(email, id_token))
    }
}

impl FromRequest for Session {
    type Error = AnalyzeError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Session::from_headers(req.headers()))
    }
}
