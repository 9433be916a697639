//! Locale resolution middleware
//!
//! Handles the language-switch form (POST `language=en|fr` → cookie + 303 back
//! to the same URL) and resolves the locale of every other page request from
//! the `locale` cookie, then `Accept-Language`, then the default. API routes
//! are left untouched.

use std::convert::Infallible;

use axum::{
    async_trait,
    body::{Body, to_bytes},
    extract::{FromRequestParts, Request},
    http::{
        HeaderMap, HeaderValue, Method,
        StatusCode,
        header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE, SET_COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};

use crate::models::Locale;
use crate::utils::{cookie_value, form_field, resolve_locale};

pub const API_PREFIX: &str = "/api/";
pub const LOCALE_COOKIE: &str = "locale";
pub const LOCALE_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;
const LANGUAGE_FIELD: &str = "language";
const FORM_BODY_LIMIT: usize = 64 * 1024;

pub async fn locale_middleware(req: Request, next: Next) -> Response {
    if req.uri().path().starts_with(API_PREFIX) {
        return next.run(req).await;
    }

    // Only small forms with a declared length are read; others pass through untouched
    let mut req = if req.method() == Method::POST && is_small_form(req.headers()) {
        let (parts, body) = req.into_parts();
        let bytes = match to_bytes(body, FORM_BODY_LIMIT).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read form body: {}", e);
                return (StatusCode::BAD_REQUEST, "Invalid form body").into_response();
            },
        };

        if let Some(locale) = form_field(&bytes, LANGUAGE_FIELD).as_deref().and_then(Locale::parse) {
            let target = parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| parts.uri.path().to_string());
            tracing::debug!("Switching locale to {} and redirecting to {}", locale, target);
            return switch_locale_response(locale, &target);
        }

        Request::from_parts(parts, Body::from(bytes))
    } else {
        req
    };

    let cookie = cookie_value(req.headers(), LOCALE_COOKIE);
    let accept_language = req.headers().get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let locale = resolve_locale(cookie.as_deref(), accept_language);

    req.extensions_mut().insert(locale);

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(CONTENT_LANGUAGE, HeaderValue::from_static(locale.as_str()));
    response
}

fn is_small_form(headers: &HeaderMap) -> bool {
    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    let declared_len = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok());

    is_form && declared_len.is_some_and(|len| len <= FORM_BODY_LIMIT)
}

pub fn locale_cookie(locale: Locale) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        LOCALE_COOKIE,
        locale.as_str(),
        LOCALE_COOKIE_MAX_AGE
    )
}

/// 303 back to `target` with the locale cookie set
fn switch_locale_response(locale: Locale, target: &str) -> Response {
    (AppendHeaders([(SET_COOKIE, locale_cookie(locale))]), Redirect::to(target)).into_response()
}

/// Locale attached by `locale_middleware`; the default when the middleware did not run
#[async_trait]
impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Locale>().copied().unwrap_or_default())
    }
}
