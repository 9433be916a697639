//! Internationalization utilities
//!
//! Locale negotiation from HTTP requests and the typed UI string table
//! backed by `locales/*.yml`.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use rust_i18n::t;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Locale;

/// Pick the best supported locale from an `Accept-Language` header value.
///
/// Entries are ordered by q-value (stable for equal weights) and matched on
/// their primary subtag, so `fr-CA` selects `fr`. Entries with `q=0`, wildcards
/// and malformed weights are ignored.
pub fn negotiate_locale(header_value: Option<&str>) -> Option<Locale> {
    let header_value = header_value?;

    let mut ranges: Vec<(&str, f32)> = header_value
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let mut quality = 1.0;
            for param in parts {
                if let Some((key, value)) = param.split_once('=')
                    && key.trim().eq_ignore_ascii_case("q")
                {
                    quality = value.trim().parse::<f32>().ok()?;
                }
            }
            (quality > 0.0).then_some((tag, quality))
        })
        .collect();

    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranges.into_iter().find_map(|(tag, _)| {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        Locale::parse(&primary.to_ascii_lowercase())
    })
}

/// Cookie value → negotiated `Accept-Language` → default
pub fn resolve_locale(cookie_value: Option<&str>, accept_language: Option<&str>) -> Locale {
    cookie_value
        .and_then(Locale::parse)
        .or_else(|| negotiate_locale(accept_language))
        .unwrap_or_default()
}

/// Read one cookie from every `Cookie` header of the request
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

/// Read one field of an `application/x-www-form-urlencoded` body.
/// Undecodable input yields `None`.
pub fn form_field(body: &[u8], name: &str) -> Option<String> {
    let body = std::str::from_utf8(body).ok()?;
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find_map(|(key, value)| {
            if decode_form_component(key)? == name { decode_form_component(value) } else { None }
        })
}

fn decode_form_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " ")).ok().map(|s| s.into_owned())
}

// ============================================================================
// UI strings
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UiStrings {
    pub nav: NavStrings,
    pub index: IndexStrings,
    pub generator: GeneratorStrings,
    pub gallery: GalleryStrings,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NavStrings {
    pub home: String,
    pub generator: String,
    pub gallery: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndexStrings {
    pub title: String,
    pub description: String,
    pub button: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorStrings {
    pub title: String,
    pub content_placeholder: String,
    pub code_placeholder: String,
    pub prompt_label: String,
    pub generate_button: String,
    pub edit_button: String,
    pub view_button: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryStrings {
    pub title: String,
    pub view_details: String,
}

impl UiStrings {
    pub fn for_locale(locale: Locale) -> Self {
        let l = locale.as_str();
        let s = |key: &str| t!(key, locale = l).to_string();

        Self {
            nav: NavStrings {
                home: s("nav.home"),
                generator: s("nav.generator"),
                gallery: s("nav.gallery"),
                language: s("nav.language"),
            },
            index: IndexStrings {
                title: s("index.title"),
                description: s("index.description"),
                button: s("index.button"),
            },
            generator: GeneratorStrings {
                title: s("generator.title"),
                content_placeholder: s("generator.contentPlaceholder"),
                code_placeholder: s("generator.codePlaceholder"),
                prompt_label: s("generator.promptLabel"),
                generate_button: s("generator.generateButton"),
                edit_button: s("generator.editButton"),
                view_button: s("generator.viewButton"),
            },
            gallery: GalleryStrings {
                title: s("gallery.title"),
                view_details: s("gallery.viewDetails"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_negotiate_primary_subtag() {
        assert_eq!(negotiate_locale(Some("fr-CA,fr;q=0.9,en;q=0.8")), Some(Locale::Fr));
        assert_eq!(negotiate_locale(Some("en-US")), Some(Locale::En));
        assert_eq!(negotiate_locale(Some("FR_fr")), Some(Locale::Fr));
    }

    #[test]
    fn test_negotiate_respects_quality() {
        assert_eq!(negotiate_locale(Some("en;q=0.5, fr;q=0.9")), Some(Locale::Fr));
        assert_eq!(negotiate_locale(Some("de, fr;q=0.1, en;q=0")), Some(Locale::Fr));
    }

    #[test]
    fn test_negotiate_nothing_usable() {
        assert_eq!(negotiate_locale(None), None);
        assert_eq!(negotiate_locale(Some("")), None);
        assert_eq!(negotiate_locale(Some("de-DE,es;q=0.8,*;q=0.5")), None);
        assert_eq!(negotiate_locale(Some("fr;q=abc")), None);
    }

    #[test]
    fn test_resolve_order() {
        assert_eq!(resolve_locale(Some("fr"), Some("en")), Locale::Fr);
        assert_eq!(resolve_locale(Some("de"), Some("fr-BE")), Locale::Fr);
        assert_eq!(resolve_locale(Some("FR"), None), Locale::En);
        assert_eq!(resolve_locale(None, Some("es")), Locale::En);
        assert_eq!(resolve_locale(None, None), Locale::En);
    }

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; locale=fr"));
        headers.append(COOKIE, HeaderValue::from_static("session=abc"));
        assert_eq!(cookie_value(&headers, "locale").as_deref(), Some("fr"));
        assert_eq!(cookie_value(&headers, "session").as_deref(), Some("abc"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_form_field() {
        assert_eq!(form_field(b"language=fr", "language").as_deref(), Some("fr"));
        assert_eq!(form_field(b"a=1&language=en&b=2", "language").as_deref(), Some("en"));
        assert_eq!(form_field(b"note=hello+world%21", "note").as_deref(), Some("hello world!"));
        assert_eq!(form_field(b"language", "language").as_deref(), Some(""));
        assert_eq!(form_field(b"other=fr", "language"), None);
        assert_eq!(form_field(&[0xff, 0xfe], "language"), None);
    }

    #[test]
    fn test_ui_strings_per_locale() {
        let en = UiStrings::for_locale(Locale::En);
        let fr = UiStrings::for_locale(Locale::Fr);
        assert_eq!(en.nav.home, "Home");
        assert_eq!(fr.nav.home, "Accueil");
        assert_eq!(fr.generator.generate_button, "Générer le SVG");
        assert_eq!(en.gallery.view_details, "View Details");

        let json = serde_json::to_value(&fr).unwrap();
        assert_eq!(json["generator"]["promptLabel"], "Entrez votre invite :");
    }
}
