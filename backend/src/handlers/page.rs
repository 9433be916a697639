//! Page handlers
//!
//! Pages read the locale resolved by `locale_middleware`. The language picker
//! posts back to the page it is rendered on, which the middleware turns into a
//! cookie and a redirect.

use axum::{
    Json,
    extract::OriginalUri,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Locale;
use crate::utils::UiStrings;

#[derive(Debug, Serialize, ToSchema)]
pub struct LanguageOption {
    pub code: Locale,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct I18nResponse {
    pub lang: Locale,
    pub languages: Vec<LanguageOption>,
    pub ui: UiStrings,
}

/// GET /
pub async fn index(locale: Locale, OriginalUri(uri): OriginalUri) -> Html<String> {
    let ui = UiStrings::for_locale(locale);
    Html(render_index(locale, &ui, uri.path()))
}

/// GET /i18n - UI strings of the active locale for client-side scripts
pub async fn i18n_table(locale: Locale) -> Json<I18nResponse> {
    let languages = Locale::ALL
        .iter()
        .map(|l| LanguageOption { code: *l, name: l.display_name().to_string() })
        .collect();

    Json(I18nResponse { lang: locale, languages, ui: UiStrings::for_locale(locale) })
}

/// Fallback when static files are disabled
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

fn render_index(locale: Locale, ui: &UiStrings, action: &str) -> String {
    let options: String = Locale::ALL
        .iter()
        .map(|l| {
            format!(
                r#"<option value="{code}"{selected}>{name}</option>"#,
                code = l.as_str(),
                selected = if *l == locale { " selected" } else { "" },
                name = l.display_name(),
            )
        })
        .collect();

    format!(
        r#"<!doctype html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav>
<a href="/">{home}</a>
<a href="/generator">{generator}</a>
<a href="/gallery">{gallery}</a>
<form method="post" action="{action}">
<label>{language} <select name="language">{options}</select></label>
<button type="submit">OK</button>
</form>
</nav>
<main>
<h1>{title}</h1>
<p>{description}</p>
<a href="/generator">{button}</a>
</main>
</body>
</html>
"#,
        lang = locale.as_str(),
        title = escape_html(&ui.index.title),
        home = escape_html(&ui.nav.home),
        generator = escape_html(&ui.nav.generator),
        gallery = escape_html(&ui.nav.gallery),
        action = escape_html(action),
        language = escape_html(&ui.nav.language),
        options = options,
        description = escape_html(&ui.index.description),
        button = escape_html(&ui.index.button),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_index_in_french() {
        let html = render_index(Locale::Fr, &UiStrings::for_locale(Locale::Fr), "/");
        assert!(html.contains(r#"<html lang="fr">"#));
        assert!(html.contains("Bienvenue sur le générateur SVG"));
        assert!(html.contains(r#"<option value="fr" selected>"#));
        assert!(html.contains("d&#39;invites"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
