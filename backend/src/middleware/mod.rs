pub mod locale;

pub use locale::{API_PREFIX, LOCALE_COOKIE, locale_cookie, locale_middleware};
