pub mod error;
pub mod i18n;

pub use error::{ApiError, ApiResult, RecordApiError, RecordResult};
pub use i18n::{UiStrings, cookie_value, form_field, negotiate_locale, resolve_locale};
