pub mod locale;
pub mod svg;

pub use locale::Locale;
pub use svg::*;
