pub mod health;
pub mod page;
pub mod record;
pub mod svg;
