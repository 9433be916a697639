mod common;
mod page_test;
