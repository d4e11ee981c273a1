pub mod config;
pub mod dict;
pub mod filter;
pub mod translit;
pub mod unicode;
