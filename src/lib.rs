//! EatWise Library
//!
//! Energy estimates, photo-based food advice and a small record store.

pub mod build_info;
pub mod config;
pub mod db;
pub mod http;
pub mod llm;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod store;
pub mod tools;
