//! Sports-odds page scraper.
//!
//! Extracts match cards from a dynamically rendered, infinitely-scrolling
//! odds page behind authentication, normalizes locale-specific odds and time
//! notation, assigns deterministic identifiers, and assembles a stable JSON
//! document. The extraction pipeline is pure over an abstract page capability
//! surface; a WebDriver driver and an axum serving layer wrap it for
//! production use.

pub mod api;
pub mod assemble;
pub mod classify;
pub mod collect;
pub mod config;
pub mod dom;
pub mod error;
pub mod ids;
pub mod localtime;
pub mod models;
pub mod odds;
pub mod page;
pub mod pipeline;
pub mod text;
pub mod webdriver;
