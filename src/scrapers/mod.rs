//! Scrapers for public station directories.
//!
//! Each scraper follows a consistent two-phase pattern:
//!
//! 1. **Fetching**: Download the directory page over HTTP
//! 2. **Parsing**: Walk the page structure and extract station rows
//!
//! # Supported Directories
//!
//! | Directory | Module | Method | Notes |
//! |-----------|--------|--------|-------|
//! | Wikipedia urban-format list | [`wikipedia`] | HTML scraping | State/city section headings with station lists |
//!
//! # Common Patterns
//!
//! Scrapers use:
//! - `scraper`'s `Html`/`Selector` for HTML traversal
//! - Pure parse functions over the fetched HTML so the traversal logic is
//!   testable without network access
//! - Graceful handling of malformed sections (skipped, not fatal)

pub mod wikipedia;
