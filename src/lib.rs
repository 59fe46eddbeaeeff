//! # Webapp Minify
//!
//! Build-time minification of static web resources.
//!
//! Given a source tree of HTML, CSS and JavaScript, this library writes a
//! mirrored output tree in which CSS and JS files are minified and renamed
//! after their content hash, and HTML files are minified with every
//! reference to an original asset name rewritten to the hashed name.
//!
//! ## Features
//!
//! - Two-phase pipeline: leaf assets first, HTML once every name is known
//! - Configurable filename pattern (`[name]`, `[ext]`, `[hash]`, `[hash:N]`)
//! - Pluggable minifier strategies with `lightningcss`, `minify-js` and
//!   `minify-html` defaults
//! - Parallel processing within each phase using Rayon
//!
//! ## Usage
//!
//! ```ignore
//! use webapp_minify::config::Config;
//! use webapp_minify::minifier::Minifiers;
//! use webapp_minify::pipeline::{run, PipelineStats};
//! use webapp_minify::sink::LogFacade;
//!
//! let config = Config::new("/project/src/main/webapp", "/project/target/webapp");
//! let report = run(&config, &Minifiers::standard(), &LogFacade, &PipelineStats::new())?;
//! ```

/// CLI configuration and argument parsing
pub mod config;

/// Output path arithmetic and file writes
pub mod emitter;

/// Error types for pipeline operations
pub mod error;

/// Minifier strategies
pub mod minifier;

/// Content-addressed filename patterns
pub mod pattern;

/// Two-phase pipeline orchestration
pub mod pipeline;

/// Original-to-minted filename registry
pub mod registry;

/// Resource and classification types
pub mod resource;

/// Reference rewriting for HTML
pub mod rewriter;

/// Source tree scanning
pub mod scanner;

/// Logging sink
pub mod sink;
