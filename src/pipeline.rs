//! Two-phase minification pipeline.
//!
//! Phase one minifies CSS and JS resources in parallel, writes each under its
//! minted name and records `basename -> minted basename` in the
//! [`RewriteRegistry`]. Phase two starts only once every phase-one worker has
//! finished: HTML resources are minified, their references rewritten from a
//! registry snapshot, and written under their original names.
//!
//! Any error aborts the run. Files already written stay on disk.

use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::config::Config;
use crate::emitter::emit;
use crate::error::PipelineError;
use crate::minifier::Minifiers;
use crate::registry::RewriteRegistry;
use crate::resource::{Classification, Resource};
use crate::rewriter::HtmlRewriter;
use crate::scanner::scan_resources;
use crate::sink::LogSink;

/// Cache-line aligned atomic counter to prevent false sharing
#[repr(align(64))]
pub struct CacheAlignedAtomic(pub AtomicU64);

impl CacheAlignedAtomic {
    pub const fn new(val: u64) -> Self {
        Self(AtomicU64::new(val))
    }

    #[inline]
    pub fn add(&self, val: u64) {
        self.0.fetch_add(val, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counters updated by pipeline workers
pub struct PipelineStats {
    pub css_minified: CacheAlignedAtomic,
    pub js_minified: CacheAlignedAtomic,
    pub html_minified: CacheAlignedAtomic,
    /// Excluded and unhandled resources
    pub skipped: CacheAlignedAtomic,
    pub bytes_read: CacheAlignedAtomic,
    pub bytes_written: CacheAlignedAtomic,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self {
            css_minified: CacheAlignedAtomic::new(0),
            js_minified: CacheAlignedAtomic::new(0),
            html_minified: CacheAlignedAtomic::new(0),
            skipped: CacheAlignedAtomic::new(0),
            bytes_read: CacheAlignedAtomic::new(0),
            bytes_written: CacheAlignedAtomic::new(0),
        }
    }

    /// Total number of files written
    pub fn files_written(&self) -> u64 {
        self.css_minified.get() + self.js_minified.get() + self.html_minified.get()
    }

    fn count(&self, classification: Classification) {
        match classification {
            Classification::Css => self.css_minified.add(1),
            Classification::Js => self.js_minified.add(1),
            Classification::Html => self.html_minified.add(1),
            Classification::Other | Classification::Excluded => self.skipped.add(1),
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A minified CSS or JS resource and its minted name
#[derive(Debug, Clone)]
pub struct MintedArtifact {
    pub resource: Resource,
    pub minted_name: String,
    pub content: String,
}

/// Outcome of a successful run
#[derive(Debug)]
pub struct PipelineReport {
    /// Registry as it stood when phase two began
    pub registry: RewriteRegistry,
    pub duration: Duration,
}

/// Run both phases over `config.source_dir`.
///
/// Work runs on the current rayon pool.
pub fn run(
    config: &Config,
    minifiers: &Minifiers,
    sink: &dyn LogSink,
    stats: &PipelineStats,
) -> Result<PipelineReport, PipelineError> {
    let start = Instant::now();

    let resources = scan_resources(
        &config.source_dir,
        Some(config.target_dir.as_path()),
        &config.exclude_resources,
        sink,
    )?;

    let mut leaf_assets = Vec::new();
    let mut html_queue = Vec::new();
    for resource in resources {
        match resource.classification {
            Classification::Css | Classification::Js => leaf_assets.push(resource),
            Classification::Html => html_queue.push(resource),
            Classification::Other | Classification::Excluded => {
                stats.count(resource.classification)
            }
        }
    }

    let registry = minify_leaf_assets(config, minifiers, sink, stats, leaf_assets)?;
    minify_html_resources(config, minifiers, sink, stats, &registry, &html_queue)?;

    Ok(PipelineReport {
        registry,
        duration: start.elapsed(),
    })
}

/// Phase one: minify, mint, emit and register every CSS and JS resource
pub fn minify_leaf_assets(
    config: &Config,
    minifiers: &Minifiers,
    sink: &dyn LogSink,
    stats: &PipelineStats,
    resources: Vec<Resource>,
) -> Result<RewriteRegistry, PipelineError> {
    // Collecting is the barrier: all workers finish before registration
    let artifacts: Vec<MintedArtifact> = resources
        .into_par_iter()
        .map(|resource| -> Result<MintedArtifact, PipelineError> {
            let artifact = mint_artifact(config, minifiers, sink, stats, resource)?;
            let (_, bytes) = emit(
                &config.target_dir,
                &artifact.resource,
                &artifact.minted_name,
                &artifact.content,
            )?;
            stats.bytes_written.add(bytes);
            stats.count(artifact.resource.classification);
            Ok(artifact)
        })
        .collect::<Result<_, PipelineError>>()?;

    let mut registry = RewriteRegistry::new();
    for MintedArtifact {
        resource,
        minted_name,
        ..
    } in artifacts
    {
        if let Some(previous) = registry.record(resource.basename.clone(), minted_name.clone()) {
            sink.warn(&format!(
                "Duplicate resource name {}: {} replaced by {}",
                resource.basename, previous, minted_name
            ));
        }
    }

    Ok(registry)
}

/// Phase two: minify HTML, rewrite references, emit under the original name
pub fn minify_html_resources(
    config: &Config,
    minifiers: &Minifiers,
    sink: &dyn LogSink,
    stats: &PipelineStats,
    registry: &RewriteRegistry,
    resources: &[Resource],
) -> Result<(), PipelineError> {
    let rewriter = HtmlRewriter::new(&registry.snapshot())?;

    resources
        .par_iter()
        .try_for_each(|resource| -> Result<(), PipelineError> {
            sink.info(&format!("Minify HTML resource: {}", resource.basename));

            let content = read_resource(resource, stats)?;
            let minified = minify(minifiers, resource, &content)?;
            let rewritten = rewriter.rewrite(&minified);

            let (_, bytes) = emit(&config.target_dir, resource, &resource.basename, &rewritten)?;
            stats.bytes_written.add(bytes);
            stats.count(Classification::Html);
            Ok(())
        })
}

/// Read and minify a CSS or JS resource and mint its output name
fn mint_artifact(
    config: &Config,
    minifiers: &Minifiers,
    sink: &dyn LogSink,
    stats: &PipelineStats,
    resource: Resource,
) -> Result<MintedArtifact, PipelineError> {
    sink.info(&format!(
        "Minify {} resource: {}",
        resource.classification, resource.basename
    ));

    let content = read_resource(&resource, stats)?;
    let minified = minify(minifiers, &resource, &content)?;
    let minted_name = config
        .filename_pattern
        .mint(&resource.basename, minified.as_bytes());

    Ok(MintedArtifact {
        resource,
        minted_name,
        content: minified,
    })
}

fn read_resource(resource: &Resource, stats: &PipelineStats) -> Result<String, PipelineError> {
    let content =
        fs::read_to_string(&resource.source_path).map_err(|e| PipelineError::ReadFailed {
            path: resource.source_path.clone(),
            source: e,
        })?;
    stats.bytes_read.add(content.len() as u64);
    Ok(content)
}

/// Minify `content` with the strategy for the resource's kind.
///
/// Kinds without a strategy pass through unchanged.
fn minify(
    minifiers: &Minifiers,
    resource: &Resource,
    content: &str,
) -> Result<String, PipelineError> {
    let Some(minifier) = minifiers.for_classification(resource.classification) else {
        return Ok(content.to_string());
    };
    minifier
        .minify(content)
        .map_err(|e| PipelineError::Minification {
            kind: resource.classification,
            path: resource.source_path.clone(),
            source: e,
        })
}
