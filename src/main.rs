use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use webapp_minify::config::{Cli, Config};
use webapp_minify::minifier::Minifiers;
use webapp_minify::pipeline::{run, PipelineStats};
use webapp_minify::sink::{LogFacade, LogSink};

/// Shows the latest message on a spinner, warnings above it
struct SpinnerSink {
    bar: ProgressBar,
}

impl LogSink for SpinnerSink {
    fn info(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.bar.suspend(|| log::warn!("{message}"));
    }
}

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_cli(cli)?;

    env_logger::Builder::new()
        .filter_level(if config.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        })
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();

    // Configure Rayon thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build_global()
        .ok();

    if config.verbose {
        eprintln!(
            "Minifying {} -> {} with {} worker(s)",
            config.source_dir.display(),
            config.target_dir.display(),
            config.jobs
        );
    }

    let minifiers = Minifiers::standard();
    let stats = PipelineStats::new();

    // Spinner only for interactive, non-verbose runs
    let spinner = (!config.verbose && std::io::stderr().is_terminal()).then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        SpinnerSink { bar }
    });

    let sink: &dyn LogSink = match &spinner {
        Some(spinner) => spinner,
        None => &LogFacade,
    };

    let result = run(&config, &minifiers, sink, &stats);

    if let Some(spinner) = spinner {
        spinner.bar.finish_and_clear();
    }

    let report = result.with_context(|| {
        format!("Failed to minify resources in {}", config.source_dir.display())
    })?;

    let duration = report.duration.as_secs_f64();
    let bytes_read = stats.bytes_read.get();
    let bytes_written = stats.bytes_written.get();

    println!(
        "Minified {} files in {:.2}s ({} CSS, {} JS, {} HTML; {} skipped)",
        stats.files_written(),
        duration,
        stats.css_minified.get(),
        stats.js_minified.get(),
        stats.html_minified.get(),
        stats.skipped.get()
    );
    println!(
        "  {} -> {} bytes ({} saved)",
        bytes_read,
        bytes_written,
        bytes_read.saturating_sub(bytes_written)
    );

    if config.verbose {
        let snapshot = report.registry.snapshot();
        let mut entries: Vec<(&str, &str)> = snapshot.iter().collect();
        entries.sort_unstable();
        for (original, minted) in entries {
            println!("  {original} -> {minted}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
