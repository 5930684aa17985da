/*!
 * Command-line interface for concatfs
 */

use std::io;
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use concatfs::collector::Collector;
use concatfs::config::{Args, Config};
use concatfs::report::{ReportFormat, Reporter, RunReport};
use concatfs::tree::Forest;
use concatfs::writer::{Assembler, OutputWriter};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "concatfs", &mut io::stdout());
        return Ok(());
    }

    // Create configuration
    let config = Config::from_args(args);

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    // Validate configuration
    config.validate()?;

    let progress = if config.show_progress {
        let progress = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
        {
            progress.set_style(style);
        }
        progress
    } else {
        ProgressBar::hidden()
    };
    progress.set_prefix("Collecting");

    let start_time = Instant::now();

    // Collect files and build the tree header
    let collector = Collector::from_config(&config);
    let collection = collector.collect(&config.paths);
    if collection.is_empty() {
        info!("No files matched the given criteria");
    }
    let header = Forest::build(&collection.files).render();

    // Assemble everything in memory, then write once
    progress.set_prefix("Reading");
    let assembler = Assembler::new(Arc::new(progress.clone()));
    let assembly = assembler.assemble(&header, &collection.files);
    progress.finish_and_clear();

    let writer = OutputWriter::from_config(&config);
    writer.write(&assembly.text)?;

    let duration = start_time.elapsed();

    match writer.destination() {
        Some(path) => println!("All files concatenated into '{}'.", path.display()),
        None => eprintln!("All files concatenated to STDOUT."),
    }

    if config.show_report {
        let report = RunReport {
            output: writer
                .destination()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "STDOUT".to_string()),
            duration,
            files: assembly.records,
            skipped: collection.skipped,
        };
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
