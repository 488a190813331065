//! Linkfix CLI - repair cross-project item links.

use clap::Parser;
use linkfix_cli::prompt::TerminalPrompter;
use linkfix_cli::{logging, session, Cli, ConfigFile, Formatter, RunConfig};
use linkfix_repair::Repairer;
use std::time::Instant;
use tracing::info;

fn main() {
    let start = Instant::now();
    let cli = Cli::parse();
    let formatter = Formatter::new(!cli.no_color);

    let result = run(cli, &formatter);
    println!("{}", formatter.elapsed(start.elapsed()));

    if let Err(e) = result {
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}

fn run(cli: Cli, formatter: &Formatter) -> linkfix_cli::Result<()> {
    let mut file = ConfigFile::load(cli.config.as_deref())?;
    file.apply_overrides(&cli);

    // Fail on an incomplete configuration before anything is written
    let log_dir = RunConfig::from_file(&file)?.log_dir;
    let log_file = logging::init(&log_dir)?;
    info!("Running link fixer, logging to {}", log_file.display());

    let mut prompter = TerminalPrompter::new()?;
    let (config, client) = session::connect(&mut file, &mut prompter, formatter)?;

    let repairer = Repairer::new(config.repair_options()?)?;
    if config.dry_run {
        println!("{}", formatter.warning("Dry run: no item will be changed"));
    }

    let report = repairer.run(&client)?;
    println!("{}", formatter.format_metrics(&report.metrics));

    println!("{}", formatter.format_lock_report(&report.lock_report));
    if !report.lock_report.is_empty() {
        report.lock_report.save(&config.report_path)?;
        println!(
            "{}",
            formatter.warning(&format!(
                "{} locked item(s) written to {}",
                report.lock_report.len(),
                config.report_path.display()
            ))
        );
    }

    if !report.failed_items.is_empty() {
        println!(
            "{}",
            formatter.error(&format!(
                "Patch failed for: {}",
                report.failed_items.join(", ")
            ))
        );
    }

    println!(
        "{}",
        formatter.success(&format!(
            "Fixed {} link(s) on {} item(s)",
            report.metrics.links_fixed, report.metrics.items_patched
        ))
    );
    Ok(())
}
