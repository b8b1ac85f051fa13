//! Run command: execute suites and render the report.

use anyhow::Result;
use apitest_core::{Config, RunContext, RunOutcome, TestContext};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Runs the bundled suites, optionally filtered to one by name.
///
/// Returns `true` when every test passed.
pub fn run(suite: Option<&str>, format: &str, timeout: Option<u64>) -> Result<bool> {
    let mut providers = crate::suites::all();
    if let Some(name) = suite {
        providers.retain(|(suite_name, _)| *suite_name == name);
        if providers.is_empty() {
            anyhow::bail!("unknown suite '{}'. Use 'apitest list' to see what is registered.", name);
        }
    }

    let context = TestContext::from_providers(providers.into_iter().map(|(_, provider)| provider))?;

    let config = Config::load(Path::new("."))?;
    if !config.report.color {
        console::set_colors_enabled(false);
    }
    let mut run_ctx = RunContext::from_config(&config)?;
    // The --timeout flag overrides the configured default budget.
    if let Some(secs) = timeout {
        run_ctx = run_ctx.with_default_timeout(Duration::from_secs(secs));
    }

    let started_at = chrono::Local::now();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Running {} suite(s)...", context.case_count()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = context.run(&run_ctx);

    spinner.finish_and_clear();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome.report())?),
        _ => render_text(&outcome, started_at, config.report.show_failures),
    }

    Ok(outcome.result.failed == 0)
}

fn render_text(
    outcome: &RunOutcome,
    started_at: chrono::DateTime<chrono::Local>,
    show_failures: bool,
) {
    let result = &outcome.result;

    println!();
    println!("{}", style("API Test Report:").bold());
    println!(
        "  Started:      {}",
        style(started_at.format("%Y-%m-%d %H:%M:%S")).dim()
    );
    println!("  Total tests:  {}", style(result.total).cyan());
    println!("  Passed:       {}", style(result.passed).green());
    if result.failed > 0 {
        println!("  Failed:       {}", style(result.failed).red());
    } else {
        println!("  Failed:       {}", style(result.failed).dim());
    }
    println!(
        "  Pass rate:    {}",
        style(format!("{:.2}%", result.pass_rate())).yellow()
    );
    println!(
        "  Elapsed:      {}",
        style(format!("{:.2}s", result.elapsed.as_secs_f64())).cyan()
    );

    for case in &outcome.cases {
        if !show_failures || case.failures.is_empty() {
            continue;
        }
        println!();
        println!("{}", style(format!("Failures in '{}':", case.name)).bold());
        for failure in &case.failures {
            println!(
                "  {} {}: {}",
                style("×").red(),
                style(&failure.test).bold(),
                failure.message
            );
        }
    }

    println!();
    if result.failed > 0 {
        println!(
            "{} {} of {} test(s) failed",
            style("×").red(),
            result.failed,
            result.total
        );
    } else {
        println!(
            "{} {}",
            style("✓").green(),
            style("all tests passed").green()
        );
    }
}
