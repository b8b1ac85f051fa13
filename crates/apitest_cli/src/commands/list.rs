//! List command: show registered suites and their tests.

use anyhow::Result;
use console::style;

pub fn run() -> Result<()> {
    for (name, provider) in crate::suites::all() {
        let case = provider()?;
        println!(
            "{} {}",
            style(name).bold(),
            style(format!("({} test(s))", case.test_count())).dim()
        );
        for test in case.test_names() {
            println!("  {}", test);
        }
    }
    Ok(())
}
