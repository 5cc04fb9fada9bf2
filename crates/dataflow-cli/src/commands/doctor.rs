//! Doctor command implementation
//!
//! Checks system dependencies and configuration.

use anyhow::Result;
use colored::Colorize;
use std::env;
use std::process::{Command, ExitCode};

use dataflow_generator::{Resolver, ResolverConfig, PRIMARY_COMMAND};

/// Run the doctor command
///
/// Checks:
/// - uvx availability (report-only, no bootstrap)
/// - Python runtime for the indirect launcher fallback
/// - Output directory permissions
/// - Version information
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run() -> Result<ExitCode> {
    println!("{}", "DataFlow Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let mut all_ok = true;

    // Check 1: versions
    println!("{}", "Versions:".bold());
    println!(
        "  {} dataflow-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    match get_rustc_version() {
        Some(version) => {
            println!("  {} rustc {}", "->".green(), version);
        }
        None => {
            println!("  {} rustc (not found)", "->".yellow());
        }
    }

    println!();

    // Check 2: generator tool launcher
    println!("{}", "Dependencies:".bold());
    let resolver = Resolver::with_config(ResolverConfig::default().bootstrap(false));
    match resolver.find_uvx() {
        Some(path) => {
            println!(
                "  {} {} (found at {})",
                "ok".green(),
                PRIMARY_COMMAND,
                path.display()
            );
        }
        None => {
            println!("  {} {} not found", "!!".yellow(), PRIMARY_COMMAND);
            println!(
                "     {}",
                "The first generation request will try to install it automatically.".dimmed()
            );
            println!(
                "     {}",
                "To install now, see https://docs.astral.sh/uv/".dimmed()
            );
            // Not a hard failure - bootstrap and the indirect launcher remain
        }
    }

    let python = if cfg!(windows) { "python" } else { "python3" };
    match which::which(python) {
        Ok(path) => {
            println!("  {} {} ({})", "ok".green(), python, path.display());
        }
        Err(_) => {
            println!("  {} {} not found", "!!".yellow(), python);
            println!(
                "     {}",
                "Only needed for the indirect launcher fallback when uvx is missing.".dimmed()
            );
        }
    }

    println!();

    // Check 3: output directory permissions
    println!("{}", "Permissions:".bold());
    let current_dir = env::current_dir();
    match current_dir {
        Ok(dir) => {
            let test_file = dir.join(".dataflow_write_test");
            match std::fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = std::fs::remove_file(&test_file);
                    println!(
                        "  {} Current directory is writable ({})",
                        "ok".green(),
                        dir.display()
                    );
                }
                Err(e) => {
                    println!("  {} Cannot write to current directory: {}", "!!".red(), e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }

    println!();

    // Summary
    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

fn parse_rustc_version(output: &str) -> Option<String> {
    // Parse "rustc 1.75.0 (..."
    output.split_whitespace().nth(1).map(|s| s.to_string())
}

/// Get the rustc version
fn get_rustc_version() -> Option<String> {
    let output = Command::new("rustc").arg("--version").output().ok()?;

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_rustc_version(&stdout)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rustc_version() {
        let out = "rustc 1.75.0 (82e1608df 2023-12-21)\n";
        assert_eq!(parse_rustc_version(out).as_deref(), Some("1.75.0"));
        assert_eq!(parse_rustc_version("rustc\n"), None);
    }
}
