use anyhow::{Context, Result};
use blog_kit_content::validate_content;
use std::path::PathBuf;

use super::load_site;

pub fn run(root: PathBuf) -> Result<()> {
    println!("Validating site at: {}", root.display());

    let config = load_site(&root)?;

    println!("✓ blog.toml valid");
    println!("  Site: {} ({})", config.site.title, config.site.url);
    println!(
        "  Locales: {} (default: {})",
        config.locales.locales().join(", "),
        config.locales.default_locale()
    );
    println!();

    let report = validate_content(&config, &root).context("Failed to scan content")?;

    for line in &report.info {
        println!("  {}", line);
    }
    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
    for error in &report.errors {
        eprintln!("  ✗ {}", error);
    }

    println!();
    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!(
        "✅ Content valid ({} warning(s))",
        report.warnings.len()
    );
    Ok(())
}
