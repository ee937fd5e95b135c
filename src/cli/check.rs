//! Site contract check command.

use console::style;

use folio::contract::check_document;
use folio_enhance::SiteContent;

use folio::config::Settings;

/// Verify the portfolio document provides what the enhancer binds to.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    let path = settings.document_path();
    let html = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    let content = SiteContent::bundled()?;
    println!(
        "{} Checking {} against {} projects",
        style("→").cyan(),
        path.display(),
        content.projects.len()
    );

    let issues = check_document(&html, &content.projects);
    if issues.is_empty() {
        println!("  {} Portfolio document is complete", style("✓").green());
        return Ok(());
    }

    for issue in &issues {
        eprintln!("  {} {}", style("✗").red(), issue);
    }
    anyhow::bail!("{} contract issue(s) found", issues.len())
}
