// Colored terminal output for merged article groups.
//
// This module handles all terminal-specific formatting: colors, table
// layout, the summary line. main.rs delegates display here.

use colored::Colorize;

use crate::article::Article;
use crate::output::truncate_chars;

/// Display the merged, ranked article groups in the terminal.
pub fn display_groups(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles to display.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Article Groups ({} groups) ===", articles.len()).bold()
    );
    println!();

    // Header
    println!(
        "  {:>4}  {:>5}  {:>4}  {:<23}  {}",
        "Rank".dimmed(),
        "Group".dimmed(),
        "Dups".dimmed(),
        "Date range".dimmed(),
        "Description".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    for (i, article) in articles.iter().enumerate() {
        let range = match (article.startdate, article.latestdate) {
            (Some(start), Some(latest)) if start != latest => {
                format!("{start} -> {latest}")
            }
            (Some(start), _) => start.to_string(),
            _ => article.publisheddate.to_string(),
        };

        let snippet = truncate_chars(&article.contentdescription.replace('\n', " | "), 48);
        let dups = if article.duplicates > 1 {
            article.duplicates.to_string().yellow().to_string()
        } else {
            article.duplicates.to_string()
        };

        println!(
            "  {:>4}. {:>5}  {:>4}  {:<23}  {}",
            i + 1,
            article.group,
            dups,
            range,
            snippet,
        );
    }

    println!();

    let merged = articles.iter().filter(|a| a.duplicates > 1).count();
    if merged > 0 {
        println!(
            "  {} {} group(s) merged from multiple articles",
            "*".green(),
            merged
        );
    }
}
