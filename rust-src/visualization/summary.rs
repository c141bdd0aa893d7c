//! Plain-text yearly recap.

use crate::aggregation::WrappedStats;


/// Print the recap to stdout.
pub fn print_summary(stats: &WrappedStats) {
    // Header
    println!("\n{}", "=".repeat(60));
    println!("{:^60}", format!("Claude Code Wrapped {}", stats.year));
    println!("{}\n", "=".repeat(60));

    // Summary Statistics
    println!("SUMMARY");
    println!("{}", "-".repeat(40));
    println!("  Sessions:            {:>15}", format_number(stats.totals.sessions));
    println!("  Messages:            {:>15}", format_number(stats.totals.messages));
    println!("  Prompts:             {:>15}", format_number(stats.totals.prompts));
    println!("  Projects:            {:>15}", format_number(stats.totals.projects));
    println!("  Active Days:         {:>15}", format_number(stats.activity.len() as i64));

    // Tokens
    println!("\nTOKENS");
    println!("{}", "-".repeat(40));
    println!("  Input:               {:>15}", format_number(stats.totals.input_tokens));
    println!("  Output:              {:>15}", format_number(stats.totals.output_tokens));
    println!("  Cache Read:          {:>15}", format_number(stats.totals.cache_read_tokens));
    println!("  Cache Creation:      {:>15}", format_number(stats.totals.cache_creation_tokens));
    println!("  Total:               {:>15}", format_number(stats.totals.total_tokens));

    if stats.totals.cost_available {
        println!("\nCOST");
        println!("{}", "-".repeat(40));
        println!("  Est. Cost (API):     ${:>14}", format_currency(stats.totals.cost_usd));
    }

    // Top Models
    if !stats.top_models.is_empty() {
        println!("\nTOP MODELS");
        println!("{}", "-".repeat(60));
        for rank in &stats.top_models {
            println!(
                "  {:32} {:>12} ({:>3}%)",
                rank.model,
                format_number(rank.output_tokens),
                rank.percent
            );
        }
    }

    // Top Projects
    if !stats.top_projects.is_empty() {
        println!("\nTOP PROJECTS");
        println!("{}", "-".repeat(60));
        for rank in &stats.top_projects {
            println!(
                "  {:32} {:>12} ({:>3}%)",
                rank.name,
                format_number(rank.prompts),
                rank.percent
            );
        }
    }

    // Streaks and highlights
    println!("\nHIGHLIGHTS");
    println!("{}", "-".repeat(40));
    println!("  Longest Streak:      {:>12} days", format_number(stats.streaks.longest));
    println!("  Current Streak:      {:>12} days", format_number(stats.streaks.current));

    if let Some(most) = &stats.most_active_day {
        println!(
            "  Busiest Day:         {} ({} messages)",
            most.display,
            format_number(most.count)
        );
    }
    if stats.weekdays.busiest_count > 0 {
        println!(
            "  Favorite Weekday:    {} ({} messages)",
            stats.weekdays.busiest_name,
            format_number(stats.weekdays.busiest_count)
        );
    }
    if let Some(longest) = &stats.longest_session {
        let minutes = longest.duration_ms / 60_000;
        println!(
            "  Longest Session:     {}h {}m ({} messages)",
            minutes / 60,
            minutes % 60,
            format_number(longest.message_count)
        );
    }

    println!();
}


/// Format a number with commas.
fn format_number(n: i64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}


/// Format currency with 2 decimal places and commas.
fn format_currency(n: f64) -> String {
    let formatted = format!("{:.2}", n);
    let parts: Vec<&str> = formatted.split('.').collect();
    let integer_part = parts[0];
    let decimal_part = parts.get(1).unwrap_or(&"00");

    let mut result = String::new();
    let chars: Vec<char> = integer_part.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    format!("{}.{}", result, decimal_part)
}
