//! Shareable wrapped card rendering.
//!
//! The card is laid out as a hand-built SVG string and rasterized to PNG via
//! resvg. Layout is fixed; only the numbers vary.

use std::path::Path;

use anyhow::{Context, Result};

use crate::aggregation::WrappedStats;


// Claude UI color scheme
const CLAUDE_BG: &str = "#262624";
const CLAUDE_TEXT: &str = "#FAF9F5";
const CLAUDE_TEXT_SECONDARY: &str = "#C2C0B7";
const CLAUDE_DARK_GREY: &str = "#3C3C3A";
const CLAUDE_ORANGE: &str = "#CB7B5D";
const CLAUDE_ORANGE_RGB: (u8, u8, u8) = (203, 123, 93);

const CARD_WIDTH: i32 = 640;
const CARD_HEIGHT: i32 = 840;
const MARGIN: i32 = 36;
const BAR_MAX_WIDTH: i32 = 240;


/// Export the card as SVG.
pub fn export_card_svg(stats: &WrappedStats, output_path: &Path) -> Result<()> {
    let svg_content = generate_svg(stats);

    std::fs::write(output_path, svg_content)
        .with_context(|| format!("Failed to write SVG to {}", output_path.display()))?;

    Ok(())
}


/// Export the card as PNG.
pub fn export_card_png(stats: &WrappedStats, output_path: &Path) -> Result<()> {
    let svg_content = generate_svg(stats);

    let tree = resvg::usvg::Tree::from_str(&svg_content, &resvg::usvg::Options::default())
        .context("Failed to parse SVG")?;

    let size = tree.size();
    let width = size.width() as u32;
    let height = size.height() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .context("Failed to create pixmap")?;

    let bg = hex_to_rgb(CLAUDE_BG);
    pixmap.fill(tiny_skia::Color::from_rgba8(bg.0, bg.1, bg.2, 255));

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .save_png(output_path)
        .with_context(|| format!("Failed to save PNG to {}", output_path.display()))?;

    Ok(())
}


/// Generate the card SVG.
fn generate_svg(stats: &WrappedStats) -> String {
    let mut svg_parts = vec![
        format!(
            r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">"#,
            CARD_WIDTH, CARD_HEIGHT
        ),
        "<style>".to_string(),
        format!("  .title {{ fill: {}; font: bold 26px -apple-system, sans-serif; }}", CLAUDE_TEXT),
        format!("  .subtitle {{ fill: {}; font: 14px -apple-system, sans-serif; }}", CLAUDE_TEXT_SECONDARY),
        format!("  .headline {{ fill: {}; font: bold 52px -apple-system, sans-serif; }}", CLAUDE_ORANGE),
        format!("  .kpi-value {{ fill: {}; font: bold 24px -apple-system, sans-serif; }}", CLAUDE_TEXT),
        format!("  .kpi-label {{ fill: {}; font: 12px -apple-system, sans-serif; }}", CLAUDE_TEXT_SECONDARY),
        format!("  .row-name {{ fill: {}; font: 14px -apple-system, sans-serif; }}", CLAUDE_TEXT),
        format!("  .row-detail {{ fill: {}; font: 12px -apple-system, sans-serif; }}", CLAUDE_TEXT_SECONDARY),
        format!("  .section {{ fill: {}; font: bold 13px -apple-system, sans-serif; letter-spacing: 2px; }}", CLAUDE_TEXT_SECONDARY),
        "</style>".to_string(),
        format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            CARD_WIDTH, CARD_HEIGHT, CLAUDE_BG
        ),
    ];

    // Header: Clawd icon + title
    svg_parts.push(generate_clawd_svg(MARGIN, 30, 4));
    svg_parts.push(format!(
        r#"<text x="{}" y="52" class="title">Claude Code Wrapped</text>"#,
        MARGIN + 44
    ));
    svg_parts.push(format!(
        r#"<text x="{}" y="52" text-anchor="end" class="title">{}</text>"#,
        CARD_WIDTH - MARGIN,
        stats.year
    ));

    // Headline: total tokens
    svg_parts.push(format!(
        r#"<text x="{}" y="140" class="headline">{}</text>"#,
        MARGIN,
        format_number(stats.totals.total_tokens)
    ));
    svg_parts.push(format!(
        r#"<text x="{}" y="164" class="subtitle">tokens this year</text>"#,
        MARGIN
    ));

    // KPI row
    let mut kpis = vec![
        (format_number(stats.totals.sessions), "sessions"),
        (format_number(stats.totals.messages), "messages"),
        (format_number(stats.totals.prompts), "prompts"),
        (format_number(stats.totals.projects), "projects"),
    ];
    if stats.totals.cost_available {
        kpis.push((format!("${:.0}", stats.totals.cost_usd), "est. API cost"));
    }
    let kpi_width = (CARD_WIDTH - 2 * MARGIN) / kpis.len() as i32;
    for (i, (value, label)) in kpis.iter().enumerate() {
        let x = MARGIN + i as i32 * kpi_width;
        svg_parts.push(format!(
            r#"<text x="{}" y="220" class="kpi-value">{}</text>"#,
            x, value
        ));
        svg_parts.push(format!(
            r#"<text x="{}" y="240" class="kpi-label">{}</text>"#,
            x, label
        ));
    }

    // Top models
    let mut y = 300;
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="section">TOP MODELS</text>"#,
        MARGIN, y
    ));
    y += 24;
    for rank in &stats.top_models {
        svg_parts.push(ranked_row(
            MARGIN,
            y,
            &short_model_name(&rank.model),
            &format!("{} output tokens", format_number(rank.output_tokens)),
            rank.percent,
        ));
        y += 44;
    }

    // Top projects
    y += 20;
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="section">TOP PROJECTS</text>"#,
        MARGIN, y
    ));
    y += 24;
    for rank in &stats.top_projects {
        svg_parts.push(ranked_row(
            MARGIN,
            y,
            &rank.name,
            &format!("{} prompts", format_number(rank.prompts)),
            rank.percent,
        ));
        y += 44;
    }

    // Highlights
    y += 20;
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="section">HIGHLIGHTS</text>"#,
        MARGIN, y
    ));
    y += 26;
    let mut highlights: Vec<String> = vec![
        format!("Longest streak: {} days", stats.streaks.longest),
        format!("Current streak: {} days", stats.streaks.current),
    ];
    if let Some(most) = &stats.most_active_day {
        highlights.push(format!(
            "Busiest day: {} ({} messages)",
            most.display,
            format_number(most.count)
        ));
    }
    if stats.weekdays.busiest_count > 0 {
        highlights.push(format!("Favorite weekday: {}", stats.weekdays.busiest_name));
    }
    if let Some(longest) = &stats.longest_session {
        highlights.push(format!(
            "Longest session: {} ({} messages)",
            format_duration(longest.duration_ms),
            format_number(longest.message_count)
        ));
    }
    for line in highlights {
        svg_parts.push(format!(
            r#"<text x="{}" y="{}" class="row-name">{}</text>"#,
            MARGIN, y, line
        ));
        y += 24;
    }

    // Weekday bars along the bottom
    let chart_top = CARD_HEIGHT - 150;
    let max_count = stats.weekdays.counts.iter().copied().max().unwrap_or(0).max(1);
    let slot = (CARD_WIDTH - 2 * MARGIN) / 7;
    for (i, count) in stats.weekdays.counts.iter().enumerate() {
        let bar_height = ((*count as f64 / max_count as f64) * 70.0) as i32;
        let x = MARGIN + i as i32 * slot;
        let color = if i == stats.weekdays.busiest_index && *count > 0 {
            CLAUDE_ORANGE
        } else {
            CLAUDE_DARK_GREY
        };
        svg_parts.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="3" fill="{}"/>"#,
            x,
            chart_top + 70 - bar_height,
            slot - 10,
            bar_height.max(2),
            color
        ));
        svg_parts.push(format!(
            r#"<text x="{}" y="{}" class="kpi-label">{}</text>"#,
            x,
            chart_top + 90,
            weekday_abbrev(i)
        ));
    }

    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="subtitle">claude-wrapped</text>"#,
        MARGIN,
        CARD_HEIGHT - 20
    ));

    svg_parts.push("</svg>".to_string());

    svg_parts.join("\n")
}


/// One ranked line: name, detail, and a percentage bar.
fn ranked_row(x: i32, y: i32, name: &str, detail: &str, percent: i64) -> String {
    let bar_width = ((percent.clamp(0, 100) as f64 / 100.0) * BAR_MAX_WIDTH as f64) as i32;
    let bar_x = CARD_WIDTH - MARGIN - BAR_MAX_WIDTH - 40;

    let mut parts = vec![
        format!(r#"<text x="{}" y="{}" class="row-name">{}</text>"#, x, y, escape(name)),
        format!(
            r#"<text x="{}" y="{}" class="row-detail">{}</text>"#,
            x,
            y + 16,
            detail
        ),
        format!(
            r#"<rect x="{}" y="{}" width="{}" height="8" rx="4" fill="{}"/>"#,
            bar_x,
            y - 2,
            BAR_MAX_WIDTH,
            CLAUDE_DARK_GREY
        ),
    ];
    if bar_width > 0 {
        parts.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="8" rx="4" fill="{}"/>"#,
            bar_x,
            y - 2,
            bar_width,
            CLAUDE_ORANGE
        ));
    }
    parts.push(format!(
        r#"<text x="{}" y="{}" text-anchor="end" class="row-name">{}%</text>"#,
        CARD_WIDTH - MARGIN,
        y + 4,
        percent
    ));

    parts.join("\n")
}


/// Generate SVG for Claude guy (Clawd) icon.
fn generate_clawd_svg(x: i32, y: i32, pixel_size: i32) -> String {
    let orange = format!(
        "rgb({},{},{})",
        CLAUDE_ORANGE_RGB.0, CLAUDE_ORANGE_RGB.1, CLAUDE_ORANGE_RGB.2
    );
    let dark_grey = CLAUDE_DARK_GREY;

    // Pixel grid: 1 = orange, 0 = transparent, 2 = dark grey (eyes)
    let grid = [
        [1, 1, 1, 1, 1, 1, 1, 1],
        [0, 1, 2, 1, 1, 2, 1, 0],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [0, 1, 1, 0, 0, 1, 1, 0],
    ];

    let mut parts = Vec::new();
    for (row_idx, row) in grid.iter().enumerate() {
        for (col_idx, &pixel_type) in row.iter().enumerate() {
            if pixel_type == 0 {
                continue;
            }

            let color = if pixel_type == 1 { &orange } else { dark_grey };
            let px = x + (col_idx as i32 * pixel_size);
            let py = y + (row_idx as i32 * pixel_size);

            parts.push(format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                px, py, pixel_size, pixel_size, color
            ));
        }
    }

    parts.join("\n")
}


/// Weekday abbreviation, Sunday first.
fn weekday_abbrev(index: usize) -> &'static str {
    match index {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "",
    }
}


/// Strip the vendor prefix and date suffix from a model id for display.
fn short_model_name(model: &str) -> String {
    let trimmed = model.strip_prefix("claude-").unwrap_or(model);
    let mut parts: Vec<&str> = trimmed.split('-').collect();
    if let Some(last) = parts.last() {
        if last.len() == 8 && last.chars().all(|c| c.is_ascii_digit()) {
            parts.pop();
        }
    }
    parts.join("-")
}


/// Escape text destined for SVG content.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}


/// Format number with suffix.
fn format_number(num: i64) -> String {
    if num >= 1_000_000_000 {
        format!("{:.1}B", num as f64 / 1_000_000_000.0)
    } else if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        format!("{}", num)
    }
}


/// Format a millisecond duration as hours and minutes.
fn format_duration(ms: i64) -> String {
    let minutes = ms / 60_000;
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}


/// Convert hex color to RGB tuple.
fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    (r, g, b)
}


/// Open file with default application.
pub fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    Ok(())
}
