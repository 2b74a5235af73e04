//! Terminal output for the dblp-cite CLI.
//!
//! Colored status lines, a spinner for network calls, and the table and
//! plain renderings of search results.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::{Publication, SearchResponse};
use crate::utils::{is_valid_url, AccessLevel};

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Print a styled status message to stderr, keeping stdout for results.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg),
        Status::Search => eprintln!("{} {}", icon.yellow(), msg),
    }
}

/// Icon for an access tag.
pub fn access_icon(access: AccessLevel) -> &'static str {
    match access {
        AccessLevel::Open => "🔓",
        AccessLevel::Closed => "🔒",
        AccessLevel::Unknown => "·",
    }
}

/// Print search results header.
pub fn print_search_header(response: &SearchResponse, duration: Duration) {
    eprintln!();
    eprintln!(
        "{} Search results for: \"{}\"",
        status_icon(Status::Search).yellow().bold(),
        response.query.cyan().bold()
    );
    eprintln!(
        "{} {} total, showing {}-{} in {:.2}s",
        "─".repeat(30).dimmed(),
        format_number(response.total_hits).green().bold(),
        response.offset + 1,
        response.offset + response.sent_hits,
        duration.as_secs_f64()
    );
    if response.excluded_count > 0 {
        eprintln!(
            "{} {} CoRR preprint entries hidden",
            status_icon(Status::Info).cyan(),
            response.excluded_count
        );
    }
    eprintln!();
}

/// Render publications as a table sized to `width` columns.
pub fn publications_table(publications: &[Publication], width: usize) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width.min(u16::MAX as usize) as u16)
        .set_header(vec!["Type", "Title", "Authors", "Year", "Venue", "DOI", "Access"]);

    for publication in publications {
        let pub_type = publication
            .pub_type
            .map(|t| t.as_str())
            .unwrap_or_default();
        let access = AccessLevel::from_tag(publication.access.as_deref());

        table.add_row(vec![
            Cell::new(pub_type),
            Cell::new(truncate_with_ellipsis(&publication.title, 80)).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&publication.author_line(), 60)),
            Cell::new(&publication.year),
            Cell::new(truncate_with_ellipsis(&publication.venue, 40)),
            Cell::new(&publication.doi),
            Cell::new(access_icon(access)),
        ]);
    }

    table.to_string()
}

/// Render publications as plain text, one block per publication.
pub fn publications_plain(publications: &[Publication]) -> String {
    let mut out = String::new();

    for publication in publications {
        out.push_str(&format!(
            "{} ({})\n  {}\n",
            publication.title,
            publication.year,
            publication.author_line()
        ));
        if !publication.venue.is_empty() {
            out.push_str(&format!("  Venue:  {}\n", publication.venue));
        }
        if let Some(pages) = &publication.pages {
            out.push_str(&format!("  Pages:  {}\n", pages));
        }
        if publication.has_doi() {
            out.push_str(&format!("  DOI:    {}\n", publication.doi));
        }
        if let Some(doi_url) = publication.doi_url.as_deref().filter(|u| is_valid_url(u)) {
            out.push_str(&format!("  Link:   {}\n", doi_url));
        }
        if is_valid_url(&publication.bibtex_link) {
            out.push_str(&format!("  BibTeX: {}\n", publication.bibtex_link));
        }
        out.push('\n');
    }

    out
}

/// Format a number with commas.
pub fn format_number(n: usize) -> String {
    n.to_string()
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut end_idx = 0;
    for (i, (_, w)) in char_widths.iter().enumerate() {
        if current_width + w > max_width - 3 {
            break;
        }
        current_width += w;
        end_idx = i + 1;
    }

    let truncated: String = char_widths[..end_idx].iter().map(|(c, _)| *c).collect();
    format!("{}...", truncated)
}

/// Spinner shown on stderr while a request is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(spinner_style("{spinner:.cyan} {msg}", "⠁⠂⠄⡀⢀⠠⠐⠈ "));
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for quiet mode and pipes.
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb.set_style(spinner_style("{spinner:.red} {msg}", "✗✗"));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Remove the spinner from the terminal.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

fn spinner_style(template: &str, tick_chars: &str) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(template)
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
        .tick_chars(tick_chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicationType;

    fn publication() -> Publication {
        Publication {
            pub_type: Some(PublicationType::Article),
            title: "Test Paper".to_string(),
            perma_link: "https://dblp.org/rec/journals/tse/Smith23".to_string(),
            authors: vec!["John Smith".to_string(), "Alice Brown".to_string()],
            year: "2023".to_string(),
            venue: "TSE 49(3)".to_string(),
            pages: Some("1-20".to_string()),
            doi: "10.1000/xyz".to_string(),
            doi_url: Some("javascript:alert(1)".to_string()),
            bibtex_link: "https://dblp.org/rec/journals/tse/Smith23.bib?param=1".to_string(),
            access: Some("open".to_string()),
        }
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Search), "🔍");
    }

    #[test]
    fn test_access_icon() {
        assert_eq!(access_icon(AccessLevel::Open), "🔓");
        assert_eq!(access_icon(AccessLevel::from_tag(Some("weird"))), "·");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(123), "123");
    }

    #[test]
    fn test_publications_plain() {
        let text = publications_plain(&[publication()]);
        assert!(text.starts_with("Test Paper (2023)\n  John Smith, Alice Brown\n"));
        assert!(text.contains("  Venue:  TSE 49(3)\n"));
        assert!(text.contains("  DOI:    10.1000/xyz\n"));
        assert!(text.contains("  BibTeX: https://dblp.org/rec/journals/tse/Smith23.bib?param=1\n"));
        // Non-http links are never printed
        assert!(!text.contains("javascript:"));
    }

    #[test]
    fn test_publications_table() {
        let table = publications_table(&[publication()], 200);
        assert!(table.contains("Test Paper"));
        assert!(table.contains("article"));
        assert!(table.contains("🔓"));
    }
}
