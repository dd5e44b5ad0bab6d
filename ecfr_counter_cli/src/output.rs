use anyhow::Result;
use ecfr_counter_lib::{AgencyTotal, RefreshReport, SearchSummary};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown names fall back to a table.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "md" | "markdown" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "Agency")]
    agency: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Rows")]
    rows: usize,
    #[tabled(rename = "Words")]
    words: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

// -- Row builders --

fn build_total_rows(totals: &[AgencyTotal]) -> Vec<TotalRow> {
    totals
        .iter()
        .map(|t| TotalRow {
            agency: t.agency_name.clone(),
            slug: t.agency_slug.clone(),
            rows: t.rows,
            words: format_count(t.word_count),
        })
        .collect()
}

fn metric(metric: &'static str, value: impl ToString) -> MetricRow {
    MetricRow {
        metric,
        value: value.to_string(),
    }
}

fn build_refresh_rows(report: &RefreshReport) -> Vec<MetricRow> {
    let stats = &report.stats;
    let requests = &report.requests;
    vec![
        metric("Reference date", &report.reference_date),
        metric("Agencies", report.agencies),
        metric("Units", stats.units),
        metric("Counted", stats.counted),
        metric("Unchanged", stats.unchanged),
        metric("Skipped", stats.skipped),
        metric("Failed", stats.failed),
        metric("Rows written", report.results_written),
        metric("Requests", requests.requests_made),
        metric("Rate limited", requests.requests_rate_limited),
        metric(
            "Backoff",
            format!("{:.1}s", requests.total_backoff.as_secs_f64()),
        ),
    ]
}

// -- Table output --

pub fn print_totals_table(totals: &[AgencyTotal]) {
    println!("{}", Table::new(build_total_rows(totals)));
}

pub fn print_refresh_report(report: &RefreshReport) {
    println!("{}", Table::new(build_refresh_rows(report)));
}

pub fn print_search_summary(summary: &SearchSummary) {
    println!(
        "'{}' appears {} times across {} search excerpts",
        summary.query, summary.occurrences, summary.excerpts
    );
}

// -- Markdown output --

pub fn print_totals_markdown(totals: &[AgencyTotal]) {
    let mut table = Table::new(build_total_rows(totals));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_totals_csv(totals: &[AgencyTotal]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for total in totals {
        wtr.serialize(total)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Groups digits in threes: `1234567` -> `1,234,567`.
fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
