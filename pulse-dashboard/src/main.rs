use std::path::PathBuf;
use std::process;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Parser;

use pulse_pipeline::transactions_loader::load_transactions_file;
use pulse_pipeline::types::{DashboardQuery, DashboardReport, RfmRecord};
use pulse_pipeline::{DashboardConfig, DashboardPipeline, Dataset, PulseError};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// E-commerce dashboard: revenue, volume, status, cancellation and RFM tables
/// for a filtered slice of an order-line export.
#[derive(Parser, Debug)]
#[command(name = "pulse-dashboard", version)]
struct Args {
    /// Order-line CSV export.
    #[arg(env = "PULSE_DATASET", default_value = "all_data.csv")]
    dataset: PathBuf,

    /// Comma-separated customer regions to keep (default: all).
    #[arg(long, value_delimiter = ',')]
    regions: Vec<String>,

    /// Comma-separated product categories to keep (default: all).
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,

    /// First purchase date to include, YYYY-MM-DD (default: earliest in data).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last purchase date to include, YYYY-MM-DD (default: latest in data).
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Length of the top and bottom category lists.
    #[arg(long, default_value_t = 10)]
    top_categories: usize,

    /// Length of each RFM customer leaderboard.
    #[arg(long, default_value_t = 5)]
    top_customers: usize,

    /// Print the selectable regions, categories and date bounds, then exit.
    #[arg(long)]
    list_options: bool,

    /// Output as JSON instead of formatted text.
    #[arg(long)]
    json: bool,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format an amount as Brazilian reais: `R$ 1.234,56`.
fn format_brl(amount: f64) -> String {
    if amount.is_nan() {
        return "n/a".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, group_thousands(cents / 100, '.'), cents % 100)
}

/// Format an integer with a thousands separator.
fn group_thousands(value: u64, separator: char) -> String {
    let s = value.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

fn format_metric(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

fn print_section(title: &str) {
    println!();
    println!("  {}", title);
    println!("  {:\u{2500}<64}", "");
}

fn print_customers(title: &str, customers: &[RfmRecord], value: impl Fn(&RfmRecord) -> String) {
    println!("  {}", title);
    if customers.is_empty() {
        println!("       (no customers)");
    }
    for (i, c) in customers.iter().enumerate() {
        println!("    {}. {:34} {:>16}", i + 1, c.customer_unique_id, value(c));
    }
}

fn print_human(report: &DashboardReport, total_rows: usize, load_ms: u128, pipeline_ms: u128) {
    println!();
    println!("  E-Commerce Data Analysis Dashboard");
    println!("  {:\u{2550}<64}", "");

    let range = report
        .date_range
        .map(|r| format!("{} to {}", r.start, r.end))
        .unwrap_or_else(|| "all dates".to_string());
    let regions = if report.regions.is_empty() {
        "all".to_string()
    } else {
        report.regions.join(", ")
    };
    let categories = if report.categories.is_empty() {
        "all".to_string()
    } else {
        report.categories.join(", ")
    };
    println!(
        "  Dates: {}  \u{00b7}  Regions: {}  \u{00b7}  Categories: {}",
        range, regions, categories
    );
    println!(
        "  {} rows loaded  \u{00b7}  {} kept  \u{00b7}  {} filtered out",
        total_rows, report.rows_kept, report.rows_filtered_out
    );

    print_section("Highest revenue categories (BRL, price only)");
    for (i, c) in report.category_revenue.top.iter().enumerate() {
        println!("    {:>2}. {:40} {:>18}", i + 1, c.category, format_brl(c.revenue));
    }
    print_section("Lowest revenue categories (BRL, price only)");
    for (i, c) in report.category_revenue.bottom.iter().enumerate() {
        println!("    {:>2}. {:40} {:>18}", i + 1, c.category, format_brl(c.revenue));
    }

    print_section("Orders per month (line items)");
    for m in &report.monthly_volume {
        println!("    {}  {:>8}", m.year_month, group_thousands(m.line_items as u64, '.'));
    }

    print_section("Order status distribution");
    for s in &report.status_distribution {
        println!("    {:20} {:>8}", s.status, group_thousands(s.count as u64, '.'));
    }

    print_section("Cancellations by region");
    if report.cancellations_by_region.is_empty() {
        println!("    No cancellations in this selection.");
    }
    for r in &report.cancellations_by_region {
        println!("    {:20} {:>8}", r.region, r.canceled);
    }

    let rfm = &report.rfm;
    print_section("Customers by Recency, Frequency and Monetary");
    println!(
        "    Average Recency (days): {}  \u{00b7}  Average Frequency: {}  \u{00b7}  Average Monetary: {}",
        format_metric(rfm.summary.avg_recency, 1),
        format_metric(rfm.summary.avg_frequency, 2),
        format_brl(rfm.summary.avg_monetary)
    );
    println!();
    print_customers("Top customers by Recency", &rfm.leaders.by_recency, |c| {
        format!("{} days", c.recency_days)
    });
    print_customers("Top customers by Frequency", &rfm.leaders.by_frequency, |c| {
        format!("{} orders", c.frequency)
    });
    print_customers("Top customers by Monetary", &rfm.leaders.by_monetary, |c| {
        format_brl(c.monetary)
    });

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Pipeline ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        pipeline_ms,
        load_ms + pipeline_ms
    );
    println!();
}

fn print_options(dataset: &Dataset) {
    match dataset.date_bounds() {
        Some(bounds) => println!("Dates: {} to {}", bounds.start, bounds.end),
        None => println!("Dates: (empty dataset)"),
    }
    println!("Regions: {}", dataset.regions().join(", "));
    println!("Categories: {}", dataset.categories().join(", "));
}

/// Warn about selections that match nothing; they are legal but yield empty tables.
fn warn_unknown(kind: &str, selected: &[String], available: &[String]) {
    for value in selected.iter().filter(|v| !available.contains(v)) {
        log::warn!("{} '{}' does not occur in the dataset", kind, value);
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    // Load the dataset once; nothing is shown without it.
    let load_start = Instant::now();
    let load = match load_transactions_file(&args.dataset) {
        Ok(load) => load,
        Err(PulseError::DatasetNotFound { path }) => {
            eprintln!(
                "Error: file '{}' not found. Make sure it exists in the expected directory.",
                path
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();
    let dataset = Dataset::new(load.lines);
    let total_rows = dataset.len();

    if args.list_options {
        print_options(&dataset);
        return;
    }

    warn_unknown("region", &args.regions, &dataset.regions());
    warn_unknown("category", &args.categories, &dataset.categories());

    let config = DashboardConfig {
        category_limit: args.top_categories,
        customer_limit: args.top_customers,
        ..DashboardConfig::default()
    };

    let pipeline_start = Instant::now();
    let pipeline = DashboardPipeline::with_config(dataset, config);
    let query = DashboardQuery {
        request_id: "dashboard-001".into(),
        start_date: args.start,
        end_date: args.end,
        regions: args.regions,
        categories: args.categories,
    };
    let report = match pipeline.run(query).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error running dashboard pipeline: {}", e);
            process::exit(1);
        }
    };
    let pipeline_ms = pipeline_start.elapsed().as_millis();

    if args.json {
        match report.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_human(&report, total_rows, load_ms, pipeline_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brl_uses_dot_thousands_and_comma_decimals() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_brl(-12.3), "-R$ 12,30");
        assert_eq!(format_brl(f64::NAN), "n/a");
    }

    #[test]
    fn metric_formatting_handles_nan() {
        assert_eq!(format_metric(2.5, 1), "2.5");
        assert_eq!(format_metric(f64::NAN, 2), "n/a");
    }

    #[test]
    fn args_parse_comma_lists_and_dates() {
        let args = Args::parse_from([
            "pulse-dashboard",
            "data.csv",
            "--regions",
            "SP,RJ",
            "--start",
            "2018-01-01",
            "--json",
        ]);
        assert_eq!(args.dataset, PathBuf::from("data.csv"));
        assert_eq!(args.regions, vec!["SP", "RJ"]);
        assert!(args.categories.is_empty());
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2018, 1, 1));
        assert!(args.end.is_none());
        assert!(args.json);
        assert_eq!(args.top_categories, 10);
    }
}
