//! Report fixtures shared by the integration tests

#![allow(dead_code)]

use report_compare::schema::Schema;
use report_compare::table::{ReportTable, Row};

/// Header of the fixture reports, in the layout the benchmark runner writes.
pub const HEADER: &str = ",Page,Browser,OS,Iterations,Duration,Joules,Joules CI,Watts,Watts CI,Joules Impact";

/// Route library logs to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A three-page, three-browser energy report.
///
/// - `news`: the baseline is clearly cheaper than both other browsers
/// - `search`: the baseline sits between the two others
/// - `video`: the baseline is the most expensive
pub fn energy_report_csv() -> String {
    let rows = [
        ("news", "Firefox 120", 10.0, 0.2, 2.0, 0.1),
        ("news", "Chrome 119", 14.0, 0.3, 2.5, 0.1),
        ("news", "Safari 17", 13.0, 0.4, 2.4, 0.2),
        ("search", "Firefox 120", 5.0, 0.2, 1.0, 0.05),
        ("search", "Chrome 119", 5.1, 0.2, 1.1, 0.05),
        ("search", "Safari 17", 4.0, 0.2, 0.9, 0.05),
        ("video", "Firefox 120", 30.0, 0.5, 4.0, 0.2),
        ("video", "Chrome 119", 25.0, 0.5, 3.9, 0.2),
        ("video", "Safari 17", 20.0, 0.5, 3.0, 0.2),
    ];

    let mut csv = String::from(HEADER);
    csv.push('\n');
    for (index, (page, browser, joules, joules_ci, watts, watts_ci)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},linux,30,60.0,{},{},{},{},0.0\n",
            index, page, browser, joules, joules_ci, watts, watts_ci
        ));
    }
    csv
}

pub fn energy_report() -> ReportTable {
    ReportTable::from_csv_str(&energy_report_csv(), ',').expect("fixture report parses")
}

/// `pages` page groups of Firefox and Chrome rows with distinct `Load` means.
pub fn two_browser_report(pages: usize) -> ReportTable {
    let mut rows = Vec::with_capacity(pages * 2);
    for page in 0..pages {
        let name = format!("page-{:02}", page);
        let offset = page as f64 * 3.0;
        rows.push(Row::new(&name, "Firefox", 20).with_metric("Load", 100.0 + offset, 2.0));
        rows.push(Row::new(&name, "Chrome", 20).with_metric("Load", 104.0 - offset, 2.0));
    }
    ReportTable::new(Schema::for_metrics(["Load"]), rows).expect("fixture table is valid")
}
