use std::fmt::Write;

use super::{escape, layout};
use crate::import::ImportReport;

/// Summary page for a CSV import, listing each rejected row.
#[must_use]
pub fn import_report(report: &ImportReport) -> String {
    let mut body = format!(
        "<h1>Match import</h1>\n<p>Imported {} matches, {} rows failed.</p>\n",
        report.imported,
        report.errors.len()
    );

    if !report.errors.is_empty() {
        body.push_str("<ul>\n");
        for err in &report.errors {
            let _ = writeln!(body, "<li>{}</li>", escape(&err.to_string()));
        }
        body.push_str("</ul>\n");
    }
    body.push_str("<p><a href=\"/dashboard\">Go to dashboard</a></p>");

    layout("Match import", &body)
}

#[must_use]
pub fn dummy_matches_added(inserted: usize) -> String {
    layout(
        "Sample matches",
        &format!(
            "<h1>Sample matches added</h1>\n<p>Inserted {inserted} matches.</p>\n\
             <p><a href=\"/dashboard\">Go to dashboard</a></p>"
        ),
    )
}
