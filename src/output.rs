//! Rendering of finished reports for standard output.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, ContentArrangement, Table};
use strum_macros::{Display, EnumString};

use crate::report::{Report, Validity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// One plain-text report per host
    Text,
    /// All reports as a pretty-printed JSON array
    Json,
    /// One table row per host
    Summary,
}

/// Renders `reports` in the requested format.
pub fn render(reports: &[Report], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(reports.iter().map(Report::render_text).collect()),
        OutputFormat::Json => serde_json::to_string_pretty(reports).map(|json| json + "\n"),
        OutputFormat::Summary => Ok(summary_table(reports) + "\n"),
    }
}

fn summary_table(reports: &[Report]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        ["Host", "Status", "Issuer", "Valid until", "Signature Algorithm"]
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan)),
    );

    for report in reports {
        let status = match report.validity {
            Validity::Valid => Cell::new(report.validity).fg(Color::Green),
            Validity::Invalid { crl, ocsp } => {
                Cell::new(format!("{} (crl {}, ocsp {})", report.validity, crl, ocsp))
                    .fg(Color::Red)
            }
        };
        table.add_row(vec![
            Cell::new(&report.host),
            status,
            Cell::new(&report.issuer),
            Cell::new(&report.valid_until),
            Cell::new(&report.signature_algorithm),
        ]);
    }

    table.to_string()
}
