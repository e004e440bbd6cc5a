// 📤 CSV export of the current table view
//
// Every field quoted, inner quotes doubled, rows joined by "\n".
// The rows are whatever view the caller passes in (already filtered/sorted).

use crate::error::{PlanBoardError, Result};
use crate::plan::{format_number, Plan};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

pub const CSV_HEADER: [&str; 10] = [
    "Plan Name",
    "Price",
    "Sq Ft",
    "Stories",
    "$/Sq Ft",
    "Last Updated",
    "Company",
    "Community",
    "Type",
    "Price Changed Recently",
];

/// Default download name for a community export
pub fn export_file_name(community: &str) -> String {
    format!("{}-plans.csv", community)
}

fn plan_record(plan: &Plan) -> [String; 10] {
    [
        plan.display_name().to_string(),
        format_number(plan.price),
        format_number(plan.sqft),
        plan.stories.clone(),
        format_number(plan.price_per_sqft),
        plan.last_updated.clone(),
        plan.company.clone(),
        plan.community.clone(),
        plan.plan_type.as_str().to_string(),
        if plan.price_changed_recently { "Yes" } else { "No" }.to_string(),
    ]
}

/// Export a view as CSV text (no trailing newline)
pub fn export_csv(plans: &[Plan]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(plans, &mut buffer)?;

    let mut text = String::from_utf8(buffer)
        .map_err(|e| PlanBoardError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Stream a view as CSV into any writer, one "\n" after every row
pub fn write_csv<W: Write>(plans: &[Plan], writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;
    for plan in plans {
        csv_writer.write_record(plan_record(plan))?;
    }
    csv_writer.flush()?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanType;

    fn sample(name: &str) -> Plan {
        Plan {
            plan_name: name.to_string(),
            price: 389990.0,
            sqft: 2044.0,
            stories: "1".to_string(),
            price_per_sqft: 190.8,
            last_updated: "2024-06-02T08:15:00Z".to_string(),
            price_changed_recently: true,
            company: "Chesmar Homes".to_string(),
            community: "Elevon".to_string(),
            plan_type: PlanType::Plan,
            address: None,
        }
    }

    #[test]
    fn test_header_row() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "\"Plan Name\",\"Price\",\"Sq Ft\",\"Stories\",\"$/Sq Ft\",\"Last Updated\",\
             \"Company\",\"Community\",\"Type\",\"Price Changed Recently\""
        );
    }

    #[test]
    fn test_row_formatting() {
        let csv = export_csv(&[sample("Magnolia")]).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "\"Magnolia\",\"389990\",\"2044\",\"1\",\"190.8\",\"2024-06-02T08:15:00Z\",\
             \"Chesmar Homes\",\"Elevon\",\"plan\",\"Yes\""
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_numbers_render_like_js() {
        let mut odd = sample("Odd");
        odd.price = -0.0;
        odd.sqft = 1e21;
        let csv = export_csv(&[odd]).unwrap();
        let row = csv.split('\n').nth(1).unwrap();
        assert!(row.starts_with("\"Odd\",\"0\",\"1e+21\","));
    }

    #[test]
    fn test_quotes_are_doubled() {
        let csv = export_csv(&[sample("Plan \"A\"")]).unwrap();
        let row = csv.split('\n').nth(1).unwrap();
        assert!(row.starts_with("\"Plan \"\"A\"\"\","));
    }

    #[test]
    fn test_now_listing_uses_address() {
        let mut listing = sample("The Aspen");
        listing.plan_type = PlanType::Now;
        listing.address = Some("12 Pond Ln, Celina".to_string());
        listing.price_changed_recently = false;

        let csv = export_csv(&[listing]).unwrap();
        let row = csv.split('\n').nth(1).unwrap();
        assert!(row.starts_with("\"12 Pond Ln, Celina\","));
        assert!(row.ends_with("\"now\",\"No\""));
    }

    #[test]
    fn test_rows_follow_given_order() {
        let csv = export_csv(&[sample("B"), sample("A")]).unwrap();
        let first_cells: Vec<&str> = csv
            .split('\n')
            .skip(1)
            .map(|row| row.split(',').next().unwrap())
            .collect();
        assert_eq!(first_cells, vec!["\"B\"", "\"A\""]);
    }

    #[test]
    fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name("Elevon"));
        let file = std::fs::File::create(&path).unwrap();
        write_csv(&[sample("Magnolia")], file).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(path.ends_with("Elevon-plans.csv"));
    }
}
