use crate::models::ApplicationRecord;

const CSV_HEADERS: [&str; 12] = [
    "Company",
    "Position",
    "Status",
    "Priority",
    "Applied Date",
    "Location",
    "Salary",
    "Job Type",
    "Contact Name",
    "Contact Email",
    "URL",
    "Created At",
];

/// Render the record sequence as CSV: one header row, then one row per
/// record with every cell double-quote-wrapped. Absent optionals render
/// as an empty quoted string. Rows join with `\n`.
pub fn to_csv(records: &[ApplicationRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for record in records {
        let cells = [
            record.company.as_str(),
            record.position.as_str(),
            record.status.as_str(),
            record.priority.as_str(),
            record.applied_date.as_deref().unwrap_or(""),
            record.location.as_deref().unwrap_or(""),
            record.salary.as_deref().unwrap_or(""),
            record.job_type.map(|jt| jt.as_str()).unwrap_or(""),
            record.contact_name.as_deref().unwrap_or(""),
            record.contact_email.as_deref().unwrap_or(""),
            record.url.as_deref().unwrap_or(""),
            record.created_at.as_str(),
        ];
        let row: Vec<String> = cells.iter().map(|cell| format!("\"{cell}\"")).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Self-contained HTML report over the same record sequence the core
/// produces: generation timestamp, total count, and a six-column table.
/// Presentation artifact only.
pub fn to_report(records: &[ApplicationRecord]) -> String {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    let mut rows = String::new();
    for record in records {
        rows.push_str(&format!(
            "          <tr>\n            <td>{}</td>\n            <td>{}</td>\n            <td>{}</td>\n            <td>{}</td>\n            <td>{}</td>\n            <td>{}</td>\n          </tr>\n",
            record.company,
            record.position,
            record.status,
            record.priority,
            record.applied_date.as_deref().unwrap_or("N/A"),
            record.location.as_deref().unwrap_or("N/A"),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Job Applications Report</title>
    <style>
      body {{ font-family: Arial, sans-serif; margin: 20px; }}
      h1 {{ color: #333; }}
      table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
      th, td {{ border: 1px solid #ddd; padding: 12px; text-align: left; }}
      th {{ background-color: #4CAF50; color: white; }}
      tr:nth-child(even) {{ background-color: #f2f2f2; }}
    </style>
  </head>
  <body>
    <h1>Job Applications Report</h1>
    <p>Generated on: {generated}</p>
    <p>Total Applications: {total}</p>
    <table>
      <thead>
        <tr>
          <th>Company</th>
          <th>Position</th>
          <th>Status</th>
          <th>Priority</th>
          <th>Applied Date</th>
          <th>Location</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
  </body>
</html>
"#,
        generated = generated,
        total = records.len(),
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobType, Priority, Status};

    fn record() -> ApplicationRecord {
        ApplicationRecord {
            id: "app-1-abcdefghi".to_string(),
            company: "Acme".to_string(),
            position: "Eng".to_string(),
            status: Status::Applied,
            priority: Priority::High,
            applied_date: Some("2026-08-01".to_string()),
            location: Some("Berlin".to_string()),
            salary: None,
            job_type: Some(JobType::FullTime),
            description: None,
            notes: None,
            url: None,
            contact_email: None,
            contact_name: Some("Dana".to_string()),
            next_follow_up: None,
            created_at: "2026-08-01T09:00:00.000Z".to_string(),
            updated_at: "2026-08-01T09:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn csv_has_header_and_one_quoted_row_per_record() {
        let csv = to_csv(&[record()]);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Company,Position,Status,Priority,Applied Date,Location,Salary,Job Type,Contact Name,Contact Email,URL,Created At"
        );

        let cells: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(cells.len(), 12);
        assert!(cells.iter().all(|c| c.starts_with('"') && c.ends_with('"')));
        assert_eq!(cells[0], "\"Acme\"");
        assert_eq!(cells[2], "\"applied\"");
        assert_eq!(cells[7], "\"full-time\"");
        // Absent optionals are empty quoted strings.
        assert_eq!(cells[6], "\"\"");
        assert_eq!(cells[10], "\"\"");
    }

    #[test]
    fn csv_of_empty_set_is_header_only() {
        assert_eq!(to_csv(&[]).split('\n').count(), 1);
    }

    #[test]
    fn report_carries_total_and_record_rows() {
        let report = to_report(&[record()]);
        assert!(report.contains("Total Applications: 1"));
        assert!(report.contains("<td>Acme</td>"));
        assert!(report.contains("<td>applied</td>"));
        assert!(report.contains("Generated on: "));
    }

    #[test]
    fn report_renders_absent_fields_as_na() {
        let mut r = record();
        r.applied_date = None;
        r.location = None;
        let report = to_report(&[r]);
        assert!(report.contains("<td>N/A</td>"));
    }
}
