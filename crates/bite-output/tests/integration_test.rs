//! Integration tests for panel export and summary.

use bite_output::{ExportFormat, Exporter, PanelExport, PanelSummary};
use bite_panel::{PanelRow, QuarterlyAreaPanel};

fn panel() -> QuarterlyAreaPanel {
    let rows = (1..=4)
        .flat_map(|qtr| {
            ["72001", "72003"].into_iter().map(move |area| PanelRow {
                year: 2023,
                qtr,
                area_fips: area.to_string(),
                total_employment: 100.0,
                total_wages: 520_000.0,
                avg_weekly_wage: 400.0,
                min_wage: 340.0,
                k_index: 0.85,
            })
        })
        .collect();
    QuarterlyAreaPanel::new(rows)
}

#[test]
fn test_export_and_summary_agree() {
    let panel = panel();
    let export = PanelExport::new("72-food", false, &panel);

    let csv = export.export_to_string(ExportFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), panel.len() + 1);

    let summary = PanelSummary::new(export.industry.clone(), &panel);
    assert_eq!(summary.rows, 8);
    assert_eq!(summary.areas, 2);
    assert_eq!(summary.quarters, 4);
    assert_eq!(summary.undefined_min_wage_rows, 0);
    assert!((summary.mean_k_index.unwrap() - 0.85).abs() < 1e-12);

    let table = summary.to_ascii_table();
    assert!(table.contains("2023Q1 to 2023Q4"));
    assert!(table.contains("340.00"));
}

#[test]
fn test_json_file_round_trip() {
    let path = std::env::temp_dir().join(format!("bite-panel-{}.json", std::process::id()));
    let export = PanelExport::new("31-33", true, &panel());
    export.export_to_file(&path, ExportFormat::PrettyJson).unwrap();

    let back: PanelExport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, export);
    std::fs::remove_file(&path).unwrap();
}
