use chartlens_core::config::FormatConfig;
use chartlens_format::analysis::{Comparison, ComparisonType, KeyValue, Metric, Outlier, Timeframe, Value};
use chartlens_format::{format_analysis_markdown, ChartAnalysis, FormatOptions};

fn revenue_analysis() -> ChartAnalysis {
    ChartAnalysis {
        prose_summary: Some("  Revenue   climbed through Q3.  ".into()),
        chart_type: Some("line".into()),
        metric: Some(Metric { name: "Revenue".into(), unit: Some("USD".into()) }),
        timeframe: Some(Timeframe {
            start: Some("2024-01".into()),
            end: Some("2024-09".into()),
            frequency: Some("monthly".into()),
        }),
        key_values: Some(vec![
            KeyValue { label: "Peak".into(), value: Value::Number(1250000.5), unit: Some("USD".into()), where_in_chart: Some("Sep".into()) },
            KeyValue { label: "Low".into(), value: Value::Text("flat".into()), unit: None, where_in_chart: None },
        ]),
        main_trends: Some(vec!["Steady growth".into(), "Steady growth".into(), "Seasonal   dip in June".into()]),
        comparisons: Some(vec![Comparison {
            kind: ComparisonType::YoY,
            from: "2023".into(),
            to: "2024".into(),
            delta_abs: Some(1500.0),
            delta_pct: Some(12.5),
        }]),
        outliers: Some(vec![Outlier { point: "June".into(), reason: Some("maintenance".into()), impact: Some("  ".into()) }]),
        ..ChartAnalysis::default()
    }
}

#[test]
fn renders_sections_in_order() {
    let out = format_analysis_markdown(&revenue_analysis(), &FormatOptions::default());
    let expected_prefix = "Prose summary\n\nRevenue climbed through Q3.\n\n\
Chart snapshot\n\n\
• Type: line\n\
• Metric: Revenue (USD)\n\
• Timeframe: start 2024-01 • end 2024-09 • monthly\n\
• Peak: 1,250,000.5 USD (Sep)\n\
• Low: flat\n\n\
Main trends\n\n\
• Steady growth\n\
• Seasonal dip in June\n\n\
Comparisons\n\n\
• YoY: 2023 → 2024 (1,500 / 12.5%)\n\n\
Notable outliers\n\n\
• June — maintenance\n\n\
JSON block\n\n```json\n{";
    assert!(out.starts_with(expected_prefix), "got:\n{out}");
    assert!(out.ends_with("}\n```\n"));
    assert!(!out.contains("\n\n\n"));
    assert!(!out.contains("Insights"), "empty sections are omitted");
}

#[test]
fn json_block_round_trips() {
    let analysis = revenue_analysis();
    let out = format_analysis_markdown(&analysis, &FormatOptions::default());
    let start = out.find("```json\n").expect("fence") + "```json\n".len();
    let end = out.rfind("\n```").expect("closing fence");
    let parsed: ChartAnalysis = serde_json::from_str(&out[start..end]).expect("valid json");
    assert_eq!(parsed, analysis);
}

#[test]
fn empty_analysis_renders_nothing() {
    assert_eq!(format_analysis_markdown(&ChartAnalysis::default(), &FormatOptions::default()), "");
}

#[test]
fn explicit_empty_lists_survive_in_json_block() {
    let raw = r#"{"chart_type": "bar", "main_trends": [], "insights": []}"#;
    let analysis: ChartAnalysis = serde_json::from_str(raw).expect("parse");
    let out = format_analysis_markdown(&analysis, &FormatOptions::default());
    assert!(out.contains("\"main_trends\": []"), "got:\n{out}");
    assert!(out.contains("\"insights\": []"));
    assert!(!out.contains("\"outliers\""), "absent lists stay absent");
    assert!(!out.contains("Main trends"), "an empty list still renders no section");
}

#[test]
fn empty_sections_can_be_shown() {
    let opts = FormatOptions { include_empty_sections: true, ..FormatOptions::default() };
    let out = format_analysis_markdown(&ChartAnalysis::default(), &opts);
    assert_eq!(out.matches("• Not available").count(), 9);
    assert!(out.starts_with("Chart snapshot\n\n• Not available\n\nMain trends"));
    assert!(!out.contains("JSON block"));
}

#[test]
fn bullets_are_capped_per_section() {
    let analysis = ChartAnalysis {
        insights: Some((1..=10).map(|i| format!("insight {i}")).collect()),
        ..ChartAnalysis::default()
    };
    let opts = FormatOptions { max_bullets_per_section: 3, ..FormatOptions::default() };
    let out = format_analysis_markdown(&analysis, &opts);
    assert!(out.contains("Insights\n\n• insight 1\n• insight 2\n• insight 3\n"));
    assert!(!out.contains("• insight 4"));
}

#[test]
fn percent_unit_is_not_repeated() {
    let analysis = ChartAnalysis {
        key_values: Some(vec![KeyValue { label: "Margin".into(), value: Value::Number(0.256), unit: Some("%".into()), where_in_chart: None }]),
        ..ChartAnalysis::default()
    };
    let out = format_analysis_markdown(&analysis, &FormatOptions::default());
    assert!(out.contains("• Margin: 0.26\n"));
}

#[test]
fn parses_model_output() {
    let raw = r#"{
        "chart_type": "bar",
        "key_values": [{"label": "Total", "value": 4200}, {"label": "Region", "value": "EMEA"}],
        "comparisons": [{"type": "vs_target", "from": "plan", "to": "actual", "delta_pct": -3.5}],
        "confidence": "medium"
    }"#;
    let analysis: ChartAnalysis = serde_json::from_str(raw).expect("parse");
    let out = format_analysis_markdown(&analysis, &FormatOptions::default());
    assert!(out.contains("• Total: 4,200\n"));
    assert!(out.contains("• Region: EMEA\n"));
    assert!(out.contains("• vs_target: plan → actual (-3.5%)\n"));
}

#[test]
fn headings_and_locale_are_configurable() {
    let opts: FormatOptions = serde_json::from_str(r#"{"locale": "de-DE", "headings": {"trends": "Trends"}}"#).unwrap();
    assert_eq!(opts.headings.snapshot, "Chart snapshot");
    let analysis = ChartAnalysis {
        main_trends: Some(vec!["up".into()]),
        key_values: Some(vec![KeyValue { label: "Peak".into(), value: Value::Number(1234.5), unit: None, where_in_chart: None }]),
        ..ChartAnalysis::default()
    };
    let out = format_analysis_markdown(&analysis, &opts);
    assert!(out.contains("Trends\n\n• up\n"));
    assert!(out.contains("• Peak: 1.234,5\n"));
}

#[test]
fn options_follow_configuration() {
    let config = FormatConfig { locale: "fr-FR".into(), max_bullets_per_section: 2, include_empty_sections: true };
    let opts = FormatOptions::from(&config);
    assert_eq!(opts.locale, "fr-FR");
    assert_eq!(opts.max_bullets_per_section, 2);
    assert!(opts.include_empty_sections);
}
