use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use chartlens_core::config::FormatConfig;

use crate::analysis::{ChartAnalysis, KeyValue, Value};
use crate::number::{format_number, format_percent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Headings {
    pub summary: String,
    pub snapshot: String,
    pub trends: String,
    pub comparisons: String,
    pub outliers: String,
    pub insights: String,
    pub risks: String,
    pub actions: String,
    pub assumptions: String,
    pub questions: String,
    pub json: String,
}

impl Default for Headings {
    fn default() -> Self {
        Self {
            summary: "Prose summary".to_string(),
            snapshot: "Chart snapshot".to_string(),
            trends: "Main trends".to_string(),
            comparisons: "Comparisons".to_string(),
            outliers: "Notable outliers".to_string(),
            insights: "Insights".to_string(),
            risks: "Risks & limitations".to_string(),
            actions: "Recommended actions".to_string(),
            assumptions: "Assumptions".to_string(),
            questions: "Follow-up questions".to_string(),
            json: "JSON block".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub locale: String,
    pub max_bullets_per_section: usize,
    pub include_empty_sections: bool,
    pub headings: Headings,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            max_bullets_per_section: 6,
            include_empty_sections: false,
            headings: Headings::default(),
        }
    }
}

impl From<&FormatConfig> for FormatOptions {
    fn from(config: &FormatConfig) -> Self {
        Self {
            locale: config.locale.clone(),
            max_bullets_per_section: config.max_bullets_per_section,
            include_empty_sections: config.include_empty_sections,
            headings: Headings::default(),
        }
    }
}

fn is_blank(s: Option<&str>) -> bool {
    s.map_or(true, |s| s.trim().is_empty())
}

/// An absent list renders like an empty one.
fn items<T>(list: &Option<Vec<T>>) -> &[T] {
    list.as_deref().unwrap_or_default()
}

/// Collapses whitespace runs to one space and trims.
fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First occurrence of each distinct item, compared by serialized form.
fn uniq<T: Serialize>(items: &[T]) -> Vec<&T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| match serde_json::to_string(item) {
            Ok(key) => seen.insert(key),
            Err(_) => true,
        })
        .collect()
}

fn limited<'a, T: Serialize>(items: &'a [T], opts: &FormatOptions) -> Vec<&'a T> {
    let mut items = uniq(items);
    items.truncate(opts.max_bullets_per_section);
    items
}

fn section(title: &str, lines: &[String], opts: &FormatOptions) -> String {
    if !lines.is_empty() {
        let body = lines.iter().map(|l| format!("• {}", clean(l))).collect::<Vec<_>>().join("\n");
        format!("{title}\n\n{body}\n")
    } else if opts.include_empty_sections {
        format!("{title}\n\n• Not available\n")
    } else {
        String::new()
    }
}

fn key_value_line(kv: &KeyValue, opts: &FormatOptions) -> String {
    let value = match &kv.value {
        Value::Number(n) => {
            let core = format_number(*n, &opts.locale);
            match kv.unit.as_deref() {
                Some(unit) if !unit.is_empty() && unit != "%" => format!("{core} {unit}"),
                _ => core,
            }
        }
        Value::Text(t) => clean(t),
    };
    let location = match kv.where_in_chart.as_deref() {
        Some(w) if !w.is_empty() => format!(" ({w})"),
        _ => String::new(),
    };
    format!("{}: {}{}", kv.label, value, location)
}

fn render_snapshot(a: &ChartAnalysis, opts: &FormatOptions) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(chart_type) = a.chart_type.as_deref().filter(|t| !t.trim().is_empty()) {
        lines.push(format!("Type: {chart_type}"));
    }
    if let Some(metric) = a.metric.as_ref().filter(|m| !m.name.trim().is_empty()) {
        let unit = match metric.unit.as_deref() {
            Some(u) if !u.is_empty() => format!(" ({u})"),
            _ => String::new(),
        };
        lines.push(format!("Metric: {}{}", metric.name, unit));
    }
    if let Some(tf) = &a.timeframe {
        let parts: Vec<String> = [
            tf.start.as_deref().map(|s| format!("start {s}")),
            tf.end.as_deref().map(|e| format!("end {e}")),
            tf.frequency.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect();
        if !parts.is_empty() {
            lines.push(format!("Timeframe: {}", parts.join(" • ")));
        }
    }
    lines.extend(limited(items(&a.key_values), opts).into_iter().map(|kv| key_value_line(kv, opts)));
    lines
}

fn render_comparisons(a: &ChartAnalysis, opts: &FormatOptions) -> Vec<String> {
    limited(items(&a.comparisons), opts)
        .into_iter()
        .map(|c| {
            let mut deltas = Vec::new();
            if let Some(abs) = c.delta_abs {
                deltas.push(format_number(abs, &opts.locale));
            }
            if let Some(pct) = c.delta_pct {
                deltas.push(format_percent(pct, &opts.locale));
            }
            let delta = if deltas.is_empty() { String::new() } else { format!(" ({})", deltas.join(" / ")) };
            format!("{}: {} → {}{}", c.kind, c.from, c.to, delta)
        })
        .collect()
}

fn render_outliers(a: &ChartAnalysis, opts: &FormatOptions) -> Vec<String> {
    limited(items(&a.outliers), opts)
        .into_iter()
        .map(|o| {
            [Some(o.point.as_str()), o.reason.as_deref(), o.impact.as_deref()]
                .into_iter()
                .filter(|p| !is_blank(*p))
                .flatten()
                .map(clean)
                .collect::<Vec<_>>()
                .join(" — ")
        })
        .collect()
}

fn render_plain_list(items: &[String], opts: &FormatOptions) -> Vec<String> {
    limited(items, opts).into_iter().map(|s| clean(s)).collect()
}

/// Squeezes every run of three or more newlines down to one blank line.
fn collapse_blank_lines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut newlines = 0;
    for c in s.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    out
}

/// Renders the analysis as headed bullet sections followed by a fenced
/// JSON copy of the input. Empty sections are left out unless
/// `include_empty_sections` is set.
pub fn format_analysis_markdown(a: &ChartAnalysis, opts: &FormatOptions) -> String {
    let h = &opts.headings;
    let mut parts = Vec::new();

    if let Some(summary) = a.prose_summary.as_deref().filter(|s| !s.trim().is_empty()) {
        parts.push(format!("{}\n\n{}\n", h.summary, clean(summary)));
    }

    parts.push(section(&h.snapshot, &render_snapshot(a, opts), opts));
    parts.push(section(&h.trends, &render_plain_list(items(&a.main_trends), opts), opts));
    parts.push(section(&h.comparisons, &render_comparisons(a, opts), opts));
    parts.push(section(&h.outliers, &render_outliers(a, opts), opts));
    parts.push(section(&h.insights, &render_plain_list(items(&a.insights), opts), opts));
    parts.push(section(&h.risks, &render_plain_list(items(&a.risks_or_limitations), opts), opts));
    parts.push(section(&h.actions, &render_plain_list(items(&a.recommended_actions), opts), opts));
    parts.push(section(&h.assumptions, &render_plain_list(items(&a.assumptions), opts), opts));
    parts.push(section(&h.questions, &render_plain_list(items(&a.follow_up_questions), opts), opts));

    let has_fields = serde_json::to_value(a)
        .map(|v| v.as_object().is_some_and(|o| !o.is_empty()))
        .unwrap_or(false);
    if has_fields {
        if let Ok(json) = serde_json::to_string_pretty(a) {
            parts.push(format!("{}\n\n```json\n{}\n```\n", h.json, json));
        }
    }

    let joined = parts.into_iter().filter(|p| !p.is_empty()).collect::<Vec<_>>().join("\n");
    collapse_blank_lines(&joined)
}
