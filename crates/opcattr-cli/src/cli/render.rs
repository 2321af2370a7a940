//! Text and JSON output.
//!
//! Text output uses `console` styles, which switch themselves off when stdout is
//! not a terminal. JSON output is meant for scripts and never styled.

use console::Style;
use opcattr::attributes::{AttributeId, NodeClassSet, Variant, ATTRIBUTES};
use opcattr::model::NodeId;
use opcattr::services::ReadResult;
use opcattr::status::StatusCode;
use serde::Serialize;

struct Styles {
    heading: Style,
    name: Style,
    muted: Style,
    good: Style,
    bad: Style,
}

fn styles() -> Styles {
    Styles {
        heading: Style::new().bold(),
        name: Style::new().cyan(),
        muted: Style::new().dim(),
        good: Style::new().green(),
        bad: Style::new().red().bold(),
    }
}

/// One row of `opcattr read` output.
#[derive(Debug, Serialize)]
pub struct ReadRow {
    pub attribute: String,
    pub status: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Variant>,
}

impl ReadRow {
    pub fn new(attribute_id: u32, result: ReadResult) -> Self {
        Self {
            attribute: attribute_label(attribute_id),
            status: result.status(),
            value: result.into_value(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AttributeRow {
    id: u32,
    name: &'static str,
    declared: String,
    classes: Vec<&'static str>,
}

fn attribute_label(attribute_id: u32) -> String {
    match AttributeId::from_u32(attribute_id) {
        Some(id) => id.name().to_string(),
        None => attribute_id.to_string(),
    }
}

fn class_names(classes: NodeClassSet) -> Vec<&'static str> {
    classes.iter().map(|class| class.name()).collect()
}

pub fn attributes_text() -> String {
    let s = styles();
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        s.heading
            .apply_to(format!("{:>3}  {:<24} {:<16} {}", "ID", "ATTRIBUTE", "TYPE", "NODE CLASSES"))
    ));
    for spec in ATTRIBUTES {
        let classes = if spec.classes == NodeClassSet::ALL {
            "all".to_string()
        } else {
            class_names(spec.classes).join(", ")
        };
        out.push_str(&format!(
            "{:>3}  {} {:<16} {}\n",
            spec.id as u32,
            s.name.apply_to(format!("{:<24}", spec.name)),
            spec.declared.to_string(),
            s.muted.apply_to(classes)
        ));
    }
    out
}

pub fn attributes_json() -> serde_json::Result<String> {
    let rows: Vec<AttributeRow> = ATTRIBUTES
        .iter()
        .map(|spec| AttributeRow {
            id: spec.id as u32,
            name: spec.name,
            declared: spec.declared.to_string(),
            classes: class_names(spec.classes),
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

fn status_text(status: StatusCode) -> String {
    let s = styles();
    if status.is_good() {
        s.good.apply_to(status.to_string()).to_string()
    } else {
        s.bad.apply_to(status.to_string()).to_string()
    }
}

pub fn read_text(node_id: &NodeId, rows: &[ReadRow]) -> String {
    let s = styles();
    let mut out = format!("{}\n", s.heading.apply_to(node_id));
    for row in rows {
        let detail = match &row.value {
            Some(value) => format!("{}  {}", value, s.muted.apply_to(value.type_label())),
            None => status_text(row.status),
        };
        out.push_str(&format!(
            "  {} {}\n",
            s.name.apply_to(format!("{:<24}", row.attribute)),
            detail
        ));
    }
    out
}

pub fn read_json(rows: &[ReadRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

pub fn write_text(node_id: &NodeId, attribute_id: u32, status: StatusCode) -> String {
    format!(
        "{} {}: {}\n",
        node_id,
        attribute_label(attribute_id),
        status_text(status)
    )
}

pub fn write_json(node_id: &NodeId, attribute_id: u32, status: StatusCode) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serde_json::json!({
        "node_id": node_id,
        "attribute": attribute_label(attribute_id),
        "status": status,
    }))
}
