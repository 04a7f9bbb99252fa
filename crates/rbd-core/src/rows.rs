//! Typed input rows and required-column schema validation.
//!
//! Loaders (CSV, spreadsheet, database; all external to this workspace)
//! deliver each input record as a column/value map. `RowSet::add_record`
//! validates the record against the fixed schema of its sheet and stores a
//! typed row; callers that already hold typed data can push rows directly.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

/// The input sheets a reliability model is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Components,
    Logic,
    FailureModels,
    FailureAssignments,
    Manpower,
    Spares,
}

impl Sheet {
    /// Stable sheet name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Sheet::Components => "components",
            Sheet::Logic => "logic",
            Sheet::FailureModels => "failure_models",
            Sheet::FailureAssignments => "failure_assignments",
            Sheet::Manpower => "manpower",
            Sheet::Spares => "spares",
        }
    }

    /// Columns that must be present in every record of this sheet.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Sheet::Components => &["type", "name", "parent", "code", "instances", "description"],
            Sheet::Logic => &["type", "component", "logic"],
            Sheet::FailureModels => &[
                "name",
                "distribution",
                "parameters",
                "standby_state",
                "remarks",
            ],
            Sheet::FailureAssignments => &["component", "failure_model"],
            Sheet::Manpower => &["manpower_type", "availability", "cost"],
            Sheet::Spares => &["device_type", "availability", "cost"],
        }
    }
}

/// A required input column was missing.
#[derive(Debug, Error)]
#[error("input sheet '{sheet}' is missing required columns: {missing:?}")]
pub struct SchemaError {
    pub sheet: &'static str,
    pub missing: Vec<String>,
}

/// A system component entry, as read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRow {
    pub kind: String,
    pub name: String,
    pub parent: String,
    pub code: String,
    pub instances: u32,
    pub description: String,
}

/// A logic assignment entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicRow {
    pub kind: String,
    pub component: String,
    pub logic: String,
}

/// A failure model definition entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureModelRow {
    pub name: String,
    pub distribution: String,
    pub parameters: String,
    pub standby_state: String,
    pub remarks: String,
}

/// An assignment of a failure model to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureAssignmentRow {
    pub component: String,
    pub failure_model: String,
}

/// A manpower (labor pool) declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ManpowerRow {
    pub manpower_type: String,
    pub availability: f64,
    pub cost: f64,
}

/// A spare-part declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpareRow {
    pub device_type: String,
    pub availability: f64,
    pub cost: f64,
}

/// Ordered container for all rows of one reliability model.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub components: Vec<ComponentRow>,
    pub logic: Vec<LogicRow>,
    pub failure_models: Vec<FailureModelRow>,
    pub failure_assignments: Vec<FailureAssignmentRow>,
    pub manpower: Vec<ManpowerRow>,
    pub spares: Vec<SpareRow>,
}

impl RowSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw record against its sheet schema and store a typed row.
    ///
    /// Missing required columns are fatal; extra columns only warn.
    pub fn add_record(
        &mut self,
        sheet: Sheet,
        fields: &HashMap<String, String>,
    ) -> Result<(), SchemaError> {
        validate_columns(sheet, fields)?;
        let get = |column: &str| fields.get(column).map(|v| v.trim().to_string()).unwrap_or_default();
        match sheet {
            Sheet::Components => self.components.push(ComponentRow {
                kind: get("type"),
                name: get("name"),
                parent: get("parent"),
                code: get("code"),
                instances: parse_instances(&get("instances"), &get("name")),
                description: get("description"),
            }),
            Sheet::Logic => self.logic.push(LogicRow {
                kind: get("type"),
                component: get("component"),
                logic: get("logic"),
            }),
            Sheet::FailureModels => self.failure_models.push(FailureModelRow {
                name: get("name"),
                distribution: get("distribution"),
                parameters: get("parameters"),
                standby_state: get("standby_state"),
                remarks: get("remarks"),
            }),
            Sheet::FailureAssignments => self.failure_assignments.push(FailureAssignmentRow {
                component: get("component"),
                failure_model: get("failure_model"),
            }),
            Sheet::Manpower => self.manpower.push(ManpowerRow {
                manpower_type: get("manpower_type"),
                availability: parse_number(&get("availability")),
                cost: parse_number(&get("cost")),
            }),
            Sheet::Spares => self.spares.push(SpareRow {
                device_type: get("device_type"),
                availability: parse_number(&get("availability")),
                cost: parse_number(&get("cost")),
            }),
        }
        Ok(())
    }

    /// Whether any component row defines a template.
    pub fn contains_templates(&self) -> bool {
        self.components.iter().any(|row| row.parent == "*")
    }
}

fn validate_columns(sheet: Sheet, fields: &HashMap<String, String>) -> Result<(), SchemaError> {
    let required = sheet.required_columns();
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !fields.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError {
            sheet: sheet.name(),
            missing,
        });
    }
    let extra: Vec<&String> = fields
        .keys()
        .filter(|k| !required.contains(&k.as_str()))
        .collect();
    if !extra.is_empty() {
        warn!(sheet = sheet.name(), ?extra, "input record has extra columns");
    }
    Ok(())
}

fn parse_instances(value: &str, name: &str) -> u32 {
    if value.is_empty() {
        return 1;
    }
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => n,
        _ => {
            warn!(component = name, value, "invalid instance count, assuming 1");
            1
        }
    }
}

fn parse_number(value: &str) -> f64 {
    value.parse().unwrap_or_else(|_| {
        if !value.is_empty() {
            warn!(value, "invalid numeric value, assuming 0");
        }
        0.0
    })
}
