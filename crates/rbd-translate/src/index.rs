//! Index builder: flat rows to typed, cross-linked element records.

use std::collections::{HashMap, HashSet};

use rbd_core::{Element, ElementKind, FailureModel, Logic, RowSet};
use tracing::{debug, warn};

use crate::error::TranslationError;

/// Logic rows of this kind attach to structural components; every other
/// kind attaches to the failure index.
const INHERITED: &str = "inherited";

/// Typed indexes over one model's rows.
///
/// Entries keep row order; the maps only accelerate lookups. All entries
/// are immutable once `build_index` returns.
#[derive(Debug, Default)]
pub struct ModelIndex {
    components: Vec<Element>,
    component_pos: HashMap<(String, String), usize>,
    failures: Vec<Element>,
    failure_pos: HashMap<String, usize>,
    models: Vec<FailureModel>,
    model_pos: HashMap<String, usize>,
    templates: HashSet<String>,
    /// Non-fatal conditions encountered while indexing.
    pub warnings: usize,
}

impl ModelIndex {
    /// Structural component entries, in row order.
    pub fn components(&self) -> &[Element] {
        &self.components
    }

    /// Failure node/event entries, in row order.
    pub fn failures(&self) -> &[Element] {
        &self.failures
    }

    /// Failure model definitions, in row order.
    pub fn models(&self) -> &[FailureModel] {
        &self.models
    }

    /// Component entry under a specific parent.
    pub fn component(&self, name: &str, parent: &str) -> Option<&Element> {
        self.component_pos
            .get(&(name.to_string(), parent.to_string()))
            .map(|&i| &self.components[i])
    }

    /// All component entries with the given name, regardless of parent.
    pub fn components_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.components.iter().filter(move |e| e.name == name)
    }

    /// Failure entry by name.
    pub fn failure(&self, name: &str) -> Option<&Element> {
        self.failure_pos.get(name).map(|&i| &self.failures[i])
    }

    /// Failure model by name.
    pub fn model(&self, name: &str) -> Option<&FailureModel> {
        self.model_pos.get(name).map(|&i| &self.models[i])
    }

    /// Names of template definitions (`parent == "*"`).
    pub fn templates(&self) -> &HashSet<String> {
        &self.templates
    }
}

/// Build the component, failure, and failure-model indexes from flat rows.
pub fn build_index(rows: &RowSet) -> Result<ModelIndex, TranslationError> {
    let mut index = ModelIndex::default();

    for row in &rows.components {
        let Some(kind) = ElementKind::parse(&row.kind) else {
            warn!(name = %row.name, kind = %row.kind, "unknown component type, row skipped");
            index.warnings += 1;
            continue;
        };
        let element = Element::new(kind, row.name.clone(), row.parent.clone())
            .with_code(row.code.clone())
            .with_instances(row.instances)
            .with_description(row.description.clone());
        if kind.is_structural() {
            if element.is_template() {
                // Template definitions never enter the structural index;
                // only their usage sites do.
                index.templates.insert(row.name.clone());
                continue;
            }
            let key = (row.name.clone(), row.parent.clone());
            if index.component_pos.contains_key(&key) {
                warn!(name = %row.name, parent = %row.parent, "duplicate component row, row skipped");
                index.warnings += 1;
                continue;
            }
            index.component_pos.insert(key, index.components.len());
            index.components.push(element);
        } else {
            if index.failure_pos.contains_key(&row.name) {
                warn!(name = %row.name, "duplicate failure entry, row skipped");
                index.warnings += 1;
                continue;
            }
            index.failure_pos.insert(row.name.clone(), index.failures.len());
            index.failures.push(element);
        }
    }

    for row in &rows.failure_models {
        let model = FailureModel::parse(
            &row.name,
            &row.distribution,
            &row.parameters,
            &row.standby_state,
            &row.remarks,
        )?;
        index.model_pos.insert(row.name.clone(), index.models.len());
        index.models.push(model);
    }

    for row in &rows.logic {
        let logic: Logic = row.logic.parse()?;
        if row.kind.eq_ignore_ascii_case(INHERITED) {
            let mut matched = false;
            for element in index
                .components
                .iter_mut()
                .filter(|e| e.name == row.component)
            {
                element.logic = Some(logic);
                matched = true;
            }
            if !matched {
                warn!(component = %row.component, "logic row matches no component, dropped");
                index.warnings += 1;
            }
        } else {
            match index.failure_pos.get(&row.component) {
                Some(&i) => index.failures[i].logic = Some(logic),
                None => {
                    warn!(component = %row.component, "logic row matches no failure entry, dropped");
                    index.warnings += 1;
                }
            }
        }
    }

    for row in &rows.failure_assignments {
        if !index.model_pos.contains_key(&row.failure_model) {
            warn!(
                model = %row.failure_model,
                component = %row.component,
                "failure model assignment names unknown model, dropped"
            );
            index.warnings += 1;
            continue;
        }
        let mut matched = false;
        for element in index
            .components
            .iter_mut()
            .filter(|e| e.kind == ElementKind::Basic && e.name == row.component)
        {
            element.failure_model = Some(row.failure_model.clone());
            matched = true;
        }
        if !matched {
            warn!(
                component = %row.component,
                "failure model assignment names unknown component, dropped"
            );
            index.warnings += 1;
        }
    }

    debug!(
        components = index.components.len(),
        failures = index.failures.len(),
        models = index.models.len(),
        "indexes built"
    );
    Ok(index)
}
