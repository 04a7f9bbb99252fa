//! Emitter interface and flat output records.
//!
//! Concrete on-disk writers (spreadsheet, XML) live outside this workspace;
//! the pipeline only guarantees the call order: blocks and nodes for an
//! element always precede any connection referencing it, and `commit`
//! comes last. `RowEmitter` is the reference implementation: it buffers typed
//! rows and resolves connection endpoints to per-type integer indices the
//! way the target import format expects.

use std::collections::HashMap;

use rbd_core::{Distribution, FailureModel, StandbyMode};
use serde::Serialize;

/// Connection style written into every connection row.
pub const CONNECTION_STYLE: &str = "Horizontal/vertical";

/// A flat block record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRecord {
    pub id: String,
    pub page: String,
    pub x: f64,
    pub y: f64,
    pub description: Option<String>,
    pub standby_mode: Option<StandbyMode>,
    pub failure_model: Option<String>,
}

/// A flat junction-node record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub page: String,
    pub vote: Option<u32>,
    pub x: f64,
    pub y: f64,
}

/// A flat connection record between two already-emitted elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionRecord {
    pub id: String,
    pub page: String,
    pub src_id: String,
    pub src_type: String,
    pub dst_id: String,
    pub dst_type: String,
}

/// A failure model record with distribution-specific parameter fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FailureModelRecord {
    pub name: String,
    pub distribution: String,
    pub mttf: Option<f64>,
    pub eta1: Option<f64>,
    pub beta1: Option<f64>,
    pub gamma1: Option<f64>,
    pub eta2: Option<f64>,
    pub beta2: Option<f64>,
    pub gamma2: Option<f64>,
    pub eta3: Option<f64>,
    pub beta3: Option<f64>,
    pub gamma3: Option<f64>,
    pub remarks: Option<String>,
}

impl FailureModelRecord {
    /// Spread a failure model's parameter triples into per-stage fields.
    pub fn from_model(model: &FailureModel) -> Self {
        let mut record = FailureModelRecord {
            name: model.name.clone(),
            distribution: model.distribution.to_string(),
            remarks: model.remarks.clone(),
            ..Default::default()
        };
        if model.distribution == Distribution::Exponential {
            record.mttf = model.mttf();
            return record;
        }
        let stages = [
            (&mut record.eta1, &mut record.beta1, &mut record.gamma1),
            (&mut record.eta2, &mut record.beta2, &mut record.gamma2),
            (&mut record.eta3, &mut record.beta3, &mut record.gamma3),
        ];
        for (triple, (eta, beta, gamma)) in model.parameters.iter().zip(stages) {
            *eta = Some(triple.eta);
            *beta = Some(triple.beta);
            *gamma = Some(triple.gamma);
        }
        record
    }
}

/// A labor (manpower pool) record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaborRecord {
    pub identifier: String,
    pub availability: f64,
    pub cost: f64,
}

/// A spare-part record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpareRecord {
    pub identifier: String,
    pub availability: f64,
    pub cost: f64,
}

/// Target-format writer interface.
pub trait Emitter {
    fn add_block(&mut self, block: BlockRecord);
    fn add_node(&mut self, node: NodeRecord);
    fn add_connection(&mut self, connection: ConnectionRecord);
    fn add_failure_model(&mut self, model: FailureModelRecord);
    fn add_labor(&mut self, labor: LaborRecord);
    fn add_spare(&mut self, spare: SpareRecord);
    /// Flush everything to the target. Called exactly once, last.
    fn commit(&mut self) -> Result<(), String>;
}

/// A connection row with endpoint indices resolved for import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionRow {
    pub id: String,
    pub page: String,
    pub style: &'static str,
    pub input_index: u32,
    pub input_type: String,
    pub output_index: u32,
    pub output_type: String,
}

/// Reference emitter buffering typed rows in memory.
///
/// Blocks and nodes are indexed per record type in emission order; a
/// connection referencing an element that was never emitted is an
/// implementation bug in the serializer, not a user error, and panics.
#[derive(Debug, Default)]
pub struct RowEmitter {
    pub blocks: Vec<BlockRecord>,
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRow>,
    pub failure_models: Vec<FailureModelRecord>,
    pub labor: Vec<LaborRecord>,
    pub spares: Vec<SpareRecord>,
    ids: HashMap<String, u32>,
    committed: bool,
}

impl RowEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed(&self) -> bool {
        self.committed
    }
}

impl Emitter for RowEmitter {
    fn add_block(&mut self, block: BlockRecord) {
        self.ids.insert(block.id.clone(), self.blocks.len() as u32);
        self.blocks.push(block);
    }

    fn add_node(&mut self, node: NodeRecord) {
        self.ids.insert(node.id.clone(), self.nodes.len() as u32);
        self.nodes.push(node);
    }

    fn add_connection(&mut self, connection: ConnectionRecord) {
        let input_index = *self
            .ids
            .get(&connection.src_id)
            .expect("connection references an element that was never emitted");
        let output_index = *self
            .ids
            .get(&connection.dst_id)
            .expect("connection references an element that was never emitted");
        self.connections.push(ConnectionRow {
            id: connection.id,
            page: connection.page,
            style: CONNECTION_STYLE,
            input_index,
            input_type: connection.src_type,
            output_index,
            output_type: connection.dst_type,
        });
    }

    fn add_failure_model(&mut self, model: FailureModelRecord) {
        self.failure_models.push(model);
    }

    fn add_labor(&mut self, labor: LaborRecord) {
        self.labor.push(labor);
    }

    fn add_spare(&mut self, spare: SpareRecord) {
        self.spares.push(spare);
    }

    fn commit(&mut self) -> Result<(), String> {
        self.committed = true;
        Ok(())
    }
}
