//! Flattening serializer: nested diagrams to a single namespace of
//! page-qualified records.
//!
//! The walk is an explicit stack over compound blocks. Every element gets a
//! hierarchical dotted `Id`, the enclosing block supplies the `Page`, and
//! element records always precede the connections that reference them.

use rbd_core::format_code;
use tracing::debug;

use crate::diagram::RbdElement;
use crate::emit::{BlockRecord, ConnectionRecord, Emitter, NodeRecord};
use crate::error::TranslationError;
use crate::synthesize::{CompoundBlock, Rbd};

/// Counts of emitted flat records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenStats {
    pub blocks: usize,
    pub nodes: usize,
    pub connections: usize,
}

/// Walk the compound-block hierarchy depth-first and emit flat records.
pub fn serialize_rbd<E: Emitter>(
    rbd: &Rbd,
    emitter: &mut E,
    display_scale: f64,
) -> Result<FlattenStats, TranslationError> {
    let mut stats = FlattenStats::default();
    let Some(top) = rbd.top() else {
        return Ok(stats);
    };

    let mut stack: Vec<(&CompoundBlock, Vec<String>, Option<u32>)> =
        vec![(top, Vec::new(), None)];
    while let Some((block, path, instance)) = stack.pop() {
        debug!(block = %block.name, "serializing compound block");

        // Topological order keeps a series element ahead of its successors.
        let order = block.diagram.topological_order()?;
        for key in &order {
            let Some(element) = block.diagram.get(key) else { continue };

            if let Some(nested) = rbd.get(element.name()) {
                let mut child_path = path.clone();
                if let Some(i) = instance {
                    child_path.push(i.to_string());
                }
                stack.push((nested, child_path, element.instance()));
            }

            let id = element_tokens(&path, instance, element).join(".");
            let page = parent_tokens(&path, instance, block).join(".");
            let position = block.positions.get(key).copied().unwrap_or_default();
            let x = position.x as f64 * display_scale;
            let y = position.y as f64 * display_scale;
            match element {
                RbdElement::Block(b) => {
                    emitter.add_block(BlockRecord {
                        id,
                        page,
                        x,
                        y,
                        description: b.description.clone(),
                        standby_mode: b.standby_mode,
                        failure_model: b.failure_model.clone(),
                    });
                    stats.blocks += 1;
                }
                RbdElement::Junction(j) => {
                    emitter.add_node(NodeRecord {
                        id,
                        page,
                        vote: j.vote,
                        x,
                        y,
                    });
                    stats.nodes += 1;
                }
            }
        }

        let page = parent_tokens(&path, instance, block).join(".");
        let mut prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}.", path.join("."))
        };
        if let Some(i) = instance {
            prefix = format!("{prefix}{i}.");
        }
        for (src, dst) in block.diagram.edges() {
            let (Some(s), Some(d)) = (block.diagram.get(&src), block.diagram.get(&dst)) else {
                continue;
            };
            emitter.add_connection(ConnectionRecord {
                id: format!("{prefix}{}-{}", s.id(), d.id()),
                page: page.clone(),
                src_id: element_tokens(&path, instance, s).join("."),
                src_type: s.object_type().to_string(),
                dst_id: element_tokens(&path, instance, d).join("."),
                dst_type: d.object_type().to_string(),
            });
            stats.connections += 1;
        }
    }

    Ok(stats)
}

/// Id tokens for one diagram element: enclosing path, parent instance,
/// code-formatted name, and the element's own instance. Empty and zero
/// tokens are omitted; a code that consumed its instance suppresses the
/// trailing instance token.
fn element_tokens(path: &[String], parent_instance: Option<u32>, element: &RbdElement) -> Vec<String> {
    let mut tokens: Vec<String> = path.iter().filter(|t| !t.is_empty()).cloned().collect();
    if let Some(pi) = parent_instance {
        if pi > 0 {
            tokens.push(pi.to_string());
        }
    }
    let instance = element.instance().unwrap_or(0);
    let (name, instance) = match element.code() {
        Some(code) if !code.is_empty() => {
            let (formatted, consumed) = format_code(code, instance);
            (formatted, if consumed { 0 } else { instance })
        }
        _ => (element.name().to_string(), instance),
    };
    if !name.is_empty() {
        tokens.push(name);
    }
    if instance > 0 {
        tokens.push(instance.to_string());
    }
    tokens
}

/// Page tokens: the enclosing block's path, code-formatted name, and
/// instance, under the same omission rules as element ids.
fn parent_tokens(path: &[String], parent_instance: Option<u32>, block: &CompoundBlock) -> Vec<String> {
    let mut tokens: Vec<String> = path.iter().filter(|t| !t.is_empty()).cloned().collect();
    let instance = parent_instance.unwrap_or(0);
    let (name, instance) = match &block.code {
        Some(code) if !code.is_empty() => {
            let (formatted, consumed) = format_code(code, instance);
            (formatted, if consumed { 0 } else { instance })
        }
        _ => (block.name.clone(), instance),
    };
    if !name.is_empty() {
        tokens.push(name);
    }
    if instance > 0 {
        tokens.push(instance.to_string());
    }
    tokens
}
