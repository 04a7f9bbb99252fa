//! System-model entities: element kinds, failure logic, and elements.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of element kinds appearing in the component table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Leaf component; the only kind that may carry a failure model.
    Basic,
    /// Component that nests further structure.
    Compound,
    /// Layout-only grouping, resolved against failure logic.
    Group,
    /// Failure-causal node; parent is a structural component.
    FailureNode,
    /// Failure-causal event; parent is another failure entry.
    FailureEvent,
}

impl ElementKind {
    /// Parse a kind from its (case-insensitive) textual form.
    pub fn parse(s: &str) -> Option<ElementKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(ElementKind::Basic),
            "compound" => Some(ElementKind::Compound),
            "group" => Some(ElementKind::Group),
            "failurenode" => Some(ElementKind::FailureNode),
            "failureevent" => Some(ElementKind::FailureEvent),
            _ => None,
        }
    }

    /// Whether this kind participates in the hierarchy graph.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            ElementKind::Basic | ElementKind::Compound | ElementKind::Group
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Basic => "Basic",
            ElementKind::Compound => "Compound",
            ElementKind::Group => "Group",
            ElementKind::FailureNode => "FailureNode",
            ElementKind::FailureEvent => "FailureEvent",
        };
        write!(f, "{s}")
    }
}

/// Standby mode stamped on blocks wired under voting logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandbyMode {
    Hot,
    Cold,
}

impl fmt::Display for StandbyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandbyMode::Hot => write!(f, "Hot"),
            StandbyMode::Cold => write!(f, "Cold"),
        }
    }
}

/// Failure logic attached to compound/group elements and failure entries.
///
/// `And` wires children in series; `Or`, `Active` and `Standby` wire them in
/// parallel, the latter two with a k-out-of-n vote threshold. `Root` marks
/// the synthetic model root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Logic {
    Root,
    And,
    Or,
    Active { vote: u32, total: u32 },
    Standby { vote: u32, total: u32 },
}

/// Error raised for a malformed textual logic spec.
#[derive(Debug, Error)]
#[error("invalid logic spec '{spec}': {reason}")]
pub struct LogicParseError {
    pub spec: String,
    pub reason: &'static str,
}

impl Logic {
    /// The vote threshold carried by a parallel junction, if any.
    pub fn vote_value(self) -> Option<u32> {
        match self {
            Logic::Active { vote, .. } | Logic::Standby { vote, .. } => Some(vote),
            _ => None,
        }
    }

    /// Standby mode implied by this logic for the blocks it wires.
    pub fn standby_mode(self) -> Option<StandbyMode> {
        match self {
            Logic::Active { .. } => Some(StandbyMode::Hot),
            Logic::Standby { .. } => Some(StandbyMode::Cold),
            _ => None,
        }
    }

    /// Whether this logic wires its members in parallel.
    pub fn is_parallel(self) -> bool {
        matches!(
            self,
            Logic::Or | Logic::Active { .. } | Logic::Standby { .. }
        )
    }

    /// Whether this logic wires its members in series.
    pub fn is_series(self) -> bool {
        matches!(self, Logic::And | Logic::Root)
    }
}

impl FromStr for Logic {
    type Err = LogicParseError;

    /// Parse `NAME` or `NAME(vote,total)`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let err = |reason| LogicParseError {
            spec: spec.to_string(),
            reason,
        };
        let (name, args) = match spec.find('(') {
            Some(open) => {
                let close = spec.rfind(')').ok_or(err("missing closing parenthesis"))?;
                if close < open {
                    return Err(err("missing closing parenthesis"));
                }
                (&spec[..open], Some(&spec[open + 1..close]))
            }
            None => (spec, None),
        };
        let parse_vote = |args: Option<&str>| -> Result<(u32, u32), LogicParseError> {
            let args = args.ok_or(err("vote specification required"))?;
            let mut parts = args.split(',').map(str::trim);
            let vote = parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or(err("invalid vote value"))?;
            let total = parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or(err("invalid total value"))?;
            if parts.next().is_some() {
                return Err(err("too many vote arguments"));
            }
            Ok((vote, total))
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "root" => Ok(Logic::Root),
            "and" => Ok(Logic::And),
            "or" => Ok(Logic::Or),
            "active" => {
                let (vote, total) = parse_vote(args)?;
                Ok(Logic::Active { vote, total })
            }
            "standby" => {
                let (vote, total) = parse_vote(args)?;
                Ok(Logic::Standby { vote, total })
            }
            _ => Err(err("unknown logic name")),
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Root => write!(f, "ROOT"),
            Logic::And => write!(f, "AND"),
            Logic::Or => write!(f, "OR"),
            Logic::Active { vote, total } => write!(f, "ACTIVE({vote},{total})"),
            Logic::Standby { vote, total } => write!(f, "STANDBY({vote},{total})"),
        }
    }
}

/// A system element: one resolved entry of the component or failure tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    /// Base name before resolution; fully qualified dotted path after.
    pub name: String,
    /// Name of the structural parent (`*` marks a template definition).
    pub parent: String,
    pub code: Option<String>,
    pub instances: u32,
    pub description: Option<String>,
    pub logic: Option<Logic>,
    pub failure_model: Option<String>,
}

impl Element {
    pub fn new(kind: ElementKind, name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parent: parent.into(),
            code: None,
            instances: 1,
            description: None,
            logic: None,
            failure_model: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        if !code.is_empty() {
            self.code = Some(code);
        }
        self
    }

    pub fn with_instances(mut self, instances: u32) -> Self {
        self.instances = instances.max(1);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.is_empty() {
            self.description = Some(description);
        }
        self
    }

    pub fn with_logic(mut self, logic: Logic) -> Self {
        self.logic = Some(logic);
        self
    }

    /// Clone this element under a new (qualified) name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.name = name.into();
        copy
    }

    /// Identity used as the node key in the failure forest.
    pub fn graph_id(&self) -> String {
        format!("{}_{}", self.kind, self.name)
    }

    /// Last dot-segment of the (possibly qualified) name.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Whether this row defines a template rather than a structural node.
    pub fn is_template(&self) -> bool {
        self.parent == "*"
    }
}

/// Last dot-segment of a qualified path name.
pub fn base_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

static INSTANCE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-]*\[[Xx]\][A-Za-z0-9_\-]*$").expect("valid pattern")
});

/// Format a component code against an instance number.
///
/// A code containing an `[X]` (or `[x]`) marker is an instance pattern: the
/// marker is replaced by the instance number and the second tuple field
/// reports that the instance was consumed. Any other code passes through
/// unchanged.
pub fn format_code(code: &str, instance: u32) -> (String, bool) {
    if INSTANCE_CODE.is_match(code) {
        let marker = if code.contains("[X]") { "[X]" } else { "[x]" };
        (code.replace(marker, &instance.to_string()), true)
    } else {
        (code.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_logic() {
        assert_eq!("AND".parse::<Logic>().unwrap(), Logic::And);
        assert_eq!("or".parse::<Logic>().unwrap(), Logic::Or);
        assert_eq!("Root".parse::<Logic>().unwrap(), Logic::Root);
    }

    #[test]
    fn parse_voting_logic() {
        assert_eq!(
            "ACTIVE(2,3)".parse::<Logic>().unwrap(),
            Logic::Active { vote: 2, total: 3 }
        );
        assert_eq!(
            "standby(1, 2)".parse::<Logic>().unwrap(),
            Logic::Standby { vote: 1, total: 2 }
        );
    }

    #[test]
    fn parse_invalid_logic() {
        assert!("XOR".parse::<Logic>().is_err());
        assert!("ACTIVE".parse::<Logic>().is_err());
        assert!("ACTIVE(2".parse::<Logic>().is_err());
        assert!("ACTIVE(a,b)".parse::<Logic>().is_err());
    }

    #[test]
    fn vote_and_standby_accessors() {
        assert_eq!(Logic::Or.vote_value(), None);
        assert_eq!(Logic::Active { vote: 2, total: 3 }.vote_value(), Some(2));
        assert_eq!(
            Logic::Active { vote: 2, total: 3 }.standby_mode(),
            Some(StandbyMode::Hot)
        );
        assert_eq!(
            Logic::Standby { vote: 1, total: 2 }.standby_mode(),
            Some(StandbyMode::Cold)
        );
        assert!(Logic::And.is_series());
        assert!(Logic::Or.is_parallel());
    }

    #[test]
    fn element_identity() {
        let e = Element::new(ElementKind::FailureNode, "PSU", "Rack");
        assert_eq!(e.graph_id(), "FailureNode_PSU");
        let q = e.renamed("Rack.PSU");
        assert_eq!(q.base_name(), "PSU");
    }

    #[test]
    fn template_detection() {
        let e = Element::new(ElementKind::Compound, "Tpl", "*");
        assert!(e.is_template());
    }

    #[test]
    fn code_instance_pattern() {
        assert_eq!(format_code("PSU-[X]", 3), ("PSU-3".to_string(), true));
        assert_eq!(format_code("A[x]B", 2), ("A2B".to_string(), true));
        assert_eq!(format_code("PSU", 3), ("PSU".to_string(), false));
        // Marker must be the only bracket group
        assert_eq!(format_code("PSU [X]", 1).1, false);
    }
}
