//! Failure model definitions and parameter parsing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported failure distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distribution {
    Exponential,
    Weibull,
    BiWeibull,
    TriWeibull,
}

impl Distribution {
    /// Parse a distribution from its (case-insensitive) textual form.
    pub fn parse(s: &str) -> Option<Distribution> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" => Some(Distribution::Exponential),
            "weibull" => Some(Distribution::Weibull),
            "bi-weibull" | "biweibull" => Some(Distribution::BiWeibull),
            "tri-weibull" | "triweibull" => Some(Distribution::TriWeibull),
            _ => None,
        }
    }

    /// Number of Weibull stages (parameter triples) this distribution takes.
    pub fn stages(self) -> usize {
        match self {
            Distribution::Exponential | Distribution::Weibull => 1,
            Distribution::BiWeibull => 2,
            Distribution::TriWeibull => 3,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Distribution::Exponential => "Exponential",
            Distribution::Weibull => "Weibull",
            Distribution::BiWeibull => "Bi-Weibull",
            Distribution::TriWeibull => "Tri-Weibull",
        };
        write!(f, "{s}")
    }
}

/// One Weibull stage: scale, shape, and location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeibullTriple {
    pub eta: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Errors raised while parsing a failure model definition.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("failure model '{model}': unknown distribution '{distribution}'")]
    UnknownDistribution { model: String, distribution: String },

    #[error(
        "failure model '{model}': {distribution} requires {expected} parameter triple(s), found {found}"
    )]
    Arity {
        model: String,
        distribution: Distribution,
        expected: usize,
        found: usize,
    },

    #[error("failure model '{model}': invalid numeric parameter '{token}'")]
    InvalidNumber { model: String, token: String },
}

/// A named failure model assigned to basic components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureModel {
    pub name: String,
    pub distribution: Distribution,
    /// One triple per Weibull stage; a single triple for Exponential, whose
    /// `eta` carries the MTTF.
    pub parameters: Vec<WeibullTriple>,
    pub standby_state: Option<String>,
    pub remarks: Option<String>,
}

impl FailureModel {
    /// Parse a failure model row.
    ///
    /// The parameter string is a comma/semicolon-separated list of numbers,
    /// three per Weibull stage in `eta, beta, gamma` order. An Exponential
    /// model accepts a single number, the MTTF. Any arity mismatch against
    /// the distribution is fatal.
    pub fn parse(
        name: &str,
        distribution: &str,
        parameters: &str,
        standby_state: &str,
        remarks: &str,
    ) -> Result<FailureModel, ParameterError> {
        let dist = Distribution::parse(distribution).ok_or_else(|| {
            ParameterError::UnknownDistribution {
                model: name.to_string(),
                distribution: distribution.to_string(),
            }
        })?;

        let mut values = Vec::new();
        for token in parameters
            .split(|c| c == ',' || c == ';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            let value: f64 = token.parse().map_err(|_| ParameterError::InvalidNumber {
                model: name.to_string(),
                token: token.to_string(),
            })?;
            values.push(value);
        }

        let expected = dist.stages();
        let triples = if dist == Distribution::Exponential && values.len() == 1 {
            // A lone MTTF value normalizes to a single-stage triple.
            vec![WeibullTriple {
                eta: values[0],
                beta: 1.0,
                gamma: 0.0,
            }]
        } else {
            if values.len() % 3 != 0 {
                return Err(ParameterError::Arity {
                    model: name.to_string(),
                    distribution: dist,
                    expected,
                    found: values.len().div_ceil(3),
                });
            }
            values
                .chunks(3)
                .map(|c| WeibullTriple {
                    eta: c[0],
                    beta: c[1],
                    gamma: c[2],
                })
                .collect()
        };

        if triples.len() != expected {
            return Err(ParameterError::Arity {
                model: name.to_string(),
                distribution: dist,
                expected,
                found: triples.len(),
            });
        }

        Ok(FailureModel {
            name: name.to_string(),
            distribution: dist,
            parameters: triples,
            standby_state: non_empty(standby_state),
            remarks: non_empty(remarks),
        })
    }

    /// The MTTF of an Exponential model.
    pub fn mttf(&self) -> Option<f64> {
        match self.distribution {
            Distribution::Exponential => self.parameters.first().map(|t| t.eta),
            _ => None,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_single_value() {
        let fm = FailureModel::parse("M1", "exponential", "1200", "", "").unwrap();
        assert_eq!(fm.distribution, Distribution::Exponential);
        assert_eq!(fm.parameters.len(), 1);
        assert_eq!(fm.mttf(), Some(1200.0));
    }

    #[test]
    fn weibull_triple() {
        let fm = FailureModel::parse("M2", "Weibull", "1000, 1.5, 0", "", "wear-out").unwrap();
        assert_eq!(fm.parameters.len(), 1);
        assert_eq!(fm.parameters[0].beta, 1.5);
        assert_eq!(fm.remarks.as_deref(), Some("wear-out"));
        assert_eq!(fm.mttf(), None);
    }

    #[test]
    fn bi_weibull_two_triples() {
        let fm =
            FailureModel::parse("M3", "bi-weibull", "100,1,0; 2000,3.2,50", "Cold", "").unwrap();
        assert_eq!(fm.parameters.len(), 2);
        assert_eq!(fm.parameters[1].gamma, 50.0);
        assert_eq!(fm.standby_state.as_deref(), Some("Cold"));
    }

    #[test]
    fn weibull_arity_mismatch_is_fatal() {
        let err = FailureModel::parse("M4", "weibull", "100,1,0,2000,3.2,50", "", "").unwrap_err();
        assert!(matches!(
            err,
            ParameterError::Arity {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn unknown_distribution() {
        assert!(matches!(
            FailureModel::parse("M5", "lognormal", "1", "", "").unwrap_err(),
            ParameterError::UnknownDistribution { .. }
        ));
    }

    #[test]
    fn invalid_number() {
        assert!(matches!(
            FailureModel::parse("M6", "weibull", "100,abc,0", "", "").unwrap_err(),
            ParameterError::InvalidNumber { .. }
        ));
    }
}
