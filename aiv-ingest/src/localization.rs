use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use aiv_core::models::LocalizationEvidence;
use aiv_core::utils::normalize_locus;

use crate::error::{IngestError, Result};

#[derive(Deserialize, Debug)]
struct RawGeneLocalization {
    #[serde(default)]
    data: Vec<Map<String, Value>>,
    #[serde(default)]
    includes_predicted: Option<String>,
    #[serde(default)]
    includes_experimental: Option<String>,
}

/// Raw localization scores of one gene, in the order the service listed them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneLocalization {
    pub scores: Vec<(String, f64)>,
    pub evidence: LocalizationEvidence,
}

/// Localization response keyed by canonical gene id.
pub type LocalizationResponse = BTreeMap<String, GeneLocalization>;

fn is_yes(flag: &Option<String>) -> bool {
    flag.as_deref()
        .is_some_and(|f| f.trim().eq_ignore_ascii_case("yes"))
}

fn score_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

///
/// Parse the localization-score payload: an object keyed by gene id whose
/// values hold `data: [{locality: score}, ...]` plus evidence flags.
///
/// Scores that are not numbers are dropped; normalization into fractions is
/// left to the aggregator.
///
pub fn parse_localizations(payload: &str) -> Result<LocalizationResponse> {
    let raw: BTreeMap<String, RawGeneLocalization> =
        serde_json::from_str(payload).map_err(IngestError::LocalizationPayload)?;

    Ok(raw
        .into_iter()
        .map(|(gene_id, gene)| {
            let scores = gene
                .data
                .iter()
                .flat_map(|entry| entry.iter())
                .filter_map(|(locality, value)| {
                    score_of(value).map(|score| (locality.trim().to_string(), score))
                })
                .collect();
            let evidence = LocalizationEvidence {
                predicted: is_yes(&gene.includes_predicted),
                experimental: is_yes(&gene.includes_experimental),
            };
            (normalize_locus(&gene_id), GeneLocalization { scores, evidence })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parse_localizations() {
        let payload = r#"{
            "AT1G01010": {
                "data": [{"nucleus": 12}, {"cytosol": "4"}, {"plastid": 0}, {"golgi": "n/a"}],
                "includes_predicted": "yes",
                "includes_experimental": "no"
            },
            "At2g30000": {"data": []}
        }"#;
        let response = parse_localizations(payload).unwrap();

        let first = &response["At1g01010"];
        assert_eq!(
            first.scores,
            vec![
                ("nucleus".to_string(), 12.0),
                ("cytosol".to_string(), 4.0),
                ("plastid".to_string(), 0.0)
            ]
        );
        assert_eq!(
            first.evidence,
            LocalizationEvidence {
                predicted: true,
                experimental: false
            }
        );
        assert!(response["At2g30000"].scores.is_empty());
    }

    #[rstest]
    fn test_parse_localizations_rejects_arrays() {
        assert!(parse_localizations("[]").is_err());
    }
}
