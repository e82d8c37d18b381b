//! PSI-MI controlled vocabulary terms seen in interaction evidence.

use fxhash::FxHashMap as HashMap;

/// Interaction detection methods and interaction types commonly reported for
/// Arabidopsis interactions.
const MI_TERMS: &[(&str, &str)] = &[
    ("MI:0004", "affinity chromatography technology"),
    ("MI:0006", "anti bait coimmunoprecipitation"),
    ("MI:0007", "anti tag coimmunoprecipitation"),
    ("MI:0012", "bioluminescence resonance energy transfer"),
    ("MI:0018", "two hybrid"),
    ("MI:0019", "coimmunoprecipitation"),
    ("MI:0025", "copurification"),
    ("MI:0028", "cosedimentation in solution"),
    ("MI:0029", "cosedimentation through density gradient"),
    ("MI:0030", "cross-linking study"),
    ("MI:0040", "electron microscopy"),
    ("MI:0045", "experimental interaction detection"),
    ("MI:0047", "far western blotting"),
    ("MI:0049", "filter binding"),
    ("MI:0051", "fluorescence technology"),
    ("MI:0053", "fluorescence polarization spectroscopy"),
    ("MI:0055", "fluorescent resonance energy transfer"),
    ("MI:0063", "interaction prediction"),
    ("MI:0065", "isothermal titration calorimetry"),
    ("MI:0071", "molecular sieving"),
    ("MI:0077", "nuclear magnetic resonance"),
    ("MI:0081", "peptide array"),
    ("MI:0084", "phage display"),
    ("MI:0089", "protein array"),
    ("MI:0090", "protein complementation assay"),
    ("MI:0096", "pull down"),
    ("MI:0107", "surface plasmon resonance"),
    ("MI:0111", "dihydrofolate reductase reconstruction"),
    ("MI:0112", "ubiquitin reconstruction"),
    ("MI:0114", "x-ray crystallography"),
    ("MI:0226", "ion exchange chromatography"),
    ("MI:0364", "inferred by curator"),
    ("MI:0397", "two hybrid array"),
    ("MI:0398", "two hybrid pooling approach"),
    ("MI:0399", "two hybrid fragment pooling approach"),
    ("MI:0402", "chromatin immunoprecipitation assay"),
    ("MI:0405", "competition binding"),
    ("MI:0407", "direct interaction"),
    ("MI:0411", "enzyme linked immunosorbent assay"),
    ("MI:0413", "electrophoretic mobility shift assay"),
    ("MI:0415", "enzymatic study"),
    ("MI:0416", "fluorescence microscopy"),
    ("MI:0424", "protein kinase assay"),
    ("MI:0432", "one hybrid"),
    ("MI:0435", "protease assay"),
    ("MI:0676", "tandem affinity purification"),
    ("MI:0686", "unspecified method"),
    ("MI:0809", "bimolecular fluorescence complementation"),
    ("MI:0914", "association"),
    ("MI:0915", "physical association"),
    ("MI:1112", "two hybrid prey pooling approach"),
    ("MI:1356", "validated two hybrid"),
];

/// Lookup from MI code to its term name.
#[derive(Debug, Clone)]
pub struct MiDictionary {
    terms: HashMap<&'static str, &'static str>,
}

impl Default for MiDictionary {
    fn default() -> Self {
        MiDictionary {
            terms: MI_TERMS.iter().copied().collect(),
        }
    }
}

impl MiDictionary {
    pub fn describe(&self, code: &str) -> Option<&'static str> {
        self.terms.get(code).copied()
    }

    ///
    /// Annotation for a bare code from the primary API, e.g. `MI:0018` becomes
    /// `MI:0018 (two hybrid)`. Unknown codes are kept as they are.
    ///
    pub fn resolve(&self, code: &str) -> String {
        let code = code.trim();
        match self.describe(code) {
            Some(term) => format!("{} ({})", code, term),
            None => code.to_string(),
        }
    }

    ///
    /// Exchange feeds ship annotated terms already; only stray quotes and
    /// whitespace are cleaned up.
    ///
    pub fn reformat(&self, annotated: &str) -> String {
        annotated
            .replace(['"', '\\'], "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("MI:0018", "MI:0018 (two hybrid)")]
    #[case("MI:0432", "MI:0432 (one hybrid)")]
    #[case("MI:9999", "MI:9999")]
    fn test_resolve(#[case] code: &str, #[case] expected: &str) {
        let dictionary = MiDictionary::default();
        assert_eq!(dictionary.resolve(code), expected);
    }

    #[rstest]
    fn test_reformat() {
        let dictionary = MiDictionary::default();
        assert_eq!(
            dictionary.reformat("MI:0018   (\"two hybrid\")"),
            "MI:0018 (two hybrid)"
        );
    }

    #[rstest]
    fn test_dictionary_has_no_duplicate_codes() {
        assert_eq!(MiDictionary::default().len(), MI_TERMS.len());
    }
}
