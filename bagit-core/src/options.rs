use serde::{Deserialize, Serialize};

/// Which metadata file wins when a bag carries both bag-info.txt and package-info.txt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataPrecedence {
    /// package-info.txt is read after bag-info.txt and replaces it.
    #[default]
    LegacyPackageInfo,
    /// bag-info.txt is used and package-info.txt is ignored.
    BagInfo,
}

/// Knobs for [`crate::reader::BagReader`]. Loadable from JSON; missing fields take defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Reject fetch.txt destinations that resolve outside the bag root.
    pub check_fetch_containment: bool,
    pub metadata_precedence: MetadataPrecedence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_reference_behaviour() {
        let o = ReadOptions::default();
        assert!(!o.check_fetch_containment);
        assert_eq!(o.metadata_precedence, MetadataPrecedence::LegacyPackageInfo);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let o: ReadOptions = serde_json::from_str(r#"{"check_fetch_containment": true}"#).unwrap();
        assert!(o.check_fetch_containment);
        assert_eq!(o.metadata_precedence, MetadataPrecedence::LegacyPackageInfo);

        let o: ReadOptions = serde_json::from_str(r#"{"metadata_precedence": "bag-info"}"#).unwrap();
        assert_eq!(o.metadata_precedence, MetadataPrecedence::BagInfo);
    }
}
