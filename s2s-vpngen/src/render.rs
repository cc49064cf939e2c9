//! Serialization of a finished document.
//!
//! Both formats keep struct field order, so the same document always renders
//! to the same bytes.

use thiserror::Error;

use crate::model::ConfigurationDocument;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn to_yaml(doc: &ConfigurationDocument) -> Result<String, RenderError> {
    Ok(serde_yaml::to_string(doc)?)
}

pub fn to_json(doc: &ConfigurationDocument) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_document;
    use crate::policy::EnginePolicy;
    use crate::validate::tests::lab_fields;

    #[test]
    fn yaml_is_byte_identical_across_builds() {
        let policy = EnginePolicy::default();
        let first = build_document(&lab_fields(), &policy).expect("build");
        let second = build_document(&lab_fields(), &policy).expect("build");
        assert_eq!(
            to_yaml(&first).expect("yaml"),
            to_yaml(&second).expect("yaml")
        );
    }

    #[test]
    fn yaml_keeps_document_section_order() {
        let doc = build_document(&lab_fields(), &EnginePolicy::default()).expect("build");
        let yaml = to_yaml(&doc).expect("yaml");
        let vpn = yaml.find("vpn:").expect("vpn");
        let sites = yaml.find("sites:").expect("sites");
        let ike = yaml.find("\nike:").expect("ike");
        let ipsec = yaml.find("\nipsec:").expect("ipsec");
        assert!(vpn < sites && sites < ike && ike < ipsec);
        assert!(yaml.contains("name: s1-lan2_to_s2-lan1"));
        assert!(!yaml.contains("virtual_router: null"));
    }

    #[test]
    fn json_exposes_vendor_tags() {
        let doc = build_document(&lab_fields(), &EnginePolicy::default()).expect("build");
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&doc).expect("json")).expect("parse");
        assert_eq!(value["sites"]["site1"]["vendor"], "fortinet");
        assert_eq!(value["sites"]["site2"]["vendor"], "paloalto");
        assert_eq!(value["sites"]["site2"]["role"], "secondary");
        assert_eq!(value["ipsec"]["selectors"].as_array().map(Vec::len), Some(4));
    }
}
