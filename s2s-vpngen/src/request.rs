use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use s2s_vpngen::validate::RawFields;
use toml::{Table, Value};
use tracing::debug;

/// Read a request file into raw fields and apply `--set` overrides.
///
/// Scalars are stringified; arrays of strings are joined with `,` so list
/// fields like `site1_lans` may be written either way.
pub fn load_request(path: &Path, overrides: &[(String, String)]) -> Result<RawFields> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path.display()))?;
    let table: Table = toml::from_str(&raw)
        .with_context(|| format!("failed to parse request file {}", path.display()))?;

    let mut fields = RawFields::new();
    for (key, value) in table {
        let text = field_text(&key, &value)?;
        fields.insert(key, text);
    }
    for (key, value) in overrides {
        debug!(field = %key, "request field overridden from command line");
        fields.insert(key.clone(), value.clone());
    }
    Ok(fields)
}

fn field_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                let Value::String(s) = item else {
                    bail!("field '{key}': list entries must be strings");
                };
                parts.push(s.as_str());
            }
            Ok(parts.join(","))
        }
        other => bail!("field '{key}': unsupported value type {}", other.type_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::load_request;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn flattens_scalars_and_lists() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("req.toml");
        fs::write(
            &path,
            r#"
vpn_name = "lab"
site1_mgmt_port = 8443
site1_lans = ["port2:10.0.0.1/24", "port3:10.0.1.1/24"]
"#,
        )
        .expect("write");

        let overrides = vec![("vpn_name".to_string(), "override".to_string())];
        let fields = load_request(&path, &overrides).expect("load");
        assert_eq!(fields["vpn_name"], "override");
        assert_eq!(fields["site1_mgmt_port"], "8443");
        assert_eq!(fields["site1_lans"], "port2:10.0.0.1/24,port3:10.0.1.1/24");
    }

    #[test]
    fn rejects_nested_tables() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("req.toml");
        fs::write(&path, "[site1]\nwan_if = \"port1\"\n").expect("write");
        let err = load_request(&path, &[]).expect_err("nested table");
        assert!(err.to_string().contains("site1"));
    }
}
