use std::{convert::TryInto, path::Path};

use anyhow::Context;

use crate::core::loader::InputParams;

/// Persisted renderer settings of the host application.
///
/// Values are read as text, numbers and booleans included, and a missing
/// key reads as the supplied default.
#[derive(Debug, Default)]
pub struct RenderPreferences {
    params: InputParams,
}

impl RenderPreferences {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json_file = std::fs::File::open(path)
            .with_context(|| format!("preferences - can't open '{}'", path.display()))?;
        let json_reader = std::io::BufReader::new(json_file);
        let json_value: serde_json::Value = serde_json::from_reader(json_reader)
            .with_context(|| format!("preferences - '{}' is not valid json", path.display()))?;
        Self::from_json(&json_value)
    }

    pub fn from_json(value: &serde_json::Value) -> anyhow::Result<Self> {
        let mut params: InputParams = value.try_into()?;
        params.set_name("preferences".into());
        Ok(Self { params })
    }

    pub fn get_string(&mut self, key: &str, fallback: &str) -> String {
        match self.params.get_value(key) {
            Some(value) => value.to_string().trim().to_owned(),
            None => fallback.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_and_numbers_read_as_text() {
        let mut prefs = RenderPreferences::from_json(&serde_json::json!({
            "CyclesPath": " /opt/cycles/cycles ",
            "CyclesThreads": 8,
        }))
        .unwrap();
        assert_eq!(prefs.get_string("CyclesPath", ""), "/opt/cycles/cycles");
        assert_eq!(prefs.get_string("CyclesThreads", ""), "8");
        assert_eq!(prefs.get_string("Prefix", ""), "");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RenderPreferences::load("/nonexistent/render-prefs.json").unwrap_err();
        assert!(err.to_string().starts_with("preferences - can't open"));
    }
}
