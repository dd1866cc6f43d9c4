//! Recorded transport traffic, replayed in file order.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use videorelay_core::WireMessage;

/// A YAML scenario file.
///
/// ```yaml
/// name: renegotiate
/// messages:
///   - tag: 3
///     args: { width: 640, height: 480 }
///   - tag: 6
///     args: { quality: 2 }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub messages: Vec<WireMessage>,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_messages_in_file_order() {
        let scenario = Scenario::from_yaml(
            "name: renegotiate\n\
             messages:\n  \
               - tag: 3\n    \
                 args: { width: 640, height: 480 }\n  \
               - tag: 6\n    \
                 args: { quality: 2 }\n",
        )
        .unwrap();

        assert_eq!(scenario.name.as_deref(), Some("renegotiate"));
        let tags: Vec<u32> = scenario.messages.iter().map(|m| m.tag).collect();
        assert_eq!(tags, vec![3, 6]);
    }

    #[test]
    fn missing_messages_is_an_error() {
        assert!(Scenario::from_yaml("name: empty\n").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Scenario::load(Path::new("no/such/scenario.yaml")).unwrap_err();
        assert!(err.to_string().contains("no/such/scenario.yaml"));
    }
}
