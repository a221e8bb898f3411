//! Instance addressing: `<instanceId>` or `<instanceId>:<appName>`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fallback for a missing instance id or app name.
pub const DEFAULT_NAME: &str = "default";

pub const INSTANCE_DELIMITER: char = ':';

/// A raw instance string resolved into its session and app parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceAddress {
    pub instance: String,
    pub app: String,
}

impl InstanceAddress {
    pub fn new(instance: impl Into<String>, app: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            app: app.into(),
        }
    }

    /// Split on the first delimiter; empty or missing parts become `"default"`.
    pub fn parse(raw: &str) -> Self {
        let (instance, app) = match raw.split_once(INSTANCE_DELIMITER) {
            Some((instance, app)) => (instance, app),
            None => (raw, ""),
        };
        Self {
            instance: or_default(instance),
            app: or_default(app),
        }
    }

    pub fn is_default_app(&self) -> bool {
        self.app == DEFAULT_NAME
    }
}

fn or_default(part: &str) -> String {
    if part.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        part.to_string()
    }
}

impl Default for InstanceAddress {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_NAME)
    }
}

impl FromStr for InstanceAddress {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for InstanceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.instance, INSTANCE_DELIMITER, self.app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bare_instance_defaults_app() {
        let address = InstanceAddress::parse("session-abc123");
        assert_eq!(address.instance, "session-abc123");
        assert_eq!(address.app, "default");
    }

    #[test]
    fn test_composite_instance() {
        let address = InstanceAddress::parse("session-abc123:trek");
        assert_eq!(address, InstanceAddress::new("session-abc123", "trek"));
    }

    #[test]
    fn test_empty_parts_default() {
        assert_eq!(InstanceAddress::parse(""), InstanceAddress::default());
        assert_eq!(
            InstanceAddress::parse(":dream"),
            InstanceAddress::new("default", "dream")
        );
        assert_eq!(
            InstanceAddress::parse("s1:"),
            InstanceAddress::new("s1", "default")
        );
    }

    #[test]
    fn test_splits_on_first_delimiter_only() {
        let address = InstanceAddress::parse("s1:app:extra");
        assert_eq!(address.instance, "s1");
        assert_eq!(address.app, "app:extra");
    }

    proptest! {
        #[test]
        fn prop_display_round_trips(instance in "[a-z0-9-]{1,16}", app in "[a-z0-9-]{1,16}") {
            let address = InstanceAddress::new(instance, app);
            prop_assert_eq!(InstanceAddress::parse(&address.to_string()), address);
        }

        #[test]
        fn prop_parse_never_yields_empty_parts(raw in ".{0,32}") {
            let address = InstanceAddress::parse(&raw);
            prop_assert!(!address.instance.is_empty());
            prop_assert!(!address.app.is_empty());
        }
    }
}
