//! Command and group identities.

use std::fmt;
use std::sync::Arc;

/// Name of a single protected command (e.g., `CreateOrderCommand`).
///
/// Appears in log fields, metric labels and the message of
/// [`ExecutionError`](crate::resilience::ExecutionError).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandKey(Arc<str>);

impl CommandKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CommandKey {
    fn default() -> Self {
        Self::from("Command")
    }
}

impl From<&str> for CommandKey {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for CommandKey {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical group a command belongs to, usually the downstream dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(Arc<str>);

impl GroupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GroupKey {
    fn default() -> Self {
        Self::from("default")
    }
}

impl From<&str> for GroupKey {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for GroupKey {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_conversion() {
        let key = CommandKey::from("CreateOrderCommand");
        assert_eq!(key.as_str(), "CreateOrderCommand");
        assert_eq!(key.to_string(), "CreateOrderCommand");
        assert_eq!(key, CommandKey::from(String::from("CreateOrderCommand")));

        let group = GroupKey::from("createOrderCommand");
        assert_eq!(group.as_str(), "createOrderCommand");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CommandKey::default().as_str(), "Command");
        assert_eq!(GroupKey::default().as_str(), "default");
    }
}
