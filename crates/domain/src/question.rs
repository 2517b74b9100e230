use std::fmt;
use std::sync::Arc;

/// Cache key for a single DNS question: `lowercase(name) + ":" + type`.
///
/// Class is not part of the key because only the Internet class is ever
/// accepted by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuestionKey(Arc<str>);

impl QuestionKey {
    pub fn new(name: &str, type_mnemonic: &str) -> Self {
        let mut key = String::with_capacity(name.len() + type_mnemonic.len() + 1);
        key.push_str(&name.to_ascii_lowercase());
        key.push(':');
        key.push_str(type_mnemonic);
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
