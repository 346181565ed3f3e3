/** ------------------------------------------------------------
 * Identifier lookup tables (identifier -> color, port -> flow)
 * ------------------------------------------------------------- */
use serde::{Deserialize, Serialize};
use tracing::warn;

/**
 * How an identifier is reduced before it is compared to table keys
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum KeyRule {
    /// Compare the first `len` characters only
    Prefix { len: usize },
    /// Compare the whole (trimmed) identifier
    Exact,
}

impl KeyRule {
    fn discriminator<'a>(&self, identifier: &'a str) -> &'a str {
        match self {
            KeyRule::Prefix { len } => match identifier.char_indices().nth(*len) {
                Some((end, _)) => &identifier[..end],
                None => identifier,
            },
            KeyRule::Exact => identifier.trim(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedEntry<V> {
    pub key: String,
    pub value: V,
}

/**
 * Ordered identifier table with a mandatory fallback
 *
 * Entries are checked in order; the first key equal to the reduced
 * identifier wins. Identifiers matching no entry map to `default`.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedTable<V> {
    pub rule: KeyRule,
    pub entries: Vec<KeyedEntry<V>>,
    pub default: V,
}

impl<V> KeyedTable<V> {
    pub fn new(rule: KeyRule, default: V) -> Self {
        Self {
            rule,
            entries: Vec::new(),
            default,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: V) -> Self {
        self.entries.push(KeyedEntry {
            key: key.into(),
            value,
        });
        self
    }

    /**
     * Entry for `identifier`, if the table has one
     */
    pub fn resolve(&self, identifier: &str) -> Option<&V> {
        let wanted = self.rule.discriminator(identifier);
        self.entries
            .iter()
            .find(|entry| entry.key == wanted)
            .map(|entry| &entry.value)
    }

    /**
     * Entry for `identifier`, falling back to the default with a warning
     */
    pub fn lookup(&self, identifier: &str) -> &V {
        self.resolve(identifier).unwrap_or_else(|| {
            warn!(identifier, "no table entry for identifier, using default");
            &self.default
        })
    }
}
