//! Coding paths: where the decoder currently is inside a document.

use std::cmp::Ordering;
use std::fmt;

/// One step of a coding path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodingKey {
    Key(String),
    Index(usize),
}

impl CodingKey {
    pub fn is_index(&self) -> bool {
        matches!(self, CodingKey::Index(_))
    }

    /// Indices order numerically, keys by byte order, and indices sort before
    /// keys.
    pub fn path_cmp(&self, other: &CodingKey) -> Ordering {
        match (self, other) {
            (CodingKey::Index(a), CodingKey::Index(b)) => a.cmp(b),
            (CodingKey::Key(a), CodingKey::Key(b)) => a.cmp(b),
            (CodingKey::Index(_), CodingKey::Key(_)) => Ordering::Less,
            (CodingKey::Key(_), CodingKey::Index(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for CodingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodingKey::Key(k) => f.write_str(k),
            CodingKey::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl From<&str> for CodingKey {
    fn from(value: &str) -> Self {
        CodingKey::Key(value.to_owned())
    }
}

impl From<usize> for CodingKey {
    fn from(value: usize) -> Self {
        CodingKey::Index(value)
    }
}

/// Sequence of keys and indices from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodingPath(Vec<CodingKey>);

impl CodingPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: CodingKey) {
        self.0.push(key);
    }

    pub fn pop(&mut self) -> Option<CodingKey> {
        self.0.pop()
    }

    pub fn keys(&self) -> &[CodingKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&CodingKey> {
        self.0.last()
    }

    /// Length of the prefix shared with `other`.
    pub fn common_prefix_len(&self, other: &CodingPath) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    pub fn path_cmp(&self, other: &CodingPath) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let ord = a.path_cmp(b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl From<Vec<CodingKey>> for CodingPath {
    fn from(value: Vec<CodingKey>) -> Self {
        Self(value)
    }
}

impl fmt::Display for CodingPath {
    /// `users[3].address.city`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 && !key.is_index() {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(keys: &[CodingKey]) -> CodingPath {
        CodingPath::from(keys.to_vec())
    }

    #[test]
    fn display() {
        let p = path(&["users".into(), 3usize.into(), "address".into()]);
        assert_eq!(p.to_string(), "users[3].address");
        assert_eq!(CodingPath::new().to_string(), "");
    }

    #[test]
    fn ordering_and_prefix() {
        let a = path(&["items".into(), 2usize.into()]);
        let b = path(&["items".into(), 10usize.into()]);
        assert_eq!(a.path_cmp(&b), Ordering::Less);
        assert_eq!(a.common_prefix_len(&b), 1);
        assert_eq!(CodingPath::new().path_cmp(&a), Ordering::Less);
    }
}
