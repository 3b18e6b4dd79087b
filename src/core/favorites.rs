use serde::{Deserialize, Deserializer, Serialize};

/// Seeded on first run.
pub const DEFAULT_FAVORITES: [&str; 3] = ["ZAR", "USD", "AUD"];

/// Currency codes the user tracks. Insertion ordered, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FavoriteCurrencySet {
    codes: Vec<String>,
}

impl FavoriteCurrencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        DEFAULT_FAVORITES.iter().copied().collect()
    }

    /// Returns false if the code was already present.
    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if self.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Returns false if the code was not present.
    pub fn remove(&mut self, code: &str) -> bool {
        match self.codes.iter().position(|c| c == code) {
            Some(index) => {
                self.codes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Comma separated form used as the `symbols` query parameter.
    pub fn joined(&self) -> String {
        self.codes.join(",")
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteCurrencySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

// Goes through insert so a hand-edited store cannot smuggle in duplicates.
impl<'de> Deserialize<'de> for FavoriteCurrencySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let codes = Vec::<String>::deserialize(deserializer)?;
        Ok(codes.into_iter().collect())
    }
}
