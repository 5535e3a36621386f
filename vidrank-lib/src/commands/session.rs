use crate::Result;
use crate::facts::SearchTarget;
use core::fmt::{Debug, Formatter};
use ohno::bail;

/// Most API keys a session holds.
pub const MAX_API_KEYS: usize = 5;

/// Number of trailing key characters left visible when a key is displayed.
const VISIBLE_KEY_CHARS: usize = 5;

/// Per-invocation state owned by the command layer.
///
/// The pipeline never sees this; it only receives the records the session's key fetched.
pub struct Session {
    api_keys: Vec<String>,
    selected: usize,
    last_query: Option<SearchTarget>,
    api_calls: u32,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("api_keys", &self.masked_keys())
            .field("selected", &self.selected)
            .field("last_query", &self.last_query)
            .field("api_calls", &self.api_calls)
            .finish()
    }
}

impl Session {
    /// Create a session from the supplied keys, selecting the first one.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is given, more than [`MAX_API_KEYS`] are given, or a key is blank
    pub fn new<I, S>(api_keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let api_keys: Vec<String> = api_keys.into_iter().map(|k| k.into().trim().to_string()).collect();

        if api_keys.is_empty() {
            bail!("no YouTube API key given, use --api-key or set YOUTUBE_API_KEY");
        }

        if api_keys.len() > MAX_API_KEYS {
            bail!("at most {MAX_API_KEYS} YouTube API keys can be used, got {}", api_keys.len());
        }

        if let Some(position) = api_keys.iter().position(String::is_empty) {
            bail!("YouTube API key #{} is empty", position + 1);
        }

        Ok(Self {
            api_keys,
            selected: 0,
            last_query: None,
            api_calls: 0,
        })
    }

    /// Select the key at a one-based `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no key at that position
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index == 0 || index > self.api_keys.len() {
            bail!("API key index {index} is out of range, {} key(s) available", self.api_keys.len());
        }

        self.selected = index - 1;
        Ok(())
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_keys[self.selected]
    }

    /// One-based index of the selected key.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected + 1
    }

    #[must_use]
    pub fn masked_api_key(&self) -> String {
        mask_key(self.api_key())
    }

    #[must_use]
    pub fn masked_keys(&self) -> Vec<String> {
        self.api_keys.iter().map(|k| mask_key(k)).collect()
    }

    pub fn record_query(&mut self, target: SearchTarget) {
        self.last_query = Some(target);
    }

    #[must_use]
    pub const fn last_query(&self) -> Option<&SearchTarget> {
        self.last_query.as_ref()
    }

    pub const fn add_api_calls(&mut self, calls: u32) {
        self.api_calls = self.api_calls.saturating_add(calls);
    }

    #[must_use]
    pub const fn api_calls(&self) -> u32 {
        self.api_calls
    }
}

/// Replace all but the last five characters of `key` with asterisks.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    let hidden = len.saturating_sub(VISIBLE_KEY_CHARS);
    "*".repeat(hidden) + &key.chars().skip(hidden).collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_selects_first_key() {
        let session = Session::new(["key-one-11111", "key-two-22222"]).unwrap();
        assert_eq!(session.api_key(), "key-one-11111");
        assert_eq!(session.selected(), 1);
        assert_eq!(session.api_calls(), 0);
        assert!(session.last_query().is_none());
    }

    #[test]
    fn test_new_trims_keys() {
        let session = Session::new([" abc "]).unwrap();
        assert_eq!(session.api_key(), "abc");
    }

    #[test]
    fn test_new_rejects_no_keys() {
        let err = Session::new(Vec::<String>::new()).unwrap_err();
        assert!(err.to_string().contains("YOUTUBE_API_KEY"));
    }

    #[test]
    fn test_new_caps_at_five_keys() {
        let _ = Session::new(["a", "b", "c", "d", "e"]).unwrap();
        let err = Session::new(["a", "b", "c", "d", "e", "f"]).unwrap_err();
        assert!(err.to_string().contains("at most 5"));
    }

    #[test]
    fn test_new_rejects_blank_key() {
        let err = Session::new(["good", "  "]).unwrap_err();
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_select() {
        let mut session = Session::new(["first", "second"]).unwrap();
        session.select(2).unwrap();
        assert_eq!(session.api_key(), "second");
        assert_eq!(session.selected(), 2);
        assert_eq!(session.masked_api_key(), "*econd");

        assert!(session.select(0).is_err());
        assert!(session.select(3).is_err());
        assert_eq!(session.api_key(), "second");
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("AIzaSyA1234567890"), "************67890");
        assert_eq!(mask_key("12345"), "12345");
        assert_eq!(mask_key("abc"), "abc");
        assert_eq!(mask_key(""), "");
    }

    #[test]
    fn test_debug_never_shows_full_key() {
        let session = Session::new(["supersecretkey"]).unwrap();
        let debug = format!("{session:?}");
        assert!(!debug.contains("supersecretkey"));
        assert!(debug.contains("*********etkey"));
    }

    #[test]
    fn test_query_and_call_tracking() {
        let mut session = Session::new(["k"]).unwrap();
        session.record_query(SearchTarget::Keyword("rust".into()));
        session.add_api_calls(2);
        session.add_api_calls(u32::MAX);

        assert_eq!(session.last_query(), Some(&SearchTarget::Keyword("rust".into())));
        assert_eq!(session.api_calls(), u32::MAX);
    }
}
