//! Ordered scanner configuration
use super::defaults::{self, DEFAULT_KEYS};
use super::definition::Scanner;
use crate::logging::codes;
use once_cell::sync::Lazy;

static DEFAULT_SCANNERS: Lazy<ScannerSet> = Lazy::new(|| ScannerSet::build_defaults(false));
static CASE_SENSITIVE_SCANNERS: Lazy<ScannerSet> = Lazy::new(|| ScannerSet::build_defaults(true));

/// Ordered list of keyed scanners; the first scanner to accept the input wins
#[derive(Debug, Clone, Default)]
pub struct ScannerSet {
    entries: Vec<(String, Scanner)>,
}

impl ScannerSet {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in scanners in canonical order, lower-casing identifiers
    pub fn defaults() -> Self {
        DEFAULT_SCANNERS.clone()
    }

    /// All built-in scanners, keeping identifier case when `case_sensitive`
    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        if case_sensitive {
            CASE_SENSITIVE_SCANNERS.clone()
        } else {
            DEFAULT_SCANNERS.clone()
        }
    }

    fn build_defaults(case_sensitive: bool) -> Self {
        let entries = DEFAULT_KEYS
            .iter()
            .filter_map(|key| defaults::builtin(key, case_sensitive).map(|s| (key.to_string(), s)))
            .collect();
        Self { entries }
    }

    /// Keep only the scanners whose key is listed, in their existing order.
    ///
    /// Unknown keys are skipped with a warning.
    pub fn restrict_to<K: AsRef<str>>(mut self, keys: &[K]) -> Self {
        let before = self.entries.len();
        for key in keys {
            let key = key.as_ref();
            if !self.contains(key) {
                log_warning!("Ignoring unknown scanner key", "key" => key);
            }
        }

        self.entries
            .retain(|(key, _)| keys.iter().any(|k| k.as_ref() == key));

        log_debug!("Restricted scanner set",
            "requested" => keys.len(),
            "before" => before,
            "after" => self.entries.len()
        );
        log_success!(
            codes::success::SCANNER_SET_CONFIGURED,
            "Scanner set configured",
            "scanners" => self.keys().collect::<Vec<_>>().join(",")
        );

        self
    }

    /// Append a scanner after all existing ones
    pub fn register(&mut self, key: impl Into<String>, scanner: Scanner) -> &mut Self {
        let key = key.into();
        log_debug!("Registered scanner",
            "key" => key,
            "category" => scanner.category(),
            "position" => self.entries.len()
        );
        self.entries.push((key, scanner));
        self
    }

    pub fn scanners(&self) -> impl Iterator<Item = &Scanner> {
        self.entries.iter().map(|(_, scanner)| scanner)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Scanner> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, scanner)| scanner)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
