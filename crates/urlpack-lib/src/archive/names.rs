use crate::input::join_within_limit;
use std::collections::HashSet;

/// Hands out unique archive entry names in request order.
///
/// The first claim of a name gets it unchanged; later claims become `stem-2.ext`, `stem-3.ext`, ...
/// with the stem shortened when the suffix would push the name past the length limit.
#[derive(Debug, Default)]
pub struct EntryNames {
    taken: HashSet<String>,
}

impl EntryNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &str) -> String {
        if self.taken.insert(name.to_string()) {
            return name.to_string();
        }

        let (stem, extension) = match name.rfind('.') {
            Some(dot) if dot > 0 => name.split_at(dot),
            _ => (name, ""),
        };
        let unique = (2u32..)
            .map(|n| join_within_limit(stem, &format!("-{n}{extension}")))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or_else(|| name.to_string());

        tracing::warn!(requested = name, resolved = %unique, "Duplicate file name, renaming entry");
        self.taken.insert(unique.clone());
        unique
    }
}
