//! Domain keyed store of [SpecRecord]s
//!
//! The registry is filled once by the [crate::loader::SpecDocumentLoader] and is read-only
//! afterwards. Lookups search the requested domains in order and fall back to
//! [ANY_DOMAIN].
use crate::spec::{SpecKey, SpecRecord, SpecType, ANY_DOMAIN};
use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpecRegistry {
    records: IndexMap<SpecKey, SpecRecord>,
}

impl SpecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its key; the last registration of a key wins
    pub fn register(&mut self, record: SpecRecord) {
        let key = record.key();
        if self.records.contains_key(&key) {
            tracing::debug!(%key, "replacing specification");
        } else {
            tracing::trace!(%key, "registering specification");
        }
        self.records.insert(key, record);
    }

    /// First record of `spec_type` and `identifier` in `domains`, then in [ANY_DOMAIN]
    pub fn lookup<D: AsRef<str>>(
        &self,
        spec_type: SpecType,
        identifier: &str,
        domains: &[D],
    ) -> Option<&SpecRecord> {
        search_order(domains).find_map(|domain| {
            self.records
                .get(&SpecKey::new(spec_type, identifier.to_string(), domain.to_string()))
        })
    }

    pub fn get(&self, key: &SpecKey) -> Option<&SpecRecord> {
        self.records.get(key)
    }

    pub fn tool<D: AsRef<str>>(&self, identifier: &str, domains: &[D]) -> Option<&SpecRecord> {
        self.lookup(SpecType::Tool, identifier, domains)
    }

    pub fn file_type<D: AsRef<str>>(&self, identifier: &str, domains: &[D]) -> Option<&SpecRecord> {
        self.lookup(SpecType::FileType, identifier, domains)
    }

    pub fn product_type<D: AsRef<str>>(
        &self,
        identifier: &str,
        domains: &[D],
    ) -> Option<&SpecRecord> {
        self.lookup(SpecType::ProductType, identifier, domains)
    }

    /// First file type (in registration order) declaring `extension`, per domain in search order
    pub fn file_type_for_extension<D: AsRef<str>>(
        &self,
        extension: &str,
        domains: &[D],
    ) -> Option<&SpecRecord> {
        search_order(domains).find_map(|domain| {
            self.records.values().find(|record| {
                record.domain == domain
                    && record
                        .kind::<crate::spec::FileType>()
                        .is_some_and(|file_type| file_type.matches_extension(extension))
            })
        })
    }

    /// Records the inheritance chain of `key` passes through, nearest base first
    ///
    /// Stops at the first key that is missing from the registry or was already visited.
    pub fn ancestors(&self, key: &SpecKey) -> Vec<&SpecRecord> {
        let mut visited = IndexSet::new();
        visited.insert(key.clone());

        let mut out = vec![];
        let mut next = self.records.get(key).and_then(|record| record.base.as_ref());
        while let Some(base_key) = next {
            if !visited.insert(base_key.clone()) {
                break;
            }
            let Some(base) = self.records.get(base_key) else {
                break;
            };
            out.push(base);
            next = base.base.as_ref();
        }
        out
    }

    /// All records in registration order
    pub fn records(&self) -> impl Iterator<Item = &SpecRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Requested domains followed by the wildcard domain, without repeating it
fn search_order<D: AsRef<str>>(domains: &[D]) -> impl Iterator<Item = &str> {
    domains
        .iter()
        .map(AsRef::as_ref)
        .filter(|domain| *domain != ANY_DOMAIN)
        .chain(std::iter::once(ANY_DOMAIN))
}
