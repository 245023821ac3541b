//! Specification records
//!
//! A specification describes one build system concept (a tool, a file type, a product type, ...).
//! Every record carries the common fields of [SpecRecord] plus a kind specific payload
//! ([SpecVariant]). Records are keyed by [SpecKey] in the [crate::registry::SpecRegistry].
mod unpack;
mod variant;

pub(crate) use unpack::Unpack;
pub use variant::*;

use std::fmt::Formatter;

/// Wildcard domain, searched after any explicitly requested domain
pub const ANY_DOMAIN: &str = "*";

/// The closed set of specification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecType {
    Architecture,
    BuildPhase,
    BuildSettings,
    BuildStep,
    BuildSystem,
    Compiler,
    FileType,
    Linker,
    PackageType,
    ProductType,
    PropertyConditionFlavor,
    Tool,
}

impl SpecType {
    /// Type tag as written in the `Type` key of a document
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecType::Architecture => "Architecture",
            SpecType::BuildPhase => "BuildPhase",
            SpecType::BuildSettings => "BuildSettings",
            SpecType::BuildStep => "BuildStep",
            SpecType::BuildSystem => "BuildSystem",
            SpecType::Compiler => "Compiler",
            SpecType::FileType => "FileType",
            SpecType::Linker => "Linker",
            SpecType::PackageType => "PackageType",
            SpecType::ProductType => "ProductType",
            SpecType::PropertyConditionFlavor => "PropertyConditionFlavor",
            SpecType::Tool => "Tool",
        }
    }

    /// Look up a type tag in the parser table
    pub fn from_tag(tag: &str) -> Option<SpecType> {
        variant::kind_for_tag(tag).map(|kind| kind.spec_type)
    }
}

impl std::fmt::Display for SpecType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a record in the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_new::new)]
pub struct SpecKey {
    pub spec_type: SpecType,
    pub identifier: String,
    pub domain: String,
}

impl std::fmt::Display for SpecKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}:{}'", self.spec_type, self.domain, self.identifier)
    }
}

/// A fully resolved specification
///
/// Inherited fields are copied from the base when the record is parsed; `base` only records
/// where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRecord {
    pub clazz: Option<String>,
    pub domain: String,
    pub identifier: Option<String>,
    pub is_global_domain_in_ui: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub base: Option<SpecKey>,
    pub variant: SpecVariant,
}

impl SpecRecord {
    /// An empty record of the given kind
    pub fn new(domain: impl Into<String>, variant: SpecVariant) -> Self {
        Self {
            clazz: None,
            domain: domain.into(),
            identifier: None,
            is_global_domain_in_ui: false,
            name: None,
            description: None,
            vendor: None,
            version: None,
            base: None,
            variant,
        }
    }

    pub fn spec_type(&self) -> SpecType {
        self.variant.spec_type()
    }

    pub fn key(&self) -> SpecKey {
        SpecKey::new(
            self.spec_type(),
            self.identifier.clone().unwrap_or_default(),
            self.domain.clone(),
        )
    }

    /// Kind specific payload, if the record is of kind `K`
    pub fn kind<K: SpecKind>(&self) -> Option<&K> {
        K::unwrap(&self.variant)
    }

    /// Copy the inheritable common fields of `base`
    ///
    /// Returns `false` (and changes nothing) when `base` is this record.
    pub fn inherit(&mut self, base: &SpecRecord) -> bool {
        let key = base.key();
        if key == self.key() {
            return false;
        }

        self.base = Some(key);
        self.clazz = base.clazz.clone();
        self.is_global_domain_in_ui = base.is_global_domain_in_ui;
        self.name = base.name.clone();
        self.description = base.description.clone();
        self.vendor = base.vendor.clone();
        self.version = base.version.clone();
        true
    }
}
