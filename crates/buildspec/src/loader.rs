//! Loading specification documents into a [SpecRegistry]
//!
//! A document holds either a single specification (an object) or a list of them. Each object
//! is dispatched on its `Type` tag to the parser of that kind. Inheritance (`BasedOn`) is
//! resolved while parsing, so a base has to be registered before the records based on it.
use crate::document::{self, DocumentError};
use crate::registry::SpecRegistry;
use crate::spec::{self, SpecKey, SpecRecord, SpecType, Unpack, ANY_DOMAIN};
use crate::value::{Object, Value};
use std::path::{Path, PathBuf};

/// File extensions picked up by [SpecDocumentLoader::load_directory]
pub const DOCUMENT_EXTENSIONS: &[&str] = &["xcspec", "json", "yaml", "yml", "hcl"];

#[derive(thiserror::Error, Debug)]
pub enum SpecError {
    #[error("specification missing type")]
    MissingType,
    #[error("specification type '{0}' not supported")]
    UnsupportedType(String),
    #[error("cannot find base {spec_type} specification '{domain}:{identifier}'")]
    BaseNotFound {
        spec_type: SpecType,
        domain: String,
        identifier: String,
    },
    #[error("inheritance cycle: {record} is based on {base} which derives from it")]
    InheritanceCycle { record: SpecKey, base: SpecKey },
    #[error("invalid specification path {path}")]
    UnreadablePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to read specification document {path}")]
    UnparsableDocument {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
    #[error("specification document {0} does not contain an object nor an array")]
    NotARecordOrSequence(PathBuf),
    #[error("none of the {errors} specifications in {path} could be loaded")]
    NoRecordsLoaded { path: PathBuf, errors: usize },
    #[error("no specification documents found in {0}")]
    NoDocumentsFound(PathBuf),
}

/// Outcome of loading one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub errors: usize,
}

impl std::ops::AddAssign for LoadReport {
    fn add_assign(&mut self, rhs: Self) {
        self.loaded += rhs.loaded;
        self.errors += rhs.errors;
    }
}

/// Parsing context shared by all records of a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDocumentLoader {
    /// Domain of records that do not declare one
    pub domain: String,
    /// Type tag of records without a `Type` key
    pub default_type: Option<String>,
    /// Report unknown keys
    pub check: bool,
}

impl Default for SpecDocumentLoader {
    fn default() -> Self {
        Self {
            domain: ANY_DOMAIN.to_string(),
            default_type: None,
            check: false,
        }
    }
}

impl SpecDocumentLoader {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }

    pub fn with_default_type(mut self, default_type: impl Into<String>) -> Self {
        self.default_type = Some(default_type.into());
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// The `Type` tag of a document object, or the default type
    fn determine_type<'a>(&'a self, object: &'a Object) -> Option<&'a str> {
        match object.get("Type").and_then(Value::as_str) {
            Some(tag) if !tag.is_empty() => Some(tag),
            _ => self.default_type.as_deref().filter(|tag| !tag.is_empty()),
        }
    }

    /// Parse one specification object, resolving its base in `registry`
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn parse_one(&self, registry: &SpecRegistry, object: &Object) -> Result<SpecRecord, SpecError> {
        let tag = self.determine_type(object).ok_or(SpecError::MissingType)?;
        let kind =
            spec::kind_for_tag(tag).ok_or_else(|| SpecError::UnsupportedType(tag.to_string()))?;
        let spec_type = kind.spec_type;

        let mut unpack = Unpack::new(object);
        let _ = unpack.string("Type");
        let clazz = unpack.string("Class");
        let identifier = unpack.string("Identifier");
        let based_on = unpack.string("BasedOn");
        let domain = unpack.string("Domain");
        let is_global_domain_in_ui = unpack.boolean("IsGlobalDomainInUI");
        let name = unpack.string("Name");
        let description = unpack.string("Description");
        let vendor = unpack.string("Vendor");
        let version = unpack.string("Version");

        let domain = domain.unwrap_or_else(|| self.domain.clone());
        let own_key = SpecKey::new(
            spec_type,
            identifier.clone().unwrap_or_default(),
            domain.clone(),
        );

        let base = match based_on {
            Some(based_on) => self.resolve_base(registry, &own_key, &based_on)?,
            None => None,
        };

        let variant = (kind.parse)(&mut unpack, base.map(|base| &base.variant));
        let mut record = SpecRecord::new(domain, variant);
        record.identifier = identifier;

        // inherited values first, declared keys below replace them
        if let Some(base) = base {
            record.inherit(base);
        }

        if clazz.is_some() {
            record.clazz = clazz;
        }
        if let Some(is_global_domain_in_ui) = is_global_domain_in_ui {
            record.is_global_domain_in_ui = is_global_domain_in_ui;
        }
        if name.is_some() {
            record.name = name;
        }
        if description.is_some() {
            record.description = description;
        }
        if vendor.is_some() {
            record.vendor = vendor;
        }
        if version.is_some() {
            record.version = version;
        }

        for issue in unpack.complete(self.check) {
            tracing::warn!(
                spec_type = %spec_type,
                identifier = record.identifier.as_deref().unwrap_or_default(),
                %issue,
                "specification key issue"
            );
        }

        Ok(record)
    }

    /// Find the base named by a `BasedOn` value (`identifier` or `domain:identifier`)
    ///
    /// A base that is the record itself counts as no base at all.
    fn resolve_base<'r>(
        &self,
        registry: &'r SpecRegistry,
        own_key: &SpecKey,
        based_on: &str,
    ) -> Result<Option<&'r SpecRecord>, SpecError> {
        let (domain, identifier) = based_on
            .split_once(':')
            .unwrap_or((ANY_DOMAIN, based_on));
        let spec_type = own_key.spec_type;

        let base = registry
            .lookup(spec_type, identifier, &[domain])
            .ok_or_else(|| SpecError::BaseNotFound {
                spec_type,
                domain: domain.to_string(),
                identifier: identifier.to_string(),
            })?;

        let base_key = base.key();
        if &base_key == own_key {
            tracing::warn!(key = %own_key, "specification is based on itself, ignoring BasedOn");
            return Ok(None);
        }

        if registry
            .ancestors(&base_key)
            .iter()
            .any(|ancestor| &ancestor.key() == own_key)
        {
            return Err(SpecError::InheritanceCycle {
                record: own_key.clone(),
                base: base_key,
            });
        }

        Ok(Some(base))
    }

    /// Load a document holding one specification or a list of them
    ///
    /// A list succeeds as long as at least one of its entries loaded; failing entries are
    /// logged and counted in [LoadReport::errors].
    pub fn load_document(
        &self,
        registry: &mut SpecRegistry,
        path: &Path,
    ) -> Result<LoadReport, SpecError> {
        let path = path.canonicalize().map_err(|source| SpecError::UnreadablePath {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path=%path.display(), "loading specification document");

        let root = document::read_document(&path).map_err(|source| {
            SpecError::UnparsableDocument {
                path: path.clone(),
                source,
            }
        })?;

        match root {
            Value::Object(object) => {
                let record = self.parse_one(registry, &object)?;
                registry.register(record);
                Ok(LoadReport {
                    loaded: 1,
                    errors: 0,
                })
            }
            Value::Array(entries) => {
                let mut report = LoadReport::default();
                for (index, entry) in entries.iter().enumerate() {
                    let Value::Object(object) = entry else {
                        tracing::warn!(path=%path.display(), index, kind = entry.kind(), "specification entry was not an object");
                        report.errors += 1;
                        continue;
                    };

                    match self.parse_one(registry, object) {
                        Ok(record) => {
                            registry.register(record);
                            report.loaded += 1;
                        }
                        Err(error) => {
                            tracing::warn!(path=%path.display(), index, %error, "skipping specification");
                            report.errors += 1;
                        }
                    }
                }

                if report.errors < entries.len() {
                    Ok(report)
                } else {
                    Err(SpecError::NoRecordsLoaded {
                        path,
                        errors: report.errors,
                    })
                }
            }
            _ => Err(SpecError::NotARecordOrSequence(path)),
        }
    }

    /// Load every specification document in a directory, in file name order
    ///
    /// Documents that fail are logged and skipped.
    pub fn load_directory(
        &self,
        registry: &mut SpecRegistry,
        dir_path: &Path,
    ) -> Result<LoadReport, SpecError> {
        let unreadable = |source| SpecError::UnreadablePath {
            path: dir_path.to_path_buf(),
            source,
        };

        let mut paths = vec![];
        for dir_entry in std::fs::read_dir(dir_path).map_err(unreadable)? {
            let dir_entry = dir_entry.map_err(unreadable)?;
            if !dir_entry.file_type().map_err(unreadable)?.is_file() {
                continue;
            }

            let path = dir_entry.path();
            let is_document = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| DOCUMENT_EXTENSIONS.contains(&e));
            if is_document {
                paths.push(path);
            }
        }
        paths.sort();

        let mut total = LoadReport::default();
        let mut any_documents_loaded = false;
        for path in paths {
            match self.load_document(registry, &path) {
                Ok(report) => {
                    total += report;
                    any_documents_loaded = true;
                }
                Err(error) => {
                    tracing::warn!(path=%path.display(), %error, "skipping specification document");
                    total.errors += 1;
                }
            }
        }

        if !any_documents_loaded {
            return Err(SpecError::NoDocumentsFound(dir_path.to_path_buf()));
        }

        Ok(total)
    }
}
