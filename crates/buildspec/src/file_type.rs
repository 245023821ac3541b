//! Resolving project files to their [FileType] specification
use crate::fs;
use crate::project::{FileReference, Project};
use crate::registry::SpecRegistry;
use crate::settings::Environment;
use crate::spec::{FileType, SpecRecord};

/// A file reference with its path resolved and its file type specification found
#[derive(Debug, Clone, PartialEq)]
pub struct TypeResolvedFile<'r> {
    pub file_path: String,
    pub file_type: &'r SpecRecord,
}

impl<'r> TypeResolvedFile<'r> {
    /// Resolve the path of `file_reference` and find its file type
    ///
    /// The explicit file type is tried first, then the last known one, then the extension of
    /// the resolved path. Returns `None` when no file type specification matches.
    pub fn resolve<D: AsRef<str>>(
        registry: &'r SpecRegistry,
        domains: &[D],
        project: &Project,
        file_reference: &FileReference,
        environment: &dyn Environment,
    ) -> Option<Self> {
        let file_path = file_reference.resolve(project, environment);

        let declared = file_reference
            .explicit_file_type
            .as_deref()
            .or(file_reference.last_known_file_type.as_deref());

        let file_type = match declared {
            Some(identifier) => registry.file_type(identifier, domains),
            None => registry.file_type_for_extension(fs::file_extension(&file_path), domains),
        };

        let Some(file_type) = file_type else {
            tracing::trace!(path = %file_path, ?declared, "no file type specification");
            return None;
        };

        Some(Self {
            file_path,
            file_type,
        })
    }

    pub fn identifier(&self) -> &str {
        self.file_type.identifier.as_deref().unwrap_or_default()
    }

    pub fn spec(&self) -> Option<&'r FileType> {
        self.file_type.kind::<FileType>()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::settings::Settings;
    use crate::spec::{SpecVariant, ANY_DOMAIN};
    use pretty_assertions::assert_eq;

    fn registry() -> SpecRegistry {
        let mut registry = SpecRegistry::new();
        for (identifier, extensions) in [
            ("sourcecode.c.h", vec!["h"]),
            ("sourcecode.cpp.h", vec!["hpp", "hh"]),
            ("sourcecode.c.c", vec!["c"]),
        ] {
            let mut record = SpecRecord::new(
                ANY_DOMAIN,
                SpecVariant::FileType(FileType {
                    extensions: Some(extensions.into_iter().map(String::from).collect()),
                    ..Default::default()
                }),
            );
            record.identifier = Some(identifier.into());
            registry.register(record);
        }
        registry
    }

    fn resolve(reference: FileReference) -> Option<String> {
        let registry = registry();
        let project = Project {
            path: "/src".into(),
            ..Default::default()
        };
        TypeResolvedFile::resolve(&registry, &[ANY_DOMAIN], &project, &reference, &Settings::new())
            .map(|file| format!("{} {}", file.identifier(), file.file_path))
    }

    #[test]
    fn by_extension() {
        assert_eq!(
            resolve(FileReference::new("A.hpp")).as_deref(),
            Some("sourcecode.cpp.h /src/A.hpp")
        );
        assert_eq!(resolve(FileReference::new("A.txt")), None);
    }

    #[test]
    fn declared_type_wins_over_extension() {
        assert_eq!(
            resolve(FileReference::new("A.h").with_file_type("sourcecode.cpp.h")).as_deref(),
            Some("sourcecode.cpp.h /src/A.h")
        );

        let mut explicit = FileReference::new("A.h").with_file_type("sourcecode.cpp.h");
        explicit.explicit_file_type = Some("sourcecode.c.c".into());
        assert_eq!(
            resolve(explicit).as_deref(),
            Some("sourcecode.c.c /src/A.h")
        );
    }

    #[test]
    fn unknown_declared_type() {
        assert_eq!(
            resolve(FileReference::new("A.h").with_file_type("text.unknown")),
            None
        );
    }
}
