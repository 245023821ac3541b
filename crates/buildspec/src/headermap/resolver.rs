use super::{HeaderTable, HeadermapInfo, SearchPaths};
use crate::file_type::TypeResolvedFile;
use crate::fs::{self, Filesystem};
use crate::invocation::{AuxiliaryFile, ToolInvocation};
use crate::project::{BuildPhaseKind, FileReference, GroupItem, Project, Target};
use crate::registry::SpecRegistry;
use crate::settings::Environment;
use crate::spec::{SpecRecord, ANY_DOMAIN};
use indexmap::IndexSet;

pub const USE_HEADERMAP: &str = "USE_HEADERMAP";
pub const HEADERMAP_USES_VFS: &str = "HEADERMAP_USES_VFS";
pub const HEADERMAP_INCLUDES_FLAT_ENTRIES_FOR_TARGET_BEING_BUILT: &str =
    "HEADERMAP_INCLUDES_FLAT_ENTRIES_FOR_TARGET_BEING_BUILT";
pub const HEADERMAP_INCLUDES_FRAMEWORK_ENTRIES_FOR_ALL_PRODUCT_TYPES: &str =
    "HEADERMAP_INCLUDES_FRAMEWORK_ENTRIES_FOR_ALL_PRODUCT_TYPES";
pub const HEADERMAP_INCLUDES_PROJECT_HEADERS: &str = "HEADERMAP_INCLUDES_PROJECT_HEADERS";
pub const ALWAYS_USE_SEPARATE_HEADERMAPS: &str = "ALWAYS_USE_SEPARATE_HEADERMAPS";
pub const ALWAYS_SEARCH_USER_PATHS: &str = "ALWAYS_SEARCH_USER_PATHS";

pub const CPP_HEADERMAP_FILE: &str = "CPP_HEADERMAP_FILE";
pub const CPP_HEADERMAP_FILE_FOR_OWN_TARGET_HEADERS: &str =
    "CPP_HEADERMAP_FILE_FOR_OWN_TARGET_HEADERS";
pub const CPP_HEADERMAP_FILE_FOR_ALL_TARGET_HEADERS: &str =
    "CPP_HEADERMAP_FILE_FOR_ALL_TARGET_HEADERS";
pub const CPP_HEADERMAP_FILE_FOR_ALL_NON_FRAMEWORK_TARGET_HEADERS: &str =
    "CPP_HEADERMAP_FILE_FOR_ALL_NON_FRAMEWORK_TARGET_HEADERS";
pub const CPP_HEADERMAP_FILE_FOR_GENERATED_FILES: &str = "CPP_HEADERMAP_FILE_FOR_GENERATED_FILES";
pub const CPP_HEADERMAP_FILE_FOR_PROJECT_FILES: &str = "CPP_HEADERMAP_FILE_FOR_PROJECT_FILES";

const HEADER_FILE_TYPES: &[&str] = &["sourcecode.c.h", "sourcecode.cpp.h"];
const HEADER_EXTENSIONS: &[&str] = &["h", "hpp"];

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ResolverError {
    #[error("could not find headermap tool {0}")]
    ToolNotFound(String),
}

/// Everything the resolver reads about the target being built
#[derive(derive_new::new)]
pub struct TargetContext<'a> {
    pub project: &'a Project,
    pub target: &'a Target,
    pub search_paths: &'a SearchPaths,
    pub environment: &'a dyn Environment,
    pub filesystem: &'a dyn Filesystem,
    /// Base of relative header search paths
    pub working_directory: &'a str,
}

impl TargetContext<'_> {
    fn is_target_being_built(&self, target: &Target) -> bool {
        target.name == self.target.name
    }
}

/// Feature flags controlling which tables receive which entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadermapFlags {
    pub include_flat_entries_for_target_being_built: bool,
    pub include_framework_entries_for_all_product_types: bool,
    pub include_project_headers: bool,
}

impl HeadermapFlags {
    pub fn from_environment(environment: &dyn Environment) -> Self {
        Self {
            include_flat_entries_for_target_being_built: environment
                .resolve_boolean(HEADERMAP_INCLUDES_FLAT_ENTRIES_FOR_TARGET_BEING_BUILT),
            include_framework_entries_for_all_product_types: environment
                .resolve_boolean(HEADERMAP_INCLUDES_FRAMEWORK_ENTRIES_FOR_ALL_PRODUCT_TYPES),
            include_project_headers: environment
                .resolve_boolean(HEADERMAP_INCLUDES_PROJECT_HEADERS),
        }
    }
}

/// The tables built for one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headermaps {
    /// Flat entries for everything visible to the target (`CPP_HEADERMAP_FILE`)
    pub target_name: HeaderTable,
    pub own_target_headers: HeaderTable,
    pub all_target_headers: HeaderTable,
    pub all_non_framework_target_headers: HeaderTable,
    pub generated_files: HeaderTable,
    pub project_headers: HeaderTable,
}

/// Directory with a trailing `/`, as stored in header map entries
fn directory_prefix(directory: &str) -> String {
    if directory.ends_with('/') {
        directory.to_string()
    } else {
        format!("{directory}/")
    }
}

/// Builds the header maps of a target and decides how the compiler searches them
#[derive(Debug)]
pub struct HeadermapResolver<'r> {
    tool: &'r SpecRecord,
    registry: &'r SpecRegistry,
}

impl<'r> HeadermapResolver<'r> {
    pub const TOOL_IDENTIFIER: &'static str = "com.apple.commands.built-in.headermap-generator";

    /// Find the headermap tool specification in `domains`
    pub fn new<D: AsRef<str>>(
        registry: &'r SpecRegistry,
        domains: &[D],
    ) -> Result<Self, ResolverError> {
        let tool = registry
            .tool(Self::TOOL_IDENTIFIER, domains)
            .ok_or_else(|| ResolverError::ToolNotFound(Self::TOOL_IDENTIFIER.to_string()))?;

        Ok(Self { tool, registry })
    }

    pub fn tool(&self) -> &'r SpecRecord {
        self.tool
    }

    /// Directories scanned for flat header entries, de-duplicated by exact path
    ///
    /// The directories of the target's compiled sources come first, in phase order, followed
    /// by the user and then the regular header search paths.
    pub fn search_paths(&self, context: &TargetContext<'_>) -> Vec<String> {
        let mut paths = IndexSet::new();

        for phase in context.target.build_phases_of(BuildPhaseKind::Sources) {
            for build_file in &phase.files {
                let Some(file_ref) = &build_file.file_ref else {
                    continue;
                };
                let file_path = file_ref.resolve(context.project, context.environment);
                paths.insert(fs::directory_name(&file_path).to_string());
            }
        }

        let search_paths = context.search_paths;
        for path in search_paths
            .user_header_search_paths
            .iter()
            .chain(&search_paths.header_search_paths)
        {
            paths.insert(fs::join(context.working_directory, path));
        }

        paths.into_iter().collect()
    }

    /// Classify every header visible to the target into the header map tables
    pub fn classify(&self, context: &TargetContext<'_>, flags: HeadermapFlags) -> Headermaps {
        let mut maps = Headermaps::default();

        for path in self.search_paths(context) {
            let names = match context.filesystem.enumerate_directory(&path) {
                Ok(names) => names,
                Err(error) => {
                    tracing::debug!(%path, %error, "skipping header search path");
                    continue;
                }
            };

            let directory = directory_prefix(&path);
            for name in names {
                if HEADER_EXTENSIONS.contains(&fs::file_extension(&name)) {
                    maps.target_name.add(name.as_str(), directory.as_str(), name.as_str());
                }
            }
        }

        let project = context.project;
        for file_reference in &project.file_references {
            let Some(file) = self.resolve_header(context, file_reference) else {
                continue;
            };

            let file_name = fs::base_name(&file.file_path);
            let file_path = directory_prefix(fs::directory_name(&file.file_path));

            maps.project_headers.add(file_name, file_path.as_str(), file_name);
            if flags.include_project_headers {
                maps.target_name.add(file_name, file_path.as_str(), file_name);
            }
        }

        for project_target in &project.targets {
            let is_target_being_built = context.is_target_being_built(project_target);

            for phase in project_target.build_phases_of(BuildPhaseKind::Headers) {
                for build_file in &phase.files {
                    let Some(GroupItem::FileReference(file_reference)) = &build_file.file_ref
                    else {
                        continue;
                    };
                    let Some(file) = self.resolve_header(context, file_reference) else {
                        continue;
                    };

                    let file_name = fs::base_name(&file.file_path);
                    let file_path = directory_prefix(fs::directory_name(&file.file_path));
                    let framework_name = format!("{}/{}", project_target.product_name(), file_name);

                    let is_public = build_file.has_attribute("Public");
                    let is_private = build_file.has_attribute("Private");

                    if is_target_being_built {
                        maps.own_target_headers
                            .add(file_name, file_path.as_str(), file_name);

                        if !is_public && !is_private {
                            maps.own_target_headers
                                .add(framework_name.as_str(), file_path.as_str(), file_name);
                            if flags.include_flat_entries_for_target_being_built {
                                maps.target_name
                                    .add(framework_name.as_str(), file_path.as_str(), file_name);
                            }
                        }
                    }

                    if is_public || is_private {
                        maps.all_target_headers
                            .add(framework_name.as_str(), file_path.as_str(), file_name);
                        if flags.include_framework_entries_for_all_product_types {
                            maps.target_name
                                .add(framework_name.as_str(), file_path.as_str(), file_name);
                        }

                        if project_target.is_non_framework_product() {
                            maps.all_non_framework_target_headers.add(
                                framework_name.as_str(),
                                file_path.as_str(),
                                file_name,
                            );
                            if !flags.include_framework_entries_for_all_product_types {
                                maps.target_name
                                    .add(framework_name.as_str(), file_path.as_str(), file_name);
                            }
                        }
                    }
                }
            }
        }

        maps
    }

    fn resolve_header(
        &self,
        context: &TargetContext<'_>,
        file_reference: &FileReference,
    ) -> Option<TypeResolvedFile<'r>> {
        TypeResolvedFile::resolve(
            self.registry,
            &[ANY_DOMAIN],
            context.project,
            file_reference,
            context.environment,
        )
        .filter(|file| HEADER_FILE_TYPES.contains(&file.identifier()))
    }

    /// Header map files to generate for the target, and which of them the compiler searches
    /// as system and as user header maps
    ///
    /// Returns an empty invocation when `USE_HEADERMAP` is off.
    #[tracing::instrument(level = "debug", skip_all, fields(target = %context.target.name))]
    pub fn invocation(&self, context: &TargetContext<'_>) -> (ToolInvocation, HeadermapInfo) {
        let environment = context.environment;
        if !environment.resolve_boolean(USE_HEADERMAP) {
            tracing::debug!("header maps disabled");
            return (ToolInvocation::default(), HeadermapInfo::default());
        }

        if environment.resolve_boolean(HEADERMAP_USES_VFS) {
            tracing::warn!("{HEADERMAP_USES_VFS} is not supported, writing plain header maps");
        }

        let flags = HeadermapFlags::from_environment(environment);
        let maps = self.classify(context, flags);

        let headermap_file = environment.resolve(CPP_HEADERMAP_FILE);
        let own_target_headers_file = environment.resolve(CPP_HEADERMAP_FILE_FOR_OWN_TARGET_HEADERS);
        let all_target_headers_file = environment.resolve(CPP_HEADERMAP_FILE_FOR_ALL_TARGET_HEADERS);
        let all_non_framework_target_headers_file =
            environment.resolve(CPP_HEADERMAP_FILE_FOR_ALL_NON_FRAMEWORK_TARGET_HEADERS);
        let generated_files_file = environment.resolve(CPP_HEADERMAP_FILE_FOR_GENERATED_FILES);
        let project_files_file = environment.resolve(CPP_HEADERMAP_FILE_FOR_PROJECT_FILES);

        let invocation = ToolInvocation::new(vec![
            AuxiliaryFile::new(headermap_file.clone(), maps.target_name.write(), false),
            AuxiliaryFile::new(
                own_target_headers_file.clone(),
                maps.own_target_headers.write(),
                false,
            ),
            AuxiliaryFile::new(
                all_target_headers_file.clone(),
                maps.all_target_headers.write(),
                false,
            ),
            AuxiliaryFile::new(
                all_non_framework_target_headers_file.clone(),
                maps.all_non_framework_target_headers.write(),
                false,
            ),
            AuxiliaryFile::new(
                generated_files_file.clone(),
                maps.generated_files.write(),
                false,
            ),
            AuxiliaryFile::new(
                project_files_file.clone(),
                maps.project_headers.write(),
                false,
            ),
        ]);

        let mut info = HeadermapInfo::default();
        if !environment.resolve_boolean(ALWAYS_USE_SEPARATE_HEADERMAPS)
            || environment.resolve_boolean(ALWAYS_SEARCH_USER_PATHS)
        {
            info.system_headermap_files.push(headermap_file);
        } else {
            if flags.include_flat_entries_for_target_being_built {
                info.system_headermap_files.push(own_target_headers_file);
            }
            if flags.include_framework_entries_for_all_product_types {
                info.system_headermap_files.push(all_target_headers_file);
            } else {
                info.system_headermap_files
                    .push(all_non_framework_target_headers_file);
            }

            info.user_headermap_files.push(generated_files_file);
            if flags.include_project_headers {
                info.user_headermap_files.push(project_files_file);
            }
        }

        tracing::debug!(
            flat_entries = maps.target_name.len(),
            system = ?info.system_headermap_files,
            user = ?info.user_headermap_files,
            "resolved header maps"
        );

        (invocation, info)
    }
}
