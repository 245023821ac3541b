//! project graph
//!
//! The subset of a project the header map resolver walks: targets, their build phases, the
//! build files in each phase and the file references they point to.
//!
//! ```yaml
//! path: /src/App
//! file_references:
//!   - path: Sources/App.h
//!     last_known_file_type: sourcecode.c.h
//! targets:
//!   - name: App
//!     product_name: App
//!     type: native
//!     product_type: com.apple.product-type.application
//!     build_phases:
//!       - type: headers
//!         files:
//!           - file_ref: { type: file_reference, path: Sources/App.h }
//!             attributes: [Public]
//! ```
use crate::fs;
use crate::settings::Environment;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Project {
    /// Directory relative file references resolve against
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub file_references: Vec<FileReference>,
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Project {
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|target| target.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Target {
    pub name: String,
    /// Defaults to the target name
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(flatten)]
    pub kind: TargetKind,
    #[serde(default)]
    pub build_phases: Vec<BuildPhase>,
}

impl Target {
    pub fn product_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(&self.name)
    }

    /// Native targets whose product type does not mention `framework`
    pub fn is_non_framework_product(&self) -> bool {
        match &self.kind {
            TargetKind::Native { product_type } => !product_type.contains("framework"),
            _ => false,
        }
    }

    pub fn build_phases_of(&self, kind: BuildPhaseKind) -> impl Iterator<Item = &BuildPhase> {
        self.build_phases
            .iter()
            .filter(move |phase| phase.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetKind {
    Native { product_type: String },
    Aggregate,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhaseKind {
    Sources,
    Headers,
    Resources,
    Frameworks,
    CopyFiles,
    ShellScript,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildPhase {
    #[serde(rename = "type")]
    pub kind: BuildPhaseKind,
    #[serde(default)]
    pub files: Vec<BuildFile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildFile {
    #[serde(default)]
    pub file_ref: Option<GroupItem>,
    /// Tags such as `Public` or `Private`
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl BuildFile {
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }
}

/// What a build file points at
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroupItem {
    FileReference(FileReference),
    /// A localized file with one reference per language
    VariantGroup {
        path: String,
        #[serde(default)]
        children: Vec<FileReference>,
    },
}

impl GroupItem {
    pub fn path(&self) -> &str {
        match self {
            GroupItem::FileReference(file_reference) => &file_reference.path,
            GroupItem::VariantGroup { path, .. } => path,
        }
    }

    /// Absolute path of the item, with settings expanded
    pub fn resolve(&self, project: &Project, environment: &dyn Environment) -> String {
        fs::join(&project.path, &environment.expand(self.path()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileReference {
    pub path: String,
    #[serde(default)]
    pub explicit_file_type: Option<String>,
    #[serde(default)]
    pub last_known_file_type: Option<String>,
}

impl FileReference {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.last_known_file_type = Some(file_type.into());
        self
    }

    pub fn resolve(&self, project: &Project, environment: &dyn Environment) -> String {
        fs::join(&project.path, &environment.expand(&self.path))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::{deserialize_str, Format};
    use crate::settings::Settings;
    use pretty_assertions::assert_eq;

    const PROJECT: &str = r#"
path: /src/App
file_references:
  - path: Sources/App.h
    last_known_file_type: sourcecode.c.h
targets:
  - name: App
    type: native
    product_type: com.apple.product-type.application
    build_phases:
      - type: headers
        files:
          - file_ref: { type: file_reference, path: $(GENERATED)/Gen.h }
            attributes: [Public]
          - file_ref: { type: variant_group, path: Localizable.strings }
  - name: Kit
    product_name: KitProduct
    type: native
    product_type: com.apple.product-type.framework
  - name: Everything
    type: aggregate
"#;

    #[test]
    fn deserialize_yaml_project() {
        let project: Project = deserialize_str(PROJECT, Format::Yaml).unwrap();

        assert_eq!(project.file_references.len(), 1);
        assert_eq!(project.targets.len(), 3);

        let app = project.target("App").unwrap();
        assert_eq!(app.product_name(), "App");
        assert!(app.is_non_framework_product());

        let headers: Vec<_> = app.build_phases_of(BuildPhaseKind::Headers).collect();
        assert_eq!(headers.len(), 1);
        assert!(headers[0].files[0].has_attribute("Public"));
        assert!(matches!(
            headers[0].files[1].file_ref,
            Some(GroupItem::VariantGroup { .. })
        ));

        let kit = project.target("Kit").unwrap();
        assert_eq!(kit.product_name(), "KitProduct");
        assert!(!kit.is_non_framework_product());
        assert!(!project.target("Everything").unwrap().is_non_framework_product());
    }

    #[test]
    fn resolve_expands_settings() {
        let project: Project = deserialize_str(PROJECT, Format::Yaml).unwrap();
        let settings: Settings = [("GENERATED", "/build/gen")].into_iter().collect();

        let file_ref = project.targets[0].build_phases[0].files[0]
            .file_ref
            .as_ref()
            .unwrap();
        assert_eq!(file_ref.resolve(&project, &settings), "/build/gen/Gen.h");
        assert_eq!(
            project.file_references[0].resolve(&project, &settings),
            "/src/App/Sources/App.h"
        );
    }
}
