//! Kind specific specification payloads
//!
//! Each kind reads its own keys on top of the common ones. When a record is based on another
//! record, its payload starts as a copy of the base payload and explicitly declared keys
//! replace the inherited values.
use super::{SpecType, Unpack};
use crate::value::{Object, Value};
use indexmap::IndexMap;

/// A concrete specification kind
pub trait SpecKind: Clone + Default + Sized {
    const TYPE: SpecType;

    fn wrap(self) -> SpecVariant;

    fn unwrap(variant: &SpecVariant) -> Option<&Self>;
}

/// Kind specific payload of a [super::SpecRecord]
#[derive(Debug, Clone, PartialEq)]
pub enum SpecVariant {
    Architecture(Architecture),
    BuildPhase(BuildPhase),
    BuildSettings(BuildSettings),
    BuildStep(BuildStep),
    BuildSystem(BuildSystem),
    Compiler(Compiler),
    FileType(FileType),
    Linker(Linker),
    PackageType(PackageType),
    ProductType(ProductType),
    PropertyConditionFlavor(PropertyConditionFlavor),
    Tool(Tool),
}

impl SpecVariant {
    pub fn spec_type(&self) -> SpecType {
        match self {
            SpecVariant::Architecture(_) => SpecType::Architecture,
            SpecVariant::BuildPhase(_) => SpecType::BuildPhase,
            SpecVariant::BuildSettings(_) => SpecType::BuildSettings,
            SpecVariant::BuildStep(_) => SpecType::BuildStep,
            SpecVariant::BuildSystem(_) => SpecType::BuildSystem,
            SpecVariant::Compiler(_) => SpecType::Compiler,
            SpecVariant::FileType(_) => SpecType::FileType,
            SpecVariant::Linker(_) => SpecType::Linker,
            SpecVariant::PackageType(_) => SpecType::PackageType,
            SpecVariant::ProductType(_) => SpecType::ProductType,
            SpecVariant::PropertyConditionFlavor(_) => SpecType::PropertyConditionFlavor,
            SpecVariant::Tool(_) => SpecType::Tool,
        }
    }

    /// The tool fields of tools, compilers and linkers
    pub fn as_tool(&self) -> Option<&Tool> {
        match self {
            SpecVariant::Tool(tool) => Some(tool),
            SpecVariant::Compiler(compiler) => Some(&compiler.tool),
            SpecVariant::Linker(linker) => Some(&linker.tool),
            _ => None,
        }
    }
}

trait ReadKind: SpecKind {
    /// Read the kind's keys over `inherited`
    fn read(unpack: &mut Unpack<'_>, inherited: Self) -> Self;
}

type ParseFn = fn(&mut Unpack<'_>, Option<&SpecVariant>) -> SpecVariant;

pub(crate) struct Kind {
    pub spec_type: SpecType,
    pub parse: ParseFn,
}

fn parse_kind<K: ReadKind>(unpack: &mut Unpack<'_>, base: Option<&SpecVariant>) -> SpecVariant {
    let inherited = base.and_then(K::unwrap).cloned().unwrap_or_default();
    K::read(unpack, inherited).wrap()
}

macro_rules! kinds {
    ($($kind:ident),+ $(,)?) => {
        static KINDS: &[Kind] = &[
            $(Kind { spec_type: SpecType::$kind, parse: parse_kind::<$kind> },)+
        ];

        $(
            impl SpecKind for $kind {
                const TYPE: SpecType = SpecType::$kind;

                fn wrap(self) -> SpecVariant {
                    SpecVariant::$kind(self)
                }

                fn unwrap(variant: &SpecVariant) -> Option<&Self> {
                    match variant {
                        SpecVariant::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+
    };
}

kinds!(
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
);

/// Parser table entry for a `Type` tag
pub(crate) fn kind_for_tag(tag: &str) -> Option<&'static Kind> {
    KINDS.iter().find(|kind| kind.spec_type.as_str() == tag)
}

/// Replace `slot` when the document declares a value
fn merge<T>(slot: &mut Option<T>, declared: Option<T>) {
    if declared.is_some() {
        *slot = declared;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Architecture {
    pub real_architectures: Option<Vec<String>>,
    pub architecture_setting: Option<String>,
    pub per_arch_build_setting_name: Option<String>,
    pub sort_number: Option<i64>,
}

impl ReadKind for Architecture {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.real_architectures, unpack.strings("RealArchitectures"));
        merge(&mut out.architecture_setting, unpack.string("ArchitectureSetting"));
        merge(
            &mut out.per_arch_build_setting_name,
            unpack.string("PerArchBuildSettingName"),
        );
        merge(&mut out.sort_number, unpack.integer("SortNumber"));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildPhase {}

impl ReadKind for BuildPhase {
    fn read(_unpack: &mut Unpack<'_>, out: Self) -> Self {
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSettings {
    pub options: Option<Vec<Value>>,
}

impl ReadKind for BuildSettings {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.options, unpack.array("Options"));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStep {
    pub build_step_type: Option<String>,
    pub file_types: Option<Vec<String>>,
    pub compiler_spec: Option<String>,
    pub linker_spec: Option<String>,
}

impl ReadKind for BuildStep {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.build_step_type, unpack.string("BuildStepType"));
        merge(&mut out.file_types, unpack.strings("FileTypes"));
        merge(&mut out.compiler_spec, unpack.string("CompilerSpec"));
        merge(&mut out.linker_spec, unpack.string("LinkerSpec"));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSystem {
    pub options: Option<Vec<Value>>,
    pub properties: Option<Vec<Value>>,
}

impl ReadKind for BuildSystem {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.options, unpack.array("Options"));
        merge(&mut out.properties, unpack.array("Properties"));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tool {
    pub exec_path: Option<String>,
    pub exec_description: Option<String>,
    pub progress_description: Option<String>,
    pub input_file_types: Option<Vec<String>>,
    pub outputs: Option<Vec<String>>,
    pub options: Option<Vec<Value>>,
    pub is_abstract: Option<bool>,
}

impl ReadKind for Tool {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.exec_path, unpack.string("ExecPath"));
        merge(&mut out.exec_description, unpack.string("ExecDescription"));
        merge(
            &mut out.progress_description,
            unpack.string("ProgressDescription"),
        );
        merge(&mut out.input_file_types, unpack.strings("InputFileTypes"));
        merge(&mut out.outputs, unpack.strings("Outputs"));
        merge(&mut out.options, unpack.array("Options"));
        merge(&mut out.is_abstract, unpack.boolean("IsAbstract"));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiler {
    pub tool: Tool,
    pub supports_headermaps: Option<bool>,
    pub languages: Option<Vec<String>>,
    pub option_condition_flavors: Option<Vec<String>>,
}

impl ReadKind for Compiler {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        out.tool = Tool::read(unpack, out.tool);
        merge(
            &mut out.supports_headermaps,
            unpack.boolean("SupportsHeadermaps"),
        );
        merge(&mut out.languages, unpack.strings("Languages"));
        merge(
            &mut out.option_condition_flavors,
            unpack.strings("OptionConditionFlavors"),
        );
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linker {
    pub tool: Tool,
    pub binary_formats: Option<Vec<String>>,
}

impl ReadKind for Linker {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        out.tool = Tool::read(unpack, out.tool);
        merge(&mut out.binary_formats, unpack.strings("BinaryFormats"));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileType {
    pub extensions: Option<Vec<String>>,
    pub mime_types: Option<Vec<String>>,
    pub uti: Option<String>,
    pub prefix: Option<Vec<String>>,
    pub is_text_file: Option<bool>,
    pub is_folder: Option<bool>,
    pub is_wrapper_folder: Option<bool>,
    pub language: Option<String>,
}

impl ReadKind for FileType {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.extensions, unpack.strings("Extensions"));
        merge(&mut out.mime_types, unpack.strings("MIMETypes"));
        merge(&mut out.uti, unpack.string("UTI"));
        merge(&mut out.prefix, unpack.strings("Prefix"));
        merge(&mut out.is_text_file, unpack.boolean("IsTextFile"));
        merge(&mut out.is_folder, unpack.boolean("IsFolder"));
        merge(&mut out.is_wrapper_folder, unpack.boolean("IsWrapperFolder"));
        merge(&mut out.language, unpack.string("Language"));
        out
    }
}

impl FileType {
    pub fn matches_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .flatten()
            .any(|candidate| candidate == extension)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageType {
    pub product_reference: Option<Object>,
    pub default_build_settings: Option<IndexMap<String, String>>,
}

impl ReadKind for PackageType {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.product_reference, unpack.object("ProductReference"));
        merge(
            &mut out.default_build_settings,
            unpack.string_map("DefaultBuildSettings"),
        );
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductType {
    pub default_target_name: Option<String>,
    pub package_types: Option<Vec<String>>,
    pub icon_name_prefix: Option<String>,
    pub is_wrapper: Option<bool>,
    pub default_build_properties: Option<IndexMap<String, String>>,
}

impl ReadKind for ProductType {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.default_target_name, unpack.string("DefaultTargetName"));
        merge(&mut out.package_types, unpack.strings("PackageTypes"));
        merge(&mut out.icon_name_prefix, unpack.string("IconNamePrefix"));
        merge(&mut out.is_wrapper, unpack.boolean("IsWrapper"));
        merge(
            &mut out.default_build_properties,
            unpack.string_map("DefaultBuildProperties"),
        );
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyConditionFlavor {
    pub precedence: Option<i64>,
}

impl ReadKind for PropertyConditionFlavor {
    fn read(unpack: &mut Unpack<'_>, mut out: Self) -> Self {
        merge(&mut out.precedence, unpack.integer("Precedence"));
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(o) => o,
            _ => unreachable!(),
        }
    }

    #[test]
    fn every_kind_has_a_table_entry() {
        assert_eq!(KINDS.len(), 12);
        for kind in KINDS {
            assert_eq!(kind_for_tag(kind.spec_type.as_str()).map(|k| k.spec_type), Some(kind.spec_type));
        }
    }

    #[test]
    fn compiler_reads_tool_fields() {
        let object = object(
            [
                ("ExecPath", Value::from("clang")),
                ("SupportsHeadermaps", Value::from("YES")),
                ("Languages", Value::from(vec!["c", "objc"])),
            ]
            .into_iter()
            .collect(),
        );

        let mut unpack = Unpack::new(&object);
        let variant = (kind_for_tag("Compiler").unwrap().parse)(&mut unpack, None);

        let SpecVariant::Compiler(compiler) = &variant else {
            panic!("expected compiler, got {variant:?}");
        };
        assert_eq!(compiler.tool.exec_path.as_deref(), Some("clang"));
        assert_eq!(compiler.supports_headermaps, Some(true));
        assert_eq!(variant.as_tool(), Some(&compiler.tool));
        assert!(unpack.unknown_keys().is_empty());
    }

    #[test]
    fn declared_fields_override_inherited_payload() {
        let base = SpecVariant::FileType(FileType {
            extensions: Some(vec!["h".into()]),
            language: Some("c".into()),
            ..Default::default()
        });

        let object = object([("Language", Value::from("c++"))].into_iter().collect());
        let mut unpack = Unpack::new(&object);
        let variant = (kind_for_tag("FileType").unwrap().parse)(&mut unpack, Some(&base));

        let file_type = FileType::unwrap(&variant).unwrap();
        assert_eq!(file_type.language.as_deref(), Some("c++"));
        assert!(file_type.matches_extension("h"));
        assert!(!file_type.matches_extension("H"));
    }
}
