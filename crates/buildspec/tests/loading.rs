//! Loading the specification documents in `tests/fixtures`

use buildspec::loader::{LoadReport, SpecDocumentLoader, SpecError};
use buildspec::registry::SpecRegistry;
use buildspec::spec::{Compiler, FileType, ProductType, SpecType, ANY_DOMAIN};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("BUILDSPEC_LOG"))
        .with_test_writer()
        .try_init();
}

fn load_specs() -> (SpecRegistry, LoadReport) {
    init_logging();

    let mut registry = SpecRegistry::new();
    let report = SpecDocumentLoader::default()
        .load_directory(&mut registry, &fixture("specs"))
        .expect("fixture specifications load");
    (registry, report)
}

#[test]
fn directory_in_file_name_order() {
    let (registry, report) = load_specs();

    assert_eq!(
        report,
        LoadReport {
            loaded: 6,
            errors: 1
        }
    );

    let keys: Vec<String> = registry
        .records()
        .map(|record| record.key().to_string())
        .collect();
    insta::assert_debug_snapshot!(keys, @r###"
    [
        "Tool '*:com.apple.commands.built-in.headermap-generator'",
        "FileType '*:sourcecode.c.h'",
        "FileType '*:sourcecode.cpp.h'",
        "Compiler 'macosx:com.apple.compilers.llvm.clang'",
        "ProductType '*:com.apple.product-type.application'",
        "ProductType '*:com.apple.product-type.framework'",
    ]
    "###);
}

#[test]
fn loading_is_deterministic() {
    let (first, _) = load_specs();
    let (second, _) = load_specs();

    assert_eq!(first, second);
}

#[test]
fn base_from_an_earlier_document() {
    let (registry, _) = load_specs();

    let cpp = registry
        .file_type("sourcecode.cpp.h", &[ANY_DOMAIN])
        .expect("c++ header type");
    let base = registry.file_type("sourcecode.c.h", &[ANY_DOMAIN]).unwrap();

    assert_eq!(cpp.base, Some(base.key()));
    assert_eq!(cpp.name.as_deref(), Some("C header"));

    let file_type = cpp.kind::<FileType>().unwrap();
    assert_eq!(
        file_type.extensions,
        Some(vec!["hpp".to_string(), "hh".to_string()])
    );
    assert_eq!(file_type.language.as_deref(), Some("cpp"));
    assert_eq!(file_type.is_text_file, Some(true));

    assert_eq!(registry.ancestors(&cpp.key()), vec![base]);
}

#[test]
fn base_in_the_same_sequence() {
    let (registry, _) = load_specs();

    let framework = registry
        .product_type("com.apple.product-type.framework", &["macosx"])
        .unwrap();
    assert_eq!(framework.name.as_deref(), Some("Framework"));

    let properties = framework
        .kind::<ProductType>()
        .and_then(|product_type| product_type.default_build_properties.as_ref())
        .unwrap();
    assert_eq!(properties.get("USE_HEADERMAP").map(String::as_str), Some("YES"));
}

#[test]
fn hcl_document_with_domain() {
    let (registry, _) = load_specs();

    let identifier = "com.apple.compilers.llvm.clang";
    assert!(registry
        .lookup(SpecType::Compiler, identifier, &[ANY_DOMAIN])
        .is_none());

    let clang = registry
        .lookup(SpecType::Compiler, identifier, &["iphoneos", "macosx"])
        .unwrap();
    assert_eq!(clang.domain, "macosx");

    let compiler = clang.kind::<Compiler>().unwrap();
    assert_eq!(compiler.tool.exec_path.as_deref(), Some("clang"));
    assert_eq!(compiler.supports_headermaps, Some(true));
    assert_eq!(
        compiler.languages,
        Some(vec!["c".to_string(), "objective-c".to_string()])
    );
}

#[test]
fn broken_documents() {
    init_logging();
    let loader = SpecDocumentLoader::default();
    let mut registry = SpecRegistry::new();

    let err = loader
        .load_document(&mut registry, &fixture("broken/all-bad.json"))
        .unwrap_err();
    assert!(matches!(err, SpecError::NoRecordsLoaded { errors: 2, .. }), "{err:?}");

    let err = loader
        .load_document(&mut registry, &fixture("broken/scalar.yaml"))
        .unwrap_err();
    assert!(matches!(err, SpecError::NotARecordOrSequence(_)), "{err:?}");

    let err = loader
        .load_document(&mut registry, &fixture("broken/missing-base.yaml"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot find base Tool specification '*:does.not.exist'"
    );

    let err = loader
        .load_document(&mut registry, &fixture("broken/does-not-exist.json"))
        .unwrap_err();
    assert!(matches!(err, SpecError::UnreadablePath { .. }), "{err:?}");

    assert!(registry.is_empty());
}

#[test]
fn directory_without_loadable_documents() {
    init_logging();
    let mut registry = SpecRegistry::new();

    let err = SpecDocumentLoader::default()
        .load_directory(&mut registry, &fixture("broken"))
        .unwrap_err();
    assert!(matches!(err, SpecError::NoDocumentsFound(_)), "{err:?}");
}
