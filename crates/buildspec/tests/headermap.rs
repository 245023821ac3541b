//! Header maps for the project in `tests/fixtures/project`, read from disk

use buildspec::document::{deserialize_document, read_document};
use buildspec::fs::DiskFilesystem;
use buildspec::headermap::*;
use buildspec::loader::SpecDocumentLoader;
use buildspec::project::Project;
use buildspec::registry::SpecRegistry;
use buildspec::settings::{Environment, Settings};
use buildspec::spec::ANY_DOMAIN;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
}

fn registry() -> SpecRegistry {
    let mut registry = SpecRegistry::new();
    SpecDocumentLoader::default()
        .load_directory(&mut registry, &fixture("specs"))
        .unwrap();
    registry
}

fn project() -> Project {
    let mut project: Project = deserialize_document(&fixture("project.yaml")).unwrap();
    project.path = fixture("project").to_string_lossy().into_owned();
    project
}

fn settings(output_directory: &Path) -> Settings {
    let mut settings = Settings::try_from(read_document(&fixture("settings.yaml")).unwrap())
        .expect("flat settings document");

    for (name, file_name) in [
        (CPP_HEADERMAP_FILE, "App.hmap"),
        (CPP_HEADERMAP_FILE_FOR_OWN_TARGET_HEADERS, "App-own-target-headers.hmap"),
        (CPP_HEADERMAP_FILE_FOR_ALL_TARGET_HEADERS, "App-all-target-headers.hmap"),
        (
            CPP_HEADERMAP_FILE_FOR_ALL_NON_FRAMEWORK_TARGET_HEADERS,
            "App-all-non-framework-target-headers.hmap",
        ),
        (CPP_HEADERMAP_FILE_FOR_GENERATED_FILES, "App-generated-files.hmap"),
        (CPP_HEADERMAP_FILE_FOR_PROJECT_FILES, "App-project-headers.hmap"),
    ] {
        settings.set(
            name,
            output_directory.join(file_name).to_string_lossy().into_owned(),
        );
    }
    settings
}

fn search_paths() -> SearchPaths {
    SearchPaths {
        user_header_search_paths: vec!["include".into()],
        header_search_paths: vec!["missing".into()],
    }
}

fn sorted_keys(table: &HeaderTable) -> Vec<&str> {
    let mut keys: Vec<_> = table.keys().collect();
    keys.sort();
    keys
}

#[test]
fn tables_from_disk() {
    let registry = registry();
    let project = project();
    let settings = settings(Path::new("/unused"));
    let search_paths = search_paths();
    let working_directory = project.path.clone();

    let context = TargetContext::new(
        &project,
        project.target("App").unwrap(),
        &search_paths,
        &settings,
        &DiskFilesystem,
        &working_directory,
    );
    let resolver = HeadermapResolver::new(&registry, &[ANY_DOMAIN]).unwrap();
    let maps = resolver.classify(&context, HeadermapFlags::from_environment(&settings));

    insta::assert_debug_snapshot!(sorted_keys(&maps.target_name), @r###"
    [
        "App.h",
        "App/Public.h",
        "Inc.h",
        "Kit.h",
        "Public.h",
        "Util.hpp",
    ]
    "###);
    insta::assert_debug_snapshot!(sorted_keys(&maps.all_target_headers), @r###"
    [
        "App/Public.h",
        "Kit/Kit.h",
    ]
    "###);

    let kit = maps.target_name.get("Kit.h").unwrap();
    assert_eq!(kit.prefix, format!("{}/Kit/", project.path));
    assert_eq!(kit.suffix, "Kit.h");

    let inc = maps.target_name.get("Inc.h").unwrap();
    assert_eq!(inc.prefix, format!("{}/include/", project.path));
}

#[test]
fn writes_auxiliary_files() {
    let output_directory =
        std::env::temp_dir().join(format!("buildspec-headermap-{}", std::process::id()));

    let registry = registry();
    let project = project();
    let settings = settings(&output_directory);
    let search_paths = search_paths();
    let working_directory = project.path.clone();

    let context = TargetContext::new(
        &project,
        project.target("App").unwrap(),
        &search_paths,
        &settings,
        &DiskFilesystem,
        &working_directory,
    );
    let (invocation, info) = HeadermapResolver::new(&registry, &["macosx"])
        .unwrap()
        .invocation(&context);

    assert_eq!(
        info,
        HeadermapInfo {
            system_headermap_files: vec![
                settings.resolve(CPP_HEADERMAP_FILE_FOR_ALL_NON_FRAMEWORK_TARGET_HEADERS)
            ],
            user_headermap_files: vec![
                settings.resolve(CPP_HEADERMAP_FILE_FOR_GENERATED_FILES),
                settings.resolve(CPP_HEADERMAP_FILE_FOR_PROJECT_FILES),
            ],
        }
    );

    assert_eq!(invocation.auxiliary_files.len(), 6);
    for auxiliary_file in &invocation.auxiliary_files {
        auxiliary_file.write().unwrap();

        let written = std::fs::read(&auxiliary_file.path).unwrap();
        assert_eq!(&written[0..4], b"pamh");
        assert_eq!(written, auxiliary_file.contents);
    }

    std::fs::remove_dir_all(&output_directory).unwrap();
}
