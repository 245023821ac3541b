mod cli;

use anyhow::Context;
use buildspec::fs::DiskFilesystem;
use buildspec::headermap::{HeadermapInfo, HeadermapResolver, SearchPaths, TargetContext};
use buildspec::loader::{LoadReport, SpecDocumentLoader};
use buildspec::project::Project;
use buildspec::registry::SpecRegistry;
use buildspec::settings::Settings;
use buildspec::spec::{SpecRecord, ANY_DOMAIN};
use buildspec::value::{Object, Value};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("BUILDSPEC_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Specs(specs_cli) => specs(specs_cli),
        cli::Command::Headermap(headermap_cli) => headermap(headermap_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

/// List every loaded specification
pub fn specs(cli: cli::SpecsCommand) -> anyhow::Result<()> {
    let registry = load(&cli.specs)?;

    let records: Vec<Value> = registry.records().map(summary).collect();
    output(&cli.output, &Value::from(records))
}

/// Resolve and write the header maps of a target
pub fn headermap(cli: cli::HeadermapCommand) -> anyhow::Result<()> {
    let registry = load(&cli.specs)?;

    let project: Project = buildspec::document::deserialize_document(&cli.project)?;
    let target = project
        .target(&cli.target)
        .ok_or_else(|| anyhow::anyhow!("Target '{}' not found in project", cli.target))?;

    let settings = Settings::try_from(buildspec::document::read_document(&cli.settings)?)?;

    let search_paths = SearchPaths {
        user_header_search_paths: cli.user_header_search_paths,
        header_search_paths: cli.header_search_paths,
    };
    let working_directory = std::env::current_dir()?;
    let working_directory = working_directory.to_string_lossy();

    let resolver = match HeadermapResolver::new(&registry, cli.lookup_domains.as_slice()) {
        Ok(resolver) => resolver,
        Err(error) => {
            tracing::warn!(%error, "header maps disabled");
            return output(&cli.output, &routing(HeadermapInfo::default()));
        }
    };
    let context = TargetContext::new(
        &project,
        target,
        &search_paths,
        &settings,
        &DiskFilesystem,
        &working_directory,
    );
    let (invocation, info) = resolver.invocation(&context);

    if !cli.dry_run {
        for auxiliary_file in &invocation.auxiliary_files {
            if auxiliary_file.path.is_empty() {
                tracing::warn!("skipping header map without a path");
                continue;
            }
            auxiliary_file
                .write()
                .with_context(|| format!("Failed to write {}", auxiliary_file.path))?;
        }
    }

    output(&cli.output, &routing(info))
}

fn routing(info: HeadermapInfo) -> Value {
    [
        ("system", Value::from(info.system_headermap_files)),
        ("user", Value::from(info.user_headermap_files)),
    ]
    .into_iter()
    .collect()
}

fn load(args: &cli::SpecArgs) -> anyhow::Result<SpecRegistry> {
    let loader = SpecDocumentLoader::new(args.domain.as_deref().unwrap_or(ANY_DOMAIN))
        .with_check(args.check);

    let mut registry = SpecRegistry::new();
    let mut report = LoadReport::default();
    for path in &args.paths {
        report += if path.is_dir() {
            loader.load_directory(&mut registry, path)?
        } else {
            loader.load_document(&mut registry, path)?
        };
    }

    tracing::info!(
        loaded = report.loaded,
        errors = report.errors,
        "loaded specifications"
    );
    anyhow::ensure!(!registry.is_empty(), "No specifications loaded");

    Ok(registry)
}

fn summary(record: &SpecRecord) -> Value {
    let mut object = Object::new();
    object.insert("Type".into(), record.spec_type().as_str().into());
    object.insert("Domain".into(), record.domain.as_str().into());
    if let Some(identifier) = &record.identifier {
        object.insert("Identifier".into(), identifier.as_str().into());
    }
    if let Some(name) = &record.name {
        object.insert("Name".into(), name.as_str().into());
    }
    if let Some(base) = &record.base {
        object.insert(
            "BasedOn".into(),
            format!("{}:{}", base.domain, base.identifier).into(),
        );
    }
    Value::Object(object)
}

fn output(output: &cli::OutputArgs, value: &Value) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}
