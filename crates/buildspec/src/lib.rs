//! # buildspec - build specifications and header maps
//!
//! ## Introduction for developers
//!
//! Read this to understand how `buildspec` works internally.
//!
//! ### Specification documents
//!
//! A build system is described by a set of specifications: tools, compilers, file types,
//! product types and so on. Each specification is an object with a `Type` tag, an
//! `Identifier` and kind specific keys. A document holds one such object or a list of them
//! and can be written as JSON, YAML or HCL:
//!
//! ```yaml
//! - Type: FileType
//!   Identifier: sourcecode.c.h
//!   Extensions: [h]
//! - Type: FileType
//!   Identifier: sourcecode.cpp.h
//!   BasedOn: sourcecode.c.h
//!   Extensions: [hpp, hh]
//! ```
//!
//! [document::read_document] turns a file into a [value::Value] tree. From there on the format
//! does not matter anymore.
//!
//! ### Loading and inheritance
//!
//! [loader::SpecDocumentLoader] dispatches every object on its `Type` tag and produces a
//! [spec::SpecRecord]. Records are keyed by type, identifier and domain ([spec::SpecKey]);
//! records without a domain land in [spec::ANY_DOMAIN].
//!
//! `BasedOn` names a base record (`identifier` or `domain:identifier`) of the same type. The
//! base has to be in the [registry::SpecRegistry] already: the new record starts as a copy of
//! the base and its own keys are applied on top. Self inheritance is ignored, longer cycles are
//! rejected.
//!
//! ### Header maps
//!
//! With the registry loaded, [headermap::HeadermapResolver] looks at a target of a
//! [project::Project] and builds the header map tables the compiler uses to find `#include`s.
//! The result is a [invocation::ToolInvocation] with one auxiliary file per table and a
//! [headermap::HeadermapInfo] listing which tables are searched as system and as user header
//! maps. Build settings are read through [settings::Environment].
//!
pub mod document;
pub mod file_type;
pub mod fs;
pub mod headermap;
pub mod invocation;
pub mod loader;
pub mod project;
pub mod registry;
pub mod settings;
pub mod spec;
pub mod value;
