//! Header maps
//!
//! A header map is a lookup table the compiler consults for `#include` names before walking
//! the header search paths. [HeadermapResolver] builds several tables per target:
//!
//! | table                               | contents                                               |
//! |-------------------------------------|--------------------------------------------------------|
//! | `target_name`                       | flat names found in the search paths, plus flag driven extras |
//! | `own_target_headers`                | the target's own header phase entries                   |
//! | `all_target_headers`                | `Product/Header.h` for public and private headers       |
//! | `all_non_framework_target_headers`  | the same, limited to non framework products            |
//! | `generated_files`                   | currently always empty                                 |
//! | `project_headers`                   | every C/C++ header referenced by the project           |
//!
//! Every table is written to the path held by its `CPP_HEADERMAP_FILE*` setting. Which of them
//! the compiler receives as system or user header maps is reported in [HeadermapInfo].
mod resolver;
mod table;

pub use resolver::*;
pub use table::{HeaderEntry, HeaderTable};

/// Header search paths of the target, as configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    pub user_header_search_paths: Vec<String>,
    pub header_search_paths: Vec<String>,
}

/// Generated header map paths passed to the compiler, in search order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadermapInfo {
    pub system_headermap_files: Vec<String>,
    pub user_headermap_files: Vec<String>,
}
