//! filesystem access and string path helpers
//!
//! Paths are handled as strings: search paths are de-duplicated by their exact text and
//! header map entries store directory and file name as written.

/// Directory listing used while collecting headers
pub trait Filesystem {
    /// Names of the direct entries of `path`, in the order the filesystem yields them
    fn enumerate_directory(&self, path: &str) -> std::io::Result<Vec<String>>;
}

/// [Filesystem] backed by [std::fs]
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFilesystem;

impl Filesystem for DiskFilesystem {
    fn enumerate_directory(&self, path: &str) -> std::io::Result<Vec<String>> {
        let mut names = vec![];
        for dir_entry in std::fs::read_dir(path)? {
            names.push(dir_entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

/// Everything before the last `/`, empty when there is none
pub fn directory_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => "",
    }
}

/// Everything after the last `/`
pub fn base_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Text after the last `.` of the base name, empty when there is none
pub fn file_extension(path: &str) -> &str {
    base_name(path)
        .rsplit_once('.')
        .map_or("", |(_, extension)| extension)
}

pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// `path` relative to `directory` unless it is absolute
pub fn join(directory: &str, path: &str) -> String {
    if is_absolute(path) || directory.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", directory.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn path_parts() {
        assert_eq!(directory_name("/src/app/main.c"), "/src/app");
        assert_eq!(directory_name("/main.c"), "/");
        assert_eq!(directory_name("main.c"), "");
        assert_eq!(base_name("/src/app/main.c"), "main.c");
        assert_eq!(base_name("main.c"), "main.c");
        assert_eq!(file_extension("/src/Foo.h"), "h");
        assert_eq!(file_extension("/src/Foo.tar.gz"), "gz");
        assert_eq!(file_extension("/src.d/Makefile"), "");
        assert_eq!(file_extension("Foo.H"), "H");
    }

    #[test]
    fn join_paths() {
        assert_eq!(join("/work", "include"), "/work/include");
        assert_eq!(join("/work/", "include"), "/work/include");
        assert_eq!(join("/work", "/usr/include"), "/usr/include");
        assert_eq!(join("", "include"), "include");
    }
}
