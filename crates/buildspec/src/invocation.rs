//! Work a tool contributes to a build
use std::path::Path;

/// A file generated in-process and written before the build runs
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct AuxiliaryFile {
    pub path: String,
    pub contents: Vec<u8>,
    pub executable: bool,
}

impl AuxiliaryFile {
    /// Write the file, creating missing parent directories
    pub fn write(&self) -> std::io::Result<()> {
        let path = Path::new(&self.path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.contents)?;

        #[cfg(unix)]
        if self.executable {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
        }

        tracing::debug!(path = %self.path, bytes = self.contents.len(), "wrote auxiliary file");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolInvocation {
    pub auxiliary_files: Vec<AuxiliaryFile>,
}

impl ToolInvocation {
    pub fn new(auxiliary_files: Vec<AuxiliaryFile>) -> Self {
        Self { auxiliary_files }
    }

    pub fn is_empty(&self) -> bool {
        self.auxiliary_files.is_empty()
    }
}
