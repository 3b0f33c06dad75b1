//! Plain text loader

use super::EntryLoader;
use crate::diagnostics::LoadResult;
use crate::file_utils::DEFAULT_MAX_FILE_SIZE;
use crate::fs::FileSystem;
use async_trait::async_trait;
use std::path::Path;

/// Loads each file as a UTF-8 string.
#[derive(Debug, Clone, Copy)]
pub struct TextLoader {
    max_file_size: u64,
}

impl TextLoader {
    pub fn new() -> Self {
        Self::with_max_file_size(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self { max_file_size }
    }
}

impl Default for TextLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryLoader<String> for TextLoader {
    async fn load(&self, fs: &dyn FileSystem, path: &Path) -> LoadResult<String> {
        fs.read_to_string_with_limit(path, self.max_file_size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LoadError;
    use crate::fs::MockFileSystem;

    #[tokio::test]
    async fn test_text_loader_reads_content() {
        let fs = MockFileSystem::new();
        fs.add_file("/data/note.md", "# Title\n");

        let value = TextLoader::new()
            .load(&fs, Path::new("/data/note.md"))
            .await
            .unwrap();
        assert_eq!(value, "# Title\n");
    }

    #[tokio::test]
    async fn test_text_loader_honours_limit() {
        let fs = MockFileSystem::new();
        fs.add_file("/data/big.txt", "0123456789");

        let result = TextLoader::with_max_file_size(4)
            .load(&fs, Path::new("/data/big.txt"))
            .await;
        assert!(matches!(result, Err(LoadError::FileTooBig { size: 10, .. })));
    }
}
