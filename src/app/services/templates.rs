use std::fs;
use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::files::{is_markdown_file, read_document};

/// Sub-directory of the working directory that holds note templates.
pub const TEMPLATES_DIR: &str = "templates";

pub fn templates_dir(working_dir: &Path) -> PathBuf {
    working_dir.join(TEMPLATES_DIR)
}

/// Markdown templates directly inside `<working_dir>/templates`, sorted.
pub fn list_templates(working_dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = templates_dir(working_dir);
    if !dir.is_dir() {
        return Err(AppError::TemplatesMissing(dir));
    }

    let mut templates: Vec<PathBuf> = fs::read_dir(&dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_markdown_file(path))
        .collect();
    templates.sort();

    if templates.is_empty() {
        return Err(AppError::NoTemplates(dir));
    }
    Ok(templates)
}

pub fn load_template(path: &Path) -> Result<String> {
    read_document(path).map(|(content, _)| content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_templates_dir() {
        let dir = TempDir::new().unwrap();
        let err = list_templates(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::TemplatesMissing(_)));
    }

    #[test]
    fn test_empty_templates_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(TEMPLATES_DIR)).unwrap();
        fs::write(dir.path().join(TEMPLATES_DIR).join("notes.txt"), "x").unwrap();

        let err = list_templates(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::NoTemplates(_)));
    }

    #[test]
    fn test_lists_markdown_only_non_recursive() {
        let dir = TempDir::new().unwrap();
        let tdir = dir.path().join(TEMPLATES_DIR);
        fs::create_dir_all(tdir.join("nested")).unwrap();
        fs::write(tdir.join("plant.md"), "# Plant\n").unwrap();
        fs::write(tdir.join("cactus.md"), "# Cactus\n").unwrap();
        fs::write(tdir.join("nested").join("deep.md"), "x").unwrap();

        let templates = list_templates(dir.path()).unwrap();
        assert_eq!(templates, vec![tdir.join("cactus.md"), tdir.join("plant.md")]);
        assert_eq!(load_template(&templates[1]).unwrap(), "# Plant\n");
    }
}
