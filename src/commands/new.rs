//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create `<source_dir>/<name>/index.md` with front-matter filled in.
///
/// `name` defaults to the slugified title.
pub fn create_post(folio: &Folio, title: &str, name: Option<&str>) -> Result<PathBuf> {
    let name = match name {
        Some(name) => name.trim_matches('/').to_string(),
        None => slug::slugify(title),
    };
    if name.is_empty() {
        bail!("Cannot derive a file name from {:?}", title);
    }

    let target_dir = folio.source_dir.join(&name);
    let file_path = target_dir.join("index.md");

    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(&target_dir)?;

    let today = chrono::Local::now().date_naive();
    let content = format!(
        "---\ntitle: {}\ndate: {}\ndescription: ''\n---\n",
        serde_yaml::to_string(title)?.trim_end(),
        today.format("%Y-%m-%d")
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    #[test]
    fn test_create_post() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let path = create_post(&folio, "Pruebas: Mocks & Spies", None).unwrap();
        assert_eq!(path, folio.source_dir.join("pruebas-mocks-spies/index.md"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Pruebas: Mocks & Spies"));
        assert!(fm.parse_date().is_some());

        assert!(create_post(&folio, "Pruebas: Mocks & Spies", None).is_err());
    }

    #[test]
    fn test_create_post_with_name() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let path = folio.new_post("TDD en React", Some("/tdd-react/")).unwrap();
        assert_eq!(path, folio.source_dir.join("tdd-react/index.md"));
    }
}
