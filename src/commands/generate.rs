//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::loader::ContentLoader;
use crate::generator::{BuildReport, Generator};
use crate::{find_config, Folio};

/// Generate the static site
pub fn run(folio: &Folio) -> Result<BuildReport> {
    let start = Instant::now();

    let collection = ContentLoader::new(folio).load()?;
    tracing::info!("Loaded {} documents", collection.len());

    let report = Generator::new(folio)?.generate(collection)?;

    tracing::info!(
        "Generated {} pages in {:.2}s",
        report.routes.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Watch for file changes and regenerate.
///
/// The config is reloaded on every rebuild, so edits to the config file apply
/// without a restart.
pub async fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&folio.source_dir, notify::RecursiveMode::Recursive)?;
    if folio.assets_dir.exists() {
        watcher.watch(&folio.assets_dir, notify::RecursiveMode::Recursive)?;
    }
    if let Some(config_path) = find_config(&folio.base_dir) {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Debounce: only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    let result = Folio::new(&folio.base_dir).and_then(|folio| run(&folio));
                    if let Err(e) = result {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run_builds_site() {
        let dir = tempfile::tempdir().unwrap();
        let blog = dir.path().join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(blog.join("hola.md"), "---\ntitle: Hola\ndate: 2021-01-01\n---\nHola.").unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        let report = run(&folio).unwrap();

        assert_eq!(report.routes.len(), 2);
        assert!(folio.public_dir.join("index.html").exists());
        assert!(folio.public_dir.join("hola/index.html").exists());
    }
}
