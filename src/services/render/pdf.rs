use crate::core::catalog::{ChapterSpec, Language};
use crate::core::config::Config;
use crate::core::io::Storage;
use crate::services::render::{collect_chapters, BookRenderer, RenderContext, Target};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::info;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Lays out an HTML document as a PDF file.
#[async_trait]
pub trait PdfEngine: Send + Sync {
    /// `base_dir` resolves relative links in `html`.
    async fn render(&self, html: &str, base_dir: &Path, output: &Path) -> Result<()>;
}

/// Pipes the document into an external renderer, invoked as
/// `<command> -u <base_dir> - <output>`.
pub struct CommandPdfEngine {
    command: String,
}

impl CommandPdfEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl PdfEngine for CommandPdfEngine {
    async fn render(&self, html: &str, base_dir: &Path, output: &Path) -> Result<()> {
        let mut child = Command::new(&self.command)
            .arg("-u")
            .arg(base_dir)
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.command))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .with_context(|| format!("Failed to open {} stdin", self.command))?;
            stdin
                .write_all(html.as_bytes())
                .await
                .with_context(|| format!("Failed to write to {} stdin", self.command))?;
        }

        let result = child
            .wait_with_output()
            .await
            .with_context(|| format!("Failed to wait for {}", self.command))?;

        if !result.status.success() {
            return Err(anyhow!(
                "{} failed ({}): {}",
                self.command,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ));
        }
        Ok(())
    }
}

pub struct PdfBuilder {
    config: Config,
    storage: Arc<dyn Storage>,
    engine: Box<dyn PdfEngine>,
    catalog: Vec<ChapterSpec>,
    context: RenderContext,
}

impl PdfBuilder {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        engine: Box<dyn PdfEngine>,
        catalog: &[ChapterSpec],
        context: RenderContext,
    ) -> Self {
        Self {
            config,
            storage,
            engine,
            catalog: catalog.to_vec(),
            context,
        }
    }

    pub fn html_file(&self, lang: Language) -> PathBuf {
        self.config.output_folder.join(format!("book_{}.html", lang.code()))
    }

    pub fn pdf_file(&self, lang: Language) -> PathBuf {
        self.config.output_folder.join(format!("book_{}.pdf", lang.code()))
    }

    /// Renders one language. The intermediate HTML is kept beside the PDF.
    pub async fn build(&self, lang: Language) -> Result<PathBuf> {
        println!("\nBuilding {} PDF...", lang);

        let chapters = collect_chapters(
            self.storage.as_ref(),
            &self.config.chapters_dir(lang),
            &self.config.illustrations_folder,
            &self.catalog,
        )
        .await?;

        let renderer = BookRenderer::new(Target::Pdf, &self.config.book, &self.catalog, self.context);
        let html = renderer.render_document(lang, &chapters);

        let html_file = self.html_file(lang);
        self.storage.write(&html_file, html.as_bytes()).await?;
        println!("  HTML saved: {}", html_file.display());

        let output = self.pdf_file(lang);
        let base_dir = std::env::current_dir().context("Failed to resolve working directory")?;
        info!("Generating PDF with {} chapters", chapters.len());
        self.engine.render(&html, &base_dir, &output).await?;
        println!("  PDF saved: {}", output.display());

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CATALOG;
    use crate::core::io::NativeStorage;
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockPdfEngine {
        calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
    }

    #[async_trait]
    impl PdfEngine for MockPdfEngine {
        async fn render(&self, html: &str, _base_dir: &Path, output: &Path) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((html.to_string(), output.to_path_buf()));
            fs::write(output, b"%PDF-1.7")?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_build_writes_html_and_pdf() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let config = Config {
            chapters_folder: temp_dir.path().to_path_buf(),
            illustrations_folder: temp_dir.path().join("illustrations"),
            output_folder: temp_dir.path().join("output"),
            ..Config::default()
        };
        config.ensure_directories()?;
        fs::write(
            config.chapters_dir(Language::English).join("02_foreign_investors.md"),
            "# Foreign Investors\n\nMISA licensing.\n",
        )?;

        let engine = MockPdfEngine::default();
        let calls = engine.calls.clone();
        let context = RenderContext {
            generated_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        };
        let builder = PdfBuilder::new(
            config.clone(),
            Arc::new(NativeStorage::new()),
            Box::new(engine),
            CATALOG,
            context,
        );

        let output = builder.build(Language::English).await?;
        assert_eq!(output, config.output_folder.join("book_en.pdf"));
        assert!(output.exists());

        let saved = fs::read_to_string(builder.html_file(Language::English))?;
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, saved);
        assert!(saved.contains("<p>MISA licensing.</p>"));
        assert!(saved.contains("<li>Foreign Investors</li>"));
        assert!(!saved.contains("class=\"figure\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_command_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let engine = CommandPdfEngine::new("definitely-not-a-pdf-renderer");
        let result = engine
            .render("<html></html>", temp_dir.path(), &temp_dir.path().join("out.pdf"))
            .await;
        assert!(result.is_err());
    }
}
