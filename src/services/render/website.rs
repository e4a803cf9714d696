use crate::core::catalog::{ChapterSpec, Language};
use crate::core::config::Config;
use crate::core::io::Storage;
use crate::services::render::{collect_chapters, BookRenderer, RenderContext, Target};
use anyhow::Result;
use log::debug;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WebsiteReport {
    pub pages: usize,
    pub assets: usize,
}

pub struct WebsiteBuilder {
    config: Config,
    storage: Arc<dyn Storage>,
    catalog: Vec<ChapterSpec>,
    context: RenderContext,
}

impl WebsiteBuilder {
    pub fn new(config: Config, storage: Arc<dyn Storage>, catalog: &[ChapterSpec], context: RenderContext) -> Self {
        Self {
            config,
            storage,
            catalog: catalog.to_vec(),
            context,
        }
    }

    pub fn page_file(&self, lang: Language, id: &str) -> PathBuf {
        self.config
            .website_folder
            .join(lang.code())
            .join(format!("{}.html", id))
    }

    pub fn index_file(&self) -> PathBuf {
        self.config.website_folder.join("index.html")
    }

    /// Writes both languages, the shared figure assets and the landing page.
    pub async fn build(&self) -> Result<WebsiteReport> {
        let renderer = BookRenderer::new(Target::Website, &self.config.book, &self.catalog, self.context);
        let mut report = WebsiteReport::default();
        let mut copied = HashSet::new();

        for lang in Language::ALL {
            println!("\nBuilding {} pages...", lang.code().to_uppercase());
            let chapters = collect_chapters(
                self.storage.as_ref(),
                &self.config.chapters_dir(lang),
                &self.config.illustrations_folder,
                &self.catalog,
            )
            .await?;

            for chapter in &chapters {
                for figure in &chapter.figures {
                    if !copied.insert(figure.path.clone()) {
                        continue;
                    }
                    let target = self
                        .config
                        .website_folder
                        .join("assets")
                        .join(figure.group)
                        .join(&figure.file_name);
                    let data = self.storage.read(&figure.path).await?;
                    self.storage.write(&target, &data).await?;
                    debug!("Copied {} to {}", figure.path.display(), target.display());
                    report.assets += 1;
                }

                let page = renderer.render_page(lang, chapter);
                let path = self.page_file(lang, chapter.spec.id);
                self.storage.write(&path, page.as_bytes()).await?;
                println!("  Created: {}.html", chapter.spec.id);
                report.pages += 1;
            }
        }

        self.storage
            .write(&self.index_file(), renderer.render_index().as_bytes())
            .await?;
        Ok(report)
    }
}
