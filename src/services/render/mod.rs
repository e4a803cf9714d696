pub mod markdown;
pub mod pdf;
pub mod templates;
pub mod website;

use crate::core::catalog::{chapter_number, illustration_dir, ChapterSpec, Language};
use crate::core::config::BookConfig;
use crate::core::io::Storage;
use crate::utils::text::title_case;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{debug, info};
use maud::{html, Markup, PreEscaped};
use std::path::{Path, PathBuf};

pub use markdown::{inline_markdown_to_html, markdown_to_html, split_title};

pub const MAX_FIGURES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Pdf,
    Website,
}

impl Target {
    pub fn stylesheet(self) -> &'static str {
        match self {
            Target::Pdf => templates::PDF_CSS,
            Target::Website => templates::WEBSITE_CSS,
        }
    }
}

/// Values that would otherwise make two renders of the same input differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub generated_on: NaiveDate,
}

impl RenderContext {
    pub fn now() -> Self {
        Self {
            generated_on: Local::now().date_naive(),
        }
    }

    pub fn date(&self) -> String {
        self.generated_on.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub path: PathBuf,
    /// Illustration subdirectory, e.g. `ch01`.
    pub group: &'static str,
    pub file_name: String,
    pub caption: String,
}

impl Figure {
    fn new(path: PathBuf, group: &'static str) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().replace('_', " "))
            .unwrap_or_default();
        Self {
            caption: title_case(&stem),
            path,
            group,
            file_name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedChapter {
    pub spec: ChapterSpec,
    pub title: String,
    /// `title` with its inline markdown rendered.
    pub title_html: String,
    pub body_html: String,
    pub figures: Vec<Figure>,
}

/// Images for a chapter: `.jpg` files first, then `.png`, each sorted by
/// name, at most [`MAX_FIGURES`].
pub async fn find_figures(storage: &dyn Storage, illustrations: &Path, id: &str) -> Result<Vec<Figure>> {
    let Some(group) = illustration_dir(id) else {
        return Ok(Vec::new());
    };
    let entries = storage.list(&illustrations.join(group)).await?;

    Ok(with_extension(&entries, "jpg")
        .chain(with_extension(&entries, "png"))
        .take(MAX_FIGURES)
        .map(|path| Figure::new(path, group))
        .collect())
}

fn with_extension<'a>(entries: &'a [PathBuf], ext: &'static str) -> impl Iterator<Item = PathBuf> + 'a {
    entries
        .iter()
        .filter(move |p| p.extension().is_some_and(|e| e == ext))
        .cloned()
}

/// Reads `<id>.md` for every catalog entry in order. Chapters not yet
/// written are skipped.
pub async fn collect_chapters(
    storage: &dyn Storage,
    chapters_dir: &Path,
    illustrations: &Path,
    catalog: &[ChapterSpec],
) -> Result<Vec<RenderedChapter>> {
    let mut chapters = Vec::new();
    for spec in catalog {
        let path = chapters_dir.join(format!("{}.md", spec.id));
        if !storage.exists(&path).await? {
            debug!("Skipping missing chapter {}", path.display());
            continue;
        }
        let content = storage.read_to_string(&path).await?;
        let (title, body) = split_title(&content);
        chapters.push(RenderedChapter {
            spec: *spec,
            title_html: inline_markdown_to_html(&title),
            title,
            body_html: markdown_to_html(&body),
            figures: find_figures(storage, illustrations, spec.id).await?,
        });
        info!("  Added: {}", spec.id);
    }
    Ok(chapters)
}

/// Turns collected chapters into HTML for one [`Target`].
pub struct BookRenderer<'a> {
    target: Target,
    book: &'a BookConfig,
    catalog: &'a [ChapterSpec],
    context: RenderContext,
}

impl<'a> BookRenderer<'a> {
    pub fn new(
        target: Target,
        book: &'a BookConfig,
        catalog: &'a [ChapterSpec],
        context: RenderContext,
    ) -> Self {
        Self {
            target,
            book,
            catalog,
            context,
        }
    }

    fn figure_src(&self, figure: &Figure) -> String {
        match self.target {
            Target::Pdf if figure.path.is_absolute() => format!("file://{}", figure.path.display()),
            Target::Pdf => figure.path.display().to_string(),
            Target::Website => format!("../assets/{}/{}", figure.group, figure.file_name),
        }
    }

    fn figures(&self, chapter: &RenderedChapter) -> Markup {
        html! {
            @for figure in &chapter.figures {
                (templates::figure(&self.figure_src(figure), &figure.caption))
            }
        }
    }

    /// One chapter wrapped in the section template of the target.
    pub fn render_chapter(&self, lang: Language, chapter: &RenderedChapter) -> Markup {
        match self.target {
            Target::Pdf => html! {
                div.chapter {
                    (templates::chapter_cover(
                        &chapter_number(chapter.spec.id),
                        &chapter.title_html,
                        chapter.spec.subtitle(lang),
                    ))
                    div.chapter-content {
                        (PreEscaped(&chapter.body_html))
                        (self.figures(chapter))
                    }
                }
            },
            Target::Website => html! {
                h1 { (PreEscaped(&chapter.title_html)) }
                (PreEscaped(&chapter.body_html))
                (self.figures(chapter))
            },
        }
    }

    /// The whole book as a single document: cover, contents, chapters.
    pub fn render_document(&self, lang: Language, chapters: &[RenderedChapter]) -> String {
        let content = html! {
            (templates::cover(
                self.book.title(lang),
                self.book.subtitle(lang),
                self.book.author(lang),
                self.book.year(lang),
            ))
            (templates::toc(lang, chapters.iter().map(|c| c.title_html.as_str())))
            @for chapter in chapters {
                (self.render_chapter(lang, chapter))
            }
        };
        let body_class = lang.is_rtl().then_some("rtl");
        templates::document(lang, None, self.target.stylesheet(), None, body_class, content).into_string()
    }

    /// A standalone website page for one chapter.
    pub fn render_page(&self, lang: Language, chapter: &RenderedChapter) -> String {
        let disclaimer = templates::disclaimer(lang, &self.context.date());
        let content = html! {
            (templates::page_header(lang, chapter.spec.id, templates::nav(lang, self.catalog, chapter.spec.id)))
            main.container {
                (disclaimer)
                div.content {
                    (self.render_chapter(lang, chapter))
                }
                (disclaimer)
            }
            (templates::footer())
        };
        let html_class = lang.is_rtl().then_some("rtl");
        templates::document(
            lang,
            Some(templates::site_title(lang)),
            self.target.stylesheet(),
            html_class,
            None,
            content,
        )
        .into_string()
    }

    /// Bilingual landing page linking to the first chapter of each language.
    pub fn render_index(&self) -> String {
        let first = self.catalog.first().map(|c| c.id).unwrap_or("index");
        templates::index(first).into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CATALOG;
    use crate::core::io::NativeStorage;
    use std::fs;

    fn fixed_context() -> RenderContext {
        RenderContext {
            generated_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        }
    }

    fn chapter(id: &str, markdown: &str) -> RenderedChapter {
        let (title, body) = split_title(markdown);
        RenderedChapter {
            spec: crate::core::catalog::find(CATALOG, id).unwrap(),
            title_html: inline_markdown_to_html(&title),
            title,
            body_html: markdown_to_html(&body),
            figures: Vec::new(),
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let book = BookConfig::default();
        let chapters = vec![chapter("01_company_types", "# Company Types\n\n| A | B |\n|---|---|\n| 1 | 2 |\n")];

        let first = BookRenderer::new(Target::Pdf, &book, CATALOG, fixed_context());
        let second = BookRenderer::new(Target::Pdf, &book, CATALOG, fixed_context());
        assert_eq!(
            first.render_document(Language::English, &chapters),
            second.render_document(Language::English, &chapters)
        );

        let site = BookRenderer::new(Target::Website, &book, CATALOG, fixed_context());
        let page = site.render_page(Language::English, &chapters[0]);
        assert_eq!(page, site.render_page(Language::English, &chapters[0]));
        assert_eq!(page.matches("Last updated: 2026-01-15").count(), 2);
    }

    #[test]
    fn test_title_is_not_duplicated() {
        let book = BookConfig::default();
        let ch = chapter("00_introduction", "# Title\nHello");
        assert_eq!(ch.title, "Title");
        assert_eq!(ch.body_html, "<p>Hello</p>\n");

        let pdf = BookRenderer::new(Target::Pdf, &book, CATALOG, fixed_context());
        let html = pdf.render_chapter(Language::English, &ch).into_string();
        assert_eq!(html.matches("Title").count(), 1);
        assert!(html.contains(r#"<h1 class="chapter-title">Title</h1>"#));
        assert!(html.contains("<p>Hello</p>"));
        assert!(!html.contains('#'));

        let site = BookRenderer::new(Target::Website, &book, CATALOG, fixed_context());
        let html = site.render_chapter(Language::English, &ch).into_string();
        assert_eq!(html, "<h1>Title</h1><p>Hello</p>\n");
    }

    #[test]
    fn test_title_inline_markdown_is_rendered() {
        let book = BookConfig::default();
        let ch = chapter("01_company_types", "# **Company** Types & `LLC`\nText");
        assert_eq!(ch.title, "**Company** Types & `LLC`");
        let expected = "<strong>Company</strong> Types &amp; <code>LLC</code>";

        let pdf = BookRenderer::new(Target::Pdf, &book, CATALOG, fixed_context());
        let document = pdf.render_document(Language::English, std::slice::from_ref(&ch));
        assert!(document.contains(&format!(r#"<h1 class="chapter-title">{}</h1>"#, expected)));
        assert!(document.contains(&format!("<li>{}</li>", expected)));
        assert!(!document.contains("**"));

        let site = BookRenderer::new(Target::Website, &book, CATALOG, fixed_context());
        let page = site.render_page(Language::English, &ch);
        assert!(page.contains(&format!("<h1>{}</h1>", expected)));
        assert!(!page.contains("**"));
    }

    #[test]
    fn test_arabic_document_is_rtl() {
        let book = BookConfig::default();
        let chapters = vec![chapter("appendix_a_checklists", "# قوائم\nنص")];
        let pdf = BookRenderer::new(Target::Pdf, &book, CATALOG, fixed_context());
        let html = pdf.render_document(Language::Arabic, &chapters);
        assert!(html.contains(r#"<html lang="ar">"#));
        assert!(html.contains(r#"<body class="rtl">"#));
        assert!(html.contains(r#"<div class="chapter-number">A</div>"#));
        assert!(html.contains("<li>قوائم</li>"));
    }

    #[test]
    fn test_page_links_other_language() {
        let book = BookConfig::default();
        let site = BookRenderer::new(Target::Website, &book, CATALOG, fixed_context());
        let html = site.render_page(Language::Arabic, &chapter("05_consent", "# الموافقة\nنص"));
        assert!(html.contains(r#"<a href="../en/05_consent.html">English</a>"#));
        assert!(html.contains(r#"<a href="05_consent.html" class="active">"#));

        let index = site.render_index();
        assert!(index.contains(r#"href="ar/00_introduction.html""#));
        assert!(index.contains(r#"href="en/00_introduction.html""#));
    }

    #[tokio::test]
    async fn test_collect_skips_missing_and_finds_figures() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let chapters_dir = temp_dir.path().join("chapters_en");
        let illustrations = temp_dir.path().join("illustrations");
        fs::create_dir_all(&chapters_dir)?;
        fs::create_dir_all(illustrations.join("ch01"))?;
        fs::write(chapters_dir.join("00_introduction.md"), "# Intro\nText")?;
        fs::write(chapters_dir.join("01_company_types.md"), "# Types\nText")?;
        for name in ["03_c.png", "01_a.png", "02_company_types.jpg", "notes.txt"] {
            fs::write(illustrations.join("ch01").join(name), b"x")?;
        }

        let storage = NativeStorage::new();
        let chapters = collect_chapters(&storage, &chapters_dir, &illustrations, CATALOG).await?;
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].spec.id, "00_introduction");
        assert!(chapters[0].figures.is_empty());

        let names: Vec<&str> = chapters[1].figures.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["02_company_types.jpg", "01_a.png"]);
        assert_eq!(chapters[1].figures[0].caption, "02 Company Types");

        let book = BookConfig::default();
        let pdf = BookRenderer::new(Target::Pdf, &book, CATALOG, fixed_context());
        assert!(!pdf
            .render_chapter(Language::English, &chapters[0])
            .into_string()
            .contains("class=\"figure\""));
        let site = BookRenderer::new(Target::Website, &book, CATALOG, fixed_context());
        assert!(site
            .render_chapter(Language::English, &chapters[1])
            .into_string()
            .contains(r#"src="../assets/ch01/02_company_types.jpg""#));
        Ok(())
    }
}
