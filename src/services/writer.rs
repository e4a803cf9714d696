use crate::core::catalog::{ChapterSpec, Language};
use crate::core::config::Config;
use crate::core::io::Storage;
use crate::core::state::{ChapterStatus, ProgressRecord};
use crate::services::llm::{GenerationParams, LlmClient};
use crate::utils::text::{truncate_chars, word_count};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::InquireError;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// Characters of chapter text sent along with the summary request.
const SUMMARY_INPUT_CHARS: usize = 3000;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    pub written: Vec<String>,
    pub skipped: usize,
    /// Words written during this run.
    pub total_words: usize,
    /// Chapters completed so far, this run and earlier ones.
    pub completed: usize,
    /// Words across every chapter file on disk.
    pub book_words: usize,
}

/// Writes every chapter of a catalog in one language, resuming from
/// `progress.json`.
pub struct BookWriter {
    config: Config,
    llm: Box<dyn LlmClient>,
    storage: Arc<dyn Storage>,
    language: Language,
    catalog: Vec<ChapterSpec>,
    progress: ProgressRecord,
}

impl BookWriter {
    pub async fn new(
        config: Config,
        llm: Box<dyn LlmClient>,
        storage: Arc<dyn Storage>,
        language: Language,
        catalog: &[ChapterSpec],
    ) -> Result<Self> {
        let mut progress = Self::load_progress(&config, language, storage.as_ref()).await?;

        if let Some(stale) = progress.in_progress.take() {
            warn!(
                "Chapter {} was interrupted during a previous run; it will be regenerated",
                stale
            );
        }

        Ok(Self {
            config,
            llm,
            storage,
            language,
            catalog: catalog.to_vec(),
            progress,
        })
    }

    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    async fn load_progress(
        config: &Config,
        language: Language,
        storage: &dyn Storage,
    ) -> Result<ProgressRecord> {
        let path = config.progress_file(language);
        if storage.exists(&path).await? {
            let content = storage.read_to_string(&path).await?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(ProgressRecord::default())
        }
    }

    async fn save_progress(&self) -> Result<()> {
        let path = self.config.progress_file(self.language);
        let content = serde_json::to_string_pretty(&self.progress)?;
        self.storage.write(&path, content.as_bytes()).await
    }

    fn chapter_file(&self, id: &str) -> PathBuf {
        self.config.chapters_dir(self.language).join(format!("{}.md", id))
    }

    fn summary_file(&self, id: &str) -> PathBuf {
        self.config
            .chapters_dir(self.language)
            .join(format!("{}_summary.txt", id))
    }

    /// Word count over the chapter files that exist, in catalog order.
    pub async fn book_words(&self) -> Result<usize> {
        let mut total = 0;
        for chapter in &self.catalog {
            let path = self.chapter_file(chapter.id);
            if self.storage.exists(&path).await? {
                total += word_count(&self.storage.read_to_string(&path).await?);
            }
        }
        Ok(total)
    }

    /// Summaries of completed chapters, in catalog order.
    async fn previous_summaries(&self) -> Result<String> {
        let mut summaries = Vec::new();
        for chapter in &self.catalog {
            if !self.progress.is_completed(chapter.id) {
                continue;
            }
            let path = self.summary_file(chapter.id);
            if self.storage.exists(&path).await? {
                summaries.push(self.storage.read_to_string(&path).await?);
            }
        }
        Ok(summaries.join("\n\n"))
    }

    pub async fn run(&mut self) -> Result<RunReport> {
        let total = self.catalog.len();
        println!("Writing {} version", self.language);
        println!(
            "Total chapters: {}, completed: {}",
            total,
            self.progress.completed.len()
        );

        let mut running_summary = self.previous_summaries().await?;
        let mut report = RunReport::default();

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );

        let catalog = self.catalog.clone();
        for (i, chapter) in catalog.iter().enumerate() {
            let title = chapter.title(self.language);

            if self.progress.status(chapter.id) == ChapterStatus::Completed {
                info!("Skipping completed chapter: {}", chapter.id);
                report.skipped += 1;
                pb.inc(1);
                continue;
            }

            pb.set_message(chapter.id.to_string());
            info!("Writing {} (target {} words)", title, chapter.word_target);

            self.progress.mark_in_progress(chapter.id);
            self.save_progress().await?;

            match self.write_chapter(chapter, &running_summary).await {
                Ok((words, summary_block)) => {
                    if !running_summary.is_empty() {
                        running_summary.push_str("\n\n");
                    }
                    running_summary.push_str(&summary_block);

                    self.progress.mark_completed(chapter.id);
                    self.save_progress().await?;

                    pb.println(format!("[✓] {} ({} words)", chapter.id, words));
                    report.written.push(chapter.id.to_string());
                    report.total_words += words;
                }
                Err(e) => {
                    pb.abandon_with_message(format!("failed on {}", chapter.id));
                    warn!("Error writing chapter {}: {:#}", chapter.id, e);
                    self.progress.clear_in_progress();
                    if let Err(save_err) = self.save_progress().await {
                        warn!("Failed to save progress after error: {:#}", save_err);
                    }
                    return Err(e.context(format!("Failed to write chapter {}", chapter.id)));
                }
            }
            pb.inc(1);

            if !self.config.unattended && i + 1 < total && !confirm_next_chapter() {
                break;
            }
        }

        pb.finish_with_message("done");
        report.completed = self.progress.completed.len();
        report.book_words = self.book_words().await?;
        Ok(report)
    }

    /// Generates and persists one chapter and its summary. Returns the
    /// chapter's word count and the summary block appended to later prompts.
    async fn write_chapter(
        &self,
        chapter: &ChapterSpec,
        running_summary: &str,
    ) -> Result<(usize, String)> {
        let prompt = chapter_prompt(chapter, self.language, running_summary);
        let content = self.llm.complete(&prompt, &GenerationParams::CHAPTER).await?;

        self.storage
            .write(&self.chapter_file(chapter.id), content.as_bytes())
            .await?;

        let summary_request = summary_prompt(&content, self.language);
        let summary = self
            .llm
            .complete(&summary_request, &GenerationParams::SUMMARY)
            .await?;

        let summary_block = format!("## {}\n{}", chapter.title(self.language), summary);
        self.storage
            .write(&self.summary_file(chapter.id), summary_block.as_bytes())
            .await?;

        Ok((word_count(&content), summary_block))
    }
}

/// Without a terminal there is nobody to ask, so the run goes on.
fn confirm_next_chapter() -> bool {
    match inquire::Confirm::new("Continue to next chapter?")
        .with_default(true)
        .prompt()
    {
        Ok(true) => true,
        Ok(false) => {
            println!("Stopping as requested.");
            false
        }
        Err(InquireError::NotTTY) => {
            info!("No terminal attached, continuing");
            true
        }
        Err(e) => {
            warn!("Error reading input, stopping: {}", e);
            false
        }
    }
}

pub fn chapter_prompt(chapter: &ChapterSpec, lang: Language, previous_summary: &str) -> String {
    let sections = chapter
        .sections(lang)
        .iter()
        .map(|s| format!("- {}", s))
        .collect::<Vec<_>>()
        .join("\n");

    match lang {
        Language::Arabic => {
            let previous = if previous_summary.is_empty() {
                String::new()
            } else {
                format!("## ملخص الفصول السابقة\n{}", previous_summary)
            };
            format!(
                "أنت مؤلف كتاب متخصص في الأنظمة السعودية للشركات التقنية. اكتب الفصل التالي بالعربية الفصحى بأسلوب عملي ومهني.\n\
                \n## معلومات الفصل\
                \n- العنوان: {title}\
                \n- عدد الكلمات المستهدف: {words} كلمة\
                \n- المرجع الأساسي: {reference}\n\
                \n## الأقسام المطلوبة\n{sections}\n\
                \n## إرشادات الكتابة\
                \n1. اكتب بالعربية الفصحى مع استخدام المصطلحات الإنجليزية التقنية عند الضرورة\
                \n2. استخدم أسلوباً عملياً مباشراً يخاطب رواد الأعمال والمطورين\
                \n3. أضف أمثلة عملية من واقع السوق السعودي\
                \n4. استخدم القوائم والجداول عند الحاجة\
                \n5. اجعل المحتوى قابلاً للتطبيق مباشرة\
                \n6. تجنب اللغة القانونية المعقدة - بسّط المفاهيم\
                \n7. أضف نصائح عملية وتحذيرات من الأخطاء الشائعة\
                \n8. اذكر المواد القانونية المحددة عند الإشارة للأنظمة\n\
                \n## سياق الكتاب\
                \nهذا الكتاب بعنوان \"البوصلة القانونية لشركات التقنية في السعودية\" يستهدف:\
                \n- رواد الأعمال السعوديين في قطاع التقنية\
                \n- الشركات الأجنبية الراغبة في دخول السوق السعودي\
                \n- المبرمجين ومديري المشاريع\
                \n- المستثمرين في قطاع التقنية\n\
                \n{previous}\n\
                \n## التنسيق\
                \n- استخدم Markdown للتنسيق\
                \n- ابدأ بالعنوان الرئيسي (#)\
                \n- استخدم العناوين الفرعية (## و ###)\
                \n- أضف قوائم مرقمة ونقطية\
                \n- استخدم الجداول للمقارنات\
                \n- أضف اقتباسات للنصوص القانونية المهمة (>)\n\
                \nاكتب الفصل كاملاً الآن:\n",
                title = chapter.title_ar,
                words = chapter.word_target,
                reference = chapter.reference(lang),
                sections = sections,
                previous = previous,
            )
        }
        Language::English => {
            let previous = if previous_summary.is_empty() {
                String::new()
            } else {
                format!("## Summary of Previous Chapters\n{}", previous_summary)
            };
            format!(
                "You are an expert author specializing in Saudi regulations for tech companies. Write the following chapter in clear, professional English with a practical approach.\n\
                \n## Chapter Information\
                \n- Title: {title}\
                \n- Target word count: {words} words\
                \n- Primary reference: {reference}\n\
                \n## Required Sections\n{sections}\n\
                \n## Writing Guidelines\
                \n1. Write in clear, professional English accessible to international readers\
                \n2. Use a practical, direct style addressing entrepreneurs and developers\
                \n3. Add practical examples from the Saudi market context\
                \n4. Use lists and tables where appropriate\
                \n5. Make content immediately actionable\
                \n6. Avoid complex legal jargon - simplify concepts\
                \n7. Add practical tips and warnings about common mistakes\
                \n8. Reference specific legal articles when citing regulations\
                \n9. Include Arabic terms in parentheses where relevant (e.g., \"Saudization (Nitaqat)\")\n\
                \n## Book Context\
                \nThis book titled \"The Legal Compass for Tech Companies in Saudi Arabia\" targets:\
                \n- Saudi tech entrepreneurs\
                \n- Foreign companies wanting to enter the Saudi market\
                \n- Developers and project managers\
                \n- Tech sector investors\n\
                \n{previous}\n\
                \n## Formatting\
                \n- Use Markdown formatting\
                \n- Start with main heading (#)\
                \n- Use subheadings (## and ###)\
                \n- Add numbered and bulleted lists\
                \n- Use tables for comparisons\
                \n- Add blockquotes for important legal texts (>)\n\
                \nWrite the complete chapter now:\n",
                title = chapter.title_en,
                words = chapter.word_target,
                reference = chapter.reference(lang),
                sections = sections,
                previous = previous,
            )
        }
    }
}

pub fn summary_prompt(content: &str, lang: Language) -> String {
    let excerpt = truncate_chars(content, SUMMARY_INPUT_CHARS);
    match lang {
        Language::Arabic => format!(
            "اكتب ملخصاً مختصراً (٣-٥ جمل) لهذا الفصل بالعربية:\n\n{}...\n\nالملخص:",
            excerpt
        ),
        Language::English => format!(
            "Write a brief summary (3-5 sentences) of this chapter in English:\n\n{}...\n\nSummary:",
            excerpt
        ),
    }
}
