use crate::core::config::Config;
use crate::core::io::Storage;
use crate::core::state::IllustrationEntry;
use crate::services::llm::{GenerationParams, LlmClient};
use crate::utils::text::{slugify_title, strip_code_blocks};
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

const PLANNING_PROMPT: &str = r#"You are an expert book illustrator. Create exactly 20 illustrations for a book about Saudi tech regulations.

Return a JSON array with this exact structure for each item:
{"chapter": "ch01", "type": "flowchart", "title_en": "Title", "title_ar": "عنوان", "description": "What it shows", "prompt": "Image generation prompt"}

Types: diagram, flowchart, comparison_table, infographic
Chapters: ch01-ch14, appendix_a, appendix_b

Cover these topics:
1. Company types comparison (LLC vs SJS vs Single-person)
2. MISA investment license process
3. Company registration steps
4. Personal data types under PDPL
5. Consent requirements flowchart
6. Cross-border data transfer rules
7. PDPL compliance checklist visual
8. PDPL penalties overview
9. NCA cybersecurity framework
10. ECC controls hierarchy
11. Etimad government procurement process
12. Compliance certification badges
13. SDAIA AI governance structure
14. AI ethics principles
15. Data classification pyramid
16. Privacy notice components
17. Breach notification timeline
18. Government contract lifecycle
19. Saudization (Nitaqat) zones
20. Tech company legal roadmap

Return ONLY valid JSON array, no markdown, no explanation."#;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct IllustrationReport {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Illustrator {
    config: Config,
    llm: Box<dyn LlmClient>,
    storage: Arc<dyn Storage>,
}

impl Illustrator {
    pub fn new(config: Config, llm: Box<dyn LlmClient>, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            llm,
            storage,
        }
    }

    pub async fn run(&self) -> Result<IllustrationReport> {
        let plan = self.load_or_create_plan().await?;
        self.generate_all(&plan).await
    }

    /// Reads the cached plan, or asks the model for one and caches it.
    pub async fn load_or_create_plan(&self) -> Result<Vec<IllustrationEntry>> {
        let path = self.config.plan_file();
        if self.storage.exists(&path).await? {
            let content = self.storage.read_to_string(&path).await?;
            let plan: Vec<IllustrationEntry> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            info!("Loaded plan with {} illustrations", plan.len());
            return Ok(plan);
        }

        info!("Planning illustrations...");
        let response = self
            .llm
            .complete(PLANNING_PROMPT, &GenerationParams::PLANNING)
            .await?;
        let plan = parse_plan(&response);

        let content = serde_json::to_string_pretty(&plan)?;
        self.storage.write(&path, content.as_bytes()).await?;
        info!("Created plan with {} illustrations at {}", plan.len(), path.display());
        Ok(plan)
    }

    fn chapter_dir(&self, entry: &IllustrationEntry) -> PathBuf {
        self.config.illustrations_folder.join(&entry.chapter)
    }

    async fn find_existing(&self, entry: &IllustrationEntry) -> Result<Option<PathBuf>> {
        let slug = slugify_title(&entry.title_en);
        let existing = self
            .storage
            .list(&self.chapter_dir(entry))
            .await?
            .into_iter()
            .find(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().contains(&slug))
                    .unwrap_or(false)
            });
        Ok(existing)
    }

    /// Generates every planned figure that is not on disk yet. Individual
    /// failures are counted, never fatal.
    pub async fn generate_all(&self, plan: &[IllustrationEntry]) -> Result<IllustrationReport> {
        let mut report = IllustrationReport::default();

        for (i, entry) in plan.iter().enumerate() {
            let index = i + 1;
            println!("[{}/{}] {} ({})", index, plan.len(), entry.title_en, entry.kind);

            if let Some(path) = self.find_existing(entry).await? {
                info!("Skipping (already exists): {}", path.display());
                report.skipped += 1;
                continue;
            }

            match self.llm.generate_image(&image_prompt(entry)).await {
                Ok(Some(image)) => {
                    let filename = format!(
                        "{:02}_{}.{}",
                        index,
                        slugify_title(&entry.title_en),
                        image.extension()
                    );
                    let path = self.chapter_dir(entry).join(filename);
                    self.storage.write(&path, &image.data).await?;
                    println!("  Saved: {}", path.display());
                    report.generated += 1;
                }
                Ok(None) => {
                    warn!("No image returned for {}", entry.title_en);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Error generating illustration {}: {:#}", entry.title_en, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

pub fn image_prompt(entry: &IllustrationEntry) -> String {
    format!(
        "Create a professional, clean illustration for a business/legal book.\n\
        Style: Modern, minimalist, professional infographic style suitable for print.\n\
        Colors: Use a professional color palette with blues, teals, and accent colors.\n\
        Text: Include clear labels in English (Arabic text will be added later).\n\
        Layout: Clean, well-organized, easy to understand at a glance.\n\
        \n\
        Illustration request:\n\
        {}\n\
        \n\
        Title: {}\n\
        Type: {}\n\
        \n\
        Important: This is for a professional book about Saudi Arabian tech regulations. Keep it clean, corporate, and informative.",
        entry.prompt, entry.title_en, entry.kind
    )
}

/// Extracts the JSON array from a planning response. Code fences are
/// stripped and an array cut off mid-object is closed after the last
/// complete object. Anything unparseable yields [`fallback_plan`].
pub fn parse_plan(response: &str) -> Vec<IllustrationEntry> {
    let mut text = strip_code_blocks(response);
    if let Some(fenced) = fenced_array(&text) {
        text = fenced;
    }

    if !text.ends_with(']') {
        if let Some(last_brace) = text.rfind('}') {
            if last_brace > 0 {
                text.truncate(last_brace + 1);
                text.push(']');
            }
        }
    }

    match serde_json::from_str::<Vec<IllustrationEntry>>(&text) {
        Ok(plan) => plan,
        Err(e) => {
            warn!("Illustration plan is not valid JSON ({}), using fallback plan", e);
            fallback_plan()
        }
    }
}

/// A fenced block somewhere after leading prose.
fn fenced_array(text: &str) -> Option<String> {
    if !text.contains("```") {
        return None;
    }
    text.split("```").map(str::trim).find_map(|part| {
        if let Some(rest) = part.strip_prefix("json") {
            Some(rest.trim().to_string())
        } else if part.starts_with('[') {
            Some(part.to_string())
        } else {
            None
        }
    })
}

/// (chapter, type, title_en, title_ar, description, prompt)
const FALLBACK_PLAN: [(&str, &str, &str, &str, &str, &str); 10] = [
    (
        "ch01",
        "comparison_table",
        "Company Types Comparison",
        "مقارنة أنواع الشركات",
        "LLC vs SJS vs Single-person company comparison",
        "Professional infographic comparing three business entity types: LLC, Simplified Joint Stock, and Single-Person Company. Clean corporate style, blue color scheme, comparison table format with icons.",
    ),
    (
        "ch02",
        "flowchart",
        "Foreign Investment Process",
        "عملية الاستثمار الأجنبي",
        "Steps to obtain MISA license",
        "Professional flowchart showing foreign investment license application process in Saudi Arabia. Steps include: Application, Review, Approval, Registration. Clean corporate style.",
    ),
    (
        "ch04",
        "diagram",
        "Personal Data Types",
        "أنواع البيانات الشخصية",
        "Classification of personal vs sensitive data under PDPL",
        "Professional diagram showing data classification pyramid. Top: Sensitive Data, Bottom: Personal Data. Include examples for each category. Blue and teal corporate colors.",
    ),
    (
        "ch05",
        "flowchart",
        "Consent Decision Tree",
        "شجرة قرارات الموافقة",
        "When consent is required under PDPL",
        "Decision tree flowchart for determining when explicit consent is required under Saudi PDPL. Yes/No branches leading to consent required or exception applies.",
    ),
    (
        "ch06",
        "infographic",
        "Cross-Border Data Transfer",
        "نقل البيانات عبر الحدود",
        "Rules for transferring data outside Saudi Arabia",
        "Infographic showing cross-border data transfer rules. World map with Saudi Arabia highlighted, arrows showing data flow, checkmarks for allowed transfers, X for prohibited.",
    ),
    (
        "ch09",
        "diagram",
        "NCA Cybersecurity Framework",
        "إطار الأمن السيبراني",
        "Overview of ECC, CCC, CSCC controls",
        "Hierarchical diagram showing Saudi National Cybersecurity Authority framework. Three pillars: ECC (Essential Controls), CCC (Cloud Controls), CSCC (Critical Systems Controls).",
    ),
    (
        "ch10",
        "infographic",
        "ECC Controls Overview",
        "نظرة عامة على الضوابط الأساسية",
        "The main domains of Essential Cybersecurity Controls",
        "Professional infographic showing 8 domains of ECC controls: Governance, Asset Management, Identity Management, Application Security, Cryptography, Backup, Vulnerability Management, Incident Response.",
    ),
    (
        "ch11",
        "flowchart",
        "Government Procurement Process",
        "عملية المشتريات الحكومية",
        "Etimad platform tender process",
        "Flowchart showing government tender process via Etimad platform: Registration, Tender Search, Bid Submission, Evaluation, Award, Contract. Professional government style.",
    ),
    (
        "ch13",
        "diagram",
        "SDAIA AI Governance",
        "حوكمة الذكاء الاصطناعي",
        "SDAIA role in AI regulation",
        "Organizational diagram showing SDAIA structure and role in Saudi AI governance. Include National Data and AI Strategy elements.",
    ),
    (
        "ch14",
        "infographic",
        "AI Ethics Principles",
        "مبادئ أخلاقيات الذكاء الاصطناعي",
        "Saudi AI ethics principles visualization",
        "Circular infographic showing 6 AI ethics principles: Fairness, Transparency, Accountability, Privacy, Security, Human Oversight. Modern tech style with icons.",
    ),
];

pub fn fallback_plan() -> Vec<IllustrationEntry> {
    FALLBACK_PLAN
        .iter()
        .map(
            |(chapter, kind, title_en, title_ar, description, prompt)| IllustrationEntry {
                chapter: chapter.to_string(),
                kind: kind.to_string(),
                title_en: title_en.to_string(),
                title_ar: title_ar.to_string(),
                description: description.to_string(),
                prompt: prompt.to_string(),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::NativeStorage;
    use crate::services::llm::ImagePayload;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;

    #[test]
    fn test_malformed_plan_falls_back() {
        let plan = parse_plan("Sure! Here are some ideas for your book.");
        assert_eq!(plan.len(), 10);
        assert_eq!(plan, fallback_plan());
    }

    #[test]
    fn test_plan_in_code_fence() {
        let response = "```json\n[{\"chapter\": \"ch03\", \"type\": \"diagram\", \"title_en\": \"Steps\", \"title_ar\": \"خطوات\", \"description\": \"d\", \"prompt\": \"p\"}]\n```";
        let plan = parse_plan(response);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].chapter, "ch03");
        assert_eq!(plan[0].kind, "diagram");
    }

    #[test]
    fn test_plan_after_prose() {
        let response = "Here is the plan:\n```\n[{\"title_en\": \"Nitaqat Zones\", \"prompt\": \"p\"}]\n```\nEnjoy.";
        let plan = parse_plan(response);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].chapter, "misc");
    }

    #[test]
    fn test_truncated_plan_is_repaired() {
        let response = r#"[{"chapter": "ch01", "type": "diagram", "title_en": "One", "prompt": "p1"},
            {"chapter": "ch02", "type": "diagram", "title_en": "Two", "prompt": "p2"},
            {"chapter": "ch03", "type": "diag"#;
        let plan = parse_plan(response);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].title_en, "Two");
    }

    #[derive(Debug, Default)]
    struct MockLlmClient {
        planning_calls: Arc<Mutex<usize>>,
        image_prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            *self.planning_calls.lock().unwrap() += 1;
            Ok("not json at all".to_string())
        }

        async fn generate_image(&self, prompt: &str) -> Result<Option<ImagePayload>> {
            self.image_prompts.lock().unwrap().push(prompt.to_string());
            if prompt.contains("Title: Consent Decision Tree") {
                anyhow::bail!("quota exceeded");
            }
            if prompt.contains("Title: Personal Data Types") {
                return Ok(None);
            }
            Ok(Some(ImagePayload {
                data: vec![1, 2, 3],
                mime_type: "image/png".to_string(),
            }))
        }
    }

    #[tokio::test]
    async fn test_plan_is_cached_and_existing_images_skipped() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let config = Config {
            illustrations_folder: temp_dir.path().join("illustrations"),
            ..Config::default()
        };
        let existing = config
            .illustrations_folder
            .join("ch01")
            .join("01_company_types_comparison.jpg");
        fs::create_dir_all(existing.parent().unwrap())?;
        fs::write(&existing, b"old")?;

        let llm = MockLlmClient::default();
        let planning_calls = llm.planning_calls.clone();
        let image_prompts = llm.image_prompts.clone();
        let illustrator = Illustrator::new(config.clone(), Box::new(llm), Arc::new(NativeStorage::new()));

        let report = illustrator.run().await?;
        assert_eq!(
            report,
            IllustrationReport {
                generated: 7,
                skipped: 1,
                failed: 2
            }
        );
        assert_eq!(image_prompts.lock().unwrap().len(), 9);
        assert!(config.plan_file().exists());
        assert!(config
            .illustrations_folder
            .join("ch02")
            .join("02_foreign_investment_process.png")
            .exists());

        // Second call reads the cached plan instead of asking again.
        let plan = illustrator.load_or_create_plan().await?;
        assert_eq!(plan.len(), 10);
        assert_eq!(*planning_calls.lock().unwrap(), 1);
        Ok(())
    }
}
