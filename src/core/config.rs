use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::catalog::Language;
use crate::services::llm::LlmConfig;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Holds `chapters_ar/` and `chapters_en/`.
    #[serde(default = "default_chapters")]
    pub chapters_folder: PathBuf,

    #[serde(default = "default_illustrations")]
    pub illustrations_folder: PathBuf,

    #[serde(default = "default_output")]
    pub output_folder: PathBuf,

    #[serde(default = "default_website")]
    pub website_folder: PathBuf,

    /// Write every chapter without asking between them. Set to `false` to be
    /// prompted after each chapter.
    #[serde(default = "default_unattended")]
    pub unattended: bool,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub book: BookConfig,

    #[serde(default)]
    pub pdf: PdfConfig,
}

/// Cover and header texts, per language.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookConfig {
    pub title_ar: String,
    pub title_en: String,
    pub subtitle_ar: String,
    pub subtitle_en: String,
    pub author_ar: String,
    pub author_en: String,
    pub year_ar: String,
    pub year_en: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            title_ar: "البوصلة القانونية لشركات التقنية في السعودية".to_string(),
            title_en: "The Legal Compass for Tech Companies in Saudi Arabia".to_string(),
            subtitle_ar: "دليلك العملي للأنظمة والامتثال".to_string(),
            subtitle_en: "Your Practical Guide to Regulations and Compliance".to_string(),
            author_ar: "د. عبدالله".to_string(),
            author_en: "Dr. Abdullah".to_string(),
            year_ar: "٢٠٢٦".to_string(),
            year_en: "2026".to_string(),
        }
    }
}

impl BookConfig {
    pub fn title(&self, lang: Language) -> &str {
        lang.pick(&self.title_ar, &self.title_en)
    }

    pub fn subtitle(&self, lang: Language) -> &str {
        lang.pick(&self.subtitle_ar, &self.subtitle_en)
    }

    pub fn author(&self, lang: Language) -> &str {
        lang.pick(&self.author_ar, &self.author_en)
    }

    pub fn year(&self, lang: Language) -> &str {
        lang.pick(&self.year_ar, &self.year_en)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PdfConfig {
    /// Executable invoked as `<command> -u <base> - <output.pdf>`.
    #[serde(default = "default_pdf_command")]
    pub command: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            command: default_pdf_command(),
        }
    }
}

fn default_chapters() -> PathBuf {
    PathBuf::from(".")
}
fn default_illustrations() -> PathBuf {
    PathBuf::from("illustrations")
}
fn default_output() -> PathBuf {
    PathBuf::from("output")
}
fn default_website() -> PathBuf {
    PathBuf::from("website")
}
fn default_unattended() -> bool {
    true
}
fn default_pdf_command() -> String {
    "weasyprint".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chapters_folder: default_chapters(),
            illustrations_folder: default_illustrations(),
            output_folder: default_output(),
            website_folder: default_website(),
            unattended: default_unattended(),
            llm: LlmConfig::default(),
            book: BookConfig::default(),
            pdf: PdfConfig::default(),
        }
    }
}

impl Config {
    /// Loads `config.yml` from the working directory, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("{} not found, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn chapters_dir(&self, lang: Language) -> PathBuf {
        self.chapters_folder.join(format!("chapters_{}", lang.code()))
    }

    pub fn progress_file(&self, lang: Language) -> PathBuf {
        self.chapters_dir(lang).join("progress.json")
    }

    pub fn plan_file(&self) -> PathBuf {
        self.illustrations_folder.join("illustration_plan.json")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for lang in Language::ALL {
            fs::create_dir_all(self.chapters_dir(lang))?;
        }
        fs::create_dir_all(&self.illustrations_folder)?;
        fs::create_dir_all(&self.output_folder)?;
        fs::create_dir_all(&self.website_folder)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let config = Config::load_from(&temp_dir.path().join("config.yml"))?;
        assert_eq!(config.pdf.command, "weasyprint");
        assert_eq!(config.llm.provider, "gemini");
        assert!(config.unattended);
        assert_eq!(
            config.progress_file(Language::Arabic),
            PathBuf::from("./chapters_ar/progress.json")
        );
        Ok(())
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("config.yml");
        fs::write(
            &path,
            "unattended: false\nwebsite_folder: public\nbook:\n  title_ar: ع\n  title_en: T\n  subtitle_ar: s\n  subtitle_en: s\n  author_ar: a\n  author_en: a\n  year_ar: y\n  year_en: y\n",
        )?;

        let config = Config::load_from(&path)?;
        assert!(!config.unattended);
        assert_eq!(config.website_folder, PathBuf::from("public"));
        assert_eq!(config.output_folder, PathBuf::from("output"));
        assert_eq!(config.book.title(Language::English), "T");
        Ok(())
    }
}
