use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use legal_compass::core::catalog::{Language, CATALOG};
use legal_compass::core::config::Config;
use legal_compass::core::io::{NativeStorage, Storage};
use legal_compass::services::illustrations::Illustrator;
use legal_compass::services::llm::create_llm;
use legal_compass::services::render::pdf::{CommandPdfEngine, PdfBuilder};
use legal_compass::services::render::website::WebsiteBuilder;
use legal_compass::services::render::RenderContext;
use legal_compass::services::writer::BookWriter;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "legal-compass")]
#[command(about = "Writes and publishes the bilingual Saudi tech legal guide")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the chapters that are not written yet
    Write {
        #[arg(long, value_enum, default_value_t = LangChoice::Both)]
        lang: LangChoice,
    },
    /// Plan and generate the illustrations
    Illustrate,
    /// Render the book as PDF
    Pdf {
        #[arg(long, value_enum, default_value_t = LangChoice::Both)]
        lang: LangChoice,
    },
    /// Render the static website
    Website,
}

#[derive(Clone, Copy, ValueEnum)]
enum LangChoice {
    Ar,
    En,
    Both,
}

impl LangChoice {
    fn languages(self) -> Vec<Language> {
        match self {
            LangChoice::Ar => vec![Language::Arabic],
            LangChoice::En => vec![Language::English],
            LangChoice::Both => Language::ALL.to_vec(),
        }
    }
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            return Err(e);
        }
    };
    config.ensure_directories()?;
    let storage: Arc<dyn Storage> = Arc::new(NativeStorage::new());

    match cli.command {
        Command::Write { lang } => {
            banner("Saudi Tech Legal Compass - Book Writer");
            for language in lang.languages() {
                let llm = create_llm(&config)?;
                let mut writer =
                    BookWriter::new(config.clone(), llm, storage.clone(), language, CATALOG).await?;
                let report = writer.run().await?;
                println!("\n{} version complete", language);
                println!("Chapters written: {}/{}", report.completed, CATALOG.len());
                println!("Output: {}", config.chapters_dir(language).display());
                println!(
                    "Total words: ~{} ({} this run, {} skipped)",
                    report.book_words, report.total_words, report.skipped
                );
            }
        }
        Command::Illustrate => {
            banner("Saudi Tech Legal Compass - Illustration Generator");
            let llm = create_llm(&config)?;
            let illustrator = Illustrator::new(config.clone(), llm, storage.clone());
            let report = illustrator.run().await?;
            println!(
                "\nGenerated: {}, skipped: {}, failed: {}",
                report.generated, report.skipped, report.failed
            );
            println!("Output: {}", config.illustrations_folder.display());
        }
        Command::Pdf { lang } => {
            banner("Saudi Tech Legal Compass - PDF Builder");
            let engine = CommandPdfEngine::new(config.pdf.command.clone());
            let builder = PdfBuilder::new(
                config.clone(),
                storage.clone(),
                Box::new(engine),
                CATALOG,
                RenderContext::now(),
            );
            for language in lang.languages() {
                let output = builder.build(language).await?;
                let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
                println!("{}: {} ({:.1} MB)", language, output.display(), size as f64 / (1024.0 * 1024.0));
            }
        }
        Command::Website => {
            banner("Building Website with Disclaimers");
            let builder = WebsiteBuilder::new(config.clone(), storage.clone(), CATALOG, RenderContext::now());
            let report = builder.build().await?;
            println!(
                "\n{} pages, {} assets written to {}",
                report.pages,
                report.assets,
                config.website_folder.display()
            );
            println!("Open: {}", builder.index_file().display());
        }
    }

    Ok(())
}
