//! Stylesheets and HTML fragments shared by the PDF and website targets.
//! Text arguments are escaped by `maud`; arguments named `*_html` are
//! inserted as-is.

use crate::core::catalog::{ChapterSpec, Language};
use maud::{html, Markup, PreEscaped, DOCTYPE};

pub const PDF_CSS: &str = r#"
@import url('https://fonts.googleapis.com/css2?family=Noto+Sans+Arabic:wght@400;600;700&family=Inter:wght@400;500;600;700&display=swap');

@page {
    size: A4;
    margin: 2.5cm 2cm;
    @top-center {
        content: string(chapter-title);
        font-size: 10pt;
        color: #666666;
    }
    @bottom-center {
        content: counter(page);
        font-size: 10pt;
        color: #666666;
    }
}

@page :first {
    @top-center { content: none; }
}

* {
    box-sizing: border-box;
}

body {
    font-family: 'Inter', 'Noto Sans Arabic', sans-serif;
    font-size: 11pt;
    line-height: 1.8;
    color: #333333;
    background: #FFFFFF;
    text-align: justify;
}

body.rtl {
    direction: rtl;
    text-align: right;
    font-family: 'Noto Sans Arabic', 'Inter', sans-serif;
}

.cover {
    page-break-after: always;
    text-align: center;
    padding-top: 30%;
}

.cover h1 {
    font-size: 28pt;
    color: #1B5E20;
    margin-bottom: 0.5em;
    line-height: 1.3;
}

.cover .subtitle {
    font-size: 16pt;
    color: #666666;
    margin-bottom: 2em;
}

.cover .author {
    font-size: 14pt;
    color: #333333;
    margin-top: 3em;
}

.cover .year {
    font-size: 12pt;
    color: #666666;
    margin-top: 1em;
}

.toc {
    page-break-after: always;
}

.toc h2 {
    color: #1B5E20;
    border-bottom: 3px solid #4CAF50;
    padding-bottom: 0.5em;
}

.toc ul {
    list-style: none;
    padding: 0;
}

.toc li {
    padding: 0.5em 0;
    border-bottom: 1px solid #E0E0E0;
}

h1 {
    font-size: 24pt;
    color: #1B5E20;
    margin-top: 0;
    margin-bottom: 1em;
    padding-bottom: 0.5em;
    border-bottom: 4px solid #4CAF50;
    string-set: chapter-title content();
    page-break-before: always;
}

h1:first-of-type {
    page-break-before: avoid;
}

h2 {
    font-size: 16pt;
    color: #1B5E20;
    margin-top: 1.5em;
    margin-bottom: 0.8em;
    padding-bottom: 0.3em;
    border-bottom: 2px solid #81C784;
}

h3 {
    font-size: 13pt;
    color: #333333;
    margin-top: 1.2em;
    margin-bottom: 0.6em;
    font-weight: 600;
}

h4 {
    font-size: 11pt;
    color: #666666;
    margin-top: 1em;
    margin-bottom: 0.5em;
    font-weight: 600;
}

p {
    margin-bottom: 1em;
    orphans: 3;
    widows: 3;
}

ul, ol {
    margin-bottom: 1em;
    padding-left: 1.5em;
}

body.rtl ul, body.rtl ol {
    padding-left: 0;
    padding-right: 1.5em;
}

li {
    margin-bottom: 0.4em;
}

table {
    width: 100%;
    border-collapse: collapse;
    margin: 1.5em 0;
    font-size: 10pt;
}

th {
    background: #1B5E20;
    color: white;
    padding: 12px 10px;
    text-align: left;
    font-weight: 600;
}

body.rtl th {
    text-align: right;
}

td {
    padding: 10px;
    border-bottom: 1px solid #E0E0E0;
}

tr:nth-child(even) {
    background: #F9F9F9;
}

blockquote {
    margin: 1.5em 0;
    padding: 1em 1.5em;
    background: linear-gradient(135deg, #E8F5E9 0%, #F1F8E9 100%);
    border-left: 4px solid #4CAF50;
    border-radius: 0 8px 8px 0;
    font-style: italic;
    color: #333333;
}

body.rtl blockquote {
    border-left: none;
    border-right: 4px solid #4CAF50;
    border-radius: 8px 0 0 8px;
}

code {
    font-family: 'Courier New', monospace;
    background: #F5F5F5;
    padding: 2px 6px;
    border-radius: 4px;
    font-size: 0.9em;
}

pre {
    background: #F5F5F5;
    padding: 1em;
    border-radius: 8px;
    overflow-x: auto;
    border: 1px solid #E0E0E0;
}

pre code {
    background: none;
    padding: 0;
}

.figure {
    margin: 2em 0;
    text-align: center;
    page-break-inside: avoid;
}

.figure img {
    max-width: 100%;
    height: auto;
    border-radius: 8px;
    box-shadow: 0 4px 12px rgba(0,0,0,0.1);
}

.figure-caption {
    margin-top: 0.8em;
    font-size: 10pt;
    color: #666666;
    font-style: italic;
}

strong {
    color: #1B5E20;
    font-weight: 600;
}

a {
    color: #4CAF50;
    text-decoration: none;
}

hr {
    border: none;
    height: 2px;
    background: linear-gradient(90deg, #4CAF50, transparent);
    margin: 2em 0;
}

.chapter-cover {
    page-break-before: always;
    page-break-after: always;
    display: flex;
    flex-direction: column;
    justify-content: center;
    align-items: center;
    min-height: 80vh;
    text-align: center;
    background: linear-gradient(135deg, #E8F5E9 0%, #FFFFFF 50%, #E8F5E9 100%);
    padding: 3em;
}

.chapter-cover .chapter-number {
    font-size: 72pt;
    font-weight: 700;
    color: #4CAF50;
    opacity: 0.3;
    margin-bottom: 0.2em;
}

.chapter-cover .chapter-title {
    font-size: 28pt;
    font-weight: 700;
    color: #1B5E20;
    line-height: 1.3;
    max-width: 80%;
    margin: 0 auto;
}

.chapter-cover .chapter-subtitle {
    font-size: 14pt;
    color: #666666;
    margin-top: 1.5em;
    max-width: 70%;
}

.chapter-cover .chapter-decoration {
    width: 100px;
    height: 4px;
    background: linear-gradient(90deg, #4CAF50, #81C784);
    margin: 2em auto;
    border-radius: 2px;
}

li input[type="checkbox"] {
    margin-right: 0.5em;
}

body.rtl li input[type="checkbox"] {
    margin-right: 0;
    margin-left: 0.5em;
}
"#;

pub const WEBSITE_CSS: &str = r#"
:root {
    --primary: #1B5E20;
    --secondary: #4CAF50;
    --accent: #81C784;
    --text: #333333;
    --text-light: #666666;
    --bg: #FFFFFF;
    --bg-alt: #F5F5F5;
    --border: #E0E0E0;
}

* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Noto Sans Arabic', sans-serif;
    line-height: 1.8;
    color: var(--text);
    background: var(--bg);
}

.rtl {
    direction: rtl;
    text-align: right;
}

.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 2rem;
}

header {
    background: linear-gradient(135deg, var(--primary), var(--secondary));
    color: white;
    padding: 3rem 2rem;
    text-align: center;
}

header h1 {
    font-size: 2.5rem;
    margin-bottom: 0.5rem;
}

header p {
    opacity: 0.9;
    font-size: 1.2rem;
}

nav {
    background: var(--bg-alt);
    border-bottom: 1px solid var(--border);
    padding: 1rem;
    position: sticky;
    top: 0;
    z-index: 100;
}

nav ul {
    list-style: none;
    display: flex;
    flex-wrap: wrap;
    gap: 0.5rem;
    justify-content: center;
    max-width: 1200px;
    margin: 0 auto;
}

nav a {
    display: block;
    padding: 0.5rem 1rem;
    color: var(--text);
    text-decoration: none;
    border-radius: 4px;
    font-size: 0.9rem;
    transition: all 0.2s;
}

nav a:hover, nav a.active {
    background: var(--secondary);
    color: white;
}

.disclaimer {
    background: #FFF3E0;
    border: 2px solid #FF9800;
    border-radius: 8px;
    padding: 1.5rem;
    margin: 2rem 0;
}

.disclaimer h3 {
    color: #E65100;
    margin-bottom: 1rem;
}

.disclaimer ul {
    margin: 1rem 0 1rem 1.5rem;
}

.disclaimer.rtl ul {
    margin: 1rem 1.5rem 1rem 0;
}

.disclaimer li {
    margin-bottom: 0.5rem;
}

.disclaimer a {
    color: var(--primary);
}

.content {
    padding: 2rem 0;
}

.content h1 {
    color: var(--primary);
    font-size: 2rem;
    margin-bottom: 1.5rem;
    padding-bottom: 0.5rem;
    border-bottom: 3px solid var(--secondary);
}

.content h2 {
    color: var(--primary);
    font-size: 1.5rem;
    margin: 2rem 0 1rem;
    padding-bottom: 0.3rem;
    border-bottom: 2px solid var(--accent);
}

.content h3 {
    font-size: 1.2rem;
    margin: 1.5rem 0 0.8rem;
}

.content p {
    margin-bottom: 1rem;
}

.content ul, .content ol {
    margin: 1rem 0 1rem 2rem;
}

.rtl .content ul, .rtl .content ol {
    margin: 1rem 2rem 1rem 0;
}

.content li {
    margin-bottom: 0.5rem;
}

.content table {
    width: 100%;
    border-collapse: collapse;
    margin: 1.5rem 0;
}

.content th {
    background: var(--primary);
    color: white;
    padding: 0.8rem;
    text-align: left;
}

.rtl .content th {
    text-align: right;
}

.content td {
    padding: 0.8rem;
    border-bottom: 1px solid var(--border);
}

.content tr:nth-child(even) {
    background: var(--bg-alt);
}

.content blockquote {
    background: linear-gradient(135deg, #E8F5E9, #F1F8E9);
    border-left: 4px solid var(--secondary);
    padding: 1rem 1.5rem;
    margin: 1.5rem 0;
    border-radius: 0 8px 8px 0;
}

.rtl .content blockquote {
    border-left: none;
    border-right: 4px solid var(--secondary);
    border-radius: 8px 0 0 8px;
}

.content code {
    background: var(--bg-alt);
    padding: 2px 6px;
    border-radius: 4px;
    font-size: 0.9em;
}

.content pre {
    background: var(--bg-alt);
    padding: 1rem;
    border-radius: 8px;
    overflow-x: auto;
}

.content img {
    max-width: 100%;
    border-radius: 8px;
    margin: 1rem 0;
}

.figure {
    text-align: center;
    margin: 2rem 0;
}

.figure-caption {
    color: var(--text-light);
    font-style: italic;
    font-size: 0.9rem;
}

.lang-switch {
    text-align: center;
    padding: 1rem;
    background: var(--bg-alt);
}

.lang-switch a {
    display: inline-block;
    padding: 0.5rem 1.5rem;
    margin: 0 0.5rem;
    background: var(--secondary);
    color: white;
    text-decoration: none;
    border-radius: 4px;
}

.lang-switch a:hover {
    background: var(--primary);
}

footer {
    background: var(--text);
    color: white;
    padding: 2rem;
    text-align: center;
    margin-top: 3rem;
}

footer a {
    color: var(--accent);
}

@media (max-width: 768px) {
    header h1 {
        font-size: 1.8rem;
    }

    nav ul {
        flex-direction: column;
        align-items: center;
    }

    .container {
        padding: 1rem;
    }
}
"#;

pub fn site_title(lang: Language) -> &'static str {
    lang.pick("الدليل القانوني للتقنية في السعودية", "Saudi Tech Legal Guide")
}

pub fn site_subtitle(lang: Language) -> &'static str {
    lang.pick(
        "دليل عملي للأنظمة لشركات التقنية",
        "A practical guide to regulations for tech companies",
    )
}

fn toc_heading(lang: Language) -> &'static str {
    lang.pick("المحتويات", "Table of Contents")
}

/// Shell shared by the PDF document and the website pages.
pub fn document(
    lang: Language,
    title: Option<&str>,
    css: &str,
    html_class: Option<&str>,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang.code()) class=[html_class] {
            head {
                meta charset="UTF-8";
                @if let Some(title) = title {
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

pub fn cover(title: &str, subtitle: &str, author: &str, year: &str) -> Markup {
    html! {
        div.cover {
            h1 { (title) }
            p.subtitle { (subtitle) }
            p.author { (author) }
            p.year { (year) }
        }
    }
}

pub fn toc<'a>(lang: Language, titles_html: impl IntoIterator<Item = &'a str>) -> Markup {
    html! {
        div.toc {
            h2 { (toc_heading(lang)) }
            ul {
                @for title in titles_html {
                    li { (PreEscaped(title)) }
                }
            }
        }
    }
}

pub fn chapter_cover(number: &str, title_html: &str, subtitle: &str) -> Markup {
    html! {
        div.chapter-cover {
            div.chapter-number { (number) }
            div.chapter-decoration {}
            h1.chapter-title { (PreEscaped(title_html)) }
            p.chapter-subtitle { (subtitle) }
        }
    }
}

pub fn figure(src: &str, caption: &str) -> Markup {
    html! {
        div.figure {
            img src=(src) alt=(caption);
            p.figure-caption { (caption) }
        }
    }
}

/// Legal disclaimer shown above and below every website chapter.
pub fn disclaimer(lang: Language, date: &str) -> Markup {
    match lang {
        Language::Arabic => html! {
            div.disclaimer.rtl {
                h3 { "⚠️ إخلاء مسؤولية قانونية مهم" }
                p { strong { "هذا الدليل لأغراض المعلومات والتعليم فقط." } }
                ul {
                    li { "هذا المحتوى " strong { "لا يُشكّل" } " استشارة قانونية." }
                    li { "الأنظمة واللوائح تتغير باستمرار. تحقق دائماً من المتطلبات الحالية من المصادر الحكومية الرسمية." }
                    li { "استشر محامياً مؤهلاً قبل اتخاذ قرارات تجارية." }
                    li { "المؤلفون لا يتحملون أي مسؤولية عن الإجراءات المتخذة بناءً على هذه المعلومات." }
                    li { "آخر تحديث: " (date) }
                }
                p { strong { "المصادر الرسمية:" } }
                ul {
                    li { a href="https://laws.boe.gov.sa" target="_blank" { "هيئة الخبراء بمجلس الوزراء" } " - نصوص الأنظمة الرسمية" }
                    li { a href="https://misa.gov.sa" target="_blank" { "وزارة الاستثمار" } }
                    li { a href="https://mc.gov.sa" target="_blank" { "وزارة التجارة" } }
                    li { a href="https://sdaia.gov.sa" target="_blank" { "سدايا" } " - حماية البيانات" }
                    li { a href="https://nca.gov.sa" target="_blank" { "الهيئة الوطنية للأمن السيبراني" } }
                }
            }
        },
        Language::English => html! {
            div.disclaimer {
                h3 { "⚠️ Important Legal Disclaimer" }
                p { strong { "This guide is for informational and educational purposes only." } }
                ul {
                    li { "This content does " strong { "NOT" } " constitute legal advice." }
                    li { "Laws and regulations change frequently. Always verify current requirements with official government sources." }
                    li { "Consult a qualified legal professional before making business decisions." }
                    li { "The authors assume no liability for actions taken based on this information." }
                    li { "Last updated: " (date) }
                }
                p { strong { "Official Sources:" } }
                ul {
                    li { a href="https://laws.boe.gov.sa" target="_blank" { "Bureau of Experts (هيئة الخبراء)" } " - Official law texts" }
                    li { a href="https://misa.gov.sa" target="_blank" { "Ministry of Investment (MISA)" } }
                    li { a href="https://mc.gov.sa" target="_blank" { "Ministry of Commerce" } }
                    li { a href="https://sdaia.gov.sa" target="_blank" { "SDAIA" } " - Data Protection" }
                    li { a href="https://nca.gov.sa" target="_blank" { "NCA" } " - Cybersecurity" }
                }
            }
        },
    }
}

pub fn nav(lang: Language, catalog: &[ChapterSpec], current_id: &str) -> Markup {
    html! {
        nav {
            ul {
                @for chapter in catalog {
                    li {
                        a href={ (chapter.id) ".html" } class=[(chapter.id == current_id).then_some("active")] {
                            (chapter.nav_title(lang))
                        }
                    }
                }
            }
        }
    }
}

/// Header, language switch and navigation above a website chapter.
pub fn page_header(lang: Language, chapter_id: &str, nav: Markup) -> Markup {
    let other = lang.other();
    html! {
        header {
            h1 { (site_title(lang)) }
            p { (site_subtitle(lang)) }
        }
        div.lang-switch {
            a href={ "../" (other.code()) "/" (chapter_id) ".html" } { (other.native_name()) }
        }
        (nav)
    }
}

pub fn footer() -> Markup {
    html! {
        footer {
            p { "⚠️ This is an informational guide, not legal advice. Always consult official sources." }
            p { "هذا دليل معلوماتي وليس استشارة قانونية. راجع دائماً المصادر الرسمية." }
            p style="margin-top: 1rem;" {
                a href="https://laws.boe.gov.sa" { "هيئة الخبراء" }
                " | "
                a href="https://misa.gov.sa" { "MISA" }
                " | "
                a href="https://sdaia.gov.sa" { "SDAIA" }
                " | "
                a href="https://nca.gov.sa" { "NCA" }
            }
        }
    }
}

const INDEX_CSS: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    display: flex;
    justify-content: center;
    align-items: center;
    min-height: 100vh;
    margin: 0;
    background: linear-gradient(135deg, #1B5E20, #4CAF50);
}
.container {
    text-align: center;
    background: white;
    padding: 3rem;
    border-radius: 16px;
    box-shadow: 0 10px 40px rgba(0,0,0,0.2);
}
h1 { color: #1B5E20; margin-bottom: 0.5rem; }
h2 { color: #666; font-weight: normal; margin-bottom: 2rem; }
.buttons { display: flex; gap: 1rem; justify-content: center; flex-wrap: wrap; }
a {
    display: inline-block;
    padding: 1rem 2rem;
    background: #4CAF50;
    color: white;
    text-decoration: none;
    border-radius: 8px;
    font-size: 1.2rem;
    transition: transform 0.2s, background 0.2s;
}
a:hover { background: #1B5E20; transform: translateY(-2px); }
.disclaimer {
    margin-top: 2rem;
    padding: 1rem;
    background: #FFF3E0;
    border-radius: 8px;
    font-size: 0.9rem;
    color: #E65100;
}
"#;

/// Bilingual landing page linking to `first` in each language.
pub fn index(first: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Saudi Tech Legal Guide | الدليل القانوني للتقنية" }
                style { (PreEscaped(INDEX_CSS)) }
            }
            body {
                div.container {
                    h1 { "Saudi Tech Legal Guide" }
                    h2 { "الدليل القانوني للتقنية في السعودية" }
                    div.buttons {
                        a href={ "en/" (first) ".html" } { "English Guide" }
                        a href={ "ar/" (first) ".html" } { "الدليل بالعربية" }
                    }
                    div.disclaimer {
                        "⚠️ This guide is for informational purposes only and does not constitute legal advice."
                        br;
                        "هذا الدليل لأغراض المعلومات فقط ولا يشكل استشارة قانونية."
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CATALOG;

    #[test]
    fn test_disclaimer_carries_date() {
        let html = disclaimer(Language::English, "2026-01-15").into_string();
        assert!(html.contains("<li>Last updated: 2026-01-15</li>"));
        let html = disclaimer(Language::Arabic, "2026-01-15").into_string();
        assert!(html.contains("آخر تحديث: 2026-01-15"));
        assert!(html.contains(r#"class="disclaimer rtl""#));
    }

    #[test]
    fn test_nav_marks_active_chapter() {
        let html = nav(Language::English, CATALOG, "05_consent").into_string();
        assert!(html.contains(r#"<a href="05_consent.html" class="active">"#));
        assert_eq!(html.matches("class=\"active\"").count(), 1);
        assert_eq!(html.matches("<li>").count(), CATALOG.len());
    }

    #[test]
    fn test_fragments_escape_text() {
        let html = cover("R&D <Rules>", "", "", "").into_string();
        assert!(html.contains("<h1>R&amp;D &lt;Rules&gt;</h1>"));
        let html = figure("a\".png", "A & B").into_string();
        assert!(html.contains(r#"src="a&quot;.png""#));
        assert!(html.contains(r#"alt="A &amp; B""#));
    }

    #[test]
    fn test_title_slots_take_rendered_html() {
        let html = chapter_cover("1", "<strong>Bold</strong> Title", "").into_string();
        assert!(html.contains(r#"<h1 class="chapter-title"><strong>Bold</strong> Title</h1>"#));
        let html = toc(Language::English, ["<em>A</em>"]).into_string();
        assert!(html.contains("<li><em>A</em></li>"));
    }

    #[test]
    fn test_document_shell() {
        let doc = document(Language::Arabic, None, "a > b {}", None, Some("rtl"), html! { p { "x" } })
            .into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"<html lang="ar">"#));
        assert!(doc.contains("<style>a > b {}</style>"));
        assert!(doc.contains(r#"<body class="rtl"><p>x</p></body>"#));
        assert!(!doc.contains("<title>"));

        let index = index("00_introduction").into_string();
        assert!(index.contains(r#"<a href="en/00_introduction.html">English Guide</a>"#));
    }
}
