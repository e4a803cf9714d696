use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Arabic, Language::English];

    pub fn code(self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Arabic => "Arabic",
            Language::English => "English",
        }
    }

    /// Name of the language written in that language, used by the language switch.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Arabic => "العربية",
            Language::English => "English",
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Language::Arabic
    }

    pub fn other(self) -> Language {
        match self {
            Language::Arabic => Language::English,
            Language::English => Language::Arabic,
        }
    }

    pub fn pick<T>(self, ar: T, en: T) -> T {
        match self {
            Language::Arabic => ar,
            Language::English => en,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the book's table of contents, in both languages.
#[derive(Debug, Clone, Copy)]
pub struct ChapterSpec {
    pub id: &'static str,
    pub title_ar: &'static str,
    pub title_en: &'static str,
    pub nav_ar: &'static str,
    pub nav_en: &'static str,
    pub subtitle_ar: &'static str,
    pub subtitle_en: &'static str,
    pub sections_ar: &'static [&'static str],
    pub sections_en: &'static [&'static str],
    pub reference: Option<&'static str>,
    pub word_target: u32,
}

impl ChapterSpec {
    pub fn title(&self, lang: Language) -> &'static str {
        lang.pick(self.title_ar, self.title_en)
    }

    pub fn nav_title(&self, lang: Language) -> &'static str {
        lang.pick(self.nav_ar, self.nav_en)
    }

    pub fn subtitle(&self, lang: Language) -> &'static str {
        lang.pick(self.subtitle_ar, self.subtitle_en)
    }

    pub fn sections(&self, lang: Language) -> &'static [&'static str] {
        lang.pick(self.sections_ar, self.sections_en)
    }

    pub fn reference(&self, lang: Language) -> &'static str {
        self.reference
            .unwrap_or_else(|| lang.pick("المصادر الرسمية السعودية", "Official Saudi Sources"))
    }
}

pub fn find(catalog: &[ChapterSpec], id: &str) -> Option<ChapterSpec> {
    catalog.iter().find(|c| c.id == id).copied()
}

/// Number shown on a chapter cover: empty for the introduction, the letter
/// for appendices, the chapter number otherwise.
pub fn chapter_number(id: &str) -> String {
    if id.starts_with("00") {
        return String::new();
    }
    if let Some(rest) = id.strip_prefix("appendix_") {
        return rest
            .split('_')
            .next()
            .unwrap_or_default()
            .to_uppercase();
    }
    id.split('_')
        .next()
        .and_then(|n| n.parse::<u32>().ok())
        .map(|n| n.to_string())
        .unwrap_or_default()
}

/// Illustration directory whose figures belong to a chapter.
pub fn illustration_dir(id: &str) -> Option<&'static str> {
    let dir = match id {
        // MISA and founding figures were planned together with company types
        "01_company_types" | "02_foreign_investors" | "03_founding_steps" => "ch01",
        "04_pdpl_basics" | "05_consent" => "ch02",
        "06_cross_border" | "07_pdpl_compliance" => "ch03",
        "08_pdpl_penalties" => "ch04",
        "09_cybersecurity_ecosystem" | "10_ecc_controls" => "ch05",
        "11_government_contracts" => "ch06",
        "12_compliance_advantage" => "ch07",
        "13_ai_landscape" | "14_ai_products" => "ch08",
        _ => return None,
    };
    Some(dir)
}

pub const CATALOG: &[ChapterSpec] = &[
    ChapterSpec {
        id: "00_introduction",
        title_ar: "المقدمة",
        title_en: "Introduction",
        nav_ar: "المقدمة",
        nav_en: "Introduction",
        subtitle_ar: "مقدمة الكتاب",
        subtitle_en: "Book Introduction",
        sections_ar: &[
            "لماذا هذا الكتاب الآن؟",
            "كيف تقرأ هذا الكتاب",
            "خريطة الأنظمة السعودية المتعلقة بالتقنية",
            "قصة واقعية: شركة خسرت عقداً حكومياً بسبب جهلها بالأنظمة",
        ],
        sections_en: &[
            "Why This Book Now?",
            "How to Read This Book",
            "Map of Saudi Tech-Related Regulations",
            "Real Story: A Company That Lost a Government Contract Due to Regulatory Ignorance",
        ],
        reference: None,
        word_target: 3000,
    },
    ChapterSpec {
        id: "01_company_types",
        title_ar: "الفصل الأول: أنواع الشركات - أيها تناسبك؟",
        title_en: "Chapter 1: Company Types - Which Suits You?",
        nav_ar: "أنواع الشركات",
        nav_en: "Company Types",
        subtitle_ar: "نظام الشركات السعودي",
        subtitle_en: "Saudi Companies Law",
        sections_ar: &[
            "الشركة ذات المسؤولية المحدودة (LLC)",
            "الشركة المساهمة المبسطة (SJS)",
            "شركة الشخص الواحد",
            "جدول مقارنة شامل",
        ],
        sections_en: &[
            "Limited Liability Company (LLC)",
            "Simplified Joint Stock Company (SJS)",
            "Single-Person Company",
            "Comprehensive Comparison Table",
        ],
        reference: Some("Saudi Companies Law 2023 / نظام الشركات السعودي الجديد (٢٠٢٣)"),
        word_target: 5000,
    },
    ChapterSpec {
        id: "02_foreign_investors",
        title_ar: "الفصل الثاني: الأجانب والسوق السعودي",
        title_en: "Chapter 2: Foreign Investors and the Saudi Market",
        nav_ar: "المستثمرون الأجانب",
        nav_en: "Foreign Investors",
        subtitle_ar: "الاستثمار الأجنبي",
        subtitle_en: "Foreign Investment",
        sections_ar: &[
            "الملكية الأجنبية ١٠٠٪ - متى تُسمح؟",
            "أنواع رخص الاستثمار (MISA)",
            "متطلبات التوطين (نطاقات)",
            "الشريك المحلي: متى تحتاجه ومتى لا تحتاجه؟",
            "دراسة حالة: شركة أجنبية تدخل السوق السعودي",
        ],
        sections_en: &[
            "100% Foreign Ownership - When Is It Allowed?",
            "Types of Investment Licenses (MISA)",
            "Saudization Requirements (Nitaqat)",
            "Local Partner: When Do You Need One?",
            "Case Study: A Foreign Company Entering the Saudi Market",
        ],
        reference: Some("Foreign Investment Law and Ministry of Investment"),
        word_target: 5000,
    },
    ChapterSpec {
        id: "03_founding_steps",
        title_ar: "الفصل الثالث: خطوات التأسيس العملية",
        title_en: "Chapter 3: Practical Founding Steps",
        nav_ar: "خطوات التأسيس",
        nav_en: "Founding Steps",
        subtitle_ar: "خطوات عملية",
        subtitle_en: "Practical Steps",
        sections_ar: &[
            "المنصات الإلكترونية المطلوبة",
            "المستندات المطلوبة (قائمة مراجعة)",
            "التكاليف المتوقعة",
            "الجدول الزمني الواقعي",
            "الأخطاء الشائعة وكيفية تجنبها",
        ],
        sections_en: &[
            "Required Electronic Platforms",
            "Required Documents (Checklist)",
            "Expected Costs",
            "Realistic Timeline",
            "Common Mistakes and How to Avoid Them",
        ],
        reference: Some("Ministry of Commerce and Saudi Business Center"),
        word_target: 4000,
    },
    ChapterSpec {
        id: "04_pdpl_basics",
        title_ar: "الفصل الرابع: فهم نظام حماية البيانات الشخصية - الأساسيات",
        title_en: "Chapter 4: Understanding PDPL - The Basics",
        nav_ar: "أساسيات حماية البيانات",
        nav_en: "PDPL Basics",
        subtitle_ar: "نظام حماية البيانات الشخصية",
        subtitle_en: "Personal Data Protection Law",
        sections_ar: &[
            "ما هي البيانات الشخصية؟ (تعريف عملي مع أمثلة)",
            "ما هي البيانات الحساسة؟ (القائمة الكاملة)",
            "من هي جهة التحكم؟",
            "الفرق بين المعالجة، النقل، الإفصاح، النشر",
            "على من يُطبق النظام؟ (النطاق الجغرافي)",
        ],
        sections_en: &[
            "What Is Personal Data? (Practical Definition with Examples)",
            "What Is Sensitive Data? (Complete List)",
            "Who Is a Data Controller?",
            "Difference Between Processing, Transfer, Disclosure, and Publication",
            "Who Does the Law Apply To? (Geographical Scope)",
        ],
        reference: Some("Personal Data Protection Law (PDPL) and Executive Regulations"),
        word_target: 4500,
    },
    ChapterSpec {
        id: "05_consent",
        title_ar: "الفصل الخامس: الموافقة والمسوغات القانونية",
        title_en: "Chapter 5: Consent and Legal Bases",
        nav_ar: "الموافقة",
        nav_en: "Consent",
        subtitle_ar: "الموافقة والحقوق",
        subtitle_en: "Consent and Rights",
        sections_ar: &[
            "متى تحتاج موافقة صريحة؟",
            "الحالات التي لا تحتاج فيها موافقة (٧ استثناءات)",
            "كيف تصيغ إشعار الخصوصية؟",
            "نموذج إشعار خصوصية لتطبيق تقني",
            "حقوق صاحب البيانات (الوصول، التصحيح، الحذف)",
        ],
        sections_en: &[
            "When Do You Need Explicit Consent?",
            "Cases Where Consent Is Not Required (7 Exceptions)",
            "How to Draft a Privacy Notice",
            "Privacy Notice Template for a Tech Application",
            "Data Subject Rights (Access, Rectification, Deletion)",
        ],
        reference: Some("PDPL Articles 5-10"),
        word_target: 4500,
    },
    ChapterSpec {
        id: "06_cross_border",
        title_ar: "الفصل السادس: نقل البيانات خارج المملكة",
        title_en: "Chapter 6: Cross-Border Data Transfer",
        nav_ar: "النقل عبر الحدود",
        nav_en: "Cross-Border Transfer",
        subtitle_ar: "نقل البيانات الدولي",
        subtitle_en: "International Data Transfer",
        sections_ar: &[
            "القاعدة الأساسية: الحظر",
            "الاستثناءات المسموحة (١٠ حالات)",
            "الضمانات المطلوبة للنقل",
            "الدول ذات الحماية الكافية",
            "حالة عملية: شركة SaaS تستخدم AWS",
            "الحلول: On-premise vs Cloud المحلي",
        ],
        sections_en: &[
            "The Default Rule: Prohibition",
            "Permitted Exceptions (10 Cases)",
            "Required Safeguards for Transfer",
            "Countries with Adequate Protection",
            "Practical Case: A SaaS Company Using AWS",
            "Solutions: On-Premise vs Local Cloud",
        ],
        reference: Some("PDPL Article 29"),
        word_target: 4500,
    },
    ChapterSpec {
        id: "07_pdpl_compliance",
        title_ar: "الفصل السابع: الامتثال العملي لشركات التقنية",
        title_en: "Chapter 7: Practical PDPL Compliance for Tech Companies",
        nav_ar: "الامتثال",
        nav_en: "PDPL Compliance",
        subtitle_ar: "الامتثال العملي",
        subtitle_en: "Practical Compliance",
        sections_ar: &[
            "تقييم أثر حماية البيانات (DPIA)",
            "تعيين مسؤول حماية البيانات - متى يجب؟",
            "التسجيل في بوابة سدايا",
            "إجراءات الإبلاغ عن الانتهاكات",
            "قائمة مراجعة الامتثال الكاملة",
        ],
        sections_en: &[
            "Data Protection Impact Assessment (DPIA)",
            "Appointing a Data Protection Officer - When Required?",
            "Registration on SDAIA Portal",
            "Breach Notification Procedures",
            "Complete Compliance Checklist",
        ],
        reference: Some("PDPL Executive Regulations"),
        word_target: 4500,
    },
    ChapterSpec {
        id: "08_pdpl_penalties",
        title_ar: "الفصل الثامن: العقوبات والمخاطر",
        title_en: "Chapter 8: Penalties and Risks",
        nav_ar: "العقوبات",
        nav_en: "Penalties",
        subtitle_ar: "المخاطر والعقوبات",
        subtitle_en: "Risks and Penalties",
        sections_ar: &[
            "العقوبات المالية (حتى ٥ ملايين ريال)",
            "العقوبات الجنائية (حتى سنتين سجن)",
            "الضرر السمعي",
            "كيف تتجنب المخالفات؟",
        ],
        sections_en: &[
            "Financial Penalties (Up to 5 Million SAR)",
            "Criminal Penalties (Up to 2 Years Imprisonment)",
            "Reputational Damage",
            "How to Avoid Violations",
        ],
        reference: Some("PDPL Chapter 6"),
        word_target: 3000,
    },
    ChapterSpec {
        id: "09_cybersecurity_ecosystem",
        title_ar: "الفصل التاسع: فهم منظومة الأمن السيبراني السعودية",
        title_en: "Chapter 9: Understanding the Saudi Cybersecurity Ecosystem",
        nav_ar: "الأمن السيبراني",
        nav_en: "Cybersecurity",
        subtitle_ar: "الهيئة الوطنية للأمن السيبراني",
        subtitle_en: "National Cybersecurity Authority",
        sections_ar: &[
            "الهيئة الوطنية للأمن السيبراني (NCA) - من هي؟",
            "خريطة الضوابط والمعايير (ECC, CCC, CSCC)",
            "من يجب عليه الالتزام؟",
            "العلاقة بين ECC و PDPL",
        ],
        sections_en: &[
            "The National Cybersecurity Authority (NCA) - Who Are They?",
            "Map of Controls and Standards (ECC, CCC, CSCC)",
            "Who Must Comply?",
            "The Relationship Between ECC and PDPL",
        ],
        reference: Some("Essential Cybersecurity Controls (ECC) - NCA"),
        word_target: 4000,
    },
    ChapterSpec {
        id: "10_ecc_controls",
        title_ar: "الفصل العاشر: الضوابط الأساسية - شرح عملي",
        title_en: "Chapter 10: Essential Controls - Practical Explanation",
        nav_ar: "الضوابط الأساسية",
        nav_en: "ECC Controls",
        subtitle_ar: "الضوابط الأساسية",
        subtitle_en: "Essential Controls",
        sections_ar: &[
            "حوكمة الأمن السيبراني",
            "إدارة الأصول",
            "إدارة الهويات والصلاحيات",
            "حماية التطبيقات",
            "إدارة التشفير",
            "النسخ الاحتياطي والتعافي",
            "إدارة الثغرات",
            "الاستجابة للحوادث",
            "قائمة مراجعة ECC المبسطة",
        ],
        sections_en: &[
            "Cybersecurity Governance",
            "Asset Management",
            "Identity and Access Management",
            "Application Protection",
            "Cryptography Management",
            "Backup and Recovery",
            "Vulnerability Management",
            "Incident Response",
            "Simplified ECC Checklist",
        ],
        reference: Some("ECC 2024 - NCA"),
        word_target: 5500,
    },
    ChapterSpec {
        id: "11_government_contracts",
        title_ar: "الفصل الحادي عشر: الفوز بالعقود الحكومية",
        title_en: "Chapter 11: Winning Government Contracts",
        nav_ar: "العقود الحكومية",
        nav_en: "Government Contracts",
        subtitle_ar: "منصة اعتماد",
        subtitle_en: "Etimad Platform",
        sections_ar: &[
            "منصة اعتماد (Etimad) - كيف تعمل؟",
            "أنواع المنافسات",
            "المتطلبات الفنية الشائعة",
            "كيف تقرأ كراسة الشروط؟",
            "تسعير خدمات التقنية للحكومة",
            "الأخطاء القاتلة في العروض",
            "دراسة حالة: عرض فائز لمشروع AI حكومي",
        ],
        sections_en: &[
            "Etimad Platform - How Does It Work?",
            "Types of Competitions",
            "Common Technical Requirements",
            "How to Read Tender Documents",
            "Pricing Tech Services for Government",
            "Fatal Mistakes in Proposals",
            "Case Study: A Winning AI Government Project Proposal",
        ],
        reference: Some("Government Tenders and Procurement Law and Etimad Platform"),
        word_target: 5500,
    },
    ChapterSpec {
        id: "12_compliance_advantage",
        title_ar: "الفصل الثاني عشر: تحويل الامتثال إلى ميزة تنافسية",
        title_en: "Chapter 12: Turning Compliance into Competitive Advantage",
        nav_ar: "ميزة الامتثال",
        nav_en: "Compliance Advantage",
        subtitle_ar: "الميزة التنافسية",
        subtitle_en: "Competitive Advantage",
        sections_ar: &[
            "شهادات الامتثال المعترف بها",
            "كيف تسوّق امتثالك؟",
            "بناء الثقة مع العملاء الحكوميين",
            "الامتثال كخدمة (Compliance as a Service)",
        ],
        sections_en: &[
            "Recognized Compliance Certifications",
            "How to Market Your Compliance",
            "Building Trust with Government Clients",
            "Compliance as a Service",
        ],
        reference: Some("Best Practices in the Saudi Market"),
        word_target: 3000,
    },
    ChapterSpec {
        id: "13_ai_landscape",
        title_ar: "الفصل الثالث عشر: المشهد التنظيمي للذكاء الاصطناعي",
        title_en: "Chapter 13: The AI Regulatory Landscape",
        nav_ar: "تنظيم الذكاء الاصطناعي",
        nav_en: "AI Regulations",
        subtitle_ar: "سدايا والذكاء الاصطناعي",
        subtitle_en: "SDAIA and AI",
        sections_ar: &[
            "سدايا: من هي وماذا تفعل؟",
            "الاستراتيجية الوطنية للبيانات والذكاء الاصطناعي",
            "مبادئ أخلاقيات الذكاء الاصطناعي",
            "متطلبات الشفافية والمساءلة",
        ],
        sections_en: &[
            "SDAIA: Who Are They and What Do They Do?",
            "National Data and AI Strategy",
            "AI Ethics Principles",
            "Transparency and Accountability Requirements",
        ],
        reference: Some("AI Ethics Principles - SDAIA"),
        word_target: 4000,
    },
    ChapterSpec {
        id: "14_ai_products",
        title_ar: "الفصل الرابع عشر: بناء منتجات AI متوافقة",
        title_en: "Chapter 14: Building Compliant AI Products",
        nav_ar: "منتجات الذكاء الاصطناعي",
        nav_en: "AI Products",
        subtitle_ar: "بناء منتجات متوافقة",
        subtitle_en: "Building Compliant Products",
        sections_ar: &[
            "التحيز الخوارزمي - كيف تتجنبه؟",
            "قابلية التفسير (Explainability)",
            "حوكمة نماذج الـ LLM",
            "استخدام البيانات السعودية في التدريب",
            "دراسة حالة: Chatbot حكومي متوافق",
        ],
        sections_en: &[
            "Algorithmic Bias - How to Avoid It",
            "Explainability",
            "LLM Governance",
            "Using Saudi Data for Training",
            "Case Study: A Compliant Government Chatbot",
        ],
        reference: Some("AI Ethics Principles - SDAIA"),
        word_target: 4000,
    },
    ChapterSpec {
        id: "appendix_a_checklists",
        title_ar: "ملحق أ: قوائم المراجعة",
        title_en: "Appendix A: Checklists",
        nav_ar: "قوائم المراجعة",
        nav_en: "Checklists",
        subtitle_ar: "قوائم المراجعة",
        subtitle_en: "Checklists",
        sections_ar: &[
            "قائمة مراجعة تأسيس الشركة",
            "قائمة مراجعة الامتثال لـ PDPL",
            "قائمة مراجعة ECC للشركات الصغيرة",
            "قائمة مراجعة التقدم لمنافسة حكومية",
        ],
        sections_en: &[
            "Company Formation Checklist",
            "PDPL Compliance Checklist",
            "ECC Checklist for Small Businesses",
            "Government Tender Submission Checklist",
        ],
        reference: None,
        word_target: 2500,
    },
    ChapterSpec {
        id: "appendix_b_templates",
        title_ar: "ملحق ب: النماذج الجاهزة",
        title_en: "Appendix B: Ready Templates",
        nav_ar: "النماذج",
        nav_en: "Templates",
        subtitle_ar: "النماذج الجاهزة",
        subtitle_en: "Ready Templates",
        sections_ar: &[
            "نموذج إشعار الخصوصية (عربي/إنجليزي)",
            "نموذج سياسة حماية البيانات الداخلية",
            "نموذج اتفاقية معالجة البيانات (DPA)",
            "نموذج تقييم أثر حماية البيانات (DPIA)",
            "نموذج الإبلاغ عن انتهاك بيانات",
        ],
        sections_en: &[
            "Privacy Notice Template (Arabic/English)",
            "Internal Data Protection Policy Template",
            "Data Processing Agreement (DPA) Template",
            "Data Protection Impact Assessment (DPIA) Template",
            "Data Breach Notification Template",
        ],
        reference: None,
        word_target: 3500,
    },
    ChapterSpec {
        id: "appendix_c_resources",
        title_ar: "ملحق ج: الروابط والمصادر",
        title_en: "Appendix C: Links and Resources",
        nav_ar: "المصادر",
        nav_en: "Resources",
        subtitle_ar: "المصادر والروابط",
        subtitle_en: "Resources and Links",
        sections_ar: &[
            "روابط جميع الأنظمة واللوائح",
            "المنصات الحكومية الرسمية",
            "جهات الاتصال المهمة",
            "مصادر للتعلم المستمر",
        ],
        sections_en: &[
            "Links to All Laws and Regulations",
            "Official Government Platforms",
            "Important Contacts",
            "Resources for Continuous Learning",
        ],
        reference: None,
        word_target: 1500,
    },
    ChapterSpec {
        id: "appendix_d_glossary",
        title_ar: "ملحق د: المصطلحات",
        title_en: "Appendix D: Glossary",
        nav_ar: "المصطلحات",
        nav_en: "Glossary",
        subtitle_ar: "المصطلحات",
        subtitle_en: "Glossary",
        sections_ar: &[
            "قاموس المصطلحات القانونية والتقنية (عربي-إنجليزي)",
            "الاختصارات الشائعة",
        ],
        sections_en: &[
            "Legal and Technical Terms Dictionary (Arabic-English)",
            "Common Abbreviations",
        ],
        reference: None,
        word_target: 2000,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<&str> = CATALOG.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 19);
    }

    #[test]
    fn test_sections_exist_in_both_languages() {
        for chapter in CATALOG {
            assert_eq!(
                chapter.sections_ar.len(),
                chapter.sections_en.len(),
                "section count mismatch for {}",
                chapter.id
            );
            assert!(!chapter.sections_en.is_empty());
        }
    }

    #[test]
    fn test_chapter_number() {
        assert_eq!(chapter_number("00_introduction"), "");
        assert_eq!(chapter_number("01_company_types"), "1");
        assert_eq!(chapter_number("14_ai_products"), "14");
        assert_eq!(chapter_number("appendix_c_resources"), "C");
    }

    #[test]
    fn test_reference_fallback() {
        let intro = find(CATALOG, "00_introduction").unwrap();
        assert_eq!(intro.reference(Language::English), "Official Saudi Sources");
        let consent = find(CATALOG, "05_consent").unwrap();
        assert_eq!(consent.reference(Language::Arabic), "PDPL Articles 5-10");
    }

    #[test]
    fn test_illustration_dir_mapping() {
        assert_eq!(illustration_dir("02_foreign_investors"), Some("ch01"));
        assert_eq!(illustration_dir("14_ai_products"), Some("ch08"));
        assert_eq!(illustration_dir("00_introduction"), None);
        assert_eq!(illustration_dir("appendix_a_checklists"), None);
    }
}
