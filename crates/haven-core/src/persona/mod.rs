//! Built-in persona catalog and prompt templates.
//!
//! The catalog is fixed for the process lifetime: three support personas,
//! all on the same Claude model. Users select a persona; nothing mutates
//! one. Prompt templates are canned conversation starters in English and
//! Persian; submitting one is identical to typing its text.

use haven_types::persona::{Language, Persona, PromptTemplate};

const DEFAULT_MODEL: &str = "anthropic.claude-3-5-sonnet-20241022-v2:0";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_CONTEXT_WINDOW: u32 = 200_000;

/// Read-only registry of the built-in personas.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
}

impl PersonaCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        let persona = |name: &str, system_prompt: &str| Persona {
            name: name.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: system_prompt.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            context_window: DEFAULT_CONTEXT_WINDOW,
        };

        Self {
            personas: vec![
                persona(
                    "Trauma Support Counselor",
                    "You are a compassionate trauma counselor specializing in supporting \
                     individuals affected by regime violence and peaceful protest suppression. \
                     Provide empathetic, professional psychological support.",
                ),
                persona(
                    "Crisis Intervention Specialist",
                    "You are a crisis intervention specialist trained in acute trauma response \
                     for victims of state violence. Focus on immediate emotional stabilization \
                     and safety.",
                ),
                persona(
                    "PTSD Support Guide",
                    "You are a PTSD specialist helping individuals cope with post-traumatic \
                     stress from political violence and suppression. Provide evidence-based \
                     coping strategies.",
                ),
            ],
        }
    }

    /// Look a persona up by its display name.
    pub fn get(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name == name)
    }

    /// All personas, in display order.
    pub fn all(&self) -> &[Persona] {
        &self.personas
    }
}

/// Canned starter prompts for the given language.
pub fn prompt_templates(language: Language) -> Vec<PromptTemplate> {
    let entries: &[(&str, &str)] = match language {
        Language::En => &[
            (
                "Initial Assessment",
                "I've experienced trauma from recent events and need someone to talk to. \
                 Can you help me understand what I'm feeling?",
            ),
            (
                "Coping Strategies",
                "I'm struggling with anxiety and flashbacks. What coping techniques can \
                 help me manage these symptoms?",
            ),
            (
                "Safety Planning",
                "I'm concerned about my safety and mental wellbeing. Can you help me \
                 create a safety plan?",
            ),
            (
                "Grief Processing",
                "I've lost someone due to the violence. How can I process this grief \
                 while staying safe?",
            ),
            (
                "Community Support",
                "I feel isolated and alone. How can I find support while protecting \
                 myself?",
            ),
        ],
        Language::Fa => &[
            (
                "ارزیابی اولیه",
                "من از رویدادهای اخیر آسیب روحی دیده‌ام و نیاز به صحبت کردن دارم. می‌توانید به من کمک کنید احساساتم را درک کنم؟",
            ),
            (
                "راهکارهای مقابله",
                "من با اضطراب و فلش‌بک دست و پنجه نرم می‌کنم. چه تکنیک‌هایی می‌تواند به من در مدیریت این علائم کمک کند؟",
            ),
            (
                "برنامه‌ریزی امنیتی",
                "من نگران امنیت و سلامت روانی خودم هستم. می‌توانید به من در ایجاد یک برنامه امنیتی کمک کنید؟",
            ),
            (
                "پردازش غم و اندوه",
                "من عزیزی را به خاطر خشونت از دست داده‌ام. چگونه می‌توانم این غم را پردازش کنم و در عین حال امن بمانم؟",
            ),
            (
                "حمایت اجتماعی",
                "احساس انزوا و تنهایی می‌کنم. چگونه می‌توانم حمایت پیدا کنم و در عین حال از خودم محافظت کنم؟",
            ),
        ],
    };

    entries
        .iter()
        .map(|(title, text)| PromptTemplate {
            title: title.to_string(),
            text: text.to_string(),
        })
        .collect()
}
