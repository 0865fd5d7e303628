//! 离线应答器：所有提供者都不可用时的确定性兜底。
//!
//! Offline responder.
//!
//! Chat messages are classified by keyword (first matching category wins, in the order
//! coding → platform → question → greeting, otherwise default) and answered from a fixed
//! pool for that category. Content requests (outline, lesson, ...) get a fixed Markdown
//! template filled with the topic. Nothing here performs I/O or can fail.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::types::{ContentKind, ContentRequest};

/// Chooses an index in `0..len` for pool selection.
///
/// `len` is never zero when called by [`OfflineResponder`]. Results outside the range
/// are reduced modulo `len`.
pub trait IndexSelector: Send + Sync + fmt::Debug {
    fn select(&self, len: usize) -> usize;
}

/// Uniform selection from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSelector;

impl IndexSelector for ThreadRngSelector {
    fn select(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Uniform selection from a seeded RNG; the same seed yields the same sequence.
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IndexSelector for SeededSelector {
    fn select(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..len)
    }
}

/// Always the same index.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl IndexSelector for FixedSelector {
    fn select(&self, _len: usize) -> usize {
        self.0
    }
}

/// Keyword category of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Coding,
    Platform,
    Question,
    Greeting,
    Default,
}

const CODING_KEYWORDS: &[&str] = &[
    "my code", "source code", "coding", "debug", "bug", "error", "function", "compile",
    "syntax", "variable", "exception", "stack trace", "refactor", "algorithm", "program",
];

const PLATFORM_KEYWORDS: &[&str] = &[
    "vscode", "vs code", "visual studio", "extension", "editor", "command palette", "terminal",
    "workspace", "keybinding", "shortcut",
];

const QUESTION_KEYWORDS: &[&str] = &[
    "?", "how", "what", "why", "when", "where", "which", "explain", "can you", "could you",
];

const GREETING_KEYWORDS: &[&str] = &[
    "hello", "hey", "greetings", "good morning", "good afternoon", "good evening",
];

// Priority order matters: the first category with a matching keyword wins.
const CLASSIFIERS: &[(Category, &[&str])] = &[
    (Category::Coding, CODING_KEYWORDS),
    (Category::Platform, PLATFORM_KEYWORDS),
    (Category::Question, QUESTION_KEYWORDS),
    (Category::Greeting, GREETING_KEYWORDS),
];

const CODING_RESPONSES: &[&str] = &[
    "Debugging works best in small steps: reproduce the problem with the smallest input you can, then add logging or a breakpoint just before the point where things go wrong.",
    "When code misbehaves, read the whole error message and stack trace first. The topmost frame in your own code is usually the best place to start looking.",
    "Try explaining the failing function line by line, out loud or in a comment. Rubber-duck debugging surfaces wrong assumptions surprisingly often.",
    "Write a tiny test that reproduces the bug before fixing it. When it passes you know the fix works, and the test keeps the bug from coming back.",
];

const PLATFORM_RESPONSES: &[&str] = &[
    "Most editor features are one search away in the command palette (Ctrl+Shift+P, or Cmd+Shift+P on macOS). Start typing what you want to do.",
    "Extensions add language support, linters and debuggers. Open the extension's settings after installing it, since useful options are often off by default.",
    "The integrated terminal starts in your workspace folder, so build and test commands run there without changing directories.",
];

const QUESTION_RESPONSES: &[&str] = &[
    "Good question. I can't reach a language model right now, but splitting the question into smaller parts and checking the official documentation for each one is a reliable way forward.",
    "I'm working offline at the moment. Ask again once a provider is configured, or generate an outline for the topic to get a structured starting point.",
    "That's worth exploring. A quick experiment in a scratch file often answers \"how does this behave\" questions faster than reading about it.",
];

const GREETING_RESPONSES: &[&str] = &[
    "Hello! I'm your learning assistant. Ask me a question, or generate a lesson, quiz or exercise on any topic.",
    "Hi there! What would you like to learn today?",
    "Hey! Pick a topic and I can put together an outline, a lesson or a quick quiz.",
];

const DEFAULT_RESPONSES: &[&str] = &[
    "I'm running in offline mode, so my answers are limited. Set OPENAI_API_KEY or ANTHROPIC_API_KEY, or start a local model server, to get full responses.",
    "I couldn't reach any AI provider just now. You can still generate structured templates for outlines, lessons, exercises, quizzes and summaries.",
    "Noted. Tell me the topic you're working on and which material would help most: an outline, a lesson, an exercise, a quiz or a summary.",
];

/// Deterministic last-resort responder.
#[derive(Debug, Clone)]
pub struct OfflineResponder {
    selector: Arc<dyn IndexSelector>,
}

impl Default for OfflineResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl OfflineResponder {
    pub fn new() -> Self {
        Self::with_selector(Arc::new(ThreadRngSelector))
    }

    pub fn with_selector(selector: Arc<dyn IndexSelector>) -> Self {
        Self { selector }
    }

    pub fn classify(message: &str) -> Category {
        let lowered = message.to_lowercase();
        CLASSIFIERS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Default)
    }

    pub fn pool(category: Category) -> &'static [&'static str] {
        match category {
            Category::Coding => CODING_RESPONSES,
            Category::Platform => PLATFORM_RESPONSES,
            Category::Question => QUESTION_RESPONSES,
            Category::Greeting => GREETING_RESPONSES,
            Category::Default => DEFAULT_RESPONSES,
        }
    }

    /// Every canned chat response, across all pools.
    pub fn catalog() -> impl Iterator<Item = &'static str> {
        [
            CODING_RESPONSES,
            PLATFORM_RESPONSES,
            QUESTION_RESPONSES,
            GREETING_RESPONSES,
            DEFAULT_RESPONSES,
        ]
        .into_iter()
        .flatten()
        .copied()
    }

    /// Answer a raw chat message from the pool of its category.
    pub fn respond(&self, message: &str) -> String {
        let pool = Self::pool(Self::classify(message));
        let idx = self.selector.select(pool.len()) % pool.len();
        pool[idx].to_string()
    }

    /// Answer a request: chat goes through the keyword pools, everything else gets a template.
    pub fn respond_to(&self, request: &ContentRequest) -> String {
        match request.kind {
            ContentKind::Chat => self.respond(&request.message),
            kind => render_template(kind, request),
        }
    }
}

fn render_template(kind: ContentKind, request: &ContentRequest) -> String {
    let topic = match request.topic.trim() {
        "" => "Untitled topic",
        t => t,
    };
    let background = request.domain().unwrap_or("programming");
    let note = "_Offline template. Configure an AI provider for content tailored to this topic._";

    match kind {
        ContentKind::Outline => format!(
            "# {topic}: Course Outline\n\n{note}\n\n\
             ## Module 1: Foundations\n- What {topic} is and where it fits\n- Core terminology\n- Setting up a working environment\n\n\
             ## Module 2: Core Concepts\n- The central ideas behind {topic}\n- How the pieces fit together\n- A first small example\n\n\
             ## Module 3: Hands-on Practice\n- Guided walkthrough\n- Independent exercise\n- Reviewing the solution\n\n\
             ## Module 4: Patterns and Pitfalls\n- Idiomatic usage\n- Common mistakes and how to spot them\n\n\
             ## Module 5: Next Steps\n- Further reading\n- Project ideas\n\n\
             ## Prerequisites\n- Working knowledge of {background}\n"
        ),
        ContentKind::Lesson => format!(
            "# Lesson: {topic}\n\n{note}\n\n\
             ## Learning Objectives\n- Explain what {topic} is\n- Apply {topic} in a small example\n- Recognise when to use it\n\n\
             ## Explanation\nDescribe the core idea of {topic} in the context of {background}.\n\n\
             ## Worked Example\n```\n// Example for {topic}\n```\n\n\
             ## Recap\n- Summarise the key idea in one sentence\n- Note one common mistake\n"
        ),
        ContentKind::Exercise => format!(
            "# Exercise: {topic}\n\n{note}\n\n\
             ## Problem\nBuild a small program in {background} that uses {topic}.\n\n\
             ## Starter Code\n```\n// Your code here\n```\n\n\
             ## Hints\n1. Start with the simplest case\n2. Add one feature at a time\n3. Test after every step\n\n\
             ## Solution\nCompare your approach with the documentation for {topic}.\n"
        ),
        ContentKind::Quiz => {
            let mut out = format!("# Quiz: {topic}\n\n{note}\n\n");
            for n in 1..=5 {
                out.push_str(&format!(
                    "## Question {n}\nWhich statement about {topic} is correct?\n- A) ...\n- B) ...\n- C) ...\n- D) ...\n\n"
                ));
            }
            out.push_str("## Answer Key\n1. _\n2. _\n3. _\n4. _\n5. _\n");
            out
        }
        ContentKind::Summary => format!(
            "# Summary: {topic}\n\n{note}\n\n\
             ## Key Concepts\n- What {topic} is\n- Why it matters in {background}\n\n\
             ## Common Pitfalls\n- Skipping the fundamentals\n- Copying examples without understanding them\n\n\
             ## Next Steps\n- Work through an exercise on {topic}\n- Take a short quiz to check understanding\n"
        ),
        // Chat is answered from the keyword pools, never from a template.
        ContentKind::Chat => OfflineResponder::pool(Category::Default)[0].to_string(),
    }
}
