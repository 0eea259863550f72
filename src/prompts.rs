//! Instructions sent to the model with every document.
//!
//! Callers can override both via [`crate::config::ViewerConfig::system_prompt`]
//! and [`crate::config::ViewerConfig::user_prompt`]; the constants here are
//! used only when no override is provided.
//!
//! The header rule matters beyond cosmetics: the sidebar outline is built
//! from `#`, `##` and `###` lines only, so the prompt asks for exactly that
//! hierarchy.

/// Default system instruction.
pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert document converter and structural analyst.
Your task is to convert the provided document (PDF or Word) into clean, semantic Markdown.

Rules:
1. Preserve all headers (#, ##, ###).
2. Convert tables into Markdown tables.
3. Extract list items accurately.
4. Do not wrap the output in a markdown code block (e.g., no ```markdown). Return raw markdown text.
5. Ignore page numbers, headers, and footers that are repetitive.
6. If there are images, describe them briefly in italic text like *[Image: description]*.
7. Maintain the reading order strictly."#;

/// Default user instruction, sent alongside the document bytes.
pub const USER_INSTRUCTION: &str = "Convert this document into a comprehensive Markdown format. \
Ensure headers are correctly hierarchized for a Table of Contents.";
