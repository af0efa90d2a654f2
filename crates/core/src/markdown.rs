//! Markdown rendering for goal comments.
//!
//! Comments are stored as the raw markdown the user wrote. Rendering to HTML happens only on the
//! way out of a single-goal read, so stored content is never rendered twice.

use crate::goal::Goal;
use pulldown_cmark::{html, Options, Parser};

/// Converts markdown source to HTML.
pub trait MarkdownRenderer: Send + Sync {
    fn render_html(&self, source: &str) -> String;
}

/// Default renderer backed by `pulldown-cmark` with GitHub-style extensions.
#[derive(Debug, Clone)]
pub struct MarkdownService;

impl MarkdownService {
    /// Creates a new `MarkdownService` instance.
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }
}

impl Default for MarkdownService {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for MarkdownService {
    fn render_html(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, Self::options());
        let mut output = String::with_capacity(source.len() + source.len() / 2);
        html::push_html(&mut output, parser);
        output
    }
}

/// Returns `goal` with every comment's content replaced by its rendered HTML.
///
/// Takes the goal by value: the caller hands over a response copy, never the stored record.
pub(crate) fn render_comments(renderer: &dyn MarkdownRenderer, mut goal: Goal) -> Goal {
    for comment in &mut goal.comments {
        comment.content = renderer.render_html(&comment.content);
    }
    goal
}
