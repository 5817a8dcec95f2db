//! Comment list markup

use super::model::{CommentNode, CommentRecord, CommentStatus};
use super::tree::CommentTree;
use crate::config::{DiscussionSettings, RenderConfig};
use std::fmt::Write;

/// Alternation counters shared by every comment list of one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Comments classed so far
    pub comment_alt: u32,
    /// Threads classed so far
    pub thread_alt: u32,
}

impl RenderState {
    /// Classes for the next comment, advancing the counters.
    ///
    /// Order: comment type, `byuser`, `odd alt`/`even`, thread classes for
    /// top-level comments, then `depth-N`.
    pub fn next_classes(&mut self, node: &CommentNode) -> String {
        let mut classes = vec![node.comment.kind.css_class()];
        if node.comment.user_id.is_some() {
            classes.push("byuser");
        }

        if self.comment_alt % 2 == 1 {
            classes.push("odd alt");
        } else {
            classes.push("even");
        }
        self.comment_alt += 1;

        if node.depth == 1 {
            if self.thread_alt % 2 == 1 {
                classes.push("thread-odd thread-alt");
            } else {
                classes.push("thread-even");
            }
            self.thread_alt += 1;
        }

        let mut out = classes.join(" ");
        let _ = write!(out, " depth-{}", node.depth);
        out
    }
}

/// Markup for the body of a single comment
pub trait CommentTemplate {
    /// Render everything inside the comment's `<li>`, replies excluded
    fn render(&self, comment: &CommentRecord) -> String;
}

/// Author name followed by the comment content
#[derive(Debug, Clone)]
pub struct DefaultCommentTemplate {
    link_target: String,
}

impl DefaultCommentTemplate {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            link_target: config.link_target.clone(),
        }
    }

    fn author_name(&self, comment: &CommentRecord) -> String {
        let name = escape_html(&comment.author);
        let inner = match comment.author_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => format!(
                "<a rel=\"external nofollow ugc\" href=\"{}\" target=\"{}\" >{}</a>",
                escape_html(url),
                escape_html(&self.link_target),
                name
            ),
            None => name,
        };
        format!("<div class=\"wp-block-comment-author-name\">{}</div>", inner)
    }

    fn content(&self, comment: &CommentRecord) -> String {
        let notice = if comment.status == CommentStatus::Hold {
            "<p><em class=\"comment-awaiting-moderation\">Your comment is awaiting moderation.</em></p>"
        } else {
            ""
        };
        format!(
            "<div class=\"wp-block-comment-content\">{}{}</div>",
            notice,
            autop(&comment.content)
        )
    }
}

impl Default for DefaultCommentTemplate {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl CommentTemplate for DefaultCommentTemplate {
    fn render(&self, comment: &CommentRecord) -> String {
        let mut out = self.author_name(comment);
        out.push_str(&self.content(comment));
        out
    }
}

/// Renders a comment tree as nested ordered lists
#[derive(Debug, Clone)]
pub struct CommentListRenderer<T = DefaultCommentTemplate> {
    list_class: String,
    thread_comments: bool,
    template: T,
}

impl CommentListRenderer<DefaultCommentTemplate> {
    /// Renderer with the default template
    pub fn from_config(render: &RenderConfig, discussion: &DiscussionSettings) -> Self {
        Self::new(render, discussion, DefaultCommentTemplate::new(render))
    }
}

impl<T: CommentTemplate> CommentListRenderer<T> {
    pub fn new(render: &RenderConfig, discussion: &DiscussionSettings, template: T) -> Self {
        Self {
            list_class: render.list_class.clone(),
            thread_comments: discussion.thread_comments,
            template,
        }
    }

    /// Empty list markup
    pub fn empty(&self) -> String {
        format!("<ol class=\"{}\"></ol>", escape_html(&self.list_class))
    }

    /// Render every thread in pre-order.
    ///
    /// Replies are nested in their own `<ol>` unless threading is disabled,
    /// in which case only top-level comments are emitted.
    pub fn render(&self, tree: &CommentTree, state: &mut RenderState) -> String {
        let mut out = format!("<ol class=\"{}\">", escape_html(&self.list_class));
        let mut pending: Vec<Step<'_>> = tree.roots().iter().rev().map(Step::Open).collect();

        while let Some(step) = pending.pop() {
            match step {
                Step::Close(markup) => out.push_str(markup),
                Step::Open(node) => {
                    let classes = state.next_classes(node);
                    let _ = write!(
                        out,
                        "<li id=\"comment-{}\" class=\"{}\">",
                        node.id(),
                        classes
                    );
                    out.push_str(&self.template.render(&node.comment));

                    if self.thread_comments && node.has_children() {
                        out.push_str("<ol>");
                        pending.push(Step::Close("</ol></li>"));
                        pending.extend(node.children.iter().rev().map(Step::Open));
                    } else {
                        out.push_str("</li>");
                    }
                }
            }
        }

        out.push_str("</ol>");
        out
    }
}

/// Pending work while walking the tree
enum Step<'a> {
    Open(&'a CommentNode),
    Close(&'static str),
}

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Wrap blank-line separated blocks in paragraphs, single newlines become `<br />`
pub fn autop(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            let lines: Vec<&str> = block.lines().map(str::trim_end).collect();
            format!("<p>{}</p>", lines.join("<br />\n"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
