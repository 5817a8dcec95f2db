//! Comment template block: query, fetch, thread and render in one pass

use super::query::{build_query_vars, Commenter, QueryContext};
use super::render::{CommentListRenderer, CommentTemplate, DefaultCommentTemplate, RenderState};
use super::source::CommentSource;
use super::tree::CommentTree;
use crate::config::{Config, DiscussionSettings};
use crate::error::Result;
use tracing::{debug, warn};

/// State shared by every block rendered during one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    /// Alternation counters
    pub render: RenderState,
    /// Comment page published for pagination links
    pub current_page: Option<u32>,
}

/// Renders the comment list of a post from a comment source
pub struct CommentTemplateBlock<'a, S: ?Sized, T = DefaultCommentTemplate> {
    source: &'a S,
    settings: DiscussionSettings,
    renderer: CommentListRenderer<T>,
}

impl<'a, S> CommentTemplateBlock<'a, S, DefaultCommentTemplate>
where
    S: CommentSource + ?Sized,
{
    /// Create a block with the default template
    pub fn new(source: &'a S, config: &Config) -> Self {
        Self {
            source,
            settings: config.discussion.clone(),
            renderer: CommentListRenderer::from_config(&config.render, &config.discussion),
        }
    }
}

impl<'a, S, T> CommentTemplateBlock<'a, S, T>
where
    S: CommentSource + ?Sized,
    T: CommentTemplate,
{
    /// Create a block with a custom template
    pub fn with_renderer(
        source: &'a S,
        settings: DiscussionSettings,
        renderer: CommentListRenderer<T>,
    ) -> Self {
        Self {
            source,
            settings,
            renderer,
        }
    }

    /// Render the block.
    ///
    /// Publishes the default comment page into `request` and advances its
    /// counters. A failing query build or fetch is logged and renders the
    /// empty list.
    pub fn render(
        &self,
        context: &QueryContext,
        commenter: &Commenter,
        request: &mut RequestState,
    ) -> String {
        match self.try_render(context, commenter, request) {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to load comments: {}", e);
                self.renderer.empty()
            }
        }
    }

    /// Render the block, returning query and fetch failures
    pub fn try_render(
        &self,
        context: &QueryContext,
        commenter: &Commenter,
        request: &mut RequestState,
    ) -> Result<String> {
        let vars = build_query_vars(context, &self.settings, commenter, self.source)?;
        if let Some(page) = vars.current_page {
            request.current_page = Some(page);
        }

        let records = self.source.fetch(&vars.query)?;
        debug!("Fetched {} comments", records.len());

        let tree = CommentTree::build(records);
        Ok(self.renderer.render(&tree, &mut request.render))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{CommentBuilder, CommentQuery, CommentRecord};
    use crate::error::ThreadPrepError;
    use pretty_assertions::assert_eq;

    struct FailingSource;

    impl CommentSource for FailingSource {
        fn fetch(&self, _query: &CommentQuery) -> Result<Vec<CommentRecord>> {
            Err(ThreadPrepError::Storage("database unavailable".to_string()))
        }

        fn count_threads(&self, _query: &CommentQuery) -> Result<usize> {
            Err(ThreadPrepError::Storage("database unavailable".to_string()))
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.discussion.page_comments = true;
        config.discussion.comments_per_page = 5;
        config
    }

    fn record(id: u64, parent: u64) -> CommentRecord {
        CommentBuilder::reply(id, 1, parent)
            .author("Test")
            .email("test@example.org")
            .url("http://example.com/author-url/")
            .content("Hello world")
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_single_comment() {
        let store = vec![record(1, 0)];
        let block = CommentTemplateBlock::new(&store, &config());
        let mut request = RequestState::default();
        let html = block.render(
            &QueryContext::for_post(1),
            &Commenter::anonymous(),
            &mut request,
        );

        assert_eq!(
            html,
            "<ol class=\"wp-block-comment-template\"><li id=\"comment-1\" class=\"comment even thread-even depth-1\"><div class=\"wp-block-comment-author-name\"><a rel=\"external nofollow ugc\" href=\"http://example.com/author-url/\" target=\"_self\" >Test</a></div><div class=\"wp-block-comment-content\"><p>Hello world</p></div></li></ol>"
        );
        assert_eq!(request.current_page, Some(1));
    }

    #[test]
    fn test_counters_continue_across_blocks() {
        let store = vec![record(1, 0), record(2, 1)];
        let block = CommentTemplateBlock::new(&store, &config());
        let mut request = RequestState::default();
        let context = QueryContext::for_post(1);

        block.render(&context, &Commenter::anonymous(), &mut request);
        let html = block.render(&context, &Commenter::anonymous(), &mut request);
        assert!(html.contains("class=\"comment even thread-odd thread-alt depth-1\""));
        assert!(html.contains("class=\"comment odd alt depth-2\""));
        assert_eq!(request.render.comment_alt, 4);
    }

    #[test]
    fn test_requested_page_is_not_published() {
        let store = vec![record(1, 0)];
        let block = CommentTemplateBlock::new(&store, &config());
        let mut request = RequestState::default();
        block.render(
            &QueryContext::for_post(1).inheriting(Some(1)),
            &Commenter::anonymous(),
            &mut request,
        );
        assert!(request.current_page.is_none());
    }

    #[test]
    fn test_failed_source_renders_empty_list() {
        let block = CommentTemplateBlock::new(&FailingSource, &config());
        let mut request = RequestState::default();
        let html = block.render(
            &QueryContext::for_post(1),
            &Commenter::anonymous(),
            &mut request,
        );
        assert_eq!(html, "<ol class=\"wp-block-comment-template\"></ol>");
        assert!(request.current_page.is_none());
        assert_eq!(request.render, RenderState::default());

        let err = block
            .try_render(&QueryContext::for_post(1), &Commenter::anonymous(), &mut request)
            .unwrap_err();
        assert!(err.to_string().contains("database unavailable"));
    }
}
