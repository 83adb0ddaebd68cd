//! Recursive crawl task
//!
//! One task handles one URL. It checks its budget, claims the URL, loads the
//! page, merges the page's words into the shared totals, then spawns one child
//! per outbound link and waits for all of them. The crawl deadline is only
//! checked when a task starts; a page load already in progress is allowed to
//! finish under its own timeout.

use crate::crawler::state::CrawlState;
use crate::page::PageParser;
use crate::pattern::PatternSet;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Everything a crawl's tasks share
pub(crate) struct CrawlContext {
    pub parser: Arc<dyn PageParser>,
    pub ignored_urls: Arc<PatternSet>,
    /// Absolute time after which no new page load may start
    pub deadline: Instant,
    pub state: CrawlState,
}

/// A unit of work for a single URL
pub(crate) struct CrawlTask {
    url: String,
    remaining_depth: u32,
    context: Arc<CrawlContext>,
}

impl CrawlTask {
    pub(crate) fn new(url: String, remaining_depth: u32, context: Arc<CrawlContext>) -> Self {
        Self {
            url,
            remaining_depth,
            context,
        }
    }

    /// Runs this task and, transitively, every task it spawns
    pub(crate) fn run(self) -> BoxFuture<'static, ()> {
        Box::pin(self.execute())
    }

    async fn execute(self) {
        let context = Arc::clone(&self.context);

        if self.remaining_depth == 0 || Instant::now() >= context.deadline {
            tracing::trace!("Budget exhausted at {}", self.url);
            return;
        }

        if context.ignored_urls.matches(&self.url) {
            tracing::trace!("Ignoring {}", self.url);
            return;
        }

        if !context.state.try_claim(&self.url) {
            tracing::trace!("Already visited {}", self.url);
            return;
        }

        let page = match context.parser.parse(&self.url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!("Failed to load {}: {}", self.url, e);
                return;
            }
        };

        context.state.add_counts(&page.word_counts);

        tracing::debug!(
            "Visited {} ({} words, {} links, depth budget {})",
            self.url,
            page.word_counts.len(),
            page.links.len(),
            self.remaining_depth
        );

        let mut children = JoinSet::new();
        for link in page.links {
            let child = CrawlTask::new(link, self.remaining_depth - 1, Arc::clone(&context));
            children.spawn(child.run());
        }

        while let Some(joined) = children.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Crawl task below {} failed: {}", self.url, e);
            }
        }
    }
}
