use std::pin::pin;

use futures::{future, TryStreamExt};
use octocrab::Page;
use serde::de::DeserializeOwned;

pub(crate) trait PageExt<I>
where
    I: DeserializeOwned + 'static,
{
    /// First item matching `pred` on this or any following page.
    ///
    /// Later pages are only requested while nothing matched. A failing page request
    /// is returned as an error.
    async fn find_first<F: Fn(&I) -> bool>(
        self,
        github: &octocrab::Octocrab,
        pred: F,
    ) -> octocrab::Result<Option<I>>;
}

impl<I> PageExt<I> for Page<I>
where
    I: DeserializeOwned + 'static,
{
    async fn find_first<F: Fn(&I) -> bool>(
        self,
        github: &octocrab::Octocrab,
        pred: F,
    ) -> octocrab::Result<Option<I>> {
        let items = pin!(self.into_stream(github));
        items
            .try_filter(|item| future::ready(pred(item)))
            .try_next()
            .await
    }
}
