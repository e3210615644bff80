//! Minimal deferred-work handle returned from update handlers.
//!
//! A [`Task`] is a bag of futures, each resolving to exactly one follow-up
//! message. Update handlers never await; they describe the async work and
//! hand it back to whoever drives the loop.

use std::fmt;
use std::future::Future;

use futures::future::{self, BoxFuture, FutureExt};

pub struct Task<M> {
    futures: Vec<BoxFuture<'static, M>>,
}

impl<M: Send + 'static> Task<M> {
    /// A task that does nothing
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    /// Run `future` and map its output into a message
    pub fn perform<T, F, Map>(future: F, map: Map) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        Map: FnOnce(T) -> M + Send + 'static,
    {
        Self {
            futures: vec![future.map(map).boxed()],
        }
    }

    pub fn batch(tasks: impl IntoIterator<Item = Task<M>>) -> Self {
        Self {
            futures: tasks.into_iter().flat_map(|task| task.futures).collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_none()
    }

    pub fn into_futures(self) -> Vec<BoxFuture<'static, M>> {
        self.futures
    }

    /// Await every future concurrently and return the messages in task order
    pub async fn collect(self) -> Vec<M> {
        future::join_all(self.futures).await
    }
}

impl<M> fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("futures", &self.futures.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn batch_preserves_order() {
        let task = Task::batch([
            Task::perform(async { 1 }, |v| v),
            Task::none(),
            Task::perform(async { 20 }, |v| v + 1),
        ]);

        assert_eq!(task.len(), 2);
        assert_eq!(task.collect().await, vec![1, 21]);
    }

    #[test]
    fn none_is_empty() {
        let task: Task<()> = Task::none();
        assert!(task.is_none());
    }
}
