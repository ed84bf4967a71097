//! Attribute source descriptors and the fetch seam
//!
//! An [`AttributeSource`] couples a stable identifier with a fetch operation
//! and a [`Formatter`]. The fetch operation sits behind the [`AttributeFetch`]
//! trait so production probes and test fakes plug in the same way.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::errors::SourceError;
use super::formatting::Formatter;
use super::raw::RawValue;

/// Outcome of one fetch: a value, an explicitly absent value, or an error
pub type FetchResult = Result<Option<RawValue>, SourceError>;

/// Supplies the raw value of one attribute
#[async_trait]
pub trait AttributeFetch: Send + Sync {
    /// Fetches the current raw value
    ///
    /// `Ok(None)` means the platform has no value for this attribute, which
    /// is displayed with the formatter's fallback but is not a failure.
    async fn fetch(&self) -> FetchResult;
}

/// Fetch backed by a cheap synchronous function, run inline on the task
struct SyncFetch<F> {
    probe: F,
}

#[async_trait]
impl<F> AttributeFetch for SyncFetch<F>
where
    F: Fn() -> FetchResult + Send + Sync + 'static,
{
    async fn fetch(&self) -> FetchResult {
        (self.probe)()
    }
}

/// Fetch backed by a synchronous function that may block, run on the
/// blocking thread pool
struct BlockingFetch<F> {
    probe: Arc<F>,
}

#[async_trait]
impl<F> AttributeFetch for BlockingFetch<F>
where
    F: Fn() -> FetchResult + Send + Sync + 'static,
{
    async fn fetch(&self) -> FetchResult {
        let probe = Arc::clone(&self.probe);
        tokio::task::spawn_blocking(move || probe()).await?
    }
}

/// Fetch backed by a closure returning a future
struct AsyncFetch<F> {
    probe: F,
}

#[async_trait]
impl<F, Fut> AttributeFetch for AsyncFetch<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    async fn fetch(&self) -> FetchResult {
        (self.probe)().await
    }
}

/// Declarative descriptor of one cataloged attribute
///
/// Cloning is cheap; the fetch implementation is shared.
#[derive(Clone)]
pub struct AttributeSource {
    id: String,
    fetcher: Arc<dyn AttributeFetch>,
    formatter: Formatter,
}

impl AttributeSource {
    /// Creates a source from any [`AttributeFetch`] implementation
    pub fn new(
        id: impl Into<String>,
        formatter: Formatter,
        fetcher: Arc<dyn AttributeFetch>,
    ) -> Self {
        Self {
            id: id.into(),
            fetcher,
            formatter,
        }
    }

    /// Source whose value is computed by a cheap, non-blocking function
    pub fn from_sync<F>(id: impl Into<String>, formatter: Formatter, probe: F) -> Self
    where
        F: Fn() -> FetchResult + Send + Sync + 'static,
    {
        Self::new(id, formatter, Arc::new(SyncFetch { probe }))
    }

    /// Source whose value comes from a function that may block on the OS
    pub fn from_blocking<F>(id: impl Into<String>, formatter: Formatter, probe: F) -> Self
    where
        F: Fn() -> FetchResult + Send + Sync + 'static,
    {
        Self::new(
            id,
            formatter,
            Arc::new(BlockingFetch {
                probe: Arc::new(probe),
            }),
        )
    }

    /// Source whose value is produced asynchronously
    pub fn from_async<F, Fut>(id: impl Into<String>, formatter: Formatter, probe: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FetchResult> + Send + 'static,
    {
        Self::new(id, formatter, Arc::new(AsyncFetch { probe }))
    }

    /// Source with a value known at construction time
    pub fn constant(id: impl Into<String>, formatter: Formatter, value: RawValue) -> Self {
        Self::from_sync(id, formatter, move || Ok(Some(value.clone())))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Shared handle to the fetch implementation
    pub fn fetcher(&self) -> Arc<dyn AttributeFetch> {
        Arc::clone(&self.fetcher)
    }

    /// Replaces the fallback text of this source's formatter
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.formatter = self.formatter.with_fallback(fallback);
        self
    }
}

impl fmt::Debug for AttributeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSource")
            .field("id", &self.id)
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_sync_and_constant_sources() {
        let model = AttributeSource::constant("Model", Formatter::identity(), "Pixel 8".into());
        let value = tokio_test::block_on(model.fetcher().fetch());
        assert_eq!(assert_ok!(value), Some(RawValue::from("Pixel 8")));

        let carrier = AttributeSource::from_sync("Carrier", Formatter::identity(), || {
            Err(SourceError::query("no SIM"))
        });
        let value = tokio_test::block_on(carrier.fetcher().fetch());
        assert_err!(value);
    }

    #[tokio::test]
    async fn test_blocking_source_runs_on_blocking_pool() {
        let source = AttributeSource::from_blocking("CpuCount", Formatter::identity(), || {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(Some(RawValue::from(8usize)))
        });

        let value = source.fetcher().fetch().await;
        assert_eq!(assert_ok!(value), Some(RawValue::Number(8.0)));
    }

    #[tokio::test]
    async fn test_blocking_source_panic_becomes_task_error() {
        let source = AttributeSource::from_blocking("Broken", Formatter::identity(), || {
            panic!("probe exploded")
        });

        let error = source.fetcher().fetch().await.unwrap_err();
        assert!(matches!(error, SourceError::Task(_)));
    }

    #[tokio::test]
    async fn test_async_source_and_fallback_override() {
        let source = AttributeSource::from_async("Battery", Formatter::percent(), || async {
            Ok(Some(RawValue::Number(0.5)))
        })
        .with_fallback("unknown");

        assert_eq!(source.id(), "Battery");
        assert_eq!(source.formatter().fallback(), "unknown");
        let value = source.fetcher().fetch().await;
        assert_eq!(assert_ok!(value), Some(RawValue::Number(0.5)));
        assert!(format!("{:?}", source).contains("Battery"));
    }
}
