use crate::domain::{DimensionFilter, MetricIdentity};
use crate::error::AppResult;
use crate::provider::{ListMetricsRequest, MetricsProvider};

/// Pages through the provider's metric listing.
pub struct MetricCatalogFetcher<'provider> {
    provider: &'provider dyn MetricsProvider,
}

impl<'provider> MetricCatalogFetcher<'provider> {
    #[must_use]
    pub const fn new(provider: &'provider dyn MetricsProvider) -> Self {
        Self { provider }
    }

    /// Returns every metric matching the filters, in listing order.
    ///
    /// An empty or absent namespace lists all namespaces. The loop follows
    /// `next_token` until a page comes back without one.
    ///
    /// # Errors
    ///
    /// Propagates the first failing page; no partial catalog is returned.
    pub async fn fetch(
        &self,
        namespace: Option<&str>,
        dimensions: &[DimensionFilter],
    ) -> AppResult<Vec<MetricIdentity>> {
        let namespace = namespace.filter(|value| !value.is_empty());
        let mut catalog = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let request = ListMetricsRequest {
                namespace,
                dimensions,
                next_token: next_token.as_deref(),
            };
            let page = self.provider.list_metrics(request).await?;
            pages = pages.saturating_add(1);
            tracing::debug!(
                "ListMetrics page {} returned {} metric(s)",
                pages,
                page.metrics.len()
            );
            catalog.extend(page.metrics);

            match page.next_token.filter(|token| !token.is_empty()) {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        tracing::info!(
            "Discovered {} metric(s) in {} page(s)",
            catalog.len(),
            pages
        );
        Ok(catalog)
    }
}
