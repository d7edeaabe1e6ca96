//! Element resolver with fallback chain orchestration

use async_trait::async_trait;
use page_adapter::{NodeId, PageDocument};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{errors::LocatorError, strategies::*, types::*};

/// Element resolver trait
#[async_trait]
pub trait ElementResolver: Send + Sync {
    /// Resolve element with fallback chain
    async fn resolve(
        &self,
        document: &dyn PageDocument,
        hint: &LocatorHint,
        context: &ResolveContext,
    ) -> Result<Resolution, LocatorError>;

    /// Try to resolve with specific strategy
    async fn resolve_with_strategy(
        &self,
        document: &dyn PageDocument,
        hint: &LocatorHint,
        context: &ResolveContext,
        strategy: LocatorStrategy,
    ) -> Result<Option<NodeId>, LocatorError>;
}

/// Default element resolver implementation
///
/// Walks the chain in order and returns the first strategy's match. Strategy errors are logged
/// and skipped; only an exhausted chain fails.
pub struct DefaultElementResolver {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl Default for DefaultElementResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultElementResolver {
    /// Create a new resolver with all strategies
    pub fn new() -> Self {
        Self::with_strategies(
            LocatorStrategy::fallback_chain()
                .into_iter()
                .map(strategy_for)
                .collect(),
        )
    }

    pub fn with_strategies(strategies: Vec<Arc<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    fn get_strategy(&self, strategy_type: LocatorStrategy) -> Option<&Arc<dyn Strategy>> {
        self.strategies
            .iter()
            .find(|strategy| strategy.strategy_type() == strategy_type)
    }
}

#[async_trait]
impl ElementResolver for DefaultElementResolver {
    async fn resolve(
        &self,
        document: &dyn PageDocument,
        hint: &LocatorHint,
        context: &ResolveContext,
    ) -> Result<Resolution, LocatorError> {
        debug!(hint = %hint, purpose = ?context.purpose, "resolving element");

        // One view per resolution keeps every strategy on the same snapshot.
        let view = document.dom_view().await?;
        let request = LocateRequest {
            hint,
            context,
            document,
            view: &view,
        };

        for strategy in &self.strategies {
            match strategy.locate(&request).await {
                Ok(Some(node)) => {
                    info!(
                        hint = %hint,
                        strategy = strategy.name(),
                        node = %node,
                        "resolved element"
                    );
                    return Ok(Resolution {
                        node,
                        strategy: strategy.strategy_type(),
                    });
                }
                Ok(None) => {
                    debug!("Strategy {} returned no match", strategy.name());
                }
                Err(e) => {
                    warn!("Strategy {} failed: {}", strategy.name(), e);
                }
            }
        }

        Err(LocatorError::ElementNotFound(format!(
            "All strategies exhausted for hint: {hint}"
        )))
    }

    async fn resolve_with_strategy(
        &self,
        document: &dyn PageDocument,
        hint: &LocatorHint,
        context: &ResolveContext,
        strategy_type: LocatorStrategy,
    ) -> Result<Option<NodeId>, LocatorError> {
        let strategy = self
            .get_strategy(strategy_type)
            .ok_or_else(|| LocatorError::StrategyFailed {
                strategy: strategy_type.name().to_string(),
                reason: "strategy not configured".to_string(),
            })?;
        let view = document.dom_view().await?;
        let request = LocateRequest {
            hint,
            context,
            document,
            view: &view,
        };
        strategy.locate(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_adapter::HtmlPage;

    #[tokio::test]
    async fn test_exhausted_chain_reports_hint() {
        let page = HtmlPage::parse("<body><p>nothing here</p></body>");
        let resolver = DefaultElementResolver::new();
        let err = resolver
            .resolve(
                &page,
                &LocatorHint::query("#missing"),
                &ResolveContext::default(),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("#missing"));
    }

    #[tokio::test]
    async fn test_resolve_with_single_strategy() {
        let page = HtmlPage::parse(r#"<body><input id="q" placeholder="Search"></body>"#);
        let resolver = DefaultElementResolver::new();
        let hint = LocatorHint::query("Search");
        let found = resolver
            .resolve_with_strategy(
                &page,
                &hint,
                &ResolveContext::default(),
                LocatorStrategy::Placeholder,
            )
            .await
            .unwrap();
        assert!(found.is_some());

        let skipped = resolver
            .resolve_with_strategy(
                &page,
                &hint,
                &ResolveContext::default(),
                LocatorStrategy::ElementId,
            )
            .await
            .unwrap();
        assert!(skipped.is_none());
    }

    #[test]
    fn test_unconfigured_strategy_is_an_error() {
        let page = HtmlPage::parse("<body></body>");
        let resolver = DefaultElementResolver::with_strategies(vec![strategy_for(
            LocatorStrategy::Selector,
        )]);
        let result = tokio_test::block_on(resolver.resolve_with_strategy(
            &page,
            &LocatorHint::query("x"),
            &ResolveContext::default(),
            LocatorStrategy::LabelText,
        ));
        assert!(matches!(result, Err(LocatorError::StrategyFailed { .. })));
    }
}
