//! Premium entitlement resolution.

use std::sync::Arc;

use crate::ports::PurchaseRecords;

/// Entitlement identifier checked when none is configured.
pub const DEFAULT_PREMIUM_ENTITLEMENT: &str = "premium";

/// Answers "does this user have premium right now?".
///
/// Read-through with no caching. Lookup failures are indistinguishable from
/// "no entitlement" to callers: both resolve to `false`.
#[derive(Clone)]
pub struct EntitlementResolver {
    records: Arc<dyn PurchaseRecords>,
    entitlement: String,
}

impl EntitlementResolver {
    pub fn new(records: Arc<dyn PurchaseRecords>) -> Self {
        Self::with_entitlement(records, DEFAULT_PREMIUM_ENTITLEMENT)
    }

    pub fn with_entitlement(records: Arc<dyn PurchaseRecords>, entitlement: impl Into<String>) -> Self {
        Self {
            records,
            entitlement: entitlement.into(),
        }
    }

    pub fn entitlement(&self) -> &str {
        &self.entitlement
    }

    /// Never fails; an unresolvable lookup yields `false`.
    pub async fn has_premium(&self, user_id: &str) -> bool {
        match self
            .records
            .has_entitlement(user_id, &self.entitlement)
            .await
        {
            Ok(held) => held,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    entitlement = %self.entitlement,
                    error = %e,
                    "Entitlement lookup failed; treating user as not premium"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProviderError;
    use crate::ports::purchases::MockPurchaseRecords;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_held_entitlement() {
        let mut records = MockPurchaseRecords::new();
        records
            .expect_has_entitlement()
            .with(eq("u1"), eq("premium"))
            .times(1)
            .returning(|_, _| Ok(true));

        let resolver = EntitlementResolver::new(Arc::new(records));
        assert!(resolver.has_premium("u1").await);
    }

    #[tokio::test]
    async fn test_custom_entitlement_id_is_queried() {
        let mut records = MockPurchaseRecords::new();
        records
            .expect_has_entitlement()
            .with(eq("u1"), eq("pro"))
            .returning(|_, _| Ok(false));

        let resolver = EntitlementResolver::with_entitlement(Arc::new(records), "pro");
        assert_eq!(resolver.entitlement(), "pro");
        assert!(!resolver.has_premium("u1").await);
    }

    #[tokio::test]
    async fn test_lookup_failure_resolves_to_false() {
        let mut records = MockPurchaseRecords::new();
        records.expect_has_entitlement().returning(|_, _| {
            Err(ProviderError::Unavailable {
                provider: "purchases",
                message: "timeout".to_string(),
            })
        });

        let resolver = EntitlementResolver::new(Arc::new(records));
        assert!(!resolver.has_premium("u1").await);
    }
}
