//! Marketplace service: drives the connection state machine for one
//! marketplace gateway.

use std::fmt;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use revdash_domain::error::RevdashError;
use revdash_domain::marketplace::{Credentials, MarketplaceConnection};

use crate::ports::{MarketplaceGateway, StoreSession};

/// Default upper bound for a single gateway call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Raised when a gateway call outlives the configured timeout.
#[derive(Debug)]
pub struct GatewayTimeout {
    pub marketplace: String,
    pub operation: &'static str,
    pub after: Duration,
}

impl fmt::Display for GatewayTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} timed out after {:?}",
            self.marketplace, self.operation, self.after
        )
    }
}

impl std::error::Error for GatewayTimeout {}

struct State {
    connection: MarketplaceConnection,
    session: Option<StoreSession>,
}

/// Application service for a marketplace connection.
///
/// The connection record lives behind a mutex that is never held across an
/// `.await`; every method returns a snapshot of the record after the call.
pub struct MarketplaceService<G> {
    gateway: G,
    state: Mutex<State>,
    call_timeout: Duration,
}

impl<G: MarketplaceGateway> MarketplaceService<G> {
    /// Create a new service for `gateway`, starting disconnected.
    pub fn new(gateway: G) -> Self {
        let connection = MarketplaceConnection::disconnected(gateway.name());
        Self {
            gateway,
            state: Mutex::new(State {
                connection,
                session: None,
            }),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Current connection record.
    pub fn status(&self) -> MarketplaceConnection {
        self.lock().connection.clone()
    }

    /// Authenticate the seller. Does not open the data connection.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] for blank credentials (the gateway
    /// is not called), or the gateway's error.
    #[tracing::instrument(skip(self, credentials), fields(marketplace = self.gateway.name()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<StoreSession, RevdashError> {
        credentials.validate()?;
        let session = self.call("login", self.gateway.login(credentials)).await?;
        tracing::info!(store = %session.store_name, "seller logged in");
        self.lock().session = Some(session.clone());
        Ok(session)
    }

    /// End the seller session and drop back to disconnected.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error; local state is reset regardless.
    #[tracing::instrument(skip(self), fields(marketplace = self.gateway.name()))]
    pub async fn logout(&self) -> Result<(), RevdashError> {
        let result = self.call("logout", self.gateway.logout()).await;
        {
            let mut state = self.lock();
            state.session = None;
            state.connection.mark_disconnected();
        }
        result
    }

    /// Open the data connection. Connecting while connected is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error after moving the record to the error state.
    #[tracing::instrument(skip(self), fields(marketplace = self.gateway.name()))]
    pub async fn connect(&self) -> Result<MarketplaceConnection, RevdashError> {
        {
            let mut state = self.lock();
            if state.connection.is_connected() {
                return Ok(state.connection.clone());
            }
            state.connection.mark_connecting();
        }

        match self.call("connect", self.gateway.connect()).await {
            Ok(summary) => {
                let mut state = self.lock();
                let store_name = state.session.as_ref().map_or_else(
                    || self.gateway.name().to_string(),
                    |session| session.store_name.clone(),
                );
                state.connection.mark_connected(store_name, summary);
                tracing::info!(
                    products = summary.product_count,
                    reviews = summary.review_count,
                    "marketplace connected"
                );
                Ok(state.connection.clone())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Close the data connection and forget every store-derived figure.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error; local state is reset regardless.
    #[tracing::instrument(skip(self), fields(marketplace = self.gateway.name()))]
    pub async fn disconnect(&self) -> Result<MarketplaceConnection, RevdashError> {
        let result = self.call("disconnect", self.gateway.disconnect()).await;
        let connection = {
            let mut state = self.lock();
            state.connection.mark_disconnected();
            state.connection.clone()
        };
        result.map(|()| connection)
    }

    /// Probe the live connection.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] when not connected, or the
    /// gateway's error after moving the record to the error state.
    #[tracing::instrument(skip(self), fields(marketplace = self.gateway.name()))]
    pub async fn test_connection(&self) -> Result<bool, RevdashError> {
        self.lock().connection.ensure_connected()?;
        match self.call("test", self.gateway.test_connection()).await {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.lock()
                    .connection
                    .mark_failed("connection test reported unhealthy");
                Ok(false)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Pull fresh figures from the marketplace.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] when not connected, or the
    /// gateway's error after moving the record to the error state.
    #[tracing::instrument(skip(self), fields(marketplace = self.gateway.name()))]
    pub async fn sync(&self) -> Result<MarketplaceConnection, RevdashError> {
        self.lock().connection.ensure_connected()?;
        match self.call("sync", self.gateway.sync()).await {
            Ok(summary) => {
                let mut state = self.lock();
                state.connection.apply_sync(summary);
                Ok(state.connection.clone())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Forget the local connection record without calling the gateway.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.session = None;
        state.connection.mark_disconnected();
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, RevdashError>>,
    ) -> Result<T, RevdashError> {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(RevdashError::Integration(Box::new(GatewayTimeout {
                marketplace: self.gateway.name().to_string(),
                operation,
                after: self.call_timeout,
            }))),
        }
    }

    fn fail(&self, err: RevdashError) -> RevdashError {
        tracing::warn!(%err, "marketplace call failed");
        self.lock().connection.mark_failed(error_chain(&err));
        err
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use revdash_domain::error::ValidationError;
    use revdash_domain::marketplace::{ConnectionStatus, SyncSummary};
    use revdash_domain::time::now;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl std::error::Error for Refused {}

    #[derive(Default)]
    struct FakeGateway {
        connect_calls: AtomicUsize,
        refuse: AtomicBool,
        unhealthy: AtomicBool,
        hang: AtomicBool,
    }

    fn summary(reviews: u32) -> SyncSummary {
        SyncSummary {
            at: now(),
            product_count: 12,
            review_count: reviews,
        }
    }

    impl FakeGateway {
        fn outcome<T: Send>(&self, value: T) -> impl Future<Output = Result<T, RevdashError>> + Send {
            let refuse = self.refuse.load(Ordering::SeqCst);
            let hang = self.hang.load(Ordering::SeqCst);
            async move {
                if hang {
                    std::future::pending::<()>().await;
                }
                if refuse {
                    return Err(RevdashError::Integration(Box::new(Refused)));
                }
                Ok(value)
            }
        }
    }

    impl MarketplaceGateway for FakeGateway {
        fn name(&self) -> &str {
            "fakemarket"
        }

        fn login(
            &self,
            credentials: &Credentials,
        ) -> impl Future<Output = Result<StoreSession, RevdashError>> + Send {
            self.outcome(StoreSession {
                store_name: format!("{} store", credentials.seller_id),
            })
        }

        fn logout(&self) -> impl Future<Output = Result<(), RevdashError>> + Send {
            self.outcome(())
        }

        fn connect(&self) -> impl Future<Output = Result<SyncSummary, RevdashError>> + Send {
            self.connect_calls.fetch_add(1, Ordering::SeqCst);
            self.outcome(summary(100))
        }

        fn disconnect(&self) -> impl Future<Output = Result<(), RevdashError>> + Send {
            self.outcome(())
        }

        fn test_connection(&self) -> impl Future<Output = Result<bool, RevdashError>> + Send {
            self.outcome(!self.unhealthy.load(Ordering::SeqCst))
        }

        fn sync(&self) -> impl Future<Output = Result<SyncSummary, RevdashError>> + Send {
            self.outcome(summary(150))
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            seller_id: "acme".to_string(),
            api_token: "token".to_string(),
        }
    }

    #[tokio::test]
    async fn should_start_disconnected() {
        let svc = MarketplaceService::new(FakeGateway::default());
        let status = svc.status();
        assert_eq!(status.status, ConnectionStatus::Disconnected);
        assert_eq!(status.marketplace, "fakemarket");
        assert!(status.review_count.is_none());
    }

    #[tokio::test]
    async fn should_connect_with_store_name_from_login() {
        let svc = MarketplaceService::new(FakeGateway::default());
        svc.login(&credentials()).await.unwrap();

        let conn = svc.connect().await.unwrap();

        assert_eq!(conn.status, ConnectionStatus::Connected);
        assert_eq!(conn.store_name.as_deref(), Some("acme store"));
        assert_eq!(conn.review_count, Some(100));
        assert!(conn.last_sync.is_some());
    }

    #[tokio::test]
    async fn should_not_reconnect_when_already_connected() {
        let svc = MarketplaceService::new(FakeGateway::default());
        svc.connect().await.unwrap();
        svc.connect().await.unwrap();
        assert_eq!(svc.gateway.connect_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_reject_blank_credentials_before_calling_gateway() {
        let gateway = FakeGateway::default();
        gateway.refuse.store(true, Ordering::SeqCst);
        let svc = MarketplaceService::new(gateway);

        let result = svc
            .login(&Credentials {
                seller_id: String::new(),
                api_token: "token".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(RevdashError::Validation(ValidationError::EmptyCredentials))
        ));
    }

    #[tokio::test]
    async fn should_mark_error_when_connect_fails() {
        let gateway = FakeGateway::default();
        gateway.refuse.store(true, Ordering::SeqCst);
        let svc = MarketplaceService::new(gateway);

        let result = svc.connect().await;

        assert!(matches!(result, Err(RevdashError::Integration(_))));
        let status = svc.status();
        assert_eq!(status.status, ConnectionStatus::Error);
        assert!(
            status
                .last_error
                .as_deref()
                .is_some_and(|e| e.contains("connection refused"))
        );
    }

    #[tokio::test]
    async fn should_refuse_sync_and_test_while_disconnected() {
        let svc = MarketplaceService::new(FakeGateway::default());
        assert!(matches!(
            svc.sync().await,
            Err(RevdashError::Validation(ValidationError::NotConnected(_)))
        ));
        assert!(matches!(
            svc.test_connection().await,
            Err(RevdashError::Validation(ValidationError::NotConnected(_)))
        ));
    }

    #[tokio::test]
    async fn should_refresh_counters_on_sync() {
        let svc = MarketplaceService::new(FakeGateway::default());
        svc.connect().await.unwrap();
        let conn = svc.sync().await.unwrap();
        assert_eq!(conn.review_count, Some(150));
    }

    #[tokio::test]
    async fn should_mark_error_when_test_reports_unhealthy() {
        let svc = MarketplaceService::new(FakeGateway::default());
        svc.connect().await.unwrap();
        svc.gateway.unhealthy.store(true, Ordering::SeqCst);

        assert!(!svc.test_connection().await.unwrap());
        assert_eq!(svc.status().status, ConnectionStatus::Error);
    }

    #[tokio::test]
    async fn should_clear_counters_to_absence_on_disconnect() {
        let svc = MarketplaceService::new(FakeGateway::default());
        svc.connect().await.unwrap();

        let conn = svc.disconnect().await.unwrap();

        assert_eq!(conn, MarketplaceConnection::disconnected("fakemarket"));
    }

    #[tokio::test]
    async fn should_reset_locally() {
        let svc = MarketplaceService::new(FakeGateway::default());
        svc.login(&credentials()).await.unwrap();
        svc.connect().await.unwrap();

        svc.reset();

        assert_eq!(svc.status(), MarketplaceConnection::disconnected("fakemarket"));
        let conn = svc.connect().await.unwrap();
        assert_eq!(conn.store_name.as_deref(), Some("fakemarket"));
    }

    #[tokio::test]
    async fn should_time_out_hanging_calls() {
        let gateway = FakeGateway::default();
        gateway.hang.store(true, Ordering::SeqCst);
        let svc = MarketplaceService::new(gateway).with_timeout(Duration::from_millis(10));

        let result = svc.connect().await;

        assert!(matches!(result, Err(RevdashError::Integration(_))));
        assert!(
            svc.status()
                .last_error
                .is_some_and(|e| e.contains("timed out"))
        );
    }
}
