//! Resilient HTTP client for the finance tracker API.
//!
//! Every call goes through one state machine:
//!
//! - the stored access token is attached as a bearer token;
//! - an authentication failure triggers a single shared token refresh
//!   (concurrent callers wait for the same refresh) and one replay;
//! - rate limiting (429) and server errors (5xx) are retried on the
//!   [`RetryPolicy`] schedule;
//! - anything else surfaces at once as an [`ApiError`].
//!
//! When a refresh fails the stored credentials are wiped and
//! [`SessionEvent::Expired`] is published; navigation is left to the
//! caller.

mod classify;
mod refresh;
mod retry;
mod session;
mod wire;

use core::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use url::Url;

use crate::error::{ApiError, ApiResult, ErrorCode, FinTrackError};
use crate::models::{
    ApiEnvelope, AuthSession, BalanceSummary, BudgetComparison, LoginRequest, MonthlyTrends,
    NaiveDate, NewTransaction, RegisterRequest, SavingsProgressReport, SpendingByCategory,
    Transaction, TransactionId, TransactionPage, TransactionQuery, TransactionUpdate,
};
use crate::storage::{CredentialKey, CredentialStore};
use classify::{Attempt, classify, network_error};
use refresh::{RefreshGate, Role, follow};
use session::RefreshRequest;
use wire::{TransactionDetail, TransactionList};

pub use retry::RetryPolicy;
pub use session::SessionEvent;

/// Default API base URL (local development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Default timeout of ordinary requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout of the token refresh call.
const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Buffered session events per subscriber.
const EVENT_CAPACITY: usize = 16;

/// Prefix of the authentication endpoints, served from the auth base URL.
const AUTH_PREFIX: &str = "/auth/";

/// Format of date query parameters.
const DATE_FORMAT: &str = "%Y-%m-%d";

// ── Endpoint paths ──────────────────────────────────────────────────

/// Transaction collection.
const TRANSACTIONS_PATH: &str = "/api/v1/transactions";
/// Balance summary.
const SUMMARY_PATH: &str = "/api/v1/statistics/summary";
/// Budget versus actual.
const BUDGET_COMPARISON_PATH: &str = "/api/v1/statistics/budget-comparison";
/// Expense share per category.
const SPENDING_PATH: &str = "/api/v1/statistics/spending-by-category";
/// Monthly income and expense series.
const MONTHLY_TRENDS_PATH: &str = "/api/v1/statistics/monthly-trends";
/// Savings goal progress.
const SAVINGS_PROGRESS_PATH: &str = "/api/v1/statistics/savings-progress";
/// Sign in.
const LOGIN_PATH: &str = "/auth/login";
/// Sign up.
const REGISTER_PATH: &str = "/auth/register";
/// Sign out.
const LOGOUT_PATH: &str = "/auth/logout";
/// Token refresh.
const REFRESH_PATH: &str = "/auth/refresh";

// ── Builder ─────────────────────────────────────────────────────────

/// Builder for constructing an [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder<S> {
    /// Base URL override.
    base_url: Option<String>,
    /// Auth base URL override; defaults to the base URL.
    auth_base_url: Option<String>,
    /// Timeout of ordinary requests.
    timeout: Duration,
    /// Timeout of the refresh call.
    refresh_timeout: Duration,
    /// Retry schedule override.
    retry: Option<RetryPolicy>,
    /// Where tokens live.
    store: Option<S>,
}

impl<S: CredentialStore> ApiClientBuilder<S> {
    /// Sets the API base URL (useful for testing with a mock server).
    #[inline]
    #[must_use]
    pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the base URL of the `/auth/*` endpoints when they are served
    /// from a different host.
    #[inline]
    #[must_use]
    pub fn auth_base_url<T: Into<String>>(mut self, url: T) -> Self {
        self.auth_base_url = Some(url.into());
        self
    }

    /// Sets the timeout of ordinary requests.
    #[inline]
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout of the token refresh call.
    #[inline]
    #[must_use]
    pub const fn refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Replaces the retry schedule.
    #[inline]
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Sets the credential store holding the session tokens.
    #[inline]
    #[must_use]
    pub fn credential_store(mut self, store: S) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`FinTrackError::InvalidConfig`] if no credential store was
    /// provided, a base URL does not parse, or the HTTP client fails to
    /// build.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub fn build(self) -> crate::error::Result<ApiClient<S>> {
        let store = self
            .store
            .ok_or_else(|| FinTrackError::InvalidConfig("no credential store configured".to_owned()))?;
        let base_url = normalize_base(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let auth_base_url = match self.auth_base_url.as_deref() {
            Some(url) => normalize_base(url)?,
            None => base_url.clone(),
        };
        tracing::debug!(base_url = %base_url, auth_base_url = %auth_base_url, "building client");

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| FinTrackError::InvalidConfig(err.to_string()))?;
        let (events, _receiver) = broadcast::channel(EVENT_CAPACITY);

        Ok(ApiClient {
            http,
            base_url,
            auth_base_url,
            refresh_timeout: self.refresh_timeout,
            retry: self.retry.unwrap_or_default(),
            store,
            gate: RefreshGate::default(),
            events,
        })
    }
}

/// Validates a base URL and strips its trailing slashes.
fn normalize_base(url: &str) -> crate::error::Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let _parsed = Url::parse(trimmed)
        .map_err(|err| FinTrackError::InvalidConfig(format!("invalid base url `{trimmed}`: {err}")))?;
    Ok(trimmed.to_owned())
}

// ── Request description ─────────────────────────────────────────────

/// One logical API call, replayable across attempts.
#[derive(Debug)]
struct Call {
    /// HTTP method.
    method: Method,
    /// Endpoint path.
    path: &'static str,
    /// Trailing path segment (a record id), percent-encoded on send.
    segment: Option<String>,
    /// Query parameters.
    query: Vec<(&'static str, String)>,
    /// JSON body.
    body: Option<Value>,
}

impl Call {
    /// A call without segment, query or body.
    const fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            segment: None,
            query: Vec::new(),
            body: None,
        }
    }

    /// Appends a record id to the path.
    fn segment(mut self, segment: &str) -> Self {
        self.segment = Some(segment.to_owned());
        self
    }

    /// Sets the query parameters.
    fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Serializes and attaches a JSON body.
    fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(FinTrackError::from)?);
        Ok(self)
    }

    /// Whether this call targets an authentication endpoint, which never
    /// triggers a refresh.
    fn is_auth(&self) -> bool {
        self.path.starts_with(AUTH_PREFIX)
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the finance tracker API.
///
/// Use [`ApiClient::builder()`] to construct an instance. The client is
/// `Sync`; share it behind an `Arc` to issue concurrent requests.
#[derive(Debug)]
pub struct ApiClient<S> {
    /// Underlying HTTP client.
    http: reqwest::Client,
    /// API base URL without trailing slash.
    base_url: String,
    /// Auth base URL without trailing slash.
    auth_base_url: String,
    /// Timeout of the refresh call.
    refresh_timeout: Duration,
    /// Retry schedule for 429 and 5xx responses.
    retry: RetryPolicy,
    /// Token storage.
    store: S,
    /// Single-flight refresh slot.
    gate: RefreshGate,
    /// Session lifecycle notifications.
    events: broadcast::Sender<SessionEvent>,
}

impl<S: CredentialStore> ApiClient<S> {
    /// Creates a new builder for configuring the client.
    #[inline]
    #[must_use]
    pub const fn builder() -> ApiClientBuilder<S> {
        ApiClientBuilder {
            base_url: None,
            auth_base_url: None,
            timeout: DEFAULT_TIMEOUT,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            retry: None,
            store: None,
        }
    }

    /// The credential store the client reads tokens from.
    #[inline]
    #[must_use]
    pub const fn credential_store(&self) -> &S {
        &self.store
    }

    /// Subscribes to session lifecycle events.
    #[inline]
    #[must_use]
    pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Lists transactions matching `query`.
    ///
    /// Records that cannot be normalized are skipped and logged.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all, fields(page = query.page))]
    pub async fn transactions(&self, query: &TransactionQuery) -> ApiResult<TransactionPage> {
        let call = Call::new(Method::GET, TRANSACTIONS_PATH).query(query.to_pairs());
        let ApiEnvelope { data, meta, .. } = self.execute::<TransactionList>(call).await?;
        let (items, paging) = data.ok_or_else(no_data)?.into_parts(meta);
        Ok(TransactionPage::from_parts(
            wire::normalize_all(items),
            paging,
            query,
        ))
    }

    /// Fetches one transaction.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call, or a
    /// `VALIDATION_ERROR` if the record cannot be normalized.
    #[inline]
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn transaction(&self, id: &TransactionId) -> ApiResult<Transaction> {
        let call = Call::new(Method::GET, TRANSACTIONS_PATH).segment(id.as_inner());
        self.transaction_call(call).await
    }

    /// Creates a transaction and returns it as stored by the server.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn create_transaction(&self, transaction: &NewTransaction) -> ApiResult<Transaction> {
        let call = Call::new(Method::POST, TRANSACTIONS_PATH).json(transaction)?;
        self.transaction_call(call).await
    }

    /// Updates the given fields of a transaction.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn update_transaction(
        &self,
        id: &TransactionId,
        update: &TransactionUpdate,
    ) -> ApiResult<Transaction> {
        let call = Call::new(Method::PUT, TRANSACTIONS_PATH)
            .segment(id.as_inner())
            .json(update)?;
        self.transaction_call(call).await
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn delete_transaction(&self, id: &TransactionId) -> ApiResult<()> {
        let call = Call::new(Method::DELETE, TRANSACTIONS_PATH).segment(id.as_inner());
        let _envelope = self.execute::<Value>(call).await?;
        Ok(())
    }

    /// Runs a call answering with a single transaction.
    async fn transaction_call(&self, call: Call) -> ApiResult<Transaction> {
        let envelope = self.execute::<TransactionDetail>(call).await?;
        let detail = envelope.data.ok_or_else(no_data)?;
        Ok(detail.into_transaction()?)
    }

    // ── Statistics ──────────────────────────────────────────────────

    /// Income, expenses and savings overview of the current period.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn balance_summary(&self) -> ApiResult<BalanceSummary> {
        self.fetch(Call::new(Method::GET, SUMMARY_PATH)).await
    }

    /// Budgeted versus actual amounts per category.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn budget_comparison(&self) -> ApiResult<BudgetComparison> {
        self.fetch(Call::new(Method::GET, BUDGET_COMPARISON_PATH)).await
    }

    /// Expense share per category, over `period` (inclusive) when given
    /// and over the server's default period otherwise.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn spending_by_category(
        &self,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> ApiResult<SpendingByCategory> {
        let mut call = Call::new(Method::GET, SPENDING_PATH);
        if let Some((start, end)) = period {
            call = call.query(vec![
                ("startDate", start.format(DATE_FORMAT).to_string()),
                ("endDate", end.format(DATE_FORMAT).to_string()),
            ]);
        }
        self.fetch(call).await
    }

    /// Monthly income and expense series over the last `months` months.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all, fields(months = months))]
    pub async fn monthly_trends(&self, months: u32) -> ApiResult<MonthlyTrends> {
        let call =
            Call::new(Method::GET, MONTHLY_TRENDS_PATH).query(vec![("months", months.to_string())]);
        self.fetch(call).await
    }

    /// Progress of every savings goal.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn savings_progress(&self) -> ApiResult<SavingsProgressReport> {
        self.fetch(Call::new(Method::GET, SAVINGS_PROGRESS_PATH)).await
    }

    // ── Authentication ──────────────────────────────────────────────

    /// Signs in, stores the returned tokens and publishes
    /// [`SessionEvent::LoggedIn`].
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call, or an
    /// `UNKNOWN_ERROR` if the tokens cannot be stored.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthSession> {
        self.start_session(Call::new(Method::POST, LOGIN_PATH).json(request)?)
            .await
    }

    /// Creates an account and signs in.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the failed call, or an
    /// `UNKNOWN_ERROR` if the tokens cannot be stored.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthSession> {
        self.start_session(Call::new(Method::POST, REGISTER_PATH).json(request)?)
            .await
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// Joins a refresh already in flight instead of starting another.
    ///
    /// # Errors
    ///
    /// Returns `AUTH_EXPIRED` if the refresh fails; the credentials are
    /// wiped in that case.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn refresh_session(&self) -> ApiResult<()> {
        let current = self.store.get(CredentialKey::AuthToken).await?;
        self.refresh_shared(current.as_ref()).await
    }

    /// Signs out.
    ///
    /// The server is notified on a best-effort basis; local credentials
    /// are always cleared and [`SessionEvent::LoggedOut`] is published.
    ///
    /// # Errors
    ///
    /// Returns an `UNKNOWN_ERROR` if the credential store fails.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self) -> ApiResult<()> {
        let call = Call::new(Method::POST, LOGOUT_PATH);
        match self.url_for(&call) {
            Ok(url) => match self.attempt::<Value>(&call, &url).await {
                Attempt::Success(_) => tracing::debug!("server session closed"),
                Attempt::AuthExpired { error, .. }
                | Attempt::Transient(error)
                | Attempt::Fatal(error) => {
                    tracing::warn!(error = %error, "server logout failed, clearing local session");
                }
            },
            Err(error) => tracing::warn!(error = %error, "server logout skipped"),
        }
        self.store.clear().await?;
        self.emit(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Runs a login-like call and persists the session it returns.
    async fn start_session(&self, call: Call) -> ApiResult<AuthSession> {
        let envelope = self.execute::<AuthSession>(call).await?;
        let session = envelope.data.ok_or_else(no_data)?;
        self.store_tokens(&session).await?;
        tracing::info!("signed in");
        self.emit(SessionEvent::LoggedIn);
        Ok(session)
    }

    /// Persists the tokens of a session. A missing refresh token keeps the
    /// stored one.
    async fn store_tokens(&self, session: &AuthSession) -> crate::error::Result<()> {
        self.store
            .set(
                CredentialKey::AuthToken,
                SecretString::from(session.token.clone()),
            )
            .await?;
        if let Some(refresh_token) = session.refresh_token.as_ref() {
            self.store
                .set(
                    CredentialKey::RefreshToken,
                    SecretString::from(refresh_token.clone()),
                )
                .await?;
        }
        Ok(())
    }

    // ── State machine ───────────────────────────────────────────────

    /// Runs a call expecting `data` in the envelope.
    async fn fetch<T: DeserializeOwned>(&self, call: Call) -> ApiResult<T> {
        self.execute::<T>(call).await?.data.ok_or_else(no_data)
    }

    /// Drives a call through authentication, refresh and retries.
    #[tracing::instrument(skip_all, fields(method = %call.method, path = call.path))]
    async fn execute<T: DeserializeOwned>(&self, call: Call) -> ApiResult<ApiEnvelope<T>> {
        let url = self.url_for(&call)?;
        let mut refreshed = false;
        let mut retries = 0_usize;
        loop {
            match self.attempt::<T>(&call, &url).await {
                Attempt::Success(envelope) => return Ok(envelope),
                Attempt::AuthExpired { error, stale_token } => {
                    if call.is_auth() {
                        return Err(error);
                    }
                    if refreshed {
                        tracing::warn!("token rejected again after refresh");
                        self.force_logout(&error.message).await;
                        return Err(error);
                    }
                    refreshed = true;
                    tracing::debug!("access token rejected, refreshing");
                    self.refresh_shared(stale_token.as_ref()).await?;
                }
                Attempt::Transient(error) => {
                    let Some(delay) = self.retry.delay_for(retries) else {
                        tracing::warn!(retries, error = %error, "giving up");
                        return Err(error);
                    };
                    retries += 1;
                    tracing::warn!(
                        retry = retries,
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Attempt::Fatal(error) => return Err(error),
            }
        }
    }

    /// Sends one attempt with the currently stored token.
    async fn attempt<T: DeserializeOwned>(&self, call: &Call, url: &Url) -> Attempt<T> {
        let token = match self.store.get(CredentialKey::AuthToken).await {
            Ok(token) => token,
            Err(err) => return Attempt::Fatal(err.into()),
        };

        let mut request = self.http.request(call.method.clone(), url.clone());
        if let Some(secret) = token.as_ref() {
            request = request.bearer_auth(secret.expose_secret());
        }
        if let Some(body) = call.body.as_ref() {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return Attempt::Fatal(network_error(&err)),
        };
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return Attempt::Fatal(network_error(&err)),
        };
        tracing::trace!(status, bytes = body.len(), "response received");
        classify(status, &body, token)
    }

    /// Absolute URL of a call.
    fn url_for(&self, call: &Call) -> ApiResult<Url> {
        let base = if call.is_auth() {
            &self.auth_base_url
        } else {
            &self.base_url
        };
        let mut url = endpoint_url(base, call.path)?;
        if let Some(segment) = call.segment.as_deref() {
            let Ok(mut segments) = url.path_segments_mut() else {
                return Err(ApiError::new(
                    ErrorCode::UnknownError,
                    format!("cannot append a path segment to {base}"),
                ));
            };
            let _segments = segments.push(segment);
        }
        if !call.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            let _pairs = pairs.extend_pairs(call.query.iter());
        }
        Ok(url)
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Refreshes the session once for all concurrent callers.
    ///
    /// `stale` is the token the failed request carried; if the stored
    /// token already differs, another caller refreshed meanwhile and no
    /// network call is made. If it was wiped, the previous failure is
    /// returned as is.
    async fn refresh_shared(&self, stale: Option<&SecretString>) -> ApiResult<()> {
        match self.gate.enter() {
            Role::Follower(receiver) => {
                tracing::debug!("waiting for refresh in flight");
                follow(receiver).await
            }
            Role::Leader(guard) => {
                let outcome = self.lead_refresh(stale).await;
                guard.finish(outcome.clone());
                outcome
            }
        }
    }

    /// Refresh performed by the leader; wipes the session on failure.
    async fn lead_refresh(&self, stale: Option<&SecretString>) -> ApiResult<()> {
        let current = self.store.get(CredentialKey::AuthToken).await?;
        match (current.as_ref(), stale) {
            (Some(token), _) => {
                let unchanged =
                    stale.is_some_and(|old| old.expose_secret() == token.expose_secret());
                if !unchanged {
                    tracing::debug!("token already refreshed");
                    return Ok(());
                }
            }
            // The request carried a token that has since been wiped: the
            // session already ended and must not end twice.
            (None, Some(_)) => {
                tracing::debug!("session already expired");
                return Err(self.gate.last_failure().unwrap_or_else(|| {
                    ApiError::new(ErrorCode::AuthExpired, "session expired")
                }));
            }
            (None, None) => {}
        }

        match self.perform_refresh().await {
            Ok(()) => {
                tracing::info!("session refreshed");
                Ok(())
            }
            Err(err) => {
                let mut error = ApiError::new(
                    ErrorCode::AuthExpired,
                    format!("session expired: {}", err.message),
                )
                .with_server_code(err.server_code);
                error.status = err.status;
                self.force_logout(&error.message).await;
                Err(error)
            }
        }
    }

    /// Calls the refresh endpoint and stores the new tokens.
    async fn perform_refresh(&self) -> ApiResult<()> {
        let refresh_token = self
            .store
            .get(CredentialKey::RefreshToken)
            .await?
            .ok_or_else(|| ApiError::new(ErrorCode::AuthExpired, "no refresh token stored"))?;

        let url = endpoint_url(&self.auth_base_url, REFRESH_PATH)?;
        let response = self
            .http
            .post(url)
            .timeout(self.refresh_timeout)
            .json(&RefreshRequest {
                refresh_token: refresh_token.expose_secret(),
            })
            .send()
            .await
            .map_err(|err| network_error(&err))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| network_error(&err))?;

        match classify::<AuthSession>(status, &body, None) {
            Attempt::Success(envelope) => {
                let session = envelope.data.ok_or_else(no_data)?;
                Ok(self.store_tokens(&session).await?)
            }
            Attempt::AuthExpired { error, .. } | Attempt::Transient(error) | Attempt::Fatal(error) => {
                Err(error)
            }
        }
    }

    /// Wipes the credentials and announces the expired session.
    async fn force_logout(&self, reason: &str) {
        if let Err(err) = self.store.clear().await {
            tracing::error!(error = %err, "failed to clear credentials");
        }
        tracing::warn!(reason, "session expired");
        self.emit(SessionEvent::Expired {
            reason: reason.to_owned(),
        });
    }

    /// Publishes a session event.
    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("no session listeners");
        }
    }
}

/// Joins a base URL and an endpoint path.
fn endpoint_url(base: &str, path: &str) -> ApiResult<Url> {
    Url::parse(&format!("{base}{path}")).map_err(|err| {
        ApiError::new(
            ErrorCode::UnknownError,
            format!("invalid request url: {err}"),
        )
    })
}

/// Error for a successful response that carried no `data`.
fn no_data() -> ApiError {
    ApiError::new(ErrorCode::UnknownError, "response contained no data")
}
