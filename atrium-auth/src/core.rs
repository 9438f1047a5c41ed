// Authentication core.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use atrium_core::errors::AtriumError;
use atrium_core::SessionInfo;

use crate::options::AuthOptions;

/// Invocation headers keyed by lower-case name, holding trimmed non-empty
/// values only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvocationHeaders(HashMap<String, String>);

impl InvocationHeaders {
    /// When several names collapse to the same lower-case key, the first
    /// non-empty value in iteration order wins.
    pub fn new<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = HashMap::new();
        for (name, value) in headers {
            let value: String = value.into();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            map.entry(name.as_ref().to_ascii_lowercase())
                .or_insert_with(|| value.to_string());
        }
        Self(map)
    }

    /// Value of `name` (any case).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Map entries are visited in key order, so a duplicate in two spellings
/// resolves the same way on every run.
impl From<HashMap<String, String>> for InvocationHeaders {
    fn from(headers: HashMap<String, String>) -> Self {
        let mut pairs: Vec<_> = headers.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Self::new(pairs)
    }
}

/// Exchanges a session token for verified identity.
///
/// Implemented by platform adapters (e.g. the Appwrite account service).
#[async_trait]
pub trait SessionStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn verify_session(&self, token: &str) -> Result<SessionInfo>;
}

/// Require the trigger header.
pub fn verify_trigger(
    headers: &InvocationHeaders,
    options: &AuthOptions,
) -> Result<(), AtriumError> {
    match headers.get(&options.trigger_header) {
        Some(_) => Ok(()),
        None => Err(AtriumError::unauthorized(format!(
            "missing {} header",
            options.trigger_header
        ))),
    }
}

pub fn extract_session_token<'h>(
    headers: &'h InvocationHeaders,
    options: &AuthOptions,
) -> Option<&'h str> {
    headers.get(&options.session_header)
}

/// Gatekeeper for one invocation: trigger proof, then session.
pub struct Authenticator {
    options: AuthOptions,
    strategy: Arc<dyn SessionStrategy>,
}

impl Authenticator {
    pub fn new(options: AuthOptions, strategy: Arc<dyn SessionStrategy>) -> Self {
        Self { options, strategy }
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn verify_trigger(&self, headers: &InvocationHeaders) -> Result<(), AtriumError> {
        verify_trigger(headers, &self.options)
    }

    /// Resolve the caller. Rejections carry the upstream error as `source`
    /// but a generic client message.
    pub async fn authenticate(
        &self,
        headers: &InvocationHeaders,
    ) -> Result<SessionInfo, AtriumError> {
        let Some(token) = extract_session_token(headers, &self.options) else {
            return Err(AtriumError::authentication_failed("missing authentication token"));
        };

        self.strategy
            .verify_session(token)
            .await
            .map_err(|e| AtriumError::authentication_failed("authentication failed").with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSessions {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionStrategy for StaticSessions {
        fn name(&self) -> &str {
            "static"
        }

        async fn verify_session(&self, token: &str) -> Result<SessionInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if token != "good" {
                anyhow::bail!("Invalid session token ({token})");
            }
            Ok(SessionInfo {
                user_id: "user_1".into(),
                session_id: token.into(),
                email: "owner@example.com".into(),
                name: "Owner".into(),
            })
        }
    }

    fn authenticator() -> (Authenticator, Arc<StaticSessions>) {
        let strategy = Arc::new(StaticSessions { calls: AtomicUsize::new(0) });
        (Authenticator::new(AuthOptions::default(), strategy.clone()), strategy)
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_ignores_blank() {
        let headers =
            InvocationHeaders::new([("X-Appwrite-Trigger", "http"), ("x-appwrite-session", "  ")]);
        assert_eq!(headers.get("x-appwrite-trigger"), Some("http"));
        assert_eq!(headers.get("X-APPWRITE-TRIGGER"), Some("http"));
        assert_eq!(headers.get("x-appwrite-session"), None);
    }

    #[test]
    fn first_non_empty_spelling_wins() {
        let headers = InvocationHeaders::new([
            ("x-appwrite-session", " "),
            ("X-Appwrite-Session", "first"),
            ("x-appwrite-session", "second"),
        ]);
        assert_eq!(headers.get("x-appwrite-session"), Some("first"));
    }

    #[test]
    fn map_duplicates_resolve_by_key_order() {
        for _ in 0..16 {
            let map = HashMap::from([
                ("x-appwrite-session".to_string(), "lower".to_string()),
                ("X-Appwrite-Session".to_string(), "mixed".to_string()),
            ]);
            let headers = InvocationHeaders::from(map);
            assert_eq!(headers.get("x-appwrite-session"), Some("mixed"));
        }
    }

    #[test]
    fn missing_trigger_is_unauthorized() {
        let (auth, _) = authenticator();
        let err = auth.verify_trigger(&InvocationHeaders::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "missing x-appwrite-trigger header");
    }

    #[tokio::test]
    async fn missing_token_never_reaches_strategy() {
        let (auth, strategy) = authenticator();
        let headers = InvocationHeaders::new([("x-appwrite-trigger", "http")]);

        let err = auth.authenticate(&headers).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthenticationFailed);
        assert_eq!(err.message, "missing authentication token");
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_token_hides_upstream_detail() {
        let (auth, _) = authenticator();
        let headers = InvocationHeaders::new([("x-appwrite-session", "forged")]);

        let err = auth.authenticate(&headers).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthenticationFailed);
        assert!(!err.sanitize_for_client().to_json().to_string().contains("forged"));
        assert!(err.source.is_some());
    }

    #[tokio::test]
    async fn good_token_yields_session() {
        let (auth, _) = authenticator();
        let headers = InvocationHeaders::new([("x-appwrite-session", "good")]);

        let session = auth.authenticate(&headers).await.unwrap();
        assert_eq!(session.user_id, "user_1");
        assert_eq!(session.session_id, "good");
        assert_eq!(auth.strategy_name(), "static");
    }
}
