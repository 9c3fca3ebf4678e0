//! Policy construction.
//!
//! Each method appends the directives of one named protection, in call
//! order. `PolicyBuilder::from_config` issues the calls in the fixed order
//! the server has always used, so later calls override earlier ones.

use axum::http::{header, HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{CspDirective, FrameAction, HstsConfig, SecurityConfig};
use crate::security::policy::{HeaderDirective, PolicySet};
use crate::security::predicate::SecureTransport;

pub const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");
pub const X_DOWNLOAD_OPTIONS: HeaderName = HeaderName::from_static("x-download-options");
pub const SURROGATE_CONTROL: HeaderName = HeaderName::from_static("surrogate-control");

/// Error raised when configuration yields an unusable header.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid header name `{0}`")]
    InvalidName(String),

    #[error("invalid value for header {name}: `{value}`")]
    InvalidValue { name: HeaderName, value: String },
}

/// Accumulates directives in application order.
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    directives: Vec<HeaderDirective>,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the policy for a validated security configuration.
    pub fn from_config(config: &SecurityConfig) -> Result<PolicySet, PolicyError> {
        let mut builder = Self::new();

        if config.hide_powered_by {
            builder = builder.hide_powered_by();
        }
        if let Some(action) = config.frameguard {
            builder = builder.frameguard(action);
        }
        if config.xss_filter {
            builder = builder.xss_filter();
        }
        if config.no_sniff {
            builder = builder.no_sniff();
        }
        if config.ie_no_open {
            builder = builder.ie_no_open();
        }
        if config.hsts.enabled {
            builder = builder.hsts(&config.hsts)?;
        }
        builder = builder.dns_prefetch_control(config.allow_dns_prefetch);
        if config.no_cache {
            builder = builder.no_cache();
        }
        if config.csp.enabled {
            builder = builder.content_security_policy(&config.csp.directives)?;
        }
        if config.umbrella {
            builder = builder.defaults(config)?;
        }
        for name in &config.disable {
            builder = builder.disable(name)?;
        }

        Ok(builder.build())
    }

    pub fn hide_powered_by(mut self) -> Self {
        self.directives.push(HeaderDirective::remove(X_POWERED_BY));
        self
    }

    pub fn frameguard(self, action: FrameAction) -> Self {
        self.set(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static(action.as_header_value()),
        )
    }

    pub fn xss_filter(self) -> Self {
        self.set(header::X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"))
    }

    pub fn no_sniff(self) -> Self {
        self.set(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"))
    }

    pub fn ie_no_open(self) -> Self {
        self.set(X_DOWNLOAD_OPTIONS, HeaderValue::from_static("noopen"))
    }

    /// Strict-Transport-Security. Unless `force` is set the directive only
    /// applies to requests that arrived over HTTPS.
    pub fn hsts(mut self, config: &HstsConfig) -> Result<Self, PolicyError> {
        let mut value = format!("max-age={}", config.max_age_secs);
        if config.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if config.preload {
            value.push_str("; preload");
        }

        let value = header_value(&header::STRICT_TRANSPORT_SECURITY, value)?;
        let directive = HeaderDirective::set(header::STRICT_TRANSPORT_SECURITY, value);
        let directive = if config.force {
            directive
        } else {
            directive.when(SecureTransport)
        };

        self.directives.push(directive);
        Ok(self)
    }

    pub fn dns_prefetch_control(self, allow: bool) -> Self {
        let value = if allow { "on" } else { "off" };
        self.set(header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static(value))
    }

    /// Headers that stop browsers and intermediaries from caching.
    pub fn no_cache(self) -> Self {
        self.set(SURROGATE_CONTROL, HeaderValue::from_static("no-store"))
            .set(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
            )
            .set(header::PRAGMA, HeaderValue::from_static("no-cache"))
            .set(header::EXPIRES, HeaderValue::from_static("0"))
    }

    /// Content-Security-Policy from directives in emission order.
    pub fn content_security_policy(self, directives: &[CspDirective]) -> Result<Self, PolicyError> {
        let value = directives
            .iter()
            .map(|d| {
                let mut part = d.name.clone();
                for source in &d.sources {
                    part.push(' ');
                    part.push_str(source);
                }
                part
            })
            .collect::<Vec<_>>()
            .join("; ");

        let value = header_value(&header::CONTENT_SECURITY_POLICY, value)?;
        Ok(self.set(header::CONTENT_SECURITY_POLICY, value))
    }

    /// Umbrella call: re-applies the standard bundle (everything except the
    /// cache headers and CSP) with the configured settings.
    pub fn defaults(mut self, config: &SecurityConfig) -> Result<Self, PolicyError> {
        if config.hide_powered_by {
            self = self.hide_powered_by();
        }
        if let Some(action) = config.frameguard {
            self = self.frameguard(action);
        }
        if config.xss_filter {
            self = self.xss_filter();
        }
        if config.no_sniff {
            self = self.no_sniff();
        }
        if config.ie_no_open {
            self = self.ie_no_open();
        }
        if config.hsts.enabled {
            self = self.hsts(&config.hsts)?;
        }
        Ok(self.dns_prefetch_control(config.allow_dns_prefetch))
    }

    /// Strip `name` from every response. Overrides anything set before it.
    pub fn disable(mut self, name: &str) -> Result<Self, PolicyError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| PolicyError::InvalidName(name.to_string()))?;
        self.directives.push(HeaderDirective::remove(name));
        Ok(self)
    }

    pub fn build(self) -> PolicySet {
        PolicySet::new(self.directives)
    }

    fn set(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.directives.push(HeaderDirective::set(name, value));
        self
    }
}

fn header_value(name: &HeaderName, value: String) -> Result<HeaderValue, PolicyError> {
    HeaderValue::from_str(&value).map_err(|_| PolicyError::InvalidValue {
        name: name.clone(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::policy::ResolvedHeaders;
    use crate::security::predicate::RequestHead;
    use axum::http::{HeaderMap, Request};

    fn resolve(policy: &PolicySet, uri: &str) -> ResolvedHeaders {
        let req = Request::builder().uri(uri).body(()).unwrap();
        policy.resolve(&RequestHead::of(&req))
    }

    fn value<'a>(resolved: &'a ResolvedHeaders, name: &HeaderName) -> &'a str {
        resolved.get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_default_policy_table() {
        let policy = PolicyBuilder::from_config(&SecurityConfig::default()).unwrap();
        let resolved = resolve(&policy, "/");

        assert_eq!(value(&resolved, &header::X_FRAME_OPTIONS), "DENY");
        assert_eq!(value(&resolved, &header::X_XSS_PROTECTION), "1; mode=block");
        assert_eq!(value(&resolved, &header::X_CONTENT_TYPE_OPTIONS), "nosniff");
        assert_eq!(value(&resolved, &X_DOWNLOAD_OPTIONS), "noopen");
        assert_eq!(value(&resolved, &header::X_DNS_PREFETCH_CONTROL), "off");
        assert_eq!(value(&resolved, &SURROGATE_CONTROL), "no-store");
        assert_eq!(
            value(&resolved, &header::CACHE_CONTROL),
            "no-store, no-cache, must-revalidate, proxy-revalidate"
        );
        assert_eq!(value(&resolved, &header::PRAGMA), "no-cache");
        assert_eq!(value(&resolved, &header::EXPIRES), "0");
        assert_eq!(
            value(&resolved, &header::CONTENT_SECURITY_POLICY),
            "default-src 'self'; script-src 'self' trusted-cdn.com"
        );
    }

    #[test]
    fn test_default_policy_disables_hsts() {
        let policy = PolicyBuilder::from_config(&SecurityConfig::default()).unwrap();

        for uri in ["http://example.com/", "https://example.com/"] {
            let resolved = resolve(&policy, uri);
            assert!(resolved.get(&header::STRICT_TRANSPORT_SECURITY).is_none());
            let removed: Vec<_> = resolved.removed_headers().cloned().collect();
            assert_eq!(removed, vec![X_POWERED_BY, header::STRICT_TRANSPORT_SECURITY]);
        }

        assert_eq!(policy.shadowed(), vec![header::STRICT_TRANSPORT_SECURITY]);
    }

    #[test]
    fn test_hsts_when_not_disabled() {
        let mut config = SecurityConfig::default();
        config.disable.clear();
        let policy = PolicyBuilder::from_config(&config).unwrap();

        let resolved = resolve(&policy, "http://example.com/");
        assert_eq!(
            value(&resolved, &header::STRICT_TRANSPORT_SECURITY),
            "max-age=7776000; includeSubDomains"
        );
        assert!(policy.shadowed().is_empty());
    }

    #[test]
    fn test_hsts_without_force_requires_https() {
        let mut config = SecurityConfig::default();
        config.disable.clear();
        config.hsts.force = false;
        config.hsts.preload = true;
        let policy = PolicyBuilder::from_config(&config).unwrap();

        assert!(resolve(&policy, "http://example.com/")
            .get(&header::STRICT_TRANSPORT_SECURITY)
            .is_none());
        assert_eq!(
            value(&resolve(&policy, "https://example.com/"), &header::STRICT_TRANSPORT_SECURITY),
            "max-age=7776000; includeSubDomains; preload"
        );
    }

    #[test]
    fn test_umbrella_keeps_configured_values() {
        let with_umbrella = PolicyBuilder::from_config(&SecurityConfig::default()).unwrap();
        let mut config = SecurityConfig::default();
        config.umbrella = false;
        let without_umbrella = PolicyBuilder::from_config(&config).unwrap();

        assert!(with_umbrella.len() > without_umbrella.len());
        assert_eq!(
            resolve(&with_umbrella, "/"),
            resolve(&without_umbrella, "/"),
        );
    }

    #[test]
    fn test_applying_policy_twice_matches_once() {
        let policy = PolicyBuilder::from_config(&SecurityConfig::default()).unwrap();
        let resolved = resolve(&policy, "/");

        let mut once = HeaderMap::new();
        resolved.apply(&mut once);
        let mut twice = once.clone();
        resolved.apply(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_frameguard_sameorigin_and_dns_prefetch_on() {
        let mut config = SecurityConfig::default();
        config.frameguard = Some(FrameAction::SameOrigin);
        config.allow_dns_prefetch = true;
        let policy = PolicyBuilder::from_config(&config).unwrap();
        let resolved = resolve(&policy, "/");

        assert_eq!(value(&resolved, &header::X_FRAME_OPTIONS), "SAMEORIGIN");
        assert_eq!(value(&resolved, &header::X_DNS_PREFETCH_CONTROL), "on");
    }

    #[test]
    fn test_disabled_protections_are_absent() {
        let mut config = SecurityConfig::default();
        config.frameguard = None;
        config.no_cache = false;
        config.csp.enabled = false;
        let policy = PolicyBuilder::from_config(&config).unwrap();
        let resolved = resolve(&policy, "/");

        assert!(resolved.get(&header::X_FRAME_OPTIONS).is_none());
        assert!(resolved.get(&header::CACHE_CONTROL).is_none());
        assert!(resolved.get(&header::CONTENT_SECURITY_POLICY).is_none());
        assert!(resolved.get(&header::X_CONTENT_TYPE_OPTIONS).is_some());
    }

    #[test]
    fn test_invalid_disable_name() {
        let err = PolicyBuilder::new().disable("not a header").unwrap_err();
        assert!(matches!(err, PolicyError::InvalidName(ref n) if n == "not a header"));
    }

    #[test]
    fn test_invalid_csp_value() {
        let directives = vec![CspDirective::new("script-src", &["'self'\n"])];
        let err = PolicyBuilder::new()
            .content_security_policy(&directives)
            .unwrap_err();
        assert!(matches!(err, PolicyError::InvalidValue { .. }));
    }
}
