//! Marketplace purchase-link rewriting with an injected affiliate identifier.

use crate::config::Config;
use tracing::{debug, trace};
use url::Url;

/// Query parameter carrying the partner identifier.
pub const AFFILIATE_PARAM: &str = "affiliate_id";

/// Query parameter holding the real destination on redirect-wrapper links.
const REDIRECT_TARGET_PARAM: &str = "url";

/// Turns arbitrary outbound links into affiliated marketplace links.
///
/// An empty string means "no usable affiliate link" and is never an error.
#[derive(Debug, Clone)]
pub struct AffiliateRewriter {
    affiliate_id: String,
    marketplace_token: String,
    redirect_hosts: Vec<String>,
}

impl AffiliateRewriter {
    /// Creates a rewriter. The marketplace token is matched case-insensitively.
    pub fn new(
        affiliate_id: impl Into<String>,
        marketplace_token: impl Into<String>,
        redirect_hosts: Vec<String>,
    ) -> Self {
        Self {
            affiliate_id: affiliate_id.into(),
            marketplace_token: marketplace_token.into().to_lowercase(),
            redirect_hosts,
        }
    }

    /// Creates a rewriter from the configured partner settings.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.affiliate_id.clone(),
            config.marketplace_token.clone(),
            config.redirect_hosts.clone(),
        )
    }

    /// Rewrites `link` to an affiliated marketplace URL, or returns `""`.
    pub fn rewrite(&self, link: &str) -> String {
        let parsed = match parse_link(link) {
            Ok(url) => url,
            Err(e) => {
                debug!("Ignoring unparseable link {:?}: {}", link, e);
                return String::new();
            }
        };

        let target = if self.is_redirect_wrapper(&parsed) {
            parsed
                .query_pairs()
                .find(|(key, _)| key == REDIRECT_TARGET_PARAM)
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default()
        } else {
            link.to_string()
        };

        if !target.to_lowercase().contains(&self.marketplace_token) {
            trace!("Link is not a marketplace link: {}", target);
            return String::new();
        }

        let mut url = match parse_link(&target) {
            Ok(url) => url,
            Err(e) => {
                debug!("Ignoring unparseable redirect target {:?}: {}", target, e);
                return String::new();
            }
        };

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != AFFILIATE_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .append_pair(AFFILIATE_PARAM, &self.affiliate_id);

        url.to_string()
    }

    fn is_redirect_wrapper(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| self.redirect_hosts.iter().any(|r| host.contains(r.as_str())))
    }
}

/// Parses an absolute link. Protocol-relative links (`//host/path`) are taken as https.
fn parse_link(link: &str) -> Result<Url, url::ParseError> {
    match link.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{}", rest)),
        None => Url::parse(link),
    }
}
