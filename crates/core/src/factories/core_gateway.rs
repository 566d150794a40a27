//! The http(s) gateway fetcher provided by migfetch.

use bytes::Bytes;
use migfetch_api::*;
use std::io::Read;

/// CoreGatewayFetcher configuration types.
pub mod config {
    /// Configuration parameters for [CoreGatewayFetcher](super::CoreGatewayFetcher).
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct CoreGatewayFetcherConfig {
        /// The gateway used by the `http` and `https` download sources.
        /// Default: `https://ipfs.io`.
        pub default_gateway: String,

        /// The distribution root, overridable with `IPFS_DIST_PATH`.
        /// Default: `/ipns/dist.ipfs.io`.
        pub dist_path: String,

        /// User agent sent with every request.
        pub user_agent: String,

        /// Maximum response body size in bytes. Default: 512 MiB.
        pub fetch_limit: u64,

        /// Overall timeout for a single request in ms, 0 for none.
        /// Default: 5 minutes.
        pub request_timeout_ms: u32,
    }

    impl Default for CoreGatewayFetcherConfig {
        fn default() -> Self {
            Self {
                default_gateway: "https://ipfs.io".into(),
                dist_path: crate::dist::DEFAULT_DIST_PATH.into(),
                user_agent: concat!("migfetch/", env!("CARGO_PKG_VERSION"))
                    .into(),
                fetch_limit: 1024 * 1024 * 512,
                request_timeout_ms: 1000 * 60 * 5,
            }
        }
    }

    impl CoreGatewayFetcherConfig {
        /// Get the request timeout, if one is set.
        pub fn request_timeout(&self) -> Option<std::time::Duration> {
            match self.request_timeout_ms {
                0 => None,
                ms => Some(std::time::Duration::from_millis(ms as u64)),
            }
        }
    }

    /// Module-level configuration for CoreGatewayFetcher.
    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CoreGatewayFetcherModConfig {
        /// CoreGatewayFetcher configuration.
        #[serde(default)]
        pub core_gateway_fetcher: CoreGatewayFetcherConfig,
    }

    impl migfetch_api::ModConfig for CoreGatewayFetcherModConfig {}
}

pub use config::*;

/// Fetches distribution artifacts over http(s) from a single gateway.
pub struct CoreGatewayFetcher {
    gateway: String,
    dist_path: String,
    fetch_limit: u64,
    agent: ureq::Agent,
}

impl std::fmt::Debug for CoreGatewayFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreGatewayFetcher")
            .field("gateway", &self.gateway)
            .field("dist_path", &self.dist_path)
            .field("fetch_limit", &self.fetch_limit)
            .finish()
    }
}

impl CoreGatewayFetcher {
    /// Construct a fetcher bound to `gateway`, or to the configured default
    /// gateway if `None`. No requests are made until the first fetch.
    pub fn new(
        config: &CoreGatewayFetcherConfig,
        gateway: Option<&str>,
    ) -> MfResult<Self> {
        const ERR: &str = "invalid gateway url";

        let gateway = gateway.unwrap_or(&config.default_gateway);
        let parsed =
            url::Url::parse(gateway).map_err(|e| MfError::other_src(ERR, e))?;

        if parsed.cannot_be_a_base() {
            return Err(MfError::other(ERR));
        }

        match parsed.scheme() {
            "http" | "https" => (),
            _ => return Err(MfError::other(ERR)),
        }

        let mut agent =
            ureq::AgentBuilder::new().user_agent(&config.user_agent);
        if let Some(timeout) = config.request_timeout() {
            agent = agent.timeout(timeout);
        }

        Ok(Self {
            gateway: parsed.as_str().trim_end_matches('/').to_string(),
            dist_path: crate::dist::dist_path(&config.dist_path),
            fetch_limit: config.fetch_limit,
            agent: agent.build(),
        })
    }

    /// The gateway base url this fetcher requests from.
    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.gateway,
            self.dist_path,
            path.trim_start_matches('/')
        )
    }
}

impl Fetcher for CoreGatewayFetcher {
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        cancel: CancellationToken,
    ) -> BoxFut<'a, MfResult<Bytes>> {
        Box::pin(async move {
            let url = self.url_for(path);
            let agent = self.agent.clone();
            let limit = self.fetch_limit;

            tracing::debug!(%url, "gateway fetch");

            // the blocking request cannot be interrupted, it is bounded by
            // the request timeout and its result is dropped if we cancel
            let task = tokio::task::spawn_blocking(move || {
                get_blocking(&agent, &url, limit)
            });

            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(MfError::Cancelled),
                res = task => match res {
                    Ok(res) => res,
                    Err(err) => {
                        Err(MfError::other_src("gateway fetch task failed", err))
                    }
                },
            }
        })
    }

    fn close(&self) -> BoxFut<'_, MfResult<()>> {
        Box::pin(async move { Ok(()) })
    }

    fn info(&self) -> FetcherInfo {
        FetcherInfo::Gateway {
            gateway: self.gateway.clone(),
        }
    }
}

fn get_blocking(agent: &ureq::Agent, url: &str, limit: u64) -> MfResult<Bytes> {
    let res = match agent.get(url).call() {
        Ok(res) => res,
        Err(ureq::Error::Status(code, res)) => {
            let kind = match code {
                404 | 410 => FailureKind::NotFound,
                _ => FailureKind::Other,
            };
            let mut body = Vec::new();
            let _ = res.into_reader().take(256).read_to_end(&mut body);
            return Err(MfError::fetch(
                kind,
                format!(
                    "GET {url} returned {code}: {}",
                    String::from_utf8_lossy(&body).trim()
                ),
            ));
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(MfError::fetch_src(
                FailureKind::Unreachable,
                format!("GET {url}"),
                err,
            ));
        }
    };

    let mut body = Vec::new();
    res.into_reader()
        .take(limit.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|err| {
            MfError::fetch_src(
                FailureKind::Unreachable,
                format!("GET {url} body read failed"),
                err,
            )
        })?;

    if body.len() as u64 > limit {
        return Err(MfError::fetch(
            FailureKind::Other,
            format!("GET {url} response exceeds fetch limit of {limit} bytes"),
        ));
    }

    Ok(Bytes::from(body))
}
