//! Resolution of download source tokens into [SourceDescriptor]s.

use migfetch_api::*;

/// Resolve configured download source tokens, in order.
///
/// Tokens are trimmed and matched case-insensitively:
/// - `ipfs` selects the content network.
/// - `http` and `https` select the default gateway.
/// - `<scheme>://...` is a gateway url; only http and https are allowed.
/// - anything else is taken as a gateway host, reached over https.
///
/// Repeated tokens are kept, yielding repeated descriptors. Any empty or
/// unusable token fails the whole resolution.
pub fn resolve_sources<S: AsRef<str>>(
    tokens: &[S],
) -> MfResult<Vec<SourceDescriptor>> {
    if tokens.is_empty() {
        return Err(MfError::NoSources);
    }

    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| resolve_source(index, token.as_ref()))
        .collect()
}

fn resolve_source(index: usize, token: &str) -> MfResult<SourceDescriptor> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(MfError::invalid_source(index, token, "empty token"));
    }

    let lower = trimmed.to_ascii_lowercase();
    match lower.as_str() {
        "ipfs" => return Ok(SourceDescriptor::ContentNetwork),
        "http" | "https" => return Ok(SourceDescriptor::GatewayDefault),
        _ => (),
    }

    let parsed = if let Some((scheme, _)) = trimmed.split_once("://") {
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(MfError::UnsupportedScheme {
                index,
                scheme: scheme.into(),
            });
        }
        url::Url::parse(trimmed)
    } else {
        url::Url::parse(&format!("https://{trimmed}"))
    };

    let parsed = parsed.map_err(|err| {
        MfError::invalid_source(
            index,
            token,
            format!("bad gateway address: {err}"),
        )
    })?;

    if matches!(parsed.host_str(), None | Some("")) {
        return Err(MfError::invalid_source(
            index,
            token,
            "bad gateway address: missing host",
        ));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(MfError::invalid_source(
            index,
            token,
            "bad gateway address: query and fragment are not allowed",
        ));
    }

    let gateway = parsed.as_str().trim_end_matches('/').to_string();

    Ok(SourceDescriptor::GatewayCustom { gateway })
}

#[cfg(test)]
mod test {
    use super::*;

    fn custom(gateway: &str) -> SourceDescriptor {
        SourceDescriptor::GatewayCustom {
            gateway: gateway.to_string(),
        }
    }

    #[test]
    fn resolve_fixture() {
        const F: &[&str] = &[
            "ipfs",
            "IPFS",
            "http",
            "HTTPS",
            " some.domain.io ",
            "127.0.0.1",
            "localhost:8080",
            "http://gw.example.com:8080/base/",
            "HTTPS://GW.Example.com",
        ];

        let resolved = resolve_sources(F).unwrap();

        assert_eq!(
            vec![
                SourceDescriptor::ContentNetwork,
                SourceDescriptor::ContentNetwork,
                SourceDescriptor::GatewayDefault,
                SourceDescriptor::GatewayDefault,
                custom("https://some.domain.io"),
                custom("https://127.0.0.1"),
                custom("https://localhost:8080"),
                custom("http://gw.example.com:8080/base"),
                custom("https://gw.example.com"),
            ],
            resolved,
        );
    }

    #[test]
    fn resolve_keeps_duplicates() {
        let resolved = resolve_sources(&["ipfs", "https", "ipfs"]).unwrap();
        assert_eq!(
            vec![
                SourceDescriptor::ContentNetwork,
                SourceDescriptor::GatewayDefault,
                SourceDescriptor::ContentNetwork,
            ],
            resolved,
        );
    }

    #[test]
    fn resolve_empty_list() {
        let none: &[&str] = &[];
        assert!(matches!(resolve_sources(none), Err(MfError::NoSources)));
    }

    #[test]
    fn resolve_empty_tokens() {
        assert!(matches!(
            resolve_sources(&["", ""]),
            Err(MfError::InvalidSource { index: 0, .. })
        ));
        assert!(matches!(
            resolve_sources(&["ipfs", "https", "  "]),
            Err(MfError::InvalidSource { index: 2, .. })
        ));
    }

    #[test]
    fn resolve_bad_scheme() {
        match resolve_sources(&["ftp://bad.gateway.io"]) {
            Err(MfError::UnsupportedScheme { index, scheme }) => {
                assert_eq!(0, index);
                assert_eq!("ftp", &*scheme);
            }
            oth => panic!("unexpected {oth:?}"),
        }

        assert!(matches!(
            resolve_sources(&["ipfs", "ws://bad.gateway.io"]),
            Err(MfError::UnsupportedScheme { index: 1, .. })
        ));
    }

    #[test]
    fn resolve_bad_host() {
        for bad in ["https://", "bad host", "a.b?x=1", "[::1"] {
            assert!(
                matches!(
                    resolve_sources(&[bad]),
                    Err(MfError::InvalidSource { .. })
                ),
                "{bad}"
            );
        }
    }
}
