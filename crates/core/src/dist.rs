//! Distribution layout helpers.
//!
//! Migration artifacts are published under a distribution root, one
//! directory per distribution (e.g. `fs-repo-11-to-12`), each holding a
//! `versions` index and one directory per released version.

use bytes::Bytes;
use migfetch_api::*;

/// The default distribution root.
pub const DEFAULT_DIST_PATH: &str = "/ipns/dist.ipfs.io";

/// Environment variable that overrides the configured distribution root.
pub const ENV_DIST_PATH: &str = "IPFS_DIST_PATH";

/// Resolve the distribution root to use, honoring `IPFS_DIST_PATH`.
///
/// The result always starts with a slash and never ends with one.
pub fn dist_path(configured: &str) -> String {
    let raw = match std::env::var(ENV_DIST_PATH) {
        Ok(env) if !env.trim().is_empty() => env,
        _ => configured.to_string(),
    };
    let trimmed = raw.trim().trim_matches('/');
    format!("/{trimmed}")
}

/// A released distribution version, e.g. `v1.2.3` or `v1.2.3-rc1`.
///
/// Versions order by semver precedence. Pre-release identifiers with a
/// trailing number, like `rc10`, compare that number numerically, so
/// `rc2` sorts before `rc10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistVersion {
    text: String,
    version: semver::Version,
}

impl DistVersion {
    /// Parse a version line from a `versions` index.
    pub fn parse(src: &str) -> MfResult<Self> {
        let err = || MfError::other(format!("invalid dist version {src:?}"));

        let rest = src.strip_prefix('v').ok_or_else(err)?;
        let version = match rest.split_once('-') {
            None => semver::Version::parse(rest),
            Some((core, pre)) => {
                semver::Version::parse(&format!("{core}-{}", split_pre(pre)))
            }
        }
        .map_err(|e| {
            MfError::other_src(format!("invalid dist version {src:?}"), e)
        })?;

        Ok(Self {
            text: src.to_string(),
            version,
        })
    }

    /// Returns true if this is a pre-release.
    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }
}

/// Split identifiers like `rc10` into `rc.10` so the number is compared
/// as a numeric identifier.
fn split_pre(pre: &str) -> String {
    pre.split('.')
        .map(|ident| {
            let digits = ident
                .bytes()
                .rev()
                .take_while(u8::is_ascii_digit)
                .count();
            let (head, tail) = ident.split_at(ident.len() - digits);
            // semver numeric identifiers may not have leading zeros
            let numeric =
                !tail.is_empty() && (tail == "0" || !tail.starts_with('0'));
            if head.is_empty() || !numeric || head.ends_with('-') {
                ident.to_string()
            } else {
                format!("{head}.{tail}")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

impl Ord for DistVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for DistVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for DistVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

fn parse_versions(data: &Bytes) -> MfResult<Vec<DistVersion>> {
    let text = std::str::from_utf8(data)
        .map_err(|err| MfError::other_src("versions index is not utf8", err))?;

    let mut out = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(DistVersion::parse)
        .collect::<MfResult<Vec<_>>>()?;

    out.sort();
    Ok(out)
}

/// Fetch the `versions` index of a distribution, sorted ascending.
pub async fn fetch_versions(
    fetcher: &dyn Fetcher,
    dist: &str,
    cancel: CancellationToken,
) -> MfResult<Vec<DistVersion>> {
    let path = format!("{dist}/versions");
    let data = fetcher.fetch(&path, cancel).await?;
    parse_versions(&data)
}

/// Fetch the newest non-prerelease version of a distribution.
pub async fn latest_version(
    fetcher: &dyn Fetcher,
    dist: &str,
    cancel: CancellationToken,
) -> MfResult<DistVersion> {
    fetch_versions(fetcher, dist, cancel)
        .await?
        .into_iter()
        .rev()
        .find(|v| !v.is_prerelease())
        .ok_or_else(|| {
            MfError::other(format!("no released versions of {dist}"))
        })
}

/// The os and architecture names used in published archive file names.
pub fn current_platform() -> (&'static str, &'static str) {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        oth => oth,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "arm" => "arm",
        oth => oth,
    };
    (os, arch)
}

/// The path of a released archive, relative to the distribution root.
pub fn archive_path(
    dist: &str,
    version: &DistVersion,
    os: &str,
    arch: &str,
) -> String {
    let ext = if os == "windows" { "zip" } else { "tar.gz" };
    format!("{dist}/{version}/{dist}_{version}_{os}-{arch}.{ext}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version_parse_and_order() {
        let mut list = ["v1.10.0", "v1.2.0", "v1.2.0-rc1", "v0.9.9"]
            .iter()
            .map(|v| DistVersion::parse(v).unwrap())
            .collect::<Vec<_>>();
        list.sort();

        let rendered = list.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        assert_eq!(
            vec!["v0.9.9", "v1.2.0-rc1", "v1.2.0", "v1.10.0"],
            rendered
        );
    }

    #[test]
    fn version_release_candidates_order_numerically() {
        let rc2 = DistVersion::parse("v1.0.0-rc2").unwrap();
        let rc10 = DistVersion::parse("v1.0.0-rc10").unwrap();
        assert!(rc2 < rc10);
        assert!(rc10 < DistVersion::parse("v1.0.0").unwrap());
        assert!(rc10.is_prerelease());

        let data = Bytes::from_static(
            b"v1.0.0-rc10\nv1.0.0\nv1.0.0-rc2\nv1.0.0-rc1\nv0.9.0\n",
        );
        let rendered = parse_versions(&data)
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            vec!["v0.9.0", "v1.0.0-rc1", "v1.0.0-rc2", "v1.0.0-rc10", "v1.0.0"],
            rendered
        );
    }

    #[test]
    fn version_no_parse() {
        for bad in ["", "1.2.3", "v1.2", "v1.2.3.4", "v1.x.3", "v1.2.3-"] {
            assert!(DistVersion::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn versions_index() {
        let data = Bytes::from_static(b"v1.0.0\n\nv1.1.0-rc1\r\nv0.4.0\n");
        let list = parse_versions(&data).unwrap();
        assert_eq!(3, list.len());
        assert_eq!("v0.4.0", list[0].to_string());
        assert_eq!("v1.1.0-rc1", list[2].to_string());

        let data = Bytes::from_static(b"v1.0.0\nnope\n");
        assert!(parse_versions(&data).is_err());
    }

    #[test]
    fn archive_naming() {
        let v = DistVersion::parse("v1.0.1").unwrap();
        assert_eq!(
            "fs-repo-11-to-12/v1.0.1/fs-repo-11-to-12_v1.0.1_linux-amd64.tar.gz",
            archive_path("fs-repo-11-to-12", &v, "linux", "amd64"),
        );
        assert_eq!(
            "fs-repo-11-to-12/v1.0.1/fs-repo-11-to-12_v1.0.1_windows-386.zip",
            archive_path("fs-repo-11-to-12", &v, "windows", "386"),
        );
    }
}
