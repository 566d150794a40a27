//! The in-memory content transport provided by migfetch.

use bytes::Bytes;
use migfetch_api::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// An in-memory stand-in for a content network.
/// This is NOT a production module. It is for testing, and for embedding
/// migfetch where artifacts are already held in process.
///
/// Content published to the factory is visible to every transport it
/// connects, and every connection records the hints it was seeded with.
#[derive(Debug, Default)]
pub struct MemContentTransportFactory {
    content: Arc<Mutex<HashMap<String, Bytes>>>,
    connects: Mutex<Vec<IpfsHints>>,
}

impl MemContentTransportFactory {
    /// Construct a new MemContentTransportFactory.
    pub fn create() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `data` available at the absolute content path `path`,
    /// e.g. `/ipns/dist.ipfs.io/fs-repo-1-to-2/versions`.
    pub fn publish(&self, path: &str, data: Bytes) {
        self.content.lock().unwrap().insert(path.to_string(), data);
    }

    /// The hints passed to each connect call so far, in order.
    pub fn connected_hints(&self) -> Vec<IpfsHints> {
        self.connects.lock().unwrap().clone()
    }
}

impl ContentTransportFactory for MemContentTransportFactory {
    fn default_config(&self, _config: &mut Config) -> MfResult<()> {
        Ok(())
    }

    fn connect(
        &self,
        _builder: Arc<Builder>,
        hints: IpfsHints,
    ) -> BoxFut<'static, MfResult<DynContentTransport>> {
        self.connects.lock().unwrap().push(hints);
        let content = self.content.clone();
        Box::pin(async move {
            let out: DynContentTransport = Arc::new(MemContentTransport {
                content,
                closed: AtomicBool::new(false),
            });
            Ok(out)
        })
    }
}

#[derive(Debug)]
struct MemContentTransport {
    content: Arc<Mutex<HashMap<String, Bytes>>>,
    closed: AtomicBool,
}

impl ContentTransport for MemContentTransport {
    fn get(&self, path: String, limit: u64) -> BoxFut<'_, MfResult<Bytes>> {
        Box::pin(async move {
            if self.closed.load(Ordering::SeqCst) {
                return Err(MfError::fetch(
                    FailureKind::Unreachable,
                    "content transport closed",
                ));
            }

            let data = self.content.lock().unwrap().get(&path).cloned();
            match data {
                None => Err(MfError::fetch(
                    FailureKind::NotFound,
                    format!("no content at {path}"),
                )),
                Some(data) if data.len() as u64 > limit => {
                    Err(MfError::fetch(
                        FailureKind::Other,
                        format!("{path} exceeds fetch limit of {limit} bytes"),
                    ))
                }
                Some(data) => Ok(data),
            }
        })
    }

    fn close(&self) -> BoxFut<'_, MfResult<()>> {
        self.closed.store(true, Ordering::SeqCst);
        Box::pin(async move { Ok(()) })
    }
}
