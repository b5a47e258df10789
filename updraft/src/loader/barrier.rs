//! Join barrier for concurrent asset acquisition.
//!
//! The barrier aggregates per-asset fetch outcomes into three disjoint
//! buckets and triggers completion exactly once, on the outcome that
//! accounts for the last expected asset, regardless of arrival order or
//! timing skew between completions.

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::error;

use crate::update::AssetRecord;

/// Outcome of one asset fetch.
#[derive(Debug)]
pub(super) enum AssetOutcome {
    /// Fetch succeeded and the bytes were newly written.
    New(AssetRecord),
    /// Fetch succeeded and the bytes were already present locally.
    Existing(AssetRecord),
    /// Fetch failed.
    Failed(AssetRecord),
}

/// The three disjoint outcome buckets of one load session.
///
/// Invariant: every dispatched asset lands in exactly one bucket.
#[derive(Debug, Default)]
pub(super) struct AssetBuckets {
    pub new_assets: Vec<AssetRecord>,
    pub existing: Vec<AssetRecord>,
    pub failed: Vec<AssetRecord>,
}

impl AssetBuckets {
    fn total(&self) -> usize {
        self.new_assets.len() + self.existing.len() + self.failed.len()
    }
}

struct Inner {
    buckets: AssetBuckets,
    completion: Option<oneshot::Sender<AssetBuckets>>,
}

/// Wait-for-N completion barrier over the outcome buckets.
///
/// [`record`](AssetBarrier::record) appends an outcome and evaluates the
/// completeness check under the same lock, so completion fires on exactly
/// the call that brings the bucket sum to `expected` - never zero times,
/// never twice. A record arriving after completion indicates an accounting
/// bug in the caller; it is logged and ignored rather than delivered.
pub(super) struct AssetBarrier {
    expected: usize,
    inner: Mutex<Inner>,
}

impl AssetBarrier {
    /// Create a barrier expecting `expected` outcomes, and the receiver the
    /// buckets are delivered through when the last outcome arrives.
    pub fn new(expected: usize) -> (Self, oneshot::Receiver<AssetBuckets>) {
        let (tx, rx) = oneshot::channel();
        let barrier = Self {
            expected,
            inner: Mutex::new(Inner {
                buckets: AssetBuckets::default(),
                completion: Some(tx),
            }),
        };
        (barrier, rx)
    }

    /// Record one asset outcome.
    pub fn record(&self, outcome: AssetOutcome) {
        let mut inner = self.inner.lock();

        if inner.completion.is_none() {
            error!("asset outcome recorded after barrier completion; ignoring");
            return;
        }

        match outcome {
            AssetOutcome::New(record) => inner.buckets.new_assets.push(record),
            AssetOutcome::Existing(record) => inner.buckets.existing.push(record),
            AssetOutcome::Failed(record) => inner.buckets.failed.push(record),
        }

        if inner.buckets.total() == self.expected {
            let completion = inner.completion.take().expect("completion checked above");
            let buckets = std::mem::take(&mut inner.buckets);
            drop(inner);

            if completion.send(buckets).is_err() {
                error!("load session dropped before barrier completion");
            }
        }
    }
}
