//! Union of two key sequences without duplicates.
//!
//! Keys from the first sequence come out first, in order, followed by the
//! keys of the second sequence that haven't been seen yet.

use std::{collections::HashSet, hash::Hash, io, sync::Arc, thread};

use log::{trace, warn};
use parking_lot::Mutex;

use super::{channel::channel, receiver::Receiver};

/// Queue depth between the producer thread and the consumer in
/// [`spawn_merge_keys`].
pub const MERGE_CHANNEL_CAPACITY: usize = 64;

/// Lazily merges `a` and `b`. See [`merge_keys`].
#[derive(Debug)]
pub struct MergeKeys<K> {
    a: std::vec::IntoIter<K>,
    b: std::vec::IntoIter<K>,
    seen: HashSet<K>,
}

impl<K> Iterator for MergeKeys<K>
where
    K: Eq + Hash + Clone,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        for k in self.a.by_ref().chain(self.b.by_ref()) {
            if self.seen.insert(k.clone()) {
                return Some(k);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (a, _) = self.a.size_hint();
        let (b, _) = self.b.size_hint();
        (0, Some(a + b))
    }
}

/// Sequential, pull-style merge of two key lists.
pub fn merge_keys<K>(a: Vec<K>, b: Vec<K>) -> MergeKeys<K>
where
    K: Eq + Hash + Clone,
{
    MergeKeys {
        seen: HashSet::with_capacity(a.len() + b.len()),
        a: a.into_iter(),
        b: b.into_iter(),
    }
}

/// Keys coming out of [`spawn_merge_keys`].
pub enum KeyStream<K> {
    /// Fed by the producer thread.
    Channel(Receiver<K>),
    /// The producer thread couldn't be started; merging on the caller.
    Inline(MergeKeys<K>),
}

impl<K> Iterator for KeyStream<K>
where
    K: Eq + Hash + Clone,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        match self {
            KeyStream::Channel(rx) => rx.next(),
            KeyStream::Inline(keys) => keys.next(),
        }
    }
}

type Producer = Box<dyn FnOnce() + Send + 'static>;

/// Same merge as [`merge_keys`], computed on a producer thread.
///
/// The returned stream yields each key exactly once and ends when the
/// producer has emitted everything. Dropping it early stops the producer.
/// If no thread can be spawned the merge runs sequentially instead.
pub fn spawn_merge_keys<K>(a: Vec<K>, b: Vec<K>) -> KeyStream<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    merge_on(a, b, |producer| {
        thread::Builder::new()
            .name("merge-keys".into())
            .spawn(producer)
            .map(drop)
    })
}

fn merge_on<K, S>(a: Vec<K>, b: Vec<K>, spawn: S) -> KeyStream<K>
where
    K: Eq + Hash + Clone + Send + 'static,
    S: FnOnce(Producer) -> io::Result<()>,
{
    // The inputs stay reachable from here until the producer claims them,
    // so a failed spawn can still merge them.
    let pending = Arc::new(Mutex::new(Some((a, b))));
    let (tx, rx) = channel(MERGE_CHANNEL_CAPACITY);

    let input = pending.clone();
    let producer: Producer = Box::new(move || {
        let Some((a, b)) = input.lock().take() else {
            return;
        };
        let mut sent = 0usize;
        for k in merge_keys(a, b) {
            if !tx.send(k) {
                trace!("merge-keys: receiver gone after {} keys", sent);
                return;
            }
            sent += 1;
        }
        trace!("merge-keys: done, {} keys", sent);
        // tx drops here, which closes the channel
    });

    match spawn(producer) {
        Ok(()) => KeyStream::Channel(rx),
        Err(e) => {
            warn!("merge-keys: failed to spawn producer, merging inline: {}", e);
            let (a, b) = pending.lock().take().unwrap_or_default();
            KeyStream::Inline(merge_keys(a, b))
        }
    }
}
