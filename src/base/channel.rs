use std::{collections::VecDeque, sync::Arc};

use parking_lot::{Condvar, Mutex};

use super::{receiver::Receiver, sender::Sender};

pub(crate) struct RawChannel<T> {
    pub(crate) queue: VecDeque<T>,
    pub(crate) capacity: usize,

    /// when closing the channel, we stop accepting writes
    pub(crate) is_accepting_writes: bool,

    /// live senders; the channel closes when the last one drops
    pub(crate) senders: usize,
    /// live receivers; the channel closes when the last one drops
    pub(crate) receivers: usize,
}

impl<T> RawChannel<T> {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            is_accepting_writes: true,
            senders: 0,
            receivers: 0,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }
}

/// A bounded queue of keys shared by any number of senders and receivers.
pub struct Channel<T> {
    pub(crate) inner: Mutex<RawChannel<T>>,
    pub(crate) space_available: Condvar,
    pub(crate) data_available: Condvar,
}

impl<T> Channel<T> {
    pub fn new(capacity: usize) -> Self {
        Channel {
            inner: Mutex::new(RawChannel::new(capacity)),
            space_available: Condvar::new(),
            data_available: Condvar::new(),
        }
    }

    /// Stops accepting writes and wakes everyone waiting on the channel.
    ///
    /// Items already queued can still be received.
    pub fn close(&self) {
        let mut ch = self.inner.lock();
        ch.is_accepting_writes = false;
        self.space_available.notify_all();
        self.data_available.notify_all();
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }
}

pub trait ChannelFactory<T> {
    fn sender(&self) -> Sender<T>;
    fn receiver(&self) -> Receiver<T>;
}

impl<T> ChannelFactory<T> for Arc<Channel<T>> {
    fn sender(&self) -> Sender<T> {
        Sender::new(self.clone())
    }

    fn receiver(&self) -> Receiver<T> {
        Receiver::new(self.clone())
    }
}

pub fn channel<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
    let ch = Arc::new(Channel::new(capacity));
    (ch.sender(), ch.receiver())
}
