use std::sync::Arc;

use log::trace;

use super::channel::Channel;

pub struct Sender<T> {
    channel: Arc<Channel<T>>,
}

impl<T> Sender<T> {
    pub(super) fn new(channel: Arc<Channel<T>>) -> Self {
        channel.inner.lock().senders += 1;
        Sender { channel }
    }

    /// Pushes `item` onto the channel.
    ///
    /// Blocks until there's space available.
    ///
    /// Returns false when the channel no longer accepts writes. The item is
    /// dropped in that case.
    pub fn send(&self, item: T) -> bool {
        let mut ch = self.channel.inner.lock();
        while ch.is_full() && ch.is_accepting_writes {
            trace!("send - waiting for space ({} queued)", ch.queue.len());
            self.channel.space_available.wait(&mut ch);
        }
        if !ch.is_accepting_writes {
            return false;
        }
        ch.queue.push_back(item);
        self.channel.data_available.notify_one();
        true
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let mut ch = self.channel.inner.lock();
        ch.senders -= 1;
        if ch.senders == 0 {
            // Last writer gone. Receivers drain what's left then see the
            // channel as closed.
            ch.is_accepting_writes = false;
            self.channel.data_available.notify_all();
            self.channel.space_available.notify_all();
        }
    }
}
