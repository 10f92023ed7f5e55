use std::sync::Arc;

use super::channel::Channel;

pub struct Receiver<T> {
    channel: Arc<Channel<T>>,
}

impl<T> Receiver<T> {
    pub(crate) fn new(channel: Arc<Channel<T>>) -> Self {
        channel.inner.lock().receivers += 1;
        Receiver { channel }
    }

    /// True while there is something left to receive, now or later.
    pub fn is_open(&self) -> bool {
        let ch = self.channel.inner.lock();
        ch.is_accepting_writes || !ch.queue.is_empty()
    }
}

impl<T> Iterator for Receiver<T> {
    type Item = T;

    /// Blocks until an item arrives. Returns None once the channel is closed
    /// and drained.
    fn next(&mut self) -> Option<T> {
        let mut ch = self.channel.inner.lock();
        loop {
            if let Some(item) = ch.queue.pop_front() {
                self.channel.space_available.notify_one();
                return Some(item);
            }
            if !ch.is_accepting_writes {
                return None;
            }
            self.channel.data_available.wait(&mut ch);
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        let mut ch = self.channel.inner.lock();
        ch.receivers -= 1;
        if ch.receivers == 0 {
            // Nobody left to read. Release any producer blocked on a full
            // queue so it can observe the close and exit.
            ch.is_accepting_writes = false;
            self.channel.space_available.notify_all();
            self.channel.data_available.notify_all();
        }
    }
}

#[cfg(test)]
mod test {
    use std::thread::{spawn, yield_now};

    use crate::base::channel;

    #[test]
    fn dropping_the_receiver_releases_a_blocked_sender() {
        let (tx, rx) = channel(1);
        let producer = spawn(move || (tx.send(1), tx.send(2)));

        // Wait for the first item so the second send has to block.
        while !rx.channel.inner.lock().is_full() {
            yield_now();
        }
        drop(rx);

        let (first, second) = producer.join().unwrap();
        assert!(first);
        assert!(!second, "send into a channel with no receivers must fail");
    }

    #[test]
    fn receiving_makes_room_for_a_blocked_sender() {
        let (tx, mut rx) = channel(1);
        let producer = spawn(move || (tx.send("a"), tx.send("b")));
        assert_eq!(rx.next(), Some("a"));
        assert_eq!(rx.next(), Some("b"));
        assert_eq!(producer.join().unwrap(), (true, true));
        assert_eq!(rx.next(), None);
    }
}
