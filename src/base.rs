mod channel;
mod counter;
mod merge;
mod receiver;
mod sender;

pub use channel::{channel, Channel, ChannelFactory};
pub use counter::{
    add, combine, combine_by, divide, multiply, subtract, Counter, Counts, EmptyCounterError,
};
pub use merge::{merge_keys, spawn_merge_keys, KeyStream, MergeKeys, MERGE_CHANNEL_CAPACITY};
pub use receiver::Receiver;
pub use sender::Sender;
