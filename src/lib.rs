//! Sparse, default-valued numeric maps for frequency counts and
//! unnormalized distributions.
//!
//! ```
//! use tally::Counter;
//!
//! let mut c: Counter = "the cat saw the dog".split(' ').map(String::from).collect();
//! assert_eq!(c.get(&"the".to_string()), 2.0);
//! assert_eq!(c.get(&"bird".to_string()), 0.0);
//!
//! c.normalize();
//! assert_eq!(c.arg_max().unwrap(), ("the".to_string(), 0.4));
//! ```
//!
//! Binary operations (`+ - * /`) work over the union of both operands'
//! keys, base values included:
//!
//! ```
//! use tally::{add, Counter};
//!
//! let mut a = Counter::new(1.0);
//! a.set("x".to_string(), 3.0);
//! let mut b = Counter::new(0.5);
//! b.set("y".to_string(), 2.0);
//!
//! let c = add(&a, &b);
//! assert_eq!(c.base(), 1.5);
//! assert_eq!(c.get(&"x".to_string()), 3.5);
//! assert_eq!(c.get(&"y".to_string()), 3.0);
//! ```

pub mod base;

pub use base::{add, combine, divide, multiply, subtract, Counter, Counts, EmptyCounterError};
