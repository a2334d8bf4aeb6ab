//! Message passing between Strata workers.
//!
//! Workers share no memory. Everything they learn about each other arrives
//! as a tagged message through a [`Communicator`]: halo rows, reduction
//! contributions and barrier signals. [`ChannelComm`] is the in-process
//! transport, one crossbeam inbox per worker; the trait is the seam for
//! other transports.
//!
//! On top of the point-to-point layer sit the [`collective`] operations
//! (sum-reduction to a root, barrier) and the per-generation
//! [`exchange_halos`] protocol.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod collective;
pub mod comm;
pub mod error;
pub mod halo;
pub mod message;

pub use channel::{channel_group, ChannelComm};
pub use collective::{barrier, reduce_sum};
pub use comm::{Communicator, RecvRequest, SendRequest};
pub use error::CommError;
pub use halo::exchange_halos;
pub use message::{Envelope, Payload, Tag};
