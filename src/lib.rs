/*!
    daisy-chained tile bus

    Identical nodes, each with a weight sensor and an RGB light, are chained on one synchronous serial bus. In one scan the master pushes a light command to every node and collects every node's weight sample.

    - [packet]: the 4-byte packets in both directions
    - [transport]: bucket-brigade relay, run by the interrupt handlers of a node (feature `node`)
    - [node]: main loop controller of a node (feature `node`)
    - [master]: chain scanner for the host (feature `master`)
*/
#![no_std]
#[cfg(any(feature = "std", test))]
extern crate std;

mod utils;

pub mod config;
pub mod packet;
#[cfg(feature = "node")]
pub mod link;
#[cfg(feature = "node")]
pub mod transport;
#[cfg(feature = "node")]
pub mod peripherals;
#[cfg(feature = "node")]
pub mod node;
#[cfg(feature = "master")]
pub mod master;

pub use bilge::prelude::{u2, u10};
