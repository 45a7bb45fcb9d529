/*!
    chain master for `std` hosts

    the master clocks one frame through the whole chain with [Master::send], while the bytes pushed out of the chain tail come back through an SPI to UART bridge read by [TailReader].

    - [frame]: wire order of a whole chain frame, and probe packets
    - [layout]: mapping between a grid of tiles and their positions in the chain
*/

/// implementation of the bus exchanges
mod networking;
/// reception of the chain tail through the serial bridge
mod tail;
pub mod frame;
pub mod layout;


pub use networking::Master;
pub use tail::*;
pub use layout::Layout;

use std::time::Duration;
use embedded_hal_async::spi::ErrorKind;
use thiserror::Error;


/// fastest SPI clock the nodes keep up with, in Hz
pub const MAX_DATA_RATE: u32 = 8_000_000;

/// error regarding chain communication
#[derive(Error, Debug)]
pub enum Error {
    #[error("problem with spi bus: {0}")]
    Spi(ErrorKind),
    #[error("problem with the tail link")]
    Link(std::io::Error),
    #[error("no frame came out of the chain in expected time")]
    Timeout,
    #[error("inconsistent frame: {0}")]
    Frame(&'static str),
    #[error("chain probe failed: {0}")]
    Probe(&'static str),
}
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Link(error)
    }
}

/// settings of a [Master]
#[derive(Clone, Debug)]
pub struct MasterConfig {
    /// packets per frame, i.e. nodes expected in the chain until probed
    pub packets: usize,
    /// maximum wait for a frame to come out of the chain
    pub timeout: Duration,
}
impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            packets: 64,
            timeout: Duration::from_secs(2),
        }
    }
}
