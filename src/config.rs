/*!
    chain sizing constants

    the shift buffer of a node is sized at compile time from the longest chain it must support, a firmware picks its capacity with [buffer_size]

    ```ignore
    static mut LINK: Link = Link::new();
    type Transport = ShiftTransport<'static, { buffer_size(64) }>;
    ```
*/

use crate::packet::PACKET_SIZE;


/// longest chain supported by default: a 64 tiles floor with some room
pub const MAX_CHAIN: usize = 96;

/// shift buffer capacity for the default maximum chain length
pub const BUFFER_SIZE: usize = buffer_size(MAX_CHAIN);

/// shift buffer capacity needed to hold one packet per node of a chain of `max_chain` nodes
///
/// never less than two packets: the relay needs the injection window plus room to advance
pub const fn buffer_size(max_chain: usize) -> usize {
    let size = PACKET_SIZE * max_chain;
    if size < 2 * PACKET_SIZE
        {2 * PACKET_SIZE}
    else
        {size}
}
