/*!
    bucket-brigade shift transport, the interrupt side of a node

    The node is a slave on a synchronous serial bus shared by the whole chain. The master asserts frame-select for one scan of the chain, and each byte exchanged raises a byte-clock event. A node emits the byte it received exactly [PACKET_SIZE] byte slots earlier while it receives a new one, so every node delays the stream by one packet:

    ```text
    master -> [node 0] -> [node 1] -> ... -> [node N-1] -> tail
    ```

    - at frame-select, the node's injection window (the packet behind the cursor) is filled with its outgoing packet, so this packet is the first thing it emits
    - each byte-clock appends the received byte at the cursor and arms the byte one packet behind it
    - at the end of a frame of `4*N` bytes, the packet behind the cursor is the one addressed to this node, the master having sent the packet for the furthest node first

    [ShiftTransport::frame_select], [ShiftTransport::byte_clock] and [ShiftTransport::frame_deselect] are meant to be called from the highest priority interrupt handlers. They are constant time, except the rare rebase copying one packet, and they never touch memory owned by the main loop: completed frames and outgoing packets go through the [BusEnd] of a [Link](crate::link::Link).

    A frame deselected in the middle of a byte only counts the bytes whose byte-clock fired, the bus driver is expected to reset its bit counter on deselect.
*/

use crate::{
    link::BusEnd,
    packet::{Packet, PACKET_SIZE},
    };


/// position of the transport in a frame
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameState {
    /// no frame seen yet, or the last one was dropped
    Idle,
    /// frame-select asserted, bytes are relayed
    Receiving,
    /// the last frame was complete and handed to the controller
    FrameComplete,
}

/// refused frame, the transport already recovered when this is returned
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// frame-select released after a byte count that is not a nonzero multiple of [PACKET_SIZE]
    Malformed { clocked: usize },
}

/// counters of noteworthy transport events, they wrap around
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// frames completed with a valid length
    pub frames: u32,
    /// frames dropped because of their length
    pub malformed: u32,
    /// completed frames replaced by a newer one before the controller took them
    pub missed: u32,
    /// times the cursor reached the buffer end and was moved back to its start
    pub rebased: u32,
}

/**
    shift register of one node

    `CAPACITY` is the size of the history buffer, see [buffer_size](crate::config::buffer_size)
*/
pub struct ShiftTransport<'l, const CAPACITY: usize> {
    /// bytes in flight, the packet behind `cursor` is the injection window
    shift: [u8; CAPACITY],
    /// next free slot, always in `PACKET_SIZE .. CAPACITY`
    cursor: usize,
    /// bytes clocked since frame-select
    clocked: usize,
    state: FrameState,
    /// byte loaded in the bus data register, to be emitted on the next byte exchange
    armed: u8,
    /// last packet injected by the controller, emitted again if nothing newer comes
    outgoing: Packet,
    link: BusEnd<'l>,
    stats: TransportStats,
}

impl<'l, const CAPACITY: usize> ShiftTransport<'l, CAPACITY> {
    pub fn new(link: BusEnd<'l>) -> Self {
        const { assert!(CAPACITY >= 2 * PACKET_SIZE, "shift buffer must hold at least two packets") };
        Self {
            shift: [0; CAPACITY],
            cursor: PACKET_SIZE,
            clocked: 0,
            state: FrameState::Idle,
            armed: 0,
            outgoing: [0; PACKET_SIZE],
            link,
            stats: TransportStats::default(),
        }
    }

    /// frame-select asserted: start a frame, returns the first byte to emit
    pub fn frame_select(&mut self) -> u8 {
        if let Some(packet) = self.link.take_injected() {
            self.outgoing = packet;
        }
        let window = self.cursor - PACKET_SIZE;
        self.shift[window .. self.cursor].copy_from_slice(&self.outgoing);
        self.clocked = 0;
        self.state = FrameState::Receiving;
        self.armed = self.shift[window];
        self.armed
    }

    /**
        byte-clock: a byte was exchanged, `incoming` is the byte received

        returns the next byte to emit. Out of a frame nothing is captured and the armed byte is left unchanged.
    */
    pub fn byte_clock(&mut self, incoming: u8) -> u8 {
        if self.state != FrameState::Receiving
            {return self.armed}

        self.shift[self.cursor] = incoming;
        self.cursor += 1;
        if self.cursor == CAPACITY {
            // only the newest packet is still needed for the relay, keep it contiguous at the start
            self.shift.copy_within(CAPACITY - PACKET_SIZE .., 0);
            self.cursor = PACKET_SIZE;
            self.stats.rebased = self.stats.rebased.wrapping_add(1);
        }
        self.clocked = self.clocked.wrapping_add(1);
        self.armed = self.shift[self.cursor - PACKET_SIZE];
        self.armed
    }

    /**
        frame-select released: close the frame

        a frame of a valid length hands its trailing packet to the controller. A malformed frame is dropped, the cursor stays where the relay left it. Releasing outside of a frame does nothing.
    */
    pub fn frame_deselect(&mut self) -> Result<(), FrameError> {
        if self.state != FrameState::Receiving
            {return Ok(())}

        let clocked = self.clocked;
        if clocked == 0 || clocked % PACKET_SIZE != 0 {
            self.state = FrameState::Idle;
            self.stats.malformed = self.stats.malformed.wrapping_add(1);
            return Err(FrameError::Malformed {clocked});
        }
        self.state = FrameState::FrameComplete;
        self.stats.frames = self.stats.frames.wrapping_add(1);
        if ! self.link.publish(self.trailing()) {
            self.stats.missed = self.stats.missed.wrapping_add(1);
        }
        Ok(())
    }

    /// the packet right behind the cursor: the addressed command after a complete frame
    pub fn trailing(&self) -> Packet {
        let mut packet = [0; PACKET_SIZE];
        packet.copy_from_slice(&self.shift[self.cursor - PACKET_SIZE .. self.cursor]);
        packet
    }
    pub fn state(&self) -> FrameState {self.state}
    pub fn cursor(&self) -> usize {self.cursor}
    /// bytes clocked since the last frame-select
    pub fn clocked(&self) -> usize {self.clocked}
    /// byte that will be emitted on the next exchange
    pub fn armed(&self) -> u8 {self.armed}
    pub fn stats(&self) -> TransportStats {self.stats}
}
