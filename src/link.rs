/*!
    hand-off between the interrupt handlers and the main loop

    the controller never touches the shift buffer, it only exchanges whole packets with the transport:

    - `received`: a mailbox written by the transport when a frame completes, and emptied by the controller. A newer frame replaces a packet not taken yet, so the controller always decodes the latest command
    - `injected`: a single-producer single-consumer queue filled by the controller with the next outgoing packet, drained by the transport when the next frame starts

    a slow side can only miss updates, never block or tear a packet
*/

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use heapless::spsc::{Queue, Producer, Consumer};
use crate::packet::Packet;


/// heapless keeps one slot empty, this makes single packet queues
const SLOTS: usize = 2;

/// single packet overwritten by its producer, a packet fits one atomic word so it cannot tear
struct Mailbox {
    packet: AtomicU32,
    full: AtomicBool,
}
impl Mailbox {
    const fn new() -> Self {
        Self {
            packet: AtomicU32::new(0),
            full: AtomicBool::new(false),
        }
    }
    /// returns false if an unread packet was replaced
    fn post(&self, packet: Packet) -> bool {
        let replaced = self.full.load(Ordering::Acquire);
        self.packet.store(u32::from_ne_bytes(packet), Ordering::Release);
        self.full.store(true, Ordering::Release);
        ! replaced
    }
    fn take(&self) -> Option<Packet> {
        if ! self.full.load(Ordering::Acquire)
            {return None}
        // cleared before reading: a packet posted meanwhile is either read now or flagged again
        self.full.store(false, Ordering::Release);
        Some(self.packet.load(Ordering::Acquire).to_ne_bytes())
    }
    fn is_full(&self) -> bool {
        self.full.load(Ordering::Acquire)
    }
}

/// storage for the two hand-off channels, must outlive both ends
pub struct Link {
    received: Mailbox,
    injected: Queue<Packet, SLOTS>,
}
/// end of the link owned by the transport, used from interrupt context
pub struct BusEnd<'l> {
    received: &'l Mailbox,
    injected: Consumer<'l, Packet, SLOTS>,
}
/// end of the link owned by the controller, used from the main loop
pub struct NodeEnd<'l> {
    received: &'l Mailbox,
    injected: Producer<'l, Packet, SLOTS>,
}

impl Link {
    pub const fn new() -> Self {
        Self {
            received: Mailbox::new(),
            injected: Queue::new(),
        }
    }
    pub fn split(&mut self) -> (BusEnd<'_>, NodeEnd<'_>) {
        let received = &self.received;
        let (injected_tx, injected_rx) = self.injected.split();
        (
            BusEnd {received, injected: injected_rx},
            NodeEnd {received, injected: injected_tx},
        )
    }
}
impl Default for Link {
    fn default() -> Self {Self::new()}
}

impl BusEnd<'_> {
    /// newest packet injected since last call
    pub(crate) fn take_injected(&mut self) -> Option<Packet> {
        let mut newest = None;
        while let Some(packet) = self.injected.dequeue() {
            newest = Some(packet);
        }
        newest
    }
    /// hand a completed frame's packet over, false if it replaced one the controller did not take
    pub(crate) fn publish(&mut self, packet: Packet) -> bool {
        self.received.post(packet)
    }
}

impl NodeEnd<'_> {
    /// true when a completed frame waits for decoding
    pub fn frame_ready(&self) -> bool {
        self.received.is_full()
    }
    /// packet addressed to this node by the last completed frame, if not taken yet
    pub fn take_frame(&mut self) -> Option<Packet> {
        self.received.take()
    }
    /**
        stage the packet to emit at the start of the next frame

        returns false if the previously staged packet was not picked up by a frame start yet, it is then kept and relayed instead
    */
    pub fn inject(&mut self, packet: Packet) -> bool {
        self.injected.enqueue(packet).is_ok()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_frame_wins() {
        let mut link = Link::new();
        let (mut bus, mut node) = link.split();

        assert!(! node.frame_ready());
        assert!(bus.publish([1, 1, 1, 1]));
        assert!(node.frame_ready());
        assert!(! bus.publish([2, 2, 2, 2]));
        assert_eq!(node.take_frame(), Some([2, 2, 2, 2]));
        assert!(! node.frame_ready());
        assert_eq!(node.take_frame(), None);
    }

    #[test]
    fn newest_injection_wins() {
        let mut link = Link::new();
        let (mut bus, mut node) = link.split();

        assert_eq!(bus.take_injected(), None);
        assert!(node.inject([3, 0, 0, 0]));
        assert!(! node.inject([4, 0, 0, 0]));
        assert_eq!(bus.take_injected(), Some([3, 0, 0, 0]));
        assert!(node.inject([5, 0, 0, 0]));
        assert_eq!(bus.take_injected(), Some([5, 0, 0, 0]));
    }
}
