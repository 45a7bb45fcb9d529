/*!
    node controller, the main loop side of a node

    each time the transport completes a frame, the controller decodes the command addressed to this node, applies it to the light, then stages the latest weight sample as the packet this node emits during the next frame.

    ```ignore
    let (bus, link) = LINK.split();
    // bus goes to the interrupt handlers through a ShiftTransport
    let mut node = Node::new(link, sampler, light);
    loop {
        node.poll();
    }
    ```
*/

use embedded_hal::delay::DelayNs;
use log::*;

use crate::{
    link::NodeEnd,
    packet::{Command, SensorPacket, Packet, Rgb},
    peripherals::{Sampler, Actuator},
    };


/// step of the controller state machine, it has no terminal state
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// nothing to do until the transport completes a frame
    AwaitFrame,
    /// a frame completed, carrying this packet for us
    DecodeAndApply(Packet),
    /// the command was applied, the next outgoing packet must be staged
    InjectNextPacket,
}

pub struct Node<'l, S, A> {
    link: NodeEnd<'l>,
    sampler: S,
    actuator: A,
    phase: Phase,
    /// packet last handed to the transport
    injected: Packet,
    /// command applied since the last poll
    applied: Option<Command>,
}

impl<'l, S: Sampler, A: Actuator> Node<'l, S, A> {
    /// create a controller, staging a first sample so the very first frame already carries it
    pub fn new(link: NodeEnd<'l>, sampler: S, actuator: A) -> Self {
        let mut new = Self {
            link,
            sampler,
            actuator,
            phase: Phase::AwaitFrame,
            injected: SensorPacket::default().encode(),
            applied: None,
        };
        new.inject_next_packet();
        new
    }

    /**
        advance the state machine by one transition, and return the new phase

        this allows a main loop to interleave other work between transitions, [Self::poll] runs them all at once
    */
    pub fn step(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::AwaitFrame => match self.link.take_frame() {
                Some(packet) => Phase::DecodeAndApply(packet),
                None => Phase::AwaitFrame,
            },
            Phase::DecodeAndApply(packet) => {
                self.decode_and_apply(packet);
                Phase::InjectNextPacket
            },
            Phase::InjectNextPacket => {
                self.inject_next_packet();
                Phase::AwaitFrame
            },
        };
        self.phase
    }

    /// handle the pending frame if any, returns the command applied
    pub fn poll(&mut self) -> Option<Command> {
        while self.step() != Phase::AwaitFrame {}
        self.applied.take()
    }

    /// light green, blue and red in turn for `step_ms` each, then switch off
    pub fn self_test(&mut self, delay: &mut impl DelayNs, step_ms: u32) {
        for color in [Rgb::GREEN, Rgb::BLUE, Rgb::RED] {
            self.actuator.set_rgb(color);
            delay.delay_ms(step_ms);
        }
        self.actuator.set_rgb(Rgb::OFF);
    }

    fn decode_and_apply(&mut self, packet: Packet) {
        let command = Command::decode(packet);
        trace!("applying {:?}", command);
        self.actuator.set_rgb(command.color());
        self.applied = Some(command);
    }

    fn inject_next_packet(&mut self) {
        let packet = SensorPacket::new(self.sampler.latest_reading()).encode();
        if self.link.inject(packet) {
            self.injected = packet;
        }
        else {
            debug!("previous packet not relayed yet, {:?} is dropped", packet);
        }
    }

    pub fn phase(&self) -> Phase {self.phase}
    /// packet the transport will emit at the next frame, unless a newer one is staged before
    pub fn injected(&self) -> Packet {self.injected}
    pub fn sampler(&self) -> &S {&self.sampler}
    pub fn sampler_mut(&mut self) -> &mut S {&mut self.sampler}
    pub fn actuator(&self) -> &A {&self.actuator}
    pub fn actuator_mut(&mut self) -> &mut A {&mut self.actuator}
}
