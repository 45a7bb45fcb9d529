#![allow(dead_code)]

//! software chain of nodes, clocked byte by byte like the bus would

use tilebus::{
    link::Link,
    transport::{ShiftTransport, FrameError},
    node::Node,
    packet::{Command, Rgb},
    peripherals::{Sampler, Actuator},
    };


/// weight sensor whose reading is set by the test
pub struct Scale {
    pub weight: i8,
}
impl Sampler for Scale {
    fn latest_reading(&mut self) -> i8 {self.weight}
}

/// light remembering what it was set to
#[derive(Default)]
pub struct Lamp {
    pub color: Option<Rgb>,
    pub updates: usize,
}
impl Actuator for Lamp {
    fn set_rgb(&mut self, color: Rgb) {
        self.color = Some(color);
        self.updates += 1;
    }
}

pub struct SimNode<const CAP: usize> {
    pub transport: ShiftTransport<'static, CAP>,
    pub node: Node<'static, Scale, Lamp>,
}

/// `nodes[0]` is wired to the master, the last one to the tail
pub struct Chain<const CAP: usize> {
    pub nodes: Vec<SimNode<CAP>>,
}

impl<const CAP: usize> Chain<CAP> {
    pub fn new(weights: &[i8]) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let nodes = weights.iter().map(|&weight| {
            let link = Box::leak(Box::new(Link::new()));
            let (bus, end) = link.split();
            SimNode {
                transport: ShiftTransport::new(bus),
                node: Node::new(end, Scale {weight}, Lamp::default()),
            }
        }).collect();
        Self {nodes}
    }
    pub fn len(&self) -> usize {self.nodes.len()}

    pub fn select(&mut self) {
        for sim in &mut self.nodes {
            sim.transport.frame_select();
        }
    }
    /// one byte exchange on every node at once, returns the byte coming out of the tail
    pub fn clock(&mut self, byte: u8) -> u8 {
        let mut carry = byte;
        for sim in &mut self.nodes {
            // a node shifts out what was armed before this edge
            let emitted = sim.transport.armed();
            sim.transport.byte_clock(carry);
            carry = emitted;
        }
        carry
    }
    pub fn deselect(&mut self) -> Vec<Result<(), FrameError>> {
        self.nodes.iter_mut()
            .map(|sim| sim.transport.frame_deselect())
            .collect()
    }
    /// run every controller once, returns the commands they applied
    pub fn poll(&mut self) -> Vec<Option<Command>> {
        self.nodes.iter_mut()
            .map(|sim| sim.node.poll())
            .collect()
    }

    /// one whole frame without running the controllers, returns the tail bytes
    pub fn frame(&mut self, bytes: &[u8]) -> Vec<u8> {
        self.select();
        let tail = bytes.iter().map(|&byte| self.clock(byte)).collect();
        for result in self.deselect() {
            result.expect("frame refused");
        }
        tail
    }
    /// one frame followed by a pass of every controller
    pub fn scan(&mut self, bytes: &[u8]) -> Vec<u8> {
        let tail = self.frame(bytes);
        self.poll();
        tail
    }

    pub fn set_weight(&mut self, node: usize, weight: i8) {
        self.nodes[node].node.sampler_mut().weight = weight;
    }
    pub fn lamp(&self, node: usize) -> &Lamp {
        self.nodes[node].node.actuator()
    }
}

/// frame bytes addressing `colors[i]` to node `i`
pub fn light_frame(colors: &[Rgb]) -> Vec<u8> {
    colors.iter().rev()
        .flat_map(|&color| Command::light(color).encode())
        .collect()
}
