/*!
    4-byte packets exchanged on the chain

    the same 4-byte shape travels both ways:

    - [Command] from the master toward the nodes: 2 opcode bits then the red, green and blue 10-bit intensities, MSB first across the 4 bytes
    - [SensorPacket] from the nodes toward the master: one signed weight byte then 3 reserved zero bytes
*/

use bilge::prelude::*;
use packbytes::{FromBytes, ToBytes};

use crate::pack_bilge;


/// bytes in every packet on the wire, this is also the relay delay each node adds
pub const PACKET_SIZE: usize = 4;

/// raw packet as shifted through the chain, byte 0 transmitted first
pub type Packet = [u8; PACKET_SIZE];

/// full intensity of a light channel
pub const FULL: u16 = 1023;


/// 10-bit intensities of the three light channels
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub red: u10,
    pub green: u10,
    pub blue: u10,
}
impl Rgb {
    pub const OFF: Self = Self::gray(u10::new(0));
    pub const RED: Self = Self {red: u10::new(FULL), green: u10::new(0), blue: u10::new(0)};
    pub const GREEN: Self = Self {red: u10::new(0), green: u10::new(FULL), blue: u10::new(0)};
    pub const BLUE: Self = Self {red: u10::new(0), green: u10::new(0), blue: u10::new(FULL)};

    pub const fn gray(level: u10) -> Self {
        Self {red: level, green: level, blue: level}
    }
    /// build from plain integers, `None` if any channel exceeds 1023
    pub fn new(red: u16, green: u16, blue: u16) -> Option<Self> {
        if red > FULL || green > FULL || blue > FULL
            {return None}
        Some(Self {
            red: u10::new(red),
            green: u10::new(green),
            blue: u10::new(blue),
            })
    }
    /// build from plain integers, saturating channels at 1023
    pub fn saturating(red: u16, green: u16, blue: u16) -> Self {
        Self {
            red: u10::new(red.min(FULL)),
            green: u10::new(green.min(FULL)),
            blue: u10::new(blue.min(FULL)),
        }
    }
}


/// light command addressed to one node, fields are listed from the least significant bits
#[bitsize(32)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq)]
pub struct Command {
    pub blue: u10,
    pub green: u10,
    pub red: u10,
    /// kind of command, only 0 (set light) exists and nodes ignore it
    pub opcode: u2,
}
pack_bilge!(Command);

impl Command {
    /// command setting the node's light
    pub fn light(color: Rgb) -> Self {
        Self::new(color.blue, color.green, color.red, u2::new(0))
    }
    /// color carried by this command
    pub fn color(&self) -> Rgb {
        Rgb {
            red: self.red(),
            green: self.green(),
            blue: self.blue(),
        }
    }
    pub fn encode(self) -> Packet {
        self.to_be_bytes()
    }
    pub fn decode(packet: Packet) -> Self {
        Self::from_be_bytes(packet)
    }
}


/// weight sample sent back by a node
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromBytes, ToBytes)]
pub struct SensorPacket {
    /// signed weight sample, as produced by the node's sampler
    pub weight: i8,
    reserved: [u8; 3],
}
impl SensorPacket {
    pub fn new(weight: i8) -> Self {
        Self {weight, reserved: [0; 3]}
    }
    pub fn encode(self) -> Packet {
        self.to_be_bytes()
    }
    /// reserved bytes are not checked
    pub fn decode(packet: Packet) -> Self {
        Self::new(Self::from_be_bytes(packet).weight)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rgb(red: u16, green: u16, blue: u16) -> Rgb {
        Rgb::new(red, green, blue).unwrap()
    }

    #[test]
    fn command_layout() {
        assert_eq!(Command::light(rgb(1023, 0, 0)).encode(), [0x3f, 0xf0, 0x00, 0x00]);
        assert_eq!(Command::light(rgb(0, 1023, 0)).encode(), [0x00, 0x0f, 0xfc, 0x00]);
        assert_eq!(Command::light(rgb(0, 0, 1023)).encode(), [0x00, 0x00, 0x03, 0xff]);
        assert_eq!(Command::light(rgb(0x155, 0x2aa, 0x0f0)).encode(), [0x15, 0x5a, 0xa8, 0xf0]);
    }

    #[test]
    fn opcode_bits_do_not_leak_into_red() {
        let command = Command::decode([0xc0, 0x00, 0x00, 0x00]);
        assert_eq!(command.opcode(), u2::new(3));
        assert_eq!(command.color(), Rgb::OFF);

        let command = Command::decode([0xff, 0xff, 0xff, 0xff]);
        assert_eq!(command.color(), rgb(1023, 1023, 1023));
    }

    #[test]
    fn sensor_layout() {
        assert_eq!(SensorPacket::new(5).encode(), [0x05, 0, 0, 0]);
        assert_eq!(SensorPacket::new(-1).encode(), [0xff, 0, 0, 0]);
        assert_eq!(SensorPacket::new(i8::MIN).encode(), [0x80, 0, 0, 0]);
        // trailing garbage is ignored
        assert_eq!(SensorPacket::decode([0x09, 1, 2, 3]), SensorPacket::new(9));
    }

    #[test]
    fn every_weight_survives() {
        for weight in i8::MIN ..= i8::MAX {
            assert_eq!(SensorPacket::decode(SensorPacket::new(weight).encode()).weight, weight);
        }
    }

    #[test]
    fn primaries_are_full_channels() {
        assert_eq!(Rgb::RED, rgb(FULL, 0, 0));
        assert_eq!(Rgb::GREEN, rgb(0, FULL, 0));
        assert_eq!(Rgb::BLUE, rgb(0, 0, FULL));
        assert_eq!(Rgb::OFF, rgb(0, 0, 0));
        assert_eq!(Rgb::RED.red.value(), 1023);
    }

    #[test]
    fn rgb_range() {
        assert_eq!(Rgb::new(1024, 0, 0), None);
        assert_eq!(Rgb::saturating(5000, 12, 1023), rgb(1023, 12, 1023));
    }

    proptest! {
        #[test]
        fn command_survives(red in 0u16 .. 1024, green in 0u16 .. 1024, blue in 0u16 .. 1024) {
            let color = rgb(red, green, blue);
            prop_assert_eq!(Command::decode(Command::light(color).encode()).color(), color);
        }

        #[test]
        fn command_matches_host_packing(red in 0u16 .. 1024, green in 0u16 .. 1024, blue in 0u16 .. 1024) {
            // packing used by the floor host software
            let expected = [
                (red >> 4) as u8,
                (((red & 0x0f) << 4) | (green >> 6)) as u8,
                (((green & 0x3f) << 2) | (blue >> 8)) as u8,
                (blue & 0xff) as u8,
                ];
            prop_assert_eq!(Command::light(rgb(red, green, blue)).encode(), expected);
        }
    }
}
