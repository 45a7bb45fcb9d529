/*!
    whole chain frames

    chain positions count from the node nearest to the master. The first bytes clocked are pushed the furthest, so a frame lists packets from the last node to the first, and the chain tail returns the nodes' packets in that same order.
*/

use std::vec::Vec;

use crate::packet::{Command, SensorPacket, Packet, PACKET_SIZE};
use super::Error;


/// first byte of probe packets
pub const PROBE_MARKER: u8 = 0xEE;

/// frame bytes setting each node's light, `commands[0]` going to the node nearest to the master
pub fn encode_commands(commands: &[Command]) -> Vec<u8> {
    commands.iter().rev()
        .flat_map(|command| command.encode())
        .collect()
}

/// weights of the `nodes` first nodes, from a frame out of the chain tail
pub fn decode_readings(frame: &[u8], nodes: usize) -> Result<Vec<i8>, Error> {
    if frame.len() % PACKET_SIZE != 0
        {return Err(Error::Frame("tail frame is not made of whole packets"))}
    if frame.len() < nodes * PACKET_SIZE
        {return Err(Error::Frame("tail frame is shorter than the chain"))}

    Ok(packets(&frame[.. nodes * PACKET_SIZE])
        .rev()
        .map(|packet| SensorPacket::decode(packet).weight)
        .collect())
}

/// probe frame of `count` packets, `nonce` tells our probe from stale data
pub fn probe_frame(count: usize, nonce: u8) -> Result<Vec<u8>, Error> {
    if count == 0 || count > usize::from(u8::MAX) + 1
        {return Err(Error::Probe("probe packet count must fit a byte index"))}
    Ok((0 .. count)
        .flat_map(|index| [PROBE_MARKER, index as u8, nonce, 0])
        .collect())
}

/**
    chain length from the tail frame answering [probe_frame]

    nodes keep one packet each and push the first probe packets out of the tail. If the last packet out is probe packet `v`, `count - 1 - v` nodes retained the others. If no probe packet came out, the chain is at least `count` long and `count` is returned.
*/
pub fn probe_length(frame: &[u8], count: usize, nonce: u8) -> Result<usize, Error> {
    if frame.len() != count * PACKET_SIZE
        {return Err(Error::Probe("tail frame length differs from probe frame"))}
    let Some(last) = packets(frame).last()
        else {return Err(Error::Probe("empty probe"))};

    if last[0] != PROBE_MARKER || last[2] != nonce
        {return Ok(count)}
    let escaped = usize::from(last[1]);
    if escaped >= count
        {return Err(Error::Probe("probe index out of range"))}
    Ok(count - 1 - escaped)
}

fn packets(frame: &[u8]) -> impl DoubleEndedIterator<Item = Packet> + '_ {
    frame.chunks_exact(PACKET_SIZE)
        .map(|chunk| {
            let mut packet = [0; PACKET_SIZE];
            packet.copy_from_slice(chunk);
            packet
        })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Rgb;

    #[test]
    fn furthest_node_first() {
        let near = Command::light(Rgb::RED);
        let far = Command::light(Rgb::BLUE);
        let frame = encode_commands(&[near, far]);
        assert_eq!(frame[.. 4], far.encode());
        assert_eq!(frame[4 ..], near.encode());
    }

    #[test]
    fn readings_by_position() {
        // the last node's packet comes out first
        let frame = [9, 0, 0, 0, 5, 0, 0, 0];
        assert_eq!(decode_readings(&frame, 2).unwrap(), [5, 9]);
        assert_eq!(decode_readings(&frame, 1).unwrap(), [9]);
        assert!(decode_readings(&frame, 3).is_err());
        assert!(decode_readings(&frame[.. 7], 1).is_err());
    }

    #[test]
    fn probe_lengths() {
        let count = 8;
        let nonce = 0x5a;
        let probe = probe_frame(count, nonce).unwrap();
        assert_eq!(probe[4 .. 8], [PROBE_MARKER, 1, nonce, 0]);

        // 3 nodes: their packets, then the 5 first probe packets
        let mut tail = std::vec![1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0];
        tail.extend_from_slice(&probe[.. 5 * 4]);
        assert_eq!(probe_length(&tail, count, nonce).unwrap(), 3);

        // every probe packet was retained
        assert_eq!(probe_length(&[0; 32], count, nonce).unwrap(), count);
        // stale probe from an earlier attempt
        let stale = probe_frame(count, 0x11).unwrap();
        assert_eq!(probe_length(&stale, count, nonce).unwrap(), count);

        assert!(probe_length(&tail[.. 28], count, nonce).is_err());
        assert!(probe_frame(300, nonce).is_err());
    }
}
