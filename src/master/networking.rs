use embedded_hal_async::spi::{SpiDevice, Error as _};
use tokio::io::AsyncRead;
use log::*;
use std::vec::Vec;

use crate::packet::{Command, PACKET_SIZE};
use super::{
    Error, MasterConfig,
    tail::TailReader,
    frame,
    };


/**
    chain master

    frames are clocked out on an SPI device, whose chip select is the chain's frame-select. Frames coming out of the chain tail are read back from the bridge with a [TailReader].

    the chain length defaults to [MasterConfig::packets] and can be discovered with [Self::probe]
*/
pub struct Master<B, R> {
    bus: B,
    tail: TailReader<R>,
    config: MasterConfig,
    /// nodes currently expected in the chain
    nodes: usize,
}

impl<B: SpiDevice, R: AsyncRead + Unpin> Master<B, R> {
    pub fn new(bus: B, tail: TailReader<R>, config: MasterConfig) -> Self {
        let nodes = config.packets;
        Self {bus, tail, config, nodes}
    }
    pub fn nodes(&self) -> usize {self.nodes}
    pub fn config(&self) -> &MasterConfig {&self.config}
    pub fn bus(&self) -> &B {&self.bus}
    pub fn bus_mut(&mut self) -> &mut B {&mut self.bus}

    /// clock one frame setting every node's light, `commands[0]` going to the node nearest to the master
    pub async fn send(&mut self, commands: &[Command]) -> Result<(), Error> {
        if commands.len() != self.nodes
            {return Err(Error::Frame("one command per node expected"))}
        self.transmit(&frame::encode_commands(commands)).await
    }
    /// weights of all nodes from the next frame out of the chain tail, in chain order
    pub async fn receive(&mut self) -> Result<Vec<i8>, Error> {
        let frame = self.receive_frame().await?;
        // the bridge may have caught bytes before the frame started, only the end is ours
        let start = frame.len().saturating_sub(self.nodes * PACKET_SIZE);
        frame::decode_readings(&frame[start ..], self.nodes)
    }
    /// send commands and collect the weights they pushed out
    pub async fn scan(&mut self, commands: &[Command]) -> Result<Vec<i8>, Error> {
        self.send(commands).await?;
        self.receive().await
    }

    /**
        discover the number of nodes in the chain, and use it for following frames

        when probing fails, the configured packet count is assumed
    */
    pub async fn probe(&mut self) -> usize {
        self.nodes = match self.try_probe().await {
            Ok(nodes) => {
                info!("probed chain: {} nodes connected", nodes);
                nodes
            },
            Err(error) => {
                warn!("failed to probe chain, using default node count {}: {}", self.config.packets, error);
                self.config.packets
            },
        };
        self.nodes
    }

    async fn try_probe(&mut self) -> Result<usize, Error> {
        let count = self.config.packets;
        // an unread frame would be taken for the probe answer
        let dropped = self.tail.flush().await?;
        if dropped != 0 {
            debug!("dropped {} stale tail bytes before probing", dropped);
        }
        // non zero to never look like sensor packets
        let nonce = rand::random::<u8>().max(1);
        self.transmit(&frame::probe_frame(count, nonce)?).await?;

        let timeout = self.config.timeout;
        let frame = tokio::time::timeout(timeout, async {
            loop {
                let frame = self.tail.read_frame().await?;
                if frame.len() == count * PACKET_SIZE
                    {break Ok::<_, Error>(frame)}
                debug!("skipping {} bytes frame while probing", frame.len());
            }
        }).await
            .map_err(|_| Error::Timeout)??;
        frame::probe_length(&frame, count, nonce)
    }

    async fn transmit(&mut self, frame: &[u8]) -> Result<(), Error> {
        self.bus.write(frame).await
            .map_err(|error| Error::Spi(error.kind()))
    }
    async fn receive_frame(&mut self) -> Result<Vec<u8>, Error> {
        match tokio::time::timeout(self.config.timeout, self.tail.read_frame()).await {
            Ok(frame) => Ok(frame?),
            Err(_) => Err(Error::Timeout),
        }
    }
}
