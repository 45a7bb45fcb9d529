use serial2_tokio::{SerialPort, CharSize, StopBits, Parity};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncBufReadExt, BufReader};
use std::{
    path::Path,
    time::Duration,
    vec::Vec,
    };


/// bytes sent by the bridge after each frame
pub const TERMINATOR: [u8; 4] = *b"stop";
/// default baud rate of the bridge
pub const BRIDGE_RATE: u32 = 57_600;

/**
    reader of the chain tail

    the SPI to UART bridge listens to the last node's output, and forwards every byte clocked during a frame followed by [TERMINATOR] once frame-select is released
*/
pub struct TailReader<R> {
    link: BufReader<R>,
}

impl TailReader<SerialPort> {
    /// open the serial port the bridge is connected to
    pub fn open(path: impl AsRef<Path>, rate: u32) -> Result<Self, std::io::Error> {
        let port = SerialPort::open(path, |mut settings: serial2_tokio::Settings| {
                settings.set_raw();
                settings.set_baud_rate(rate)?;
                settings.set_char_size(CharSize::Bits8);
                settings.set_stop_bits(StopBits::One);
                settings.set_parity(Parity::None);
                Ok(settings)
                })?;
        Ok(Self::new(port))
    }
}

impl<R: AsyncRead + Unpin> TailReader<R> {
    pub fn new(link: R) -> Self {
        Self {link: BufReader::new(link)}
    }
    /// skip everything until the end of the current frame, to start reading on a frame boundary
    pub async fn synchronize(&mut self) -> Result<(), std::io::Error> {
        let mut window = [0u8; TERMINATOR.len()];
        self.link.read_exact(&mut window).await?;
        // shift byte by byte until the terminator is caught
        while window != TERMINATOR {
            window.rotate_left(1);
            self.link.read_exact(&mut window[TERMINATOR.len()-1 ..]).await?;
        }
        Ok(())
    }
    /// drop every byte already received without waiting for more, returns how many were dropped
    pub async fn flush(&mut self) -> Result<usize, std::io::Error> {
        let mut dropped = self.link.buffer().len();
        self.link.consume(dropped);
        let mut chunk = [0u8; 64];
        loop {
            // zero timeout: the read is polled once, and abandoned if it would wait
            match tokio::time::timeout(Duration::ZERO, self.link.get_mut().read(&mut chunk)).await {
                Ok(Ok(0)) | Err(_) => break,
                Ok(Ok(size)) => dropped += size,
                Ok(Err(error)) => return Err(error),
            }
        }
        Ok(dropped)
    }
    /// bytes of the next frame, without terminator
    pub async fn read_frame(&mut self) -> Result<Vec<u8>, std::io::Error> {
        let mut frame = Vec::new();
        while ! frame.ends_with(&TERMINATOR) {
            frame.push(self.link.read_u8().await?);
        }
        frame.truncate(frame.len() - TERMINATOR.len());
        Ok(frame)
    }
    pub fn into_inner(self) -> R {
        self.link.into_inner()
    }
}
