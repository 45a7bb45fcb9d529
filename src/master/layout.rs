use std::vec::Vec;

use crate::packet::{Command, Rgb};
use super::Error;


/**
    placement of the chain's nodes on a rectangular floor

    tiles are indexed row by row from the corner where the chain starts. The chain snakes through the rows: even rows run in increasing column order, odd rows come back. A bypassed tile is not wired in the chain and is skipped.
*/
#[derive(Clone, Debug)]
pub struct Layout {
    width: usize,
    height: usize,
    bypassed: Vec<bool>,
}
impl Layout {
    pub fn serpentine(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bypassed: std::vec![false; width * height],
        }
    }
    /// remove a tile from the chain
    pub fn bypass(mut self, x: usize, y: usize) -> Self {
        if let Some(tile) = self.index(x, y) {
            self.bypassed[tile] = true;
        }
        self
    }
    pub fn width(&self) -> usize {self.width}
    pub fn height(&self) -> usize {self.height}
    /// number of tiles on the floor, bypassed ones included
    pub fn tiles(&self) -> usize {self.width * self.height}
    /// number of nodes in the chain
    pub fn nodes(&self) -> usize {
        self.bypassed.iter().filter(|&&bypassed| ! bypassed).count()
    }
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height
            {return None}
        Some(y * self.width + x)
    }
    pub fn is_bypassed(&self, tile: usize) -> bool {
        self.bypassed.get(tile).copied().unwrap_or(true)
    }

    /// tile index of every node, in chain order
    pub fn chain(&self) -> Vec<usize> {
        (0 .. self.height)
            .flat_map(|y| (0 .. self.width).map(move |x|
                if y % 2 == 0 {y * self.width + x}
                else {y * self.width + self.width - 1 - x}
                ))
            .filter(|&tile| ! self.bypassed[tile])
            .collect()
    }
    /// commands in chain order from one color per tile
    pub fn commands(&self, colors: &[Rgb]) -> Result<Vec<Command>, Error> {
        if colors.len() != self.tiles()
            {return Err(Error::Frame("one color per tile expected"))}
        Ok(self.chain().into_iter()
            .map(|tile| Command::light(colors[tile]))
            .collect())
    }
    /// one weight per tile from readings in chain order, bypassed tiles read 0
    pub fn weights(&self, readings: &[i8]) -> Result<Vec<i8>, Error> {
        let chain = self.chain();
        if readings.len() != chain.len()
            {return Err(Error::Frame("one reading per node expected"))}
        let mut weights = std::vec![0; self.tiles()];
        for (&tile, &reading) in chain.iter().zip(readings) {
            weights[tile] = reading;
        }
        Ok(weights)
    }
}
impl Default for Layout {
    /// the 8x8 dance floor
    fn default() -> Self {
        Self::serpentine(8, 8)
    }
}
