/*!
    collaborators of the node controller

    the weight sampler and the light driver are board specific, the controller only needs these two traits
*/

use embedded_hal::pwm::SetDutyCycle;
use log::*;

use crate::packet::{Rgb, FULL};


/// source of weight samples, refreshed by its own conversion cycle
pub trait Sampler {
    /// latest sample, must not block. Returning the same value again is fine
    fn latest_reading(&mut self) -> i8;
}
impl<F: FnMut() -> i8> Sampler for F {
    fn latest_reading(&mut self) -> i8 {self()}
}

/// light output, applied immediately
pub trait Actuator {
    fn set_rgb(&mut self, color: Rgb);
}
impl<T: Actuator + ?Sized> Actuator for &mut T {
    fn set_rgb(&mut self, color: Rgb) {
        (**self).set_rgb(color)
    }
}


/// RGB light driven by three PWM channels, 1023 being full duty
pub struct PwmLight<R, G, B> {
    red: R,
    green: G,
    blue: B,
}
impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> PwmLight<R, G, B> {
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self {red, green, blue}
    }
    pub fn release(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}
impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> Actuator for PwmLight<R, G, B> {
    fn set_rgb(&mut self, color: Rgb) {
        // a channel refusing its duty cycle keeps the previous one
        if self.red.set_duty_cycle_fraction(color.red.value(), FULL).is_err()
            {warn!("red channel refused duty cycle")}
        if self.green.set_duty_cycle_fraction(color.green.value(), FULL).is_err()
            {warn!("green channel refused duty cycle")}
        if self.blue.set_duty_cycle_fraction(color.blue.value(), FULL).is_err()
            {warn!("blue channel refused duty cycle")}
    }
}
