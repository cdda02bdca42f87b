//! hardware the controller drives, implemented by the firmware

//==========================================================

/// 8 digit display with 8 LEDs and 8 keys
pub trait Panel {
    /// next raw key code, '0'-'7' with bit 7 set on release
    fn poll(&mut self) -> Option<u8>;
    fn clear(&mut self);
    /// write text starting at a digit, a '.' lights the decimal point of
    /// the digit before it
    fn write_at(&mut self, cursor: u8, text: &str);
    fn set_led(&mut self, index: u8, on: bool);
    /// blink rate in 1/100 second, 0 for steady
    fn blink(&mut self, rate: u8);
}

/// audible key feedback
pub trait Beeper {
    /// sound for a short fixed time, timing is up to the implementation
    fn pulse(&mut self);
}
