//! bit-banged driver for the TM1638 "LED&KEY" module: 8 seven segment
//! digits, 8 LEDs and 8 keys on a three wire bus

use arduino_hal::hal::{
    port,
    port::{mode, Pin},
};

//==========================================================

/// data command, auto increment address
const CMD_WRITE_AUTO: u8 = 0x40;
/// data command, fixed address
const CMD_WRITE_FIXED: u8 = 0x44;
/// data command, read keys
const CMD_READ_KEYS: u8 = 0x42;
/// address command
const CMD_ADDRESS: u8 = 0xC0;
/// display control, on with brightness in the low 3 bits
const CMD_DISPLAY_ON: u8 = 0x88;
const CMD_DISPLAY_OFF: u8 = 0x80;

const DECIMAL_POINT: u8 = 0x80;

pub const DIGITS: usize = 8;

//==========================================================

/// seven segment pattern, bit 0 is segment a
fn font(c: u8) -> u8 {
    match c {
        b'0' | b'O' => 0x3F,
        b'1' => 0x06,
        b'2' => 0x5B,
        b'3' => 0x4F,
        b'4' => 0x66,
        b'5' => 0x6D,
        b'6' => 0x7D,
        b'7' => 0x07,
        b'8' => 0x7F,
        b'9' => 0x6F,
        b'-' => 0x40,
        b'A' => 0x77,
        b'C' => 0x39,
        b'E' => 0x79,
        b'F' => 0x71,
        b'H' => 0x76,
        b'N' => 0x37,
        b'R' | b'r' => 0x50,
        b'U' => 0x3E,
        b'n' => 0x54,
        b'o' => 0x5C,
        _ => 0x00,
    }
}

//==========================================================

pub struct Tm1638 {
    clk: Pin<mode::Output, port::PB0>,
    dio: Pin<mode::OpenDrain, port::PB1>,
    stb: Pin<mode::Output, port::PB2>,
    digits: [u8; DIGITS],
    /// bit n set while LED n is lit
    leds: u8,
    brightness: u8,
}

impl Tm1638 {
    pub fn new(
        clk: Pin<mode::Output, port::PB0>,
        dio: Pin<mode::OpenDrain, port::PB1>,
        stb: Pin<mode::Output, port::PB2>,
    ) -> Tm1638 {
        let mut tm = Tm1638 {
            clk,
            dio,
            stb,
            digits: [0; DIGITS],
            leds: 0,
            brightness: 3,
        };
        tm.stb.set_high();
        tm.clk.set_high();
        tm.set_visible(true);
        tm.clear();
        for i in 0..DIGITS as u8 {
            tm.set_led(i, false);
        }
        tm
    }

    fn send(&mut self, byte: u8) {
        // lsb first, data is latched on the rising clock edge
        for i in 0..8 {
            self.clk.set_low();
            if byte & (1 << i) != 0 {
                self.dio.set_high();
            } else {
                self.dio.set_low();
            }
            arduino_hal::delay_us(1);
            self.clk.set_high();
            arduino_hal::delay_us(1);
        }
    }

    fn receive(&mut self) -> u8 {
        let mut byte = 0;
        for i in 0..8 {
            self.clk.set_low();
            arduino_hal::delay_us(1);
            if self.dio.is_high() {
                byte |= 1 << i;
            }
            self.clk.set_high();
            arduino_hal::delay_us(1);
        }
        byte
    }

    fn command(&mut self, cmd: u8) {
        self.stb.set_low();
        self.send(cmd);
        self.stb.set_high();
    }

    /// push the digit buffer to the module
    fn flush_digits(&mut self) {
        self.command(CMD_WRITE_AUTO);
        self.stb.set_low();
        self.send(CMD_ADDRESS);
        for i in 0..DIGITS {
            let seg = self.digits[i];
            self.send(seg);
            // the LED byte sits between digits
            self.send((self.leds >> i) & 1);
        }
        self.stb.set_high();
    }

    /// blank all digits
    pub fn clear(&mut self) {
        self.digits = [0; DIGITS];
        self.flush_digits();
    }

    /// write text starting at a digit, a '.' lights the decimal point of
    /// the previous digit
    pub fn write_at(&mut self, cursor: u8, text: &str) {
        let mut pos = cursor as usize;
        for c in text.bytes() {
            if c == b'.' {
                if pos > 0 && pos <= DIGITS {
                    self.digits[pos - 1] |= DECIMAL_POINT;
                }
                continue;
            }
            if pos >= DIGITS {
                break;
            }
            self.digits[pos] = font(c);
            pos += 1;
        }
        self.flush_digits();
    }

    pub fn set_led(&mut self, index: u8, on: bool) {
        if index as usize >= DIGITS {
            return;
        }
        if on {
            self.leds |= 1 << index;
        } else {
            self.leds &= !(1 << index);
        }
        self.command(CMD_WRITE_FIXED);
        self.stb.set_low();
        self.send(CMD_ADDRESS | (index * 2 + 1));
        self.send(on as u8);
        self.stb.set_high();
    }

    /// display on or off, used for blinking
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.command(CMD_DISPLAY_ON | self.brightness);
        } else {
            self.command(CMD_DISPLAY_OFF);
        }
    }

    /// bitmap of the keys held down, bit n for key n
    pub fn read_keys(&mut self) -> u8 {
        self.stb.set_low();
        self.send(CMD_READ_KEYS);
        // let the module drive the line
        self.dio.set_high();
        arduino_hal::delay_us(2);
        let mut keys = 0;
        for i in 0..4 {
            let b = self.receive();
            // byte i holds key i in bit 0 and key i+4 in bit 4
            keys |= (b & 0x11) << i;
        }
        self.stb.set_high();
        keys
    }
}
