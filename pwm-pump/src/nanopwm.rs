//! timer 0 fast pwm with the period set by OCR0A, output on OC0B (D5)
//!
//! With TOP at `PWM_TOP` one duty step is half a percent of speed.

pub use arduino_hal::{
    hal::{
        port,
        port::{mode, Pin},
    },
    pac,
};
pub use avr_hal_generic::pwm::Prescaler;
use pwm_pump_core::config::PWM_TOP;

pub struct Timer0Pwm {
    _timer: pac::TC0,
}

impl Timer0Pwm {
    pub fn new(timer: pac::TC0, prescaler: Prescaler) -> Timer0Pwm {
        // mode 7, fast pwm counting up to OCR0A
        timer.tccr0a.modify(|_, w| w.wgm0().pwm_fast());
        timer.tccr0b.modify(|_, w| w.wgm02().set_bit());
        unsafe { timer.ocr0a.write(|w| w.bits(PWM_TOP)) };
        unsafe { timer.ocr0b.write(|w| w.bits(0)) };
        timer.tccr0b.modify(|_, w| match prescaler {
            Prescaler::Direct => w.cs0().direct(),
            Prescaler::Prescale8 => w.cs0().prescale_8(),
            Prescaler::Prescale64 => w.cs0().prescale_64(),
            Prescaler::Prescale256 => w.cs0().prescale_256(),
            Prescaler::Prescale1024 => w.cs0().prescale_1024(),
        });
        Timer0Pwm { _timer: timer }
    }
}

//==========================================================

pub struct PwmPin<PIN> {
    _pin: PIN,
}
type PwmDuty = u8;

impl PwmPin<Pin<mode::Output, port::PD5>> {
    pub fn into_pwm(
        pin: Pin<mode::Output, port::PD5>,
        _pwm_timer: &mut Timer0Pwm,
    ) -> PwmPin<Pin<mode::Output, port::PD5>> {
        PwmPin { _pin: pin }
    }
}

impl embedded_hal::PwmPin for PwmPin<Pin<mode::Output, port::PD5>> {
    type Duty = PwmDuty;

    fn enable(&mut self) {
        avr_device::interrupt::free(|_| {
            let tim = unsafe { &*<pac::TC0>::ptr() };
            tim.tccr0a.modify(|_, w| w.com0b().match_clear());
        })
    }

    fn disable(&mut self) {
        avr_device::interrupt::free(|_| {
            let tim = unsafe { &*<pac::TC0>::ptr() };
            tim.tccr0a.modify(|_, w| w.com0b().disconnected());
        })
    }

    fn get_duty(&self) -> PwmDuty {
        unsafe { (&*<pac::TC0>::ptr()) }.ocr0b.read().bits() as PwmDuty
    }

    fn get_max_duty(&self) -> PwmDuty {
        PWM_TOP
    }

    fn set_duty(&mut self, duty: PwmDuty) {
        let duty = duty.min(PWM_TOP);
        unsafe { (&*<pac::TC0>::ptr()).ocr0b.write(|w| w.bits(duty)) };
    }
}
