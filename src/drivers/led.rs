// RingTap: Bicolor LED Driver
//
// Red and blue dies on two LEDC channels sharing one timer.

use esp_idf_hal::ledc::LedcDriver;

use ringtap::led::LedColor;

pub struct BicolorLed {
    red: LedcDriver<'static>,
    blue: LedcDriver<'static>,
}

impl BicolorLed {
    pub fn new(red: LedcDriver<'static>, blue: LedcDriver<'static>) -> Self {
        Self { red, blue }
    }

    pub fn apply(&mut self, color: LedColor) -> anyhow::Result<()> {
        set_percent(&mut self.red, color.red)?;
        set_percent(&mut self.blue, color.blue)?;
        Ok(())
    }
}

/// Scale a 0..=100 percentage onto the channel's duty resolution.
pub fn set_percent(channel: &mut LedcDriver<'static>, percent: u8) -> anyhow::Result<()> {
    let max = channel.get_max_duty();
    let duty = max * u32::from(percent.min(100)) / 100;
    channel.set_duty(duty)?;
    Ok(())
}
