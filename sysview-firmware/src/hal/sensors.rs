// Sensor-Zugriff des Boards
//
// Der ESP32-C6 hat nur den internen Temperatursensor. Die externen
// I2C-Sensoren (Feuchte, Druck, IMU, Magnetometer) sind nicht bestückt
// und melden NotPresent.

use esp_hal::tsens::TemperatureSensor;
use sysview_core::{Reading, SensorBank, SensorError, SensorId};

pub struct BoardSensors {
    temperature: TemperatureSensor<'static>,
}

impl BoardSensors {
    pub fn new(temperature: TemperatureSensor<'static>) -> Self {
        Self { temperature }
    }
}

impl SensorBank for BoardSensors {
    fn read(&mut self, sensor: SensorId) -> Result<Reading, SensorError> {
        match sensor {
            SensorId::Temperature => {
                let celsius = self.temperature.get_temperature().to_celsius();
                Ok(Reading::Temperature(celsius))
            }
            SensorId::Humidity
            | SensorId::Pressure
            | SensorId::Gyro
            | SensorId::Accelero
            | SensorId::Magneto => Err(SensorError::NotPresent),
        }
    }
}
