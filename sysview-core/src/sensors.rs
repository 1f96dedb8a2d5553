//! Sensor-Werte und ihre Text-Ausgabe
//!
//! Die Treiber selbst liegen hinter `SensorBank`. Hier werden nur die
//! letzten Messwerte gesammelt und für die Shell formatiert.

use core::fmt::{self, Write};

/// Die über die Shell abfragbaren Sensoren
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorId {
    Temperature,
    Humidity,
    Pressure,
    Gyro,
    Magneto,
    Accelero,
}

impl SensorId {
    pub const ALL: [SensorId; 6] = [
        SensorId::Temperature,
        SensorId::Humidity,
        SensorId::Pressure,
        SensorId::Gyro,
        SensorId::Accelero,
        SensorId::Magneto,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SensorId::Temperature => "temperature",
            SensorId::Humidity => "humidity",
            SensorId::Pressure => "pressure",
            SensorId::Gyro => "gyro",
            SensorId::Magneto => "magneto",
            SensorId::Accelero => "accelero",
        }
    }
}

/// Shell-Schlüsselwort → Sensor (`get <key>`)
impl TryFrom<&str> for SensorId {
    type Error = ();

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        SensorId::ALL
            .into_iter()
            .find(|sensor| sensor.as_str() == key)
            .ok_or(())
    }
}

/// Ergebnis einer einzelnen Sensor-Abfrage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// HTS221 Temperatur in °C
    Temperature(f32),
    /// HTS221 relative Feuchte in %
    Humidity(f32),
    /// LPS22HB Druck in mbar und dessen Temperatur in °C
    Pressure { pressure: f32, temperature: f32 },
    /// LSM6DSL Drehrate XYZ
    Gyro([f32; 3]),
    /// LSM6DSL Beschleunigung XYZ (Rohwerte)
    Accelero([i16; 3]),
    /// LIS3MDL Magnetfeld XYZ (Rohwerte)
    Magneto([i16; 3]),
}

/// Letzte bekannte Werte aller Sensoren
///
/// Wird nur durch explizite Abfragen aktualisiert. Ein fehlgeschlagener
/// Read lässt die alten Werte stehen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
    pub pressure_temperature: f32,
    pub gyro: [f32; 3],
    pub accelero: [i16; 3],
    pub magneto: [i16; 3],
}

impl SensorReading {
    /// Übernimmt einen neuen Messwert
    pub fn apply(&mut self, reading: Reading) {
        match reading {
            Reading::Temperature(value) => self.temperature = value,
            Reading::Humidity(value) => self.humidity = value,
            Reading::Pressure {
                pressure,
                temperature,
            } => {
                self.pressure = pressure;
                self.pressure_temperature = temperature;
            }
            Reading::Gyro(xyz) => self.gyro = xyz,
            Reading::Accelero(xyz) => self.accelero = xyz,
            Reading::Magneto(xyz) => self.magneto = xyz,
        }
    }

    /// Schreibt die Werte eines Sensors zeilenweise (`\r\n`) nach `out`
    pub fn write_report<W: Write>(&self, sensor: SensorId, out: &mut W) -> fmt::Result {
        match sensor {
            SensorId::Temperature => {
                write!(out, "1-TEMPERATURE = {:.2} C\r\n", self.temperature)
            }
            SensorId::Humidity => write!(out, "1-HUMIDITY = {:2.0} %\r\n", self.humidity),
            SensorId::Pressure => {
                write!(out, "2-PRESSURE = {:.2} mBar\r\n", self.pressure)?;
                write!(out, "2-TEMPERATURE = {:.2} C\r\n", self.pressure_temperature)
            }
            SensorId::Gyro => write_axes(out, "3-GYRO", &self.gyro),
            SensorId::Accelero => write_axes(out, "3-ACCELERO", &self.accelero),
            SensorId::Magneto => write_axes(out, "4-MAGNETO", &self.magneto),
        }
    }

    /// Alle Sensoren in fester Reihenfolge
    pub fn write_full_report<W: Write>(&self, out: &mut W) -> fmt::Result {
        SensorId::ALL
            .into_iter()
            .try_for_each(|sensor| self.write_report(sensor, out))
    }

    /// Eine CSV-Zeile mit 13 Signalen für einen Serial-Plotter
    pub fn write_plot_line<W: Write>(&self, out: &mut W) -> fmt::Result {
        let [gx, gy, gz] = self.gyro;
        let [ax, ay, az] = self.accelero;
        let [mx, my, mz] = self.magneto;
        write!(
            out,
            "{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{},{},{},{},{},{}\r\n",
            self.temperature,
            self.humidity,
            self.pressure,
            self.pressure_temperature,
            gx,
            gy,
            gz,
            ax,
            ay,
            az,
            mx,
            my,
            mz
        )
    }
}

/// Gyro mit zwei Nachkommastellen, Rohwerte ganzzahlig
trait AxisValue {
    fn write_value<W: Write>(&self, out: &mut W) -> fmt::Result;
}

impl AxisValue for f32 {
    fn write_value<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{:.2}", self)
    }
}

impl AxisValue for i16 {
    fn write_value<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{}", self)
    }
}

fn write_axes<W: Write, T: AxisValue>(out: &mut W, label: &str, xyz: &[T; 3]) -> fmt::Result {
    for (axis, value) in ["X", "Y", "Z"].into_iter().zip(xyz) {
        write!(out, "{}_{} = ", label, axis)?;
        value.write_value(out)?;
        out.write_str("\r\n")?;
    }
    Ok(())
}
