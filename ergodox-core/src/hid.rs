//! Traits and types for HID message reporting.

use core::future::Future;

pub use usbd_hid::descriptor::{
    KeyboardReport, MediaKey, MediaKeyboardReport, MouseReport, SystemControlKey, SystemControlReport,
};
use usbd_hid::descriptor::{AsInputReport, BufferOverflow};

/// All report flavors the engine can emit. The transport picks the matching
/// HID endpoint/report id when writing.
pub enum Report {
    /// Normal keyboard hid report
    KeyboardReport(KeyboardReport),
    /// Mouse hid report
    MouseReport(MouseReport),
    /// Media keyboard report
    MediaKeyboardReport(MediaKeyboardReport),
    /// System control report
    SystemControlReport(SystemControlReport),
}

impl AsInputReport for Report {
    fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BufferOverflow> {
        match self {
            Report::KeyboardReport(r) => r.serialize(buffer),
            Report::MouseReport(r) => r.serialize(buffer),
            Report::MediaKeyboardReport(r) => r.serialize(buffer),
            Report::SystemControlReport(r) => r.serialize(buffer),
        }
    }
}

/// Errors surfaced by a report transport
#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    TransportDisabled,
    BufferOverflow,
    ReportSerializeError,
    Disconnected,
}

/// HidReporter drains processed reports and writes them to the host.
///
/// The engine itself only fills the report channel; the concrete transport
/// (USB, BLE, a test harness) implements `get_report`/`write_report` and
/// drives `run_reporter`.
pub trait HidReporter {
    /// The report type that the reporter receives from input processors.
    type ReportType: AsInputReport;

    /// Get the report to be sent to the host
    fn get_report(&mut self) -> impl Future<Output = Self::ReportType>;

    /// Run the reporter task.
    fn run_reporter(&mut self) -> impl Future<Output = ()> {
        async {
            loop {
                let report = self.get_report().await;
                if let Err(e) = self.write_report(report).await {
                    error!("failed to write hid report: {:?}", e);
                }
            }
        }
    }

    /// Write report to the host, return the number of bytes written if success.
    fn write_report(&mut self, report: Self::ReportType) -> impl Future<Output = Result<usize, HidError>>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn report_serializes_as_the_inner_report() {
        let report = Report::KeyboardReport(KeyboardReport {
            modifier: 0x02,
            reserved: 0,
            leds: 0,
            keycodes: [0x04, 0, 0, 0, 0, 0],
        });

        let mut buffer = [0u8; 16];
        let n = report.serialize(&mut buffer).unwrap();
        // modifier, reserved, then the six keycodes; leds is an output field
        assert_eq!(n, 8);
        assert_eq!(&buffer[..n], &[0x02, 0, 0x04, 0, 0, 0, 0, 0]);

        let report = Report::MediaKeyboardReport(MediaKeyboardReport {
            usage_id: MediaKey::VolumeIncrement as u16,
        });
        let n = report.serialize(&mut buffer).unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            u16::from_le_bytes([buffer[0], buffer[1]]),
            MediaKey::VolumeIncrement as u16
        );
    }
}
