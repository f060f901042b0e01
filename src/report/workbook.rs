use chrono::{DateTime, FixedOffset, Utc};
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::domain::{DoorStatusEvent, TelemetryReading};

pub const TELEMETRY_SHEET: &str = "Temperatura e Umidade";
pub const DOOR_SHEET: &str = "Eventos de Porta";

pub const TELEMETRY_HEADERS: [&str; 7] = [
    "Tipo",
    "Data/Hora",
    "Temperatura (°C)",
    "Umidade (%)",
    "Bateria (%)",
    "Gateway",
    "Sensor MAC",
];

pub const DOOR_HEADERS: [&str; 4] = ["Data/Hora", "Estado", "Detalhe", "Sensor MAC"];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Blank, Self::Number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

/// Sheet layout of a telemetry report, before rendering to bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportWorkbook {
    pub sheets: Vec<Sheet>,
}

/// Render a timestamp the way pt-BR `toLocaleString` does, in a fixed offset.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset)
        .format("%d/%m/%Y, %H:%M:%S")
        .to_string()
}

fn telemetry_row(reading: &TelemetryReading, offset: FixedOffset) -> Vec<Cell> {
    vec![
        Cell::Text("Leitura".to_string()),
        Cell::Text(format_timestamp(reading.timestamp, offset)),
        Cell::Number(reading.temperature),
        Cell::Number(reading.humidity),
        reading.battery_pct.into(),
        Cell::Text(reading.gateway_id.clone()),
        Cell::Text(reading.device_id.clone()),
    ]
}

fn door_row(event: &DoorStatusEvent, offset: FixedOffset) -> Vec<Cell> {
    let (state, detail) = if event.is_open {
        ("ABERTO (Virtual)", "Subida Brusca Temp")
    } else {
        ("FECHADO", "Resfriamento")
    };

    vec![
        Cell::Text(format_timestamp(event.observed_at, offset)),
        Cell::Text(state.to_string()),
        Cell::Text(detail.to_string()),
        Cell::Text(event.device_id.clone()),
    ]
}

impl ReportWorkbook {
    /// Lay out the telemetry sheet, plus the door sheet when events exist.
    #[must_use]
    pub fn build(
        readings: &[TelemetryReading],
        door_events: &[DoorStatusEvent],
        offset: FixedOffset,
    ) -> Self {
        let mut sheets = vec![Sheet {
            name: TELEMETRY_SHEET,
            headers: &TELEMETRY_HEADERS,
            rows: readings.iter().map(|r| telemetry_row(r, offset)).collect(),
        }];

        if !door_events.is_empty() {
            sheets.push(Sheet {
                name: DOOR_SHEET,
                headers: &DOOR_HEADERS,
                rows: door_events.iter().map(|e| door_row(e, offset)).collect(),
            });
        }

        Self { sheets }
    }

    /// Serialize to an `.xlsx` byte buffer.
    ///
    /// # Errors
    ///
    /// Returns the writer's error if a sheet name or cell is rejected.
    pub fn render(&self) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name)?;

            for (col, header) in sheet.headers.iter().enumerate() {
                worksheet.write_string(0, col as u16, *header)?;
            }

            for (row_idx, row) in sheet.rows.iter().enumerate() {
                let row_num = (row_idx + 1) as u32;
                for (col, cell) in row.iter().enumerate() {
                    match cell {
                        Cell::Text(text) => {
                            worksheet.write_string(row_num, col as u16, text)?;
                        }
                        Cell::Number(value) => {
                            worksheet.write_number(row_num, col as u16, *value)?;
                        }
                        Cell::Blank => {}
                    }
                }
            }
        }

        workbook.save_to_buffer()
    }
}
