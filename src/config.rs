// Dashboard configuration: sheet names, cache TTLs, the status button list
// and the desired phone-directory columns.
//
// Defaults mirror the production spreadsheet layout; a `config.json` next to
// the binary overrides any subset of fields. A malformed file logs a warning
// and falls back to the defaults rather than refusing to start.
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the exported worksheets (`<sheet>.csv`).
    pub data_dir: String,
    /// Chart aggregates sheet (per-label equipment counts).
    pub graph_sheet: String,
    /// Computer equipment sheet, header in the first row.
    pub equipment_sheet: String,
    /// Phone inventory sheet; its real header is not row 1.
    pub phone_sheet: String,
    /// Row index of the phone sheet's header.
    pub phone_header_row: usize,
    pub equipment_ttl_secs: u64,
    pub phone_ttl_secs: u64,
    /// Status toggle buttons, in display order.
    pub status_values: Vec<String>,
    /// Logical columns the phone directory wants, in display order.
    pub phone_columns: Vec<String>,
    /// Logical column the cost summary reads.
    pub cost_column: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            graph_sheet: "Web".to_string(),
            equipment_sheet: "Equipos".to_string(),
            phone_sheet: "Hoja 1".to_string(),
            phone_header_row: 3,
            equipment_ttl_secs: 1000,
            phone_ttl_secs: 300,
            status_values: [
                "ACTIVA",
                "DISPONIBLE",
                "OBSOLETA",
                "VENTA/DONAR",
                "VENDIDA",
                "DAÑADA",
                "BAJA",
                "ROBO",
            ]
            .map(String::from)
            .to_vec(),
            phone_columns: [
                "Región",
                "Número de Teléfono",
                "Plan Y Servicios contratados",
                "Ciudad",
                "Estado",
                "Empleado",
                "Puesto",
                "Departamento",
                "Marca",
                "Modelo",
                "IMEI",
                "N° SERIE",
            ]
            .map(String::from)
            .to_vec(),
            cost_column: "Costo".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file, defaulting on absence or parse failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.is_file() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("ignoring malformed {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
