//! Export service: CSV snapshot of all registrants for an event.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::persistence::{ExportRow, PgStore};

/// UTF-8 byte-order mark. Prefixed to the CSV so spreadsheet software
/// renders accented characters correctly.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Fixed CSV header, in the contract's column order.
const CSV_HEADER: [&str; 12] = [
    "slug",
    "titulo",
    "nombre",
    "apellidos",
    "email",
    "telefono",
    "institucion",
    "carrera_o_area",
    "temas_interes",
    "consentimiento",
    "asistencia_marcarda_en",
    "creado_en",
];

/// A finished export: file bytes plus the attachment filename.
#[derive(Debug, Clone)]
pub struct CsvExport {
    /// Attachment filename: `registros_<slug>_<YYYYMMDD_HHMMSS>.csv`.
    pub filename: String,
    /// BOM-prefixed UTF-8 CSV bytes.
    pub bytes: Vec<u8>,
}

/// Produces CSV snapshots of an event's registrants.
#[derive(Debug, Clone)]
pub struct ExportService {
    store: PgStore,
}

impl ExportService {
    /// Creates a new `ExportService`.
    #[must_use]
    pub fn new(store: PgStore) -> Self {
        Self { store }
    }

    /// Exports all registrations for the event with the given slug,
    /// ordered by registration creation time descending.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] when `slug` is empty.
    /// - [`AppError::Capacity`] / [`AppError::Store`] on store failure.
    pub async fn export_csv(&self, slug: &str) -> Result<CsvExport, AppError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(AppError::Validation("Falta slug".to_string()));
        }

        let rows = self.store.export_rows(slug).await?;
        let bytes = build_csv(&rows)?;
        let filename = export_filename(slug, Utc::now());

        tracing::info!(%slug, rows = rows.len(), "csv exportado");
        Ok(CsvExport { filename, bytes })
    }
}

/// Builds the BOM-prefixed CSV: one header row plus one row per
/// registration, in the order the rows were fetched.
///
/// # Errors
///
/// Returns [`AppError::Store`] if the writer fails (out of memory is the
/// only realistic cause).
pub fn build_csv(rows: &[ExportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::Store(e.to_string()))?;

    for row in rows {
        let asistencia = fmt_timestamp(row.asistencia_marcarda_en);
        let creado = fmt_timestamp(Some(row.creado_en));
        writer
            .write_record([
                row.slug.as_str(),
                row.titulo.as_str(),
                row.nombre.as_str(),
                row.apellidos.as_str(),
                row.email.as_str(),
                row.telefono.as_deref().unwrap_or(""),
                row.institucion.as_deref().unwrap_or(""),
                row.carrera_o_area.as_deref().unwrap_or(""),
                row.temas_interes.as_deref().unwrap_or(""),
                if row.consentimiento { "1" } else { "0" },
                asistencia.as_str(),
                creado.as_str(),
            ])
            .map_err(|e| AppError::Store(e.to_string()))?;
    }

    let inner = writer
        .into_inner()
        .map_err(|e| AppError::Store(e.to_string()))?;

    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + inner.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(&inner);
    Ok(bytes)
}

/// Attachment filename embedding the slug and the generation timestamp.
#[must_use]
pub fn export_filename(slug: &str, now: DateTime<Utc>) -> String {
    format!("registros_{slug}_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn fmt_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(nombre: &str, email: &str, creado_en: DateTime<Utc>) -> ExportRow {
        ExportRow {
            slug: "ponencia-ia-ago2025".to_string(),
            titulo: "Ponencia de IA".to_string(),
            nombre: nombre.to_string(),
            apellidos: "López Muñoz".to_string(),
            email: email.to_string(),
            telefono: None,
            institucion: Some("UNAM".to_string()),
            carrera_o_area: None,
            temas_interes: Some("IA, visión".to_string()),
            consentimiento: true,
            asistencia_marcarda_en: Some(creado_en),
            creado_en,
        }
    }

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 20, 18, 30, secs)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn csv_starts_with_bom_and_header() {
        let Ok(bytes) = build_csv(&[]) else {
            panic!("expected csv");
        };
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.trim_start_matches('\u{feff}').starts_with(
            "slug,titulo,nombre,apellidos,email,telefono,institucion,\
             carrera_o_area,temas_interes,consentimiento,asistencia_marcarda_en,creado_en"
        ));
    }

    #[test]
    fn csv_has_one_row_per_registration_in_order() {
        let rows = vec![
            row("Carla", "carla@x.com", ts(3)),
            row("Berta", "berta@x.com", ts(2)),
            row("Ana", "ana@x.com", ts(1)),
        ];
        let Ok(bytes) = build_csv(&rows) else {
            panic!("expected csv");
        };
        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        // Fetch order (creado_en DESC) is preserved verbatim.
        assert!(lines.get(1).is_some_and(|l| l.contains("Carla")));
        assert!(lines.get(2).is_some_and(|l| l.contains("Berta")));
        assert!(lines.get(3).is_some_and(|l| l.contains("Ana")));
    }

    #[test]
    fn accented_characters_survive_as_utf8() {
        let rows = vec![row("Águeda", "agueda@x.com", ts(1))];
        let Ok(bytes) = build_csv(&rows) else {
            panic!("expected csv");
        };
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Águeda"));
        assert!(text.contains("López Muñoz"));
    }

    #[test]
    fn consent_and_absent_fields_render_as_expected() {
        let mut r = row("Ana", "ana@x.com", ts(1));
        r.consentimiento = false;
        r.asistencia_marcarda_en = None;
        let Ok(bytes) = build_csv(&[r]) else {
            panic!("expected csv");
        };
        let text = String::from_utf8_lossy(&bytes);
        // telefono, carrera_o_area and asistencia render as empty cells,
        // consent as 0.
        assert!(text.contains(",,"));
        assert!(text.contains(",0,"));
    }

    #[test]
    fn filename_embeds_slug_and_timestamp() {
        let name = export_filename("ponencia-ia-ago2025", ts(5));
        assert_eq!(name, "registros_ponencia-ia-ago2025_20250820_183005.csv");
    }
}
