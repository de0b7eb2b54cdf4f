use std::path::PathBuf;
use anyhow::{anyhow, Context};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use crate::models::photo_cache_entry::VenuePhotoUpdate;

pub const PLACE_ID_COLUMN: &str = "gmaps_place_id";
pub const PHOTO_REF_COLUMN: &str = "gmaps_primary_photo_ref";
pub const ATTRIBUTION_COLUMN: &str = "gmaps_photo_attribution";
pub const PLACES_ATTRIBUTION: &str = "Photo from Google Places API";

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCoverage {
    pub total: usize,
    pub with_photos: usize,
    pub without_photos: usize,
    pub photo_coverage: u32,
}

/// Reads and rewrites the venue CSV on disk. Rewrites are serialized.
pub struct VenueCsvRepo {
    csv_path: PathBuf,
    write_lock: Mutex<()>,
}

struct CsvRow {
    cells: Vec<String>,
    /// Cells past the last header, written back after every named column.
    overflow: Vec<String>,
}

struct CsvTable {
    headers: Vec<String>,
    rows: Vec<CsvRow>,
}

impl CsvTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == name)
    }

    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in self.rows.iter_mut() {
            row.cells.push(String::new());
        }
        self.headers.len() - 1
    }
}

impl VenueCsvRepo {
    pub fn new(csv_path: PathBuf) -> Self {
        Self {
            csv_path,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_table(&self) -> anyhow::Result<CsvTable> {
        let content = tokio::fs::read_to_string(&self.csv_path)
            .await
            .with_context(|| format!("Failed to read {}", self.csv_path.display()))?;

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::None)
            .from_reader(content.as_bytes());
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record: StringRecord = record?;
            if record.iter().all(|value| value.trim().is_empty()) {
                continue;
            }
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            let overflow = if cells.len() > headers.len() {
                warn!(
                    "Row {} of {} has {} cells for {} columns, keeping the extras at the end",
                    rows.len() + 1,
                    self.csv_path.display(),
                    cells.len(),
                    headers.len()
                );
                cells.split_off(headers.len())
            } else {
                cells.resize(headers.len(), String::new());
                Vec::new()
            };
            rows.push(CsvRow { cells, overflow });
        }

        Ok(CsvTable { headers, rows })
    }

    async fn write_table(&self, table: &CsvTable) -> anyhow::Result<()> {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.cells.iter().chain(row.overflow.iter()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV buffer: {}", e))?;

        tokio::fs::write(&self.csv_path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", self.csv_path.display()))
    }

    /// Copies place ids and photo references onto rows whose name and address
    /// match exactly. Returns how many rows changed.
    pub async fn merge_photo_updates(&self, updates: &[VenuePhotoUpdate]) -> anyhow::Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.read_table().await?;

        let name_idx = table
            .column("name")
            .ok_or_else(|| anyhow!("Venue CSV has no name column"))?;
        let address_idx = table
            .column("address")
            .ok_or_else(|| anyhow!("Venue CSV has no address column"))?;
        let place_idx = table.ensure_column(PLACE_ID_COLUMN);
        let photo_idx = table.ensure_column(PHOTO_REF_COLUMN);
        let attribution_idx = table.ensure_column(ATTRIBUTION_COLUMN);

        let mut updated = 0;
        for row in table.rows.iter_mut() {
            let update = updates.iter().find(|update| {
                row.cells[name_idx] == update.venue_name
                    && row.cells[address_idx] == update.venue_address
            });
            if let Some(update) = update {
                row.cells[place_idx] = update.place_id.clone();
                row.cells[photo_idx] = update.photo_reference.clone();
                row.cells[attribution_idx] = PLACES_ATTRIBUTION.to_string();
                updated += 1;
            }
        }

        self.write_table(&table).await?;
        info!("Updated {} venues in {} with photo data", updated, self.csv_path.display());
        Ok(updated)
    }

    pub async fn photo_coverage(&self) -> anyhow::Result<PhotoCoverage> {
        let table = self.read_table().await?;
        let total = table.rows.len();
        let with_photos = match table.column(PHOTO_REF_COLUMN) {
            Some(idx) => table
                .rows
                .iter()
                .filter(|row| !row.cells[idx].trim().is_empty())
                .count(),
            None => 0,
        };
        let photo_coverage = if total == 0 {
            0
        } else {
            ((with_photos as f64 / total as f64) * 100.0).round() as u32
        };

        Ok(PhotoCoverage {
            total,
            with_photos,
            without_photos: total - with_photos,
            photo_coverage,
        })
    }
}
