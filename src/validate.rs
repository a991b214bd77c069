use crate::record::SourceRecord;

/// A record excluded by the mandatory-field filter, with the fields it lacked.
#[derive(Debug)]
pub struct Dropped {
    pub record: SourceRecord,
    pub missing: Vec<String>,
}

/// Soft filter: a record is kept iff every mandatory field is present with a
/// non-empty value. Dropped records are returned so the caller can report
/// them; they are never an error.
pub fn validate(
    records: Vec<SourceRecord>,
    mandatory_fields: &[String],
) -> (Vec<SourceRecord>, Vec<Dropped>) {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for record in records {
        let missing: Vec<String> = mandatory_fields
            .iter()
            .filter(|name| {
                record
                    .get(name)
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        if missing.is_empty() {
            kept.push(record);
        } else {
            dropped.push(Dropped { record, missing });
        }
    }

    (kept, dropped)
}
