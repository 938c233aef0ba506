use std::io::Write;

use anyhow::{Context, Result};

use crate::codes::{self, CROP_CATEGORIES, EQUIPMENT_TYPES, FARMING_TYPES, MANUFACTURERS};
use crate::models::FarmerRecord;

const HEADERS: [&str; 14] = [
    "이름",
    "전화번호",
    "상호",
    "우편번호",
    "지번주소",
    "도로명주소",
    "상세주소",
    "우편수신",
    "연령대",
    "영농형태",
    "주작물",
    "보유장비",
    "평점",
    "등록일",
];

/// Writes one row per farmer, enum columns resolved to their labels.
pub fn write_csv<'a, W: Write>(
    writer: W,
    records: impl IntoIterator<Item = &'a FarmerRecord>,
) -> Result<usize> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HEADERS)?;

    let mut rows = 0;
    for record in records {
        out.write_record(row(record))
            .with_context(|| format!("Failed to write row for {}", record.id))?;
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}

fn row(record: &FarmerRecord) -> Vec<String> {
    vec![
        record.name.clone(),
        record.phone.clone(),
        record.business_name.clone(),
        record.zip_code.clone(),
        record.jibun_address.clone(),
        record.road_address.clone(),
        record.address_detail.clone(),
        if record.can_receive_mail { "O" } else { "X" }.to_string(),
        record.age_group.clone(),
        farming_summary(record),
        crop_summary(record),
        equipment_summary(record),
        record.rating.to_string(),
        record
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    ]
}

pub fn farming_summary(record: &FarmerRecord) -> String {
    record
        .farming_types
        .selected()
        .into_iter()
        .map(|code| FARMING_TYPES.label(code))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `채소(마늘, 양파), 과수` style summary of the selected crops.
pub fn crop_summary(record: &FarmerRecord) -> String {
    record
        .main_crop
        .selected()
        .map(|crop| {
            let category = CROP_CATEGORIES.label(crop.category);
            if crop.details.is_empty() {
                return category.to_string();
            }
            let details: Vec<&str> = match codes::crop_details(crop.category) {
                Some(table) => crop.details.iter().map(|d| table.label(d)).collect(),
                None => crop.details.iter().map(String::as_str).collect(),
            };
            format!("{}({})", category, details.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `트랙터 대동 NX550` per machine, separated by ` / `.
pub fn equipment_summary(record: &FarmerRecord) -> String {
    record
        .equipments
        .iter()
        .map(|e| {
            [
                EQUIPMENT_TYPES.label(&e.kind),
                MANUFACTURERS.label(&e.manufacturer),
                e.model.as_str(),
            ]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, RawDocument};
    use serde_json::json;

    fn record() -> FarmerRecord {
        normalize(&RawDocument::new(
            "f1",
            json!({
                "name": "김농부",
                "phone": "010-1234-5678",
                "jibunAddress": "전라남도 영암군 영암읍 회문리 123",
                "canReceiveMail": true,
                "farmingTypes": {"waterPaddy": true, "orchard": true},
                "mainCrop": {
                    "foodCrops": {"selected": true, "details": ["rice", "wildRice"]},
                    "fruits": {"selected": true, "details": []}
                },
                "equipments": [
                    {"type": "tractor", "manufacturer": "daedong", "model": "NX550"},
                    {"type": "drone", "manufacturer": "", "model": "X1"}
                ],
                "createdAt": "2024-03-05 12:00:00"
            }),
        ))
    }

    #[test]
    fn test_summaries_use_labels_and_pass_unknowns_through() {
        let record = record();
        assert_eq!(farming_summary(&record), "수도작, 과수원");
        assert_eq!(crop_summary(&record), "식량작물(벼, wildRice), 과수");
        assert_eq!(equipment_summary(&record), "트랙터 대동 NX550 / drone X1");
    }

    #[test]
    fn test_write_csv() {
        let records = vec![record(), FarmerRecord::default()];
        let mut buf = Vec::new();
        let rows = write_csv(&mut buf, &records).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("이름,전화번호,상호"));
        assert!(lines[1].starts_with("김농부,010-1234-5678,"));
        assert!(lines[1].contains("2024-03-05"));
        assert!(lines[1].contains(",O,"));
    }

    #[test]
    fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farmers.csv");
        let file = std::fs::File::create(&path).unwrap();
        write_csv(file, &vec![record()]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "김농부");
        assert_eq!(&rows[0][9], "수도작, 과수원");
    }
}
