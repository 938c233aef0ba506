//! The one conversion boundary between stored documents and in-memory
//! records. Stored documents are schema-flexible: any field may be missing
//! or carry the wrong type, and both produce defaults rather than errors.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

use crate::codes::{self, CROP_CATEGORIES};
use crate::models::{
    AttachmentRecord, EquipmentRecord, FarmerRecord, FarmingTypes, MainCrop, SaleStatus, SaleType,
};

/// A document as fetched from the store, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub fields: Value,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

pub fn normalize(doc: &RawDocument) -> FarmerRecord {
    let empty = Map::new();
    let obj = doc.fields.as_object().unwrap_or(&empty);

    let created_at = timestamp(obj.get("createdAt"));
    let mut updated_at = timestamp(obj.get("updatedAt"));
    if let (Some(created), Some(updated)) = (created_at, updated_at) {
        if updated < created {
            updated_at = Some(created);
        }
    }
    if updated_at.is_none() {
        updated_at = created_at;
    }

    FarmerRecord {
        id: doc.id.clone(),
        name: text(obj.get("name")),
        phone: text(obj.get("phone")),
        business_name: text(obj.get("businessName")),
        zip_code: text(obj.get("zipCode")),
        road_address: text(obj.get("roadAddress")),
        jibun_address: text(obj.get("jibunAddress")),
        address_detail: text(obj.get("addressDetail")),
        can_receive_mail: flag(obj.get("canReceiveMail")),
        age_group: text(obj.get("ageGroup")),
        farming_types: farming_types(obj.get("farmingTypes")),
        main_crop: main_crop(obj.get("mainCrop")),
        equipments: list(obj.get("equipments"))
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_object().map(|o| equipment(o, &doc.id, i)))
            .collect(),
        rating: rating(obj.get("rating")),
        memo: text(obj.get("memo")),
        created_at,
        updated_at,
    }
}

/// Normalizes a whole batch. A bad document can only ever degrade to
/// defaults, so the batch always comes back complete.
pub fn normalize_all(docs: &[RawDocument]) -> Vec<FarmerRecord> {
    docs.iter().map(normalize).collect()
}

fn equipment(obj: &Map<String, Value>, owner: &str, index: usize) -> EquipmentRecord {
    let mut id = text(obj.get("id"));
    if id.is_empty() {
        // Legacy documents carry no equipment ids; derive a stable one
        id = format!("{}-{}", owner, index);
    }

    let condition = match obj.get("condition") {
        Some(v) if !v.is_null() => rating(Some(v)),
        _ => rating(obj.get("rating")),
    };

    EquipmentRecord {
        id,
        kind: text(obj.get("type")),
        manufacturer: text(obj.get("manufacturer")),
        model: text(obj.get("model")),
        condition,
        sale_type: obj
            .get("saleType")
            .and_then(Value::as_str)
            .and_then(SaleType::from_code),
        trade_type: text(obj.get("tradeType")),
        desired_price: text(obj.get("desiredPrice")),
        sale_status: SaleStatus::from_code(&text(obj.get("saleStatus"))),
        images: images(obj.get("images")),
        attachments: list(obj.get("attachments"))
            .iter()
            .filter_map(Value::as_object)
            .map(attachment)
            .collect(),
    }
}

fn attachment(obj: &Map<String, Value>) -> AttachmentRecord {
    AttachmentRecord {
        kind: text(obj.get("type")),
        manufacturer: text(obj.get("manufacturer")),
        model: text(obj.get("model")),
        condition: rating(obj.get("condition")),
        memo: text(obj.get("memo")),
        images: images(obj.get("images")),
    }
}

fn farming_types(value: Option<&Value>) -> FarmingTypes {
    let mut types = FarmingTypes::default();
    if let Some(obj) = value.and_then(Value::as_object) {
        for code in codes::FARMING_TYPES.codes() {
            types.set(code, flag(obj.get(code)));
        }
    }
    types
}

/// Accepts the current `{cat: {selected, details}}` shape and the older
/// `{cat: bool, catDetails: [..]}` shape.
fn main_crop(value: Option<&Value>) -> MainCrop {
    let mut crops = MainCrop::default();
    let Some(obj) = value.and_then(Value::as_object) else {
        return crops;
    };

    for category in CROP_CATEGORIES.codes() {
        let (selected, details) = match obj.get(category) {
            Some(Value::Object(entry)) => (
                flag(entry.get("selected")),
                strings(entry.get("details")),
            ),
            other => (
                flag(other),
                strings(obj.get(&format!("{}Details", category))),
            ),
        };
        crops.set(category, selected, details);
    }
    crops
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn flag(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

fn rating(value: Option<&Value>) -> u8 {
    let n = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    n.clamp(0, 5) as u8
}

fn list(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

fn strings(value: Option<&Value>) -> Vec<String> {
    list(value)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Image entries are URLs, or pending uploads stored as `{url: ..}`.
fn images(value: Option<&Value>) -> Vec<String> {
    list(value)
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Object(o) => o.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn timestamp(value: Option<&Value>) -> Option<NaiveDateTime> {
    let s = value?.as_str()?.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}
