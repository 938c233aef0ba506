use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::address::{self, Region};
use crate::codes::CROP_CATEGORIES;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerRecord {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub business_name: String,
    pub zip_code: String,
    pub road_address: String,
    pub jibun_address: String, // authoritative for region parsing
    pub address_detail: String,
    pub can_receive_mail: bool,
    pub age_group: String,
    pub farming_types: FarmingTypes,
    pub main_crop: MainCrop,
    pub equipments: Vec<EquipmentRecord>,
    pub rating: u8,
    pub memo: String,
    #[serde(skip)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip)]
    pub updated_at: Option<NaiveDateTime>,
}

impl FarmerRecord {
    /// Region tokens derived from the lot-number address. Never stored.
    pub fn region(&self) -> Region {
        address::parse(&self.jibun_address)
    }

    pub fn display_address(&self) -> &str {
        if self.jibun_address.is_empty() {
            &self.road_address
        } else {
            &self.jibun_address
        }
    }

    pub fn image_refs(&self) -> Vec<String> {
        self.equipments
            .iter()
            .flat_map(|e| {
                e.images
                    .iter()
                    .chain(e.attachments.iter().flat_map(|a| a.images.iter()))
            })
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmingTypes {
    pub water_paddy: bool,
    pub field_farming: bool,
    pub orchard: bool,
    pub livestock: bool,
    pub forage_crop: bool,
}

impl FarmingTypes {
    /// Flag for a farming-type code; unknown codes are never set.
    pub fn is_set(&self, code: &str) -> bool {
        match code {
            "waterPaddy" => self.water_paddy,
            "fieldFarming" => self.field_farming,
            "orchard" => self.orchard,
            "livestock" => self.livestock,
            "forageCrop" => self.forage_crop,
            _ => false,
        }
    }

    pub fn set(&mut self, code: &str, value: bool) {
        match code {
            "waterPaddy" => self.water_paddy = value,
            "fieldFarming" => self.field_farming = value,
            "orchard" => self.orchard = value,
            "livestock" => self.livestock = value,
            "forageCrop" => self.forage_crop = value,
            _ => {}
        }
    }

    pub fn selected(&self) -> Vec<&'static str> {
        crate::codes::FARMING_TYPES
            .codes()
            .filter(|code| self.is_set(code))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropSelection {
    pub category: &'static str,
    pub selected: bool,
    pub details: Vec<String>,
}

/// One selection per main-crop category, always in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainCrop(Vec<CropSelection>);

impl Default for MainCrop {
    fn default() -> Self {
        Self(
            CROP_CATEGORIES
                .codes()
                .map(|category| CropSelection {
                    category,
                    selected: false,
                    details: Vec::new(),
                })
                .collect(),
        )
    }
}

impl MainCrop {
    pub fn get(&self, category: &str) -> Option<&CropSelection> {
        self.0.iter().find(|c| c.category == category)
    }

    /// Details are dropped when the category is not selected.
    pub fn set(&mut self, category: &str, selected: bool, details: Vec<String>) {
        if let Some(entry) = self.0.iter_mut().find(|c| c.category == category) {
            entry.selected = selected;
            entry.details = if selected { details } else { Vec::new() };
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CropSelection> {
        self.0.iter()
    }

    pub fn selected(&self) -> impl Iterator<Item = &CropSelection> {
        self.iter().filter(|c| c.selected)
    }
}

impl Serialize for MainCrop {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            selected: bool,
            details: &'a [String],
        }

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for c in &self.0 {
            map.serialize_entry(
                c.category,
                &Entry {
                    selected: c.selected,
                    details: &c.details,
                },
            )?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    New,
    Used,
}

impl SaleType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "new" => Some(Self::New),
            "used" => Some(Self::Used),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Used => "used",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    #[default]
    Available,
    Reserved,
    Completed,
}

impl SaleStatus {
    /// Anything unrecognized counts as available.
    pub fn from_code(code: &str) -> Self {
        match code {
            "reserved" => Self::Reserved,
            "completed" => Self::Completed,
            _ => Self::Available,
        }
    }

    pub fn parse_strict(code: &str) -> Option<Self> {
        match code {
            "available" => Some(Self::Available),
            "reserved" => Some(Self::Reserved),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub manufacturer: String,
    pub model: String,
    pub condition: u8,
    pub sale_type: Option<SaleType>,
    pub trade_type: String,
    pub desired_price: String,
    pub sale_status: SaleStatus,
    pub images: Vec<String>,
    pub attachments: Vec<AttachmentRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub manufacturer: String,
    pub model: String,
    pub condition: u8,
    pub memo: String,
    pub images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_crop_default_has_every_category() {
        let crops = MainCrop::default();
        assert_eq!(crops.iter().count(), 7);
        assert!(crops.iter().all(|c| !c.selected && c.details.is_empty()));
    }

    #[test]
    fn test_main_crop_unselected_drops_details() {
        let mut crops = MainCrop::default();
        crops.set("fruits", false, vec!["apple".into()]);
        assert!(crops.get("fruits").unwrap().details.is_empty());

        crops.set("fruits", true, vec!["apple".into(), "pear".into()]);
        let fruits = crops.get("fruits").unwrap();
        assert!(fruits.selected);
        assert_eq!(fruits.details, vec!["apple", "pear"]);
    }

    #[test]
    fn test_farming_types_unknown_code() {
        let mut types = FarmingTypes::default();
        types.set("waterPaddy", true);
        types.set("spaceFarming", true);
        assert!(types.is_set("waterPaddy"));
        assert!(!types.is_set("spaceFarming"));
        assert_eq!(types.selected(), vec!["waterPaddy"]);
    }

    #[test]
    fn test_region_comes_from_jibun_address() {
        let record = FarmerRecord {
            road_address: "전라남도 나주시 빛가람로 1".into(),
            jibun_address: "전라남도 영암군 영암읍 회문리 123".into(),
            ..Default::default()
        };
        assert_eq!(record.region().city.as_deref(), Some("영암군"));
        assert_eq!(record.display_address(), "전라남도 영암군 영암읍 회문리 123");
    }

    #[test]
    fn test_image_refs_include_attachments() {
        let record = FarmerRecord {
            equipments: vec![EquipmentRecord {
                images: vec!["a.jpg".into()],
                attachments: vec![AttachmentRecord {
                    kind: "loader".into(),
                    images: vec!["b.jpg".into()],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(record.image_refs(), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_serializes_into_document_shape() {
        let mut record = FarmerRecord {
            id: "abc".into(),
            name: "김농부".into(),
            ..Default::default()
        };
        record.main_crop.set("foodCrops", true, vec!["rice".into()]);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "김농부");
        assert!(value.get("id").is_none());
        assert_eq!(value["mainCrop"]["foodCrops"]["selected"], true);
        assert_eq!(value["mainCrop"]["foodCrops"]["details"][0], "rice");
        assert_eq!(value["farmingTypes"]["waterPaddy"], false);
    }
}
