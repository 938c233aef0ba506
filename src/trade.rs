use crate::models::{EquipmentRecord, FarmerRecord, SaleStatus};

/// Equipment put up for sale or wanted for purchase, next to its owner.
#[derive(Debug, Clone, Copy)]
pub struct TradeListing<'a> {
    pub farmer: &'a FarmerRecord,
    pub equipment: &'a EquipmentRecord,
}

#[derive(Debug, Clone, Default)]
pub struct TradeQuery {
    pub trade_type: Option<String>,
    pub sale_status: Option<SaleStatus>,
    pub equipment_type: Option<String>,
}

impl TradeQuery {
    fn matches(&self, equipment: &EquipmentRecord) -> bool {
        if equipment.trade_type.trim().is_empty() {
            return false;
        }
        self.trade_type
            .as_deref()
            .is_none_or(|t| equipment.trade_type == t)
            && self.sale_status.is_none_or(|s| equipment.sale_status == s)
            && self
                .equipment_type
                .as_deref()
                .is_none_or(|t| equipment.kind == t)
    }
}

/// Trade board entries in registry order, then equipment order.
pub fn listings<'a>(
    records: impl IntoIterator<Item = &'a FarmerRecord>,
    query: &TradeQuery,
) -> Vec<TradeListing<'a>> {
    records
        .into_iter()
        .flat_map(|farmer| {
            farmer
                .equipments
                .iter()
                .filter(move |e| query.matches(e))
                .map(move |equipment| TradeListing { farmer, equipment })
        })
        .collect()
}

/// Updates one machine's sale status. Returns false if the record has no
/// equipment with that id.
pub fn set_sale_status(record: &mut FarmerRecord, equipment_id: &str, status: SaleStatus) -> bool {
    match record.equipments.iter_mut().find(|e| e.id == equipment_id) {
        Some(equipment) => {
            equipment.sale_status = status;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(id: &str, kind: &str, trade: &str, status: SaleStatus) -> EquipmentRecord {
        EquipmentRecord {
            id: id.into(),
            kind: kind.into(),
            trade_type: trade.into(),
            sale_status: status,
            ..Default::default()
        }
    }

    fn records() -> Vec<FarmerRecord> {
        vec![
            FarmerRecord {
                id: "a".into(),
                equipments: vec![
                    machine("a1", "tractor", "sale", SaleStatus::Available),
                    machine("a2", "combine", "", SaleStatus::Available),
                ],
                ..Default::default()
            },
            FarmerRecord {
                id: "b".into(),
                equipments: vec![
                    machine("b1", "tractor", "purchase", SaleStatus::Available),
                    machine("b2", "forklift", "sale", SaleStatus::Completed),
                ],
                ..Default::default()
            },
        ]
    }

    fn ids(listings: &[TradeListing]) -> Vec<String> {
        listings.iter().map(|l| l.equipment.id.clone()).collect()
    }

    #[test]
    fn test_untraded_equipment_is_not_listed() {
        let records = records();
        let all = listings(&records, &TradeQuery::default());
        assert_eq!(ids(&all), vec!["a1", "b1", "b2"]);
        assert_eq!(all[1].farmer.id, "b");
    }

    #[test]
    fn test_query_narrows_listings() {
        let records = records();
        let query = TradeQuery {
            trade_type: Some("sale".into()),
            sale_status: Some(SaleStatus::Available),
            ..Default::default()
        };
        assert_eq!(ids(&listings(&records, &query)), vec!["a1"]);

        let query = TradeQuery {
            equipment_type: Some("tractor".into()),
            ..Default::default()
        };
        assert_eq!(ids(&listings(&records, &query)), vec!["a1", "b1"]);
    }

    #[test]
    fn test_set_sale_status() {
        let mut records = records();
        assert!(set_sale_status(&mut records[0], "a1", SaleStatus::Reserved));
        assert_eq!(records[0].equipments[0].sale_status, SaleStatus::Reserved);
        assert!(!set_sale_status(&mut records[0], "zz", SaleStatus::Reserved));
    }
}
