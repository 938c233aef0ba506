use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::codes::CITIES;
use crate::models::FarmerRecord;

pub const ALL_CITIES: &str = "all";

/// Chart-ready counts per region, sorted by farmer count descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoStats {
    pub labels: Vec<String>,
    pub customers: Vec<u64>,
    pub equipment: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartScale {
    pub y_axis_max: u64,
    pub tick_step: u64,
}

const TICKS: u64 = 8;

impl GeoStats {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, u64, u64)> {
        self.labels
            .iter()
            .zip(&self.customers)
            .zip(&self.equipment)
            .map(|((label, c), e)| (label.as_str(), *c, *e))
    }

    /// 20% headroom over the tallest bar, split into 8 ticks.
    pub fn scale(&self) -> ChartScale {
        let max = self
            .customers
            .iter()
            .chain(&self.equipment)
            .copied()
            .max()
            .unwrap_or(0);
        let y_axis_max = (max * 12).div_ceil(10);
        ChartScale {
            y_axis_max,
            tick_step: y_axis_max.div_ceil(TICKS).max(1),
        }
    }
}

#[derive(Default)]
struct Counts {
    customers: u64,
    equipment: u64,
}

/// Groups records by city (`all`) or, for a concrete city, by its
/// districts. Records whose address yields no city are left out.
pub fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a FarmerRecord>,
    selected_city: &str,
) -> GeoStats {
    let selected_city = selected_city.trim();
    let province_level = selected_city.is_empty() || selected_city == ALL_CITIES;

    let mut groups: Vec<(String, Counts)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    if province_level {
        for city in CITIES {
            index.insert(city.to_string(), groups.len());
            groups.push((city.to_string(), Counts::default()));
        }
    }

    let mut skipped = 0usize;
    for record in records {
        let region = record.region();
        let Some(city) = region.city else {
            skipped += 1;
            continue;
        };

        let key = if province_level {
            city
        } else if city == selected_city {
            match region.district {
                Some(district) => district,
                None => continue,
            }
        } else {
            continue;
        };

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Counts::default()));
            groups.len() - 1
        });
        let counts = &mut groups[slot].1;
        counts.customers += 1;
        counts.equipment += record.equipments.len() as u64;
    }

    if skipped > 0 {
        debug!(skipped, "records without a parsable city left out of aggregation");
    }

    // Stable: ties keep seeding / first-seen order
    groups.sort_by(|a, b| b.1.customers.cmp(&a.1.customers));

    let mut stats = GeoStats::default();
    for (label, counts) in groups {
        stats.labels.push(label);
        stats.customers.push(counts.customers);
        stats.equipment.push(counts.equipment);
    }
    stats
}
