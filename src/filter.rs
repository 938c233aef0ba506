use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::models::FarmerRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MailOption {
    #[default]
    All,
    Yes,
    No,
}

impl MailOption {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Yes,
            Self::Yes => Self::No,
            Self::No => Self::All,
        }
    }

    fn accepts(self, can_receive_mail: bool) -> bool {
        match self {
            Self::All => true,
            Self::Yes => can_receive_mail,
            Self::No => !can_receive_mail,
        }
    }
}

impl FromStr for MailOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "전체" => Ok(Self::All),
            "yes" | "y" | "수신" => Ok(Self::Yes),
            "no" | "n" | "미수신" => Ok(Self::No),
            other => Err(anyhow!("Unknown mail option '{}' (all, yes, no)", other)),
        }
    }
}

impl fmt::Display for MailOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Yes => "yes",
            Self::No => "no",
        })
    }
}

/// Registry filter. Every field is optional: an empty string (or `all`)
/// always passes, and active criteria are ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub search_term: String,
    pub city: String,
    pub district: String,
    pub village: String,
    pub farming_type: String,
    pub mail_option: MailOption,
    pub sale_type: String,
    pub equipment_type: String,
    pub manufacturer: String,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &FarmerRecord) -> bool {
        self.matches_search(record)
            && self.matches_region(record)
            && active(&self.farming_type).is_none_or(|t| record.farming_types.is_set(t))
            && self.mail_option.accepts(record.can_receive_mail)
            && active(&self.sale_type).is_none_or(|t| {
                record
                    .equipments
                    .iter()
                    .any(|e| e.sale_type.map(|s| s.code()) == Some(t))
            })
            && active(&self.equipment_type)
                .is_none_or(|t| record.equipments.iter().any(|e| e.kind == t))
            && active(&self.manufacturer)
                .is_none_or(|m| record.equipments.iter().any(|e| e.manufacturer == m))
    }

    fn matches_search(&self, record: &FarmerRecord) -> bool {
        let term = self.search_term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        let haystack = [
            record.name.as_str(),
            record.phone.as_str(),
            record.business_name.as_str(),
            record.jibun_address.as_str(),
            record.road_address.as_str(),
        ]
        .concat()
        .to_lowercase();
        if haystack.contains(&term) {
            return true;
        }

        // 01012345678 should find 010-1234-5678
        let is_phone_like = term.chars().all(|c| c.is_ascii_digit() || c == '-')
            && term.chars().any(|c| c.is_ascii_digit());
        is_phone_like && record.phone.replace('-', "").contains(&term.replace('-', ""))
    }

    fn matches_region(&self, record: &FarmerRecord) -> bool {
        let tokens: Vec<&str> = [&self.city, &self.district, &self.village]
            .into_iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return true;
        }

        let within = |address: &str| tokens.iter().all(|t| address.contains(*t));
        if within(&record.jibun_address) {
            return true;
        }
        // Road addresses carry no 리 token, so a village needs the lot-number address
        self.village.trim().is_empty() && within(&record.road_address)
    }
}

fn active(value: &str) -> Option<&str> {
    match value.trim() {
        "" | "all" => None,
        v => Some(v),
    }
}

/// Records passing every active criterion, in input order.
pub fn filter<'a>(records: &'a [FarmerRecord], criteria: &Criteria) -> Vec<&'a FarmerRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}
