use crate::codes::PROVINCE;

const DISTRICT_SUFFIXES: [char; 3] = ['읍', '면', '동'];
const VILLAGE_SUFFIX: char = '리';

/// Administrative region tokens pulled out of a lot-number address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub city: Option<String>,
    pub district: Option<String>,
    pub village: Option<String>,
}

impl Region {
    pub fn is_located(&self) -> bool {
        self.city.is_some()
    }
}

/// Heuristic tokenizer for province addresses such as
/// `전라남도 영암군 영암읍 회문리 123`. Anything outside the province, or too
/// short to carry a city, yields an empty region instead of an error.
pub fn parse(address: &str) -> Region {
    let address = address.trim();
    if !address.starts_with(PROVINCE) {
        return Region::default();
    }

    let tokens: Vec<&str> = address.split_whitespace().collect();
    if tokens.len() < 3 {
        return Region::default();
    }

    let city = Some(tokens[1].to_string());

    let district_idx = tokens
        .iter()
        .enumerate()
        .skip(2)
        .find(|(_, t)| t.ends_with(DISTRICT_SUFFIXES))
        .map(|(i, _)| i);

    let district = district_idx.map(|i| tokens[i].to_string());

    let village = district_idx.and_then(|i| {
        tokens[i + 1..]
            .iter()
            .find(|t| t.ends_with(VILLAGE_SUFFIX))
            .map(|t| t.to_string())
    });

    Region {
        city,
        district,
        village,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_address() {
        let region = parse("전라남도 영암군 영암읍 회문리 123");
        assert_eq!(region.city.as_deref(), Some("영암군"));
        assert_eq!(region.district.as_deref(), Some("영암읍"));
        assert_eq!(region.village.as_deref(), Some("회문리"));
        assert!(region.is_located());
    }

    #[test]
    fn test_parse_two_tokens_is_empty() {
        assert_eq!(parse("전라남도 나주시"), Region::default());
    }

    #[test]
    fn test_parse_other_province_is_empty() {
        assert_eq!(parse("경상북도 안동시 풍산읍 안교리 1"), Region::default());
        assert_eq!(parse(""), Region::default());
    }

    #[test]
    fn test_parse_district_without_village() {
        let region = parse("전라남도 나주시 빛가람동 123-4");
        assert_eq!(region.city.as_deref(), Some("나주시"));
        assert_eq!(region.district.as_deref(), Some("빛가람동"));
        assert_eq!(region.village, None);
    }

    #[test]
    fn test_parse_village_needs_district() {
        // A 리 token with no 읍/면/동 before it is not a village
        let region = parse("전라남도 영암군 회문리 123");
        assert_eq!(region.city.as_deref(), Some("영암군"));
        assert_eq!(region.district, None);
        assert_eq!(region.village, None);
    }

    #[test]
    fn test_parse_village_must_follow_district() {
        let region = parse("전라남도 해남군 가상리 송지면 미야리 55");
        assert_eq!(region.district.as_deref(), Some("송지면"));
        assert_eq!(region.village.as_deref(), Some("미야리"));
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let a = parse("  전라남도   영암군\t삼호읍  용앵리 9 ");
        let b = parse("전라남도 영암군 삼호읍 용앵리 9");
        assert_eq!(a, b);
        assert_eq!(a.village.as_deref(), Some("용앵리"));
    }
}
