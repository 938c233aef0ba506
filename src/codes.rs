//! Fixed enumerations shared by the normalizer, the filter and every display
//! surface. Each domain is one table of `(code, label)` pairs.

pub struct CodeTable {
    pub name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl CodeTable {
    const fn new(name: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, entries }
    }

    /// Korean label for `code`. Unknown codes are returned as-is.
    pub fn label<'a>(&self, code: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
            .unwrap_or(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|(c, _)| *c == code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    /// Accepts either a code or its label and returns the code.
    pub fn resolve(&self, input: &str) -> Option<&'static str> {
        let input = input.trim();
        self.entries
            .iter()
            .find(|(c, l)| c.eq_ignore_ascii_case(input) || *l == input)
            .map(|(c, _)| *c)
    }
}

pub const FARMING_TYPES: CodeTable = CodeTable::new(
    "farming type",
    &[
        ("waterPaddy", "수도작"),
        ("fieldFarming", "밭농사"),
        ("orchard", "과수원"),
        ("livestock", "축산"),
        ("forageCrop", "조사료"),
    ],
);

pub const CROP_CATEGORIES: CodeTable = CodeTable::new(
    "main crop",
    &[
        ("foodCrops", "식량작물"),
        ("vegetables", "채소"),
        ("fruits", "과수"),
        ("specialCrops", "특용작물"),
        ("flowers", "화훼"),
        ("livestock", "축산"),
        ("others", "기타"),
    ],
);

const FOOD_CROPS: CodeTable = CodeTable::new(
    "food crop",
    &[
        ("rice", "벼"),
        ("barley", "보리"),
        ("wheat", "밀"),
        ("soybean", "콩"),
        ("corn", "옥수수"),
        ("potato", "감자"),
        ("sweetPotato", "고구마"),
    ],
);

const VEGETABLES: CodeTable = CodeTable::new(
    "vegetable",
    &[
        ("cabbage", "배추"),
        ("radish", "무"),
        ("pepper", "고추"),
        ("garlic", "마늘"),
        ("onion", "양파"),
        ("greenOnion", "대파"),
        ("watermelon", "수박"),
        ("strawberry", "딸기"),
        ("tomato", "토마토"),
    ],
);

const FRUITS: CodeTable = CodeTable::new(
    "fruit",
    &[
        ("apple", "사과"),
        ("pear", "배"),
        ("peach", "복숭아"),
        ("grape", "포도"),
        ("persimmon", "감"),
        ("citrus", "감귤"),
        ("kiwi", "참다래"),
        ("plum", "매실"),
    ],
);

const SPECIAL_CROPS: CodeTable = CodeTable::new(
    "special crop",
    &[
        ("sesame", "참깨"),
        ("perilla", "들깨"),
        ("ginseng", "인삼"),
        ("tea", "차"),
        ("mushroom", "버섯"),
    ],
);

const FLOWERS: CodeTable = CodeTable::new(
    "flower",
    &[
        ("rose", "장미"),
        ("chrysanthemum", "국화"),
        ("lily", "백합"),
        ("orchid", "난"),
    ],
);

const LIVESTOCK: CodeTable = CodeTable::new(
    "livestock",
    &[
        ("hanwoo", "한우"),
        ("dairy", "젖소"),
        ("pig", "돼지"),
        ("poultry", "가금"),
        ("goat", "염소"),
    ],
);

const OTHER_CROPS: CodeTable = CodeTable::new(
    "other crop",
    &[("forage", "조사료"), ("seedling", "육묘"), ("other", "기타")],
);

/// Detail-crop table for a main-crop category.
pub fn crop_details(category: &str) -> Option<&'static CodeTable> {
    match category {
        "foodCrops" => Some(&FOOD_CROPS),
        "vegetables" => Some(&VEGETABLES),
        "fruits" => Some(&FRUITS),
        "specialCrops" => Some(&SPECIAL_CROPS),
        "flowers" => Some(&FLOWERS),
        "livestock" => Some(&LIVESTOCK),
        "others" => Some(&OTHER_CROPS),
        _ => None,
    }
}

pub const EQUIPMENT_TYPES: CodeTable = CodeTable::new(
    "equipment type",
    &[
        ("tractor", "트랙터"),
        ("combine", "콤바인"),
        ("transplanter", "이앙기"),
        ("forklift", "지게차"),
    ],
);

pub const MANUFACTURERS: CodeTable = CodeTable::new(
    "manufacturer",
    &[
        ("daedong", "대동"),
        ("tym", "TYM"),
        ("ls", "LS엠트론"),
        ("kukje", "국제"),
        ("kubota", "구보다"),
        ("yanmar", "얀마"),
        ("johnDeere", "존디어"),
        ("newHolland", "뉴홀랜드"),
        ("iseki", "이세키"),
        ("claas", "클라스"),
        ("other", "기타"),
    ],
);

pub const ATTACHMENT_TYPES: CodeTable = CodeTable::new(
    "attachment",
    &[
        ("loader", "로더"),
        ("rotary", "로타리"),
        ("frontWheel", "앞바퀴"),
        ("rearWheel", "뒷바퀴"),
    ],
);

pub const SALE_TYPES: CodeTable =
    CodeTable::new("sale type", &[("new", "신품"), ("used", "중고")]);

pub const TRADE_TYPES: CodeTable =
    CodeTable::new("trade type", &[("sale", "판매"), ("purchase", "구매")]);

pub const SALE_STATUSES: CodeTable = CodeTable::new(
    "sale status",
    &[
        ("available", "판매중"),
        ("reserved", "예약중"),
        ("completed", "거래완료"),
    ],
);

// --- Province ---

pub const PROVINCE: &str = "전라남도";

pub const CITIES: &[&str] = &[
    "목포시", "여수시", "순천시", "나주시", "광양시", "담양군", "곡성군", "구례군", "고흥군",
    "보성군", "화순군", "장흥군", "강진군", "해남군", "영암군", "무안군", "함평군", "영광군",
    "장성군", "완도군", "진도군", "신안군",
];

pub fn is_known_city(city: &str) -> bool {
    CITIES.contains(&city)
}

/// Township-level units (읍/면/동) of a city. Empty for unknown cities.
pub fn townships(city: &str) -> &'static [&'static str] {
    match city {
        "목포시" => &[
            "용당1동", "용당2동", "연동", "산정동", "연산동", "원산동", "대성동", "목원동",
            "동명동", "삼학동", "만호동", "유달동", "죽교동", "북항동", "용해동", "이로동",
            "상동", "하당동", "신흥동", "삼향동", "옥암동", "부흥동", "부주동",
        ],
        "여수시" => &[
            "돌산읍", "소라면", "율촌면", "화양면", "남면", "화정면", "삼산면", "동문동",
            "한려동", "중앙동", "충무동", "광림동", "서강동", "대교동", "국동", "월호동",
            "여서동", "문수동", "미평동", "둔덕동", "만덕동", "쌍봉동", "시전동", "여천동",
            "주삼동", "삼일동", "묘도동",
        ],
        "순천시" => &[
            "승주읍", "해룡면", "서면", "황전면", "월등면", "주암면", "송광면", "외서면",
            "낙안면", "별량면", "상사면", "향동", "매곡동", "삼산동", "조곡동", "덕연동",
            "풍덕동", "남제동", "저전동", "장천동", "중앙동", "도사동", "왕조1동", "왕조2동",
        ],
        "나주시" => &[
            "남평읍", "세지면", "왕곡면", "반남면", "공산면", "동강면", "다시면", "문평면",
            "노안면", "금천면", "산포면", "다도면", "봉황면", "송월동", "영강동", "금남동",
            "성북동", "영산동", "이창동", "빛가람동",
        ],
        "광양시" => &[
            "광양읍", "봉강면", "옥룡면", "옥곡면", "진상면", "진월면", "다압면", "골약동",
            "중마동", "광영동", "태인동", "금호동",
        ],
        "담양군" => &[
            "담양읍", "봉산면", "고서면", "가사문학면", "창평면", "대덕면", "무정면", "금성면",
            "용면", "월산면", "수북면", "대전면",
        ],
        "곡성군" => &[
            "곡성읍", "오곡면", "삼기면", "석곡면", "목사동면", "죽곡면", "고달면", "옥과면",
            "입면", "겸면", "오산면",
        ],
        "구례군" => &[
            "구례읍", "문척면", "간전면", "토지면", "마산면", "광의면", "용방면", "산동면",
        ],
        "고흥군" => &[
            "고흥읍", "도양읍", "풍양면", "도덕면", "금산면", "도화면", "포두면", "봉래면",
            "점암면", "과역면", "남양면", "동강면", "대서면", "두원면", "영남면", "동일면",
        ],
        "보성군" => &[
            "보성읍", "벌교읍", "노동면", "미력면", "겸백면", "율어면", "복내면", "문덕면",
            "조성면", "득량면", "회천면", "웅치면",
        ],
        "화순군" => &[
            "화순읍", "한천면", "춘양면", "청풍면", "이양면", "능주면", "도곡면", "도암면",
            "이서면", "백아면", "동복면", "사평면", "동면",
        ],
        "장흥군" => &[
            "장흥읍", "관산읍", "대덕읍", "용산면", "안양면", "장동면", "장평면", "유치면",
            "부산면", "회진면",
        ],
        "강진군" => &[
            "강진읍", "군동면", "칠량면", "대구면", "마량면", "도암면", "신전면", "성전면",
            "작천면", "병영면", "옴천면",
        ],
        "해남군" => &[
            "해남읍", "삼산면", "화산면", "현산면", "송지면", "북평면", "북일면", "옥천면",
            "계곡면", "마산면", "황산면", "산이면", "문내면", "화원면",
        ],
        "영암군" => &[
            "영암읍", "삼호읍", "덕진면", "금정면", "신북면", "시종면", "도포면", "군서면",
            "서호면", "학산면", "미암면",
        ],
        "무안군" => &[
            "무안읍", "일로읍", "삼향읍", "몽탄면", "청계면", "현경면", "망운면", "해제면",
            "운남면",
        ],
        "함평군" => &[
            "함평읍", "손불면", "신광면", "학교면", "엄다면", "대동면", "나산면", "해보면",
            "월야면",
        ],
        "영광군" => &[
            "영광읍", "백수읍", "홍농읍", "대마면", "묘량면", "불갑면", "군서면", "군남면",
            "염산면", "법성면", "낙월면",
        ],
        "장성군" => &[
            "장성읍", "진원면", "남면", "동화면", "삼서면", "삼계면", "황룡면", "서삼면",
            "북일면", "북이면", "북하면",
        ],
        "완도군" => &[
            "완도읍", "금일읍", "노화읍", "군외면", "신지면", "고금면", "약산면", "청산면",
            "소안면", "금당면", "보길면", "생일면",
        ],
        "진도군" => &["진도읍", "군내면", "고군면", "의신면", "임회면", "지산면", "조도면"],
        "신안군" => &[
            "지도읍", "압해읍", "증도면", "임자면", "자은면", "비금면", "도초면", "흑산면",
            "하의면", "신의면", "장산면", "안좌면", "팔금면", "암태면",
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_lookup_and_passthrough() {
        assert_eq!(EQUIPMENT_TYPES.label("tractor"), "트랙터");
        assert_eq!(MANUFACTURERS.label("daedong"), "대동");
        // Unknown codes come back untouched
        assert_eq!(MANUFACTURERS.label("someNewBrand"), "someNewBrand");
        assert_eq!(FARMING_TYPES.label(""), "");
    }

    #[test]
    fn test_resolve_accepts_code_or_label() {
        assert_eq!(FARMING_TYPES.resolve("waterPaddy"), Some("waterPaddy"));
        assert_eq!(FARMING_TYPES.resolve("수도작"), Some("waterPaddy"));
        assert_eq!(EQUIPMENT_TYPES.resolve(" 콤바인 "), Some("combine"));
        assert_eq!(EQUIPMENT_TYPES.resolve("helicopter"), None);
    }

    #[test]
    fn test_contains_matches_codes_only() {
        assert!(TRADE_TYPES.contains("sale"));
        assert!(!TRADE_TYPES.contains("판매"));
        assert!(!TRADE_TYPES.contains(""));
    }

    #[test]
    fn test_every_category_has_details() {
        for category in CROP_CATEGORIES.codes() {
            let details = crop_details(category);
            assert!(details.is_some(), "missing details for {}", category);
        }
        assert!(crop_details("spaceCrops").is_none());
    }

    #[test]
    fn test_every_city_has_townships() {
        assert_eq!(CITIES.len(), 22);
        for city in CITIES {
            let list = townships(city);
            assert!(!list.is_empty(), "no townships for {}", city);
            assert!(list
                .iter()
                .all(|t| t.ends_with('읍') || t.ends_with('면') || t.ends_with('동')));
        }
        assert!(townships("서울시").is_empty());
    }
}
