//! Place-name translation from the feed's source locale to the dashboard's
//! normalized display vocabulary.

use std::sync::OnceLock;

/// Prefecture and named-region terms. Applied before the suffix table so a
/// compound like 東京都 never loses its 東 to a bare direction glyph.
const REGIONS: [(&str, &str); 55] = [
    ("北海道", "Hokkaido"),
    ("青森県", "Aomori Pref"),
    ("岩手県", "Iwate Pref"),
    ("宮城県", "Miyagi Pref"),
    ("秋田県", "Akita Pref"),
    ("山形県", "Yamagata Pref"),
    ("福島県", "Fukushima Pref"),
    ("茨城県", "Ibaraki Pref"),
    ("栃木県", "Tochigi Pref"),
    ("群馬県", "Gunma Pref"),
    ("埼玉県", "Saitama Pref"),
    ("千葉県", "Chiba Pref"),
    ("東京都", "Tokyo Metro"),
    ("神奈川県", "Kanagawa Pref"),
    ("新潟県", "Niigata Pref"),
    ("富山県", "Toyama Pref"),
    ("石川県", "Ishikawa Pref"),
    ("福井県", "Fukui Pref"),
    ("山梨県", "Yamanashi Pref"),
    ("長野県", "Nagano Pref"),
    ("岐阜県", "Gifu Pref"),
    ("静岡県", "Shizuoka Pref"),
    ("愛知県", "Aichi Pref"),
    ("三重県", "Mie Pref"),
    ("滋賀県", "Shiga Pref"),
    ("京都府", "Kyoto Pref"),
    ("大阪府", "Osaka Pref"),
    ("兵庫県", "Hyogo Pref"),
    ("奈良県", "Nara Pref"),
    ("和歌山県", "Wakayama Pref"),
    ("鳥取県", "Tottori Pref"),
    ("島根県", "Shimane Pref"),
    ("岡山県", "Okayama Pref"),
    ("広島県", "Hiroshima Pref"),
    ("山口県", "Yamaguchi Pref"),
    ("徳島県", "Tokushima Pref"),
    ("香川県", "Kagawa Pref"),
    ("愛媛県", "Ehime Pref"),
    ("高知県", "Kochi Pref"),
    ("福岡県", "Fukuoka Pref"),
    ("佐賀県", "Saga Pref"),
    ("長崎県", "Nagasaki Pref"),
    ("熊本県", "Kumamoto Pref"),
    ("大分県", "Oita Pref"),
    ("宮崎県", "Miyazaki Pref"),
    ("鹿児島県", "Kagoshima Pref"),
    ("沖縄県", "Okinawa Pref"),
    ("伊豆諸島", "Izu Islands"),
    ("小笠原諸島", "Ogasawara Islands"),
    ("トカラ列島", "Tokara Islands"),
    ("奄美大島", "Amami Oshima"),
    ("日本海", "Japan Sea"),
    ("太平洋", "Pacific"),
    ("相模湾", "Sagami Bay"),
    ("駿河湾", "Suruga Bay"),
];

/// Descriptive suffixes and directions appended to region names.
const SUFFIXES: [(&str, &str); 28] = [
    ("中通り", "Nakadori"),
    ("浜通り", "Hamadori"),
    ("会津", "Aizu"),
    ("北東部", "Northeast"),
    ("北西部", "Northwest"),
    ("南東部", "Southeast"),
    ("南西部", "Southwest"),
    ("北部", "Northern"),
    ("南部", "Southern"),
    ("東部", "Eastern"),
    ("西部", "Western"),
    ("中部", "Central"),
    ("内陸", "Inland"),
    ("近海", "Coast"),
    ("沿岸", "Coastal"),
    ("遠方", "Far"),
    ("半島", "Peninsula"),
    ("諸島", "Islands"),
    ("列島", "Islands"),
    ("地方", "Region"),
    ("沖", "Offshore"),
    ("湾", "Bay"),
    ("灘", "Sea"),
    ("海", "Sea"),
    ("北", "North"),
    ("南", "South"),
    ("東", "East"),
    ("西", "West"),
];

fn sorted_table(raw: &'static [(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut table: Vec<_> = raw.to_vec();
    // Longest key first so a short key never pre-empts a more specific
    // compound term it is a substring of.
    table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    table
}

fn regions() -> &'static [(&'static str, &'static str)] {
    static TABLE: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| sorted_table(&REGIONS))
}

fn suffixes() -> &'static [(&'static str, &'static str)] {
    static TABLE: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| sorted_table(&SUFFIXES))
}

/// Translate a source-locale place name into the normalized display form.
///
/// Total and deterministic: untranslatable substrings pass through
/// unchanged. Output is whitespace-collapsed and upper-cased.
pub fn translate(raw: &str) -> String {
    let mut s = raw.to_string();

    for table in [regions(), suffixes()] {
        for (key, value) in table {
            if s.contains(key) {
                s = s.replace(key, &format!(" {} ", value));
            }
        }
    }

    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
