//! Row normalization: free-text survey cells into a structured event record.
//!
//! Every sub-field parser is pure and defaults on failure instead of
//! erroring, so a row with a usable name always produces a record. The only
//! rows that produce nothing are those with an empty name or with a
//! header-like name that leaked into the data range.

use super::fields::{self, FieldMap};
use super::models::{
    Category, Coordinator, CoordinatorRole, Department, EventRecord, Prizes, RawRow, TeamSize,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Date stored when the source cell is empty or unparseable.
pub static FALLBACK_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid calendar date"));

static MIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)minimum\D*?(\d+)").expect("valid regex"));
static MAX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)maximum\D*?(\d+)").expect("valid regex"));
static NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));
static FIRST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)1st\s*:?\s*(?:₹|rs\.?)?\s*(\d+)").expect("valid regex"));
static SECOND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)2nd\s*:?\s*(?:₹|rs\.?)?\s*(\d+)").expect("valid regex"));
static THIRD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)3rd\s*:?\s*(?:₹|rs\.?)?\s*(\d+)").expect("valid regex"));
static NAME_SEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:,|&|;|\band\b)\s*").expect("valid regex"));
static CONTACT_SEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[,&;]\s*").expect("valid regex"));

/// Produces a record for the row, or `None` for rows that must be skipped
/// (empty name, or a name that is itself a header label).
pub fn normalize_row(row: &RawRow, map: &FieldMap) -> Option<EventRecord> {
    let name = fields::probe(row, &map.name)?;
    if name.to_lowercase().contains("event name") {
        return None;
    }

    let field = |aliases: &[String]| fields::probe(row, aliases).unwrap_or_default();

    let coordinators = parse_coordinators(
        &field(&map.coordinator_names),
        &field(&map.coordinator_phones),
        &field(&map.coordinator_emails),
    );

    Some(EventRecord {
        slug: slugify(&name),
        category: parse_category(&field(&map.category)),
        department: parse_department(&field(&map.department)),
        team_size: parse_team_size(&fields::exact(row, &map.team_size).unwrap_or_default()),
        prizes: parse_prizes(&fields::exact(row, &map.prizes).unwrap_or_default()),
        date: parse_date(&field(&map.date)),
        registration_fee: parse_first_number(&field(&map.fee)).unwrap_or(0),
        max_participants: parse_first_number(&field(&map.max_participants))
            .filter(|n| *n > 0)
            .unwrap_or(100),
        venue: field(&map.venue),
        description: field(&map.description),
        coordinators,
        name,
    })
}

/// Scans for "minimum N" and "maximum N" independently; a bare number means a
/// fixed team size, nothing numeric means a single-member event.
pub fn parse_team_size(text: &str) -> TeamSize {
    let min = MIN_RE
        .captures(text)
        .and_then(|c| c[1].parse::<u32>().ok());
    let max = MAX_RE
        .captures(text)
        .and_then(|c| c[1].parse::<u32>().ok());

    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min),
        (None, Some(max)) => (1, max),
        (None, None) => match parse_first_number(text) {
            Some(n) => (n, n),
            None => (1, 1),
        },
    };

    let min = min.max(1);
    let max = max.max(min);
    TeamSize { min, max }
}

/// Matches each announced tier ("1st : 1500rs", "2nd: ₹1000", ...) and stores
/// it ₹-prefixed; tiers the text does not mention stay absent.
pub fn parse_prizes(text: &str) -> Prizes {
    let tier = |re: &Regex| {
        re.captures(text)
            .map(|c| format!("\u{20b9}{}", &c[1]))
    };
    Prizes {
        first: tier(&FIRST_RE),
        second: tier(&SECOND_RE),
        third: tier(&THIRD_RE),
    }
}

/// Slash-separated dates are read month/day/year (the export's locale);
/// anything else goes through a short list of common formats, then the
/// fallback date.
pub fn parse_date(text: &str) -> NaiveDate {
    let text = text.trim();
    if text.is_empty() {
        return *FALLBACK_DATE;
    }

    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() == 3 {
        let nums: Vec<Option<i32>> = parts.iter().map(|p| p.trim().parse().ok()).collect();
        if let [Some(month), Some(day), Some(year)] = nums[..] {
            let year = if year < 100 { year + 2000 } else { year };
            if let Some(date) = NaiveDate::from_ymd_opt(year, month as u32, day as u32) {
                return date;
            }
        }
        return *FALLBACK_DATE;
    }

    const FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%d-%m-%Y",
        "%B %d, %Y",
        "%d %B %Y",
        "%b %d, %Y",
        "%d %b %Y",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .unwrap_or(*FALLBACK_DATE)
}

/// First run of digits anywhere in the text.
pub fn parse_first_number(text: &str) -> Option<u32> {
    NUM_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

pub fn parse_category(text: &str) -> Category {
    let lower = text.to_lowercase();
    if lower.contains("technical") && !lower.contains("non") {
        Category::Technical
    } else if lower.contains("non") {
        Category::NonTechnical
    } else if lower.contains("cultural") {
        Category::Cultural
    } else {
        Category::Technical
    }
}

pub fn parse_department(text: &str) -> Department {
    match text.trim().to_uppercase().as_str() {
        "AIML" | "AI&ML" | "AI & ML" | "CSE (AIML)" => Department::Aiml,
        "CSE" | "COMPUTER SCIENCE" => Department::Cse,
        "ECE" | "ELECTRONICS" => Department::Ece,
        "MECH" | "MECHANICAL" => Department::Mech,
        "CIVIL" => Department::Civil,
        "MBA" => Department::Mba,
        "APPLIED SCIENCE" | "APPLIED SCIENCES" | "S&H" => Department::AppliedScience,
        _ => Department::Common,
    }
}

/// Splits the name cell on commas, ampersands, semicolons and the word "and";
/// phone and email cells split on the punctuation only. Lists are zipped by
/// position, the first entry becomes the head coordinator.
pub fn parse_coordinators(names: &str, phones: &str, emails: &str) -> Vec<Coordinator> {
    let split = |re: &Regex, text: &str| -> Vec<String> {
        re.split(text)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    };

    let names = split(&NAME_SEP, names);
    let phones = split(&CONTACT_SEP, phones);
    let emails = split(&CONTACT_SEP, emails);

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| Coordinator {
            name,
            phone: phones.get(i).cloned().unwrap_or_default(),
            email: emails.get(i).cloned().unwrap_or_default(),
            role: if i == 0 {
                CoordinatorRole::Head
            } else {
                CoordinatorRole::Coordinator
            },
        })
        .collect()
}

/// Lowercases and collapses non-alphanumeric runs to single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn team_size_min_and_max() {
        let size = parse_team_size("Minimum : 2\nMaximum : 4");
        assert_eq!(size, TeamSize { min: 2, max: 4 });
    }

    #[test]
    fn team_size_max_only_defaults_min() {
        assert_eq!(parse_team_size("Maximum : 4"), TeamSize { min: 1, max: 4 });
    }

    #[test]
    fn team_size_bare_number_is_fixed() {
        assert_eq!(parse_team_size("3"), TeamSize { min: 3, max: 3 });
    }

    #[test]
    fn team_size_empty_defaults() {
        assert_eq!(parse_team_size(""), TeamSize::default());
    }

    #[test]
    fn prizes_two_tiers() {
        let prizes = parse_prizes("1st : 1500rs \n 2nd : 1000rs");
        assert_eq!(prizes.first.as_deref(), Some("₹1500"));
        assert_eq!(prizes.second.as_deref(), Some("₹1000"));
        assert_eq!(prizes.third, None);
    }

    #[test]
    fn prizes_currency_prefix_variants() {
        let prizes = parse_prizes("1st: ₹5000, 2nd: Rs. 3000, 3rd 2000");
        assert_eq!(prizes.first.as_deref(), Some("₹5000"));
        assert_eq!(prizes.second.as_deref(), Some("₹3000"));
        assert_eq!(prizes.third.as_deref(), Some("₹2000"));
    }

    #[test]
    fn prizes_empty_text() {
        assert_eq!(parse_prizes(""), Prizes::default());
    }

    #[test]
    fn date_slash_is_month_first() {
        assert_eq!(
            parse_date("3/15/2025"),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
    }

    #[test]
    fn date_empty_uses_fallback() {
        assert_eq!(parse_date(""), *FALLBACK_DATE);
    }

    #[test]
    fn date_generic_formats() {
        assert_eq!(
            parse_date("2025-03-15"),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert_eq!(
            parse_date("15 March 2025"),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
    }

    #[test]
    fn date_garbage_uses_fallback() {
        assert_eq!(parse_date("to be announced"), *FALLBACK_DATE);
        assert_eq!(parse_date("99/99/2025"), *FALLBACK_DATE);
    }

    #[test]
    fn category_rules() {
        assert_eq!(parse_category("Non Technical"), Category::NonTechnical);
        assert_eq!(parse_category("Technical"), Category::Technical);
        assert_eq!(parse_category("Cultural"), Category::Cultural);
        assert_eq!(parse_category("Tech"), Category::Technical);
        assert_eq!(parse_category(""), Category::Technical);
    }

    #[test]
    fn department_alias_table() {
        assert_eq!(parse_department("cse"), Department::Cse);
        assert_eq!(parse_department(" Mech "), Department::Mech);
        assert_eq!(parse_department("AI & ML"), Department::Aiml);
        assert_eq!(parse_department("Robotics Club"), Department::Common);
        assert_eq!(parse_department(""), Department::Common);
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slugify("Robo Race!"), "robo-race");
        assert_eq!(slugify("  Code -- Storm  "), "code-storm");
    }

    #[test]
    fn coordinators_zip_and_roles() {
        let coords = parse_coordinators(
            "Asha and Ravi; Kiran",
            "9000000001, 9000000002",
            "asha@example.com",
        );
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0].name, "Asha");
        assert_eq!(coords[0].role, CoordinatorRole::Head);
        assert_eq!(coords[0].phone, "9000000001");
        assert_eq!(coords[0].email, "asha@example.com");
        assert_eq!(coords[1].name, "Ravi");
        assert_eq!(coords[1].role, CoordinatorRole::Coordinator);
        assert_eq!(coords[1].email, "");
        assert_eq!(coords[2].phone, "");
    }

    #[test]
    fn coordinators_and_inside_a_name_is_kept() {
        let coords = parse_coordinators("Anand", "", "");
        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0].name, "Anand");
    }

    #[test]
    fn coordinators_empty_names() {
        assert!(parse_coordinators("", "9000000001", "").is_empty());
    }

    #[test]
    fn normalize_row_full() {
        let map = FieldMap::default();
        let r = row(&[
            ("Event Name", "Robo Race!"),
            ("Event Category", "Technical"),
            ("Event department ", "ECE"),
            ("Event Date", "3/15/2026"),
            ("Registration Fee", "Rs 100 per team"),
            ("Max Participants", "60"),
            ("Venue", "Main Block"),
            (
                super::super::fields::TEAM_SIZE_HEADER,
                "Minimum : 2 Maximum : 4",
            ),
            (super::super::fields::PRIZES_HEADER, "1st : 1500rs"),
            ("Student Coordinator Name", "Asha, Ravi"),
        ]);
        let rec = normalize_row(&r, &map).expect("row should normalize");
        assert_eq!(rec.name, "Robo Race!");
        assert_eq!(rec.slug, "robo-race");
        assert_eq!(rec.category, Category::Technical);
        assert_eq!(rec.department, Department::Ece);
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(rec.team_size, TeamSize { min: 2, max: 4 });
        assert_eq!(rec.prizes.first.as_deref(), Some("₹1500"));
        assert_eq!(rec.registration_fee, 100);
        assert_eq!(rec.max_participants, 60);
        assert_eq!(rec.venue, "Main Block");
        assert_eq!(rec.coordinators.len(), 2);
    }

    #[test]
    fn normalize_row_defaults() {
        let map = FieldMap::default();
        let rec = normalize_row(&row(&[("Event Name", "Quiz")]), &map).expect("usable name");
        assert_eq!(rec.category, Category::Technical);
        assert_eq!(rec.department, Department::Common);
        assert_eq!(rec.team_size, TeamSize::default());
        assert_eq!(rec.prizes, Prizes::default());
        assert_eq!(rec.date, *FALLBACK_DATE);
        assert_eq!(rec.registration_fee, 0);
        assert_eq!(rec.max_participants, 100);
        assert!(rec.coordinators.is_empty());
    }

    #[test]
    fn normalize_row_skips_empty_name() {
        let map = FieldMap::default();
        assert!(normalize_row(&row(&[("Event Name", "")]), &map).is_none());
        assert!(normalize_row(&row(&[("Venue", "Hall")]), &map).is_none());
    }

    #[test]
    fn normalize_row_skips_leaked_header() {
        let map = FieldMap::default();
        let r = row(&[("Event Name", "Event Name (example)")]);
        assert!(normalize_row(&r, &map).is_none());
    }
}
