//! Declarative header mapping for survey-style exports.
//!
//! The registration form has been re-exported several times with slightly
//! different column labels, so every scalar field carries an ordered alias
//! list and the first present non-empty cell wins. The team-size and prize
//! columns keep their full seeded question text as the header and are read
//! from that exact label only.

use super::models::RawRow;

/// Exact header of the team-size column (the form's seeded question text).
pub const TEAM_SIZE_HEADER: &str = "Team Size (Eg: Minimum : 1 Maximum : 4)";

/// Exact header of the prize column (the form's seeded question text).
pub const PRIZES_HEADER: &str = "Prize Money (Eg: 1st : 5000rs 2nd : 3000rs 3rd : 2000rs)";

#[derive(Debug, Clone)]
pub struct FieldMap {
    pub name: Vec<String>,
    pub category: Vec<String>,
    pub department: Vec<String>,
    pub date: Vec<String>,
    pub fee: Vec<String>,
    pub max_participants: Vec<String>,
    pub venue: Vec<String>,
    pub description: Vec<String>,
    pub coordinator_names: Vec<String>,
    pub coordinator_phones: Vec<String>,
    pub coordinator_emails: Vec<String>,
    pub team_size: String,
    pub prizes: String,
}

fn aliases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for FieldMap {
    fn default() -> Self {
        FieldMap {
            name: aliases(&["Event Name", "Name of the Event", "Event name"]),
            category: aliases(&["Event Category", "Category"]),
            department: aliases(&["Event department", "Department", "Event Department"]),
            date: aliases(&["Event Date", "Date of the Event", "Date"]),
            fee: aliases(&[
                "Registration Fee",
                "Registration Fee (per team)",
                "Registration fee (if any)",
            ]),
            max_participants: aliases(&[
                "Max Participants",
                "Maximum Participants",
                "Maximum number of participants",
            ]),
            venue: aliases(&["Venue", "Event Venue"]),
            description: aliases(&["Event Description", "Description"]),
            coordinator_names: aliases(&[
                "Student Coordinator Name",
                "Coordinator Name",
                "Coordinators",
            ]),
            coordinator_phones: aliases(&[
                "Student Coordinator Phone Number",
                "Coordinator Phone",
                "Phone Number",
            ]),
            coordinator_emails: aliases(&[
                "Student Coordinator Email",
                "Coordinator Email",
                "Email",
            ]),
            team_size: TEAM_SIZE_HEADER.to_string(),
            prizes: PRIZES_HEADER.to_string(),
        }
    }
}

/// First non-empty value among the alias list. Header comparison tolerates
/// surrounding whitespace on both sides ("Event department " vs "Department").
pub fn probe(row: &RawRow, aliases: &[String]) -> Option<String> {
    for alias in aliases {
        if let Some(value) = row.get(alias) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
        // Padded-header fallback; ties between raw headers that trim to the
        // same alias resolve by header sort order, not map iteration order.
        let wanted = alias.trim();
        let mut candidates: Vec<(&str, &str)> = row
            .iter()
            .filter(|(header, value)| header.trim() == wanted && !value.trim().is_empty())
            .map(|(header, value)| (header.as_str(), value.trim()))
            .collect();
        candidates.sort();
        if let Some((_, value)) = candidates.first() {
            return Some(value.to_string());
        }
    }
    None
}

/// Value under one exact header, trimmed; no alias tolerance.
pub fn exact(row: &RawRow, header: &str) -> Option<String> {
    row.get(header)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn probe_prefers_earlier_alias() {
        let map = FieldMap::default();
        let r = row(&[("Event Name", "Robo Race"), ("Name of the Event", "Other")]);
        assert_eq!(probe(&r, &map.name).as_deref(), Some("Robo Race"));
    }

    #[test]
    fn probe_skips_empty_values() {
        let map = FieldMap::default();
        let r = row(&[("Event Name", "  "), ("Name of the Event", "Circuit Hunt")]);
        assert_eq!(probe(&r, &map.name).as_deref(), Some("Circuit Hunt"));
    }

    #[test]
    fn probe_tolerates_padded_headers() {
        let map = FieldMap::default();
        let r = row(&[("Event department ", "CSE")]);
        assert_eq!(probe(&r, &map.department).as_deref(), Some("CSE"));
    }

    #[test]
    fn probe_header_ties_resolve_deterministically() {
        let map = FieldMap::default();
        let r = row(&[(" Venue", "Hall A"), ("Venue ", "Hall B")]);
        assert_eq!(probe(&r, &map.venue).as_deref(), Some("Hall A"));
    }

    #[test]
    fn probe_missing_header_is_none() {
        let map = FieldMap::default();
        assert_eq!(probe(&row(&[]), &map.venue), None);
    }

    #[test]
    fn exact_does_not_probe_variants() {
        let r = row(&[("Team Size", "Minimum : 2 Maximum : 4")]);
        assert_eq!(exact(&r, TEAM_SIZE_HEADER), None);

        let r = row(&[(TEAM_SIZE_HEADER, "Minimum : 2 Maximum : 4")]);
        assert_eq!(
            exact(&r, TEAM_SIZE_HEADER).as_deref(),
            Some("Minimum : 2 Maximum : 4")
        );
    }
}
