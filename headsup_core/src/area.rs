// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-area warning routing.
//!
//! Records with an [`AreaId`] belong to exactly one viewport; records without
//! one are shown everywhere. [`filter_for_area`] applies that rule to the
//! structured record list.
//!
//! Hosts that can only pass strings to their draw callbacks use the tagged
//! text form instead: an area record is encoded as `?<id>?<message>`, and
//! [`filter_tagged`] strips the tags with the same routing semantics.

use crate::document::AreaId;
use crate::warning::WarningRecord;

/// Messages visible in one area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AreaView<'a> {
    /// Messages in record order, tags removed.
    pub messages: Vec<&'a str>,
    /// At least one record was scoped to this area.
    pub area_scoped_found: bool,
}

impl AreaView<'_> {
    /// Joins the messages the way the overlay prints them.
    #[must_use]
    pub fn joined(&self) -> String {
        self.messages.join(" , ")
    }
}

/// Selects the records visible in `area`.
#[must_use]
pub fn filter_for_area(records: &[WarningRecord], area: AreaId) -> AreaView<'_> {
    let mut view = AreaView::default();
    for record in records {
        match record.area {
            None => view.messages.push(&record.message),
            Some(scope) if scope == area => {
                view.area_scoped_found = true;
                view.messages.push(&record.message);
            }
            Some(_) => {}
        }
    }
    view
}

// -- Tagged text API --

/// Encodes a record for string-only hosts.
#[must_use]
pub fn encode_tagged(record: &WarningRecord) -> String {
    match record.area {
        Some(AreaId(id)) => format!("?{id}?{}", record.message),
        None => record.message.clone(),
    }
}

/// Splits a leading `?<digits>?` tag off `line`.
///
/// Returns `None` for untagged lines. Tags with a sign or with digits that do
/// not fit an [`AreaId`] still count as tags, but never match any area.
fn split_tag(line: &str) -> Option<(Option<AreaId>, &str)> {
    let rest = line.strip_prefix('?')?;
    let end = rest.find('?')?;
    let digits = &rest[..end];
    let unsigned = digits.strip_prefix('-').unwrap_or(digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let id = if unsigned.len() == digits.len() {
        digits.parse().ok().map(AreaId)
    } else {
        None
    };
    Some((id, &rest[end + 1..]))
}

/// String counterpart of [`filter_for_area`].
///
/// Untagged lines pass through unchanged. Tagged lines pass, tag stripped
/// and trimmed, only when the tag names `area`.
#[must_use]
pub fn filter_tagged<S: AsRef<str>>(lines: &[S], area: AreaId) -> AreaView<'_> {
    let mut view = AreaView::default();
    for line in lines {
        let line = line.as_ref();
        match split_tag(line) {
            None => view.messages.push(line),
            Some((Some(id), message)) if id == area => {
                view.area_scoped_found = true;
                view.messages.push(message.trim());
            }
            Some(_) => {}
        }
    }
    view
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleId;

    fn records() -> Vec<WarningRecord> {
        vec![
            WarningRecord::global(RuleId::Numbered(4), "[Auto Keying] is ON!"),
            WarningRecord::in_area(RuleId::Numbered(20), AreaId(7), "[Local View] is ON!"),
            WarningRecord::in_area(RuleId::Numbered(21), AreaId(9), "[Clipping Border] is ON! Alt+B to reset"),
        ]
    }

    #[test]
    fn global_records_reach_every_area() {
        let records = records();
        let view = filter_for_area(&records, AreaId(1));
        assert_eq!(view.messages, vec!["[Auto Keying] is ON!"]);
        assert!(!view.area_scoped_found);
    }

    #[test]
    fn area_records_reach_only_their_area() {
        let records = records();
        let view = filter_for_area(&records, AreaId(7));
        assert_eq!(view.messages, vec!["[Auto Keying] is ON!", "[Local View] is ON!"]);
        assert!(view.area_scoped_found);
        assert_eq!(view.joined(), "[Auto Keying] is ON! , [Local View] is ON!");
    }

    #[test]
    fn tagged_text_matches_structured_routing() {
        let records = records();
        let lines: Vec<String> = records.iter().map(encode_tagged).collect();
        assert_eq!(lines[1], "?7?[Local View] is ON!");
        for area in [AreaId(1), AreaId(7), AreaId(9)] {
            assert_eq!(
                filter_tagged(&lines, area),
                filter_for_area(&records, area),
                "area {area:?}"
            );
        }
    }

    #[test]
    fn malformed_and_negative_tags() {
        let lines = ["?-3?hidden", "?x?kept as is", "?12 no closing", " ?4?  spaced  "];
        let view = filter_tagged(&lines, AreaId(4));
        assert_eq!(view.messages, vec!["?x?kept as is", "?12 no closing", " ?4?  spaced  "]);
        assert!(!view.area_scoped_found, "tags must start the line");

        let view = filter_tagged(&["?4?  spaced  "], AreaId(4));
        assert_eq!(view.messages, vec!["spaced"]);
    }
}
