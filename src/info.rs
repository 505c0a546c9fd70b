//! Normalizes grouped INFO output into section maps.

use std::collections::BTreeMap;

use crate::connection::InfoGroup;

/// Field name to value within one INFO section.
pub type FieldMap = BTreeMap<String, String>;

/// One single-entry map per section, in the order the server reported them.
pub type InfoReport = Vec<BTreeMap<String, FieldMap>>;

/// Build the per-section field maps for one endpoint's INFO response.
///
/// Blank field names are dropped. A repeated field name keeps the last value.
pub fn parse_info(groups: Vec<InfoGroup>) -> InfoReport {
    groups
        .into_iter()
        .map(|group| {
            let fields: FieldMap = group
                .fields
                .into_iter()
                .filter(|(name, _)| !name.trim().is_empty())
                .collect();
            BTreeMap::from([(group.section, fields)])
        })
        .collect()
}

/// Field map of the first section in a report, if any.
pub fn first_section(report: &InfoReport) -> Option<&FieldMap> {
    report.first().and_then(|group| group.values().next())
}
