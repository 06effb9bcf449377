//! Client-side search over the records of the loaded page.
//!
//! The filter never reaches the server and never looks beyond the page that is
//! currently loaded.

use crate::domain::UserRecord;

/// Records whose first name, last name, or email contains `term`, compared
/// case-insensitively, in their original order. An empty term keeps every
/// record.
///
/// # Examples
/// ```
/// use panel::domain::{UserId, UserRecord, filter_records};
///
/// let records = vec![UserRecord {
///     id: UserId::new(1).unwrap(),
///     first_name: "George".into(),
///     last_name: "Bluth".into(),
///     email: "george.bluth@reqres.in".into(),
///     avatar_url: String::new(),
/// }];
/// assert_eq!(filter_records(&records, "BLU").len(), 1);
/// assert!(filter_records(&records, "janet").is_empty());
/// ```
pub fn filter_records<'a>(records: &'a [UserRecord], term: &str) -> Vec<&'a UserRecord> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| matches_lowercase(record, &needle))
        .collect()
}

fn matches_lowercase(record: &UserRecord, needle: &str) -> bool {
    [&record.first_name, &record.last_name, &record.email]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::UserId;
    use rstest::{fixture, rstest};

    fn record(id: u64, first: &str, last: &str, email: &str) -> UserRecord {
        UserRecord {
            id: UserId::new(id).expect("id"),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email: email.to_owned(),
            avatar_url: format!("https://example.test/img/{id}.jpg"),
        }
    }

    #[fixture]
    fn records() -> Vec<UserRecord> {
        vec![
            record(1, "George", "Bluth", "george.bluth@reqres.in"),
            record(2, "Janet", "Weaver", "janet.weaver@reqres.in"),
            record(3, "Emma", "Wong", "emma.wong@reqres.in"),
            record(4, "Eve", "Holt", "eve.holt@reqres.in"),
        ]
    }

    fn ids(found: &[&UserRecord]) -> Vec<u64> {
        found.iter().map(|record| record.id.get()).collect()
    }

    #[rstest]
    fn empty_term_keeps_everything(records: Vec<UserRecord>) {
        let found = filter_records(&records, "");
        assert_eq!(found.into_iter().cloned().collect::<Vec<_>>(), records);
    }

    #[rstest]
    #[case::first_name("janet", vec![2])]
    #[case::last_name("WONG", vec![3])]
    #[case::email_domain("@REQRES", vec![1, 2, 3, 4])]
    #[case::substring_across_fields("e", vec![1, 2, 3, 4])]
    #[case::mixed_case_email("Eve.H", vec![4])]
    #[case::no_match("zelda", vec![])]
    fn matches_any_field_case_insensitively(
        records: Vec<UserRecord>,
        #[case] term: &str,
        #[case] expected: Vec<u64>,
    ) {
        assert_eq!(ids(&filter_records(&records, term)), expected);
    }

    #[rstest]
    fn result_is_exactly_the_matching_subset(records: Vec<UserRecord>) {
        for term in ["", "o", "bl", "xyz", "Weaver", ".in"] {
            let found = ids(&filter_records(&records, term));
            let needle = term.to_lowercase();
            let expected: Vec<u64> = records
                .iter()
                .filter(|r| {
                    r.first_name.to_lowercase().contains(&needle)
                        || r.last_name.to_lowercase().contains(&needle)
                        || r.email.to_lowercase().contains(&needle)
                })
                .map(|r| r.id.get())
                .collect();
            assert_eq!(found, expected, "term {term:?}");
        }
    }
}
