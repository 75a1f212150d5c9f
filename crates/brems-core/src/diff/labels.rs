//! Field key → display label tables.
//!
//! Table order is display order. Adding a field to a review section is a
//! table edit; keys missing from a table are labelled with [`humanize`].

/// A section's label table.
pub type LabelTable = &'static [(&'static str, &'static str)];

pub const PERSONAL_INFO_LABELS: LabelTable = &[
    ("first_name", "First name"),
    ("last_name", "Last name"),
    ("name_bn", "Name (Bengali)"),
    ("nid_number", "NID number"),
    ("phone", "Phone"),
    ("gender", "Gender"),
    ("dob", "Date of birth"),
    ("religion", "Religion"),
    ("blood_group", "Blood group"),
    ("marital_status", "Marital status"),
    ("place_of_birth", "Place of birth"),
    ("height", "Height"),
    ("passport", "Passport"),
    ("birth_reg", "Birth registration"),
];

pub const FAMILY_FIELD_LABELS: LabelTable = &[
    ("name", "Name"),
    ("name_bn", "Name (Bengali)"),
    ("nid", "NID"),
    ("dob", "Date of birth"),
    ("occupation", "Occupation"),
    ("is_alive", "Alive"),
    ("is_active_marriage", "Active marriage"),
    ("gender", "Gender"),
];

/// Address components. Only these keys are compared.
pub const ADDRESS_LABELS: LabelTable = &[
    ("division", "Division"),
    ("district", "District"),
    ("upazila", "Upazila"),
    ("post_office", "Post office"),
    ("house_no", "House no / Road"),
    ("village_road", "Village / Area"),
];

/// Academic credential fields. Only these keys are compared.
pub const ACADEMIC_FIELDS: LabelTable = &[
    ("exam_name", "Exam name"),
    ("institute", "Institute"),
    ("passing_year", "Passing year"),
    ("result", "Result"),
];

/// Bookkeeping keys never shown for family members.
pub const NESTED_SKIP_KEYS: &[&str] = &[
    "relation",
    "employee_id",
    "id",
    "created_at",
    "updated_at",
    "deleted_at",
];

/// Keys holding calendar dates.
pub const DATE_KEYS: &[&str] = &["dob"];

/// Separator between an entity prefix and a field label (`Father – Name`).
pub const PREFIX_SEPARATOR: &str = " – ";

pub fn is_date_key(key: &str) -> bool {
    DATE_KEYS.contains(&key)
}

/// Label for `key` from `table`, humanized when the table lacks it.
pub fn label_for(table: LabelTable, key: &str) -> String {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| humanize(key))
}

/// `place_of_birth` → `Place Of Birth`.
pub fn humanize(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keys to visit for a flat section: table keys first (in table order),
/// then any other key present on either side in sorted order.
pub fn ordered_keys<'a>(
    table: LabelTable,
    keys: impl IntoIterator<Item = &'a str>,
) -> Vec<&'a str> {
    let mut extra: Vec<&'a str> = keys
        .into_iter()
        .filter(|k| !table.iter().any(|(t, _)| t == k))
        .collect();
    extra.sort_unstable();
    extra.dedup();

    let mut ordered: Vec<&'a str> = table.iter().map(|(k, _)| *k).collect();
    ordered.extend(extra);
    ordered
}
