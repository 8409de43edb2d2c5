use crate::storage::ShortLinkEntry;
use migration::entities::short_link_entry;

pub fn model_to_entry(model: short_link_entry::Model) -> ShortLinkEntry {
    ShortLinkEntry {
        id: model.id,
        original_url: model.original_url,
        short_url: model.short_url,
        autogenerated: model.autogenerated,
        active: model.active,
        create_date: model.create_date,
        modified_date: model.modified_date,
    }
}

/// Build an ActiveModel for insert (`is_new`) or update
///
/// Updates leave `autogenerated` and `create_date` untouched; the id is
/// marked unchanged so it only drives the WHERE clause.
pub fn entry_to_active_model(entry: &ShortLinkEntry, is_new: bool) -> short_link_entry::ActiveModel {
    use sea_orm::ActiveValue::*;

    short_link_entry::ActiveModel {
        id: if is_new { Set(entry.id) } else { Unchanged(entry.id) },
        original_url: Set(entry.original_url.clone()),
        short_url: Set(entry.short_url.clone()),
        autogenerated: if is_new {
            Set(entry.autogenerated)
        } else {
            NotSet
        },
        active: Set(entry.active),
        create_date: if is_new {
            Set(entry.create_date)
        } else {
            NotSet
        },
        modified_date: Set(entry.modified_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::ActiveValue;

    fn sample_entry() -> ShortLinkEntry {
        let now = Utc::now();
        ShortLinkEntry {
            id: 42,
            original_url: "https://example.com/a".to_string(),
            short_url: "-G".to_string(),
            autogenerated: true,
            active: true,
            create_date: now - Duration::days(1),
            modified_date: now,
        }
    }

    #[test]
    fn test_model_to_entry() {
        let now = Utc::now();
        let model = short_link_entry::Model {
            id: 7,
            original_url: "https://example.com".to_string(),
            short_url: "docs".to_string(),
            autogenerated: false,
            active: false,
            create_date: now,
            modified_date: now,
        };

        let entry = model_to_entry(model);
        assert_eq!(entry.id, 7);
        assert_eq!(entry.short_url, "docs");
        assert!(!entry.autogenerated);
        assert!(!entry.active);
    }

    #[test]
    fn test_active_model_for_insert_sets_everything() {
        let entry = sample_entry();
        let am = entry_to_active_model(&entry, true);

        assert!(matches!(am.id, ActiveValue::Set(42)));
        assert!(matches!(am.autogenerated, ActiveValue::Set(true)));
        assert!(matches!(am.create_date, ActiveValue::Set(_)));
        assert!(matches!(am.modified_date, ActiveValue::Set(_)));
    }

    #[test]
    fn test_active_model_for_update_skips_immutable_fields() {
        let entry = sample_entry();
        let am = entry_to_active_model(&entry, false);

        assert!(matches!(am.id, ActiveValue::Unchanged(42)));
        assert!(matches!(am.autogenerated, ActiveValue::NotSet));
        assert!(matches!(am.create_date, ActiveValue::NotSet));
        assert!(matches!(am.short_url, ActiveValue::Set(ref s) if s == "-G"));
        assert!(matches!(am.active, ActiveValue::Set(true)));
    }
}
