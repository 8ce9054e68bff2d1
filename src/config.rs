//! Operation targets and the sample data the drills run on
#![warn(missing_docs)]

use compact_str::CompactString;

use crate::key::OrderedKey;

/// The keys and values the keyed-map drill searches for, inserts and deletes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationTargets {
    /// Key used by key search and key removal
    pub key_target: OrderedKey,
    /// Key inserted by the insert step
    pub key_insert: OrderedKey,
    /// Value used by value search and value removal
    pub value_target: CompactString,
    /// Value inserted by the insert step
    pub value_insert: CompactString,
}

impl Default for OperationTargets {
    fn default() -> Self {
        OperationTargets {
            key_target: OrderedKey::new("Тайсон", "Каракас"),
            key_insert: OrderedKey::new("Зорро", "Сан-Хосе"),
            value_target: CompactString::const_new("Олександр"),
            value_insert: CompactString::const_new("Богдан"),
        }
    }
}

impl OperationTargets {
    /// Replace whichever targets are given, keeping the rest
    pub fn overlay(
        mut self,
        key_target: Option<OrderedKey>,
        key_insert: Option<OrderedKey>,
        value_target: Option<&str>,
        value_insert: Option<&str>,
    ) -> Self {
        if let Some(key) = key_target {
            self.key_target = key;
        }
        if let Some(key) = key_insert {
            self.key_insert = key;
        }
        if let Some(value) = value_target {
            self.value_target = value.into();
        }
        if let Some(value) = value_insert {
            self.value_insert = value.into();
        }
        self
    }
}

const SAMPLE: [(&str, &str, &str); 10] = [
    ("Яшма", "Сан-Паулу", "Олександр"),
    ("Фантом", "Ріо-де-Жанейро", "Наталія"),
    ("Удав", "Мехіко", "Ірина"),
    ("Тайсон", "Каракас", "Дмитро"),
    ("Сіріус", "Богота", "Олександр"),
    ("Пітон", "Ліма", "Софія"),
    ("Немо", "Гвантемала", "Наталія"),
    ("Мідас", "Буенос-Айрес", "Андрій"),
    ("Лорд", "Сантьяго", "Марія"),
    ("Кобра", "Панама", "Ірина"),
];

/// The ten sample entries, in insertion order
pub fn sample_pairs() -> Vec<(OrderedKey, CompactString)> {
    SAMPLE
        .iter()
        .map(|&(primary, secondary, owner)| (OrderedKey::new(primary, secondary), owner.into()))
        .collect()
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Unset overrides keep the defaults
fn test_targets_overlay() {
    let targets = OperationTargets::default().overlay(
        Some(OrderedKey::primary_only("Кобра")),
        None,
        None,
        Some("Марія"),
    );

    assert_eq!(targets.key_target, OrderedKey::primary_only("Кобра"));
    assert_eq!(targets.key_insert, OrderedKey::new("Зорро", "Сан-Хосе"));
    assert_eq!(targets.value_target, "Олександр");
    assert_eq!(targets.value_insert, "Марія");
    assert_eq!(sample_pairs().len(), 10);
}
