//! Food-item normalization.
//!
//! Every record that enters a meal passes through here, so aggregation can
//! rely on a clamped `qty` and finite macros. Nothing is ever rejected: bad
//! input is coerced.

use crate::ids::{IdGenerator, ItemId};
use crate::numeric::clamp;
use crate::types::{FoodItem, FoodSource, Macro, RawFoodItem};

pub const DEFAULT_QTY: f64 = 1.0;
pub const MIN_QTY: f64 = 0.0;
pub const MAX_QTY: f64 = 100.0;

/// `qty` defaults to 1 when missing and is clamped to `[0, 100]`.
pub fn normalize_qty(qty: Option<f64>) -> f64 {
    match qty.filter(|q| q.is_finite()) {
        None => DEFAULT_QTY,
        Some(q) => clamp(q, MIN_QTY, MAX_QTY),
    }
}

fn clean_text(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

/// Build a complete item from a partial record, generating an id when it has none.
pub fn normalize_item(raw: RawFoodItem, ids: &dyn IdGenerator) -> FoodItem {
    let mut item = FoodItem::from(raw);
    if item.id.is_empty() {
        item.id = ids.next_id();
    }
    item
}

// Used by serde when reading stored items; an absent id stays empty until
// the log assigns one.
impl From<RawFoodItem> for FoodItem {
    fn from(raw: RawFoodItem) -> Self {
        FoodItem {
            id: raw.id.unwrap_or_default(),
            name: raw.name.map(|n| n.trim().to_string()).unwrap_or_default(),
            brand: clean_text(raw.brand),
            serving: clean_text(raw.serving),
            qty: normalize_qty(raw.qty),
            calories: finite(raw.calories),
            protein: finite(raw.protein),
            carbs: finite(raw.carbs),
            fat: finite(raw.fat),
            source: raw.source.unwrap_or_default(),
            external_id: raw.external_id.map(|id| id.to_string()),
        }
    }
}

impl From<&FoodItem> for RawFoodItem {
    fn from(item: &FoodItem) -> Self {
        RawFoodItem {
            id: Some(item.id.clone()),
            name: Some(item.name.clone()),
            brand: item.brand.clone(),
            serving: item.serving.clone(),
            qty: Some(item.qty),
            calories: item.calories,
            protein: item.protein,
            carbs: item.carbs,
            fat: item.fat,
            source: Some(item.source),
            external_id: item.external_id.clone().map(ItemId::new),
        }
    }
}

impl FoodItem {
    /// Re-apply the normalization rules. A no-op on an already normal item.
    pub fn normalized(self) -> Self {
        FoodItem::from(RawFoodItem::from(&self))
    }

    /// Deep copy carrying a fresh identity, so edits to the copy never touch the original.
    pub fn clone_with_new_id(&self, ids: &dyn IdGenerator) -> Self {
        FoodItem {
            id: ids.next_id(),
            ..self.clone()
        }
    }

    /// Per-serving value times quantity, unknown treated as zero.
    pub fn contribution(&self, m: Macro) -> f64 {
        self.macro_value(m).unwrap_or(0.0) * normalize_qty(Some(self.qty))
    }

    /// Apply an edit in place and re-normalize.
    pub fn apply_patch(&mut self, patch: FoodItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(serving) = patch.serving {
            self.serving = serving;
        }
        if let Some(qty) = patch.qty {
            self.qty = normalize_qty(qty);
        }
        for (m, value) in [
            (Macro::Calories, patch.calories),
            (Macro::Protein, patch.protein),
            (Macro::Carbs, patch.carbs),
            (Macro::Fat, patch.fat),
        ] {
            if let Some(value) = value {
                *self.macro_slot(m) = value;
            }
        }
        *self = self.clone().normalized();
    }

    pub fn is_external(&self) -> bool {
        self.source == FoodSource::External
    }
}

/// Field edits for an existing item. The outer `Option` is "leave unchanged";
/// an inner `None` clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodItemPatch {
    pub name: Option<String>,
    pub brand: Option<Option<String>>,
    pub serving: Option<Option<String>>,
    pub qty: Option<Option<f64>>,
    pub calories: Option<Option<f64>>,
    pub protein: Option<Option<f64>>,
    pub carbs: Option<Option<f64>>,
    pub fat: Option<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn raw(qty: Option<f64>, calories: Option<f64>) -> RawFoodItem {
        RawFoodItem {
            name: Some("Oats".into()),
            qty,
            calories,
            ..Default::default()
        }
    }

    #[test]
    fn qty_defaults_and_clamps() {
        let ids = SequentialIds::new("f");
        assert_eq!(normalize_item(raw(None, None), &ids).qty, 1.0);
        assert_eq!(normalize_item(raw(Some(250.0), None), &ids).qty, 100.0);
        assert_eq!(normalize_item(raw(Some(-3.0), None), &ids).qty, 0.0);
        assert_eq!(normalize_item(raw(Some(f64::NAN), None), &ids).qty, 1.0);
        assert_eq!(normalize_item(raw(Some(0.5), None), &ids).qty, 0.5);
    }

    #[test]
    fn missing_macros_stay_unset() {
        let ids = SequentialIds::new("f");
        let item = normalize_item(raw(None, None), &ids);
        assert_eq!(item.calories, None);
        assert_eq!(item.protein, None);
        assert_eq!(item.contribution(Macro::Calories), 0.0);
        assert_eq!(item.source, FoodSource::Manual);
        assert_eq!(item.id.as_str(), "f-1");
    }

    #[test]
    fn explicit_zero_is_not_unset() {
        let ids = SequentialIds::new("f");
        let item = normalize_item(raw(None, Some(0.0)), &ids);
        assert_eq!(item.calories, Some(0.0));
    }

    #[test]
    fn normalize_is_idempotent() {
        let ids = SequentialIds::new("f");
        let once = normalize_item(
            RawFoodItem {
                name: Some("  Greek yogurt ".into()),
                brand: Some("".into()),
                serving: Some(" 170 g ".into()),
                qty: Some(140.0),
                protein: Some(17.0),
                ..Default::default()
            },
            &ids,
        );
        let twice = once.clone().normalized();
        assert_eq!(once, twice);
        assert_eq!(once.name, "Greek yogurt");
        assert_eq!(once.brand, None);
        assert_eq!(once.serving.as_deref(), Some("170 g"));
    }

    #[test]
    fn stored_item_reads_loose_fields() {
        let item: FoodItem = serde_json::from_value(serde_json::json!({
            "id": "a", "name": "Egg", "qty": "", "calories": "78", "protein": "", "source": "external", "externalId": 1234
        }))
        .expect("item");
        assert_eq!(item.qty, 1.0);
        assert_eq!(item.calories, Some(78.0));
        assert_eq!(item.protein, None);
        assert!(item.is_external());
        assert_eq!(item.external_id.as_deref(), Some("1234"));
    }

    #[test]
    fn clone_with_new_id_keeps_fields() {
        let ids = SequentialIds::new("f");
        let item = normalize_item(raw(Some(2.0), Some(100.0)), &ids);
        let copy = item.clone_with_new_id(&ids);
        assert_ne!(copy.id, item.id);
        assert_eq!(FoodItem { id: item.id.clone(), ..copy }, item);
    }

    #[test]
    fn patch_clears_and_clamps() {
        let ids = SequentialIds::new("f");
        let mut item = normalize_item(raw(Some(2.0), Some(100.0)), &ids);
        item.apply_patch(FoodItemPatch {
            qty: Some(Some(500.0)),
            calories: Some(None),
            fat: Some(Some(3.0)),
            ..Default::default()
        });
        assert_eq!(item.qty, 100.0);
        assert_eq!(item.calories, None);
        assert_eq!(item.fat, Some(3.0));
        assert_eq!(item.name, "Oats");
    }
}
