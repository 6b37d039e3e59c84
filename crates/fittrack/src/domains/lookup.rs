//! Turning food-database search hits into loggable items.

use food_db_client::{FoodCandidate, FoodDatabase, SearchRequest, extract_macros};

use crate::ids::ItemId;
use crate::types::{FoodSource, RawFoodItem};

/// Map one search hit to a partial item with a quantity of one serving.
pub fn candidate_to_item(candidate: &FoodCandidate) -> RawFoodItem {
    let macros = extract_macros(candidate);
    RawFoodItem {
        id: None,
        name: Some(candidate.description.trim().to_string()),
        brand: candidate.brand().map(str::to_string),
        serving: candidate.serving_label(),
        qty: Some(1.0),
        calories: macros.calories,
        protein: macros.protein,
        carbs: macros.carbs,
        fat: macros.fat,
        source: Some(FoodSource::External),
        external_id: candidate.fdc_id.clone().map(ItemId::new),
    }
}

/// Search and convert the results. Failures come back as a single line fit
/// for display; nothing else is touched.
pub async fn search_for_items(
    db: &dyn FoodDatabase,
    query: &str,
    page_size: Option<u32>,
) -> Result<Vec<RawFoodItem>, String> {
    let request = SearchRequest::new(query, page_size).map_err(|e| e.user_message())?;
    match db.search_foods(&request).await {
        Ok(candidates) => {
            tracing::debug!(
                query = request.query(),
                hits = candidates.len(),
                "food search finished"
            );
            Ok(candidates.iter().map(candidate_to_item).collect())
        }
        Err(e) => {
            tracing::warn!(error = %e, "food search failed");
            Err(e.user_message())
        }
    }
}
