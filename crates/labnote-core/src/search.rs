use serde::Serialize;

use crate::fuzzy::{match_opt, match_str};
use crate::item::SearchableItem;

const TITLE_WEIGHT: u32 = 3;
const SUBTITLE_WEIGHT: u32 = 2;
const DESCRIPTION_WEIGHT: u32 = 1;
pub const PRIORITY_WEIGHT: u32 = 5;
pub const TITLE_SUBSTRING_BONUS: u32 = 1000;

/// An item with its rank score and title highlight positions.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredItem {
    pub item: SearchableItem,
    pub score: u32,
    pub title_positions: Vec<usize>,
}

/// Score one item against a non-empty query. 0 means no field matched.
pub fn score_item(query: &str, item: &SearchableItem) -> u32 {
    score_item_with_title(query, item).0
}

fn score_item_with_title(query: &str, item: &SearchableItem) -> (u32, Vec<usize>) {
    let title = match_str(query, &item.title);
    let fuzzy = TITLE_WEIGHT * title.score
        + SUBTITLE_WEIGHT * match_opt(query, item.subtitle.as_deref())
        + DESCRIPTION_WEIGHT * match_opt(query, item.description.as_deref())
        + item
            .keywords
            .iter()
            .map(|k| match_str(query, k).score)
            .sum::<u32>();
    if fuzzy == 0 {
        return (0, Vec::new());
    }

    let mut score = fuzzy + PRIORITY_WEIGHT * u32::from(item.priority);
    if item.title.to_lowercase().contains(&query.to_lowercase()) {
        score += TITLE_SUBSTRING_BONUS;
    }
    (score, title.positions)
}

/// Rank `items` against `query`, best first, ties in input order.
///
/// An empty query passes every item through unscored in input order.
pub fn rank<I>(query: &str, items: I) -> Vec<ScoredItem>
where
    I: IntoIterator<Item = SearchableItem>,
{
    if query.is_empty() {
        return items
            .into_iter()
            .map(|item| ScoredItem {
                item,
                score: 0,
                title_positions: Vec::new(),
            })
            .collect();
    }

    let mut results: Vec<ScoredItem> = items
        .into_iter()
        .filter_map(|item| {
            let (score, title_positions) = score_item_with_title(query, &item);
            (score > 0).then_some(ScoredItem {
                item,
                score,
                title_positions,
            })
        })
        .collect();

    // sort_by is stable, which keeps ties in insertion order
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Category, ItemKind};

    fn item(title: &str, keywords: &[&str], priority: u8) -> SearchableItem {
        SearchableItem {
            id: title.to_string(),
            kind: ItemKind::Recent {
                path: format!("/notes/{title}"),
            },
            title: title.to_string(),
            subtitle: None,
            description: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            category: Category::Recent,
            priority,
        }
    }

    fn titles(results: &[ScoredItem]) -> Vec<&str> {
        results.iter().map(|r| r.item.title.as_str()).collect()
    }

    #[test]
    fn non_matching_items_are_dropped() {
        let items = vec![item("Sodium Chloride", &[], 0), item("Agarose", &[], 0)];
        let results = rank("sod", items);
        assert_eq!(titles(&results), vec!["Sodium Chloride"]);
        assert_eq!(results[0].title_positions, vec![0, 1, 2]);
    }

    #[test]
    fn empty_query_passes_everything_through() {
        let items = vec![item("b", &[], 0), item("a", &[], 9)];
        let results = rank("", items);
        assert_eq!(titles(&results), vec!["b", "a"]);
        assert!(results.iter().all(|r| r.score == 0));
    }

    #[test]
    fn title_substring_outranks_keyword_only_match() {
        let items = vec![
            item("Western blot", &["gel"], 0),
            item("Gel extraction", &[], 0),
        ];
        let results = rank("gel", items);
        assert_eq!(titles(&results), vec!["Gel extraction", "Western blot"]);
    }

    #[test]
    fn priority_breaks_otherwise_equal_scores() {
        let items = vec![item("Notes", &[], 0), item("Notes", &[], 2)];
        let results = rank("notes", items);
        assert_eq!(results[0].item.priority, 2);
        assert_eq!(results[0].score - results[1].score, 2 * PRIORITY_WEIGHT);
    }

    #[test]
    fn priority_alone_does_not_rescue_a_miss() {
        assert_eq!(score_item("xyz", &item("Notes", &[], 9)), 0);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let items = vec![
            item("PCR mix one", &[], 0),
            item("PCR mix two", &[], 0),
            item("PCR mix six", &[], 0),
        ];
        let first = rank("pcr", items.clone());
        let second = rank("pcr", items);
        assert_eq!(titles(&first), vec!["PCR mix one", "PCR mix two", "PCR mix six"]);
        assert_eq!(titles(&first), titles(&second));
    }

    #[test]
    fn fields_are_weighted() {
        let mut with_subtitle = item("Buffer", &[], 0);
        with_subtitle.subtitle = Some("tris".to_string());
        let mut with_description = item("Buffer", &[], 0);
        with_description.description = Some("tris".to_string());

        let sub = score_item("tris", &with_subtitle);
        let desc = score_item("tris", &with_description);
        assert_eq!(sub, 2 * desc);
    }
}
