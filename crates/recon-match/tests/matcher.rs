use recon_match::EntityMatcher;
use recon_model::{Dictionary, DictionaryItem, DictionaryStore, MatchConfidence, MatchRule, StoreRank};

fn sample_dictionary() -> Dictionary {
    Dictionary::new(
        vec![
            DictionaryItem {
                number: "GLD-1".to_string(),
                description: "Glide Widget".to_string(),
                skus: vec!["410021982504".to_string()],
            },
            DictionaryItem {
                number: "SLV-2".to_string(),
                description: "Silver Widget".to_string(),
                skus: Vec::new(),
            },
        ],
        vec![
            DictionaryStore {
                id: 101,
                name: "WATERLOO 1".to_string(),
                rank: Some(StoreRank::A),
            },
            DictionaryStore {
                id: 102,
                name: "WATERLOO 2".to_string(),
                rank: Some(StoreRank::B),
            },
            DictionaryStore {
                id: 205,
                name: "ST JACOBS MARKET".to_string(),
                rank: None,
            },
        ],
    )
}

#[test]
fn item_tiers_fire_in_order() {
    let matcher = EntityMatcher::new(sample_dictionary());

    let by_number = matcher.match_item("gld-1").expect("number match");
    assert_eq!(by_number.confidence, MatchConfidence::Exact);
    assert_eq!(by_number.rule, MatchRule::ItemNumber);
    assert_eq!(by_number.entity.number, "GLD-1");

    let by_sku = matcher.match_item("410021982504").expect("sku match");
    assert_eq!(by_sku.confidence, MatchConfidence::Exact);
    assert_eq!(by_sku.rule, MatchRule::ItemSku);
    assert_eq!(by_sku.entity.number, "GLD-1");

    let by_prefix = matcher.match_item("GLD").expect("prefix match");
    assert_eq!(by_prefix.confidence, MatchConfidence::Partial);
    assert_eq!(by_prefix.rule, MatchRule::ItemNumberPrefix);
    assert_eq!(by_prefix.entity.number, "GLD-1");

    assert!(matcher.match_item("AB").is_none());
}

#[test]
fn store_tiers_fire_in_order() {
    let matcher = EntityMatcher::new(sample_dictionary());

    let by_id = matcher.match_store("101").expect("id match");
    assert_eq!(by_id.confidence, MatchConfidence::Exact);
    assert_eq!(by_id.rule, MatchRule::StoreId);
    assert_eq!(by_id.entity.name, "WATERLOO 1");

    let by_name = matcher.match_store("waterloo 2").expect("name match");
    assert_eq!(by_name.confidence, MatchConfidence::Exact);
    assert_eq!(by_name.rule, MatchRule::StoreName);
    assert_eq!(by_name.entity.id, 102);

    let by_substring = matcher.match_store("JACOBS").expect("substring match");
    assert_eq!(by_substring.confidence, MatchConfidence::Partial);
    assert_eq!(by_substring.rule, MatchRule::StoreNameContains);
    assert_eq!(by_substring.entity.id, 205);

    let by_keywords = matcher.match_store("MARKET AT ST JACOBS").expect("keyword match");
    assert_eq!(by_keywords.confidence, MatchConfidence::Fuzzy);
    assert_eq!(by_keywords.rule, MatchRule::StoreKeywords);
    assert_eq!(by_keywords.entity.id, 205);
    assert_eq!(by_keywords.score, Some(3.0));

    assert!(matcher.match_store("unrelated token").is_none());
    assert!(matcher.match_store("").is_none());
}

#[test]
fn keyword_ties_go_to_the_first_indexed_store() {
    let matcher = EntityMatcher::new(sample_dictionary());

    // "WATERLOO" alone overlaps both WATERLOO stores with one word each.
    let tied = matcher.match_store("WATERLOO MALL").expect("keyword match");
    assert_eq!(tied.entity.id, 101);
}

#[test]
fn matching_never_mutates_the_dictionary() {
    let matcher = EntityMatcher::new(sample_dictionary());
    let before = matcher.dictionary().clone();
    let _ = matcher.match_item("GLD");
    let _ = matcher.match_store("WATERLOO MALL");
    assert_eq!(matcher.dictionary().items, before.items);
    assert_eq!(matcher.dictionary().stores, before.stores);
}
