//! Buses currently in service.

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::collate;
use crate::rules::RuleStore;
use crate::seta::{SetaError, TransitFeed, VehicleCollection, VehicleFeature};

/// Fetch the vehicle map, normalize every vehicle and sort by line.
pub async fn buses_in_service<F: TransitFeed>(
    feed: &F,
    rules: &RuleStore,
) -> Result<VehicleCollection, SetaError> {
    let mut collection = feed.fetch_vehicles().await?;

    for feature in &mut collection.features {
        rules.normalize_vehicle(&mut feature.properties);
    }
    sort_by_line(&mut collection.features);

    debug!(count = collection.features.len(), "buses in service");
    Ok(collection)
}

/// Order features by the number in their line label, then by the label.
///
/// "7A" sorts before "10"; lines without digits count as 0.
pub fn sort_by_line(features: &mut [VehicleFeature]) {
    features.sort_by(|a, b| line_order(&a.properties.line, &b.properties.line));
}

fn line_order(a: &str, b: &str) -> Ordering {
    collate::leading_number(a)
        .cmp(&collate::leading_number(b))
        .then_with(|| collate::text(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VehicleRecord;
    use crate::seta::MockSetaFeed;

    fn lines(collection: &VehicleCollection) -> Vec<&str> {
        collection
            .features
            .iter()
            .map(|f| f.properties.line.as_str())
            .collect()
    }

    #[test]
    fn sorts_by_leading_number() {
        let mut collection = VehicleCollection::new(
            ["10", "7A", "Navetta", "2", "7", "13B"]
                .into_iter()
                .enumerate()
                .map(|(i, line)| VehicleRecord::new(i as i64, line)),
        );

        sort_by_line(&mut collection.features);

        assert_eq!(lines(&collection), vec!["Navetta", "2", "7", "7A", "10", "13B"]);
    }

    #[test]
    fn text_tie_break_ignores_case() {
        assert_eq!(line_order("7a", "7B"), Ordering::Less);
        assert_eq!(line_order("N1", "n2"), Ordering::Less);
    }

    #[tokio::test]
    async fn normalizes_and_sorts() {
        let rules = RuleStore::from_json(
            r#"{
                "bus_rules": [
                    { "conditions": { "linea": "7/" }, "mutations": { "linea": "7A" } }
                ],
                "model_rules": [
                    { "range": [100, 199], "model": "Citaro", "plate_prefix": "MO" }
                ]
            }"#,
        )
        .unwrap();
        let feed = MockSetaFeed::new();
        feed.set_vehicles(VehicleCollection::new([
            VehicleRecord::new(150, "9"),
            VehicleRecord::new(20, "7/"),
        ]))
        .await;

        let collection = buses_in_service(&feed, &rules).await.unwrap();

        assert_eq!(lines(&collection), vec!["7A", "9"]);
        let citaro = &collection.features[1].properties;
        assert_eq!(citaro.model.as_deref(), Some("Citaro"));
        assert_eq!(citaro.plate, "MO150");
    }

    #[tokio::test]
    async fn fetch_failure_is_an_error() {
        let feed = MockSetaFeed::new();
        assert!(buses_in_service(&feed, &RuleStore::default()).await.is_err());
    }
}
