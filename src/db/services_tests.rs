use super::repositories::LocalRepository;
use super::services;
use crate::api::CaseDataset;

fn minimal_dataset(name: &str, checksum: &str) -> CaseDataset {
    CaseDataset {
        id: None,
        name: name.to_string(),
        facility_id: "fac-1".to_string(),
        checksum: checksum.to_string(),
        cases: vec![],
        benchmarks: vec![],
        weekly_utilization: vec![],
    }
}

#[tokio::test]
async fn test_store_and_list() {
    let repo = LocalRepository::new();
    let info = services::store_dataset(&repo, &minimal_dataset("march", "sum-1"))
        .await
        .unwrap();
    assert_eq!(info.dataset_name, "march");

    let datasets = services::list_datasets(&repo).await.unwrap();
    assert_eq!(datasets.len(), 1);
}

#[tokio::test]
async fn test_store_populates_aggregates_by_default() {
    let repo = LocalRepository::new();
    let info = services::store_dataset(&repo, &minimal_dataset("march", "sum-1"))
        .await
        .unwrap();
    assert!(!services::ensure_aggregates(&repo, info.dataset_id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_store_without_aggregates_then_ensure() {
    let repo = LocalRepository::new();
    let info =
        services::store_dataset_with_options(&repo, &minimal_dataset("march", "sum-1"), false)
            .await
            .unwrap();

    assert!(services::ensure_aggregates(&repo, info.dataset_id)
        .await
        .unwrap());
    assert!(!services::ensure_aggregates(&repo, info.dataset_id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_checksum_deduplication() {
    let repo = LocalRepository::new();
    let first = services::store_dataset(&repo, &minimal_dataset("march", "same-sum"))
        .await
        .unwrap();
    let second = services::store_dataset(&repo, &minimal_dataset("march again", "same-sum"))
        .await
        .unwrap();

    assert_eq!(first.dataset_id, second.dataset_id);
    assert_eq!(services::list_datasets(&repo).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_check() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());
}
